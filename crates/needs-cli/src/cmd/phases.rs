use anyhow::Result;
use clap::Args;
use needs_core::model::WorkflowPhase;
use std::io::{self, Write};
use std::path::Path;

use crate::cmd;
use crate::output::{OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct PhasesArgs {}

pub fn run_phases(
    _args: &PhasesArgs,
    snapshot_flag: Option<&Path>,
    output: OutputMode,
    cwd: &Path,
) -> Result<()> {
    let project = cmd::load_project(snapshot_flag, cwd, output)?;
    // Display order, not document order.
    let phases = project.snapshot.sorted_phases();
    render_mode(
        output,
        &phases,
        |phases, w| render_phases_text(phases, w),
        |phases, w| render_phases_pretty(phases, w),
    )
}

fn render_phases_text(phases: &[&WorkflowPhase], w: &mut dyn Write) -> io::Result<()> {
    for phase in phases {
        writeln!(w, "{:>4} {:<16} {}", phase.order, phase.id, phase.name)?;
    }
    Ok(())
}

fn render_phases_pretty(phases: &[&WorkflowPhase], w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Workflow phases ({})", phases.len()))?;
    render_phases_text(phases, w)
}
