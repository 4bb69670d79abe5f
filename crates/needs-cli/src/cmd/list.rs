use anyhow::Result;
use clap::Args;
use needs_core::model::Need;
use needs_core::snapshot::Snapshot;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

use crate::cmd::{self, FilterArgs};
use crate::output::{OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Maximum number of needs to print
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,
}

pub fn run_list(
    args: &ListArgs,
    snapshot_flag: Option<&Path>,
    output: OutputMode,
    cwd: &Path,
) -> Result<()> {
    let project = cmd::load_project(snapshot_flag, cwd, output)?;
    let filter = args.filter.to_filter();

    let query = cmd::query_string(&filter);
    if !query.is_empty() {
        debug!(%query, "equivalent API query");
    }

    let mut needs = project.snapshot.select(&filter);
    let total = needs.len();
    if let Some(limit) = args.limit {
        needs.truncate(limit);
    }

    let snapshot = &project.snapshot;
    render_mode(
        output,
        &needs,
        |needs, w| render_list_text(needs, w),
        |needs, w| render_list_pretty(needs, total, snapshot, w),
    )
}

const fn refined_marker(need: &Need) -> char {
    if need.is_refined() { '+' } else { '.' }
}

fn render_list_text(needs: &[&Need], w: &mut dyn Write) -> io::Result<()> {
    for need in needs {
        writeln!(
            w,
            "{:<10} {} {:<14} {:<12} {}",
            need.id,
            refined_marker(need),
            need.user_group_id,
            need.workflow_phase,
            need.title
        )?;
    }
    Ok(())
}

fn render_list_pretty(
    needs: &[&Need],
    total: usize,
    snapshot: &Snapshot,
    w: &mut dyn Write,
) -> io::Result<()> {
    pretty_section(w, &format!("Needs ({} of {total})", needs.len()))?;
    if needs.is_empty() {
        writeln!(w, "  no needs match the active filters")?;
        return Ok(());
    }
    for need in needs {
        writeln!(
            w,
            "{:<10} {} {:<18} {:<14} {}",
            need.id,
            refined_marker(need),
            snapshot.user_group_name(&need.user_group_id),
            snapshot.workflow_phase_name(&need.workflow_phase),
            need.title
        )?;
    }
    Ok(())
}
