use anyhow::Result;
use clap::Args;
use needs_core::model::Entity;
use std::io::{self, Write};
use std::path::Path;

use crate::cmd;
use crate::output::{OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct EntitiesArgs {}

pub fn run_entities(
    _args: &EntitiesArgs,
    snapshot_flag: Option<&Path>,
    output: OutputMode,
    cwd: &Path,
) -> Result<()> {
    let project = cmd::load_project(snapshot_flag, cwd, output)?;
    render_mode(
        output,
        &project.snapshot.entities,
        |entities, w| render_entities_text(entities, w),
        |entities, w| render_entities_pretty(entities, w),
    )
}

fn render_entities_text(entities: &[Entity], w: &mut dyn Write) -> io::Result<()> {
    for entity in entities {
        writeln!(w, "{:<16} {}", entity.id, entity.name)?;
    }
    Ok(())
}

fn render_entities_pretty(entities: &[Entity], w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Entities ({})", entities.len()))?;
    for entity in entities {
        match entity.description {
            Some(ref description) => {
                writeln!(w, "{:<16} {:<24} {description}", entity.id, entity.name)?;
            }
            None => writeln!(w, "{:<16} {}", entity.id, entity.name)?,
        }
    }
    Ok(())
}
