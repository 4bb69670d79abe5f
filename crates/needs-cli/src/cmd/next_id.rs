use anyhow::Result;
use clap::Args;
use needs_core::id::{NextId, NextIdError};
use std::io::{self, Write};
use std::path::Path;

use crate::cmd;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

#[derive(Args, Debug)]
pub struct NextIdArgs {
    /// User group id the new need will belong to
    pub group: String,
}

pub fn run_next_id(
    args: &NextIdArgs,
    snapshot_flag: Option<&Path>,
    output: OutputMode,
    cwd: &Path,
) -> Result<()> {
    let project = cmd::load_project(snapshot_flag, cwd, output)?;

    match project.snapshot.next_need_id(&args.group) {
        Ok(next) => render_mode(output, &next, render_next_text, render_next_pretty),
        Err(err) => {
            let (suggestion, code) = match err {
                NextIdError::UnknownGroup(_) => (
                    "use `un groups` to see available group ids",
                    "unknown_group",
                ),
                NextIdError::NoSuperGroup(_) => (
                    "give the group a superGroup so ids can take its prefix",
                    "no_super_group",
                ),
                NextIdError::UnknownSuperGroup(_) => (
                    "add the super group to userSuperGroups in the snapshot",
                    "unknown_super_group",
                ),
            };
            render_error(
                output,
                &CliError::with_details(err.to_string(), suggestion, code),
            )?;
            anyhow::bail!("no id for group '{}'", args.group);
        }
    }
}

// Text mode prints the bare id so scripts can capture it directly.
fn render_next_text(next: &NextId, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", next.next_id)
}

fn render_next_pretty(next: &NextId, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Next need id")?;
    pretty_kv(w, "next id", &next.next_id)?;
    pretty_kv(w, "prefix", &next.prefix)
}
