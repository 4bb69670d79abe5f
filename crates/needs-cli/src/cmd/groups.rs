use anyhow::Result;
use clap::Args;
use needs_core::model::{SuperGroup, UserGroup};
use std::io::{self, Write};
use std::path::Path;

use crate::cmd;
use crate::output::{OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct GroupsArgs {
    /// List super groups instead of user groups
    #[arg(long = "super")]
    pub super_groups: bool,
}

pub fn run_groups(
    args: &GroupsArgs,
    snapshot_flag: Option<&Path>,
    output: OutputMode,
    cwd: &Path,
) -> Result<()> {
    let project = cmd::load_project(snapshot_flag, cwd, output)?;

    if args.super_groups {
        render_mode(
            output,
            &project.snapshot.user_super_groups,
            |supers, w| render_supers_text(supers, w),
            |supers, w| render_supers_pretty(supers, w),
        )
    } else {
        render_mode(
            output,
            &project.snapshot.user_groups,
            |groups, w| render_groups_text(groups, w),
            |groups, w| render_groups_pretty(groups, w),
        )
    }
}

fn super_column(group: &UserGroup) -> &str {
    group.super_group.as_deref().unwrap_or("-")
}

fn render_groups_text(groups: &[UserGroup], w: &mut dyn Write) -> io::Result<()> {
    for group in groups {
        writeln!(
            w,
            "{:<16} {:<16} {}",
            group.id,
            super_column(group),
            group.name
        )?;
    }
    Ok(())
}

fn render_groups_pretty(groups: &[UserGroup], w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("User groups ({})", groups.len()))?;
    for group in groups {
        writeln!(
            w,
            "{:<16} {:<16} {}",
            group.id,
            super_column(group),
            group.name
        )?;
        if let Some(ref description) = group.description {
            writeln!(w, "{:<16} {description}", "")?;
        }
    }
    Ok(())
}

fn render_supers_text(supers: &[SuperGroup], w: &mut dyn Write) -> io::Result<()> {
    for super_group in supers {
        writeln!(
            w,
            "{:<16} {:<8} {}",
            super_group.id, super_group.prefix, super_group.name
        )?;
    }
    Ok(())
}

fn render_supers_pretty(supers: &[SuperGroup], w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Super groups ({})", supers.len()))?;
    render_supers_text(supers, w)
}
