//! Command handlers for the `un` binary.
//!
//! Each submodule owns one subcommand: an `Args` struct parsed by clap and
//! a `run_*` entry point taking the parsed args, the global snapshot
//! override, the resolved output mode, and the working directory.

use anyhow::Result;
use clap::Args;
use needs_core::config::{self, ProjectConfig};
use needs_core::filter::{NeedFilter, RefinedFilter};
use needs_core::snapshot::{Snapshot, SnapshotError};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::output::{CliError, OutputMode, render_error};

pub mod completions;
pub mod entities;
pub mod graph;
pub mod groups;
pub mod list;
pub mod next_id;
pub mod phases;
pub mod show;
pub mod stats;

/// Filter flags shared by `list` and `graph`.
///
/// Every dimension is optional; omitted dimensions stay inactive and the
/// active ones combine conjunctively.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only needs belonging to this user group id
    #[arg(long = "group", value_name = "ID")]
    pub group: Option<String>,

    /// Only needs whose user group belongs to this super group id
    #[arg(long = "super-group", value_name = "ID")]
    pub super_group: Option<String>,

    /// Only needs referencing this entity id
    #[arg(long, value_name = "ID")]
    pub entity: Option<String>,

    /// Only needs in this workflow phase id
    #[arg(long = "phase", value_name = "ID")]
    pub phase: Option<String>,

    /// Only refined or only unrefined needs
    #[arg(long, value_name = "STATE")]
    pub refined: Option<RefinedFilter>,
}

impl FilterArgs {
    /// Build the core filter from the parsed flags.
    pub fn to_filter(&self) -> NeedFilter {
        NeedFilter {
            user_group_id: self.group.clone().unwrap_or_default(),
            super_group: self.super_group.clone().unwrap_or_default(),
            entity: self.entity.clone().unwrap_or_default(),
            workflow_phase: self.phase.clone().unwrap_or_default(),
            refined: self.refined.unwrap_or_default(),
        }
    }
}

/// A loaded catalog plus the config and path it came from.
pub struct ProjectView {
    pub snapshot: Snapshot,
    pub config: ProjectConfig,
    pub snapshot_path: PathBuf,
}

/// Locate the project, load its config, and parse the snapshot.
///
/// The project root is the nearest ancestor of `cwd` holding a `.needs/`
/// directory; without one, `cwd` itself is used and defaults apply. Load
/// failures are rendered as structured errors before bailing so JSON
/// consumers still get a parseable payload.
pub fn load_project(
    snapshot_flag: Option<&Path>,
    cwd: &Path,
    output: OutputMode,
) -> Result<ProjectView> {
    let project_root = config::find_project_root(cwd).unwrap_or_else(|| cwd.to_path_buf());

    let project_config = match config::load_project_config(&project_root) {
        Ok(cfg) => cfg,
        Err(err) => {
            render_error(
                output,
                &CliError::with_details(
                    format!("{err:#}"),
                    "check .needs/config.toml for syntax errors",
                    "invalid_config",
                ),
            )?;
            anyhow::bail!("invalid project config");
        }
    };

    let snapshot_path =
        config::resolve_snapshot_path(snapshot_flag, &project_config, &project_root);
    debug!(path = %snapshot_path.display(), "loading catalog snapshot");

    match Snapshot::from_path(&snapshot_path) {
        Ok(snapshot) => Ok(ProjectView {
            snapshot,
            config: project_config,
            snapshot_path,
        }),
        Err(err) => {
            let (suggestion, code) = match err {
                SnapshotError::Io { .. } => (
                    "pass --snapshot <FILE> or set `snapshot` in .needs/config.toml",
                    "snapshot_unreadable",
                ),
                SnapshotError::Parse { .. } => (
                    "the snapshot must be a JSON catalog document",
                    "snapshot_invalid",
                ),
            };
            let message = format!("{:#}", anyhow::Error::new(err));
            render_error(output, &CliError::with_details(message, suggestion, code))?;
            anyhow::bail!("could not load snapshot");
        }
    }
}

/// Join a filter's query parameters into a `k=v&k=v` string for debug logs.
pub fn query_string(filter: &NeedFilter) -> String {
    filter
        .query_params()
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}
