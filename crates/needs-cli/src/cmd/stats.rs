use anyhow::Result;
use clap::{Args, ValueEnum};
use needs_core::filter::NeedFilter;
use needs_core::snapshot::Snapshot;
use needs_core::stats::{
    BucketRow, Statistics, bucket_view, format_super_group_label, rollup_by_super_group,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cmd::{self, ProjectView};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Which grouping the primary chart uses.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAxis {
    UserGroup,
    SuperGroup,
}

impl GroupAxis {
    const fn as_str(self) -> &'static str {
        match self {
            Self::UserGroup => "userGroup",
            Self::SuperGroup => "superGroup",
        }
    }
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Group the primary chart by user group or super group
    #[arg(long, value_enum, default_value = "user-group")]
    pub by: GroupAxis,

    /// Also report workflow-phase and entity charts
    #[arg(long)]
    pub extended: bool,

    /// How many entities the entity chart keeps (default from config)
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Read a saved statistics payload instead of tallying the snapshot
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Narrow one dimension and report the matching need ids (DIM=ID)
    #[arg(long, value_name = "DIM=ID")]
    pub drill: Option<String>,
}

/// The full stats payload: primary chart plus optional extended charts
/// and drill result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub total_needs: usize,
    pub axis: &'static str,
    pub groups: Vec<BucketRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_phases: Option<Vec<BucketRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_entities: Option<Vec<BucketRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drill: Option<DrillReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillReport {
    pub filter: NeedFilter,
    pub query: String,
    pub selected: usize,
    pub need_ids: Vec<String>,
}

pub fn run_stats(
    args: &StatsArgs,
    snapshot_flag: Option<&Path>,
    output: OutputMode,
    cwd: &Path,
) -> Result<()> {
    let project = cmd::load_project(snapshot_flag, cwd, output)?;
    let stats = load_statistics(args, &project, output)?;

    let drill = match args.drill.as_deref() {
        Some(spec) => match parse_drill(spec) {
            Ok(filter) => Some(drill_report(&filter, &project.snapshot)),
            Err(err) => {
                render_error(output, &err)?;
                anyhow::bail!("invalid drill '{spec}'");
            }
        },
        None => None,
    };

    let report = build_report(args, &stats, &project, drill);
    render_mode(output, &report, render_stats_text, render_stats_pretty)
}

/// Statistics either tallied from the snapshot or read from `--from`.
fn load_statistics(
    args: &StatsArgs,
    project: &ProjectView,
    output: OutputMode,
) -> Result<Statistics> {
    let Some(ref path) = args.from else {
        return Ok(project.snapshot.statistics());
    };

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            render_error(
                output,
                &CliError::with_details(
                    format!("failed to read stats file {}: {err}", path.display()),
                    "pass --from a saved JSON statistics payload",
                    "stats_unreadable",
                ),
            )?;
            anyhow::bail!("could not read stats file");
        }
    };

    match serde_json::from_str(&raw) {
        Ok(stats) => Ok(stats),
        Err(err) => {
            render_error(
                output,
                &CliError::with_details(
                    format!("failed to parse stats file {}: {err}", path.display()),
                    "the file must be a JSON statistics payload",
                    "invalid_stats_payload",
                ),
            )?;
            anyhow::bail!("could not parse stats file");
        }
    }
}

fn build_report(
    args: &StatsArgs,
    stats: &Statistics,
    project: &ProjectView,
    drill: Option<DrillReport>,
) -> StatsReport {
    let snapshot = &project.snapshot;
    let total = stats.total_needs;

    let groups = match args.by {
        GroupAxis::UserGroup => bucket_view(
            &stats.by_user_group,
            total,
            |id| snapshot.user_group_name(id).to_string(),
            None,
        ),
        GroupAxis::SuperGroup => {
            let rollup = rollup_by_super_group(&stats.by_user_group, &snapshot.user_groups);
            bucket_view(&rollup, total, format_super_group_label, None)
        }
    };

    let (workflow_phases, top_entities) = if args.extended {
        let top = args.top.unwrap_or(project.config.stats.top_entities);
        (
            Some(bucket_view(
                &stats.by_workflow_phase,
                total,
                |id| snapshot.workflow_phase_name(id).to_string(),
                None,
            )),
            Some(bucket_view(
                &stats.by_entity,
                total,
                |id| snapshot.entity_name(id).to_string(),
                Some(top),
            )),
        )
    } else {
        (None, None)
    };

    StatsReport {
        total_needs: total,
        axis: args.by.as_str(),
        groups,
        workflow_phases,
        top_entities,
        drill,
    }
}

/// Parse a `DIM=ID` drill spec into a single-dimension filter.
///
/// Dimension names are matched after stripping dashes and underscores and
/// lowercasing, so `user-group`, `userGroupId`, and `group` all hit the
/// user-group dimension.
fn parse_drill(spec: &str) -> Result<NeedFilter, CliError> {
    let Some((dim, id)) = spec.split_once('=') else {
        return Err(CliError::with_details(
            format!("invalid drill '{spec}'"),
            "pass --drill DIM=ID, e.g. --drill group=patient",
            "invalid_drill",
        ));
    };
    if id.is_empty() {
        return Err(CliError::with_details(
            format!("invalid drill '{spec}': missing id"),
            "pass --drill DIM=ID, e.g. --drill entity=appointment",
            "invalid_drill",
        ));
    }

    let normalized = dim
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_lowercase();
    match normalized.as_str() {
        "group" | "usergroup" | "usergroupid" => Ok(NeedFilter::for_user_group(id)),
        "supergroup" => Ok(NeedFilter::for_super_group(id)),
        "entity" => Ok(NeedFilter::for_entity(id)),
        "phase" | "workflowphase" => Ok(NeedFilter::for_workflow_phase(id)),
        _ => Err(CliError::with_details(
            format!("unknown drill dimension '{dim}'"),
            "use group, super-group, entity, or phase",
            "invalid_drill",
        )),
    }
}

fn drill_report(filter: &NeedFilter, snapshot: &Snapshot) -> DrillReport {
    let needs = snapshot.select(filter);
    DrillReport {
        query: cmd::query_string(filter),
        filter: filter.clone(),
        selected: needs.len(),
        need_ids: needs.into_iter().map(|n| n.id.clone()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

const BAR_CELLS: f64 = 24.0;

/// ASCII bar for one bucket row, scaled so 100% fills every cell.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar(width_pct: f64) -> String {
    let cells = (width_pct / 100.0 * BAR_CELLS).round() as usize;
    "#".repeat(cells)
}

fn axis_word(report: &StatsReport) -> &'static str {
    match report.axis {
        "superGroup" => "super-group",
        _ => "user-group",
    }
}

fn render_stats_text(report: &StatsReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "total: {}", report.total_needs)?;
    let axis = axis_word(report);
    for row in &report.groups {
        writeln!(w, "{axis} {} {}", row.key, row.count)?;
    }
    if let Some(ref phases) = report.workflow_phases {
        for row in phases {
            writeln!(w, "phase {} {}", row.key, row.count)?;
        }
    }
    if let Some(ref entities) = report.top_entities {
        for row in entities {
            writeln!(w, "entity {} {}", row.key, row.count)?;
        }
    }
    if let Some(ref drill) = report.drill {
        writeln!(w, "drill {} {}", drill.query, drill.selected)?;
        for id in &drill.need_ids {
            writeln!(w, "drill-need {id}")?;
        }
    }
    Ok(())
}

fn render_bucket_rows(rows: &[BucketRow], w: &mut dyn Write) -> io::Result<()> {
    for row in rows {
        writeln!(
            w,
            "  {:<24} {:<24} {:>4}  {:>5.1}%",
            row.label,
            bar(row.width_pct),
            row.count,
            row.width_pct
        )?;
    }
    Ok(())
}

fn render_stats_pretty(report: &StatsReport, w: &mut dyn Write) -> io::Result<()> {
    let heading = match report.axis {
        "superGroup" => "Needs by super group",
        _ => "Needs by user group",
    };
    pretty_section(w, heading)?;
    pretty_kv(w, "total", report.total_needs.to_string())?;
    writeln!(w)?;
    render_bucket_rows(&report.groups, w)?;

    if let Some(ref phases) = report.workflow_phases {
        writeln!(w)?;
        pretty_section(w, "Needs by workflow phase")?;
        render_bucket_rows(phases, w)?;
    }
    if let Some(ref entities) = report.top_entities {
        writeln!(w)?;
        pretty_section(w, "Top entities")?;
        render_bucket_rows(entities, w)?;
    }
    if let Some(ref drill) = report.drill {
        writeln!(w)?;
        pretty_section(w, &format!("Drill: {}", drill.query))?;
        writeln!(
            w,
            "  {} of {} needs selected",
            drill.selected, report.total_needs
        )?;
        for id in &drill.need_ids {
            writeln!(w, "  {id}")?;
        }
    }
    Ok(())
}
