use anyhow::Result;
use clap::Args;
use needs_core::model::Need;
use needs_core::snapshot::Snapshot;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use crate::cmd;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Need id (e.g. AYK-012)
    pub id: String,
}

/// A reference resolved to its display name.
#[derive(Debug, Serialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChange {
    pub from: String,
    pub to: String,
}

/// Full detail payload for one need, with every reference resolved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub user_group: NamedRef,
    pub workflow_phase: NamedRef,
    pub entities: Vec<NamedRef>,
    pub refined: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla: Option<String>,
    pub optional: bool,
    pub future_feature: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_change: Option<StateChange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
}

pub fn run_show(
    args: &ShowArgs,
    snapshot_flag: Option<&Path>,
    output: OutputMode,
    cwd: &Path,
) -> Result<()> {
    let project = cmd::load_project(snapshot_flag, cwd, output)?;

    let Some(need) = project.snapshot.need(&args.id) else {
        render_error(
            output,
            &CliError::with_details(
                format!("need '{}' not found", args.id),
                "use `un list` to see available ids",
                "need_not_found",
            ),
        )?;
        anyhow::bail!("need '{}' not found", args.id);
    };

    let detail = need_detail(need, &project.snapshot);
    render_mode(output, &detail, render_show_text, render_show_pretty)
}

fn need_detail(need: &Need, snapshot: &Snapshot) -> NeedDetail {
    NeedDetail {
        id: need.id.clone(),
        title: need.title.clone(),
        description: need.description.clone(),
        user_group: NamedRef {
            id: need.user_group_id.clone(),
            name: snapshot.user_group_name(&need.user_group_id).to_string(),
        },
        workflow_phase: NamedRef {
            id: need.workflow_phase.clone(),
            name: snapshot.workflow_phase_name(&need.workflow_phase).to_string(),
        },
        entities: need
            .entities
            .iter()
            .map(|id| NamedRef {
                id: id.clone(),
                name: snapshot.entity_name(id).to_string(),
            })
            .collect(),
        refined: need.is_refined(),
        sla: need.sla.clone(),
        optional: need.is_optional(),
        future_feature: need.is_future_feature(),
        state_change: need.state_change().map(|(from, to)| StateChange {
            from: from.to_string(),
            to: to.to_string(),
        }),
        constraints: need.constraints.clone().unwrap_or_default(),
    }
}

fn render_show_text(detail: &NeedDetail, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "id: {}", detail.id)?;
    writeln!(w, "title: {}", detail.title)?;
    writeln!(w, "group: {}", detail.user_group.id)?;
    writeln!(w, "phase: {}", detail.workflow_phase.id)?;
    let entities: Vec<&str> = detail.entities.iter().map(|e| e.id.as_str()).collect();
    writeln!(w, "entities: {}", entities.join(", "))?;
    writeln!(w, "refined: {}", detail.refined)?;
    if let Some(ref sla) = detail.sla {
        writeln!(w, "sla: {sla}")?;
    }
    if detail.optional {
        writeln!(w, "optional: true")?;
    }
    if detail.future_feature {
        writeln!(w, "future-feature: true")?;
    }
    if let Some(ref change) = detail.state_change {
        writeln!(w, "transition: {} -> {}", change.from, change.to)?;
    }
    if !detail.description.is_empty() {
        writeln!(w, "description: {}", detail.description)?;
    }
    for constraint in &detail.constraints {
        writeln!(w, "constraint: {constraint}")?;
    }
    Ok(())
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn render_show_pretty(detail: &NeedDetail, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("{}  {}", detail.id, detail.title))?;
    pretty_kv(
        w,
        "group",
        format!("{} ({})", detail.user_group.name, detail.user_group.id),
    )?;
    pretty_kv(
        w,
        "phase",
        format!("{} ({})", detail.workflow_phase.name, detail.workflow_phase.id),
    )?;
    let entities: Vec<String> = detail
        .entities
        .iter()
        .map(|e| format!("{} ({})", e.name, e.id))
        .collect();
    if !entities.is_empty() {
        pretty_kv(w, "entities", entities.join(", "))?;
    }
    pretty_kv(w, "refined", yes_no(detail.refined))?;
    if let Some(ref sla) = detail.sla {
        pretty_kv(w, "sla", sla)?;
    }
    if detail.optional {
        pretty_kv(w, "optional", "yes")?;
    }
    if detail.future_feature {
        pretty_kv(w, "future", "yes")?;
    }
    if let Some(ref change) = detail.state_change {
        pretty_kv(w, "transition", format!("{} -> {}", change.from, change.to))?;
    }
    if !detail.description.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Description")?;
        writeln!(w, "{}", detail.description)?;
    }
    if !detail.constraints.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Constraints")?;
        for constraint in &detail.constraints {
            writeln!(w, "  - {constraint}")?;
        }
    }
    Ok(())
}
