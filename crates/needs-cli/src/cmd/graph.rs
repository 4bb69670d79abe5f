use anyhow::Result;
use clap::Args;
use needs_core::graph::{GraphSummary, RelationGraph};
use needs_core::stats::ranked;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

use crate::cmd::{self, FilterArgs};
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Emit Graphviz DOT instead of a summary
    #[arg(long)]
    pub dot: bool,
}

pub fn run_graph(
    args: &GraphArgs,
    snapshot_flag: Option<&Path>,
    output: OutputMode,
    cwd: &Path,
) -> Result<()> {
    let project = cmd::load_project(snapshot_flag, cwd, output)?;
    let filter = args.filter.to_filter();

    let query = cmd::query_string(&filter);
    if !query.is_empty() {
        debug!(%query, "graph selection");
    }

    let graph = RelationGraph::build(&project.snapshot, &filter);

    if args.dot {
        // DOT is a format of its own; --format does not apply here.
        print!("{}", graph.to_dot());
        return Ok(());
    }

    render(output, &graph.summary(), render_graph_human)
}

fn render_graph_human(summary: &GraphSummary, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Reference graph")?;
    pretty_kv(w, "nodes", summary.node_count.to_string())?;
    pretty_kv(w, "edges", summary.edge_count.to_string())?;
    pretty_kv(w, "isolated", summary.isolated_reference_count.to_string())?;

    writeln!(w, "\nNodes by kind:")?;
    for (kind, count) in ranked(&summary.nodes_by_kind) {
        writeln!(w, "  {kind}: {count}")?;
    }

    writeln!(w, "\nEdges by relation:")?;
    for (relation, count) in ranked(&summary.edges_by_relation) {
        writeln!(w, "  {relation}: {count}")?;
    }

    if !summary.most_connected.is_empty() {
        writeln!(w, "\nMost connected:")?;
        for node in &summary.most_connected {
            writeln!(
                w,
                "  {} ({}): {}",
                node.label,
                node.kind.as_str(),
                node.degree
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use needs_core::filter::NeedFilter;
    use needs_core::snapshot::Snapshot;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: GraphArgs,
    }

    #[test]
    fn dot_flag_parses_alongside_filters() {
        let wrapper = Wrapper::parse_from(["test", "--dot", "--group", "patient"]);
        assert!(wrapper.args.dot);
        assert_eq!(wrapper.args.filter.group.as_deref(), Some("patient"));
    }

    #[test]
    fn human_summary_lists_counts_and_hubs() {
        let snapshot = Snapshot::from_json(
            r#"{
                "userGroups": [{"id": "patient", "name": "Patients"}],
                "entities": [
                    {"id": "appointment", "name": "Appointment"},
                    {"id": "invoice", "name": "Invoice"}
                ],
                "workflowPhases": [{"id": "intake", "name": "Intake", "order": 1}],
                "userNeeds": [
                    {
                        "id": "AYK-001",
                        "userGroupId": "patient",
                        "title": "Book an appointment",
                        "description": "",
                        "entities": ["appointment"],
                        "workflowPhase": "intake"
                    }
                ]
            }"#,
        )
        .unwrap();
        let graph = RelationGraph::build(&snapshot, &NeedFilter::default());

        let mut buf = Vec::new();
        render_graph_human(&graph.summary(), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.contains("Reference graph"), "missing heading: {out}");
        assert!(out.contains("nodes:"), "missing node count: {out}");
        // invoice has no incoming references
        assert!(out.contains("isolated:    1"), "missing isolation: {out}");
        assert!(out.contains("belongsTo: 1"), "missing relation row: {out}");
        assert!(
            out.contains("Patients (userGroup): 1"),
            "missing hub row: {out}"
        );
    }
}
