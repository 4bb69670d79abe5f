//! The relationship graph over a catalog selection.
//!
//! Nodes are the selected needs plus every reference record; edges run
//! from a need to the group it belongs to, the phase it sits in, and
//! each entity it uses. This is the data the graph view renders; layout
//! and interaction are a front-end concern and no rendering happens
//! here beyond a Graphviz export.

use crate::filter::NeedFilter;
use crate::snapshot::Snapshot;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;

/// How many of the busiest reference nodes a summary reports.
pub const MOST_CONNECTED: usize = 5;

/// What a graph node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Need,
    UserGroup,
    Entity,
    WorkflowPhase,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Need => "need",
            Self::UserGroup => "userGroup",
            Self::Entity => "entity",
            Self::WorkflowPhase => "workflowPhase",
        }
    }

    const fn dot_shape(self) -> &'static str {
        match self {
            Self::Need => "box",
            Self::UserGroup => "ellipse",
            Self::Entity => "diamond",
            Self::WorkflowPhase => "hexagon",
        }
    }
}

/// The three edge flavors a need emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    BelongsTo,
    InPhase,
    Uses,
}

impl Relation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BelongsTo => "belongsTo",
            Self::InPhase => "inPhase",
            Self::Uses => "uses",
        }
    }
}

/// One node: the record's id, its display label, and what it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
}

/// A reference node and how many needs touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDegree {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub degree: usize,
}

/// Summary counts over a built graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_kind: HashMap<String, usize>,
    pub edges_by_relation: HashMap<String, usize>,
    /// Reference records no selected need touches at all.
    pub isolated_reference_count: usize,
    pub most_connected: Vec<NodeDegree>,
}

/// The relationship graph for one selection over one snapshot.
#[derive(Debug)]
pub struct RelationGraph {
    /// Directed graph: need nodes point at the records they reference.
    pub graph: DiGraph<GraphNode, Relation>,
    /// Kind-qualified id (`"entity:record"`) to petgraph index.
    node_map: HashMap<String, NodeIndex>,
}

fn node_key(kind: NodeKind, id: &str) -> String {
    format!("{}:{}", kind.as_str(), id)
}

/// Insert-or-find a node. Ids are qualified by kind, so a group and an
/// entity sharing an id stay distinct nodes. The first label offered
/// wins; references with no record keep their raw id as the label.
fn ensure_node(
    graph: &mut DiGraph<GraphNode, Relation>,
    node_map: &mut HashMap<String, NodeIndex>,
    kind: NodeKind,
    id: &str,
    label: &str,
) -> NodeIndex {
    *node_map.entry(node_key(kind, id)).or_insert_with(|| {
        graph.add_node(GraphNode {
            id: id.to_string(),
            label: label.to_string(),
            kind,
        })
    })
}

impl RelationGraph {
    /// Build the graph for the needs `filter` selects out of `snapshot`.
    ///
    /// Every reference record becomes a node whether or not any selected
    /// need touches it; that is what makes isolated references visible.
    /// A need referencing an id with no record gets a placeholder node
    /// labeled with the raw id.
    #[must_use]
    pub fn build(snapshot: &Snapshot, filter: &NeedFilter) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

        for group in &snapshot.user_groups {
            ensure_node(
                &mut graph,
                &mut node_map,
                NodeKind::UserGroup,
                &group.id,
                &group.name,
            );
        }
        for entity in &snapshot.entities {
            ensure_node(
                &mut graph,
                &mut node_map,
                NodeKind::Entity,
                &entity.id,
                &entity.name,
            );
        }
        for phase in &snapshot.workflow_phases {
            ensure_node(
                &mut graph,
                &mut node_map,
                NodeKind::WorkflowPhase,
                &phase.id,
                &phase.name,
            );
        }

        for need in snapshot.select(filter) {
            let need_idx = ensure_node(
                &mut graph,
                &mut node_map,
                NodeKind::Need,
                &need.id,
                &need.title,
            );

            let group_idx = ensure_node(
                &mut graph,
                &mut node_map,
                NodeKind::UserGroup,
                &need.user_group_id,
                &need.user_group_id,
            );
            if !graph.contains_edge(need_idx, group_idx) {
                graph.add_edge(need_idx, group_idx, Relation::BelongsTo);
            }

            let phase_idx = ensure_node(
                &mut graph,
                &mut node_map,
                NodeKind::WorkflowPhase,
                &need.workflow_phase,
                &need.workflow_phase,
            );
            if !graph.contains_edge(need_idx, phase_idx) {
                graph.add_edge(need_idx, phase_idx, Relation::InPhase);
            }

            for entity_id in &need.entities {
                let entity_idx = ensure_node(
                    &mut graph,
                    &mut node_map,
                    NodeKind::Entity,
                    entity_id,
                    entity_id,
                );
                if !graph.contains_edge(need_idx, entity_idx) {
                    graph.add_edge(need_idx, entity_idx, Relation::Uses);
                }
            }
        }

        Self { graph, node_map }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the node for a record by kind and id.
    #[must_use]
    pub fn node_index(&self, kind: NodeKind, id: &str) -> Option<NodeIndex> {
        self.node_map.get(&node_key(kind, id)).copied()
    }

    /// Summary counts plus the busiest reference nodes.
    #[must_use]
    pub fn summary(&self) -> GraphSummary {
        let mut nodes_by_kind: HashMap<String, usize> = HashMap::new();
        let mut edges_by_relation: HashMap<String, usize> = HashMap::new();
        let mut isolated_reference_count = 0;
        let mut degrees: Vec<NodeDegree> = Vec::new();

        for idx in self.graph.node_indices() {
            let node = &self.graph[idx];
            *nodes_by_kind
                .entry(node.kind.as_str().to_string())
                .or_insert(0) += 1;

            if node.kind == NodeKind::Need {
                continue;
            }
            let degree = self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .count();
            if degree == 0 {
                isolated_reference_count += 1;
            } else {
                degrees.push(NodeDegree {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    kind: node.kind,
                    degree,
                });
            }
        }

        for edge in self.graph.edge_references() {
            *edges_by_relation
                .entry(edge.weight().as_str().to_string())
                .or_insert(0) += 1;
        }

        degrees.sort_by(|a, b| b.degree.cmp(&a.degree).then_with(|| a.id.cmp(&b.id)));
        degrees.truncate(MOST_CONNECTED);

        GraphSummary {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            nodes_by_kind,
            edges_by_relation,
            isolated_reference_count,
            most_connected: degrees,
        }
    }

    /// Graphviz export for external tooling (`un graph --dot | dot -Tsvg`).
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph needs {\n  rankdir=LR;\n");
        for idx in self.graph.node_indices() {
            let node = &self.graph[idx];
            let _ = writeln!(
                out,
                "  \"{}\" [label=\"{}\", shape={}];",
                node_key(node.kind, &node.id),
                escape(&node.label),
                node.kind.dot_shape(),
            );
        }
        for edge in self.graph.edge_references() {
            let source = &self.graph[edge.source()];
            let target = &self.graph[edge.target()];
            let _ = writeln!(
                out,
                "  \"{}\" -> \"{}\" [label=\"{}\"];",
                node_key(source.kind, &source.id),
                node_key(target.kind, &target.id),
                edge.weight().as_str(),
            );
        }
        out.push_str("}\n");
        out
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
