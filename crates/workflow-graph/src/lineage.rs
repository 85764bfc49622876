//! Lineage layout
//!
//! Assigns every node a `(level, column)` pair for drawing the workflow as
//! a layered DAG. A node's level is the length of the longest path from any
//! root that reaches it; its column is its index within that level, in
//! graph order. The layout is recomputed on every call and always succeeds,
//! including for empty and cyclic graphs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::GraphIndex;
use crate::types::{EdgeId, NodeCategory, NodeId, NodeKind, WorkflowGraph};

/// Level and column of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub level: usize,
    pub column: usize,
}

/// Placement of a node, keyed by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePlacement {
    pub node_id: NodeId,
    pub level: usize,
    pub column: usize,
}

/// Direction in which levels advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    TopToBottom,
}

/// Spacing used to turn placements into canvas coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub direction: LayoutDirection,
    /// Distance between consecutive levels
    pub level_spacing: f64,
    /// Distance between nodes within a level
    pub column_spacing: f64,
    /// Position of the level 0 / column 0 slot
    pub origin: (f64, f64),
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::LeftToRight,
            level_spacing: 250.0,
            column_spacing: 120.0,
            origin: (0.0, 0.0),
        }
    }
}

impl LayoutOptions {
    /// Canvas position of a slot
    pub fn position(&self, placement: Placement) -> (f64, f64) {
        let along = placement.level as f64 * self.level_spacing;
        let across = placement.column as f64 * self.column_spacing;
        match self.direction {
            LayoutDirection::LeftToRight => (self.origin.0 + along, self.origin.1 + across),
            LayoutDirection::TopToBottom => (self.origin.0 + across, self.origin.1 + along),
        }
    }
}

/// Per-node placement for a graph snapshot, in graph order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageLayout {
    pub placements: Vec<NodePlacement>,
}

impl LineageLayout {
    /// Placement of a node by id
    pub fn get(&self, node_id: &str) -> Option<Placement> {
        self.placements
            .iter()
            .find(|p| p.node_id == node_id)
            .map(|p| Placement { level: p.level, column: p.column })
    }

    /// Placements as a map keyed by node id
    pub fn to_map(&self) -> HashMap<NodeId, Placement> {
        self.placements
            .iter()
            .map(|p| (p.node_id.clone(), Placement { level: p.level, column: p.column }))
            .collect()
    }

    /// Number of levels (0 for an empty graph)
    pub fn depth(&self) -> usize {
        self.placements
            .iter()
            .map(|p| p.level + 1)
            .max()
            .unwrap_or(0)
    }

    /// Node ids grouped by level, each level ordered by column
    pub fn levels(&self) -> Vec<Vec<NodeId>> {
        let mut levels: Vec<Vec<NodeId>> = vec![Vec::new(); self.depth()];
        for placement in &self.placements {
            levels[placement.level].push(placement.node_id.clone());
        }
        levels
    }

    /// Canvas coordinates for every node, in graph order
    pub fn positions(&self, options: &LayoutOptions) -> Vec<(NodeId, (f64, f64))> {
        self.placements
            .iter()
            .map(|p| {
                let slot = Placement { level: p.level, column: p.column };
                (p.node_id.clone(), options.position(slot))
            })
            .collect()
    }
}

/// Compute the lineage layout of a graph
///
/// Edges that reference unknown nodes are ignored. Repeated node ids are
/// placed once, at their first occurrence.
pub fn compute_lineage_layout(graph: &WorkflowGraph) -> LineageLayout {
    let index = GraphIndex::build(graph);
    let levels = assign_levels(&index);

    let mut next_column: HashMap<usize, usize> = HashMap::new();
    let placements = index
        .nodes()
        .iter()
        .zip(&levels)
        .map(|(node, &level)| {
            let column = next_column.entry(level).or_insert(0);
            let placement = NodePlacement {
                node_id: node.id.clone(),
                level,
                column: *column,
            };
            *column += 1;
            placement
        })
        .collect();

    let layout = LineageLayout { placements };
    log::debug!(
        "Computed lineage layout for '{}': {} node(s) over {} level(s)",
        graph.id,
        index.len(),
        layout.depth()
    );
    layout
}

enum Step {
    Enter { node: usize, level: usize },
    Exit(usize),
}

/// Longest-path level of every node, by index
///
/// Walks depth-first from each root in graph order. A node is expanded the
/// first time it is reached and again whenever it is reached on a longer
/// path, so its descendants are pushed down with it. A node that is on the
/// current path is never re-entered, which keeps cycles finite: levels only
/// grow along simple paths and are bounded by the node count.
fn assign_levels(index: &GraphIndex<'_>) -> Vec<usize> {
    let n = index.len();
    let mut level = vec![0usize; n];
    let mut expanded = vec![false; n];
    let mut on_path = vec![false; n];
    let roots: Vec<usize> = index.roots().collect();

    for root in roots {
        let mut stack = vec![Step::Enter { node: root, level: 0 }];

        while let Some(step) = stack.pop() {
            match step {
                Step::Exit(node) => on_path[node] = false,
                Step::Enter { node, level: reached } => {
                    if on_path[node] || (expanded[node] && reached <= level[node]) {
                        continue;
                    }
                    level[node] = level[node].max(reached);
                    expanded[node] = true;
                    on_path[node] = true;
                    stack.push(Step::Exit(node));

                    for &child in index.successors(node).iter().rev() {
                        stack.push(Step::Enter {
                            node: child,
                            level: level[node] + 1,
                        });
                    }
                }
            }
        }
    }

    level
}

/// A node as the lineage view draws it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageNode {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    pub category: NodeCategory,
    pub level: usize,
    pub column: usize,
    pub position: (f64, f64),
}

/// An edge as the lineage view draws it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

/// Typed, positioned graph entities for a renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageGraph {
    pub nodes: Vec<LineageNode>,
    pub edges: Vec<LineageEdge>,
}

impl LineageGraph {
    /// Lay out a graph and package it for rendering
    ///
    /// Dangling edges are left out since there is nothing to draw them to.
    pub fn build(graph: &WorkflowGraph, options: &LayoutOptions) -> Self {
        let layout = compute_lineage_layout(graph);
        let index = GraphIndex::build(graph);

        let nodes = layout
            .placements
            .iter()
            .zip(index.nodes())
            .map(|(placement, node)| {
                let slot = Placement {
                    level: placement.level,
                    column: placement.column,
                };
                LineageNode {
                    id: node.id.clone(),
                    label: node.display_name().to_string(),
                    kind: node.kind(),
                    category: node.category(),
                    level: slot.level,
                    column: slot.column,
                    position: options.position(slot),
                }
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .filter(|e| index.position(&e.source).is_some() && index.position(&e.target).is_some())
            .map(|e| LineageEdge {
                id: e.id.clone(),
                source: e.source.clone(),
                target: e.target.clone(),
            })
            .collect();

        Self { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;
    use crate::nodes::NodeConfig;

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> WorkflowGraph {
        let mut builder = WorkflowBuilder::new("wf", "Lineage");
        for id in nodes {
            builder = builder.add_node(*id, *id, NodeConfig::empty(NodeKind::TransformNode));
        }
        for (source, target) in edges {
            builder = builder.add_edge(*source, *target);
        }
        builder.build()
    }

    fn at(layout: &LineageLayout, id: &str) -> (usize, usize) {
        let p = layout.get(id).expect("node placed");
        (p.level, p.column)
    }

    #[test]
    fn test_linear_chain() {
        let layout = compute_lineage_layout(&graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]));
        assert_eq!(at(&layout, "A"), (0, 0));
        assert_eq!(at(&layout, "B"), (1, 0));
        assert_eq!(at(&layout, "C"), (2, 0));
    }

    #[test]
    fn test_diamond() {
        let layout = compute_lineage_layout(&graph(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        ));
        assert_eq!(at(&layout, "A"), (0, 0));
        assert_eq!(at(&layout, "B"), (1, 0));
        assert_eq!(at(&layout, "C"), (1, 1));
        assert_eq!(at(&layout, "D"), (2, 0));
    }

    #[test]
    fn test_longest_path_wins_over_direct_edge() {
        // The shortcut edge comes first so D is reached at level 1 before
        // the longer paths push it to level 2.
        let layout = compute_lineage_layout(&graph(
            &["A", "B", "C", "D"],
            &[("A", "D"), ("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        ));
        assert_eq!(at(&layout, "D"), (2, 0));
        assert_eq!(at(&layout, "B"), (1, 0));
        assert_eq!(at(&layout, "C"), (1, 1));
    }

    #[test]
    fn test_relevelled_node_pushes_descendants() {
        // A -> C -> D and A -> B1 -> B2 -> C: C ends at 3, so D must be 4
        let layout = compute_lineage_layout(&graph(
            &["A", "C", "D", "B1", "B2"],
            &[("A", "C"), ("C", "D"), ("A", "B1"), ("B1", "B2"), ("B2", "C")],
        ));
        assert_eq!(at(&layout, "C").0, 3);
        assert_eq!(at(&layout, "D").0, 4);
    }

    #[test]
    fn test_multiple_roots() {
        let layout = compute_lineage_layout(&graph(
            &["R1", "R2", "X", "Y"],
            &[("R1", "X"), ("R2", "Y"), ("Y", "X")],
        ));
        assert_eq!(at(&layout, "R1"), (0, 0));
        assert_eq!(at(&layout, "R2"), (0, 1));
        assert_eq!(at(&layout, "Y"), (1, 0));
        assert_eq!(at(&layout, "X"), (2, 0));
    }

    #[test]
    fn test_disconnected_nodes_share_level_zero() {
        let layout = compute_lineage_layout(&graph(&["A", "B", "C"], &[]));
        assert_eq!(layout.levels(), vec![vec!["A", "B", "C"]]);
    }

    #[test]
    fn test_empty_graph() {
        let layout = compute_lineage_layout(&WorkflowGraph::default());
        assert!(layout.placements.is_empty());
        assert_eq!(layout.depth(), 0);
        assert!(layout.levels().is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        // R -> A -> B -> A, plus an unreachable pure cycle X <-> Y
        let layout = compute_lineage_layout(&graph(
            &["R", "A", "B", "X", "Y"],
            &[("R", "A"), ("A", "B"), ("B", "A"), ("X", "Y"), ("Y", "X")],
        ));
        assert_eq!(at(&layout, "R").0, 0);
        assert_eq!(at(&layout, "A").0, 1);
        assert_eq!(at(&layout, "B").0, 2);
        assert_eq!(at(&layout, "X").0, 0);
        assert_eq!(at(&layout, "Y").0, 0);
    }

    #[test]
    fn test_dangling_edges_ignored() {
        let layout = compute_lineage_layout(&graph(&["A", "B"], &[("ghost", "A"), ("A", "B")]));
        assert_eq!(at(&layout, "A"), (0, 0));
        assert_eq!(at(&layout, "B"), (1, 0));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let g = graph(
            &["A", "B", "C", "D", "E"],
            &[("A", "C"), ("B", "C"), ("C", "D"), ("B", "E")],
        );
        assert_eq!(compute_lineage_layout(&g), compute_lineage_layout(&g));
    }

    #[test]
    fn test_positions_follow_direction() {
        let layout = compute_lineage_layout(&graph(&["A", "B", "C"], &[("A", "B"), ("A", "C")]));

        let ltr = layout.positions(&LayoutOptions::default());
        assert_eq!(ltr[2], ("C".to_string(), (250.0, 120.0)));

        let ttb = LayoutOptions {
            direction: LayoutDirection::TopToBottom,
            origin: (10.0, 10.0),
            ..Default::default()
        };
        assert_eq!(layout.positions(&ttb)[2].1, (130.0, 260.0));
    }

    #[test]
    fn test_lineage_graph_entities() {
        let g = graph(&["A", "B"], &[("A", "B"), ("B", "nowhere")]);
        let lineage = LineageGraph::build(&g, &LayoutOptions::default());

        assert_eq!(lineage.nodes.len(), 2);
        assert_eq!(lineage.nodes[1].level, 1);
        assert_eq!(lineage.nodes[1].category, NodeCategory::Transform);
        assert_eq!(lineage.nodes[1].position, (250.0, 0.0));
        assert_eq!(lineage.edges.len(), 1);
        assert_eq!(lineage.edges[0].target, "B");
    }
}
