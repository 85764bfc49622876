//! Adjacency index over a graph snapshot
//!
//! Built once per validation or layout call. Nodes are addressed by their
//! position among the *distinct* ids of the snapshot; edges whose endpoints
//! are not node ids are kept aside as dangling and never enter adjacency.

use std::collections::HashMap;

use crate::types::{GraphEdge, GraphNode, WorkflowGraph};

/// Which end of an edge failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    Source,
    Target,
}

/// An edge endpoint that does not name any node
#[derive(Debug, Clone, Copy)]
pub struct DanglingEndpoint<'a> {
    pub edge: &'a GraphEdge,
    pub end: EdgeEnd,
}

impl DanglingEndpoint<'_> {
    /// The id the edge refers to
    pub fn node_id(&self) -> &str {
        match self.end {
            EdgeEnd::Source => &self.edge.source,
            EdgeEnd::Target => &self.edge.target,
        }
    }
}

/// Borrowed adjacency view of a [`WorkflowGraph`]
pub struct GraphIndex<'a> {
    /// First occurrence of each distinct node id, in graph order
    nodes: Vec<&'a GraphNode>,
    /// node id -> index into `nodes`
    positions: HashMap<&'a str, usize>,
    /// index -> successor indices, in edge order
    successors: Vec<Vec<usize>>,
    /// index -> predecessor indices, in edge order
    predecessors: Vec<Vec<usize>>,
    /// Indices into `graph.nodes` of repeated ids
    duplicates: Vec<usize>,
    /// Edge endpoints that name no node
    dangling: Vec<DanglingEndpoint<'a>>,
}

impl<'a> GraphIndex<'a> {
    pub fn build(graph: &'a WorkflowGraph) -> Self {
        let capacity = graph.nodes.len();
        let mut nodes = Vec::with_capacity(capacity);
        let mut positions: HashMap<&'a str, usize> = HashMap::with_capacity(capacity);
        let mut duplicates = Vec::new();

        for (i, node) in graph.nodes.iter().enumerate() {
            if positions.contains_key(node.id.as_str()) {
                duplicates.push(i);
                continue;
            }
            positions.insert(node.id.as_str(), nodes.len());
            nodes.push(node);
        }

        let mut successors = vec![Vec::new(); nodes.len()];
        let mut predecessors = vec![Vec::new(); nodes.len()];
        let mut dangling = Vec::new();

        for edge in &graph.edges {
            let source = positions.get(edge.source.as_str()).copied();
            let target = positions.get(edge.target.as_str()).copied();

            if source.is_none() {
                dangling.push(DanglingEndpoint { edge, end: EdgeEnd::Source });
            }
            if target.is_none() {
                dangling.push(DanglingEndpoint { edge, end: EdgeEnd::Target });
            }

            if let (Some(s), Some(t)) = (source, target) {
                successors[s].push(t);
                predecessors[t].push(s);
            }
        }

        Self {
            nodes,
            positions,
            successors,
            predecessors,
            duplicates,
            dangling,
        }
    }

    /// Number of distinct nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at an index
    pub fn node(&self, index: usize) -> &'a GraphNode {
        self.nodes[index]
    }

    /// Distinct nodes in graph order
    pub fn nodes(&self) -> &[&'a GraphNode] {
        &self.nodes
    }

    /// Index of a node id
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn successors(&self, index: usize) -> &[usize] {
        &self.successors[index]
    }

    pub fn predecessors(&self, index: usize) -> &[usize] {
        &self.predecessors[index]
    }

    pub fn has_incoming(&self, index: usize) -> bool {
        !self.predecessors[index].is_empty()
    }

    pub fn has_outgoing(&self, index: usize) -> bool {
        !self.successors[index].is_empty()
    }

    /// Nodes with no incoming edge, in graph order
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(move |&i| !self.has_incoming(i))
    }

    /// Positions in `graph.nodes` whose id was already used by an earlier node
    pub fn duplicates(&self) -> &[usize] {
        &self.duplicates
    }

    pub fn dangling(&self) -> &[DanglingEndpoint<'a>] {
        &self.dangling
    }
}
