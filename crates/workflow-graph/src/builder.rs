//! Fluent builder for workflow graphs
//!
//! Provides a fluent API for constructing graphs programmatically.

use crate::nodes::NodeConfig;
use crate::types::{GraphEdge, GraphNode, WorkflowGraph};

/// Fluent builder for constructing workflow graphs
///
/// # Example
///
/// ```
/// use workflow_graph::{NodeConfig, NodeKind, WorkflowBuilder};
///
/// let graph = WorkflowBuilder::new("wf-1", "Sales report")
///     .add_node("load", "Load sales", NodeConfig::empty(NodeKind::DatasetLoader))
///     .with_position(0.0, 0.0)
///     .add_node("report", "Report", NodeConfig::empty(NodeKind::Output))
///     .add_edge("load", "report")
///     .build();
///
/// assert_eq!(graph.edges[0].id, "edge-1");
/// ```
pub struct WorkflowBuilder {
    id: String,
    name: String,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    edge_counter: usize,
}

impl WorkflowBuilder {
    /// Create a new workflow builder
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            edge_counter: 0,
        }
    }

    /// Add a node to the graph
    pub fn add_node(
        mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        config: NodeConfig,
    ) -> Self {
        self.nodes.push(GraphNode::new(id, label, config));
        self
    }

    /// Set the canvas position of the most recently added node
    ///
    /// Must be called immediately after `add_node`.
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.position = Some((x, y));
        }
        self
    }

    /// Add an edge between two nodes (auto-generates edge ID)
    pub fn add_edge(self, source: impl Into<String>, target: impl Into<String>) -> Self {
        let id = format!("edge-{}", self.edge_counter + 1);
        let mut builder = self.add_edge_with_id(id, source, target);
        builder.edge_counter += 1;
        builder
    }

    /// Add an edge with an explicit ID
    pub fn add_edge_with_id(
        mut self,
        edge_id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.edges.push(GraphEdge::new(edge_id, source, target));
        self
    }

    /// Attach metadata to the most recently added edge
    ///
    /// Non-object values are ignored.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        if let (Some(edge), serde_json::Value::Object(map)) = (self.edges.last_mut(), metadata) {
            edge.metadata = Some(map);
        }
        self
    }

    /// Build the graph without validation
    pub fn build(self) -> WorkflowGraph {
        let mut graph = WorkflowGraph::new(self.id, self.name);
        graph.nodes = self.nodes;
        graph.edges = self.edges;
        graph
    }
}
