//! Core types for workflow graphs
//!
//! These types define the structure of workflow graphs as the editor
//! submits them: nodes with typed configuration, and edges between them.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::Result;
use crate::nodes::NodeConfig;

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Category of a node
///
/// Every [`NodeKind`] belongs to exactly one category. Connectivity rules
/// are expressed per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    /// Data entry points (dataset loaders, manual input, API connectors)
    Source,
    /// Cleaning and reshaping steps
    Transform,
    /// Classification, feature engineering and statistics jobs
    Analysis,
    /// AI model invocations
    Model,
    /// Charts and other visual outputs
    Visualization,
    /// Exports and report outputs
    Export,
}

impl NodeCategory {
    /// All categories, in palette order
    pub const ALL: [NodeCategory; 6] = [
        NodeCategory::Source,
        NodeCategory::Transform,
        NodeCategory::Analysis,
        NodeCategory::Model,
        NodeCategory::Visualization,
        NodeCategory::Export,
    ];

    /// Wire name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Transform => "transform",
            Self::Analysis => "analysis",
            Self::Model => "model",
            Self::Visualization => "visualization",
            Self::Export => "export",
        }
    }
}

impl std::fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete node type as stored in the `type` field of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    DatasetLoader,
    ManualInput,
    ApiConnector,
    TransformNode,
    Analysis,
    AiModel,
    Visualization,
    DataExport,
    Output,
}

impl NodeKind {
    /// All node kinds, in palette order
    pub const ALL: [NodeKind; 9] = [
        NodeKind::DatasetLoader,
        NodeKind::ManualInput,
        NodeKind::ApiConnector,
        NodeKind::TransformNode,
        NodeKind::Analysis,
        NodeKind::AiModel,
        NodeKind::Visualization,
        NodeKind::DataExport,
        NodeKind::Output,
    ];

    /// The category this kind belongs to
    pub fn category(&self) -> NodeCategory {
        match self {
            Self::DatasetLoader | Self::ManualInput | Self::ApiConnector => NodeCategory::Source,
            Self::TransformNode => NodeCategory::Transform,
            Self::Analysis => NodeCategory::Analysis,
            Self::AiModel => NodeCategory::Model,
            Self::Visualization => NodeCategory::Visualization,
            Self::DataExport | Self::Output => NodeCategory::Export,
        }
    }

    /// Wire name of the kind (e.g. `datasetLoader`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DatasetLoader => "datasetLoader",
            Self::ManualInput => "manualInput",
            Self::ApiConnector => "apiConnector",
            Self::TransformNode => "transformNode",
            Self::Analysis => "analysis",
            Self::AiModel => "aiModel",
            Self::Visualization => "visualization",
            Self::DataExport => "dataExport",
            Self::Output => "output",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed data-flow connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Source node ID
    pub source: NodeId,
    /// Target node ID
    pub target: NodeId,
    /// Source handle on the canvas, if the editor uses one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Target handle on the canvas, if the editor uses one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    /// Free-form edge metadata carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl GraphEdge {
    /// Create an edge without handles or metadata
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            metadata: None,
        }
    }
}

/// A node instance in a graph
///
/// On the wire a node is `{ id, type, label, data, position? }`; the
/// `type`/`data` pair is decoded into a typed [`NodeConfig`]. Positions are
/// accepted as `{ "x", "y" }` or `[x, y]` and written as `{ "x", "y" }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawGraphNode")]
pub struct GraphNode {
    /// Unique identifier for this node instance
    pub id: NodeId,
    /// Human-readable label shown on the canvas
    pub label: String,
    /// Kind-specific configuration
    pub config: NodeConfig,
    /// Position in the editor (x, y), if the editor stored one
    pub position: Option<(f64, f64)>,
}

impl GraphNode {
    /// Create a node without a position
    pub fn new(id: impl Into<String>, label: impl Into<String>, config: NodeConfig) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            config,
            position: None,
        }
    }

    /// The node kind, derived from its configuration
    pub fn kind(&self) -> NodeKind {
        self.config.kind()
    }

    /// The node category, derived from its kind
    pub fn category(&self) -> NodeCategory {
        self.kind().category()
    }

    /// Label if set, otherwise the id
    pub fn display_name(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// Canvas position as the editor stores it
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum WirePosition {
    Point { x: f64, y: f64 },
    Pair(f64, f64),
}

impl From<WirePosition> for (f64, f64) {
    fn from(position: WirePosition) -> Self {
        match position {
            WirePosition::Point { x, y } | WirePosition::Pair(x, y) => (x, y),
        }
    }
}

/// Wire shape of a node, as decoded
#[derive(Debug, Deserialize)]
struct RawGraphNode {
    id: NodeId,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default)]
    label: String,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    position: Option<WirePosition>,
}

impl TryFrom<RawGraphNode> for GraphNode {
    type Error = serde_json::Error;

    fn try_from(raw: RawGraphNode) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            config: NodeConfig::from_data(raw.kind, raw.data)?,
            id: raw.id,
            label: raw.label,
            position: raw.position.map(Into::into),
        })
    }
}

/// Wire shape of a node, as encoded
#[derive(Serialize)]
struct WireNodeRef<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: NodeKind,
    label: &'a str,
    data: &'a NodeConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<WirePosition>,
}

impl Serialize for GraphNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        WireNodeRef {
            id: &self.id,
            kind: self.kind(),
            label: &self.label,
            data: &self.config,
            position: self.position.map(|(x, y)| WirePosition::Point { x, y }),
        }
        .serialize(serializer)
    }
}

/// A complete workflow graph snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGraph {
    /// Identifier of the workflow (may be empty for ad-hoc snapshots)
    #[serde(default)]
    pub id: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Nodes in the graph, in editor order
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    /// Edges connecting nodes
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl WorkflowGraph {
    /// Create a new empty graph
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Build an anonymous snapshot from the editor's node and edge collections
    pub fn from_parts(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            nodes,
            edges,
        }
    }

    /// Decode a graph from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the graph as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Get edges coming into a node
    pub fn incoming_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Get edges going out of a node
    pub fn outgoing_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    /// Get the IDs of nodes that this node depends on (upstream nodes)
    pub fn get_dependencies(&self, node_id: &str) -> Vec<NodeId> {
        self.incoming_edges(node_id)
            .map(|e| e.source.clone())
            .collect()
    }

    /// Get the IDs of nodes that depend on this node (downstream nodes)
    pub fn get_dependents(&self, node_id: &str) -> Vec<NodeId> {
        self.outgoing_edges(node_id)
            .map(|e| e.target.clone())
            .collect()
    }
}
