//! Node catalog
//!
//! Static metadata for every node kind: what the palette shows and which
//! configuration fields a node needs before the workflow may run. This is
//! the single source of truth for required fields; the validator and
//! [`ConfigStatus`](crate::nodes::ConfigStatus) both read from it.

use serde::Serialize;

use crate::types::{NodeCategory, NodeKind};

/// Complete metadata for a node kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    /// Wire type identifier (e.g. "datasetLoader")
    pub kind: NodeKind,
    /// Category for UI grouping and connectivity rules
    pub category: NodeCategory,
    /// Human-readable label
    pub label: &'static str,
    /// Description of what the node does
    pub description: &'static str,
    /// Data fields that must be present and non-empty
    pub required_fields: &'static [&'static str],
}

impl NodeKind {
    /// Get the static metadata for this node kind
    pub fn descriptor(&self) -> NodeDescriptor {
        let (label, description) = match self {
            Self::DatasetLoader => (
                "Dataset Loader",
                "Load a dataset from a file, S3, MongoDB, SQL, Kafka or Kaggle",
            ),
            Self::ManualInput => ("Manual Input", "Type a small table by hand"),
            Self::ApiConnector => ("API Connector", "Fetch records from an HTTP endpoint"),
            Self::TransformNode => (
                "Transform",
                "Clean, filter, join or reshape the incoming dataset",
            ),
            Self::Analysis => (
                "Analysis",
                "Run classification, regression, clustering or feature engineering",
            ),
            Self::AiModel => (
                "AI Model",
                "Send rows through a language or prediction model",
            ),
            Self::Visualization => ("Visualization", "Render the dataset as a chart or table"),
            Self::DataExport => (
                "Data Export",
                "Write the dataset out as CSV, JSON, Parquet, Excel or PDF",
            ),
            Self::Output => ("Output", "Collect results into the report"),
        };

        NodeDescriptor {
            kind: *self,
            category: self.category(),
            label,
            description,
            required_fields: self.required_fields(),
        }
    }

    /// Fields an empty node of this kind is missing
    ///
    /// Supervised analysis methods additionally need `targetColumn`; that
    /// condition lives in [`NodeConfig::missing_fields`](crate::nodes::NodeConfig::missing_fields).
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::DatasetLoader => &["dataSource"],
            Self::ManualInput => &["columns"],
            Self::ApiConnector => &["url"],
            Self::TransformNode => &["operation"],
            Self::Analysis => &["method"],
            Self::AiModel => &["model"],
            Self::Visualization => &["chartType", "xAxis"],
            Self::DataExport => &["format"],
            Self::Output => &[],
        }
    }
}

/// Descriptors for every node kind, in palette order
pub fn catalog() -> Vec<NodeDescriptor> {
    NodeKind::ALL.iter().map(NodeKind::descriptor).collect()
}

/// Descriptors for the kinds in one category
pub fn catalog_for(category: NodeCategory) -> Vec<NodeDescriptor> {
    catalog()
        .into_iter()
        .filter(|d| d.category == category)
        .collect()
}
