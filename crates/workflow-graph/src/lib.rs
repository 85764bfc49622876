//! Workflow Graph - graph engine behind the dataset workflow builder
//!
//! The editor keeps the canonical node and edge collections; this crate
//! works on snapshots of them. It provides:
//!
//! - A typed graph model: nodes carry kind-specific configuration
//! - Validation: connectivity per category, required configuration,
//!   dangling edges, duplicate ids and cycle detection
//! - Lineage layout: longest-path levels and columns for drawing the DAG
//! - Execution ordering for graphs that passed validation
//!
//! Everything is synchronous and pure; no call mutates its input.
//!
//! # Example
//!
//! ```
//! use workflow_graph::{
//!     compute_lineage_layout, validate_workflow, DatasetLoaderConfig, NodeConfig, NodeKind,
//!     WorkflowBuilder,
//! };
//!
//! let graph = WorkflowBuilder::new("wf", "Sales")
//!     .add_node(
//!         "load",
//!         "Load sales",
//!         NodeConfig::DatasetLoader(DatasetLoaderConfig {
//!             data_source: Some("sales.csv".into()),
//!             ..Default::default()
//!         }),
//!     )
//!     .add_node("report", "Report", NodeConfig::empty(NodeKind::Output))
//!     .add_edge("load", "report")
//!     .build();
//!
//! assert!(validate_workflow(&graph).valid);
//! assert_eq!(compute_lineage_layout(&graph).get("report").unwrap().level, 1);
//! ```

pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod lineage;
pub mod nodes;
pub mod order;
pub mod policy;
pub mod types;
pub mod validation;

// Re-export key types
pub use builder::WorkflowBuilder;
pub use catalog::{catalog, catalog_for, NodeDescriptor};
pub use config::EngineConfig;
pub use error::{GraphError, Result};
pub use graph::GraphIndex;
pub use lineage::{
    compute_lineage_layout, LayoutDirection, LayoutOptions, LineageEdge, LineageGraph,
    LineageLayout, LineageNode, NodePlacement, Placement,
};
pub use nodes::{
    AiModelConfig, AnalysisConfig, AnalysisMethod, ApiConnectorConfig, ChartType, ConfigStatus,
    DataExportConfig, DatasetLoaderConfig, ExportFormat, ManualInputConfig, NodeConfig,
    OutputConfig, SourceKind, SourceLocation, TransformConfig, TransformOperation,
    VisualizationConfig,
};
pub use order::{execution_order, execution_plan};
pub use policy::{CategoryRule, Requirement, ValidationPolicy};
pub use types::{EdgeId, GraphEdge, GraphNode, NodeCategory, NodeId, NodeKind, WorkflowGraph};
pub use validation::{
    validate_workflow, validate_workflow_with, IssueKind, Severity, ValidationIssue,
    ValidationResult,
};
