//! Graph validation for workflow graphs
//!
//! Checks that a workflow may be executed: it is non-empty, every node is
//! connected the way its category requires, required configuration is
//! filled in, every edge points at real nodes, and there are no cycles.
//!
//! Problems are reported as data. Validation never fails and never mutates
//! the graph; calling it twice on the same snapshot gives the same result.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::graph::{EdgeEnd, GraphIndex};
use crate::nodes::ConfigStatus;
use crate::policy::ValidationPolicy;
use crate::types::{EdgeId, GraphNode, NodeId, WorkflowGraph};

/// How serious an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks execution
    Error,
    /// Shown to the user, does not block execution
    Warning,
}

/// Machine-readable issue code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    EmptyWorkflow,
    DuplicateNodeId,
    NoOutputConnections,
    NoInputConnections,
    MissingConfiguration,
    UnknownNode,
    CycleDetected,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_id: Option<EdgeId>,
}

impl ValidationIssue {
    fn graph(severity: Severity, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            node_id: None,
            edge_id: None,
        }
    }

    fn node(severity: Severity, kind: IssueKind, node: &GraphNode, message: impl Into<String>) -> Self {
        Self {
            node_id: Some(node.id.clone()),
            ..Self::graph(severity, kind, message)
        }
    }

    fn edge(severity: Severity, kind: IssueKind, edge_id: &str, message: impl Into<String>) -> Self {
        Self {
            edge_id: Some(edge_id.to_string()),
            ..Self::graph(severity, kind, message)
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

/// Outcome of validating a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff no issue has severity `Error`
    pub valid: bool,
    /// Every issue found, errors and warnings together
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self {
            valid: !issues.iter().any(ValidationIssue::is_error),
            issues,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Issues attached to one node
    pub fn for_node<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a ValidationIssue> + 'a {
        self.issues
            .iter()
            .filter(move |i| i.node_id.as_deref() == Some(node_id))
    }

    pub fn has(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

/// Validate a workflow graph with the default connectivity policy
pub fn validate_workflow(graph: &WorkflowGraph) -> ValidationResult {
    validate_workflow_with(graph, &ValidationPolicy::default())
}

/// Validate a workflow graph
///
/// Returns all issues found (not just the first), ordered: empty graph,
/// duplicate ids, per-node issues in node order, dangling edges, cycle.
pub fn validate_workflow_with(graph: &WorkflowGraph, policy: &ValidationPolicy) -> ValidationResult {
    let mut issues = Vec::new();
    let index = GraphIndex::build(graph);

    validate_not_empty(graph, &mut issues);
    validate_unique_ids(graph, &index, &mut issues);
    for (i, node) in index.nodes().iter().enumerate() {
        validate_connectivity(node, i, &index, policy, &mut issues);
        validate_configuration(node, &mut issues);
    }
    validate_edge_references(&index, &mut issues);
    if has_cycle(&index) {
        issues.push(ValidationIssue::graph(
            Severity::Error,
            IssueKind::CycleDetected,
            "Workflow contains a cycle. Remove the circular connection before running.",
        ));
    }

    let result = ValidationResult::from_issues(issues);
    log::debug!(
        "Validated workflow '{}' ({} nodes, {} edges): {} error(s), {} warning(s)",
        graph.id,
        graph.nodes.len(),
        graph.edges.len(),
        result.error_count(),
        result.warning_count()
    );
    result
}

fn validate_not_empty(graph: &WorkflowGraph, issues: &mut Vec<ValidationIssue>) {
    if graph.nodes.is_empty() {
        issues.push(ValidationIssue::graph(
            Severity::Error,
            IssueKind::EmptyWorkflow,
            "Workflow is empty. Add at least one node before running it.",
        ));
    }
}

fn validate_unique_ids(graph: &WorkflowGraph, index: &GraphIndex<'_>, issues: &mut Vec<ValidationIssue>) {
    for &position in index.duplicates() {
        let node = &graph.nodes[position];
        issues.push(ValidationIssue::node(
            Severity::Error,
            IssueKind::DuplicateNodeId,
            node,
            format!("Node id '{}' is used by more than one node", node.id),
        ));
    }
}

/// Check the node's input and output sides against its category rule
fn validate_connectivity(
    node: &GraphNode,
    index_pos: usize,
    index: &GraphIndex<'_>,
    policy: &ValidationPolicy,
    issues: &mut Vec<ValidationIssue>,
) {
    let rule = policy.rule(node.category());

    if !index.has_outgoing(index_pos) {
        if let Some(severity) = rule.output.severity() {
            issues.push(ValidationIssue::node(
                severity,
                IssueKind::NoOutputConnections,
                node,
                format!("Node '{}' has no output connections", node.display_name()),
            ));
        }
    }

    if !index.has_incoming(index_pos) {
        if let Some(severity) = rule.input.severity() {
            issues.push(ValidationIssue::node(
                severity,
                IssueKind::NoInputConnections,
                node,
                format!("Node '{}' has no input connections", node.display_name()),
            ));
        }
    }
}

fn validate_configuration(node: &GraphNode, issues: &mut Vec<ValidationIssue>) {
    let missing = match node.config.status() {
        ConfigStatus::Ready => return,
        ConfigStatus::Unconfigured => node.config.missing_fields(),
        ConfigStatus::Incomplete { missing } => missing,
    };

    issues.push(ValidationIssue::node(
        Severity::Error,
        IssueKind::MissingConfiguration,
        node,
        format!(
            "Node '{}' is missing required configuration: {}",
            node.display_name(),
            missing.join(", ")
        ),
    ));
}

/// Flag every edge endpoint that does not name a node
fn validate_edge_references(index: &GraphIndex<'_>, issues: &mut Vec<ValidationIssue>) {
    for dangling in index.dangling() {
        let end = match dangling.end {
            EdgeEnd::Source => "source",
            EdgeEnd::Target => "target",
        };
        issues.push(ValidationIssue::edge(
            Severity::Error,
            IssueKind::UnknownNode,
            &dangling.edge.id,
            format!(
                "Edge '{}' {} references unknown node '{}'",
                dangling.edge.id,
                end,
                dangling.node_id()
            ),
        ));
    }
}

enum Visit {
    Enter(usize),
    Exit(usize),
}

/// Depth-first cycle search
///
/// `on_path` holds the nodes of the current traversal path; reaching one of
/// them again is a back edge. Reaching a finished node is a cross edge and
/// is safe. Each node is expanded once, so this is O(V + E).
pub(crate) fn has_cycle(index: &GraphIndex<'_>) -> bool {
    let mut finished: HashSet<usize> = HashSet::with_capacity(index.len());
    let mut on_path: HashSet<usize> = HashSet::new();

    for start in 0..index.len() {
        if finished.contains(&start) {
            continue;
        }

        let mut stack = vec![Visit::Enter(start)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Exit(node) => {
                    on_path.remove(&node);
                    finished.insert(node);
                }
                Visit::Enter(node) => {
                    if finished.contains(&node) || on_path.contains(&node) {
                        continue;
                    }
                    on_path.insert(node);
                    stack.push(Visit::Exit(node));

                    for &next in index.successors(node).iter().rev() {
                        if on_path.contains(&next) {
                            return true;
                        }
                        if !finished.contains(&next) {
                            stack.push(Visit::Enter(next));
                        }
                    }
                }
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;
    use crate::nodes::{
        DatasetLoaderConfig, DataExportConfig, ExportFormat, NodeConfig, TransformConfig,
        TransformOperation,
    };
    use crate::policy::{CategoryRule, Requirement};
    use crate::types::{NodeCategory, NodeKind};

    fn loader(source: &str) -> NodeConfig {
        NodeConfig::DatasetLoader(DatasetLoaderConfig {
            data_source: Some(source.to_string()),
            ..Default::default()
        })
    }

    fn transform() -> NodeConfig {
        NodeConfig::Transform(TransformConfig {
            operation: Some(TransformOperation::Clean),
            ..Default::default()
        })
    }

    fn export() -> NodeConfig {
        NodeConfig::DataExport(DataExportConfig {
            format: Some(ExportFormat::Csv),
            ..Default::default()
        })
    }

    fn pipeline() -> WorkflowGraph {
        WorkflowBuilder::new("wf", "Pipeline")
            .add_node("load", "Load", loader("sales.csv"))
            .add_node("clean", "Clean", transform())
            .add_node("export", "Export", export())
            .add_edge("load", "clean")
            .add_edge("clean", "export")
            .build()
    }

    #[test]
    fn test_valid_pipeline() {
        let result = validate_workflow(&pipeline());
        assert!(result.valid, "Expected no errors, got: {:?}", result.issues);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let graph = WorkflowBuilder::new("wf", "Messy")
            .add_node("t", "Lonely", NodeConfig::empty(NodeKind::TransformNode))
            .add_node("a", "A", transform())
            .add_edge("a", "ghost")
            .build();

        assert_eq!(validate_workflow(&graph), validate_workflow(&graph));
    }

    #[test]
    fn test_empty_workflow() {
        let result = validate_workflow(&WorkflowGraph::default());
        assert!(!result.valid);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].kind, IssueKind::EmptyWorkflow);
        assert!(result.issues[0].message.contains("empty"));
        assert!(result.issues[0].node_id.is_none());
    }

    #[test]
    fn test_detect_cycle() {
        let graph = WorkflowBuilder::new("wf", "Cyclic")
            .add_node("a", "A", transform())
            .add_node("b", "B", transform())
            .add_node("c", "C", transform())
            .add_edge("a", "b")
            .add_edge("b", "c")
            .add_edge("c", "a")
            .build();

        let result = validate_workflow(&graph);
        assert!(!result.valid);
        assert!(result.has(IssueKind::CycleDetected));
        assert_eq!(result.issues.last().map(|i| i.kind), Some(IssueKind::CycleDetected));
    }

    #[test]
    fn test_no_cycle_linear() {
        let graph = WorkflowBuilder::new("wf", "Linear")
            .add_node("a", "A", transform())
            .add_node("b", "B", transform())
            .add_node("c", "C", transform())
            .add_edge("a", "b")
            .add_edge("b", "c")
            .build();

        let result = validate_workflow(&graph);
        assert!(!result.has(IssueKind::CycleDetected));
    }

    #[test]
    fn test_cross_edge_is_not_a_cycle() {
        // a -> b -> d, a -> c -> d, c -> b: b is finished before c reaches it
        let graph = WorkflowBuilder::new("wf", "Cross")
            .add_node("a", "A", loader("x.csv"))
            .add_node("b", "B", transform())
            .add_node("c", "C", transform())
            .add_node("d", "D", export())
            .add_edge("a", "b")
            .add_edge("b", "d")
            .add_edge("a", "c")
            .add_edge("c", "d")
            .add_edge("c", "b")
            .build();

        let result = validate_workflow(&graph);
        assert!(result.valid, "{:?}", result.issues);
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let graph = WorkflowBuilder::new("wf", "Loop")
            .add_node("a", "A", transform())
            .add_edge("a", "a")
            .build();

        assert!(validate_workflow(&graph).has(IssueKind::CycleDetected));
    }

    #[test]
    fn test_lonely_transform_reports_both_sides() {
        let graph = WorkflowBuilder::new("wf", "Lonely")
            .add_node("t", "Clean", transform())
            .build();

        let result = validate_workflow(&graph);
        assert!(!result.valid);
        let input = result
            .errors()
            .find(|i| i.kind == IssueKind::NoInputConnections)
            .expect("input error");
        assert!(input.message.contains("no input connections"));
        assert_eq!(input.node_id.as_deref(), Some("t"));

        let output = result
            .warnings()
            .find(|i| i.kind == IssueKind::NoOutputConnections)
            .expect("output warning");
        assert!(output.message.contains("no output connections"));
    }

    #[test]
    fn test_per_node_issue_order() {
        let graph = WorkflowBuilder::new("wf", "Order")
            .add_node("t", "Clean", NodeConfig::empty(NodeKind::TransformNode))
            .build();

        let kinds: Vec<IssueKind> = validate_workflow(&graph).issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::NoOutputConnections,
                IssueKind::NoInputConnections,
                IssueKind::MissingConfiguration,
            ]
        );
    }

    #[test]
    fn test_unconnected_loader_is_warning_only() {
        let graph = WorkflowBuilder::new("wf", "Loader")
            .add_node("load", "Load", loader("sales.csv"))
            .build();

        let result = validate_workflow(&graph);
        assert!(result.valid);
        assert_eq!(result.warning_count(), 1);
        assert!(!result.has(IssueKind::NoInputConnections));
    }

    #[test]
    fn test_terminal_export_needs_no_output() {
        let graph = WorkflowBuilder::new("wf", "Export")
            .add_node("load", "Load", loader("sales.csv"))
            .add_node("out", "Report", NodeConfig::empty(NodeKind::Output))
            .add_edge("load", "out")
            .build();

        let result = validate_workflow(&graph);
        assert!(result.valid);
        assert!(result.issues.is_empty(), "{:?}", result.issues);
    }

    #[test]
    fn test_missing_data_source() {
        let empty = WorkflowBuilder::new("wf", "Source")
            .add_node("load", "Load sales", loader(""))
            .add_node("out", "Report", NodeConfig::empty(NodeKind::Output))
            .add_edge("load", "out")
            .build();

        let result = validate_workflow(&empty);
        assert!(!result.valid);
        let issue = result
            .for_node("load")
            .find(|i| i.kind == IssueKind::MissingConfiguration)
            .expect("missing config error");
        assert!(issue.is_error());
        assert!(issue.message.contains("Load sales"));
        assert!(issue.message.contains("dataSource"));

        let filled = WorkflowBuilder::new("wf", "Source")
            .add_node("load", "Load sales", loader("sales.csv"))
            .add_node("out", "Report", NodeConfig::empty(NodeKind::Output))
            .add_edge("load", "out")
            .build();
        assert!(!validate_workflow(&filled).has(IssueKind::MissingConfiguration));
    }

    #[test]
    fn test_edge_references_missing_node() {
        let graph = WorkflowBuilder::new("wf", "Dangling")
            .add_node("load", "Load", loader("sales.csv"))
            .add_edge_with_id("e-ghost", "load", "missing")
            .build();

        let result = validate_workflow(&graph);
        let issue = result
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::UnknownNode)
            .expect("unknown node error");
        assert_eq!(issue.edge_id.as_deref(), Some("e-ghost"));
        assert!(issue.message.contains("missing"));
        // the dangling edge does not count as an output connection
        assert!(result.has(IssueKind::NoOutputConnections));
    }

    #[test]
    fn test_half_filled_editor_nodes_are_reported() {
        let graph = WorkflowGraph::from_json(
            r#"{
                "nodes": [
                    { "id": "load", "type": "manualInput", "data": { "columns": null },
                      "position": { "x": 0, "y": 0 } },
                    { "id": "clean", "type": "transformNode", "data": { "operation": "" } },
                    { "id": "fit", "type": "analysis", "data": { "method": "" } },
                    { "id": "chart", "type": "visualization", "data": { "chartType": "", "xAxis": "" } },
                    { "id": "save", "type": "dataExport", "data": { "format": "" } }
                ],
                "edges": [
                    { "id": "e1", "source": "load", "target": "clean" },
                    { "id": "e2", "source": "clean", "target": "fit" },
                    { "id": "e3", "source": "fit", "target": "chart" },
                    { "id": "e4", "source": "fit", "target": "save" }
                ]
            }"#,
        )
        .unwrap();

        let result = validate_workflow(&graph);
        assert!(!result.valid);

        let flagged: Vec<(&str, &str)> = result
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::MissingConfiguration)
            .map(|i| (i.node_id.as_deref().unwrap_or(""), i.message.as_str()))
            .collect();
        assert_eq!(flagged.len(), 5, "{:?}", result.issues);
        for ((node, message), field) in flagged
            .iter()
            .zip(["columns", "operation", "method", "chartType, xAxis", "format"])
        {
            assert!(message.contains(field), "{}: {}", node, message);
        }
    }

    #[test]
    fn test_duplicate_node_ids() {
        let graph = WorkflowBuilder::new("wf", "Dupes")
            .add_node("load", "Load", loader("a.csv"))
            .add_node("load", "Load again", loader("b.csv"))
            .build();

        let result = validate_workflow(&graph);
        assert!(!result.valid);
        assert_eq!(
            result.issues.iter().filter(|i| i.kind == IssueKind::DuplicateNodeId).count(),
            1
        );
    }

    #[test]
    fn test_policy_can_relax_required_input() {
        let graph = WorkflowBuilder::new("wf", "Relaxed")
            .add_node("t", "Clean", transform())
            .build();

        let policy = ValidationPolicy::default().with_rule(
            NodeCategory::Transform,
            CategoryRule::new(Requirement::Recommended, Requirement::Exempt),
        );
        let result = validate_workflow_with(&graph, &policy);
        assert!(result.valid);
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.issues[0].kind, IssueKind::NoInputConnections);
    }

    #[test]
    fn test_collects_multiple_errors() {
        let graph = WorkflowBuilder::new("wf", "Broken")
            .add_node("a", "A", NodeConfig::empty(NodeKind::AiModel))
            .add_node("b", "B", transform())
            .add_edge("a", "b")
            .add_edge("b", "a")
            .add_edge("b", "nowhere")
            .build();

        let result = validate_workflow(&graph);
        assert!(result.has(IssueKind::MissingConfiguration));
        assert!(result.has(IssueKind::UnknownNode));
        assert!(result.has(IssueKind::CycleDetected));
        assert!(result.error_count() >= 3);
    }

    #[test]
    fn test_result_serialization() {
        let result = validate_workflow(&WorkflowGraph::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["valid"], serde_json::json!(false));
        assert_eq!(json["issues"][0]["severity"], serde_json::json!("error"));
        assert_eq!(json["issues"][0]["kind"], serde_json::json!("emptyWorkflow"));
        assert!(json["issues"][0].get("nodeId").is_none());
    }
}
