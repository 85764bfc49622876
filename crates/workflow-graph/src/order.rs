//! Execution ordering
//!
//! Turns a validated workflow into the order its nodes would run in.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{GraphError, Result};
use crate::graph::GraphIndex;
use crate::lineage::compute_lineage_layout;
use crate::types::{NodeId, WorkflowGraph};

/// Topological order of the graph's nodes (Kahn's algorithm)
///
/// Among nodes that are ready at the same time, the one earlier in the
/// graph runs first. Edges to unknown nodes are ignored. Fails with
/// [`GraphError::CycleDetected`] listing the nodes that could not be ordered.
pub fn execution_order(graph: &WorkflowGraph) -> Result<Vec<NodeId>> {
    let index = GraphIndex::build(graph);
    let mut in_degree: Vec<usize> = (0..index.len())
        .map(|i| index.predecessors(i).len())
        .collect();

    let mut ready: BinaryHeap<Reverse<usize>> = index.roots().map(Reverse).collect();
    let mut order = Vec::with_capacity(index.len());

    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        for &next in index.successors(node) {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() < index.len() {
        let remaining: Vec<NodeId> = (0..index.len())
            .filter(|i| in_degree[*i] > 0)
            .map(|i| index.node(i).id.clone())
            .collect();
        log::warn!(
            "Cannot order workflow '{}': {} node(s) on or behind a cycle",
            graph.id,
            remaining.len()
        );
        return Err(GraphError::CycleDetected { remaining });
    }

    Ok(order.into_iter().map(|i| index.node(i).id.clone()).collect())
}

/// Nodes batched by lineage level
///
/// Every node in a batch depends only on nodes in earlier batches, so a
/// batch may start once all previous batches have finished.
pub fn execution_plan(graph: &WorkflowGraph) -> Result<Vec<Vec<NodeId>>> {
    execution_order(graph)?;
    Ok(compute_lineage_layout(graph).levels())
}
