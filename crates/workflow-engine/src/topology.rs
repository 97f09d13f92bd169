//! Topological ordering of workflow graphs
//!
//! Kahn's algorithm with a deterministic tie-break: zero in-degree nodes
//! are seeded in node-array order, and successors are released in edge
//! order. A graph that cannot be fully ordered contains a cycle, which is
//! reported as a [`CycleError`] instead of silently dropping nodes.

use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use crate::types::{NodeId, WorkflowEdge, WorkflowNode};

/// Nodes that could not be ordered because they sit on or behind a cycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cycle detected in workflow; unordered nodes: {}", .unordered.join(", "))]
pub struct CycleError {
    /// Ids of the nodes left out of the order, in node-array order
    pub unordered: Vec<NodeId>,
}

/// Compute an execution order for the graph
///
/// Edges whose endpoints are unknown are ignored; validation rejects them
/// before a run starts.
pub fn execution_order<'a>(
    nodes: &'a [WorkflowNode],
    edges: &[WorkflowEdge],
) -> Result<Vec<&'a WorkflowNode>, CycleError> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; nodes.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];

    for edge in edges {
        if let (Some(&src), Some(&dst)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) {
            successors[src].push(dst);
            in_degree[dst] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());
    let mut visited = vec![false; nodes.len()];

    while let Some(current) = queue.pop_front() {
        visited[current] = true;
        order.push(&nodes[current]);

        for &next in &successors[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() < nodes.len() {
        let unordered = nodes
            .iter()
            .zip(&visited)
            .filter(|(_, &seen)| !seen)
            .map(|(n, _)| n.id.clone())
            .collect();
        return Err(CycleError { unordered });
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;

    fn ids(order: &[&WorkflowNode]) -> Vec<String> {
        order.iter().map(|n| n.id.clone()).collect()
    }

    fn position(order: &[&WorkflowNode], id: &str) -> usize {
        order.iter().position(|n| n.id == id).unwrap()
    }

    #[test]
    fn test_linear_order() {
        let (nodes, edges) = WorkflowBuilder::new()
            .output("c", "C")
            .processor("b", "B")
            .input("a", "A")
            .connect("a", "b")
            .connect("b", "c")
            .build();

        let order = execution_order(&nodes, &edges).unwrap();
        assert_eq!(ids(&order), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_follow_node_order() {
        let (nodes, edges) = WorkflowBuilder::new()
            .input("x", "X")
            .input("y", "Y")
            .output("z", "Z")
            .connect("y", "z")
            .connect("x", "z")
            .build();

        let order = execution_order(&nodes, &edges).unwrap();
        assert_eq!(ids(&order), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_diamond_respects_every_edge() {
        let (nodes, edges) = WorkflowBuilder::new()
            .input("a", "A")
            .processor("b", "B")
            .llm("c", "C", "prompt")
            .output("d", "D")
            .connect("a", "b")
            .connect("a", "c")
            .connect("b", "d")
            .connect("c", "d")
            .build();

        let order = execution_order(&nodes, &edges).unwrap();
        assert_eq!(order.len(), nodes.len());
        for edge in &edges {
            assert!(position(&order, &edge.source) < position(&order, &edge.target));
        }
    }

    #[test]
    fn test_cycle_is_reported() {
        let (nodes, edges) = WorkflowBuilder::new()
            .input("a", "A")
            .processor("p", "P")
            .processor("q", "Q")
            .output("b", "B")
            .connect("a", "p")
            .connect("p", "q")
            .connect("q", "p")
            .connect("q", "b")
            .build();

        let err = execution_order(&nodes, &edges).unwrap_err();
        assert_eq!(err.unordered, vec!["p", "q", "b"]);
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let (nodes, edges) = WorkflowBuilder::new()
            .input("a", "A")
            .connect("a", "a")
            .build();
        assert!(execution_order(&nodes, &edges).is_err());
    }

    #[test]
    fn test_empty_graph() {
        let order = execution_order(&[], &[]).unwrap();
        assert!(order.is_empty());
    }
}
