//! Structural validation for workflow graphs
//!
//! Rules are checked in a fixed order and the first failure wins:
//!
//! 1. the graph has at least one node
//! 2. at least one `input` node exists
//! 3. at least one `output` node exists
//! 4. every edge references existing nodes
//! 5. every node other than input/output has at least one connection
//! 6. node ids are unique
//! 7. edge ids are unique
//!
//! Cycles are not checked here; they surface when the graph is ordered
//! (see [`crate::topology`]).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{NodeType, WorkflowEdge, WorkflowNode};

/// Validation error, one variant per rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The graph has no nodes
    EmptyWorkflow,
    /// No node of type `input`
    MissingInputNode,
    /// No node of type `output`
    MissingOutputNode,
    /// An edge references a node that does not exist
    InvalidConnection { edge_id: String },
    /// Non input/output nodes without any connection, by label
    OrphanedNodes { labels: Vec<String> },
    /// Two nodes share an id
    DuplicateNodeId { node_id: String },
    /// Two edges share an id
    DuplicateEdgeId { edge_id: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWorkflow => write!(f, "workflow requires at least one node"),
            Self::MissingInputNode => write!(f, "workflow requires at least one input node"),
            Self::MissingOutputNode => write!(f, "workflow requires at least one output node"),
            Self::InvalidConnection { .. } => write!(f, "invalid connection exists"),
            Self::OrphanedNodes { labels } => {
                write!(f, "orphaned nodes found: {}", labels.join(", "))
            }
            Self::DuplicateNodeId { node_id } => write!(f, "duplicate node id '{}'", node_id),
            Self::DuplicateEdgeId { edge_id } => write!(f, "duplicate edge id '{}'", edge_id),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Serializable `{valid, error}` view of a validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Result<(), ValidationError>> for ValidationOutcome {
    fn from(result: &Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                error: None,
            },
            Err(e) => Self {
                valid: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Validate a workflow graph
///
/// Pure function of its inputs. Returns the first rule that fails.
pub fn validate_workflow(
    nodes: &[WorkflowNode],
    edges: &[WorkflowEdge],
) -> Result<(), ValidationError> {
    if nodes.is_empty() {
        return Err(ValidationError::EmptyWorkflow);
    }

    if !nodes.iter().any(|n| n.node_type() == NodeType::Input) {
        return Err(ValidationError::MissingInputNode);
    }

    if !nodes.iter().any(|n| n.node_type() == NodeType::Output) {
        return Err(ValidationError::MissingOutputNode);
    }

    validate_edge_references(nodes, edges)?;
    validate_connectivity(nodes, edges)?;
    validate_unique_ids(nodes, edges)?;

    Ok(())
}

/// Validate and return the serializable outcome
pub fn check_workflow(nodes: &[WorkflowNode], edges: &[WorkflowEdge]) -> ValidationOutcome {
    ValidationOutcome::from(&validate_workflow(nodes, edges))
}

/// Check that all edge source/target nodes exist
fn validate_edge_references(
    nodes: &[WorkflowNode],
    edges: &[WorkflowEdge],
) -> Result<(), ValidationError> {
    let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    match edges
        .iter()
        .find(|e| !node_ids.contains(e.source.as_str()) || !node_ids.contains(e.target.as_str()))
    {
        Some(edge) => Err(ValidationError::InvalidConnection {
            edge_id: edge.id.clone(),
        }),
        None => Ok(()),
    }
}

/// Check that every non input/output node is connected
fn validate_connectivity(
    nodes: &[WorkflowNode],
    edges: &[WorkflowEdge],
) -> Result<(), ValidationError> {
    let mut connected: HashSet<&str> = HashSet::new();
    for edge in edges {
        connected.insert(&edge.source);
        connected.insert(&edge.target);
    }

    let labels: Vec<String> = nodes
        .iter()
        .filter(|n| !n.is_critical() && !connected.contains(n.id.as_str()))
        .map(|n| n.label().to_string())
        .collect();

    if labels.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::OrphanedNodes { labels })
    }
}

fn validate_unique_ids(
    nodes: &[WorkflowNode],
    edges: &[WorkflowEdge],
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateNodeId {
                node_id: node.id.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for edge in edges {
        if !seen.insert(edge.id.as_str()) {
            return Err(ValidationError::DuplicateEdgeId {
                edge_id: edge.id.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;

    #[test]
    fn test_valid_graph() {
        let (nodes, edges) = WorkflowBuilder::new()
            .input("a", "A")
            .processor("p", "Process")
            .output("b", "B")
            .connect("a", "p")
            .connect("p", "b")
            .build();

        assert_eq!(validate_workflow(&nodes, &edges), Ok(()));
        assert_eq!(
            check_workflow(&nodes, &edges),
            ValidationOutcome {
                valid: true,
                error: None
            }
        );
    }

    #[test]
    fn test_empty_workflow() {
        let err = validate_workflow(&[], &[]).unwrap_err();
        assert_eq!(err, ValidationError::EmptyWorkflow);
        assert_eq!(err.to_string(), "workflow requires at least one node");
    }

    #[test]
    fn test_missing_input() {
        let (nodes, edges) = WorkflowBuilder::new().output("b", "B").build();
        assert_eq!(
            validate_workflow(&nodes, &edges),
            Err(ValidationError::MissingInputNode)
        );
    }

    #[test]
    fn test_missing_output() {
        let (nodes, edges) = WorkflowBuilder::new().input("a", "A").build();
        assert_eq!(
            validate_workflow(&nodes, &edges),
            Err(ValidationError::MissingOutputNode)
        );
    }

    #[test]
    fn test_edge_references_missing_node() {
        let (nodes, edges) = WorkflowBuilder::new()
            .input("a", "A")
            .output("b", "B")
            .connect("a", "missing")
            .build();

        let err = validate_workflow(&nodes, &edges).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidConnection { .. }));
        assert_eq!(err.to_string(), "invalid connection exists");
    }

    #[test]
    fn test_orphaned_nodes_named_by_label() {
        let (nodes, edges) = WorkflowBuilder::new()
            .input("a", "A")
            .processor("p1", "Cleaner")
            .processor("p2", "Ranker")
            .output("b", "B")
            .build();

        let err = validate_workflow(&nodes, &edges).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OrphanedNodes {
                labels: vec!["Cleaner".to_string(), "Ranker".to_string()]
            }
        );
        assert!(err.to_string().ends_with("Cleaner, Ranker"));
    }

    #[test]
    fn test_unconnected_input_and_output_are_allowed() {
        let (nodes, edges) = WorkflowBuilder::new()
            .input("a", "A")
            .output("b", "B")
            .build();
        assert_eq!(validate_workflow(&nodes, &edges), Ok(()));
    }

    #[test]
    fn test_first_failure_wins() {
        // Missing output is reported before the dangling edge
        let (nodes, edges) = WorkflowBuilder::new()
            .input("a", "A")
            .connect("a", "missing")
            .build();
        assert_eq!(
            validate_workflow(&nodes, &edges),
            Err(ValidationError::MissingOutputNode)
        );
    }

    #[test]
    fn test_duplicate_ids() {
        let (nodes, edges) = WorkflowBuilder::new()
            .input("a", "A")
            .output("a", "B")
            .build();
        assert_eq!(
            validate_workflow(&nodes, &edges),
            Err(ValidationError::DuplicateNodeId {
                node_id: "a".to_string()
            })
        );

        let (nodes, edges) = WorkflowBuilder::new()
            .input("a", "A")
            .output("b", "B")
            .connect_with_id("e", "a", "b")
            .connect_with_id("e", "a", "b")
            .build();
        assert_eq!(
            validate_workflow(&nodes, &edges),
            Err(ValidationError::DuplicateEdgeId {
                edge_id: "e".to_string()
            })
        );
    }

    #[test]
    fn test_cycle_is_not_a_validation_error() {
        let (nodes, edges) = WorkflowBuilder::new()
            .input("a", "A")
            .processor("p", "P")
            .processor("q", "Q")
            .output("b", "B")
            .connect("p", "q")
            .connect("q", "p")
            .build();
        assert_eq!(validate_workflow(&nodes, &edges), Ok(()));
    }
}
