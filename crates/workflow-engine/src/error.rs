//! Error types for the workflow engine

use thiserror::Error;

use crate::engine::ExecutionStatus;
use crate::topology::CycleError;
use crate::types::NodeId;
use crate::validation::ValidationError;

/// Result type alias using WorkflowEngineError
pub type Result<T> = std::result::Result<T, WorkflowEngineError>;

/// Errors that can occur in the workflow engine
#[derive(Debug, Error)]
pub enum WorkflowEngineError {
    /// The graph failed structural validation
    #[error("Workflow validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The graph contains a cycle and cannot be ordered
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// A node executor failed
    #[error("Node execution failed: {0}")]
    ExecutionFailed(String),

    /// A critical (input/output) node failed and aborted the run
    #[error("Node '{node_id}' failed: {message}")]
    NodeExecution { node_id: NodeId, message: String },

    /// The run was stopped by the user
    #[error("Workflow stopped by user")]
    Stopped,

    /// A run was requested while another one is active
    #[error("Workflow is already executing (status: {status})")]
    NotStartable { status: ExecutionStatus },

    /// A stopped run has not exited its current node yet
    #[error("Previous run is still finishing after stop")]
    PreviousRunActive,

    /// The run's future was dropped before it finished
    #[error("Workflow run was cancelled before finishing")]
    Cancelled,

    /// A node lookup failed
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// An edge lookup failed
    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Compression error
    #[error("Compression error: {0}")]
    Compression(String),
}

impl WorkflowEngineError {
    /// Create an execution failed error with a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Create a node execution error with a message
    pub fn node_failed(node_id: impl Into<NodeId>, msg: impl Into<String>) -> Self {
        Self::NodeExecution {
            node_id: node_id.into(),
            message: msg.into(),
        }
    }

    /// Message recorded against a node when its executor returns this error
    pub fn node_message(&self) -> String {
        match self {
            Self::ExecutionFailed(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
