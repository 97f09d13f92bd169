//! Event types for streaming workflow progress
//!
//! Events are sent from the engine to the presentation layer (or any
//! consumer) to report progress, node results, errors, and run-state
//! transitions.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::types::NodeId;

/// Trait for sending workflow events
///
/// This abstracts over the transport mechanism (mpsc, UI bridge, etc.)
/// so the engine can be embedded in different hosts.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be sent (e.g., channel closed)
    fn send(&self, event: WorkflowEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Events emitted during workflow execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkflowEvent {
    /// Workflow execution started
    #[serde(rename_all = "camelCase")]
    WorkflowStarted {
        workflow_id: String,
        node_count: usize,
    },

    /// Execution was paused by the user
    #[serde(rename_all = "camelCase")]
    WorkflowPaused { workflow_id: String },

    /// Execution was resumed by the user
    #[serde(rename_all = "camelCase")]
    WorkflowResumed { workflow_id: String },

    /// Execution was stopped by the user
    #[serde(rename_all = "camelCase")]
    WorkflowStopped { workflow_id: String },

    /// Workflow execution finished without errors
    #[serde(rename_all = "camelCase")]
    WorkflowCompleted {
        workflow_id: String,
        duration_ms: u64,
    },

    /// Workflow execution failed
    #[serde(rename_all = "camelCase")]
    WorkflowFailed { workflow_id: String, error: String },

    /// A node started executing
    #[serde(rename_all = "camelCase")]
    NodeStarted {
        workflow_id: String,
        node_id: NodeId,
        progress: f64,
    },

    /// A node completed successfully
    #[serde(rename_all = "camelCase")]
    NodeCompleted {
        workflow_id: String,
        node_id: NodeId,
        output: serde_json::Value,
    },

    /// A node failed
    #[serde(rename_all = "camelCase")]
    NodeFailed {
        workflow_id: String,
        node_id: NodeId,
        error: String,
        critical: bool,
    },
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when events aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: WorkflowEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<WorkflowEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<WorkflowEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Clear all collected events
    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: WorkflowEvent) -> Result<(), EventError> {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
        Ok(())
    }
}

/// Forwards events into an unbounded tokio channel
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<WorkflowEvent>,
}

impl ChannelEventSink {
    /// Create a sink and the receiver that observes it
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WorkflowEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn send(&self, event: WorkflowEvent) -> Result<(), EventError> {
        self.sender
            .send(event)
            .map_err(|_| EventError::channel_closed())
    }
}
