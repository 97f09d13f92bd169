//! Workflow Engine - sequential execution of node-based workflows
//!
//! This crate validates a directed graph of typed nodes, orders it
//! topologically and runs the nodes one after another through a pluggable
//! executor. It supports:
//!
//! - Structural validation with user-facing error messages
//! - Deterministic topological ordering with cycle detection
//! - Cooperative pause, resume and stop between nodes
//! - Per-node failure policy (input/output failures abort the run)
//! - Compressed snapshot-based undo/redo for the editing store
//!
//! # Architecture
//!
//! - `WorkflowEngine`: run-state machine and sequential run loop
//! - `NodeExecutor`: what a node actually does, supplied by the host
//! - `WorkflowEditor`: live node/edge collections with `History`
//! - `EventSink`: progress events, not tied to any UI toolkit
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use workflow_engine::{SimulatedExecutor, WorkflowBuilder, WorkflowEngine};
//!
//! let (nodes, edges) = WorkflowBuilder::new()
//!     .input("input-1", "Question")
//!     .output("output-1", "Answer")
//!     .connect("input-1", "output-1")
//!     .build();
//!
//! let engine = WorkflowEngine::new(Arc::new(SimulatedExecutor::default()));
//! let result = engine.execute_workflow(&nodes, &edges).await?;
//! ```

pub mod builder;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod events;
pub mod executor;
pub mod history;
pub mod topology;
pub mod types;
pub mod validation;

// Re-export key types
pub use builder::WorkflowBuilder;
pub use config::{ConfigError, EngineConfig, LatencyRange};
pub use editor::{WorkflowEditor, WorkflowStats};
pub use engine::{EngineState, ExecutionResult, ExecutionStatus, NodeError, WorkflowEngine};
pub use error::{Result, WorkflowEngineError};
pub use events::{ChannelEventSink, EventSink, NullEventSink, VecEventSink, WorkflowEvent};
pub use executor::{ExecutionContext, FnExecutor, NodeExecutor, SimulatedExecutor};
pub use history::{History, HistoryAction, HistoryRecord, Snapshot};
pub use topology::{execution_order, CycleError};
pub use types::{
    EdgeId, NodeData, NodeId, NodeKind, NodeStatus, NodeType, Position, Selection, Viewport,
    Workflow, WorkflowEdge, WorkflowNode,
};
pub use validation::{check_workflow, validate_workflow, ValidationError, ValidationOutcome};
