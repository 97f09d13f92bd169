//! Workflow execution engine
//!
//! Drives a validated, topologically ordered graph through a run-state
//! machine:
//!
//! ```text
//! idle -> running <-> paused -> completed | failed
//! running | paused -> idle        (stop)
//! ```
//!
//! Nodes run one at a time in order. Pause and stop are cooperative: the
//! run loop checks the state before each node, and a paused run parks on
//! the state channel until it changes (re-checking at least every
//! `pause_check_interval_ms`).
//!
//! # Failure policy
//!
//! A failing `input` or `output` node aborts the run. Any other node's
//! failure is recorded and the run moves on to the next node; the run then
//! finishes as `failed`.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::EngineConfig;
use crate::error::{Result, WorkflowEngineError};
use crate::events::{EventSink, NullEventSink, WorkflowEvent};
use crate::executor::{ExecutionContext, NodeExecutor};
use crate::topology::execution_order;
use crate::types::{NodeId, NodeStatus, WorkflowEdge, WorkflowNode};
use crate::validation::validate_workflow;

/// Run state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
    Failed,
}

impl ExecutionStatus {
    /// Whether a new run may start from this state
    pub fn can_execute(self) -> bool {
        matches!(
            self,
            ExecutionStatus::Idle | ExecutionStatus::Completed | ExecutionStatus::Failed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionStatus::Idle => "idle",
            ExecutionStatus::Running => "running",
            ExecutionStatus::Paused => "paused",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node failure recorded during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeError {
    pub node_id: NodeId,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a run
///
/// Only the engine mutates it, and only until `status` is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub workflow_id: String,
    pub status: ExecutionStatus,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Wall-clock duration in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    pub results: HashMap<NodeId, serde_json::Value>,
    pub errors: Vec<NodeError>,
}

impl ExecutionResult {
    fn start(workflow_id: String) -> Self {
        Self {
            workflow_id,
            status: ExecutionStatus::Running,
            start_time: Utc::now(),
            end_time: None,
            duration: None,
            results: HashMap::new(),
            errors: Vec::new(),
        }
    }

    fn finish(&mut self, status: ExecutionStatus, started: Instant) {
        self.end_time = Some(Utc::now());
        self.duration = Some(started.elapsed().as_millis() as u64);
        self.status = status;
    }

    /// Whether any node failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Observable engine state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub status: ExecutionStatus,
    /// 0-100
    pub progress: f64,
    /// Node currently executing, if any
    pub current_node: Option<NodeId>,
    /// Last error message
    pub error: Option<String>,
    /// Result of the last run
    pub result: Option<ExecutionResult>,
    /// Id of the current or last run
    pub workflow_id: Option<String>,
    pub node_statuses: HashMap<NodeId, NodeStatus>,
}

/// Workflow execution engine
///
/// One instance owns the state of one run context. Control calls
/// (`pause`, `resume`, `stop`, `reset`) take `&self` so they can be made
/// from other tasks while `execute_workflow` is in flight.
pub struct WorkflowEngine {
    state: watch::Sender<EngineState>,
    executor: Arc<dyn NodeExecutor>,
    event_sink: Arc<dyn EventSink>,
    config: EngineConfig,
    /// Set while a run loop is alive, including after `stop` until the
    /// loop observes it
    run_active: AtomicBool,
}

/// Clears run bookkeeping on every exit path of a run
///
/// A run that is still `running` or `paused` when the guard drops had its
/// future dropped before reaching a terminal state; it is marked failed.
struct ActiveRun<'a> {
    engine: &'a WorkflowEngine,
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        let message = WorkflowEngineError::Cancelled.to_string();
        let mut cancelled = None;
        self.engine.state.send_modify(|s| {
            s.current_node = None;
            if matches!(s.status, ExecutionStatus::Running | ExecutionStatus::Paused) {
                s.status = ExecutionStatus::Failed;
                s.error = Some(message.clone());
                cancelled = s.workflow_id.clone();
            }
        });
        self.engine.run_active.store(false, Ordering::Release);

        if let Some(workflow_id) = cancelled {
            log::warn!("Workflow {} cancelled before finishing", workflow_id);
            self.engine.emit(WorkflowEvent::WorkflowFailed {
                workflow_id,
                error: message,
            });
        }
    }
}

impl WorkflowEngine {
    /// Create an engine that runs nodes with `executor`
    pub fn new(executor: Arc<dyn NodeExecutor>) -> Self {
        let (state, _) = watch::channel(EngineState::default());
        Self {
            state,
            executor,
            event_sink: Arc::new(NullEventSink),
            config: EngineConfig::default(),
            run_active: AtomicBool::new(false),
        }
    }

    pub fn with_event_sink(mut self, event_sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> EngineState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> ExecutionStatus {
        self.state.borrow().status
    }

    pub fn progress(&self) -> f64 {
        self.state.borrow().progress
    }

    pub fn current_node(&self) -> Option<NodeId> {
        self.state.borrow().current_node.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn result(&self) -> Option<ExecutionResult> {
        self.state.borrow().result.clone()
    }

    pub fn node_status(&self, node_id: &str) -> Option<NodeStatus> {
        self.state.borrow().node_statuses.get(node_id).copied()
    }

    pub fn is_executing(&self) -> bool {
        self.status() == ExecutionStatus::Running
    }

    /// Whether `execute_workflow` would start a run now
    ///
    /// False after `stop` until the stopped run loop has exited.
    pub fn can_execute(&self) -> bool {
        self.status().can_execute() && !self.run_active.load(Ordering::Acquire)
    }

    pub fn can_pause(&self) -> bool {
        self.status() == ExecutionStatus::Running
    }

    pub fn can_resume(&self) -> bool {
        self.status() == ExecutionStatus::Paused
    }

    /// Validate, order and execute a workflow graph
    ///
    /// Returns the run's result when every node was attempted, including
    /// runs where non-critical nodes failed (`status == Failed`). Returns an
    /// error when the graph is invalid or cyclic (no run is recorded), when a
    /// critical node fails, or when the run is stopped.
    pub async fn execute_workflow(
        &self,
        nodes: &[WorkflowNode],
        edges: &[WorkflowEdge],
    ) -> Result<ExecutionResult> {
        let status = self.status();
        if !status.can_execute() {
            return Err(WorkflowEngineError::NotStartable { status });
        }
        if self
            .run_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WorkflowEngineError::PreviousRunActive);
        }
        let _active = ActiveRun { engine: self };

        let order = match validate_workflow(nodes, edges)
            .map_err(WorkflowEngineError::from)
            .and_then(|()| execution_order(nodes, edges).map_err(WorkflowEngineError::from))
        {
            Ok(order) => order,
            Err(e) => {
                log::warn!("Workflow rejected before execution: {}", e);
                let message = e.to_string();
                self.state.send_replace(EngineState {
                    error: Some(message),
                    ..Default::default()
                });
                return Err(e);
            }
        };

        let workflow_id = format!("{}-{}", self.config.workflow_id_prefix, uuid::Uuid::new_v4());
        let started = Instant::now();
        let mut result = ExecutionResult::start(workflow_id.clone());
        let mut context = ExecutionContext::new(&workflow_id);
        let total = order.len();

        self.state.send_replace(EngineState {
            status: ExecutionStatus::Running,
            workflow_id: Some(workflow_id.clone()),
            node_statuses: nodes
                .iter()
                .map(|n| (n.id.clone(), NodeStatus::Idle))
                .collect(),
            ..Default::default()
        });
        log::info!("Workflow {} started with {} nodes", workflow_id, total);
        self.emit(WorkflowEvent::WorkflowStarted {
            workflow_id: workflow_id.clone(),
            node_count: total,
        });

        for (index, node) in order.into_iter().enumerate() {
            if self.wait_while_paused().await == ExecutionStatus::Idle {
                return Err(self.abort(result, started, WorkflowEngineError::Stopped));
            }

            let progress = index as f64 / total as f64 * 100.0;
            self.state.send_modify(|s| {
                s.current_node = Some(node.id.clone());
                s.progress = progress;
                s.node_statuses.insert(node.id.clone(), NodeStatus::Running);
            });
            self.emit(WorkflowEvent::NodeStarted {
                workflow_id: workflow_id.clone(),
                node_id: node.id.clone(),
                progress,
            });
            log::debug!(
                "Workflow {}: executing {} node '{}' ({}/{})",
                workflow_id,
                node.node_type(),
                node.id,
                index + 1,
                total
            );

            match self.executor.execute(node, &context).await {
                Ok(output) => {
                    context.record(node.id.clone(), output.clone());
                    result.results.insert(node.id.clone(), output.clone());
                    self.set_node_status(&node.id, NodeStatus::Success);
                    self.emit(WorkflowEvent::NodeCompleted {
                        workflow_id: workflow_id.clone(),
                        node_id: node.id.clone(),
                        output,
                    });
                }
                Err(e) => {
                    let message = e.node_message();
                    let critical = node.is_critical();
                    result.errors.push(NodeError {
                        node_id: node.id.clone(),
                        message: message.clone(),
                        timestamp: Utc::now(),
                    });
                    self.set_node_status(&node.id, NodeStatus::Error);
                    self.emit(WorkflowEvent::NodeFailed {
                        workflow_id: workflow_id.clone(),
                        node_id: node.id.clone(),
                        error: message.clone(),
                        critical,
                    });

                    if critical {
                        log::error!(
                            "Workflow {}: critical node '{}' failed: {}",
                            workflow_id,
                            node.id,
                            message
                        );
                        let error = WorkflowEngineError::node_failed(node.id.clone(), message);
                        return Err(self.abort(result, started, error));
                    }
                    log::warn!(
                        "Workflow {}: node '{}' failed, continuing: {}",
                        workflow_id,
                        node.id,
                        message
                    );
                }
            }
        }

        // A stop issued while the last node was running
        if self.status() == ExecutionStatus::Idle {
            return Err(self.abort(result, started, WorkflowEngineError::Stopped));
        }

        let status = if result.has_errors() {
            ExecutionStatus::Failed
        } else {
            ExecutionStatus::Completed
        };
        result.finish(status, started);

        let error = result.errors.first().map(|first| {
            format!(
                "{} node(s) failed; first failure on '{}': {}",
                result.errors.len(),
                first.node_id,
                first.message
            )
        });

        self.state.send_modify(|s| {
            s.status = status;
            s.progress = 100.0;
            s.current_node = None;
            s.error = error.clone();
            s.result = Some(result.clone());
        });

        let duration_ms = result.duration.unwrap_or_default();
        match error {
            None => {
                log::info!("Workflow {} completed in {}ms", workflow_id, duration_ms);
                self.emit(WorkflowEvent::WorkflowCompleted {
                    workflow_id,
                    duration_ms,
                });
            }
            Some(error) => {
                log::warn!("Workflow {} finished with errors: {}", workflow_id, error);
                self.emit(WorkflowEvent::WorkflowFailed { workflow_id, error });
            }
        }

        Ok(result)
    }

    /// Pause a running workflow; no-op unless running
    pub fn pause(&self) -> bool {
        let paused = self.state.send_if_modified(|s| {
            if s.status == ExecutionStatus::Running {
                s.status = ExecutionStatus::Paused;
                true
            } else {
                false
            }
        });
        if paused {
            log::info!("Workflow execution paused");
            self.emit_control(|workflow_id| WorkflowEvent::WorkflowPaused { workflow_id });
        }
        paused
    }

    /// Resume a paused workflow; no-op unless paused
    pub fn resume(&self) -> bool {
        let resumed = self.state.send_if_modified(|s| {
            if s.status == ExecutionStatus::Paused {
                s.status = ExecutionStatus::Running;
                true
            } else {
                false
            }
        });
        if resumed {
            log::info!("Workflow execution resumed");
            self.emit_control(|workflow_id| WorkflowEvent::WorkflowResumed { workflow_id });
        }
        resumed
    }

    /// Stop a running or paused workflow
    ///
    /// The state becomes `idle` immediately; the run loop notices before
    /// its next node and fails the run with [`WorkflowEngineError::Stopped`].
    pub fn stop(&self) -> bool {
        let stopped = self.state.send_if_modified(|s| {
            if matches!(s.status, ExecutionStatus::Running | ExecutionStatus::Paused) {
                s.status = ExecutionStatus::Idle;
                s.current_node = None;
                s.progress = 0.0;
                true
            } else {
                false
            }
        });
        if stopped {
            log::info!("Workflow execution stopped");
            self.emit_control(|workflow_id| WorkflowEvent::WorkflowStopped { workflow_id });
        }
        stopped
    }

    /// Return to the initial state, clearing status, result, progress,
    /// current node and error
    ///
    /// During a run this acts like [`stop`](Self::stop): the state is idle
    /// right away, but the run loop then aborts at its next node boundary and
    /// leaves the engine `failed` with a "stopped by user" error.
    pub fn reset(&self) {
        self.state.send_if_modified(|s| {
            let initial = EngineState::default();
            if *s == initial {
                false
            } else {
                *s = initial;
                true
            }
        });
    }

    /// Park while paused; returns the status that ended the wait
    async fn wait_while_paused(&self) -> ExecutionStatus {
        let mut rx = self.state.subscribe();
        let interval = self.config.pause_check_interval();
        let mut logged = false;
        loop {
            let status = rx.borrow_and_update().status;
            if status != ExecutionStatus::Paused {
                return status;
            }
            if !logged {
                log::debug!("Run loop suspended while paused");
                logged = true;
            }
            // Wakes on the next state change, or after the interval at most
            let _ = tokio::time::timeout(interval, rx.changed()).await;
        }
    }

    /// Record a fatal end of the run and hand back the error
    fn abort(
        &self,
        mut result: ExecutionResult,
        started: Instant,
        error: WorkflowEngineError,
    ) -> WorkflowEngineError {
        result.finish(ExecutionStatus::Failed, started);
        let message = error.to_string();
        let workflow_id = result.workflow_id.clone();

        self.state.send_modify(|s| {
            s.status = ExecutionStatus::Failed;
            s.current_node = None;
            s.error = Some(message.clone());
            s.result = Some(result);
        });
        log::warn!("Workflow {} aborted: {}", workflow_id, message);
        self.emit(WorkflowEvent::WorkflowFailed {
            workflow_id,
            error: message,
        });
        error
    }

    fn set_node_status(&self, node_id: &str, status: NodeStatus) {
        self.state.send_modify(|s| {
            s.node_statuses.insert(node_id.to_string(), status);
        });
    }

    fn emit(&self, event: WorkflowEvent) {
        if let Err(e) = self.event_sink.send(event) {
            log::warn!("Failed to deliver workflow event: {}", e);
        }
    }

    fn emit_control(&self, event: impl FnOnce(String) -> WorkflowEvent) {
        let workflow_id = self.state.borrow().workflow_id.clone();
        if let Some(workflow_id) = workflow_id {
            self.emit(event(workflow_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;
    use crate::events::VecEventSink;
    use crate::executor::FnExecutor;
    use serde_json::json;

    fn echo_engine() -> WorkflowEngine {
        WorkflowEngine::new(Arc::new(FnExecutor::new(
            |node: WorkflowNode, ctx: ExecutionContext| async move {
                Ok(json!({"node": node.id, "seen": ctx.len()}))
            },
        )))
    }

    fn failing_engine(failing: &'static str) -> WorkflowEngine {
        WorkflowEngine::new(Arc::new(FnExecutor::new(
            move |node: WorkflowNode, _ctx: ExecutionContext| async move {
                if node.id == failing {
                    Err(WorkflowEngineError::failed(format!("{} exploded", node.id)))
                } else {
                    Ok(json!(node.id))
                }
            },
        )))
    }

    fn linear() -> (Vec<WorkflowNode>, Vec<WorkflowEdge>) {
        WorkflowBuilder::new()
            .input("in", "Input")
            .processor("proc", "Processor")
            .output("out", "Output")
            .connect("in", "proc")
            .connect("proc", "out")
            .build()
    }

    #[test]
    fn test_can_execute_states() {
        assert!(ExecutionStatus::Idle.can_execute());
        assert!(ExecutionStatus::Completed.can_execute());
        assert!(ExecutionStatus::Failed.can_execute());
        assert!(!ExecutionStatus::Running.can_execute());
        assert!(!ExecutionStatus::Paused.can_execute());
    }

    #[tokio::test]
    async fn test_successful_run() {
        let engine = echo_engine();
        let (nodes, edges) = linear();

        let result = engine.execute_workflow(&nodes, &edges).await.unwrap();
        assert_eq!(result.status, ExecutionStatus::Completed);
        assert_eq!(result.results.len(), 3);
        assert_eq!(result.results["out"], json!({"node": "out", "seen": 2}));
        assert!(result.errors.is_empty());
        assert!(result.end_time.is_some());
        assert!(result.duration.is_some());
        assert!(result.workflow_id.starts_with("workflow-"));

        let state = engine.state();
        assert_eq!(state.status, ExecutionStatus::Completed);
        assert_eq!(state.progress, 100.0);
        assert_eq!(state.current_node, None);
        assert_eq!(state.error, None);
        assert_eq!(state.result, Some(result));
        assert_eq!(engine.node_status("proc"), Some(NodeStatus::Success));
    }

    #[tokio::test]
    async fn test_validation_failure_leaves_idle() {
        let engine = echo_engine();
        let (nodes, edges) = WorkflowBuilder::new().input("in", "Input").build();

        let err = engine.execute_workflow(&nodes, &edges).await.unwrap_err();
        assert!(matches!(err, WorkflowEngineError::Validation(_)));
        assert_eq!(engine.status(), ExecutionStatus::Idle);
        assert_eq!(engine.result(), None);
        assert!(engine.last_error().unwrap().contains("output node"));
        assert!(engine.can_execute());
    }

    #[tokio::test]
    async fn test_cycle_fails_before_any_node_runs() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = calls.clone();
        let engine = WorkflowEngine::new(Arc::new(FnExecutor::new(
            move |node: WorkflowNode, _ctx: ExecutionContext| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok(json!(node.id)) }
            },
        )));
        let (nodes, edges) = WorkflowBuilder::new()
            .input("in", "Input")
            .processor("a", "A")
            .processor("b", "B")
            .output("out", "Output")
            .connect("in", "a")
            .connect("a", "b")
            .connect("b", "a")
            .connect("b", "out")
            .build();

        let err = engine.execute_workflow(&nodes, &edges).await.unwrap_err();
        assert!(matches!(err, WorkflowEngineError::Cycle(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(engine.status(), ExecutionStatus::Idle);
        assert_eq!(engine.result(), None);
    }

    #[tokio::test]
    async fn test_non_critical_failure_continues() {
        let sink = Arc::new(VecEventSink::new());
        let engine = failing_engine("proc").with_event_sink(sink.clone());
        let (nodes, edges) = linear();

        let result = engine.execute_workflow(&nodes, &edges).await.unwrap();
        assert_eq!(result.status, ExecutionStatus::Failed);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].node_id, "proc");
        assert_eq!(result.errors[0].message, "proc exploded");
        assert!(result.results.contains_key("in"));
        assert!(result.results.contains_key("out"));

        assert_eq!(engine.status(), ExecutionStatus::Failed);
        assert_eq!(engine.progress(), 100.0);
        assert_eq!(engine.node_status("proc"), Some(NodeStatus::Error));
        assert!(sink.events().iter().any(|e| matches!(
            e,
            WorkflowEvent::NodeFailed { critical: false, .. }
        )));
    }

    #[tokio::test]
    async fn test_critical_failure_aborts() {
        let engine = failing_engine("in");
        let (nodes, edges) = linear();

        let err = engine.execute_workflow(&nodes, &edges).await.unwrap_err();
        match err {
            WorkflowEngineError::NodeExecution { node_id, message } => {
                assert_eq!(node_id, "in");
                assert_eq!(message, "in exploded");
            }
            other => panic!("Expected NodeExecution, got {:?}", other),
        }

        let state = engine.state();
        assert_eq!(state.status, ExecutionStatus::Failed);
        assert_eq!(state.current_node, None);
        assert!(state.error.is_some());
        let result = state.result.unwrap();
        assert!(result.results.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(engine.node_status("proc"), Some(NodeStatus::Idle));
    }

    #[tokio::test]
    async fn test_control_calls_are_noops_when_idle() {
        let engine = echo_engine();
        assert!(!engine.pause());
        assert!(!engine.resume());
        assert!(!engine.stop());
        assert_eq!(engine.status(), ExecutionStatus::Idle);
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let engine = failing_engine("proc");
        let (nodes, edges) = linear();
        engine.execute_workflow(&nodes, &edges).await.unwrap();

        engine.reset();
        let once = engine.state();
        engine.reset();
        assert_eq!(engine.state(), once);
        assert_eq!(once, EngineState::default());
    }

    #[tokio::test]
    async fn test_rerun_after_completion() {
        let engine = echo_engine();
        let (nodes, edges) = linear();

        let first = engine.execute_workflow(&nodes, &edges).await.unwrap();
        let second = engine.execute_workflow(&nodes, &edges).await.unwrap();
        assert_ne!(first.workflow_id, second.workflow_id);
        assert_eq!(first.results, second.results);
    }

    #[tokio::test]
    async fn test_events_in_order() {
        let sink = Arc::new(VecEventSink::new());
        let engine = echo_engine().with_event_sink(sink.clone());
        let (nodes, edges) = linear();
        engine.execute_workflow(&nodes, &edges).await.unwrap();

        let events = sink.events();
        assert!(matches!(
            events.first(),
            Some(WorkflowEvent::WorkflowStarted { node_count: 3, .. })
        ));
        assert!(matches!(
            events.last(),
            Some(WorkflowEvent::WorkflowCompleted { .. })
        ));

        let progress: Vec<f64> = events
            .iter()
            .filter_map(|e| match e {
                WorkflowEvent::NodeStarted { progress, .. } => Some(*progress),
                _ => None,
            })
            .collect();
        assert_eq!(progress.len(), 3);
        assert_eq!(progress[0], 0.0);
        assert!(progress[1] > 33.0 && progress[1] < 34.0);
    }
}
