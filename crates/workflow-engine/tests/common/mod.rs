#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::{mpsc, Notify};
use workflow_engine::{
    ExecutionContext, NodeExecutor, Result, WorkflowBuilder, WorkflowEdge, WorkflowEngineError,
    WorkflowNode,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic executor with scripted failures and gates
///
/// Reports every node it starts on a channel. A gated node blocks until
/// its `Notify` is signalled.
pub struct ScriptedExecutor {
    failures: HashMap<String, String>,
    gates: HashMap<String, Arc<Notify>>,
    started: mpsc::UnboundedSender<String>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedExecutor {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (started, rx) = mpsc::unbounded_channel();
        (
            Self {
                failures: HashMap::new(),
                gates: HashMap::new(),
                started,
                calls: Arc::new(AtomicUsize::new(0)),
            },
            rx,
        )
    }

    pub fn fail(mut self, node_id: &str, message: &str) -> Self {
        self.failures
            .insert(node_id.to_string(), message.to_string());
        self
    }

    pub fn gate(&mut self, node_id: &str) -> Arc<Notify> {
        self.gates
            .entry(node_id.to_string())
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl NodeExecutor for ScriptedExecutor {
    async fn execute(&self, node: &WorkflowNode, context: &ExecutionContext) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.started.send(node.id.clone());

        if let Some(gate) = self.gates.get(&node.id) {
            gate.notified().await;
        }
        if let Some(message) = self.failures.get(&node.id) {
            return Err(WorkflowEngineError::failed(message.clone()));
        }

        let seen: Vec<&str> = context.iter().map(|(id, _)| id).collect();
        Ok(json!({"node": node.id, "seen": seen}))
    }
}

/// Next node id the executor started, with a timeout
pub async fn next_started(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("executor did not start a node in time")
        .expect("executor channel closed")
}

/// input -> a -> b -> output
pub fn pipeline() -> (Vec<WorkflowNode>, Vec<WorkflowEdge>) {
    WorkflowBuilder::new()
        .input("in", "Input")
        .processor("a", "Step A")
        .processor("b", "Step B")
        .output("out", "Output")
        .connect("in", "a")
        .connect("a", "b")
        .connect("b", "out")
        .build()
}
