//! Per-node executors
//!
//! The engine does not know what a node computes. It hands each node to a
//! [`NodeExecutor`] together with the results of the nodes that ran before
//! it, and records whatever comes back.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::future::Future;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::config::{EngineConfig, LatencyRange};
use crate::error::Result;
use crate::types::{NodeId, NodeKind, WorkflowNode};

/// Results of previously executed nodes, in execution order
///
/// Append-only while a run is in progress: a node sees the results of the
/// nodes ordered before it and never those of later nodes.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    workflow_id: String,
    entries: Vec<(NodeId, Value)>,
    index: HashMap<NodeId, usize>,
}

impl ExecutionContext {
    pub fn new(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            ..Default::default()
        }
    }

    /// Id of the run this context belongs to
    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// Result of an earlier node
    pub fn get(&self, node_id: &str) -> Option<&Value> {
        self.index.get(node_id).map(|&i| &self.entries[i].1)
    }

    /// Iterate results in execution order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(id, value)| (id.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn record(&mut self, node_id: NodeId, value: Value) {
        self.index.insert(node_id.clone(), self.entries.len());
        self.entries.push((node_id, value));
    }
}

/// Executes a single node
///
/// Implementations may suspend for as long as the underlying work takes.
/// The engine only checks for pause and stop between nodes, so an
/// in-flight call is never interrupted: executors should either finish
/// quickly or watch for cancellation themselves.
#[async_trait]
pub trait NodeExecutor: Send + Sync {
    /// Execute `node` given the results of earlier nodes
    async fn execute(&self, node: &WorkflowNode, context: &ExecutionContext) -> Result<Value>;
}

/// Executor backed by an async closure
///
/// The closure receives owned copies of the node and the context.
pub struct FnExecutor<F> {
    func: F,
}

impl<F> FnExecutor<F> {
    pub fn new<Fut>(func: F) -> Self
    where
        F: Fn(WorkflowNode, ExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self { func }
    }
}

#[async_trait]
impl<F, Fut> NodeExecutor for FnExecutor<F>
where
    F: Fn(WorkflowNode, ExecutionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    async fn execute(&self, node: &WorkflowNode, context: &ExecutionContext) -> Result<Value> {
        (self.func)(node.clone(), context.clone()).await
    }
}

/// Stand-in executor that fakes each node type's work
///
/// Sleeps for a latency picked from the configured range (stable per node
/// id) and returns a payload shaped like the real node's output.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    latency: LatencyRange,
}

impl SimulatedExecutor {
    pub fn new(latency: LatencyRange) -> Self {
        Self { latency }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.simulated_latency)
    }

    fn latency_for(&self, node_id: &str) -> std::time::Duration {
        let mut hasher = DefaultHasher::new();
        node_id.hash(&mut hasher);
        self.latency.pick(hasher.finish())
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new(LatencyRange::default())
    }
}

#[async_trait]
impl NodeExecutor for SimulatedExecutor {
    async fn execute(&self, node: &WorkflowNode, context: &ExecutionContext) -> Result<Value> {
        let latency = self.latency_for(&node.id);
        log::debug!(
            "SimulatedExecutor {}: executing {} node in {:?}",
            node.id,
            node.node_type(),
            latency
        );
        tokio::time::sleep(latency).await;

        let timestamp = Utc::now().to_rfc3339();
        let config = Value::Object(node.data().config.clone());

        let output = match &node.kind {
            NodeKind::Input(data) => json!({
                "type": "input",
                "data": data.config,
                "timestamp": timestamp,
            }),
            NodeKind::Llm(data) => {
                let model = if data.model.is_empty() {
                    "gpt-4"
                } else {
                    data.model.as_str()
                };
                json!({
                    "type": "llm",
                    "prompt": data.prompt,
                    "response": format!("AI response to input: {}", config),
                    "model": model,
                    "timestamp": timestamp,
                })
            }
            NodeKind::Processor(_) => json!({
                "type": "processor",
                "processed": true,
                "result": format!("Processed: {}", config),
                "timestamp": timestamp,
            }),
            NodeKind::Condition(data) => {
                let outcome = evaluate_condition(&data.condition, context);
                let path = if outcome {
                    data.true_path.clone()
                } else {
                    data.false_path.clone()
                };
                json!({
                    "type": "condition",
                    "condition": outcome,
                    "result": outcome.to_string(),
                    "path": path,
                    "timestamp": timestamp,
                })
            }
            NodeKind::Output(_) => json!({
                "type": "output",
                "final": true,
                "result": "workflow completed",
                "inputs": context.len(),
                "timestamp": timestamp,
            }),
            NodeKind::Custom(_)
            | NodeKind::Loop(_)
            | NodeKind::Aggregate(_)
            | NodeKind::Api(_)
            | NodeKind::Http(_) => json!({
                "type": node.node_type().as_str(),
                "result": "no operation",
                "timestamp": timestamp,
            }),
        };

        Ok(output)
    }
}

/// Evaluate a condition node's expression
///
/// `"true"`/`"false"` literals evaluate directly; otherwise the expression
/// names an earlier node whose result is tested for truthiness.
fn evaluate_condition(condition: &str, context: &ExecutionContext) -> bool {
    let condition = condition.trim();
    if condition.eq_ignore_ascii_case("true") {
        return true;
    }
    if condition.eq_ignore_ascii_case("false") {
        return false;
    }
    context.get(condition).map(is_truthy).unwrap_or(false)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
