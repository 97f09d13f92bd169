//! Core types for workflow graphs
//!
//! These types define the structure of workflow graphs: nodes typed by
//! role, the edges between them, and the editor-level state (viewport,
//! selection, workflow documents) that travels with them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// The role of a node in a workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Input,
    Output,
    Llm,
    Processor,
    Condition,
    Custom,
    Loop,
    Aggregate,
    Api,
    Http,
}

impl NodeType {
    /// Input and output nodes are critical: their failure aborts a run
    pub fn is_critical(self) -> bool {
        matches!(self, NodeType::Input | NodeType::Output)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Input => "input",
            NodeType::Output => "output",
            NodeType::Llm => "llm",
            NodeType::Processor => "processor",
            NodeType::Condition => "condition",
            NodeType::Custom => "custom",
            NodeType::Loop => "loop",
            NodeType::Aggregate => "aggregate",
            NodeType::Api => "api",
            NodeType::Http => "http",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-node execution status shown in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Idle,
    Running,
    Success,
    Error,
    Warning,
}

/// Data shared by every node type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Human-readable label
    pub label: String,
    /// Free-form configuration
    #[serde(default)]
    pub config: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NodeData {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Set a configuration entry
    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }
}

/// LLM provider backing an `llm` node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    #[default]
    Openai,
    Anthropic,
    Local,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmNodeData {
    #[serde(flatten)]
    pub base: NodeData,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub provider: LlmProvider,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionNodeData {
    #[serde(flatten)]
    pub base: NodeData,
    /// Condition expression; `"true"` / `"false"` literals are evaluated directly
    #[serde(default)]
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub false_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationType {
    #[default]
    Count,
    Condition,
    Array,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopNodeData {
    #[serde(flatten)]
    pub base: NodeData,
    #[serde(default)]
    pub iteration_type: IterationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_iteration: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationType {
    Sum,
    Average,
    #[default]
    Count,
    Max,
    Min,
    Concat,
    Merge,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateNodeData {
    #[serde(flatten)]
    pub base: NodeData,
    #[serde(default)]
    pub aggregation_type: AggregationType,
    #[serde(default)]
    pub input_fields: Vec<String>,
    #[serde(default)]
    pub output_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNodeData {
    #[serde(flatten)]
    pub base: NodeData,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: ApiMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mapping: Option<BTreeMap<String, String>>,
    /// Request timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

/// Simplified API call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpNodeData {
    #[serde(flatten)]
    pub base: NodeData,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Node payload keyed by node type
///
/// Serialized as `{"type": "...", "data": {...}}` so that a node reads
/// the same way the editor stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum NodeKind {
    Input(NodeData),
    Output(NodeData),
    Llm(LlmNodeData),
    Processor(NodeData),
    Condition(ConditionNodeData),
    Custom(NodeData),
    Loop(LoopNodeData),
    Aggregate(AggregateNodeData),
    Api(ApiNodeData),
    Http(HttpNodeData),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Input(_) => NodeType::Input,
            NodeKind::Output(_) => NodeType::Output,
            NodeKind::Llm(_) => NodeType::Llm,
            NodeKind::Processor(_) => NodeType::Processor,
            NodeKind::Condition(_) => NodeType::Condition,
            NodeKind::Custom(_) => NodeType::Custom,
            NodeKind::Loop(_) => NodeType::Loop,
            NodeKind::Aggregate(_) => NodeType::Aggregate,
            NodeKind::Api(_) => NodeType::Api,
            NodeKind::Http(_) => NodeType::Http,
        }
    }

    /// The data common to every node type
    pub fn data(&self) -> &NodeData {
        match self {
            NodeKind::Input(data)
            | NodeKind::Output(data)
            | NodeKind::Processor(data)
            | NodeKind::Custom(data) => data,
            NodeKind::Llm(d) => &d.base,
            NodeKind::Condition(d) => &d.base,
            NodeKind::Loop(d) => &d.base,
            NodeKind::Aggregate(d) => &d.base,
            NodeKind::Api(d) => &d.base,
            NodeKind::Http(d) => &d.base,
        }
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        match self {
            NodeKind::Input(data)
            | NodeKind::Output(data)
            | NodeKind::Processor(data)
            | NodeKind::Custom(data) => data,
            NodeKind::Llm(d) => &mut d.base,
            NodeKind::Condition(d) => &mut d.base,
            NodeKind::Loop(d) => &mut d.base,
            NodeKind::Aggregate(d) => &mut d.base,
            NodeKind::Api(d) => &mut d.base,
            NodeKind::Http(d) => &mut d.base,
        }
    }
}

/// Position in the editor canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node instance in a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    /// Unique identifier, immutable after creation
    pub id: NodeId,
    #[serde(default)]
    pub position: Position,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl WorkflowNode {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            position: Position::default(),
            kind,
        }
    }

    pub fn input(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Input(NodeData::new(label)))
    }

    pub fn output(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Output(NodeData::new(label)))
    }

    pub fn processor(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Processor(NodeData::new(label)))
    }

    pub fn custom(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Custom(NodeData::new(label)))
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn label(&self) -> &str {
        &self.kind.data().label
    }

    pub fn data(&self) -> &NodeData {
        self.kind.data()
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        self.kind.data_mut()
    }

    pub fn is_critical(&self) -> bool {
        self.node_type().is_critical()
    }
}

/// A directed dependency between two nodes
///
/// Endpoints are only checked at validation time; an edge may point at a
/// missing node while the graph is being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl WorkflowEdge {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Whether this edge touches the given node
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Canvas viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Currently selected nodes and edges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }
}

/// A saved workflow document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl Workflow {
    /// Create an empty workflow document
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            version: "1.0.0".to_string(),
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
            is_public: false,
        }
    }
}
