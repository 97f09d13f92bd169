//! Fluent builder for workflow graphs
//!
//! Provides a fluent API for constructing node/edge sets programmatically.

use serde_json::Value;

use crate::types::{
    ConditionNodeData, LlmNodeData, NodeData, NodeKind, Workflow, WorkflowEdge, WorkflowNode,
};

/// Fluent builder for constructing workflow graphs
///
/// # Example
///
/// ```ignore
/// let (nodes, edges) = WorkflowBuilder::new()
///     .input("input-1", "Question")
///     .with_config("text", serde_json::json!("Hello"))
///     .llm("llm-1", "Answer", "Answer the question")
///     .output("output-1", "Result")
///     .connect("input-1", "llm-1")
///     .connect("llm-1", "output-1")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct WorkflowBuilder {
    nodes: Vec<WorkflowNode>,
    edges: Vec<WorkflowEdge>,
    edge_counter: usize,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary node
    pub fn node(mut self, node: WorkflowNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn input(self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.node(WorkflowNode::input(id, label))
    }

    pub fn output(self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.node(WorkflowNode::output(id, label))
    }

    pub fn processor(self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.node(WorkflowNode::processor(id, label))
    }

    pub fn custom(self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.node(WorkflowNode::custom(id, label))
    }

    pub fn llm(
        self,
        id: impl Into<String>,
        label: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        self.node(WorkflowNode::new(
            id,
            NodeKind::Llm(LlmNodeData {
                base: NodeData::new(label),
                prompt: prompt.into(),
                model: "gpt-4".to_string(),
                ..Default::default()
            }),
        ))
    }

    pub fn condition(
        self,
        id: impl Into<String>,
        label: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        self.node(WorkflowNode::new(
            id,
            NodeKind::Condition(ConditionNodeData {
                base: NodeData::new(label),
                condition: condition.into(),
                ..Default::default()
            }),
        ))
    }

    /// Set a config entry on the most recently added node
    ///
    /// Must be called immediately after adding a node.
    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.data_mut().config.insert(key.into(), value);
        }
        self
    }

    /// Set the position of the most recently added node
    pub fn at(mut self, x: f64, y: f64) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.position.x = x;
            node.position.y = y;
        }
        self
    }

    /// Add an edge between two nodes (auto-generates edge ID)
    pub fn connect(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edge_counter += 1;
        let id = format!("edge-{}", self.edge_counter);
        self.edges.push(WorkflowEdge::new(id, source, target));
        self
    }

    /// Add an edge with an explicit ID
    pub fn connect_with_id(
        mut self,
        edge_id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.edges.push(WorkflowEdge::new(edge_id, source, target));
        self
    }

    /// Build the node and edge collections without validation
    pub fn build(self) -> (Vec<WorkflowNode>, Vec<WorkflowEdge>) {
        (self.nodes, self.edges)
    }

    /// Build a workflow document
    pub fn build_workflow(self, id: impl Into<String>, name: impl Into<String>) -> Workflow {
        let mut workflow = Workflow::new(id, name);
        workflow.nodes = self.nodes;
        workflow.edges = self.edges;
        workflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeType;
    use serde_json::json;

    #[test]
    fn test_builder_generates_edge_ids() {
        let (nodes, edges) = WorkflowBuilder::new()
            .input("a", "A")
            .output("b", "B")
            .connect("a", "b")
            .connect_with_id("custom", "b", "a")
            .build();

        assert_eq!(nodes.len(), 2);
        assert_eq!(edges[0].id, "edge-1");
        assert_eq!(edges[1].id, "custom");
    }

    #[test]
    fn test_with_config_targets_last_node() {
        let (nodes, _) = WorkflowBuilder::new()
            .input("a", "A")
            .with_config("text", json!("hello"))
            .llm("l", "L", "Say hi")
            .at(50.0, 10.0)
            .build();

        assert_eq!(nodes[0].data().config.get("text"), Some(&json!("hello")));
        assert!(nodes[1].data().config.is_empty());
        assert_eq!(nodes[1].node_type(), NodeType::Llm);
        assert_eq!(nodes[1].position.x, 50.0);
    }

    #[test]
    fn test_build_workflow() {
        let workflow = WorkflowBuilder::new()
            .input("a", "A")
            .output("b", "B")
            .connect("a", "b")
            .build_workflow("wf-1", "Demo");

        assert_eq!(workflow.id, "wf-1");
        assert_eq!(workflow.nodes.len(), 2);
        assert_eq!(workflow.edges.len(), 1);
    }
}
