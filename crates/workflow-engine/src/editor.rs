//! Workflow editing store
//!
//! [`WorkflowEditor`] owns the live node and edge collections a user is
//! editing, along with viewport, selection and the undo history. Every
//! structural edit and the snapshot that records it happen inside a single
//! `&mut self` call.

use chrono::Utc;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::{Result, WorkflowEngineError};
use crate::history::{History, HistoryAction, Snapshot};
use crate::types::{
    NodeData, NodeType, Position, Selection, Viewport, Workflow, WorkflowEdge, WorkflowNode,
};
use crate::validation::{check_workflow, ValidationOutcome};

/// Counts shown in the editor status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub selected_count: usize,
}

/// Editing session for one workflow
pub struct WorkflowEditor {
    nodes: Vec<WorkflowNode>,
    edges: Vec<WorkflowEdge>,
    viewport: Viewport,
    selection: Selection,
    workflow: Option<Workflow>,
    history: History,
}

impl WorkflowEditor {
    /// Start with an empty canvas
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            viewport: Viewport::default(),
            selection: Selection::default(),
            workflow: None,
            history: History::new(&Snapshot::default(), config)?,
        })
    }

    pub fn nodes(&self) -> &[WorkflowNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[WorkflowEdge] {
        &self.edges
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Metadata of the loaded workflow, if any
    pub fn workflow(&self) -> Option<&Workflow> {
        self.workflow.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn node(&self, node_id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn edge(&self, edge_id: &str) -> Option<&WorkflowEdge> {
        self.edges.iter().find(|e| e.id == edge_id)
    }

    // Nodes

    pub fn add_node(&mut self, node: WorkflowNode) -> Result<()> {
        self.nodes.push(node);
        self.record(HistoryAction::Add)
    }

    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = WorkflowNode>) -> Result<()> {
        self.nodes.extend(nodes);
        self.record(HistoryAction::Add)
    }

    /// Remove a node together with its edges, and deselect it
    pub fn remove_node(&mut self, node_id: &str) -> Result<()> {
        if self.node(node_id).is_none() {
            return Err(WorkflowEngineError::NodeNotFound(node_id.to_string()));
        }
        self.nodes.retain(|n| n.id != node_id);
        self.edges.retain(|e| !e.touches(node_id));
        self.selection.nodes.retain(|id| id != node_id);
        self.record(HistoryAction::Delete)
    }

    /// Apply an update to a node
    pub fn update_node(
        &mut self,
        node_id: &str,
        update: impl FnOnce(&mut WorkflowNode),
    ) -> Result<()> {
        let node = self.node_mut(node_id)?;
        update(node);
        // The id is the node's identity
        node.id = node_id.to_string();
        self.record(HistoryAction::Update)
    }

    /// Move a node on the canvas
    pub fn move_node(&mut self, node_id: &str, position: Position) -> Result<()> {
        self.node_mut(node_id)?.position = position;
        self.record(HistoryAction::Move)
    }

    /// Apply an update to a node's data without recording history
    ///
    /// Used for high-frequency edits such as typing into a field.
    pub fn update_node_data(
        &mut self,
        node_id: &str,
        update: impl FnOnce(&mut NodeData),
    ) -> Result<()> {
        update(self.node_mut(node_id)?.data_mut());
        Ok(())
    }

    // Edges

    pub fn add_edge(&mut self, edge: WorkflowEdge) -> Result<()> {
        self.edges.push(edge);
        self.record(HistoryAction::Add)
    }

    pub fn add_edges(&mut self, edges: impl IntoIterator<Item = WorkflowEdge>) -> Result<()> {
        self.edges.extend(edges);
        self.record(HistoryAction::Add)
    }

    pub fn remove_edge(&mut self, edge_id: &str) -> Result<()> {
        if self.edge(edge_id).is_none() {
            return Err(WorkflowEngineError::EdgeNotFound(edge_id.to_string()));
        }
        self.edges.retain(|e| e.id != edge_id);
        self.selection.edges.retain(|id| id != edge_id);
        self.record(HistoryAction::Delete)
    }

    pub fn update_edge(
        &mut self,
        edge_id: &str,
        update: impl FnOnce(&mut WorkflowEdge),
    ) -> Result<()> {
        let edge = self
            .edges
            .iter_mut()
            .find(|e| e.id == edge_id)
            .ok_or_else(|| WorkflowEngineError::EdgeNotFound(edge_id.to_string()))?;
        update(edge);
        edge.id = edge_id.to_string();
        self.record(HistoryAction::Update)
    }

    // Selection

    /// Select a node; without `multi` the selection is replaced
    pub fn select_node(&mut self, node_id: impl Into<String>, multi: bool) {
        let node_id = node_id.into();
        if multi {
            if !self.selection.nodes.contains(&node_id) {
                self.selection.nodes.push(node_id);
            }
        } else {
            self.selection = Selection {
                nodes: vec![node_id],
                edges: Vec::new(),
            };
        }
    }

    /// Select an edge; without `multi` the selection is replaced
    pub fn select_edge(&mut self, edge_id: impl Into<String>, multi: bool) {
        let edge_id = edge_id.into();
        if multi {
            if !self.selection.edges.contains(&edge_id) {
                self.selection.edges.push(edge_id);
            }
        } else {
            self.selection = Selection {
                nodes: Vec::new(),
                edges: vec![edge_id],
            };
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    pub fn select_all(&mut self) {
        self.selection = Selection {
            nodes: self.nodes.iter().map(|n| n.id.clone()).collect(),
            edges: self.edges.iter().map(|e| e.id.clone()).collect(),
        };
    }

    pub fn selected_nodes(&self) -> Vec<&WorkflowNode> {
        self.nodes
            .iter()
            .filter(|n| self.selection.nodes.contains(&n.id))
            .collect()
    }

    pub fn selected_edges(&self) -> Vec<&WorkflowEdge> {
        self.edges
            .iter()
            .filter(|e| self.selection.edges.contains(&e.id))
            .collect()
    }

    /// Not recorded in history
    pub fn update_viewport(&mut self, update: impl FnOnce(&mut Viewport)) {
        update(&mut self.viewport);
    }

    // History

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restore the previous snapshot; returns false if there was none
    pub fn undo(&mut self) -> Result<bool> {
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(snapshot?);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-apply an undone snapshot; returns false if there was none
    pub fn redo(&mut self) -> Result<bool> {
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(snapshot?);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // Workflow documents

    /// Replace the canvas with a workflow; history restarts from it
    pub fn load_workflow(&mut self, workflow: Workflow) -> Result<()> {
        log::info!(
            "Loading workflow '{}' ({} nodes, {} edges)",
            workflow.name,
            workflow.nodes.len(),
            workflow.edges.len()
        );
        self.nodes = workflow.nodes.clone();
        self.edges = workflow.edges.clone();
        self.workflow = Some(workflow);
        self.clear_selection();
        self.history.reset(&self.snapshot())
    }

    /// Empty the canvas and forget the loaded workflow; history restarts
    pub fn clear_workflow(&mut self) -> Result<()> {
        self.nodes.clear();
        self.edges.clear();
        self.workflow = None;
        self.viewport = Viewport::default();
        self.clear_selection();
        self.history.reset(&self.snapshot())
    }

    /// Current canvas as a workflow document
    ///
    /// Metadata comes from the loaded workflow when there is one.
    pub fn export_workflow(&self) -> Workflow {
        let now = Utc::now();
        let current = self.workflow.as_ref();
        Workflow {
            id: current
                .map(|w| w.id.clone())
                .unwrap_or_else(|| now.timestamp_millis().to_string()),
            name: current
                .map(|w| w.name.clone())
                .unwrap_or_else(|| "Untitled Workflow".to_string()),
            description: current.and_then(|w| w.description.clone()),
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            version: "1.0.0".to_string(),
            created_at: current.map(|w| w.created_at).unwrap_or(now),
            updated_at: now,
            tags: current.map(|w| w.tags.clone()).unwrap_or_default(),
            is_public: current.map(|w| w.is_public).unwrap_or(false),
        }
    }

    pub fn stats(&self) -> WorkflowStats {
        WorkflowStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            selected_count: self.selection.len(),
        }
    }

    /// Quick check used to enable the run button
    pub fn is_runnable(&self) -> bool {
        self.nodes.iter().any(|n| n.node_type() == NodeType::Input)
    }

    /// Full structural validation of the canvas
    pub fn validate(&self) -> ValidationOutcome {
        check_workflow(&self.nodes, &self.edges)
    }

    fn node_mut(&mut self, node_id: &str) -> Result<&mut WorkflowNode> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or_else(|| WorkflowEngineError::NodeNotFound(node_id.to_string()))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            viewport: self.viewport,
        }
    }

    fn record(&mut self, action: HistoryAction) -> Result<()> {
        let snapshot = self.snapshot();
        self.history.record(action, &snapshot)
    }

    /// Selection is not part of a snapshot and is left alone
    fn restore(&mut self, snapshot: Snapshot) {
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
        self.viewport = snapshot.viewport;
    }
}
