mod common;

use std::sync::Arc;

use common::ScriptedExecutor;
use workflow_engine::{
    EngineConfig, ExecutionStatus, Position, ValidationError, WorkflowEdge, WorkflowEditor,
    WorkflowEngine, WorkflowEngineError, WorkflowNode,
};

#[tokio::test]
async fn edited_graph_runs_and_undo_breaks_it() {
    let config = EngineConfig::default();
    let mut editor = WorkflowEditor::new(&config).unwrap();
    editor
        .add_nodes([
            WorkflowNode::input("in", "Input"),
            WorkflowNode::processor("p", "Transform"),
            WorkflowNode::output("out", "Output"),
        ])
        .unwrap();
    editor.add_edge(WorkflowEdge::new("e1", "in", "p")).unwrap();
    editor.add_edge(WorkflowEdge::new("e2", "p", "out")).unwrap();
    editor
        .move_node("p", Position { x: 120.0, y: 40.0 })
        .unwrap();
    assert!(editor.validate().valid);
    assert!(editor.is_runnable());

    let (executor, _started) = ScriptedExecutor::new();
    let engine = WorkflowEngine::new(Arc::new(executor)).with_config(config);
    let result = engine
        .execute_workflow(editor.nodes(), editor.edges())
        .await
        .unwrap();
    assert_eq!(result.status, ExecutionStatus::Completed);

    // Back to before any edge existed: the processor is orphaned
    for _ in 0..3 {
        assert!(editor.undo().unwrap());
    }
    assert!(editor.edges().is_empty());
    assert!(editor.can_redo());

    let outcome = editor.validate();
    assert!(!outcome.valid);
    assert_eq!(outcome.error.as_deref(), Some("orphaned nodes found: Transform"));

    let err = engine
        .execute_workflow(editor.nodes(), editor.edges())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowEngineError::Validation(ValidationError::OrphanedNodes { .. })
    ));
    assert_eq!(engine.status(), ExecutionStatus::Idle);
}

#[test]
fn exported_workflow_reloads_into_a_fresh_editor() {
    let config = EngineConfig {
        history_limit: 5,
        ..Default::default()
    };
    let mut editor = WorkflowEditor::new(&config).unwrap();
    editor.add_node(WorkflowNode::input("in", "Input")).unwrap();
    editor.add_node(WorkflowNode::output("out", "Output")).unwrap();
    editor.add_edge(WorkflowEdge::new("e1", "in", "out")).unwrap();

    let json = serde_json::to_string(&editor.export_workflow()).unwrap();
    let workflow = serde_json::from_str(&json).unwrap();

    let mut reloaded = WorkflowEditor::new(&config).unwrap();
    reloaded.load_workflow(workflow).unwrap();
    assert_eq!(reloaded.nodes(), editor.nodes());
    assert_eq!(reloaded.edges(), editor.edges());
    assert!(!reloaded.can_undo());
    assert_eq!(reloaded.stats().node_count, 2);
}
