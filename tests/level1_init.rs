//! Level 1: Initialization Tests
//!
//! Tests controller construction from configuration and initial graph ingestion.

mod common;

use common::harness::{test_config, EditorHarness};
use slint_dag_editor::{
    DagEditorController, EditorConfig, EditorError, GraphSnapshot, RejectReason, SnapshotProblem,
};

const CONFIG_JSON: &str = r##"{
    "nodeTypes": [
        {"id": "source", "label": "Source", "color": "#64b4ff"},
        {"id": "merge", "label": "Merge", "color": "#ff6464", "allowMultipleInputs": true,
         "menuItems": [{"id": "split", "label": "Split inputs"}]}
    ],
    "initialGraph": {
        "nodes": [
            {"id": "n1", "type": "source", "title": "Left", "position": {"x": 0, "y": 0}},
            {"id": "n2", "type": "source", "title": "Right", "position": {"x": 0, "y": 200},
             "payload": {"rate": 44100}},
            {"id": "n3", "type": "merge", "title": "Mix", "position": {"x": 300, "y": 100}}
        ],
        "edges": [
            {"id": "e1", "sourceNodeId": "n1", "targetNodeId": "n3"},
            {"id": "e2", "sourceNodeId": "n2", "targetNodeId": "n3"}
        ],
        "view": {"zoom": 1.5, "pan": {"x": 10, "y": 20}}
    },
    "canvasMenuItems": [{"id": "add-source", "label": "Add source"}]
}"##;

fn snapshot(json: &str) -> GraphSnapshot {
    GraphSnapshot::from_json(json).unwrap()
}

fn problems_of(err: EditorError) -> Vec<SnapshotProblem> {
    match err {
        EditorError::Snapshot(e) => e.problems,
        other => panic!("expected snapshot error, got {:?}", other),
    }
}

#[test]
fn test_empty_config_starts_empty() {
    let ctrl = DagEditorController::new(EditorConfig::default()).unwrap();
    let snap = ctrl.snapshot();
    assert!(snap.nodes.is_empty());
    assert!(snap.edges.is_empty());
    assert_eq!(snap.view.zoom, 1.0);
    assert!(!ctrl.is_connecting());
}

#[test]
fn test_from_json_ingests_initial_graph() {
    let ctrl = DagEditorController::from_json(CONFIG_JSON).unwrap();
    let snap = ctrl.snapshot();

    assert_eq!(snap.nodes.len(), 3);
    assert_eq!(snap.edges.len(), 2);
    assert_eq!(snap.view.zoom, 1.5);
    assert_eq!(snap.view.pan.x, 10.0);
    assert_eq!(snap.nodes[1].payload["rate"], 44100);
}

#[test]
fn test_internal_fields_resolved_from_catalogue() {
    let ctrl = DagEditorController::from_json(CONFIG_JSON).unwrap();
    let merge = ctrl.node("n3").unwrap();
    assert!(merge.allow_multiple_inputs);
    assert_eq!(merge.menu_items[0].id, "split");
    assert!(!ctrl.node("n1").unwrap().allow_multiple_inputs);
    assert_eq!(ctrl.canvas_menu_items()[0].label, "Add source");
}

#[test]
fn test_initial_graph_does_not_notify() {
    let harness = EditorHarness::with_config(EditorConfig::from_json(CONFIG_JSON).unwrap());
    assert_eq!(harness.tracker.graph_change_count(), 0);
}

#[test]
fn test_fresh_ids_skip_host_ids() {
    let config = test_config().with_initial_graph(snapshot(
        r#"{"nodes": [{"id": "node-1", "type": "source", "title": "S", "position": {"x": 0, "y": 0}}]}"#,
    ));
    let ctrl = DagEditorController::new(config).unwrap();
    let added = ctrl.add_node("source", Default::default(), None);
    assert_ne!(added.id, "node-1");
}

#[test]
fn test_initial_zoom_is_clamped() {
    let config = test_config().with_initial_graph(snapshot(r#"{"view": {"zoom": 8.0}}"#));
    let ctrl = DagEditorController::new(config).unwrap();
    assert_eq!(ctrl.viewport().zoom, 2.0);
}

#[test]
fn test_invalid_snapshot_reports_every_problem() {
    let config = test_config().with_initial_graph(snapshot(
        r#"{
            "nodes": [
                {"id": "a", "type": "source", "title": "A", "position": {"x": 0, "y": 0}},
                {"id": "a", "type": "source", "title": "A again", "position": {"x": 0, "y": 0}},
                {"id": "b", "type": "unknown", "title": "B", "position": {"x": 0, "y": 0}},
                {"id": "c", "type": "filter", "title": "C", "position": {"x": 0, "y": 0}}
            ],
            "edges": [
                {"id": "e1", "sourceNodeId": "a", "targetNodeId": "ghost"},
                {"id": "e2", "sourceNodeId": "c", "targetNodeId": "c"},
                {"id": "e2", "sourceNodeId": "a", "targetNodeId": "c"}
            ],
            "view": {"zoom": 0}
        }"#,
    ));

    let problems = problems_of(DagEditorController::new(config).unwrap_err());
    assert!(problems.contains(&SnapshotProblem::DuplicateNodeId("a".into())));
    assert!(problems.contains(&SnapshotProblem::UnknownNodeType {
        node_id: "b".into(),
        node_type: "unknown".into(),
    }));
    assert!(problems.contains(&SnapshotProblem::DanglingEdge {
        edge_id: "e1".into(),
        node_id: "ghost".into(),
    }));
    assert!(problems.contains(&SnapshotProblem::InvalidEdge {
        edge_id: "e2".into(),
        reason: RejectReason::SelfLoop("c".into()),
    }));
    assert!(problems.contains(&SnapshotProblem::DuplicateEdgeId("e2".into())));
    assert!(problems.contains(&SnapshotProblem::InvalidZoom(0.0)));
}

#[test]
fn test_cyclic_snapshot_is_rejected() {
    let config = test_config().with_initial_graph(snapshot(
        r#"{
            "nodes": [
                {"id": "a", "type": "merge", "title": "A", "position": {"x": 0, "y": 0}},
                {"id": "b", "type": "merge", "title": "B", "position": {"x": 0, "y": 0}}
            ],
            "edges": [
                {"id": "e1", "sourceNodeId": "a", "targetNodeId": "b"},
                {"id": "e2", "sourceNodeId": "b", "targetNodeId": "a"}
            ]
        }"#,
    ));
    let problems = problems_of(DagEditorController::new(config).unwrap_err());
    assert_eq!(problems.len(), 1);
    assert!(matches!(
        problems[0],
        SnapshotProblem::InvalidEdge { reason: RejectReason::Cycle { .. }, .. }
    ));
}

#[test]
fn test_bad_config_json() {
    assert!(matches!(
        DagEditorController::from_json(r#"{"nodeTypes": 3}"#),
        Err(EditorError::Json(_))
    ));
    assert!(matches!(
        DagEditorController::from_json(r#"{"footprint": {"width": 0, "height": 10}}"#),
        Err(EditorError::Config(_))
    ));
}

#[test]
fn test_snapshot_json_shape() {
    let ctrl = DagEditorController::from_json(CONFIG_JSON).unwrap();
    let value: serde_json::Value = serde_json::from_str(&ctrl.snapshot().to_json().unwrap()).unwrap();

    let node = &value["nodes"][0];
    assert_eq!(node["type"], "source");
    assert!(node.get("allowMultipleInputs").is_none());
    assert!(node.get("menuItems").is_none());
    assert_eq!(value["edges"][0]["sourceNodeId"], "n1");
}
