//! Test harness with a small catalogue and callback tracking.

#![allow(dead_code)]

use super::CallbackTracker;
use slint::Color;
use slint_dag_editor::{DagEditorController, EditorConfig, Node, NodeTypeConfig, Point};

/// Catalogue used by the integration tests:
/// `source` and `filter` take a single input, `merge` takes many.
pub fn test_config() -> EditorConfig {
    EditorConfig::default()
        .with_node_type(NodeTypeConfig::new("source", "Source", Color::from_rgb_u8(100, 180, 255)))
        .with_node_type(NodeTypeConfig::new("filter", "Filter", Color::from_rgb_u8(180, 255, 100)))
        .with_node_type(
            NodeTypeConfig::new("merge", "Merge", Color::from_rgb_u8(255, 100, 100))
                .with_multiple_inputs(true),
        )
}

/// A controller wired to a [`CallbackTracker`].
pub struct EditorHarness {
    pub ctrl: DagEditorController,
    pub tracker: CallbackTracker,
}

impl EditorHarness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let ctrl = DagEditorController::new(config).expect("valid test config");
        let tracker = CallbackTracker::new();
        tracker.attach(&ctrl);
        Self { ctrl, tracker }
    }

    /// Add a node of `node_type` at `(x, y)` in world space.
    pub fn add(&self, node_type: &str, x: f32, y: f32) -> Node {
        self.ctrl.add_node(node_type, Point::new(x, y), None)
    }

    /// Add a row of `n` nodes spaced 300 units apart.
    pub fn add_row(&self, node_type: &str, n: usize) -> Vec<String> {
        (0..n)
            .map(|i| self.add(node_type, i as f32 * 300.0, 0.0).id)
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.ctrl.with_graph(|g| g.edge_count())
    }

    pub fn node_count(&self) -> usize {
        self.ctrl.with_graph(|g| g.node_count())
    }
}
