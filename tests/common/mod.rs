//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint_dag_editor::{DagEditorController, Edge, GraphSnapshot, NodeChange, NodeSnapshot};
use std::cell::RefCell;
use std::rc::Rc;

/// Arguments of one `on_graph_change` call.
#[derive(Debug, Clone)]
pub struct GraphChangeCall {
    pub graph: GraphSnapshot,
    pub node: Option<NodeSnapshot>,
    pub edges: Vec<Edge>,
}

/// Tracks callback invocations for testing.
///
/// Each field records calls to the corresponding callback with their arguments.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    pub graph_changes: Rc<RefCell<Vec<GraphChangeCall>>>,
    /// (node_id, change)
    pub node_changes: Rc<RefCell<Vec<(String, NodeChange)>>>,
    /// Callback names in call order, e.g. `["graph", "title"]`.
    pub order: Rc<RefCell<Vec<String>>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install recording callbacks on `ctrl`.
    pub fn attach(&self, ctrl: &DagEditorController) {
        let graph_changes = self.graph_changes.clone();
        let order = self.order.clone();
        ctrl.set_on_graph_change(move |graph, node, edges| {
            graph_changes.borrow_mut().push(GraphChangeCall {
                graph: graph.clone(),
                node: node.cloned(),
                edges: edges.to_vec(),
            });
            order.borrow_mut().push("graph".to_string());
            Ok(())
        });

        let node_changes = self.node_changes.clone();
        let order = self.order.clone();
        ctrl.set_on_node_change(move |node_id, change| {
            node_changes.borrow_mut().push((node_id.to_string(), change.clone()));
            order.borrow_mut().push(change.kind().to_string());
            Ok(())
        });
    }

    pub fn graph_change_count(&self) -> usize {
        self.graph_changes.borrow().len()
    }

    pub fn last_graph_change(&self) -> Option<GraphChangeCall> {
        self.graph_changes.borrow().last().cloned()
    }

    /// Clear all recorded callbacks.
    pub fn clear(&self) {
        self.graph_changes.borrow_mut().clear();
        self.node_changes.borrow_mut().clear();
        self.order.borrow_mut().clear();
    }
}
