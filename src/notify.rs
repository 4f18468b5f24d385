//! Host notification plumbing.
//!
//! Mutations queue [`Notification`]s in the store; they are dispatched through
//! [`Callbacks`] after the mutation has been applied. Host callbacks are
//! fire-and-forget: an `Err` or a panic is logged and swallowed so it can
//! never unwind into the mutation that triggered it.

use crate::error::CallbackError;
use crate::graph::{Edge, Payload};
use crate::snapshot::{GraphSnapshot, NodeSnapshot};
use crate::viewport::Point;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

pub type CallbackResult = std::result::Result<(), CallbackError>;

/// `on_graph_change(graph, changed_node, changed_edges)`
pub type GraphChangeFn = dyn Fn(&GraphSnapshot, Option<&NodeSnapshot>, &[Edge]) -> CallbackResult;

/// `on_node_change(node_id, change)`
pub type NodeChangeFn = dyn Fn(&str, &NodeChange) -> CallbackResult;

/// A node-level field change.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    Title(String),
    Payload(Payload),
    Position(Point),
}

impl NodeChange {
    /// Field name as reported to hosts.
    pub fn kind(&self) -> &'static str {
        match self {
            NodeChange::Title(_) => "title",
            NodeChange::Payload(_) => "payload",
            NodeChange::Position(_) => "position",
        }
    }
}

/// A queued notification, captured at the moment its mutation was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    GraphChanged {
        graph: GraphSnapshot,
        node: Option<NodeSnapshot>,
        edges: Vec<Edge>,
    },
    NodeChanged {
        node_id: String,
        change: NodeChange,
    },
}

/// Late-bound host callbacks. Either may be unset.
#[derive(Clone, Default)]
pub struct Callbacks {
    on_graph_change: Option<Rc<GraphChangeFn>>,
    on_node_change: Option<Rc<NodeChangeFn>>,
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_graph_change", &self.on_graph_change.is_some())
            .field("on_node_change", &self.on_node_change.is_some())
            .finish()
    }
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the graph-change callback.
    pub fn set_on_graph_change<F>(&mut self, f: F)
    where
        F: Fn(&GraphSnapshot, Option<&NodeSnapshot>, &[Edge]) -> CallbackResult + 'static,
    {
        self.on_graph_change = Some(Rc::new(f));
    }

    /// Replace the node-change callback.
    pub fn set_on_node_change<F>(&mut self, f: F)
    where
        F: Fn(&str, &NodeChange) -> CallbackResult + 'static,
    {
        self.on_node_change = Some(Rc::new(f));
    }

    pub fn clear(&mut self) {
        self.on_graph_change = None;
        self.on_node_change = None;
    }

    /// Deliver notifications in order. Failures are logged and skipped.
    pub fn dispatch<I>(&self, notifications: I)
    where
        I: IntoIterator<Item = Notification>,
    {
        for notification in notifications {
            self.dispatch_one(&notification);
        }
    }

    fn dispatch_one(&self, notification: &Notification) {
        match notification {
            Notification::GraphChanged { graph, node, edges } => {
                if let Some(cb) = &self.on_graph_change {
                    guarded("on_graph_change", || cb(graph, node.as_ref(), edges));
                }
            }
            Notification::NodeChanged { node_id, change } => {
                if let Some(cb) = &self.on_node_change {
                    guarded("on_node_change", || cb(node_id, change));
                }
            }
        }
    }
}

fn guarded<F>(name: &str, f: F)
where
    F: FnOnce() -> CallbackResult,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::error!(callback = name, error = %err, "host callback failed"),
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(callback = name, panic = %msg, "host callback panicked");
        }
    }
}
