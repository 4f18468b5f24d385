//! Drag-to-connect gesture state machine.
//!
//! ```text
//!            start                     complete / cancel
//!   Idle ───────────► Connecting ──────────────────────► Idle
//!                      │      ▲
//!                      └──────┘ pointer_moved / viewport_changed
//! ```
//!
//! The gesture keeps the raw screen position of the cursor next to its world
//! position. A pan or zoom changes which world point sits under the same
//! pixel, so [`ConnectionGesture::viewport_changed`] recomputes the world
//! cursor from the stored screen point.

use crate::error::{EditorError, GestureError};
use crate::graph::Edge;
use crate::store::GraphStore;
use crate::validate::RejectReason;
use crate::viewport::{Point, Viewport};

/// An in-progress connection from a node's output port.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveConnection {
    pub source_node_id: String,
    /// World position the gesture started from (usually the output port).
    pub origin: Point,
    /// Last cursor position in screen space, if the pointer has moved yet.
    pub cursor_screen: Option<Point>,
    /// Current cursor position in world space.
    pub cursor_world: Point,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Connecting(ActiveConnection),
}

/// How a completed gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionOutcome {
    /// The edge was validated and inserted.
    Connected(Edge),
    /// The validator rejected the edge; the graph is unchanged.
    Rejected(RejectReason),
    /// Released away from any input port; the gesture was cancelled.
    Cancelled,
    /// No gesture was in progress.
    NotConnecting,
}

#[derive(Debug, Default)]
pub struct ConnectionGesture {
    state: GestureState,
}

impl ConnectionGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.state, GestureState::Connecting(_))
    }

    pub fn active(&self) -> Option<&ActiveConnection> {
        match &self.state {
            GestureState::Connecting(active) => Some(active),
            GestureState::Idle => None,
        }
    }

    /// Begin connecting from `source_node_id`'s output port at world position `origin`.
    ///
    /// A second start while a gesture is active is rejected and leaves the
    /// active gesture as it was.
    pub fn start(&mut self, source_node_id: &str, origin: Point) -> Result<(), GestureError> {
        if let GestureState::Connecting(active) = &self.state {
            return Err(GestureError::AlreadyConnecting(active.source_node_id.clone()));
        }
        tracing::debug!(source = source_node_id, "connection gesture started");
        self.state = GestureState::Connecting(ActiveConnection {
            source_node_id: source_node_id.to_owned(),
            origin,
            cursor_screen: None,
            cursor_world: origin,
        });
        Ok(())
    }

    /// Track the cursor. Ignored while idle.
    pub fn pointer_moved(&mut self, screen: Point, viewport: &Viewport) {
        if let GestureState::Connecting(active) = &mut self.state {
            active.cursor_screen = Some(screen);
            active.cursor_world = viewport.to_world(screen);
        }
    }

    /// Re-derive the world cursor after a pan/zoom change.
    pub fn viewport_changed(&mut self, viewport: &Viewport) {
        if let GestureState::Connecting(active) = &mut self.state {
            if let Some(screen) = active.cursor_screen {
                active.cursor_world = viewport.to_world(screen);
            }
        }
    }

    /// Abort the gesture. Returns the gesture that was cancelled, if any.
    pub fn cancel(&mut self) -> Option<ActiveConnection> {
        match std::mem::take(&mut self.state) {
            GestureState::Connecting(active) => {
                tracing::debug!(source = %active.source_node_id, "connection gesture cancelled");
                Some(active)
            }
            GestureState::Idle => None,
        }
    }

    /// Finish the gesture on `target_node_id`'s input port.
    ///
    /// Always returns to idle. The edge is inserted through
    /// [`GraphStore::add_edge`], which validates it first; a rejection is
    /// logged and reported without touching the graph.
    pub fn complete(&mut self, target_node_id: &str, store: &mut GraphStore) -> ConnectionOutcome {
        let GestureState::Connecting(active) = std::mem::take(&mut self.state) else {
            return ConnectionOutcome::NotConnecting;
        };

        match store.add_edge(&active.source_node_id, target_node_id) {
            Ok(edge) => ConnectionOutcome::Connected(edge),
            Err(EditorError::Rejected(reason)) => {
                tracing::info!(
                    source = %active.source_node_id,
                    target = target_node_id,
                    %reason,
                    "connection gesture dropped"
                );
                ConnectionOutcome::Rejected(reason)
            }
            Err(other) => {
                // add_edge only fails with a rejection; keep the gesture idle regardless.
                tracing::error!(error = %other, "unexpected error completing connection");
                ConnectionOutcome::Rejected(RejectReason::Custom(other.to_string()))
            }
        }
    }
}
