//! High-level controller tying the store, the connection gesture and host
//! callbacks together.
//!
//! The [`DagEditorController`] is what a Slint window talks to. It owns the
//! [`GraphStore`] and the [`ConnectionGesture`] behind shared handles, converts
//! screen coordinates coming from the UI, and dispatches host notifications
//! once each mutation has been applied.
//!
//! # Example
//!
//! ```ignore
//! use slint_dag_editor::{DagEditorController, EditorConfig};
//!
//! slint::include_modules!();
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let window = MainWindow::new()?;
//!     let ctrl = DagEditorController::new(EditorConfig::from_json(CONFIG)?)?;
//!
//!     ctrl.set_on_graph_change(|graph, _node, _edges| {
//!         save(graph);
//!         Ok(())
//!     });
//!
//!     // Gesture wiring - controller handles the logic
//!     window.on_connection_started(ctrl.connection_started_callback());
//!     window.on_pointer_moved(ctrl.pointer_moved_callback());
//!     window.on_connection_released(ctrl.connection_released_callback());
//!     window.on_connection_cancelled(ctrl.connection_cancelled_callback());
//!     window.on_zoom_at(ctrl.zoom_at_callback());
//!
//!     // Rendering
//!     window.on_compute_edge_path(ctrl.edge_path_callback());
//!     window.on_compute_preview_path(ctrl.preview_path_callback());
//!
//!     window.run()?;
//!     Ok(())
//! }
//! ```

use crate::catalogue::{MenuItem, NodeTypeConfig};
use crate::config::{EditorConfig, NodeFootprint};
use crate::edge_paths::{compute_edge_paths, edge_path, preview_path, EdgePath, EdgePathModel};
use crate::error::{GestureError, Result};
use crate::gesture::{ConnectionGesture, ConnectionOutcome};
use crate::graph::{Edge, Graph, Node};
use crate::hit_test::{find_node_at, find_port_at, PortRole};
use crate::notify::{CallbackResult, Callbacks, NodeChange, Notification};
use crate::snapshot::{GraphSnapshot, NodeSnapshot};
use crate::store::{GraphStore, NodeUpdate};
use crate::validate::{ConnectionRule, ValidationResult};
use crate::viewport::{Point, Viewport};
use slint::{Color, SharedString, VecModel};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone)]
struct RenderSettings {
    footprint: NodeFootprint,
    bezier_offset: f32,
    port_hit_radius: f32,
    canvas_menu_items: Vec<MenuItem>,
}

/// Controller that owns the editor state and provides callback implementations.
///
/// This provides a high-level API that handles:
/// - Graph mutations with validation and host notification
/// - The drag-to-connect gesture (screen-space input, world-space internals)
/// - Viewport zoom/pan
/// - Edge and preview path computation for rendering
///
/// Host callbacks run after the store borrow is released, so they may call
/// back into the controller. Notifications raised from inside a callback are
/// queued behind the ones still pending, so hosts see them in operation order.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct DagEditorController {
    store: Rc<RefCell<GraphStore>>,
    gesture: Rc<RefCell<ConnectionGesture>>,
    callbacks: Rc<RefCell<Callbacks>>,
    edge_model: Rc<RefCell<EdgePathModel>>,
    settings: Rc<RefCell<RenderSettings>>,
    pending: Rc<RefCell<VecDeque<Notification>>>,
    dispatching: Rc<Cell<bool>>,
}

impl std::fmt::Debug for DagEditorController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DagEditorController")
            .field("store", &self.store)
            .field("gesture", &self.gesture)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

impl DagEditorController {
    /// Create a controller from host configuration.
    ///
    /// Fails if the configuration is out of range or the initial graph does
    /// not pass validation.
    pub fn new(config: EditorConfig) -> Result<Self> {
        let store = GraphStore::from_config(&config)?;
        tracing::debug!(
            node_types = store.catalogue().len(),
            nodes = store.graph().node_count(),
            edges = store.graph().edge_count(),
            "editor initialized"
        );
        Ok(Self {
            store: Rc::new(RefCell::new(store)),
            gesture: Rc::new(RefCell::new(ConnectionGesture::new())),
            callbacks: Rc::new(RefCell::new(Callbacks::new())),
            edge_model: Rc::new(RefCell::new(EdgePathModel::new())),
            settings: Rc::new(RefCell::new(RenderSettings {
                footprint: config.footprint,
                bezier_offset: config.bezier_offset,
                port_hit_radius: config.port_hit_radius,
                canvas_menu_items: config.canvas_menu_items,
            })),
            pending: Rc::new(RefCell::new(VecDeque::new())),
            dispatching: Rc::new(Cell::new(false)),
        })
    }

    /// Create a controller from a JSON [`EditorConfig`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(EditorConfig::from_json(json)?)
    }

    // === Host callbacks ===

    pub fn set_on_graph_change<F>(&self, f: F)
    where
        F: Fn(&GraphSnapshot, Option<&NodeSnapshot>, &[Edge]) -> CallbackResult + 'static,
    {
        self.callbacks.borrow_mut().set_on_graph_change(f);
    }

    pub fn set_on_node_change<F>(&self, f: F)
    where
        F: Fn(&str, &NodeChange) -> CallbackResult + 'static,
    {
        self.callbacks.borrow_mut().set_on_node_change(f);
    }

    pub fn clear_callbacks(&self) {
        self.callbacks.borrow_mut().clear();
    }

    /// Move the store's notifications onto the pending queue and deliver it.
    ///
    /// Only the outermost call drains the queue. A call made from inside a
    /// callback just appends, so its notifications follow the ones the outer
    /// operation has not delivered yet. Neither the store nor the callback
    /// table is borrowed while host code runs.
    fn flush(&self) {
        let notifications = self.store.borrow_mut().take_notifications();
        if notifications.is_empty() {
            return;
        }
        self.sync_edge_model();
        self.pending.borrow_mut().extend(notifications);
        if self.dispatching.replace(true) {
            return;
        }
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(notification) = next else {
                break;
            };
            let callbacks = self.callbacks.borrow().clone();
            callbacks.dispatch(std::iter::once(notification));
        }
        self.dispatching.set(false);
    }

    // === Configuration ===

    pub fn register_node_type(&self, config: NodeTypeConfig) {
        self.store.borrow_mut().register_node_type(config);
    }

    /// Append a host-defined connection rule, checked after the standard rules.
    pub fn add_connection_rule<R: ConnectionRule + 'static>(&self, rule: R) {
        self.store.borrow_mut().add_connection_rule(rule);
    }

    /// Set the bezier curve offset for edge paths (default: 50.0).
    pub fn set_bezier_offset(&self, offset: f32) {
        self.settings.borrow_mut().bezier_offset = offset;
        self.sync_edge_model();
    }

    pub fn footprint(&self) -> NodeFootprint {
        self.settings.borrow().footprint
    }

    // === Queries ===

    /// Host-facing snapshot of the current graph.
    pub fn snapshot(&self) -> GraphSnapshot {
        self.store.borrow().snapshot()
    }

    pub fn node(&self, id: &str) -> Option<Node> {
        self.store.borrow().node(id).cloned()
    }

    pub fn edge(&self, id: &str) -> Option<Edge> {
        self.store.borrow().edge(id).cloned()
    }

    pub fn viewport(&self) -> Viewport {
        *self.store.borrow().viewport()
    }

    /// Run `f` against the current graph.
    pub fn with_graph<R>(&self, f: impl FnOnce(&Graph) -> R) -> R {
        f(self.store.borrow().graph())
    }

    /// Check a proposed connection without mutating anything.
    pub fn validate(&self, source: &str, target: &str) -> ValidationResult {
        self.store.borrow().validate(source, target)
    }

    /// Menu items of a node's type, empty for unknown nodes.
    pub fn node_menu_items(&self, id: &str) -> Vec<MenuItem> {
        self.store
            .borrow()
            .node(id)
            .map(|n| n.menu_items.clone())
            .unwrap_or_default()
    }

    pub fn canvas_menu_items(&self) -> Vec<MenuItem> {
        self.settings.borrow().canvas_menu_items.clone()
    }

    /// Id of the topmost node under a screen point.
    pub fn node_at(&self, x: f32, y: f32) -> Option<String> {
        let store = self.store.borrow();
        let world = store.viewport().to_world(Point::new(x, y));
        find_node_at(store.graph(), &self.settings.borrow().footprint, world).map(|n| n.id.clone())
    }

    // === Mutations ===

    pub fn add_node(&self, node_type: &str, position: Point, title: Option<&str>) -> Node {
        let node = self.store.borrow_mut().add_node(node_type, position, title);
        self.flush();
        node
    }

    /// Add a node at a screen position, e.g. where a canvas menu was opened.
    pub fn add_node_at_screen(&self, node_type: &str, x: f32, y: f32) -> Node {
        let world = self.viewport().to_world(Point::new(x, y));
        self.add_node(node_type, world, None)
    }

    /// Remove a node and its edges. Cancels a gesture started from it.
    pub fn remove_node(&self, id: &str) -> Result<(Node, Vec<Edge>)> {
        let removed = self.store.borrow_mut().remove_node(id)?;
        {
            let mut gesture = self.gesture.borrow_mut();
            if gesture.active().is_some_and(|a| a.source_node_id == id) {
                gesture.cancel();
            }
        }
        self.flush();
        Ok(removed)
    }

    pub fn update_node(&self, id: &str, update: NodeUpdate) -> Result<()> {
        let result = self.store.borrow_mut().update_node(id, update);
        self.flush();
        result
    }

    pub fn move_node(&self, id: &str, position: Point) -> Result<()> {
        let result = self.store.borrow_mut().move_node(id, position);
        self.flush();
        result
    }

    pub fn duplicate_node(&self, id: &str) -> Result<Node> {
        let result = self.store.borrow_mut().duplicate_node(id);
        self.flush();
        result
    }

    pub fn disconnect_all(&self, id: &str) -> Result<Vec<Edge>> {
        let result = self.store.borrow_mut().disconnect_all(id);
        self.flush();
        result
    }

    pub fn add_edge(&self, source: &str, target: &str) -> Result<Edge> {
        let result = self.store.borrow_mut().add_edge(source, target);
        self.flush();
        result
    }

    pub fn remove_edge(&self, id: &str) -> Result<Edge> {
        let result = self.store.borrow_mut().remove_edge(id);
        self.flush();
        result
    }

    /// Replace the graph. Any gesture in progress is cancelled on success.
    pub fn load_snapshot(&self, snapshot: &GraphSnapshot) -> Result<()> {
        self.store.borrow_mut().load_snapshot(snapshot)?;
        self.gesture.borrow_mut().cancel();
        self.flush();
        Ok(())
    }

    pub fn load_json(&self, json: &str) -> Result<()> {
        self.load_snapshot(&GraphSnapshot::from_json(json)?)
    }

    // === Connection gesture ===

    pub fn is_connecting(&self) -> bool {
        self.gesture.borrow().is_connecting()
    }

    /// Begin dragging a connection from a node's output port.
    pub fn start_connection(&self, node_id: &str) -> Result<()> {
        let origin = {
            let store = self.store.borrow();
            let node = store
                .node(node_id)
                .ok_or_else(|| GestureError::UnknownSource(node_id.to_owned()))?;
            self.settings.borrow().footprint.output_port(node.position)
        };
        self.gesture.borrow_mut().start(node_id, origin)?;
        Ok(())
    }

    /// Track the cursor in screen coordinates.
    pub fn pointer_moved(&self, x: f32, y: f32) {
        let view = self.viewport();
        self.gesture.borrow_mut().pointer_moved(Point::new(x, y), &view);
    }

    /// Finish the gesture on a known target node.
    pub fn release_on(&self, target_id: &str) -> ConnectionOutcome {
        let outcome = {
            let mut store = self.store.borrow_mut();
            self.gesture.borrow_mut().complete(target_id, &mut store)
        };
        self.flush();
        outcome
    }

    /// Finish the gesture at a screen point.
    ///
    /// Completes on the nearest input port within the hit radius, cancels otherwise.
    pub fn release_at_screen(&self, x: f32, y: f32) -> ConnectionOutcome {
        if !self.is_connecting() {
            return ConnectionOutcome::NotConnecting;
        }

        let target = {
            let store = self.store.borrow();
            let settings = self.settings.borrow();
            let view = store.viewport();
            find_port_at(
                store.graph(),
                &settings.footprint,
                PortRole::Input,
                view.to_world(Point::new(x, y)),
                view.screen_len_to_world(settings.port_hit_radius),
            )
            .map(|n| n.id.clone())
        };

        match target {
            Some(target_id) => self.release_on(&target_id),
            None => {
                self.gesture.borrow_mut().cancel();
                ConnectionOutcome::Cancelled
            }
        }
    }

    /// Abort the gesture. Returns `true` if one was in progress.
    pub fn cancel_connection(&self) -> bool {
        self.gesture.borrow_mut().cancel().is_some()
    }

    // === Viewport ===

    pub fn set_viewport(&self, zoom: f32, pan_x: f32, pan_y: f32) -> Viewport {
        let view = self.store.borrow_mut().set_viewport(Viewport::new(zoom, pan_x, pan_y));
        self.after_view_change(view)
    }

    /// Zoom towards a screen point, keeping the world point under it fixed.
    pub fn zoom_at(&self, x: f32, y: f32, zoom: f32) -> Viewport {
        let view = self.store.borrow_mut().zoom_at(Point::new(x, y), zoom);
        self.after_view_change(view)
    }

    pub fn pan_by(&self, dx: f32, dy: f32) -> Viewport {
        let view = self.store.borrow_mut().pan_by(dx, dy);
        self.after_view_change(view)
    }

    fn after_view_change(&self, view: Viewport) -> Viewport {
        self.gesture.borrow_mut().viewport_changed(&view);
        self.flush();
        view
    }

    // === Rendering ===

    /// Screen-space path of one edge. Empty for unknown ids.
    pub fn edge_path(&self, id: &str) -> SharedString {
        let store = self.store.borrow();
        let settings = self.settings.borrow();
        store
            .edge(id)
            .and_then(|edge| {
                edge_path(store.graph(), edge, &settings.footprint, settings.bezier_offset)
            })
            .unwrap_or_default()
            .into()
    }

    /// Screen-space path of the connection being dragged. Empty while idle.
    pub fn preview_path(&self) -> SharedString {
        let gesture = self.gesture.borrow();
        let Some(active) = gesture.active() else {
            return SharedString::default();
        };
        let store = self.store.borrow();
        preview_path(store.graph(), active, self.settings.borrow().bezier_offset).into()
    }

    /// Paths for all edges, colored by source node type.
    pub fn edge_paths(&self) -> Vec<EdgePath> {
        let store = self.store.borrow();
        let settings = self.settings.borrow();
        compute_edge_paths(
            store.graph(),
            store.catalogue(),
            &settings.footprint,
            settings.bezier_offset,
        )
    }

    /// Bind a Slint model that is refreshed after every change.
    ///
    /// `constructor` builds a row from (edge id, path commands, color).
    pub fn bind_edge_model<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(SharedString, SharedString, Color) -> P + 'static,
    {
        self.edge_model.borrow_mut().bind(model, constructor);
        self.sync_edge_model();
    }

    fn sync_edge_model(&self) {
        let model = self.edge_model.borrow();
        if model.is_bound() {
            model.sync(&self.edge_paths());
        }
    }

    // === Callback factories ===

    /// Returns a callback for `connection-started(node-id)`.
    pub fn connection_started_callback(&self) -> impl Fn(SharedString) {
        let ctrl = self.clone();
        move |node_id| {
            if let Err(err) = ctrl.start_connection(&node_id) {
                tracing::debug!(error = %err, "connection not started");
            }
        }
    }

    /// Returns a callback for `pointer-moved(x, y)`.
    pub fn pointer_moved_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| ctrl.pointer_moved(x, y)
    }

    /// Returns a callback for `connection-released(x, y)`.
    pub fn connection_released_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| {
            ctrl.release_at_screen(x, y);
        }
    }

    /// Returns a callback for `connection-cancelled()`.
    pub fn connection_cancelled_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || {
            ctrl.cancel_connection();
        }
    }

    /// Returns a callback for `zoom-at(x, y, zoom)`.
    pub fn zoom_at_callback(&self) -> impl Fn(f32, f32, f32) {
        let ctrl = self.clone();
        move |x, y, zoom| {
            ctrl.zoom_at(x, y, zoom);
        }
    }

    /// Returns a callback for `compute-edge-path(edge-id)`.
    pub fn edge_path_callback(&self) -> impl Fn(SharedString) -> SharedString {
        let ctrl = self.clone();
        move |id| ctrl.edge_path(&id)
    }

    /// Returns a callback for `compute-preview-path()`.
    pub fn preview_path_callback(&self) -> impl Fn() -> SharedString {
        let ctrl = self.clone();
        move || ctrl.preview_path()
    }
}
