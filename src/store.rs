//! The graph store: sole owner of the [`Graph`] and its mutation operations.
//!
//! Every successful mutation queues one or more [`Notification`]s captured
//! after the change was applied. The store never calls host code itself;
//! the owner drains the queue with [`GraphStore::take_notifications`] and
//! hands it to [`Callbacks::dispatch`](crate::notify::Callbacks::dispatch)
//! once it no longer holds the store borrowed. Failed operations leave both
//! the graph and the queue untouched.

use crate::catalogue::{NodeTypeCatalogue, NodeTypeConfig};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::graph::{Edge, Graph, Node, Payload};
use crate::ids::IdGenerator;
use crate::notify::{NodeChange, Notification};
use crate::snapshot::{build_graph, GraphSnapshot, NodeSnapshot};
use crate::validate::{ConnectionRule, ConnectionValidator, ValidationResult};
use crate::viewport::{Point, Viewport, ZoomBounds};

/// Partial node update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    pub title: Option<String>,
    pub payload: Option<Payload>,
}

impl NodeUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            payload: None,
        }
    }

    pub fn payload(payload: Payload) -> Self {
        Self {
            title: None,
            payload: Some(payload),
        }
    }
}

#[derive(Debug)]
pub struct GraphStore {
    graph: Graph,
    catalogue: NodeTypeCatalogue,
    validator: ConnectionValidator,
    node_ids: IdGenerator,
    edge_ids: IdGenerator,
    zoom_bounds: ZoomBounds,
    duplicate_offset: Point,
    pending: Vec<Notification>,
}

impl GraphStore {
    /// Empty store using default settings.
    pub fn new(catalogue: NodeTypeCatalogue) -> Self {
        let defaults = EditorConfig::default();
        Self {
            graph: Graph::new(),
            catalogue,
            validator: ConnectionValidator::new(),
            node_ids: IdGenerator::new("node"),
            edge_ids: IdGenerator::new("edge"),
            zoom_bounds: defaults.zoom_bounds,
            duplicate_offset: defaults.duplicate_offset,
            pending: Vec::new(),
        }
    }

    /// Build a store from host configuration, ingesting the initial graph if any.
    ///
    /// Ingesting the initial graph does not queue a notification.
    pub fn from_config(config: &EditorConfig) -> Result<Self> {
        config.check()?;
        let mut store = Self::new(config.catalogue());
        store.zoom_bounds = config.zoom_bounds;
        store.duplicate_offset = config.duplicate_offset;
        if let Some(snapshot) = &config.initial_graph {
            store.graph = build_graph(snapshot, &store.catalogue)?;
            let view = store.graph.view;
            store.graph.set_view(view.with_zoom(view.zoom, &store.zoom_bounds));
        }
        Ok(store)
    }

    // === Selectors ===

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.graph.node(id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.graph.edge(id)
    }

    pub fn viewport(&self) -> &Viewport {
        self.graph.view()
    }

    pub fn zoom_bounds(&self) -> &ZoomBounds {
        &self.zoom_bounds
    }

    pub fn catalogue(&self) -> &NodeTypeCatalogue {
        &self.catalogue
    }

    /// Host-facing snapshot of the current graph.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::from(&self.graph)
    }

    /// Validate a proposed connection against the current graph without mutating it.
    pub fn validate(&self, source: &str, target: &str) -> ValidationResult {
        self.validator.validate(source, target, &self.graph)
    }

    // === Configuration ===

    /// Register a node type at runtime. Existing nodes keep their resolved fields.
    pub fn register_node_type(&mut self, config: NodeTypeConfig) {
        self.catalogue.register(config);
    }

    /// Append a host-defined connection rule, checked after the standard rules.
    pub fn add_connection_rule<R: ConnectionRule + 'static>(&mut self, rule: R) {
        self.validator.push(rule);
    }

    /// Drain queued notifications in the order their mutations happened.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    fn notify_graph(&mut self, node: Option<NodeSnapshot>, edges: Vec<Edge>) {
        self.pending.push(Notification::GraphChanged {
            graph: GraphSnapshot::from(&self.graph),
            node,
            edges,
        });
    }

    fn notify_node(&mut self, node_id: &str, change: NodeChange) {
        self.pending.push(Notification::NodeChanged {
            node_id: node_id.to_owned(),
            change,
        });
    }

    fn existing_node(&self, id: &str) -> Result<&Node> {
        self.graph
            .node(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.to_owned()))
    }

    fn fresh_node_id(&mut self) -> String {
        let graph = &self.graph;
        self.node_ids.next_id(|id| graph.contains_node(id))
    }

    // === Node operations ===

    /// Append a node of `node_type` at `position`.
    ///
    /// Unknown types are accepted and resolve to a single-input fallback. The
    /// title defaults to the type's label.
    pub fn add_node(&mut self, node_type: &str, position: Point, title: Option<&str>) -> Node {
        if !self.catalogue.contains(node_type) {
            tracing::warn!(node_type, "adding node of unknown type, using fallback config");
        }
        let config = self.catalogue.resolve(node_type);
        let id = self.fresh_node_id();
        let title = title.map(str::to_owned).unwrap_or_else(|| config.label.clone());
        let node = Node::from_config(id, &config, title, position, Payload::new());

        self.graph.insert_node(node.clone());
        tracing::debug!(node_id = %node.id, node_type, "node added");
        self.notify_graph(Some(NodeSnapshot::from(&node)), Vec::new());
        node
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<(Node, Vec<Edge>)> {
        self.existing_node(id)?;
        let removed_edges = self.graph.take_edges_touching(id);
        let node = self
            .graph
            .take_node(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.to_owned()))?;

        tracing::debug!(node_id = id, edges = removed_edges.len(), "node removed");
        self.notify_graph(Some(NodeSnapshot::from(&node)), removed_edges.clone());
        Ok((node, removed_edges))
    }

    /// Shallow-merge title and/or payload into a node.
    ///
    /// An empty update is a no-op and queues nothing.
    pub fn update_node(&mut self, id: &str, update: NodeUpdate) -> Result<()> {
        self.existing_node(id)?;
        if update == NodeUpdate::default() {
            return Ok(());
        }

        let mut changes = Vec::new();
        if let Some(node) = self.graph.node_mut(id) {
            if let Some(title) = update.title {
                node.title = title.clone();
                changes.push(NodeChange::Title(title));
            }
            if let Some(payload) = update.payload {
                node.payload = payload.clone();
                changes.push(NodeChange::Payload(payload));
            }
        }

        tracing::debug!(node_id = id, fields = changes.len(), "node updated");
        let snapshot = self.graph.node(id).map(NodeSnapshot::from);
        self.notify_graph(snapshot, Vec::new());
        for change in changes {
            self.notify_node(id, change);
        }
        Ok(())
    }

    /// Set a node's world position.
    pub fn move_node(&mut self, id: &str, position: Point) -> Result<()> {
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.to_owned()))?;
        node.position = position;

        tracing::debug!(node_id = id, x = position.x, y = position.y, "node moved");
        let snapshot = self.graph.node(id).map(NodeSnapshot::from);
        self.notify_graph(snapshot, Vec::new());
        self.notify_node(id, NodeChange::Position(position));
        Ok(())
    }

    /// Copy a node: same type and payload, offset position, title suffixed " (copy)".
    /// Edges are not copied.
    pub fn duplicate_node(&mut self, id: &str) -> Result<Node> {
        let original = self.existing_node(id)?.clone();
        let new_id = self.fresh_node_id();
        let copy = Node {
            id: new_id,
            title: format!("{} (copy)", original.title),
            position: original.position + self.duplicate_offset,
            ..original
        };

        self.graph.insert_node(copy.clone());
        tracing::debug!(node_id = id, copy_id = %copy.id, "node duplicated");
        self.notify_graph(Some(NodeSnapshot::from(&copy)), Vec::new());
        Ok(copy)
    }

    /// Remove every edge touching a node, keeping the node.
    pub fn disconnect_all(&mut self, id: &str) -> Result<Vec<Edge>> {
        self.existing_node(id)?;
        let removed = self.graph.take_edges_touching(id);

        tracing::debug!(node_id = id, edges = removed.len(), "node disconnected");
        let snapshot = self.graph.node(id).map(NodeSnapshot::from);
        self.notify_graph(snapshot, removed.clone());
        Ok(removed)
    }

    // === Edge operations ===

    /// Validate and append an edge `source -> target`.
    ///
    /// On rejection the graph is unchanged and nothing is queued.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<Edge> {
        if let ValidationResult::Invalid(reason) = self.validate(source, target) {
            tracing::info!(source, target, %reason, "connection rejected");
            return Err(EditorError::Rejected(reason));
        }

        let graph = &self.graph;
        let id = self.edge_ids.next_id(|id| graph.edge(id).is_some());
        let edge = Edge::new(id, source, target);
        self.graph.insert_edge(edge.clone());

        tracing::debug!(edge_id = %edge.id, source, target, "edge added");
        self.notify_graph(None, vec![edge.clone()]);
        Ok(edge)
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<Edge> {
        let edge = self
            .graph
            .take_edge(id)
            .ok_or_else(|| EditorError::EdgeNotFound(id.to_owned()))?;

        tracing::debug!(edge_id = id, "edge removed");
        self.notify_graph(None, vec![edge.clone()]);
        Ok(edge)
    }

    // === View operations ===

    /// Replace the view state, clamping zoom to the configured bounds.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Viewport {
        self.apply_view(viewport.with_zoom(viewport.zoom, &self.zoom_bounds))
    }

    /// Zoom towards a screen-space pointer, keeping the world point under it fixed.
    pub fn zoom_at(&mut self, pointer: Point, zoom: f32) -> Viewport {
        let view = self.graph.view.zoom_at(pointer, zoom, &self.zoom_bounds);
        self.apply_view(view)
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) -> Viewport {
        let view = self.graph.view.pan_by(dx, dy);
        self.apply_view(view)
    }

    fn apply_view(&mut self, view: Viewport) -> Viewport {
        self.graph.set_view(view);
        tracing::debug!(zoom = view.zoom, pan_x = view.pan.x, pan_y = view.pan.y, "viewport changed");
        self.notify_graph(None, Vec::new());
        view
    }

    // === Bulk ===

    /// Replace the whole graph with a host snapshot after validating it.
    ///
    /// On error the current graph is kept and every problem is reported.
    pub fn load_snapshot(&mut self, snapshot: &GraphSnapshot) -> Result<()> {
        let mut graph = build_graph(snapshot, &self.catalogue)?;
        let view = graph.view;
        graph.set_view(view.with_zoom(view.zoom, &self.zoom_bounds));
        self.graph = graph;

        tracing::debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "graph loaded"
        );
        self.notify_graph(None, Vec::new());
        Ok(())
    }
}
