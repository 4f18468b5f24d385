//! Graph data model: nodes, edges and view state.
//!
//! [`Graph`] is plain data with read selectors. It is owned by
//! [`GraphStore`](crate::store::GraphStore), which is the only place that
//! mutates it, so every change can be paired with a notification.

use crate::catalogue::{MenuItem, NodeTypeConfig};
use crate::viewport::{Point, Viewport};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Opaque per-node key/value payload.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// A node on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub node_type: String,
    pub title: String,
    /// World-space top-left corner.
    pub position: Point,
    pub payload: Payload,
    /// Resolved from the type catalogue; never part of the host snapshot.
    pub allow_multiple_inputs: bool,
    /// Resolved from the type catalogue; never part of the host snapshot.
    pub menu_items: Vec<MenuItem>,
}

impl Node {
    /// Build a node, resolving the internal-only fields from `config`.
    pub fn from_config(
        id: String,
        config: &NodeTypeConfig,
        title: String,
        position: Point,
        payload: Payload,
    ) -> Self {
        Self {
            id,
            node_type: config.id.clone(),
            title,
            position,
            payload,
            allow_multiple_inputs: config.allow_multiple_inputs,
            menu_items: config.menu_items.clone(),
        }
    }
}

/// A directed edge from `source_node_id` (output side) to `target_node_id` (input side).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source_node_id: impl Into<String>,
        target_node_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_node_id: source_node_id.into(),
            target_node_id: target_node_id.into(),
        }
    }

    /// True if either endpoint is `node_id`.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source_node_id == node_id || self.target_node_id == node_id
    }
}

/// Nodes, edges and view state. Insertion order of nodes and edges is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub(crate) nodes: IndexMap<String, Node>,
    pub(crate) edges: IndexMap<String, Edge>,
    pub(crate) view: Viewport,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn view(&self) -> &Viewport {
        &self.view
    }

    /// Check if an edge with this exact (source, target) direction exists.
    pub fn has_edge_between(&self, source: &str, target: &str) -> bool {
        self.edges
            .values()
            .any(|e| e.source_node_id == source && e.target_node_id == target)
    }

    /// Edges whose target is `node_id`.
    pub fn incoming(&self, node_id: &str) -> impl Iterator<Item = &Edge> + '_ {
        let node_id = node_id.to_owned();
        self.edges
            .values()
            .filter(move |e| e.target_node_id == node_id)
    }

    /// Edges whose source is `node_id`.
    pub fn outgoing(&self, node_id: &str) -> impl Iterator<Item = &Edge> + '_ {
        let node_id = node_id.to_owned();
        self.edges
            .values()
            .filter(move |e| e.source_node_id == node_id)
    }

    /// Ids of all edges with `node_id` as source or target.
    pub fn edges_touching(&self, node_id: &str) -> Vec<String> {
        self.edges
            .values()
            .filter(|e| e.touches(node_id))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Adjacency list over outgoing edges, keyed by source node id.
    pub fn successors(&self) -> HashMap<&str, Vec<&str>> {
        let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
        for e in self.edges.values() {
            adj.entry(e.source_node_id.as_str())
                .or_default()
                .push(e.target_node_id.as_str());
        }
        adj
    }

    /// Whether a directed path `from -> ... -> to` exists over the current edges.
    ///
    /// Iterative depth-first search following outgoing edges. The visited set
    /// only prunes nodes whose successors were already explored; reaching a
    /// visited node again (e.g. the join of a diamond) just stops that branch.
    pub fn is_reachable(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        let adj = self.successors();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for &next in adj.get(current).map(Vec::as_slice).unwrap_or_default() {
                if next == to {
                    return true;
                }
                if !visited.contains(next) {
                    stack.push(next);
                }
            }
        }
        false
    }

    // Raw mutators, used by the store after it has checked preconditions.

    pub(crate) fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge) {
        self.edges.insert(edge.id.clone(), edge);
    }

    pub(crate) fn take_node(&mut self, id: &str) -> Option<Node> {
        self.nodes.shift_remove(id)
    }

    pub(crate) fn take_edge(&mut self, id: &str) -> Option<Edge> {
        self.edges.shift_remove(id)
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Remove every edge touching `node_id`, returning them in graph order.
    pub(crate) fn take_edges_touching(&mut self, node_id: &str) -> Vec<Edge> {
        let ids = self.edges_touching(node_id);
        ids.iter().filter_map(|id| self.take_edge(id)).collect()
    }

    pub(crate) fn set_view(&mut self, view: Viewport) {
        self.view = view;
    }
}
