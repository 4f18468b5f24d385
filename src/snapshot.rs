//! Host-facing graph snapshots and eager ingestion validation.
//!
//! A [`GraphSnapshot`] carries only the fields a host cares about. Internal
//! fields (input capacity, menu items) are re-resolved from the
//! [`NodeTypeCatalogue`] when a snapshot is ingested via [`build_graph`],
//! which reports every problem it finds at once instead of stopping at the
//! first.

use crate::catalogue::NodeTypeCatalogue;
use crate::graph::{Edge, Graph, Node, Payload};
use crate::validate::{validate_connection, RejectReason};
use crate::viewport::{Point, Viewport};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A node as seen by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub title: String,
    pub position: Point,
    #[serde(default)]
    pub payload: Payload,
}

impl From<&Node> for NodeSnapshot {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            node_type: node.node_type.clone(),
            title: node.title.clone(),
            position: node.position,
            payload: node.payload.clone(),
        }
    }
}

/// Nodes, edges and view state in host shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<NodeSnapshot>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub view: Viewport,
}

impl GraphSnapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&Graph> for GraphSnapshot {
    fn from(graph: &Graph) -> Self {
        Self {
            nodes: graph.nodes().map(NodeSnapshot::from).collect(),
            edges: graph.edges().cloned().collect(),
            view: *graph.view(),
        }
    }
}

/// One problem found while ingesting a snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotProblem {
    #[error("duplicate node id '{0}'")]
    DuplicateNodeId(String),
    #[error("node '{node_id}' has unknown type '{node_type}'")]
    UnknownNodeType { node_id: String, node_type: String },
    #[error("duplicate edge id '{0}'")]
    DuplicateEdgeId(String),
    #[error("edge '{edge_id}' references missing node '{node_id}'")]
    DanglingEdge { edge_id: String, node_id: String },
    #[error("edge '{edge_id}' rejected: {reason}")]
    InvalidEdge { edge_id: String, reason: RejectReason },
    #[error("zoom {0} is not a positive finite number")]
    InvalidZoom(f32),
}

/// Every problem found in a rejected snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid graph snapshot ({} problem(s)){}", .problems.len(), bullet_list(.problems))]
pub struct SnapshotError {
    pub problems: Vec<SnapshotProblem>,
}

fn bullet_list(problems: &[SnapshotProblem]) -> String {
    problems.iter().map(|p| format!("\n  - {p}")).collect()
}

/// Build a [`Graph`] from a host snapshot, resolving node types against `catalogue`.
///
/// Edges are replayed in order through the connection validator, so the
/// result satisfies the same invariants (no self-loops, no duplicate pairs,
/// input capacity, acyclicity) as a graph built through the store.
pub fn build_graph(
    snapshot: &GraphSnapshot,
    catalogue: &NodeTypeCatalogue,
) -> Result<Graph, SnapshotError> {
    let mut problems = Vec::new();
    let mut graph = Graph::new();

    if !(snapshot.view.zoom > 0.0 && snapshot.view.zoom.is_finite()) {
        problems.push(SnapshotProblem::InvalidZoom(snapshot.view.zoom));
    }
    graph.set_view(snapshot.view);

    for n in &snapshot.nodes {
        if graph.contains_node(&n.id) {
            problems.push(SnapshotProblem::DuplicateNodeId(n.id.clone()));
            continue;
        }
        let Some(config) = catalogue.get(&n.node_type) else {
            problems.push(SnapshotProblem::UnknownNodeType {
                node_id: n.id.clone(),
                node_type: n.node_type.clone(),
            });
            continue;
        };
        graph.insert_node(Node::from_config(
            n.id.clone(),
            config,
            n.title.clone(),
            n.position,
            n.payload.clone(),
        ));
    }

    // Node ids that appear in the snapshot at all, valid or not. Edges to a
    // node that was rejected above are not reported again as dangling.
    let declared: HashSet<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut edge_ids: HashSet<&str> = HashSet::new();

    for e in &snapshot.edges {
        if !edge_ids.insert(e.id.as_str()) {
            problems.push(SnapshotProblem::DuplicateEdgeId(e.id.clone()));
            continue;
        }
        let mut dangling = false;
        for endpoint in [&e.source_node_id, &e.target_node_id] {
            if !declared.contains(endpoint.as_str()) {
                problems.push(SnapshotProblem::DanglingEdge {
                    edge_id: e.id.clone(),
                    node_id: endpoint.clone(),
                });
                dangling = true;
            }
        }
        if dangling
            || !graph.contains_node(&e.source_node_id)
            || !graph.contains_node(&e.target_node_id)
        {
            continue;
        }
        match validate_connection(&e.source_node_id, &e.target_node_id, &graph).into_result() {
            Ok(()) => graph.insert_edge(e.clone()),
            Err(reason) => problems.push(SnapshotProblem::InvalidEdge {
                edge_id: e.id.clone(),
                reason,
            }),
        }
    }

    if problems.is_empty() {
        Ok(graph)
    } else {
        Err(SnapshotError { problems })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::NodeTypeConfig;
    use slint::Color;

    fn catalogue() -> NodeTypeCatalogue {
        [
            NodeTypeConfig::new("a", "A", Color::from_rgb_u8(1, 1, 1)),
            NodeTypeConfig::new("m", "M", Color::from_rgb_u8(2, 2, 2)).with_multiple_inputs(true),
        ]
        .into_iter()
        .collect()
    }

    fn node(id: &str, ty: &str) -> NodeSnapshot {
        NodeSnapshot {
            id: id.into(),
            node_type: ty.into(),
            title: id.into(),
            position: Point::ORIGIN,
            payload: Payload::new(),
        }
    }

    #[test]
    fn test_build_graph_resolves_internal_fields() {
        let snap = GraphSnapshot {
            nodes: vec![node("n1", "a"), node("n2", "m")],
            edges: vec![Edge::new("e1", "n1", "n2")],
            view: Viewport::new(1.5, 10.0, 20.0),
        };
        let graph = build_graph(&snap, &catalogue()).unwrap();
        assert!(!graph.node("n1").unwrap().allow_multiple_inputs);
        assert!(graph.node("n2").unwrap().allow_multiple_inputs);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.view().zoom, 1.5);
    }

    #[test]
    fn test_build_graph_reports_all_problems() {
        let snap = GraphSnapshot {
            nodes: vec![node("n1", "a"), node("n1", "a"), node("n2", "nope"), node("n3", "a")],
            edges: vec![
                Edge::new("e1", "n1", "n3"),
                Edge::new("e1", "n3", "n1"),
                Edge::new("e2", "n1", "ghost"),
                Edge::new("e3", "n3", "n1"),
                Edge::new("e4", "n1", "n1"),
            ],
            view: Viewport::new(0.0, 0.0, 0.0),
        };
        let err = build_graph(&snap, &catalogue()).unwrap_err();
        assert_eq!(
            err.problems,
            vec![
                SnapshotProblem::InvalidZoom(0.0),
                SnapshotProblem::DuplicateNodeId("n1".into()),
                SnapshotProblem::UnknownNodeType { node_id: "n2".into(), node_type: "nope".into() },
                SnapshotProblem::DuplicateEdgeId("e1".into()),
                SnapshotProblem::DanglingEdge { edge_id: "e2".into(), node_id: "ghost".into() },
                SnapshotProblem::InvalidEdge {
                    edge_id: "e3".into(),
                    reason: RejectReason::Cycle { source_id: "n3".into(), target_id: "n1".into() },
                },
                SnapshotProblem::InvalidEdge {
                    edge_id: "e4".into(),
                    reason: RejectReason::SelfLoop("n1".into()),
                },
            ]
        );
    }

    #[test]
    fn test_build_graph_rejects_capacity_violation() {
        let snap = GraphSnapshot {
            nodes: vec![node("x", "a"), node("y", "a"), node("t", "a")],
            edges: vec![Edge::new("e1", "x", "t"), Edge::new("e2", "y", "t")],
            view: Viewport::default(),
        };
        let err = build_graph(&snap, &catalogue()).unwrap_err();
        assert_eq!(err.problems.len(), 1);
        assert!(matches!(
            &err.problems[0],
            SnapshotProblem::InvalidEdge { reason: RejectReason::InputCapacityExceeded(t), .. } if t == "t"
        ));
    }

    #[test]
    fn test_edges_to_rejected_nodes_are_not_double_reported() {
        let snap = GraphSnapshot {
            nodes: vec![node("n1", "a"), node("n2", "nope")],
            edges: vec![Edge::new("e1", "n1", "n2")],
            view: Viewport::default(),
        };
        let err = build_graph(&snap, &catalogue()).unwrap_err();
        assert_eq!(err.problems.len(), 1);
    }

    #[test]
    fn test_snapshot_error_display_lists_problems() {
        let err = SnapshotError {
            problems: vec![
                SnapshotProblem::DuplicateNodeId("n1".into()),
                SnapshotProblem::DuplicateEdgeId("e1".into()),
            ],
        };
        assert_eq!(
            err.to_string(),
            "invalid graph snapshot (2 problem(s))\n  - duplicate node id 'n1'\n  - duplicate edge id 'e1'"
        );
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut payload = Payload::new();
        payload.insert("k".into(), serde_json::json!(1));
        let snap = GraphSnapshot {
            nodes: vec![NodeSnapshot { payload, ..node("n1", "a") }],
            edges: vec![Edge::new("e1", "n1", "n2")],
            view: Viewport::default(),
        };
        let value = serde_json::to_value(&snap).unwrap();
        assert_eq!(value["nodes"][0]["type"], "a");
        assert_eq!(value["nodes"][0]["payload"]["k"], 1);
        assert_eq!(value["edges"][0]["sourceNodeId"], "n1");
        assert_eq!(value["edges"][0]["targetNodeId"], "n2");
        assert!(value["nodes"][0].get("allowMultipleInputs").is_none());
    }

    #[test]
    fn test_from_json_defaults() {
        let snap = GraphSnapshot::from_json(
            r#"{"nodes":[{"id":"n1","type":"a","title":"N","position":{"x":1,"y":2}}]}"#,
        )
        .unwrap();
        assert_eq!(snap.nodes[0].position, Point::new(1.0, 2.0));
        assert!(snap.nodes[0].payload.is_empty());
        assert!(snap.edges.is_empty());
        assert_eq!(snap.view, Viewport::default());
    }
}
