//! Host configuration.
//!
//! Everything here is plain data and can be loaded from JSON with
//! [`EditorConfig::from_json`]. Callbacks are wired separately through
//! [`Callbacks`](crate::notify::Callbacks) since they are not serializable.

use crate::catalogue::{MenuItem, NodeTypeCatalogue, NodeTypeConfig};
use crate::error::{EditorError, Result};
use crate::snapshot::GraphSnapshot;
use crate::viewport::{Point, ZoomBounds};
use serde::{Deserialize, Serialize};

/// Fixed node size in world units. The port positions derived from it must
/// match whatever size the presentation layer draws nodes at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeFootprint {
    pub width: f32,
    pub height: f32,
}

impl Default for NodeFootprint {
    fn default() -> Self {
        Self {
            width: 180.0,
            height: 60.0,
        }
    }
}

impl NodeFootprint {
    /// Output port of a node at `position`: right edge, vertically centered.
    pub fn output_port(&self, position: Point) -> Point {
        Point::new(position.x + self.width, position.y + self.height / 2.0)
    }

    /// Input port of a node at `position`: left edge, vertically centered.
    pub fn input_port(&self, position: Point) -> Point {
        Point::new(position.x, position.y + self.height / 2.0)
    }
}

/// Editor configuration supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub node_types: Vec<NodeTypeConfig>,
    pub initial_graph: Option<GraphSnapshot>,
    pub canvas_menu_items: Vec<MenuItem>,
    pub footprint: NodeFootprint,
    pub zoom_bounds: ZoomBounds,
    /// Offset applied to the position of a duplicated node.
    pub duplicate_offset: Point,
    /// Minimum horizontal control-point offset of edge curves.
    pub bezier_offset: f32,
    /// Port hit radius in screen pixels.
    pub port_hit_radius: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            node_types: Vec::new(),
            initial_graph: None,
            canvas_menu_items: Vec::new(),
            footprint: NodeFootprint::default(),
            zoom_bounds: ZoomBounds::default(),
            duplicate_offset: Point::new(50.0, 50.0),
            bezier_offset: 50.0,
            port_hit_radius: 12.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    pub fn with_node_type(mut self, node_type: NodeTypeConfig) -> Self {
        self.node_types.push(node_type);
        self
    }

    pub fn with_initial_graph(mut self, graph: GraphSnapshot) -> Self {
        self.initial_graph = Some(graph);
        self
    }

    /// Build the type catalogue from [`node_types`](Self::node_types).
    pub fn catalogue(&self) -> NodeTypeCatalogue {
        self.node_types.iter().cloned().collect()
    }

    /// Sanity-check numeric settings.
    pub fn check(&self) -> Result<()> {
        let b = &self.zoom_bounds;
        if !(b.min > 0.0 && b.min.is_finite() && b.max.is_finite() && b.min <= b.max) {
            return Err(EditorError::Config(format!(
                "zoom bounds [{}, {}] must be positive and ordered",
                b.min, b.max
            )));
        }
        if !(self.footprint.width > 0.0 && self.footprint.height > 0.0) {
            return Err(EditorError::Config("node footprint must be positive".into()));
        }
        if self.port_hit_radius < 0.0 {
            return Err(EditorError::Config("port hit radius must not be negative".into()));
        }
        Ok(())
    }
}
