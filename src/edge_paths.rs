//! Screen-space edge paths for rendering.
//!
//! Paths are derived from the graph on demand: world port positions come from
//! [`NodeFootprint`], then go through the current [`Viewport`](crate::viewport::Viewport).
//! [`EdgePathModel`] mirrors the computed paths into a bound Slint `VecModel`.
//!
//! ```ignore
//! let model = Rc::new(VecModel::<EdgePathRow>::default());
//! ctrl.bind_edge_model(model.clone(), |id, path, color| EdgePathRow { id, path, color });
//! window.set_edge_paths(ModelRc::from(model));
//! ```

use crate::catalogue::NodeTypeCatalogue;
use crate::config::NodeFootprint;
use crate::gesture::ActiveConnection;
use crate::graph::{Edge, Graph};
use crate::path::bezier_path;
use slint::{Color, Model, SharedString, VecModel};
use std::rc::Rc;

/// A rendered edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub id: String,
    /// SVG path commands in screen space.
    pub path: String,
    /// Color of the source node's type.
    pub color: Color,
}

/// Path for a single edge, or `None` if an endpoint is missing.
pub fn edge_path(graph: &Graph, edge: &Edge, footprint: &NodeFootprint, bezier_offset: f32) -> Option<String> {
    let source = graph.node(&edge.source_node_id)?;
    let target = graph.node(&edge.target_node_id)?;
    let view = graph.view();
    let start = view.to_screen(footprint.output_port(source.position));
    let end = view.to_screen(footprint.input_port(target.position));
    Some(bezier_path(start, end, view.zoom, bezier_offset))
}

/// Paths for every edge, in edge order.
pub fn compute_edge_paths(
    graph: &Graph,
    catalogue: &NodeTypeCatalogue,
    footprint: &NodeFootprint,
    bezier_offset: f32,
) -> Vec<EdgePath> {
    graph
        .edges()
        .filter_map(|edge| {
            let path = edge_path(graph, edge, footprint, bezier_offset)?;
            let source = graph.node(&edge.source_node_id)?;
            Some(EdgePath {
                id: edge.id.clone(),
                path,
                color: catalogue.resolve(&source.node_type).color,
            })
        })
        .collect()
}

/// Path from the gesture's origin to the live cursor.
pub fn preview_path(graph: &Graph, active: &ActiveConnection, bezier_offset: f32) -> String {
    let view = graph.view();
    bezier_path(
        view.to_screen(active.origin),
        view.to_screen(active.cursor_world),
        view.zoom,
        bezier_offset,
    )
}

trait ModelSyncer {
    fn sync(&self, paths: &[EdgePath]);
}

struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(SharedString, SharedString, Color) -> P,
{
    fn sync(&self, paths: &[EdgePath]) {
        for (i, edge) in paths.iter().enumerate() {
            let item = (self.constructor)(
                SharedString::from(edge.id.as_str()),
                SharedString::from(edge.path.as_str()),
                edge.color,
            );
            if i < self.model.row_count() {
                self.model.set_row_data(i, item);
            } else {
                self.model.push(item);
            }
        }
        while self.model.row_count() > paths.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

/// Optional binding of edge paths to a Slint row model.
#[derive(Default)]
pub struct EdgePathModel {
    syncer: Option<Box<dyn ModelSyncer>>,
}

impl std::fmt::Debug for EdgePathModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgePathModel")
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl EdgePathModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a Slint model. `constructor` builds a row from (edge id, path, color).
    ///
    /// Replaces any previous binding.
    pub fn bind<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(SharedString, SharedString, Color) -> P + 'static,
    {
        self.syncer = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    pub fn unbind(&mut self) {
        self.syncer = None;
    }

    pub fn is_bound(&self) -> bool {
        self.syncer.is_some()
    }

    /// Push `paths` into the bound model, reusing rows in place. No-op when unbound.
    pub fn sync(&self, paths: &[EdgePath]) {
        if let Some(syncer) = &self.syncer {
            syncer.sync(paths);
        }
    }
}
