//! Deterministic initial graph construction.
//!
//! The default canvas is a pure function of the catalog: a left column of
//! identity/work-history/list nodes, a details node in the center, and
//! media nodes on the right, pre-wired so the page is meaningful before
//! the visitor touches anything. Reset rebuilds exactly this.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::camera::Point;
use crate::catalog::Catalog;
use crate::consts::{LIST_SOCKET_STRIDE, NODE_HEADER_H};
use crate::graph::GraphStore;
use crate::node::{
    IN_GEO, IN_SELECT, IN_VISUAL, NodeKind, OUT_JOB_PREFIX, OUT_META,
};

/// Build the fixed default layout into an empty (or cleared) store.
pub fn initial_graph(catalog: &Catalog, graph: &mut GraphStore) {
    let cv_height = NODE_HEADER_H + catalog.jobs().len() as f64 * LIST_SOCKET_STRIDE;

    // Column 1: identity stack.
    graph.spawn(NodeKind::Header, Point::new(50.0, 50.0), catalog);
    graph.spawn(NodeKind::Social, Point::new(50.0, 250.0), catalog);
    let cv = graph.spawn(NodeKind::WorkHistory, Point::new(50.0, 375.0), catalog);
    graph.spawn(
        NodeKind::ProjectList,
        Point::new(50.0, 390.0 + cv_height + 10.0),
        catalog,
    );

    // Column 2: the details selector.
    let details = graph.spawn(NodeKind::Details, Point::new(600.0, 350.0), catalog);

    // Column 3: media, sized up from their toolbar defaults.
    let gallery = graph.spawn(NodeKind::ImageGallery, Point::new(1250.0, 250.0), catalog);
    graph.set_node_size(&gallery, 500.0, Some(400.0));
    let viewer = graph.spawn(NodeKind::Viewer3d, Point::new(1250.0, 700.0), catalog);
    graph.set_node_size(&viewer, 500.0, Some(400.0));

    // Default wiring: details feeds both media nodes, and the third job
    // (independent work) seeds the details context when the catalog has
    // that many entries.
    graph.add_connection(details, OUT_META, gallery, IN_VISUAL);
    graph.add_connection(details, OUT_META, viewer, IN_GEO);
    if let Some(job) = catalog.jobs().get(2) {
        let socket = format!("{OUT_JOB_PREFIX}{}", job.id);
        graph.add_connection(cv, &socket, details, IN_SELECT);
    }
}
