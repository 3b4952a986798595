//! Upstream resolution: which catalog item drives a node's display.
//!
//! A depth-first walk backward over incoming wires, skipping filter
//! inputs (they carry routing, not content) and passing through selector
//! nodes. A visited set turns connection cycles into "no content" instead
//! of unbounded recursion.

#[cfg(test)]
#[path = "resolve_test.rs"]
mod resolve_test;

use std::collections::HashSet;

use crate::catalog::{Catalog, Job, Project};
use crate::graph::GraphStore;
use crate::node::{
    IN_FILTER, Node, NodeId, NodeKind, OUT_JOB_PREFIX, OUT_PROJECT_PREFIX,
};

/// The catalog item a node's display is driven by.
#[derive(Debug, Clone, Copy)]
pub enum ActiveContent<'a> {
    Project(&'a Project),
    Job(&'a Job),
}

/// What a content-consuming node should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentState {
    /// The node renders its own fixed content; resolution doesn't apply.
    Fixed,
    /// No catalog item resolves upstream (or the item isn't usable by
    /// this node kind) — render the "connect something" placeholder.
    Disconnected,
    /// An item resolved but lacks the sub-resource this node displays —
    /// render the "not available for this item" placeholder.
    Unavailable,
    /// An item resolved and carries what this node needs.
    Ready,
}

/// Resolve the active content item for a node, walking incoming wires
/// backward. Returns `None` for unwired nodes and for cycles.
#[must_use]
pub fn resolve_active_content<'a>(
    graph: &GraphStore,
    catalog: &'a Catalog,
    node_id: NodeId,
) -> Option<ActiveContent<'a>> {
    let mut visited = HashSet::new();
    walk(graph, catalog, node_id, &mut visited)
}

fn walk<'a>(
    graph: &GraphStore,
    catalog: &'a Catalog,
    node_id: NodeId,
    visited: &mut HashSet<NodeId>,
) -> Option<ActiveContent<'a>> {
    if !visited.insert(node_id) {
        return None;
    }

    for conn in graph.connections().iter().filter(|c| c.to_node == node_id) {
        if conn.to_socket == IN_FILTER {
            continue;
        }
        let Some(upstream) = graph.node(&conn.from_node) else {
            continue;
        };

        // A per-item socket on a catalog-list node terminates the walk.
        if upstream.kind.is_filter_list()
            && let Some(slug) = conn.from_socket.strip_prefix(OUT_PROJECT_PREFIX)
        {
            return catalog.project(slug).map(ActiveContent::Project);
        }
        if upstream.kind == NodeKind::WorkHistory
            && let Some(job_id) = conn.from_socket.strip_prefix(OUT_JOB_PREFIX)
        {
            return catalog.job(job_id).map(ActiveContent::Job);
        }

        if let Some(found) = walk(graph, catalog, conn.from_node, visited) {
            return Some(found);
        }
    }

    None
}

/// Classify what a node should render, pairing the resolution result with
/// the node kind's sub-resource requirement.
#[must_use]
pub fn content_state(graph: &GraphStore, catalog: &Catalog, node: &Node) -> ContentState {
    if !node.kind.shows_upstream_content() {
        return ContentState::Fixed;
    }

    match resolve_active_content(graph, catalog, node.id) {
        None => ContentState::Disconnected,
        Some(ActiveContent::Job(_)) => {
            // Only the details selector can display a job; media nodes
            // need a project behind the wire.
            if node.kind.is_selector() {
                ContentState::Ready
            } else {
                ContentState::Disconnected
            }
        }
        Some(ActiveContent::Project(project)) => {
            let available = match node.kind {
                NodeKind::ImageGallery => project.has_gallery(),
                NodeKind::Viewer3d => project.has_model(),
                NodeKind::Video => project.has_video(),
                NodeKind::Presentation => project.has_deck(),
                // Details always renders project metadata; the chart falls
                // back to default bars when stats are absent.
                _ => true,
            };
            if available {
                ContentState::Ready
            } else {
                ContentState::Unavailable
            }
        }
    }
}
