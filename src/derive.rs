//! Derived-state propagation: recomputes list nodes whose rows are a
//! function of the graph, then prunes wires left dangling by the change.
//!
//! The pass is idempotent: a list node is only rewritten when its newly
//! computed slug sequence differs from the one it already displays, so
//! running [`derive_pass`] against a settled graph reports no change.
//! [`settle`] loops the pass because pruning a wire can itself change
//! what a downstream list should display; each extra iteration only runs
//! after connections were removed, so the loop terminates.

#[cfg(test)]
#[path = "derive_test.rs"]
mod derive_test;

use crate::catalog::Catalog;
use crate::consts::{MIN_CONTENT_H, NODE_HEADER_H};
use crate::graph::GraphStore;
use crate::node::{
    IN_FILTER, IN_SELECT, Node, NodeId, NodeKind, OUT_JOB_PREFIX, OUT_PROJECT_PREFIX,
    OUT_THEME_PREFIX, Socket,
};

/// Run [`derive_pass`] until the graph stops changing.
pub fn settle(graph: &mut GraphStore, catalog: &Catalog) {
    while derive_pass(graph, catalog) {}
}

/// One recompute-and-prune pass. Returns whether anything changed.
pub fn derive_pass(graph: &mut GraphStore, catalog: &Catalog) -> bool {
    let mut changed = false;

    // Recompute every filter-list node against the current wiring, then
    // commit the ones whose displayed rows actually changed.
    let recomputed: Vec<(NodeId, Vec<String>)> = graph
        .nodes()
        .iter()
        .filter(|n| n.kind.is_filter_list())
        .map(|n| (n.id, filtered_slugs(graph, catalog, n)))
        .collect();

    for (id, slugs) in recomputed {
        let Some(node) = graph.node(&id) else {
            continue;
        };
        let unchanged = node
            .props()
            .displayed()
            .iter()
            .copied()
            .eq(slugs.iter().map(String::as_str));
        if unchanged {
            continue;
        }
        changed = true;
        apply_rows(graph, &id, &slugs);
    }

    // Commit first, prune second: a shrunk filter result may have removed
    // the output socket some downstream wire still points at.
    if graph.prune_dangling() > 0 {
        changed = true;
    }

    changed
}

/// The slugs a list node should display given its current filter wiring.
///
/// Exposed so the first-item reselection cascade can look at the
/// *prospective* rows of a just-rewired list before the settle pass
/// commits them and prunes stale wires.
#[must_use]
pub fn filtered_slugs(graph: &GraphStore, catalog: &Catalog, list: &Node) -> Vec<String> {
    let Some(conn) = graph.incoming(list.id, IN_FILTER) else {
        return Vec::new();
    };
    let Some(upstream) = graph.node(&conn.from_node) else {
        return Vec::new();
    };

    if let Some(slugs) = source_filter(catalog, upstream.kind, &conn.from_socket) {
        return slugs;
    }

    // A selector in between doesn't replicate catalog knowledge; trace one
    // hop further back to the true originating source.
    if upstream.kind.is_selector()
        && let Some(sel) = graph.incoming(upstream.id, IN_SELECT)
        && let Some(source) = graph.node(&sel.from_node)
        && let Some(slugs) = source_filter(catalog, source.kind, &sel.from_socket)
    {
        return slugs;
    }

    Vec::new()
}

/// Match a catalog-source socket id to its filtered projects. `None` when
/// the node isn't a source or the socket doesn't encode an item.
fn source_filter(catalog: &Catalog, kind: NodeKind, socket: &str) -> Option<Vec<String>> {
    match kind {
        NodeKind::WorkHistory => socket.strip_prefix(OUT_JOB_PREFIX).map(|job_id| {
            catalog
                .projects_for_job(job_id)
                .iter()
                .map(|p| p.slug.clone())
                .collect()
        }),
        NodeKind::ThemeList => socket.strip_prefix(OUT_THEME_PREFIX).map(|theme_id| {
            catalog
                .projects_for_theme(theme_id)
                .iter()
                .map(|p| p.slug.clone())
                .collect()
        }),
        _ => None,
    }
}

/// Rewrite a list node for a new row set: per-item output sockets, a
/// height that covers the rows (or the empty-state message), and the
/// stored slug list the next pass compares against.
fn apply_rows(graph: &mut GraphStore, id: &NodeId, slugs: &[String]) {
    let Some(node) = graph.node_mut(id) else {
        return;
    };
    let stride = node.stride();
    let content = if slugs.is_empty() {
        MIN_CONTENT_H
    } else {
        slugs.len() as f64 * stride
    };

    node.outputs = slugs
        .iter()
        .map(|slug| Socket::bare(format!("{OUT_PROJECT_PREFIX}{slug}")))
        .collect();
    node.height = Some(NODE_HEADER_H + content);

    if !node.data.is_object() {
        node.data = serde_json::json!({});
    }
    if let Some(bag) = node.data.as_object_mut() {
        bag.insert("displayed".to_owned(), serde_json::json!(slugs));
    }
}
