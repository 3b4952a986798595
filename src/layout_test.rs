#![allow(clippy::float_cmp)]

use super::*;
use crate::catalog::{Job, Project};
use crate::node::{IN_FILTER, Node, SocketRole};

fn job(id: &str) -> Job {
    Job {
        id: id.into(),
        role: String::new(),
        company: String::new(),
        year: String::new(),
        description: String::new(),
        details: vec![],
    }
}

fn project(slug: &str, job_id: &str) -> Project {
    Project {
        slug: slug.into(),
        title: String::new(),
        year: String::new(),
        category: String::new(),
        job_id: Some(job_id.into()),
        themes: vec![],
        gallery: vec![],
        model: None,
        video: None,
        deck: None,
        stats: std::collections::BTreeMap::new(),
    }
}

fn catalog_with_jobs(n: usize) -> Catalog {
    let jobs = (0..n).map(|i| job(&format!("j{i}"))).collect();
    Catalog::new(vec![project("p1", "j2")], jobs, vec![]).unwrap()
}

fn built(catalog: &Catalog) -> GraphStore {
    let mut graph = GraphStore::new();
    initial_graph(catalog, &mut graph);
    graph
}

fn find_kind<'a>(graph: &'a GraphStore, kind: NodeKind) -> &'a Node {
    graph.nodes().iter().find(|n| n.kind == kind).unwrap()
}

// =============================================================
// Shape
// =============================================================

#[test]
fn builds_seven_nodes() {
    let graph = built(&catalog_with_jobs(3));
    assert_eq!(graph.len(), 7);
}

#[test]
fn one_node_per_expected_kind() {
    let graph = built(&catalog_with_jobs(3));
    for kind in [
        NodeKind::Header,
        NodeKind::Social,
        NodeKind::WorkHistory,
        NodeKind::ProjectList,
        NodeKind::Details,
        NodeKind::ImageGallery,
        NodeKind::Viewer3d,
    ] {
        assert_eq!(
            graph.nodes().iter().filter(|n| n.kind == kind).count(),
            1,
            "missing {kind:?}"
        );
    }
}

#[test]
fn project_list_sits_below_work_history() {
    let graph = built(&catalog_with_jobs(5));
    let cv = find_kind(&graph, NodeKind::WorkHistory);
    let list = find_kind(&graph, NodeKind::ProjectList);
    let cv_height = 32.0 + 5.0 * 60.0;
    assert_eq!(list.position.y, 390.0 + cv_height + 10.0);
    assert_eq!(cv.position.y, 375.0);
}

#[test]
fn media_nodes_are_sized_up() {
    let graph = built(&catalog_with_jobs(3));
    let gallery = find_kind(&graph, NodeKind::ImageGallery);
    assert_eq!(gallery.width, 500.0);
    assert_eq!(gallery.height, Some(400.0));
    let viewer = find_kind(&graph, NodeKind::Viewer3d);
    assert_eq!(viewer.width, 500.0);
    assert_eq!(viewer.height, Some(400.0));
}

// =============================================================
// Wiring
// =============================================================

#[test]
fn details_feeds_gallery_and_viewer() {
    let graph = built(&catalog_with_jobs(3));
    let details = find_kind(&graph, NodeKind::Details);
    let gallery = find_kind(&graph, NodeKind::ImageGallery);
    let viewer = find_kind(&graph, NodeKind::Viewer3d);

    let into_gallery = graph.incoming(gallery.id, IN_VISUAL).unwrap();
    assert_eq!(into_gallery.from_node, details.id);
    assert_eq!(into_gallery.from_socket, OUT_META);

    let into_viewer = graph.incoming(viewer.id, IN_GEO).unwrap();
    assert_eq!(into_viewer.from_node, details.id);
}

#[test]
fn third_job_seeds_details_context() {
    let graph = built(&catalog_with_jobs(3));
    let details = find_kind(&graph, NodeKind::Details);
    let conn = graph.incoming(details.id, IN_SELECT).unwrap();
    assert_eq!(conn.from_socket, "out-job-j2");
}

#[test]
fn fewer_than_three_jobs_leaves_details_unwired() {
    let graph = built(&catalog_with_jobs(2));
    let details = find_kind(&graph, NodeKind::Details);
    assert!(graph.incoming(details.id, IN_SELECT).is_none());
    assert_eq!(graph.connections().len(), 2);
}

#[test]
fn project_list_filter_starts_unwired() {
    let graph = built(&catalog_with_jobs(3));
    let list = find_kind(&graph, NodeKind::ProjectList);
    assert!(graph.incoming(list.id, IN_FILTER).is_none());
    assert!(list.has_socket(IN_FILTER, SocketRole::Input));
}

// =============================================================
// Determinism
// =============================================================

#[test]
fn rebuild_produces_identical_geometry() {
    let catalog = catalog_with_jobs(4);
    let a = built(&catalog);
    let b = built(&catalog);

    for (na, nb) in a.nodes().iter().zip(b.nodes()) {
        assert_eq!(na.kind, nb.kind);
        assert_eq!(na.position, nb.position);
        assert_eq!(na.width, nb.width);
        assert_eq!(na.height, nb.height);
        let ia: Vec<&str> = na.inputs.iter().map(|s| s.id.as_str()).collect();
        let ib: Vec<&str> = nb.inputs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ia, ib);
    }
    assert_eq!(a.connections().len(), b.connections().len());
}

#[test]
fn work_history_outputs_follow_catalog_order() {
    let graph = built(&catalog_with_jobs(4));
    let cv = find_kind(&graph, NodeKind::WorkHistory);
    let ids: Vec<&str> = cv.outputs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["out-job-j0", "out-job-j1", "out-job-j2", "out-job-j3"]);
}
