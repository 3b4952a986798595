use super::*;
use crate::camera::Point;
use crate::catalog::Theme;
use crate::derive::settle;
use crate::node::{IN_SELECT, IN_VISUAL, OUT_META};

fn project(slug: &str, job_id: Option<&str>, gallery: bool) -> Project {
    Project {
        slug: slug.into(),
        title: String::new(),
        year: String::new(),
        category: String::new(),
        job_id: job_id.map(Into::into),
        themes: vec![],
        gallery: if gallery { vec!["a.jpg".into()] } else { vec![] },
        model: None,
        video: None,
        deck: None,
        stats: std::collections::BTreeMap::new(),
    }
}

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

fn catalog() -> Catalog {
    Catalog::new(
        vec![project("p1", Some("slice"), true), project("p2", Some("rg"), false)],
        vec![job("slice"), job("rg")],
        vec![Theme { id: "ai".into(), label: String::new() }],
    )
    .unwrap()
}

fn spawn(graph: &mut GraphStore, catalog: &Catalog, kind: NodeKind) -> NodeId {
    graph.spawn(kind, Point::new(0.0, 0.0), catalog)
}

fn slug_of(content: Option<ActiveContent<'_>>) -> Option<&str> {
    match content {
        Some(ActiveContent::Project(p)) => Some(p.slug.as_str()),
        _ => None,
    }
}

// =============================================================
// Direct resolution
// =============================================================

#[test]
fn unwired_node_resolves_to_none() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let gallery = spawn(&mut graph, &catalog, NodeKind::ImageGallery);
    assert!(resolve_active_content(&graph, &catalog, gallery).is_none());
}

#[test]
fn project_socket_resolves_to_project() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let cv = spawn(&mut graph, &catalog, NodeKind::WorkHistory);
    let list = spawn(&mut graph, &catalog, NodeKind::ProjectList);
    let details = spawn(&mut graph, &catalog, NodeKind::Details);
    graph.add_connection(cv, "out-job-slice", list, IN_FILTER);
    settle(&mut graph, &catalog);
    graph.add_connection(list, "out-p-p1", details, IN_SELECT);

    let content = resolve_active_content(&graph, &catalog, details);
    assert_eq!(slug_of(content), Some("p1"));
}

#[test]
fn job_socket_resolves_to_job() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let cv = spawn(&mut graph, &catalog, NodeKind::WorkHistory);
    let details = spawn(&mut graph, &catalog, NodeKind::Details);
    graph.add_connection(cv, "out-job-rg", details, IN_SELECT);

    match resolve_active_content(&graph, &catalog, details) {
        Some(ActiveContent::Job(j)) => assert_eq!(j.id, "rg"),
        other => panic!("expected job, got {other:?}"),
    }
}

#[test]
fn stale_project_socket_resolves_to_none() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let list = spawn(&mut graph, &catalog, NodeKind::ProjectList);
    let details = spawn(&mut graph, &catalog, NodeKind::Details);
    // Wire names a project the catalog doesn't know.
    graph.add_connection(list, "out-p-ghost", details, IN_SELECT);

    assert!(resolve_active_content(&graph, &catalog, details).is_none());
}

// =============================================================
// Multi-hop resolution
// =============================================================

#[test]
fn gallery_resolves_through_details() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let cv = spawn(&mut graph, &catalog, NodeKind::WorkHistory);
    let list = spawn(&mut graph, &catalog, NodeKind::ProjectList);
    let details = spawn(&mut graph, &catalog, NodeKind::Details);
    let gallery = spawn(&mut graph, &catalog, NodeKind::ImageGallery);
    graph.add_connection(cv, "out-job-slice", list, IN_FILTER);
    settle(&mut graph, &catalog);
    graph.add_connection(list, "out-p-p1", details, IN_SELECT);
    graph.add_connection(details, OUT_META, gallery, IN_VISUAL);

    let content = resolve_active_content(&graph, &catalog, gallery);
    assert_eq!(slug_of(content), Some("p1"));
}

#[test]
fn filter_wires_are_skipped() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let cv = spawn(&mut graph, &catalog, NodeKind::WorkHistory);
    let list = spawn(&mut graph, &catalog, NodeKind::ProjectList);
    graph.add_connection(cv, "out-job-slice", list, IN_FILTER);
    settle(&mut graph, &catalog);

    // The list's only incoming wire is its filter; the walk must not
    // treat the job behind it as the list's own content.
    assert!(resolve_active_content(&graph, &catalog, list).is_none());
}

#[test]
fn first_resolving_input_wins() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let cv = spawn(&mut graph, &catalog, NodeKind::WorkHistory);
    let list = spawn(&mut graph, &catalog, NodeKind::ProjectList);
    let details = spawn(&mut graph, &catalog, NodeKind::Details);
    let gallery = spawn(&mut graph, &catalog, NodeKind::ImageGallery);
    graph.add_connection(cv, "out-job-slice", list, IN_FILTER);
    settle(&mut graph, &catalog);
    // Dead-end context for details, live project for the gallery.
    graph.add_connection(details, OUT_META, gallery, IN_VISUAL);
    graph.add_connection(list, "out-p-p1", gallery, "in-extra");

    let content = resolve_active_content(&graph, &catalog, gallery);
    assert_eq!(slug_of(content), Some("p1"));
}

// =============================================================
// Cycle safety
// =============================================================

#[test]
fn two_node_cycle_resolves_to_none() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let a = spawn(&mut graph, &catalog, NodeKind::Details);
    let b = spawn(&mut graph, &catalog, NodeKind::Details);
    graph.add_connection(a, OUT_META, b, IN_SELECT);
    graph.add_connection(b, OUT_META, a, IN_SELECT);

    assert!(resolve_active_content(&graph, &catalog, a).is_none());
    assert!(resolve_active_content(&graph, &catalog, b).is_none());
}

#[test]
fn self_loop_resolves_to_none() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let a = spawn(&mut graph, &catalog, NodeKind::Details);
    graph.add_connection(a, OUT_META, a, IN_SELECT);
    assert!(resolve_active_content(&graph, &catalog, a).is_none());
}

#[test]
fn cycle_behind_a_consumer_resolves_to_none() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let a = spawn(&mut graph, &catalog, NodeKind::Details);
    let b = spawn(&mut graph, &catalog, NodeKind::Details);
    let gallery = spawn(&mut graph, &catalog, NodeKind::ImageGallery);
    graph.add_connection(a, OUT_META, b, IN_SELECT);
    graph.add_connection(b, OUT_META, a, IN_SELECT);
    graph.add_connection(a, OUT_META, gallery, IN_VISUAL);

    assert!(resolve_active_content(&graph, &catalog, gallery).is_none());
}

// =============================================================
// Content state classification
// =============================================================

fn wired_gallery(slug: &str) -> (GraphStore, Catalog, NodeId) {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let cv = spawn(&mut graph, &catalog, NodeKind::WorkHistory);
    let list = spawn(&mut graph, &catalog, NodeKind::ProjectList);
    let gallery = spawn(&mut graph, &catalog, NodeKind::ImageGallery);
    let job_id = if slug == "p1" { "slice" } else { "rg" };
    graph.add_connection(cv, &format!("out-job-{job_id}"), list, IN_FILTER);
    settle(&mut graph, &catalog);
    graph.add_connection(list, &format!("out-p-{slug}"), gallery, IN_VISUAL);
    (graph, catalog, gallery)
}

#[test]
fn fixed_kinds_are_fixed() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let header = spawn(&mut graph, &catalog, NodeKind::Header);
    let node = graph.node(&header).unwrap();
    assert_eq!(content_state(&graph, &catalog, node), ContentState::Fixed);
}

#[test]
fn unwired_consumer_is_disconnected() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let gallery = spawn(&mut graph, &catalog, NodeKind::ImageGallery);
    let node = graph.node(&gallery).unwrap();
    assert_eq!(content_state(&graph, &catalog, node), ContentState::Disconnected);
}

#[test]
fn gallery_with_images_is_ready() {
    let (graph, catalog, gallery) = wired_gallery("p1");
    let node = graph.node(&gallery).unwrap();
    assert_eq!(content_state(&graph, &catalog, node), ContentState::Ready);
}

#[test]
fn gallery_without_images_is_unavailable() {
    let (graph, catalog, gallery) = wired_gallery("p2");
    let node = graph.node(&gallery).unwrap();
    assert_eq!(content_state(&graph, &catalog, node), ContentState::Unavailable);
}

#[test]
fn details_on_job_is_ready_but_media_is_not() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let cv = spawn(&mut graph, &catalog, NodeKind::WorkHistory);
    let details = spawn(&mut graph, &catalog, NodeKind::Details);
    let gallery = spawn(&mut graph, &catalog, NodeKind::ImageGallery);
    graph.add_connection(cv, "out-job-slice", details, IN_SELECT);
    graph.add_connection(details, OUT_META, gallery, IN_VISUAL);

    let details_node = graph.node(&details).unwrap();
    assert_eq!(content_state(&graph, &catalog, details_node), ContentState::Ready);
    // The gallery sees a job upstream, which it cannot display.
    let gallery_node = graph.node(&gallery).unwrap();
    assert_eq!(content_state(&graph, &catalog, gallery_node), ContentState::Disconnected);
}

#[test]
fn viewer_without_model_is_unavailable() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let cv = spawn(&mut graph, &catalog, NodeKind::WorkHistory);
    let list = spawn(&mut graph, &catalog, NodeKind::ProjectList);
    let viewer = spawn(&mut graph, &catalog, NodeKind::Viewer3d);
    graph.add_connection(cv, "out-job-slice", list, IN_FILTER);
    settle(&mut graph, &catalog);
    graph.add_connection(list, "out-p-p1", viewer, "in-geo");

    let node = graph.node(&viewer).unwrap();
    assert_eq!(content_state(&graph, &catalog, node), ContentState::Unavailable);
}

#[test]
fn chart_is_ready_even_without_stats() {
    let catalog = catalog();
    let mut graph = GraphStore::new();
    let cv = spawn(&mut graph, &catalog, NodeKind::WorkHistory);
    let list = spawn(&mut graph, &catalog, NodeKind::ProjectList);
    let chart = spawn(&mut graph, &catalog, NodeKind::Chart);
    graph.add_connection(cv, "out-job-slice", list, IN_FILTER);
    settle(&mut graph, &catalog);
    graph.add_connection(list, "out-p-p1", chart, "in-data");

    let node = graph.node(&chart).unwrap();
    assert_eq!(content_state(&graph, &catalog, node), ContentState::Ready);
}
