#![allow(clippy::float_cmp)]

use super::*;
use crate::catalog::Catalog;
use crate::node::{IN_SELECT, NodeKind, OUT_META, Socket};

fn catalog() -> Catalog {
    Catalog::new(vec![], vec![], vec![]).unwrap()
}

fn details_at(graph: &mut GraphStore, x: f64, y: f64) -> NodeId {
    let id = graph.spawn(NodeKind::Details, Point::new(x, y), &catalog());
    // Give it a concrete box so body hits are deterministic.
    graph.set_node_size(&id, 300.0, Some(200.0));
    id
}

// =============================================================
// socket_center / socket_position
// =============================================================

#[test]
fn input_sockets_sit_on_the_left_edge() {
    let mut graph = GraphStore::new();
    let id = details_at(&mut graph, 100.0, 50.0);
    let node = graph.node(&id).unwrap();
    let p = socket_center(node, 0, SocketRole::Input);
    assert_eq!(p.x, 100.0);
    // Header 32 + stride/2 with the default 40 stride.
    assert_eq!(p.y, 50.0 + 32.0 + 20.0);
}

#[test]
fn output_sockets_sit_on_the_right_edge() {
    let mut graph = GraphStore::new();
    let id = details_at(&mut graph, 100.0, 50.0);
    let node = graph.node(&id).unwrap();
    let p = socket_center(node, 0, SocketRole::Output);
    assert_eq!(p.x, 400.0);
}

#[test]
fn socket_rows_stack_by_stride() {
    let mut graph = GraphStore::new();
    let id = details_at(&mut graph, 0.0, 0.0);
    let node = graph.node_mut(&id).unwrap();
    node.inputs = vec![Socket::bare("a"), Socket::bare("b"), Socket::bare("c")];
    let node = graph.node(&id).unwrap();

    let first = socket_center(node, 0, SocketRole::Input);
    let third = socket_center(node, 2, SocketRole::Input);
    assert_eq!(third.y - first.y, 80.0);
}

#[test]
fn custom_stride_spreads_rows() {
    let mut graph = GraphStore::new();
    let id = details_at(&mut graph, 0.0, 0.0);
    graph.node_mut(&id).unwrap().socket_stride = Some(60.0);
    let node = graph.node(&id).unwrap();
    let p = socket_center(node, 1, SocketRole::Input);
    assert_eq!(p.y, 32.0 + 60.0 + 30.0);
}

#[test]
fn socket_position_finds_by_id() {
    let mut graph = GraphStore::new();
    let id = details_at(&mut graph, 10.0, 10.0);
    let node = graph.node(&id).unwrap();
    let p = socket_position(node, IN_SELECT, SocketRole::Input).unwrap();
    assert_eq!(p, socket_center(node, 0, SocketRole::Input));
    assert!(socket_position(node, "nope", SocketRole::Input).is_none());
}

// =============================================================
// hit_test: box parts
// =============================================================

#[test]
fn empty_space_hits_nothing() {
    let graph = GraphStore::new();
    assert!(hit_test(Point::new(10.0, 10.0), &graph, 1.0).is_none());
}

#[test]
fn header_strip_hits_header() {
    let mut graph = GraphStore::new();
    let id = details_at(&mut graph, 0.0, 0.0);
    let hit = hit_test(Point::new(150.0, 16.0), &graph, 1.0).unwrap();
    assert_eq!(hit.node, id);
    assert_eq!(hit.part, HitPart::Header);
}

#[test]
fn content_area_hits_body() {
    let mut graph = GraphStore::new();
    let id = details_at(&mut graph, 0.0, 0.0);
    let hit = hit_test(Point::new(150.0, 100.0), &graph, 1.0).unwrap();
    assert_eq!(hit.node, id);
    assert_eq!(hit.part, HitPart::Body);
}

#[test]
fn bottom_right_corner_hits_resize_handle() {
    let mut graph = GraphStore::new();
    let id = details_at(&mut graph, 0.0, 0.0);
    let hit = hit_test(Point::new(295.0, 195.0), &graph, 1.0).unwrap();
    assert_eq!(hit.node, id);
    assert_eq!(hit.part, HitPart::ResizeHandle);
}

#[test]
fn outside_the_box_misses() {
    let mut graph = GraphStore::new();
    details_at(&mut graph, 0.0, 0.0);
    assert!(hit_test(Point::new(150.0, 500.0), &graph, 1.0).is_none());
}

#[test]
fn topmost_node_wins() {
    let mut graph = GraphStore::new();
    let _below = details_at(&mut graph, 0.0, 0.0);
    let above = details_at(&mut graph, 50.0, 50.0);
    let hit = hit_test(Point::new(150.0, 150.0), &graph, 1.0).unwrap();
    assert_eq!(hit.node, above);
}

// =============================================================
// hit_test: sockets
// =============================================================

#[test]
fn socket_dot_hits_socket() {
    let mut graph = GraphStore::new();
    let id = details_at(&mut graph, 0.0, 0.0);
    let node = graph.node(&id).unwrap();
    let center = socket_center(node, 0, SocketRole::Input);

    let hit = hit_test(center, &graph, 1.0).unwrap();
    assert_eq!(
        hit.part,
        HitPart::Socket { id: IN_SELECT.into(), role: SocketRole::Input }
    );
}

#[test]
fn socket_slop_extends_outside_the_node() {
    let mut graph = GraphStore::new();
    let id = details_at(&mut graph, 0.0, 0.0);
    let node = graph.node(&id).unwrap();
    let center = socket_center(node, 0, SocketRole::Input);

    // 10 px left of the node edge is still the socket.
    let hit = hit_test(Point::new(center.x - 10.0, center.y), &graph, 1.0).unwrap();
    assert!(matches!(hit.part, HitPart::Socket { .. }));
}

#[test]
fn socket_slop_scales_with_zoom() {
    let mut graph = GraphStore::new();
    let id = details_at(&mut graph, 0.0, 0.0);
    let node = graph.node(&id).unwrap();
    let center = socket_center(node, 0, SocketRole::Input);
    let probe = Point::new(center.x - 10.0, center.y);

    // At zoom 2 the 12 px screen slop is only 6 world units.
    let hit = hit_test(probe, &graph, 2.0);
    assert!(!matches!(hit, Some(Hit { part: HitPart::Socket { .. }, .. })));
}

#[test]
fn output_socket_reports_output_role() {
    let mut graph = GraphStore::new();
    let id = details_at(&mut graph, 0.0, 0.0);
    let node = graph.node(&id).unwrap();
    let center = socket_center(node, 0, SocketRole::Output);

    let hit = hit_test(center, &graph, 1.0).unwrap();
    assert_eq!(
        hit.part,
        HitPart::Socket { id: OUT_META.into(), role: SocketRole::Output }
    );
}

// =============================================================
// wire_controls
// =============================================================

#[test]
fn wire_controls_reach_half_the_span() {
    let (c1, c2) = wire_controls(Point::new(0.0, 0.0), Point::new(400.0, 100.0));
    assert_eq!(c1, Point::new(200.0, 0.0));
    assert_eq!(c2, Point::new(200.0, 100.0));
}

#[test]
fn wire_controls_have_a_minimum_reach() {
    let (c1, c2) = wire_controls(Point::new(0.0, 0.0), Point::new(20.0, 0.0));
    assert_eq!(c1.x, 50.0);
    assert_eq!(c2.x, -30.0);
}

// =============================================================
// hit_test_wire
// =============================================================

fn wired_pair(graph: &mut GraphStore) -> ConnectionId {
    let cat = catalog();
    let from = graph.spawn(NodeKind::Details, Point::new(0.0, 0.0), &cat);
    graph.set_node_size(&from, 300.0, Some(200.0));
    let to = graph.spawn(NodeKind::ImageGallery, Point::new(600.0, 0.0), &cat);
    graph.add_connection(from, OUT_META, to, "in-visual")
}

#[test]
fn point_on_wire_hits_it() {
    let mut graph = GraphStore::new();
    let cid = wired_pair(&mut graph);
    // Both endpoints are at y = 52; the straight middle of the curve too.
    let hit = hit_test_wire(Point::new(450.0, 52.0), &graph, 1.0);
    assert_eq!(hit, Some(cid));
}

#[test]
fn point_far_from_wire_misses() {
    let mut graph = GraphStore::new();
    wired_pair(&mut graph);
    assert!(hit_test_wire(Point::new(450.0, 300.0), &graph, 1.0).is_none());
}

#[test]
fn wire_endpoints_hit() {
    let mut graph = GraphStore::new();
    let cid = wired_pair(&mut graph);
    assert_eq!(hit_test_wire(Point::new(300.0, 52.0), &graph, 1.0), Some(cid));
    assert_eq!(hit_test_wire(Point::new(600.0, 52.0), &graph, 1.0), Some(cid));
}

#[test]
fn dangling_wire_is_skipped() {
    let mut graph = GraphStore::new();
    let cat = catalog();
    let from = graph.spawn(NodeKind::Details, Point::new(0.0, 0.0), &cat);
    let to = graph.spawn(NodeKind::ImageGallery, Point::new(600.0, 0.0), &cat);
    graph.add_connection(from, "out-gone", to, "in-visual");
    assert!(hit_test_wire(Point::new(450.0, 52.0), &graph, 1.0).is_none());
}
