//! Socket geometry and hit-testing against the node graph.
//!
//! Socket centers are computed by one formula shared with the scene
//! builder — if the hit target and the rendered wire endpoint ever used
//! different math, wires would visually detach from their sockets.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::{
    NODE_HEADER_H, RESIZE_HANDLE, SOCKET_HIT_RADIUS_PX, WIRE_HIT_RADIUS_PX, WIRE_HIT_SAMPLES,
    WIRE_MIN_CONTROL,
};
use crate::graph::{ConnectionId, GraphStore};
use crate::node::{Node, NodeId, SocketRole};

/// Which part of a node was hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitPart {
    /// The draggable header strip.
    Header,
    /// The content area.
    Body,
    /// The bottom-right resize grab area.
    ResizeHandle,
    /// A socket dot (these overhang the node's edges).
    Socket { id: String, role: SocketRole },
}

/// Result of a node hit test.
#[derive(Debug, Clone)]
pub struct Hit {
    pub node: NodeId,
    pub part: HitPart,
}

/// World-space center of the socket at `index` in the given row.
#[must_use]
pub fn socket_center(node: &Node, index: usize, role: SocketRole) -> Point {
    let stride = node.stride();
    let x = match role {
        SocketRole::Input => node.position.x,
        SocketRole::Output => node.position.x + node.width,
    };
    let y = node.position.y + NODE_HEADER_H + index as f64 * stride + stride / 2.0;
    Point::new(x, y)
}

/// World-space center of a socket by id, if the node has it.
#[must_use]
pub fn socket_position(node: &Node, socket_id: &str, role: SocketRole) -> Option<Point> {
    node.socket_index(socket_id, role)
        .map(|index| socket_center(node, index, role))
}

/// Control points of a wire's cubic Bézier, reaching horizontally out of
/// the sockets it joins.
#[must_use]
pub fn wire_controls(start: Point, end: Point) -> (Point, Point) {
    let reach = ((end.x - start.x).abs() * 0.5).max(WIRE_MIN_CONTROL);
    (
        Point::new(start.x + reach, start.y),
        Point::new(end.x - reach, end.y),
    )
}

/// Test which node (if any) is under `world`, topmost first. Sockets win
/// over the node box, the resize handle over the header and body.
#[must_use]
pub fn hit_test(world: Point, graph: &GraphStore, zoom: f64) -> Option<Hit> {
    let socket_slop = SOCKET_HIT_RADIUS_PX / zoom;

    for node in graph.nodes().iter().rev() {
        if let Some(part) = hit_sockets(node, world, socket_slop) {
            return Some(Hit { node: node.id, part });
        }

        let x = node.position.x;
        let y = node.position.y;
        let h = node.box_height();
        let inside = world.x >= x && world.x <= x + node.width && world.y >= y && world.y <= y + h;
        if !inside {
            continue;
        }

        let part = if world.x >= x + node.width - RESIZE_HANDLE && world.y >= y + h - RESIZE_HANDLE
        {
            HitPart::ResizeHandle
        } else if world.y <= y + NODE_HEADER_H {
            HitPart::Header
        } else {
            HitPart::Body
        };
        return Some(Hit { node: node.id, part });
    }

    None
}

fn hit_sockets(node: &Node, world: Point, slop: f64) -> Option<HitPart> {
    for (role, row) in [
        (SocketRole::Input, &node.inputs),
        (SocketRole::Output, &node.outputs),
    ] {
        for (index, socket) in row.iter().enumerate() {
            let center = socket_center(node, index, role);
            let dx = world.x - center.x;
            let dy = world.y - center.y;
            if dx * dx + dy * dy <= slop * slop {
                return Some(HitPart::Socket { id: socket.id.clone(), role });
            }
        }
    }
    None
}

/// Test which wire (if any) passes under `world`, topmost first. The
/// curve is sampled; the slop is constant in screen pixels.
#[must_use]
pub fn hit_test_wire(world: Point, graph: &GraphStore, zoom: f64) -> Option<ConnectionId> {
    let slop = WIRE_HIT_RADIUS_PX / zoom;

    for conn in graph.connections().iter().rev() {
        let Some(start) = graph
            .node(&conn.from_node)
            .and_then(|n| socket_position(n, &conn.from_socket, SocketRole::Output))
        else {
            continue;
        };
        let Some(end) = graph
            .node(&conn.to_node)
            .and_then(|n| socket_position(n, &conn.to_socket, SocketRole::Input))
        else {
            continue;
        };

        let (c1, c2) = wire_controls(start, end);
        for step in 0..=WIRE_HIT_SAMPLES {
            let t = step as f64 / WIRE_HIT_SAMPLES as f64;
            let p = cubic_point(start, c1, c2, end, t);
            let dx = world.x - p.x;
            let dy = world.y - p.y;
            if dx * dx + dy * dy <= slop * slop {
                return Some(conn.id);
            }
        }
    }

    None
}

fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}
