//! Scene projection: the serializable view of engine state handed to the
//! renderer.
//!
//! Pure read-only assembly — no mutation, no drawing. Socket positions
//! come from the same geometry as hit-testing, so rendered wires land
//! exactly on their hit targets.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::Serialize;

use crate::camera::{Camera, Point};
use crate::engine::{EngineCore, wire_is_valid};
use crate::graph::ConnectionId;
use crate::hit::{socket_center, socket_position, wire_controls};
use crate::input::InputState;
use crate::node::{Node, NodeId, NodeKind, SocketRole};
use crate::resolve::{ActiveContent, ContentState, content_state, resolve_active_content};

/// A socket with its world position and connection status.
#[derive(Debug, Serialize)]
pub struct SocketView {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub connected: bool,
}

/// What a node's content area should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContentView {
    /// Node-local content; nothing resolved from the graph.
    Fixed,
    /// No usable upstream item — "connect something" placeholder.
    Disconnected,
    /// Item resolved but lacks this node's sub-resource.
    Unavailable { slug: String },
    /// Display this project.
    Project { slug: String },
    /// Display this work-history entry.
    Job { id: String },
}

/// One node, fully laid out for painting.
#[derive(Debug, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub kind: NodeKind,
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: Option<f64>,
    pub stride: f64,
    pub selected: bool,
    pub inputs: Vec<SocketView>,
    pub outputs: Vec<SocketView>,
    pub content: ContentView,
    /// Free-form node state (image index, displayed slugs, ...).
    pub data: serde_json::Value,
}

/// A committed wire as a cubic Bézier.
#[derive(Debug, Serialize)]
pub struct WireView {
    pub id: ConnectionId,
    pub from: Point,
    pub to: Point,
    pub c1: Point,
    pub c2: Point,
    pub selected: bool,
}

/// The wire being dragged, loose end under the cursor.
#[derive(Debug, Serialize)]
pub struct PendingWire {
    pub from: Point,
    pub to: Point,
    pub c1: Point,
    pub c2: Point,
    /// `Some(false)` renders the invalid-drop cue; `None` means no
    /// candidate socket is hovered.
    pub valid: Option<bool>,
}

/// Ghost preview while dragging a toolbar item, in screen coordinates.
#[derive(Debug, Serialize)]
pub struct Ghost {
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Serialize)]
pub struct Scene {
    pub camera: Camera,
    pub nodes: Vec<NodeView>,
    pub wires: Vec<WireView>,
    pub pending_wire: Option<PendingWire>,
    pub ghost: Option<Ghost>,
    /// Kind armed for click-to-place, if any.
    pub armed: Option<NodeKind>,
}

/// Assemble the scene for the current engine state.
#[must_use]
pub fn build(core: &EngineCore) -> Scene {
    let nodes = core
        .graph
        .nodes()
        .iter()
        .map(|node| node_view(core, node))
        .collect();

    let wires = core
        .graph
        .connections()
        .iter()
        .filter_map(|conn| {
            let from = socket_position(
                core.graph.node(&conn.from_node)?,
                &conn.from_socket,
                SocketRole::Output,
            )?;
            let to = socket_position(
                core.graph.node(&conn.to_node)?,
                &conn.to_socket,
                SocketRole::Input,
            )?;
            let (c1, c2) = wire_controls(from, to);
            Some(WireView {
                id: conn.id,
                from,
                to,
                c1,
                c2,
                selected: core.ui.selected_wire == Some(conn.id),
            })
        })
        .collect();

    let (pending_wire, ghost, armed) = match &core.input {
        InputState::Wiring { from, cursor_world, hover } => {
            let start = core
                .graph
                .node(&from.node)
                .and_then(|n| socket_position(n, &from.socket, from.role));
            let pending = start.map(|start| {
                let (c1, c2) = wire_controls(start, *cursor_world);
                PendingWire {
                    from: start,
                    to: *cursor_world,
                    c1,
                    c2,
                    valid: hover.as_ref().map(|h| wire_is_valid(from, h)),
                }
            });
            (pending, None, None)
        }
        InputState::DraggingNewNode { kind, cursor_screen, .. } => (
            None,
            Some(Ghost { kind: *kind, x: cursor_screen.x, y: cursor_screen.y }),
            None,
        ),
        InputState::ArmedPlacement { kind } => (None, None, Some(*kind)),
        _ => (None, None, None),
    };

    Scene {
        camera: core.camera,
        nodes,
        wires,
        pending_wire,
        ghost,
        armed,
    }
}

fn node_view(core: &EngineCore, node: &Node) -> NodeView {
    NodeView {
        id: node.id,
        kind: node.kind,
        title: node.title.clone(),
        x: node.position.x,
        y: node.position.y,
        width: node.width,
        height: node.height,
        stride: node.stride(),
        selected: core.ui.selected_nodes.contains(&node.id),
        inputs: socket_views(core, node, SocketRole::Input),
        outputs: socket_views(core, node, SocketRole::Output),
        content: content_view(core, node),
        data: node.data.clone(),
    }
}

fn socket_views(core: &EngineCore, node: &Node, role: SocketRole) -> Vec<SocketView> {
    let row = match role {
        SocketRole::Input => &node.inputs,
        SocketRole::Output => &node.outputs,
    };
    row.iter()
        .enumerate()
        .map(|(index, socket)| {
            let center = socket_center(node, index, role);
            let connected = core.graph.connections().iter().any(|c| match role {
                SocketRole::Input => c.to_node == node.id && c.to_socket == socket.id,
                SocketRole::Output => c.from_node == node.id && c.from_socket == socket.id,
            });
            SocketView {
                id: socket.id.clone(),
                label: socket.label.clone(),
                x: center.x,
                y: center.y,
                connected,
            }
        })
        .collect()
}

fn content_view(core: &EngineCore, node: &Node) -> ContentView {
    match content_state(&core.graph, &core.catalog, node) {
        ContentState::Fixed => ContentView::Fixed,
        ContentState::Disconnected => ContentView::Disconnected,
        ContentState::Unavailable => {
            match resolve_active_content(&core.graph, &core.catalog, node.id) {
                Some(ActiveContent::Project(p)) => {
                    ContentView::Unavailable { slug: p.slug.clone() }
                }
                _ => ContentView::Disconnected,
            }
        }
        ContentState::Ready => {
            match resolve_active_content(&core.graph, &core.catalog, node.id) {
                Some(ActiveContent::Project(p)) => ContentView::Project { slug: p.slug.clone() },
                Some(ActiveContent::Job(j)) => ContentView::Job { id: j.id.clone() },
                None => ContentView::Disconnected,
            }
        }
    }
}
