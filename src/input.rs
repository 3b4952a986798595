//! Input model: buttons, modifier keys, wheel deltas, the gesture state
//! machine, and selection state.
//!
//! `InputState` is the single exclusive drag mode. Each active variant
//! carries the reference frame recorded at gesture start, so handlers
//! compute deltas from explicit session data instead of relying on
//! platform pointer-capture side effects.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::HashSet;

use crate::camera::Point;
use crate::consts::WHEEL_ZOOM_MIN_DELTA;
use crate::graph::ConnectionId;
use crate::node::{NodeId, NodeKind, SocketRole};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }

    /// Whether this button drives canvas panning regardless of target.
    #[must_use]
    pub fn is_pan_button(self) -> bool {
        matches!(self, Self::Middle | Self::Secondary)
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// The platform shortcut accelerator: Ctrl, or Command on macOS.
    #[must_use]
    pub fn accel(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A keyboard key, holding the name as reported by the browser
/// (e.g. `"Delete"`, `"Escape"`, `"c"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

impl WheelDelta {
    /// Heuristic for a discrete mouse wheel as opposed to a trackpad:
    /// large, integral, vertical-only deltas. Approximate by nature; the
    /// thresholds are tunables, not a contract.
    #[must_use]
    pub fn looks_like_mouse_wheel(self) -> bool {
        self.dy.abs() >= WHEEL_ZOOM_MIN_DELTA && self.dx == 0.0 && self.dy.fract() == 0.0
    }
}

/// A socket on a specific node, with its row identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketRef {
    pub node: NodeId,
    pub socket: String,
    pub role: SocketRole,
}

/// Internal state for the gesture state machine.
///
/// Exactly one variant is active at a time; entry and exit are driven by
/// pointer events in [`crate::engine::EngineCore`].
#[derive(Debug, Clone)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// The user is panning the canvas.
    Panning {
        /// Screen-space position of the previous pointer event, used to
        /// compute the pan delta.
        last_screen: Point,
    },
    /// The user is moving the selected node(s).
    MovingNodes {
        /// The node the drag started on.
        anchor: NodeId,
        /// Screen-space position of the previous pointer event; refreshed
        /// every frame so group moves don't drift.
        last_screen: Point,
    },
    /// The user is resizing a node from its corner handle.
    Resizing {
        /// Id of the node being resized.
        id: NodeId,
        /// Screen-space pointer position at the start of the resize.
        start_screen: Point,
        /// Node width at the start of the resize.
        orig_w: f64,
        /// Node height at the start of the resize; `None` for auto-sized
        /// nodes, which keep their height automatic.
        orig_h: Option<f64>,
    },
    /// The user is dragging a wire out of a socket.
    Wiring {
        /// The socket the wire started from.
        from: SocketRef,
        /// World-space position of the loose end, for rendering.
        cursor_world: Point,
        /// The socket currently under the cursor, if any.
        hover: Option<SocketRef>,
    },
    /// The user dragged a toolbar item and hasn't released yet.
    DraggingNewNode {
        /// Kind of node being placed.
        kind: NodeKind,
        /// Screen position of the initiating pointer-down, used to
        /// disambiguate click (arm) from drag (drop).
        start_screen: Point,
        /// Current screen position, for rendering the ghost.
        cursor_screen: Point,
    },
    /// A toolbar item was clicked; the next primary click places the
    /// node at that canvas position. Escape cancels.
    ArmedPlacement {
        /// Kind of node to place.
        kind: NodeKind,
    },
}

impl Default for InputState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Selection state visible to the renderer.
///
/// Node and wire selection are mutually exclusive; the setters below
/// maintain that.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Ids of the currently selected nodes.
    pub selected_nodes: HashSet<NodeId>,
    /// The currently selected wire, if any.
    pub selected_wire: Option<ConnectionId>,
}

impl UiState {
    /// Drop both selections.
    pub fn clear(&mut self) {
        self.selected_nodes.clear();
        self.selected_wire = None;
    }

    /// Whether anything at all is selected.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.selected_nodes.is_empty() || self.selected_wire.is_some()
    }

    /// Replace the selection with a single node.
    pub fn select_only_node(&mut self, id: NodeId) {
        self.selected_wire = None;
        self.selected_nodes.clear();
        self.selected_nodes.insert(id);
    }

    /// Toggle a node in or out of the multi-selection.
    pub fn toggle_node(&mut self, id: NodeId) {
        self.selected_wire = None;
        if !self.selected_nodes.remove(&id) {
            self.selected_nodes.insert(id);
        }
    }

    /// Replace node selection with a set (used after paste).
    pub fn select_nodes(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.selected_wire = None;
        self.selected_nodes = ids.into_iter().collect();
    }

    /// Select a wire, dropping any node selection.
    pub fn select_wire(&mut self, id: ConnectionId) {
        self.selected_nodes.clear();
        self.selected_wire = Some(id);
    }
}
