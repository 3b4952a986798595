//! Shared numeric constants for the canvas engine.

// ── Camera ──────────────────────────────────────────────────────

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.4;

/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 2.5;

/// Zoom the canvas opens with (also restored on reset).
pub const DEFAULT_ZOOM: f64 = 0.75;

/// Scale change per wheel-delta unit when zooming about the cursor.
pub const ZOOM_SENSITIVITY: f64 = 0.002;

/// Minimum |dy| for a bare wheel event to count as a mouse wheel
/// (and therefore zoom instead of pan). Tunable, not a contract.
pub const WHEEL_ZOOM_MIN_DELTA: f64 = 20.0;

// ── Node box ────────────────────────────────────────────────────

/// Height of the draggable node header strip, in world units.
pub const NODE_HEADER_H: f64 = 32.0;

/// Vertical pitch between stacked sockets when a node doesn't set its own.
pub const DEFAULT_SOCKET_STRIDE: f64 = 40.0;

/// Socket pitch for list-style nodes whose row labels wrap to two lines.
pub const LIST_SOCKET_STRIDE: f64 = 60.0;

/// Content height reserved below the header for an empty list node.
pub const MIN_CONTENT_H: f64 = 80.0;

/// Floor for user-driven width resizing.
pub const MIN_NODE_WIDTH: f64 = 200.0;

/// Floor for user-driven height resizing of non-list nodes, and the
/// nominal box height used to hit-test auto-sized nodes.
pub const MIN_NODE_HEIGHT: f64 = 150.0;

/// Side of the square resize grab area in the node's bottom-right corner,
/// in world units.
pub const RESIZE_HANDLE: f64 = 24.0;

// ── Gestures ────────────────────────────────────────────────────

/// Screen-space hit slop in pixels around a socket center.
pub const SOCKET_HIT_RADIUS_PX: f64 = 12.0;

/// Screen-space hit slop in pixels around a wire path.
pub const WIRE_HIT_RADIUS_PX: f64 = 6.0;

/// Pointer travel in screen pixels below which a toolbar release counts as
/// a click (arming click-to-place) rather than a drag-to-place drop.
pub const PLACE_CLICK_THRESHOLD_PX: f64 = 4.0;

/// Offset from the drop point to a newly placed node's top-left corner, so
/// the node lands under the cursor rather than hanging off it.
pub const PLACE_GRAB_OFFSET_X: f64 = 150.0;
pub const PLACE_GRAB_OFFSET_Y: f64 = 20.0;

/// World-space offset applied per paste generation.
pub const PASTE_OFFSET: f64 = 50.0;

/// Horizontal gap between a source node and an auto-spawned node.
pub const SPAWN_GAP: f64 = 50.0;

// ── Wires ───────────────────────────────────────────────────────

/// Minimum horizontal reach of a wire's Bézier control points.
pub const WIRE_MIN_CONTROL: f64 = 50.0;

/// Sample count when approximating distance to a wire curve.
pub const WIRE_HIT_SAMPLES: usize = 32;
