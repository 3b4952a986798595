//! Top-level engine: routes pointer and keyboard events through the
//! gesture state machine into graph mutations.
//!
//! All logic lives on [`EngineCore`], which has no browser dependencies
//! and is exercised directly by the test suite; the wasm wrapper in
//! [`crate::wasm`] only delegates. Every structural mutation ends with a
//! settle pass, so the host only ever observes converged graph snapshots.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashSet;

use serde::Serialize;

use crate::camera::{Camera, Point};
use crate::catalog::Catalog;
use crate::consts::{
    DEFAULT_ZOOM, MIN_NODE_WIDTH, PLACE_CLICK_THRESHOLD_PX, PLACE_GRAB_OFFSET_X,
    PLACE_GRAB_OFFSET_Y, SPAWN_GAP,
};
use crate::derive;
use crate::graph::{Clipboard, GraphStore};
use crate::hit::{self, Hit, HitPart};
use crate::input::{Button, InputState, Key, Modifiers, SocketRef, UiState, WheelDelta};
use crate::layout;
use crate::node::{
    IN_FILTER, IN_SELECT, Node, NodeId, NodeKind, OUT_META, OUT_PROJECT_PREFIX, SocketRole,
};

/// Host-directed requests returned from input handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// State visible to the renderer changed; repaint.
    RenderNeeded,
    /// Change the pointer cursor.
    SetCursor { cursor: String },
    /// Dismiss any open fullscreen overlay.
    CloseOverlay,
}

fn cursor(name: &str) -> Action {
    Action::SetCursor { cursor: name.to_owned() }
}

/// Core engine state — all logic that doesn't depend on the browser.
pub struct EngineCore {
    pub catalog: Catalog,
    pub graph: GraphStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub clipboard: Option<Clipboard>,
}

impl EngineCore {
    /// Build the engine with the default graph derived from the catalog.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let mut core = Self {
            catalog,
            graph: GraphStore::new(),
            camera: Camera { pan_x: 0.0, pan_y: 0.0, zoom: DEFAULT_ZOOM },
            ui: UiState::default(),
            input: InputState::Idle,
            clipboard: None,
        };
        layout::initial_graph(&core.catalog, &mut core.graph);
        core.settle();
        core
    }

    /// Discard the whole graph and rebuild the default layout and view.
    pub fn reset(&mut self) -> Vec<Action> {
        self.graph = GraphStore::new();
        layout::initial_graph(&self.catalog, &mut self.graph);
        self.camera = Camera { pan_x: 0.0, pan_y: 0.0, zoom: DEFAULT_ZOOM };
        self.ui.clear();
        self.input = InputState::Idle;
        self.settle();
        vec![Action::RenderNeeded]
    }

    // --- Queries ---

    /// The currently selected node ids.
    #[must_use]
    pub fn selection(&self) -> &HashSet<NodeId> {
        &self.ui.selected_nodes
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.graph.node(id)
    }

    // --- Host callbacks ---

    /// Merge a JSON patch into a node's data bag (e.g. the gallery image
    /// index driven by in-node navigation).
    pub fn merge_node_data(&mut self, id: &NodeId, patch: &serde_json::Value) -> Vec<Action> {
        if self.graph.merge_node_data(id, patch) {
            self.settle();
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Create a media node to the right of `source`, pre-wired from its
    /// metadata output (the "open gallery from details" affordance).
    pub fn spawn_from(&mut self, source: NodeId, kind: NodeKind) -> Option<NodeId> {
        let src = self.graph.node(&source)?;
        let position = Point::new(src.position.x + src.width + SPAWN_GAP, src.position.y);
        let has_meta = src.has_socket(OUT_META, SocketRole::Output);

        let id = self.graph.spawn(kind, position, &self.catalog);
        if has_meta && let Some(input) = kind.content_input() {
            self.graph.add_connection(source, OUT_META, id, input);
        }
        self.ui.select_only_node(id);
        self.settle();
        Some(id)
    }

    /// Route a different item socket into everything wired out of `node`
    /// (clicking a row of a catalog-source node switches the whole
    /// downstream chain), then cascade first-item reselection.
    pub fn switch_output(&mut self, node: NodeId, socket: &str) -> Vec<Action> {
        if !self.graph.connections().iter().any(|c| c.from_node == node) {
            return Vec::new();
        }
        let is_source = self
            .graph
            .node(&node)
            .is_some_and(|n| n.kind.is_catalog_source());

        self.graph.repoint_outgoing(node, socket, None);

        if is_source {
            let lists: Vec<NodeId> = self
                .graph
                .connections()
                .iter()
                .filter(|c| c.from_node == node && c.to_socket == IN_FILTER)
                .map(|c| c.to_node)
                .collect();
            for list in lists {
                self.reselect_first_item(list);
            }
        }
        self.settle();
        vec![Action::RenderNeeded]
    }

    /// Remove every wire touching the given socket, in either direction.
    pub fn disconnect_socket(&mut self, node: NodeId, socket: &str) -> Vec<Action> {
        self.graph.disconnect_socket(node, socket);
        self.settle();
        vec![Action::RenderNeeded]
    }

    // --- Pointer events ---

    pub fn on_pointer_down(
        &mut self,
        screen: Point,
        button: Button,
        mods: Modifiers,
    ) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);

        // An armed toolbar placement consumes the next primary click.
        if let InputState::ArmedPlacement { kind } = &self.input {
            let kind = *kind;
            self.input = InputState::Idle;
            if button == Button::Primary {
                self.place_node(kind, world);
                return vec![cursor("default"), Action::RenderNeeded];
            }
        }

        if button.is_pan_button() {
            self.input = InputState::Panning { last_screen: screen };
            return vec![cursor("grabbing")];
        }

        match hit::hit_test(world, &self.graph, self.camera.zoom) {
            Some(Hit { node, part: HitPart::Socket { id, role } }) => {
                self.input = InputState::Wiring {
                    from: SocketRef { node, socket: id, role },
                    cursor_world: world,
                    hover: None,
                };
                vec![cursor("crosshair"), Action::RenderNeeded]
            }
            Some(Hit { node, part: HitPart::ResizeHandle }) => {
                if let Some(n) = self.graph.node(&node) {
                    self.input = InputState::Resizing {
                        id: node,
                        start_screen: screen,
                        orig_w: n.width,
                        orig_h: n.height,
                    };
                }
                vec![cursor("nwse-resize")]
            }
            Some(Hit { node, part: HitPart::Header }) => {
                if mods.shift {
                    self.ui.toggle_node(node);
                } else if !self.ui.selected_nodes.contains(&node) {
                    self.ui.select_only_node(node);
                }
                // A shift-toggle can deselect the node; only a node that
                // ends up selected starts a drag.
                if self.ui.selected_nodes.contains(&node) {
                    self.input = InputState::MovingNodes { anchor: node, last_screen: screen };
                    return vec![cursor("grabbing"), Action::RenderNeeded];
                }
                vec![Action::RenderNeeded]
            }
            Some(Hit { part: HitPart::Body, .. }) => {
                // Content clicks belong to the host; no selection change.
                Vec::new()
            }
            None => {
                if let Some(wire) = hit::hit_test_wire(world, &self.graph, self.camera.zoom) {
                    self.ui.select_wire(wire);
                    return vec![Action::RenderNeeded];
                }
                let had_selection = self.ui.has_selection();
                self.ui.clear();
                self.input = InputState::Panning { last_screen: screen };
                if had_selection {
                    vec![cursor("grabbing"), Action::RenderNeeded]
                } else {
                    vec![cursor("grabbing")]
                }
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen: Point, _mods: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);

        match std::mem::take(&mut self.input) {
            InputState::Panning { last_screen } => {
                self.camera
                    .pan_by(screen.x - last_screen.x, screen.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen };
                vec![Action::RenderNeeded]
            }
            InputState::MovingNodes { anchor, last_screen } => {
                let dx = self.camera.screen_dist_to_world(screen.x - last_screen.x);
                let dy = self.camera.screen_dist_to_world(screen.y - last_screen.y);
                let targets = if self.ui.selected_nodes.contains(&anchor) {
                    self.ui.selected_nodes.clone()
                } else {
                    HashSet::from([anchor])
                };
                self.graph.translate_nodes(&targets, dx, dy);
                self.input = InputState::MovingNodes { anchor, last_screen: screen };
                vec![Action::RenderNeeded]
            }
            InputState::Resizing { id, start_screen, orig_w, orig_h } => {
                let dx = self.camera.screen_dist_to_world(screen.x - start_screen.x);
                let dy = self.camera.screen_dist_to_world(screen.y - start_screen.y);
                let width = (orig_w + dx).max(MIN_NODE_WIDTH);
                // Auto-sized nodes stay automatic; sized nodes floor at
                // their content-driven minimum.
                let height = orig_h.map(|h| {
                    let floor = self.graph.node(&id).map_or(0.0, Node::min_height);
                    (h + dy).max(floor)
                });
                self.graph.set_node_size(&id, width, height);
                self.input = InputState::Resizing { id, start_screen, orig_w, orig_h };
                vec![Action::RenderNeeded]
            }
            InputState::Wiring { from, .. } => {
                let hover = match hit::hit_test(world, &self.graph, self.camera.zoom) {
                    Some(Hit { node, part: HitPart::Socket { id, role } }) => {
                        Some(SocketRef { node, socket: id, role })
                    }
                    _ => None,
                };
                self.input = InputState::Wiring { from, cursor_world: world, hover };
                vec![Action::RenderNeeded]
            }
            InputState::DraggingNewNode { kind, start_screen, .. } => {
                self.input = InputState::DraggingNewNode {
                    kind,
                    start_screen,
                    cursor_screen: screen,
                };
                vec![Action::RenderNeeded]
            }
            idle @ (InputState::Idle | InputState::ArmedPlacement { .. }) => {
                self.input = idle;
                Vec::new()
            }
        }
    }

    pub fn on_pointer_up(
        &mut self,
        screen: Point,
        _button: Button,
        _mods: Modifiers,
    ) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);

        match std::mem::take(&mut self.input) {
            InputState::Panning { .. }
            | InputState::MovingNodes { .. }
            | InputState::Resizing { .. } => vec![cursor("default")],
            InputState::Wiring { from, hover, .. } => {
                let target = hover.or_else(|| {
                    match hit::hit_test(world, &self.graph, self.camera.zoom) {
                        Some(Hit { node, part: HitPart::Socket { id, role } }) => {
                            Some(SocketRef { node, socket: id, role })
                        }
                        _ => None,
                    }
                });
                if let Some(target) = target
                    && wire_is_valid(&from, &target)
                {
                    self.commit_wire(&from, &target);
                }
                vec![cursor("default"), Action::RenderNeeded]
            }
            InputState::DraggingNewNode { kind, start_screen, .. } => {
                let travel = (screen.x - start_screen.x).hypot(screen.y - start_screen.y);
                if travel < PLACE_CLICK_THRESHOLD_PX {
                    // Sub-threshold release arms click-to-place.
                    self.input = InputState::ArmedPlacement { kind };
                    vec![cursor("crosshair"), Action::RenderNeeded]
                } else {
                    self.place_node(kind, world);
                    vec![cursor("default"), Action::RenderNeeded]
                }
            }
            armed @ InputState::ArmedPlacement { .. } => {
                self.input = armed;
                Vec::new()
            }
            InputState::Idle => Vec::new(),
        }
    }

    /// Abort any gesture in progress without mutating the graph. Runs on
    /// pointer-capture loss so no exit path leaves the machine stuck.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        vec![cursor("default"), Action::RenderNeeded]
    }

    pub fn on_double_click(&mut self, screen: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        match hit::hit_test(world, &self.graph, self.camera.zoom) {
            Some(Hit { node, part: HitPart::Socket { id, .. } }) => {
                self.disconnect_socket(node, &id)
            }
            _ => Vec::new(),
        }
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, mods: Modifiers) -> Vec<Action> {
        if mods.accel() || delta.looks_like_mouse_wheel() {
            self.camera.zoom_about(screen, -delta.dy);
        } else {
            // Trackpad scroll pans, inverted for the natural feel.
            self.camera.pan_by(-delta.dx, -delta.dy);
        }
        vec![Action::RenderNeeded]
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: &Key, mods: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Escape" => {
                let mut actions = vec![Action::CloseOverlay];
                if matches!(
                    self.input,
                    InputState::ArmedPlacement { .. } | InputState::DraggingNewNode { .. }
                ) {
                    self.input = InputState::Idle;
                    actions.push(cursor("default"));
                    actions.push(Action::RenderNeeded);
                }
                actions
            }
            "Delete" | "Backspace" => self.delete_selection(),
            "c" | "C" if mods.accel() => {
                self.copy_selection();
                Vec::new()
            }
            "v" | "V" if mods.accel() => self.paste_clipboard(),
            _ => Vec::new(),
        }
    }

    // --- Toolbar ---

    /// Begin a node-placement gesture from a toolbar item.
    pub fn toolbar_down(&mut self, kind: NodeKind, screen: Point) -> Vec<Action> {
        self.input = InputState::DraggingNewNode {
            kind,
            start_screen: screen,
            cursor_screen: screen,
        };
        vec![cursor("grabbing"), Action::RenderNeeded]
    }

    // --- Clipboard ---

    /// Snapshot the selected nodes and their internal wires.
    pub fn copy_selection(&mut self) {
        if let Some(clip) = self.graph.copy(&self.ui.selected_nodes) {
            self.clipboard = Some(clip);
        }
    }

    /// Clone the clipboard into the graph and select the pasted nodes.
    pub fn paste_clipboard(&mut self) -> Vec<Action> {
        let Some(clip) = self.clipboard.as_mut() else {
            return Vec::new();
        };
        let pasted = self.graph.paste(clip);
        self.ui.select_nodes(pasted);
        self.settle();
        vec![Action::RenderNeeded]
    }

    /// Delete the selected wire, or the selected nodes with every wire
    /// touching them. Deleting a copied node invalidates the clipboard.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        if let Some(wire) = self.ui.selected_wire {
            self.graph.remove_connection(&wire);
            self.ui.clear();
            self.settle();
            return vec![Action::RenderNeeded];
        }
        if self.ui.selected_nodes.is_empty() {
            return Vec::new();
        }
        let ids: Vec<NodeId> = self.ui.selected_nodes.iter().copied().collect();
        self.graph.remove_nodes(&ids);
        if let Some(clip) = &self.clipboard
            && ids.iter().any(|id| clip.contains_node(id))
        {
            self.clipboard = None;
        }
        self.ui.clear();
        self.settle();
        vec![Action::RenderNeeded]
    }

    // --- Internals ---

    fn place_node(&mut self, kind: NodeKind, world: Point) -> NodeId {
        let position =
            Point::new(world.x - PLACE_GRAB_OFFSET_X, world.y - PLACE_GRAB_OFFSET_Y);
        let id = self.graph.spawn(kind, position, &self.catalog);
        self.settle();
        id
    }

    fn commit_wire(&mut self, a: &SocketRef, b: &SocketRef) {
        let (out, inp) = if a.role == SocketRole::Output { (a, b) } else { (b, a) };
        self.graph
            .add_connection(out.node, &out.socket, inp.node, &inp.socket);
        // Routing a new item into a list filter drags the chain behind
        // the list onto the first freshly filtered item. This must land
        // before the settle pass prunes the now-stale row wire.
        if inp.socket == IN_FILTER {
            self.reselect_first_item(inp.node);
        }
        self.settle();
    }

    /// Repoint wires from a list node's rows into downstream selection
    /// inputs at the first item the list is about to display. No-op when
    /// the prospective rows are empty. The caller settles afterwards.
    fn reselect_first_item(&mut self, list: NodeId) {
        let Some(node) = self.graph.node(&list) else {
            return;
        };
        if !node.kind.is_filter_list() {
            return;
        }
        let slugs = derive::filtered_slugs(&self.graph, &self.catalog, node);
        let Some(first) = slugs.first() else {
            return;
        };
        let socket = format!("{OUT_PROJECT_PREFIX}{first}");
        self.graph.repoint_outgoing(list, &socket, Some(IN_SELECT));
    }

    /// Settle derived state, then drop selection entries the settle made
    /// stale (pruned wires, removed nodes).
    fn settle(&mut self) {
        derive::settle(&mut self.graph, &self.catalog);
        self.ui.selected_nodes.retain(|id| {
            self.graph.nodes().iter().any(|n| n.id == *id)
        });
        if let Some(wire) = self.ui.selected_wire
            && self.graph.connection(&wire).is_none()
        {
            self.ui.selected_wire = None;
        }
    }
}

/// A wire may land iff it joins two different nodes through sockets of
/// opposite roles. Occupied inputs are fine — the old wire is replaced.
#[must_use]
pub fn wire_is_valid(a: &SocketRef, b: &SocketRef) -> bool {
    a.node != b.node && a.role != b.role
}
