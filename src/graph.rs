//! Graph store: the authoritative collections of nodes and connections,
//! plus the copy/paste clipboard.
//!
//! Mutations rebuild the affected collection rather than patching entries
//! in place, so the propagation pass and the renderer always observe a
//! consistent snapshot. Identifiers are minted here — never derived from
//! wall-clock time — so rapid repeated actions cannot collide.

#[cfg(test)]
#[path = "graph_test.rs"]
mod graph_test;

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::camera::Point;
use crate::catalog::Catalog;
use crate::consts::PASTE_OFFSET;
use crate::node::{Node, NodeId, NodeKind, SocketRole};

/// Unique identifier for a connection.
pub type ConnectionId = Uuid;

/// A directed wire from one node's output socket to another node's input
/// socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub from_node: NodeId,
    pub from_socket: String,
    pub to_node: NodeId,
    pub to_socket: String,
}

/// One generation of copied graph structure.
///
/// Holds snapshots of the copied nodes and only the connections whose both
/// endpoints were inside the copied set. `generation` counts pastes so
/// each paste lands at a fresh offset.
#[derive(Debug, Clone)]
pub struct Clipboard {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    generation: u32,
}

impl Clipboard {
    /// Whether the clipboard snapshot references the given node.
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == *id)
    }

    /// Number of nodes in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the snapshot holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// In-memory store of nodes and connections.
pub struct GraphStore {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
}

impl GraphStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new(), connections: Vec::new() }
    }

    fn mint_id() -> Uuid {
        Uuid::new_v4()
    }

    // --- Queries ---

    /// All nodes in insertion (stacking) order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All connections in insertion order.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Return a reference to a node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    /// Return a mutable reference to a node by id.
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == *id)
    }

    /// Return a reference to a connection by id.
    #[must_use]
    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == *id)
    }

    /// The connection terminating at the given input socket, if any.
    /// At most one exists (see [`GraphStore::add_connection`]).
    #[must_use]
    pub fn incoming(&self, node: NodeId, socket: &str) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.to_node == node && c.to_socket == socket)
    }

    /// Number of nodes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the store contains no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // --- Node mutations ---

    /// Create a node of `kind` at `position` with its seeded defaults and
    /// add it above all existing nodes.
    pub fn spawn(&mut self, kind: NodeKind, position: Point, catalog: &Catalog) -> NodeId {
        let id = Self::mint_id();
        self.nodes.push(Node::seeded(id, kind, position, catalog));
        id
    }

    /// Insert a fully built node. If a node with the same `id` already
    /// exists it is overwritten in place.
    pub fn insert(&mut self, node: Node) {
        if let Some(existing) = self.node_mut(&node.id) {
            *existing = node;
        } else {
            self.nodes.push(node);
        }
    }

    /// Remove the given nodes and every connection touching any of them.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) {
        let doomed: HashSet<NodeId> = ids.iter().copied().collect();
        self.nodes.retain(|n| !doomed.contains(&n.id));
        self.connections
            .retain(|c| !doomed.contains(&c.from_node) && !doomed.contains(&c.to_node));
    }

    /// Translate the given nodes by a world-space delta.
    pub fn translate_nodes(&mut self, ids: &HashSet<NodeId>, dx: f64, dy: f64) {
        for node in self.nodes.iter_mut().filter(|n| ids.contains(&n.id)) {
            node.position = Point::new(node.position.x + dx, node.position.y + dy);
        }
    }

    /// Set a node's layout box. `height` stays `None` for auto-sized nodes.
    pub fn set_node_size(&mut self, id: &NodeId, width: f64, height: Option<f64>) {
        if let Some(node) = self.node_mut(id) {
            node.width = width;
            node.height = height;
        }
    }

    /// Merge a JSON patch into a node's data bag. Keys present in the
    /// patch overwrite, `null` values delete. Returns false if the node
    /// doesn't exist or the patch isn't an object.
    pub fn merge_node_data(&mut self, id: &NodeId, patch: &serde_json::Value) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let Some(incoming) = patch.as_object() else {
            return false;
        };

        if !node.data.is_object() {
            node.data = serde_json::json!({});
        }

        if let Some(existing) = node.data.as_object_mut() {
            for (k, v) in incoming {
                if v.is_null() {
                    existing.remove(k);
                } else {
                    existing.insert(k.clone(), v.clone());
                }
            }
        }
        true
    }

    // --- Connection mutations ---

    /// Add a wire. Any prior connection into the same input socket is
    /// removed first: an input holds at most one wire, while outputs may
    /// fan out freely.
    pub fn add_connection(
        &mut self,
        from_node: NodeId,
        from_socket: &str,
        to_node: NodeId,
        to_socket: &str,
    ) -> ConnectionId {
        self.connections
            .retain(|c| !(c.to_node == to_node && c.to_socket == to_socket));
        let id = Self::mint_id();
        self.connections.push(Connection {
            id,
            from_node,
            from_socket: from_socket.to_owned(),
            to_node,
            to_socket: to_socket.to_owned(),
        });
        id
    }

    /// Remove a connection by id. Returns whether it was present.
    pub fn remove_connection(&mut self, id: &ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id != *id);
        self.connections.len() != before
    }

    /// Keep only connections matching the predicate.
    pub fn retain_connections(&mut self, pred: impl FnMut(&Connection) -> bool) {
        self.connections.retain(pred);
    }

    /// Remove every connection touching the given socket, in either
    /// direction.
    pub fn disconnect_socket(&mut self, node: NodeId, socket: &str) {
        self.connections.retain(|c| {
            !((c.from_node == node && c.from_socket == socket)
                || (c.to_node == node && c.to_socket == socket))
        });
    }

    /// Repoint every connection originating at `from_node` to a new source
    /// socket. With `only_into` set, only wires terminating at that input
    /// socket id are repointed.
    pub fn repoint_outgoing(
        &mut self,
        from_node: NodeId,
        new_socket: &str,
        only_into: Option<&str>,
    ) {
        for conn in self.connections.iter_mut().filter(|c| c.from_node == from_node) {
            if only_into.is_none_or(|socket| conn.to_socket == socket) {
                conn.from_socket = new_socket.to_owned();
            }
        }
    }

    /// Drop connections whose endpoint sockets (or nodes) no longer exist.
    /// Returns how many were removed.
    pub fn prune_dangling(&mut self) -> usize {
        let nodes = &self.nodes;
        let before = self.connections.len();
        self.connections.retain(|c| {
            let from_ok = nodes
                .iter()
                .find(|n| n.id == c.from_node)
                .is_some_and(|n| n.has_socket(&c.from_socket, SocketRole::Output));
            let to_ok = nodes
                .iter()
                .find(|n| n.id == c.to_node)
                .is_some_and(|n| n.has_socket(&c.to_socket, SocketRole::Input));
            from_ok && to_ok
        });
        before - self.connections.len()
    }

    // --- Clipboard ---

    /// Snapshot the given nodes plus only the connections whose both
    /// endpoints are inside the selection. Returns `None` for an empty
    /// selection.
    #[must_use]
    pub fn copy(&self, selection: &HashSet<NodeId>) -> Option<Clipboard> {
        let nodes: Vec<Node> = self
            .nodes
            .iter()
            .filter(|n| selection.contains(&n.id))
            .cloned()
            .collect();
        if nodes.is_empty() {
            return None;
        }
        let connections = self
            .connections
            .iter()
            .filter(|c| selection.contains(&c.from_node) && selection.contains(&c.to_node))
            .cloned()
            .collect();
        Some(Clipboard { nodes, connections, generation: 0 })
    }

    /// Clone the clipboard contents into the graph with freshly minted
    /// ids, offsetting positions by one more step per paste generation.
    /// Returns the ids of the pasted nodes.
    pub fn paste(&mut self, clipboard: &mut Clipboard) -> Vec<NodeId> {
        clipboard.generation += 1;
        let offset = PASTE_OFFSET * f64::from(clipboard.generation);

        let mut id_map: HashMap<NodeId, NodeId> = HashMap::new();
        let mut pasted = Vec::with_capacity(clipboard.nodes.len());

        for node in &clipboard.nodes {
            let new_id = Self::mint_id();
            id_map.insert(node.id, new_id);
            let mut clone = node.clone();
            clone.id = new_id;
            clone.position = Point::new(node.position.x + offset, node.position.y + offset);
            self.nodes.push(clone);
            pasted.push(new_id);
        }

        for conn in &clipboard.connections {
            let (Some(&from), Some(&to)) = (id_map.get(&conn.from_node), id_map.get(&conn.to_node))
            else {
                continue;
            };
            self.connections.push(Connection {
                id: Self::mint_id(),
                from_node: from,
                from_socket: conn.from_socket.clone(),
                to_node: to,
                to_socket: conn.to_socket.clone(),
            });
        }

        pasted
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
