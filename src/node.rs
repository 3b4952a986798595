//! Node model: kinds, sockets, and the per-node data bag.
//!
//! `NodeKind` is a closed enumeration with a capability table: the
//! propagation and resolution passes ask a kind what it *can* do (carry a
//! filter input, contribute catalog items, pass content through) instead
//! of matching on kinds inline. Per-node free-form state lives in a JSON
//! bag behind the typed [`NodeData`] accessor.

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;

use serde::Serialize;
use uuid::Uuid;

use crate::camera::Point;
use crate::catalog::Catalog;
use crate::consts::{
    DEFAULT_SOCKET_STRIDE, LIST_SOCKET_STRIDE, MIN_CONTENT_H, MIN_NODE_HEIGHT, NODE_HEADER_H,
};

/// Unique identifier for a node.
pub type NodeId = Uuid;

// Well-known socket ids. Per-item output sockets append the item key to a
// namespace prefix so a socket id alone identifies the routed item.
pub const IN_FILTER: &str = "in-filter";
pub const IN_SELECT: &str = "in-select";
pub const OUT_META: &str = "out-meta";
pub const IN_VISUAL: &str = "in-visual";
pub const IN_GEO: &str = "in-geo";
pub const IN_VIDEO: &str = "in-video";
pub const IN_DECK: &str = "in-deck";
pub const IN_DATA: &str = "in-data";
pub const OUT_PROJECT_PREFIX: &str = "out-p-";
pub const OUT_JOB_PREFIX: &str = "out-job-";
pub const OUT_THEME_PREFIX: &str = "out-th-";

/// Whether a socket accepts or emits wires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SocketRole {
    Input,
    Output,
}

/// A named connection point on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Socket {
    pub id: String,
    pub label: String,
}

impl Socket {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into() }
    }

    /// A socket with no hover label (per-item list rows carry their label
    /// in the row itself).
    #[must_use]
    pub fn bare(id: impl Into<String>) -> Self {
        Self { id: id.into(), label: String::new() }
    }
}

/// The capability class of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Header,
    Social,
    ProjectList,
    WorkHistory,
    ThemeList,
    Details,
    ImageGallery,
    Viewer3d,
    Video,
    Presentation,
    Contact,
    Chart,
}

impl NodeKind {
    /// Display title assigned at creation.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Header => "WhoIs",
            Self::Social => "Social",
            Self::ProjectList => "Project Index",
            Self::WorkHistory => "Work Experience",
            Self::ThemeList => "Themes",
            Self::Details => "Details",
            Self::ImageGallery => "Gallery",
            Self::Viewer3d => "3D Viewer",
            Self::Video => "Video",
            Self::Presentation => "Presentation",
            Self::Contact => "Contact",
            Self::Chart => "Data",
        }
    }

    /// Parse the kebab-case name used on the host boundary.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "header" => Some(Self::Header),
            "social" => Some(Self::Social),
            "project-list" => Some(Self::ProjectList),
            "work-history" => Some(Self::WorkHistory),
            "theme-list" => Some(Self::ThemeList),
            "details" => Some(Self::Details),
            "image-gallery" => Some(Self::ImageGallery),
            "viewer3d" => Some(Self::Viewer3d),
            "video" => Some(Self::Video),
            "presentation" => Some(Self::Presentation),
            "contact" => Some(Self::Contact),
            "chart" => Some(Self::Chart),
            _ => None,
        }
    }

    /// Whether this kind derives its item rows from an upstream filter.
    #[must_use]
    pub fn is_filter_list(self) -> bool {
        matches!(self, Self::ProjectList)
    }

    /// Whether this kind contributes catalog items through per-item
    /// output sockets.
    #[must_use]
    pub fn is_catalog_source(self) -> bool {
        matches!(self, Self::WorkHistory | Self::ThemeList)
    }

    /// Whether this kind passes upstream content through to consumers
    /// without contributing an item of its own.
    #[must_use]
    pub fn is_selector(self) -> bool {
        matches!(self, Self::Details)
    }

    /// Whether this kind displays whatever item resolves upstream.
    #[must_use]
    pub fn shows_upstream_content(self) -> bool {
        matches!(
            self,
            Self::Details
                | Self::ImageGallery
                | Self::Viewer3d
                | Self::Video
                | Self::Presentation
                | Self::Chart
        )
    }

    /// Socket pitch for this kind. List rows wrap to two lines and need
    /// the wider pitch.
    #[must_use]
    pub fn stride(self) -> f64 {
        match self {
            Self::ProjectList | Self::WorkHistory | Self::ThemeList => LIST_SOCKET_STRIDE,
            _ => DEFAULT_SOCKET_STRIDE,
        }
    }

    /// The input socket that feeds this kind its content, if it has one.
    #[must_use]
    pub fn content_input(self) -> Option<&'static str> {
        match self {
            Self::Details => Some(IN_SELECT),
            Self::ImageGallery => Some(IN_VISUAL),
            Self::Viewer3d => Some(IN_GEO),
            Self::Video => Some(IN_VIDEO),
            Self::Presentation => Some(IN_DECK),
            Self::Chart => Some(IN_DATA),
            _ => None,
        }
    }
}

/// A positioned, typed visual unit on the canvas.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Top-left corner in world coordinates.
    pub position: Point,
    pub title: String,
    pub width: f64,
    /// `None` for auto-sized nodes whose extent the renderer derives from
    /// content.
    pub height: Option<f64>,
    pub inputs: Vec<Socket>,
    pub outputs: Vec<Socket>,
    /// Per-node socket pitch override.
    pub socket_stride: Option<f64>,
    /// Free-form per-node state (image index, displayed list, ...).
    pub data: serde_json::Value,
}

impl Node {
    /// Build a node of `kind` with its default socket layout and size.
    ///
    /// `position` is the top-left corner in world coordinates. Catalog
    /// sources seed one output per catalog item.
    #[must_use]
    pub fn seeded(id: NodeId, kind: NodeKind, position: Point, catalog: &Catalog) -> Self {
        let mut node = Self {
            id,
            kind,
            position,
            title: kind.title().to_owned(),
            width: 300.0,
            height: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            socket_stride: None,
            data: serde_json::json!({}),
        };

        match kind {
            NodeKind::Header | NodeKind::Social => {
                node.width = 350.0;
            }
            NodeKind::Contact => {}
            NodeKind::WorkHistory => {
                node.width = 350.0;
                node.socket_stride = Some(kind.stride());
                node.outputs = catalog
                    .jobs()
                    .iter()
                    .map(|j| Socket::bare(format!("{OUT_JOB_PREFIX}{}", j.id)))
                    .collect();
                node.height =
                    Some(NODE_HEADER_H + catalog.jobs().len() as f64 * kind.stride());
            }
            NodeKind::ThemeList => {
                node.width = 350.0;
                node.socket_stride = Some(kind.stride());
                node.outputs = catalog
                    .themes()
                    .iter()
                    .map(|t| Socket::new(format!("{OUT_THEME_PREFIX}{}", t.id), t.label.clone()))
                    .collect();
                node.height =
                    Some(NODE_HEADER_H + catalog.themes().len() as f64 * kind.stride());
            }
            NodeKind::ProjectList => {
                node.width = 350.0;
                node.socket_stride = Some(kind.stride());
                node.inputs = vec![Socket::new(IN_FILTER, "Filter")];
                node.height = Some(NODE_HEADER_H + MIN_CONTENT_H);
                node.data = serde_json::json!({ "displayed": [] });
            }
            NodeKind::Details => {
                node.width = 550.0;
                node.inputs = vec![Socket::new(IN_SELECT, "Context")];
                node.outputs = vec![Socket::new(OUT_META, "Metadata")];
            }
            NodeKind::ImageGallery => {
                node.width = 400.0;
                node.height = Some(300.0);
                node.inputs = vec![Socket::new(IN_VISUAL, "Visual Data")];
                node.data = serde_json::json!({ "imageIndex": 0 });
            }
            NodeKind::Viewer3d => {
                node.width = 400.0;
                node.height = Some(300.0);
                node.inputs = vec![Socket::new(IN_GEO, "Geometry")];
            }
            NodeKind::Video => {
                node.width = 400.0;
                node.height = Some(300.0);
                node.inputs = vec![Socket::new(IN_VIDEO, "Video")];
            }
            NodeKind::Presentation => {
                node.width = 400.0;
                node.height = Some(300.0);
                node.inputs = vec![Socket::new(IN_DECK, "Deck")];
            }
            NodeKind::Chart => {
                node.width = 400.0;
                node.height = Some(300.0);
                node.inputs = vec![Socket::new(IN_DATA, "Data")];
            }
        }

        node
    }

    /// Effective socket pitch.
    #[must_use]
    pub fn stride(&self) -> f64 {
        self.socket_stride.unwrap_or(DEFAULT_SOCKET_STRIDE)
    }

    /// Nominal box height: the explicit height, or a fixed fallback for
    /// auto-sized nodes (the renderer owns their true extent).
    #[must_use]
    pub fn box_height(&self) -> f64 {
        self.height.unwrap_or(MIN_NODE_HEIGHT)
    }

    /// Index of a socket within its row.
    #[must_use]
    pub fn socket_index(&self, socket_id: &str, role: SocketRole) -> Option<usize> {
        let row = match role {
            SocketRole::Input => &self.inputs,
            SocketRole::Output => &self.outputs,
        };
        row.iter().position(|s| s.id == socket_id)
    }

    /// Whether the socket id exists in the given row.
    #[must_use]
    pub fn has_socket(&self, socket_id: &str, role: SocketRole) -> bool {
        self.socket_index(socket_id, role).is_some()
    }

    /// Smallest height a resize gesture may reach: list kinds cannot
    /// shrink below their rows, everything else floors at the fixed
    /// minimum.
    #[must_use]
    pub fn min_height(&self) -> f64 {
        if self.kind.is_filter_list() || self.kind.is_catalog_source() {
            let rows = self.outputs.len() as f64 * self.stride();
            NODE_HEADER_H + rows.max(MIN_CONTENT_H)
        } else {
            MIN_NODE_HEIGHT
        }
    }

    /// Typed view over the free-form data bag.
    #[must_use]
    pub fn props(&self) -> NodeData<'_> {
        NodeData { value: &self.data }
    }
}

/// Typed access to known keys of a node's `data` JSON value.
pub struct NodeData<'a> {
    value: &'a serde_json::Value,
}

impl NodeData<'_> {
    /// Currently shown gallery image index. Defaults to 0 when absent.
    #[must_use]
    pub fn image_index(&self) -> usize {
        self.value
            .get("imageIndex")
            .and_then(serde_json::Value::as_u64)
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(0)
    }

    /// Ordered slugs currently displayed by a list node. Empty when absent.
    #[must_use]
    pub fn displayed(&self) -> Vec<&str> {
        self.value
            .get("displayed")
            .and_then(serde_json::Value::as_array)
            .map(|items| items.iter().filter_map(serde_json::Value::as_str).collect())
            .unwrap_or_default()
    }
}
