//! Browser boundary: the `wasm_bindgen` wrapper the host JavaScript
//! layer drives.
//!
//! Thin delegation only — DOM event payloads are converted to engine
//! types and results travel back as JSON values. No engine logic lives
//! here, which is why this module has no test file: everything it calls
//! is exercised through [`crate::engine::EngineCore`].

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::camera::Point;
use crate::catalog::Catalog;
use crate::engine::EngineCore;
use crate::input::{Button, Key, Modifiers, WheelDelta};
use crate::node::{NodeId, NodeKind};
use crate::scene;

/// The full canvas engine as seen from JavaScript. Owns the canvas
/// element so event coordinates can be made element-relative.
#[wasm_bindgen]
pub struct CanvasEngine {
    canvas: HtmlCanvasElement,
    core: EngineCore,
}

fn js_err(message: &str) -> JsValue {
    JsValue::from_str(message)
}

fn to_js(value: &impl serde::Serialize) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| js_err(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

fn parse_id(id: &str) -> Result<NodeId, JsValue> {
    id.parse().map_err(|_| js_err("malformed node id"))
}

fn parse_kind(name: &str) -> Result<NodeKind, JsValue> {
    NodeKind::parse(name).ok_or_else(|| js_err("unknown node kind"))
}

fn mods(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers { shift, ctrl, alt, meta }
}

/// Client coordinates relative to the canvas element's box.
fn local(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point::new(client_x - rect.left(), client_y - rect.top())
}

#[wasm_bindgen]
impl CanvasEngine {
    /// Build the engine over a catalog JSON payload.
    ///
    /// # Errors
    ///
    /// Rejects malformed catalog JSON and duplicate identity keys.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, catalog_json: &str) -> Result<CanvasEngine, JsValue> {
        let catalog = Catalog::from_json(catalog_json).map_err(|e| js_err(&e.to_string()))?;
        Ok(Self { canvas, core: EngineCore::new(catalog) })
    }

    /// The current scene as a JSON value for the renderer.
    pub fn scene(&self) -> Result<JsValue, JsValue> {
        to_js(&scene::build(&self.core))
    }

    /// Rebuild the default graph and view.
    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.core.reset())
    }

    // --- Pointer events ---

    #[allow(clippy::fn_params_excessive_bools)]
    pub fn pointer_down(
        &mut self,
        client_x: f64,
        client_y: f64,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> Result<JsValue, JsValue> {
        let Some(button) = Button::from_code(button) else {
            return to_js(&Vec::<crate::engine::Action>::new());
        };
        let point = local(&self.canvas, client_x, client_y);
        to_js(&self.core.on_pointer_down(point, button, mods(shift, ctrl, alt, meta)))
    }

    #[allow(clippy::fn_params_excessive_bools)]
    pub fn pointer_move(
        &mut self,
        client_x: f64,
        client_y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> Result<JsValue, JsValue> {
        let point = local(&self.canvas, client_x, client_y);
        to_js(&self.core.on_pointer_move(point, mods(shift, ctrl, alt, meta)))
    }

    #[allow(clippy::fn_params_excessive_bools)]
    pub fn pointer_up(
        &mut self,
        client_x: f64,
        client_y: f64,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> Result<JsValue, JsValue> {
        let Some(button) = Button::from_code(button) else {
            return to_js(&Vec::<crate::engine::Action>::new());
        };
        let point = local(&self.canvas, client_x, client_y);
        to_js(&self.core.on_pointer_up(point, button, mods(shift, ctrl, alt, meta)))
    }

    /// Pointer capture was lost; abort any gesture.
    pub fn pointer_cancel(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.core.on_pointer_cancel())
    }

    pub fn double_click(&mut self, client_x: f64, client_y: f64) -> Result<JsValue, JsValue> {
        let point = local(&self.canvas, client_x, client_y);
        to_js(&self.core.on_double_click(point))
    }

    #[allow(clippy::fn_params_excessive_bools)]
    pub fn wheel(
        &mut self,
        client_x: f64,
        client_y: f64,
        dx: f64,
        dy: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> Result<JsValue, JsValue> {
        let point = local(&self.canvas, client_x, client_y);
        let delta = WheelDelta { dx, dy };
        to_js(&self.core.on_wheel(point, delta, mods(shift, ctrl, alt, meta)))
    }

    // --- Keyboard ---

    #[allow(clippy::fn_params_excessive_bools)]
    pub fn key_down(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> Result<JsValue, JsValue> {
        to_js(&self.core.on_key_down(&Key::new(key), mods(shift, ctrl, alt, meta)))
    }

    // --- Toolbar ---

    pub fn toolbar_down(
        &mut self,
        kind: &str,
        client_x: f64,
        client_y: f64,
    ) -> Result<JsValue, JsValue> {
        let kind = parse_kind(kind)?;
        let point = local(&self.canvas, client_x, client_y);
        to_js(&self.core.toolbar_down(kind, point))
    }

    // --- Host callbacks ---

    /// Merge a JSON patch into a node's data bag.
    pub fn set_node_data(&mut self, node_id: &str, patch_json: &str) -> Result<JsValue, JsValue> {
        let id = parse_id(node_id)?;
        let patch: serde_json::Value =
            serde_json::from_str(patch_json).map_err(|e| js_err(&e.to_string()))?;
        to_js(&self.core.merge_node_data(&id, &patch))
    }

    /// Auto-spawn a media node wired from a source node. Returns the new
    /// node's id, or `null` if the source doesn't exist.
    pub fn spawn_from(&mut self, source_id: &str, kind: &str) -> Result<Option<String>, JsValue> {
        let source = parse_id(source_id)?;
        let kind = parse_kind(kind)?;
        Ok(self.core.spawn_from(source, kind).map(|id| id.to_string()))
    }

    /// Route a different item socket into a node's outgoing wires.
    pub fn switch_output(&mut self, node_id: &str, socket: &str) -> Result<JsValue, JsValue> {
        let id = parse_id(node_id)?;
        to_js(&self.core.switch_output(id, socket))
    }

    /// Remove every wire touching a socket.
    pub fn disconnect_socket(&mut self, node_id: &str, socket: &str) -> Result<JsValue, JsValue> {
        let id = parse_id(node_id)?;
        to_js(&self.core.disconnect_socket(id, socket))
    }
}
