//! JS bridge: one `DawgViewer` per canvas. The host forwards pointer and
//! wheel events and draws the returned command list.

use dawg_viz_core::hierarchy;
use dawg_viz_core::model::DawgStats;
use dawg_viz_core::parsers;
use dawg_viz_core::viewport::ViewportController;
use dawg_viz_core::views::Scene;
use dawg_viz_core::{ViewerConfig, build_scene, svg};
use dawg_viz_protocol::{Point, Viewport};
use wasm_bindgen::prelude::*;

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

#[wasm_bindgen]
pub struct DawgViewer {
    scene: Scene,
    stats: DawgStats,
    controller: ViewportController,
    viewport: Viewport,
}

#[wasm_bindgen]
impl DawgViewer {
    /// Parse `data` (DAWG JSON or word list), lay it out for a
    /// `width` × `height` canvas and center the root.
    #[wasm_bindgen(constructor)]
    pub fn new(
        data: &[u8],
        width: f64,
        height: f64,
        config_json: Option<String>,
    ) -> Result<DawgViewer, JsError> {
        let config = match config_json {
            Some(json) => ViewerConfig::from_json(&json).map_err(js_err)?,
            None => ViewerConfig::default(),
        };
        let dawg = parsers::parse_auto(data).map_err(js_err)?;
        let viewport = Viewport::new(width, height);
        let scene = build_scene(&dawg, &viewport, &config);

        let mut controller = ViewportController::new(config.zoom);
        controller.center_on(scene.centering_translate(&viewport));

        Ok(Self {
            stats: dawg.stats(),
            scene,
            controller,
            viewport,
        })
    }

    /// Render commands with the current view transform applied, as JSON.
    pub fn commands(&self) -> Result<String, JsError> {
        let commands = self.scene.with_view(&self.controller.transform());
        serde_json::to_string(&commands).map_err(js_err)
    }

    /// Content-space render commands (no view transform), as JSON.
    pub fn scene_commands(&self) -> Result<String, JsError> {
        serde_json::to_string(self.scene.commands()).map_err(js_err)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.controller.pointer_down(Point::new(x, y));
    }

    /// Returns `true` when the host should redraw.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.controller.pointer_move(Point::new(x, y))
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    /// Apply a wheel event at canvas position `(x, y)` and return the new
    /// zoom. The host should call `preventDefault()` on the event.
    pub fn wheel(&mut self, delta_y: f64, x: f64, y: f64) -> f64 {
        self.controller.wheel(delta_y, Point::new(x, y))
    }

    pub fn zoom(&self) -> f64 {
        self.controller.zoom()
    }

    /// `[a, b, c, d, e, f]` viewport matrix.
    pub fn transform(&self) -> Vec<f64> {
        self.controller.transform().to_affine().to_vec()
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    pub fn selection_enabled(&self) -> bool {
        self.controller.selection_enabled()
    }

    pub fn marker_count(&self) -> usize {
        self.scene.marker_count()
    }

    pub fn edge_count(&self) -> usize {
        self.scene.edge_count()
    }

    /// `{ distinct_nodes, unrolled_nodes, words }` as JSON.
    pub fn stats(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.stats).map_err(js_err)
    }

    pub fn describe(&self, node_id: u64) -> Option<String> {
        self.scene.describe(node_id)
    }

    /// The current view as a standalone SVG document.
    pub fn export_svg(&self, dark: bool) -> String {
        let commands = self.scene.with_view(&self.controller.transform());
        svg::render_svg(&commands, self.viewport.width, self.viewport.height, dark)
    }
}

/// Convert a DAWG document into its tree form
/// (`{ name, isEndOfWord, children }`), as JSON.
#[wasm_bindgen]
pub fn convert_to_hierarchy(data: &[u8]) -> Result<String, JsError> {
    let dawg = parsers::parse_auto(data).map_err(js_err)?;
    serde_json::to_string(&hierarchy::convert(&dawg)).map_err(js_err)
}
