use std::sync::{Arc, Mutex};

use dawg_viz_core::model::{DawgNode, DawgStats};
use dawg_viz_core::parsers;
use dawg_viz_core::viewport::ViewportController;
use dawg_viz_core::views::Scene;
use dawg_viz_core::{ViewerConfig, build_scene};
use dawg_viz_protocol::{Point, ThemeToken, Viewport};
use eframe::egui;

use crate::renderer;
use crate::theme::{self, ThemeMode};

/// Document fetched next to the page on the web build.
#[cfg(target_arch = "wasm32")]
const DEFAULT_DOCUMENT: &str = "dawg_data.json";

fn log_error(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&format!("dawg-viz: {message}").into());
    #[cfg(not(target_arch = "wasm32"))]
    tracing::error!("{message}");
}

/// Result of an async document fetch, waiting for the next frame.
type PendingLoad = Arc<Mutex<Option<Result<Vec<u8>, String>>>>;

/// Main application state.
pub struct DawgApp {
    config: ViewerConfig,
    dawg: Option<Arc<DawgNode>>,
    stats: Option<DawgStats>,
    /// Built on the first frame after a load, once the canvas size is known.
    scene: Option<Scene>,
    controller: ViewportController,
    /// Whether the root has been centered for the current scene.
    centered: bool,
    /// Canvas size from the last frame.
    canvas_size: Viewport,
    theme_mode: ThemeMode,
    /// Load failure. Nothing is drawn while set.
    error: Option<String>,
    /// Outcome of an async fetch.
    pending_data: PendingLoad,
    loading: bool,
}

impl DawgApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: ViewerConfig,
        initial: Option<Arc<DawgNode>>,
    ) -> Self {
        let mut app = Self::with_config(config);
        cc.egui_ctx.set_visuals(app.theme_mode.visuals());

        #[cfg(target_arch = "wasm32")]
        {
            let pd = app.pending_data.clone();
            let ctx = cc.egui_ctx.clone();
            app.loading = true;
            web_sys::console::log_1(&format!("dawg-viz: fetching {DEFAULT_DOCUMENT}").into());
            wasm_bindgen_futures::spawn_local(async move {
                let result = Self::fetch_bytes(DEFAULT_DOCUMENT)
                    .await
                    .map_err(|e| format!("fetching {DEFAULT_DOCUMENT}: {e}"));
                if let Ok(mut lock) = pd.lock() {
                    *lock = Some(result);
                }
                ctx.request_repaint();
            });
        }

        if let Some(dawg) = initial {
            app.set_dawg(dawg);
        }
        app
    }

    /// App state without a window; nothing is loaded yet.
    fn with_config(config: ViewerConfig) -> Self {
        Self {
            controller: ViewportController::new(config.zoom.clone()),
            config,
            dawg: None,
            stats: None,
            scene: None,
            centered: false,
            canvas_size: Viewport::new(0.0, 0.0),
            theme_mode: ThemeMode::default(),
            error: None,
            pending_data: Arc::new(Mutex::new(None)),
            loading: false,
        }
    }

    /// Show `dawg`, replacing whatever was loaded. Layout waits for the
    /// next frame; the view starts over at zoom 1.
    pub fn set_dawg(&mut self, dawg: Arc<DawgNode>) {
        let stats = dawg.stats();
        tracing::info!(
            distinct = stats.distinct_nodes,
            unrolled = stats.unrolled_nodes,
            "loaded DAWG"
        );
        self.stats = Some(stats);
        self.dawg = Some(dawg);
        self.scene = None;
        self.error = None;
        self.reset_view();
    }

    /// Drop whatever was loaded and show only `message`.
    fn fail(&mut self, message: String) {
        log_error(&message);
        self.dawg = None;
        self.stats = None;
        self.scene = None;
        self.error = Some(message);
    }

    /// Apply a finished async fetch, if any.
    fn poll_pending(&mut self) {
        let pending = {
            let mut lock = self.pending_data.lock().unwrap_or_else(|e| e.into_inner());
            lock.take()
        };
        let Some(result) = pending else {
            return;
        };
        self.loading = false;
        match result {
            Ok(data) => self.load_bytes(&data),
            Err(e) => self.fail(format!("Failed to load DAWG: {e}")),
        }
    }

    /// Parse a DAWG document (JSON export or word list) and show it.
    pub fn load_bytes(&mut self, data: &[u8]) {
        match parsers::parse_auto(data) {
            Ok(dawg) => self.set_dawg(dawg),
            Err(e) => self.fail(format!("Failed to load DAWG: {e}")),
        }
    }

    fn reset_view(&mut self) {
        self.controller = ViewportController::new(self.config.zoom.clone());
        self.centered = false;
    }

    /// Lay out the loaded DAWG for `viewport` if that has not happened yet,
    /// then center the root once.
    fn ensure_scene(&mut self, viewport: &Viewport) {
        if self.scene.is_none() {
            if let Some(dawg) = &self.dawg {
                self.scene = Some(build_scene(dawg, viewport, &self.config));
            }
        }
        if !self.centered {
            if let Some(scene) = &self.scene {
                self.controller.center_on(scene.centering_translate(viewport));
                self.centered = true;
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        let window = web_sys::window().ok_or("no window")?;
        let resp_value = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| format!("{e:?}"))?;
        let resp: web_sys::Response = resp_value.dyn_into().map_err(|_| "not a Response")?;
        if !resp.ok() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let buf = JsFuture::from(resp.array_buffer().map_err(|e| format!("{e:?}"))?)
            .await
            .map_err(|e| format!("{e:?}"))?;
        Ok(js_sys::Uint8Array::new(&buf).to_vec())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn open_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("DAWG", &["json", "txt"])
            .pick_file()
        else {
            return;
        };
        match std::fs::read(&path) {
            Ok(data) => self.load_bytes(&data),
            Err(e) => self.fail(format!("Failed to read {}: {e}", path.display())),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn export_svg(&self) {
        let Some(scene) = &self.scene else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .set_file_name("dawg.svg")
            .save_file()
        else {
            return;
        };
        let commands = scene.with_view(&self.controller.transform());
        let svg = dawg_viz_core::svg::render_svg(
            &commands,
            self.canvas_size.width,
            self.canvas_size.height,
            self.theme_mode.is_dark(),
        );
        if let Err(e) = std::fs::write(&path, svg) {
            log_error(&format!("Failed to write {}: {e}", path.display()));
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_rect_before_wrap();
        let viewport = Viewport::new(f64::from(available.width()), f64::from(available.height()));
        self.canvas_size = viewport;
        self.ensure_scene(&viewport);

        let response = ui.allocate_rect(available, egui::Sense::click_and_drag());
        let to_local = |pos: egui::Pos2| {
            Point::new(
                f64::from(pos.x - available.left()),
                f64::from(pos.y - available.top()),
            )
        };

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.controller.pointer_down(to_local(pos));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                if self.controller.pointer_move(to_local(pos)) {
                    ui.ctx().request_repaint();
                }
            }
        }
        if response.drag_stopped() {
            self.controller.pointer_up();
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta);
            if scroll.y.abs() > 0.1 {
                if let Some(pos) = response.hover_pos() {
                    // egui scrolls up with positive y; the controller takes DOM deltas.
                    self.controller.wheel(-f64::from(scroll.y), to_local(pos));
                    ui.ctx().request_repaint();
                }
            }
        }

        // Keyboard shortcuts
        let (reset, toggle_theme) =
            ui.input(|i| (i.key_pressed(egui::Key::Num0), i.key_pressed(egui::Key::T)));
        if reset {
            self.reset_view();
            self.ensure_scene(&viewport);
        }
        if toggle_theme {
            self.toggle_theme(ui.ctx());
        }

        let painter = ui.painter_at(available);
        painter.rect_filled(
            available,
            egui::CornerRadius::ZERO,
            theme::resolve(ThemeToken::Background, self.theme_mode),
        );

        let Some(scene) = &self.scene else {
            return;
        };
        let commands = scene.with_view(&self.controller.transform());
        let result =
            renderer::render_commands(&painter, &commands, available.min, self.theme_mode);

        // Hover tooltip, suppressed while panning
        if !self.controller.selection_enabled() {
            return;
        }
        let Some(hover_pos) = response.hover_pos() else {
            return;
        };
        if let Some(hit) = result.hit_test(hover_pos) {
            painter.circle_stroke(
                hit.center,
                hit.radius + 2.0,
                egui::Stroke::new(2.0, theme::resolve(ThemeToken::HoverHighlight, self.theme_mode)),
            );
            if let Some(text) = scene.describe(hit.node_id) {
                #[allow(deprecated)]
                egui::show_tooltip_at_pointer(
                    ui.ctx(),
                    ui.layer_id(),
                    egui::Id::new("node_tooltip"),
                    |ui| {
                        ui.label(text);
                    },
                );
            }
        }
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.theme_mode = self.theme_mode.toggled();
        ctx.set_visuals(self.theme_mode.visuals());
    }
}

impl eframe::App for DawgApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_pending();

        // Handle file drop
        let dropped: Option<Vec<u8>> = ctx.input(|i| {
            i.raw
                .dropped_files
                .first()
                .and_then(|file| file.bytes.as_ref())
                .map(|bytes| bytes.to_vec())
        });
        if let Some(data) = dropped {
            self.load_bytes(&data);
        }

        // Top toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("dawg-viz");
                ui.separator();

                #[cfg(not(target_arch = "wasm32"))]
                {
                    if ui.button("Open").clicked() {
                        self.open_file();
                    }
                    if ui.button("Export SVG").clicked() {
                        self.export_svg();
                    }
                    ui.separator();
                }

                if ui.button("Reset view").clicked() {
                    self.reset_view();
                }

                let theme_label = match self.theme_mode {
                    ThemeMode::Dark => "Dark",
                    ThemeMode::Light => "Light",
                };
                if ui.button(theme_label).clicked() {
                    self.toggle_theme(ctx);
                }
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(err) = &self.error {
                    ui.colored_label(ui.visuals().error_fg_color, err);
                } else if self.loading {
                    ui.label("Loading…");
                } else if let (Some(stats), Some(scene)) = (&self.stats, &self.scene) {
                    ui.label(format!(
                        "Nodes: {} distinct, {} drawn | Words: {} | Markers: {} | Edges: {} | Zoom: {:.0}%",
                        stats.distinct_nodes,
                        stats.unrolled_nodes,
                        stats.words,
                        scene.marker_count(),
                        scene.edge_count(),
                        self.controller.zoom() * 100.0,
                    ));
                } else {
                    ui.label("No DAWG loaded. Open a file or drop one here.");
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if self.error.is_some() || self.dawg.is_none() {
                    return;
                }
                self.canvas(ui);
            });
    }
}
