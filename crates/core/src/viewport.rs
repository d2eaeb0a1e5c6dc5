//! Pan and cursor-anchored zoom over a rendered scene.
//!
//! The controller never touches node coordinates; it only maintains the
//! view transform `screen = content * zoom + translate`.

use dawg_viz_protocol::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Raw wheel deltas are divided by this first.
    pub wheel_damping: f64,
    /// ...and then by this, to get a zoom increment.
    pub wheel_sensitivity: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 4.0,
            wheel_damping: 2.0,
            wheel_sensitivity: 200.0,
        }
    }
}

/// Uniform-scale affine view transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Content space → screen space.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    /// Screen space → content space.
    pub fn invert(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.translate_x) / self.scale,
            (p.y - self.translate_y) / self.scale,
        )
    }

    /// Canvas-style `[a, b, c, d, e, f]` matrix.
    pub fn to_affine(&self) -> [f64; 6] {
        [
            self.scale,
            0.0,
            0.0,
            self.scale,
            self.translate_x,
            self.translate_y,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    Idle,
    /// `last_*` is the pointer position at the previous event, in screen
    /// pixels.
    Dragging { last_x: f64, last_y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom_factor: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub drag: DragState,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom_factor: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            drag: DragState::Idle,
        }
    }
}

/// Owns the pan/zoom state for one canvas and applies pointer and wheel
/// events to it.
///
/// `Idle --down--> Dragging --move--> Dragging --up--> Idle`. Wheel events
/// zoom in either state and never change it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportController {
    state: ViewportState,
    config: ZoomConfig,
}

impl ViewportController {
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            state: ViewportState::default(),
            config,
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom_factor
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state.drag, DragState::Dragging { .. })
    }

    /// Marker selection / hover competes with panning and is off while a
    /// drag is in progress.
    pub fn selection_enabled(&self) -> bool {
        !self.is_dragging()
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            scale: self.state.zoom_factor,
            translate_x: self.state.translate_x,
            translate_y: self.state.translate_y,
        }
    }

    /// Set the pan offset directly, e.g. to center the root on load.
    pub fn center_on(&mut self, translate: Point) {
        self.state.translate_x = translate.x;
        self.state.translate_y = translate.y;
    }

    pub fn screen_to_content(&self, p: Point) -> Point {
        self.transform().invert(p)
    }

    pub fn content_to_screen(&self, p: Point) -> Point {
        self.transform().apply(p)
    }

    /// Start a drag anchored at `pointer` (screen pixels).
    pub fn pointer_down(&mut self, pointer: Point) {
        self.state.drag = DragState::Dragging {
            last_x: pointer.x,
            last_y: pointer.y,
        };
    }

    /// Pan by the pointer's displacement since the last event, divided by
    /// the zoom factor. Returns whether a redraw is needed; `false` while
    /// idle.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let DragState::Dragging { last_x, last_y } = self.state.drag else {
            return false;
        };
        let zoom = self.state.zoom_factor;
        self.state.translate_x += (pointer.x - last_x) / zoom;
        self.state.translate_y += (pointer.y - last_y) / zoom;
        self.state.drag = DragState::Dragging {
            last_x: pointer.x,
            last_y: pointer.y,
        };
        true
    }

    pub fn pointer_up(&mut self) {
        self.state.drag = DragState::Idle;
    }

    /// Zoom by a wheel delta (DOM convention: positive `delta_y` scrolls
    /// down, i.e. zooms out) while keeping the content point under
    /// `pointer` fixed on screen. The zoom factor saturates at the
    /// configured bounds. Returns the new zoom factor; the caller should
    /// suppress the host's default scrolling.
    pub fn wheel(&mut self, delta_y: f64, pointer: Point) -> f64 {
        let delta = -delta_y / self.config.wheel_damping;
        let zoom = (self.state.zoom_factor + delta / self.config.wheel_sensitivity)
            .clamp(self.config.min_zoom, self.config.max_zoom);
        self.zoom_to_point(pointer, zoom);
        zoom
    }

    /// Set the zoom factor, keeping the content under `pointer` in place.
    pub fn zoom_to_point(&mut self, pointer: Point, zoom: f64) {
        let anchor = self.screen_to_content(pointer);
        self.state.zoom_factor = zoom;
        self.state.translate_x = pointer.x - anchor.x * zoom;
        self.state.translate_y = pointer.y - anchor.y * zoom;
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn wheel_clamps_to_bounds() {
        let mut vc = ViewportController::default();
        assert_eq!(vc.wheel(10_000.0, Point::new(0.0, 0.0)), 0.1);
        assert_eq!(vc.zoom(), 0.1);

        let mut vc = ViewportController::default();
        assert_eq!(vc.wheel(-10_000.0, Point::new(0.0, 0.0)), 4.0);
        assert_eq!(vc.zoom(), 4.0);
    }

    #[test]
    fn wheel_step_matches_sensitivity() {
        let mut vc = ViewportController::default();
        // -100 / 2 / 200 = +0.25
        let zoom = vc.wheel(-100.0, Point::new(0.0, 0.0));
        assert!((zoom - 1.25).abs() < EPS);
        let zoom = vc.wheel(100.0, Point::new(0.0, 0.0));
        assert!((zoom - 1.0).abs() < EPS);
    }

    #[test]
    fn zoom_keeps_point_under_cursor() {
        let mut vc = ViewportController::default();
        vc.center_on(Point::new(50.0, -20.0));
        let pointer = Point::new(300.0, 200.0);
        let before = vc.screen_to_content(pointer);
        assert!(close(before, Point::new(250.0, 220.0)));

        for delta in [-100.0, -37.0, 250.0, -4_000.0, 9_000.0] {
            vc.wheel(delta, pointer);
            assert!(close(vc.screen_to_content(pointer), before));
            assert!(close(vc.content_to_screen(before), pointer));
        }
    }

    #[test]
    fn pan_scales_inversely_with_zoom() {
        let mut vc = ViewportController::default();
        vc.pointer_down(Point::new(100.0, 100.0));
        assert!(vc.pointer_move(Point::new(140.0, 90.0)));
        assert!((vc.state().translate_x - 40.0).abs() < EPS);
        assert!((vc.state().translate_y + 10.0).abs() < EPS);
        vc.pointer_up();

        let mut vc = ViewportController::default();
        vc.zoom_to_point(Point::new(0.0, 0.0), 2.0);
        vc.pointer_down(Point::new(100.0, 100.0));
        vc.pointer_move(Point::new(140.0, 100.0));
        assert!((vc.state().translate_x - 20.0).abs() < EPS);
    }

    #[test]
    fn drag_tracks_last_position() {
        let mut vc = ViewportController::default();
        vc.pointer_down(Point::new(0.0, 0.0));
        vc.pointer_move(Point::new(10.0, 0.0));
        vc.pointer_move(Point::new(15.0, 0.0));
        assert!((vc.state().translate_x - 15.0).abs() < EPS);
        assert_eq!(
            vc.state().drag,
            DragState::Dragging {
                last_x: 15.0,
                last_y: 0.0
            }
        );
    }

    #[test]
    fn idle_move_does_nothing() {
        let mut vc = ViewportController::default();
        let before = vc.clone();
        assert!(!vc.pointer_move(Point::new(500.0, 500.0)));
        assert_eq!(vc, before);
    }

    #[test]
    fn state_transitions_and_selection() {
        let mut vc = ViewportController::default();
        assert!(!vc.is_dragging());
        assert!(vc.selection_enabled());

        vc.pointer_down(Point::new(1.0, 1.0));
        assert!(vc.is_dragging());
        assert!(!vc.selection_enabled());

        // Wheel does not end the drag.
        vc.wheel(-50.0, Point::new(1.0, 1.0));
        assert!(vc.is_dragging());

        vc.pointer_up();
        assert!(!vc.is_dragging());
        assert!(vc.selection_enabled());
        let after_up = vc.clone();
        vc.pointer_move(Point::new(9.0, 9.0));
        assert_eq!(vc, after_up);
    }

    #[test]
    fn affine_matches_canvas_layout() {
        let mut vc = ViewportController::default();
        vc.center_on(Point::new(7.0, 8.0));
        vc.zoom_to_point(Point::new(7.0, 8.0), 3.0);
        assert_eq!(vc.transform().to_affine(), [3.0, 0.0, 0.0, 3.0, 7.0, 8.0]);
        assert!(close(
            ViewTransform::IDENTITY.apply(Point::new(2.0, 3.0)),
            Point::new(2.0, 3.0)
        ));
    }
}
