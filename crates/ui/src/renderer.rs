use dawg_viz_protocol::{RenderCommand, TextAnchor};
use egui::{Align2, FontId, Pos2, Stroke};

use crate::theme::{self, ThemeMode};

/// Transform state for PushTransform/PopTransform.
#[derive(Debug, Clone, Copy)]
struct Transform {
    tx: f64,
    ty: f64,
    sx: f64,
    sy: f64,
}

impl Transform {
    fn identity() -> Self {
        Self {
            tx: 0.0,
            ty: 0.0,
            sx: 1.0,
            sy: 1.0,
        }
    }

    fn apply(&self, x: f64, y: f64, offset: Pos2) -> Pos2 {
        Pos2::new(
            (x * self.sx + self.tx) as f32 + offset.x,
            (y * self.sy + self.ty) as f32 + offset.y,
        )
    }

    fn scale_len(&self, len: f64) -> f32 {
        (len * self.sx) as f32
    }
}

/// A drawn marker, in screen space.
pub struct HitRegion {
    pub center: Pos2,
    pub radius: f32,
    pub node_id: u64,
}

impl HitRegion {
    pub fn contains(&self, pos: Pos2) -> bool {
        self.center.distance(pos) <= self.radius
    }
}

/// Result of rendering a command list: includes hit regions for interaction.
pub struct RenderResult {
    pub hit_regions: Vec<HitRegion>,
}

impl RenderResult {
    /// Topmost marker under `pos`.
    pub fn hit_test(&self, pos: Pos2) -> Option<&HitRegion> {
        self.hit_regions.iter().rev().find(|hit| hit.contains(pos))
    }
}

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the canvas.
pub fn render_commands(
    painter: &egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) -> RenderResult {
    let mut transform_stack: Vec<Transform> = vec![Transform::identity()];
    let mut hit_regions: Vec<HitRegion> = Vec::new();

    for cmd in commands {
        let tf = transform_stack
            .last()
            .copied()
            .unwrap_or(Transform::identity());
        match cmd {
            RenderCommand::DrawCircle {
                center,
                radius,
                fill,
                stroke,
                node_id,
            } => {
                let c = tf.apply(center.x, center.y, offset);
                let r = tf.scale_len(*radius);
                if r < 0.5 {
                    continue;
                }

                // Cull off-screen
                let bounds = egui::Rect::from_center_size(c, egui::vec2(2.0 * r, 2.0 * r));
                if !painter.clip_rect().intersects(bounds) {
                    continue;
                }

                let stroke = stroke.map_or(Stroke::NONE, |token| {
                    Stroke::new(tf.scale_len(1.0).max(0.5), theme::resolve(token, mode))
                });
                painter.circle(c, r, theme::resolve(*fill, mode), stroke);

                if let Some(id) = node_id {
                    hit_regions.push(HitRegion {
                        center: c,
                        radius: r,
                        node_id: *id,
                    });
                }
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                anchor,
            } => {
                let pos = tf.apply(position.x, position.y, offset);
                let size = tf.scale_len(*font_size);
                if size < 1.0 {
                    continue;
                }

                let align = match anchor {
                    TextAnchor::TopLeft => Align2::LEFT_TOP,
                    TextAnchor::Left => Align2::LEFT_CENTER,
                    TextAnchor::Center => Align2::CENTER_CENTER,
                };

                painter.text(
                    pos,
                    align,
                    text.as_str(),
                    FontId::proportional(size),
                    theme::resolve(*color, mode),
                );
            }

            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
            } => {
                let p1 = tf.apply(from.x, from.y, offset);
                let p2 = tf.apply(to.x, to.y, offset);
                let line_color = theme::resolve(*color, mode);
                painter.line_segment([p1, p2], Stroke::new(tf.scale_len(*width), line_color));
            }

            RenderCommand::PushTransform { translate, scale } => {
                let parent = tf;
                transform_stack.push(Transform {
                    tx: parent.tx + translate.x * parent.sx,
                    ty: parent.ty + translate.y * parent.sy,
                    sx: parent.sx * scale.x,
                    sy: parent.sy * scale.y,
                });
            }

            RenderCommand::PopTransform => {
                if transform_stack.len() > 1 {
                    transform_stack.pop();
                }
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {
                // Groups carry no visual effect in egui
            }
        }
    }

    RenderResult { hit_regions }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_transforms_compose() {
        let parent = Transform {
            tx: 10.0,
            ty: 20.0,
            sx: 2.0,
            sy: 2.0,
        };
        let child = Transform {
            tx: parent.tx + 5.0 * parent.sx,
            ty: parent.ty + 5.0 * parent.sy,
            sx: parent.sx * 0.5,
            sy: parent.sy * 0.5,
        };
        let p = child.apply(4.0, 4.0, Pos2::ZERO);
        assert_eq!(p, Pos2::new(24.0, 34.0));
    }

    #[test]
    fn hit_test_prefers_last_drawn() {
        let result = RenderResult {
            hit_regions: vec![
                HitRegion {
                    center: Pos2::new(0.0, 0.0),
                    radius: 10.0,
                    node_id: 1,
                },
                HitRegion {
                    center: Pos2::new(5.0, 0.0),
                    radius: 10.0,
                    node_id: 2,
                },
            ],
        };
        assert_eq!(result.hit_test(Pos2::new(2.0, 0.0)).map(|h| h.node_id), Some(2));
        assert!(result.hit_test(Pos2::new(40.0, 0.0)).is_none());
    }
}
