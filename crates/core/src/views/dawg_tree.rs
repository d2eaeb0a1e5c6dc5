use std::collections::HashMap;

use dawg_viz_protocol::{Point, RenderCommand, SharedStr, TextAnchor, ThemeToken, Viewport};
use serde::{Deserialize, Serialize};

use crate::layout::{LayoutNode, LayoutTree};
use crate::viewport::ViewTransform;

/// Marker and label geometry, in content-space pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneStyle {
    pub marker_radius: f64,
    /// Labels sit this far up and left of their marker's center.
    pub label_offset: f64,
    pub font_size: f64,
    pub edge_width: f64,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            marker_radius: 10.0,
            label_offset: 25.0,
            font_size: 14.0,
            edge_width: 1.0,
        }
    }
}

/// A rendered DAWG tree: the positioned nodes plus the draw commands built
/// from them.
#[derive(Debug, Clone)]
pub struct Scene {
    layout: LayoutTree,
    commands: Vec<RenderCommand>,
    marker_count: usize,
    edge_count: usize,
}

/// Canvas position of a layout node. The layout's breadth axis becomes the
/// canvas's vertical axis so the tree grows left-to-right.
pub fn canvas_position(node: &LayoutNode) -> Point {
    Point::new(node.y, node.x)
}

/// Build the scene for a laid-out tree.
///
/// Per node below the root, in breadth-first order: a circle colored by the
/// end-of-word flag, a label offset up-left of it, and, only when the node
/// has a grandparent, a line back to its parent. The root gets no marker,
/// so the first level hangs unconnected.
pub fn render_dawg_tree(layout: LayoutTree, style: &SceneStyle) -> Scene {
    let mut commands = Vec::with_capacity(layout.len() * 3 + 2);
    let mut marker_count = 0;
    let mut edge_count = 0;

    commands.push(RenderCommand::BeginGroup {
        id: "dawg-tree".into(),
        label: Some("DAWG".into()),
    });

    // `labels` borrows node names; the scope ends before `layout` moves
    // into the scene.
    {
        let mut labels: HashMap<&str, SharedStr> = HashMap::new();
        for (id, node) in layout.nodes().iter().enumerate() {
            let Some(parent) = layout.parent_of(node) else {
                continue;
            };
            let center = canvas_position(node);

            commands.push(RenderCommand::DrawCircle {
                center,
                radius: style.marker_radius,
                fill: ThemeToken::for_marker(node.is_end_of_word),
                stroke: Some(ThemeToken::NodeStroke),
                node_id: Some(id as u64),
            });
            marker_count += 1;

            let text = labels
                .entry(node.name.as_str())
                .or_insert_with(|| SharedStr::from(node.name.as_str()))
                .clone();
            commands.push(RenderCommand::DrawText {
                position: Point::new(
                    center.x - style.label_offset,
                    center.y - style.label_offset,
                ),
                text,
                color: ThemeToken::LabelText,
                font_size: style.font_size,
                anchor: TextAnchor::TopLeft,
            });

            if parent.parent.is_some() {
                commands.push(RenderCommand::DrawLine {
                    from: center,
                    to: canvas_position(parent),
                    color: ThemeToken::EdgeLine,
                    width: style.edge_width,
                });
                edge_count += 1;
            }
        }
    }

    commands.push(RenderCommand::EndGroup);

    tracing::debug!(markers = marker_count, edges = edge_count, "scene built");
    Scene {
        layout,
        commands,
        marker_count,
        edge_count,
    }
}

impl Scene {
    /// Draw commands in content space.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Draw commands wrapped in the given view transform.
    pub fn with_view(&self, view: &ViewTransform) -> Vec<RenderCommand> {
        let mut out = Vec::with_capacity(self.commands.len() + 2);
        out.push(RenderCommand::PushTransform {
            translate: Point::new(view.translate_x, view.translate_y),
            scale: Point::new(view.scale, view.scale),
        });
        out.extend(self.commands.iter().cloned());
        out.push(RenderCommand::PopTransform);
        out
    }

    pub fn layout(&self) -> &LayoutTree {
        &self.layout
    }

    pub fn marker_count(&self) -> usize {
        self.marker_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Canvas position of the root, which is never drawn.
    pub fn root_anchor(&self) -> Point {
        canvas_position(self.layout.root())
    }

    /// Translation that puts the root at the center of `viewport` at
    /// zoom 1.
    pub fn centering_translate(&self, viewport: &Viewport) -> Point {
        let root = self.root_anchor();
        let center = viewport.center();
        Point::new(center.x - root.x, center.y - root.y)
    }

    /// Hover text for a marker.
    pub fn describe(&self, node_id: u64) -> Option<String> {
        let node = self.layout.node(usize::try_from(node_id).ok()?)?;
        let mut text = format!("{} (depth {})", node.name, node.depth);
        if node.is_end_of_word {
            text.push_str(", end of word");
        }
        Some(text)
    }
}
