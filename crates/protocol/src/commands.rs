use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::Point;

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for a scene. Renderers consume
/// this list sequentially; each command carries all the data it needs.
/// Coordinates are in content space; the viewport transform arrives as a
/// `PushTransform` wrapping the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled circle marker. `node_id` identifies the layout node
    /// for hit-testing / hover.
    DrawCircle {
        center: Point,
        radius: f64,
        fill: ThemeToken,
        stroke: Option<ThemeToken>,
        node_id: Option<u64>,
    },

    /// Draw a text string anchored at a position.
    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        anchor: TextAnchor,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Push an affine transform (applied to all subsequent commands until
    /// the matching `PopTransform`).
    PushTransform { translate: Point, scale: Point },

    /// Pop the most recent transform.
    PopTransform,

    /// Begin a logical group. Renderers may use this for layering.
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    /// End the current group.
    EndGroup,
}

/// Which point of the text box `DrawText::position` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    TopLeft,
    Left,
    Center,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_serializes_with_tokens() {
        let cmd = RenderCommand::DrawCircle {
            center: Point::new(10.0, 20.0),
            radius: 10.0,
            fill: ThemeToken::NodeTerminal,
            stroke: Some(ThemeToken::NodeStroke),
            node_id: Some(3),
        };
        let json = serde_json::to_string(&cmd).unwrap_or_default();
        assert!(json.contains("DrawCircle"));
        assert!(json.contains("NodeTerminal"));
        assert!(json.contains("\"node_id\":3"));
    }

    #[test]
    fn text_command_carries_shared_label() {
        let json = r#"{"DrawText":{"position":{"x":1.0,"y":2.0},"text":"ab","color":"LabelText","font_size":14.0,"anchor":"TopLeft"}}"#;
        let cmd: RenderCommand = serde_json::from_str(json).unwrap();
        match cmd {
            RenderCommand::DrawText { text, anchor, .. } => {
                assert_eq!(text, "ab");
                assert_eq!(anchor, TextAnchor::TopLeft);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn marker_token_follows_end_of_word() {
        assert_eq!(ThemeToken::for_marker(true), ThemeToken::NodeTerminal);
        assert_eq!(ThemeToken::for_marker(false), ThemeToken::NodeInner);
    }
}
