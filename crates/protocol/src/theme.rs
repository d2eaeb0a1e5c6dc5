use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    /// Marker fill for a node that ends a word.
    NodeTerminal,
    /// Marker fill for a node that does not end a word.
    NodeInner,
    NodeStroke,
    EdgeLine,
    LabelText,

    Background,
    HoverHighlight,
}

impl ThemeToken {
    /// Marker fill for a node, keyed on its end-of-word flag.
    pub fn for_marker(is_end_of_word: bool) -> Self {
        if is_end_of_word {
            Self::NodeTerminal
        } else {
            Self::NodeInner
        }
    }
}
