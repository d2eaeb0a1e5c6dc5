pub mod commands;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, TextAnchor};
pub use shared_str::SharedStr;
pub use theme::ThemeToken;
pub use types::{Point, Viewport};
