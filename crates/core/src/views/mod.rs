pub mod dawg_tree;

pub use dawg_tree::{Scene, SceneStyle, canvas_position, render_dawg_tree};
