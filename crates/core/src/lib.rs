//! DAWG visualization core: parse a DAWG, unroll it into a tree, lay the
//! tree out, turn it into render commands, and pan/zoom the result.
//!
//! ```text
//!   JSON / word list ─▶ DawgNode ─▶ TreeNode ─▶ LayoutTree ─▶ Scene ─▶ RenderCommand[]
//!        (parsers)       (model)   (hierarchy)   (layout)     (views)      ▲
//!                                                                          │
//!                                                 ViewportController ──────┘
//!                                                  (PushTransform)
//! ```

pub mod config;
pub mod hierarchy;
pub mod layout;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod svg;
pub mod viewport;
pub mod views;

pub use config::{ConfigError, ViewerConfig};
pub use pipeline::{build_scene, load_scene};
