pub mod builder;
pub mod dawg;
pub mod tree;

pub use builder::{BuildError, DawgBuilder};
pub use dawg::{DawgNode, DawgStats, MAX_DEPTH};
pub use tree::TreeNode;
