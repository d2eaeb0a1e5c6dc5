//! Tree layout: assigns every node of a [`TreeNode`] an `(x, y)` position.
//!
//! `x` runs across siblings (breadth), `y` grows with depth. The scene swaps
//! the two axes so the drawn tree grows left-to-right.

mod tidy;

use std::collections::VecDeque;

use dawg_viz_protocol::Viewport;
use serde::{Deserialize, Serialize};

use crate::model::TreeNode;

/// How layout coordinates are scaled after the tidy pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LayoutExtent {
    /// Fit the whole tree into `breadth` × `depth`.
    Size { breadth: f64, depth: f64 },
    /// Fixed spacing: one separation unit is `breadth`, one level is `depth`.
    NodeSize { breadth: f64, depth: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Breadth of the layout relative to the canvas height. Large values
    /// keep wide DAWGs legible at the cost of panning.
    pub breadth_per_canvas_height: f64,
    /// Fixed per-node spacing; overrides the canvas-derived size when set.
    pub node_size: Option<(f64, f64)>,
    /// Gap between adjacent siblings, in separation units.
    pub sibling_separation: f64,
    /// Gap between adjacent nodes with different parents.
    pub cousin_separation: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            breadth_per_canvas_height: 300.0,
            node_size: None,
            sibling_separation: 1.0,
            cousin_separation: 2.0,
        }
    }
}

impl LayoutConfig {
    pub fn extent_for(&self, viewport: &Viewport) -> LayoutExtent {
        match self.node_size {
            Some((breadth, depth)) => LayoutExtent::NodeSize { breadth, depth },
            None => LayoutExtent::Size {
                breadth: viewport.height * self.breadth_per_canvas_height,
                depth: viewport.width,
            },
        }
    }

    pub fn tree_layout(&self, viewport: &Viewport) -> TreeLayout {
        TreeLayout {
            extent: self.extent_for(viewport),
            sibling_separation: self.sibling_separation,
            cousin_separation: self.cousin_separation,
        }
    }
}

/// A positioned node. `parent` and `children` index into
/// [`LayoutTree::nodes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub name: String,
    pub is_end_of_word: bool,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Result of a layout pass: nodes in breadth-first order, root first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
}

impl LayoutTree {
    pub fn root(&self) -> &LayoutNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: usize) -> Option<&LayoutNode> {
        self.nodes.get(id)
    }

    /// All nodes, breadth-first. A node's index is its id.
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent_of(&self, node: &LayoutNode) -> Option<&LayoutNode> {
        node.parent.and_then(|p| self.nodes.get(p))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeLayout {
    pub extent: LayoutExtent,
    pub sibling_separation: f64,
    pub cousin_separation: f64,
}

impl TreeLayout {
    pub fn new(extent: LayoutExtent) -> Self {
        Self {
            extent,
            sibling_separation: 1.0,
            cousin_separation: 2.0,
        }
    }

    /// Lay out `tree`. Structure and child order are preserved.
    pub fn layout(&self, tree: &TreeNode) -> LayoutTree {
        let mut nodes = flatten(tree);
        let breadth = tidy::tidy_breadth(&nodes, self.sibling_separation, self.cousin_separation);

        match self.extent {
            LayoutExtent::NodeSize { breadth: dx, depth: dy } => {
                for (node, x) in nodes.iter_mut().zip(&breadth) {
                    node.x = x * dx;
                    node.y = node.depth as f64 * dy;
                }
            }
            LayoutExtent::Size { breadth: dx, depth: dy } => {
                let (mut left, mut right, mut bottom) = (0, 0, 0);
                for (i, node) in nodes.iter().enumerate() {
                    if breadth[i] < breadth[left] {
                        left = i;
                    }
                    if breadth[i] > breadth[right] {
                        right = i;
                    }
                    if node.depth > nodes[bottom].depth {
                        bottom = i;
                    }
                }
                let margin = if left == right {
                    1.0
                } else {
                    self.separation(&nodes, left, right) / 2.0
                };
                let tx = margin - breadth[left];
                let kx = dx / (breadth[right] + margin + tx);
                let ky = dy / nodes[bottom].depth.max(1) as f64;
                for (node, x) in nodes.iter_mut().zip(&breadth) {
                    node.x = (x + tx) * kx;
                    node.y = node.depth as f64 * ky;
                }
            }
        }

        tracing::debug!(nodes = nodes.len(), "tree layout complete");
        LayoutTree { nodes }
    }

    fn separation(&self, nodes: &[LayoutNode], a: usize, b: usize) -> f64 {
        if nodes[a].parent == nodes[b].parent {
            self.sibling_separation
        } else {
            self.cousin_separation
        }
    }
}

/// Breadth-first flattening with parent/child links; positions are zero.
fn flatten(tree: &TreeNode) -> Vec<LayoutNode> {
    let mut nodes: Vec<LayoutNode> = Vec::with_capacity(tree.size());
    let mut queue: VecDeque<(&TreeNode, Option<usize>, usize)> = VecDeque::new();
    queue.push_back((tree, None, 0));

    while let Some((node, parent, depth)) = queue.pop_front() {
        let id = nodes.len();
        if let Some(p) = parent {
            nodes[p].children.push(id);
        }
        nodes.push(LayoutNode {
            name: node.name.clone(),
            is_end_of_word: node.is_end_of_word,
            depth,
            x: 0.0,
            y: 0.0,
            parent,
            children: Vec::new(),
        });
        for child in &node.children {
            queue.push_back((child, Some(id), depth + 1));
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, children: Vec<TreeNode>) -> TreeNode {
        TreeNode {
            name: name.into(),
            is_end_of_word: children.is_empty(),
            children,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_node_sits_in_the_middle() {
        let layout = TreeLayout::new(LayoutExtent::Size {
            breadth: 100.0,
            depth: 50.0,
        })
        .layout(&node("root", vec![]));
        assert_eq!(layout.len(), 1);
        assert!(close(layout.root().x, 50.0));
        assert!(close(layout.root().y, 0.0));
    }

    #[test]
    fn two_children_are_spread_symmetrically() {
        let tree = node("r", vec![node("a", vec![]), node("b", vec![])]);
        let layout = TreeLayout::new(LayoutExtent::Size {
            breadth: 400.0,
            depth: 200.0,
        })
        .layout(&tree);

        let root = layout.root();
        let a = &layout.nodes()[1];
        let b = &layout.nodes()[2];
        assert_eq!(a.name, "a");
        assert_eq!(b.name, "b");
        // Siblings one unit apart with half a unit of margin each side.
        assert!(close(a.x, 100.0));
        assert!(close(b.x, 300.0));
        assert!(close(root.x, 200.0));
        assert!(close(a.y, 200.0));
        assert!(close(root.y, 0.0));
    }

    #[test]
    fn node_size_uses_fixed_spacing() {
        let tree = node("r", vec![node("a", vec![]), node("b", vec![])]);
        let layout = TreeLayout::new(LayoutExtent::NodeSize {
            breadth: 200.0,
            depth: 200.0,
        })
        .layout(&tree);
        let a = &layout.nodes()[1];
        let b = &layout.nodes()[2];
        assert!(close(b.x - a.x, 200.0));
        assert!(close(layout.root().x, (a.x + b.x) / 2.0));
        assert!(close(a.y, 200.0));
    }

    #[test]
    fn preserves_structure_and_order() {
        let tree = node(
            "r",
            vec![
                node("a", vec![node("c", vec![]), node("d", vec![])]),
                node("b", vec![node("e", vec![])]),
            ],
        );
        let layout = TreeLayout::new(LayoutExtent::NodeSize {
            breadth: 1.0,
            depth: 1.0,
        })
        .layout(&tree);
        let names: Vec<&str> = layout.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["r", "a", "b", "c", "d", "e"]);
        assert_eq!(layout.root().children, [1, 2]);
        assert_eq!(layout.nodes()[1].children, [3, 4]);
        assert_eq!(layout.nodes()[5].parent, Some(2));
        assert_eq!(layout.parent_of(&layout.nodes()[3]).map(|n| n.name.as_str()), Some("a"));

        // Children left-to-right, and no overlap between cousins.
        let x = |i: usize| layout.nodes()[i].x;
        assert!(x(3) < x(4));
        assert!(x(1) < x(2));
        assert!(x(5) - x(4) >= 2.0 - 1e-9);
    }

    #[test]
    fn parents_are_centered_over_children() {
        let tree = node(
            "r",
            vec![
                node("a", vec![node("c", vec![]), node("d", vec![]), node("e", vec![])]),
                node("b", vec![]),
            ],
        );
        let layout = TreeLayout::new(LayoutExtent::NodeSize {
            breadth: 1.0,
            depth: 1.0,
        })
        .layout(&tree);
        for n in layout.nodes() {
            if let (Some(first), Some(last)) = (n.children.first(), n.children.last()) {
                let mid = (layout.nodes()[*first].x + layout.nodes()[*last].x) / 2.0;
                assert!(close(n.x, mid), "{} not centered", n.name);
            }
        }
    }

    #[test]
    fn canvas_extent_follows_config() {
        let config = LayoutConfig::default();
        let extent = config.extent_for(&Viewport::new(800.0, 600.0));
        assert_eq!(
            extent,
            LayoutExtent::Size {
                breadth: 180_000.0,
                depth: 800.0
            }
        );

        let fixed = LayoutConfig {
            node_size: Some((200.0, 200.0)),
            ..LayoutConfig::default()
        };
        assert_eq!(
            fixed.extent_for(&Viewport::new(800.0, 600.0)),
            LayoutExtent::NodeSize {
                breadth: 200.0,
                depth: 200.0
            }
        );
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let mut tree = node("leaf", vec![]);
        for i in 0..2_000 {
            tree = TreeNode {
                name: i.to_string(),
                is_end_of_word: false,
                children: vec![tree],
            };
        }
        let layout = TreeLayout::new(LayoutExtent::Size {
            breadth: 10.0,
            depth: 2_000.0,
        })
        .layout(&tree);
        assert_eq!(layout.len(), 2_001);
        assert!(close(layout.nodes()[2_000].y, 2_000.0));
    }
}
