//! DAWG → tree conversion.
//!
//! The layout needs a tree, but a DAWG shares suffix nodes between parents.
//! Every reference to a shared node is converted on its own, so a node
//! reachable by `k` paths shows up `k` times in the result, each copy with
//! its own subtree. The drawn node count is therefore the size of the
//! unrolled tree ([`DawgStats::unrolled_nodes`]), not the DAWG's node count.
//!
//! [`DawgStats::unrolled_nodes`]: crate::model::DawgStats::unrolled_nodes

use crate::model::{DawgNode, TreeNode};

/// Convert a DAWG rooted at `node` into an owned tree.
///
/// Pure and total over finite input. Children follow the iteration order of
/// `node.edges`. A node with no edges becomes a leaf. Runs on an explicit
/// stack, so a long word does not grow the call stack.
pub fn convert(node: &DawgNode) -> TreeNode {
    // Pre-order walk; each entry remembers the slot of its parent.
    let mut order: Vec<(&DawgNode, usize)> = Vec::new();
    let mut stack: Vec<(&DawgNode, usize)> = vec![(node, 0)];
    while let Some((current, parent)) = stack.pop() {
        let slot = order.len();
        order.push((current, parent));
        for child in current.edges.values().rev() {
            stack.push((child, slot));
        }
    }

    // Reverse pre-order finishes every subtree before its parent. Children
    // arrive last-first and are flipped when their parent is built.
    let mut children: Vec<Vec<TreeNode>> = std::iter::repeat_with(Vec::new)
        .take(order.len())
        .collect();
    for slot in (1..order.len()).rev() {
        let (current, parent) = order[slot];
        let tree = tree_node(current, std::mem::take(&mut children[slot]));
        children[parent].push(tree);
    }
    tree_node(node, std::mem::take(&mut children[0]))
}

fn tree_node(node: &DawgNode, mut children: Vec<TreeNode>) -> TreeNode {
    children.reverse();
    TreeNode {
        name: node.label.clone(),
        is_end_of_word: node.is_end_of_word,
        children,
    }
}
