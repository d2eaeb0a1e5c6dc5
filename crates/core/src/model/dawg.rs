use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Longest accepted path from the root, in edges; the length of the
/// longest word. Parsers reject deeper input.
pub const MAX_DEPTH: usize = 1024;

/// One state of a Directed Acyclic Word Graph, as exported by the DAWG
/// builder.
///
/// ```json
/// { "Label": "t", "IsEndOfWord": false, "Edges": { "a": { ... } } }
/// ```
///
/// Children sit behind `Arc`, so a suffix shared by several words is a
/// single allocation referenced from several `edges` maps. A node has no
/// notion of its parent. Edge order is the order of the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DawgNode {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "IsEndOfWord")]
    pub is_end_of_word: bool,
    /// Transition label → target node. Absent and `{}` both mean a leaf.
    #[serde(rename = "Edges", default)]
    pub edges: IndexMap<String, Arc<DawgNode>>,
}

/// Size figures for a DAWG, comparing the graph to its unrolled tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DawgStats {
    /// Nodes counted once each, by identity.
    pub distinct_nodes: usize,
    /// Nodes counted once per path from the root; the size of the tree
    /// the viewer draws.
    pub unrolled_nodes: usize,
    /// Number of accepted words.
    pub words: usize,
}

impl DawgNode {
    pub fn new(label: impl Into<String>, is_end_of_word: bool) -> Self {
        Self {
            label: label.into(),
            is_end_of_word,
            edges: IndexMap::new(),
        }
    }

    /// Builder-style edge insertion; keeps insertion order.
    pub fn with_edge(mut self, label: impl Into<String>, child: Arc<DawgNode>) -> Self {
        self.edges.insert(label.into(), child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn stats(&self) -> DawgStats {
        let mut seen: HashSet<*const DawgNode> = HashSet::new();
        let mut distinct_nodes = 0;
        let mut unrolled_nodes = 0;
        let mut words = 0;

        let mut stack: Vec<&DawgNode> = vec![self];
        while let Some(node) = stack.pop() {
            unrolled_nodes += 1;
            if node.is_end_of_word {
                words += 1;
            }
            if seen.insert(std::ptr::from_ref(node)) {
                distinct_nodes += 1;
            }
            stack.extend(node.edges.values().map(Arc::as_ref));
        }

        DawgStats {
            distinct_nodes,
            unrolled_nodes,
            words,
        }
    }

    /// Length of the longest path from this node, in edges.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack: Vec<(&DawgNode, usize)> = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(node.edges.values().map(|child| (child.as_ref(), depth + 1)));
        }
        max
    }

    /// Every accepted word, in edge order (depth-first, shorter prefix
    /// first).
    pub fn words(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack: Vec<(&DawgNode, String)> = vec![(self, String::new())];
        while let Some((node, prefix)) = stack.pop() {
            if node.is_end_of_word {
                out.push(prefix.clone());
            }
            for (label, child) in node.edges.iter().rev() {
                stack.push((child, format!("{prefix}{label}")));
            }
        }
        out
    }
}

// The default drop recurses once per level; unlink long chains first.
impl Drop for DawgNode {
    fn drop(&mut self) {
        let mut stack: Vec<Arc<DawgNode>> = self.edges.drain(..).map(|(_, child)| child).collect();
        while let Some(node) = stack.pop() {
            if let Some(mut node) = Arc::into_inner(node) {
                stack.extend(node.edges.drain(..).map(|(_, child)| child));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(label: &str) -> Arc<DawgNode> {
        Arc::new(DawgNode::new(label, true))
    }

    #[test]
    fn deserializes_document_fields() {
        let json = r#"{"Label":"root","IsEndOfWord":false,"Edges":{"x":{"Label":"x","IsEndOfWord":true,"Edges":{}}}}"#;
        let node: DawgNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.label, "root");
        assert!(!node.is_end_of_word);
        assert_eq!(node.edges.len(), 1);
        assert!(node.edges["x"].is_end_of_word);
        assert!(node.edges["x"].is_leaf());
    }

    #[test]
    fn missing_edges_is_a_leaf() {
        let node: DawgNode = serde_json::from_str(r#"{"Label":"z","IsEndOfWord":true}"#).unwrap();
        assert!(node.is_leaf());
    }

    #[test]
    fn edges_keep_document_order() {
        let json = r#"{"Label":"","IsEndOfWord":false,"Edges":{
            "z":{"Label":"z","IsEndOfWord":true},
            "a":{"Label":"a","IsEndOfWord":true},
            "m":{"Label":"m","IsEndOfWord":true}}}"#;
        let node: DawgNode = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = node.edges.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn stats_distinguish_shared_nodes() {
        // "as" and "is" share the terminal "s".
        let s = leaf("s");
        let a = Arc::new(DawgNode::new("a", false).with_edge("s", Arc::clone(&s)));
        let i = Arc::new(DawgNode::new("i", false).with_edge("s", s));
        let root = DawgNode::new("", false).with_edge("a", a).with_edge("i", i);

        let stats = root.stats();
        assert_eq!(stats.distinct_nodes, 4);
        assert_eq!(stats.unrolled_nodes, 5);
        assert_eq!(stats.words, 2);
        assert_eq!(root.words(), ["as", "is"]);
    }

    #[test]
    fn depth_follows_longest_path() {
        let root = DawgNode::new("", false)
            .with_edge("a", leaf("a"))
            .with_edge("b", Arc::new(DawgNode::new("b", false).with_edge("c", leaf("c"))));
        assert_eq!(root.depth(), 2);
        assert_eq!(DawgNode::new("x", true).depth(), 0);
    }

    #[test]
    fn long_chain_drops_without_overflow() {
        let mut node = leaf("a");
        for _ in 0..200_000 {
            node = Arc::new(DawgNode::new("a", false).with_edge("a", node));
        }
        assert_eq!(node.depth(), 200_000);
        drop(node);
    }
}
