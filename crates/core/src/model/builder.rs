use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::dawg::DawgNode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("words must be inserted in sorted order: {word:?} after {previous:?}")]
    Unsorted { previous: String, word: String },
}

const ROOT: usize = 0;

#[derive(Debug)]
struct Draft {
    label: String,
    is_end_of_word: bool,
    edges: Vec<(String, usize)>,
}

/// Equivalence key for a finished node: incoming label, end flag and the
/// (already canonical) targets of its outgoing edges.
type Signature = (String, bool, Vec<(String, usize)>);

/// Incremental DAWG construction from sorted input (Daciuk et al., 2000).
///
/// Each new word only touches the path that diverges from the previous
/// word, so suffixes are merged as soon as they can no longer change.
/// Two nodes merge only when their incoming label also matches, which keeps
/// every node's `Label` equal to the edge key that reaches it.
#[derive(Debug)]
pub struct DawgBuilder {
    nodes: Vec<Draft>,
    /// `(parent, child)` pairs along the last inserted word that are not
    /// yet minimized.
    unchecked: Vec<(usize, usize)>,
    register: HashMap<Signature, usize>,
    previous: Option<String>,
}

impl DawgBuilder {
    pub fn new() -> Self {
        Self::with_root_label("")
    }

    pub fn with_root_label(label: impl Into<String>) -> Self {
        Self {
            nodes: vec![Draft {
                label: label.into(),
                is_end_of_word: false,
                edges: Vec::new(),
            }],
            unchecked: Vec::new(),
            register: HashMap::new(),
            previous: None,
        }
    }

    /// Add a word. Words must arrive in ascending order; repeating the
    /// previous word is a no-op.
    pub fn insert(&mut self, word: &str) -> Result<(), BuildError> {
        if let Some(previous) = &self.previous {
            if word == previous {
                return Ok(());
            }
            if word < previous.as_str() {
                return Err(BuildError::Unsorted {
                    previous: previous.clone(),
                    word: word.to_string(),
                });
            }
        }

        let common = self.previous.as_deref().map_or(0, |prev| {
            prev.chars()
                .zip(word.chars())
                .take_while(|(a, b)| a == b)
                .count()
        });
        self.minimize(common);

        let mut node = self.unchecked.last().map_or(ROOT, |&(_, child)| child);
        for ch in word.chars().skip(common) {
            let label = ch.to_string();
            let child = self.nodes.len();
            self.nodes.push(Draft {
                label: label.clone(),
                is_end_of_word: false,
                edges: Vec::new(),
            });
            self.nodes[node].edges.push((label, child));
            self.unchecked.push((node, child));
            node = child;
        }
        self.nodes[node].is_end_of_word = true;
        self.previous = Some(word.to_string());
        Ok(())
    }

    /// Minimize the remaining path and freeze the graph into shared nodes.
    pub fn finish(mut self) -> Arc<DawgNode> {
        self.minimize(0);
        self.freeze()
    }

    fn minimize(&mut self, down_to: usize) {
        while self.unchecked.len() > down_to {
            let Some((parent, child)) = self.unchecked.pop() else {
                break;
            };
            let draft = &self.nodes[child];
            let key: Signature = (
                draft.label.clone(),
                draft.is_end_of_word,
                draft.edges.clone(),
            );
            match self.register.get(&key) {
                Some(&existing) => {
                    // The child was the most recent edge added to `parent`.
                    if let Some(edge) = self.nodes[parent].edges.last_mut() {
                        edge.1 = existing;
                    }
                }
                None => {
                    self.register.insert(key, child);
                }
            }
        }
    }

    /// Turn drafts into `Arc` nodes, children first. Each draft is frozen
    /// once, so merged suffixes become a single shared allocation.
    fn freeze(&self) -> Arc<DawgNode> {
        let mut frozen: Vec<Option<Arc<DawgNode>>> = vec![None; self.nodes.len()];
        let mut stack = vec![ROOT];
        while let Some(&index) = stack.last() {
            if frozen[index].is_some() {
                stack.pop();
                continue;
            }
            let draft = &self.nodes[index];
            let pending: Vec<usize> = draft
                .edges
                .iter()
                .map(|&(_, child)| child)
                .filter(|&child| frozen[child].is_none())
                .collect();
            if !pending.is_empty() {
                stack.extend(pending);
                continue;
            }

            let mut node = DawgNode::new(draft.label.clone(), draft.is_end_of_word);
            for (label, child) in &draft.edges {
                if let Some(child) = &frozen[*child] {
                    node.edges.insert(label.clone(), Arc::clone(child));
                }
            }
            frozen[index] = Some(Arc::new(node));
            stack.pop();
        }

        let root = &self.nodes[ROOT];
        frozen
            .swap_remove(ROOT)
            .unwrap_or_else(|| Arc::new(DawgNode::new(root.label.clone(), root.is_end_of_word)))
    }
}

impl Default for DawgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(words: &[&str]) -> Arc<DawgNode> {
        let mut builder = DawgBuilder::new();
        for word in words {
            builder.insert(word).unwrap();
        }
        builder.finish()
    }

    #[test]
    fn accepts_exactly_the_inserted_words() {
        let words = ["tap", "taps", "top", "tops"];
        let dawg = build(&words);
        assert_eq!(dawg.words(), words);
    }

    #[test]
    fn shares_common_suffix_node() {
        let dawg = build(&["tap", "taps", "top", "tops"]);
        let t = &dawg.edges["t"];
        let via_a = &t.edges["a"].edges["p"];
        let via_o = &t.edges["o"].edges["p"];
        assert!(Arc::ptr_eq(via_a, via_o));

        let stats = dawg.stats();
        // root, t, a, o, p, s
        assert_eq!(stats.distinct_nodes, 6);
        // root, t, a, p, s, o, p, s
        assert_eq!(stats.unrolled_nodes, 8);
        assert_eq!(stats.words, 4);
    }

    #[test]
    fn does_not_merge_nodes_with_different_labels() {
        // "ab" and "cb": the b-nodes merge, but "a" and "c" stay apart.
        let dawg = build(&["ab", "cb"]);
        assert!(!Arc::ptr_eq(&dawg.edges["a"], &dawg.edges["c"]));
        assert!(Arc::ptr_eq(
            &dawg.edges["a"].edges["b"],
            &dawg.edges["c"].edges["b"]
        ));
        for (label, child) in &dawg.edges {
            assert_eq!(&child.label, label);
        }
    }

    #[test]
    fn prefix_word_marks_inner_node() {
        let dawg = build(&["do", "dog"]);
        let o = &dawg.edges["d"].edges["o"];
        assert!(o.is_end_of_word);
        assert!(o.edges["g"].is_end_of_word);
    }

    #[test]
    fn rejects_unsorted_input() {
        let mut builder = DawgBuilder::new();
        builder.insert("b").unwrap();
        let err = builder.insert("a").unwrap_err();
        assert_eq!(
            err,
            BuildError::Unsorted {
                previous: "b".into(),
                word: "a".into()
            }
        );
    }

    #[test]
    fn duplicate_is_ignored() {
        let dawg = build(&["a", "a", "b"]);
        assert_eq!(dawg.words(), ["a", "b"]);
    }

    #[test]
    fn root_label_is_configurable() {
        let mut builder = DawgBuilder::with_root_label("root");
        builder.insert("x").unwrap();
        assert_eq!(builder.finish().label, "root");
    }

    #[test]
    fn very_long_word_builds_a_chain() {
        let word = "ab".repeat(50_000);
        let mut builder = DawgBuilder::new();
        builder.insert(&word).unwrap();
        let dawg = builder.finish();
        assert_eq!(dawg.depth(), word.len());
        assert_eq!(dawg.stats().words, 1);
    }
}
