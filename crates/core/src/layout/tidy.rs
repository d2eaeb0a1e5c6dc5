//! Buchheim–Jünger–Leipert tidy tree pass (linear-time Reingold–Tilford).
//!
//! Works on a flattened tree and returns one unscaled breadth coordinate
//! per node, in separation units. The bookkeeping mirrors the paper:
//! `prelim`, `modifier`, `change`, `shift`, `thread`, `ancestor`.

use super::LayoutNode;

/// Slot 0 is a synthetic parent of the real root so the root can be walked
/// like any other node; real node `i` lives in slot `i + 1`.
const SUPER_ROOT: usize = 0;

#[derive(Debug, Clone)]
struct Walk {
    parent: Option<usize>,
    children: Vec<usize>,
    /// Position among siblings.
    number: usize,
    ancestor: usize,
    /// Default ancestor for the children's apportion steps.
    default_ancestor: Option<usize>,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    thread: Option<usize>,
}

struct Tidy {
    walk: Vec<Walk>,
    sibling_separation: f64,
    cousin_separation: f64,
}

pub(super) fn tidy_breadth(
    nodes: &[LayoutNode],
    sibling_separation: f64,
    cousin_separation: f64,
) -> Vec<f64> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let mut walk = Vec::with_capacity(nodes.len() + 1);
    walk.push(Walk::new(SUPER_ROOT, None, vec![1], 0));
    for (i, node) in nodes.iter().enumerate() {
        let parent = node.parent.map_or(SUPER_ROOT, |p| p + 1);
        let children = node.children.iter().map(|c| c + 1).collect();
        walk.push(Walk::new(i + 1, Some(parent), children, 0));
    }
    for node in nodes {
        for (number, &child) in node.children.iter().enumerate() {
            walk[child + 1].number = number;
        }
    }

    let mut tidy = Tidy {
        walk,
        sibling_separation,
        cousin_separation,
    };

    for v in tidy.post_order() {
        tidy.first_walk(v);
    }
    tidy.walk[SUPER_ROOT].modifier = -tidy.walk[1].prelim;

    // Flattened order is breadth-first, so parents precede children.
    let mut breadth = Vec::with_capacity(nodes.len());
    for v in 1..tidy.walk.len() {
        let parent_modifier = tidy.parent(v).map_or(0.0, |p| tidy.walk[p].modifier);
        breadth.push(tidy.walk[v].prelim + parent_modifier);
        tidy.walk[v].modifier += parent_modifier;
    }
    breadth
}

impl Walk {
    fn new(id: usize, parent: Option<usize>, children: Vec<usize>, number: usize) -> Self {
        Self {
            parent,
            children,
            number,
            ancestor: id,
            default_ancestor: None,
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
            thread: None,
        }
    }
}

impl Tidy {
    fn parent(&self, v: usize) -> Option<usize> {
        self.walk[v].parent
    }

    /// Left-to-right post-order of the real nodes, without recursion.
    fn post_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.walk.len() - 1);
        let mut stack = vec![(1, false)];
        while let Some((v, expanded)) = stack.pop() {
            if expanded {
                out.push(v);
            } else {
                stack.push((v, true));
                stack.extend(self.walk[v].children.iter().rev().map(|&c| (c, false)));
            }
        }
        out
    }

    fn separation(&self, a: usize, b: usize) -> f64 {
        if self.parent(a) == self.parent(b) {
            self.sibling_separation
        } else {
            self.cousin_separation
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.walk[v].children.first().copied().or(self.walk[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.walk[v].children.last().copied().or(self.walk[v].thread)
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let number = self.walk[v].number;
        if number == 0 {
            return None;
        }
        let parent = self.parent(v)?;
        self.walk[parent].children.get(number - 1).copied()
    }

    fn first_walk(&mut self, v: usize) {
        let Some(parent) = self.parent(v) else {
            return;
        };
        let left = self.left_sibling(v);

        if let (Some(&first), Some(&last)) =
            (self.walk[v].children.first(), self.walk[v].children.last())
        {
            self.execute_shifts(v);
            let midpoint = (self.walk[first].prelim + self.walk[last].prelim) / 2.0;
            match left {
                Some(w) => {
                    self.walk[v].prelim = self.walk[w].prelim + self.separation(v, w);
                    self.walk[v].modifier = self.walk[v].prelim - midpoint;
                }
                None => self.walk[v].prelim = midpoint,
            }
        } else if let Some(w) = left {
            self.walk[v].prelim = self.walk[w].prelim + self.separation(v, w);
        }

        let leftmost_sibling = self.walk[parent].children[0];
        let default_ancestor = self.walk[parent]
            .default_ancestor
            .unwrap_or(leftmost_sibling);
        let next = self.apportion(v, left, default_ancestor);
        self.walk[parent].default_ancestor = Some(next);
    }

    /// Push `v`'s subtree right until its left contour clears the right
    /// contour of the subtrees already placed to its left.
    fn apportion(&mut self, v: usize, left: Option<usize>, mut default_ancestor: usize) -> usize {
        let Some(w) = left else {
            return default_ancestor;
        };
        let Some(parent) = self.parent(v) else {
            return default_ancestor;
        };

        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.walk[parent].children[0];
        let mut sip = self.walk[vip].modifier;
        let mut sop = self.walk[vop].modifier;
        let mut sim = self.walk[vim].modifier;
        let mut som = self.walk[vom].modifier;

        let mut next_im = self.next_right(vim);
        let mut next_ip = self.next_left(vip);
        while let (Some(im), Some(ip)) = (next_im, next_ip) {
            let (Some(om), Some(op)) = (self.next_left(vom), self.next_right(vop)) else {
                break;
            };
            vim = im;
            vip = ip;
            vom = om;
            vop = op;
            self.walk[vop].ancestor = v;

            let shift = self.walk[vim].prelim + sim - self.walk[vip].prelim - sip
                + self.separation(vim, vip);
            if shift > 0.0 {
                let ancestor = self.next_ancestor(vim, v, default_ancestor);
                self.move_subtree(ancestor, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.walk[vim].modifier;
            sip += self.walk[vip].modifier;
            som += self.walk[vom].modifier;
            sop += self.walk[vop].modifier;

            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
        }

        if let Some(im) = next_im
            && self.next_right(vop).is_none()
        {
            self.walk[vop].thread = Some(im);
            self.walk[vop].modifier += sim - sop;
        }
        if let Some(ip) = next_ip
            && self.next_left(vom).is_none()
        {
            self.walk[vom].thread = Some(ip);
            self.walk[vom].modifier += sip - som;
            default_ancestor = v;
        }
        default_ancestor
    }

    fn next_ancestor(&self, vim: usize, v: usize, default_ancestor: usize) -> usize {
        let candidate = self.walk[vim].ancestor;
        if self.parent(candidate) == self.parent(v) {
            candidate
        } else {
            default_ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = self.walk[wp].number.saturating_sub(self.walk[wm].number).max(1);
        let change = shift / subtrees as f64;
        self.walk[wp].change -= change;
        self.walk[wp].shift += shift;
        self.walk[wm].change += change;
        self.walk[wp].prelim += shift;
        self.walk[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        let children = self.walk[v].children.clone();
        for &w in children.iter().rev() {
            self.walk[w].prelim += shift;
            self.walk[w].modifier += shift;
            change += self.walk[w].change;
            shift += self.walk[w].shift + change;
        }
    }
}
