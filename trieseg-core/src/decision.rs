//! Binary decision tree of join/split alternatives
//!
//! Every node stands for one buffered symbol: the root for the first symbol
//! of the buffer, a node on level `n` (root = 1) for the `n`-th. An expanded
//! node has exactly two children for the next symbol, the join child
//! continuing the node's trie branch and the split child restarting at the
//! trie root. A join whose symbol has no trie edge is dead: it is kept as a
//! marker but never scored, selected or expanded.

use crate::scorer::{Decision, Scorer};
use crate::trie::{Trie, TrieNodeId};
use std::collections::VecDeque;
use tracing::trace;

/// Index of a node in a [`DecisionTree`]
pub type DecisionId = usize;

/// How a decision node was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    /// First symbol of the window
    Root,
    /// Joined onto the parent's trie branch
    Join,
    /// Restarted at the trie root
    Split,
}

/// One decision for one symbol
#[derive(Debug, Clone)]
pub struct DecisionNode {
    /// Cumulative score from the tree root
    pub score: f64,
    /// Potential of the decision that led here
    pub potential: f64,
    /// Trie position after this symbol, if the trie knows it
    pub trie: Option<TrieNodeId>,
    /// Parent decision
    pub parent: Option<DecisionId>,
    /// Symbol decided on
    pub symbol: char,
    /// Join, split or root
    pub kind: DecisionKind,
    /// Symbols of the current segment up to and including this one
    pub run: usize,
    /// Level below the root, root = 1
    pub level: usize,
    /// Whether the node may be expanded and selected
    pub alive: bool,
    children: Option<(DecisionId, DecisionId)>,
}

impl DecisionNode {
    /// `(join, split)` children, once expanded
    pub fn children(&self) -> Option<(DecisionId, DecisionId)> {
        self.children
    }
}

/// Nearest ancestor of a selected leaf where splitting was preferred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPoint {
    /// The ancestor
    pub node: DecisionId,
    /// Its level, i.e. the number of buffered symbols up to and including it
    pub level: usize,
    /// Split potential minus join potential at that node
    pub margin: f64,
}

/// Decision tree over the current window
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<DecisionNode>,
}

impl DecisionTree {
    /// Root id; the root always occupies the first slot
    pub const ROOT: DecisionId = 0;

    /// Start a tree for the first buffered `symbol`
    pub fn new(trie: &Trie, symbol: char) -> Self {
        Self {
            nodes: vec![DecisionNode {
                score: 0.0,
                potential: 0.0,
                trie: trie.child(trie.root(), symbol),
                parent: None,
                symbol,
                kind: DecisionKind::Root,
                run: 1,
                level: 1,
                alive: true,
                children: None,
            }],
        }
    }

    /// Number of nodes, dead joins included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false, the root is never removed
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node
    pub fn node(&self, id: DecisionId) -> &DecisionNode {
        &self.nodes[id]
    }

    /// Expand every live leaf until the tree covers all of `buffer`.
    ///
    /// `buffer[0]` must be the root's symbol.
    pub fn grow(&mut self, trie: &Trie, scorer: &Scorer, buffer: &[char]) {
        let target = buffer.len();
        let mut queue: VecDeque<DecisionId> = (0..self.nodes.len())
            .filter(|&id| self.expandable(id, target))
            .collect();

        while let Some(id) = queue.pop_front() {
            let symbol = buffer[self.nodes[id].level];
            let (join, split) = self.expand(id, symbol, trie, scorer);
            for child in [join, split] {
                if self.expandable(child, target) {
                    queue.push_back(child);
                }
            }
        }
        trace!(nodes = self.nodes.len(), levels = target, "decision tree grown");
    }

    fn expandable(&self, id: DecisionId, target: usize) -> bool {
        let node = &self.nodes[id];
        node.alive && node.children.is_none() && node.level < target
    }

    fn expand(&mut self, id: DecisionId, symbol: char, trie: &Trie, scorer: &Scorer) -> (DecisionId, DecisionId) {
        let parent = self.nodes[id].clone();

        let join = match parent.trie.and_then(|node| trie.child(node, symbol)) {
            Some(next) => {
                let potential = scorer.activation_potential(trie, next, parent.run, Decision::Join);
                DecisionNode {
                    score: parent.score + potential,
                    potential,
                    trie: Some(next),
                    parent: Some(id),
                    symbol,
                    kind: DecisionKind::Join,
                    run: parent.run + 1,
                    level: parent.level + 1,
                    alive: true,
                    children: None,
                }
            }
            None => DecisionNode {
                score: parent.score,
                potential: 0.0,
                trie: None,
                parent: Some(id),
                symbol,
                kind: DecisionKind::Join,
                run: parent.run + 1,
                level: parent.level + 1,
                alive: false,
                children: None,
            },
        };

        let restart = trie.child(trie.root(), symbol);
        let potential = scorer.activation_potential(
            trie,
            restart.unwrap_or(trie.root()),
            parent.run,
            Decision::Split,
        );
        let split = DecisionNode {
            score: parent.score + potential,
            potential,
            trie: restart,
            parent: Some(id),
            symbol,
            kind: DecisionKind::Split,
            run: 1,
            level: parent.level + 1,
            alive: true,
            children: None,
        };

        self.nodes.push(join);
        self.nodes.push(split);
        let ids = (self.nodes.len() - 2, self.nodes.len() - 1);
        self.nodes[id].children = Some(ids);
        ids
    }

    /// Live leaf with the highest cumulative score.
    ///
    /// Ties go to the leaf closest to its last restart, then to the lower id.
    pub fn select(&self) -> DecisionId {
        let mut best = Self::ROOT;
        let mut found = false;
        for (id, node) in self.nodes.iter().enumerate() {
            if !node.alive || node.children.is_some() {
                continue;
            }
            if !found {
                best = id;
                found = true;
                continue;
            }
            let current = &self.nodes[best];
            let better = match node.score.total_cmp(&current.score) {
                core::cmp::Ordering::Greater => true,
                core::cmp::Ordering::Equal => node.run < current.run,
                core::cmp::Ordering::Less => false,
            };
            if better {
                best = id;
            }
        }
        best
    }

    /// Deepest proper ancestor of `leaf` where splitting beats joining.
    ///
    /// A dead join always counts as preferring the split. Equal potentials
    /// favour the join.
    pub fn last_split(&self, leaf: DecisionId) -> Option<SplitPoint> {
        let mut current = self.nodes[leaf].parent;
        while let Some(id) = current {
            let node = &self.nodes[id];
            if let Some((join, split)) = node.children {
                let join = &self.nodes[join];
                let split = &self.nodes[split];
                let margin = if join.alive {
                    split.potential - join.potential
                } else {
                    split.potential
                };
                if !join.alive || margin > 0.0 {
                    return Some(SplitPoint {
                        node: id,
                        level: node.level,
                        margin,
                    });
                }
            }
            current = node.parent;
        }
        None
    }

    /// Make `id` the new root, dropping everything outside its subtree.
    ///
    /// Scores and levels are rebased so the new root has score 0 and level 1.
    pub fn reroot(&mut self, id: DecisionId) {
        let base_score = self.nodes[id].score;
        let base_level = self.nodes[id].level - 1;

        let mut order = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            order.push(current);
            if let Some((join, split)) = self.nodes[current].children {
                queue.push_back(join);
                queue.push_back(split);
            }
        }

        let mut remap = vec![usize::MAX; self.nodes.len()];
        for (new, &old) in order.iter().enumerate() {
            remap[old] = new;
        }

        let mut nodes = Vec::with_capacity(order.len());
        for &old in &order {
            let mut node = self.nodes[old].clone();
            node.score -= base_score;
            node.level -= base_level;
            node.parent = node.parent.map(|parent| remap[parent]).filter(|&parent| parent != usize::MAX);
            node.children = node.children.map(|(join, split)| (remap[join], remap[split]));
            nodes.push(node);
        }
        nodes[Self::ROOT].parent = None;
        nodes[Self::ROOT].potential = 0.0;
        nodes[Self::ROOT].kind = DecisionKind::Root;
        self.nodes = nodes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie(words: &[&str]) -> Trie {
        let mut trie = Trie::new();
        for word in words {
            trie.insert(word, 1);
        }
        trie
    }

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn test_grow_expands_to_buffer_length() {
        let trie = trie(&["ab"]);
        let scorer = Scorer::default();
        let buffer = chars("ab");
        let mut tree = DecisionTree::new(&trie, 'a');
        tree.grow(&trie, &scorer, &buffer);

        let (join, split) = tree.node(DecisionTree::ROOT).children().unwrap();
        assert!(tree.node(join).alive);
        assert_eq!(tree.node(join).kind, DecisionKind::Join);
        assert_eq!(tree.node(split).kind, DecisionKind::Split);
        assert_eq!(tree.node(split).run, 1);
        assert_eq!(tree.node(join).level, 2);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_nodes_have_zero_or_two_children() {
        let trie = trie(&["abc", "bc", "c"]);
        let scorer = Scorer::default();
        let buffer = chars("abcab");
        let mut tree = DecisionTree::new(&trie, 'a');
        tree.grow(&trie, &scorer, &buffer);

        for id in 0..tree.len() {
            let node = tree.node(id);
            if let Some((join, split)) = node.children() {
                assert_ne!(join, split);
                assert_eq!(tree.node(join).parent, Some(id));
                assert_eq!(tree.node(split).parent, Some(id));
            }
            if !node.alive {
                assert!(node.children().is_none());
            }
        }
    }

    #[test]
    fn test_select_prefers_known_path() {
        let trie = trie(&["abc"]);
        let scorer = Scorer::default();
        let buffer = chars("abc");
        let mut tree = DecisionTree::new(&trie, 'a');
        tree.grow(&trie, &scorer, &buffer);

        // joining onto the end of the chain ties with restarting after it;
        // the tie goes to the restart, but no ancestor prefers a split
        let leaf = tree.select();
        assert_eq!(tree.node(leaf).kind, DecisionKind::Split);
        let parent = tree.node(leaf).parent.unwrap();
        assert_eq!(tree.node(parent).kind, DecisionKind::Join);
        assert_eq!(tree.node(parent).run, 2);
        assert!(tree.last_split(leaf).is_none());
    }

    #[test]
    fn test_dead_join_forces_split() {
        let trie = trie(&["ab", "cd"]);
        let scorer = Scorer::default();
        let buffer = chars("abcd");
        let mut tree = DecisionTree::new(&trie, 'a');
        tree.grow(&trie, &scorer, &buffer);

        let leaf = tree.select();
        let split = tree.last_split(leaf).unwrap();
        assert_eq!(split.level, 2);
        assert_eq!(tree.node(split.node).symbol, 'b');
        assert_eq!(split.margin, 1.0);
    }

    #[test]
    fn test_last_split_takes_deepest_ancestor() {
        let trie = trie(&["ab", "cd", "ef"]);
        let scorer = Scorer::default();
        let buffer = chars("abcde");
        let mut tree = DecisionTree::new(&trie, 'a');
        tree.grow(&trie, &scorer, &buffer);

        // a b | c d | e: dead joins after 'b' (level 2) and after 'd' (level 4)
        let (b, _) = tree.node(DecisionTree::ROOT).children().unwrap();
        let (_, c) = tree.node(b).children().unwrap();
        let (d, _) = tree.node(c).children().unwrap();
        let (dead, e) = tree.node(d).children().unwrap();
        assert!(!tree.node(dead).alive);

        let split = tree.last_split(e).unwrap();
        assert_eq!(split.node, d);
        assert_eq!(split.level, 4);
        assert_eq!(split.margin, tree.node(e).potential);

        let outer = tree.last_split(c).unwrap();
        assert_eq!(outer.node, b);
        assert_eq!(outer.level, 2);
    }

    #[test]
    fn test_decay_makes_split_win() {
        let trie = trie(&["abcd"]);
        let scorer = Scorer::new(1.0, 3.0).unwrap();
        let buffer = chars("abcd");
        let mut tree = DecisionTree::new(&trie, 'a');
        tree.grow(&trie, &scorer, &buffer);

        let leaf = tree.select();
        assert!(tree.last_split(leaf).is_some());
    }

    #[test]
    fn test_reroot_rebases() {
        let trie = trie(&["ab", "cd"]);
        let scorer = Scorer::default();
        let buffer = chars("abcd");
        let mut tree = DecisionTree::new(&trie, 'a');
        tree.grow(&trie, &scorer, &buffer);

        let split = tree.last_split(tree.select()).unwrap();
        let (_, new_root) = tree.node(split.node).children().unwrap();
        let subtree_symbol = tree.node(new_root).symbol;
        tree.reroot(new_root);

        let root = tree.node(DecisionTree::ROOT);
        assert_eq!(root.symbol, subtree_symbol);
        assert_eq!(root.score, 0.0);
        assert_eq!(root.level, 1);
        assert_eq!(root.parent, None);
        assert_eq!(root.kind, DecisionKind::Root);
        // 'c' then 'd': root plus one expanded level
        assert_eq!(tree.len(), 3);

        tree.grow(&trie, &scorer, &chars("cda"));
        assert!(tree.len() > 3);
    }
}
