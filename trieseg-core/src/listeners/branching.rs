//! Branching-string extraction for morphology

use crate::suffix_tree::SuffixTree;
use crate::symbol::render;
use crate::walker::{TreeListener, Visit};
use std::collections::BTreeMap;
use std::fmt;

/// Path label of an internal node together with its number of children
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchedString {
    /// String spelled from the root to the node
    pub label: String,
    /// Number of distinct continuations
    pub branches: usize,
}

impl fmt::Display for BranchedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.label, self.branches)
    }
}

/// Collects every non-root node with more than one continuation.
///
/// Continuations are counted by rendered symbol, so the terminators of
/// different documents count once. With `reversed` set the tree is assumed
/// to index reversed text and each collected label is reversed back.
#[derive(Debug, Default)]
pub struct BranchingListener {
    reversed: bool,
    path: Vec<String>,
    found: Vec<BranchedString>,
}

impl BranchingListener {
    /// Listener for a tree over forward text
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener for a tree over reversed text
    pub fn reversed() -> Self {
        Self {
            reversed: true,
            ..Self::default()
        }
    }

    /// Collected strings, in walk order
    pub fn into_results(self) -> Vec<BranchedString> {
        self.found
    }
}

impl TreeListener for BranchingListener {
    fn enter(&mut self, tree: &SuffixTree, visit: &Visit<'_>) {
        let mut label = self.path.last().cloned().unwrap_or_default();
        label.push_str(&render(visit.label, tree.terminator()));
        let branches = continuations(tree, visit);
        if visit.parent.is_some() && branches > 1 {
            let label = if self.reversed {
                label.chars().rev().collect()
            } else {
                label.clone()
            };
            self.found.push(BranchedString { label, branches });
        }
        self.path.push(label);
    }

    fn exit(&mut self, _tree: &SuffixTree, _visit: &Visit<'_>) {
        self.path.pop();
    }
}

fn continuations(tree: &SuffixTree, visit: &Visit<'_>) -> usize {
    let children = tree.node(visit.node).children();
    let chars = children.keys().filter(|symbol| !symbol.is_terminator()).count();
    chars + usize::from(chars < children.len())
}

/// Logical OR of two result lists: every label present in either list once,
/// with the larger branching count, sorted by label.
pub fn combine_or(left: &[BranchedString], right: &[BranchedString]) -> Vec<BranchedString> {
    let mut merged: BTreeMap<&str, usize> = BTreeMap::new();
    for item in left.iter().chain(right) {
        let branches = merged.entry(item.label.as_str()).or_insert(0);
        *branches = (*branches).max(item.branches);
    }
    merged
        .into_iter()
        .map(|(label, branches)| BranchedString {
            label: label.to_string(),
            branches,
        })
        .collect()
}
