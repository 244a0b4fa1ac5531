//! Exchange trie: the per-character trie handed to the segmenter
//!
//! The serialized form is a nested object per node:
//!
//! ```json
//! { "count": 3, "children": { "a": { "count": 2, "children": {} } } }
//! ```
//!
//! Keys are normally single characters. Longer keys are accepted on import
//! and expanded into a chain of single-character nodes.

use crate::error::{CoreError, Result};
use crate::suffix_tree::{SuffixTree, ROOT};
use std::collections::BTreeMap;
use tracing::debug;

/// Index of a node in a [`Trie`]
pub type TrieNodeId = usize;

/// Default export depth
pub const DEFAULT_TRIE_DEPTH: usize = 32;

/// Deepest trie that still fits the JSON nesting limit of the exchange
/// format (two nesting levels per trie level).
pub const MAX_EXCHANGE_DEPTH: usize = 60;

/// Serialized trie node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrieRecord {
    /// Number of suffixes passing through this node
    #[cfg_attr(feature = "serde", serde(default))]
    pub count: u64,
    /// Children keyed by their leading characters
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: BTreeMap<String, TrieRecord>,
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNodeId>,
    count: u64,
    depth: usize,
}

/// Arena trie with one node per character position
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    max_depth: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    /// Trie holding only the root
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            max_depth: 0,
        }
    }

    /// Root node id
    pub fn root(&self) -> TrieNodeId {
        0
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root has no children
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Child of `node` reached by `symbol`
    pub fn child(&self, node: TrieNodeId, symbol: char) -> Option<TrieNodeId> {
        self.nodes[node].children.get(&symbol).copied()
    }

    /// Number of distinct continuations of `node`
    pub fn branching(&self, node: TrieNodeId) -> usize {
        self.nodes[node].children.len()
    }

    /// Suffix count recorded for `node`
    pub fn count(&self, node: TrieNodeId) -> u64 {
        self.nodes[node].count
    }

    /// Distance of `node` from the root
    pub fn depth(&self, node: TrieNodeId) -> usize {
        self.nodes[node].depth
    }

    /// Depth of the deepest node
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Children of `node` in ascending character order
    pub fn children(&self, node: TrieNodeId) -> impl Iterator<Item = (char, TrieNodeId)> + '_ {
        self.nodes[node].children.iter().map(|(&c, &id)| (c, id))
    }

    /// Insert `word`, adding `count` to every node on its path
    pub fn insert(&mut self, word: &str, count: u64) {
        let mut node = self.root();
        self.nodes[node].count += count;
        for symbol in word.chars() {
            node = self.child_or_insert(node, symbol);
            self.nodes[node].count += count;
        }
    }

    fn child_or_insert(&mut self, node: TrieNodeId, symbol: char) -> TrieNodeId {
        if let Some(child) = self.child(node, symbol) {
            return child;
        }
        let depth = self.nodes[node].depth + 1;
        self.nodes.push(TrieNode {
            children: BTreeMap::new(),
            count: 0,
            depth,
        });
        let child = self.nodes.len() - 1;
        self.nodes[node].children.insert(symbol, child);
        self.max_depth = self.max_depth.max(depth);
        child
    }

    /// Build from a deserialized record
    pub fn from_record(record: &TrieRecord) -> Result<Self> {
        let mut trie = Self::new();
        trie.nodes[0].count = record.count;
        let mut stack = vec![(record, trie.root())];
        while let Some((record, node)) = stack.pop() {
            for (key, child) in &record.children {
                if key.is_empty() {
                    return Err(CoreError::MalformedTrie {
                        reason: format!("empty child key below depth {}", trie.depth(node)),
                    });
                }
                let mut target = node;
                for symbol in key.chars() {
                    target = trie.child_or_insert(target, symbol);
                    trie.nodes[target].count += child.count;
                }
                stack.push((child, target));
            }
        }
        debug!(nodes = trie.len(), depth = trie.max_depth, "trie loaded");
        Ok(trie)
    }

    /// Serializable form with single-character keys
    pub fn to_record(&self) -> TrieRecord {
        self.record_of(self.root())
    }

    fn record_of(&self, node: TrieNodeId) -> TrieRecord {
        TrieRecord {
            count: self.nodes[node].count,
            children: self
                .children(node)
                .map(|(symbol, child)| (symbol.to_string(), self.record_of(child)))
                .collect(),
        }
    }

    /// Expand the edges of `tree` character by character, down to
    /// `max_depth` levels.
    ///
    /// Terminators of all documents render as the tree's terminator
    /// character, so their branches merge. Counts are the number of suffix
    /// leaves below each position.
    pub fn from_suffix_tree(tree: &SuffixTree, max_depth: usize) -> Self {
        let max_depth = max_depth.min(MAX_EXCHANGE_DEPTH);
        let leaves = tree.leaf_counts();
        let mut trie = Self::new();
        trie.nodes[0].count = if tree.is_empty() { 0 } else { leaves[ROOT] as u64 };

        let mut stack = vec![(tree.root(), trie.root())];
        while let Some((node, position)) = stack.pop() {
            for child in tree.children(node) {
                let count = leaves[child] as u64;
                let mut target = position;
                let mut complete = true;
                for symbol in tree.edge_label(child) {
                    if trie.depth(target) >= max_depth {
                        complete = false;
                        break;
                    }
                    target = trie.child_or_insert(target, symbol.render(tree.terminator()));
                    trie.nodes[target].count += count;
                    if symbol.is_terminator() {
                        complete = false;
                        break;
                    }
                }
                if complete {
                    stack.push((child, target));
                }
            }
        }
        debug!(nodes = trie.len(), depth = trie.max_depth, "trie exported from suffix tree");
        trie
    }
}
