//! Arena nodes, edges and the end-sentinel table

use crate::symbol::{DocId, Symbol};
use std::collections::BTreeMap;

/// Index of a node in the tree arena
pub type NodeId = usize;

/// The root node is always the first arena slot
pub const ROOT: NodeId = 0;

/// Index of an end sentinel in the [`EndTable`]
pub type SentinelId = usize;

/// End of an edge label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    /// Grows with the sentinel until the sentinel stops advancing
    Open(SentinelId),
    /// Fixed exclusive end position
    Closed(usize),
}

/// Half-open range `[start, end)` into the text store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// First text position of the label
    pub start: usize,
    /// Exclusive end of the label
    pub end: EdgeEnd,
}

impl Edge {
    /// Create an edge
    pub fn new(start: usize, end: EdgeEnd) -> Self {
        Self { start, end }
    }
}

/// Which suffix a leaf stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeafTag {
    /// Document the suffix belongs to
    pub doc: DocId,
    /// Start of the suffix relative to the document start
    pub offset: usize,
}

/// A tree node together with the edge leading into it
#[derive(Debug, Clone)]
pub struct Node {
    edge: Edge,
    pub(crate) children: BTreeMap<Symbol, NodeId>,
    pub(crate) suffix_link: Option<NodeId>,
    leaf: Option<LeafTag>,
}

impl Node {
    /// Create a node without children
    pub fn new(edge: Edge, leaf: Option<LeafTag>) -> Self {
        Self {
            edge,
            children: BTreeMap::new(),
            suffix_link: None,
            leaf,
        }
    }

    /// Incoming edge
    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub(crate) fn edge_mut(&mut self) -> &mut Edge {
        &mut self.edge
    }

    /// Outgoing edges keyed by their first symbol, in ascending order
    pub fn children(&self) -> &BTreeMap<Symbol, NodeId> {
        &self.children
    }

    /// Suffix link, if one has been set
    pub fn suffix_link(&self) -> Option<NodeId> {
        self.suffix_link
    }

    /// Tag of the suffix ending here, for leaves
    pub fn leaf_tag(&self) -> Option<LeafTag> {
        self.leaf
    }

    /// Whether the node has no outgoing edges
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Shared end positions referenced by open edges.
///
/// Each document gets one sentinel. Advancing it moves the end of every open
/// edge of that document at once; once the next document starts, the old
/// sentinel is never advanced again and its edges are effectively closed.
#[derive(Debug, Clone, Default)]
pub struct EndTable {
    ends: Vec<usize>,
}

impl EndTable {
    /// Allocate a sentinel starting at `position`
    pub fn open(&mut self, position: usize) -> SentinelId {
        self.ends.push(position);
        self.ends.len() - 1
    }

    /// Move sentinel `id` to `position`
    pub fn advance(&mut self, id: SentinelId, position: usize) {
        self.ends[id] = position;
    }

    /// Current value of sentinel `id`
    pub fn value(&self, id: SentinelId) -> usize {
        self.ends[id]
    }

    /// Resolve an edge end to a text position
    pub fn resolve(&self, end: EdgeEnd) -> usize {
        match end {
            EdgeEnd::Open(id) => self.ends[id],
            EdgeEnd::Closed(position) => position,
        }
    }

    /// Drop sentinel `id` and every later one
    pub(crate) fn truncate(&mut self, id: SentinelId) {
        self.ends.truncate(id);
    }

    /// Number of allocated sentinels
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    /// Whether no sentinel has been allocated
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_edges_follow_their_sentinel() {
        let mut table = EndTable::default();
        let first = table.open(0);
        let a = Edge::new(0, EdgeEnd::Open(first));
        let b = Edge::new(2, EdgeEnd::Open(first));

        table.advance(first, 5);
        assert_eq!(table.resolve(a.end), 5);
        assert_eq!(table.resolve(b.end), 5);

        let second = table.open(5);
        table.advance(second, 9);
        assert_eq!(table.resolve(a.end), 5);
        assert_eq!(table.resolve(EdgeEnd::Open(second)), 9);
        assert_eq!(table.resolve(EdgeEnd::Closed(3)), 3);
    }
}
