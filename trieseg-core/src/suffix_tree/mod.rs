//! Suffix tree engine
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]; edge labels
//! are ranges into the shared [`TextStore`]. A tree is created either as a
//! simple (single document) or a generalized (many documents) tree, which
//! only differ in the [`NodeFactory`] they were built with.

mod construction;
mod factory;
mod node;
mod units;

pub use construction::{ActivePoint, ConstructionContext};
pub use factory::{DocumentStart, GeneralizedNodeFactory, NodeFactory, SimpleNodeFactory};
pub use node::{Edge, EdgeEnd, EndTable, LeafTag, Node, NodeId, SentinelId, ROOT};
pub use units::UnitMap;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::symbol::{render, DocId, Symbol, TextStore};
use core::fmt::{self, Write};
use core::ops::Range;
use tracing::{debug, warn};

/// Default document terminator
pub const DEFAULT_TERMINATOR: char = '$';

/// Which factory a tree is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TreeKind {
    /// One document only
    Simple,
    /// Any number of documents
    #[default]
    Generalized,
}

/// Position reached while matching a query from some node
#[derive(Debug, Clone, Copy)]
struct Locus {
    /// Deepest explicit node passed
    node: NodeId,
    /// Child edge currently inside, with symbols consumed on it
    within: Option<(NodeId, usize)>,
}

/// Ukkonen suffix tree over one or many terminated documents
#[derive(Debug)]
pub struct SuffixTree {
    text: TextStore,
    nodes: Vec<Node>,
    ends: EndTable,
    factory: Box<dyn NodeFactory>,
    documents: Vec<Range<usize>>,
    terminator: char,
}

impl SuffixTree {
    /// Create an empty tree of the given kind
    pub fn new(kind: TreeKind, terminator: char) -> Self {
        let factory: Box<dyn NodeFactory> = match kind {
            TreeKind::Simple => Box::new(SimpleNodeFactory),
            TreeKind::Generalized => Box::new(GeneralizedNodeFactory::default()),
        };
        Self::with_factory(factory, terminator)
    }

    /// Create an empty tree using `factory` for node creation
    pub fn with_factory(factory: Box<dyn NodeFactory>, terminator: char) -> Self {
        let root = factory.create_node(Edge::new(0, EdgeEnd::Closed(0)), None);
        Self {
            text: TextStore::new(),
            nodes: vec![root],
            ends: EndTable::default(),
            factory,
            documents: Vec::new(),
            terminator,
        }
    }

    /// Single-document tree with the default terminator
    pub fn simple() -> Self {
        Self::new(TreeKind::Simple, DEFAULT_TERMINATOR)
    }

    /// Multi-document tree with the default terminator
    pub fn generalized() -> Self {
        Self::new(TreeKind::Generalized, DEFAULT_TERMINATOR)
    }

    /// Add one terminated document
    pub fn add_document(&mut self, document: &str) -> Result<DocId> {
        self.add_document_with_cancel(document, None)
    }

    /// Add one terminated document, polling `cancel` between phases.
    ///
    /// An invalid document is rejected before anything is stored. A run
    /// that fails part way, cancellation included, is rolled back, so the
    /// tree is left as it was and the next document reuses the id.
    pub fn add_document_with_cancel(&mut self, document: &str, cancel: Option<&CancelToken>) -> Result<DocId> {
        let doc = self.documents.len();
        TextStore::validate(document, self.terminator, doc)?;
        let start = self.factory.on_document_boundary(doc)?;
        let range = self.text.push_document(document, self.terminator, doc)?;
        self.documents.push(range.clone());

        let sentinel = self.ends.open(range.start);
        let mut ctx = ConstructionContext::new(doc, range.start, sentinel, self.nodes.len())
            .with_cancel(cancel.cloned());

        let mut first_phase = range.start;
        if start == DocumentStart::FromLongestPath {
            let symbols = self.text.slice(range.clone()).to_vec();
            match self.match_path(&symbols, ActivePoint::root(), true) {
                Some(point) => {
                    debug!(doc, skipped = point.length, "resuming from longest path");
                    first_phase += point.length;
                    ctx.resume(point);
                }
                None => debug!(doc, "no shared prefix, starting at root"),
            }
        }

        if let Err(err) = self.extend(&mut ctx, first_phase..range.end) {
            warn!(doc, error = %err, "construction failed, document rolled back");
            self.rollback(ctx);
            return Err(err);
        }
        debug!(
            doc,
            symbols = range.len(),
            nodes = self.nodes.len(),
            factory = self.factory.name(),
            "document indexed"
        );
        Ok(doc)
    }

    /// Node reached by matching `pattern` from the root.
    ///
    /// A pattern ending inside an edge yields the node below that edge. The
    /// terminator character matches the terminator of any document.
    pub fn search(&self, pattern: &str) -> Option<NodeId> {
        if self.is_empty() || pattern.is_empty() {
            return None;
        }
        let query = Symbol::query(pattern, self.terminator);
        let locus = self.descend(&query, ActivePoint::root(), false)?;
        if locus.1 < query.len() {
            return None;
        }
        Some(match locus.0.within {
            Some((child, _)) => child,
            None => locus.0.node,
        })
    }

    /// Follow `query` from `from` as far as the tree allows.
    ///
    /// The returned point keeps `from.node` and counts every matched symbol
    /// in `length` and `phase`; it also records where the match ended, so
    /// it can be passed back in to continue the path. `None` means not even
    /// the first symbol matched.
    pub fn longest_path(&self, query: &str, from: ActivePoint) -> Option<ActivePoint> {
        let symbols = Symbol::query(query, self.terminator);
        let point = self.match_path(&symbols, from, false);
        if point.is_none() {
            warn!(query, node = from.node, "longest path: no matching edge");
        }
        point
    }

    /// Whether `symbols` spell a path from the root, comparing terminators
    /// exactly.
    pub fn contains_path(&self, symbols: &[Symbol]) -> bool {
        match self.descend(symbols, ActivePoint::root(), true) {
            Some((_, matched)) => matched == symbols.len(),
            None => symbols.is_empty(),
        }
    }

    fn match_path(&self, symbols: &[Symbol], from: ActivePoint, exact: bool) -> Option<ActivePoint> {
        let (locus, matched) = self.descend(symbols, from, exact)?;
        if matched == 0 {
            return None;
        }
        let resolved = match locus.within {
            Some(position) => position,
            None => (locus.node, self.edge_length(locus.node)),
        };
        Some(ActivePoint {
            node: from.node,
            edge: from.edge.or_else(|| self.first_edge_symbol(from.node, symbols[0], exact)),
            length: from.length + matched,
            phase: from.phase + matched,
            resolved: Some(resolved),
        })
    }

    /// Walk `symbols` starting at the position described by `from`: the
    /// position a previous match resolved to, or else a point whose length
    /// stays within its active edge. Returns the final locus and the number
    /// of matched symbols, or `None` when `from` does not describe a
    /// position in the tree.
    fn descend(&self, symbols: &[Symbol], from: ActivePoint, exact: bool) -> Option<(Locus, usize)> {
        if from.node >= self.nodes.len() {
            return None;
        }
        let mut locus = Locus {
            node: from.node,
            within: None,
        };
        if let Some((child, offset)) = from.resolved {
            if child >= self.nodes.len() {
                return None;
            }
            match offset.cmp(&self.edge_length(child)) {
                core::cmp::Ordering::Less => locus.within = Some((child, offset)),
                core::cmp::Ordering::Equal => locus.node = child,
                core::cmp::Ordering::Greater => return None,
            }
        } else if from.length > 0 {
            let child = *self.nodes[from.node].children.get(&from.edge?)?;
            if from.length >= self.edge_length(child) {
                return None;
            }
            locus.within = Some((child, from.length));
        }

        let mut matched = 0;
        for &symbol in symbols {
            let (child, offset) = match locus.within {
                Some(position) => position,
                None => match self.child_for(locus.node, symbol, exact) {
                    Some(child) => (child, 0),
                    None => break,
                },
            };
            let label = self.edge_label(child);
            let found = if exact {
                label[offset] == symbol
            } else {
                label[offset].matches(symbol)
            };
            if !found {
                break;
            }
            matched += 1;
            if offset + 1 == label.len() {
                locus.node = child;
                locus.within = None;
            } else {
                locus.within = Some((child, offset + 1));
            }
        }
        Some((locus, matched))
    }

    fn child_for(&self, node: NodeId, symbol: Symbol, exact: bool) -> Option<NodeId> {
        let children = &self.nodes[node].children;
        match symbol {
            Symbol::Terminator(_) if !exact => children
                .range(Symbol::Terminator(0)..)
                .next()
                .map(|(_, &child)| child),
            _ => children.get(&symbol).copied(),
        }
    }

    fn first_edge_symbol(&self, node: NodeId, symbol: Symbol, exact: bool) -> Option<Symbol> {
        self.child_for(node, symbol, exact)
            .map(|child| self.text[self.nodes[child].edge().start])
    }

    /// Whether no document has been indexed
    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT].children.is_empty()
    }

    /// Root node id
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Total number of nodes, root and leaves included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Children of `id` in ascending order of their first symbol
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id].children.values().copied()
    }

    /// Number of indexed documents
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Text range of document `doc`
    pub fn document_range(&self, doc: DocId) -> Option<Range<usize>> {
        self.documents.get(doc).cloned()
    }

    /// Symbols of document `doc`, terminator included
    pub fn document(&self, doc: DocId) -> Option<&[Symbol]> {
        self.document_range(doc).map(|range| self.text.slice(range))
    }

    /// Terminator character of this tree
    pub fn terminator(&self) -> char {
        self.terminator
    }

    /// Name of the node factory in use
    pub fn factory_name(&self) -> &'static str {
        self.factory.name()
    }

    /// Backing text store
    pub fn text(&self) -> &TextStore {
        &self.text
    }

    /// Length of the edge into `id`
    pub fn edge_length(&self, id: NodeId) -> usize {
        let edge = self.nodes[id].edge();
        self.ends.resolve(edge.end) - edge.start
    }

    /// Label of the edge into `id`
    pub fn edge_label(&self, id: NodeId) -> &[Symbol] {
        let edge = self.nodes[id].edge();
        self.text.slice(edge.start..self.ends.resolve(edge.end))
    }

    /// Label of the edge into `id`, rendered with the terminator character
    pub fn edge_string(&self, id: NodeId) -> String {
        render(self.edge_label(id), self.terminator)
    }

    /// Leaves whose suffix belongs to `doc`
    pub fn leaves_of(&self, doc: DocId) -> usize {
        self.nodes
            .iter()
            .filter_map(Node::leaf_tag)
            .filter(|tag| tag.doc == doc)
            .count()
    }

    /// Number of leaves in the subtree of every node, indexed by node id
    pub fn leaf_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id));
        }
        for &id in order.iter().rev() {
            counts[id] = if self.nodes[id].is_leaf() {
                1
            } else {
                self.children(id).map(|child| counts[child]).sum()
            };
        }
        counts
    }

    /// Indented, human-readable dump of the whole tree
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        self.write_dump(&mut out).ok();
        out
    }

    fn write_dump(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(
            out,
            "{} suffix tree: {} nodes, {} documents",
            self.factory.name(),
            self.nodes.len(),
            self.documents.len()
        )?;
        let mut stack = vec![(ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            write!(out, "{:indent$}[{id}] {:?}", "", self.edge_string(id), indent = depth * 2)?;
            if let Some(link) = node.suffix_link() {
                write!(out, " -> {link}")?;
            }
            if let Some(tag) = node.leaf_tag() {
                write!(out, " (doc {} @ {})", tag.doc, tag.offset)?;
            }
            writeln!(out)?;
            let children: Vec<NodeId> = self.children(id).collect();
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        Ok(())
    }
}
