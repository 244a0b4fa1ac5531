//! Online construction (Ukkonen's algorithm)
//!
//! Each phase appends one text position to the tree. Open leaf edges all
//! reference the document's end sentinel, so advancing the sentinel once per
//! phase performs every rule-1 extension at the same time. The remaining
//! extensions of a phase either create leaves (rule 2a/2b) or stop the phase
//! as soon as the symbol is already present (rule 3).

use super::node::{Edge, EdgeEnd, LeafTag, NodeId, SentinelId, ROOT};
use super::SuffixTree;
use crate::cancel::CancelToken;
use crate::error::Result;
use crate::symbol::{DocId, Symbol};
use core::ops::Range;
use tracing::trace;

/// Cursor into the tree during construction.
///
/// The active point denotes the string spelled from `node` along the edge
/// starting with `edge` for `length` symbols. `phase` counts symbols of the
/// current document (or query) consumed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePoint {
    /// Node the point hangs off
    pub node: NodeId,
    /// First symbol of the active edge; only meaningful when `length > 0`
    pub edge: Option<Symbol>,
    /// Symbols matched along the active edge
    pub length: usize,
    /// Symbols consumed so far
    pub phase: usize,
    /// Edge position a query match ended at: the node below the edge and
    /// the symbols consumed on it
    pub(crate) resolved: Option<(NodeId, usize)>,
}

impl ActivePoint {
    /// Empty point at the root
    pub fn root() -> Self {
        Self {
            node: ROOT,
            edge: None,
            length: 0,
            phase: 0,
            resolved: None,
        }
    }
}

impl Default for ActivePoint {
    fn default() -> Self {
        Self::root()
    }
}

/// Change made to a node that existed before the current run
#[derive(Debug, Clone, Copy)]
enum Undo {
    Child {
        node: NodeId,
        symbol: Symbol,
        previous: Option<NodeId>,
    },
    Start {
        node: NodeId,
        start: usize,
    },
    Link {
        node: NodeId,
        previous: Option<NodeId>,
    },
}

/// State of one document's construction run.
///
/// Owned by the caller for the duration of the run and threaded through
/// every [`SuffixTree::extend`] call.
#[derive(Debug, Clone)]
pub struct ConstructionContext {
    doc: DocId,
    doc_start: usize,
    sentinel: SentinelId,
    point: ActivePoint,
    remainder: usize,
    cancel: Option<CancelToken>,
    base: NodeId,
    undo: Vec<Undo>,
}

impl ConstructionContext {
    /// `base` is the node count before the run; older nodes are journaled
    pub(crate) fn new(doc: DocId, doc_start: usize, sentinel: SentinelId, base: NodeId) -> Self {
        Self {
            doc,
            doc_start,
            sentinel,
            point: ActivePoint::root(),
            remainder: 0,
            cancel: None,
            base,
            undo: Vec::new(),
        }
    }

    /// Poll `cancel` once per phase
    pub fn with_cancel(mut self, cancel: Option<CancelToken>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Continue from a point returned by `longest_path`; every suffix of
    /// the already matched prefix is pending.
    pub(crate) fn resume(&mut self, point: ActivePoint) {
        self.remainder = point.length;
        self.point = ActivePoint {
            resolved: None,
            ..point
        };
    }

    /// Document under construction
    pub fn doc(&self) -> DocId {
        self.doc
    }

    /// Current active point
    pub fn active_point(&self) -> ActivePoint {
        self.point
    }

    /// Suffixes inserted implicitly and still waiting for a leaf
    pub fn remainder(&self) -> usize {
        self.remainder
    }

    /// Sentinel shared by the open edges of this document
    pub fn sentinel(&self) -> SentinelId {
        self.sentinel
    }
}

impl SuffixTree {
    /// Run every phase in `phases` (text positions of the context's
    /// document) and return the active point where the last phase stopped.
    pub fn extend(&mut self, ctx: &mut ConstructionContext, phases: Range<usize>) -> Result<ActivePoint> {
        for pos in phases {
            if let Some(cancel) = &ctx.cancel {
                cancel.check()?;
            }
            self.phase(ctx, pos);
        }
        Ok(ctx.point)
    }

    fn phase(&mut self, ctx: &mut ConstructionContext, pos: usize) {
        // rule 1 for every open leaf of this document
        self.ends.advance(ctx.sentinel, pos + 1);
        ctx.remainder += 1;
        let symbol = self.text[pos];
        let mut pending_link: Option<NodeId> = None;

        while ctx.remainder > 0 {
            let edge_symbol = self.text[pos - ctx.point.length];
            ctx.point.edge = Some(edge_symbol);
            let active = ctx.point.node;
            assert!(active < self.nodes.len(), "active node {active} outside arena");

            match self.nodes[active].children.get(&edge_symbol).copied() {
                None => {
                    // rule 2b
                    let leaf = self.new_leaf(ctx, pos);
                    self.set_child(ctx, active, edge_symbol, leaf);
                    self.link(ctx, &mut pending_link, active);
                }
                Some(next) => {
                    if self.walk_down(ctx, next, pos) {
                        continue;
                    }
                    let next_edge = self.nodes[next].edge();
                    if self.text[next_edge.start + ctx.point.length] == symbol {
                        // rule 3, the rest of the phase is implicit
                        ctx.point.length += 1;
                        self.link(ctx, &mut pending_link, active);
                        trace!(pos, node = active, length = ctx.point.length, "show stopper");
                        break;
                    }
                    // rule 2a
                    let split_at = next_edge.start + ctx.point.length;
                    let split = self.push_node(
                        Edge::new(next_edge.start, EdgeEnd::Closed(split_at)),
                        None,
                    );
                    self.set_child(ctx, active, edge_symbol, split);
                    let leaf = self.new_leaf(ctx, pos);
                    self.nodes[split].children.insert(symbol, leaf);
                    self.set_start(ctx, next, split_at);
                    let continued = self.text[split_at];
                    self.nodes[split].children.insert(continued, next);
                    self.link(ctx, &mut pending_link, split);
                }
            }

            ctx.remainder -= 1;
            if ctx.point.node == ROOT && ctx.point.length > 0 {
                ctx.point.length -= 1;
                ctx.point.edge = Some(self.text[pos + 1 - ctx.remainder]);
            } else if ctx.point.node != ROOT {
                ctx.point.node = self.nodes[ctx.point.node].suffix_link.unwrap_or(ROOT);
            }
        }

        if ctx.point.length == 0 {
            ctx.point.edge = None;
        }
        ctx.point.phase = pos + 1 - ctx.doc_start;
    }

    /// Canonize across `next` if the active length covers its whole edge.
    fn walk_down(&mut self, ctx: &mut ConstructionContext, next: NodeId, pos: usize) -> bool {
        let length = self.edge_length_at(next, pos);
        if ctx.point.length >= length {
            ctx.point.length -= length;
            ctx.point.node = next;
            ctx.point.edge = Some(self.text[pos - ctx.point.length]);
            true
        } else {
            false
        }
    }

    fn new_leaf(&mut self, ctx: &ConstructionContext, pos: usize) -> NodeId {
        let suffix_start = pos + 1 - ctx.remainder;
        let tag = LeafTag {
            doc: ctx.doc,
            offset: suffix_start - ctx.doc_start,
        };
        self.push_node(Edge::new(pos, EdgeEnd::Open(ctx.sentinel)), Some(tag))
    }

    fn push_node(&mut self, edge: Edge, leaf: Option<LeafTag>) -> NodeId {
        let node = self.factory.create_node(edge, leaf);
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn set_child(&mut self, ctx: &mut ConstructionContext, node: NodeId, symbol: Symbol, child: NodeId) {
        let previous = self.nodes[node].children.insert(symbol, child);
        if node < ctx.base {
            ctx.undo.push(Undo::Child { node, symbol, previous });
        }
    }

    fn set_start(&mut self, ctx: &mut ConstructionContext, node: NodeId, start: usize) {
        let edge = self.nodes[node].edge_mut();
        if node < ctx.base {
            ctx.undo.push(Undo::Start {
                node,
                start: edge.start,
            });
        }
        edge.start = start;
    }

    /// Point the previously created internal node of this phase at `node`.
    fn link(&mut self, ctx: &mut ConstructionContext, pending: &mut Option<NodeId>, node: NodeId) {
        if let Some(previous) = pending.take() {
            let old = self.nodes[previous].suffix_link.replace(node);
            if previous < ctx.base {
                ctx.undo.push(Undo::Link { node: previous, previous: old });
            }
        }
        if node != ROOT {
            *pending = Some(node);
        }
    }

    /// Undo a failed run: restore every journaled node, then drop the
    /// nodes, text, document entry and sentinel the run added.
    pub(crate) fn rollback(&mut self, ctx: ConstructionContext) {
        for change in ctx.undo.into_iter().rev() {
            match change {
                Undo::Child {
                    node,
                    symbol,
                    previous: Some(child),
                } => {
                    self.nodes[node].children.insert(symbol, child);
                }
                Undo::Child {
                    node,
                    symbol,
                    previous: None,
                } => {
                    self.nodes[node].children.remove(&symbol);
                }
                Undo::Start { node, start } => self.nodes[node].edge_mut().start = start,
                Undo::Link { node, previous } => self.nodes[node].suffix_link = previous,
            }
        }
        self.nodes.truncate(ctx.base);
        self.text.truncate(ctx.doc_start);
        self.documents.truncate(ctx.doc);
        self.ends.truncate(ctx.sentinel);
        trace!(doc = ctx.doc, nodes = self.nodes.len(), "construction rolled back");
    }

    /// Length of the edge into `node` as seen during phase `pos`
    fn edge_length_at(&self, node: NodeId, pos: usize) -> usize {
        let edge = self.nodes[node].edge();
        self.ends.resolve(edge.end).min(pos + 1) - edge.start
    }
}
