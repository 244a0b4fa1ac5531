//! Deterministic depth-first traversal with pluggable listeners

use crate::suffix_tree::{NodeId, SuffixTree};
use crate::symbol::Symbol;

/// What a listener learns about a visited node
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// Visited node
    pub node: NodeId,
    /// Parent node, `None` for the walk's start node
    pub parent: Option<NodeId>,
    /// Number of edges between the start node and this node
    pub depth: usize,
    /// Number of symbols spelled from the start node to this node
    pub string_depth: usize,
    /// Label of the edge into this node (empty for the start node)
    pub label: &'a [Symbol],
    /// Number of children
    pub children: usize,
}

impl Visit<'_> {
    /// Whether the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children == 0
    }
}

/// Callbacks invoked by [`TreeWalker::walk`].
///
/// Every node gets `enter` and `exit` exactly once, leaves additionally get
/// `leaf` in between; a child's calls are nested inside its parent's.
pub trait TreeListener {
    /// Node reached, before its children
    fn enter(&mut self, tree: &SuffixTree, visit: &Visit<'_>);

    /// Node without children, between `enter` and `exit`
    fn leaf(&mut self, _tree: &SuffixTree, _visit: &Visit<'_>) {}

    /// Node left, after all of its children
    fn exit(&mut self, tree: &SuffixTree, visit: &Visit<'_>);
}

enum Step {
    Enter {
        node: NodeId,
        parent: Option<NodeId>,
        depth: usize,
        string_depth: usize,
    },
    Exit {
        node: NodeId,
        parent: Option<NodeId>,
        depth: usize,
        string_depth: usize,
    },
}

/// Walks a suffix tree, children in ascending order of their first symbol.
///
/// The walk uses an explicit stack, so arbitrarily deep trees are fine.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeWalker;

impl TreeWalker {
    /// Visit every node below and including `root`
    pub fn walk(root: NodeId, tree: &SuffixTree, listener: &mut dyn TreeListener) {
        let mut stack = vec![Step::Enter {
            node: root,
            parent: None,
            depth: 0,
            string_depth: 0,
        }];

        while let Some(step) = stack.pop() {
            match step {
                Step::Enter {
                    node,
                    parent,
                    depth,
                    string_depth,
                } => {
                    let visit = Self::visit(tree, root, node, parent, depth, string_depth);
                    listener.enter(tree, &visit);
                    if visit.is_leaf() {
                        listener.leaf(tree, &visit);
                    }
                    stack.push(Step::Exit {
                        node,
                        parent,
                        depth,
                        string_depth,
                    });
                    let children: Vec<NodeId> = tree.children(node).collect();
                    for child in children.into_iter().rev() {
                        stack.push(Step::Enter {
                            node: child,
                            parent: Some(node),
                            depth: depth + 1,
                            string_depth: string_depth + tree.edge_length(child),
                        });
                    }
                }
                Step::Exit {
                    node,
                    parent,
                    depth,
                    string_depth,
                } => {
                    let visit = Self::visit(tree, root, node, parent, depth, string_depth);
                    listener.exit(tree, &visit);
                }
            }
        }
    }

    fn visit(
        tree: &SuffixTree,
        root: NodeId,
        node: NodeId,
        parent: Option<NodeId>,
        depth: usize,
        string_depth: usize,
    ) -> Visit<'_> {
        Visit {
            node,
            parent,
            depth,
            string_depth,
            label: if node == root { &[] } else { tree.edge_label(node) },
            children: tree.node(node).children().len(),
        }
    }
}
