//! Node creation strategies for simple and generalized trees

use super::node::{Edge, LeafTag, Node};
use crate::error::{CoreError, Result};
use crate::symbol::DocId;
use core::fmt;

/// How construction of a new document begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStart {
    /// Begin with an empty active point at the root
    FromRoot,
    /// Skip the longest prefix already present in the tree
    FromLongestPath,
}

/// Capability interface chosen when a tree is created
pub trait NodeFactory: fmt::Debug + Send + Sync {
    /// Build a node for `edge`; leaves receive the suffix they represent
    fn create_node(&self, edge: Edge, leaf: Option<LeafTag>) -> Node;

    /// Called before document `doc` is added
    fn on_document_boundary(&mut self, doc: DocId) -> Result<DocumentStart>;

    /// Short name used in logs and reports
    fn name(&self) -> &'static str;
}

/// Single-document suffix tree
#[derive(Debug, Default, Clone)]
pub struct SimpleNodeFactory;

impl NodeFactory for SimpleNodeFactory {
    fn create_node(&self, edge: Edge, leaf: Option<LeafTag>) -> Node {
        // one document only, so the position alone identifies the suffix
        Node::new(edge, leaf.map(|tag| LeafTag { doc: 0, ..tag }))
    }

    fn on_document_boundary(&mut self, doc: DocId) -> Result<DocumentStart> {
        if doc == 0 {
            Ok(DocumentStart::FromRoot)
        } else {
            Err(CoreError::SingleDocumentTree)
        }
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}

/// Suffix tree over many documents, leaves tagged by document
#[derive(Debug, Default, Clone)]
pub struct GeneralizedNodeFactory {
    documents: usize,
}

impl GeneralizedNodeFactory {
    /// Number of document boundaries seen so far
    pub fn documents(&self) -> usize {
        self.documents
    }
}

impl NodeFactory for GeneralizedNodeFactory {
    fn create_node(&self, edge: Edge, leaf: Option<LeafTag>) -> Node {
        Node::new(edge, leaf)
    }

    fn on_document_boundary(&mut self, doc: DocId) -> Result<DocumentStart> {
        self.documents = doc + 1;
        if doc == 0 {
            Ok(DocumentStart::FromRoot)
        } else {
            Ok(DocumentStart::FromLongestPath)
        }
    }

    fn name(&self) -> &'static str {
        "generalized"
    }
}
