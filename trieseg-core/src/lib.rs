//! Suffix-tree indexing and trie-driven segmentation
//!
//! This crate holds the deterministic algorithms of trieseg:
//!
//! - **Suffix tree engine**: online (Ukkonen) construction of simple and
//!   generalized suffix trees over terminated documents, with substring and
//!   longest-path queries.
//! - **Walker and listeners**: a deterministic depth-first traversal feeding
//!   pluggable listeners, used for the tagged report and for extracting
//!   branching strings.
//! - **Exchange trie**: the per-character trie the segmenter consumes, either
//!   deserialized or exported from a suffix tree.
//! - **Segmentation**: the scorer, the join/split decision tree and the
//!   sliding window that cuts an input stream into segments.
//!
//! No I/O happens here; streaming, configuration and file handling live in
//! `trieseg-engine`.
//!
//! # Example
//!
//! ```rust
//! use trieseg_core::{ActivePoint, SuffixTree};
//!
//! let mut tree = SuffixTree::simple();
//! tree.add_document("banana$").unwrap();
//!
//! assert!(tree.search("anana$").is_some());
//! let point = tree.longest_path("nanyx", ActivePoint::root()).unwrap();
//! assert_eq!(point.length, 3);
//! ```

pub mod cancel;
pub mod decision;
pub mod error;
pub mod listeners;
pub mod scorer;
pub mod suffix_tree;
pub mod symbol;
pub mod trie;
pub mod walker;
pub mod window;

pub use cancel::CancelToken;
pub use decision::{DecisionId, DecisionKind, DecisionNode, DecisionTree, SplitPoint};
pub use error::{CoreError, Result};
pub use listeners::{
    combine_or, parse_report, write_report, BranchedString, BranchingListener, ReportEntry,
    ReportListener, ReportProfile,
};
pub use scorer::{Decision, Scorer};
pub use suffix_tree::{
    ActivePoint, ConstructionContext, NodeFactory, NodeId, SuffixTree, TreeKind, UnitMap,
    DEFAULT_TERMINATOR,
};
pub use symbol::{DocId, Symbol, TextStore};
pub use trie::{Trie, TrieNodeId, TrieRecord, DEFAULT_TRIE_DEPTH, MAX_EXCHANGE_DEPTH};
pub use walker::{TreeListener, TreeWalker, Visit};
pub use window::{Segment, SegmentationWindow};
