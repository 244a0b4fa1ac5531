//! Indexing and segmentation runs for trieseg
//!
//! This crate wires the algorithms of `trieseg-core` to corpora, character
//! streams and output sinks. Every run is a plain synchronous call that works
//! to completion on the calling thread, polling an optional
//! [`CancelToken`] between phases or characters.

#![warn(missing_docs)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod indexer;
pub mod io;
pub mod morphology;
pub mod segmenter;

// Re-export key types
pub use config::{IndexConfig, SegmenterConfig, SegmenterConfigBuilder};
pub use corpus::Corpus;
pub use error::{EngineError, Result};
pub use indexer::{IndexStats, Indexer, SuffixIndex};
pub use io::{CharReader, OutputSinks, SharedBuffer};
pub use morphology::MorphologyModule;
pub use segmenter::{SegmentStats, Segmenter};

// Re-export from core for convenience
pub use trieseg_core::{
    ActivePoint, BranchedString, CancelToken, ReportProfile, SuffixTree, TreeKind, Trie,
    TrieRecord,
};
