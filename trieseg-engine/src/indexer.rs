//! Indexing runs: corpus in, suffix tree report and exchange trie out

use crate::config::IndexConfig;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::io::OutputSinks;
use std::time::Instant;
use tracing::{debug, info};
use trieseg_core::{
    write_report, ActivePoint, CancelToken, NodeId, ReportProfile, SuffixTree, Trie, UnitMap,
};

/// Builds suffix trees from corpora
#[derive(Debug, Clone, Default)]
pub struct Indexer {
    config: IndexConfig,
}

/// Counters of one indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Documents added to the tree
    pub documents: usize,
    /// Symbols added, terminators included
    pub symbols: usize,
    /// Nodes in the finished tree
    pub nodes: usize,
    /// Units reported for the corpus
    pub units: usize,
}

impl Indexer {
    /// Create an indexer after validating `config`
    pub fn new(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Index every document of `corpus`.
    ///
    /// The first invalid document aborts the run with its error; a cancelled
    /// run stops between two phases.
    pub fn index(&self, corpus: &Corpus, cancel: Option<&CancelToken>) -> Result<SuffixIndex> {
        let started = Instant::now();
        let documents = corpus.documents();
        let units = corpus.unit_map(documents.len())?;
        info!(documents = documents.len(), kind = ?self.config.kind, "indexing started");

        let mut tree = SuffixTree::new(self.config.kind, corpus.terminator());
        let mut current_unit = None;
        let mut symbols = 0usize;
        for document in &documents {
            let doc = tree.add_document_with_cancel(document, cancel)?;
            symbols += document.chars().count();
            let unit = units.unit_of(doc);
            if unit != current_unit {
                debug!(doc, unit, ty = unit.and_then(|u| corpus.types().get(u)).map(String::as_str), "unit");
                current_unit = unit;
            }
        }

        let stats = IndexStats {
            documents: tree.document_count(),
            symbols,
            nodes: tree.node_count(),
            units: corpus.unit_count(&units),
        };
        info!(
            documents = stats.documents,
            nodes = stats.nodes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "indexing finished"
        );
        Ok(SuffixIndex { tree, units, stats })
    }
}

/// A finished suffix tree together with its corpus metadata
#[derive(Debug)]
pub struct SuffixIndex {
    tree: SuffixTree,
    units: UnitMap,
    stats: IndexStats,
}

impl SuffixIndex {
    /// The suffix tree
    pub fn tree(&self) -> &SuffixTree {
        &self.tree
    }

    /// Unit boundaries of the corpus
    pub fn units(&self) -> &UnitMap {
        &self.units
    }

    /// Counters of the run that built this index
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Tagged textual report
    pub fn report(&self) -> String {
        write_report(&self.tree, self.stats.units)
    }

    /// Node profile as a report of this index would describe it
    pub fn profile(&self) -> ReportProfile {
        ReportProfile::from_tree(&self.tree, self.stats.units)
    }

    /// Write the report to every sink
    pub fn write_report(&self, sinks: &mut OutputSinks) -> Result<()> {
        sinks.write_str(&self.report())
    }

    /// Exchange trie of at most `max_depth` levels
    pub fn exchange_trie(&self, max_depth: usize) -> Trie {
        Trie::from_suffix_tree(&self.tree, max_depth)
    }

    /// Exchange trie as JSON
    pub fn trie_json(&self, max_depth: usize, pretty: bool) -> Result<String> {
        let record = self.exchange_trie(max_depth).to_record();
        let json = if pretty {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };
        Ok(json)
    }

    /// Write the exchange trie JSON to every sink
    pub fn write_trie(&self, sinks: &mut OutputSinks, max_depth: usize, pretty: bool) -> Result<()> {
        let mut json = self.trie_json(max_depth, pretty)?;
        json.push('\n');
        sinks.write_str(&json)
    }

    /// Node reached by `pattern`
    pub fn search(&self, pattern: &str) -> Option<NodeId> {
        self.tree.search(pattern)
    }

    /// Longest path of `query` from the root
    pub fn longest_path(&self, query: &str) -> Option<ActivePoint> {
        self.tree.longest_path(query, ActivePoint::root())
    }
}
