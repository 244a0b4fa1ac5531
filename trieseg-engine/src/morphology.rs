//! Branching-morpheme extraction from forward and reversed suffix trees
//!
//! Strings after which the corpus continues in several ways are stem or
//! prefix candidates; the same analysis on reversed documents finds suffix
//! candidates. Both lists are combined with a logical OR.

use crate::config::IndexConfig;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::io::OutputSinks;
use tracing::info;
use trieseg_core::{
    combine_or, BranchedString, BranchingListener, CancelToken, SuffixTree, TreeKind, TreeWalker,
};

/// Builds both trees and combines their branching strings
#[derive(Debug, Clone)]
pub struct MorphologyModule {
    terminator: char,
}

impl Default for MorphologyModule {
    fn default() -> Self {
        Self::new(&IndexConfig::default())
    }
}

impl MorphologyModule {
    /// Module using the terminator of `config`; trees are always generalized
    pub fn new(config: &IndexConfig) -> Self {
        Self {
            terminator: config.terminator,
        }
    }

    /// Combined branching strings of `plain` and of its reversal.
    ///
    /// `reversed` supplies the reversed documents explicitly; without it
    /// every document of `plain` is reversed.
    pub fn run(&self, plain: &Corpus, reversed: Option<&Corpus>, cancel: Option<&CancelToken>) -> Result<Vec<BranchedString>> {
        let forward = self.build(plain.documents().into_iter().map(str::to_string), cancel)?;
        let backward = match reversed {
            Some(corpus) => self.build(corpus.documents().into_iter().map(str::to_string), cancel)?,
            None => self.build(plain.documents().into_iter().map(|doc| self.reverse(doc)), cancel)?,
        };

        let mut listener = BranchingListener::new();
        TreeWalker::walk(forward.root(), &forward, &mut listener);
        let left = listener.into_results();

        let mut listener = BranchingListener::reversed();
        TreeWalker::walk(backward.root(), &backward, &mut listener);
        let right = listener.into_results();

        let combined = combine_or(&left, &right);
        info!(
            forward = left.len(),
            reversed = right.len(),
            combined = combined.len(),
            "branching strings extracted"
        );
        Ok(combined)
    }

    /// Run and write one `label<TAB>branches` line per string
    pub fn write(&self, plain: &Corpus, reversed: Option<&Corpus>, sinks: &mut OutputSinks, cancel: Option<&CancelToken>) -> Result<usize> {
        let result = self.run(plain, reversed, cancel).and_then(|items| {
            sinks.write_str(&render_lines(&items))?;
            Ok(items.len())
        });
        let closed = sinks.close();
        let count = result?;
        closed?;
        Ok(count)
    }

    fn build<I: Iterator<Item = String>>(&self, documents: I, cancel: Option<&CancelToken>) -> Result<SuffixTree> {
        let mut tree = SuffixTree::new(TreeKind::Generalized, self.terminator);
        for document in documents {
            tree.add_document_with_cancel(&document, cancel)?;
        }
        Ok(tree)
    }

    /// Reverse the body of a terminated document, keeping the terminator last
    fn reverse(&self, document: &str) -> String {
        let body = document.strip_suffix(self.terminator).unwrap_or(document);
        let mut reversed: String = body.chars().rev().collect();
        reversed.push(self.terminator);
        reversed
    }
}

/// One line per element
pub fn render_lines(items: &[BranchedString]) -> String {
    items.iter().map(|item| format!("{item}\n")).collect()
}
