//! Streaming segmentation runs
//!
//! Reads the input one character at a time, feeds the segmentation window
//! and writes every segment followed by the divider to all sinks. With
//! `emit_scores` the split score and another divider follow each cut
//! segment. The tail left at end of input is flushed as a last segment.

use crate::config::{SegmenterConfig, LARGE_WINDOW};
use crate::error::{EngineError, Result};
use crate::io::{CharReader, OutputSinks, SharedBuffer};
use std::io::Read;
use tracing::{info, warn};
use trieseg_core::{CancelToken, Scorer, Segment, SegmentationWindow, Trie, TrieRecord};

/// Counters of one segmentation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentStats {
    /// Characters consumed
    pub symbols: usize,
    /// Segments written, final flush included
    pub segments: usize,
}

/// Segments character streams against one exchange trie
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmenterConfig,
    scorer: Scorer,
    trie: Trie,
}

impl Segmenter {
    /// Create a segmenter after validating `config`
    pub fn new(config: SegmenterConfig, trie: Trie) -> Result<Self> {
        let scorer = config.scorer()?;
        if config.window_size > trie.max_depth() {
            warn!(
                window = config.window_size,
                trie_depth = trie.max_depth(),
                "window exceeds the depth of the trie"
            );
        }
        if config.window_size > LARGE_WINDOW {
            warn!(window = config.window_size, "large windows grow the decision tree exponentially");
        }
        Ok(Self { config, scorer, trie })
    }

    /// Create a segmenter from a JSON exchange trie
    pub fn from_json_reader<R: Read>(config: SegmenterConfig, reader: R) -> Result<Self> {
        let record: TrieRecord = serde_json::from_reader(reader)?;
        let trie = Trie::from_record(&record)?;
        Self::new(config, trie)
    }

    /// Configuration in use
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Trie in use
    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Segment `input` to completion.
    ///
    /// The sinks are closed when the run ends, whether it succeeded, failed
    /// or was cancelled. Cancellation is checked before every character and
    /// reported as [`EngineError::Interrupted`].
    pub fn run<R: Read>(&self, input: R, sinks: &mut OutputSinks, cancel: Option<&CancelToken>) -> Result<SegmentStats> {
        info!(window = self.config.window_size, sinks = sinks.len(), "segmentation started");
        let result = self.drive(input, sinks, cancel);
        let closed = sinks.close();
        let stats = result?;
        closed?;
        info!(symbols = stats.symbols, segments = stats.segments, "segmentation finished");
        Ok(stats)
    }

    fn drive<R: Read>(&self, input: R, sinks: &mut OutputSinks, cancel: Option<&CancelToken>) -> Result<SegmentStats> {
        let mut window = SegmentationWindow::new(&self.trie, self.scorer, self.config.window_size)?;
        let mut stats = SegmentStats::default();
        let mut reader = CharReader::new(input);

        loop {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                warn!(symbols = stats.symbols, "segmentation interrupted");
                return Err(EngineError::Interrupted);
            }
            let Some(symbol) = reader.read_char()? else {
                break;
            };
            stats.symbols += 1;
            if let Some(segment) = window.push(symbol) {
                self.emit(&segment, sinks)?;
                stats.segments += 1;
            }
        }

        if let Some(segment) = window.finish() {
            self.emit(&segment, sinks)?;
            stats.segments += 1;
        }
        Ok(stats)
    }

    fn emit(&self, segment: &Segment, sinks: &mut OutputSinks) -> Result<()> {
        let divider = &self.config.divider;
        let mut out = String::with_capacity(segment.text.len() + 2 * divider.len() + 24);
        out.push_str(&segment.text);
        out.push_str(divider);
        if self.config.emit_scores {
            if let Some(score) = segment.score {
                out.push_str(&score.to_string());
                out.push_str(divider);
            }
        }
        sinks.write_str(&out)
    }

    /// Segment a string in memory and return the output text
    pub fn segment_str(&self, input: &str) -> Result<String> {
        let buffer = SharedBuffer::new();
        let mut sinks = OutputSinks::new().with(buffer.clone());
        self.run(input.as_bytes(), &mut sinks, None)?;
        Ok(buffer.contents())
    }
}
