//! Sliding segmentation window
//!
//! Symbols are pushed one at a time. Whenever the buffer reaches the window
//! size the decision tree is grown over it and either a segment is cut at the
//! nearest profitable split, or everything but the last symbol moves to the
//! carry-over buffer. At end of input [`SegmentationWindow::finish`] flushes
//! whatever is left as one final segment.

use crate::decision::DecisionTree;
use crate::error::{CoreError, Result};
use crate::scorer::Scorer;
use crate::trie::Trie;
use tracing::{debug, trace};

/// A cut segment
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Segment text, carry-over included
    pub text: String,
    /// Split margin that caused the cut; `None` for the final flush
    pub score: Option<f64>,
}

/// Window state over one input stream
#[derive(Debug)]
pub struct SegmentationWindow<'t> {
    trie: &'t Trie,
    scorer: Scorer,
    window: usize,
    buffer: Vec<char>,
    secondary: String,
    tree: Option<DecisionTree>,
}

impl<'t> SegmentationWindow<'t> {
    /// Create a window of `window` symbols over `trie`
    pub fn new(trie: &'t Trie, scorer: Scorer, window: usize) -> Result<Self> {
        if window == 0 {
            return Err(CoreError::InvalidWindow);
        }
        Ok(Self {
            trie,
            scorer,
            window,
            buffer: Vec::with_capacity(window + 1),
            secondary: String::new(),
            tree: None,
        })
    }

    /// Window size
    pub fn window(&self) -> usize {
        self.window
    }

    /// Symbols held back in the buffer and the carry-over buffer
    pub fn pending(&self) -> usize {
        self.buffer.len() + self.secondary.chars().count()
    }

    /// Consume one symbol, returning a segment if one was cut
    pub fn push(&mut self, symbol: char) -> Option<Segment> {
        self.buffer.push(symbol);
        if self.buffer.len() < self.window {
            return None;
        }
        self.decide()
    }

    fn decide(&mut self) -> Option<Segment> {
        let trie = self.trie;
        let tree = self
            .tree
            .get_or_insert_with(|| DecisionTree::new(trie, self.buffer[0]));
        tree.grow(trie, &self.scorer, &self.buffer);

        let leaf = tree.select();
        match tree.last_split(leaf) {
            None => {
                let keep = self.buffer.len() - 1;
                self.secondary.extend(self.buffer.drain(..keep));
                tree.reroot(leaf);
                trace!(carried = self.secondary.len(), "no split in window");
                None
            }
            Some(split) => {
                let mut text = std::mem::take(&mut self.secondary);
                text.extend(self.buffer.drain(..split.level));
                if let Some((_, next)) = tree.node(split.node).children() {
                    tree.reroot(next);
                }
                debug!(segment = %text, margin = split.margin, "segment cut");
                Some(Segment {
                    text,
                    score: Some(split.margin),
                })
            }
        }
    }

    /// End of input: everything still buffered becomes the last segment
    pub fn finish(&mut self) -> Option<Segment> {
        self.tree = None;
        let mut text = std::mem::take(&mut self.secondary);
        text.extend(self.buffer.drain(..));
        if text.is_empty() {
            None
        } else {
            debug!(segment = %text, "final segment flushed");
            Some(Segment { text, score: None })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(trie: &Trie, scorer: Scorer, window: usize, input: &str) -> Vec<Segment> {
        let mut win = SegmentationWindow::new(trie, scorer, window).unwrap();
        let mut out: Vec<Segment> = input.chars().filter_map(|c| win.push(c)).collect();
        out.extend(win.finish());
        out
    }

    fn words(words: &[&str]) -> Trie {
        let mut trie = Trie::new();
        for word in words {
            trie.insert(word, 1);
        }
        trie
    }

    #[test]
    fn test_zero_window_rejected() {
        let trie = Trie::new();
        assert!(matches!(
            SegmentationWindow::new(&trie, Scorer::default(), 0),
            Err(CoreError::InvalidWindow)
        ));
    }

    #[test]
    fn test_chain_trie_flushes_one_segment() {
        let trie = words(&["abcdefghijklmnopqrstuvwxyz"]);
        let input = "abcdefghijklmnopqrstuvwxyz";
        let segments = run(&trie, Scorer::default(), 10, input);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, input);
        assert_eq!(segments[0].score, None);
    }

    #[test]
    fn test_short_input_flushed_at_end() {
        let trie = words(&["ab"]);
        let segments = run(&trie, Scorer::default(), 10, "abc");
        assert_eq!(
            segments,
            vec![Segment {
                text: "abc".to_string(),
                score: None
            }]
        );
    }

    #[test]
    fn test_cuts_where_trie_has_no_continuation() {
        let trie = words(&["ab", "cd"]);
        let segments = run(&trie, Scorer::default(), 4, "abcd");

        assert_eq!(segments[0].text, "ab");
        assert_eq!(segments[0].score, Some(1.0));
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, "abcd");
    }

    #[test]
    fn test_no_symbol_loss_with_carry_over() {
        let trie = words(&["the", "then", "cat", "cats"]);
        let input = "thecatsthencatthe";
        for window in 1..8 {
            let segments = run(&trie, Scorer::new(1.0, 1.5).unwrap(), window, input);
            let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
            assert_eq!(joined, input, "window {window}");
        }
    }

    #[test]
    fn test_carry_over_longer_than_window() {
        let trie = words(&["abcdef", "xy"]);
        let segments = run(&trie, Scorer::default(), 3, "abcdefxyabxy");
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["abcdef", "xy", "ab", "xy"]);
    }

    #[test]
    fn test_empty_input() {
        let trie = words(&["a"]);
        assert!(run(&trie, Scorer::default(), 3, "").is_empty());
    }

    #[test]
    fn test_pending_bounded_by_window() {
        let trie = words(&["ab", "cd"]);
        let mut win = SegmentationWindow::new(&trie, Scorer::default(), 3).unwrap();
        for c in "abcdabcd".chars() {
            win.push(c);
            assert!(win.buffer.len() <= win.window());
        }
    }
}
