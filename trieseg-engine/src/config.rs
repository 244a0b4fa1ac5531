//! Configuration types for indexing and segmentation runs

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trieseg_core::{Scorer, TreeKind, DEFAULT_TERMINATOR, DEFAULT_TRIE_DEPTH, MAX_EXCHANGE_DEPTH};

/// Property key for the window size
pub const KEY_WINDOW_SIZE: &str = "window_size";
/// Property key for the token divider
pub const KEY_DIVIDER: &str = "divider";
/// Property key for the minimum cost
pub const KEY_MIN_COST: &str = "min_cost";
/// Property key for the decay factor
pub const KEY_DECAY: &str = "decay";
/// Property key for score emission
pub const KEY_EMIT_SCORES: &str = "emit_scores";

/// Windows above this size make the decision tree noticeably slow
pub const LARGE_WINDOW: usize = 16;

/// Segmentation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SegmenterConfig {
    /// Symbols per decision window
    pub window_size: usize,
    /// Written after every segment
    pub divider: String,
    /// Cost floor of every decision
    pub min_cost: f64,
    /// Per-symbol factor on the split potential (1.0 = neutral)
    pub decay: f64,
    /// Write each segment's split score after it
    pub emit_scores: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            divider: "\t".to_string(),
            min_cost: 1.0,
            decay: 1.0,
            emit_scores: false,
        }
    }
}

impl SegmenterConfig {
    /// Start a builder from the defaults
    pub fn builder() -> SegmenterConfigBuilder {
        SegmenterConfigBuilder::default()
    }

    /// Check every value; errors name the offending key
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(EngineError::config(KEY_WINDOW_SIZE, "must be a positive integer"));
        }
        if !self.min_cost.is_finite() || self.min_cost < 0.0 {
            return Err(EngineError::config(
                KEY_MIN_COST,
                format!("must be a finite, non-negative number, got {}", self.min_cost),
            ));
        }
        if !self.decay.is_finite() || self.decay <= 0.0 {
            return Err(EngineError::config(
                KEY_DECAY,
                format!("must be a finite number greater than 0, got {}", self.decay),
            ));
        }
        Ok(())
    }

    /// Scorer for these parameters
    pub fn scorer(&self) -> Result<Scorer> {
        self.validate()?;
        Ok(Scorer::new(self.min_cost, self.decay)?)
    }

    /// Parse the string property surface.
    ///
    /// Missing keys keep their defaults, unknown keys are rejected.
    /// Dividers may use the escapes `\t`, `\n` and `\\`.
    pub fn from_properties(properties: &BTreeMap<String, String>) -> Result<Self> {
        let mut config = Self::default();
        for (key, value) in properties {
            match key.as_str() {
                KEY_WINDOW_SIZE => config.window_size = parse(key, value)?,
                KEY_DIVIDER => config.divider = unescape(value),
                KEY_MIN_COST => config.min_cost = parse(key, value)?,
                KEY_DECAY => config.decay = parse(key, value)?,
                KEY_EMIT_SCORES => config.emit_scores = parse(key, value)?,
                _ => return Err(EngineError::config(key.as_str(), "unknown property")),
            }
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| EngineError::config(key, format!("cannot parse '{value}'")))
}

/// Decode `\t`, `\n` and `\\` in a divider given on the command line or in
/// a property file; other backslashes are kept as they are.
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Builder for [`SegmenterConfig`]
#[derive(Debug, Clone, Default)]
pub struct SegmenterConfigBuilder {
    config: SegmenterConfig,
}

impl SegmenterConfigBuilder {
    /// Set the window size
    pub fn window_size(mut self, size: usize) -> Self {
        self.config.window_size = size;
        self
    }

    /// Set the divider
    pub fn divider<S: Into<String>>(mut self, divider: S) -> Self {
        self.config.divider = divider.into();
        self
    }

    /// Set the minimum cost
    pub fn min_cost(mut self, cost: f64) -> Self {
        self.config.min_cost = cost;
        self
    }

    /// Set the decay factor
    pub fn decay(mut self, decay: f64) -> Self {
        self.config.decay = decay;
        self
    }

    /// Enable or disable score emission
    pub fn emit_scores(mut self, emit: bool) -> Self {
        self.config.emit_scores = emit;
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<SegmenterConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Indexing parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Character closing every document
    pub terminator: char,
    /// Simple (one document) or generalized tree
    pub kind: TreeKind,
    /// Depth limit of exported exchange tries
    pub max_trie_depth: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            terminator: DEFAULT_TERMINATOR,
            kind: TreeKind::Generalized,
            max_trie_depth: DEFAULT_TRIE_DEPTH,
        }
    }
}

impl IndexConfig {
    /// Check every value
    pub fn validate(&self) -> Result<()> {
        if self.max_trie_depth == 0 || self.max_trie_depth > MAX_EXCHANGE_DEPTH {
            return Err(EngineError::config(
                "max_trie_depth",
                format!("must be between 1 and {MAX_EXCHANGE_DEPTH}, got {}", self.max_trie_depth),
            ));
        }
        Ok(())
    }
}
