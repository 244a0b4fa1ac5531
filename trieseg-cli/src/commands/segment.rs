//! Segment command implementation

use super::{open_file, open_input, open_sinks};
use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::io::BufReader;
use std::path::PathBuf;
use trieseg_engine::config::unescape;
use trieseg_engine::{SegmenterConfig, Segmenter};

/// Arguments for the segment command
#[derive(Debug, Args)]
pub struct SegmentArgs {
    /// Exchange trie in JSON
    #[arg(long, value_name = "FILE", required = true)]
    pub trie: PathBuf,

    /// Text to segment (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output files, repeatable (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Vec<PathBuf>,

    /// Number of symbols looked ahead before a cut is decided
    #[arg(short, long, value_name = "N")]
    pub window: Option<usize>,

    /// Written after every segment; `\t`, `\n` and `\\` are decoded
    #[arg(short, long, value_name = "TEXT")]
    pub divider: Option<String>,

    /// Base cost of every decision
    #[arg(long, value_name = "COST")]
    pub min_cost: Option<f64>,

    /// Growth of the split cost with the length of the current segment
    #[arg(long, value_name = "FACTOR")]
    pub decay: Option<f64>,

    /// Write the split score after each cut segment
    #[arg(long)]
    pub emit_scores: bool,

    /// Never write split scores, even when the configuration file asks for them
    #[arg(long, conflicts_with = "emit_scores")]
    pub no_emit_scores: bool,
}

impl SegmentArgs {
    /// Execute the segment command
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let segmenter_config = self.segmenter_config(config)?;
        log::debug!("Segmenter configuration: {segmenter_config:?}");

        let trie = BufReader::new(open_file(&self.trie)?);
        let segmenter = Segmenter::from_json_reader(segmenter_config, trie)
            .with_context(|| format!("Failed to load trie: {}", self.trie.display()))?;

        let input = BufReader::new(open_input(self.input.as_deref())?);
        let mut sinks = open_sinks(&self.output)?;
        let stats = segmenter.run(input, &mut sinks, None)?;
        log::info!(
            "Segmented {} symbols into {} segments",
            stats.symbols,
            stats.segments
        );
        Ok(())
    }

    /// Configuration file values with the flags applied on top
    fn segmenter_config(&self, config: &CliConfig) -> Result<SegmenterConfig> {
        let base = &config.segmenter;
        let merged = SegmenterConfig::builder()
            .window_size(self.window.unwrap_or(base.window_size))
            .divider(
                self.divider
                    .as_deref()
                    .map_or_else(|| base.divider.clone(), unescape),
            )
            .min_cost(self.min_cost.unwrap_or(base.min_cost))
            .decay(self.decay.unwrap_or(base.decay))
            .emit_scores(!self.no_emit_scores && (self.emit_scores || base.emit_scores))
            .build()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SegmentArgs {
        SegmentArgs {
            trie: PathBuf::from("trie.json"),
            input: None,
            output: Vec::new(),
            window: None,
            divider: None,
            min_cost: None,
            decay: None,
            emit_scores: false,
            no_emit_scores: false,
        }
    }

    #[test]
    fn test_file_values_kept_without_flags() {
        let mut config = CliConfig::default();
        config.segmenter.window_size = 7;
        config.segmenter.divider = " ".to_string();

        let merged = args().segmenter_config(&config).unwrap();
        assert_eq!(merged.window_size, 7);
        assert_eq!(merged.divider, " ");
    }

    #[test]
    fn test_flags_override_and_unescape() {
        let flags = SegmentArgs {
            window: Some(4),
            divider: Some("\\n".to_string()),
            decay: Some(2.0),
            emit_scores: true,
            ..args()
        };
        let merged = flags.segmenter_config(&CliConfig::default()).unwrap();
        assert_eq!(merged.window_size, 4);
        assert_eq!(merged.divider, "\n");
        assert_eq!(merged.decay, 2.0);
        assert!(merged.emit_scores);
    }

    #[test]
    fn test_flag_turns_off_file_scores() {
        let mut config = CliConfig::default();
        config.segmenter.emit_scores = true;
        assert!(args().segmenter_config(&config).unwrap().emit_scores);

        let flags = SegmentArgs {
            no_emit_scores: true,
            ..args()
        };
        assert!(!flags.segmenter_config(&config).unwrap().emit_scores);
    }

    #[test]
    fn test_invalid_flag_rejected() {
        let flags = SegmentArgs {
            window: Some(0),
            ..args()
        };
        assert!(flags.segmenter_config(&CliConfig::default()).is_err());
    }
}
