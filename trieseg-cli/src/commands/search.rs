//! Search command implementation

use super::open_input;
use crate::config::CliConfig;
use crate::error::CliError;
use anyhow::{Context, Result};
use clap::Args;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use trieseg_engine::{Corpus, Indexer, SuffixIndex};

/// Arguments for the search command
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Corpus of terminator-delimited documents (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Patterns to look up
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Report the length of the longest matching prefix instead
    #[arg(long)]
    pub longest: bool,

    /// Print the whole tree before the results
    #[arg(long)]
    pub dump: bool,
}

impl SearchArgs {
    /// Execute the search command
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        if self.patterns.is_empty() && !self.dump {
            return Err(CliError::InvalidArgument(
                "give at least one pattern or --dump".to_string(),
            )
            .into());
        }

        let mut text = String::new();
        open_input(self.input.as_deref())?
            .read_to_string(&mut text)
            .context("Failed to read corpus")?;
        let corpus = Corpus::new(text, config.index.terminator);
        let index = Indexer::new(config.index.clone())?.index(&corpus, None)?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        if self.dump {
            out.write_all(index.tree().dump().as_bytes())?;
        }
        for pattern in &self.patterns {
            writeln!(out, "{}", self.lookup(&index, pattern))?;
        }
        Ok(())
    }

    /// One result line: the pattern, a tab and the answer
    fn lookup(&self, index: &SuffixIndex, pattern: &str) -> String {
        if self.longest {
            let matched = index.longest_path(pattern).map_or(0, |point| point.length);
            format!("{pattern}\t{matched}")
        } else {
            let found = index.search(pattern).is_some();
            format!("{pattern}\t{found}")
        }
    }
}
