//! CLI command implementations

use crate::config::CliConfig;
use crate::error::CliError;
use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use trieseg_engine::OutputSinks;

pub mod index;
pub mod morph;
pub mod search;
pub mod segment;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a suffix tree over a corpus and write its report
    Index(index::IndexArgs),

    /// Segment text against an exchange trie
    Segment(segment::SegmentArgs),

    /// Look up patterns in the suffix tree of a corpus
    Search(search::SearchArgs),

    /// Extract branching strings from plain and reversed documents
    Morph(morph::MorphArgs),
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        match self {
            Commands::Index(args) => args.execute(config),
            Commands::Segment(args) => args.execute(config),
            Commands::Search(args) => args.execute(config),
            Commands::Morph(args) => args.execute(config),
        }
    }
}

/// Open `path` for reading
pub fn open_file(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()).into());
    }
    File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))
}

/// Open `path`, or standard input when it is absent or `-`
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn Read + Send>> {
    match path {
        Some(path) if path != Path::new("-") => Ok(Box::new(open_file(path)?)),
        _ => Ok(Box::new(io::stdin())),
    }
}

/// One sink per output file, or standard output when none is given
pub fn open_sinks(paths: &[PathBuf]) -> Result<OutputSinks> {
    let mut sinks = OutputSinks::new();
    if paths.is_empty() {
        sinks.add(io::stdout());
        return Ok(sinks);
    }
    for path in paths {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        sinks.add(io::BufWriter::new(file));
    }
    log::debug!("Writing to {} output file(s)", paths.len());
    Ok(sinks)
}
