//! Index command implementation

use super::{open_file, open_sinks};
use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use trieseg_engine::{Corpus, IndexConfig, Indexer, OutputSinks, TreeKind};

/// Arguments for the index command
#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Corpus of terminator-delimited documents (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Unit list: last document number of each type, one per line
    #[arg(short, long, value_name = "FILE")]
    pub units: Option<PathBuf>,

    /// Type list: one type name per line
    #[arg(short, long, value_name = "FILE")]
    pub types: Option<PathBuf>,

    /// Report output files, repeatable (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Vec<PathBuf>,

    /// Also write the exchange trie as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub trie: Option<PathBuf>,

    /// Depth limit of the exchange trie
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Pretty-print the exchange trie
    #[arg(long)]
    pub pretty: bool,

    /// Document terminator
    #[arg(long, value_name = "CHAR")]
    pub terminator: Option<char>,

    /// Build a single-document tree
    #[arg(long)]
    pub simple: bool,
}

impl IndexArgs {
    /// Execute the index command
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let index_config = self.index_config(config);
        let indexer = Indexer::new(index_config.clone())?;
        log::info!("Indexing {}", describe(self.input.as_ref()));

        let corpus = self.load_corpus(index_config.terminator)?;
        let index = indexer.index(&corpus, None)?;
        let stats = index.stats();
        log::info!(
            "Indexed {} documents, {} symbols into {} nodes",
            stats.documents,
            stats.symbols,
            stats.nodes
        );

        let mut sinks = open_sinks(&self.output)?;
        let written = index.write_report(&mut sinks);
        let closed = sinks.close();
        written?;
        closed?;

        if let Some(path) = &self.trie {
            let file = File::create(path)
                .with_context(|| format!("Failed to create trie file: {}", path.display()))?;
            let mut sinks = OutputSinks::new().with(io::BufWriter::new(file));
            let written = index.write_trie(&mut sinks, index_config.max_trie_depth, self.pretty);
            let closed = sinks.close();
            written?;
            closed?;
            log::info!("Exchange trie written to {}", path.display());
        }
        Ok(())
    }

    /// Configuration file values with the flags applied on top
    fn index_config(&self, config: &CliConfig) -> IndexConfig {
        let mut index = config.index.clone();
        if let Some(terminator) = self.terminator {
            index.terminator = terminator;
        }
        if self.simple {
            index.kind = TreeKind::Simple;
        }
        if let Some(depth) = self.max_depth {
            index.max_trie_depth = depth;
        }
        index
    }

    fn load_corpus(&self, terminator: char) -> Result<Corpus> {
        let text: Box<dyn Read> = match &self.input {
            Some(path) => Box::new(open_file(path)?),
            None => Box::new(io::stdin()),
        };
        let mut units = self.units.as_deref().map(open_file).transpose()?;
        let mut types = self.types.as_deref().map(open_file).transpose()?;
        let corpus = Corpus::from_readers(
            text,
            units.as_mut().map(|file| file as &mut dyn Read),
            types.as_mut().map(|file| file as &mut dyn Read),
            terminator,
        )
        .context("Failed to load corpus")?;
        Ok(corpus)
    }
}

fn describe(path: Option<&PathBuf>) -> String {
    path.map_or_else(|| "stdin".to_string(), |p| p.display().to_string())
}
