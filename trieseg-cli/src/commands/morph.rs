//! Morph command implementation

use super::{open_file, open_input, open_sinks};
use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::io::Read;
use std::path::PathBuf;
use trieseg_engine::{Corpus, MorphologyModule};

/// Arguments for the morph command
#[derive(Debug, Args)]
pub struct MorphArgs {
    /// Plain documents (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Reversed documents; derived from the plain input when absent
    #[arg(short, long, value_name = "FILE")]
    pub reversed: Option<PathBuf>,

    /// Output files, repeatable (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Vec<PathBuf>,
}

impl MorphArgs {
    /// Execute the morph command
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let terminator = config.index.terminator;
        let plain = Corpus::from_readers(open_input(self.input.as_deref())?, None, None, terminator)
            .context("Failed to read plain documents")?;
        let reversed = match &self.reversed {
            Some(path) => {
                let mut text = String::new();
                open_file(path)?
                    .read_to_string(&mut text)
                    .with_context(|| format!("Failed to read file: {}", path.display()))?;
                Some(Corpus::new(text, terminator))
            }
            None => None,
        };

        let module = MorphologyModule::new(&config.index);
        let mut sinks = open_sinks(&self.output)?;
        let count = module.write(&plain, reversed.as_ref(), &mut sinks, None)?;
        log::info!("Wrote {count} branching strings");
        Ok(())
    }
}
