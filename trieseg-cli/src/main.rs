//! trieseg command-line entry point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use trieseg_cli::commands::Commands;
use trieseg_cli::config::CliConfig;

/// Suffix-tree indexing, trie-driven segmentation and morpheme discovery
#[derive(Debug, Parser)]
#[command(name = "trieseg", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML with [segmenter] and [index] sections)
    #[arg(short, long, value_name = "FILE", global = true, env = "TRIESEG_CONFIG")]
    config: Option<PathBuf>,

    /// Suppress log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

impl Cli {
    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
                .init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    log::debug!("Arguments: {cli:?}");

    let config = CliConfig::load(cli.config.as_deref())?;
    cli.command.execute(&config)
}
