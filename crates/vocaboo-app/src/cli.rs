use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "vocaboo", version, about = "Multiple-choice vocabulary trainer")]
pub struct Cli {
    /// Directory holding the vocabulary, progress and config.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Fixed shuffle seed, for reproducible sessions
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactive quiz over the stored vocabulary
    Train,
    /// Translation suggestions for typed words
    Lookup {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Add a word pair unless an equal pair is already stored
    Add { source: String, target: String },
    /// Print overall progress and per-word counters
    Stats,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Train)
    }
}
