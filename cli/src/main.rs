//! Bytebpe CLI - Command-line interface for the BPE trainer.
//!
//! This is the main entry point for the `bytebpe` command-line tool.

mod commands;

use clap::{Parser, Subcommand};
use commands::{BoundariesCommand, TrainCommand};

#[derive(Parser)]
#[command(name = "bytebpe")]
#[command(about = "A byte-level BPE vocabulary trainer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new vocabulary from a text corpus
    Train(TrainCommand),
    /// Print the chunk boundaries computed for a corpus
    Boundaries(BoundariesCommand),
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(cmd) => commands::train::run(cmd)?,
        Commands::Boundaries(cmd) => commands::boundaries::run(cmd)?,
    }

    Ok(())
}
