//! Boundaries command implementation.
//!
//! Prints the chunk boundaries the trainer would use for a corpus,
//! which is handy for sizing parallel runs.

use anyhow::{Context, Result as AnyhowResult};
use bytebpe_training::find_chunk_boundaries;
use clap::Parser;
use std::fs::File;

/// Boundaries command arguments.
#[derive(Parser)]
pub struct BoundariesCommand {
    /// Path to the corpus file
    #[arg(short, long)]
    pub input: String,

    /// Special token whose occurrences anchor the boundaries
    #[arg(short, long, default_value = "<|endoftext|>")]
    pub special_token: String,

    /// Desired chunk count
    #[arg(short, long, default_value_t = 8)]
    pub num_chunks: usize,
}

pub fn run(cmd: BoundariesCommand) -> AnyhowResult<()> {
    let mut file =
        File::open(&cmd.input).with_context(|| format!("failed to open {}", cmd.input))?;

    let boundaries =
        find_chunk_boundaries(&mut file, cmd.num_chunks, cmd.special_token.as_bytes())
            .with_context(|| format!("failed to scan {}", cmd.input))?;

    println!(
        "{} boundaries ({} chunks):",
        boundaries.len(),
        boundaries.len().saturating_sub(1)
    );
    for window in boundaries.windows(2) {
        println!("  {:>12} .. {:>12}  ({} bytes)", window[0], window[1], window[1] - window[0]);
    }

    Ok(())
}
