//! Train command implementation.

use anyhow::Result as AnyhowResult;
use bytebpe_training::{BpeTrainer, TrainingConfig};
use clap::Parser;
use std::path::Path;
use std::time::Instant;

/// Train command arguments.
#[derive(Parser)]
pub struct TrainCommand {
    /// Path to the training corpus file
    #[arg(short, long)]
    pub input: String,

    /// Output directory for the trained model
    #[arg(short, long)]
    pub output: String,

    /// Target vocabulary size (base bytes + special tokens + merges)
    #[arg(short, long, default_value_t = 30_000)]
    pub vocab_size: usize,

    /// Special token, reserved in the given order (repeatable)
    #[arg(short, long = "special-token")]
    pub special_tokens: Vec<String>,

    /// Desired chunk count for parallel pre-tokenization
    #[arg(short, long, default_value_t = 8)]
    pub num_chunks: usize,

    /// Disable parallel pre-tokenization
    #[arg(long)]
    pub no_parallel: bool,

    /// Also write tokenizer.json alongside the text format
    #[arg(long)]
    pub json: bool,
}

pub fn run(cmd: TrainCommand) -> AnyhowResult<()> {
    println!("Training vocabulary...");
    println!("  Input: {}", cmd.input);
    println!("  Output: {}", cmd.output);
    println!("  Vocab size: {}", cmd.vocab_size);
    println!("  Special tokens: {:?}", cmd.special_tokens);
    println!();

    let trainer = BpeTrainer::new(TrainingConfig {
        vocab_size: cmd.vocab_size,
        special_tokens: cmd.special_tokens,
        num_chunks: cmd.num_chunks,
        parallel: !cmd.no_parallel,
    });

    let start = Instant::now();
    let model = trainer.train(&cmd.input)?;
    println!(
        "Training completed in {:.2}s: {} merges, final vocab size {}",
        start.elapsed().as_secs_f64(),
        model.merges.len(),
        model.vocab.len()
    );

    let output_path = Path::new(&cmd.output);
    model.save_text(output_path)?;
    if cmd.json {
        model.save_json(output_path)?;
    }
    println!("Model saved to {}", cmd.output);

    Ok(())
}
