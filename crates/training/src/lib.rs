//! Bytebpe-training - BPE training infrastructure
//!
//! This crate provides the training pipeline for learning byte-level BPE
//! merge rules from a raw text corpus.
//!
//! # Features
//!
//! - Chunk-parallel pre-tokenization that never splits a
//!   special-token-delimited segment across a boundary
//! - Incremental pair-frequency maintenance across merge rounds
//! - Deterministic merge selection (count, then byte-lexicographic
//!   tie-break)
//! - Text and JSON persistence of the trained artifacts
//!
//! # Example
//!
//! ```rust,ignore
//! use bytebpe_training::{BpeTrainer, TrainingConfig};
//!
//! let trainer = BpeTrainer::new(TrainingConfig {
//!     vocab_size: 10_000,
//!     special_tokens: vec!["<|endoftext|>".to_string()],
//!     ..Default::default()
//! });
//! let model = trainer.train("path/to/corpus.txt")?;
//! model.save_text("out".as_ref())?;
//! ```

pub use bytebpe_core::{Result, TokenizerError};

// Training infrastructure
pub mod training;
pub use training::{
    find_chunk_boundaries, BpeTrainer, PairIndex, PreTokenizer, TrainedModel, TrainingConfig,
    WordTable, PRETOKEN_PATTERN,
};

// IO/Serialization
pub mod io;
pub use io::ModelSaver;
