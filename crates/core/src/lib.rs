//! Bytebpe-core - Core BPE data structures
//!
//! This crate provides the fundamental data structures for byte-level
//! byte-pair encoding training, independent of corpus handling.
//!
//! # Features
//!
//! - Byte-level vocabulary storage using `AHashMap`
//! - Ordered merge list with rank-preserving bookkeeping
//! - Deterministic merge selection queue (count, then byte-lexicographic
//!   tie-break) built on an 8-ary heap
//! - Error handling with detailed diagnostics
//!
//! # Example
//!
//! ```rust
//! use bytebpe_core::Vocabulary;
//!
//! // 256 base bytes plus one reserved special token at id 256.
//! let vocab = Vocabulary::base(&["<|endoftext|>".to_string()]);
//! assert_eq!(vocab.len(), 257);
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

// Core BPE data structure modules
pub mod core;
pub use core::{
    Merge, MergeCandidate, MergeList, Pair, PairPriorityQueue, Vocab, VocabR, Vocabulary,
    BYTE_VOCAB_SIZE,
};
