//! Training infrastructure for byte-level BPE.
//!
//! This module provides the corpus state (word table), the pair
//! frequency index, chunking for parallel pre-tokenization, the regex
//! pre-tokenizer, and the merge loop itself.

pub mod chunking;
pub mod pair_index;
pub mod pre_tokenizer;
pub mod trainer;
pub mod word_table;

pub use chunking::find_chunk_boundaries;
pub use pair_index::PairIndex;
pub use pre_tokenizer::{PreTokenizer, PRETOKEN_PATTERN};
pub use trainer::{BpeTrainer, TrainedModel, TrainingConfig};
pub use word_table::WordTable;
