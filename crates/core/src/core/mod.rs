//! Core BPE data structures.
//!
//! This module contains the fundamental data structures for byte-level
//! BPE training: vocabulary, merge list, and the selection queue.

pub mod merges;
pub mod priority;
pub mod vocab;

pub use merges::{Merge, MergeList, Pair};
pub use priority::{MergeCandidate, PairPriorityQueue};
pub use vocab::{Vocab, VocabR, Vocabulary, BYTE_VOCAB_SIZE};
