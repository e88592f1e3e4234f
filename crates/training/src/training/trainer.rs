//! BPE trainer implementation.
//!
//! This module implements the training loop: build the word table from
//! the (optionally chunk-parallel) pre-tokenization pass, derive the
//! pair index once, then repeatedly select the most frequent pair,
//! rewrite the words containing it, and fold the resulting count deltas
//! back into the index. The loop itself is strictly sequential; each
//! round depends on the previous round's updated state.

use crate::io::ModelSaver;
use crate::training::chunking::find_chunk_boundaries;
use crate::training::pair_index::PairIndex;
use crate::training::pre_tokenizer::PreTokenizer;
use crate::training::word_table::WordTable;
use ahash::{AHashMap, AHashSet};
use bytebpe_core::{
    MergeCandidate, MergeList, Pair, PairPriorityQueue, Result, TokenizerError, Vocabulary,
    BYTE_VOCAB_SIZE,
};
use rayon::prelude::*;
use std::io::Cursor;
use std::path::Path;

/// Configuration for BPE training.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Target vocabulary size (base bytes + specials + merges)
    pub vocab_size: usize,
    /// Special tokens, reserved at ids 256.. in this order
    pub special_tokens: Vec<String>,
    /// Desired chunk count for parallel pre-tokenization
    pub num_chunks: usize,
    /// Whether to pre-tokenize chunks in parallel
    pub parallel: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vocab_size: 30_000,
            special_tokens: Vec::new(),
            num_chunks: 8,
            parallel: true,
        }
    }
}

/// The trained artifacts: id -> bytes vocabulary and the ordered merges.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    /// Token id -> byte string mapping
    pub vocab: Vocabulary,
    /// Merges in chronological (= rank) order
    pub merges: MergeList,
}

impl TrainedModel {
    /// Save as `vocab.txt` + `merges.txt` (hex text format).
    pub fn save_text(&self, dir: &Path) -> Result<()> {
        ModelSaver::new(&self.vocab, &self.merges).save_text(dir)
    }

    /// Save as a single `tokenizer.json`.
    pub fn save_json(&self, dir: &Path) -> Result<()> {
        ModelSaver::new(&self.vocab, &self.merges).save_json(dir)
    }
}

/// BPE trainer.
///
/// Owns no corpus state itself; every `train` call builds a fresh word
/// table and pair index and discards them when the loop ends.
pub struct BpeTrainer {
    /// Configuration
    config: TrainingConfig,
}

impl BpeTrainer {
    /// Create a new BPE trainer with the given configuration.
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Create a new BPE trainer with default configuration.
    pub fn with_vocab_size(vocab_size: usize) -> Self {
        Self::new(TrainingConfig {
            vocab_size,
            ..Default::default()
        })
    }

    /// Train on the corpus file at `path`.
    ///
    /// The file is read once; undecodable byte sequences are substituted
    /// rather than treated as fatal. An unreadable path is fatal and no
    /// partial result is returned.
    pub fn train(&self, path: impl AsRef<Path>) -> Result<TrainedModel> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| TokenizerError::Io {
            path: path.to_path_buf(),
            err,
        })?;
        log::info!("Read {} corpus bytes from {}", bytes.len(), path.display());

        let pre_tokenizer = PreTokenizer::new(&self.config.special_tokens)?;
        let pretoken_counts = self.count_corpus(&bytes, &pre_tokenizer, path)?;
        self.train_counts(pretoken_counts)
    }

    /// Train on in-memory text (no chunking).
    pub fn train_text(&self, text: &str) -> Result<TrainedModel> {
        let pre_tokenizer = PreTokenizer::new(&self.config.special_tokens)?;
        self.train_counts(pre_tokenizer.count_pretokens(text)?)
    }

    /// Pre-tokenize the corpus, chunk-parallel when possible.
    ///
    /// Chunk boundaries are anchored to the first special token; without
    /// any special token there is no safe split point, so the whole
    /// corpus is processed as one chunk.
    fn count_corpus(
        &self,
        bytes: &[u8],
        pre_tokenizer: &PreTokenizer,
        path: &Path,
    ) -> Result<AHashMap<Vec<u8>, u64>> {
        let chunked = self.config.parallel
            && self.config.num_chunks > 1
            && !self.config.special_tokens.is_empty();

        if !chunked {
            return pre_tokenizer.count_pretokens(&String::from_utf8_lossy(bytes));
        }

        let split_token = self.config.special_tokens[0].as_bytes();
        let boundaries =
            find_chunk_boundaries(&mut Cursor::new(bytes), self.config.num_chunks, split_token)
                .map_err(|err| TokenizerError::Io {
                    path: path.to_path_buf(),
                    err,
                })?;
        log::debug!(
            "Pre-tokenizing {} chunks in parallel",
            boundaries.len().saturating_sub(1)
        );

        let ranges: Vec<(usize, usize)> = boundaries
            .windows(2)
            .map(|w| (w[0] as usize, w[1] as usize))
            .collect();

        ranges
            .par_iter()
            .map(|&(start, end)| {
                pre_tokenizer.count_pretokens(&String::from_utf8_lossy(&bytes[start..end]))
            })
            .try_reduce(AHashMap::new, |mut acc, counts| {
                for (pretoken, count) in counts {
                    *acc.entry(pretoken).or_insert(0) += count;
                }
                Ok(acc)
            })
    }

    /// Run the merge loop over pre-aggregated pre-token counts.
    fn train_counts(&self, pretoken_counts: AHashMap<Vec<u8>, u64>) -> Result<TrainedModel> {
        let mut vocab = Vocabulary::base(&self.config.special_tokens);
        let mut merges = MergeList::new();

        let reserved = BYTE_VOCAB_SIZE + self.config.special_tokens.len();
        let num_merges = self.config.vocab_size.saturating_sub(reserved);
        if num_merges == 0 {
            log::info!("Target vocab size covered by reserved ids; no merges to run");
            return Ok(TrainedModel { vocab, merges });
        }

        let mut table = WordTable::from_pretoken_counts(pretoken_counts);
        log::info!(
            "Starting BPE training: {} merges to compute over {} distinct words",
            num_merges,
            table.len()
        );

        let mut pair_index = PairIndex::from_word_table(&table);
        debug_assert!(pair_index.consistent_with(&table));

        let mut queue = PairPriorityQueue::with_capacity(pair_index.len());
        for (&pair, &count) in pair_index.counts() {
            queue.push(candidate(&vocab, pair, count));
        }

        let mut merges_done = 0usize;
        let mut last_log_percent = 0usize;

        while merges_done < num_merges {
            let Some(winner) = queue.pop() else {
                // No pair with a nonzero count remains.
                break;
            };
            let winner_pair = winner.pair;

            let new_token = [winner.left.as_slice(), winner.right.as_slice()].concat();
            let new_id = vocab.add_token(new_token);

            // Rewrite every word that may contain the winner, folding the
            // per-occurrence neighbor deltas (scaled by word count) into
            // one aggregate per pair.
            let rows = pair_index.take_occurrences(winner_pair);
            let mut aggregated: AHashMap<Pair, i64> = AHashMap::new();
            let mut created: AHashMap<Pair, AHashSet<usize>> = AHashMap::new();
            for row in rows {
                let weight = table.count(row) as i64;
                table.merge_pair(row, winner_pair, new_id, |pair, delta| {
                    // The winner's bucket is removed wholesale below.
                    if pair == winner_pair {
                        return;
                    }
                    *aggregated.entry(pair).or_insert(0) += delta * weight;
                    if delta > 0 {
                        created.entry(pair).or_default().insert(row);
                    }
                });
            }

            for (pair, delta) in aggregated {
                if delta == 0 {
                    continue;
                }
                let new_count = pair_index.apply_delta(pair, delta);
                if new_count > 0 {
                    queue.push(candidate(&vocab, pair, new_count));
                } else {
                    queue.retire(pair);
                }
            }
            for (pair, pair_rows) in created {
                for row in pair_rows {
                    pair_index.note_occurrence(pair, row);
                }
            }
            pair_index.remove(winner_pair);

            merges.push(winner.left, winner.right);
            merges_done += 1;

            let percent = merges_done * 100 / num_merges;
            if percent > last_log_percent {
                log::info!(
                    "Progress: {}% ({}/{} merges)",
                    percent,
                    merges_done,
                    num_merges
                );
                last_log_percent = percent;
            }
        }

        log::info!(
            "Finished training: {} merges completed, vocab size {}",
            merges_done,
            vocab.len()
        );
        Ok(TrainedModel { vocab, merges })
    }
}

/// Resolve a pair's byte contents for deterministic queue ordering.
fn candidate(vocab: &Vocabulary, pair: Pair, count: u64) -> MergeCandidate {
    let left = vocab.get_token(pair.0).unwrap_or_default().to_vec();
    let right = vocab.get_token(pair.1).unwrap_or_default().to_vec();
    MergeCandidate::new(pair, left, right, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn merge_strings(model: &TrainedModel) -> Vec<(String, String)> {
        model
            .merges
            .iter()
            .map(|(l, r)| {
                (
                    String::from_utf8_lossy(l).into_owned(),
                    String::from_utf8_lossy(r).into_owned(),
                )
            })
            .collect()
    }

    #[test]
    fn test_golden_merge_sequence() {
        let trainer = BpeTrainer::with_vocab_size(259);
        let model = trainer.train_text("aaabdaaabac").unwrap();

        assert_eq!(
            merge_strings(&model),
            vec![
                ("a".to_string(), "a".to_string()),
                ("aa".to_string(), "a".to_string()),
                ("aaa".to_string(), "b".to_string()),
            ]
        );
        assert_eq!(model.vocab.get_token(256), Some(&b"aa"[..]));
        assert_eq!(model.vocab.get_token(257), Some(&b"aaa"[..]));
        assert_eq!(model.vocab.get_token(258), Some(&b"aaab"[..]));
        assert_eq!(model.vocab.len(), 259);
    }

    #[test]
    fn test_tie_break_picks_lexicographically_greatest() {
        // All pairs occur exactly once: (a,b), (' ',c), (c,d).
        let trainer = BpeTrainer::with_vocab_size(257);
        let model = trainer.train_text("ab cd").unwrap();

        assert_eq!(
            merge_strings(&model),
            vec![("c".to_string(), "d".to_string())]
        );
    }

    #[test]
    fn test_vocab_size_at_or_below_reserved_yields_zero_merges() {
        let trainer = BpeTrainer::with_vocab_size(256);
        let model = trainer.train_text("hello hello hello").unwrap();
        assert!(model.merges.is_empty());
        assert_eq!(model.vocab.len(), 256);

        let trainer = BpeTrainer::new(TrainingConfig {
            vocab_size: 257,
            special_tokens: vec!["<|endoftext|>".to_string()],
            ..Default::default()
        });
        let model = trainer.train_text("hello hello hello").unwrap();
        assert!(model.merges.is_empty());
        assert_eq!(model.vocab.len(), 257);
    }

    #[test]
    fn test_single_byte_pretokens_yield_zero_merges() {
        let trainer = BpeTrainer::with_vocab_size(400);
        let model = trainer.train_text("a\nb\nc\nd").unwrap();

        assert!(model.merges.is_empty());
        assert_eq!(model.vocab.len(), 256);
    }

    #[test]
    fn test_exhaustion_terminates_early() {
        // "abab" collapses to one symbol after two merges; the requested
        // vocab size is never reached.
        let trainer = BpeTrainer::with_vocab_size(1000);
        let model = trainer.train_text("abab").unwrap();

        assert_eq!(model.merges.len(), 2);
        assert_eq!(model.vocab.len(), 258);
        assert_eq!(model.vocab.get_token(257), Some(&b"abab"[..]));
    }

    #[test]
    fn test_special_tokens_never_merge() {
        let trainer = BpeTrainer::new(TrainingConfig {
            vocab_size: 258,
            special_tokens: vec!["<|endoftext|>".to_string()],
            ..Default::default()
        });
        let model = trainer.train_text("ab<|endoftext|>ab").unwrap();

        assert_eq!(model.vocab.get_token(256), Some(&b"<|endoftext|>"[..]));
        assert_eq!(
            merge_strings(&model),
            vec![("a".to_string(), "b".to_string())]
        );
        assert_eq!(model.vocab.get_token(257), Some(&b"ab"[..]));
    }

    #[test]
    fn test_deterministic_across_runs() {
        let text = "low lower lowest newer newest wide widest low low";
        let trainer = BpeTrainer::with_vocab_size(280);

        let first = trainer.train_text(text).unwrap();
        let second = trainer.train_text(text).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_merge_ids_are_gapless_and_ordered() {
        let trainer = BpeTrainer::with_vocab_size(270);
        let model = trainer.train_text("the theme then there the theme").unwrap();

        for (i, (left, right)) in model.merges.iter().enumerate() {
            let id = 256 + i as u32;
            let expected: Vec<u8> = [left.as_slice(), right.as_slice()].concat();
            assert_eq!(model.vocab.get_token(id), Some(expected.as_slice()));
        }
        assert_eq!(model.vocab.len(), 256 + model.merges.len());
    }

    #[test]
    fn test_unreadable_path_is_fatal() {
        let trainer = BpeTrainer::with_vocab_size(300);
        let err = trainer.train("/no/such/corpus.txt").unwrap_err();
        assert!(matches!(err, TokenizerError::Io { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_substituted_not_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello hello \xff\xfe hello").unwrap();

        let trainer = BpeTrainer::with_vocab_size(260);
        let model = trainer.train(file.path()).unwrap();
        assert!(!model.merges.is_empty());
    }

    #[test]
    fn test_chunked_training_matches_sequential() {
        let mut docs = String::new();
        for i in 0..50 {
            docs.push_str("the quick brown fox jumps over the lazy dog ");
            docs.push_str(&format!("document number {i} "));
            docs.push_str("<|endoftext|>");
        }
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(docs.as_bytes()).unwrap();

        let chunked = BpeTrainer::new(TrainingConfig {
            vocab_size: 300,
            special_tokens: vec!["<|endoftext|>".to_string()],
            num_chunks: 4,
            parallel: true,
        })
        .train(file.path())
        .unwrap();

        let sequential = BpeTrainer::new(TrainingConfig {
            vocab_size: 300,
            special_tokens: vec!["<|endoftext|>".to_string()],
            num_chunks: 1,
            parallel: false,
        })
        .train(file.path())
        .unwrap();

        assert_eq!(chunked, sequential);
    }
}
