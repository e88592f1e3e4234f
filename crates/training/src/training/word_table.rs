//! Corpus word-frequency state for BPE training.
//!
//! The table maps each distinct pre-token pattern (a sequence of token
//! ids) to its corpus-wide occurrence count. It is built once from the
//! pre-tokenizer's output and mutated in place by every merge round.

use ahash::AHashMap;
use bytebpe_core::Pair;

/// Word -> count state, stored as parallel rows.
///
/// Deduplication happens at build time from the pre-token count map.
/// Row indices stay stable across merges, which lets the pair index
/// reference words cheaply.
pub struct WordTable {
    /// Word rows: sequences of token ids
    words: Vec<Vec<u32>>,
    /// Occurrence count per row
    counts: Vec<u64>,
}

impl WordTable {
    /// Build the table from aggregated pre-token byte sequences.
    ///
    /// Each byte becomes its base token id. Pre-tokens of length 1 carry
    /// no adjacent pair and are expected to have been dropped upstream;
    /// they are skipped here as well.
    pub fn from_pretoken_counts(pretoken_counts: AHashMap<Vec<u8>, u64>) -> Self {
        let mut words = Vec::with_capacity(pretoken_counts.len());
        let mut counts = Vec::with_capacity(pretoken_counts.len());

        for (bytes, count) in pretoken_counts {
            if bytes.len() < 2 {
                continue;
            }
            words.push(bytes.iter().map(|&b| b as u32).collect());
            counts.push(count);
        }

        Self { words, counts }
    }

    /// Number of distinct word rows.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the table holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The token-id sequence of one row.
    pub fn word(&self, idx: usize) -> &[u32] {
        &self.words[idx]
    }

    /// The occurrence count of one row.
    pub fn count(&self, idx: usize) -> u64 {
        self.counts[idx]
    }

    /// Iterate (word, count) rows.
    pub fn iter(&self) -> impl Iterator<Item = (&[u32], u64)> {
        self.words
            .iter()
            .map(|w| w.as_slice())
            .zip(self.counts.iter().copied())
    }

    /// Total number of pre-token occurrences across the corpus.
    pub fn total_occurrences(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Rewrite one row, replacing every non-overlapping left-to-right
    /// occurrence of `pair` with `new_id`.
    ///
    /// For each replaced occurrence, `on_delta` receives the unit pair
    /// count changes around the match site: the destroyed neighbor pairs
    /// with -1 and the created ones with +1. The left neighbor is taken
    /// from the already-rewritten output, so a symbol produced earlier in
    /// the same row participates in the new pairs. Deltas naming `pair`
    /// itself are also emitted; callers that drop the consumed pair's
    /// bucket wholesale should ignore them.
    ///
    /// Returns false (and emits nothing) if the row does not contain the
    /// pair, which can happen when an occurrence index has gone stale.
    pub fn merge_pair<F>(&mut self, idx: usize, pair: Pair, new_id: u32, mut on_delta: F) -> bool
    where
        F: FnMut(Pair, i64),
    {
        let word = &self.words[idx];
        if !word.windows(2).any(|w| (w[0], w[1]) == pair) {
            return false;
        }

        let old = std::mem::take(&mut self.words[idx]);
        let mut new = Vec::with_capacity(old.len());
        let mut i = 0;

        while i < old.len() {
            if i + 1 < old.len() && (old[i], old[i + 1]) == pair {
                if let Some(&prev) = new.last() {
                    on_delta((prev, old[i]), -1);
                    on_delta((prev, new_id), 1);
                }
                if i + 2 < old.len() {
                    on_delta((old[i + 1], old[i + 2]), -1);
                    on_delta((new_id, old[i + 2]), 1);
                }
                // Consume both symbols; the scan resumes past the match so
                // occurrences never overlap.
                new.push(new_id);
                i += 2;
            } else {
                new.push(old[i]);
                i += 1;
            }
        }

        self.words[idx] = new;
        true
    }
}
