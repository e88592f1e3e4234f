//! Pair-frequency index for BPE training.
//!
//! Tracks, for every ordered pair of adjacent token ids, the aggregate
//! occurrence count across the word table, plus the set of word rows
//! that may contain the pair. The counts are built once by a full scan
//! and then kept consistent through incremental deltas as merges rewrite
//! words, which avoids an O(corpus) recount every round.

use crate::training::word_table::WordTable;
use ahash::{AHashMap, AHashSet};
use bytebpe_core::Pair;

/// Pair -> count index with a row-occurrence side table.
pub struct PairIndex {
    /// Pair -> aggregate occurrence count (weighted by word counts)
    counts: AHashMap<Pair, u64>,
    /// Pair -> word rows that may contain it. Entries can go stale when a
    /// later merge destroys the pair inside a row; consumers re-check the
    /// row before acting on it.
    occurrences: AHashMap<Pair, AHashSet<usize>>,
}

impl PairIndex {
    /// Build the index by scanning every row's adjacent pairs once.
    pub fn from_word_table(table: &WordTable) -> Self {
        let mut counts: AHashMap<Pair, u64> = AHashMap::new();
        let mut occurrences: AHashMap<Pair, AHashSet<usize>> = AHashMap::new();

        for (idx, (word, count)) in table.iter().enumerate() {
            for window in word.windows(2) {
                let pair = (window[0], window[1]);
                *counts.entry(pair).or_insert(0) += count;
                occurrences.entry(pair).or_default().insert(idx);
            }
        }

        Self {
            counts,
            occurrences,
        }
    }

    /// The current counts.
    pub fn counts(&self) -> &AHashMap<Pair, u64> {
        &self.counts
    }

    /// Current count for a pair (0 when absent).
    pub fn get(&self, pair: Pair) -> u64 {
        self.counts.get(&pair).copied().unwrap_or(0)
    }

    /// Number of pairs with a live bucket.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no pair has a live bucket.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Apply a signed count delta to a pair, returning the new count.
    ///
    /// Counts saturate at zero, never go negative, and empty buckets are
    /// dropped so selection only ever sees live pairs.
    pub fn apply_delta(&mut self, pair: Pair, delta: i64) -> u64 {
        let current = self.get(pair);
        let new_count = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current + delta as u64
        };

        if new_count > 0 {
            self.counts.insert(pair, new_count);
        } else {
            self.counts.remove(&pair);
        }
        new_count
    }

    /// Record that `row` may contain `pair`.
    pub fn note_occurrence(&mut self, pair: Pair, row: usize) {
        self.occurrences.entry(pair).or_default().insert(row);
    }

    /// Take the candidate rows for a pair, leaving no entry behind.
    pub fn take_occurrences(&mut self, pair: Pair) -> AHashSet<usize> {
        self.occurrences.remove(&pair).unwrap_or_default()
    }

    /// Remove a consumed pair's bucket entirely.
    pub fn remove(&mut self, pair: Pair) {
        self.counts.remove(&pair);
        self.occurrences.remove(&pair);
    }

    /// Recompute pair counts from scratch off the word table.
    ///
    /// Test and debug aid: the incrementally maintained counts must equal
    /// this at every inter-round point.
    pub fn recount(table: &WordTable) -> AHashMap<Pair, u64> {
        let mut counts: AHashMap<Pair, u64> = AHashMap::new();
        for (word, count) in table.iter() {
            for window in word.windows(2) {
                *counts.entry((window[0], window[1])).or_insert(0) += count;
            }
        }
        counts
    }

    /// Check the incremental counts against a full recount.
    pub fn consistent_with(&self, table: &WordTable) -> bool {
        self.counts == Self::recount(table)
    }
}
