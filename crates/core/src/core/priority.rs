//! Priority queue for BPE merge candidates.
//!
//! This module provides the selection structure for the merge loop: a
//! max-heap ordered by count, with ties broken by the byte contents of
//! the candidate pair so that selection is deterministic regardless of
//! hash-map iteration order.

use crate::core::merges::Pair;
use ahash::AHashMap;
use dary_heap::OctonaryHeap;

/// A merge candidate during BPE training.
///
/// Carries the byte contents of both sides of the pair so that ordering
/// can compare them without a vocabulary lookup inside the heap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCandidate {
    /// The pair of token IDs to merge
    pub pair: Pair,
    /// Byte contents of the left symbol
    pub left: Vec<u8>,
    /// Byte contents of the right symbol
    pub right: Vec<u8>,
    /// The frequency/count of this pair
    pub count: u64,
}

impl MergeCandidate {
    /// Create a new merge candidate.
    pub fn new(pair: Pair, left: Vec<u8>, right: Vec<u8>, count: u64) -> Self {
        Self {
            pair,
            left,
            right,
            count,
        }
    }
}

// Max-heap order: highest count first, then lexicographically greatest
// (left, right) byte tuple. Byte-slice Ord compares by byte value with
// shorter-is-less on a common prefix, which is exactly the required
// tie-break. Distinct id pairs can carry identical bytes (duplicate
// merge-created symbols), so the ids break the remaining tie and the
// order stays total.
impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| self.left.cmp(&other.left))
            .then_with(|| self.right.cmp(&other.right))
            .then_with(|| self.pair.cmp(&other.pair))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue for BPE merge selection.
///
/// Uses an 8-ary heap for better cache locality than a binary heap.
/// Entries are never removed when counts change; instead the current
/// count per pair is tracked on the side and stale heap entries are
/// skipped on pop.
pub struct PairPriorityQueue {
    /// The heap storing merge candidates
    heap: OctonaryHeap<MergeCandidate>,
    /// Track current counts to detect stale entries
    current_counts: AHashMap<Pair, u64>,
}

impl PairPriorityQueue {
    /// Create a new priority queue with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: OctonaryHeap::with_capacity(capacity),
            current_counts: AHashMap::with_capacity(capacity),
        }
    }

    /// Create a new empty priority queue.
    pub fn new() -> Self {
        Self {
            heap: OctonaryHeap::new(),
            current_counts: AHashMap::new(),
        }
    }

    /// Push a merge candidate onto the queue.
    ///
    /// Any earlier entry for the same pair becomes stale. Zero-count
    /// candidates are recorded but never enqueued, so they can never be
    /// selected.
    pub fn push(&mut self, candidate: MergeCandidate) {
        self.current_counts.insert(candidate.pair, candidate.count);
        if candidate.count > 0 {
            self.heap.push(candidate);
        }
    }

    /// Drop a pair from selection entirely (e.g. its bucket was consumed).
    pub fn retire(&mut self, pair: Pair) {
        self.current_counts.remove(&pair);
    }

    /// Pop the highest priority merge candidate.
    ///
    /// Returns None if the queue is empty or only contains stale entries.
    pub fn pop(&mut self) -> Option<MergeCandidate> {
        while let Some(candidate) = self.heap.pop() {
            match self.current_counts.get(&candidate.pair) {
                // Live entry: count matches and is nonzero.
                Some(&current) if current == candidate.count && current > 0 => {
                    self.current_counts.remove(&candidate.pair);
                    return Some(candidate);
                }
                // Stale entry (count changed or pair retired), keep going.
                _ => {}
            }
        }
        None
    }

    /// Get the number of (potentially stale) entries in the queue.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Get the current count tracked for a pair.
    pub fn get_count(&self, pair: Pair) -> Option<u64> {
        self.current_counts.get(&pair).copied()
    }
}

impl Default for PairPriorityQueue {
    fn default() -> Self {
        Self::new()
    }
}
