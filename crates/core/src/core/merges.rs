//! Merge bookkeeping for BPE training.
//!
//! Merges are recorded as pairs of token ids during the loop, and as the
//! byte contents of both sides in the ordered output list. The list order
//! equals merge rank; replaying the merges against new text must follow
//! this exact sequence.

/// A pair of adjacent token IDs observed within some word.
pub type Pair = (u32, u32);

/// One recorded merge: the byte contents of the left and right symbol.
pub type Merge = (Vec<u8>, Vec<u8>);

/// Ordered list of merges, one entry per completed merge round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeList {
    entries: Vec<Merge>,
}

impl MergeList {
    /// Create a new empty merge list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new merge list with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append a completed merge. Entries are never reordered or removed.
    pub fn push(&mut self, left: Vec<u8>, right: Vec<u8>) {
        self.entries.push((left, right));
    }

    /// Number of recorded merges.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no merges were recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate merges in chronological (= rank) order.
    pub fn iter(&self) -> impl Iterator<Item = &Merge> {
        self.entries.iter()
    }

    /// The recorded merges as a slice, in chronological order.
    pub fn as_slice(&self) -> &[Merge] {
        &self.entries
    }
}

impl From<Vec<Merge>> for MergeList {
    fn from(entries: Vec<Merge>) -> Self {
        Self { entries }
    }
}
