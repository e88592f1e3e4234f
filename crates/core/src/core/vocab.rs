//! Vocabulary storage and lookup.
//!
//! This module provides byte-level vocabulary storage using AHashMap for
//! fast lookups. Token ids 0-255 are reserved for the raw byte values,
//! the next block for special tokens, and everything above that is
//! assigned to merge-created symbols in merge order.

use ahash::AHashMap;

/// Number of single-byte base tokens.
pub const BYTE_VOCAB_SIZE: usize = 256;

/// Forward mapping: token bytes -> ID
pub type Vocab = AHashMap<Vec<u8>, u32>;

/// Reverse mapping: ID -> token bytes
pub type VocabR = AHashMap<u32, Vec<u8>>;

/// Vocabulary with forward and reverse mappings.
///
/// Ids are assigned exactly once, strictly increasing, never removed.
/// Two distinct merges can concatenate to the same byte string; the
/// reverse mapping keeps both ids, the forward mapping keeps the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    /// Forward mapping: token bytes -> ID
    pub vocab: Vocab,
    /// Reverse mapping: ID -> token bytes
    pub vocab_r: VocabR,
    /// Number of reserved special tokens (ids 256 .. 256 + special_count)
    special_count: u32,
}

impl Vocabulary {
    /// Create a vocabulary seeded with the 256 base bytes plus the given
    /// special tokens, reserved at ids 256.. in input order.
    pub fn base(special_tokens: &[String]) -> Self {
        let capacity = BYTE_VOCAB_SIZE + special_tokens.len();
        let mut vocab = Vocab::with_capacity(capacity);
        let mut vocab_r = VocabR::with_capacity(capacity);

        for b in 0..BYTE_VOCAB_SIZE {
            let token = vec![b as u8];
            vocab.insert(token.clone(), b as u32);
            vocab_r.insert(b as u32, token);
        }
        for (i, special) in special_tokens.iter().enumerate() {
            let id = (BYTE_VOCAB_SIZE + i) as u32;
            let token = special.as_bytes().to_vec();
            vocab.entry(token.clone()).or_insert(id);
            vocab_r.insert(id, token);
        }

        Self {
            vocab,
            vocab_r,
            special_count: special_tokens.len() as u32,
        }
    }

    /// Add a merge-created token, returning the id assigned to it.
    pub fn add_token(&mut self, token: Vec<u8>) -> u32 {
        let id = self.vocab_r.len() as u32;
        self.vocab_r.insert(id, token.clone());
        self.vocab.entry(token).or_insert(id);
        id
    }

    /// Get the ID for token bytes.
    #[inline]
    pub fn get_id(&self, token: &[u8]) -> Option<u32> {
        self.vocab.get(token).copied()
    }

    /// Get the token bytes for an ID.
    #[inline]
    pub fn get_token(&self, id: u32) -> Option<&[u8]> {
        self.vocab_r.get(&id).map(|t| t.as_slice())
    }

    /// Get the size of the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.vocab_r.len()
    }

    /// Check if the vocabulary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vocab_r.is_empty()
    }

    /// Number of reserved special tokens.
    #[inline]
    pub fn special_count(&self) -> u32 {
        self.special_count
    }

    /// Check if an ID belongs to the reserved special-token block.
    #[inline]
    pub fn is_special(&self, id: u32) -> bool {
        id >= BYTE_VOCAB_SIZE as u32 && id < BYTE_VOCAB_SIZE as u32 + self.special_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_bytes() {
        let vocab = Vocabulary::base(&[]);
        assert_eq!(vocab.len(), 256);
        assert_eq!(vocab.get_token(0), Some(&[0u8][..]));
        assert_eq!(vocab.get_token(255), Some(&[255u8][..]));
        assert_eq!(vocab.get_id(b"a"), Some(b'a' as u32));
        assert_eq!(vocab.special_count(), 0);
    }

    #[test]
    fn test_special_tokens_reserved_in_order() {
        let specials = vec!["<|endoftext|>".to_string(), "<|pad|>".to_string()];
        let vocab = Vocabulary::base(&specials);

        assert_eq!(vocab.len(), 258);
        assert_eq!(vocab.get_token(256), Some(&b"<|endoftext|>"[..]));
        assert_eq!(vocab.get_token(257), Some(&b"<|pad|>"[..]));
        assert!(vocab.is_special(256));
        assert!(vocab.is_special(257));
        assert!(!vocab.is_special(255));
        assert!(!vocab.is_special(258));
    }

    #[test]
    fn test_add_token_monotonic_ids() {
        let mut vocab = Vocabulary::base(&["<|endoftext|>".to_string()]);
        let id1 = vocab.add_token(b"aa".to_vec());
        let id2 = vocab.add_token(b"aaa".to_vec());

        assert_eq!(id1, 257);
        assert_eq!(id2, 258);
        assert_eq!(vocab.get_token(257), Some(&b"aa"[..]));
        assert_eq!(vocab.get_token(258), Some(&b"aaa"[..]));
    }

    #[test]
    fn test_duplicate_bytes_keep_both_ids() {
        let mut vocab = Vocabulary::base(&[]);
        let id1 = vocab.add_token(b"abc".to_vec());
        let id2 = vocab.add_token(b"abc".to_vec());

        assert_ne!(id1, id2);
        assert_eq!(vocab.get_token(id1), Some(&b"abc"[..]));
        assert_eq!(vocab.get_token(id2), Some(&b"abc"[..]));
        // Forward lookup resolves to the first assignment.
        assert_eq!(vocab.get_id(b"abc"), Some(id1));
    }
}
