//! Regex pre-tokenization for BPE training.
//!
//! Carves decoded corpus text into pre-token byte sequences: the text is
//! first split on special-token substrings (they never enter a word and
//! never participate in merges), then each remaining segment is matched
//! against a GPT-2 style pattern. Matches of exactly one byte are
//! dropped, since a single symbol carries no adjacent pair.

use ahash::AHashMap;
use bytebpe_core::{Result, TokenizerError};
use fancy_regex::Regex;

/// GPT-2 style pre-token pattern: contractions, letter runs, digit runs,
/// punctuation clusters, and whitespace. The `(?!\S)` lookahead keeps
/// trailing whitespace attached to the following word's leading space.
pub const PRETOKEN_PATTERN: &str =
    r"'(?:[sdmt]|ll|ve|re)| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+";

/// Pre-tokenizer: text -> aggregated pre-token byte-sequence counts.
#[derive(Debug)]
pub struct PreTokenizer {
    /// The pre-token pattern
    pattern: Regex,
    /// Alternation of escaped special tokens, when any exist
    special_splitter: Option<Regex>,
}

impl PreTokenizer {
    /// Compile the pre-token pattern and the special-token splitter.
    pub fn new(special_tokens: &[String]) -> Result<Self> {
        let pattern = Regex::new(PRETOKEN_PATTERN)
            .map_err(|e| TokenizerError::Regex(e.to_string()))?;

        if special_tokens.iter().any(|t| t.is_empty()) {
            return Err(TokenizerError::InvalidConfig(
                "special tokens must be non-empty".to_string(),
            ));
        }

        let special_splitter = if special_tokens.is_empty() {
            None
        } else {
            let alternation = special_tokens
                .iter()
                .map(|t| fancy_regex::escape(t).into_owned())
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation).map_err(|e| TokenizerError::Regex(e.to_string()))?)
        };

        Ok(Self {
            pattern,
            special_splitter,
        })
    }

    /// Count pre-token occurrences in a region of text.
    ///
    /// Results from independently processed regions combine by plain
    /// summation, so chunked runs reproduce the whole-text counts.
    pub fn count_pretokens(&self, text: &str) -> Result<AHashMap<Vec<u8>, u64>> {
        let mut counts = AHashMap::new();

        match &self.special_splitter {
            Some(splitter) => {
                let mut last = 0;
                for found in splitter.find_iter(text) {
                    let m = found.map_err(|e| TokenizerError::Regex(e.to_string()))?;
                    self.count_segment(&text[last..m.start()], &mut counts)?;
                    last = m.end();
                }
                self.count_segment(&text[last..], &mut counts)?;
            }
            None => self.count_segment(text, &mut counts)?,
        }

        Ok(counts)
    }

    fn count_segment(&self, segment: &str, counts: &mut AHashMap<Vec<u8>, u64>) -> Result<()> {
        for found in self.pattern.find_iter(segment) {
            let m = found.map_err(|e| TokenizerError::Regex(e.to_string()))?;
            let bytes = m.as_str().as_bytes();
            if bytes.len() != 1 {
                *counts.entry(bytes.to_vec()).or_insert(0) += 1;
            }
        }
        Ok(())
    }
}
