//! Save functionality for trained models.
//!
//! Two formats: a plain-text pair of files (`vocab.txt` + `merges.txt`,
//! hex-encoded, line-oriented) and a single `tokenizer.json`.

use super::format::{bytes_to_hex, SerializedConfig, SerializedMerge, SerializedModel, SerializedToken};
use bytebpe_core::{MergeList, Result, TokenizerError, Vocabulary, BYTE_VOCAB_SIZE};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Model saver - handles persisting trained artifacts.
pub struct ModelSaver<'a> {
    /// Vocabulary reference
    vocab: &'a Vocabulary,
    /// Merge list reference
    merges: &'a MergeList,
}

impl<'a> ModelSaver<'a> {
    /// Create a new model saver.
    pub fn new(vocab: &'a Vocabulary, merges: &'a MergeList) -> Self {
        Self { vocab, merges }
    }

    /// Save in text format: `vocab.txt` and `merges.txt`.
    ///
    /// `vocab.txt` holds one `"{id} {hex bytes}"` line per entry, sorted
    /// by id ascending. `merges.txt` holds one `"{hex left} {hex right}"`
    /// line per merge, in chronological order.
    pub fn save_text(&self, dir: &Path) -> Result<()> {
        create_dir(dir)?;

        let vocab_path = dir.join("vocab.txt");
        let mut vocab_file = BufWriter::new(create_file(&vocab_path)?);
        for id in 0..self.vocab.len() as u32 {
            let token = self.vocab.get_token(id).unwrap_or_default();
            writeln!(vocab_file, "{} {}", id, bytes_to_hex(token))
                .map_err(|e| TokenizerError::Save(format!("Failed to write vocab.txt: {}", e)))?;
        }
        vocab_file
            .flush()
            .map_err(|e| TokenizerError::Save(format!("Failed to write vocab.txt: {}", e)))?;

        let merges_path = dir.join("merges.txt");
        let mut merges_file = BufWriter::new(create_file(&merges_path)?);
        for (left, right) in self.merges.iter() {
            writeln!(merges_file, "{} {}", bytes_to_hex(left), bytes_to_hex(right))
                .map_err(|e| TokenizerError::Save(format!("Failed to write merges.txt: {}", e)))?;
        }
        merges_file
            .flush()
            .map_err(|e| TokenizerError::Save(format!("Failed to write merges.txt: {}", e)))?;

        Ok(())
    }

    /// Save as a single `tokenizer.json` in the target directory.
    pub fn save_json(&self, dir: &Path) -> Result<()> {
        create_dir(dir)?;

        let file_path = dir.join("tokenizer.json");
        let writer = BufWriter::new(create_file(&file_path)?);
        serde_json::to_writer_pretty(writer, &self.serialize())?;

        Ok(())
    }

    /// Serialize the model to the JSON structure.
    fn serialize(&self) -> SerializedModel {
        let vocab: Vec<SerializedToken> = (0..self.vocab.len() as u32)
            .map(|id| SerializedToken {
                id,
                bytes: bytes_to_hex(self.vocab.get_token(id).unwrap_or_default()),
            })
            .collect();

        let merges: Vec<SerializedMerge> = self
            .merges
            .iter()
            .map(|(left, right)| SerializedMerge {
                left: bytes_to_hex(left),
                right: bytes_to_hex(right),
            })
            .collect();

        let special_tokens: Vec<String> = (0..self.vocab.special_count())
            .map(|i| {
                let id = BYTE_VOCAB_SIZE as u32 + i;
                String::from_utf8_lossy(self.vocab.get_token(id).unwrap_or_default()).into_owned()
            })
            .collect();

        SerializedModel {
            version: env!("CARGO_PKG_VERSION").to_string(),
            vocab,
            merges,
            special_tokens,
            config: SerializedConfig {
                vocab_size: self.vocab.len(),
            },
        }
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        TokenizerError::Save(format!("Failed to create directory {}: {}", dir.display(), e))
    })
}

fn create_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| {
        TokenizerError::Save(format!("Failed to create file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vocabulary, MergeList) {
        let mut vocab = Vocabulary::base(&["<|endoftext|>".to_string()]);
        vocab.add_token(b"aa".to_vec());
        let mut merges = MergeList::new();
        merges.push(b"a".to_vec(), b"a".to_vec());
        (vocab, merges)
    }

    #[test]
    fn test_text_format_lines() {
        let (vocab, merges) = sample();
        let dir = tempfile::tempdir().unwrap();
        ModelSaver::new(&vocab, &merges).save_text(dir.path()).unwrap();

        let vocab_text = std::fs::read_to_string(dir.path().join("vocab.txt")).unwrap();
        let lines: Vec<&str> = vocab_text.lines().collect();
        assert_eq!(lines.len(), 258);
        assert_eq!(lines[0], "0 00");
        assert_eq!(lines[97], "97 61");
        assert_eq!(lines[256], format!("256 {}", bytes_to_hex(b"<|endoftext|>")));
        assert_eq!(lines[257], "257 6161");

        let merges_text = std::fs::read_to_string(dir.path().join("merges.txt")).unwrap();
        assert_eq!(merges_text.lines().collect::<Vec<_>>(), vec!["61 61"]);
    }

    #[test]
    fn test_json_format() {
        let (vocab, merges) = sample();
        let dir = tempfile::tempdir().unwrap();
        ModelSaver::new(&vocab, &merges).save_json(dir.path()).unwrap();

        let json = std::fs::read_to_string(dir.path().join("tokenizer.json")).unwrap();
        let model: super::super::format::SerializedModel =
            serde_json::from_str(&json).unwrap();

        assert_eq!(model.vocab.len(), 258);
        assert_eq!(model.merges.len(), 1);
        assert_eq!(model.special_tokens, vec!["<|endoftext|>".to_string()]);
        assert_eq!(model.config.vocab_size, 258);
    }
}
