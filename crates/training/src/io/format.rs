//! Format definitions for trained-model serialization.
//!
//! Token bytes are not guaranteed to be valid UTF-8, so both the text
//! and JSON formats carry them hex-encoded (lowercase, two digits per
//! byte).

use serde::{Deserialize, Serialize};

/// Hex-encode a byte string (lowercase).
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

/// One vocabulary entry in serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedToken {
    /// Token id
    pub id: u32,
    /// Hex-encoded token bytes
    pub bytes: String,
}

/// One merge in serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedMerge {
    /// Hex-encoded left symbol
    pub left: String,
    /// Hex-encoded right symbol
    pub right: String,
}

/// Complete trained-model serialization format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedModel {
    /// Format version
    pub version: String,
    /// Vocabulary entries, sorted by id ascending
    pub vocab: Vec<SerializedToken>,
    /// Merges in chronological order
    pub merges: Vec<SerializedMerge>,
    /// Special tokens in reservation order
    pub special_tokens: Vec<String>,
    /// Configuration
    pub config: SerializedConfig,
}

/// Trainer configuration in serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedConfig {
    pub vocab_size: usize,
}
