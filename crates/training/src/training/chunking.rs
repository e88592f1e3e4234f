//! Corpus chunking for parallel pre-tokenization.
//!
//! Splits a large corpus into byte ranges that can be pre-tokenized
//! independently: every interior boundary lands exactly at the start of
//! an occurrence of the designated special-token byte sequence (or at
//! end-of-file), so no special-token-delimited segment is ever cut in
//! half. Look-ahead memory stays bounded by the scan block size
//! regardless of corpus size.

use std::io::{self, Read, Seek, SeekFrom};

/// Forward-scan block size in bytes.
const SCAN_BLOCK_SIZE: usize = 4096;

/// Compute chunk boundary offsets for a seekable byte source.
///
/// Returns `desired_num_chunks + 1` offsets at most: evenly spaced
/// initial guesses over `[0, total_size]` with the first pinned to 0 and
/// the last to the total size, each interior guess snapped forward to
/// the start of the next split-token occurrence (or to end-of-file).
/// The result is sorted ascending and deduplicated, so it may be shorter
/// than requested when guesses collapse onto the same snapped position;
/// callers must treat it as the authoritative partition.
pub fn find_chunk_boundaries<R: Read + Seek>(
    reader: &mut R,
    desired_num_chunks: usize,
    split_token: &[u8],
) -> io::Result<Vec<u64>> {
    if desired_num_chunks == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "desired chunk count must be at least 1",
        ));
    }
    if split_token.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "split token must be non-empty",
        ));
    }

    let total_size = reader.seek(SeekFrom::End(0))?;
    let chunk_size = total_size / desired_num_chunks as u64;

    let mut boundaries: Vec<u64> = (0..=desired_num_chunks as u64)
        .map(|i| i * chunk_size)
        .collect();
    if let Some(last) = boundaries.last_mut() {
        *last = total_size;
    }

    let mut block = vec![0u8; SCAN_BLOCK_SIZE];
    for bi in 1..boundaries.len() - 1 {
        let mut position = boundaries[bi];
        reader.seek(SeekFrom::Start(position))?;

        loop {
            let n = read_block(reader, &mut block)?;
            if n == 0 {
                boundaries[bi] = total_size;
                break;
            }
            if let Some(offset) = find_subsequence(&block[..n], split_token) {
                boundaries[bi] = position + offset as u64;
                break;
            }
            position += n as u64;
        }
    }

    boundaries.sort_unstable();
    boundaries.dedup();
    Ok(boundaries)
}

/// Fill as much of `buf` as the source allows, returning the byte count.
/// Returns 0 only at end-of-file.
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// First offset of `needle` within `haystack`, if any.
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EOT: &[u8] = b"<|endoftext|>";

    fn corpus(docs: &[&str]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for doc in docs {
            bytes.extend_from_slice(doc.as_bytes());
            bytes.extend_from_slice(EOT);
        }
        bytes
    }

    #[test]
    fn test_boundaries_land_on_special_token_starts() {
        let bytes = corpus(&["first document", "second one", "third", "and a fourth"]);
        let mut cursor = Cursor::new(bytes.clone());

        let boundaries = find_chunk_boundaries(&mut cursor, 4, EOT).unwrap();

        assert_eq!(*boundaries.first().unwrap(), 0);
        assert_eq!(*boundaries.last().unwrap(), bytes.len() as u64);
        for &b in &boundaries[1..boundaries.len() - 1] {
            let b = b as usize;
            assert_eq!(&bytes[b..b + EOT.len()], EOT, "boundary {} not at token", b);
        }
    }

    #[test]
    fn test_boundaries_are_sorted_and_unique() {
        // Many chunks over a tiny file collapse onto few positions.
        let bytes = corpus(&["ab", "cd"]);
        let mut cursor = Cursor::new(bytes.clone());

        let boundaries = find_chunk_boundaries(&mut cursor, 16, EOT).unwrap();

        assert!(boundaries.len() <= 17);
        assert!(boundaries.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*boundaries.first().unwrap(), 0);
        assert_eq!(*boundaries.last().unwrap(), bytes.len() as u64);
    }

    #[test]
    fn test_no_token_after_guess_snaps_to_eof() {
        let mut bytes = corpus(&["early"]);
        bytes.extend_from_slice(b"a long tail without any marker at all");
        let total = bytes.len() as u64;
        let mut cursor = Cursor::new(bytes);

        let boundaries = find_chunk_boundaries(&mut cursor, 3, EOT).unwrap();

        assert_eq!(*boundaries.last().unwrap(), total);
        // Interior guesses past the only token all collapse to EOF.
        assert!(boundaries.iter().all(|&b| b == 0 || b == total || {
            b >= 5 // token start in "early<|endoftext|>..."
        }));
    }

    #[test]
    fn test_token_beyond_first_scan_block() {
        // Token sits more than one scan block past the initial guess.
        let mut bytes = vec![b'x'; 10_000];
        bytes.extend_from_slice(EOT);
        bytes.extend_from_slice(&[b'y'; 1000]);
        let token_start = 10_000u64;
        let mut cursor = Cursor::new(bytes);

        let boundaries = find_chunk_boundaries(&mut cursor, 2, EOT).unwrap();

        assert!(boundaries.contains(&token_start));
    }

    #[test]
    fn test_single_chunk_is_whole_file() {
        let bytes = corpus(&["only"]);
        let total = bytes.len() as u64;
        let mut cursor = Cursor::new(bytes);

        let boundaries = find_chunk_boundaries(&mut cursor, 1, EOT).unwrap();
        assert_eq!(boundaries, vec![0, total]);
    }

    #[test]
    fn test_empty_file() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let boundaries = find_chunk_boundaries(&mut cursor, 4, EOT).unwrap();
        assert_eq!(boundaries, vec![0]);
    }

    #[test]
    fn test_invalid_arguments() {
        let mut cursor = Cursor::new(corpus(&["doc"]));
        assert!(find_chunk_boundaries(&mut cursor, 0, EOT).is_err());
        assert!(find_chunk_boundaries(&mut cursor, 2, b"").is_err());
    }
}
