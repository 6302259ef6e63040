//! Content repairs for Fritzing part definition files.
//!
//! Responsibilities:
//! - Strip stray null bytes.
//! - Decode as UTF-8, dropping sequences that are not valid UTF-8.
//! - Insert the missing separator after `hybrid='yes'`.
//!
//! Everything here works on in-memory buffers. Reading, writing and archive
//! handling live in `fzpfix-core`.

use fzpfix_types::PatchMode;
use tracing::trace;

/// The attribute that older part editors wrote without a trailing separator.
pub const HYBRID_ATTR: &str = "hybrid='yes'";

const HYBRID_ATTR_FIXED: &str = "hybrid='yes' ";

/// Result of repairing one definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repair {
    pub bytes: Vec<u8>,
    pub nulls_removed: usize,
    pub invalid_bytes_dropped: usize,
    pub separators_inserted: usize,
    /// True when `bytes` differs from the input.
    pub changed: bool,
}

/// Run every repair over `original` and report what changed.
pub fn repair_definition(original: &[u8], mode: PatchMode) -> Repair {
    let stripped = strip_nulls(original);
    let nulls_removed = original.len() - stripped.len();

    let (text, invalid_bytes_dropped) = decode_lossy(&stripped);
    let (text, separators_inserted) = fix_hybrid_separator(&text, mode);

    let bytes = text.into_bytes();
    let changed = bytes.as_slice() != original;

    trace!(
        nulls_removed,
        invalid_bytes_dropped,
        separators_inserted,
        changed,
        "repaired definition"
    );

    Repair {
        bytes,
        nulls_removed,
        invalid_bytes_dropped,
        separators_inserted,
        changed,
    }
}

/// Remove every `0x00` byte, wherever it occurs.
pub fn strip_nulls(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().copied().filter(|b| *b != 0).collect()
}

/// Decode UTF-8, silently dropping invalid sequences.
///
/// Returns the text and the number of bytes that were dropped. This is lossy:
/// the dropped bytes cannot be recovered.
pub fn decode_lossy(bytes: &[u8]) -> (String, usize) {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        dropped += chunk.invalid().len();
    }
    (text, dropped)
}

/// Insert a space after `hybrid='yes'`.
///
/// In [`PatchMode::Legacy`] every occurrence is rewritten, so a second pass
/// adds a second space. [`PatchMode::Strict`] only touches occurrences that are
/// directly followed by a character other than whitespace, `/` or `>`.
pub fn fix_hybrid_separator(text: &str, mode: PatchMode) -> (String, usize) {
    match mode {
        PatchMode::Legacy => {
            let count = text.matches(HYBRID_ATTR).count();
            if count == 0 {
                return (text.to_string(), 0);
            }
            (text.replace(HYBRID_ATTR, HYBRID_ATTR_FIXED), count)
        }
        PatchMode::Strict => {
            let mut out = String::with_capacity(text.len());
            let mut inserted = 0;
            let mut last = 0;
            for (start, _) in text.match_indices(HYBRID_ATTR) {
                let end = start + HYBRID_ATTR.len();
                out.push_str(&text[last..end]);
                if needs_separator(text[end..].chars().next()) {
                    out.push(' ');
                    inserted += 1;
                }
                last = end;
            }
            out.push_str(&text[last..]);
            (out, inserted)
        }
    }
}

fn needs_separator(next: Option<char>) -> bool {
    match next {
        None => false,
        Some(c) => !(c.is_whitespace() || c == '/' || c == '>'),
    }
}
