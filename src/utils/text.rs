//! Small text helpers shared by the extractor and the builder

use super::constants::{FALLBACK_KEY, KEY_WORD_LIMIT};

/// Collapse runs of whitespace into single spaces and trim the ends
///
/// Returns `None` when nothing but whitespace remains.
pub(crate) fn clean_text(raw: &str) -> Option<String> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Derive a citation key from a title
///
/// Lower-cased ASCII words, punctuation stripped, at most
/// [`KEY_WORD_LIMIT`] words joined by `-`.
pub(crate) fn citation_key(title: &str) -> String {
    let words: Vec<String> = title
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .take(KEY_WORD_LIMIT)
        .collect();

    if words.is_empty() {
        FALLBACK_KEY.to_string()
    } else {
        words.join("-")
    }
}
