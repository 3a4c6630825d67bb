//! Word-boundary classification.
//!
//! Stored sequences are segmented into words by whitespace and punctuation.
//! The start of a sequence also counts as a word boundary, which callers
//! encode as the "no previous character" case.

/// Check whether a character separates words.
///
/// Any Unicode whitespace counts, as does ASCII punctuation. Alphanumerics
/// (including non-ASCII letters) never separate.
#[inline]
pub fn is_word_separator(ch: char) -> bool {
    ch.is_whitespace() || ch.is_ascii_punctuation()
}

/// Byte index of the last word separator strictly before `end`, or `None`.
pub fn last_separator(seq: &str, end: usize) -> Option<usize> {
    seq[..end]
        .char_indices()
        .rev()
        .find(|&(_, ch)| is_word_separator(ch))
        .map(|(idx, _)| idx)
}

/// Byte index of the first word separator at or after `start`, or `None`.
pub fn first_separator(seq: &str, start: usize) -> Option<usize> {
    seq[start..]
        .char_indices()
        .find(|&(_, ch)| is_word_separator(ch))
        .map(|(idx, _)| start + idx)
}

/// Byte index of the first character of the word containing byte `at`.
///
/// This is the position just past the nearest separator before `at`, or the
/// start of the sequence when no separator precedes it.
pub fn word_start(seq: &str, at: usize) -> usize {
    match last_separator(seq, at) {
        Some(idx) => {
            let sep = seq[idx..].chars().next().expect("separator index is a char boundary");
            idx + sep.len_utf8()
        }
        None => 0,
    }
}

/// Byte index just past the last character of the word containing byte `at`.
pub fn word_end(seq: &str, at: usize) -> usize {
    first_separator(seq, at).unwrap_or(seq.len())
}
