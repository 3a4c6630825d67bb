/// One fuzzy-search hit, with enough surrounding metadata for an external
/// ranking layer to order results.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SearchResult<V> {
    /// The full stored sequence (the key) the match was found in.
    pub sequence: String,
    /// The payload stored under the sequence.
    pub value: V,
    /// The span of the sequence covered by the match window.
    pub matched_substring: String,
    /// The matched window extended outward to the nearest word separators.
    pub matched_word: String,
    /// Query characters that matched stored characters.
    pub matches: usize,
    /// Effective errors charged against the tolerance, including query
    /// characters left unmatched at the end.
    pub errors: usize,
    /// Characters between the last word separator before the window and the
    /// window start.
    pub prefix_distance: usize,
    /// The match covered the entire sequence with zero effective errors.
    pub matched_whole_sequence: bool,
    /// The match covered an entire word with zero effective errors.
    pub matched_whole_word: bool,
}
