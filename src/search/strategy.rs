/// How errors and match positions are constrained during a fuzzy search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchingStrategy {
    /// Match the query anywhere in any stored sequence; no positional
    /// constraint.
    Liberal,
    /// The first matched character must sit at a word start (the root edge,
    /// or immediately after a word separator).
    MatchPrefix,
    /// Word-start anchoring that forgives up to `tolerance` leading word
    /// characters before the first match, each charged as an error.
    ///
    /// Also known as fuzzy-prefix matching.
    AnchorToPrefix,
    /// Forgives trailing query characters with no stored counterpart; error
    /// states activate only once the minimum required match count is reached.
    FuzzyPostfix,
    /// Recognizes transposed character pairs: a substitution opens a swap
    /// obligation that a later reversed pair resolves at no extra cost.
    Typo,
    /// Like [`Typo`](MatchingStrategy::Typo), but the transposed characters
    /// must be adjacent.
    Swap,
    /// `*` in the query matches any single stored character; other errors
    /// require a non-zero tolerance.
    Wildcard,
}
