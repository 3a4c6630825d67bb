use thiserror::Error;

/// Errors surfaced by the public [`RadixTree`](crate::RadixTree) API.
///
/// Internal invariant violations (impossible states reached through a bug in
/// this crate, not through caller input) are not represented here; they panic.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TrieError {
    /// A caller-supplied argument was rejected before any work happened.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The exact key is not stored in the tree.
    #[error("key not found")]
    NotFound,
}
