//! # Fuzzle - Concurrent Fuzzy-Searchable Radix Trie
//!
//! Fuzzle is a thread-safe, maximally-compacted prefix tree (radix trie)
//! mapping string keys to arbitrary payloads, with exact lookup, prefix
//! scans, and fuzzy substring search under a tunable error budget.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`tree`] - The compacted-trie store (insert, remove, lookup, prefix scan)
//! - [`search`] - The fuzzy substring search engine (states, strategies, driver)
//! - [`utils`] - Word-boundary utilities
//!
//! ## Quick Start
//!
//! ```
//! use fuzzle::{MatchingStrategy, RadixTree};
//!
//! let tree = RadixTree::new();
//! tree.put("the quick brown fox", 1).unwrap();
//! tree.put("brownian motion", 2).unwrap();
//!
//! // exact substring search
//! let hits: Vec<_> = tree.match_by_substring("brown").unwrap().collect();
//! assert_eq!(hits.len(), 2);
//!
//! // one substitution forgiven
//! let fuzzy: Vec<_> = tree
//!     .match_by_substring_fuzzy("browm", 1, MatchingStrategy::Liberal)
//!     .unwrap()
//!     .collect();
//! assert_eq!(fuzzy.len(), 2);
//! ```
//!
//! ## Concurrency
//!
//! A [`RadixTree`] is safe to share across threads. Mutations lock
//! hand-over-hand from the root down; searches snapshot one child list at a
//! time and never block writers for longer than a map clone. Search iterators
//! own their working set, so they remain valid while the tree mutates -
//! results reflect the tree as it was traversed, which always satisfies the
//! structural invariants.
//!
//! Result ordering is out of scope: searches yield unordered, deduplicated
//! results carrying the metadata (match window, error count, word context) a
//! ranking layer needs.

pub mod search;
pub mod tree;
pub mod utils;

mod error;

pub use error::TrieError;
pub use search::{FuzzyMatches, MatchingStrategy, SearchResult};
pub use tree::{PrefixMatches, RadixTree};

#[cfg(test)]
mod proptests;
