//! Fuzzy substring search over the trie.
//!
//! This module provides the traversal driver and its supporting pieces:
//!
//! - [`state`] - The per-position state machine (matches, errors, windows)
//! - [`strategy`] - The matching-strategy enumeration
//! - [`result`] - The record handed to callers
//!
//! The driver itself is [`FuzzyMatches`]: a lazy iterator over a worklist of
//! states. Each `next()` call pops states, pushes their successors, and
//! yields the first accepted terminal it reaches that has not already been
//! reported for the same node and match window. Nothing is ranked here; the
//! caller decides what order results matter in.

pub mod result;
pub(crate) mod state;
pub mod strategy;

use std::collections::VecDeque;
use std::sync::Arc;

use ahash::AHashSet;

pub use result::SearchResult;
pub use strategy::MatchingStrategy;

use crate::tree::node::Node;
use state::{SearchContext, SearchState};

/// Lazy stream of fuzzy-search results.
///
/// Produced by [`RadixTree::match_by_substring`] and
/// [`RadixTree::match_by_substring_fuzzy`]; holds its own snapshot handles
/// into the tree, so it stays valid while the tree keeps mutating.
///
/// [`RadixTree::match_by_substring`]: crate::RadixTree::match_by_substring
/// [`RadixTree::match_by_substring_fuzzy`]: crate::RadixTree::match_by_substring_fuzzy
pub struct FuzzyMatches<V> {
    context: SearchContext,
    queue: VecDeque<SearchState<V>>,
    /// `(node identity, window start, window end)` of every emitted result.
    emitted: AHashSet<(usize, usize, usize)>,
}

impl<V> FuzzyMatches<V> {
    pub(crate) fn seed(
        root: Arc<Node<V>>,
        query: &str,
        tolerance: usize,
        strategy: MatchingStrategy,
    ) -> Self {
        let context = SearchContext {
            query: query.chars().collect(),
            tolerance,
            strategy,
        };
        let mut queue = VecDeque::new();
        queue.push_back(SearchState::initial(root));
        FuzzyMatches {
            context,
            queue,
            emitted: AHashSet::new(),
        }
    }
}

impl<V: Clone> Iterator for FuzzyMatches<V> {
    type Item = SearchResult<V>;

    fn next(&mut self) -> Option<SearchResult<V>> {
        while let Some(state) = self.queue.pop_front() {
            self.queue.extend(state.next_states(&self.context));
            if let Some(result) = state.emit(&self.context) {
                let (start, end) = state.window();
                if self.emitted.insert((state.node_ptr(), start, end)) {
                    return Some(result);
                }
            }
        }
        None
    }
}
