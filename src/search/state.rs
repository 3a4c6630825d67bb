//! The fuzzy-search state machine.
//!
//! A [`SearchState`] is an immutable snapshot of one point in a traversal:
//! where it sits in the trie, how far into the query it has matched, what it
//! has spent of the error budget, and the window of the stored sequence the
//! match covers. Expansion never mutates a state; every transition clones and
//! adjusts, so the driver can hold states in a plain worklist.
//!
//! Edges carry arbitrary-length labels, but the machine steps one character
//! at a time: a state mid-edge consumes the next label character, a state at
//! an edge boundary fans out over the node's children. Each state keeps a
//! snapshot of the label it entered with, so a concurrent fuse or split never
//! shifts the ground under a running search.
//!
//! States with no recorded progress ("pristine" states) always propagate past
//! the current character in addition to trying to start a match there. That
//! cascade is what restarts matching after a failed window: every offset of
//! every stored sequence is considered as a potential window start, including
//! offsets inside an abandoned window.

use std::sync::Arc;

use crate::search::result::SearchResult;
use crate::search::strategy::MatchingStrategy;
use crate::tree::node::{EdgeSnapshot, Node};
use crate::utils::words;

/// Query, budget and strategy shared by every state of one search.
pub(crate) struct SearchContext {
    pub query: Vec<char>,
    pub tolerance: usize,
    pub strategy: MatchingStrategy,
}

/// An unresolved transposition obligation opened by a Typo/Swap error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SwapPair {
    /// Query character consumed when the pair was opened.
    pub source: char,
    /// Stored character consumed when the pair was opened.
    pub target: char,
}

/// Where a transition lands: a node, the label snapshot it entered with, and
/// how many bytes of that label the next state will have consumed.
struct Hop<V> {
    node: Arc<Node<V>>,
    edge: Arc<str>,
    offset: usize,
}

pub(crate) struct SearchState<V> {
    node: Arc<Node<V>>,
    /// Label snapshot taken when the state entered `node`'s edge.
    edge: Arc<str>,
    /// Bytes of `edge` consumed so far.
    offset: usize,
    /// Every character consumed from the root to this position.
    sequence: String,
    /// Next query position to match (in characters).
    search_index: usize,
    matches: usize,
    errors: usize,
    /// Byte bounds of the match window in `sequence`; `start` is inclusive,
    /// `end` exclusive. `None` until the window opens.
    start: Option<usize>,
    end: Option<usize>,
    swaps: Vec<SwapPair>,
    /// Acceptance reached; the state now only walks down to terminals.
    gathering: bool,
}

impl<V> Clone for SearchState<V> {
    fn clone(&self) -> Self {
        SearchState {
            node: Arc::clone(&self.node),
            edge: Arc::clone(&self.edge),
            offset: self.offset,
            sequence: self.sequence.clone(),
            search_index: self.search_index,
            matches: self.matches,
            errors: self.errors,
            start: self.start,
            end: self.end,
            swaps: self.swaps.clone(),
            gathering: self.gathering,
        }
    }
}

impl<V> SearchState<V> {
    /// The seed state: at the root, nothing consumed, nothing spent.
    pub fn initial(root: Arc<Node<V>>) -> Self {
        SearchState {
            node: root,
            edge: Arc::from(""),
            offset: 0,
            sequence: String::new(),
            search_index: 0,
            matches: 0,
            errors: 0,
            start: None,
            end: None,
            swaps: Vec::new(),
            gathering: false,
        }
    }

    /// Stable identity of the node this state sits on.
    pub fn node_ptr(&self) -> usize {
        Arc::as_ptr(&self.node) as usize
    }

    /// Match-window bounds for result deduplication.
    pub fn window(&self) -> (usize, usize) {
        (self.start.unwrap_or(0), self.end.unwrap_or(0))
    }

    /// Unmatched query characters count against the budget exactly once:
    /// every error transition that skips a query character also advances
    /// `search_index`, so the remainder here is never double-charged.
    pub fn effective_errors(&self, ctx: &SearchContext) -> usize {
        self.errors + ctx.query.len().saturating_sub(self.search_index)
    }

    /// The acceptance predicate: a window exists, enough characters matched,
    /// the budget holds even after charging unmatched query characters, and
    /// no transposition is left dangling.
    pub fn is_accepted(&self, ctx: &SearchContext) -> bool {
        self.start.is_some()
            && self.end.is_some()
            && self.matches + ctx.tolerance >= ctx.query.len()
            && self.effective_errors(ctx) <= ctx.tolerance
            && self.swaps.is_empty()
    }

    fn is_pristine(&self) -> bool {
        !self.gathering
            && self.matches == 0
            && self.errors == 0
            && self.start.is_none()
            && self.swaps.is_empty()
    }

    fn at_edge_end(&self) -> bool {
        self.offset == self.edge.len()
    }

    /// True when the next consumed character would begin a word: either
    /// nothing has been consumed (the root's empty label counts as a
    /// separator) or the previous character separates words.
    fn at_word_start(&self) -> bool {
        match self.sequence.chars().last() {
            Some(prev) => words::is_word_separator(prev),
            None => true,
        }
    }

    /// Characters between the last word separator and the current position.
    fn word_prefix_distance(&self) -> usize {
        let start = words::word_start(&self.sequence, self.sequence.len());
        self.sequence[start..].chars().count()
    }

    /// Emit a result when this state is accepted and sits exactly on a
    /// terminal node.
    pub fn emit(&self, ctx: &SearchContext) -> Option<SearchResult<V>>
    where
        V: Clone,
    {
        if !self.at_edge_end() || !self.is_accepted(ctx) {
            return None;
        }
        let value = self.node.value_clone()?;
        let start = self.start.expect("acceptance requires a window");
        let end = self.end.expect("acceptance requires a window");
        let word_start = words::word_start(&self.sequence, start);
        let word_end = words::word_end(&self.sequence, end);
        let effective = self.effective_errors(ctx);
        Some(SearchResult {
            sequence: self.sequence.clone(),
            value,
            matched_substring: self.sequence[start..end].to_string(),
            matched_word: self.sequence[word_start..word_end].to_string(),
            matches: self.matches,
            errors: effective,
            prefix_distance: self.sequence[word_start..start].chars().count(),
            matched_whole_sequence: effective == 0 && start == 0 && end == self.sequence.len(),
            matched_whole_word: effective == 0 && word_start == start && word_end == end,
        })
    }

    /// All successor states of this state.
    pub fn next_states(&self, ctx: &SearchContext) -> Vec<SearchState<V>> {
        let mut out = Vec::new();
        // the position-holding error successor is identical whichever child
        // triggered it; emit it at most once per expansion
        let mut hold_available = true;
        if !self.at_edge_end() {
            let ch = self.edge[self.offset..]
                .chars()
                .next()
                .expect("offset is a char boundary");
            let hop = Hop {
                node: Arc::clone(&self.node),
                edge: Arc::clone(&self.edge),
                offset: self.offset + ch.len_utf8(),
            };
            self.step(ctx, &hop, ch, &mut hold_available, &mut out);
        } else {
            for edge in self.node.edges() {
                if self.should_prune(ctx, &edge) {
                    continue;
                }
                let ch = edge.label.chars().next().expect("labels are non-empty");
                let hop = Hop {
                    offset: ch.len_utf8(),
                    node: edge.node,
                    edge: edge.label,
                };
                self.step(ctx, &hop, ch, &mut hold_available, &mut out);
            }
        }
        out
    }

    /// Skip subtrees that cannot possibly supply the characters still needed
    /// for acceptance, even if everything below matched.
    fn should_prune(&self, ctx: &SearchContext, edge: &EdgeSnapshot<V>) -> bool {
        if self.gathering {
            return false;
        }
        let needed = ctx.query.len().saturating_sub(self.matches + ctx.tolerance);
        if needed == 0 {
            return false;
        }
        edge.label.chars().count() + edge.depth < needed
    }

    /// Produce the successors for consuming one character. Categories apply
    /// in priority order: match, swap completion, error introduction, then
    /// gather for accepted states that nothing else extends. Failed states
    /// without progress keep scanning; failed states with progress die, and
    /// the pristine cascade covers any later window.
    fn step(
        &self,
        ctx: &SearchContext,
        hop: &Hop<V>,
        ch: char,
        hold_available: &mut bool,
        out: &mut Vec<SearchState<V>>,
    ) {
        if self.gathering {
            out.push(self.advanced(hop, ch));
            return;
        }

        if self.is_pristine() {
            if let Some(matched) = self.try_match(ctx, hop, ch) {
                out.push(matched);
            }
            if ctx.strategy == MatchingStrategy::AnchorToPrefix {
                if let Some(skip) = self.try_anchor_skip(ctx, hop, ch) {
                    out.push(skip);
                }
            }
            // keep scanning: every later offset is a potential window start
            out.push(self.advanced(hop, ch));
            return;
        }

        // under Swap, a pending pair must resolve on the very next character
        if ctx.strategy == MatchingStrategy::Swap && !self.swaps.is_empty() {
            if let Some(done) = self.try_swap_completion(ctx, hop, ch) {
                out.push(done);
            }
            return;
        }

        if let Some(matched) = self.try_match(ctx, hop, ch) {
            out.push(matched);
            return;
        }
        if let Some(done) = self.try_swap_completion(ctx, hop, ch) {
            out.push(done);
            return;
        }
        if self.push_errors(ctx, hop, ch, hold_available, out) {
            return;
        }
        if self.is_accepted(ctx) {
            let mut gather = self.advanced(hop, ch);
            gather.gathering = true;
            out.push(gather);
        }
    }

    /// Clone of this state moved past `ch` onto `hop`, counters untouched.
    fn advanced(&self, hop: &Hop<V>, ch: char) -> SearchState<V> {
        let mut next = self.clone();
        next.node = Arc::clone(&hop.node);
        next.edge = Arc::clone(&hop.edge);
        next.offset = hop.offset;
        next.sequence.push(ch);
        next
    }

    /// A match state: the stored character answers the next query character,
    /// subject to the strategy's precondition on the first match.
    fn try_match(&self, ctx: &SearchContext, hop: &Hop<V>, ch: char) -> Option<SearchState<V>> {
        let qch = *ctx.query.get(self.search_index)?;
        let wildcard = ctx.strategy == MatchingStrategy::Wildcard && qch == '*';
        if !wildcard && qch != ch {
            return None;
        }
        if self.matches == 0 {
            match ctx.strategy {
                MatchingStrategy::MatchPrefix => {
                    if !self.at_word_start() {
                        return None;
                    }
                }
                MatchingStrategy::AnchorToPrefix => {
                    // every leading word character must already be charged
                    if self.word_prefix_distance() > self.errors {
                        return None;
                    }
                }
                _ => {}
            }
        }
        let mut next = self.advanced(hop, ch);
        next.search_index += 1;
        next.matches += 1;
        if next.start.is_none() {
            next.start = Some(self.sequence.len());
        }
        next.end = Some(next.sequence.len());
        Some(next)
    }

    /// Resolve a pending transposition: the stored character is the earlier
    /// query character and vice versa. Counts as a match; the error was
    /// charged when the pair opened.
    fn try_swap_completion(
        &self,
        ctx: &SearchContext,
        hop: &Hop<V>,
        ch: char,
    ) -> Option<SearchState<V>> {
        let qch = *ctx.query.get(self.search_index)?;
        let idx = self
            .swaps
            .iter()
            .position(|pair| pair.source == ch && pair.target == qch)?;
        let mut next = self.advanced(hop, ch);
        next.swaps.remove(idx);
        next.search_index += 1;
        next.matches += 1;
        if next.start.is_none() {
            next.start = Some(self.sequence.len());
        }
        next.end = Some(next.sequence.len());
        Some(next)
    }

    /// A leading stored character skipped before an anchored match, charged
    /// against the budget. Separators are never skipped this way; a word
    /// boundary restarts the anchor for free via the pristine cascade.
    fn try_anchor_skip(
        &self,
        ctx: &SearchContext,
        hop: &Hop<V>,
        ch: char,
    ) -> Option<SearchState<V>> {
        if self.errors >= ctx.tolerance || words::is_word_separator(ch) {
            return None;
        }
        let mut next = self.advanced(hop, ch);
        next.errors += 1;
        Some(next)
    }

    /// Error-introduction successors. Returns whether any were produced.
    fn push_errors(
        &self,
        ctx: &SearchContext,
        hop: &Hop<V>,
        ch: char,
        hold_available: &mut bool,
        out: &mut Vec<SearchState<V>>,
    ) -> bool {
        if self.search_index >= ctx.query.len() || self.errors >= ctx.tolerance {
            return false;
        }
        if ctx.strategy == MatchingStrategy::Typo && !self.swaps.is_empty() {
            return false;
        }
        if ctx.strategy == MatchingStrategy::AnchorToPrefix && self.matches == 0 {
            return match self.try_anchor_skip(ctx, hop, ch) {
                Some(skip) => {
                    out.push(skip);
                    true
                }
                None => false,
            };
        }
        let allowed = match ctx.strategy {
            // no errors until the minimum match count is reached
            MatchingStrategy::FuzzyPostfix => self.matches + ctx.tolerance >= ctx.query.len(),
            _ => self.matches > 0,
        };
        if !allowed {
            return false;
        }
        match ctx.strategy {
            MatchingStrategy::Typo | MatchingStrategy::Swap => {
                // substitution that opens a transposition obligation
                let qch = ctx.query[self.search_index];
                let mut next = self.advanced(hop, ch);
                next.search_index += 1;
                next.errors += 1;
                next.swaps.push(SwapPair {
                    source: qch,
                    target: ch,
                });
                out.push(next);
            }
            _ => {
                // misspelling: the stored character stands in for the query's
                let mut substituted = self.advanced(hop, ch);
                substituted.search_index += 1;
                substituted.errors += 1;
                out.push(substituted);
                // missing in data: the query character has no stored counterpart
                if *hold_available {
                    let mut gap = self.clone();
                    gap.search_index += 1;
                    gap.errors += 1;
                    out.push(gap);
                    *hold_available = false;
                }
                // missing in query: the stored character has no query counterpart
                let mut extra = self.advanced(hop, ch);
                extra.errors += 1;
                out.push(extra);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(query: &str, tolerance: usize, strategy: MatchingStrategy) -> SearchContext {
        SearchContext {
            query: query.chars().collect(),
            tolerance,
            strategy,
        }
    }

    fn pristine(sequence: &str) -> SearchState<u32> {
        let mut state = SearchState::initial(Node::root());
        state.sequence = sequence.to_string();
        state
    }

    #[test]
    fn test_effective_errors_counts_unmatched_once() {
        let ctx = context("google", 1, MatchingStrategy::Liberal);
        let mut state = pristine("googl");
        state.search_index = 5;
        state.matches = 5;
        state.errors = 0;
        // one query character left unmatched
        assert_eq!(state.effective_errors(&ctx), 1);
        state.search_index = 6;
        state.errors = 1;
        // skipped via an error transition: charged in `errors`, not recounted
        assert_eq!(state.effective_errors(&ctx), 1);
    }

    #[test]
    fn test_acceptance_requires_window_and_budget() {
        let ctx = context("abc", 1, MatchingStrategy::Liberal);
        let mut state = pristine("abc");
        assert!(!state.is_accepted(&ctx));
        state.search_index = 3;
        state.matches = 3;
        state.start = Some(0);
        state.end = Some(3);
        assert!(state.is_accepted(&ctx));
        state.errors = 2;
        assert!(!state.is_accepted(&ctx));
    }

    #[test]
    fn test_acceptance_blocked_by_pending_swap() {
        let ctx = context("ab", 0, MatchingStrategy::Typo);
        let mut state = pristine("ba");
        state.search_index = 2;
        state.matches = 2;
        state.start = Some(0);
        state.end = Some(2);
        assert!(state.is_accepted(&ctx));
        state.swaps.push(SwapPair {
            source: 'a',
            target: 'b',
        });
        assert!(!state.is_accepted(&ctx));
    }

    #[test]
    fn test_word_prefix_distance() {
        let state = pristine("the qu");
        assert_eq!(state.word_prefix_distance(), 2);
        let state = pristine("the ");
        assert_eq!(state.word_prefix_distance(), 0);
        let state = pristine("word");
        assert_eq!(state.word_prefix_distance(), 4);
    }

    #[test]
    fn test_at_word_start() {
        assert!(pristine("").at_word_start());
        assert!(pristine("the ").at_word_start());
        assert!(pristine("the-").at_word_start());
        assert!(!pristine("the q").at_word_start());
    }
}
