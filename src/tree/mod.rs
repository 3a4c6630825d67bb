//! The concurrent compacted-trie store.
//!
//! [`RadixTree`] owns the root node and enforces the structural invariants
//! every search depends on:
//!
//! - at most one child per first character in any children map,
//! - no non-terminal node with exactly one child (such chains are fused),
//! - non-empty labels everywhere below the root,
//! - cached subtree depths consistent with the labels below.
//!
//! Mutations hold locks hand-over-hand while descending and always acquire a
//! parent's locks before a child's. Searches only snapshot child lists and
//! never block mutations for longer than a map clone.

pub(crate) mod node;

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::TrieError;
use crate::search::{FuzzyMatches, MatchingStrategy};

use node::{common_prefix_len, Node};

/// A thread-safe radix tree mapping string keys to values of type `V`.
///
/// Keys share storage along common prefixes. Lookups, prefix scans and
/// substring searches run concurrently with inserts and removals; every
/// operation observes a tree satisfying the module-level invariants.
///
/// `V: Clone` is required only on the read surface (`get`, scans, searches);
/// `put` and `remove` move values in and out.
pub struct RadixTree<V> {
    root: Arc<Node<V>>,
    size: AtomicUsize,
}

impl<V> RadixTree<V> {
    /// An empty tree.
    pub fn new() -> Self {
        RadixTree {
            root: Node::root(),
            size: AtomicUsize::new(0),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `key` with `value`, returning the previous value if the key was
    /// already present.
    ///
    /// Fails with [`TrieError::InvalidArgument`] on an empty key or a key
    /// containing `*` (reserved for [`MatchingStrategy::Wildcard`] queries).
    pub fn put(&self, key: &str, value: V) -> Result<Option<V>, TrieError> {
        if key.is_empty() {
            return Err(TrieError::InvalidArgument("key must not be empty"));
        }
        if key.contains('*') {
            return Err(TrieError::InvalidArgument(
                "key must not contain the wildcard character",
            ));
        }

        let mut payload = Some(value);
        let mut current = Arc::clone(&self.root);
        let mut rest: &str = key;

        loop {
            let first = rest.chars().next().expect("remainder is non-empty");
            let mut children = current.lock_children();

            let Some(child) = children.get(&first).cloned() else {
                // no child shares a first character: append a fresh leaf
                let leaf = Node::child(
                    rest.to_string(),
                    Some(payload.take().expect("payload still held")),
                    &current,
                );
                children.insert(first, leaf);
                drop(children);
                self.size.fetch_add(1, Ordering::Relaxed);
                update_depths(&current);
                return Ok(None);
            };

            let label = child.label();
            let common = common_prefix_len(&label, rest);

            if common == label.len() && common == rest.len() {
                // exact node: overwrite in place, structure untouched
                drop(children);
                let previous = child.replace_value(payload.take().expect("payload still held"));
                if previous.is_none() {
                    self.size.fetch_add(1, Ordering::Relaxed);
                }
                return Ok(previous);
            }

            if common == label.len() {
                // the whole edge matches: descend with the shortened remainder
                drop(children);
                rest = &rest[common..];
                current = child;
                continue;
            }

            // the edge must be split at the common prefix
            let head = label[..common].to_string();
            let tail = label[common..].to_string();
            let tail_first = tail.chars().next().expect("split tail is non-empty");

            let mid = if common == rest.len() {
                // remainder is a proper prefix of the edge: the intermediate
                // node carries the new value
                Node::child(head, payload.take(), &current)
            } else {
                Node::child(head, None, &current)
            };

            child.lock_state().label = tail;
            child.set_parent(&mid);
            mid.lock_children().insert(tail_first, Arc::clone(&child));

            if common < rest.len() {
                let suffix = rest[common..].to_string();
                let suffix_first = suffix.chars().next().expect("split suffix is non-empty");
                let leaf = Node::child(suffix, payload.take(), &mid);
                mid.lock_children().insert(suffix_first, leaf);
            }

            children.insert(first, Arc::clone(&mid));
            drop(children);
            self.size.fetch_add(1, Ordering::Relaxed);
            update_depths(&mid);
            return Ok(None);
        }
    }

    /// Remove `key`, returning its value, then re-compact the branch.
    ///
    /// Fails with [`TrieError::NotFound`] when the exact key is absent and
    /// [`TrieError::InvalidArgument`] on an empty key.
    pub fn remove(&self, key: &str) -> Result<V, TrieError> {
        if key.is_empty() {
            return Err(TrieError::InvalidArgument("key must not be empty"));
        }
        let node = self.locate(key).ok_or(TrieError::NotFound)?;
        let taken = node.take_value().ok_or(TrieError::NotFound)?;
        self.size.fetch_sub(1, Ordering::Relaxed);

        // Compact upward: unlink childless non-terminals, fuse single-child
        // non-terminals into their child. Each step re-verifies linkage under
        // the parent's children lock, so racing removals settle cleanly.
        let mut current = node;
        loop {
            let Some(parent) = current.parent() else {
                break; // reached the root
            };
            let mut parent_children = parent.lock_children();
            let current_state = current.lock_state();
            let Some(entry) = current_state.label.chars().next() else {
                break;
            };
            match parent_children.get(&entry) {
                Some(linked) if Arc::ptr_eq(linked, &current) => {}
                _ => break, // a concurrent operation already restructured here
            }
            if current_state.value.is_some() {
                break; // terminal nodes stay, whatever their child count
            }
            let current_children = current.lock_children();
            match current_children.len() {
                0 => {
                    parent_children.remove(&entry);
                }
                1 => {
                    let child = current_children
                        .values()
                        .next()
                        .cloned()
                        .expect("length checked above");
                    {
                        let mut child_state = child.lock_state();
                        let mut fused =
                            String::with_capacity(current_state.label.len() + child_state.label.len());
                        fused.push_str(&current_state.label);
                        fused.push_str(&child_state.label);
                        child_state.label = fused;
                    }
                    child.set_parent(&parent);
                    parent_children.insert(entry, child);
                }
                _ => break,
            }
            drop(current_children);
            drop(current_state);
            drop(parent_children);
            current = parent;
        }
        update_depths(&current);
        Ok(taken)
    }

    /// Walk the exact path for `key`; `None` when the path does not exist or
    /// ends mid-edge.
    ///
    /// Labels are read while the parent's children lock is held: splits and
    /// fuses relabel a child only under that lock, so the label always agrees
    /// with the linkage it was found through.
    fn locate(&self, key: &str) -> Option<Arc<Node<V>>> {
        let mut current = Arc::clone(&self.root);
        let mut rest: &str = key;
        while !rest.is_empty() {
            let first = rest.chars().next().expect("rest is non-empty");
            let (child, label) = {
                let children = current.lock_children();
                let child = children.get(&first)?.clone();
                let label = child.label();
                (child, label)
            };
            if !rest.starts_with(label.as_str()) {
                return None;
            }
            rest = &rest[label.len()..];
            current = child;
        }
        Some(current)
    }

    /// Descend to the node at or spanning `prefix`, returning it with the
    /// accumulated label path from the root (which may extend past `prefix`
    /// when the prefix ends mid-edge).
    fn locate_prefix(&self, prefix: &str) -> Option<(Arc<Node<V>>, String)> {
        let mut current = Arc::clone(&self.root);
        let mut accumulated = String::new();
        let mut rest: &str = prefix;
        while !rest.is_empty() {
            let first = rest.chars().next().expect("rest is non-empty");
            let (child, label) = {
                let children = current.lock_children();
                let child = children.get(&first)?.clone();
                let label = child.label();
                (child, label)
            };
            let common = common_prefix_len(&label, rest);
            accumulated.push_str(&label);
            if common == rest.len() {
                // prefix consumed; a partial edge match is fine because the
                // consumed portion of the edge equals the remaining prefix
                return Some((child, accumulated));
            }
            if common < label.len() {
                return None; // diverged mid-edge
            }
            rest = &rest[common..];
            current = child;
        }
        Some((current, accumulated))
    }
}

impl<V: Clone> RadixTree<V> {
    /// Exact lookup.
    pub fn get(&self, key: &str) -> Option<V> {
        self.locate(key).and_then(|node| node.value_clone())
    }

    /// Lazily enumerate every `(key, value)` whose key starts with `prefix`.
    ///
    /// An empty prefix enumerates the whole tree.
    pub fn match_by_prefix(&self, prefix: &str) -> PrefixMatches<V> {
        let stack = match self.locate_prefix(prefix) {
            Some(seed) => vec![seed],
            None => Vec::new(),
        };
        PrefixMatches { stack }
    }

    /// All stored entries; alias for a scan with the empty prefix.
    pub fn iter(&self) -> PrefixMatches<V> {
        self.match_by_prefix("")
    }

    /// Exact substring search: every stored sequence containing `query`.
    ///
    /// Equivalent to a fuzzy search with tolerance 0 under
    /// [`MatchingStrategy::Liberal`].
    pub fn match_by_substring(&self, query: &str) -> Result<FuzzyMatches<V>, TrieError> {
        self.match_by_substring_fuzzy(query, 0, MatchingStrategy::Liberal)
    }

    /// Fuzzy substring search with an error budget of `tolerance` under the
    /// given strategy. Results are produced lazily and unordered.
    pub fn match_by_substring_fuzzy(
        &self,
        query: &str,
        tolerance: usize,
        strategy: MatchingStrategy,
    ) -> Result<FuzzyMatches<V>, TrieError> {
        if query.is_empty() {
            return Err(TrieError::InvalidArgument("query must not be empty"));
        }
        Ok(FuzzyMatches::seed(
            Arc::clone(&self.root),
            query,
            tolerance,
            strategy,
        ))
    }
}

impl<V> Default for RadixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for RadixTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadixTree").field("len", &self.len()).finish()
    }
}

/// Recompute cached depths from `start` up to the root.
fn update_depths<V>(start: &Arc<Node<V>>) {
    let mut current = Arc::clone(start);
    loop {
        current.refresh_depth();
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
}

/// Depth-first enumeration of terminal descendants.
///
/// Each stack entry pairs a node with the full key accumulated from the root,
/// so yielding is allocation-light and never re-walks the path.
pub struct PrefixMatches<V> {
    stack: Vec<(Arc<Node<V>>, String)>,
}

impl<V: Clone> Iterator for PrefixMatches<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, key)) = self.stack.pop() {
            for edge in node.edges() {
                let mut child_key = String::with_capacity(key.len() + edge.label.len());
                child_key.push_str(&key);
                child_key.push_str(&edge.label);
                self.stack.push((edge.node, child_key));
            }
            if let Some(value) = node.value_clone() {
                return Some((key, value));
            }
        }
        None
    }
}

#[cfg(test)]
impl<V> RadixTree<V> {
    /// Walk the whole tree asserting every structural invariant.
    pub(crate) fn check_invariants(&self) {
        let mut terminals = 0usize;
        Self::check_node(&self.root, true, &mut terminals);
        assert_eq!(terminals, self.len(), "terminal count must match len()");
    }

    fn check_node(node: &Arc<Node<V>>, is_root: bool, terminals: &mut usize) {
        let (label, terminal, depth) = {
            let state = node.lock_state();
            (state.label.clone(), state.value.is_some(), state.depth)
        };
        if is_root {
            assert!(label.is_empty(), "root label must be empty");
            assert!(!terminal, "root must never be terminal");
        } else {
            assert!(!label.is_empty(), "non-root label must be non-empty");
        }
        if terminal {
            *terminals += 1;
        }

        let children: Vec<(char, Arc<Node<V>>)> = node
            .lock_children()
            .iter()
            .map(|(first, child)| (*first, Arc::clone(child)))
            .collect();

        let mut max_below = 0usize;
        for (first, child) in &children {
            let child_label = child.label();
            assert_eq!(
                child_label.chars().next(),
                Some(*first),
                "children must be keyed by their first character"
            );
            assert!(
                Arc::ptr_eq(&child.parent().expect("child has a parent"), node),
                "parent back-edge must point at the holding node"
            );
            let child_depth = child.lock_state().depth;
            max_below = max_below.max(child_label.chars().count() + child_depth);
        }
        assert_eq!(depth, max_below, "cached depth is stale");

        if !terminal && !is_root {
            assert_ne!(
                children.len(),
                1,
                "non-terminal single-child node must be fused"
            );
        }

        for (_, child) in children {
            Self::check_node(&child, false, terminals);
        }
    }
}
