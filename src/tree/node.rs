//! Radix node internals.
//!
//! Ownership runs strong downward (`Arc` from parent to child) and weak
//! upward (`Weak` back-edge), so the parent/child cycle never leaks. A node's
//! label, value and cached depth share one mutex; the children map has its
//! own, so searches can snapshot a child list without blocking value updates
//! elsewhere in the tree.
//!
//! Lock ordering is strictly root-ward: a thread holding a node's children
//! lock may take locks on that node's children, never on its ancestors.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use ahash::AHashMap;

/// Fields guarded by the node's own mutex.
pub(crate) struct NodeState<V> {
    /// Edge label on the way into this node. Empty only at the root.
    pub label: String,
    /// Payload; present exactly on terminal nodes.
    pub value: Option<V>,
    /// Maximum number of characters on any path strictly below this node.
    pub depth: usize,
}

/// A single node of the compacted trie.
pub(crate) struct Node<V> {
    state: Mutex<NodeState<V>>,
    /// Children keyed by the first character of their label. The radix
    /// invariant guarantees at most one child per first character.
    children: Mutex<AHashMap<char, Arc<Node<V>>>>,
    /// Back-edge for upward compaction; dangling at the root.
    parent: Mutex<Weak<Node<V>>>,
}

/// Snapshot of one outgoing edge, taken under the children lock.
pub(crate) struct EdgeSnapshot<V> {
    pub node: Arc<Node<V>>,
    pub label: Arc<str>,
    pub depth: usize,
}

impl<V> Node<V> {
    /// The root node: empty label, no value, no parent.
    pub fn root() -> Arc<Self> {
        Arc::new(Node {
            state: Mutex::new(NodeState {
                label: String::new(),
                value: None,
                depth: 0,
            }),
            children: Mutex::new(AHashMap::new()),
            parent: Mutex::new(Weak::new()),
        })
    }

    /// A fresh child with `depth` 0; the caller links it into the parent's
    /// children map and fixes up ancestor depths.
    pub fn child(label: String, value: Option<V>, parent: &Arc<Self>) -> Arc<Self> {
        debug_assert!(!label.is_empty(), "non-root labels must be non-empty");
        Arc::new(Node {
            state: Mutex::new(NodeState {
                label,
                value,
                depth: 0,
            }),
            children: Mutex::new(AHashMap::new()),
            parent: Mutex::new(Arc::downgrade(parent)),
        })
    }

    pub fn lock_state(&self) -> MutexGuard<'_, NodeState<V>> {
        self.state.lock().expect("node state mutex poisoned")
    }

    pub fn lock_children(&self) -> MutexGuard<'_, AHashMap<char, Arc<Node<V>>>> {
        self.children.lock().expect("node children mutex poisoned")
    }

    /// Upgrade the parent back-edge. `None` at the root, or transiently for a
    /// node that has been unlinked by a concurrent removal.
    pub fn parent(&self) -> Option<Arc<Node<V>>> {
        self.parent
            .lock()
            .expect("node parent mutex poisoned")
            .upgrade()
    }

    pub fn set_parent(&self, parent: &Arc<Node<V>>) {
        *self.parent.lock().expect("node parent mutex poisoned") = Arc::downgrade(parent);
    }

    /// Clone of the edge label.
    pub fn label(&self) -> String {
        self.lock_state().label.clone()
    }

    /// Swap in a value, returning the previous one.
    pub fn replace_value(&self, value: V) -> Option<V> {
        self.lock_state().value.replace(value)
    }

    /// Take the value out, demoting the node to non-terminal.
    pub fn take_value(&self) -> Option<V> {
        self.lock_state().value.take()
    }

    /// Recompute this node's depth from its children's cached depths.
    ///
    /// Takes the children lock, then each child's state lock, which respects
    /// the root-ward ordering. The result is written back under the node's
    /// own state lock after the children lock is released.
    pub fn refresh_depth(&self) {
        let depth = {
            let children = self.lock_children();
            children
                .values()
                .map(|child| {
                    let state = child.lock_state();
                    state.label.chars().count() + state.depth
                })
                .max()
                .unwrap_or(0)
        };
        self.lock_state().depth = depth;
    }

    /// Snapshot every outgoing edge: child handle, label and cached depth.
    ///
    /// Labels and depths are read while the children lock is held, because
    /// splits and fuses relabel a child only under its parent's children
    /// lock. The snapshot stays valid even if the tree mutates afterwards.
    pub fn edges(&self) -> Vec<EdgeSnapshot<V>> {
        let children = self.lock_children();
        children
            .values()
            .map(|node| {
                let (label, depth) = {
                    let state = node.lock_state();
                    (Arc::<str>::from(state.label.as_str()), state.depth)
                };
                EdgeSnapshot {
                    node: Arc::clone(node),
                    label,
                    depth,
                }
            })
            .collect()
    }

    /// Clone of the value, for result emission.
    pub fn value_clone(&self) -> Option<V>
    where
        V: Clone,
    {
        self.lock_state().value.clone()
    }
}

/// Byte length of the longest common character prefix of `a` and `b`.
pub(crate) fn common_prefix_len(a: &str, b: &str) -> usize {
    let mut len = 0;
    let mut left = a.chars();
    let mut right = b.chars();
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) if x == y => len += x.len_utf8(),
            _ => return len,
        }
    }
}
