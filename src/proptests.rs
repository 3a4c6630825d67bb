//! Model-based property tests.
//!
//! Random interleavings of `put`/`remove`/`get` run against a `BTreeMap`
//! model; after every run the structural invariants are re-checked and the
//! full enumeration is compared against the model. Key strategies lean on
//! small alphabets and shared prefixes so splits, fuses and deep chains are
//! exercised constantly.

use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::search::MatchingStrategy;
use crate::tree::RadixTree;

#[derive(Debug, Clone)]
struct Key(String);

impl Arbitrary for Key {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            // dense shared prefixes to force splits and fuses
            "[ab]{1,6}".prop_map(Key),
            "[a-e]{1,10}".prop_map(Key),
            // keys with word separators
            "[a-z]{1,4} [a-z]{1,4}".prop_map(Key),
            // a long shared suffix under varied prefixes
            "[a-z]{2,8}".prop_map(|s| Key(format!("{s}/suffix"))),
        ]
        .boxed()
    }
}

#[derive(Arbitrary, Debug, Clone)]
enum Action {
    Put(Key, u16),
    Remove(Key),
    Get(Key),
}

fn run_actions(actions: Vec<Action>) {
    let tree = RadixTree::new();
    let mut model: BTreeMap<String, u16> = BTreeMap::new();

    for action in actions {
        match action {
            Action::Put(Key(key), value) => {
                let previous = tree.put(&key, value).expect("generated keys are valid");
                assert_eq!(previous, model.insert(key, value));
            }
            Action::Remove(Key(key)) => {
                assert_eq!(tree.remove(&key).ok(), model.remove(&key));
            }
            Action::Get(Key(key)) => {
                assert_eq!(tree.get(&key), model.get(&key).copied());
            }
        }
        assert_eq!(tree.len(), model.len());
    }

    tree.check_invariants();

    let mut enumerated: Vec<(String, u16)> = tree.match_by_prefix("").collect();
    enumerated.sort();
    let expected: Vec<(String, u16)> = model.into_iter().collect();
    assert_eq!(enumerated, expected, "full enumeration must match the model");
}

proptest! {
    #[test]
    fn test_tree_matches_model(actions in prop::collection::vec(any::<Action>(), 1..200)) {
        run_actions(actions);
    }

    #[test]
    fn test_exact_substring_agrees_with_naive_scan(
        keys in prop::collection::btree_set("[a-d]{1,8}", 1..24),
        query in "[a-d]{1,4}",
    ) {
        let tree = RadixTree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.put(key, i).unwrap();
        }
        let mut found: Vec<String> = tree
            .match_by_substring(&query)
            .unwrap()
            .map(|r| r.sequence)
            .collect();
        found.sort();
        found.dedup();
        let expected: Vec<String> = keys
            .iter()
            .filter(|key| key.contains(&query))
            .cloned()
            .collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn test_tolerance_monotonicity(
        keys in prop::collection::btree_set("[a-c]{1,6}", 1..16),
        query in "[a-c]{1,4}",
        tolerance in 0usize..3,
    ) {
        let tree = RadixTree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.put(key, i).unwrap();
        }
        let narrow: std::collections::BTreeSet<String> = tree
            .match_by_substring_fuzzy(&query, tolerance, MatchingStrategy::Liberal)
            .unwrap()
            .map(|r| r.sequence)
            .collect();
        let wide: std::collections::BTreeSet<String> = tree
            .match_by_substring_fuzzy(&query, tolerance + 1, MatchingStrategy::Liberal)
            .unwrap()
            .map(|r| r.sequence)
            .collect();
        prop_assert!(
            narrow.is_subset(&wide),
            "raising tolerance must never lose results: {:?} vs {:?}",
            narrow,
            wide
        );
    }

    #[test]
    fn test_prefix_scan_agrees_with_model(
        keys in prop::collection::btree_set("[a-c]{1,8}", 1..24),
        prefix in "[a-c]{0,3}",
    ) {
        let tree = RadixTree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.put(key, i).unwrap();
        }
        let mut found: Vec<String> = tree.match_by_prefix(&prefix).map(|(k, _)| k).collect();
        found.sort();
        let expected: Vec<String> = keys
            .iter()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();
        prop_assert_eq!(found, expected);
    }
}
