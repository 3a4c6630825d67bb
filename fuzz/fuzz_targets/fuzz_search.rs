#![no_main]

use fuzzle::MatchingStrategy;
use libfuzzer_sys::fuzz_target;

const STRATEGIES: [MatchingStrategy; 7] = [
    MatchingStrategy::Liberal,
    MatchingStrategy::MatchPrefix,
    MatchingStrategy::AnchorToPrefix,
    MatchingStrategy::FuzzyPostfix,
    MatchingStrategy::Typo,
    MatchingStrategy::Swap,
    MatchingStrategy::Wildcard,
];

fuzz_target!(|data: &[u8]| {
    // First two bytes pick tolerance and strategy; the rest is the query
    if data.len() < 3 {
        return;
    }
    let tolerance = (data[0] % 4) as usize;
    let strategy = STRATEGIES[(data[1] as usize) % STRATEGIES.len()];
    let Ok(query) = std::str::from_utf8(&data[2..]) else {
        return;
    };

    let tree = fuzzle::RadixTree::new();
    for (i, key) in [
        "the quick brown fox",
        "jumps over",
        "the lazy dog",
        "pack my box",
        "with five dozen",
        "liquor jugs",
    ]
    .iter()
    .enumerate()
    {
        tree.put(key, i).unwrap();
    }

    if let Ok(results) = tree.match_by_substring_fuzzy(query, tolerance, strategy) {
        for result in results.take(256) {
            assert!(result.errors <= tolerance, "budget must be respected");
            assert!(!result.matched_substring.is_empty() || result.matches == 0);
        }
    }
});
