#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz insert/lookup/remove with arbitrary utf-8 tokens
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let tree = fuzzle::RadixTree::new();
    let mut inserted = Vec::new();
    for (i, token) in text.split(',').take(64).enumerate() {
        if tree.put(token, i).is_ok() {
            inserted.push(token);
        }
    }
    for token in &inserted {
        assert!(tree.get(token).is_some(), "inserted key must be readable");
    }
    let _ = tree.match_by_prefix("").count();
    for token in inserted {
        let _ = tree.remove(token);
    }
    assert!(tree.is_empty());
});
