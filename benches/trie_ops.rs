//! Performance benchmarks for fuzzle
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fuzzle::{MatchingStrategy, RadixTree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic key corpus with heavy prefix sharing
fn sample_keys(count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let stems = ["index", "inter", "match", "radix", "search", "string"];
    (0..count)
        .map(|_| {
            let stem = stems[rng.gen_range(0..stems.len())];
            let suffix_len = rng.gen_range(0..10);
            let suffix: String = (0..suffix_len)
                .map(|_| (b'a' + rng.gen_range(0..26u8)) as char)
                .collect();
            format!("{stem} {suffix}")
        })
        .collect()
}

fn build_tree(keys: &[String]) -> RadixTree<usize> {
    let tree = RadixTree::new();
    for (i, key) in keys.iter().enumerate() {
        tree.put(key, i).unwrap();
    }
    tree
}

fn bench_put(c: &mut Criterion) {
    let keys = sample_keys(1000);
    c.bench_function("put_1000", |b| {
        b.iter(|| {
            let tree = RadixTree::new();
            for (i, key) in keys.iter().enumerate() {
                tree.put(black_box(key), i).unwrap();
            }
            tree
        })
    });
}

fn bench_get(c: &mut Criterion) {
    let keys = sample_keys(1000);
    let tree = build_tree(&keys);
    c.bench_function("get_hit", |b| {
        b.iter(|| {
            for key in keys.iter().take(100) {
                black_box(tree.get(black_box(key)));
            }
        })
    });
    c.bench_function("get_miss", |b| {
        b.iter(|| black_box(tree.get(black_box("never inserted"))))
    });
}

fn bench_prefix_scan(c: &mut Criterion) {
    let keys = sample_keys(1000);
    let tree = build_tree(&keys);
    c.bench_function("prefix_scan", |b| {
        b.iter(|| tree.match_by_prefix(black_box("ind")).count())
    });
}

fn bench_fuzzy_search(c: &mut Criterion) {
    let keys = sample_keys(1000);
    let tree = build_tree(&keys);

    let mut group = c.benchmark_group("fuzzy_search");
    for (name, query, tolerance, strategy) in [
        ("exact_substring", "earc", 0, MatchingStrategy::Liberal),
        ("liberal_tol1", "serch", 1, MatchingStrategy::Liberal),
        ("match_prefix", "match", 0, MatchingStrategy::MatchPrefix),
        ("typo_tol2", "serach", 2, MatchingStrategy::Typo),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &query, |b, &q| {
            b.iter(|| {
                tree.match_by_substring_fuzzy(black_box(q), tolerance, strategy)
                    .unwrap()
                    .count()
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_put,
    bench_get,
    bench_prefix_scan,
    bench_fuzzy_search
);
criterion_main!(benches);
