//! Benchmarks for suffix tree construction and window segmentation

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;
use trieseg_core::{Scorer, SegmentationWindow, SuffixTree, Trie, DEFAULT_TRIE_DEPTH};

const WORDS: &[&str] = &[
    "walk", "walked", "walking", "walks", "talk", "talked", "talking", "talks", "stalk",
    "stalked", "chalk", "balk",
];

/// Generate `count` terminated documents from the word list
fn generate_documents(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{}$", WORDS[i % WORDS.len()].repeat(1 + i % 3)))
        .collect()
}

fn benchmark_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for count in [100, 1_000] {
        let documents = generate_documents(count);
        let symbols: usize = documents.iter().map(|d| d.chars().count()).sum();

        group.throughput(Throughput::Elements(symbols as u64));
        group.bench_function(format!("generalized_{count}_documents"), |b| {
            b.iter(|| {
                let mut tree = SuffixTree::generalized();
                for document in &documents {
                    tree.add_document(black_box(document)).unwrap();
                }
                tree
            });
        });
    }

    let text = format!("{}$", WORDS.concat().repeat(200));
    group.throughput(Throughput::Elements(text.chars().count() as u64));
    group.bench_function("simple_long_document", |b| {
        b.iter(|| {
            let mut tree = SuffixTree::simple();
            tree.add_document(black_box(&text)).unwrap();
            tree
        });
    });

    group.finish();
}

fn benchmark_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");
    group.sample_size(20);

    let mut tree = SuffixTree::generalized();
    for document in generate_documents(200) {
        tree.add_document(&document).unwrap();
    }
    let trie = Trie::from_suffix_tree(&tree, DEFAULT_TRIE_DEPTH);
    let input = WORDS.concat().repeat(20);

    for window in [6, 10] {
        group.throughput(Throughput::Elements(input.chars().count() as u64));
        group.bench_function(format!("window_{window}"), |b| {
            b.iter(|| {
                let mut segmenter = SegmentationWindow::new(&trie, Scorer::default(), window).unwrap();
                let mut segments = 0usize;
                for symbol in black_box(&input).chars() {
                    segments += usize::from(segmenter.push(symbol).is_some());
                }
                segments + usize::from(segmenter.finish().is_some())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_construction, benchmark_segmentation);
criterion_main!(benches);
