//! Construction and query tests for the suffix tree engine

use proptest::prelude::*;
use trieseg_core::*;

fn build(kind: TreeKind, docs: &[String]) -> SuffixTree {
    let mut tree = SuffixTree::new(kind, DEFAULT_TERMINATOR);
    for doc in docs {
        tree.add_document(&format!("{doc}$")).unwrap();
    }
    tree
}

/// Length of the longest prefix of `query` occurring in any document
fn longest_known_prefix(docs: &[String], query: &str) -> usize {
    let chars: Vec<char> = query.chars().collect();
    (0..=chars.len())
        .rev()
        .find(|&k| {
            let prefix: String = chars[..k].iter().collect();
            docs.iter().any(|doc| doc.contains(&prefix))
        })
        .unwrap_or(0)
}

#[test]
fn test_windowed_construction_scenario() {
    let tree = build(TreeKind::Simple, &["abcabxabcd".to_string()]);
    assert!(tree.search("ab").is_some());
    assert!(tree.search("xyz").is_none());
}

#[test]
fn test_longest_path_counts_matched_prefix_only() {
    let tree = build(TreeKind::Simple, &["banana".to_string()]);
    assert!(tree.search("anana$").is_some());

    let point = tree.longest_path("nanyx", ActivePoint::root()).unwrap();
    assert_eq!(point.length, 3);
}

#[test]
fn test_longest_path_from_inner_point() {
    let tree = build(TreeKind::Simple, &["banana".to_string()]);
    let first = tree.longest_path("ban", ActivePoint::root()).unwrap();
    let point = tree.longest_path("anax", first).unwrap();
    assert_eq!(point.length, 6);
    assert_eq!(point.phase, 6);
}

#[test]
fn test_report_round_trip_on_corpus() {
    let docs: Vec<String> = ["walked", "walks", "talked", "talking", "walk"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let tree = build(TreeKind::Generalized, &docs);

    let report = write_report(&tree, 2);
    let profile = parse_report(&report).unwrap();
    let expected = ReportProfile::from_tree(&tree, 2);

    assert_eq!(profile.nodes, expected.nodes);
    assert_eq!(profile.branching_nodes(), expected.branching_nodes());
    assert_eq!(profile, expected);
}

#[test]
fn test_branching_forward_and_reversed() {
    let docs = ["walked", "walks", "talked"];
    let forward = build(
        TreeKind::Generalized,
        &docs.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
    );
    let reversed = build(
        TreeKind::Generalized,
        &docs
            .iter()
            .map(|s| s.chars().rev().collect::<String>())
            .collect::<Vec<_>>(),
    );

    let mut listener = BranchingListener::new();
    TreeWalker::walk(forward.root(), &forward, &mut listener);
    let left = listener.into_results();

    let mut listener = BranchingListener::reversed();
    TreeWalker::walk(reversed.root(), &reversed, &mut listener);
    let right = listener.into_results();

    let combined = combine_or(&left, &right);
    let labels: Vec<&str> = combined.iter().map(|b| b.label.as_str()).collect();
    assert!(labels.contains(&"walk"));
    assert!(labels.contains(&"alked"));
    assert!(labels.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_cancelled_construction() {
    let token = CancelToken::new();
    token.cancel();
    let mut tree = SuffixTree::generalized();
    assert_eq!(
        tree.add_document_with_cancel("abc$", Some(&token)),
        Err(CoreError::Interrupted)
    );
}

proptest! {
    #[test]
    fn prop_every_suffix_is_reachable(docs in prop::collection::vec("[abc]{1,12}", 1..6)) {
        let tree = build(TreeKind::Generalized, &docs);
        for doc in 0..tree.document_count() {
            let symbols = tree.document(doc).unwrap().to_vec();
            for start in 0..symbols.len() {
                prop_assert!(tree.contains_path(&symbols[start..]));
            }
        }
    }

    #[test]
    fn prop_one_leaf_per_suffix(docs in prop::collection::vec("[ab]{1,10}", 1..5)) {
        let tree = build(TreeKind::Generalized, &docs);
        for (doc, text) in docs.iter().enumerate() {
            prop_assert_eq!(tree.leaves_of(doc), text.chars().count() + 1);
        }
        let total: usize = docs.iter().map(|d| d.chars().count() + 1).sum();
        prop_assert_eq!(tree.leaf_counts()[tree.root()], total);
    }

    #[test]
    fn prop_longest_path_matches_brute_force(
        docs in prop::collection::vec("[abc]{1,10}", 1..4),
        query in "[abcd]{1,8}",
    ) {
        let tree = build(TreeKind::Generalized, &docs);
        let expected = longest_known_prefix(&docs, &query);
        match tree.longest_path(&query, ActivePoint::root()) {
            Some(point) => prop_assert_eq!(point.length, expected),
            None => prop_assert_eq!(expected, 0),
        }
    }

    #[test]
    fn prop_search_finds_every_substring(doc in "[abc]{1,15}", start in 0usize..15, len in 1usize..6) {
        let tree = build(TreeKind::Simple, std::slice::from_ref(&doc));
        let chars: Vec<char> = doc.chars().collect();
        let start = start % chars.len();
        let end = (start + len).min(chars.len());
        let pattern: String = chars[start..end].iter().collect();
        prop_assert!(tree.search(&pattern).is_some());
    }
}
