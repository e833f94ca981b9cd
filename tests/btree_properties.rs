//! Property tests for the B-tree engine.
//!
//! Random distinct key sets in random insertion orders must always
//! produce a structurally valid tree whose scan is the sorted key set
//! and whose searches agree with every insert.

use proptest::prelude::*;
use rosterdb::{BTree, IndexKey, InsertOutcome, RecordAddr};
use tempfile::tempdir;

const COURSES: [&str; 4] = ["ALG", "MAT", "POR", "QUI"];

/// Strategy: a deduplicated set of (student, course) pairs in arbitrary
/// order. Student ids cover 000..=199, so collisions are common enough
/// that dedup matters.
fn key_set() -> impl Strategy<Value = Vec<IndexKey>> {
    prop::collection::vec((0u32..200, 0usize..COURSES.len()), 1..60).prop_map(|pairs| {
        let mut keys: Vec<IndexKey> = pairs
            .into_iter()
            .map(|(id, c)| IndexKey::new(&format!("{:03}", id), COURSES[c]).unwrap())
            .collect();
        let mut seen = std::collections::HashSet::new();
        keys.retain(|k| seen.insert(*k));
        keys
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn scan_is_always_the_sorted_key_set(keys in key_set()) {
        let dir = tempdir().unwrap();
        let mut tree = BTree::create(dir.path().join("index.db")).unwrap();

        for (i, key) in keys.iter().enumerate() {
            let outcome = tree.insert(key, RecordAddr::new(i as i64)).unwrap();
            prop_assert_eq!(outcome, InsertOutcome::Inserted);
        }
        tree.check_invariants().unwrap();

        let scanned: Vec<IndexKey> = tree.scan().unwrap().into_iter().map(|(k, _)| k).collect();
        let mut expected = keys.clone();
        expected.sort();
        prop_assert_eq!(scanned, expected);
    }

    #[test]
    fn search_agrees_with_every_insert(keys in key_set()) {
        let dir = tempdir().unwrap();
        let mut tree = BTree::create(dir.path().join("index.db")).unwrap();

        for (i, key) in keys.iter().enumerate() {
            tree.insert(key, RecordAddr::new(1000 + i as i64)).unwrap();
        }

        for (i, key) in keys.iter().enumerate() {
            let hit = tree.search(key).unwrap();
            prop_assert_eq!(hit.unwrap().addr, RecordAddr::new(1000 + i as i64));
        }
    }

    #[test]
    fn reinserting_any_key_is_rejected_without_growth(keys in key_set()) {
        let dir = tempdir().unwrap();
        let mut tree = BTree::create(dir.path().join("index.db")).unwrap();

        for (i, key) in keys.iter().enumerate() {
            tree.insert(key, RecordAddr::new(i as i64)).unwrap();
        }
        let pages_before = tree.page_count();

        for key in &keys {
            let outcome = tree.insert(key, RecordAddr::new(9999)).unwrap();
            prop_assert_eq!(outcome, InsertOutcome::Duplicate);
        }
        prop_assert_eq!(tree.page_count(), pages_before);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn invariants_hold_after_every_single_insert(keys in key_set()) {
        let dir = tempdir().unwrap();
        let mut tree = BTree::create(dir.path().join("index.db")).unwrap();

        for (i, key) in keys.iter().enumerate() {
            tree.insert(key, RecordAddr::new(i as i64)).unwrap();
            tree.check_invariants().unwrap();
        }
    }
}
