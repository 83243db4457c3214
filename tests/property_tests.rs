//! Property tests for spinney
//!
//! Random operation sequences are run against both trees and checked against `BTreeSet` and
//! against each tree's own `verify`.

use proptest::prelude::*;
use spinney::{LlrbTree, SplayTree, StringLlrbTree, StringSplayTree};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8),
    Search(u8),
    Remove(u8),
    PopFirst,
    PopLast,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u8>().prop_map(Op::Insert),
        2 => any::<u8>().prop_map(Op::Search),
        3 => any::<u8>().prop_map(Op::Remove),
        1 => Just(Op::PopFirst),
        1 => Just(Op::PopLast),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op_strategy(), 0..400)
}

// ============================================================================
// LlrbTree Property Tests
// ============================================================================

proptest! {
    /// Test that every operation agrees with a BTreeSet and leaves the colour rules intact
    #[test]
    fn prop_llrb_matches_model(ops in ops_strategy()) {
        let mut tree = LlrbTree::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => prop_assert_eq!(tree.insert(k), Ok(model.insert(k))),
                Op::Search(k) => prop_assert_eq!(tree.search(&k), model.get(&k)),
                Op::Remove(k) => prop_assert_eq!(tree.remove(&k), model.take(&k)),
                Op::PopFirst => prop_assert_eq!(tree.pop_first(), model.pop_first()),
                Op::PopLast => prop_assert_eq!(tree.pop_last(), model.pop_last()),
            }
            prop_assert_eq!(tree.verify(), Ok(()));
            prop_assert_eq!(tree.count(), model.len());
        }

        prop_assert!(tree.iter().eq(model.iter()));
    }

    /// Test that the height never exceeds twice the height of a perfectly balanced tree
    #[test]
    fn prop_llrb_height_bound(keys in proptest::collection::vec(any::<u32>(), 1..2000)) {
        let mut tree = LlrbTree::new();
        for k in keys {
            let _ = tree.insert(k);
        }

        let bound = 2 * (usize::BITS - tree.count().leading_zeros()) as usize;
        prop_assert!(tree.height() <= bound);
    }

    /// Test that inserting then searching finds the element, and removing then searching does not
    #[test]
    fn prop_llrb_round_trip(keys in proptest::collection::btree_set(any::<i64>(), 1..200), extra in any::<i64>()) {
        prop_assume!(!keys.contains(&extra));

        let mut tree = LlrbTree::new();
        for &k in &keys {
            let _ = tree.insert(k);
        }

        prop_assert_eq!(tree.insert(extra), Ok(true));
        prop_assert_eq!(tree.search(&extra), Some(&extra));
        prop_assert_eq!(tree.remove(&extra), Some(extra));
        prop_assert_eq!(tree.search(&extra), None);
        prop_assert_eq!(tree.count(), keys.len());
    }

    /// Test that a second insert of the same key changes nothing
    #[test]
    fn prop_llrb_no_duplicates(keys in proptest::collection::vec(any::<u8>(), 1..200), again in any::<u8>()) {
        let mut tree = LlrbTree::new();
        for k in keys {
            let _ = tree.insert(k);
        }
        let _ = tree.insert(again);

        let count = tree.count();
        let rotations = tree.rotations();
        prop_assert_eq!(tree.insert(again), Ok(false));
        prop_assert_eq!(tree.count(), count);
        prop_assert_eq!(tree.rotations(), rotations);
        prop_assert_eq!(tree.iter().filter(|&&k| k == again).count(), 1);
    }

    /// Test that removing an absent key leaves the tree exactly as it was
    #[test]
    fn prop_llrb_remove_miss_unchanged(keys in proptest::collection::btree_set(0u16..1000, 0..200), missing in 1000u16..2000) {
        let mut tree = LlrbTree::new();
        for &k in &keys {
            let _ = tree.insert(k);
        }

        let before: Vec<u16> = tree.iter().copied().collect();
        let root = tree.root().copied();
        let rotations = tree.rotations();

        prop_assert_eq!(tree.remove(&missing), None);
        prop_assert_eq!(tree.rotations(), rotations);
        prop_assert_eq!(tree.root().copied(), root);
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), before);
        prop_assert_eq!(tree.verify(), Ok(()));
    }
}

// ============================================================================
// SplayTree Property Tests
// ============================================================================

proptest! {
    /// Test that every operation agrees with a BTreeSet and keeps the elements in order
    #[test]
    fn prop_splay_matches_model(ops in ops_strategy()) {
        let mut tree = SplayTree::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => prop_assert_eq!(tree.insert(k), Ok(model.insert(k))),
                Op::Search(k) => prop_assert_eq!(tree.search(&k), model.get(&k)),
                Op::Remove(k) => prop_assert_eq!(tree.remove(&k), model.take(&k)),
                Op::PopFirst => prop_assert_eq!(tree.pop_first(), model.pop_first()),
                Op::PopLast => prop_assert_eq!(tree.pop_last(), model.pop_last()),
            }
            prop_assert_eq!(tree.verify(), Ok(()));
            prop_assert_eq!(tree.count(), model.len());
        }

        prop_assert!(tree.iter().eq(model.iter()));
    }

    /// Test that a successful search or insert leaves the accessed key at the root
    #[test]
    fn prop_splay_access_moves_to_root(keys in proptest::collection::vec(any::<u16>(), 1..300), pick in any::<prop::sample::Index>()) {
        let mut tree = SplayTree::new();
        for &k in &keys {
            let _ = tree.insert(k);
            prop_assert_eq!(tree.root(), Some(&k));
        }

        let k = *pick.get(&keys);
        prop_assert_eq!(tree.search(&k), Some(&k));
        prop_assert_eq!(tree.root(), Some(&k));
    }

    /// Test that a miss leaves one of the key's neighbours at the root
    #[test]
    fn prop_splay_miss_neighbour_at_root(keys in proptest::collection::btree_set(any::<u16>(), 1..300), missing in any::<u16>()) {
        prop_assume!(!keys.contains(&missing));

        let mut tree = SplayTree::new();
        for &k in &keys {
            let _ = tree.insert(k);
        }

        prop_assert_eq!(tree.search(&missing), None);

        let below = keys.range(..missing).next_back().copied();
        let above = keys.range(missing..).next().copied();
        let root = tree.root().copied();
        prop_assert!(root.is_some() && (root == below || root == above));
        prop_assert_eq!(tree.count(), keys.len());
        prop_assert_eq!(tree.verify(), Ok(()));
    }

    /// Test that a second insert of the same key changes nothing but the shape
    #[test]
    fn prop_splay_no_duplicates(keys in proptest::collection::vec(any::<u8>(), 1..200), again in any::<u8>()) {
        let mut tree = SplayTree::new();
        for k in keys {
            let _ = tree.insert(k);
        }
        let _ = tree.insert(again);

        let count = tree.count();
        prop_assert_eq!(tree.insert(again), Ok(false));
        prop_assert_eq!(tree.count(), count);
        prop_assert_eq!(tree.iter().filter(|&&k| k == again).count(), 1);
    }

    /// Test that the total number of splay steps stays within a constant multiple of N log N
    #[test]
    fn prop_splay_amortized_steps(ops in proptest::collection::vec(op_strategy(), 1..2000)) {
        let mut tree = SplayTree::new();
        let mut largest = 1;

        let n = ops.len() as u64;
        for op in ops {
            match op {
                Op::Insert(k) => { let _ = tree.insert(k); }
                Op::Search(k) => { let _ = tree.search(&k); }
                Op::Remove(k) => { let _ = tree.remove(&k); }
                Op::PopFirst => { let _ = tree.pop_first(); }
                Op::PopLast => { let _ = tree.pop_last(); }
            }
            largest = largest.max(tree.count());
        }

        let log = u64::from(usize::BITS - largest.leading_zeros());
        prop_assert!(tree.rotations() <= 16 * n * (log + 1));
    }
}

// ============================================================================
// String Tree Property Tests
// ============================================================================

proptest! {
    /// Test that the string trees agree with each other and with a sorted, deduplicated input
    #[test]
    fn prop_string_trees_agree(words in proptest::collection::vec("[a-z]{0,40}", 0..100)) {
        let mut llrb = StringLlrbTree::new();
        let mut splay = StringSplayTree::new();
        for w in &words {
            prop_assert_eq!(llrb.insert(w), splay.insert(w));
        }

        let expected: BTreeSet<&str> = words.iter().map(String::as_str).collect();
        prop_assert!(llrb.iter().eq(expected.iter().copied()));
        prop_assert!(splay.iter().eq(expected.iter().copied()));

        for w in &words {
            prop_assert_eq!(llrb.search(w), Some(w.as_str()));
            prop_assert_eq!(splay.search(w), Some(w.as_str()));
        }

        prop_assert_eq!(llrb.verify(), Ok(()));
        prop_assert_eq!(splay.verify(), Ok(()));
    }
}

// ============================================================================
// Workloads
// ============================================================================

/// Test that a large random workload keeps the splay step count near N log N
#[test]
fn splay_random_workload_steps() {
    use rand::prelude::*;

    const COUNT: u64 = 50000;

    let mut rng = SmallRng::seed_from_u64(42);
    let mut tree = SplayTree::new();

    for _ in 0..COUNT {
        let key: u32 = rng.random_range(0..20000);
        match rng.random_range(0..3) {
            0 => {
                let _ = tree.insert(key);
            }
            1 => {
                let _ = tree.search(&key);
            }
            _ => {
                let _ = tree.remove(&key);
            }
        }
    }

    let log = u64::from(usize::BITS - 20000usize.leading_zeros());
    assert!(tree.rotations() <= 8 * COUNT * log);
    assert_eq!(tree.verify(), Ok(()));
}

/// Test that a sorted sweep over an LLRB never needs more than a logarithmic height
#[test]
fn llrb_sorted_sweep_height() {
    let mut tree = LlrbTree::with_capacity(1 << 12);
    for key in 0..(1u32 << 12) {
        assert_eq!(tree.insert(key), Ok(true));
    }
    assert!(tree.height() <= 2 * 13);

    for key in 0..(1u32 << 11) {
        assert_eq!(tree.remove(&(key * 2)), Some(key * 2));
    }
    assert!(tree.height() <= 2 * 12);
    assert_eq!(tree.verify(), Ok(()));
}
