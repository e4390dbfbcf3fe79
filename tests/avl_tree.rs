use std::collections::BTreeSet;

use avl_engine::{AvlTree, NodeView, Rotation, SearchOutcome};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 1_000;

/// Keys drawn from a narrow range so inserts and deletes collide often.
fn key_strategy() -> impl Strategy<Value = i64> {
    -500i64..500i64
}

/// Upper bound on the height of an AVL tree holding `n` keys.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn avl_height_bound(n: usize) -> u32 {
    (1.44 * ((n + 2) as f64).log2()).ceil() as u32
}

fn shape(tree: &AvlTree<i64>) -> Vec<(i64, Option<i64>, Option<i64>)> {
    tree.snapshot()
        .nodes
        .into_iter()
        .map(|node| (node.key, node.left, node.right))
        .collect()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i64),
    Delete(i64),
    Search(i64),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        5 => key_strategy().prop_map(TreeOp::Insert),
        3 => key_strategy().prop_map(TreeOp::Delete),
        2 => key_strategy().prop_map(TreeOp::Search),
    ]
}

// ─── Concrete rebalancing cases ──────────────────────────────────────────────

#[test]
fn ascending_insert_rotates_left() {
    let mut tree = AvlTree::new();
    assert_eq!(tree.insert(10).rotation, None);
    assert_eq!(tree.insert(20).rotation, None);
    assert_eq!(tree.insert(30).rotation, Some(Rotation::RR));

    let snapshot = tree.snapshot();
    assert_eq!(snapshot.root, Some(20));
    assert_eq!(
        snapshot.nodes,
        vec![
            NodeView { key: 20, left: Some(10), right: Some(30), height: 2, depth: 0, balance: 0 },
            NodeView { key: 10, left: None, right: None, height: 1, depth: 1, balance: 0 },
            NodeView { key: 30, left: None, right: None, height: 1, depth: 1, balance: 0 },
        ]
    );
}

#[test]
fn left_right_zigzag() {
    let mut tree = AvlTree::new();
    tree.insert(30);
    tree.insert(10);
    let mutation = tree.insert(20);
    assert!(mutation.changed);
    assert_eq!(mutation.rotation, Some(Rotation::LR));
    assert_eq!(shape(&tree), vec![(20, Some(10), Some(30)), (10, None, None), (30, None, None)]);
}

#[test]
fn right_left_zigzag() {
    let mut tree = AvlTree::new();
    tree.insert(10);
    tree.insert(30);
    assert_eq!(tree.insert(20).rotation, Some(Rotation::RL));
    assert_eq!(shape(&tree), vec![(20, Some(10), Some(30)), (10, None, None), (30, None, None)]);
}

#[test]
fn descending_build_then_delete() {
    let mut tree = AvlTree::new();
    let rotations: Vec<_> = [5, 4, 3, 2, 1].into_iter().map(|key| tree.insert(key).rotation).collect();
    assert_eq!(rotations, vec![None, None, Some(Rotation::LL), None, Some(Rotation::LL)]);
    assert_eq!(shape(&tree), vec![
        (4, Some(2), Some(5)),
        (2, Some(1), Some(3)),
        (1, None, None),
        (3, None, None),
        (5, None, None),
    ]);

    let mutation = tree.delete(&1);
    assert!(mutation.changed);
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
    assert!(tree.check_invariants().is_ok());

    // 4 is now left-heavy by two with a right-leaning left child.
    let mutation = tree.delete(&5);
    assert_eq!(mutation.rotation, Some(Rotation::LR));
    assert_eq!(shape(&tree), vec![(3, Some(2), Some(4)), (2, None, None), (4, None, None)]);
}

#[test]
fn delete_reports_outermost_rotation() {
    // Removing 12 rotates at 11 and then again at the root.
    let mut tree: AvlTree<i64> = [8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1].into_iter().collect();
    assert_eq!(tree.height(), 5);
    let mutation = tree.delete(&12);
    assert_eq!(mutation.rotation, Some(Rotation::LL));
    assert_eq!(tree.height(), 4);
    assert_eq!(tree.snapshot().root, Some(5));
}

#[test]
fn delete_root_with_two_children() {
    let mut tree = AvlTree::from([20, 10, 30, 25, 40]);
    assert!(tree.delete(&20).changed);
    assert_eq!(shape(&tree), vec![
        (25, Some(10), Some(30)),
        (10, None, None),
        (30, None, Some(40)),
        (40, None, None),
    ]);
}

#[test]
fn delete_to_empty() {
    let mut tree = AvlTree::from([1, 2, 3]);
    for key in [2, 1, 3] {
        assert!(tree.delete(&key).changed);
    }
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.snapshot().root, None);
}

// ─── No-op cases ─────────────────────────────────────────────────────────────

#[test]
fn duplicate_insert_keeps_shape() {
    let mut tree = AvlTree::from([50, 30, 70, 20, 40]);
    let before = tree.snapshot();
    let mutation = tree.insert(40);
    assert!(!mutation.changed);
    assert_eq!(mutation.rotation, None);
    assert_eq!(tree.snapshot(), before);
}

#[test]
fn absent_delete_keeps_shape() {
    let mut tree = AvlTree::from([50, 30, 70, 20, 40]);
    let before = tree.snapshot();
    let mutation = tree.delete(&45);
    assert!(!mutation.changed);
    assert_eq!(mutation.rotation, None);
    assert_eq!(tree.snapshot(), before);

    let mut empty: AvlTree<i64> = AvlTree::new();
    assert!(!empty.delete(&1).changed);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[test]
fn search_hit_and_miss_paths() {
    let tree = AvlTree::from([50, 30, 70, 20, 40, 60, 80]);
    assert_eq!(tree.search(&40), SearchOutcome { found: true, path: vec![50, 30, 40] });
    assert_eq!(tree.search(&65), SearchOutcome { found: false, path: vec![50, 70, 60] });
    assert_eq!(tree.search(&50), SearchOutcome { found: true, path: vec![50] });

    let empty: AvlTree<i64> = AvlTree::new();
    assert_eq!(empty.search(&1), SearchOutcome { found: false, path: vec![] });
}

#[test]
fn balance_is_rederived_per_key() {
    let tree = AvlTree::from([50, 30, 70, 20]);
    assert_eq!(tree.balance_of(&50), Some(1));
    assert_eq!(tree.balance_of(&30), Some(1));
    assert_eq!(tree.balance_of(&20), Some(0));
    assert_eq!(tree.balance_of(&99), None);
    assert_eq!(tree.root_balance(), 1);
}

#[test]
fn clear_resets_tree() {
    let mut tree: AvlTree<i64> = (0..100).collect();
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert!(!tree.contains(&5));
    tree.insert(5);
    assert_eq!(tree.snapshot().root, Some(5));
}

#[test]
fn sequential_inserts_stay_shallow() {
    let tree: AvlTree<i64> = (0..10_000).collect();
    assert_eq!(tree.len(), 10_000);
    assert!(tree.height() <= avl_height_bound(10_000));
    assert!(tree.check_invariants().is_ok());
}

// ─── Randomized model checks ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random operations on both AvlTree and BTreeSet.
    #[test]
    fn ops_match_btreeset(ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE)) {
        let mut tree: AvlTree<i64> = AvlTree::new();
        let mut model: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                TreeOp::Insert(key) => {
                    prop_assert_eq!(tree.insert(*key).changed, model.insert(*key), "insert({})", key);
                }
                TreeOp::Delete(key) => {
                    prop_assert_eq!(tree.delete(key).changed, model.remove(key), "delete({})", key);
                }
                TreeOp::Search(key) => {
                    let outcome = tree.search(key);
                    prop_assert_eq!(outcome.found, model.contains(key), "search({})", key);
                    if outcome.found {
                        prop_assert_eq!(outcome.path.last(), Some(key));
                    }
                }
            }
            prop_assert!(tree.check_invariants().is_ok(), "invariants after {:?}", op);
            prop_assert_eq!(tree.len(), model.len(), "len mismatch after {:?}", op);
        }

        let keys: Vec<i64> = tree.iter().copied().collect();
        let expected: Vec<i64> = model.into_iter().collect();
        prop_assert_eq!(keys, expected);
    }

    /// Every snapshot node carries a balance factor in -1..=1 and links that
    /// respect key order.
    #[test]
    fn snapshot_is_consistent(keys in proptest::collection::vec(key_strategy(), 0..TEST_SIZE)) {
        let tree: AvlTree<i64> = keys.iter().copied().collect();
        let snapshot = tree.snapshot();
        prop_assert_eq!(snapshot.len(), tree.len());
        prop_assert_eq!(snapshot.height(), tree.height());

        for node in &snapshot.nodes {
            prop_assert!((-1..=1).contains(&node.balance));
            if let Some(left) = node.left {
                prop_assert!(left < node.key);
                prop_assert_eq!(snapshot.get(&left).map(|child| child.depth), Some(node.depth + 1));
            }
            if let Some(right) = node.right {
                prop_assert!(right > node.key);
                prop_assert_eq!(snapshot.get(&right).map(|child| child.depth), Some(node.depth + 1));
            }
            prop_assert_eq!(tree.balance_of(&node.key), Some(node.balance));
        }
    }

    /// Heights stay within the AVL bound for any distinct key sequence.
    #[test]
    fn height_is_logarithmic(keys in proptest::collection::btree_set(any::<i64>(), 1..TEST_SIZE)) {
        let n = keys.len();
        let tree: AvlTree<i64> = keys.into_iter().collect();
        prop_assert!(tree.height() <= avl_height_bound(n), "height {} for {} keys", tree.height(), n);
    }

    /// A miss path ends at a node whose child on the search side is absent.
    #[test]
    fn miss_path_ends_at_divergence(
        keys in proptest::collection::vec(key_strategy(), 1..200),
        probe in key_strategy(),
    ) {
        let tree: AvlTree<i64> = keys.iter().copied().collect();
        let outcome = tree.search(&probe);
        if !outcome.found {
            let last = *outcome.path.last().unwrap();
            let node = tree.find_node(&last).unwrap();
            if probe < last {
                prop_assert_eq!(node.left, None);
            } else {
                prop_assert_eq!(node.right, None);
            }
        }
    }

    /// Inserting a key twice yields the same shape as inserting it once.
    #[test]
    fn insert_is_idempotent(keys in proptest::collection::vec(key_strategy(), 0..200), extra in key_strategy()) {
        let mut once: AvlTree<i64> = keys.iter().copied().collect();
        once.insert(extra);
        let mut twice = once.clone();
        twice.insert(extra);
        prop_assert_eq!(once.snapshot(), twice.snapshot());
    }
}
