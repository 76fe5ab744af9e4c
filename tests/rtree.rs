// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Structural invariants and end-to-end scenarios checked on randomized workloads.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rtree_core::{EntryId, NodeId, Rect, RTreeConfig, Tree};

fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rect {
    Rect::new(min_x, min_y, max_x, max_y).unwrap()
}

/// Routes this crate's `tracing` spans to the test harness's captured output.
/// Safe to call from every test: `try_init` is a no-op once a subscriber is set.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn small_rect_at(rng: &mut StdRng) -> Rect {
    let x = rng.gen_range(-1000.0..1000.0);
    let y = rng.gen_range(-1000.0..1000.0);
    let w = rng.gen_range(0.0..5.0);
    let h = rng.gen_range(0.0..5.0);
    rect(x, y, x + w, y + h)
}

/// Walks every node and checks the structural invariants a well-formed R-tree must
/// hold after any sequence of inserts: leaf homogeneity by subtree, fanout bounds
/// (root excluded), parent-entry rect containment, and level monotonicity.
fn assert_invariants<T>(tree: &Tree<T>) {
    let root = tree.root();
    let levels = tree.get_levels();
    assert_eq!(
        levels.last(),
        Some(&vec![root]),
        "the last level group is exactly the root"
    );

    for node_id in tree.get_nodes() {
        let node = tree.node(node_id);

        if node_id != root {
            assert!(
                node.len() >= tree.min_entries(),
                "non-root node below min_entries"
            );
        }
        assert!(
            node.len() <= tree.max_entries(),
            "node above max_entries"
        );

        for &entry_id in node.entries() {
            let entry = tree.entry(entry_id);
            if let Some(child) = entry.child_node() {
                let child_node = tree.node(child);
                assert_eq!(
                    child_node.level() + 1,
                    node.level(),
                    "child level must be exactly one less than its parent"
                );
                assert_eq!(
                    child_node.parent_entry(),
                    Some(entry_id),
                    "child's parent_entry must point back at this entry"
                );
                assert_eq!(
                    child_node.parent_node(),
                    Some(node_id),
                    "child's parent_node must point back at this node"
                );
                assert!(!child_node.is_empty(), "non-leaf entry's child has no entries");

                let union = child_node
                    .entries()
                    .iter()
                    .map(|&id| *tree.entry(id).rect())
                    .reduce(|a, b| a.union(&b))
                    .unwrap();
                assert_eq!(
                    *entry.rect(),
                    union,
                    "parent entry rect must equal the union of its child's entries"
                );
            }
        }

        let all_leaf = node.entries().iter().all(|&id| tree.entry(id).is_leaf());
        let all_child = node.entries().iter().all(|&id| !tree.entry(id).is_leaf());
        assert!(
            node.is_empty() || all_leaf || all_child,
            "a node's entries must be homogeneously leaf or non-leaf"
        );
        assert_eq!(node.is_leaf(), all_leaf || node.is_empty());
    }
}

fn collect_entry_data<T: Copy + Ord>(tree: &Tree<T>) -> Vec<T> {
    let mut data: Vec<T> = tree
        .get_leaf_entries()
        .into_iter()
        .map(|id| *tree.entry(id).data().unwrap())
        .collect();
    data.sort();
    data
}

#[test]
fn invariants_hold_after_many_random_inserts() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(42);
    let mut tree: Tree<u32> = Tree::new();
    for i in 0..500u32 {
        let r = small_rect_at(&mut rng);
        tree.insert(i, r);
        if i % 17 == 0 {
            assert_invariants(&tree);
        }
    }
    assert_invariants(&tree);

    let expected: Vec<u32> = (0..500).collect();
    assert_eq!(collect_entry_data(&tree), expected);
}

#[test]
fn invariants_hold_with_a_small_custom_fanout() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut tree: Tree<u32> = RTreeConfig::new(4).with_min_entries(2).build().unwrap();
    for i in 0..300u32 {
        tree.insert(i, small_rect_at(&mut rng));
        assert_invariants(&tree);
    }
}

#[test]
fn query_returns_exactly_the_intersecting_entries() {
    let mut tree: Tree<&str> = Tree::new();
    let inside = tree.insert("inside", rect(1.0, 1.0, 2.0, 2.0));
    let touching = tree.insert("touching", rect(3.0, 0.0, 4.0, 1.0));
    let outside = tree.insert("outside", rect(100.0, 100.0, 101.0, 101.0));

    let hits: HashSet<EntryId> = tree.query(rect(0.0, 0.0, 3.0, 3.0)).collect();
    assert!(hits.contains(&inside));
    assert!(hits.contains(&touching));
    assert!(!hits.contains(&outside));
}

#[test]
fn query_nodes_prunes_subtrees_outside_the_window() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut tree: Tree<u32> = RTreeConfig::new(4).build().unwrap();
    for i in 0..100u32 {
        tree.insert(i, small_rect_at(&mut rng));
    }

    let window = rect(-2000.0, -2000.0, -1900.0, -1900.0);
    let matched: Vec<NodeId> = tree.query_nodes(window).collect();
    for node_id in matched {
        assert!(tree
            .node(node_id)
            .entries()
            .iter()
            .any(|&id| tree.entry(id).rect().intersects(&window)));
    }
}

#[test]
fn search_visits_every_leaf_entry_regardless_of_location() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut tree: Tree<u32> = Tree::new();
    for i in 0..80u32 {
        tree.insert(i, small_rect_at(&mut rng));
    }
    let evens: Vec<u32> = tree
        .search(|entry| entry.data().unwrap() % 2 == 0)
        .map(|id| *tree.entry(id).data().unwrap())
        .collect();
    assert_eq!(evens.len(), 40);
}

#[test]
fn traverse_visits_every_node_exactly_once() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut tree: Tree<u32> = RTreeConfig::new(4).build().unwrap();
    for i in 0..150u32 {
        tree.insert(i, small_rect_at(&mut rng));
    }
    let pre_order: Vec<NodeId> = tree.traverse().collect();
    let level_order: Vec<NodeId> = tree.traverse_level_order().collect();
    assert_eq!(pre_order.len(), level_order.len());

    let pre_set: HashSet<NodeId> = pre_order.into_iter().collect();
    let level_set: HashSet<NodeId> = level_order.into_iter().collect();
    assert_eq!(pre_set, level_set);
}

#[test]
fn traverse_pruned_always_false_yields_exactly_the_root() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut tree: Tree<u32> = RTreeConfig::new(4).build().unwrap();
    for i in 0..50u32 {
        tree.insert(i, small_rect_at(&mut rng));
    }
    let visited: Vec<NodeId> = tree.traverse_pruned(|_| false).collect();
    assert_eq!(visited, vec![tree.root()]);
}

#[test]
fn single_insert_leaves_a_one_level_tree() {
    let mut tree: Tree<&str> = Tree::new();
    tree.insert("only", rect(0.0, 0.0, 1.0, 1.0));
    assert_eq!(tree.get_nodes().len(), 1);
    assert!(tree.node(tree.root()).is_leaf());
}

#[test]
fn overflowing_the_default_fanout_grows_the_tree() {
    let mut tree: Tree<u32> = RTreeConfig::new(4).build().unwrap();
    for i in 0..5u32 {
        let x = i as f64;
        tree.insert(i, rect(x, x, x + 0.1, x + 0.1));
    }
    assert!(tree.get_nodes().len() > 1, "5th insert must force a split");
    assert_invariants(&tree);
}

/// `a(0,0,3,3) b(2,2,4,4) c(1,1,2,4) d(8,8,10,10) e(7,7,9,9)` with `M=4, m=2`:
/// the fifth insert overflows the root, forcing a quadratic split that seeds on
/// the maximal-dead-space pair. `a`/`c` (tight around the origin) and `d` (far
/// away) are the only candidates with large dead space, so `(a, b, c)` and
/// `(d, e)` end up in separate leaves no matter which of `a`/`c` is chosen as
/// the seed alongside `d`.
fn build_e2() -> Tree<char> {
    let mut tree: Tree<char> = RTreeConfig::new(4).build().unwrap();
    tree.insert('a', rect(0.0, 0.0, 3.0, 3.0));
    tree.insert('b', rect(2.0, 2.0, 4.0, 4.0));
    tree.insert('c', rect(1.0, 1.0, 2.0, 4.0));
    tree.insert('d', rect(8.0, 8.0, 10.0, 10.0));
    tree.insert('e', rect(7.0, 7.0, 9.0, 9.0));
    tree
}

fn leaf_labels(tree: &Tree<char>, leaf: NodeId) -> HashSet<char> {
    tree.node(leaf)
        .entries()
        .iter()
        .map(|&id| *tree.entry(id).data().unwrap())
        .collect()
}

#[test]
fn e2_root_splits_into_two_leaves_grouped_by_locality() {
    let tree = build_e2();
    assert_invariants(&tree);

    let leaves = tree.get_leaves();
    assert_eq!(leaves.len(), 2, "must have split into exactly two leaves");
    for &leaf in &leaves {
        assert_eq!(tree.node(leaf).level(), 0);
    }

    let root = tree.node(tree.root());
    assert!(!root.is_leaf());
    assert_eq!(root.len(), 2, "root must have exactly two non-leaf entries");

    let mut groups: Vec<HashSet<char>> = leaves.iter().map(|&leaf| leaf_labels(&tree, leaf)).collect();
    groups.sort_by_key(|g| g.len());
    assert_eq!(groups[0], HashSet::from(['d', 'e']));
    assert_eq!(groups[1], HashSet::from(['a', 'b', 'c']));
}

#[test]
fn e3_query_prunes_the_unrelated_branch() {
    let tree = build_e2();
    let hits: HashSet<char> = tree
        .query(rect(7.5, 7.5, 8.5, 8.5))
        .map(|id| *tree.entry(id).data().unwrap())
        .collect();
    assert_eq!(hits, HashSet::from(['d', 'e']));

    let visited_leaves: HashSet<NodeId> = tree
        .query_nodes(rect(7.5, 7.5, 8.5, 8.5))
        .filter(|&id| tree.node(id).is_leaf())
        .collect();
    assert_eq!(visited_leaves.len(), 1, "only the (d, e) leaf should be visited");
    assert_eq!(leaf_labels(&tree, *visited_leaves.iter().next().unwrap()), HashSet::from(['d', 'e']));
}

#[test]
fn e4_search_matches_only_the_predicate() {
    let tree = build_e2();
    let hits: HashSet<char> = tree
        .search(|entry| *entry.data().unwrap() == 'c')
        .map(|id| *tree.entry(id).data().unwrap())
        .collect();
    assert_eq!(hits, HashSet::from(['c']));
}

#[test]
fn e5_identical_rects_break_ties_deterministically() {
    let build = || {
        let mut tree: Tree<u32> = RTreeConfig::new(4).build().unwrap();
        for i in 0..10u32 {
            tree.insert(i, rect(0.0, 0.0, 1.0, 1.0));
        }
        tree
    };
    let first = build();
    let second = build();
    assert_eq!(first.get_levels().len(), second.get_levels().len());
    for (a, b) in first.get_levels().iter().zip(second.get_levels().iter()) {
        assert_eq!(a.len(), b.len(), "identical workloads must produce identically shaped trees");
    }
    assert_invariants(&first);
}

#[test]
fn e6_level_order_visits_root_then_its_children() {
    let tree = build_e2();
    let order: Vec<NodeId> = tree.traverse_level_order().collect();
    assert_eq!(order[0], tree.root());
    let root_children: HashSet<NodeId> = tree
        .node(tree.root())
        .entries()
        .iter()
        .map(|&id| tree.entry(id).child_node().unwrap())
        .collect();
    let next_two: HashSet<NodeId> = order[1..3].iter().copied().collect();
    assert_eq!(next_two, root_children);
}

#[test]
fn e1_empty_tree_has_no_entries() {
    let tree: Tree<char> = Tree::new();
    assert_eq!(tree.query(rect(0.0, 0.0, 1.0, 1.0)).count(), 0);
    assert!(tree.get_leaf_entries().is_empty());
    assert_eq!(tree.get_nodes(), vec![tree.root()]);
    assert!(tree.node(tree.root()).is_leaf());
    assert!(tree.node(tree.root()).is_empty());
}
