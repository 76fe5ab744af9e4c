// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Guttman's 1984 `ChooseLeaf`, `AdjustTree` and quadratic `SplitNode`, the
//! default strategies a [`crate::tree::Tree`] is built with.

use tracing::{debug, info, trace};

use crate::geometry::Rect;
use crate::node::{Entry, EntryId, Node, NodeId};
use crate::tree::Tree;

/// Descends from the root choosing, at each non-leaf level, the entry requiring
/// least enlargement to cover `rect`. Ties go to the entry with the smaller area,
/// and further ties to whichever entry was encountered first.
pub fn guttman_choose_leaf<T>(tree: &Tree<T>, rect: &Rect) -> NodeId {
    let mut current = tree.root();
    loop {
        let node = tree.node(current);
        if node.is_leaf() {
            return current;
        }

        let mut best: Option<(EntryId, f64, f64)> = None;
        for &candidate in node.entries() {
            let entry = tree.entry(candidate);
            let enlargement = entry.rect().enlargement(rect);
            let area = entry.rect().area();
            let replace = match best {
                None => true,
                Some((_, best_enlargement, best_area)) => {
                    enlargement < best_enlargement
                        || (enlargement == best_enlargement && area < best_area)
                }
            };
            if replace {
                best = Some((candidate, enlargement, area));
            }
        }

        let (chosen, enlargement, area) = best.expect("non-leaf node has no entries");
        trace!(entry = ?chosen, enlargement, area, "choose_leaf");
        current = tree
            .entry(chosen)
            .child_node()
            .expect("non-leaf entry without a child node");
    }
}

/// Walks from `n` (and, if present, its split sibling `nn`) up to the root,
/// refreshing parent-entry rects and recursively splitting ancestors that overflow.
/// Grows the tree by one level when the root itself must split.
pub fn guttman_adjust_tree<T>(tree: &mut Tree<T>, n: NodeId, nn: Option<NodeId>) {
    let mut n = n;
    let mut nn = nn;

    loop {
        trace!(node = ?n, "adjust_tree ascending");
        let parent_node = tree.node(n).parent_node();
        let parent_entry = tree.node(n).parent_entry();

        let (pn, p_entry) = match (parent_node, parent_entry) {
            (Some(pn), Some(p_entry)) => (pn, p_entry),
            _ => {
                // `n` is the root.
                match nn {
                    None => return,
                    Some(nn_id) => {
                        grow_root(tree, n, nn_id);
                        return;
                    }
                }
            }
        };

        tree.entry_mut(p_entry).rect = tree.node_rect(n);

        match nn {
            None => {
                n = pn;
                nn = None;
            }
            Some(nn_id) => {
                let nn_rect = tree.node_rect(nn_id);
                let q = EntryId(tree.entries.insert(Entry::new_child(nn_rect, nn_id)));
                tree.node_mut(pn).entries.push(q);
                tree.node_mut(nn_id).parent_node = Some(pn);
                tree.node_mut(nn_id).parent_entry = Some(q);

                if tree.node(pn).len() > tree.max_entries() {
                    debug!(node = ?pn, "ancestor overflow, splitting");
                    let pn2 = (tree.split_node)(tree, pn);
                    n = pn;
                    nn = Some(pn2);
                } else {
                    n = pn;
                    nn = None;
                }
            }
        }
    }
}

fn grow_root<T>(tree: &mut Tree<T>, n: NodeId, nn: NodeId) {
    let new_level = tree.node(n).level() + 1;
    info!(new_level, "growing root");
    let n_rect = tree.node_rect(n);
    let nn_rect = tree.node_rect(nn);

    let new_root = NodeId(tree.nodes.insert(Node::new(new_level, false)));
    let n_entry = EntryId(tree.entries.insert(Entry::new_child(n_rect, n)));
    let nn_entry = EntryId(tree.entries.insert(Entry::new_child(nn_rect, nn)));

    tree.node_mut(new_root).entries = vec![n_entry, nn_entry];
    tree.node_mut(n).parent_node = Some(new_root);
    tree.node_mut(n).parent_entry = Some(n_entry);
    tree.node_mut(nn).parent_node = Some(new_root);
    tree.node_mut(nn).parent_entry = Some(nn_entry);
    tree.root = new_root;
}

/// Quadratic-cost split: picks the two entries that waste the most area if grouped
/// together as seeds, then assigns the rest one at a time to whichever seed's group
/// needs the least enlargement, forcing the remainder into the other group once one
/// group has so few free slots left that it must take everything remaining to reach
/// `min_entries`.
pub fn guttman_split_node<T>(tree: &mut Tree<T>, n: NodeId) -> NodeId {
    let is_leaf = tree.node(n).is_leaf();
    let level = tree.node(n).level();
    let m = tree.min_entries();
    let entries: Vec<EntryId> = tree.node(n).entries().to_vec();
    trace!(node = ?n, count = entries.len(), "split_node");

    let (seed1, seed2) = pick_seeds(tree, &entries);

    let mut group1 = vec![seed1];
    let mut group2 = vec![seed2];
    let mut rect1 = *tree.entry(seed1).rect();
    let mut rect2 = *tree.entry(seed2).rect();
    let mut remaining: Vec<EntryId> = entries
        .into_iter()
        .filter(|&e| e != seed1 && e != seed2)
        .collect();

    let max_group_size = tree.max_entries() + 1 - m;

    while !remaining.is_empty() {
        if group1.len() == max_group_size {
            group2.extend(remaining.drain(..));
            break;
        }
        if group2.len() == max_group_size {
            group1.extend(remaining.drain(..));
            break;
        }

        let (idx, into_group1) = pick_next(tree, &remaining, &rect1, &rect2, &group1, &group2);
        let candidate = remaining.remove(idx);
        if into_group1 {
            rect1 = rect1.union(tree.entry(candidate).rect());
            group1.push(candidate);
        } else {
            rect2 = rect2.union(tree.entry(candidate).rect());
            group2.push(candidate);
        }
    }

    debug!(
        ?seed1,
        ?seed2,
        group1 = group1.len(),
        group2 = group2.len(),
        "split_node"
    );

    let sibling = NodeId(tree.nodes.insert(Node::new(level, is_leaf)));
    for &entry_id in &group2 {
        if let Some(child) = tree.entry(entry_id).child_node() {
            tree.node_mut(child).parent_node = Some(sibling);
        }
    }
    tree.node_mut(sibling).entries = group2;
    tree.node_mut(n).entries = group1;
    sibling
}

/// The pair of entries with maximal dead space, ties broken by order of encounter.
fn pick_seeds<T>(tree: &Tree<T>, entries: &[EntryId]) -> (EntryId, EntryId) {
    let mut best: Option<(EntryId, EntryId, f64)> = None;
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let a = tree.entry(entries[i]).rect();
            let b = tree.entry(entries[j]).rect();
            let dead_space = a.dead_space(b);
            let replace = match best {
                None => true,
                Some((_, _, best_dead_space)) => dead_space > best_dead_space,
            };
            if replace {
                best = Some((entries[i], entries[j], dead_space));
            }
        }
    }
    let (a, b, _) = best.expect("split_node called on a node with fewer than two entries");
    (a, b)
}

/// The remaining entry (by index into `remaining`) with the greatest preference for
/// one group over the other, and which group it prefers. Ties on preference margin
/// are broken by order of encounter; ties on which group to assign to are broken by
/// smaller resulting group cover area, then by smaller current group size, then by
/// order of encounter.
fn pick_next<T>(
    tree: &Tree<T>,
    remaining: &[EntryId],
    rect1: &Rect,
    rect2: &Rect,
    group1: &[EntryId],
    group2: &[EntryId],
) -> (usize, bool) {
    let mut best: Option<(usize, bool, f64)> = None;
    for (idx, &candidate) in remaining.iter().enumerate() {
        let rect = tree.entry(candidate).rect();
        let d1 = rect1.enlargement(rect);
        let d2 = rect2.enlargement(rect);
        let preference = (d1 - d2).abs();

        let into_group1 = if d1 < d2 {
            true
        } else if d2 < d1 {
            false
        } else {
            let area1 = rect1.union(rect).area();
            let area2 = rect2.union(rect).area();
            if area1 < area2 {
                true
            } else if area2 < area1 {
                false
            } else {
                group1.len() <= group2.len()
            }
        };

        let replace = match best {
            None => true,
            Some((_, _, best_preference)) => preference > best_preference,
        };
        if replace {
            best = Some((idx, into_group1, preference));
        }
    }
    let (idx, into_group1, _) = best.expect("pick_next called with no remaining entries");
    (idx, into_group1)
}
