// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The `Tree` container: two arenas (nodes, entries), a root handle, the fanout
//! bounds, and the three pluggable strategy function pointers that drive inserts.

use generational_arena::Arena;
use tracing::{debug, trace};

#[cfg(debug_assertions)]
use crate::error::RTreeError;
use crate::geometry::Rect;
use crate::node::{Entry, EntryId, Node, NodeId};
use crate::strategies::{AdjustTreeFn, ChooseLeafFn, SplitNodeFn};

/// A pluggable in-memory R-tree.
///
/// `T` is the opaque payload attached to each leaf entry. The tree never inspects
/// `T`; it only ever compares and unions the [`Rect`]s attached to entries.
pub struct Tree<T> {
    pub(crate) nodes: Arena<Node>,
    pub(crate) entries: Arena<Entry<T>>,
    pub(crate) root: NodeId,
    pub(crate) max_entries: usize,
    pub(crate) min_entries: usize,
    pub(crate) choose_leaf: ChooseLeafFn<T>,
    pub(crate) adjust_tree: AdjustTreeFn<T>,
    pub(crate) split_node: SplitNodeFn<T>,
}

impl<T> Tree<T> {
    /// Builds a tree with the default Guttman strategies, `max_entries = `
    /// [`crate::config::DEFAULT_MAX_ENTRIES`] and `min_entries = ceil(max_entries / 2)`.
    ///
    /// Use [`crate::config::RTreeConfig`] to customize the fanout or to swap in
    /// different strategies.
    pub fn new() -> Tree<T> {
        crate::config::RTreeConfig::new(crate::config::DEFAULT_MAX_ENTRIES)
            .build()
            .expect("default fanout is always valid")
    }

    /// Builds an empty tree with explicit fanout bounds and strategy function
    /// pointers, bypassing [`crate::config::RTreeConfig`]'s validation. Callers
    /// plugging in their own `choose_leaf`/`adjust_tree`/`split_node` are
    /// responsible for upholding the same contracts the Guttman strategies do.
    pub fn with_strategies(
        max_entries: usize,
        min_entries: usize,
        choose_leaf: ChooseLeafFn<T>,
        adjust_tree: AdjustTreeFn<T>,
        split_node: SplitNodeFn<T>,
    ) -> Tree<T> {
        let mut nodes = Arena::new();
        let root = NodeId(nodes.insert(Node::new(0, true)));
        Tree {
            nodes,
            entries: Arena::new(),
            root,
            max_entries,
            min_entries,
            choose_leaf,
            adjust_tree,
            split_node,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn min_entries(&self) -> usize {
        self.min_entries
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.node(self.root).is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes
            .get(id.0)
            .expect("NodeId outlived the tree it was produced from")
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes
            .get_mut(id.0)
            .expect("NodeId outlived the tree it was produced from")
    }

    pub fn entry(&self, id: EntryId) -> &Entry<T> {
        self.entries
            .get(id.0)
            .expect("EntryId outlived the tree it was produced from")
    }

    pub(crate) fn entry_mut(&mut self, id: EntryId) -> &mut Entry<T> {
        self.entries
            .get_mut(id.0)
            .expect("EntryId outlived the tree it was produced from")
    }

    /// The bounding rect of a node: the union of its entries' rects, computed fresh
    /// every call. Panics if `node` has no entries (only possible transiently, never
    /// observable between calls into the tree).
    pub(crate) fn node_rect(&self, node: NodeId) -> Rect {
        let n = self.node(node);
        let mut iter = n.entries().iter();
        let first = *iter
            .next()
            .expect("node_rect called on an entryless node");
        let mut rect = *self.entry(first).rect();
        for &id in iter {
            rect = rect.union(self.entry(id).rect());
        }
        rect
    }

    /// Inserts `data` under `rect`, returning the handle of the new leaf entry.
    ///
    /// `rect` is already validated by construction ([`Rect::new`] is the only way to
    /// produce one), so insertion itself cannot fail on malformed geometry.
    pub fn insert(&mut self, data: T, rect: Rect) -> EntryId {
        trace!(?rect, "insert");
        let leaf = (self.choose_leaf)(self, &rect);
        let entry_id = EntryId(self.entries.insert(Entry::new_leaf(rect, data)));
        self.node_mut(leaf).entries.push(entry_id);

        let split = if self.node(leaf).len() > self.max_entries {
            debug!(node = ?leaf, "leaf overflow, splitting");
            let sibling = (self.split_node)(self, leaf);
            self.debug_check_split_contract(leaf, sibling);
            Some(sibling)
        } else {
            None
        };
        (self.adjust_tree)(self, leaf, split);
        entry_id
    }

    /// Panics with [`RTreeError::StrategyContractViolation`]'s message if a split
    /// strategy left either resulting node still overflowing. Only ever runs in
    /// debug builds: a release build trusts its own strategies and does not pay for
    /// the check (§7).
    #[cfg(debug_assertions)]
    fn debug_check_split_contract(&self, n: NodeId, sibling: NodeId) {
        let n_len = self.node(n).len();
        let sibling_len = self.node(sibling).len();
        if n_len > self.max_entries || sibling_len > self.max_entries {
            panic!(
                "{}",
                RTreeError::StrategyContractViolation(format!(
                    "split_node left an overflowing node: {n_len} and {sibling_len} entries (max {})",
                    self.max_entries
                ))
            );
        }
    }

    #[cfg(not(debug_assertions))]
    fn debug_check_split_contract(&self, _n: NodeId, _sibling: NodeId) {}

    /// A lazy pre-order walk of every node reachable from the root.
    pub fn traverse(&self) -> crate::traversal::Traverse<'_, T> {
        crate::traversal::Traverse::new(self)
    }

    /// A lazy level-order (breadth-first) walk of every node reachable from the root.
    pub fn traverse_level_order(&self) -> crate::traversal::TraverseLevelOrder<'_, T> {
        crate::traversal::TraverseLevelOrder::new(self)
    }

    /// A lazy pre-order walk rooted at `node` rather than the tree root.
    pub fn traverse_node(&self, node: NodeId) -> crate::traversal::Traverse<'_, T> {
        crate::traversal::Traverse::rooted_at(self, node)
    }

    /// A lazy pre-order walk that yields every node but only descends into a node's
    /// children when `descend(node)` returns `true` — the node itself is always
    /// yielded, only its subtree is skipped.
    pub fn traverse_pruned<P>(&self, descend: P) -> crate::traversal::TraversePruned<'_, T, P>
    where
        P: FnMut(NodeId) -> bool,
    {
        crate::traversal::TraversePruned::rooted_at(self, self.root, descend)
    }

    /// [`Tree::traverse_pruned`], rooted at `node` rather than the tree root.
    pub fn traverse_node_pruned<P>(
        &self,
        node: NodeId,
        descend: P,
    ) -> crate::traversal::TraversePruned<'_, T, P>
    where
        P: FnMut(NodeId) -> bool,
    {
        crate::traversal::TraversePruned::rooted_at(self, node, descend)
    }

    /// [`Tree::traverse_level_order`] with the same yield-but-don't-descend pruning
    /// contract as [`Tree::traverse_pruned`].
    pub fn traverse_level_order_pruned<P>(
        &self,
        descend: P,
    ) -> crate::traversal::TraverseLevelOrderPruned<'_, T, P>
    where
        P: FnMut(NodeId) -> bool,
    {
        crate::traversal::TraverseLevelOrderPruned::new(self, descend)
    }

    /// All leaf entries whose rect intersects `rect`, skipping subtrees whose cover
    /// does not intersect `rect`.
    pub fn query(&self, rect: Rect) -> crate::traversal::Query<'_, T> {
        crate::traversal::Query::new(self, rect)
    }

    /// All nodes (of any level) whose cover intersects `rect`, skipping subtrees
    /// whose cover does not.
    pub fn query_nodes(&self, rect: Rect) -> crate::traversal::QueryNodes<'_, T> {
        crate::traversal::QueryNodes::new(self, rect)
    }

    /// All leaf entries matching `predicate`, visiting every leaf entry in the tree
    /// (no subtree pruning).
    pub fn search<P>(&self, predicate: P) -> crate::traversal::Search<'_, T, P>
    where
        P: FnMut(&Entry<T>) -> bool,
    {
        crate::traversal::Search::new(self, predicate)
    }

    /// All nodes matching `predicate`, visiting every node in the tree (no subtree
    /// pruning).
    pub fn search_nodes<P>(&self, predicate: P) -> crate::traversal::SearchNodes<'_, T, P>
    where
        P: FnMut(&Node) -> bool,
    {
        crate::traversal::SearchNodes::new(self, predicate)
    }

    /// The node ids at each level, indexed by [`Node::level`] (`[0]` holds the
    /// leaves; the root is the last, possibly singleton, group).
    pub fn get_levels(&self) -> Vec<Vec<NodeId>> {
        let mut levels: Vec<Vec<NodeId>> = Vec::new();
        for node in self.traverse() {
            let level = self.node(node).level();
            if levels.len() <= level {
                levels.resize(level + 1, Vec::new());
            }
            levels[level].push(node);
        }
        levels
    }

    /// Every node id in the tree, in pre-order.
    pub fn get_nodes(&self) -> Vec<NodeId> {
        self.traverse().collect()
    }

    /// Every leaf node id in the tree, in pre-order.
    pub fn get_leaves(&self) -> Vec<NodeId> {
        self.traverse()
            .filter(|&id| self.node(id).is_leaf())
            .collect()
    }

    /// Every leaf entry id in the tree, in the pre-order their owning leaves are visited.
    pub fn get_leaf_entries(&self) -> Vec<EntryId> {
        self.get_leaves()
            .into_iter()
            .flat_map(|leaf| self.node(leaf).entries().iter().copied())
            .collect()
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Tree<T> {
        Tree::new()
    }
}

impl<T> std::fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("max_entries", &self.max_entries)
            .field("min_entries", &self.min_entries)
            .field("root", &self.root)
            .field("node_count", &self.nodes.len())
            .field("entry_count", &self.entries.len())
            .finish()
    }
}
