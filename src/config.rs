// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The construction surface: [`RTreeConfig`] validates a fanout and strategy
//! triple before a [`crate::tree::Tree`] ever exists, so a live tree can assume
//! its own invariants hold.

use crate::error::RTreeError;
use crate::strategies::{
    guttman_adjust_tree, guttman_choose_leaf, guttman_split_node, AdjustTreeFn, ChooseLeafFn,
    SplitNodeFn,
};
use crate::tree::Tree;

/// The default maximum fanout used by [`Tree::new`] and [`RTreeConfig::new`]'s
/// siblings when no explicit value is given.
pub const DEFAULT_MAX_ENTRIES: usize = 8;

/// A builder that validates `max_entries`/`min_entries` and lets the three
/// strategies be swapped before a [`Tree`] is built.
pub struct RTreeConfig<T> {
    max_entries: usize,
    min_entries: Option<usize>,
    choose_leaf: ChooseLeafFn<T>,
    adjust_tree: AdjustTreeFn<T>,
    split_node: SplitNodeFn<T>,
}

impl<T> RTreeConfig<T> {
    /// Starts a config with `max_entries` and the default Guttman strategies.
    /// `min_entries` defaults to `ceil(max_entries / 2)` unless overridden.
    pub fn new(max_entries: usize) -> RTreeConfig<T> {
        RTreeConfig {
            max_entries,
            min_entries: None,
            choose_leaf: guttman_choose_leaf,
            adjust_tree: guttman_adjust_tree,
            split_node: guttman_split_node,
        }
    }

    /// Overrides the default `min_entries`. Validated against `max_entries` in
    /// [`RTreeConfig::build`], not here.
    pub fn with_min_entries(mut self, min_entries: usize) -> RTreeConfig<T> {
        self.min_entries = Some(min_entries);
        self
    }

    /// Swaps in a different leaf-selection strategy.
    pub fn with_choose_leaf(mut self, choose_leaf: ChooseLeafFn<T>) -> RTreeConfig<T> {
        self.choose_leaf = choose_leaf;
        self
    }

    /// Swaps in a different tree-adjustment strategy.
    pub fn with_adjust_tree(mut self, adjust_tree: AdjustTreeFn<T>) -> RTreeConfig<T> {
        self.adjust_tree = adjust_tree;
        self
    }

    /// Swaps in a different split strategy.
    pub fn with_split_node(mut self, split_node: SplitNodeFn<T>) -> RTreeConfig<T> {
        self.split_node = split_node;
        self
    }

    /// Validates the fanout and builds an empty [`Tree`].
    ///
    /// Fails with [`RTreeError::InvalidFanout`] unless `max_entries >= 2` and
    /// `1 <= min_entries <= ceil(max_entries / 2)`.
    pub fn build(self) -> Result<Tree<T>, RTreeError> {
        let min_entries = self
            .min_entries
            .unwrap_or_else(|| self.max_entries.div_ceil(2));

        if self.max_entries < 2
            || min_entries < 1
            || min_entries > self.max_entries.div_ceil(2)
        {
            return Err(RTreeError::InvalidFanout {
                max_entries: self.max_entries,
                min_entries,
            });
        }

        Ok(Tree::with_strategies(
            self.max_entries,
            min_entries,
            self.choose_leaf,
            self.adjust_tree,
            self.split_node,
        ))
    }
}
