// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A pluggable in-memory R-tree spatial index implementing Guttman's 1984
//! `ChooseLeaf`, `AdjustTree` and quadratic `SplitNode` algorithms by default,
//! with each of the three swappable independently via [`config::RTreeConfig`].
//!
//! ```
//! use rtree_core::{Rect, Tree};
//!
//! let mut tree: Tree<&str> = Tree::new();
//! tree.insert("a", Rect::new(0.0, 0.0, 1.0, 1.0).unwrap());
//! tree.insert("b", Rect::new(5.0, 5.0, 6.0, 6.0).unwrap());
//!
//! let hits: Vec<&str> = tree
//!     .query(Rect::new(0.0, 0.0, 2.0, 2.0).unwrap())
//!     .map(|id| *tree.entry(id).data().unwrap())
//!     .collect();
//! assert_eq!(hits, vec!["a"]);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod node;
pub mod strategies;
pub mod traversal;
pub mod tree;

pub use config::RTreeConfig;
pub use error::RTreeError;
pub use geometry::Rect;
pub use node::{Entry, EntryId, EntryKind, Node, NodeId};
pub use tree::Tree;
