// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The node/entry graph: an arena of nodes and an arena of entries, addressed by
//! stable, `Copy` index handles rather than owning pointers.
//!
//! The downward link (a non-leaf entry's reference to its child node) is the owning
//! relation; the upward link (a node's back-reference to its parent entry) is a plain
//! arena index and is never used to free anything.

use generational_arena::Index;

/// A stable handle to a [`Node`] inside a [`crate::tree::Tree`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) Index);

/// A stable handle to an [`Entry`] inside a [`crate::tree::Tree`]'s entry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(pub(crate) Index);

/// What an [`Entry`] carries: either a caller-supplied payload (a leaf entry) or a
/// reference to the child node it covers (a non-leaf entry). Exactly one is ever
/// populated for a given entry.
#[derive(Debug, Clone)]
pub enum EntryKind<T> {
    /// A leaf entry holding an opaque, externally supplied payload.
    Leaf(T),
    /// A non-leaf entry owning a child node.
    Child(NodeId),
}

impl<T> EntryKind<T> {
    pub fn is_leaf(&self) -> bool {
        matches!(self, EntryKind::Leaf(_))
    }

    pub fn child(&self) -> Option<NodeId> {
        match self {
            EntryKind::Child(id) => Some(*id),
            EntryKind::Leaf(_) => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            EntryKind::Leaf(data) => Some(data),
            EntryKind::Child(_) => None,
        }
    }
}

/// A `(rect, data?, child_node?)` triple. Non-leaf entries own their child node; the
/// entry's rect must equal the union of that child's entries' rects (restored by
/// `adjust_tree` after every mutation).
#[derive(Debug, Clone)]
pub struct Entry<T> {
    pub(crate) rect: crate::geometry::Rect,
    pub(crate) kind: EntryKind<T>,
}

impl<T> Entry<T> {
    pub fn new_leaf(rect: crate::geometry::Rect, data: T) -> Entry<T> {
        Entry {
            rect,
            kind: EntryKind::Leaf(data),
        }
    }

    pub fn new_child(rect: crate::geometry::Rect, child: NodeId) -> Entry<T> {
        Entry {
            rect,
            kind: EntryKind::Child(child),
        }
    }

    pub fn rect(&self) -> &crate::geometry::Rect {
        &self.rect
    }

    pub fn data(&self) -> Option<&T> {
        self.kind.data()
    }

    pub fn child_node(&self) -> Option<NodeId> {
        self.kind.child()
    }

    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }
}

/// An ordered collection of entries sharing a level and a homogeneity invariant
/// (all leaf, or all non-leaf). `parent_entry`/`parent_node` are `None` only for the root.
///
/// `parent_node` is the non-owning back-reference's other half: the node that owns
/// `parent_entry`. Storing it directly avoids a linear scan to find "the node one
/// level up whose entries contains our parent entry" every time `adjust_tree` walks
/// upward.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) level: usize,
    pub(crate) parent_entry: Option<EntryId>,
    pub(crate) parent_node: Option<NodeId>,
    pub(crate) entries: Vec<EntryId>,
    pub(crate) is_leaf: bool,
}

impl Node {
    pub(crate) fn new(level: usize, is_leaf: bool) -> Node {
        Node {
            level,
            parent_entry: None,
            parent_node: None,
            entries: Vec::new(),
            is_leaf,
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn parent_entry(&self) -> Option<EntryId> {
        self.parent_entry
    }

    pub fn parent_node(&self) -> Option<NodeId> {
        self.parent_node
    }

    pub fn entries(&self) -> &[EntryId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }
}
