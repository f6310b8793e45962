// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena node internals and the public read-only node view.

use overstory_coord::{Coord, CoordBox};
use smallvec::SmallVec;

use crate::types::{ForestError, NodeId};

/// Inline storage for the `2^D` child handles of an internal node.
///
/// Eight slots cover every supported dimension without spilling to the
/// heap; stable Rust cannot spell `[NodeId; 1 << D]` for a const-generic
/// `D`.
pub(crate) type ChildArray = SmallVec<[NodeId; 8]>;

/// What a node holds: a payload value, or exactly `2^D` children.
///
/// The sum type is the whole point — a node cannot be simultaneously a
/// leaf and internal, and an internal node cannot be missing children.
#[derive(Clone, Debug)]
pub(crate) enum Content<V> {
    Leaf(V),
    Internal(ChildArray),
}

#[derive(Clone, Debug)]
pub(crate) struct Node<const D: usize, V> {
    pub(crate) generation: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) coord: Coord<D>,
    pub(crate) level: u32,
    pub(crate) width: i64,
    pub(crate) bbox: CoordBox<D>,
    pub(crate) content: Content<V>,
}

impl<const D: usize, V> Node<D, V> {
    /// A fresh leaf at `coord`. Width and bbox are derived from the level.
    pub(crate) fn new_leaf(
        generation: u32,
        parent: Option<NodeId>,
        coord: Coord<D>,
        level: u32,
        value: V,
    ) -> Self {
        let width = 1_i64 << level;
        Self {
            generation,
            parent,
            coord,
            level,
            width,
            bbox: CoordBox::new(coord, coord.offset_by(width - 1)),
            content: Content::Leaf(value),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.content, Content::Leaf(_))
    }
}

/// Read-only view of a live node.
///
/// Obtained from [`Forest::node`](crate::Forest::node); borrows the forest,
/// so it cannot outlive a mutation.
pub struct NodeRef<'a, const D: usize, V> {
    pub(crate) id: NodeId,
    pub(crate) node: &'a Node<D, V>,
}

// Manual impls: a derive would demand `V: Copy`, but the view only holds a
// reference.
impl<const D: usize, V> Copy for NodeRef<'_, D, V> {}

impl<const D: usize, V> Clone for NodeRef<'_, D, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, const D: usize, V> NodeRef<'a, D, V> {
    /// The handle this view was created from.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Low corner of the node's tile on the lattice.
    pub fn coord(&self) -> Coord<D> {
        self.node.coord
    }

    /// Refinement level; 0 is finest.
    pub fn level(&self) -> u32 {
        self.node.level
    }

    /// Side length of the node's tile, `2^level` lattice units.
    pub fn width(&self) -> i64 {
        self.node.width
    }

    /// Inclusive bounding box of the node's tile.
    pub fn bbox(&self) -> CoordBox<D> {
        self.node.bbox
    }

    /// Handle of the parent; `None` for roots.
    pub fn parent(&self) -> Option<NodeId> {
        self.node.parent
    }

    /// Whether the node carries a value.
    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    /// Whether the node carries children.
    pub fn has_children(&self) -> bool {
        !self.is_leaf()
    }

    /// The `2^D` child handles; empty for a leaf.
    pub fn children(&self) -> &'a [NodeId] {
        match &self.node.content {
            Content::Internal(children) => children,
            Content::Leaf(_) => &[],
        }
    }

    /// The payload, or [`ForestError::NotALeaf`] for an internal node.
    pub fn value(&self) -> Result<&'a V, ForestError> {
        match &self.node.content {
            Content::Leaf(value) => Ok(value),
            Content::Internal(_) => Err(ForestError::NotALeaf),
        }
    }
}

impl<const D: usize, V: core::fmt::Debug> core::fmt::Debug for NodeRef<'_, D, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("coord", &self.node.coord)
            .field("level", &self.node.level)
            .field("is_leaf", &self.is_leaf())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_geometry_is_derived_from_level() {
        let node: Node<2, f64> = Node::new_leaf(1, None, Coord::<2>::new(4, 8), 2, 0.0);
        assert_eq!(node.width, 4);
        assert_eq!(
            node.bbox,
            CoordBox::new(Coord::<2>::new(4, 8), Coord::<2>::new(7, 11))
        );
        assert!(node.is_leaf());
    }

    #[test]
    fn level_zero_tile_is_a_single_cell() {
        let node: Node<3, f64> = Node::new_leaf(1, None, Coord::<3>::new(1, 2, 3), 0, 0.0);
        assert_eq!(node.width, 1);
        assert_eq!(node.bbox.low, node.bbox.high);
    }
}
