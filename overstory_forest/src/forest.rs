// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The forest: root set, refine/coarsen, linearisation, spatial lookup.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;

use log::{debug, info, warn};
use overstory_coord::Coord;

use crate::node::{ChildArray, Content, Node, NodeRef};
use crate::types::{CellValue, ForestError, NodeId, Traversal};

/// An adaptive hierarchical grid: a set of `2^D`-ary trees over disjoint
/// tiles of the integer lattice, with payload values on the leaves.
///
/// Nodes live in a generational arena; callers hold [`NodeId`] handles.
/// Structure changes through [`refine_node`](Self::refine_node) /
/// [`coarsen_node`](Self::coarsen_node) (or their bulk forms) and every
/// structural change invalidates the linearised visitation indices, which
/// [`balance`](Self::balance) rebuilds.
pub struct Forest<const D: usize, V> {
    nodes: Vec<Option<Node<D, V>>>,
    generations: Vec<u32>, // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    number_of_levels: u32,
    roots: BTreeMap<Coord<D>, NodeId>,
    // Derived indices, rebuilt by `linearise`.
    leaves_by_level: BTreeMap<u32, Vec<NodeId>>,
    parents_by_level: BTreeMap<u32, Vec<NodeId>>,
    morton_leaves: Vec<NodeId>,
    leaf_count: usize,
    linearised: bool,
}

impl<const D: usize, V> Default for Forest<D, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize, V> core::fmt::Debug for Forest<D, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Forest")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("roots", &self.roots.len())
            .field("leaf_count", &self.leaf_count)
            .field("linearised", &self.linearised)
            .finish_non_exhaustive()
    }
}

impl<const D: usize, V> Forest<D, V> {
    const NUM_CHILDREN: usize = 1 << D;

    /// Create a new empty forest.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            number_of_levels: 0,
            roots: BTreeMap::new(),
            leaves_by_level: BTreeMap::new(),
            parents_by_level: BTreeMap::new(),
            morton_leaves: Vec::new(),
            leaf_count: 0,
            linearised: true,
        }
    }

    /// Drop every node and derived index.
    ///
    /// Slot generations persist, so handles issued before the clear stay
    /// stale rather than aliasing later nodes.
    pub fn clear(&mut self) {
        for slot in &mut self.nodes {
            *slot = None;
        }
        self.free_list = (0..self.nodes.len()).collect();
        self.roots.clear();
        self.leaves_by_level.clear();
        self.parents_by_level.clear();
        self.morton_leaves.clear();
        self.leaf_count = 0;
        self.number_of_levels = 0;
        self.linearised = true;
    }

    /// Clear the forest and insert a coarse lattice of root tiles.
    ///
    /// Creates `res[0] × … × res[D-1]` roots, each a leaf at level
    /// `number_of_levels - 1` carrying `background`, at lattice positions
    /// that are multiples of the root width. Linearises before returning,
    /// so the forest is immediately visitable.
    pub fn initialise(
        &mut self,
        coarse_resolution: Coord<D>,
        number_of_levels: u32,
        background: V,
    ) -> Result<(), ForestError>
    where
        V: Clone,
    {
        self.clear();
        self.number_of_levels = number_of_levels;
        let Some(root_level) = number_of_levels.checked_sub(1) else {
            // Zero levels: nothing to build.
            return Ok(());
        };
        let root_width = 1_i64 << root_level;

        let extent = |axis: usize| coarse_resolution.get(axis).unwrap_or(1).max(0);
        let (loop_i, loop_j, loop_k) = (extent(0), extent(1), extent(2));

        let mut components = [0_i64; D];
        for k in 0..loop_k {
            if let Some(c) = components.get_mut(2) {
                *c = k * root_width;
            }
            for j in 0..loop_j {
                if let Some(c) = components.get_mut(1) {
                    *c = j * root_width;
                }
                for i in 0..loop_i {
                    if let Some(c) = components.get_mut(0) {
                        *c = i * root_width;
                    }
                    let coord = Coord::from(components);
                    let id = self.alloc(None, coord, root_level, background.clone());
                    if self.roots.insert(coord, id).is_some() {
                        warn!("root collision at {coord} during initialise");
                        return Err(ForestError::DuplicateRoot);
                    }
                }
            }
        }

        info!(
            "initialised {}-dimensional forest: {} roots at level {}",
            D,
            self.roots.len(),
            root_level,
        );
        self.linearise();
        Ok(())
    }

    /// Number of leaves counted by the last linearisation.
    ///
    /// Only meaningful while the forest is linearised.
    pub fn number_of_leaves(&self) -> usize {
        self.leaf_count
    }

    /// The level count this forest was initialised with.
    pub fn number_of_levels(&self) -> u32 {
        self.number_of_levels
    }

    /// Root handles in coord order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots.values().copied()
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is live if its slot exists and its generation matches the
    /// generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Read-only view of a node, or `None` if `id` is stale.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, D, V>> {
        if !self.is_alive(id) {
            return None;
        }
        Some(NodeRef {
            id,
            node: self.node_ref(id),
        })
    }

    /// The payload of a leaf.
    ///
    /// Panics if `id` is dangling; returns [`ForestError::NotALeaf`] for an
    /// internal node.
    pub fn value(&self, id: NodeId) -> Result<&V, ForestError> {
        match &self.node_ref(id).content {
            Content::Leaf(value) => Ok(value),
            Content::Internal(_) => Err(ForestError::NotALeaf),
        }
    }

    /// Mutable payload access; same contract as [`value`](Self::value).
    ///
    /// Payload edits do not change structure, so the linearised indices
    /// stay valid.
    pub fn value_mut(&mut self, id: NodeId) -> Result<&mut V, ForestError> {
        match &mut self.node_mut(id).content {
            Content::Leaf(value) => Ok(value),
            Content::Internal(_) => Err(ForestError::NotALeaf),
        }
    }

    /// Set a node's payload, turning it into a leaf unconditionally.
    ///
    /// On an internal node this drops the whole subtree below it and
    /// invalidates the linearised indices. Panics if `id` is dangling.
    pub fn set_value(&mut self, id: NodeId, value: V) {
        let previous = core::mem::replace(&mut self.node_mut(id).content, Content::Leaf(value));
        if let Content::Internal(children) = previous {
            for child in children {
                self.free_subtree(child);
            }
            self.invalidate();
        }
    }

    /// The deepest node whose tile contains `coord`, or `None` when no
    /// root tile does.
    ///
    /// Scans roots in coord order, then descends; at each internal node the
    /// children are disjoint, so the first child containing `coord` is the
    /// only one.
    pub fn node_at_coord(&self, coord: Coord<D>) -> Option<NodeId> {
        let mut current = self
            .roots
            .values()
            .copied()
            .find(|&id| self.node_ref(id).bbox.contains(coord))?;
        loop {
            match &self.node_ref(current).content {
                Content::Internal(children) => {
                    current = children
                        .iter()
                        .copied()
                        .find(|&child| self.node_ref(child).bbox.contains(coord))
                        .expect("child bboxes partition the parent");
                }
                Content::Leaf(_) => return Some(current),
            }
        }
    }

    /// Split a leaf into `2^D` children one level finer.
    ///
    /// Child `i` is offset by half the parent width on axis `j` iff bit `j`
    /// of `i` is set (bit 0 = x, bit 1 = y, bit 2 = z). Every child starts
    /// as a leaf carrying a clone of the parent's value.
    ///
    /// A leaf at level 0 cannot refine; that case is a no-op. Refining an
    /// internal node is [`ForestError::NotALeaf`]. On success the
    /// linearised indices are invalidated; call [`balance`](Self::balance)
    /// before the next visitation.
    pub fn refine_node(&mut self, id: NodeId) -> Result<(), ForestError>
    where
        V: Clone,
    {
        let (coord, level, width, value) = {
            let node = self.node_ref(id);
            match &node.content {
                Content::Internal(_) => return Err(ForestError::NotALeaf),
                Content::Leaf(value) => {
                    if node.level == 0 {
                        return Ok(());
                    }
                    (node.coord, node.level, node.width, value.clone())
                }
            }
        };

        let half = width / 2;
        let mut children = ChildArray::new();
        for child_index in 0..Self::NUM_CHILDREN {
            let mut offsets = [0_i64; D];
            for (axis, offset) in offsets.iter_mut().enumerate() {
                if (child_index >> axis) & 1 == 1 {
                    *offset = half;
                }
            }
            let child_coord = coord.offset_by_axes(offsets);
            children.push(self.alloc(Some(id), child_coord, level - 1, value.clone()));
        }
        self.node_mut(id).content = Content::Internal(children);
        self.invalidate();
        Ok(())
    }

    /// Merge an internal node's leaf children back into a single leaf.
    ///
    /// Only valid at a node whose children are all leaves; anything else is
    /// a silent no-op. The merged value is the uniform-weight average of
    /// the `2^D` child values (sum first, one scale by `1/2^D`). On success
    /// the children are dropped and the linearised indices invalidated.
    pub fn coarsen_node(&mut self, id: NodeId)
    where
        V: CellValue,
    {
        let children = match &self.node_ref(id).content {
            Content::Internal(children) => children.clone(),
            Content::Leaf(_) => return,
        };

        let mut merged = V::zero();
        for &child in &children {
            match &self.node_ref(child).content {
                Content::Leaf(value) => merged.accumulate(value),
                Content::Internal(_) => return,
            }
        }
        merged.scale(1.0 / Self::NUM_CHILDREN as f64);

        for child in children {
            self.free_subtree(child);
        }
        self.node_mut(id).content = Content::Leaf(merged);
        self.invalidate();
    }

    /// Refine to the lowest level at the specified coordinate.
    ///
    /// Locates the node containing `coord` and, while its level is above 0,
    /// applies `refine_op` (which is expected to call
    /// [`refine_node`](Self::refine_node)) and steps into the child
    /// containing `coord`. Stops early if `refine_op` declined to refine.
    ///
    /// Following this call the forest must be [`balance`](Self::balance)d
    /// before any visitation.
    pub fn refine_to_lowest_level_at_coord<F>(&mut self, coord: Coord<D>, mut refine_op: F)
    where
        F: FnMut(&mut Self, NodeId),
    {
        let Some(mut current) = self.node_at_coord(coord) else {
            return;
        };
        while self.node_ref(current).level != 0 {
            refine_op(self, current);
            let Content::Internal(children) = &self.node_ref(current).content else {
                break;
            };
            current = children
                .iter()
                .copied()
                .find(|&child| self.node_ref(child).bbox.contains(coord))
                .expect("child bboxes partition the parent");
        }
        self.invalidate();
    }

    /// Apply `refine_op` to every leaf, finest level first, then
    /// relinearise.
    ///
    /// The leaf list is materialised before any refinement, so each
    /// original leaf is visited exactly once; children created by
    /// `refine_op` are not descended into within the same pass.
    pub fn refine<F>(&mut self, mut refine_op: F) -> Result<(), ForestError>
    where
        F: FnMut(&mut Self, NodeId),
    {
        let snapshot = self.leaf_snapshot(Traversal::BottomUp)?;
        for id in snapshot {
            refine_op(self, id);
        }
        self.linearise();
        Ok(())
    }

    /// Coarsen every parent-of-leaves, finest level first, then
    /// relinearise.
    ///
    /// Parents whose children are not all leaves are skipped by the
    /// [`coarsen_node`](Self::coarsen_node) precondition. Because parents
    /// are visited in ascending level order, a coarsen can cascade: a
    /// parent recorded with one leaf child may find its remaining children
    /// coarsened by the time it is visited.
    pub fn coarsen(&mut self) -> Result<(), ForestError>
    where
        V: CellValue,
    {
        self.check_linearised()?;
        let parents: Vec<NodeId> = self
            .parents_by_level
            .values()
            .flatten()
            .copied()
            .collect();
        let candidates = parents.len();
        for id in parents {
            self.coarsen_node(id);
        }
        self.linearise();
        debug!(
            "coarsen pass over {candidates} candidate parents left {} leaves",
            self.leaf_count,
        );
        Ok(())
    }

    /// Rebuild the linearised visitation indices.
    ///
    /// The name is kept for the 2:1 neighbour balancing this operation is
    /// intended to grow into; today it adjusts no structure and only
    /// relinearises.
    pub fn balance(&mut self) {
        self.linearise();
    }

    /// Iterate leaf handles in the given traversal order.
    ///
    /// `BottomUp` delivers finest levels first, `TopDown` coarsest first
    /// (BFS insertion order within a level, deterministic across runs),
    /// and `Morton` follows the Z-order curve over leaf coords. Fails with
    /// [`ForestError::NotLinearised`] if the indices are stale.
    pub fn leaves(
        &self,
        direction: Traversal,
    ) -> Result<Box<dyn Iterator<Item = NodeId> + '_>, ForestError> {
        self.check_linearised()?;
        Ok(match direction {
            Traversal::BottomUp => Box::new(self.leaves_by_level.values().flatten().copied()),
            Traversal::TopDown => Box::new(self.leaves_by_level.values().rev().flatten().copied()),
            Traversal::Morton => Box::new(self.morton_leaves.iter().copied()),
        })
    }

    /// Apply `op` to every leaf in the given traversal order.
    ///
    /// The leaf list is materialised first, so `op` may mutate the forest
    /// (set values, refine); the pass still covers exactly the leaves that
    /// existed when it started. Structural mutation inside `op` leaves the
    /// forest needing a [`balance`](Self::balance).
    pub fn visit_leaves<F>(&mut self, direction: Traversal, mut op: F) -> Result<(), ForestError>
    where
        F: FnMut(&mut Self, NodeId),
    {
        let snapshot = self.leaf_snapshot(direction)?;
        for id in snapshot {
            op(self, id);
        }
        Ok(())
    }

    // --- internals ---

    fn check_linearised(&self) -> Result<(), ForestError> {
        if self.linearised {
            Ok(())
        } else {
            Err(ForestError::NotLinearised)
        }
    }

    fn leaf_snapshot(&self, direction: Traversal) -> Result<Vec<NodeId>, ForestError> {
        self.check_linearised()?;
        Ok(match direction {
            Traversal::BottomUp => self.leaves_by_level.values().flatten().copied().collect(),
            Traversal::TopDown => self
                .leaves_by_level
                .values()
                .rev()
                .flatten()
                .copied()
                .collect(),
            Traversal::Morton => self.morton_leaves.clone(),
        })
    }

    /// Rebuild every derived index with a breadth-first sweep from the
    /// roots, using an explicit queue so deep trees cannot exhaust the
    /// stack.
    fn linearise(&mut self) {
        self.leaves_by_level.clear();
        self.parents_by_level.clear();
        self.morton_leaves.clear();
        self.leaf_count = 0;

        let mut queue: VecDeque<NodeId> = self.roots.values().copied().collect();
        while let Some(id) = queue.pop_front() {
            let node = self.node_ref(id);
            let level = node.level;
            let children = match &node.content {
                Content::Internal(children) => Some(children.clone()),
                Content::Leaf(_) => None,
            };
            match children {
                Some(children) => {
                    // A node joins the parent index as soon as one leaf
                    // child shows up; the coarsen precondition tolerates
                    // the others being internal.
                    let mut recorded = false;
                    for &child in &children {
                        queue.push_back(child);
                        if !recorded && self.node_ref(child).is_leaf() {
                            self.parents_by_level.entry(level).or_default().push(id);
                            recorded = true;
                        }
                    }
                }
                None => {
                    self.leaf_count += 1;
                    self.leaves_by_level.entry(level).or_default().push(id);
                    self.morton_leaves.push(id);
                }
            }
        }

        let mut morton = core::mem::take(&mut self.morton_leaves);
        morton.sort_unstable_by_key(|&id| self.node_ref(id).coord.morton_key());
        self.morton_leaves = morton;

        self.linearised = true;
        debug!(
            "linearised forest: {} leaves across {} levels",
            self.leaf_count,
            self.leaves_by_level.len(),
        );
    }

    fn invalidate(&mut self) {
        if self.linearised {
            self.leaves_by_level.clear();
            self.parents_by_level.clear();
            self.morton_leaves.clear();
            self.leaf_count = 0;
            self.linearised = false;
        }
    }

    fn alloc(&mut self, parent: Option<NodeId>, coord: Coord<D>, level: u32, value: V) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new_leaf(generation, parent, coord, level, value));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes
                .push(Some(Node::new_leaf(generation, parent, coord, level, value)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Free a node and everything below it. Depth is bounded by the level
    /// count, so recursion is safe here.
    fn free_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes[id.idx()].take() {
            if let Content::Internal(children) = node.content {
                for child in children {
                    self.free_subtree(child);
                }
            }
            self.free_list.push(id.idx());
        }
    }

    fn node_ref(&self, id: NodeId) -> &Node<D, V> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<D, V> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }
}
