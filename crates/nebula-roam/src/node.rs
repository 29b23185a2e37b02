//! Binary triangle tree nodes.
//!
//! A [`TriNode`] carries topology only: its two children and its three
//! neighbors. Corner coordinates are rebuilt by every traversal from the
//! root triangle, so nodes never go stale when geometry changes.

/// Stable index of a [`TriNode`] inside a [`TriPool`](crate::TriPool).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the node inside the pool's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The three edges of a right-isoceles triangle, naming which neighbor
/// field of a node is meant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NeighborSlot {
    /// Across the hypotenuse.
    Base,
    /// Across the leg running from the apex to the left corner.
    Left,
    /// Across the leg running from the right corner to the apex.
    Right,
}

impl NeighborSlot {
    /// All slots in lookup order.
    pub const ALL: [NeighborSlot; 3] = [NeighborSlot::Base, NeighborSlot::Left, NeighborSlot::Right];
}

/// One node of a binary triangle tree.
///
/// `children` is either both present or both absent; a half-split node
/// cannot be represented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriNode {
    /// Left and right child, present once the node has been split.
    pub children: Option<[NodeId; 2]>,
    /// Neighbor across the hypotenuse.
    pub base_neighbor: Option<NodeId>,
    /// Neighbor across the left leg.
    pub left_neighbor: Option<NodeId>,
    /// Neighbor across the right leg.
    pub right_neighbor: Option<NodeId>,
}

impl TriNode {
    /// Returns true if the node has not been split.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Left child, if split.
    #[must_use]
    pub fn left_child(&self) -> Option<NodeId> {
        self.children.map(|[left, _]| left)
    }

    /// Right child, if split.
    #[must_use]
    pub fn right_child(&self) -> Option<NodeId> {
        self.children.map(|[_, right]| right)
    }

    /// Read the neighbor stored in `slot`.
    #[must_use]
    pub fn neighbor(&self, slot: NeighborSlot) -> Option<NodeId> {
        match slot {
            NeighborSlot::Base => self.base_neighbor,
            NeighborSlot::Left => self.left_neighbor,
            NeighborSlot::Right => self.right_neighbor,
        }
    }

    /// Overwrite the neighbor stored in `slot`.
    pub fn set_neighbor(&mut self, slot: NeighborSlot, neighbor: Option<NodeId>) {
        match slot {
            NeighborSlot::Base => self.base_neighbor = neighbor,
            NeighborSlot::Left => self.left_neighbor = neighbor,
            NeighborSlot::Right => self.right_neighbor = neighbor,
        }
    }

    /// Find which slot, if any, refers to `target`.
    #[must_use]
    pub fn slot_of(&self, target: NodeId) -> Option<NeighborSlot> {
        NeighborSlot::ALL
            .into_iter()
            .find(|&slot| self.neighbor(slot) == Some(target))
    }

    /// Redirect whichever slot refers to `old` so it refers to `new`.
    ///
    /// Returns `false` and leaves the node untouched when no slot refers
    /// to `old`.
    pub fn replace_neighbor(&mut self, old: NodeId, new: NodeId) -> bool {
        match self.slot_of(old) {
            Some(slot) => {
                self.set_neighbor(slot, Some(new));
                true
            }
            None => false,
        }
    }

    /// Drop children and side neighbors, keeping only the base link.
    pub(crate) fn clear_except_base(&mut self) {
        self.children = None;
        self.left_neighbor = None;
        self.right_neighbor = None;
    }
}
