//! Frame-scoped bump allocator for triangle tree nodes.
//!
//! The arena is laid out as `[base nodes | pooled nodes]`. Base nodes are
//! reserved once for the patches' root triangles and never handed out by
//! [`TriPool::allocate`]. Pooled nodes are handed out in order and all
//! reclaimed at once by [`TriPool::reset`].

use crate::node::{NodeId, TriNode};

/// Default number of pooled nodes available per frame.
pub const DEFAULT_POOL_CAPACITY: usize = 25_000;

/// Arena of [`TriNode`]s shared by every patch of a landscape.
pub struct TriPool {
    nodes: Vec<TriNode>,
    base_count: usize,
    capacity: usize,
    next: usize,
    exhausted: bool,
    illegal_neighbors: u32,
}

impl TriPool {
    /// Create a pool with `base_count` reserved root nodes and room for
    /// `capacity` pooled nodes. The arena never grows afterwards.
    pub fn new(base_count: usize, capacity: usize) -> Self {
        Self {
            nodes: vec![TriNode::default(); base_count + capacity],
            base_count,
            capacity,
            next: 0,
            exhausted: false,
            illegal_neighbors: 0,
        }
    }

    /// Id of the `index`-th reserved base node.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below the reserved base count.
    pub fn base(&self, index: usize) -> NodeId {
        assert!(
            index < self.base_count,
            "base node {index} out of range ({} reserved)",
            self.base_count
        );
        NodeId::new(index)
    }

    /// Hand out the next pooled node, cleared to an unlinked leaf.
    ///
    /// Returns `None` once the capacity for this frame is used up; callers
    /// treat that as a normal stopping condition.
    pub fn allocate(&mut self) -> Option<NodeId> {
        if self.next >= self.capacity {
            self.exhausted = true;
            return None;
        }
        let index = self.base_count + self.next;
        self.next += 1;
        self.nodes[index] = TriNode::default();
        Some(NodeId::new(index))
    }

    /// Rewind the allocation cursor. Previously handed out nodes become
    /// unreachable garbage until they are handed out again.
    pub fn reset(&mut self) {
        self.next = 0;
        self.exhausted = false;
        self.illegal_neighbors = 0;
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> &TriNode {
        &self.nodes[id.index()]
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> &mut TriNode {
        &mut self.nodes[id.index()]
    }

    /// Number of pooled nodes handed out since the last reset.
    pub fn allocated(&self) -> usize {
        self.next
    }

    /// Pooled node capacity per frame.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pooled nodes still available this frame.
    pub fn remaining(&self) -> usize {
        self.capacity - self.next
    }

    /// Number of reserved base nodes.
    pub fn base_count(&self) -> usize {
        self.base_count
    }

    /// True if an allocation has failed since the last reset.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Neighbor repairs skipped since the last reset because the neighbor
    /// did not refer back to the node being split.
    pub fn illegal_neighbors(&self) -> u32 {
        self.illegal_neighbors
    }

    pub(crate) fn record_illegal_neighbor(&mut self) {
        self.illegal_neighbors += 1;
    }
}
