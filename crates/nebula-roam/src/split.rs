//! Conformity-preserving binary split.
//!
//! Splitting a triangle bisects its hypotenuse. The triangle across that
//! hypotenuse shares the new midpoint vertex, so it has to split as well or
//! the mesh gets a T-junction. [`TriPool::split`] follows the base-neighbor
//! chain to keep every diamond at one resolution.

use tracing::trace;

use crate::node::NodeId;
use crate::pool::TriPool;

impl TriPool {
    /// Split `id` into two children and relink the surrounding mesh.
    ///
    /// No-op if the node is already split. If the pool runs dry the node is
    /// left unsplit; neighbors that were force-split on the way stay split.
    pub fn split(&mut self, id: NodeId) {
        if !self.node(id).is_leaf() {
            return;
        }

        // Not in a diamond with our base neighbor: that neighbor is one level
        // coarser and has to split first.
        if let Some(base) = self.node(id).base_neighbor
            && self.node(base).base_neighbor != Some(id)
        {
            self.split(base);
            if !self.node(id).is_leaf() {
                return;
            }
        }

        let Some(left) = self.allocate() else {
            return;
        };
        let Some(right) = self.allocate() else {
            return;
        };

        let parent = *self.node(id);
        self.node_mut(id).children = Some([left, right]);

        {
            let child = self.node_mut(left);
            child.base_neighbor = parent.left_neighbor;
            child.left_neighbor = Some(right);
        }
        {
            let child = self.node_mut(right);
            child.base_neighbor = parent.right_neighbor;
            child.right_neighbor = Some(left);
        }

        if let Some(neighbor) = parent.left_neighbor {
            self.relink_neighbor(neighbor, id, left);
        }
        if let Some(neighbor) = parent.right_neighbor {
            self.relink_neighbor(neighbor, id, right);
        }

        match parent.base_neighbor {
            Some(base) => match self.node(base).children {
                Some([base_left, base_right]) => {
                    self.node_mut(base_left).right_neighbor = Some(right);
                    self.node_mut(base_right).left_neighbor = Some(left);
                    self.node_mut(left).right_neighbor = Some(base_right);
                    self.node_mut(right).left_neighbor = Some(base_left);
                }
                // The other half of the diamond links back to our children
                // when it splits.
                None => self.split(base),
            },
            None => {
                self.node_mut(left).right_neighbor = None;
                self.node_mut(right).left_neighbor = None;
            }
        }
    }

    /// Point whichever slot of `neighbor` referred to `old` at `new`.
    fn relink_neighbor(&mut self, neighbor: NodeId, old: NodeId, new: NodeId) {
        if !self.node_mut(neighbor).replace_neighbor(old, new) {
            self.record_illegal_neighbor();
            trace!(
                neighbor = neighbor.index(),
                node = old.index(),
                "neighbor does not refer back to split node"
            );
        }
    }
}
