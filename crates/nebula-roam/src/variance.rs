//! Bottom-up variance precomputation.
//!
//! For every triangle of a patch's binary tree down to a fixed depth, the
//! variance tree stores an upper bound on how far the real surface strays
//! from the flat triangle. Entries are addressed like a binary heap: the
//! root is index 1 and node `i` has children `2i` and `2i + 1`.

use crate::height_field::HeightView;
use crate::triangle::{Triangle, VARIANCE_MIN_EXTENT};

/// Default number of heap levels stored per base triangle.
pub const DEFAULT_VARIANCE_DEPTH: u32 = 9;

/// Deepest supported variance tree.
pub const MAX_VARIANCE_DEPTH: u32 = 16;

/// Precomputed error bounds for one base triangle.
///
/// A stored value is `1 + error`, so zero always means "never computed".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarianceTree {
    entries: Vec<u8>,
}

impl VarianceTree {
    /// An empty tree holding heap indices below `1 << depth`.
    pub fn new(depth: u32) -> Self {
        Self {
            entries: vec![0; 1 << depth],
        }
    }

    /// Number of heap slots, including the unused slot 0.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the tree has no slots.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored value at `index`, or `None` past the stored depth.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.entries.get(index).copied()
    }

    /// Recompute every entry for `root`, sampling heights through `heights`.
    pub fn compute(&mut self, heights: &HeightView<'_>, root: Triangle) {
        self.entries.fill(0);
        let corners = [
            heights.get(root.left),
            heights.get(root.right),
            heights.get(root.apex),
        ];
        self.compute_node(heights, root, corners, 1);
    }

    /// Returns the unbiased variance of `tri` and stores the biased value
    /// when `index` is within depth. `z` holds left, right and apex heights.
    fn compute_node(
        &mut self,
        heights: &HeightView<'_>,
        tri: Triangle,
        z: [u8; 3],
        index: usize,
    ) -> u8 {
        let [left_z, right_z, apex_z] = z;
        let center = tri.center();
        let center_z = heights.get(center);

        let mut variance = midpoint_error(center_z, left_z, right_z);

        if tri.extent() >= VARIANCE_MIN_EXTENT {
            let (left_tri, right_tri) = tri.bisect();
            let (left_index, right_index) = heap_child_indices(index);
            variance = variance.max(self.compute_node(
                heights,
                left_tri,
                [apex_z, left_z, center_z],
                left_index,
            ));
            variance = variance.max(self.compute_node(
                heights,
                right_tri,
                [right_z, apex_z, center_z],
                right_index,
            ));
        }

        if let Some(entry) = self.entries.get_mut(index) {
            *entry = variance.saturating_add(1);
        }
        variance
    }
}

/// Distance between the sampled hypotenuse midpoint and the average of the
/// hypotenuse end heights.
pub fn midpoint_error(center_z: u8, left_z: u8, right_z: u8) -> u8 {
    let average = (i32::from(left_z) + i32::from(right_z)) >> 1;
    (i32::from(center_z) - average).unsigned_abs() as u8
}

/// Heap indices of the left and right child of `index`.
pub fn heap_child_indices(index: usize) -> (usize, usize) {
    (index << 1, (index << 1) + 1)
}
