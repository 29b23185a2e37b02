//! Integer triangle geometry rebuilt during every tree traversal.

use glam::IVec2;

/// Hypotenuse extent below which a triangle is not subdivided further while
/// tessellating.
pub const MIN_SPLIT_EXTENT: i32 = 3;

/// Hypotenuse extent below which variance is no longer refined.
pub const VARIANCE_MIN_EXTENT: i32 = 8;

/// A right-isoceles triangle on the height-field grid.
///
/// `left` and `right` are the ends of the hypotenuse, `apex` is the right
/// angle corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub left: IVec2,
    pub right: IVec2,
    pub apex: IVec2,
}

impl Triangle {
    pub const fn new(left: IVec2, right: IVec2, apex: IVec2) -> Self {
        Self { left, right, apex }
    }

    /// The two root triangles that tile a square of side `size` with its
    /// lower corner at the origin: `[upper-left half, lower-right half]`.
    pub fn square_halves(size: i32) -> [Triangle; 2] {
        [
            Triangle::new(IVec2::new(0, size), IVec2::new(size, 0), IVec2::new(0, 0)),
            Triangle::new(
                IVec2::new(size, 0),
                IVec2::new(0, size),
                IVec2::new(size, size),
            ),
        ]
    }

    /// Midpoint of the hypotenuse, rounded toward negative infinity.
    pub fn center(&self) -> IVec2 {
        IVec2::new(
            (self.left.x + self.right.x) >> 1,
            (self.left.y + self.right.y) >> 1,
        )
    }

    /// Largest axis extent of the hypotenuse.
    pub fn extent(&self) -> i32 {
        (self.left - self.right).abs().max_element()
    }

    /// Bisect the hypotenuse into `(left child, right child)`.
    ///
    /// Each child's hypotenuse is one of the parent's legs and its apex is
    /// the parent's hypotenuse midpoint, so corner roles rotate between
    /// levels while the winding stays the same.
    pub fn bisect(&self) -> (Triangle, Triangle) {
        let center = self.center();
        (
            Triangle::new(self.apex, self.left, center),
            Triangle::new(self.right, self.apex, center),
        )
    }

    /// Shift every corner by `offset`.
    pub fn translate(&self, offset: IVec2) -> Triangle {
        Triangle::new(self.left + offset, self.right + offset, self.apex + offset)
    }

    /// Twice the signed area; positive for counter-clockwise corners.
    pub fn doubled_area(&self) -> i64 {
        let a = self.right - self.left;
        let b = self.apex - self.left;
        i64::from(a.x) * i64::from(b.y) - i64::from(a.y) * i64::from(b.x)
    }
}
