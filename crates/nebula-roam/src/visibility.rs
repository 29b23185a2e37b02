//! Coarse patch culling against a 2D view wedge.
//!
//! The wedge is anchored one patch behind the camera and opens along the
//! view direction by the horizontal field of view. Only the patch center is
//! tested, and pitch is ignored entirely, so the result is only meaningful
//! for a camera that stays roughly level.

use glam::IVec2;

use crate::frame::ViewParams;

/// Length of the rays that bound the wedge. Only their direction matters.
pub const FRUSTUM_RAY_LENGTH: f32 = 100.0;

/// Triangle `(eye, left, right)` whose interior angle at `eye` is the
/// visible sector, in height-field `(x, y)` coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewWedge {
    pub eye: IVec2,
    pub left: IVec2,
    pub right: IVec2,
}

impl ViewWedge {
    /// Build the wedge for `view`, pulling the eye back by `patch_size` so
    /// patches the camera stands in are never culled.
    pub fn new(view: &ViewParams, patch_size: usize) -> Self {
        let angle = view.clip_angle_deg.to_radians();
        let half_fov = (view.fov_x_deg * 0.5).to_radians();
        let setback = patch_size as f32;

        let eye_x = view.position.x - setback * angle.sin();
        let eye_y = view.position.z + setback * angle.cos();
        let eye = IVec2::new(eye_x as i32, eye_y as i32);

        let bound = |a: f32| {
            IVec2::new(
                (eye.x as f32 + FRUSTUM_RAY_LENGTH * a.sin()) as i32,
                (eye.y as f32 - FRUSTUM_RAY_LENGTH * a.cos()) as i32,
            )
        };

        Self {
            eye,
            left: bound(angle - half_fov),
            right: bound(angle + half_fov),
        }
    }

    /// True if `point` lies strictly inside the sector.
    pub fn contains(&self, point: IVec2) -> bool {
        orientation(self.eye, self.right, point) < 0 && orientation(self.left, self.eye, point) < 0
    }
}

/// Sign of the turn `p -> q -> r`: `1` counter-clockwise, `-1` clockwise,
/// `0` collinear.
pub fn orientation(p: IVec2, q: IVec2, r: IVec2) -> i32 {
    let a = q - p;
    let b = r - p;
    let d = i64::from(a.x) * i64::from(b.y) - i64::from(a.y) * i64::from(b.x);
    d.signum() as i32
}
