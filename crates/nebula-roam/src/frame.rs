//! Per-frame inputs, feedback state, and statistics.

use glam::Vec3;

use crate::render::ShadingMode;

/// Detail threshold used before any feedback has happened.
pub const DEFAULT_DETAIL_THRESHOLD: f32 = 50.0;

/// Camera placement for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewParams {
    /// Camera position; `x` and `z` map onto the height field's `x` and `y`.
    pub position: Vec3,
    /// Heading in degrees. Zero looks toward `-z`.
    pub clip_angle_deg: f32,
    /// Horizontal field of view in degrees.
    pub fov_x_deg: f32,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            clip_angle_deg: 0.0,
            fov_x_deg: 90.0,
        }
    }
}

/// Everything a frame reads and the feedback loop writes.
///
/// The context outlives frames: `detail_threshold` carries the controller
/// state from one frame to the next.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameContext {
    pub view: ViewParams,
    pub desired_triangles: u32,
    pub detail_threshold: f32,
    pub triangles_rendered: u32,
    pub shading: ShadingMode,
}

impl FrameContext {
    pub fn new(view: ViewParams, desired_triangles: u32) -> Self {
        Self {
            view,
            desired_triangles,
            detail_threshold: DEFAULT_DETAIL_THRESHOLD,
            triangles_rendered: 0,
            shading: ShadingMode::default(),
        }
    }

    pub fn with_detail_threshold(mut self, threshold: f32) -> Self {
        self.detail_threshold = threshold.max(0.0);
        self
    }

    pub fn with_shading(mut self, shading: ShadingMode) -> Self {
        self.shading = shading;
        self
    }

    /// Move the threshold toward the triangle budget.
    ///
    /// Rendering more than `desired_triangles` raises the threshold so the
    /// next frame splits less, rendering fewer lowers it. The threshold
    /// never goes negative. A zero target leaves the threshold alone.
    pub fn adjust_detail_threshold(&mut self) {
        if self.desired_triangles == 0 || self.triangles_rendered == self.desired_triangles {
            return;
        }
        let target = self.desired_triangles as f32;
        let error = (self.triangles_rendered as f32 - target) / target;
        self.detail_threshold = (self.detail_threshold + error).max(0.0);
    }
}

/// What [`Landscape::reset`](crate::Landscape::reset) did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResetSummary {
    pub visible_patches: usize,
    pub variance_updates: usize,
}

/// Statistics of one complete frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub visible_patches: usize,
    pub variance_updates: usize,
    pub triangles_rendered: u32,
    pub nodes_allocated: usize,
    pub pool_exhausted: bool,
    pub illegal_neighbors: u32,
    /// Threshold after this frame's feedback step.
    pub detail_threshold: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(desired: u32, threshold: f32) -> FrameContext {
        FrameContext::new(ViewParams::default(), desired).with_detail_threshold(threshold)
    }

    #[test]
    fn test_over_budget_raises_threshold() {
        let mut ctx = context(1000, 10.0);
        ctx.triangles_rendered = 1500;
        ctx.adjust_detail_threshold();
        assert!((ctx.detail_threshold - 10.5).abs() < 1e-6);
    }

    #[test]
    fn test_under_budget_lowers_threshold() {
        let mut ctx = context(1000, 10.0);
        ctx.triangles_rendered = 250;
        ctx.adjust_detail_threshold();
        assert!((ctx.detail_threshold - 9.25).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_clamps_at_zero() {
        let mut ctx = context(1000, 0.1);
        ctx.triangles_rendered = 0;
        ctx.adjust_detail_threshold();
        assert_eq!(ctx.detail_threshold, 0.0);
    }

    #[test]
    fn test_on_budget_is_unchanged() {
        let mut ctx = context(1000, 7.0);
        ctx.triangles_rendered = 1000;
        ctx.adjust_detail_threshold();
        assert_eq!(ctx.detail_threshold, 7.0);
    }

    #[test]
    fn test_zero_target_is_ignored() {
        let mut ctx = context(0, 7.0);
        ctx.triangles_rendered = 500;
        ctx.adjust_detail_threshold();
        assert_eq!(ctx.detail_threshold, 7.0);
    }

    #[test]
    fn test_defaults() {
        let ctx = FrameContext::new(ViewParams::default(), 10_000);
        assert_eq!(ctx.detail_threshold, DEFAULT_DETAIL_THRESHOLD);
        assert_eq!(ctx.shading, ShadingMode::Height);
        assert_eq!(ctx.view.fov_x_deg, 90.0);
        assert_eq!(
            context(1, -3.0).detail_threshold,
            0.0,
            "negative start is clamped"
        );
    }
}
