//! The patch grid and the per-frame reset, tessellate, render cycle.

use glam::{IVec2, Vec2};
use tracing::{debug, info, instrument, warn};

use crate::error::LandscapeError;
use crate::frame::{FrameContext, FrameStats, ResetSummary};
use crate::height_field::HeightField;
use crate::node::NodeId;
use crate::patch::{Patch, TessellationParams};
use crate::pool::{DEFAULT_POOL_CAPACITY, TriPool};
use crate::render::TriangleSink;
use crate::variance::{DEFAULT_VARIANCE_DEPTH, MAX_VARIANCE_DEPTH};
use crate::visibility::ViewWedge;

/// Shape and budget of a [`Landscape`].
#[derive(Clone, Debug, PartialEq)]
pub struct LandscapeConfig {
    /// Patches along each side of the square grid.
    pub patches_per_side: usize,
    /// Heap levels of precomputed variance per base triangle.
    pub variance_depth: u32,
    /// Pooled triangle nodes available per frame.
    pub pool_capacity: usize,
    /// Multiplier applied to heights when rendering.
    pub vertical_scale: f32,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            patches_per_side: 16,
            variance_depth: DEFAULT_VARIANCE_DEPTH,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            vertical_scale: 0.5,
        }
    }
}

/// A square height field split into a grid of patches that share one node
/// pool.
///
/// Each frame runs [`reset`](Self::reset), [`tessellate`](Self::tessellate)
/// and [`render`](Self::render) in that order, or all three through
/// [`frame`](Self::frame).
pub struct Landscape {
    field: HeightField,
    patches: Vec<Patch>,
    patches_per_side: usize,
    patch_size: usize,
    pool: TriPool,
    vertical_scale: f32,
    was_exhausted: bool,
}

impl Landscape {
    /// Lay out the patch grid over `field` and compute every patch's
    /// variance.
    #[instrument(skip_all, fields(map_size = field.size()))]
    pub fn new(field: HeightField, config: &LandscapeConfig) -> Result<Self, LandscapeError> {
        let map_size = field.size();
        let per_side = config.patches_per_side;
        if per_side == 0 {
            return Err(LandscapeError::NoPatches);
        }
        if map_size % per_side != 0 {
            return Err(LandscapeError::UnevenPatches {
                map_size,
                patches_per_side: per_side,
            });
        }
        let patch_size = map_size / per_side;
        if patch_size < 2 || !patch_size.is_power_of_two() {
            return Err(LandscapeError::PatchSize(patch_size));
        }
        if !(1..=MAX_VARIANCE_DEPTH).contains(&config.variance_depth) {
            return Err(LandscapeError::VarianceDepth(config.variance_depth));
        }
        if config.pool_capacity == 0 {
            return Err(LandscapeError::EmptyPool);
        }

        let count = per_side * per_side;
        let mut pool = TriPool::new(2 * count, config.pool_capacity);
        let mut patches = Vec::with_capacity(count);
        for y in 0..per_side {
            for x in 0..per_side {
                let index = y * per_side + x;
                let origin = IVec2::new((x * patch_size) as i32, (y * patch_size) as i32);
                let (left, right) = (pool.base(2 * index), pool.base(2 * index + 1));
                let mut patch = Patch::new(
                    &mut pool,
                    origin,
                    patch_size as i32,
                    left,
                    right,
                    config.variance_depth,
                );
                patch.compute_variance(&field);
                patches.push(patch);
            }
        }

        info!(
            patches = count,
            patch_size,
            pool_capacity = config.pool_capacity,
            variance_depth = config.variance_depth,
            "landscape ready"
        );

        Ok(Self {
            field,
            patches,
            patches_per_side: per_side,
            patch_size,
            pool,
            vertical_scale: config.vertical_scale,
            was_exhausted: false,
        })
    }

    /// Start a frame: rewind the pool, cull patches, refresh stale variance
    /// and stitch visible patches to their neighbors.
    pub fn reset(&mut self, ctx: &mut FrameContext) -> ResetSummary {
        let wedge = ViewWedge::new(&ctx.view, self.patch_size);
        self.pool.reset();
        ctx.triangles_rendered = 0;

        let mut summary = ResetSummary::default();
        let per_side = self.patches_per_side;
        for y in 0..per_side {
            for x in 0..per_side {
                let patch = &mut self.patches[y * per_side + x];
                patch.reset(&mut self.pool);
                let visible = patch.set_visibility(&wedge);
                if patch.is_dirty() {
                    patch.compute_variance(&self.field);
                    summary.variance_updates += 1;
                }
                if visible {
                    summary.visible_patches += 1;
                    self.stitch(x, y);
                }
            }
        }
        summary
    }

    /// Point the outward slots of patch `(x, y)`'s base triangles at the
    /// adjacent patches' base triangles, or at nothing on the grid edge.
    fn stitch(&mut self, x: usize, y: usize) {
        let last = self.patches_per_side - 1;
        let (base_left, base_right) = self.bases(x, y);

        let west = (x > 0).then(|| self.bases(x - 1, y).1);
        let east = (x < last).then(|| self.bases(x + 1, y).0);
        let north = (y > 0).then(|| self.bases(x, y - 1).1);
        let south = (y < last).then(|| self.bases(x, y + 1).0);

        let node = self.pool.node_mut(base_left);
        node.left_neighbor = west;
        node.right_neighbor = north;
        let node = self.pool.node_mut(base_right);
        node.left_neighbor = east;
        node.right_neighbor = south;
    }

    fn bases(&self, x: usize, y: usize) -> (NodeId, NodeId) {
        let patch = &self.patches[y * self.patches_per_side + x];
        (patch.base_left(), patch.base_right())
    }

    /// Refine every visible patch against the context's threshold.
    pub fn tessellate(&mut self, ctx: &FrameContext) {
        let params = TessellationParams {
            viewpoint: Vec2::new(ctx.view.position.x, ctx.view.position.z),
            threshold: ctx.detail_threshold,
            world_scale: 2.0 * self.map_size() as f32,
        };
        for patch in self.patches.iter().filter(|p| p.is_visible()) {
            patch.tessellate(&mut self.pool, &params);
        }

        let exhausted = self.pool.is_exhausted();
        if exhausted && !self.was_exhausted {
            warn!(
                capacity = self.pool.capacity(),
                threshold = ctx.detail_threshold,
                "triangle pool exhausted, mesh detail truncated"
            );
        }
        self.was_exhausted = exhausted;

        debug!(
            nodes = self.pool.allocated(),
            illegal_neighbors = self.pool.illegal_neighbors(),
            "tessellated"
        );
    }

    /// Stream every visible patch's leaves into `sink`, then feed the
    /// rendered count back into the context's detail threshold.
    pub fn render(&self, ctx: &mut FrameContext, sink: &mut dyn TriangleSink) -> u32 {
        sink.begin_frame(self.vertical_scale);
        for patch in self.patches.iter().filter(|p| p.is_visible()) {
            ctx.triangles_rendered += patch.render(&self.pool, &self.field, ctx.shading, sink);
        }
        ctx.adjust_detail_threshold();

        debug!(
            triangles = ctx.triangles_rendered,
            desired = ctx.desired_triangles,
            threshold = ctx.detail_threshold,
            "rendered"
        );
        ctx.triangles_rendered
    }

    /// Run one whole frame.
    pub fn frame(&mut self, ctx: &mut FrameContext, sink: &mut dyn TriangleSink) -> FrameStats {
        let reset = self.reset(ctx);
        self.tessellate(ctx);
        let triangles_rendered = self.render(ctx, sink);
        FrameStats {
            visible_patches: reset.visible_patches,
            variance_updates: reset.variance_updates,
            triangles_rendered,
            nodes_allocated: self.pool.allocated(),
            pool_exhausted: self.pool.is_exhausted(),
            illegal_neighbors: self.pool.illegal_neighbors(),
            detail_threshold: ctx.detail_threshold,
        }
    }

    /// Overwrite one height sample and mark every patch that samples it
    /// dirty. Patches along a shared edge or corner all see the change.
    pub fn set_height(&mut self, x: usize, y: usize, value: u8) -> Result<(), LandscapeError> {
        self.field.set(x, y, value)?;
        let (sx, sy) = (x as i32, y as i32);
        for patch in &mut self.patches {
            if patch.contains_sample(sx, sy) {
                patch.mark_dirty();
            }
        }
        Ok(())
    }

    /// Force patch `(x, y)` to recompute its variance on the next reset.
    pub fn mark_patch_dirty(&mut self, x: usize, y: usize) -> Result<(), LandscapeError> {
        let size = self.patches_per_side;
        if x >= size || y >= size {
            return Err(LandscapeError::PatchOutOfBounds { x, y, size });
        }
        self.patches[y * size + x].mark_dirty();
        Ok(())
    }

    pub fn patch(&self, x: usize, y: usize) -> Option<&Patch> {
        if x >= self.patches_per_side || y >= self.patches_per_side {
            return None;
        }
        self.patches.get(y * self.patches_per_side + x)
    }

    /// Patches in row-major order.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn height_field(&self) -> &HeightField {
        &self.field
    }

    pub fn pool(&self) -> &TriPool {
        &self.pool
    }

    pub fn patch_size(&self) -> usize {
        self.patch_size
    }

    pub fn patches_per_side(&self) -> usize {
        self.patches_per_side
    }

    pub fn map_size(&self) -> usize {
        self.field.size()
    }

    pub fn vertical_scale(&self) -> f32 {
        self.vertical_scale
    }
}
