//! A square block of terrain tessellated as one diamond of two base
//! triangles.

use glam::{IVec2, Vec2};

use crate::height_field::{HeightField, HeightView};
use crate::node::NodeId;
use crate::pool::TriPool;
use crate::render::{ShadingMode, TriangleSink, shade_triangle};
use crate::triangle::{MIN_SPLIT_EXTENT, Triangle};
use crate::variance::{VarianceTree, heap_child_indices};
use crate::visibility::ViewWedge;

/// Inputs of the split decision shared by every patch in a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TessellationParams {
    /// Camera position projected onto the height-field plane.
    pub viewpoint: Vec2,
    /// Importance a triangle must exceed to split.
    pub threshold: f32,
    /// Multiplier applied to stored variance, twice the map size.
    pub world_scale: f32,
}

impl TessellationParams {
    /// Screen-space error proxy of a triangle whose stored variance is
    /// `variance` and whose hypotenuse midpoint is `center`.
    pub fn importance(&self, variance: u8, center: IVec2) -> f32 {
        let distance = center.as_vec2().distance(self.viewpoint);
        f32::from(variance) * self.world_scale / (1.0 + distance)
    }
}

/// One patch of the landscape grid.
#[derive(Debug)]
pub struct Patch {
    origin: IVec2,
    size: i32,
    base_left: NodeId,
    base_right: NodeId,
    variance_left: VarianceTree,
    variance_right: VarianceTree,
    dirty: bool,
    visible: bool,
}

impl Patch {
    /// Bind a patch at `origin` to its two reserved base nodes and link
    /// them into a diamond. The patch starts dirty and hidden.
    pub fn new(
        pool: &mut TriPool,
        origin: IVec2,
        size: i32,
        base_left: NodeId,
        base_right: NodeId,
        variance_depth: u32,
    ) -> Self {
        let mut patch = Self {
            origin,
            size,
            base_left,
            base_right,
            variance_left: VarianceTree::new(variance_depth),
            variance_right: VarianceTree::new(variance_depth),
            dirty: true,
            visible: false,
        };
        patch.reset(pool);
        patch
    }

    /// Drop last frame's tree, relink the diamond, and hide the patch.
    pub fn reset(&mut self, pool: &mut TriPool) {
        self.visible = false;
        let (left, right) = (self.base_left, self.base_right);

        let node = pool.node_mut(left);
        node.clear_except_base();
        node.base_neighbor = Some(right);

        let node = pool.node_mut(right);
        node.clear_except_base();
        node.base_neighbor = Some(left);
    }

    /// Test the patch center against `wedge` and remember the result.
    pub fn set_visibility(&mut self, wedge: &ViewWedge) -> bool {
        self.visible = wedge.contains(self.center());
        self.visible
    }

    /// Recompute both variance trees from `field` and clear the dirty flag.
    pub fn compute_variance(&mut self, field: &HeightField) {
        let view = field.view(self.origin);
        let [upper, lower] = Triangle::square_halves(self.size);
        self.variance_left.compute(&view, upper);
        self.variance_right.compute(&view, lower);
        self.dirty = false;
    }

    /// Split both base triangles down to the resolution `params` asks for.
    ///
    /// Only meaningful for visible patches; the landscape skips hidden ones.
    pub fn tessellate(&self, pool: &mut TriPool, params: &TessellationParams) {
        let [upper, lower] = Triangle::square_halves(self.size);
        tessellate_node(
            pool,
            &self.variance_left,
            params,
            self.base_left,
            upper.translate(self.origin),
            1,
        );
        tessellate_node(
            pool,
            &self.variance_right,
            params,
            self.base_right,
            lower.translate(self.origin),
            1,
        );
    }

    /// Emit every leaf triangle to `sink` in patch-local coordinates and
    /// return how many were emitted.
    pub fn render(
        &self,
        pool: &TriPool,
        field: &HeightField,
        shading: ShadingMode,
        sink: &mut dyn TriangleSink,
    ) -> u32 {
        let view = field.view(self.origin);
        let [upper, lower] = Triangle::square_halves(self.size);
        let mut out = LeafWriter {
            pool,
            heights: view,
            shading,
            sink,
            count: 0,
        };
        out.sink.begin_patch(self.origin);
        out.emit(self.base_left, upper);
        out.emit(self.base_right, lower);
        out.sink.end_patch();
        out.count
    }

    /// Flag the variance trees as stale after a height edit.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// True if `(x, y)` is sampled by this patch, far edges included.
    pub fn contains_sample(&self, x: i32, y: i32) -> bool {
        let far = self.origin + IVec2::splat(self.size);
        (self.origin.x..=far.x).contains(&x) && (self.origin.y..=far.y).contains(&y)
    }

    /// World-space center used for culling.
    pub fn center(&self) -> IVec2 {
        self.origin + IVec2::splat(self.size / 2)
    }

    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn base_left(&self) -> NodeId {
        self.base_left
    }

    pub fn base_right(&self) -> NodeId {
        self.base_right
    }

    pub fn variance_left(&self) -> &VarianceTree {
        &self.variance_left
    }

    pub fn variance_right(&self) -> &VarianceTree {
        &self.variance_right
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Split `id` while it matters from the viewpoint, then descend.
///
/// `tri` is in world coordinates so distances can be taken directly.
fn tessellate_node(
    pool: &mut TriPool,
    variance: &VarianceTree,
    params: &TessellationParams,
    id: NodeId,
    tri: Triangle,
    index: usize,
) {
    // Variance recursion stops below extent 8 and at the heap's end, so an
    // unset slot or one past the heap means the parent already needed
    // detail here; keep going down.
    let wants_split = match variance.get(index) {
        Some(stored) if stored > 0 => {
            params.importance(stored, tri.center()) > params.threshold
        }
        _ => true,
    };
    if !wants_split {
        return;
    }

    pool.split(id);

    if let Some([left, right]) = pool.node(id).children
        && tri.extent() >= MIN_SPLIT_EXTENT
    {
        let (left_tri, right_tri) = tri.bisect();
        let (left_index, right_index) = heap_child_indices(index);
        tessellate_node(pool, variance, params, left, left_tri, left_index);
        tessellate_node(pool, variance, params, right, right_tri, right_index);
    }
}

struct LeafWriter<'a, 's> {
    pool: &'a TriPool,
    heights: HeightView<'a>,
    shading: ShadingMode,
    sink: &'s mut dyn TriangleSink,
    count: u32,
}

impl LeafWriter<'_, '_> {
    fn emit(&mut self, id: NodeId, tri: Triangle) {
        match self.pool.node(id).children {
            Some([left, right]) => {
                let (left_tri, right_tri) = tri.bisect();
                self.emit(left, left_tri);
                self.emit(right, right_tri);
            }
            None => {
                let corners = [tri.left, tri.right, tri.apex];
                let heights = corners.map(|c| self.heights.get(c));
                self.sink
                    .triangle(shade_triangle(corners, heights, self.shading));
                self.count += 1;
            }
        }
    }
}
