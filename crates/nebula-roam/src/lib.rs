//! View-dependent terrain tessellation with binary triangle trees.
//!
//! A [`Landscape`] cuts a square [`HeightField`] into patches. Every frame it
//! rebuilds a crack-free mesh from a shared [`TriPool`], splitting where the
//! precomputed variance looks large from the camera, and streams the leaf
//! triangles into a [`TriangleSink`]. A feedback step on the
//! [`FrameContext`] keeps the triangle count near its target.

mod error;
mod frame;
mod height_field;
mod landscape;
mod node;
mod patch;
mod pool;
mod render;
mod split;
mod triangle;
mod variance;
mod visibility;

pub use error::{HeightFieldError, LandscapeError};
pub use frame::{DEFAULT_DETAIL_THRESHOLD, FrameContext, FrameStats, ResetSummary, ViewParams};
pub use height_field::{HeightField, HeightView};
pub use landscape::{Landscape, LandscapeConfig};
pub use node::{NeighborSlot, NodeId, TriNode};
pub use patch::{Patch, TessellationParams};
pub use pool::{DEFAULT_POOL_CAPACITY, TriPool};
pub use render::{
    MeshBuffer, ShadingMode, TerrainVertex, TriangleCounter, TriangleSink, flat_normal,
    height_shade, shade_triangle,
};
pub use triangle::{MIN_SPLIT_EXTENT, Triangle, VARIANCE_MIN_EXTENT};
pub use variance::{
    DEFAULT_VARIANCE_DEPTH, MAX_VARIANCE_DEPTH, VarianceTree, heap_child_indices, midpoint_error,
};
pub use visibility::{FRUSTUM_RAY_LENGTH, ViewWedge, orientation};
