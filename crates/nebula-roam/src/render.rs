//! Triangle output: vertex format, shading, and render sinks.
//!
//! The landscape never talks to a graphics API. It streams leaf triangles
//! into a [`TriangleSink`], bracketed by per-frame and per-patch calls that
//! carry the vertical scale and patch translation.

use bytemuck::{Pod, Zeroable};
use glam::{IVec2, Vec3};

/// How leaf triangles are shaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShadingMode {
    /// Per-vertex grey derived from each corner's height.
    #[default]
    Height,
    /// One flat normal per triangle, grey from the left corner.
    Lit,
}

/// A single emitted vertex in patch-local space.
///
/// `position` is `(x, height, y)` with the raw, unscaled sample height.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub shade: f32,
    pub normal: [f32; 3],
    pub _padding: f32,
}

const _: () = assert!(
    std::mem::size_of::<TerrainVertex>() == 32,
    "TerrainVertex size changed"
);

impl TerrainVertex {
    pub fn new(position: Vec3, shade: f32, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            shade,
            normal: normal.to_array(),
            _padding: 0.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Grey intensity for a height sample, brighter with elevation.
pub fn height_shade(height: u8) -> f32 {
    ((60.0 + f32::from(height)) / 256.0).min(1.0)
}

/// Unit normal of the triangle `(left, right, apex)` in `(x, height, y)`
/// space. Level triangles produced by the tree face `+Y`.
pub fn flat_normal(left: Vec3, right: Vec3, apex: Vec3) -> Vec3 {
    (left - right).cross(right - apex).normalize_or_zero()
}

/// Build the three vertices of a leaf triangle.
///
/// `corners` holds `(x, y)` grid positions and `heights` the matching
/// samples, both ordered left, right, apex.
pub fn shade_triangle(
    corners: [IVec2; 3],
    heights: [u8; 3],
    mode: ShadingMode,
) -> [TerrainVertex; 3] {
    let positions = [0, 1, 2].map(|i| {
        Vec3::new(
            corners[i].x as f32,
            f32::from(heights[i]),
            corners[i].y as f32,
        )
    });
    match mode {
        ShadingMode::Height => [0, 1, 2]
            .map(|i| TerrainVertex::new(positions[i], height_shade(heights[i]), Vec3::Y)),
        ShadingMode::Lit => {
            let normal = flat_normal(positions[0], positions[1], positions[2]);
            let shade = height_shade(heights[0]);
            positions.map(|p| TerrainVertex::new(p, shade, normal))
        }
    }
}

/// Receiver of a frame's triangle stream.
pub trait TriangleSink {
    /// Called once before any patch, with the uniform height scale.
    fn begin_frame(&mut self, vertical_scale: f32) {
        let _ = vertical_scale;
    }

    /// Called before a patch's triangles; `translation` is the patch's
    /// world-space `(x, y)` offset.
    fn begin_patch(&mut self, translation: IVec2) {
        let _ = translation;
    }

    /// One leaf triangle in patch-local space.
    fn triangle(&mut self, vertices: [TerrainVertex; 3]);

    /// Called after a patch's triangles.
    fn end_patch(&mut self) {}
}

/// Sink that only counts triangles.
#[derive(Debug, Default)]
pub struct TriangleCounter {
    pub triangles: u64,
    pub patches: u64,
}

impl TriangleSink for TriangleCounter {
    fn begin_patch(&mut self, _translation: IVec2) {
        self.patches += 1;
    }

    fn triangle(&mut self, _vertices: [TerrainVertex; 3]) {
        self.triangles += 1;
    }
}

/// Sink that collects world-space vertices, three per triangle.
///
/// Patch translation and vertical scale are applied to positions; normals
/// are kept as computed from the unscaled heights.
#[derive(Debug, Default)]
pub struct MeshBuffer {
    vertices: Vec<TerrainVertex>,
    translation: IVec2,
    vertical_scale: f32,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self {
            vertical_scale: 1.0,
            ..Default::default()
        }
    }

    /// Drop collected vertices, keeping the allocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Iterate collected triangles.
    pub fn triangles(&self) -> impl Iterator<Item = &[TerrainVertex]> {
        self.vertices.chunks_exact(3)
    }

    /// Vertex data ready for upload as a GPU vertex buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl TriangleSink for MeshBuffer {
    fn begin_frame(&mut self, vertical_scale: f32) {
        self.vertices.clear();
        self.vertical_scale = vertical_scale;
    }

    fn begin_patch(&mut self, translation: IVec2) {
        self.translation = translation;
    }

    fn triangle(&mut self, vertices: [TerrainVertex; 3]) {
        let offset = Vec3::new(self.translation.x as f32, 0.0, self.translation.y as f32);
        let scale = Vec3::new(1.0, self.vertical_scale, 1.0);
        self.vertices.extend(vertices.map(|mut v| {
            v.position = (v.position() * scale + offset).to_array();
            v
        }));
    }
}
