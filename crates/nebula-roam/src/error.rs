//! Error types for landscape construction and height-field access.

use crate::variance::MAX_VARIANCE_DEPTH;

/// Errors raised when building or editing a [`HeightField`](crate::HeightField).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeightFieldError {
    /// A height field needs at least one sample.
    #[error("height field must have a non-zero size")]
    Empty,

    /// The sample buffer does not hold `size * size` samples.
    #[error("height field of size {size} needs {expected} samples, got {actual}")]
    SampleCount {
        size: usize,
        expected: usize,
        actual: usize,
    },

    /// A write addressed a sample outside the grid.
    #[error("sample ({x}, {y}) lies outside a {size}x{size} height field")]
    OutOfBounds { x: usize, y: usize, size: usize },
}

/// Errors raised when a [`Landscape`](crate::Landscape) cannot be built.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LandscapeError {
    /// The patch grid must have at least one patch per side.
    #[error("patch grid must have at least one patch per side")]
    NoPatches,

    /// The height field does not split evenly into patches.
    #[error("map size {map_size} is not divisible by {patches_per_side} patches per side")]
    UnevenPatches {
        map_size: usize,
        patches_per_side: usize,
    },

    /// Patches must be a power of two wide so bisection stays on the grid.
    #[error("patch size {0} must be a power of two no smaller than 2")]
    PatchSize(usize),

    /// The variance tree depth is outside the supported range.
    #[error("variance depth {0} is outside 1..={max}", max = MAX_VARIANCE_DEPTH)]
    VarianceDepth(u32),

    /// The node pool must be able to hold at least one node.
    #[error("triangle pool capacity must be non-zero")]
    EmptyPool,

    /// A patch coordinate outside the grid was addressed.
    #[error("patch ({x}, {y}) lies outside a {size}x{size} patch grid")]
    PatchOutOfBounds { x: usize, y: usize, size: usize },

    /// A height-field operation failed.
    #[error(transparent)]
    HeightField(#[from] HeightFieldError),
}
