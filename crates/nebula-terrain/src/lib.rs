//! Height field sources for the terrain engine: fBm noise generation and
//! raw 8-bit height files.

mod error;
mod heightmap;
mod raw;

pub use error::TerrainError;
pub use heightmap::{HeightmapParams, HeightmapSampler};
pub use raw::{load_raw, save_raw};
