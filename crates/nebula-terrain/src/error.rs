//! Errors raised while loading or saving height data.

use std::path::PathBuf;

use nebula_roam::HeightFieldError;

#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// Reading or writing a height file failed.
    #[error("height file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not hold exactly `size * size` bytes.
    #[error("height file {path} has {actual} bytes, expected {expected} for a {size}x{size} map")]
    SizeMismatch {
        path: PathBuf,
        size: usize,
        expected: usize,
        actual: usize,
    },

    /// The samples could not form a height field.
    #[error(transparent)]
    HeightField(#[from] HeightFieldError),
}
