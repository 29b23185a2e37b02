use std::io;
use std::path::PathBuf;

use nebula_roam::LandscapeError;
use nebula_terrain::TerrainError;
use thiserror::Error;

use crate::platform::PlatformError;

/// Anything that stops a run before or after the frame loop.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("failed to build height field: {0}")]
    Terrain(#[from] TerrainError),

    #[error("invalid landscape: {0}")]
    Landscape(#[from] LandscapeError),

    #[error("failed to export mesh to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
