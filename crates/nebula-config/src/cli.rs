//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, Shading, TerrainSource};

/// Command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "nebula-roam", about = "Headless ROAM terrain tessellation")]
pub struct CliArgs {
    /// Number of frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Triangle count the detail feedback aims for.
    #[arg(long)]
    pub desired_triangles: Option<u32>,

    /// Height field side length in samples.
    #[arg(long)]
    pub map_size: Option<usize>,

    /// Patches along each side of the grid.
    #[arg(long)]
    pub patches: Option<usize>,

    /// Triangle nodes available per frame.
    #[arg(long)]
    pub pool_capacity: Option<usize>,

    /// Seed for generated terrain.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Load heights from a raw 8-bit file instead of generating them.
    #[arg(long)]
    pub heightmap: Option<PathBuf>,

    /// Shade triangles with flat normals.
    #[arg(long)]
    pub lit: bool,

    /// Write the last frame's mesh as Wavefront OBJ.
    #[arg(long)]
    pub export_obj: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(frames) = args.frames {
            self.run.frames = frames;
        }
        if let Some(desired) = args.desired_triangles {
            self.view.desired_triangles = desired;
        }
        if let Some(size) = args.map_size {
            self.terrain.map_size = size;
        }
        if let Some(patches) = args.patches {
            self.terrain.patches_per_side = patches;
        }
        if let Some(capacity) = args.pool_capacity {
            self.terrain.pool_capacity = capacity;
        }
        if let Some(ref path) = args.heightmap {
            self.terrain.source = TerrainSource::RawFile { path: path.clone() };
        } else if let Some(new_seed) = args.seed {
            if !matches!(self.terrain.source, TerrainSource::Generated { .. }) {
                self.terrain.source = TerrainSource::default();
            }
            if let TerrainSource::Generated { seed, .. } = &mut self.terrain.source {
                *seed = new_seed;
            }
        }
        if args.lit {
            self.view.shading = Shading::Lit;
        }
        if let Some(ref path) = args.export_obj {
            self.run.obj_export = Some(path.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
