//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Height field and tessellation budget.
    pub terrain: TerrainConfig,
    /// Camera and triangle target.
    pub view: ViewConfig,
    /// Headless run settings.
    pub run: RunConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Where height samples come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TerrainSource {
    /// Fractal simplex noise.
    Generated {
        seed: u32,
        octaves: u32,
        base_frequency: f64,
        lacunarity: f64,
        persistence: f64,
    },
    /// Headerless `map_size * map_size` byte file.
    RawFile { path: PathBuf },
}

impl Default for TerrainSource {
    fn default() -> Self {
        Self::Generated {
            seed: 0,
            octaves: 6,
            base_frequency: 1.0 / 256.0,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

/// Terrain configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Samples along each side of the height field.
    pub map_size: usize,
    /// Patches along each side of the grid; must divide `map_size`.
    pub patches_per_side: usize,
    /// Heap levels of precomputed variance per base triangle.
    pub variance_depth: u32,
    /// Triangle nodes available per frame.
    pub pool_capacity: usize,
    /// Height multiplier applied when rendering.
    pub vertical_scale: f32,
    /// Height sample source.
    pub source: TerrainSource,
}

/// Triangle shading style.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Shading {
    /// Grey per vertex from its height.
    #[default]
    Height,
    /// Flat normal per triangle.
    Lit,
}

/// Camera and budget configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    /// Starting camera position as `(x, height, z)`.
    pub start_position: [f32; 3],
    /// Starting heading in degrees; zero looks toward `-z`.
    pub clip_angle_deg: f32,
    /// Horizontal field of view in degrees.
    pub fov_x_deg: f32,
    /// Triangle count the detail feedback aims for.
    pub desired_triangles: u32,
    /// Detail threshold for the first frame.
    pub initial_detail_threshold: f32,
    /// Heading change per frame while orbiting, in degrees.
    pub orbit_speed_deg: f32,
    /// Triangle shading style.
    pub shading: Shading,
}

/// Headless run configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Frames to simulate.
    pub frames: u32,
    /// Write the last frame's mesh here as Wavefront OBJ.
    pub obj_export: Option<PathBuf>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            map_size: 1024,
            patches_per_side: 16,
            variance_depth: 9,
            pool_capacity: 25_000,
            vertical_scale: 0.5,
            source: TerrainSource::default(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            start_position: [512.0, 150.0, 1200.0],
            clip_angle_deg: 0.0,
            fov_x_deg: 90.0,
            desired_triangles: 10_000,
            initial_detail_threshold: 50.0,
            orbit_speed_deg: 1.0,
            shading: Shading::Height,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 360,
            obj_export: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_path = config_dir.join("config.ron");
        let write_error = |source| ConfigError::Write {
            path: config_path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_error)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(write_error)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = read_config(&config_dir.join("config.ron"))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
