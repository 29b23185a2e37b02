//! Frame loop: an orbiting camera over a landscape, with the detail
//! feedback carried from frame to frame.

use glam::{Vec2, Vec3};
use nebula_config::{Config, Shading, TerrainConfig, TerrainSource};
use nebula_roam::{
    FrameContext, FrameStats, HeightField, HeightFieldError, Landscape, LandscapeConfig,
    MeshBuffer, ShadingMode, TriangleCounter, TriangleSink, ViewParams,
};
use nebula_terrain::{HeightmapParams, HeightmapSampler, TerrainError, load_raw};
use tracing::{debug, info, instrument};

use crate::AppError;

/// Camera circling the map centre, always looking at it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub center: Vec2,
    pub radius: f32,
    pub height: f32,
    pub heading_deg: f32,
    pub step_deg: f32,
}

impl OrbitCamera {
    /// Orbit through `start` (`x, height, z`) around `center`, beginning at
    /// `heading_deg`.
    pub fn through(start: Vec3, center: Vec2, heading_deg: f32, step_deg: f32) -> Self {
        Self {
            center,
            radius: Vec2::new(start.x, start.z).distance(center),
            height: start.y,
            heading_deg,
            step_deg,
        }
    }

    /// Eye position. Heading zero looks toward `-z`, so the eye sits on the
    /// `+z` side of the centre.
    pub fn position(&self) -> Vec3 {
        let (sin, cos) = self.heading_deg.to_radians().sin_cos();
        let ground = self.center + self.radius * Vec2::new(-sin, cos);
        Vec3::new(ground.x, self.height, ground.y)
    }

    pub fn view(&self, fov_x_deg: f32) -> ViewParams {
        ViewParams {
            position: self.position(),
            clip_angle_deg: self.heading_deg,
            fov_x_deg,
        }
    }

    pub fn advance(&mut self) {
        self.heading_deg = (self.heading_deg + self.step_deg).rem_euclid(360.0);
    }
}

/// Inputs to [`run`].
#[derive(Clone, Debug)]
pub struct RunSettings {
    pub frames: u32,
    pub desired_triangles: u32,
    pub initial_detail_threshold: f32,
    pub fov_x_deg: f32,
    pub shading: ShadingMode,
    pub camera: OrbitCamera,
    /// Collect the last frame's vertices.
    pub capture_last_frame: bool,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        let view = &config.view;
        let half = config.terrain.map_size as f32 * 0.5;
        Self {
            frames: config.run.frames,
            desired_triangles: view.desired_triangles,
            initial_detail_threshold: view.initial_detail_threshold,
            fov_x_deg: view.fov_x_deg,
            shading: shading_mode(view.shading),
            camera: OrbitCamera::through(
                Vec3::from_array(view.start_position),
                Vec2::splat(half),
                view.clip_angle_deg,
                view.orbit_speed_deg,
            ),
            capture_last_frame: config.run.obj_export.is_some(),
        }
    }
}

/// How a run went.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub frames: u32,
    pub mean_triangles: f64,
    /// Mean triangle count over the last quarter of frames.
    pub settled_triangles: f64,
    /// `|settled - desired| / desired`; zero when no target is set.
    pub settled_error: f64,
    pub final_threshold: f32,
    pub exhausted_frames: u32,
    pub peak_nodes: usize,
    pub illegal_neighbors: u64,
    pub variance_updates: usize,
    pub last_mesh: Option<MeshBuffer>,
}

pub fn shading_mode(shading: Shading) -> ShadingMode {
    match shading {
        Shading::Height => ShadingMode::Height,
        Shading::Lit => ShadingMode::Lit,
    }
}

pub fn landscape_config(terrain: &TerrainConfig) -> LandscapeConfig {
    LandscapeConfig {
        patches_per_side: terrain.patches_per_side,
        variance_depth: terrain.variance_depth,
        pool_capacity: terrain.pool_capacity,
        vertical_scale: terrain.vertical_scale,
    }
}

/// Generate or load the configured height field.
pub fn build_height_field(terrain: &TerrainConfig) -> Result<HeightField, TerrainError> {
    if terrain.map_size == 0 {
        return Err(HeightFieldError::Empty.into());
    }
    match &terrain.source {
        TerrainSource::Generated {
            seed,
            octaves,
            base_frequency,
            lacunarity,
            persistence,
        } => {
            let sampler = HeightmapSampler::new(HeightmapParams {
                seed: *seed,
                octaves: *octaves,
                lacunarity: *lacunarity,
                persistence: *persistence,
                base_frequency: *base_frequency,
            });
            Ok(sampler.generate(terrain.map_size))
        }
        TerrainSource::RawFile { path } => load_raw(path, terrain.map_size),
    }
}

/// Fly the camera for `settings.frames` frames.
#[instrument(skip_all, fields(frames = settings.frames))]
pub fn run(landscape: &mut Landscape, settings: &RunSettings) -> RunSummary {
    let mut camera = settings.camera;
    let mut ctx = FrameContext::new(camera.view(settings.fov_x_deg), settings.desired_triangles)
        .with_detail_threshold(settings.initial_detail_threshold)
        .with_shading(settings.shading);

    let mut counter = TriangleCounter::default();
    let mut mesh = MeshBuffer::new();
    let mut history = Vec::with_capacity(settings.frames as usize);
    let mut summary = RunSummary::default();

    for frame in 0..settings.frames {
        ctx.view = camera.view(settings.fov_x_deg);
        let last = frame + 1 == settings.frames;
        let sink: &mut dyn TriangleSink = if last && settings.capture_last_frame {
            &mut mesh
        } else {
            &mut counter
        };
        let stats = landscape.frame(&mut ctx, sink);
        record(&mut summary, frame, &stats);
        history.push(stats.triangles_rendered);
        camera.advance();
    }

    summary.frames = settings.frames;
    summary.final_threshold = ctx.detail_threshold;
    summary.mean_triangles = mean(&history);
    summary.settled_triangles = mean(&history[history.len() - history.len().div_ceil(4)..]);
    if settings.desired_triangles > 0 {
        let target = f64::from(settings.desired_triangles);
        summary.settled_error = (summary.settled_triangles - target).abs() / target;
    }
    if settings.capture_last_frame && settings.frames > 0 {
        summary.last_mesh = Some(mesh);
    }

    info!(
        mean_triangles = summary.mean_triangles,
        settled_triangles = summary.settled_triangles,
        settled_error = summary.settled_error,
        final_threshold = summary.final_threshold,
        exhausted_frames = summary.exhausted_frames,
        peak_nodes = summary.peak_nodes,
        "run finished"
    );
    summary
}

fn record(summary: &mut RunSummary, frame: u32, stats: &FrameStats) {
    debug!(
        frame,
        visible = stats.visible_patches,
        triangles = stats.triangles_rendered,
        nodes = stats.nodes_allocated,
        illegal_neighbors = stats.illegal_neighbors,
        threshold = stats.detail_threshold,
        "frame"
    );
    if stats.pool_exhausted {
        summary.exhausted_frames += 1;
    }
    summary.peak_nodes = summary.peak_nodes.max(stats.nodes_allocated);
    summary.illegal_neighbors += u64::from(stats.illegal_neighbors);
    summary.variance_updates += stats.variance_updates;
}

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64
}

/// Build everything from `config` and run it.
pub fn run_from_config(config: &Config) -> Result<RunSummary, AppError> {
    let field = build_height_field(&config.terrain)?;
    let mut landscape = Landscape::new(field, &landscape_config(&config.terrain))?;
    Ok(run(&mut landscape, &RunSettings::from_config(config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_terrain::save_raw;

    const EPSILON: f32 = 1e-3;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.terrain.map_size = 128;
        config.terrain.patches_per_side = 2;
        config.terrain.pool_capacity = 20_000;
        config.view.start_position = [64.0, 100.0, 400.0];
        config.view.desired_triangles = 500;
        config.run.frames = 12;
        config
    }

    #[test]
    fn test_orbit_starts_at_start_position() {
        let start = Vec3::new(512.0, 150.0, 1200.0);
        let camera = OrbitCamera::through(start, Vec2::splat(512.0), 0.0, 1.0);
        assert!((camera.radius - 688.0).abs() < EPSILON);
        assert!(camera.position().distance(start) < EPSILON);
    }

    #[test]
    fn test_orbit_quarter_turn_faces_centre() {
        let mut camera = OrbitCamera::through(Vec3::new(0.0, 10.0, 100.0), Vec2::ZERO, 0.0, 90.0);
        camera.advance();
        // Heading 90 looks toward +x, so the eye is on the -x side.
        let p = camera.position();
        assert!((p.x + 100.0).abs() < EPSILON && p.z.abs() < EPSILON);
        assert_eq!(camera.view(60.0).clip_angle_deg, 90.0);
    }

    #[test]
    fn test_heading_wraps() {
        let mut camera = OrbitCamera::through(Vec3::Z, Vec2::ZERO, 350.0, 20.0);
        camera.advance();
        assert!((camera.heading_deg - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_settings_follow_config() {
        let mut config = small_config();
        config.view.shading = Shading::Lit;
        config.run.obj_export = Some("out.obj".into());
        let settings = RunSettings::from_config(&config);
        assert_eq!(settings.shading, ShadingMode::Lit);
        assert!(settings.capture_last_frame);
        assert_eq!(settings.camera.center, Vec2::splat(64.0));
        assert!((settings.camera.radius - 336.0).abs() < EPSILON);
    }

    #[test]
    fn test_run_reports_every_frame() {
        let summary = run_from_config(&small_config()).unwrap();
        assert_eq!(summary.frames, 12);
        assert!(summary.mean_triangles > 0.0);
        assert_eq!(summary.exhausted_frames, 0);
        // Every patch computes variance once on construction, never again.
        assert_eq!(summary.variance_updates, 0);
        assert!(summary.last_mesh.is_none());
    }

    #[test]
    fn test_last_frame_is_captured() {
        let mut config = small_config();
        config.run.obj_export = Some("last.obj".into());
        let summary = run_from_config(&config).unwrap();
        let mesh = summary.last_mesh.expect("mesh captured");
        assert!(mesh.triangle_count() >= 2);
    }

    #[test]
    fn test_zero_frames() {
        let mut config = small_config();
        config.run.frames = 0;
        config.run.obj_export = Some("last.obj".into());
        let summary = run_from_config(&config).unwrap();
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.mean_triangles, 0.0);
        assert!(summary.last_mesh.is_none());
        assert_eq!(summary.final_threshold, config.view.initial_detail_threshold);
    }

    #[test]
    fn test_raw_source_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.raw");
        save_raw(&path, &HeightField::flat(128, 7)).unwrap();

        let mut config = small_config();
        config.terrain.source = TerrainSource::RawFile { path };
        let field = build_height_field(&config.terrain).unwrap();
        assert_eq!(field.get(100, 100), 7);
    }

    #[test]
    fn test_missing_raw_file_is_an_error() {
        let mut config = small_config();
        config.terrain.source = TerrainSource::RawFile {
            path: "/nonexistent/height.raw".into(),
        };
        assert!(matches!(
            run_from_config(&config),
            Err(AppError::Terrain(TerrainError::Io { .. }))
        ));
    }

    #[test]
    fn test_zero_map_size_is_an_error() {
        let mut config = small_config();
        config.terrain.map_size = 0;
        assert!(matches!(
            run_from_config(&config),
            Err(AppError::Terrain(TerrainError::HeightField(HeightFieldError::Empty)))
        ));
    }

    #[test]
    fn test_bad_patch_count_is_an_error() {
        let mut config = small_config();
        config.terrain.patches_per_side = 3;
        assert!(matches!(run_from_config(&config), Err(AppError::Landscape(_))));
    }
}
