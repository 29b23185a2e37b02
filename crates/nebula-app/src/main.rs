//! Headless ROAM terrain runner.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p nebula-app -- --frames 600 --desired-triangles 8000`.

use std::process::ExitCode;

use clap::Parser;
use nebula_app::AppError;
use nebula_app::driver::run_from_config;
use nebula_app::obj::export_obj;
use nebula_app::platform::PlatformDirs;
use nebula_config::{CliArgs, Config};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(dir) => PlatformDirs::with_config_dir(dir),
        None => match PlatformDirs::resolve() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("Failed to resolve platform directories: {e}");
                return ExitCode::FAILURE;
            }
        },
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create platform directories: {e}");
        return ExitCode::FAILURE;
    }

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    nebula_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config, &dirs) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, dirs: &PlatformDirs) -> Result<(), AppError> {
    info!(
        map_size = config.terrain.map_size,
        patches = config.terrain.patches_per_side,
        frames = config.run.frames,
        desired = config.view.desired_triangles,
        "starting"
    );
    let summary = run_from_config(config)?;

    println!("frames:            {}", summary.frames);
    println!("mean triangles:    {:.1}", summary.mean_triangles);
    println!(
        "settled triangles: {:.1} ({:.1}% off target)",
        summary.settled_triangles,
        summary.settled_error * 100.0
    );
    println!("final threshold:   {:.3}", summary.final_threshold);
    println!("peak pool nodes:   {}", summary.peak_nodes);
    println!("exhausted frames:  {}", summary.exhausted_frames);

    if let (Some(path), Some(mesh)) = (&config.run.obj_export, &summary.last_mesh) {
        export_obj(&dirs.export_path(path), mesh)?;
    }
    Ok(())
}
