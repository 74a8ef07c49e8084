use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pulse_control::{ControllerConfig, JsonFileStore, MemoryStore, Mode, ModeController, SettingsEditor, SettingsStore};
use pulse_surface::{DriverConfig, FrameDriver, RasterCanvas};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless host for the pulse ring-pattern renderer")]
struct Args {
    /// JSON settings file (created on first write)
    #[arg(long, default_value = "pulse-settings.json")]
    settings: PathBuf,

    /// Surface width in pixels
    #[arg(long, default_value_t = 400)]
    width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Target frame rate while visible
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// How long the surface stays visible
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Store this mode (default, custom, random) before starting
    #[arg(long)]
    mode: Option<Mode>,

    /// Write the last frame to this PNG file
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Cap on points drawn per frame
    #[arg(long)]
    max_points: Option<usize>,

    /// Seed for Random-mode rerolls
    #[arg(long)]
    seed: Option<u64>,
}

fn open_store(path: &Path) -> Arc<dyn SettingsStore> {
    match JsonFileStore::open(path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("Cannot use settings file {}: {}. Falling back to in-memory settings", path.display(), e);
            Arc::new(MemoryStore::new())
        }
    }
}

/// How long to keep the surface visible. Negative and NaN mean zero.
fn run_time(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds.max(0.0))
        .with_context(|| format!("--seconds {} is not a usable run time", seconds))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let run_time = run_time(args.seconds)?;

    let store = open_store(&args.settings);
    if let Some(mode) = args.mode {
        SettingsEditor::new(store.clone()).set_mode(mode);
    }

    let mut controller_config = ControllerConfig::default();
    controller_config.seed = args.seed;
    let controller = ModeController::new(store, controller_config);
    log::info!("Starting in {} mode", controller.mode());

    let driver_config = DriverConfig::default()
        .with_fps(args.fps)
        .with_max_points(args.max_points);
    let mut driver = FrameDriver::new(
        controller.clone(),
        RasterCanvas::new(args.width, args.height),
        driver_config,
    );

    driver.on_surface_ready(args.width, args.height);
    driver.on_visibility_changed(true);
    thread::sleep(run_time);
    driver.on_visibility_changed(false);
    driver.on_surface_destroyed();

    log::info!(
        "Presented {} frames ({} skipped) in {:.1}s, final mode {}",
        driver.frames_presented(),
        driver.frames_skipped(),
        args.seconds,
        controller.mode()
    );

    if let Some(path) = &args.snapshot {
        driver
            .with_presenter(|canvas| canvas.save_png(path))
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
        log::info!("Snapshot written to {}", path.display());
    }

    Ok(())
}
