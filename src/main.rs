//! actionloop headless runner.
//!
//! Builds an [`Engine`], populates the demo scene and runs it for a fixed
//! number of frames at the configured rate, logging what the scheduler and
//! the action manager do along the way.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 300 --time-scale 0.5
//! ```

use std::path::PathBuf;

use actionloop::game::{Engine, setup_demo_scene};
use actionloop::resources::actionmanager::ActionManager;
use actionloop::resources::gameconfig::GameConfig;
use actionloop::resources::scheduler::Scheduler;
use actionloop::resources::worldtime::WorldTime;
use clap::Parser;

/// Frame-driven timers and actions, run headless.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Frames to run; overrides `[run] frames`.
    #[arg(long)]
    frames: Option<u64>,

    /// Global time scale; overrides `[time] time_scale`.
    #[arg(long)]
    time_scale: Option<f32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    if let Some(frames) = cli.frames {
        config.frames = frames;
    }
    if let Some(scale) = cli.time_scale {
        if scale > 0.0 {
            config.time_scale = scale;
        } else {
            log::error!("--time-scale must be positive, got {}", scale);
            std::process::exit(1);
        }
    }

    let frames = config.frames;
    let mut engine = Engine::with_config(config);
    let scene = setup_demo_scene(engine.world_mut());
    log::info!("demo scene: {:?}", scene);

    engine.run_frames(frames);

    let world = engine.world();
    let time = world.resource::<WorldTime>();
    log::info!(
        "ran {} frames, {:.2}s simulated, {} action(s) and {} timer(s) left",
        time.frame_count,
        time.elapsed,
        world.resource::<ActionManager>().total_actions(),
        world.resource::<Scheduler>().timer_count()
    );
}
