//! Engine configuration resource.
//!
//! Timing settings loaded from an INI file, with defaults for a safe startup.
//!
//! # Configuration File Format
//!
//! ```ini
//! [time]
//! target_fps = 60
//! time_scale = 1.0
//!
//! [run]
//! frames = 240
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_FRAMES: u64 = 240;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Fixed simulation rate; each tick advances `1 / target_fps` seconds.
    pub target_fps: u32,
    /// Initial [`Scheduler`](crate::resources::scheduler::Scheduler) time scale.
    pub time_scale: f32,
    /// Frames to run before the headless loop exits.
    pub frames: u64,
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            time_scale: DEFAULT_TIME_SCALE,
            frames: DEFAULT_FRAMES,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. Out of range values are
    /// rejected.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config)
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<(), String> {
        // [time] section
        if let Some(fps) = config.getuint("time", "target_fps").ok().flatten() {
            if fps == 0 {
                return Err("target_fps must be at least 1".to_string());
            }
            self.target_fps = fps as u32;
        }
        if let Some(scale) = config.getfloat("time", "time_scale").ok().flatten() {
            if scale <= 0.0 {
                return Err(format!("time_scale must be positive, got {}", scale));
            }
            self.time_scale = scale as f32;
        }

        // [run] section
        if let Some(frames) = config.getuint("run", "frames").ok().flatten() {
            self.frames = frames;
        }

        info!(
            "Loaded config: fps={}, time_scale={}, frames={}",
            self.target_fps, self.time_scale, self.frames
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("time", "target_fps", Some(self.target_fps.to_string()));
        config.set("time", "time_scale", Some(self.time_scale.to_string()));
        config.set("run", "frames", Some(self.frames.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Seconds per tick at the target frame rate.
    pub fn fixed_delta(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}
