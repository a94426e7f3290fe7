//! Engine configuration.
//!
//! Provides run parameters for the headless host: galaxy generation, frame
//! pacing, simulated duration, statistics, snapshot output, and the nested
//! AI tunables. Configuration is loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use starlane_common::SchemaVersion;
use starlane_sim::{AiConfig, GalaxyShape, SnapshotFormat};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "starlane.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Schema version of this file
    pub config_version: SchemaVersion,

    // === World Settings ===
    /// Galaxy and AI seed (None = random)
    pub seed: Option<u64>,
    /// Generated galaxy layout
    pub galaxy: GalaxyShape,

    // === Timing Settings ===
    /// Target frames per second in real-time mode
    pub target_fps: u32,
    /// Fixed simulation step in seconds
    pub fixed_dt: f32,
    /// Simulated run length in seconds
    pub duration_secs: f32,
    /// Simulation speed multiplier
    pub time_scale: f32,
    /// Pace frames against the wall clock instead of running flat out
    pub realtime: bool,

    // === Player Settings ===
    /// Player ship name
    pub player_name: String,
    /// Player hull class
    pub player_class: String,
    /// Fly the player between stations automatically
    pub player_autopilot: bool,

    // === Output Settings ===
    /// Seconds of simulated time between statistics lines (0 = disabled)
    pub stats_interval_secs: f32,
    /// Where to write the final snapshot, if anywhere
    pub snapshot_path: Option<PathBuf>,
    /// Snapshot encoding
    pub snapshot_format: SnapshotFormat,

    // === AI Settings ===
    /// NPC tunables
    pub ai: AiConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            config_version: SchemaVersion::ENGINE_CONFIG,

            seed: None,
            galaxy: GalaxyShape::default(),

            target_fps: 60,
            fixed_dt: 1.0 / 60.0,
            duration_secs: 600.0,
            time_scale: 1.0,
            realtime: false,

            player_name: "Wayfarer".to_string(),
            player_class: "Sparrow Courier".to_string(),
            player_autopilot: true,

            stats_interval_secs: 60.0,
            snapshot_path: None,
            snapshot_format: SnapshotFormat::Json,

            ai: AiConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from [`CONFIG_FILE`] in the working directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let mut contents = String::new();
        if let Err(e) = fs::File::open(path).and_then(|mut file| file.read_to_string(&mut contents)) {
            warn!("Failed to read config file: {e}");
            return Self::default();
        }

        match toml::from_str::<Self>(&contents) {
            Ok(config) if !SchemaVersion::ENGINE_CONFIG.can_read(&config.config_version) => {
                warn!(
                    "Config version {} is not readable by {}, using defaults",
                    config.config_version,
                    SchemaVersion::ENGINE_CONFIG
                );
                Self::default()
            },
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Timing
        self.target_fps = self.target_fps.clamp(1, 240);
        self.fixed_dt = self.fixed_dt.clamp(0.001, 0.25);
        self.duration_secs = self.duration_secs.max(0.0);
        self.time_scale = self.time_scale.clamp(0.01, 1_000.0);
        self.stats_interval_secs = self.stats_interval_secs.max(0.0);

        // Galaxy
        self.galaxy.sectors = self.galaxy.sectors.clamp(1, 16);
        self.galaxy.systems_per_sector = self.galaxy.systems_per_sector.clamp(1, 32);
        self.galaxy.min_stations = self.galaxy.min_stations.clamp(1, 16);
        self.galaxy.max_stations = self.galaxy.max_stations.clamp(self.galaxy.min_stations, 16);
        self.galaxy.system_radius = self.galaxy.system_radius.max(100.0);

        self.ai.validate();
    }

    /// Simulated milliseconds covered by one fixed step.
    #[must_use]
    pub fn step_ms(&self) -> f64 {
        f64::from(self.fixed_dt) * 1000.0 * f64::from(self.time_scale)
    }
}
