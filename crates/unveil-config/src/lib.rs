//! Unveil configuration system
//!
//! Loads engine-wide settings from `unveil.toml`, with environment variables
//! layered on top for one-off overrides. The resulting [`UnveilConfig`] is
//! built once at startup and passed around by reference; nothing in it is
//! mutated after loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use unveil_motion::TimingPresets;

/// Default file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "unveil.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UnveilConfig {
    /// Duration/easing presets per timing class and stagger spacing
    pub timing: TimingPresets,
    /// Defaults applied to every animation request
    pub observer: ObserverConfig,
    /// Headless scroll simulation settings
    pub simulation: SimulationConfig,
    /// Recovery reporting
    pub diagnostics: DiagnosticsConfig,
}

/// Visibility observation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Fraction of the element that must be inside the root to count as visible
    pub threshold: f32,
    /// CSS margin shorthand applied to the viewport (negative shrinks it)
    pub root_margin: String,
    /// Animate only the first entrance
    pub trigger_once: bool,
}

/// Scroll simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Ticks per simulated second
    pub fps: u32,
    /// Scroll distance per tick in px
    pub scroll_speed: f32,
    /// Scroll back to the top after reaching the bottom
    pub scroll_back: bool,
}

/// Diagnostics configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Log a warning whenever a variant falls back or a stale callback is dropped
    pub warn_on_fallback: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "-100px".to_string(),
            trigger_once: true,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            fps: 60,
            scroll_speed: 12.0,
            scroll_back: false,
        }
    }
}

fn env_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl UnveilConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `unveil.toml` in the current directory,
    /// or return the defaults if it is missing or unusable
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over file values. Unparsable
    /// values are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("UNVEIL_THRESHOLD")
            && let Ok(threshold) = val.parse::<f32>()
        {
            self.observer.threshold = threshold;
        }
        if let Ok(margin) = std::env::var("UNVEIL_ROOT_MARGIN") {
            self.observer.root_margin = margin;
        }
        if let Ok(val) = std::env::var("UNVEIL_TRIGGER_ONCE") {
            self.observer.trigger_once = env_flag(&val);
        }

        if let Ok(val) = std::env::var("UNVEIL_FPS")
            && let Ok(fps) = val.parse::<u32>()
        {
            self.simulation.fps = fps;
        }
        if let Ok(val) = std::env::var("UNVEIL_SCROLL_SPEED")
            && let Ok(speed) = val.parse::<f32>()
        {
            self.simulation.scroll_speed = speed;
        }

        if let Ok(val) = std::env::var("UNVEIL_WARN_ON_FALLBACK") {
            self.diagnostics.warn_on_fallback = env_flag(&val);
        }
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !(0.0..=1.0).contains(&self.observer.threshold) {
            return Err(ConfigError::Invalid(format!(
                "observer.threshold must be within [0, 1], got {}",
                self.observer.threshold
            )));
        }
        if self.simulation.fps == 0 {
            return Err(ConfigError::Invalid("simulation.fps must be positive".into()));
        }
        let speed = self.simulation.scroll_speed;
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "simulation.scroll_speed must be a positive number of px, got {speed}"
            )));
        }
        if !(self.simulation.viewport_width > 0.0 && self.simulation.viewport_height > 0.0) {
            return Err(ConfigError::Invalid(
                "simulation viewport must have a positive size".into(),
            ));
        }
        Ok(())
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from `unveil.toml` (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Milliseconds per simulation tick
    pub fn frame_ms(&self) -> f32 {
        1000.0 / self.simulation.fps.max(1) as f32
    }
}
