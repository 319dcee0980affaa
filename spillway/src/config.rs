//! Simulation settings, read from `spillway_config.json5`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use spillway_core::SplitterConfig;
use thiserror::Error;

use crate::scene::SceneConfig;

/// Written out the first time the simulation runs without a config file.
pub const DEFAULT_CONFIG: &str = include_str!("../../package-content/spillway_config.json5");

/// Where the binary looks for its config when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "spillway_config.json5";

/// Errors while loading a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or the default could not be written.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
    /// The file is not valid JSON5 for this schema.
    #[error("{}: {source}", .path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying failure.
        source: serde_json5::Error,
    },
    /// Splitter settings were rejected.
    #[error(transparent)]
    Splitter(#[from] spillway_core::ConfigError),
    /// The tick rate is not a positive number.
    #[error("tick_rate must be positive, got {0}")]
    TickRate(f32),
    /// Fill levels would never be logged.
    #[error("log_every must be at least 1")]
    LogInterval,
}

/// Top-level settings of a headless run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation steps per second; each tick advances `1 / tick_rate` seconds.
    pub tick_rate: f32,
    /// Number of ticks to run.
    pub ticks: u32,
    /// Fill levels are logged every this many ticks.
    pub log_every: u32,
    /// Settings shared by every container's splitter.
    pub splitter: SplitterConfig,
    /// Containers and obstacles.
    pub scene: SceneConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 50.0,
            ticks: 500,
            log_every: 50,
            splitter: SplitterConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Reads the config at `path`, or writes the bundled default there and
    /// uses it if the file does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let text = if path.exists() {
            fs::read_to_string(path).map_err(io_error)?
        } else {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(io_error)?;
            }
            fs::write(path, DEFAULT_CONFIG).map_err(io_error)?;
            log::info!("Wrote default config to {}", path.display());
            DEFAULT_CONFIG.to_string()
        };

        Self::parse(&text, path)
    }

    /// Parses and validates config text. `path` is only used in errors.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json5::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(ConfigError::TickRate(self.tick_rate));
        }
        if self.log_every == 0 {
            return Err(ConfigError::LogInterval);
        }
        self.splitter.validate()?;
        Ok(())
    }

    /// Seconds advanced per tick.
    #[must_use]
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use std::{env, process};

    use super::*;

    #[test]
    fn test_bundled_default_is_valid() {
        let config = SimulationConfig::parse(DEFAULT_CONFIG, Path::new(DEFAULT_CONFIG_PATH))
            .expect("bundled config parses");
        assert!(!config.scene.containers.is_empty());
        assert_eq!(config.splitter, SplitterConfig::default());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let text = "{ ticks: 10, splitter: { max_hops: 2 } }";
        let config = SimulationConfig::parse(text, Path::new("x")).expect("partial config parses");
        assert_eq!(config.ticks, 10);
        assert_eq!(config.tick_rate, 50.0);
        assert_eq!(config.splitter.max_hops, 2);
        assert_eq!(config.splitter.split_speed, 2.0);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let path = Path::new("x");
        assert!(matches!(
            SimulationConfig::parse("{ tick_rate: 0 }", path),
            Err(ConfigError::TickRate(_))
        ));
        assert!(matches!(
            SimulationConfig::parse("{ log_every: 0 }", path),
            Err(ConfigError::LogInterval)
        ));
        assert!(matches!(
            SimulationConfig::parse("{ splitter: { probe_buffer_capacity: 0 } }", path),
            Err(ConfigError::Splitter(_))
        ));
        assert!(matches!(
            SimulationConfig::parse("{ ticks: \"many\" }", path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = env::temp_dir().join(format!("spillway-config-{}", process::id()));
        let path = dir.join("nested").join(DEFAULT_CONFIG_PATH);
        let _ = fs::remove_dir_all(&dir);

        let created = SimulationConfig::load_or_create(&path).expect("default is written");
        assert_eq!(fs::read_to_string(&path).expect("file exists"), DEFAULT_CONFIG);

        let loaded = SimulationConfig::load_or_create(&path).expect("written file loads");
        assert_eq!(created, loaded);

        let _ = fs::remove_dir_all(&dir);
    }
}
