//! Configuration module for tablet-ink
//!
//! This module handles loading the TOML configuration that tells a host which
//! device to open, which driver decodes it and how the stroke buffer behaves.
//!
//! # Config Location
//!
//! The default configuration file lives in the platform config directory
//! under `dev.tablet-ink`:
//!
//! - **Linux**: `~/.config/dev.tablet-ink/config.toml`
//! - **macOS**: `~/Library/Application Support/dev.tablet-ink/config.toml`
//!
//! # Example
//!
//! ```toml
//! [device]
//! path = "/dev/input/event5"
//! driver = "evdev"
//!
//! [buffer]
//! initial_capacity = 2048
//! growth_increment = 1024
//! max_points = 100000
//!
//! [evdev]
//! screen_width = 2560
//! screen_height = 1440
//! x_range = { min = 0, max = 21600 }
//! y_range = { min = 0, max = 13500 }
//! ```

pub mod settings;

pub use settings::*;

use crate::driver::DRIVER_NAMES;
use crate::error::{Result, ResultExt, TabletError};
use crate::stroke::MAX_INITIAL_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "dev.tablet-ink";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Get the default configuration file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID).join(CONFIG_FILE))
}

/// Complete configuration for one tablet session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabletConfig {
    /// Device node and driver selection
    pub device: DeviceConfig,

    /// Stroke buffer policy
    pub buffer: BufferConfig,

    /// Evdev driver settings
    pub evdev: EvdevConfig,

    /// Mock driver settings
    pub mock: MockConfig,

    /// Logging output
    pub logging: LoggingConfig,
}

impl TabletConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| TabletError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(TabletError::from)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    /// Load configuration, returning defaults if any error occurs
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default configuration: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(TabletError::from)
                .context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| TabletError::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(TabletError::from)
            .with_context(|| format!("Failed to write config file {:?}", path))
    }

    /// Check values that would make a session unusable
    pub fn validate(&self) -> Result<()> {
        if !DRIVER_NAMES.contains(&self.device.driver.as_str()) {
            return Err(TabletError::Config(format!(
                "Unknown driver '{}' (available: {})",
                self.device.driver,
                DRIVER_NAMES.join(", ")
            )));
        }
        if self.buffer.growth_increment == 0 {
            return Err(TabletError::Config(
                "buffer.growth_increment must be at least 1".to_string(),
            ));
        }
        if self.mock.packet_size == 0 {
            return Err(TabletError::Config(
                "mock.packet_size must be at least 1".to_string(),
            ));
        }
        self.evdev.check_screen().map_err(TabletError::Config)?;
        if self.buffer.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(TabletError::Config(format!(
                "buffer.initial_capacity must be at most {}, got {}",
                MAX_INITIAL_CAPACITY, self.buffer.initial_capacity
            )));
        }
        if self.evdev.record_size != EVDEV_RECORD_SIZE_64
            && self.evdev.record_size != EVDEV_RECORD_SIZE_32
        {
            return Err(TabletError::Config(format!(
                "evdev.record_size must be {} or {}, got {}",
                EVDEV_RECORD_SIZE_32, EVDEV_RECORD_SIZE_64, self.evdev.record_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TabletConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.device.driver, "evdev");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = TabletConfig::from_toml_str(
            r#"
            [device]
            driver = "mock"

            [buffer]
            max_points = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.device.driver, "mock");
        assert_eq!(config.device.path, PathBuf::from(DEFAULT_DEVICE_PATH));
        assert_eq!(config.buffer.initial_capacity, 2048);
        assert_eq!(config.buffer.max_points, Some(500));
    }

    #[test]
    fn test_unknown_driver_rejected() {
        let err = TabletConfig::from_toml_str("[device]\ndriver = \"lxbi\"\n").unwrap_err();
        assert!(err.to_string().contains("lxbi"));
    }

    #[test]
    fn test_zero_increment_rejected() {
        let mut config = TabletConfig::default();
        config.buffer.growth_increment = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_values_rejected() {
        let err = TabletConfig::from_toml_str("[buffer]\ninitial_capacity = 9223372036854775807\n")
            .unwrap_err();
        assert!(err.to_string().contains("initial_capacity"));

        let mut config = TabletConfig::default();
        config.evdev.screen_width = u32::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_record_size_rejected() {
        let mut config = TabletConfig::default();
        config.evdev.record_size = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = TabletConfig::default();
        config.device.path = PathBuf::from("/dev/input/event7");
        config.buffer.max_points = Some(4096);
        config.evdev.screen_width = 2560;
        config.save(&path).unwrap();

        let loaded = TabletConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_keeps_io_cause() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = TabletConfig::load(&path).unwrap_err();

        match err {
            TabletError::WithContext { context, source } => {
                assert!(context.contains("missing.toml"));
                assert!(matches!(*source, TabletError::Io(_)));
            }
            other => panic!("Expected context-wrapped IO error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[device]\ndriver = \"lxbi\"\n").unwrap();

        let err = TabletConfig::load(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bad.toml"));
        assert!(message.contains("lxbi"));
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = TabletConfig::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config, TabletConfig::default());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(Path::new(APP_ID).join(CONFIG_FILE)));
        }
    }
}
