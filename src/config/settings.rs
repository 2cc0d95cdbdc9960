//! Configuration sections
//!
//! Each section of the configuration file maps to one struct here. Every
//! field has a default so a partial file (or none at all) is valid.
//!
//! # Main Types
//!
//! - [`DeviceConfig`] - Which device node to open and which driver decodes it
//! - [`BufferConfig`] - Stroke buffer growth policy and optional limit
//! - [`EvdevConfig`] - Record size and axis scaling for the evdev driver
//! - [`MockConfig`] - Packet size for the mock driver
//! - [`LoggingConfig`] - Optional log directory and filter override

use crate::stroke::{DEFAULT_GROWTH_INCREMENT, DEFAULT_INITIAL_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default device node
pub const DEFAULT_DEVICE_PATH: &str = "/dev/input/event0";

/// Default driver name
pub const DEFAULT_DRIVER: &str = "evdev";

/// Size of `struct input_event` on 64-bit Linux
pub const EVDEV_RECORD_SIZE_64: usize = 24;

/// Size of `struct input_event` on 32-bit Linux
pub const EVDEV_RECORD_SIZE_32: usize = 16;

/// Largest screen dimension that keeps scaled coordinates within `i32`
pub const MAX_SCREEN_SIZE: u32 = i32::MAX as u32;

/// Device selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Path of the character device to read packets from
    pub path: PathBuf,

    /// Registered driver name (see [`crate::driver::DRIVER_NAMES`])
    pub driver: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DEVICE_PATH),
            driver: DEFAULT_DRIVER.to_string(),
        }
    }
}

/// Stroke buffer policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Points allocated when the session starts
    pub initial_capacity: usize,

    /// Points added each time the buffer is full
    pub growth_increment: usize,

    /// Upper bound on stored entries (None = unbounded)
    pub max_points: Option<usize>,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth_increment: DEFAULT_GROWTH_INCREMENT,
            max_points: None,
        }
    }
}

/// Settings for the evdev driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvdevConfig {
    /// Bytes per `input_event` record (24 on 64-bit, 16 on 32-bit)
    pub record_size: usize,

    /// Tablet X axis range as reported by the device
    pub x_range: AxisRange,

    /// Tablet Y axis range as reported by the device
    pub y_range: AxisRange,

    /// Target screen width in pixels
    pub screen_width: u32,

    /// Target screen height in pixels
    pub screen_height: u32,
}

impl Default for EvdevConfig {
    fn default() -> Self {
        Self {
            record_size: default_record_size(),
            x_range: AxisRange { min: 0, max: 4095 },
            y_range: AxisRange { min: 0, max: 4095 },
            screen_width: 1920,
            screen_height: 1080,
        }
    }
}

impl EvdevConfig {
    /// Check that scaled points fit the screen and an `i32`
    pub fn check_screen(&self) -> Result<(), String> {
        for (axis, size) in [("width", self.screen_width), ("height", self.screen_height)] {
            if size == 0 || size > MAX_SCREEN_SIZE {
                return Err(format!(
                    "evdev screen {} must be between 1 and {}, got {}",
                    axis, MAX_SCREEN_SIZE, size
                ));
            }
        }
        Ok(())
    }
}

fn default_record_size() -> usize {
    if cfg!(target_pointer_width = "64") {
        EVDEV_RECORD_SIZE_64
    } else {
        EVDEV_RECORD_SIZE_32
    }
}

/// Inclusive range of raw axis values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    /// Number of distinct raw values, at least 1
    pub fn span(&self) -> i64 {
        (self.max as i64 - self.min as i64).max(1)
    }

    /// Map a raw value onto `0..=extent`, clamping out-of-range input
    pub fn scale(&self, raw: i32, extent: u32) -> i32 {
        let clamped = raw.clamp(self.min.min(self.max), self.max.max(self.min)) as i64;
        ((clamped - self.min as i64) * extent as i64 / self.span()) as i32
    }
}

/// Settings for the mock driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Bytes per packet
    pub packet_size: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self { packet_size: 1 }
    }
}

/// Logging output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for daily rolling log files (None = stderr only)
    pub directory: Option<PathBuf>,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_defaults() {
        let config = BufferConfig::default();
        assert_eq!(config.initial_capacity, 2048);
        assert_eq!(config.growth_increment, 1024);
        assert!(config.max_points.is_none());
    }

    #[test]
    fn test_screen_size_bounds() {
        let mut config = EvdevConfig::default();
        assert!(config.check_screen().is_ok());

        config.screen_width = MAX_SCREEN_SIZE;
        assert!(config.check_screen().is_ok());
        assert_eq!(
            config.x_range.scale(config.x_range.max, config.screen_width - 1),
            i32::MAX - 1
        );

        config.screen_width = MAX_SCREEN_SIZE + 1;
        assert!(config.check_screen().unwrap_err().contains("width"));

        config.screen_width = 1920;
        config.screen_height = 0;
        assert!(config.check_screen().unwrap_err().contains("height"));
    }

    #[test]
    fn test_axis_scale() {
        let range = AxisRange { min: 0, max: 100 };
        assert_eq!(range.scale(0, 1000), 0);
        assert_eq!(range.scale(50, 1000), 500);
        assert_eq!(range.scale(100, 1000), 1000);
        // Out of range input is clamped
        assert_eq!(range.scale(-20, 1000), 0);
        assert_eq!(range.scale(500, 1000), 1000);
    }

    #[test]
    fn test_axis_scale_with_offset() {
        let range = AxisRange { min: 100, max: 300 };
        assert_eq!(range.scale(200, 1920), 960);
    }

    #[test]
    fn test_degenerate_axis_does_not_divide_by_zero() {
        let range = AxisRange { min: 5, max: 5 };
        assert_eq!(range.span(), 1);
        assert_eq!(range.scale(5, 100), 0);
    }

    #[test]
    fn test_record_size_matches_pointer_width() {
        let expected = if cfg!(target_pointer_width = "64") { 24 } else { 16 };
        assert_eq!(EvdevConfig::default().record_size, expected);
    }
}
