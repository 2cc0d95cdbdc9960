//! Test data builders for creating test objects

use tablet_ink::config::{AxisRange, BufferConfig, EvdevConfig, EVDEV_RECORD_SIZE_64};
use tablet_ink::driver::evdev::{
    InputRecord, ABS_X, ABS_Y, BTN_TOUCH, EV_ABS, EV_KEY, EV_SYN, SYN_DROPPED, SYN_REPORT,
};

/// Builder for stroke buffer settings
pub struct BufferConfigBuilder {
    config: BufferConfig,
}

impl BufferConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: BufferConfig::default(),
        }
    }

    pub fn capacity(mut self, initial_capacity: usize) -> Self {
        self.config.initial_capacity = initial_capacity;
        self
    }

    pub fn increment(mut self, growth_increment: usize) -> Self {
        self.config.growth_increment = growth_increment;
        self
    }

    pub fn max_points(mut self, max_points: usize) -> Self {
        self.config.max_points = Some(max_points);
        self
    }

    pub fn build(self) -> BufferConfig {
        self.config
    }
}

/// Evdev settings with a 0..=1000 tablet mapped onto a 101x201 screen
pub fn evdev_config() -> EvdevConfig {
    EvdevConfig {
        record_size: EVDEV_RECORD_SIZE_64,
        x_range: AxisRange { min: 0, max: 1000 },
        y_range: AxisRange { min: 0, max: 1000 },
        screen_width: 101,
        screen_height: 201,
    }
}

/// Builder for a raw evdev byte stream
pub struct EvdevStreamBuilder {
    record_size: usize,
    bytes: Vec<u8>,
}

impl EvdevStreamBuilder {
    pub fn new() -> Self {
        Self {
            record_size: EVDEV_RECORD_SIZE_64,
            bytes: Vec::new(),
        }
    }

    pub fn record(mut self, ev_type: u16, code: u16, value: i32) -> Self {
        let record = InputRecord {
            ev_type,
            code,
            value,
        };
        self.bytes.extend(record.encode(self.record_size));
        self
    }

    pub fn pen_down(self) -> Self {
        self.record(EV_KEY, BTN_TOUCH, 1)
    }

    pub fn pen_up(self) -> Self {
        self.record(EV_KEY, BTN_TOUCH, 0).report()
    }

    /// Move to a raw position and report it
    pub fn move_to(self, x: i32, y: i32) -> Self {
        self.record(EV_ABS, ABS_X, x)
            .record(EV_ABS, ABS_Y, y)
            .report()
    }

    pub fn report(self) -> Self {
        self.record(EV_SYN, SYN_REPORT, 0)
    }

    pub fn dropped(self) -> Self {
        self.record(EV_SYN, SYN_DROPPED, 0)
    }

    /// Number of records written so far
    pub fn records(&self) -> usize {
        self.bytes.len() / self.record_size
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_config_builder() {
        let config = BufferConfigBuilder::new()
            .capacity(4)
            .increment(2)
            .max_points(10)
            .build();

        assert_eq!(config.initial_capacity, 4);
        assert_eq!(config.growth_increment, 2);
        assert_eq!(config.max_points, Some(10));
    }

    #[test]
    fn test_evdev_stream_builder() {
        let stream = EvdevStreamBuilder::new().pen_down().move_to(1, 2);
        assert_eq!(stream.records(), 4);
        assert_eq!(stream.build().len(), 4 * EVDEV_RECORD_SIZE_64);
    }
}
