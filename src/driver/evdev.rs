//! Linux evdev driver
//!
//! Decodes the kernel's generic `struct input_event` records as read from a
//! `/dev/input/event*` node. One packet is one record:
//!
//! ```text
//! | timeval (8 or 16 bytes) | type: u16 | code: u16 | value: i32 |
//! ```
//!
//! Fields are in native byte order. The record is 24 bytes on 64-bit hosts
//! and 16 bytes on 32-bit ones; see [`crate::config::EvdevConfig::record_size`].
//!
//! # Event mapping
//!
//! - `EV_KEY BTN_TOUCH 1` → [`Event::PenDown`]
//! - `EV_KEY BTN_TOUCH 0` → [`Event::PenUp`]
//! - `EV_ABS ABS_X` / `ABS_Y` update the pending position
//! - `EV_SYN SYN_REPORT` while touching with a changed position → [`Event::Point`]
//! - `EV_SYN SYN_DROPPED` discards everything up to the next `SYN_REPORT`
//!
//! Positions are scaled from the configured tablet axis ranges to the
//! configured screen size.

use crate::config::{AxisRange, EvdevConfig};
use crate::driver::driver_trait::{DriverState, ProtocolAnomaly, TabletDriver};
use crate::error::{Result, TabletError};
use crate::types::{Event, Point};

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_ABS: u16 = 0x03;
pub const EV_MAX: u16 = 0x1f;

pub const SYN_REPORT: u16 = 0;
pub const SYN_DROPPED: u16 = 3;

pub const BTN_TOUCH: u16 = 0x14a;

pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;

/// Bytes after the timestamp: type (2) + code (2) + value (4)
const PAYLOAD_SIZE: usize = 8;

/// One parsed `input_event` record, timestamp omitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputRecord {
    pub ev_type: u16,
    pub code: u16,
    pub value: i32,
}

impl InputRecord {
    /// Parse a record of `record_size` bytes. Returns None if the buffer is the wrong size.
    pub fn parse(buf: &[u8], record_size: usize) -> Option<Self> {
        if buf.len() != record_size || record_size < PAYLOAD_SIZE {
            return None;
        }
        let payload = &buf[record_size - PAYLOAD_SIZE..];
        Some(Self {
            ev_type: u16::from_ne_bytes([payload[0], payload[1]]),
            code: u16::from_ne_bytes([payload[2], payload[3]]),
            value: i32::from_ne_bytes([payload[4], payload[5], payload[6], payload[7]]),
        })
    }

    /// Encode into a zero-timestamp record of `record_size` bytes
    pub fn encode(&self, record_size: usize) -> Vec<u8> {
        let mut buf = vec![0u8; record_size];
        let payload = &mut buf[record_size - PAYLOAD_SIZE..];
        payload[0..2].copy_from_slice(&self.ev_type.to_ne_bytes());
        payload[2..4].copy_from_slice(&self.code.to_ne_bytes());
        payload[4..8].copy_from_slice(&self.value.to_ne_bytes());
        buf
    }
}

/// Descriptor for the evdev driver
#[derive(Debug, Clone)]
pub struct EvdevDriver {
    config: EvdevConfig,
}

impl EvdevDriver {
    /// Create an evdev driver from its configuration section
    pub fn new(config: EvdevConfig) -> Self {
        Self { config }
    }
}

impl TabletDriver for EvdevDriver {
    fn name(&self) -> &'static str {
        "evdev"
    }

    fn packet_size(&self) -> usize {
        self.config.record_size
    }

    fn create(&self) -> Result<Box<dyn DriverState>> {
        if self.config.record_size < PAYLOAD_SIZE {
            return Err(TabletError::Init(format!(
                "evdev record size {} is smaller than the {}-byte payload",
                self.config.record_size, PAYLOAD_SIZE
            )));
        }
        self.config.check_screen().map_err(TabletError::Init)?;
        tracing::debug!(
            "Evdev driver state created ({} byte records, screen {}x{})",
            self.config.record_size,
            self.config.screen_width,
            self.config.screen_height
        );
        Ok(Box::new(EvdevState::new(&self.config)))
    }
}

/// Decode state carried across records
#[derive(Debug)]
pub struct EvdevState {
    record_size: usize,
    x_range: AxisRange,
    y_range: AxisRange,
    max_x: u32,
    max_y: u32,
    raw_x: i32,
    raw_y: i32,
    /// Position changed since the last emitted point
    moved: bool,
    touching: bool,
    /// Inside a SYN_DROPPED gap
    dropping: bool,
    /// The current packet has already been decoded
    primed: bool,
}

impl EvdevState {
    fn new(config: &EvdevConfig) -> Self {
        Self {
            record_size: config.record_size,
            x_range: config.x_range,
            y_range: config.y_range,
            max_x: config.screen_width - 1,
            max_y: config.screen_height - 1,
            raw_x: config.x_range.min,
            raw_y: config.y_range.min,
            moved: false,
            touching: false,
            dropping: false,
            primed: false,
        }
    }

    fn screen_point(&self) -> Point {
        Point::new(
            self.x_range.scale(self.raw_x, self.max_x),
            self.y_range.scale(self.raw_y, self.max_y),
        )
    }

    fn apply(&mut self, record: InputRecord) -> std::result::Result<Option<Event>, ProtocolAnomaly> {
        if record.ev_type > EV_MAX {
            return Err(ProtocolAnomaly::UnknownEvent {
                code: record.ev_type as u32,
            });
        }

        if self.dropping {
            if record.ev_type == EV_SYN && record.code == SYN_REPORT {
                self.dropping = false;
            }
            return Ok(None);
        }

        match (record.ev_type, record.code) {
            (EV_SYN, SYN_DROPPED) => {
                tracing::debug!("Evdev buffer overrun, discarding until next report");
                self.dropping = true;
                Ok(None)
            }
            (EV_SYN, SYN_REPORT) if self.touching && self.moved => {
                self.moved = false;
                Ok(Some(Event::Point(self.screen_point())))
            }
            (EV_KEY, BTN_TOUCH) => match record.value {
                1 => {
                    self.touching = true;
                    // Emit the touch position on the next report
                    self.moved = true;
                    Ok(Some(Event::PenDown))
                }
                0 => {
                    self.touching = false;
                    self.moved = false;
                    Ok(Some(Event::PenUp))
                }
                other => Err(ProtocolAnomaly::Malformed(format!(
                    "BTN_TOUCH value {}",
                    other
                ))),
            },
            (EV_ABS, ABS_X) => {
                self.raw_x = record.value;
                self.moved = true;
                Ok(None)
            }
            (EV_ABS, ABS_Y) => {
                self.raw_y = record.value;
                self.moved = true;
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

impl DriverState for EvdevState {
    fn decode(&mut self, packet: &[u8]) -> std::result::Result<Event, ProtocolAnomaly> {
        // Each record yields at most one event, so every packet takes two calls at most
        if self.primed {
            self.primed = false;
            return Ok(Event::NoEvent);
        }
        self.primed = true;

        let record = InputRecord::parse(packet, self.record_size).ok_or(
            ProtocolAnomaly::PacketSize {
                expected: self.record_size,
                actual: packet.len(),
            },
        )?;

        match self.apply(record)? {
            Some(event) => {
                tracing::trace!("evdev {:?} -> {}", record, event.kind());
                Ok(event)
            }
            None => {
                self.primed = false;
                Ok(Event::NoEvent)
            }
        }
    }
}
