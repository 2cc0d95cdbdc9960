//! Mock Driver Implementation for Testing
//!
//! This module provides a deterministic driver that can be used to exercise
//! sessions without a real tablet. Every byte of a packet decodes to at most
//! one event, in order:
//!
//! | Byte   | Event                      |
//! |--------|----------------------------|
//! | `0xFF` | [`Event::PenUp`]           |
//! | `0xFE` | [`Event::PenDown`]         |
//! | `0xFD` | protocol anomaly           |
//! | `0x00` | nothing (padding)          |
//! | `b`    | [`Event::Point`] `(b, 0)`  |
//!
//! A packet of `n` bytes therefore takes at most `n + 1` decode calls.
//!
//! # Lifecycle counters
//!
//! [`MockDriverCounters`] is shared between the descriptor and every state it
//! creates, so tests can check create/destroy/decode obligations after the
//! session has consumed the driver.
//!
//! # Example
//!
//! ```ignore
//! use tablet_ink::driver::MockDriver;
//!
//! let driver = MockDriver::new(1);
//! let counters = driver.counters();
//! let session = IngestSession::with_source(
//!     std::io::Cursor::new(vec![1, 2, 0xFF]),
//!     Box::new(driver),
//!     |_: &StrokeBuffer| {},
//!     &BufferConfig::default(),
//! )?;
//! session.teardown();
//! assert_eq!(counters.destroyed(), 1);
//! ```

use crate::driver::driver_trait::{DriverState, ProtocolAnomaly, TabletDriver};
use crate::error::{Result, TabletError};
use crate::types::{Event, Point};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Byte decoded as pen-up
pub const MOCK_PEN_UP: u8 = 0xFF;

/// Byte decoded as pen-down
pub const MOCK_PEN_DOWN: u8 = 0xFE;

/// Byte decoded as a protocol anomaly
pub const MOCK_ANOMALY: u8 = 0xFD;

/// Byte skipped without producing an event
pub const MOCK_PADDING: u8 = 0x00;

/// Shared lifecycle counters for a mock driver
#[derive(Debug, Default)]
pub struct MockDriverCounters {
    created: AtomicUsize,
    destroyed: AtomicUsize,
    decode_calls: AtomicUsize,
}

impl MockDriverCounters {
    /// Number of states created
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Number of states destroyed
    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Total decode calls across all states
    pub fn decode_calls(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }
}

/// Deterministic byte-per-event driver
#[derive(Debug, Clone)]
pub struct MockDriver {
    packet_size: usize,
    fail_create: bool,
    counters: Arc<MockDriverCounters>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new(1)
    }
}

impl MockDriver {
    /// Create a mock driver with the given packet size
    pub fn new(packet_size: usize) -> Self {
        Self {
            packet_size,
            fail_create: false,
            counters: Arc::new(MockDriverCounters::default()),
        }
    }

    /// Make [`TabletDriver::create`] fail, to exercise construction errors
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Handle on the shared lifecycle counters
    pub fn counters(&self) -> Arc<MockDriverCounters> {
        Arc::clone(&self.counters)
    }
}

impl TabletDriver for MockDriver {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn packet_size(&self) -> usize {
        self.packet_size
    }

    fn create(&self) -> Result<Box<dyn DriverState>> {
        if self.fail_create {
            return Err(TabletError::Init(
                "mock driver configured to fail".to_string(),
            ));
        }
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Mock driver state created ({} byte packets)", self.packet_size);
        Ok(Box::new(MockDriverState {
            packet_size: self.packet_size,
            cursor: 0,
            counters: Arc::clone(&self.counters),
        }))
    }
}

/// Decode progress for one mock session
#[derive(Debug)]
pub struct MockDriverState {
    packet_size: usize,
    /// Next byte of the current packet to decode
    cursor: usize,
    counters: Arc<MockDriverCounters>,
}

impl DriverState for MockDriverState {
    fn decode(&mut self, packet: &[u8]) -> std::result::Result<Event, ProtocolAnomaly> {
        self.counters.decode_calls.fetch_add(1, Ordering::SeqCst);

        if packet.len() != self.packet_size {
            self.cursor = 0;
            return Err(ProtocolAnomaly::PacketSize {
                expected: self.packet_size,
                actual: packet.len(),
            });
        }

        while let Some(&byte) = packet.get(self.cursor) {
            self.cursor += 1;
            match byte {
                MOCK_PADDING => continue,
                MOCK_PEN_UP => return Ok(Event::PenUp),
                MOCK_PEN_DOWN => return Ok(Event::PenDown),
                MOCK_ANOMALY => {
                    return Err(ProtocolAnomaly::UnknownEvent { code: byte as u32 })
                }
                b => return Ok(Event::Point(Point::new(b as i32, 0))),
            }
        }

        // Packet exhausted; the next call starts a new packet
        self.cursor = 0;
        Ok(Event::NoEvent)
    }

    fn destroy(self: Box<Self>) {
        self.counters.destroyed.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Mock driver state destroyed");
    }
}
