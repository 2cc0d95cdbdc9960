//! Tablet drivers
//!
//! A driver turns fixed-size packets from a device node into [`Event`]s.
//! The session only talks to drivers through the [`TabletDriver`] and
//! [`DriverState`] traits, so new devices are new implementations rather
//! than new branches in the session.
//!
//! # Components
//!
//! - [`TabletDriver`] / [`DriverState`] - The driver contract
//! - [`EvdevDriver`] - Generic Linux `input_event` decoder
//! - [`MockDriver`] - Deterministic byte-per-event driver for tests and demos
//! - [`create_driver`] - Resolve a configured driver name
//!
//! [`Event`]: crate::types::Event

pub mod driver_trait;
pub mod evdev;
pub mod mock_driver;

pub use driver_trait::{DriverState, ProtocolAnomaly, TabletDriver};
pub use evdev::{EvdevDriver, EvdevState, InputRecord};
pub use mock_driver::{MockDriver, MockDriverCounters, MockDriverState};

#[cfg(test)]
pub use driver_trait::MockTabletDriver;

use crate::config::TabletConfig;
use crate::error::{Result, TabletError};

/// Names accepted by [`create_driver`]
pub const DRIVER_NAMES: &[&str] = &["evdev", "mock"];

/// Build the driver registered under `name`
pub fn create_driver(name: &str, config: &TabletConfig) -> Result<Box<dyn TabletDriver>> {
    let driver: Box<dyn TabletDriver> = match name {
        "evdev" => Box::new(EvdevDriver::new(config.evdev.clone())),
        "mock" => Box::new(MockDriver::new(config.mock.packet_size)),
        other => {
            return Err(TabletError::Init(format!(
                "Unknown driver '{}' (available: {})",
                other,
                DRIVER_NAMES.join(", ")
            )))
        }
    };
    tracing::info!(
        "Selected driver '{}' ({} byte packets)",
        driver.name(),
        driver.packet_size()
    );
    Ok(driver)
}
