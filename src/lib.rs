//! # tablet-ink: pen tablet stroke ingestion
//!
//! Reads raw packets from a pen tablet device, decodes them through a
//! pluggable driver into pen-down / pen-up / point events, accumulates the
//! points into a growable stroke buffer and notifies a recognizer each time a
//! stroke is completed.
//!
//! ## Architecture
//!
//! - **Drivers**: [`driver::TabletDriver`] describes a device's packet format;
//!   its [`driver::DriverState`] decodes packets into [`Event`]s
//! - **Reader**: [`ingest::PacketReader`] assembles whole packets from short reads
//! - **Strokes**: [`StrokeBuffer`] stores points, separated by boundary markers
//! - **Session**: [`IngestSession`] ties them together; the host calls `step`
//!   once per readiness notification on [`IngestSession::readiness_fd`]
//!
//! The crate never waits on the device itself and runs no threads. The host
//! event loop owns readiness polling and decides when to step.
//!
//! ## Configuration
//!
//! [`TabletConfig`] is loaded from TOML. The default location is the
//! platform config directory under `dev.tablet-ink/config.toml`.
//!
//! ## Example
//!
//! ```ignore
//! use tablet_ink::{create_driver, IngestSession, StrokeBuffer, TabletConfig};
//!
//! fn main() -> tablet_ink::Result<()> {
//!     let config = TabletConfig::load_or_default("/etc/tablet-ink.toml");
//!     let driver = create_driver(&config.device.driver, &config)?;
//!
//!     let mut session = IngestSession::open(&config, driver, |strokes: &StrokeBuffer| {
//!         println!("stroke: {:?}", strokes.last_completed_stroke());
//!     })?;
//!
//!     while session.step().is_ok() {}
//!     session.teardown();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod ingest;
pub mod stroke;
pub mod types;

// Re-export commonly used types
pub use config::TabletConfig;
pub use driver::{create_driver, DriverState, TabletDriver};
pub use error::{Result, TabletError};
pub use ingest::{IngestSession, RecognitionTrigger, StepReport};
pub use stroke::StrokeBuffer;
pub use types::{Event, Point, SessionPhase};
