//! Packet ingestion
//!
//! This module turns a device byte stream into strokes.
//!
//! # Components
//!
//! - [`PacketReader`] - Assembles fixed-size packets, retrying short reads
//! - [`IngestSession`] - Owns driver, device and stroke buffer; one `step` per packet
//! - [`RecognitionTrigger`] - Synchronous callback fired on every completed stroke
//!
//! # Example
//!
//! ```ignore
//! use tablet_ink::{config::TabletConfig, driver::create_driver, ingest::IngestSession};
//!
//! let config = TabletConfig::load_or_default("tablet.toml");
//! let driver = create_driver(&config.device.driver, &config)?;
//! let mut session = IngestSession::open(&config, driver, |strokes: &StrokeBuffer| {
//!     if let Some(stroke) = strokes.last_completed_stroke() {
//!         recognizer.submit(stroke);
//!     }
//! })?;
//!
//! // Host event loop: register session.readiness_fd(), then on each wakeup
//! session.step()?;
//!
//! session.teardown();
//! ```

pub mod reader;
pub mod session;

pub use reader::{PacketReader, ReadStats};
pub use session::{IngestSession, RecognitionTrigger, SessionStats, StepReport};
