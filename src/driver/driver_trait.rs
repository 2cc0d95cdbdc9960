//! TabletDriver / DriverState traits for the unified driver interface
//!
//! A driver is split in two:
//!
//! - [`TabletDriver`] is the immutable descriptor: name, fixed packet size and
//!   a factory for per-session state.
//! - [`DriverState`] is the opaque per-session decoder created by the
//!   descriptor. It owns whatever multi-call or multi-packet progress the
//!   driver needs and is destroyed exactly once by the session.

use crate::error::Result;
use crate::types::Event;
use thiserror::Error;

/// Something a decoder produced that is outside the event vocabulary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolAnomaly {
    /// The device reported an event code the driver does not understand
    #[error("unknown event code {code}")]
    UnknownEvent { code: u32 },

    /// A value was out of range for its field
    #[error("malformed packet: {0}")]
    Malformed(String),

    /// The decoder was handed a buffer of the wrong length
    #[error("expected a {expected}-byte packet, got {actual} bytes")]
    PacketSize { expected: usize, actual: usize },

    /// The decoder kept producing results past its per-packet bound
    #[error("decoder did not finish within {limit} calls")]
    DecodeLimitExceeded { limit: usize },
}

/// Immutable description of a device driver
///
/// Implementations must be `Send + Sync` so a descriptor can be shared by
/// whoever selects drivers; the per-session state is created by [`TabletDriver::create`].
///
/// # Example
///
/// ```ignore
/// let driver = create_driver("evdev", &config)?;
/// let mut state = driver.create()?;
/// let mut packet = vec![0u8; driver.packet_size()];
/// // ... fill packet ...
/// loop {
///     match state.decode(&packet) {
///         Ok(Event::NoEvent) => break,
///         Ok(event) => handle(event),
///         Err(anomaly) => tracing::warn!("{}", anomaly),
///     }
/// }
/// state.destroy();
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait TabletDriver: Send + Sync {
    /// Registered driver name
    fn name(&self) -> &'static str;

    /// Bytes per packet; constant for the descriptor's lifetime
    fn packet_size(&self) -> usize;

    /// Allocate fresh per-session decode state
    ///
    /// Fails with [`crate::TabletError::Init`] if the driver cannot prepare
    /// its resources.
    fn create(&self) -> Result<Box<dyn DriverState>>;

    /// Upper bound on decode calls for one packet, the final `NoEvent` included
    fn max_decode_calls(&self) -> usize {
        self.packet_size() + 1
    }
}

/// Opaque per-session decoder state
pub trait DriverState: Send {
    /// Decode the next event from `packet`
    ///
    /// Called repeatedly against the same packet until it returns
    /// [`Event::NoEvent`]. Must be deterministic for a given state, packet and
    /// call count, and must reach `NoEvent` within
    /// [`TabletDriver::max_decode_calls`] calls. An `Err` consumes that call;
    /// the caller moves on to the next call rather than retrying it.
    fn decode(&mut self, packet: &[u8]) -> std::result::Result<Event, ProtocolAnomaly>;

    /// Release driver-owned resources
    fn destroy(self: Box<Self>) {}
}
