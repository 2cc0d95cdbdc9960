//! Error handling for tablet-ink
//!
//! This module defines the crate error type and a Result alias for use
//! throughout the ingestion pipeline.
//!
//! Errors fall into three propagation classes:
//!
//! - **Construction** ([`TabletError::Init`]) - the session is never built
//! - **Runtime fatal** ([`TabletError::Device`]) - the session stops stepping
//! - **Swallowed** ([`ProtocolAnomaly`]) - logged by the session, never returned from `step`,
//!   so it has no variant here
//!
//! [`ProtocolAnomaly`]: crate::driver::ProtocolAnomaly

use thiserror::Error;

/// Main error type for tablet-ink operations
#[derive(Error, Debug)]
pub enum TabletError {
    /// Driver or device setup failed while building a session
    #[error("Initialization error: {0}")]
    Init(String),

    /// I/O failure while reading the packet stream
    #[error("Device error: {message}")]
    Device {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Stroke buffer refused a point because its configured limit was reached
    #[error("Stroke buffer limit of {limit} entries reached")]
    BufferLimit { limit: usize },

    /// Stroke buffer storage could not be allocated
    #[error("Stroke buffer cannot grow beyond {capacity} points: {reason}")]
    BufferAlloc { capacity: usize, reason: String },

    /// A step was requested on a session that already hit a fatal device error
    #[error("Session failed earlier and can no longer be stepped")]
    SessionFailed,

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors outside the packet stream (config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TabletError>,
    },
}

impl TabletError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TabletError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Build a device error from an I/O failure
    pub fn device(message: impl Into<String>, source: std::io::Error) -> Self {
        TabletError::Device {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Device error with no underlying I/O error (e.g. end of stream)
    pub fn device_closed(message: impl Into<String>) -> Self {
        TabletError::Device {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error ends the session
    pub fn is_fatal(&self) -> bool {
        match self {
            TabletError::Device { .. } | TabletError::SessionFailed => true,
            TabletError::WithContext { source, .. } => source.is_fatal(),
            _ => false,
        }
    }
}

/// Result type alias for tablet-ink operations
pub type Result<T> = std::result::Result<T, TabletError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
