//! Core data types for tablet-ink
//!
//! This module contains the small vocabulary shared by drivers, the stroke
//! buffer and the ingestion session.
//!
//! # Main Types
//!
//! - [`Point`] - A screen-space coordinate, or the stroke boundary sentinel
//! - [`Event`] - One decoded unit produced by a driver
//! - [`SessionPhase`] - Where an ingestion session is in its step cycle

use serde::{Deserialize, Serialize};

/// A 2D coordinate in screen-resolution units
///
/// [`Point::BOUNDARY`] is reserved and never produced by a well-behaved
/// driver; it delimits strokes inside the stroke buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Sentinel separating two strokes in the buffer
    pub const BOUNDARY: Point = Point {
        x: i32::MIN,
        y: i32::MIN,
    };

    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check if this is the stroke boundary sentinel
    #[inline]
    pub fn is_boundary(&self) -> bool {
        *self == Self::BOUNDARY
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_boundary() {
            write!(f, "<boundary>")
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

/// A decoded event
///
/// Events are consumed by the session as soon as they are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Decoding is exhausted for the current packet
    NoEvent,
    /// The pen touched the surface
    PenDown,
    /// The pen left the surface; the current stroke is complete
    PenUp,
    /// The pen moved to a new position
    Point(Point),
}

impl Event {
    /// Short label used in logs and statistics
    pub fn kind(&self) -> &'static str {
        match self {
            Event::NoEvent => "no-event",
            Event::PenDown => "pen-down",
            Event::PenUp => "pen-up",
            Event::Point(_) => "point",
        }
    }
}

/// Step cycle phase of an ingestion session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Waiting for the host to report readiness
    #[default]
    Idle,
    /// Assembling one packet from the device
    Reading,
    /// Running the driver's decode loop over the packet
    Decoding,
    /// A fatal device error occurred; no further steps are processed
    Failed,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "Idle"),
            SessionPhase::Reading => write!(f, "Reading"),
            SessionPhase::Decoding => write!(f, "Decoding"),
            SessionPhase::Failed => write!(f, "Failed"),
        }
    }
}
