//! Ingestion session
//!
//! An [`IngestSession`] owns everything needed to turn one device's byte
//! stream into strokes: the driver descriptor and its per-session state, the
//! packet reader, a reusable packet buffer and the [`StrokeBuffer`].
//!
//! # Step cycle
//!
//! The host calls [`IngestSession::step`] once per readiness notification:
//!
//! ```text
//! Idle -> Reading -> Decoding -> Idle
//!            |
//!            +-- device error --> Failed (terminal)
//! ```
//!
//! Each step reads exactly one packet and runs the driver's decode loop over
//! it until `NoEvent`:
//!
//! - `PenDown` - counted, no buffer change
//! - `PenUp` - boundary marker written, then the recognition trigger is called once
//! - `Point` - appended to the stroke buffer
//! - decoder anomalies - logged and counted, the loop moves on
//!
//! # Teardown
//!
//! [`IngestSession::teardown`] consumes the session, so no step can follow it.
//! A session dropped without teardown still destroys its driver state, and the
//! state is never destroyed twice.

use crate::config::{BufferConfig, TabletConfig};
use crate::driver::{DriverState, ProtocolAnomaly, TabletDriver};
use crate::error::{Result, TabletError};
use crate::ingest::reader::{PacketReader, ReadStats};
use crate::stroke::StrokeBuffer;
use crate::types::{Event, Point, SessionPhase};
use std::fs::{File, OpenOptions};
use std::io::Read;

/// Called synchronously each time a stroke is completed
///
/// The trigger receives a shared borrow of the stroke buffer, so the buffer
/// cannot change while it runs. A trigger that needs the stroke after it
/// returns must copy it out (e.g. `strokes.last_completed_stroke().map(<[_]>::to_vec)`).
pub trait RecognitionTrigger {
    /// A pen-up was processed; the completed stroke ends just before the last boundary
    fn stroke_completed(&mut self, strokes: &StrokeBuffer);
}

impl<F> RecognitionTrigger for F
where
    F: FnMut(&StrokeBuffer),
{
    fn stroke_completed(&mut self, strokes: &StrokeBuffer) {
        self(strokes)
    }
}

/// What a single step did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Decode calls made, the terminating `NoEvent` included
    pub decode_calls: usize,
    pub pen_downs: usize,
    pub pen_ups: usize,
    pub points: usize,
    /// Decoder results outside the event vocabulary
    pub anomalies: usize,
    /// Points refused by the stroke buffer limit
    pub dropped_points: usize,
}

impl StepReport {
    /// Whether the packet produced no events at all
    pub fn is_empty(&self) -> bool {
        self.pen_downs == 0 && self.pen_ups == 0 && self.points == 0 && self.anomalies == 0
    }
}

/// Counters accumulated over a session's lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Steps that processed a packet
    pub steps: u64,
    pub pen_downs: u64,
    /// Strokes completed (one per pen-up)
    pub strokes_completed: u64,
    pub points: u64,
    pub anomalies: u64,
    pub dropped_points: u64,
}

impl SessionStats {
    fn record(&mut self, report: &StepReport) {
        self.steps += 1;
        self.pen_downs += report.pen_downs as u64;
        self.strokes_completed += report.pen_ups as u64;
        self.points += report.points as u64;
        self.anomalies += report.anomalies as u64;
        self.dropped_points += report.dropped_points as u64;
    }
}

/// One device's ingestion pipeline
pub struct IngestSession<S = File> {
    driver: Box<dyn TabletDriver>,
    /// Taken exactly once, by teardown or drop
    state: Option<Box<dyn DriverState>>,
    reader: PacketReader<S>,
    packet: Vec<u8>,
    decode_limit: usize,
    strokes: StrokeBuffer,
    trigger: Box<dyn RecognitionTrigger>,
    phase: SessionPhase,
    stats: SessionStats,
}

impl IngestSession<File> {
    /// Open the configured device node and start a session on it
    ///
    /// Fails with [`TabletError::Init`] if the device cannot be opened or the
    /// driver cannot be initialized. No session is returned in that case.
    pub fn open(
        config: &TabletConfig,
        driver: Box<dyn TabletDriver>,
        trigger: impl RecognitionTrigger + 'static,
    ) -> Result<Self> {
        let path = &config.device.path;
        let device = OpenOptions::new().read(true).open(path).map_err(|e| {
            tracing::error!("Unable to open device {:?}: {}", path, e);
            TabletError::Init(format!("Unable to open device {:?}: {}", path, e))
        })?;
        tracing::info!("Opened tablet device {:?}", path);

        Self::with_source(device, driver, trigger, &config.buffer)
    }
}

impl<S: Read> IngestSession<S> {
    /// Start a session on an already-open byte stream
    pub fn with_source(
        source: S,
        driver: Box<dyn TabletDriver>,
        trigger: impl RecognitionTrigger + 'static,
        buffer: &BufferConfig,
    ) -> Result<Self> {
        let packet_size = driver.packet_size();
        if packet_size == 0 {
            return Err(TabletError::Init(format!(
                "Driver '{}' reports a zero packet size",
                driver.name()
            )));
        }

        // Allocate before creating driver state so a failure has nothing to release
        let strokes = StrokeBuffer::from_config(buffer)
            .map_err(|e| TabletError::Init(format!("Unable to allocate stroke buffer: {}", e)))?;

        let state = driver.create().map_err(|e| match e {
            TabletError::Init(_) => e,
            other => TabletError::Init(format!(
                "Driver '{}' failed to initialize: {}",
                driver.name(),
                other
            )),
        })?;

        let decode_limit = driver.max_decode_calls().max(1);
        tracing::info!(
            "Ingestion session started: driver '{}', {} byte packets, buffer capacity {} (+{})",
            driver.name(),
            packet_size,
            strokes.capacity(),
            strokes.increment()
        );

        Ok(Self {
            driver,
            state: Some(state),
            reader: PacketReader::new(source),
            packet: vec![0u8; packet_size],
            decode_limit,
            strokes,
            trigger: Box::new(trigger),
            phase: SessionPhase::Idle,
            stats: SessionStats::default(),
        })
    }

    /// Process exactly one packet
    ///
    /// Call once per readiness notification. Returns
    /// [`TabletError::Device`] if the packet could not be read; the session is
    /// then [`SessionPhase::Failed`] and every later call returns
    /// [`TabletError::SessionFailed`].
    pub fn step(&mut self) -> Result<StepReport> {
        if self.phase == SessionPhase::Failed {
            return Err(TabletError::SessionFailed);
        }

        self.phase = SessionPhase::Reading;
        if let Err(e) = self.reader.read_packet(&mut self.packet) {
            self.phase = SessionPhase::Failed;
            tracing::error!("Tablet device failed, session stopped: {}", e);
            return Err(e);
        }

        self.phase = SessionPhase::Decoding;
        let mut report = StepReport::default();
        self.decode_packet(&mut report);

        self.phase = SessionPhase::Idle;
        self.stats.record(&report);
        Ok(report)
    }

    fn decode_packet(&mut self, report: &mut StepReport) {
        for _ in 0..self.decode_limit {
            let Some(state) = self.state.as_mut() else {
                return;
            };
            let result = state.decode(&self.packet);
            report.decode_calls += 1;

            match result {
                Ok(Event::NoEvent) => return,
                Ok(event) => self.apply_event(event, report),
                Err(anomaly) => self.record_anomaly(anomaly, report),
            }
        }

        self.record_anomaly(
            ProtocolAnomaly::DecodeLimitExceeded {
                limit: self.decode_limit,
            },
            report,
        );
    }

    fn apply_event(&mut self, event: Event, report: &mut StepReport) {
        match event {
            Event::NoEvent => {}
            Event::PenDown => {
                report.pen_downs += 1;
                tracing::trace!("Pen down");
            }
            Event::PenUp => {
                if let Err(e) = self.strokes.mark_boundary() {
                    tracing::error!("Stroke boundary lost: {}", e);
                }
                report.pen_ups += 1;
                tracing::debug!(
                    "Stroke completed ({} points)",
                    self.strokes.last_completed_stroke().map_or(0, <[Point]>::len)
                );
                self.trigger.stroke_completed(&self.strokes);
            }
            Event::Point(point) if point.is_boundary() => {
                self.record_anomaly(
                    ProtocolAnomaly::Malformed(
                        "driver produced the stroke boundary value as a point".to_string(),
                    ),
                    report,
                );
            }
            Event::Point(point) => match self.strokes.push(point) {
                Ok(()) => report.points += 1,
                Err(e) => {
                    if report.dropped_points == 0 {
                        tracing::warn!("Dropping point {}: {}", point, e);
                    }
                    report.dropped_points += 1;
                }
            },
        }
    }

    fn record_anomaly(&mut self, anomaly: ProtocolAnomaly, report: &mut StepReport) {
        tracing::warn!(
            "Driver '{}' protocol anomaly: {}",
            self.driver.name(),
            anomaly
        );
        report.anomalies += 1;
    }

    /// Read statistics from the packet reader
    pub fn read_stats(&self) -> &ReadStats {
        self.reader.stats()
    }
}

impl<S> IngestSession<S> {
    /// Current view of the stroke buffer
    ///
    /// Re-query after every step: growth may have moved the storage.
    pub fn strokes(&self) -> &StrokeBuffer {
        &self.strokes
    }

    /// Rewind the stroke buffer, keeping its capacity
    pub fn clear_strokes(&mut self) {
        self.strokes.clear();
    }

    /// Current step cycle phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Lifetime statistics
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Name of the driver decoding this session
    pub fn driver_name(&self) -> &'static str {
        self.driver.name()
    }

    /// Bytes per packet
    pub fn packet_size(&self) -> usize {
        self.packet.len()
    }

    /// Release the driver state, device handle and buffer
    ///
    /// Consumes the session, so no step can follow. Returns the final statistics.
    pub fn teardown(mut self) -> SessionStats {
        self.release_driver();
        tracing::info!(
            "Ingestion session closed: {} steps, {} strokes, {} points, {} anomalies",
            self.stats.steps,
            self.stats.strokes_completed,
            self.stats.points,
            self.stats.anomalies
        );
        std::mem::take(&mut self.stats)
    }

    fn release_driver(&mut self) {
        if let Some(state) = self.state.take() {
            state.destroy();
            tracing::debug!("Driver '{}' state destroyed", self.driver.name());
        }
    }
}

#[cfg(unix)]
impl<S: std::os::fd::AsRawFd> IngestSession<S> {
    /// File descriptor the host adds to its readiness wait-set
    pub fn readiness_fd(&self) -> std::os::fd::RawFd {
        self.reader.get_ref().as_raw_fd()
    }
}

impl<S> Drop for IngestSession<S> {
    fn drop(&mut self) {
        if self.state.is_some() {
            tracing::warn!("Ingestion session dropped without teardown");
            self.release_driver();
        }
    }
}

impl<S> std::fmt::Debug for IngestSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestSession")
            .field("driver", &self.driver.name())
            .field("packet_size", &self.packet.len())
            .field("phase", &self.phase)
            .field("strokes", &self.strokes.len())
            .field("stats", &self.stats)
            .finish()
    }
}
