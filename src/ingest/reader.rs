//! Packet reader
//!
//! Assembles exactly one fixed-size packet from a blocking byte stream.
//! Character devices routinely return fewer bytes than requested, so short
//! reads are retried until the packet is complete. End of stream and I/O
//! errors are fatal [`TabletError::Device`] errors; `Interrupted` is retried.

use crate::error::{Result, TabletError};
use std::io::{ErrorKind, Read};

/// Statistics for packet acquisition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Complete packets assembled
    pub packets_read: u64,
    /// Underlying `read` calls, including retries
    pub read_calls: u64,
    /// Reads that returned fewer bytes than were still needed
    pub short_reads: u64,
    /// Total bytes read
    pub bytes_read: u64,
    /// Most `read` calls needed for a single packet
    pub max_reads_per_packet: u64,
    /// Reads interrupted by a signal and retried
    pub interrupted: u64,
}

impl ReadStats {
    /// Average underlying reads per packet
    pub fn avg_reads_per_packet(&self) -> f64 {
        if self.packets_read == 0 {
            0.0
        } else {
            self.read_calls as f64 / self.packets_read as f64
        }
    }
}

/// Blocking reader that yields whole packets
#[derive(Debug)]
pub struct PacketReader<S> {
    source: S,
    stats: ReadStats,
}

impl<S: Read> PacketReader<S> {
    /// Wrap a byte stream
    pub fn new(source: S) -> Self {
        Self {
            source,
            stats: ReadStats::default(),
        }
    }

    /// Fill `packet` completely from the stream
    ///
    /// Blocks until `packet.len()` bytes have been read. On error the
    /// contents of `packet` are unspecified.
    pub fn read_packet(&mut self, packet: &mut [u8]) -> Result<()> {
        let size = packet.len();
        let mut filled = 0;
        let mut calls = 0u64;

        while filled < size {
            calls += 1;
            self.stats.read_calls += 1;
            match self.source.read(&mut packet[filled..]) {
                Ok(0) => {
                    return Err(TabletError::device_closed(format!(
                        "device stream closed after {} of {} packet bytes",
                        filled, size
                    )));
                }
                Ok(n) => {
                    filled += n;
                    self.stats.bytes_read += n as u64;
                    if filled < size {
                        self.stats.short_reads += 1;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    self.stats.interrupted += 1;
                }
                Err(e) => {
                    return Err(TabletError::device(
                        format!("read failed after {} of {} packet bytes", filled, size),
                        e,
                    ));
                }
            }
        }

        self.stats.packets_read += 1;
        self.stats.max_reads_per_packet = self.stats.max_reads_per_packet.max(calls);
        tracing::trace!("Packet of {} bytes assembled in {} reads", size, calls);
        Ok(())
    }

}

impl<S> PacketReader<S> {
    /// Read statistics
    pub fn stats(&self) -> &ReadStats {
        &self.stats
    }

    /// The wrapped stream
    pub fn get_ref(&self) -> &S {
        &self.source
    }
}
