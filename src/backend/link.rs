//! CaptureLink trait for a unified capture-transport interface
//!
//! This module provides a common trait for the device transport, enabling
//! both the real generic-netlink session and a mock link for testing. It
//! also holds the wire-protocol constants shared by every layer.
//!
//! The constants are contracts with the kernel-side driver, not tunables:
//! changing any of them desynchronizes the adapter from the device.

use crate::error::{NovacapError, Result};

/// Name the FPGA driver registers its generic-netlink family under
pub const FAMILY_NAME: &str = "kosagi-fpga";

/// Exact byte length of every valid response payload
pub const DATA_SIZE: usize = 4096;

/// Socket receive-buffer size: one block plus headroom for framing overhead
pub const RECV_BUFFER_SIZE: usize = 2 * DATA_SIZE;

/// Remaining-byte threshold below which a refill is triggered
pub const LOW_WATER_MARK: usize = 512;

/// Samples produced per `get_raw_data` call (never partial)
pub const SAMPLES_PER_CHUNK: usize = 512;

/// Raw bytes in one interleaved stride
pub const STRIDE_BYTES: usize = 16;

/// Leading bytes of each stride that carry retained channel-0 data;
/// the rest of the stride belongs to the discarded second lane
pub const CHANNEL_BYTES: usize = 8;

/// Raw bytes consumed per chunk: both interleaved lanes of 512 bytes each
pub const BYTES_PER_CHUNK: usize = 2 * SAMPLES_PER_CHUNK;

/// Statistics for link operations
///
/// Tracks block-receive outcomes and throughput over the life of a session.
#[derive(Debug, Clone, Default)]
pub struct LinkStats {
    /// Total number of blocks accepted
    pub successful_reads: u64,
    /// Total number of failed read cycles (send, receive, or framing)
    pub failed_reads: u64,
    /// Total payload bytes accepted
    pub total_bytes_read: u64,
}

impl LinkStats {
    /// Calculate success rate as percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.successful_reads + self.failed_reads;
        if total == 0 {
            100.0
        } else {
            (self.successful_reads as f64 / total as f64) * 100.0
        }
    }

    /// Record an accepted block
    pub fn record_success(&mut self, bytes: u64) {
        self.successful_reads += 1;
        self.total_bytes_read += bytes;
    }

    /// Record a failed read cycle
    pub fn record_failure(&mut self) {
        self.failed_reads += 1;
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Unified interface to the capture device transport
///
/// The real implementation speaks generic netlink to the kernel driver; the
/// mock implementation replays scripted frames for tests. One session is
/// strictly request/reply: send a READ, receive one block, repeat. No
/// concurrent requests may be outstanding.
///
/// # Example
///
/// ```ignore
/// fn pump(link: &mut dyn CaptureLink) -> Result<Vec<u8>> {
///     link.send_read_request()?;
///     link.receive_block()
/// }
/// ```
pub trait CaptureLink: Send {
    /// Establish the session: connect, resolve the device family, size the
    /// receive buffer.
    ///
    /// On failure the session is left unusable and must not be used for
    /// send/receive.
    fn open(&mut self) -> Result<()>;

    /// Tear the session down, releasing the socket and any pending buffer.
    ///
    /// Calling any other operation afterward fails with a per-cycle error.
    fn close(&mut self);

    /// Whether the session is open and the family is resolved
    fn is_open(&self) -> bool;

    /// Build and send one READ request addressed to the resolved family
    fn send_read_request(&mut self) -> Result<()>;

    /// Block until one reply arrives and return its raw data payload.
    ///
    /// No length validation happens here; use [`CaptureLink::receive_block`]
    /// for the framing-checked variant.
    fn receive_frame(&mut self) -> Result<Vec<u8>>;

    /// Get link operation statistics
    fn stats(&self) -> &LinkStats;

    /// Get mutable reference to link statistics
    fn stats_mut(&mut self) -> &mut LinkStats;

    /// Receive one reply and enforce the fixed framing-size contract.
    ///
    /// A payload of any length other than [`DATA_SIZE`] signals a
    /// desynchronized stream; the buffer is discarded wholesale rather than
    /// returned for partial consumption.
    fn receive_block(&mut self) -> Result<Vec<u8>> {
        let payload = match self.receive_frame() {
            Ok(payload) => payload,
            Err(e) => {
                self.stats_mut().record_failure();
                return Err(e);
            }
        };

        if payload.len() != DATA_SIZE {
            tracing::warn!(
                expected = DATA_SIZE,
                actual = payload.len(),
                "discarding response with wrong framing size"
            );
            self.stats_mut().record_failure();
            return Err(NovacapError::Framing {
                expected: DATA_SIZE,
                actual: payload.len(),
            });
        }

        self.stats_mut().record_success(payload.len() as u64);
        Ok(payload)
    }
}
