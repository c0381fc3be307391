//! Buffer-draining state machine that turns raw blocks into sample chunks
//!
//! This module owns the most recently received raw block and drains it in
//! fixed strides to fill a caller-supplied [`SampleFrame`]. When the block
//! runs low it transparently runs one request/receive cycle on the link.
//!
//! # Drain geometry
//!
//! The device interleaves two 8-byte lanes per 16-byte stride. Only the
//! first lane is retained in this capture profile: each chunk takes the
//! leading 8 bytes of 64 consecutive strides, widening every byte to a
//! signed 16-bit sample, for exactly 512 samples per call. The cursor
//! advances over both lanes, so each chunk consumes 1024 raw bytes and a
//! 4096-byte block drains in exactly four chunks.
//!
//! # Example
//!
//! ```ignore
//! use novacap_rs::backend::{SampleBuffer, SAMPLES_PER_CHUNK};
//! use novacap_rs::types::SampleFrame;
//!
//! let mut buffer = SampleBuffer::new();
//! let mut frame = SampleFrame::new(1, SAMPLES_PER_CHUNK);
//! let produced = buffer.fill_chunk(&mut link, &mut frame);
//! ```

use crate::backend::link::{
    CaptureLink, BYTES_PER_CHUNK, CHANNEL_BYTES, LOW_WATER_MARK, SAMPLES_PER_CHUNK, STRIDE_BYTES,
};
use crate::types::SampleFrame;

/// The channel filled by the drain loop; the other interleaved lane is
/// received and discarded in this capture profile.
const ACTIVE_CHANNEL: usize = 0;

/// The most recently accepted response payload, exposed as a byte cursor.
///
/// `remaining()` is always consistent with the cursor: every drain advances
/// the cursor and shrinks the remainder by the same amount, and a refill
/// resets both together by replacing the block wholesale.
#[derive(Debug, Clone, Default)]
pub struct RawBlock {
    data: Vec<u8>,
    cursor: usize,
}

impl RawBlock {
    /// An empty block; the first `fill_chunk` call will trigger a refill.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Take ownership of a freshly received payload, cursor at the start.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, cursor: 0 }
    }

    /// Unread bytes left in the block
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// The unread tail of the block
    fn unread(&self) -> &[u8] {
        &self.data[self.cursor..]
    }

    /// Advance the cursor by `n` bytes
    ///
    /// # Panics
    /// Panics if `n` exceeds `remaining()`; callers check bounds first.
    fn advance(&mut self, n: usize) {
        assert!(n <= self.remaining());
        self.cursor += n;
    }
}

/// Drains raw blocks into per-channel sample chunks, refilling from the
/// link when the block runs low.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    block: RawBlock,
}

impl SampleBuffer {
    /// Create a buffer manager with an empty block
    pub fn new() -> Self {
        Self {
            block: RawBlock::empty(),
        }
    }

    /// Unread bytes currently held
    pub fn remaining_bytes(&self) -> usize {
        self.block.remaining()
    }

    /// Drop any held block, e.g. on session teardown or reconnect.
    pub fn clear(&mut self) {
        self.block = RawBlock::empty();
    }

    /// Produce one chunk of samples into `frame`, refilling first if the
    /// block is below the low-water mark.
    ///
    /// Returns the number of samples written to channel 0: 512 on success,
    /// 0 when the refill cycle failed or the frame cannot hold a chunk. A
    /// zero result leaves both the frame and the block untouched and means
    /// "try again next poll", never a fatal condition.
    pub fn fill_chunk(&mut self, link: &mut dyn CaptureLink, frame: &mut SampleFrame) -> usize {
        if !frame.can_hold(SAMPLES_PER_CHUNK) {
            tracing::warn!(
                samples_per_channel = frame.samples_per_channel(),
                "output frame cannot hold a full chunk"
            );
            return 0;
        }

        if self.block.remaining() < LOW_WATER_MARK {
            if let Err(e) = link.send_read_request() {
                tracing::debug!(error = %e, "refill request failed, producing no samples");
                return 0;
            }
            match link.receive_block() {
                // The old block is replaced wholesale, never appended to.
                Ok(payload) => self.block = RawBlock::new(payload),
                Err(e) => {
                    tracing::debug!(error = %e, "refill receive failed, producing no samples");
                    return 0;
                }
            }
        }

        // Above the low-water mark but short of a full chunk can only happen
        // if the framing contract was violated upstream; produce nothing
        // rather than read out of bounds.
        if self.block.remaining() < BYTES_PER_CHUNK {
            tracing::warn!(
                remaining = self.block.remaining(),
                "block too short for a full chunk"
            );
            return 0;
        }

        let raw = self.block.unread();
        let samples = frame.channel_mut(ACTIVE_CHANNEL);
        for stride in 0..(BYTES_PER_CHUNK / STRIDE_BYTES) {
            let lane = &raw[stride * STRIDE_BYTES..stride * STRIDE_BYTES + CHANNEL_BYTES];
            for (byte, &value) in lane.iter().enumerate() {
                // Plain numeric promotion, no scaling or sign correction.
                samples[stride * CHANNEL_BYTES + byte] = i16::from(value);
            }
        }

        self.block.advance(BYTES_PER_CHUNK);
        SAMPLES_PER_CHUNK
    }
}
