//! Novena FPGA capture source
//!
//! Binds the protocol engine together into one [`DataSource`]: a capture
//! link (generic netlink against real hardware, or a mock), plus the sample
//! buffer manager that drains received blocks into the host's frame.

use crate::backend::{CaptureLink, LinkStats, NetlinkLink, SampleBuffer, SAMPLES_PER_CHUNK};
use crate::error::Result;
use crate::source::DataSource;
use crate::types::SampleFrame;

/// Display name the source registers under
pub const SOURCE_NAME: &str = "Novena capture";

/// One-line description for source pickers
pub const SOURCE_DESCRIPTION: &str = "Novena FPGA-based input capture";

/// Channels this adapter fills.
///
/// The wire format interleaves a second lane into every stride, but this
/// capture profile never retains it, so exactly one channel is reported.
pub const INPUT_COUNT: usize = 1;

/// Fixed sampling rate of the capture hardware
pub const SAMPLING_RATE_HZ: u32 = 44_100;

/// Fixed scale: sample units per volt
pub const UNITS_PER_VOLT: u32 = 10_000;

/// Capture adapter for the Novena FPGA input
pub struct NovenaSource {
    link: Box<dyn CaptureLink>,
    buffer: SampleBuffer,
}

impl NovenaSource {
    /// A source backed by the real generic-netlink transport.
    ///
    /// The session is not established until [`DataSource::init`].
    pub fn new() -> Self {
        Self::with_link(Box::new(NetlinkLink::new()))
    }

    /// A source over an arbitrary transport, used to swap in a mock link.
    pub fn with_link(link: Box<dyn CaptureLink>) -> Self {
        Self {
            link,
            buffer: SampleBuffer::new(),
        }
    }

    /// Link statistics for diagnostics
    pub fn link_stats(&self) -> &LinkStats {
        self.link.stats()
    }

    /// Samples produced per successful `get_raw_data` call
    pub fn chunk_size(&self) -> usize {
        SAMPLES_PER_CHUNK
    }
}

impl Default for NovenaSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for NovenaSource {
    fn init(&mut self) -> Result<()> {
        self.link.open().map_err(|e| {
            tracing::error!(error = %e, "capture source initialization failed");
            e
        })
    }

    fn get_raw_data(&mut self, frame: &mut SampleFrame) -> usize {
        self.buffer.fill_chunk(self.link.as_mut(), frame)
    }

    fn input_count(&self) -> usize {
        INPUT_COUNT
    }

    fn sampling_rate(&self) -> u32 {
        SAMPLING_RATE_HZ
    }

    fn unit_per_volt(&self) -> u32 {
        UNITS_PER_VOLT
    }

    fn shutdown(&mut self) {
        self.buffer.clear();
        self.link.close();
    }
}

impl Drop for NovenaSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}
