//! Data-source abstraction consumed by the host application
//!
//! The host's acquisition loop talks to capture adapters through the
//! [`DataSource`] trait: initialize once, then pull chunks of deinterleaved
//! samples at the display cadence. Adapter metadata (channel count,
//! sampling rate, units per volt) is fixed per adapter and reported as
//! static properties, never probed from the device at runtime.
//!
//! Adapters are discovered through the process-wide
//! [`registry`](crate::source::registry) keyed by source name.

pub mod novena;
pub mod registry;

pub use novena::NovenaSource;
pub use registry::{find_descriptor, registry, SourceDescriptor};

use crate::error::Result;
use crate::types::SampleFrame;

/// A pull-based capture adapter
///
/// Implementations must be `Send` so the host can move them onto its
/// acquisition thread. One instance owns one device handle.
pub trait DataSource: Send {
    /// Establish the device session.
    ///
    /// Errors here are fatal: the source must not be used afterward and the
    /// host must not offer it for selection.
    fn init(&mut self) -> Result<()>;

    /// Fill `frame` with the next chunk of samples.
    ///
    /// Returns the number of samples produced per channel: a full chunk on
    /// success, 0 when the device had nothing this cycle (the caller should
    /// retry on its next poll; the frame is untouched).
    fn get_raw_data(&mut self, frame: &mut SampleFrame) -> usize;

    /// Number of input channels this adapter fills
    fn input_count(&self) -> usize;

    /// Fixed sampling rate in Hz
    fn sampling_rate(&self) -> u32;

    /// Scale constant: sample units per volt
    fn unit_per_volt(&self) -> u32;

    /// Tear the device session down; further reads fail cleanly.
    fn shutdown(&mut self);
}
