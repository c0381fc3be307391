//! # novacap-rs: Novena FPGA capture data source
//!
//! A data-acquisition adapter for the Kosagi Novena's FPGA-backed capture
//! device, exposed by the kernel through the `kosagi-fpga` generic-netlink
//! family. The adapter opens a session with the device, issues READ
//! requests, receives fixed-size 4096-byte blocks, and reshapes the raw
//! byte stream into per-channel sample buffers for an oscilloscope-style
//! visualization pipeline.
//!
//! ## Architecture
//!
//! - **Transport session** ([`backend::NetlinkLink`]): owns the
//!   generic-netlink socket, resolves the device family by name, sizes the
//!   receive buffer
//! - **Protocol seam** ([`backend::CaptureLink`]): one READ request, one
//!   framing-checked reply; a mock implementation stands in for tests
//! - **Sample buffer manager** ([`backend::SampleBuffer`]): drains blocks
//!   in fixed strides into [`types::SampleFrame`]s, refilling below the
//!   low-water mark
//! - **Host contract** ([`source::DataSource`]): pull-based sample
//!   retrieval plus fixed metadata, with adapters discovered through the
//!   process-wide [`source::registry`]
//!
//! Everything is single-threaded, synchronous, and blocking: the host polls
//! `get_raw_data` from its acquisition loop, and a cycle with no device
//! data produces zero samples rather than an error.
//!
//! ## Example
//!
//! ```ignore
//! use novacap_rs::backend::SAMPLES_PER_CHUNK;
//! use novacap_rs::source::{find_descriptor, DataSource};
//! use novacap_rs::types::SampleFrame;
//!
//! let descriptor = find_descriptor("Novena capture").unwrap();
//! let mut source = descriptor.create();
//! source.init()?;
//!
//! let mut frame = SampleFrame::new(source.input_count(), SAMPLES_PER_CHUNK);
//! loop {
//!     match source.get_raw_data(&mut frame) {
//!         0 => { /* nothing this cycle, poll again later */ }
//!         n => { /* frame.channel(0)[..n] holds fresh samples */ }
//!     }
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use backend::{CaptureLink, NetlinkLink, SampleBuffer, DATA_SIZE, SAMPLES_PER_CHUNK};
pub use config::CaptureSettings;
pub use error::{NovacapError, Result};
pub use source::{find_descriptor, registry, DataSource, NovenaSource};
pub use types::SampleFrame;
