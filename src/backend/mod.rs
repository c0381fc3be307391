//! Backend module for the FPGA capture protocol engine
//!
//! Three stateful layers, leaves first, all living for the lifetime of one
//! open device handle:
//!
//! 1. [`NetlinkLink`] - transport session: owns the generic-netlink socket,
//!    resolves the `kosagi-fpga` family, sizes the receive buffer
//! 2. [`CaptureLink`] - request/response protocol seam: one READ request,
//!    one framing-checked 4096-byte reply
//! 3. [`SampleBuffer`] - drains accepted blocks in fixed strides into
//!    per-channel sample chunks, refilling below the low-water mark
//!
//! The model is single-threaded, synchronous, and blocking; backpressure is
//! implicit in the poll loop (a failed refill yields a zero-sample cycle and
//! the caller retries on its next poll).
//!
//! # Components
//!
//! - [`NetlinkLink`] - Real transport over the kernel generic-netlink bus
//! - [`MockLink`] - Scripted transport for testing without hardware
//!   (feature-gated)
//! - [`SampleBuffer`] / [`RawBlock`] - Buffer-draining state machine

pub mod link;
#[cfg(any(test, feature = "mock-link"))]
pub mod mock_link;
pub mod netlink;
pub mod sample_buffer;

pub use link::{
    CaptureLink, LinkStats, BYTES_PER_CHUNK, CHANNEL_BYTES, DATA_SIZE, FAMILY_NAME,
    LOW_WATER_MARK, RECV_BUFFER_SIZE, SAMPLES_PER_CHUNK, STRIDE_BYTES,
};
#[cfg(any(test, feature = "mock-link"))]
pub use mock_link::MockLink;
pub use netlink::{KosagiAttr, KosagiCmd, NetlinkLink};
pub use sample_buffer::{RawBlock, SampleBuffer};
