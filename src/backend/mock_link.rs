//! Mock capture link for testing without the kernel driver
//!
//! This module provides a scripted transport that stands in for the
//! generic-netlink session. It replays queued frames, can synthesize an
//! endless ramp pattern, and injects send/receive failures on demand, which
//! is enough to exercise every path of the protocol engine and the sample
//! buffer manager on a machine without the FPGA hardware.
//!
//! The mock also enforces the session's request/reply state machine: a
//! receive without an outstanding request fails, as does a second request
//! before the first reply was consumed.
//!
//! # Enabling
//!
//! Available in unit tests unconditionally and otherwise behind the
//! `mock-link` feature:
//!
//! ```bash
//! cargo test --features mock-link
//! ```

use crate::backend::link::{CaptureLink, LinkStats, DATA_SIZE};
use crate::error::{NovacapError, Result};
use std::collections::VecDeque;

/// Scripted stand-in for the netlink capture session
pub struct MockLink {
    /// Whether the mock session is "open"
    connected: bool,
    /// Frames handed out in order before any synthesis kicks in
    scripted_frames: VecDeque<Vec<u8>>,
    /// Synthesize ramp blocks once the script runs out
    auto_generate: bool,
    /// Running offset so consecutive synthesized blocks differ
    ramp_base: u8,
    /// Fail the next send request
    fail_next_send: bool,
    /// Fail the next receive
    fail_next_receive: bool,
    /// True between a send and its reply
    request_outstanding: bool,
    /// Number of READ requests accepted
    requests_sent: u64,
    /// Statistics
    stats: LinkStats,
}

impl MockLink {
    /// A mock that synthesizes an endless ramp pattern
    pub fn new() -> Self {
        Self {
            connected: false,
            scripted_frames: VecDeque::new(),
            auto_generate: true,
            ramp_base: 0,
            fail_next_send: false,
            fail_next_receive: false,
            request_outstanding: false,
            requests_sent: 0,
            stats: LinkStats::default(),
        }
    }

    /// A mock that never produces data: every refill cycle fails at receive
    pub fn dry() -> Self {
        Self {
            auto_generate: false,
            ..Self::new()
        }
    }

    /// Queue a frame to be returned before any synthesized blocks
    pub fn queue_frame(&mut self, frame: Vec<u8>) {
        self.scripted_frames.push_back(frame);
    }

    /// Queue a frame, builder-style
    pub fn with_frame(mut self, frame: Vec<u8>) -> Self {
        self.queue_frame(frame);
        self
    }

    /// Make the next `send_read_request` fail
    pub fn fail_next_send(&mut self) {
        self.fail_next_send = true;
    }

    /// Make the next `receive_frame` fail
    pub fn fail_next_receive(&mut self) {
        self.fail_next_receive = true;
    }

    /// Number of READ requests accepted so far
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent
    }

    /// One valid block of the synthesized ramp: byte i holds base + i mod 256
    fn ramp_block(&mut self) -> Vec<u8> {
        let base = self.ramp_base;
        self.ramp_base = self.ramp_base.wrapping_add(1);
        (0..DATA_SIZE)
            .map(|i| base.wrapping_add((i % 256) as u8))
            .collect()
    }
}

impl Default for MockLink {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureLink for MockLink {
    fn open(&mut self) -> Result<()> {
        self.connected = true;
        self.request_outstanding = false;
        tracing::info!("mock capture session opened");
        Ok(())
    }

    fn close(&mut self) {
        if self.connected {
            tracing::debug!("mock capture session closed");
        }
        self.connected = false;
        self.request_outstanding = false;
    }

    fn is_open(&self) -> bool {
        self.connected
    }

    fn send_read_request(&mut self) -> Result<()> {
        if !self.connected {
            return Err(NovacapError::Send("session not open".to_string()));
        }
        if self.fail_next_send {
            self.fail_next_send = false;
            return Err(NovacapError::Send("scripted send failure".to_string()));
        }
        if self.request_outstanding {
            return Err(NovacapError::Send(
                "request already outstanding on this session".to_string(),
            ));
        }
        self.request_outstanding = true;
        self.requests_sent += 1;
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<Vec<u8>> {
        if !self.connected {
            return Err(NovacapError::Receive("session not open".to_string()));
        }
        if !self.request_outstanding {
            return Err(NovacapError::Receive(
                "no request outstanding".to_string(),
            ));
        }
        self.request_outstanding = false;

        if self.fail_next_receive {
            self.fail_next_receive = false;
            return Err(NovacapError::Receive("scripted receive failure".to_string()));
        }
        if let Some(frame) = self.scripted_frames.pop_front() {
            return Ok(frame);
        }
        if self.auto_generate {
            return Ok(self.ramp_block());
        }
        Err(NovacapError::Receive("device has no data".to_string()))
    }

    fn stats(&self) -> &LinkStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut LinkStats {
        &mut self.stats
    }
}
