//! Generic-netlink backend for the FPGA capture session
//!
//! This module provides the low-level interface to the `kosagi-fpga` kernel
//! driver over the generic-netlink bus. It handles session establishment,
//! READ request framing, and reply payload extraction.
//!
//! # Session lifecycle
//!
//! - **Open**: allocate a generic-netlink socket, resolve the family id by
//!   name, and size the socket receive buffer for one block plus framing
//!   headroom. The family id is held only after successful resolution; any
//!   failure leaves the session unusable.
//! - **Read cycle**: one READ request, one blocking receive. The reply's
//!   data payload is carried under the `FPGA_DATA` (or legacy `MESSAGE`)
//!   attribute and is returned as an owned buffer, released automatically
//!   when the next block replaces it.
//! - **Close**: dropping the socket releases the descriptor on every exit
//!   path, including early returns during open.
//!
//! # Example
//!
//! ```ignore
//! use novacap_rs::backend::{CaptureLink, NetlinkLink};
//!
//! let mut link = NetlinkLink::new();
//! link.open()?;
//! link.send_read_request()?;
//! let block = link.receive_block()?;
//! ```

use crate::backend::link::{CaptureLink, LinkStats, FAMILY_NAME, RECV_BUFFER_SIZE};
use crate::error::NovacapError;
use crate::error::Result as NovacapResult;
use neli::{
    consts::{
        nl::{NlmF, NlmFFlags},
        socket::NlFamily,
    },
    genl::Genlmsghdr,
    neli_enum,
    nl::{NlPayload, Nlmsghdr},
    socket::NlSocketHandle,
    types::{Buffer, GenlBuffer},
};
use std::os::unix::io::AsRawFd;

/// Generic-netlink protocol version the driver expects
const KOSAGI_GENL_VERSION: u8 = 1;

/// Commands understood by the kosagi-fpga family
///
/// `Send` is declared by the driver but unused by this adapter.
#[neli_enum(serialized_type = "u8")]
pub enum KosagiCmd {
    Unspec = 0,
    Send = 1,
    Read = 2,
}

impl neli::consts::genl::Cmd for KosagiCmd {}

/// Attribute slots the driver may carry payloads under
#[neli_enum(serialized_type = "u16")]
pub enum KosagiAttr {
    None = 0,
    FpgaData = 1,
    Message = 2,
}

impl neli::consts::genl::NlAttrType for KosagiAttr {}

/// Set the socket-level receive buffer so a full block plus netlink framing
/// always fits.
fn set_recv_buffer(fd: i32, size: usize) -> NovacapResult<()> {
    let size = size as libc::c_int;
    let ret = unsafe {
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_RCVBUF,
            &size as *const libc::c_int as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if ret < 0 {
        return Err(NovacapError::Configuration(format!(
            "failed to set receive buffer to {} bytes: {}",
            size,
            std::io::Error::last_os_error()
        )));
    }
    Ok(())
}

/// Real capture transport over the kernel generic-netlink bus
///
/// Owns the socket and the resolved family id for the lifetime of one open
/// device handle. Single-threaded, blocking: `receive_frame` parks the
/// calling thread until the kernel delivers a message or errors out.
pub struct NetlinkLink {
    /// Open socket, present only while the session is established
    sock: Option<NlSocketHandle>,
    /// Resolved family id; `Some` only after successful resolution
    family_id: Option<u16>,
    /// Statistics
    stats: LinkStats,
}

impl NetlinkLink {
    /// Create an unopened link; call [`CaptureLink::open`] before use.
    pub fn new() -> Self {
        Self {
            sock: None,
            family_id: None,
            stats: LinkStats::default(),
        }
    }

    fn establish(&mut self) -> NovacapResult<()> {
        let mut sock = NlSocketHandle::connect(NlFamily::Generic, None, &[])
            .map_err(|e| NovacapError::Connection(format!("generic netlink connect: {}", e)))?;

        let family_id = sock.resolve_genl_family(FAMILY_NAME).map_err(|e| {
            tracing::error!(family = FAMILY_NAME, error = %e, "family resolution failed");
            NovacapError::FamilyNotFound(FAMILY_NAME.to_string())
        })?;

        set_recv_buffer(sock.as_raw_fd(), RECV_BUFFER_SIZE)?;

        // Request/reply only: no ACK flag is ever set, so the kernel sends
        // no automatic acknowledgments.
        self.sock = Some(sock);
        self.family_id = Some(family_id);

        tracing::info!(
            family = FAMILY_NAME,
            family_id,
            recv_buffer = RECV_BUFFER_SIZE,
            "capture session established"
        );
        Ok(())
    }
}

impl Default for NetlinkLink {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureLink for NetlinkLink {
    fn open(&mut self) -> NovacapResult<()> {
        // Re-opening an open link tears the old session down first.
        // `establish` commits the socket and family id together at the end,
        // so a failed open leaves the session unusable with the partially
        // built socket dropped (and its descriptor released) on the way out.
        self.close();
        self.establish()
    }

    fn close(&mut self) {
        if self.sock.take().is_some() {
            tracing::debug!("capture session closed");
        }
        self.family_id = None;
    }

    fn is_open(&self) -> bool {
        self.sock.is_some() && self.family_id.is_some()
    }

    fn send_read_request(&mut self) -> NovacapResult<()> {
        let family_id = self.family_id.ok_or_else(|| {
            NovacapError::Allocation(
                "cannot build READ request: no resolved family (session not open)".to_string(),
            )
        })?;
        let sock = self
            .sock
            .as_mut()
            .ok_or_else(|| NovacapError::Send("session not open".to_string()))?;

        let attrs: GenlBuffer<KosagiAttr, Buffer> = GenlBuffer::new();
        let genlhdr = Genlmsghdr::new(KosagiCmd::Read, KOSAGI_GENL_VERSION, attrs);
        let nlhdr = Nlmsghdr::new(
            None,
            family_id,
            NlmFFlags::new(&[NlmF::Request]),
            None,
            None,
            NlPayload::Payload(genlhdr),
        );

        sock.send(nlhdr).map_err(|e| {
            tracing::warn!(error = %e, "READ request rejected by transport");
            NovacapError::Send(e.to_string())
        })
    }

    fn receive_frame(&mut self) -> NovacapResult<Vec<u8>> {
        let sock = self
            .sock
            .as_mut()
            .ok_or_else(|| NovacapError::Receive("session not open".to_string()))?;

        let msg: Nlmsghdr<u16, Genlmsghdr<KosagiCmd, KosagiAttr>> = sock
            .recv()
            .map_err(|e| {
                tracing::warn!(error = %e, "receive failed");
                NovacapError::Receive(e.to_string())
            })?
            .ok_or_else(|| NovacapError::Receive("socket closed by peer".to_string()))?;

        let genl = match msg.nl_payload {
            NlPayload::Payload(p) => p,
            _ => {
                return Err(NovacapError::Receive(
                    "reply carried no generic payload".to_string(),
                ))
            }
        };

        let attrs = genl.get_attr_handle();
        let data = attrs
            .get_attribute(KosagiAttr::FpgaData)
            .or_else(|| attrs.get_attribute(KosagiAttr::Message))
            .ok_or_else(|| {
                NovacapError::Receive("reply carried no data attribute".to_string())
            })?;

        // Owning the bytes here means the previous block is freed as soon as
        // the caller replaces it; there is no manually managed receive buffer.
        Ok(data.nla_payload.as_ref().to_vec())
    }

    fn stats(&self) -> &LinkStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut LinkStats {
        &mut self.stats
    }
}

impl Drop for NetlinkLink {
    fn drop(&mut self) {
        self.close();
    }
}
