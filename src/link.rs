//! Wireless link state and the status line shown under the chart.
//!
//! Only what the status text needs is tracked: whether a central is
//! connected and, if so, its address.

use core::fmt::{self, Write};

use heapless::String;
use log::warn;

/// Capacity of the rendered status text.
pub const STATUS_CAP: usize = 128;

pub type StatusText = String<STATUS_CAP>;

/// A 48-bit link-layer address with its address type.
///
/// `bytes` is little-endian as delivered by the stack (`bytes[0]` is the
/// least significant octet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeerAddress {
    pub kind: u8,
    pub bytes: [u8; 6],
}

impl PeerAddress {
    pub const fn new(kind: u8, bytes: [u8; 6]) -> Self {
        Self { kind, bytes }
    }
}

/// Renders as `"{kind:02x} {b5}{b4}{b3}{b2}{b1}{b0}"`, most significant
/// octet first.
impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x} ", self.kind)?;
        for b in self.bytes.iter().rev() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// Connection notifications from the wireless stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected(PeerAddress),
    /// The stack reported a failed connection attempt (HCI error code).
    ConnectFailed(u8),
    Disconnected { reason: u8 },
}

/// Whether a central is attached, and which one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkState {
    peer: Option<PeerAddress>,
}

impl LinkState {
    pub fn is_connected(&self) -> bool {
        self.peer.is_some()
    }

    pub fn peer(&self) -> Option<PeerAddress> {
        self.peer
    }

    /// Apply a connection event. Returns `true` if the state changed.
    pub fn apply(&mut self, event: ConnectionEvent) -> bool {
        let next = match event {
            ConnectionEvent::Connected(addr) => Some(addr),
            ConnectionEvent::ConnectFailed(_) => return false,
            ConnectionEvent::Disconnected { .. } => None,
        };
        let changed = self.peer != next;
        self.peer = next;
        changed
    }
}

/// Our own advertised name and address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIdentity {
    pub name: String<32>,
    pub address: PeerAddress,
}

/// Build the status line for the current link state.
pub fn status_text(link: &LinkState, local: &LocalIdentity, uptime_secs: u32) -> StatusText {
    let mut out = StatusText::new();
    let res = match link.peer() {
        Some(peer) => write!(
            out,
            "Up {} seconds, connected\nRemote Address: {}",
            uptime_secs, peer
        ),
        None => write!(
            out,
            "Up {} seconds, advertising\nName: {}\nAddress: {}",
            uptime_secs, local.name, local.address
        ),
    };
    if res.is_err() {
        warn!("Status text truncated at {} bytes", STATUS_CAP);
    }
    out
}

/// Build the boot failure banner.
pub fn error_text(message: &str) -> StatusText {
    let mut out = StatusText::new();
    if write!(out, "Error occurred during initialisation\n{}", message).is_err() {
        warn!("Error text truncated at {} bytes", STATUS_CAP);
    }
    out
}
