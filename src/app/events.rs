//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) and the
//! [`Node`](crate::runtime::Node) emit these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them.

use crate::error::{DewPointError, InitError};
use crate::link::PeerAddress;
use crate::presence::PresenceFlags;
use crate::sensors::Quantity;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Boot completed; carries what bound.
    Started(PresenceFlags),

    /// Boot failed; the node is in its error display state.
    Halted(InitError),

    /// One update cycle was dispatched.
    Telemetry(TelemetryReport),

    /// A central connected.
    Connected(PeerAddress),

    /// The central went away.
    Disconnected { reason: u8 },

    /// A series was shown or hidden.
    SeriesVisibility { series: Quantity, visible: bool },

    /// All history buffers were reset.
    HistoryCleared,
}

/// What one update cycle sent out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryReport {
    pub temperature_centi: i16,
    pub humidity_centi: i16,
    pub pressure_deci_pa: i32,
    pub dew_point: Result<i8, DewPointError>,
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub pressure_pa: f32,
}
