//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensor driver, wireless stack, display, event sinks)
//! implement these traits. The [`AppService`](super::service::AppService)
//! and [`Node`](crate::runtime::Node) consume them via generics, so the
//! domain core never touches a platform API directly.

use crate::chart::ChartLayout;
use crate::error::{DriverError, RadioError};
use crate::link::LocalIdentity;
use crate::sensors::Quantity;
use crate::sensors::sample::{SensorChannel, SensorSample, SensorValue};

use super::commands::UiInput;

// ───────────────────────────────────────────────────────────────
// Device binding (boot only)
// ───────────────────────────────────────────────────────────────

/// Looks up peripherals by name. `None` means the device is absent.
pub trait DeviceBinder {
    type Sensor: SensorDriver;
    type Display: DisplaySink;

    fn bind_sensor(&mut self, name: &str) -> Option<Self::Sensor>;

    fn bind_display(&mut self, name: &str) -> Option<Self::Display>;
}

// ───────────────────────────────────────────────────────────────
// Sensor (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw driver interface of the environmental sensor.
pub trait SensorDriver {
    /// Start one acquisition of every channel.
    fn sample_fetch(&mut self) -> Result<(), DriverError>;

    /// Value of `channel` from the last acquisition.
    fn channel_get(&mut self, channel: SensorChannel) -> Result<SensorValue, DriverError>;
}

/// Read-side port: the domain calls this to obtain the cached sample.
pub trait SensorPort {
    fn is_present(&self) -> bool;

    /// Refresh the cached sample. Never fails; absence is a silent no-op.
    fn fetch(&mut self);

    fn sample(&self) -> SensorSample;
}

// ───────────────────────────────────────────────────────────────
// Telemetry (domain → GATT service)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget characteristic update, one call per quantity.
///
/// `value` is the scaled integer: 0.01 °C, 0.01 %RH, 0.1 Pa or 1 °C
/// for the dew point.
pub trait TelemetrySink {
    fn update_quantity(&mut self, quantity: Quantity, value: i32);
}

// ───────────────────────────────────────────────────────────────
// Display (domain → GUI toolkit)
// ───────────────────────────────────────────────────────────────

pub trait DisplaySink {
    fn configure_chart(&mut self, layout: &ChartLayout);

    /// Append a point to the visual series, scrolling out the oldest.
    fn push_series_point(&mut self, series: Quantity, value: i16);

    fn clear_series(&mut self, series: Quantity);

    fn redraw(&mut self);

    fn set_status_text(&mut self, text: &str);

    /// Replace the whole screen with an error banner.
    fn show_error(&mut self, text: &str);

    /// Let the toolkit process its own pending work (animations, touch).
    fn run_pending(&mut self);

    /// Next user interaction, if one is queued.
    fn poll_input(&mut self) -> Option<UiInput>;
}

/// An absent display swallows every call.
impl<D: DisplaySink> DisplaySink for Option<D> {
    fn configure_chart(&mut self, layout: &ChartLayout) {
        if let Some(d) = self {
            d.configure_chart(layout);
        }
    }

    fn push_series_point(&mut self, series: Quantity, value: i16) {
        if let Some(d) = self {
            d.push_series_point(series, value);
        }
    }

    fn clear_series(&mut self, series: Quantity) {
        if let Some(d) = self {
            d.clear_series(series);
        }
    }

    fn redraw(&mut self) {
        if let Some(d) = self {
            d.redraw();
        }
    }

    fn set_status_text(&mut self, text: &str) {
        if let Some(d) = self {
            d.set_status_text(text);
        }
    }

    fn show_error(&mut self, text: &str) {
        if let Some(d) = self {
            d.show_error(text);
        }
    }

    fn run_pending(&mut self) {
        if let Some(d) = self {
            d.run_pending();
        }
    }

    fn poll_input(&mut self) -> Option<UiInput> {
        self.as_mut().and_then(|d| d.poll_input())
    }
}

// ───────────────────────────────────────────────────────────────
// Radio (wireless stack lifecycle)
// ───────────────────────────────────────────────────────────────

pub trait RadioPort {
    fn enable(&mut self) -> Result<(), RadioError>;

    /// Start connectable advertising of the ESS UUID under `name`.
    fn start_advertising(&mut self, name: &str) -> Result<(), RadioError>;

    fn local_identity(&self) -> LocalIdentity;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples timers from the work queue)
// ───────────────────────────────────────────────────────────────

/// Callback the [`Scheduler`](crate::scheduler::Scheduler) invokes when a
/// timer expires. The node forwards each fire into its work queue; the
/// scheduler itself knows nothing about queues.
pub trait SchedulerDelegate {
    fn on_timer_fired(&mut self, id: TimerId);
}

/// The node's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    /// Fast tick: toolkit work, input and the periodic status refresh.
    DisplayInput,
    /// Slow tick: sample, derive, dispatch.
    ServiceUpdate,
}
