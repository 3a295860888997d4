//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the chart model, link state and presence flags.
//! It exposes a clean, hardware-agnostic API. All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!   SensorPort ──▶ ┌────────────────────────┐ ──▶ TelemetrySink
//!                  │       AppService        │
//!  DisplaySink ◀──▶│ dew point · chart · link│ ──▶ EventSink
//!                  └────────────────────────┘
//! ```

use log::{debug, error, info, warn};

use crate::chart::ChartModel;
use crate::config::AppConfig;
use crate::link::{self, ConnectionEvent, LinkState, LocalIdentity};
use crate::presence::PresenceFlags;
use crate::sensors::Quantity;
use crate::sensors::dew_point::dew_point;

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryReport};
use super::ports::{DisplaySink, EventSink, SensorPort, TelemetrySink};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    presence: PresenceFlags,
    chart: ChartModel,
    link: LinkState,
    local: LocalIdentity,
    /// Display ticks between status text refreshes.
    status_refresh_ticks: u32,
    display_ticks: u32,
    cycle_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the display; call [`start`](Self::start) next.
    pub fn new(config: &AppConfig, presence: PresenceFlags, local: LocalIdentity) -> Self {
        Self {
            presence,
            chart: ChartModel::new(config.chart),
            link: LinkState::default(),
            local,
            status_refresh_ticks: config.status_refresh_ticks(),
            display_ticks: 0,
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Lay out the chart and render the first status line.
    pub fn start(&mut self, display: &mut impl DisplaySink, uptime_secs: u32, sink: &mut impl EventSink) {
        if self.presence.display() {
            display.configure_chart(&self.chart.layout());
            self.refresh_status(display, uptime_secs);
            display.run_pending();
        }
        sink.emit(&AppEvent::Started(self.presence));
        info!(
            "AppService started (sensor={}, display={})",
            self.presence.sensor(),
            self.presence.display()
        );
    }

    // ── Update cycle ──────────────────────────────────────────

    /// Run one full cycle: fetch → dew point → telemetry → history → chart.
    ///
    /// Temperature, humidity and pressure are always dispatched, zeroed if
    /// the sensor has nothing better. The dew point is dispatched and
    /// recorded only when it can be computed.
    pub fn run_update_cycle(
        &mut self,
        sensor: &mut impl SensorPort,
        telemetry: &mut impl TelemetrySink,
        display: &mut impl DisplaySink,
        sink: &mut impl EventSink,
    ) -> TelemetryReport {
        self.cycle_count += 1;

        // 1. Acquire
        sensor.fetch();
        let sample = sensor.sample();

        // 2. Both encodings
        let temperature_c = sample.temperature_c();
        let humidity_pct = sample.humidity_pct();
        let pressure_pa = sample.pressure_pa();

        // 3. Derive
        let dew = dew_point(temperature_c, humidity_pct);
        if let Err(e) = dew {
            warn!(
                "Dew point skipped (T={:.2}C, H={:.2}%): {}",
                temperature_c, humidity_pct, e
            );
        }

        // 4. Dispatch, one update per quantity
        let report = TelemetryReport {
            temperature_centi: sample.temperature_centi(),
            humidity_centi: sample.humidity_centi(),
            pressure_deci_pa: sample.pressure_deci_pa(),
            dew_point: dew,
            temperature_c,
            humidity_pct,
            pressure_pa,
        };
        telemetry.update_quantity(Quantity::Temperature, i32::from(report.temperature_centi));
        telemetry.update_quantity(Quantity::Humidity, i32::from(report.humidity_centi));
        telemetry.update_quantity(Quantity::Pressure, report.pressure_deci_pa);
        if let Ok(d) = dew {
            telemetry.update_quantity(Quantity::DewPoint, i32::from(d));
        }

        // 5. History, then the visual series if a display is attached
        let point = self
            .chart
            .point(temperature_c, humidity_pct, pressure_pa, dew.ok());
        self.chart.record(&point);

        if self.presence.display() {
            for q in Quantity::ALL {
                if let Some(v) = point.get(q).filter(|_| self.chart.is_visible(q)) {
                    display.push_series_point(q, v);
                }
            }
            display.redraw();
        }

        debug!("Update cycle {} dispatched: {:?}", self.cycle_count, report);
        sink.emit(&AppEvent::Telemetry(report));
        report
    }

    // ── Display tick ──────────────────────────────────────────

    /// Fast-tick work: periodic status refresh, toolkit housekeeping and
    /// any queued user input.
    pub fn on_display_tick(
        &mut self,
        display: &mut impl DisplaySink,
        uptime_secs: u32,
        sink: &mut impl EventSink,
    ) {
        if !self.presence.display() {
            return;
        }

        self.display_ticks += 1;
        if self.display_ticks >= self.status_refresh_ticks {
            self.refresh_status(display, uptime_secs);
            self.display_ticks = 0;
        }

        display.run_pending();

        while let Some(input) = display.poll_input() {
            self.handle_command(input.into(), display, sink);
        }
    }

    /// Re-render the status line from the current link state.
    pub fn refresh_status(&self, display: &mut impl DisplaySink, uptime_secs: u32) {
        if !self.presence.display() {
            return;
        }
        let text = link::status_text(&self.link, &self.local, uptime_secs);
        display.set_status_text(&text);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (touch input, console, tests).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        display: &mut impl DisplaySink,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::SetSeriesVisible(series, visible) => {
                if !self.chart.set_visible(series, visible) {
                    return;
                }
                if visible {
                    // Only the filled tail, so unfilled zero slots never show.
                    for &v in self.chart.history(series).recent() {
                        display.push_series_point(series, v);
                    }
                } else {
                    display.clear_series(series);
                }
                display.redraw();
                sink.emit(&AppEvent::SeriesVisibility { series, visible });
            }
            AppCommand::ResetHistory => {
                self.chart.clear_all();
                for q in Quantity::ALL {
                    display.clear_series(q);
                }
                display.redraw();
                info!("Chart history cleared");
                sink.emit(&AppEvent::HistoryCleared);
            }
        }
    }

    // ── Link events ───────────────────────────────────────────

    /// Track the connected peer and re-render the status line.
    pub fn handle_link_event(
        &mut self,
        event: ConnectionEvent,
        display: &mut impl DisplaySink,
        uptime_secs: u32,
        sink: &mut impl EventSink,
    ) {
        match event {
            ConnectionEvent::Connected(peer) => {
                info!("Connected");
                sink.emit(&AppEvent::Connected(peer));
            }
            ConnectionEvent::ConnectFailed(code) => {
                error!("Connection failed (err 0x{:02x})", code);
                return;
            }
            ConnectionEvent::Disconnected { reason } => {
                info!("Disconnected (reason 0x{:02x})", reason);
                sink.emit(&AppEvent::Disconnected { reason });
            }
        }
        self.link.apply(event);
        self.refresh_status(display, uptime_secs);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn presence(&self) -> PresenceFlags {
        self.presence
    }

    pub fn chart(&self) -> &ChartModel {
        &self.chart
    }

    pub fn link(&self) -> &LinkState {
        &self.link
    }

    /// Update cycles run since boot.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }
}
