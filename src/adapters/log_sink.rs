//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade, one tagged line per event.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => match t.dew_point {
                Ok(dew) => info!(
                    "TELEM | T={:.2}\u{00b0}C ({}) | H={:.2}% ({}) | P={:.0}Pa ({}) | dew={}\u{00b0}C",
                    t.temperature_c,
                    t.temperature_centi,
                    t.humidity_pct,
                    t.humidity_centi,
                    t.pressure_pa,
                    t.pressure_deci_pa,
                    dew,
                ),
                Err(e) => warn!(
                    "TELEM | T={:.2}\u{00b0}C ({}) | H={:.2}% ({}) | P={:.0}Pa ({}) | dew=n/a ({})",
                    t.temperature_c,
                    t.temperature_centi,
                    t.humidity_pct,
                    t.humidity_centi,
                    t.pressure_pa,
                    t.pressure_deci_pa,
                    e,
                ),
            },
            AppEvent::Started(p) => {
                info!("START | sensor={} display={}", p.sensor(), p.display());
            }
            AppEvent::Halted(reason) => {
                error!("HALT  | {}", reason);
            }
            AppEvent::Connected(peer) => {
                info!("LINK  | connected {}", peer);
            }
            AppEvent::Disconnected { reason } => {
                info!("LINK  | disconnected reason=0x{:02x}", reason);
            }
            AppEvent::SeriesVisibility { series, visible } => {
                info!(
                    "CHART | {} {}",
                    series.label(),
                    if *visible { "shown" } else { "hidden" }
                );
            }
            AppEvent::HistoryCleared => {
                info!("CHART | history cleared");
            }
        }
    }
}
