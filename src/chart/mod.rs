//! Chart model: one rolling history per quantity plus series visibility.
//!
//! The model is pure state. [`AppService`](crate::app::service::AppService)
//! mirrors it onto a [`DisplaySink`](crate::app::ports::DisplaySink) when
//! a display is attached.

pub mod history;

use crate::config::ChartConfig;
use crate::sensors::Quantity;
use history::HistoryBuffer;

/// Points shown on the chart and kept per history buffer.
pub const CHART_POINTS: usize = 7;

pub type ChartHistory = HistoryBuffer<CHART_POINTS>;

/// Static chart geometry handed to the display once at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub point_count: usize,
    pub primary_y: (i16, i16),
    pub secondary_y: (i16, i16),
}

/// One cycle's readings reduced to chart units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPoint {
    pub temperature: i16,
    pub humidity: i16,
    pub pressure: i16,
    /// `None` when the dew point could not be computed this cycle.
    pub dew_point: Option<i16>,
}

impl ChartPoint {
    pub fn get(&self, quantity: Quantity) -> Option<i16> {
        match quantity {
            Quantity::Temperature => Some(self.temperature),
            Quantity::Humidity => Some(self.humidity),
            Quantity::Pressure => Some(self.pressure),
            Quantity::DewPoint => self.dew_point,
        }
    }
}

pub struct ChartModel {
    history: [ChartHistory; 4],
    visible: [bool; 4],
    scaling: ChartConfig,
}

impl ChartModel {
    /// All series start visible with empty history.
    pub fn new(scaling: ChartConfig) -> Self {
        Self {
            history: [
                ChartHistory::new(),
                ChartHistory::new(),
                ChartHistory::new(),
                ChartHistory::new(),
            ],
            visible: [true; 4],
            scaling,
        }
    }

    pub fn layout(&self) -> ChartLayout {
        ChartLayout {
            point_count: CHART_POINTS,
            primary_y: self.scaling.primary_y,
            secondary_y: self.scaling.secondary_y,
        }
    }

    /// Convert float readings into chart units.
    ///
    /// Values are truncated toward zero; pressure is divided and offset so
    /// that it lands inside the secondary axis band.
    pub fn point(&self, temperature_c: f32, humidity_pct: f32, pressure_pa: f32, dew_point: Option<i8>) -> ChartPoint {
        ChartPoint {
            temperature: temperature_c as i16,
            humidity: humidity_pct as i16,
            pressure: self.pressure_to_chart(pressure_pa),
            dew_point: dew_point.map(i16::from),
        }
    }

    pub fn pressure_to_chart(&self, pressure_pa: f32) -> i16 {
        ((pressure_pa / self.scaling.pressure_divisor) - self.scaling.pressure_baseline) as i16
    }

    /// Append every present value of `point` to its history.
    pub fn record(&mut self, point: &ChartPoint) {
        for q in Quantity::ALL {
            if let Some(v) = point.get(q) {
                self.history[q.index()].push(v);
            }
        }
    }

    pub fn history(&self, quantity: Quantity) -> &ChartHistory {
        &self.history[quantity.index()]
    }

    pub fn is_visible(&self, quantity: Quantity) -> bool {
        self.visible[quantity.index()]
    }

    /// Returns `true` if the visibility actually changed.
    pub fn set_visible(&mut self, quantity: Quantity, visible: bool) -> bool {
        let slot = &mut self.visible[quantity.index()];
        let changed = *slot != visible;
        *slot = visible;
        changed
    }

    /// Clear every history buffer. Visibility is untouched.
    pub fn clear_all(&mut self) {
        for h in &mut self.history {
            h.clear();
        }
    }
}
