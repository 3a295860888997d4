//! Console stand-in for the chart screen.
//!
//! Keeps the state a real display toolkit would hold (series points,
//! status label, error banner) and renders it to the log on redraw.
//! Touch input is simulated by queueing [`UiInput`]s with
//! [`ConsoleDisplay::inject`].

use heapless::Deque;
use log::{debug, error, info, warn};

use crate::app::commands::UiInput;
use crate::app::ports::DisplaySink;
use crate::chart::{ChartHistory, ChartLayout};
use crate::link::StatusText;
use crate::sensors::Quantity;

/// Pending simulated touches.
pub const INPUT_QUEUE_DEPTH: usize = 8;

#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    layout: Option<ChartLayout>,
    series: [ChartHistory; 4],
    status: StatusText,
    error: Option<StatusText>,
    input: Deque<UiInput, INPUT_QUEUE_DEPTH>,
    redraws: u32,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a simulated touch. Returns `false` if the queue is full.
    pub fn inject(&mut self, input: UiInput) -> bool {
        if self.input.push_back(input).is_err() {
            warn!("Display input queue full, dropped {:?}", input);
            return false;
        }
        true
    }

    pub fn layout(&self) -> Option<&ChartLayout> {
        self.layout.as_ref()
    }

    /// Points currently drawn for `series`, oldest first.
    pub fn series(&self, series: Quantity) -> &[i16] {
        self.series[series.index()].recent()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn redraw_count(&self) -> u32 {
        self.redraws
    }
}

impl DisplaySink for ConsoleDisplay {
    fn configure_chart(&mut self, layout: &ChartLayout) {
        info!(
            "Display: chart {} points, primary {:?}, secondary {:?}",
            layout.point_count, layout.primary_y, layout.secondary_y
        );
        self.layout = Some(*layout);
    }

    fn push_series_point(&mut self, series: Quantity, value: i16) {
        self.series[series.index()].push(value);
    }

    fn clear_series(&mut self, series: Quantity) {
        self.series[series.index()].clear();
    }

    fn redraw(&mut self) {
        self.redraws = self.redraws.wrapping_add(1);
        for q in Quantity::ALL {
            debug!("Display: {:<5} {:?}", q.label(), self.series(q));
        }
    }

    fn set_status_text(&mut self, text: &str) {
        self.status.clear();
        // Same capacity as the source buffer.
        let _ = self.status.push_str(text);
        debug!("Display: status {:?}", text);
    }

    fn show_error(&mut self, text: &str) {
        let mut banner = StatusText::new();
        let _ = banner.push_str(text);
        error!("Display: {}", text.replace('\n', " | "));
        self.error = Some(banner);
    }

    fn run_pending(&mut self) {}

    fn poll_input(&mut self) -> Option<UiInput> {
        self.input.pop_front()
    }
}
