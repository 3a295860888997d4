//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (touch input on
//! the chart screen, a console, tests) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

use crate::sensors::Quantity;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Show or hide one chart series.
    SetSeriesVisible(Quantity, bool),

    /// Drop every history buffer and blank the chart.
    ResetHistory,
}

/// Raw widget interactions reported by the display toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiInput {
    /// A series checkbox changed state.
    CheckboxChanged { series: Quantity, checked: bool },
    /// The "Clear" button was clicked.
    ClearClicked,
}

impl From<UiInput> for AppCommand {
    fn from(input: UiInput) -> Self {
        match input {
            UiInput::CheckboxChanged { series, checked } => Self::SetSeriesVisible(series, checked),
            UiInput::ClearClicked => Self::ResetHistory,
        }
    }
}
