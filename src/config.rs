//! Node configuration parameters
//!
//! All tunable parameters for the ESS demo node. Values can be overridden
//! from a JSON document (see [`AppConfig::from_json`]); anything missing
//! falls back to the defaults below.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum length of any device or advertised name.
pub const NAME_CAP: usize = 32;

/// When the service-update timer is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateGating {
    /// Armed at boot: one warm-up delay, then a fixed period.
    Always,
    /// Armed on connect with an immediate cycle, stopped on disconnect.
    WhileConnected,
}

/// Chart geometry and the pressure-to-axis mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Pressure in Pa is divided by this before charting (Pa -> hPa).
    pub pressure_divisor: f32,
    /// Subtracted from the divided pressure so it fits the chart range.
    pub pressure_baseline: f32,
    /// Primary Y axis (temperature, humidity, dew point).
    pub primary_y: (i16, i16),
    /// Secondary Y axis (pressure tick labels).
    pub secondary_y: (i16, i16),
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            pressure_divisor: 100.0,
            pressure_baseline: 980.0,
            primary_y: (-20, 100),
            secondary_y: (960, 1060),
        }
    }
}

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // --- Devices ---
    /// Binding name of the environmental sensor.
    pub sensor_device: String<NAME_CAP>,
    /// Binding name of the optional display.
    pub display_device: String<NAME_CAP>,
    /// Name carried in the advertising payload.
    pub device_name: String<NAME_CAP>,

    // --- Timing ---
    /// One-off delay before the first service update (milliseconds)
    pub service_start_delay_ms: u32,
    /// Service update period (milliseconds)
    pub service_update_interval_ms: u32,
    /// Display input / task handler period (milliseconds)
    pub display_input_interval_ms: u32,
    /// Status text refresh period (milliseconds)
    pub status_refresh_interval_ms: u32,

    pub update_gating: UpdateGating,
    pub chart: ChartConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sensor_device: name("BME280"),
            display_device: name("ILI9340"),
            device_name: name("ESS Demo"),

            service_start_delay_ms: 2_000,
            service_update_interval_ms: 10_000,
            display_input_interval_ms: 10,
            status_refresh_interval_ms: 1_000,

            update_gating: UpdateGating::Always,
            chart: ChartConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot work with. Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_device.is_empty() {
            return Err(ConfigError::ValidationFailed("sensor_device is empty"));
        }
        if self.service_update_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "service_update_interval_ms must be non-zero",
            ));
        }
        if self.display_input_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "display_input_interval_ms must be non-zero",
            ));
        }
        if self.status_refresh_interval_ms < self.display_input_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "status_refresh_interval_ms shorter than display_input_interval_ms",
            ));
        }
        if self.chart.pressure_divisor == 0.0 || !self.chart.pressure_divisor.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "chart.pressure_divisor must be finite and non-zero",
            ));
        }
        if self.chart.primary_y.0 >= self.chart.primary_y.1
            || self.chart.secondary_y.0 >= self.chart.secondary_y.1
        {
            return Err(ConfigError::ValidationFailed("chart axis range is empty"));
        }
        Ok(())
    }

    /// Number of display ticks between status text refreshes.
    pub fn status_refresh_ticks(&self) -> u32 {
        (self.status_refresh_interval_ms / self.display_input_interval_ms.max(1)).max(1)
    }
}

/// Build a name, truncating at [`NAME_CAP`] bytes on a char boundary.
pub fn name(s: &str) -> String<NAME_CAP> {
    let mut out = String::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
