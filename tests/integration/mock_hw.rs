//! Mock hardware adapters for integration tests.
//!
//! Every port call is recorded so tests can assert on the full history
//! without a sensor, radio or screen attached.

use std::collections::VecDeque;

use ess_demo::app::commands::UiInput;
use ess_demo::app::events::AppEvent;
use ess_demo::app::ports::{
    DeviceBinder, DisplaySink, EventSink, RadioPort, SensorDriver, TelemetrySink,
};
use ess_demo::chart::ChartLayout;
use ess_demo::config::name;
use ess_demo::error::{DriverError, RadioError};
use ess_demo::link::{LocalIdentity, PeerAddress};
use ess_demo::sensors::Quantity;
use ess_demo::sensors::sample::{SensorChannel, SensorSample, SensorValue};

// ── Sensor ────────────────────────────────────────────────────

/// Returns `sample` on every fetch until told otherwise.
pub struct MockSensor {
    pub sample: SensorSample,
    pub fail_fetch: bool,
    pub fetches: u32,
}

#[allow(dead_code)]
impl MockSensor {
    pub fn new(sample: SensorSample) -> Self {
        Self {
            sample,
            fail_fetch: false,
            fetches: 0,
        }
    }
}

impl SensorDriver for MockSensor {
    fn sample_fetch(&mut self) -> Result<(), DriverError> {
        self.fetches += 1;
        if self.fail_fetch {
            Err(DriverError::FetchFailed)
        } else {
            Ok(())
        }
    }

    fn channel_get(&mut self, channel: SensorChannel) -> Result<SensorValue, DriverError> {
        Ok(match channel {
            SensorChannel::AmbientTemperature => self.sample.temperature,
            SensorChannel::Pressure => self.sample.pressure,
            SensorChannel::Humidity => self.sample.humidity,
        })
    }
}

/// 23.45 °C, 48.50 %RH, 101.325 kPa.
pub fn indoor_sample() -> SensorSample {
    SensorSample {
        temperature: SensorValue::new(23, 450_000),
        humidity: SensorValue::new(48, 500_000),
        pressure: SensorValue::new(101, 325_000),
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    ConfigureChart(ChartLayout),
    Push(Quantity, i16),
    Clear(Quantity),
    Redraw,
    Status(String),
    Error(String),
    RunPending,
}

#[derive(Default)]
pub struct MockDisplay {
    pub calls: Vec<DisplayCall>,
    pub input: VecDeque<UiInput>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushes(&self, series: Quantity) -> Vec<i16> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Push(q, v) if *q == series => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Status(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &DisplayCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl DisplaySink for MockDisplay {
    fn configure_chart(&mut self, layout: &ChartLayout) {
        self.calls.push(DisplayCall::ConfigureChart(*layout));
    }

    fn push_series_point(&mut self, series: Quantity, value: i16) {
        self.calls.push(DisplayCall::Push(series, value));
    }

    fn clear_series(&mut self, series: Quantity) {
        self.calls.push(DisplayCall::Clear(series));
    }

    fn redraw(&mut self) {
        self.calls.push(DisplayCall::Redraw);
    }

    fn set_status_text(&mut self, text: &str) {
        self.calls.push(DisplayCall::Status(text.to_owned()));
    }

    fn show_error(&mut self, text: &str) {
        self.calls.push(DisplayCall::Error(text.to_owned()));
    }

    fn run_pending(&mut self) {
        self.calls.push(DisplayCall::RunPending);
    }

    fn poll_input(&mut self) -> Option<UiInput> {
        self.input.pop_front()
    }
}

// ── Board ─────────────────────────────────────────────────────

pub struct MockBoard {
    pub sensor: Option<MockSensor>,
    pub display: Option<MockDisplay>,
    pub sensor_lookups: Vec<String>,
    pub display_lookups: Vec<String>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new(sensor: Option<MockSensor>, display: Option<MockDisplay>) -> Self {
        Self {
            sensor,
            display,
            sensor_lookups: Vec::new(),
            display_lookups: Vec::new(),
        }
    }

    /// Sensor and display both attached.
    pub fn full() -> Self {
        Self::new(Some(MockSensor::new(indoor_sample())), Some(MockDisplay::new()))
    }

    pub fn headless() -> Self {
        Self::new(Some(MockSensor::new(indoor_sample())), None)
    }
}

impl DeviceBinder for MockBoard {
    type Sensor = MockSensor;
    type Display = MockDisplay;

    fn bind_sensor(&mut self, name: &str) -> Option<MockSensor> {
        self.sensor_lookups.push(name.to_owned());
        self.sensor.take()
    }

    fn bind_display(&mut self, name: &str) -> Option<MockDisplay> {
        self.display_lookups.push(name.to_owned());
        self.display.take()
    }
}

// ── Radio ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockRadio {
    pub enable_error: Option<i32>,
    pub advertise_error: Option<i32>,
    pub enabled: bool,
    pub advertised: Option<String>,
}

#[allow(dead_code)]
impl MockRadio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_enable(code: i32) -> Self {
        Self {
            enable_error: Some(code),
            ..Self::default()
        }
    }
}

pub const LOCAL_ADDRESS: PeerAddress = PeerAddress::new(1, [0x66, 0x55, 0x44, 0x33, 0x22, 0xc1]);

impl RadioPort for MockRadio {
    fn enable(&mut self) -> Result<(), RadioError> {
        match self.enable_error {
            Some(code) => Err(RadioError::EnableFailed(code)),
            None => {
                self.enabled = true;
                Ok(())
            }
        }
    }

    fn start_advertising(&mut self, device_name: &str) -> Result<(), RadioError> {
        match self.advertise_error {
            Some(code) => Err(RadioError::AdvertisingFailed(code)),
            None => {
                self.advertised = Some(device_name.to_owned());
                Ok(())
            }
        }
    }

    fn local_identity(&self) -> LocalIdentity {
        LocalIdentity {
            name: name(self.advertised.as_deref().unwrap_or("")),
            address: LOCAL_ADDRESS,
        }
    }
}

// ── Telemetry ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockTelemetry {
    pub updates: Vec<(Quantity, i32)>,
}

#[allow(dead_code)]
impl MockTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(&self, quantity: Quantity) -> Vec<i32> {
        self.updates
            .iter()
            .filter(|(q, _)| *q == quantity)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl TelemetrySink for MockTelemetry {
    fn update_quantity(&mut self, quantity: Quantity, value: i32) {
        self.updates.push((quantity, value));
    }
}

// ── Event sink ────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn telemetry_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Telemetry(_)))
            .count()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
