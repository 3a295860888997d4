//! Simulated board: a synthetic BME280 and a device table.
//!
//! [`SimBoard`] answers device lookups by name the way a device tree
//! would, handing out each registered device once. [`SimSensor`] produces
//! a slow deterministic drift around indoor conditions so the chart and
//! the dew point have something to show.

use log::debug;

use crate::app::ports::{DeviceBinder, DisplaySink, SensorDriver};
use crate::error::DriverError;
use crate::sensors::sample::{SensorChannel, SensorSample, SensorValue};

use super::console_display::ConsoleDisplay;

// ───────────────────────────────────────────────────────────────
// Synthetic sensor
// ───────────────────────────────────────────────────────────────

/// Samples per full triangle wave.
const WAVE_PERIOD: u32 = 24;

/// Baselines and swings in millionths of the channel unit.
const TEMPERATURE_BASE_U: i64 = 22_500_000;
const TEMPERATURE_SWING_U: i64 = 1_500_000;
const HUMIDITY_BASE_U: i64 = 45_000_000;
const HUMIDITY_SWING_U: i64 = 6_000_000;
/// kPa
const PRESSURE_BASE_U: i64 = 101_325_000;
const PRESSURE_SWING_U: i64 = 400_000;

/// Deterministic stand-in for a BME280.
#[derive(Debug, Clone, Default)]
pub struct SimSensor {
    step: u32,
    fetched: bool,
    current: SensorSample,
    /// Fail every Nth fetch (1-based); `None` never fails.
    fail_every: Option<u32>,
}

impl SimSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `n`th `sample_fetch` fail.
    pub fn with_fetch_failures(mut self, n: u32) -> Self {
        self.fail_every = (n > 0).then_some(n);
        self
    }

    /// Fetches attempted so far.
    pub fn steps(&self) -> u32 {
        self.step
    }

    /// The sample produced by the last successful fetch.
    pub fn current(&self) -> SensorSample {
        self.current
    }
}

/// Triangle wave in `[-1000, 1000]` over `WAVE_PERIOD` steps.
fn wave_permille(step: u32) -> i64 {
    let half = WAVE_PERIOD / 2;
    let phase = step % WAVE_PERIOD;
    let rising = if phase < half { phase } else { WAVE_PERIOD - phase };
    i64::from(rising) * 2000 / i64::from(half) - 1000
}

/// Split a value in millionths into a `(major, minor)` pair with
/// matching signs.
fn split_micro(micro: i64) -> SensorValue {
    SensorValue::new((micro / 1_000_000) as i32, (micro % 1_000_000) as i32)
}

impl SensorDriver for SimSensor {
    fn sample_fetch(&mut self) -> Result<(), DriverError> {
        self.step = self.step.wrapping_add(1);
        if let Some(n) = self.fail_every {
            if self.step % n == 0 {
                return Err(DriverError::FetchFailed);
            }
        }

        let w = wave_permille(self.step);
        self.current = SensorSample {
            temperature: split_micro(TEMPERATURE_BASE_U + TEMPERATURE_SWING_U * w / 1000),
            // Humidity moves against temperature.
            humidity: split_micro(HUMIDITY_BASE_U - HUMIDITY_SWING_U * w / 1000),
            pressure: split_micro(PRESSURE_BASE_U + PRESSURE_SWING_U * w / 1000),
        };
        self.fetched = true;
        debug!("BME280(sim): step {} -> {:?}", self.step, self.current);
        Ok(())
    }

    fn channel_get(&mut self, channel: SensorChannel) -> Result<SensorValue, DriverError> {
        if !self.fetched {
            return Err(DriverError::FetchFailed);
        }
        Ok(match channel {
            SensorChannel::AmbientTemperature => self.current.temperature,
            SensorChannel::Pressure => self.current.pressure,
            SensorChannel::Humidity => self.current.humidity,
        })
    }
}

// ───────────────────────────────────────────────────────────────
// Device table
// ───────────────────────────────────────────────────────────────

/// A registered device and the name it answers to.
struct Slot<T> {
    name: heapless::String<32>,
    device: Option<T>,
}

impl<T> Slot<T> {
    fn take(&mut self, name: &str) -> Option<T> {
        if self.name.as_str() == name {
            self.device.take()
        } else {
            None
        }
    }
}

/// Device table for the simulated board.
///
/// Generic over the display so tests can plug in a recording fake.
pub struct SimBoard<D = ConsoleDisplay> {
    sensor: Option<Slot<SimSensor>>,
    display: Option<Slot<D>>,
}

impl<D> Default for SimBoard<D> {
    fn default() -> Self {
        Self {
            sensor: None,
            display: None,
        }
    }
}

impl<D: DisplaySink> SimBoard<D> {
    /// A board with nothing attached.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_sensor(mut self, name: &str, sensor: SimSensor) -> Self {
        self.sensor = Some(Slot {
            name: crate::config::name(name),
            device: Some(sensor),
        });
        self
    }

    pub fn with_display(mut self, name: &str, display: D) -> Self {
        self.display = Some(Slot {
            name: crate::config::name(name),
            device: Some(display),
        });
        self
    }
}

impl<D: DisplaySink> DeviceBinder for SimBoard<D> {
    type Sensor = SimSensor;
    type Display = D;

    fn bind_sensor(&mut self, name: &str) -> Option<SimSensor> {
        self.sensor.as_mut().and_then(|s| s.take(name))
    }

    fn bind_display(&mut self, name: &str) -> Option<D> {
        self.display.as_mut().and_then(|s| s.take(name))
    }
}
