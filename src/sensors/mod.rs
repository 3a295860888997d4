//! Sensor subsystem: the cached-reading adapter around the environmental
//! sensor driver, the raw sample encodings and the dew point derivation.
//!
//! The adapter owns the bound driver (if any) and the last fetched
//! [`SensorSample`]. Every accessor succeeds; an absent sensor reads as a
//! steady zero sample.

pub mod dew_point;
pub mod sample;

use log::{debug, error, warn};

use crate::app::ports::{SensorDriver, SensorPort};
use sample::{SensorChannel, SensorSample, SensorValue};

/// The four quantities the node publishes and charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Temperature,
    Humidity,
    Pressure,
    DewPoint,
}

impl Quantity {
    pub const ALL: [Self; 4] = [
        Self::Temperature,
        Self::Humidity,
        Self::Pressure,
        Self::DewPoint,
    ];

    /// Short label matching the chart checkboxes.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temp.",
            Self::Humidity => "Hum.",
            Self::Pressure => "Pres.",
            Self::DewPoint => "Dew",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Wraps an optional sensor driver and caches the latest sample.
pub struct SensorReadingAdapter<S> {
    driver: Option<S>,
    cached: SensorSample,
}

impl<S: SensorDriver> SensorReadingAdapter<S> {
    /// Adopt the result of binding the sensor device.
    ///
    /// `None` marks the sensor absent for the rest of the run.
    pub fn setup(driver: Option<S>, device_name: &str) -> Self {
        if driver.is_none() {
            error!("Error! {} sensor was not found", device_name);
        }
        Self {
            driver,
            cached: SensorSample::ZERO,
        }
    }

    /// Trigger one acquisition and refresh the cache.
    ///
    /// A failed fetch or channel read keeps the previous value for that
    /// channel; the next cycle simply tries again.
    pub fn fetch(&mut self) {
        let Some(driver) = self.driver.as_mut() else {
            return;
        };

        if let Err(e) = driver.sample_fetch() {
            warn!("Sensor fetch failed: {}", e);
            return;
        }

        for channel in SensorChannel::ALL {
            match driver.channel_get(channel) {
                Ok(value) => *slot(&mut self.cached, channel) = value,
                Err(e) => warn!("Sensor channel {:?} read failed: {}", channel, e),
            }
        }

        let s = &self.cached;
        debug!(
            "T: {}.{:02}C, H: {}.{:02}%, P: {}{:03}Pa",
            s.temperature.major,
            s.temperature.minor / 10_000,
            s.humidity.major,
            s.humidity.minor / 10_000,
            s.pressure.major,
            s.pressure.minor / 1_000,
        );
    }

    pub fn is_present(&self) -> bool {
        self.driver.is_some()
    }

    pub fn read_temperature(&self) -> i16 {
        self.cached.temperature_centi()
    }

    pub fn read_humidity(&self) -> i16 {
        self.cached.humidity_centi()
    }

    pub fn read_pressure(&self) -> i32 {
        self.cached.pressure_deci_pa()
    }

    pub fn read_temperature_float(&self) -> f32 {
        self.cached.temperature_c()
    }

    pub fn read_humidity_float(&self) -> f32 {
        self.cached.humidity_pct()
    }

    pub fn read_pressure_float(&self) -> f32 {
        self.cached.pressure_pa()
    }

    /// Borrow the underlying driver (tests, diagnostics).
    pub fn driver(&self) -> Option<&S> {
        self.driver.as_ref()
    }
}

impl<S: SensorDriver> SensorPort for SensorReadingAdapter<S> {
    fn is_present(&self) -> bool {
        SensorReadingAdapter::is_present(self)
    }

    fn fetch(&mut self) {
        SensorReadingAdapter::fetch(self);
    }

    fn sample(&self) -> SensorSample {
        self.cached
    }
}

fn slot(sample: &mut SensorSample, channel: SensorChannel) -> &mut SensorValue {
    match channel {
        SensorChannel::AmbientTemperature => &mut sample.temperature,
        SensorChannel::Pressure => &mut sample.pressure,
        SensorChannel::Humidity => &mut sample.humidity,
    }
}
