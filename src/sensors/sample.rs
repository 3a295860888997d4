//! Raw driver values and their two derived encodings.
//!
//! The driver reports each channel as a `(major, minor)` pair where
//! `minor` is in millionths of `major`'s unit (°C, %RH, kPa). The node
//! needs each quantity twice:
//!
//! | Quantity    | Scaled integer        | Float          |
//! |-------------|-----------------------|----------------|
//! | temperature | `i16`, 0.01 °C        | `f32`, °C      |
//! | humidity    | `i16`, 0.01 %RH       | `f32`, %RH     |
//! | pressure    | `i32`, 0.1 Pa         | `f32`, Pa      |
//!
//! The two families are computed by independent formulas and are kept
//! exactly as deployed nodes report them, including the
//! truncation toward zero of integer division and the narrowing to `i16`.

/// Channels read from the environmental sensor each fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorChannel {
    AmbientTemperature,
    Pressure,
    Humidity,
}

impl SensorChannel {
    pub const ALL: [Self; 3] = [Self::AmbientTemperature, Self::Pressure, Self::Humidity];
}

/// One channel value as reported by the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorValue {
    /// Integer part.
    pub major: i32,
    /// Fractional part in millionths.
    pub minor: i32,
}

impl SensorValue {
    pub const ZERO: Self = Self { major: 0, minor: 0 };

    pub const fn new(major: i32, minor: i32) -> Self {
        Self { major, minor }
    }
}

const TEMPERATURE_MAJOR_MULTIPLIER: i32 = 100;
const TEMPERATURE_MINOR_DIVIDER: i32 = 10_000;
const HUMIDITY_MAJOR_MULTIPLIER: i32 = 100;
const HUMIDITY_MINOR_DIVIDER: i32 = 10_000;
const PRESSURE_MAJOR_MULTIPLIER: i32 = 10_000;
const PRESSURE_MINOR_DIVIDER: i32 = 100;

const FLOAT_TEMPERATURE_DIVIDER: f32 = 1_000_000.0;
const FLOAT_HUMIDITY_DIVIDER: f32 = 1_000_000.0;
const FLOAT_PRESSURE_DIVIDER: f32 = 1_000.0;
const FLOAT_PRESSURE_MULTIPLIER: f32 = 1_000.0;

/// The cached result of one fetch cycle.
///
/// Zeroed until the first successful fetch; an absent sensor leaves it
/// zeroed forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorSample {
    pub temperature: SensorValue,
    pub pressure: SensorValue,
    pub humidity: SensorValue,
}

impl SensorSample {
    pub const ZERO: Self = Self {
        temperature: SensorValue::ZERO,
        pressure: SensorValue::ZERO,
        humidity: SensorValue::ZERO,
    };

    /// Temperature in hundredths of a degree Celsius.
    pub fn temperature_centi(&self) -> i16 {
        scale_int(
            self.temperature,
            TEMPERATURE_MAJOR_MULTIPLIER,
            TEMPERATURE_MINOR_DIVIDER,
        ) as i16
    }

    /// Relative humidity in hundredths of a percent.
    pub fn humidity_centi(&self) -> i16 {
        scale_int(self.humidity, HUMIDITY_MAJOR_MULTIPLIER, HUMIDITY_MINOR_DIVIDER) as i16
    }

    /// Pressure in tenths of a pascal.
    pub fn pressure_deci_pa(&self) -> i32 {
        scale_int(self.pressure, PRESSURE_MAJOR_MULTIPLIER, PRESSURE_MINOR_DIVIDER)
    }

    /// Temperature in degrees Celsius.
    pub fn temperature_c(&self) -> f32 {
        self.temperature.minor as f32 / FLOAT_TEMPERATURE_DIVIDER + self.temperature.major as f32
    }

    /// Relative humidity in percent.
    pub fn humidity_pct(&self) -> f32 {
        self.humidity.minor as f32 / FLOAT_HUMIDITY_DIVIDER + self.humidity.major as f32
    }

    /// Pressure in pascals.
    pub fn pressure_pa(&self) -> f32 {
        self.pressure.minor as f32 / FLOAT_PRESSURE_DIVIDER
            + self.pressure.major as f32 * FLOAT_PRESSURE_MULTIPLIER
    }
}

/// `major * multiplier + minor / divider` in wrapping 32-bit arithmetic.
fn scale_int(value: SensorValue, multiplier: i32, divider: i32) -> i32 {
    value
        .major
        .wrapping_mul(multiplier)
        .wrapping_add(value.minor / divider)
}
