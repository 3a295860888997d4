//! Dew point from temperature and relative humidity.
//!
//! Magnus-form approximation with the Sonntag constants (b = 17.62,
//! c = 243.12 °C):
//!
//! ```text
//! h   = (log10(RH) - 2) / 0.4343 + (b * T) / (c + T)
//! dew = c * h / (b - h)
//! ```
//!
//! `h` is held in single precision between the two steps, and the result is
//! truncated toward zero.

use crate::error::DewPointError;

const MAGNUS_B: f64 = 17.62;
const MAGNUS_C: f64 = 243.12;
/// log10(e), turns log10(RH/100) into ln(RH/100).
const LOG10_E: f64 = 0.4343;

/// Dew point in whole degrees Celsius.
///
/// `humidity_pct` must be strictly positive. Results outside `i8` saturate.
pub fn dew_point(temperature_c: f32, humidity_pct: f32) -> Result<i8, DewPointError> {
    if !temperature_c.is_finite() || !humidity_pct.is_finite() {
        return Err(DewPointError::NotFinite);
    }
    if humidity_pct <= 0.0 {
        return Err(DewPointError::HumidityOutOfDomain);
    }

    let t = f64::from(temperature_c);
    let h = ((f64::from(humidity_pct).log10() - 2.0) / LOG10_E
        + (MAGNUS_B * t) / (MAGNUS_C + t)) as f32;
    let dew = (MAGNUS_C * f64::from(h) / (MAGNUS_B - f64::from(h))) as f32;

    if !dew.is_finite() {
        return Err(DewPointError::NotFinite);
    }
    Ok(dew as i8)
}
