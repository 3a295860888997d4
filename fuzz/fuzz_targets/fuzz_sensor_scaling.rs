//! Fuzz target: raw sensor values through the whole update cycle.
//!
//! Interprets the input as a sequence of `(major, minor)` triples and
//! drives each through scaling, dew point, ESS encoding and the chart
//! history. Nothing may panic on any driver value, including overflow,
//! NaN-producing and out-of-range inputs.
//!
//! cargo fuzz run fuzz_sensor_scaling

#![no_main]

use libfuzzer_sys::fuzz_target;

use ess_demo::adapters::ess::{MAX_VALUE_LEN, encode};
use ess_demo::chart::ChartModel;
use ess_demo::config::ChartConfig;
use ess_demo::sensors::Quantity;
use ess_demo::sensors::dew_point::dew_point;
use ess_demo::sensors::sample::{SensorSample, SensorValue};

fn read_value(chunk: &[u8]) -> SensorValue {
    let major = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    let minor = i32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);
    SensorValue::new(major, minor)
}

fuzz_target!(|data: &[u8]| {
    let mut chart = ChartModel::new(ChartConfig::default());

    for record in data.chunks_exact(24) {
        let sample = SensorSample {
            temperature: read_value(&record[0..8]),
            humidity: read_value(&record[8..16]),
            pressure: read_value(&record[16..24]),
        };

        let t = sample.temperature_c();
        let h = sample.humidity_pct();
        let p = sample.pressure_pa();
        let dew = dew_point(t, h);
        if h <= 0.0 {
            assert!(dew.is_err(), "non-positive humidity must be rejected");
        }

        for (q, v) in [
            (Quantity::Temperature, i32::from(sample.temperature_centi())),
            (Quantity::Humidity, i32::from(sample.humidity_centi())),
            (Quantity::Pressure, sample.pressure_deci_pa()),
        ] {
            assert!(encode(q, v).len() <= MAX_VALUE_LEN);
        }

        let point = chart.point(t, h, p, dew.ok());
        chart.record(&point);
        for q in Quantity::ALL {
            let hist = chart.history(q);
            assert_eq!(hist.recent().len(), hist.filled_count());
            assert!(hist.filled_count() <= 7);
        }
    }
});
