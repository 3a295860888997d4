//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter           | Implements     | Connects to                    |
//! |-------------------|----------------|--------------------------------|
//! | `ble`             | RadioPort      | BLE peripheral (simulated)     |
//! | `console_display` | DisplaySink    | Chart screen rendered to log   |
//! | `ess`             | TelemetrySink  | ESS GATT characteristics       |
//! | `log_sink`        | EventSink      | Serial log output              |
//! | `sim`             | DeviceBinder   | Simulated board, BME280        |
//! |                   | SensorDriver   |                                |
//! | `time`            | (none)         | Host monotonic clock           |

pub mod ble;
pub mod console_display;
pub mod ess;
pub mod log_sink;
pub mod sim;
pub mod time;
