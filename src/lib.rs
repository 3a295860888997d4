//! Environmental Sensing Service demo node.
//!
//! Samples a temperature/humidity/pressure sensor, derives the dew point,
//! publishes all four quantities over BLE and, when a display is
//! attached, plots a rolling history of each. Everything above the
//! adapters is plain logic and runs on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod chart;
pub mod config;
pub mod error;
pub mod events;
pub mod link;
pub mod presence;
pub mod runtime;
pub mod scheduler;
pub mod sensors;
