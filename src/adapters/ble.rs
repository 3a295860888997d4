//! Simulated BLE peripheral.
//!
//! Implements [`RadioPort`] for host runs and tests: tracks the
//! advertising / connection state of a peripheral that advertises the
//! Environmental Sensing Service, and turns central activity into
//! [`ConnectionEvent`]s for the node.
//!
//! Advertising payload: flags (general discoverable, no BR/EDR), the
//! complete 16-bit service list with `0x181A`, and the device name.

use log::{info, warn};

use super::ess::ESS_SERVICE_UUID;
use crate::app::ports::RadioPort;
use crate::config::name;
use crate::error::RadioError;
use crate::link::{ConnectionEvent, LocalIdentity, PeerAddress};

/// Advertising interval bounds in 0.625 ms units.
pub const ADVERTISING_INTERVAL_MIN: u16 = 320;
pub const ADVERTISING_INTERVAL_MAX: u16 = 800;

/// Random static address type.
pub const ADDR_TYPE_RANDOM: u8 = 1;

// ───────────────────────────────────────────────────────────────
// BLE state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleState {
    Off,
    Enabled,
    Advertising,
    Connected,
}

// ───────────────────────────────────────────────────────────────
// Peripheral
// ───────────────────────────────────────────────────────────────

pub struct BlePeripheral {
    state: BleState,
    address: PeerAddress,
    advertised_name: heapless::String<32>,
    /// Simulation: error code returned by the next `enable`.
    fail_enable: Option<i32>,
    /// Simulation: error code returned by the next `start_advertising`.
    fail_advertising: Option<i32>,
}

impl BlePeripheral {
    pub fn new(address: PeerAddress) -> Self {
        Self {
            state: BleState::Off,
            address,
            advertised_name: heapless::String::new(),
            fail_enable: None,
            fail_advertising: None,
        }
    }

    /// Make `enable` fail with `code`.
    pub fn with_enable_failure(mut self, code: i32) -> Self {
        self.fail_enable = Some(code);
        self
    }

    /// Make `start_advertising` fail with `code`.
    pub fn with_advertising_failure(mut self, code: i32) -> Self {
        self.fail_advertising = Some(code);
        self
    }

    pub fn state(&self) -> BleState {
        self.state
    }

    pub fn advertised_name(&self) -> &str {
        &self.advertised_name
    }

    /// A central connected; advertising stops while connected.
    pub fn on_central_connected(&mut self, peer: PeerAddress) -> ConnectionEvent {
        info!("BLE(sim): central {} connected", peer);
        self.state = BleState::Connected;
        ConnectionEvent::Connected(peer)
    }

    /// The central went away; connectable advertising resumes.
    pub fn on_central_disconnected(&mut self, reason: u8) -> ConnectionEvent {
        info!("BLE(sim): central disconnected (reason 0x{:02x})", reason);
        if self.state == BleState::Connected {
            self.state = BleState::Advertising;
        }
        ConnectionEvent::Disconnected { reason }
    }
}

// ───────────────────────────────────────────────────────────────
// RadioPort implementation
// ───────────────────────────────────────────────────────────────

impl RadioPort for BlePeripheral {
    fn enable(&mut self) -> Result<(), RadioError> {
        if let Some(code) = self.fail_enable {
            warn!("BLE(sim): enable failed (err {})", code);
            return Err(RadioError::EnableFailed(code));
        }
        self.state = BleState::Enabled;
        Ok(())
    }

    fn start_advertising(&mut self, device_name: &str) -> Result<(), RadioError> {
        if let Some(code) = self.fail_advertising {
            return Err(RadioError::AdvertisingFailed(code));
        }
        self.advertised_name = name(device_name);
        self.state = BleState::Advertising;
        info!(
            "BLE(sim): advertising '{}' (service 0x{:04X}, interval {}-{})",
            self.advertised_name, ESS_SERVICE_UUID, ADVERTISING_INTERVAL_MIN, ADVERTISING_INTERVAL_MAX
        );
        Ok(())
    }

    fn local_identity(&self) -> LocalIdentity {
        LocalIdentity {
            name: self.advertised_name.clone(),
            address: self.address,
        }
    }
}
