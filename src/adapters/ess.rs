//! Environmental Sensing Service characteristic store.
//!
//! Implements [`TelemetrySink`] by encoding each scaled value into the
//! little-endian wire format of its ESS characteristic and flagging it for
//! notification.
//!
//! ## GATT Service Layout
//!
//! | Characteristic | UUID     | Format  | Unit      |
//! |----------------|----------|---------|-----------|
//! | Temperature    | `0x2A6E` | sint16  | 0.01 °C   |
//! | Humidity       | `0x2A6F` | uint16  | 0.01 %    |
//! | Pressure       | `0x2A6D` | uint32  | 0.1 Pa    |
//! | Dew Point      | `0x2A7B` | sint8   | 1 °C      |

use log::debug;

use crate::app::ports::TelemetrySink;
use crate::sensors::Quantity;

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

pub const ESS_SERVICE_UUID: u16 = 0x181A;
pub const CHAR_TEMPERATURE: u16 = 0x2A6E;
pub const CHAR_HUMIDITY: u16 = 0x2A6F;
pub const CHAR_PRESSURE: u16 = 0x2A6D;
pub const CHAR_DEW_POINT: u16 = 0x2A7B;

pub const MAX_VALUE_LEN: usize = 4;

/// UUID of the characteristic carrying `quantity`.
pub const fn characteristic_uuid(quantity: Quantity) -> u16 {
    match quantity {
        Quantity::Temperature => CHAR_TEMPERATURE,
        Quantity::Humidity => CHAR_HUMIDITY,
        Quantity::Pressure => CHAR_PRESSURE,
        Quantity::DewPoint => CHAR_DEW_POINT,
    }
}

/// Encode a scaled value in the characteristic's wire format.
///
/// Values are narrowed to the field width with two's-complement
/// wrap-around, as the stack would do with a C cast.
pub fn encode(quantity: Quantity, value: i32) -> heapless::Vec<u8, MAX_VALUE_LEN> {
    let mut out = heapless::Vec::new();
    // Every format is at most MAX_VALUE_LEN bytes.
    let _ = match quantity {
        Quantity::Temperature => out.extend_from_slice(&(value as i16).to_le_bytes()),
        Quantity::Humidity => out.extend_from_slice(&(value as u16).to_le_bytes()),
        Quantity::Pressure => out.extend_from_slice(&(value as u32).to_le_bytes()),
        Quantity::DewPoint => out.extend_from_slice(&(value as i8).to_le_bytes()),
    };
    out
}

// ───────────────────────────────────────────────────────────────
// Characteristic store
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CharacteristicValue {
    value: heapless::Vec<u8, MAX_VALUE_LEN>,
    notify_pending: bool,
}

/// Latest value of each ESS characteristic.
#[derive(Debug, Default)]
pub struct EssCharacteristics {
    values: [CharacteristicValue; 4],
    update_count: u32,
}

impl EssCharacteristics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current encoded value; empty until first update.
    pub fn value(&self, quantity: Quantity) -> &[u8] {
        &self.values[quantity.index()].value
    }

    pub fn is_notify_pending(&self, quantity: Quantity) -> bool {
        self.values[quantity.index()].notify_pending
    }

    /// Hand the value to the stack for notification and clear the flag.
    pub fn take_notification(&mut self, quantity: Quantity) -> Option<heapless::Vec<u8, MAX_VALUE_LEN>> {
        let slot = &mut self.values[quantity.index()];
        if !slot.notify_pending {
            return None;
        }
        slot.notify_pending = false;
        Some(slot.value.clone())
    }

    /// Total characteristic updates since start.
    pub fn update_count(&self) -> u32 {
        self.update_count
    }
}

impl TelemetrySink for EssCharacteristics {
    fn update_quantity(&mut self, quantity: Quantity, value: i32) {
        let slot = &mut self.values[quantity.index()];
        slot.value = encode(quantity, value);
        slot.notify_pending = true;
        self.update_count = self.update_count.wrapping_add(1);
        debug!(
            "ESS: 0x{:04X} <- {} {:02x?}",
            characteristic_uuid(quantity),
            value,
            slot.value.as_slice()
        );
    }
}
