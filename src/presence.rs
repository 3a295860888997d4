//! Which peripherals bound at boot.
//!
//! Fixed for the lifetime of a run. The sensor is a hard dependency (its
//! absence halts the node before anything is armed); the display is
//! optional and its absence turns every display operation into a no-op.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceFlags {
    sensor: bool,
    display: bool,
}

impl PresenceFlags {
    pub const fn new(sensor: bool, display: bool) -> Self {
        Self { sensor, display }
    }

    pub const fn sensor(&self) -> bool {
        self.sensor
    }

    pub const fn display(&self) -> bool {
        self.display
    }

    /// The node may run its pipeline at all.
    pub const fn can_run(&self) -> bool {
        self.sensor
    }
}
