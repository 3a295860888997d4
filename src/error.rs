//! Unified error types for the ESS demo node.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! boot path's error handling uniform. All variants are `Copy` so they can
//! be carried inside events and boot results without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Boot could not complete; the node sits in its error display state.
    Init(InitError),
    /// The sensor driver reported a failure.
    Driver(DriverError),
    /// The wireless stack reported a failure.
    Radio(RadioError),
    /// A derived value could not be computed from the inputs.
    DewPoint(DewPointError),
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Driver(e) => write!(f, "driver: {e}"),
            Self::Radio(e) => write!(f, "radio: {e}"),
            Self::DewPoint(e) => write!(f, "dew point: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Boot failures
// ---------------------------------------------------------------------------

/// Terminal boot failures. Each one leaves the node in the error display
/// state with no radio activity and no timers armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// The environmental sensor did not bind.
    SensorNotDetected,
    /// The wireless stack refused to start.
    RadioInitFailed(RadioError),
}

impl InitError {
    /// Short message rendered on the display under the error banner.
    pub const fn display_message(self) -> &'static str {
        match self {
            Self::SensorNotDetected => "Sensor not detected",
            Self::RadioInitFailed(_) => "Bluetooth init failed",
        }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SensorNotDetected => write!(f, "sensor not detected"),
            Self::RadioInitFailed(e) => write!(f, "radio init failed ({e})"),
        }
    }
}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor driver errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The acquisition request was rejected or timed out.
    FetchFailed,
    /// The driver does not provide the requested channel.
    ChannelUnsupported,
    /// The bus transaction failed.
    Bus,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed => write!(f, "sample fetch failed"),
            Self::ChannelUnsupported => write!(f, "channel unsupported"),
            Self::Bus => write!(f, "bus error"),
        }
    }
}

impl From<DriverError> for Error {
    fn from(e: DriverError) -> Self {
        Self::Driver(e)
    }
}

// ---------------------------------------------------------------------------
// Radio errors
// ---------------------------------------------------------------------------

/// Wireless stack failure, carrying the stack's own error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    EnableFailed(i32),
    AdvertisingFailed(i32),
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnableFailed(code) => write!(f, "enable failed (err {code})"),
            Self::AdvertisingFailed(code) => write!(f, "advertising failed (err {code})"),
        }
    }
}

impl From<RadioError> for Error {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

// ---------------------------------------------------------------------------
// Dew point domain errors
// ---------------------------------------------------------------------------

/// The Magnus approximation is undefined for these inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DewPointError {
    /// Relative humidity must be strictly positive (log10 domain).
    HumidityOutOfDomain,
    /// An input or the result was NaN or infinite.
    NotFinite,
}

impl fmt::Display for DewPointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HumidityOutOfDomain => write!(f, "humidity must be above 0%"),
            Self::NotFinite => write!(f, "non-finite value"),
        }
    }
}

impl From<DewPointError> for Error {
    fn from(e: DewPointError) -> Self {
        Self::DewPoint(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document could not be parsed.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed config"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
