//! Error kinds surfaced by the carousel core
//!
//! No error is fatal. Each one is either rejected back to the caller with
//! a typed reason or absorbed by the runtime (simulation fallback,
//! coalesced trigger).

use core::fmt;

use crate::config::StepTableError;

/// Core error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Slot index outside 0..=13; the request had no side effect
    InvalidSlot(u8),
    /// A trigger arrived while an alarm session is already firing
    AlreadyFiring,
    /// Acknowledgment with no alarm firing
    NotFiring,
    /// Pulse or alert output not present on this machine
    HardwareUnavailable,
    /// Jog requested while an alarm is firing
    JogWhileFiring,
    /// Request would displace a higher-priority motion request
    MotorBusy,
    /// Step table failed validation
    InvalidStepTable(StepTableError),
}

impl From<StepTableError> for Error {
    fn from(e: StepTableError) -> Self {
        Error::InvalidStepTable(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSlot(index) => write!(f, "invalid slot {} (expected 0-13)", index),
            Error::AlreadyFiring => write!(f, "alarm already firing"),
            Error::NotFiring => write!(f, "no alarm firing"),
            Error::HardwareUnavailable => write!(f, "hardware unavailable"),
            Error::JogWhileFiring => write!(f, "jog requested while alarm firing"),
            Error::MotorBusy => write!(f, "motor busy with a higher-priority request"),
            Error::InvalidStepTable(e) => write!(f, "invalid step table: {}", e),
        }
    }
}
