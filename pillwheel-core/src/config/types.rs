//! Configuration type definitions
//!
//! These types represent the tunable machine parameters. The runtime
//! deserializes them from its TOML file; every field has a default so a
//! partial file is valid.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum alarm label length
pub const MAX_LABEL_LEN: usize = 32;

/// Default half-period of a rotation step pulse (microseconds)
pub const DEFAULT_STEP_HALF_PERIOD_US: u32 = 2_000;

/// Default alert flash toggle interval (milliseconds)
pub const DEFAULT_FLASH_INTERVAL_MS: u32 = 700;

/// Default snooze delay (minutes)
pub const DEFAULT_SNOOZE_MINUTES: u16 = 5;

/// Default scheduler tick (milliseconds)
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 1_000;

/// Pulse timing for planned rotation and jog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotorTiming {
    /// Step line high time during rotation (µs)
    pub step_high_us: u32,
    /// Step line low time during rotation (µs)
    pub step_low_us: u32,
    /// Step line high time while jogging (µs)
    pub jog_high_us: u32,
    /// Step line low time while jogging (µs)
    pub jog_low_us: u32,
}

impl Default for MotorTiming {
    fn default() -> Self {
        Self {
            step_high_us: DEFAULT_STEP_HALF_PERIOD_US,
            step_low_us: DEFAULT_STEP_HALF_PERIOD_US,
            jog_high_us: DEFAULT_STEP_HALF_PERIOD_US,
            jog_low_us: DEFAULT_STEP_HALF_PERIOD_US,
        }
    }
}

impl MotorTiming {
    /// Duration of one rotation pulse (µs)
    pub fn step_period_us(&self) -> u32 {
        self.step_high_us.saturating_add(self.step_low_us)
    }
}

/// Alarm presentation and scheduling timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AlarmTiming {
    /// LED flash toggle interval while firing (ms)
    pub flash_interval_ms: u32,
    /// Snooze delay used when the caller gives none (minutes)
    pub snooze_minutes: u16,
    /// Scheduler tick period (ms), at most one second
    pub tick_interval_ms: u32,
}

impl Default for AlarmTiming {
    fn default() -> Self {
        Self {
            flash_interval_ms: DEFAULT_FLASH_INTERVAL_MS,
            snooze_minutes: DEFAULT_SNOOZE_MINUTES,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl AlarmTiming {
    /// Tick period clamped to the once-per-second floor
    pub fn effective_tick_ms(&self) -> u32 {
        self.tick_interval_ms.clamp(1, DEFAULT_TICK_INTERVAL_MS)
    }
}
