//! TOML configuration schema
//!
//! Every section and key is optional; anything missing takes the built-in
//! default. The step table is validated here so an inconsistent table
//! never reaches the planner.

use std::fmt;

use serde::Deserialize;

use pillwheel_core::config::{
    AlarmTiming, MotorTiming, StepTable, StepTableError, DEFAULT_STEP_TABLE, STEPS_PER_REVOLUTION,
};
use pillwheel_hal_linux::parse_pin_string;

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Config file could not be read
    Io(std::io::ErrorKind),
    /// TOML syntax or schema error
    Parse(::toml::de::Error),
    /// Step table failed validation
    StepTable(StepTableError),
    /// Pin string not of the form `gpioN` / `!gpioN`
    InvalidPin(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(kind) => write!(f, "cannot read config: {}", kind),
            ConfigError::Parse(e) => write!(f, "invalid config: {}", e),
            ConfigError::StepTable(e) => write!(f, "invalid step table: {}", e),
            ConfigError::InvalidPin(pin) => write!(f, "invalid pin \"{}\"", pin),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<StepTableError> for ConfigError {
    fn from(e: StepTableError) -> Self {
        ConfigError::StepTable(e)
    }
}

impl From<::toml::de::Error> for ConfigError {
    fn from(e: ::toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Output backend for the stepper and alert lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// sysfs GPIO, falling back to simulation if unavailable
    #[default]
    Gpio,
    /// Never touch hardware
    Simulation,
}

/// `[hardware]` section with pins resolved to `(number, inverted)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareConfig {
    pub backend: Backend,
    pub dir: (u8, bool),
    pub step: (u8, bool),
    pub led: (u8, bool),
    pub buzzer: Option<(u8, bool)>,
    pub motion: Option<(u8, bool)>,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub step_table: StepTable,
    pub motor: MotorTiming,
    pub alarm: AlarmTiming,
    pub hardware: HardwareConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    carousel: RawCarousel,
    motor: MotorTiming,
    alarm: AlarmTiming,
    hardware: RawHardware,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawCarousel {
    steps_per_revolution: u32,
    step_table: Vec<u16>,
}

impl Default for RawCarousel {
    fn default() -> Self {
        Self {
            steps_per_revolution: STEPS_PER_REVOLUTION,
            step_table: DEFAULT_STEP_TABLE.to_vec(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawHardware {
    backend: Backend,
    dir: String,
    step: String,
    led: String,
    buzzer: Option<String>,
    motion: Option<String>,
}

impl Default for RawHardware {
    fn default() -> Self {
        Self {
            backend: Backend::Gpio,
            dir: "gpio21".into(),
            step: "gpio20".into(),
            led: "gpio14".into(),
            buzzer: None,
            motion: Some("gpio4".into()),
        }
    }
}

fn pin(s: &str) -> Result<(u8, bool), ConfigError> {
    parse_pin_string(s).ok_or_else(|| ConfigError::InvalidPin(s.to_string()))
}

/// Parse and validate a TOML configuration
pub fn parse_config(input: &str) -> Result<Config, ConfigError> {
    let raw: RawConfig = ::toml::from_str(input)?;

    let step_table =
        StepTable::from_slice(&raw.carousel.step_table, raw.carousel.steps_per_revolution)?;

    let hardware = HardwareConfig {
        backend: raw.hardware.backend,
        dir: pin(&raw.hardware.dir)?,
        step: pin(&raw.hardware.step)?,
        led: pin(&raw.hardware.led)?,
        buzzer: raw.hardware.buzzer.as_deref().map(pin).transpose()?,
        motion: raw.hardware.motion.as_deref().map(pin).transpose()?,
    };

    Ok(Config {
        step_table,
        motor: raw.motor,
        alarm: raw.alarm,
        hardware,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.step_table, StepTable::default());
        assert_eq!(config.motor, MotorTiming::default());
        assert_eq!(config.alarm.snooze_minutes, 5);
        assert_eq!(config.hardware.backend, Backend::Gpio);
        assert_eq!(config.hardware.dir, (21, false));
        assert_eq!(config.hardware.step, (20, false));
        assert_eq!(config.hardware.motion, Some((4, false)));
    }

    #[test]
    fn test_partial_section() {
        let config = parse_config(
            r#"
            [alarm]
            snooze_minutes = 10

            [hardware]
            backend = "simulation"
            led = "!gpio14"
            "#,
        )
        .unwrap();
        assert_eq!(config.alarm.snooze_minutes, 10);
        assert_eq!(config.alarm.flash_interval_ms, 700);
        assert_eq!(config.hardware.backend, Backend::Simulation);
        assert_eq!(config.hardware.led, (14, true));
    }

    #[test]
    fn test_bad_step_table_sum() {
        let err = parse_config(
            r#"
            [carousel]
            step_table = [15, 14, 14, 15, 15, 14, 14, 14, 14, 14, 15, 15, 14, 14]
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::StepTable(StepTableError::SumMismatch {
                expected: 200,
                actual: 201
            })
        ));
    }

    #[test]
    fn test_bad_step_table_length() {
        let err = parse_config("[carousel]\nstep_table = [100, 100]\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::StepTable(StepTableError::WrongLength { len: 2 })
        ));
    }

    #[test]
    fn test_custom_revolution() {
        let config = parse_config(
            "[carousel]\nsteps_per_revolution = 280\nstep_table = [20,20,20,20,20,20,20,20,20,20,20,20,20,20]\n",
        )
        .unwrap();
        assert_eq!(config.step_table.steps_per_revolution(), 280);
    }

    #[test]
    fn test_invalid_pin() {
        let err = parse_config("[hardware]\nstep = \"pin20\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPin(ref p) if p == "pin20"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = parse_config("[network]\nssid = \"home\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
