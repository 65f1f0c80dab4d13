//! Configuration source selection
//!
//! Reads the file given on the command line, or falls back to the
//! defaults compiled into the binary.

use std::path::Path;

use log::info;

use super::toml::{parse_config, Config, ConfigError};

/// Embedded default configuration (compiled into the binary)
/// Edit pillwheel.toml and rebuild to change the defaults
pub const EMBEDDED_CONFIG: &str = include_str!("../../pillwheel.toml");

/// Load configuration from `path`, or the embedded defaults when `None`
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.kind()))?;
            parse_config(&text)
        }
        None => {
            info!("Using embedded default configuration");
            parse_config(EMBEDDED_CONFIG)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Backend;

    #[test]
    fn test_embedded_config_is_valid() {
        let config = load_config(None).unwrap();
        assert_eq!(config.step_table.steps_per_revolution(), 200);
        assert_eq!(config.hardware.backend, Backend::Gpio);
        assert_eq!(config.hardware.buzzer, Some((15, false)));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("pillwheel-does-not-exist.toml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Io(std::io::ErrorKind::NotFound)));
    }

    #[test]
    fn test_file_overrides_embedded() {
        let path = std::env::temp_dir().join(format!("pillwheel-{}.toml", std::process::id()));
        std::fs::write(&path, "[hardware]\nbackend = \"simulation\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.hardware.backend, Backend::Simulation);

        let _ = std::fs::remove_file(&path);
    }
}
