//! Configuration loading and parsing
//!
//! Loads configuration from a TOML file or the embedded defaults and
//! validates it into the typed values the tasks run with.

pub mod loader;
pub mod toml;

pub use loader::{load_config, EMBEDDED_CONFIG};
pub use toml::{parse_config, Backend, Config, ConfigError, HardwareConfig};
