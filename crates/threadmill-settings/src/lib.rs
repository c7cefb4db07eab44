//! Threadmill Settings Crate
//!
//! Handles the configuration file: machining options, output dialect and
//! logging preferences.

pub mod config;
pub mod error;

pub use config::{default_config_path, Config, LoggingSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
