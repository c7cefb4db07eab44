//! Configuration file handling for threadmill
//!
//! Supports JSON and TOML files. Without an explicit path, the file is looked
//! up in the platform configuration directory.
//!
//! Configuration is organized into sections:
//! - Machining options (plane heights, lead arcs, feed handling)
//! - Controller dialect (program tokens, precision, arc output)
//! - Logging

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use threadmill_camtools::arc_expander::MIN_SEGMENTS_PER_REVOLUTION;
use threadmill_camtools::{Dialect, ThreadMillOptions};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Directory name under the platform configuration directory
pub const CONFIG_DIR_NAME: &str = "threadmill";

/// File name of the default configuration
pub const CONFIG_FILE_NAME: &str = "config.toml";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Logging preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Complete threadmill configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Machining options
    pub machining: ThreadMillOptions,
    /// Output dialect
    pub dialect: Dialect,
    /// Logging preferences
    pub logging: LoggingSettings,
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("none").to_string(),
            )),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Load from `path` if given, else from the default location if a file
    /// exists there, else return defaults.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match default_config_path() {
            Ok(path) if path.is_file() => Self::load_from_file(&path),
            _ => {
                debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        self.machining.validate()?;

        let d = &self.dialect;
        for (key, value) in [
            ("dialect.coordinate_decimals", d.coordinate_decimals),
            ("dialect.feed_decimals", d.feed_decimals),
        ] {
            if !(1..=Dialect::MAX_DECIMALS).contains(&value) {
                return Err(ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        if d.segments_per_revolution < MIN_SEGMENTS_PER_REVOLUTION {
            return Err(ConfigError::ValueOutOfRange {
                key: "dialect.segments_per_revolution".to_string(),
                value: d.segments_per_revolution.to_string(),
            });
        }

        if d.line_numbers && d.line_number_increment == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "dialect.line_number_increment".to_string(),
                value: "0".to_string(),
            });
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValueOutOfRange {
                key: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }

        Ok(())
    }
}

/// Default configuration file location in the platform config directory
pub fn default_config_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| {
            SettingsError::ConfigDirectory("platform config directory not found".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.dialect.program_number, 1000);
    }

    #[test]
    fn test_decimals_out_of_range() {
        let mut config = Config::default();
        config.dialect.coordinate_decimals = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange { ref key, .. }) if key == "dialect.coordinate_decimals"
        ));

        let mut config = Config::default();
        config.dialect.feed_decimals = 7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_machining_options_checked() {
        let mut config = Config::default();
        config.machining.retract_height = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Machining(_))
        ));
    }

    #[test]
    fn test_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.toml")).unwrap(), Format::Toml);
        assert!(Format::from_path(Path::new("a.yaml")).is_err());
        assert!(Format::from_path(Path::new("config")).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [machining]
            spring_passes = 1

            [dialect]
            program_number = 2000
            line_numbers = true
            "#,
        )
        .unwrap();
        assert_eq!(config.machining.spring_passes, 1);
        assert_eq!(config.machining.clearance_height, 0.25);
        assert_eq!(config.dialect.program_number, 2000);
        assert_eq!(config.dialect.arc_clockwise, "G2");
        assert_eq!(config.logging, LoggingSettings::default());
    }

    #[test]
    fn test_default_path_location() {
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with("threadmill/config.toml"));
        }
    }
}
