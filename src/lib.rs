//! # Threadmill
//!
//! Generates callable CNC subprograms that mill internal threads with a
//! single-point thread mill.
//!
//! ## Architecture
//!
//! Threadmill is organized as a workspace with multiple crates:
//!
//! 1. **threadmill-core** - Thread and tool data model, validation errors, inch units
//! 2. **threadmill-camtools** - Geometry, pass planning, speeds/feeds, toolpath, emitter
//! 3. **threadmill-settings** - Configuration file loading and validation
//! 4. **threadmill** - Command line interface that integrates all crates

pub mod cli;

pub use threadmill_camtools::{
    Dialect, Program, ProgramEmitter, ThreadMillGenerator, ThreadMillOptions,
    ThreadMillParameters,
};
pub use threadmill_core::{ThreadMillError, ThreadSpec, ToolSpec};
pub use threadmill_settings::Config;

use tracing::level_filters::LevelFilter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Determines the log level from verbosity flags, falling back to the
/// configured level.
pub fn log_level(verbose: u8, quiet: bool, config_level: &str) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "off" => LevelFilter::OFF,
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "error" => LevelFilter::ERROR,
            _ => LevelFilter::WARN,
        },
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, keeping stdout free for the program text
/// - RUST_LOG environment variable support
pub fn init_logging(level: LevelFilter) -> anyhow::Result<()> {
    use anyhow::Context;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_flags() {
        assert_eq!(log_level(0, true, "trace"), LevelFilter::ERROR);
        assert_eq!(log_level(1, false, "error"), LevelFilter::INFO);
        assert_eq!(log_level(2, false, "warn"), LevelFilter::DEBUG);
        assert_eq!(log_level(5, false, "warn"), LevelFilter::TRACE);
    }

    #[test]
    fn test_log_level_from_config() {
        assert_eq!(log_level(0, false, "DEBUG"), LevelFilter::DEBUG);
        assert_eq!(log_level(0, false, "off"), LevelFilter::OFF);
        assert_eq!(log_level(0, false, "unknown"), LevelFilter::WARN);
    }

    #[test]
    fn test_build_info() {
        assert!(!VERSION.is_empty());
        assert!(!BUILD_DATE.is_empty());
    }
}
