//! Command line interface
//!
//! Every dimension flag accepts decimal or fractional inches (`0.4375`,
//! `7/16`, `"1 1/4"`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use threadmill_camtools::{ThreadMillGenerator, ThreadMillParameters};
use threadmill_core::units::parse_inches;
use threadmill_core::{ThreadSpec, ToolSpec};
use threadmill_settings::Config;
use tracing::debug;

/// Output representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Controller subprogram text
    Gcode,
    /// The planned program as JSON
    Json,
}

/// Generate a CNC subprogram that mills an internal thread.
///
/// The subprogram is written in incremental mode; call it with the spindle
/// positioned over the hole center.
#[derive(Parser, Debug)]
#[command(name = "threadmill")]
#[command(author, version, about, long_about = None)]
#[command(args_override_self = true)]
pub struct Args {
    /// Major diameter of the thread
    #[arg(long, value_parser = parse_inches)]
    pub major: f64,

    /// Minor diameter of the thread (tapped hole size)
    #[arg(long, value_parser = parse_inches)]
    pub minor: f64,

    /// Radial thread depth [default: (major - minor) / 2]
    #[arg(long, value_parser = parse_inches)]
    pub depth: Option<f64>,

    /// Z of the top of the thread
    #[arg(long, value_parser = parse_inches, default_value = "0", allow_hyphen_values = true)]
    pub start_z: f64,

    /// Threads per inch
    #[arg(long)]
    pub tpi: f64,

    /// Axial length of the thread [default: thread depth]
    #[arg(long, value_parser = parse_inches)]
    pub length: Option<f64>,

    /// Number of radial passes (1-4)
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub passes: i64,

    /// Cutting diameter of the thread mill
    #[arg(long, value_parser = parse_inches)]
    pub tool_diameter: f64,

    /// Number of flutes
    #[arg(long)]
    pub flutes: u32,

    /// Surface speed in feet per minute
    #[arg(long)]
    pub sfm: f64,

    /// Chip load per tooth
    #[arg(long, value_parser = parse_inches)]
    pub fpt: f64,

    /// Repeats of the final pass [default: from config]
    #[arg(long)]
    pub spring_passes: Option<u32>,

    /// Subprogram number [default: from config]
    #[arg(long)]
    pub program_number: Option<u32>,

    /// Path to configuration file (.toml or .json)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Write the program to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Gcode)]
    pub format: OutputFormat,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Engine parameters described by the flags
    pub fn parameters(&self) -> ThreadMillParameters {
        let depth = self
            .depth
            .unwrap_or((self.major - self.minor) / 2.0);
        let mut thread = ThreadSpec::new(self.major, self.minor, depth, self.start_z, self.tpi);
        if let Some(length) = self.length {
            thread = thread.with_length(length);
        }

        ThreadMillParameters {
            thread,
            tool: ToolSpec::new(self.tool_diameter, self.flutes, self.sfm, self.fpt),
            pass_count: self.passes,
        }
    }
}

/// Generator configured from flags, with flags taking precedence over the
/// configuration file
pub fn generator(args: &Args, config: &Config) -> ThreadMillGenerator {
    let mut options = config.machining.clone();
    if let Some(spring_passes) = args.spring_passes {
        options.spring_passes = spring_passes;
    }
    let mut dialect = config.dialect.clone();
    if let Some(number) = args.program_number {
        dialect.program_number = number;
    }

    let params = args.parameters();
    debug!(?params, "Thread mill parameters");
    ThreadMillGenerator::new(params)
        .with_options(options)
        .with_dialect(dialect)
}

/// Produce the requested output text
pub fn render(args: &Args, config: &Config) -> Result<String> {
    let generator = generator(args, config);
    match args.format {
        OutputFormat::Gcode => Ok(generator.generate()?),
        OutputFormat::Json => generator.plan()?.to_json(),
    }
}

/// Generate and write the program to the requested destination
pub fn run(args: &Args, config: &Config) -> Result<()> {
    match (&args.output, args.format) {
        (Some(path), OutputFormat::Gcode) => generator(args, config)
            .generate_to_file(path)
            .with_context(|| format!("Failed to generate {}", path.display()))?,
        (Some(path), OutputFormat::Json) => {
            let text = render(args, config)?;
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        (None, _) => print!("{}", render(args, config)?),
    }
    Ok(())
}
