use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use threadmill::cli::{self, Args};
use threadmill::{init_logging, log_level, Config, BUILD_DATE, VERSION};

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(log_level(args.verbose, args.quiet, &config.logging.level)) {
        eprintln!("{e:#}");
    }
    info!(version = VERSION, build_date = BUILD_DATE, "Starting threadmill");

    match cli::run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Generation failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
