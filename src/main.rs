use layerpack::cli::{handle_analyze, CliArgs};
use layerpack::util::logging::{init_logging, parse_level, LoggingConfig};
use layerpack::{NAME, VERSION};

use clap::Parser;
use tracing::{debug, warn, Level};

fn main() {
    // `.env` values only fill variables the process does not already have.
    let dotenv = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Could not load .env file: {}", e),
    }

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = handle_analyze(&args);
    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    init_logging(config);
}
