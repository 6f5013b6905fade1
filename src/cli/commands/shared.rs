//! Shared components for CLI commands
//!
//! This module contains logging setup, configuration loading and progress
//! helpers used by the command implementations.

use crate::Result;
use crate::cli::args::ProcessArgs;
use crate::config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info};

/// Set up structured logging for the process command
///
/// `RUST_LOG` takes precedence over the verbosity flags. A subscriber that is
/// already installed is left in place.
pub fn setup_logging(args: &ProcessArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("osm_processor={}", log_level)));

    let installed = if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    match installed {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        Err(e) => debug!("Keeping existing logger: {}", e),
    }

    Ok(())
}

/// Load configuration from the optional file, then apply CLI overrides
pub fn load_configuration(args: &ProcessArgs) -> Result<Config> {
    let mut config = match &args.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            Config::from_file(path)?
        }
        None => {
            info!("No config file given, using defaults");
            Config::default()
        }
    };

    apply_cli_overrides(&mut config, args);

    // Final validation
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &ProcessArgs) {
    if args.no_address_extraction {
        config.extraction.enabled = false;
    }
    if args.no_tagging {
        config.tagging.enabled = false;
    }
    if let Some(delimiter) = args.delimiter {
        config.extraction.house_number_delimiter = delimiter;
    }
}

/// Create a spinner reporting record throughput on stderr
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg} [{per_sec}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
