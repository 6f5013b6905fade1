//! Command-line argument definitions for the OSM processor
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Path value standing for stdin or stdout
pub const STDIO_PATH: &str = "-";

/// CLI arguments for the OSM document processor
///
/// Turns newline-delimited raw OSM records into canonical geodata documents
/// and splits standalone address documents off them.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "osm-processor",
    version,
    about = "Build geodata documents and address documents from raw OSM records",
    long_about = "Reads newline-delimited JSON records produced by an OSM extract, builds a \
                  validated document for each one, applies its name and address tags, and \
                  splits multi-unit addresses into standalone address documents. Malformed \
                  records are logged and skipped without stopping the run."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the OSM processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process raw records into documents (main command)
    Process(ProcessArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Newline-delimited JSON input, one raw record per line
    ///
    /// Use `-` to read from stdin.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        default_value = STDIO_PATH,
        help = "Input file of raw records (- for stdin)"
    )]
    pub input_path: PathBuf,

    /// Destination for newline-delimited JSON documents
    ///
    /// Use `-` to write to stdout. An existing file is overwritten.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = STDIO_PATH,
        help = "Output file for documents (- for stdout)"
    )]
    pub output_path: PathBuf,

    /// Path to configuration file
    ///
    /// JSON file with `document`, `tagging` and `extraction` sections. Flags
    /// given on the command line override values from the file.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Forward constructed documents without splitting addresses off them
    #[arg(
        long = "no-address-extraction",
        help = "Disable address extraction"
    )]
    pub no_address_extraction: bool,

    /// Ignore the name and address tags of raw records
    #[arg(long = "no-tagging", help = "Do not apply name and address tags")]
    pub no_tagging: bool,

    /// Separator between house numbers of multi-unit addresses
    #[arg(
        long = "delimiter",
        value_name = "CHAR",
        help = "House number delimiter (default ';')"
    )]
    pub delimiter: Option<char>,

    /// Perform a dry run without writing documents
    ///
    /// Every record is still processed so the summary reflects what a real
    /// run would produce.
    #[arg(
        long = "dry-run",
        help = "Process records without writing any output"
    )]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings and hides the spinner.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Format of the run summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Format of the processing summary"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for the processing summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Result<Commands> {
        self.command
            .clone()
            .ok_or_else(|| Error::configuration("No command specified"))
    }
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.reads_stdin() {
            if !self.input_path.exists() {
                return Err(Error::configuration(format!(
                    "Input file does not exist: {}",
                    self.input_path.display()
                )));
            }

            if !self.input_path.is_file() {
                return Err(Error::configuration(format!(
                    "Input path is not a file: {}",
                    self.input_path.display()
                )));
            }
        }

        if !self.writes_stdout() {
            if let Some(parent) = self.output_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(Error::configuration(format!(
                        "Output directory does not exist: {}",
                        parent.display()
                    )));
                }
            }

            if !self.reads_stdin() && self.output_path == self.input_path {
                return Err(Error::configuration(
                    "Output file must differ from the input file",
                ));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    pub fn reads_stdin(&self) -> bool {
        is_stdio(&self.input_path)
    }

    pub fn writes_stdout(&self) -> bool {
        is_stdio(&self.output_path)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show the progress spinner (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}

impl Default for ProcessArgs {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(STDIO_PATH),
            output_path: PathBuf::from(STDIO_PATH),
            config_file: None,
            no_address_extraction: false,
            no_tagging: false,
            delimiter: None,
            dry_run: false,
            verbose: 0,
            quiet: false,
            output_format: OutputFormat::Human,
        }
    }
}
