//! Configuration types for maildir-extract
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Pattern used when none is given; matches every filename
pub const DEFAULT_PATTERN: &str = ".*";

/// Default output root
pub const DEFAULT_OUTPUT_DIR: &str = "attachments";

/// Extract attachments from Maildir mailboxes
#[derive(Parser, Debug, Clone)]
#[command(
    name = "maildir-extract",
    version,
    about = "Extract email attachments from Maildir mailboxes in parallel",
    long_about = "Walks one or more Maildir stores, including nested sub-folders, and copies\n\
                  every attachment whose filename matches PATTERN into\n\
                  DIRECTORY/<message key>/<filename>.\n\n\
                  Mailboxes are processed in parallel, one worker per CPU core by default.",
    after_help = "EXAMPLES:\n    \
        maildir-extract ~/Maildir\n    \
        maildir-extract -n -v ~/Maildir ~/Archive\n    \
        maildir-extract -p '\\.pdf$' -d pdfs ~/Maildir/.Invoices"
)]
pub struct CliArgs {
    /// Maildir directories to scan
    #[arg(value_name = "TARGET_DIR", required = true, num_args = 1..)]
    pub target_dirs: Vec<PathBuf>,

    /// Perform a trial run with no changes made
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Regex pattern that filenames must contain
    #[arg(short = 'p', long, default_value = DEFAULT_PATTERN, value_name = "REGEX")]
    pub pattern: String,

    /// Where to save attachments
    #[arg(short = 'd', long, default_value = DEFAULT_OUTPUT_DIR, value_name = "PATH")]
    pub directory: PathBuf,

    /// Show verbose output and a final summary
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Number of worker threads
    #[arg(short = 'w', long, default_value_t = default_workers(), value_name = "NUM")]
    pub workers: usize,

    /// Show a live progress spinner
    #[arg(short = 'P', long)]
    pub progress: bool,
}

fn default_workers() -> usize {
    num_cpus::get()
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Mailbox roots, unvalidated; non-directories are dropped at run time
    pub targets: Vec<PathBuf>,

    /// Output root
    pub output_dir: PathBuf,

    /// Compiled filename pattern
    pub pattern: Regex,

    /// Count only, write nothing
    pub dry_run: bool,

    /// Number of worker threads
    pub worker_count: usize,

    /// Verbose logging and final summary
    pub verbose: bool,

    /// Show progress indicator
    pub show_progress: bool,
}

impl ExtractConfig {
    /// Configuration with defaults for everything but the essentials
    pub fn new(targets: Vec<PathBuf>, output_dir: impl Into<PathBuf>, pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            targets,
            output_dir: output_dir.into(),
            pattern: compile_pattern(pattern)?,
            dry_run: false,
            worker_count: default_workers(),
            verbose: false,
            show_progress: false,
        })
    }

    /// Override the worker count
    pub fn with_workers(mut self, count: usize) -> Result<Self, ConfigError> {
        self.worker_count = validate_workers(count)?;
        Ok(self)
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if args.directory.as_os_str().is_empty() {
            return Err(ConfigError::InvalidOutputPath {
                path: args.directory,
                reason: "Output directory must not be empty".to_string(),
            });
        }

        if args.directory.exists() && !args.directory.is_dir() {
            return Err(ConfigError::InvalidOutputPath {
                reason: "Path exists and is not a directory".to_string(),
                path: args.directory,
            });
        }

        Ok(Self {
            targets: args.target_dirs,
            output_dir: args.directory,
            pattern: compile_pattern(&args.pattern)?,
            dry_run: args.dry_run,
            worker_count: validate_workers(args.workers)?,
            verbose: args.verbose,
            show_progress: args.progress,
        })
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn validate_workers(count: usize) -> Result<usize, ConfigError> {
    if count == 0 || count > MAX_WORKERS {
        return Err(ConfigError::InvalidWorkerCount {
            count,
            max: MAX_WORKERS,
        });
    }
    Ok(count)
}
