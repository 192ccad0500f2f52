//! Command-line configuration.
//!
//! The archive path can come from `--archive` or the `GRF_ARCHIVE`
//! environment variable; everything else has defaults.
//!
//! # Example
//!
//! ```no_run
//! use grf_cli::CliConfig;
//!
//! let config = CliConfig::from_args();
//! println!("Archive: {}", config.archive.display());
//! ```

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// How the archive file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SourceKind {
    /// Memory-map the whole file
    #[default]
    Mmap,
    /// Seek and read through a shared file handle
    File,
}

/// Top-level configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "grf", about = "Inspect and extract GRF game archives", version)]
pub struct CliConfig {
    /// Path to the GRF archive
    #[arg(short, long, env = "GRF_ARCHIVE")]
    pub archive: PathBuf,

    /// How to read the archive file
    #[arg(long, env = "GRF_SOURCE", value_enum, default_value_t = SourceKind::Mmap)]
    pub source: SourceKind,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Archive operations
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show header fields and entry statistics
    Info,

    /// List entries in sorted order
    List {
        /// Only list entries whose name contains this text (case-insensitive)
        filter: Option<String>,

        /// Show flags and sizes
        #[arg(short, long)]
        long: bool,

        /// Include directory placeholders
        #[arg(short, long)]
        all: bool,
    },

    /// Extract files into a directory
    Extract {
        /// Archive paths to extract; every file when omitted
        paths: Vec<String>,

        /// Destination directory. Entry names are written as raw bytes on
        /// Unix and byte-per-character elsewhere; they are not transcoded
        /// from EUC-KR
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Write one file to stdout
    Cat {
        /// Archive path of the file
        path: String,
    },
}

impl CliConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Default log filter for the requested verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
