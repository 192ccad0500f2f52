//! Command-line tool for GRF game archives
//!
//! The `grf` binary is a thin wrapper around this library: it parses a
//! [`CliConfig`], installs logging and hands off to [`run`].
//!
//! ```text
//! grf -a data.grf info
//! grf -a data.grf list sprite --long
//! grf -a data.grf extract data/clientinfo.xml -o out
//! grf -a data.grf cat data/clientinfo.xml
//! ```

#![warn(missing_docs)]

pub mod commands;
pub mod config;

pub use commands::{archive_path, execute, output_path, run};
pub use config::{CliConfig, Command, SourceKind};
