//! GRF archive tool binary entry point.
//!
//! Parses command-line arguments, initializes logging and runs the selected
//! command. For library usage, see the grf-cli crate documentation.

use anyhow::Result;
use grf_cli::CliConfig;
use std::io;

fn main() -> Result<()> {
    let config = CliConfig::from_args();

    // RUST_LOG takes precedence over -v
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_filter())),
        )
        .init();

    tracing::debug!("Configuration loaded: {:?}", config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    grf_cli::run(&config, &mut out)
}
