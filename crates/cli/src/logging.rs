//! Logging setup
//!
//! Logs go to stderr so `--dry-run` and `inspect` output on stdout stays clean.

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "modular=info";
const VERBOSE_FILTER: &str = "modular=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Development: pretty formatting with colors
    Pretty,
    /// Production: JSON structured logging
    Json,
}

/// Install the global subscriber
///
/// `--verbose` wins over `RUST_LOG`; otherwise `RUST_LOG` wins over the default.
pub fn init_logging(verbose: bool, format: LogFormat) -> Result<()> {
    let env_filter = filter(verbose)?;

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("Failed to install tracing subscriber")
}

fn filter(verbose: bool) -> Result<EnvFilter> {
    if verbose {
        return EnvFilter::try_new(VERBOSE_FILTER).context("Failed to create env filter");
    }
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")
}
