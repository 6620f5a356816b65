//! Tracing subscriber setup.
//!
//! The terminal UI owns stdout and stderr, so logs are appended to
//! `quicklearn.log` in the data directory instead.
//!
//! Filter priority, highest first: `QUICKLEARN_LOG`, `RUST_LOG`, then
//! `--verbose` (debug) or the default `warn`.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_FILE: &str = "quicklearn.log";
const LOG_ENV: &str = "QUICKLEARN_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Normal,
    Verbose,
}

impl Verbosity {
    pub const fn from_flag(verbose: bool) -> Self {
        if verbose { Self::Verbose } else { Self::Normal }
    }

    pub const fn default_level(self) -> Level {
        match self {
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Install the global subscriber, writing to `<log_dir>/quicklearn.log`.
pub fn init_subscriber(log_dir: &Path, verbosity: Verbosity) -> Result<()> {
    fs::create_dir_all(log_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE))?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    // an unparseable QUICKLEARN_LOG falls through to RUST_LOG
    if let Ok(directives) = std::env::var(LOG_ENV)
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = verbosity.default_level();
    let directive = match verbosity {
        Verbosity::Verbose => format!("{level},quicklearn=debug"),
        Verbosity::Normal => level.to_string(),
    };
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}
