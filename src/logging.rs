//! Structured logging initialization for wattshell.
//!
//! Log output goes to stderr so it never interleaves with prompt and
//! command output on stdout. The active level filter is kept behind a
//! reload handle so the `log <level>` shell command can change verbosity
//! at runtime.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;

use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    reload,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::error::{Result, WshError};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

static FILTER: OnceLock<FilterHandle> = OnceLock::new();

/// Initialize the tracing subscriber with the given initial level.
///
/// # Environment Variables
///
/// * `RUST_LOG` - Override the initial filter (e.g. "wsh=debug,reqwest=warn")
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or(parse_filter(level)?);
    let (filter, handle) = reload::Layer::new(filter);

    if io::stderr().is_terminal() {
        // Pretty output for interactive terminals
        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_writer(io::stderr);
        tracing_subscriber::registry().with(filter).with(fmt_layer).init();
    } else {
        // Compact output for non-TTY (piped, redirected)
        let fmt_layer = fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .compact()
            .with_writer(io::stderr);
        tracing_subscriber::registry().with(filter).with(fmt_layer).init();
    }

    let _ = FILTER.set(handle);
    Ok(())
}

/// Change the active log verbosity at runtime.
///
/// Validates the level name even when no subscriber was installed
/// (unit tests), so the error contract is uniform.
pub fn set_level(level: &str) -> Result<()> {
    let filter = parse_filter(level)?;
    if let Some(handle) = FILTER.get() {
        handle
            .reload(filter)
            .map_err(|e| WshError::Other(format!("failed to reload log filter: {e}")))?;
    }
    Ok(())
}

fn parse_filter(level: &str) -> Result<EnvFilter> {
    let level: tracing::Level = level
        .parse()
        .map_err(|_| WshError::LogLevel(level.to_string()))?;
    Ok(EnvFilter::new(level.to_string().to_lowercase()))
}
