//! Error types for wattshell operations.

use thiserror::Error;

/// Primary error type for shell and generator operations.
#[derive(Error, Debug)]
pub enum WshError {
    // Generator errors
    #[error("Failed to fetch schema from '{url}': {reason}")]
    Fetch { url: String, reason: String },

    #[error("Schema parse error: {0}")]
    Parse(String),

    // Session errors
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Not connected to a device")]
    NotConnected,

    #[error("Property error: {0}")]
    Property(String),

    #[error("Unknown property alias: {alias}")]
    UnknownAlias { alias: String },

    // Shell errors
    #[error("Could not find command: {0}")]
    CommandNotFound(String),

    #[error("Input stream failed: {0}")]
    InputStream(String),

    #[error("Invalid log level: {0}")]
    LogLevel(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Other(String),
}

impl WshError {
    /// Returns true if the error ends the process rather than the
    /// current dispatch cycle.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InputStream(_))
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Connection(_) | Self::NotConnected => {
                Some("Check WATTSHELL_HOST and run: connect")
            }
            Self::UnknownAlias { .. } => Some("Run: properties"),
            Self::LogLevel(_) => Some("Use one of: trace, debug, info, warn, error"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using WshError.
pub type Result<T> = std::result::Result<T, WshError>;
