//! # Error Types Module
//!
//! Errors raised while loading configuration, catalogs, overrides and ranker
//! weights. Parsing, resolution and ranking never fail; they return `None`,
//! an unresolved portion or an empty list instead.

/// Configuration and data-file errors
#[derive(Debug)]
pub enum ConfigError {
    /// A configured file could not be read
    Io(std::io::Error),
    /// A file was read but is not the expected JSON
    Json(serde_json::Error),
    /// A value is out of range or malformed
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "I/O error: {err}"),
            ConfigError::Json(err) => write!(f, "JSON error: {err}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Json(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}
