//! CLI error type.

use std::fmt;

use geocam::config::ConfigError;
use geocam::coord::{TextParseError, ValidationError};
use geocam::logging::LoggingError;
use geocam::GeoError;

/// Errors surfaced to the user by the `geocam` binary.
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    Config(String),
    /// Logging could not be initialized
    Logging(String),
    /// A coordinate argument was rejected
    InvalidCoordinate(String),
    /// A replay script could not be read or decoded
    Replay(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Logging(msg) => write!(f, "Logging error: {}", msg),
            CliError::InvalidCoordinate(msg) => write!(f, "Invalid coordinate: {}", msg),
            CliError::Replay(msg) => write!(f, "Replay failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e.to_string())
    }
}

impl From<TextParseError> for CliError {
    fn from(e: TextParseError) -> Self {
        CliError::InvalidCoordinate(e.to_string())
    }
}

impl From<ValidationError> for CliError {
    fn from(e: ValidationError) -> Self {
        CliError::InvalidCoordinate(e.to_string())
    }
}

impl From<GeoError> for CliError {
    fn from(e: GeoError) -> Self {
        CliError::InvalidCoordinate(e.to_string())
    }
}
