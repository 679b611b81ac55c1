//! # Price Check Errors
//!
//! Everything that can stop a quote before the resolver runs. The resolver
//! itself never fails.

use farmacia_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for the price-check app.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // =========================================================================
    // Arguments
    // =========================================================================
    /// A required flag was not given.
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    /// A flag value could not be parsed.
    #[error("Invalid value for {flag}: {reason}")]
    InvalidArgument { flag: String, reason: String },

    /// An unrecognized flag.
    #[error("Unknown argument: {0}. Run with --help for usage.")]
    UnknownArgument(String),

    // =========================================================================
    // Configuration
    // =========================================================================
    /// The config file is not valid TOML for `AppConfig`.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The config parsed but holds unusable values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    // =========================================================================
    // I/O and Encoding
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // =========================================================================
    // Domain
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}
