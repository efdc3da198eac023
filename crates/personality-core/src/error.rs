//! Core error types for personality-core.
//!
//! The ordering and scoring functions are total and never return these.
//! Errors only surface at the edges: loading configuration, parsing a
//! stored result, and finishing a test session that is not complete.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for personality-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Not every question has an answer yet
    #[error("Test is incomplete: {answered} of {total} questions answered")]
    IncompleteAnswers { answered: usize, total: usize },

    /// Likert answer outside 1..=5
    #[error("Answer {value} at position {index} is outside the 1-5 scale")]
    AnswerOutOfRange { index: usize, value: i64 },

    /// Profile code not in P01..P16
    #[error("Invalid profile code: '{0}'")]
    InvalidProfileCode(String),

    /// Stored result written by an unknown schema version
    #[error("Unsupported result version: '{0}'")]
    UnsupportedVersion(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
