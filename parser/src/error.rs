//! Error types for configuration and output rendering.
//!
//! Parsing itself never fails; these cover the surrounding I/O and
//! serialization.

use thiserror::Error;

/// Errors raised while loading configuration or rendering output.
#[derive(Debug, Error)]
pub enum SelfTestError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Configuration file declares a version this crate does not read.
    #[error("unsupported config version: {0}")]
    UnsupportedConfigVersion(String),
}

/// Convenience alias for results with [`SelfTestError`].
pub type Result<T> = std::result::Result<T, SelfTestError>;
