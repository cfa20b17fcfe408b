//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Window half-width must be positive")]
    InvalidWindow,

    #[error("Confidence formula parameter out of [0, 1]")]
    InvalidConfidenceParam,

    #[error("Per-source timeout must be positive")]
    InvalidTimeout,

    #[error("Classifier concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("Detection ceiling must be at least 1")]
    InvalidDetectionCeiling,

    #[error("Inference cap must stay below the canonical floor (80)")]
    InferenceCapTooHigh,

    #[error("Z-score threshold must be positive")]
    InvalidZThreshold,

    #[error("Minimum history must be at least 1")]
    InvalidMinHistory,

    #[error("Mode band floors must satisfy 0 < grey_zone < auto_apply")]
    InvalidModeBands,
}
