//! Error types for survey statistics computation.
//!
//! The stage functions themselves are total: division by zero, missing
//! parameters, empty identifiers and entity lookup misses are all defined
//! outcomes, not errors. `StatsError` covers what is left: configuration,
//! serialized input/output, pipeline wiring and enrichment task failures.
//!
//! # Example
//!
//! ```rust
//! use survey_stats::errors::StatsError;
//!
//! let err = StatsError::config("facet limit must be positive");
//! assert_eq!(err.category(), "Config");
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Unified error type for survey statistics operations.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Configuration file or parameter errors
    #[error("Config error: {message}{}", path_suffix(.path))]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Pipeline composition errors (stage wiring, type mismatches)
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Entity enrichment task failures; a lookup miss is never reported here
    #[error("Enrichment error: {0}")]
    Enrichment(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl StatsError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path context.
    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a pipeline error.
    pub fn pipeline(message: impl Into<String>) -> Self {
        Self::Pipeline(message.into())
    }

    /// Create an enrichment error.
    pub fn enrichment(message: impl Into<String>) -> Self {
        Self::Enrichment(message.into())
    }

    /// Create an error from any message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } | Self::Toml(_) => "Config",
            Self::Pipeline(_) => "Pipeline",
            Self::Enrichment(_) => "Enrichment",
            Self::Io(_) => "I/O",
            Self::Json(_) => "JSON",
            Self::Other(_) => "Error",
        }
    }
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" (file: {})", p.display()))
        .unwrap_or_default()
}

impl From<std::convert::Infallible> for StatsError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

impl From<anyhow::Error> for StatsError {
    fn from(err: anyhow::Error) -> Self {
        // Preserve a typed error if one is wrapped
        match err.downcast::<StatsError>() {
            Ok(stats_err) => stats_err,
            Err(err) => Self::Other(format!("{:#}", err)),
        }
    }
}
