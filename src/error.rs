// src/error.rs

//! Unified error handling for the vacancy crawler.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A search request for one query failed
    #[error("Fetch error for query '{query}': {message}")]
    Fetch { query: String, message: String },

    /// Campaign filter names a campaign that is not configured
    #[error("Unknown campaign '{0}'")]
    UnknownCampaign(String),

    /// No snapshot directory exists for the requested date
    #[error("No snapshot for {date}: directory {} not found", path.display())]
    SnapshotNotFound { date: NaiveDate, path: PathBuf },

    /// Snapshot directory exists but holds no listings
    #[error("Snapshot for {date} contains no listings")]
    EmptySnapshot { date: NaiveDate },

    /// Neither side of a comparison holds any listings
    #[error("Nothing to compare: snapshots {baseline} and {current} are both empty")]
    EmptyComparison {
        baseline: NaiveDate,
        current: NaiveDate,
    },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error for a query.
    pub fn fetch(query: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            query: query.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error is a structural failure that leaves nothing to report.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::SnapshotNotFound { .. } | Self::EmptySnapshot { .. } | Self::EmptyComparison { .. }
        )
    }
}
