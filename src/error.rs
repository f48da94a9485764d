//! Error types for the youtrack-rest library.

use thiserror::Error;

/// Unified error type for configuration and command-line use.
#[derive(Debug, Error)]
pub enum Error {
    /// Tracker-related error
    #[error("Tracker error: {0}")]
    Tracker(#[from] crate::tracker::TrackerError),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
