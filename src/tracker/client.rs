use async_trait::async_trait;
use std::time::Duration;

use super::issue::Issue;
use super::youtrack::YouTrackClient;

/// Environment variable consulted for the API token when none is given.
pub const TOKEN_ENV: &str = "YOUTRACK_TOKEN";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when talking to an issue tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The base URL could not be used
    #[error("Invalid tracker URL: {0:?}")]
    InvalidUrl(String),
    /// The requested issue does not exist
    #[error("Issue not found: {0}")]
    NotFound(String),
    /// The API token cannot be sent as an HTTP header
    #[error("Invalid API token: contains characters not allowed in an HTTP header")]
    InvalidToken,
    /// The tracker rejected the credentials
    #[error("Authentication failed: {0}")]
    Unauthorized(String),
    /// The tracker answered with an unexpected status
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Message reported by the tracker
        message: String,
    },
    /// A network error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    /// The response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Read access to an issue tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Returns whether an issue with the given id exists.
    async fn issue_exists(&self, issue_id: &str) -> Result<bool, TrackerError>;
    /// Fetches the issue with the given id.
    async fn issue(&self, issue_id: &str) -> Result<Issue, TrackerError>;
}

/// A builder for creating tracker clients.
#[derive(Debug, Default)]
pub struct TrackerClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl TrackerClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL of the tracker.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the permanent API token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Creates a YouTrack client. No request is sent until the first query.
    pub fn build_youtrack(self) -> Result<YouTrackClient, TrackerError> {
        let base_url = self.base_url.unwrap_or_default();
        let token = self
            .token
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .filter(|token| !token.is_empty());

        YouTrackClient::with_options(
            &base_url,
            token,
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        )
    }
}
