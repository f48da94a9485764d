use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::client::{DEFAULT_TIMEOUT, TOKEN_ENV, TrackerClientBuilder};
use super::youtrack::YouTrackClient;
use crate::error::Error;
use crate::rest::YouTrackRest;

/// Environment variable holding the tracker base URL.
pub const URL_ENV: &str = "YOUTRACK_URL";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "YOUTRACK_TIMEOUT_SECS";

/// Configuration for connecting to a tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Base URL of the tracker, e.g. `https://tracker.example.com/youtrack/`
    pub base_url: String,
    /// Optional permanent API token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl TrackerConfig {
    /// Creates a configuration with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading tracker config");

        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Loads a configuration from `YOUTRACK_URL`, `YOUTRACK_TOKEN` and `YOUTRACK_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let base_url = get(URL_ENV)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::Config(format!("{} is not set", URL_ENV)))?;

        let timeout_secs = match get(TIMEOUT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a number of seconds, got {:?}", TIMEOUT_ENV, raw))
            })?,
            None => default_timeout_secs(),
        };

        Ok(Self {
            base_url,
            token: get(TOKEN_ENV).filter(|token| !token.is_empty()),
            timeout_secs,
        })
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Converts the configuration into a client builder.
    pub fn into_builder(self) -> TrackerClientBuilder {
        let timeout = self.timeout();
        let builder = TrackerClientBuilder::new()
            .with_base_url(self.base_url)
            .with_timeout(timeout);

        match self.token {
            Some(token) => builder.with_token(token),
            None => builder,
        }
    }

    /// Builds an adapter over a YouTrack client with this configuration.
    pub fn connect(self) -> Result<YouTrackRest<YouTrackClient>, Error> {
        Ok(YouTrackRest::with_tracker(self.into_builder().build_youtrack()?))
    }
}
