pub mod client;
pub mod config;
pub mod issue;
pub mod youtrack;

pub use client::{IssueTracker, TrackerClientBuilder, TrackerError};
pub use config::TrackerConfig;
pub use issue::{CustomField, CustomFieldValue, Issue, Project, User};
pub use youtrack::YouTrackClient;
