//! # YouTrack REST
//!
//! A small, typed facade over the YouTrack issue tracker.
//!
//! ## Features
//!
//! - **Adapter**: [`YouTrackRest`] forwards existence checks and issue fetches to a tracker
//! - **Tracker trait**: [`IssueTracker`] lets any client (or a mock) stand behind the adapter
//! - **YouTrack client**: a `reqwest` implementation of the YouTrack REST API
//! - **Configuration**: load connection settings from JSON files or the environment
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use youtrack_rest::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let youtrack = YouTrackRest::new("https://tracker.example.com/youtrack/")?;
//!
//!     if youtrack.issue_exists("PROJ-1").await? {
//!         let issue = youtrack.issue("PROJ-1").await?;
//!         println!("{:?}", issue.custom_field("State"));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!

pub mod error;
pub mod rest;
pub mod tracker;

// Re-exports for convenient usage
pub use error::Error;
pub use rest::YouTrackRest;
pub use tracker::{
    CustomField, CustomFieldValue, Issue, IssueTracker, Project, TrackerClientBuilder,
    TrackerConfig, TrackerError, User, YouTrackClient,
};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::rest::YouTrackRest;
    pub use crate::tracker::{Issue, IssueTracker, TrackerConfig, TrackerError};
    pub use crate::TrackerClientBuilder;
}
