use tracing::trace;

use crate::tracker::{Issue, IssueTracker, TrackerError, YouTrackClient};

/// A narrow facade over an issue tracker.
///
/// Holds a single tracker handle for its whole lifetime and forwards
/// queries to it. Results and errors are returned exactly as the tracker
/// produced them.
#[derive(Debug, Clone)]
pub struct YouTrackRest<C = YouTrackClient> {
    tracker: C,
}

impl YouTrackRest<YouTrackClient> {
    /// Creates an adapter backed by a YouTrack client for `base_url`.
    ///
    /// Only the URL syntax is checked here; the tracker is first contacted
    /// by the first query.
    ///
    /// The API token is read from the `YOUTRACK_TOKEN` environment variable
    /// when it is set, so adapters built from the same URL share that setting.
    /// Use [`YouTrackRest::with_tracker`] with a [`TrackerClientBuilder`]
    /// to pin the token explicitly.
    ///
    /// [`TrackerClientBuilder`]: crate::tracker::TrackerClientBuilder
    pub fn new(base_url: impl Into<String>) -> Result<Self, TrackerError> {
        Ok(Self::with_tracker(YouTrackClient::new(base_url)?))
    }
}

impl<C: IssueTracker> YouTrackRest<C> {
    /// Creates an adapter over an existing tracker handle.
    pub fn with_tracker(tracker: C) -> Self {
        Self { tracker }
    }

    /// Returns the underlying tracker handle.
    pub fn tracker(&self) -> &C {
        &self.tracker
    }

    /// Returns whether the issue exists.
    pub async fn issue_exists(&self, issue_id: &str) -> Result<bool, TrackerError> {
        trace!(issue_id, "Forwarding existence check");
        self.tracker.issue_exists(issue_id).await
    }

    /// Fetches the issue.
    pub async fn issue(&self, issue_id: &str) -> Result<Issue, TrackerError> {
        trace!(issue_id, "Forwarding issue fetch");
        self.tracker.issue(issue_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{CustomField, CustomFieldValue, Project};
    use mockall::mock;

    mock! {
        pub Tracker {}

        #[async_trait::async_trait]
        impl IssueTracker for Tracker {
            async fn issue_exists(&self, issue_id: &str) -> Result<bool, TrackerError>;
            async fn issue(&self, issue_id: &str) -> Result<Issue, TrackerError>;
        }
    }

    fn sample_issue(id: &str) -> Issue {
        Issue {
            id: id.to_string(),
            entity_id: "2-1".to_string(),
            summary: Some("Crash on startup".to_string()),
            description: Some("Stack trace attached".to_string()),
            project: Some(Project {
                short_name: "PROJ".to_string(),
                name: Some("Project".to_string()),
            }),
            reporter: None,
            created: None,
            updated: None,
            resolved: None,
            custom_fields: vec![CustomField {
                name: "State".to_string(),
                value: CustomFieldValue::Single("Open".to_string()),
            }],
        }
    }

    #[tokio::test]
    async fn test_issue_exists_passes_through() {
        let mut tracker = MockTracker::new();
        tracker
            .expect_issue_exists()
            .withf(|issue_id| issue_id == "PROJ-1")
            .times(1)
            .returning(|_| Ok(true));
        tracker
            .expect_issue_exists()
            .withf(|issue_id| issue_id == "PROJ-404")
            .times(1)
            .returning(|_| Ok(false));

        let adapter = YouTrackRest::with_tracker(tracker);

        assert!(adapter.issue_exists("PROJ-1").await.unwrap());
        assert!(!adapter.issue_exists("PROJ-404").await.unwrap());
    }

    #[tokio::test]
    async fn test_issue_exists_does_not_validate_ids() {
        let mut tracker = MockTracker::new();
        tracker
            .expect_issue_exists()
            .withf(|issue_id| issue_id.is_empty())
            .times(1)
            .returning(|_| Ok(false));

        let adapter = YouTrackRest::with_tracker(tracker);
        assert!(!adapter.issue_exists("").await.unwrap());
    }

    #[tokio::test]
    async fn test_issue_returns_tracker_record() {
        let expected = sample_issue("PROJ-1");
        let returned = expected.clone();

        let mut tracker = MockTracker::new();
        tracker
            .expect_issue()
            .withf(|issue_id| issue_id == "PROJ-1")
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let adapter = YouTrackRest::with_tracker(tracker);
        let issue = adapter.issue("PROJ-1").await.unwrap();

        assert_eq!(issue, expected);
    }

    #[tokio::test]
    async fn test_issue_propagates_not_found() {
        let mut tracker = MockTracker::new();
        tracker
            .expect_issue()
            .times(1)
            .returning(|issue_id| Err(TrackerError::NotFound(issue_id.to_string())));

        let adapter = YouTrackRest::with_tracker(tracker);
        let err = adapter.issue("PROJ-2").await.unwrap_err();

        assert!(matches!(err, TrackerError::NotFound(ref id) if id == "PROJ-2"));
    }

    #[tokio::test]
    async fn test_issue_propagates_api_errors() {
        let mut tracker = MockTracker::new();
        tracker.expect_issue_exists().times(1).returning(|_| {
            Err(TrackerError::ApiError {
                status: 503,
                message: "maintenance".to_string(),
            })
        });

        let adapter = YouTrackRest::with_tracker(tracker);
        let err = adapter.issue_exists("PROJ-3").await.unwrap_err();

        assert!(matches!(
            err,
            TrackerError::ApiError { status: 503, ref message } if message == "maintenance"
        ));
    }

    #[tokio::test]
    async fn test_adapters_hold_independent_trackers() {
        let mut first = MockTracker::new();
        first.expect_issue_exists().times(1).returning(|_| Ok(true));
        let mut second = MockTracker::new();
        second.expect_issue_exists().times(1).returning(|_| Ok(false));

        let first = YouTrackRest::with_tracker(first);
        let second = YouTrackRest::with_tracker(second);

        assert!(first.issue_exists("PROJ-1").await.unwrap());
        assert!(!second.issue_exists("PROJ-1").await.unwrap());
    }

    #[test]
    fn test_new_builds_one_client_per_adapter() {
        let first = YouTrackRest::new("https://tracker.example.com").unwrap();
        let second = YouTrackRest::new("https://other.example.com/youtrack/").unwrap();

        assert_eq!(first.tracker().base_url(), "https://tracker.example.com/");
        assert_eq!(second.tracker().base_url(), "https://other.example.com/youtrack/");
    }

    #[test]
    fn test_new_propagates_client_error() {
        let err = YouTrackRest::new("not a url").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidUrl(ref url) if url == "not a url"));
    }
}
