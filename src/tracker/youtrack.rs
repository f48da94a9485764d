use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::client::{IssueTracker, TrackerClientBuilder, TrackerError};
use super::issue::{CustomField, CustomFieldValue, Issue, Project, User};

/// Fields requested when fetching a full issue.
pub const ISSUE_FIELDS: &str = "id,idReadable,summary,description,created,updated,resolved,\
project(shortName,name),reporter(login,fullName),\
customFields(name,value(name,login,fullName,text,presentation))";

/// Fields requested for an existence check.
const EXISTS_FIELDS: &str = "id";

/// Keys tried, in order, when rendering an object-valued custom field.
const VALUE_KEYS: [&str; 5] = ["presentation", "name", "text", "fullName", "login"];

/// YouTrack REST response for a single issue.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueResponse {
    #[serde(default)]
    id: String,
    id_readable: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    created: Option<i64>,
    updated: Option<i64>,
    resolved: Option<i64>,
    project: Option<ProjectResponse>,
    reporter: Option<UserResponse>,
    custom_fields: Option<Vec<CustomFieldResponse>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    short_name: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserResponse {
    login: Option<String>,
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CustomFieldResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: Value,
}

/// Error body returned by YouTrack on failed requests.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

impl IssueResponse {
    fn into_issue(self, requested_id: &str) -> Issue {
        Issue {
            id: self.id_readable.unwrap_or_else(|| requested_id.to_string()),
            entity_id: self.id,
            summary: self.summary,
            description: self.description,
            project: self.project.map(|project| Project {
                short_name: project.short_name.unwrap_or_default(),
                name: project.name,
            }),
            reporter: self.reporter.map(|user| User {
                login: user.login.unwrap_or_default(),
                full_name: user.full_name,
            }),
            created: self.created.and_then(DateTime::<Utc>::from_timestamp_millis),
            updated: self.updated.and_then(DateTime::<Utc>::from_timestamp_millis),
            resolved: self.resolved.and_then(DateTime::<Utc>::from_timestamp_millis),
            custom_fields: self
                .custom_fields
                .unwrap_or_default()
                .into_iter()
                .map(|field| CustomField {
                    value: render_value(&field.value),
                    name: field.name,
                })
                .collect(),
        }
    }
}

/// Renders a custom field value as YouTrack sends it.
fn render_value(value: &Value) -> CustomFieldValue {
    match value {
        Value::Null => CustomFieldValue::Empty,
        Value::Array(items) => {
            let values: Vec<String> = items.iter().filter_map(render_scalar).collect();
            if values.is_empty() {
                CustomFieldValue::Empty
            } else {
                CustomFieldValue::Multiple(values)
            }
        }
        other => render_scalar(other)
            .map(CustomFieldValue::Single)
            .unwrap_or(CustomFieldValue::Empty),
    }
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Object(map) => VALUE_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(|inner| match inner {
                Value::Object(_) | Value::Array(_) => None,
                scalar => render_scalar(scalar),
            }),
        Value::Null | Value::Array(_) => None,
    }
}

/// An issue tracker client for the YouTrack REST API.
#[derive(Debug, Clone)]
pub struct YouTrackClient {
    client: Client,
    base_url: Url,
}

impl YouTrackClient {
    /// Creates a client for the tracker at `base_url`.
    ///
    /// The token is taken from `YOUTRACK_TOKEN` if set. Use
    /// [`TrackerClientBuilder`] for other options.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TrackerError> {
        TrackerClientBuilder::new()
            .with_base_url(base_url)
            .build_youtrack()
    }

    /// Creates a client with explicit options.
    pub fn with_options(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TrackerError> {
        let mut url =
            Url::parse(base_url).map_err(|_| TrackerError::InvalidUrl(base_url.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(TrackerError::InvalidUrl(base_url.to_string()));
        }
        url.set_query(None);
        url.set_fragment(None);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| TrackerError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: url,
        })
    }

    /// Returns the base URL this client talks to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Returns whether `issue_id` can be sent as a single path segment.
    ///
    /// URL normalization drops `.` and `..` segments and an empty id leaves
    /// the segment out, so these would address the issue list instead.
    fn addresses_issue(issue_id: &str) -> bool {
        !matches!(issue_id, "" | "." | "..")
    }

    /// Builds the REST URL for an issue, keeping any path prefix of the base URL.
    fn issue_url(&self, issue_id: &str, fields: &str) -> Url {
        let mut url = self.base_url.clone();
        // The base URL was checked to be usable as a base in `with_options`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "issues", issue_id]);
        }
        url.query_pairs_mut().append_pair("fields", fields);
        url
    }

    async fn get_issue(&self, issue_id: &str, fields: &str) -> Result<Response, TrackerError> {
        let url = self.issue_url(issue_id, fields);
        debug!(url = %url, "Sending request to YouTrack");

        let response = self.client.get(url).send().await?;
        debug!(issue_id, status = %response.status(), "YouTrack responded");

        Ok(response)
    }

    /// Converts a non-success response into an error.
    async fn status_error(response: Response) -> TrackerError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|error| error.error_description.or(error.error))
            .unwrap_or(body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TrackerError::Unauthorized(message),
            _ => TrackerError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl IssueTracker for YouTrackClient {
    async fn issue_exists(&self, issue_id: &str) -> Result<bool, TrackerError> {
        if !Self::addresses_issue(issue_id) {
            debug!(issue_id, "Issue id cannot name an issue, skipping request");
            return Ok(false);
        }
        let response = self.get_issue(issue_id, EXISTS_FIELDS).await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::status_error(response).await),
        }
    }

    async fn issue(&self, issue_id: &str) -> Result<Issue, TrackerError> {
        if !Self::addresses_issue(issue_id) {
            debug!(issue_id, "Issue id cannot name an issue, skipping request");
            return Err(TrackerError::NotFound(issue_id.to_string()));
        }
        let response = self.get_issue(issue_id, ISSUE_FIELDS).await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(TrackerError::NotFound(issue_id.to_string())),
            _ => return Err(Self::status_error(response).await),
        }

        let body = response.text().await?;
        let issue: IssueResponse = serde_json::from_str(&body)
            .map_err(|e| TrackerError::InvalidResponse(format!("{}: {}", e, body)))?;

        Ok(issue.into_issue(issue_id))
    }
}
