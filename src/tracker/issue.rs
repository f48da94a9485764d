use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An issue as reported by the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Human-readable id, e.g. `PROJ-1`
    pub id: String,
    /// Database id assigned by the tracker, e.g. `2-17`
    pub entity_id: String,
    /// One-line summary
    pub summary: Option<String>,
    /// Full description
    pub description: Option<String>,
    /// The project the issue belongs to
    pub project: Option<Project>,
    /// The user who reported the issue
    pub reporter: Option<User>,
    /// When the issue was created
    pub created: Option<DateTime<Utc>>,
    /// When the issue was last updated
    pub updated: Option<DateTime<Utc>>,
    /// When the issue was resolved, if it is
    pub resolved: Option<DateTime<Utc>>,
    /// Custom fields in tracker order
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

/// A tracker project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Short name used as the issue id prefix
    pub short_name: String,
    /// Display name
    pub name: Option<String>,
}

/// A tracker user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name
    pub login: String,
    /// Display name
    pub full_name: Option<String>,
}

/// A named custom field on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    /// Field name, e.g. `State`
    pub name: String,
    /// Rendered field value
    pub value: CustomFieldValue,
}

/// The rendered value of a custom field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CustomFieldValue {
    /// No value set
    Empty,
    /// A single value (enum element, user, text, number)
    Single(String),
    /// A multi-value field
    Multiple(Vec<String>),
}

impl CustomFieldValue {
    /// Returns the value as text, joining multiple values with `", "`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CustomFieldValue::Empty => None,
            CustomFieldValue::Single(value) => Some(value.clone()),
            CustomFieldValue::Multiple(values) => Some(values.join(", ")),
        }
    }

    /// Returns whether no value is set.
    pub fn is_empty(&self) -> bool {
        matches!(self, CustomFieldValue::Empty)
    }
}

impl fmt::Display for CustomFieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("<unset>"),
        }
    }
}

impl Issue {
    /// Looks up a custom field by its exact name.
    pub fn custom_field(&self, name: &str) -> Option<&CustomFieldValue> {
        self.custom_fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    /// Returns whether the tracker marks the issue as resolved.
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}
