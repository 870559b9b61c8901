//! Task record types.
//!
//! A [`TaskRecord`] is the raw, already-shaped input handed to the engine.
//! Its scalar fields stay loosely typed ([`Scalar`], [`DueDate`]) so that
//! malformed values can be recovered during normalization instead of
//! failing a whole batch. A [`NormalizedTask`] is the per-call derived view
//! with every field resolved to a bounded, well-typed value.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::normalize::parse_calendar_date;

/// A numeric field that may arrive as a number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(f64::from(value))
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// A due date that is either an actual calendar date or free text.
///
/// ISO `YYYY-MM-DD` strings with a four-digit year deserialize straight
/// into [`DueDate::Date`]; anything else is kept as text for the
/// permissive parser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DueDate {
    Date(NaiveDate),
    Text(String),
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(match parse_calendar_date(&text) {
            Some(date) => DueDate::Date(date),
            None => DueDate::Text(text),
        })
    }
}

impl From<NaiveDate> for DueDate {
    fn from(value: NaiveDate) -> Self {
        DueDate::Date(value)
    }
}

impl From<&str> for DueDate {
    fn from(value: &str) -> Self {
        DueDate::Text(value.to_string())
    }
}

/// Raw task record as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DueDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Scalar>,
    /// Keys of the tasks that must be finished before this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl TaskRecord {
    /// Create a record with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_due_date(mut self, due: impl Into<DueDate>) -> Self {
        self.due_date = Some(due.into());
        self
    }

    pub fn with_estimated_hours(mut self, hours: impl Into<Scalar>) -> Self {
        self.estimated_hours = Some(hours.into());
        self
    }

    pub fn with_importance(mut self, importance: impl Into<Scalar>) -> Self {
        self.importance = Some(importance.into());
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// Effective identity of a task within one analysis.
///
/// A record's own `id` wins when present and non-empty; otherwise the
/// title stands in for it. Two records resolving to the same string are
/// not merged, they simply share graph edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskKey {
    ExplicitId(String),
    TitleFallback(String),
}

impl TaskKey {
    /// Resolve the key for a record.
    pub fn of(record: &TaskRecord) -> Self {
        match record.id.as_deref() {
            Some(id) if !id.is_empty() => TaskKey::ExplicitId(id.to_string()),
            _ => TaskKey::TitleFallback(record.title.clone().unwrap_or_default()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskKey::ExplicitId(s) | TaskKey::TitleFallback(s) => s,
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, TaskKey::ExplicitId(_))
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Task with every field resolved, borrowed from its raw record.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTask<'a> {
    pub raw: &'a TaskRecord,
    pub key: TaskKey,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    /// Importance mapped into [0, 1]
    pub importance: f64,
    pub estimated_hours: f64,
    pub dependencies: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_prefers_explicit_id() {
        let record = TaskRecord::new("Write report").with_id("t1");
        assert_eq!(TaskKey::of(&record), TaskKey::ExplicitId("t1".into()));
    }

    #[test]
    fn key_falls_back_to_title_on_blank_id() {
        let record = TaskRecord::new("Write report").with_id("");
        let key = TaskKey::of(&record);
        assert_eq!(key, TaskKey::TitleFallback("Write report".into()));
        assert!(!key.is_explicit());
    }

    #[test]
    fn key_without_id_or_title_is_empty() {
        let key = TaskKey::of(&TaskRecord::default());
        assert_eq!(key.as_str(), "");
    }

    #[test]
    fn record_deserializes_loose_fields() {
        let json = r#"{
            "id": "a",
            "title": "A",
            "due_date": "2025-03-01",
            "estimated_hours": "2.5",
            "importance": 7,
            "dependencies": ["b"]
        }"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.due_date,
            Some(DueDate::Date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()))
        );
        assert_eq!(record.estimated_hours, Some(Scalar::Text("2.5".into())));
        assert_eq!(record.importance, Some(Scalar::Number(7.0)));
        assert_eq!(record.dependencies, vec!["b".to_string()]);
    }

    #[test]
    fn free_text_due_date_is_kept_as_text() {
        let record: TaskRecord =
            serde_json::from_str(r#"{"title": "x", "due_date": "March 1, 2025"}"#).unwrap();
        assert_eq!(record.due_date, Some(DueDate::Text("March 1, 2025".into())));
    }

    #[test]
    fn short_year_due_date_stays_text() {
        let record: TaskRecord =
            serde_json::from_str(r#"{"title": "x", "due_date": "25-01-02"}"#).unwrap();
        assert_eq!(record.due_date, Some(DueDate::Text("25-01-02".into())));
    }

    #[test]
    fn key_serializes_as_plain_string() {
        let key = TaskKey::TitleFallback("Plan".into());
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"Plan\"");
    }
}
