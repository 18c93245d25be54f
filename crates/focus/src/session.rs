//! Focus session records
//!
//! `SessionRecord` is what the store persists; `NewSession` is what callers
//! hand to the store; `SessionSummary` is what the timer reports when a
//! session ends.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// A persisted focus session
///
/// Records are never edited once written. The JSON field names are part of
/// the on-disk format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Time-based id, unique within the store
    pub id: String,
    /// Category id (see `Category::id`)
    pub category_id: String,
    /// Focused time in seconds
    pub duration_seconds: u32,
    /// How many times the app lost the foreground during the session
    pub distraction_count: u32,
    /// When the session was recorded
    pub timestamp: DateTime<Utc>,
}

impl SessionRecord {
    /// The category, if the stored id is one we know
    pub fn category(&self) -> Option<Category> {
        Category::from_id(&self.category_id)
    }

    /// Calendar date of the record in local time
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Local).date_naive()
    }
}

/// Fields supplied when saving a session; the store fills in the rest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub category_id: String,
    pub duration_seconds: u32,
    pub distraction_count: u32,
    /// Defaults to the time of saving
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewSession {
    pub fn new(category: Category, duration_seconds: u32, distraction_count: u32) -> Self {
        Self {
            category_id: category.id().to_string(),
            duration_seconds,
            distraction_count,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// What the timer reports when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub category: Category,
    /// Focused seconds (total minus what was left on the clock)
    pub duration_seconds: u32,
    pub distraction_count: u32,
    /// True when the countdown reached zero, false when finished early
    pub completed: bool,
}

impl SessionSummary {
    pub fn to_new_session(&self) -> NewSession {
        NewSession::new(self.category, self.duration_seconds, self.distraction_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_field_names() {
        let record = SessionRecord {
            id: "1760601600000".to_string(),
            category_id: "coding".to_string(),
            duration_seconds: 1500,
            distraction_count: 2,
            timestamp: DateTime::parse_from_rfc3339("2026-10-16T08:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "1760601600000");
        assert_eq!(value["categoryId"], "coding");
        assert_eq!(value["durationSeconds"], 1500);
        assert_eq!(value["distractionCount"], 2);
        assert_eq!(value["timestamp"], "2026-10-16T08:00:00Z");
        assert_eq!(record.category(), Some(Category::Coding));
    }

    #[test]
    fn test_parses_offset_timestamps() {
        let json = r#"{"id":"1","categoryId":"study","durationSeconds":60,
            "distractionCount":0,"timestamp":"2026-10-16T10:30:00.123+02:00"}"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.timestamp.to_rfc3339(), "2026-10-16T08:30:00.123+00:00");
    }

    #[test]
    fn test_unknown_category_is_kept() {
        let json = r#"{"id":"1","categoryId":"gardening","durationSeconds":60,
            "distractionCount":0,"timestamp":"2026-10-16T10:30:00Z"}"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.category_id, "gardening");
        assert_eq!(record.category(), None);
    }

    #[test]
    fn test_summary_to_new_session() {
        let summary = SessionSummary {
            category: Category::Reading,
            duration_seconds: 300,
            distraction_count: 1,
            completed: false,
        };
        let new = summary.to_new_session();
        assert_eq!(new.category_id, "reading");
        assert_eq!(new.duration_seconds, 300);
        assert_eq!(new.distraction_count, 1);
        assert!(new.timestamp.is_none());
    }
}
