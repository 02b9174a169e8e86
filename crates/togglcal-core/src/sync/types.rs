//! Data contracts shared by the sync engine, the matcher, and the
//! calendar session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// A completed tracked interval from the time-entry source.
///
/// Still-running source entries have no end instant and never become a
/// `TimeEntry`; the source client filters them out. The engine treats
/// entries as read-only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Entry description; empty means unnamed.
    pub description: String,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant, `end >= start`.
    pub end: DateTime<Utc>,
    /// Project name; empty means none.
    #[serde(default)]
    pub project: String,
    /// Tags in source order.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TimeEntry {
    /// Elapsed seconds between start and end.
    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// The currently running time entry, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningEntry {
    pub id: i64,
    pub workspace_id: i64,
    pub description: String,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub billable: bool,
}

/// An event as stored by the calendar service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Opaque id assigned by the calendar service.
    pub id: String,
    /// Event title; mirrors the entry description.
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Calendar the event belongs to.
    pub calendar_id: String,
    /// True when the matcher found this event rather than the engine
    /// creating it. Transient, never sent to the service.
    #[serde(skip)]
    pub is_existing: bool,
}

/// Insert payload for a new event. The calendar service assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDraft {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EventDraft {
    /// Build a draft mirroring a time entry.
    pub fn from_entry(entry: &TimeEntry) -> Self {
        Self {
            summary: entry.description.clone(),
            start: entry.start,
            end: entry.end,
        }
    }
}

/// One row of the user's calendar list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarListing {
    pub id: String,
    pub summary: String,
    #[serde(default)]
    pub primary: bool,
}

/// Calendar service primitives the sync engine depends on.
///
/// `list_events` implementations must return single instances (recurring
/// events expanded) in ascending start-time order; the matcher relies on
/// that ordering for its first-match rule.
pub trait CalendarApi {
    /// Events whose interval overlaps `[time_min, time_max]`.
    fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarError>;

    /// Insert a new event, returning it with its service-assigned id.
    fn insert_event(
        &self,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<CalendarEvent, CalendarError>;

    /// All calendars visible to the authenticated user.
    fn list_calendars(&self) -> Result<Vec<CalendarListing>, CalendarError>;
}

/// Per-invocation sync switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Query the calendar before each write and skip found duplicates.
    pub check_duplicate: bool,
    /// Report what would be processed without any calendar contact.
    pub preview: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            check_duplicate: true,
            preview: false,
        }
    }
}

/// Which remote call failed for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureStage {
    /// The duplicate-check query failed.
    DuplicateCheck,
    /// The event insert failed.
    Insert,
}

/// One entry that could not be processed. The batch continues past it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncFailure {
    pub description: String,
    pub start: DateTime<Utc>,
    pub stage: FailureStage,
    pub error: String,
}

/// Outcome of one sync invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Events created this run.
    pub created: usize,
    /// Entries skipped because an equivalent event already existed.
    pub skipped: usize,
    /// Entries examined, including failed ones.
    pub total_processed: usize,
    /// Entries that failed, in input order.
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// Number of failed entries.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Sync engine errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Every entry in the batch failed.
    #[error("All {} entries failed to sync", .0.total_processed)]
    AllEntriesFailed(SyncReport),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_entry_duration() {
        let entry = TimeEntry {
            description: "Coding".into(),
            start: ts(11, 0),
            end: ts(13, 0),
            project: String::new(),
            tags: vec![],
        };
        assert_eq!(entry.duration_secs(), 7200);
    }

    #[test]
    fn test_draft_mirrors_entry() {
        let entry = TimeEntry {
            description: "Design review".into(),
            start: ts(10, 0),
            end: ts(11, 0),
            project: "acme".into(),
            tags: vec!["meeting".into()],
        };
        let draft = EventDraft::from_entry(&entry);
        assert_eq!(draft.summary, "Design review");
        assert_eq!(draft.start, entry.start);
        assert_eq!(draft.end, entry.end);
    }

    #[test]
    fn test_default_options() {
        let opts = SyncOptions::default();
        assert!(opts.check_duplicate);
        assert!(!opts.preview);
    }

    #[test]
    fn test_is_existing_not_serialized() {
        let event = CalendarEvent {
            id: "e1".into(),
            summary: "Standup".into(),
            start: ts(9, 0),
            end: ts(9, 15),
            calendar_id: "primary".into(),
            is_existing: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("is_existing").is_none());
    }
}
