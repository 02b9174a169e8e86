//! In-memory calendar double for engine and matcher tests.

use std::cell::RefCell;
use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::error::CalendarError;
use crate::sync::types::{CalendarApi, CalendarEvent, CalendarListing, EventDraft};

/// A fake calendar backed by a `RefCell` store. Records every call so
/// tests can assert on call counts and insert ordering, and can be told
/// to fail queries or specific inserts.
#[derive(Default)]
pub struct MockCalendar {
    events: RefCell<Vec<CalendarEvent>>,
    inserted: RefCell<Vec<EventDraft>>,
    list_calls: RefCell<usize>,
    next_id: RefCell<usize>,
    fail_lists: bool,
    fail_insert_summaries: HashSet<String>,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events: RefCell::new(events),
            ..Self::default()
        }
    }

    /// Every `list_events` call fails.
    pub fn failing_lists() -> Self {
        Self {
            fail_lists: true,
            ..Self::default()
        }
    }

    /// Inserts whose summary is in `summaries` fail.
    pub fn failing_inserts<I: IntoIterator<Item = String>>(summaries: I) -> Self {
        Self {
            fail_insert_summaries: summaries.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Summaries of inserted drafts, in call order.
    pub fn inserted_summaries(&self) -> Vec<String> {
        self.inserted
            .borrow()
            .iter()
            .map(|d| d.summary.clone())
            .collect()
    }

    pub fn insert_count(&self) -> usize {
        self.inserted.borrow().len()
    }

    pub fn list_call_count(&self) -> usize {
        *self.list_calls.borrow()
    }
}

impl CalendarApi for MockCalendar {
    fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        *self.list_calls.borrow_mut() += 1;
        if self.fail_lists {
            return Err(CalendarError::Api {
                status: 500,
                message: "injected query failure".into(),
            });
        }
        let mut overlapping: Vec<CalendarEvent> = self
            .events
            .borrow()
            .iter()
            .filter(|e| e.calendar_id == calendar_id && e.start <= time_max && e.end >= time_min)
            .cloned()
            .collect();
        overlapping.sort_by_key(|e| e.start);
        Ok(overlapping)
    }

    fn insert_event(
        &self,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<CalendarEvent, CalendarError> {
        if self.fail_insert_summaries.contains(&draft.summary) {
            return Err(CalendarError::Api {
                status: 503,
                message: "injected insert failure".into(),
            });
        }
        self.inserted.borrow_mut().push(draft.clone());
        let mut next_id = self.next_id.borrow_mut();
        *next_id += 1;
        let event = CalendarEvent {
            id: format!("evt-{}", *next_id),
            summary: draft.summary.clone(),
            start: draft.start,
            end: draft.end,
            calendar_id: calendar_id.to_string(),
            is_existing: false,
        };
        self.events.borrow_mut().push(event.clone());
        Ok(event)
    }

    fn list_calendars(&self) -> Result<Vec<CalendarListing>, CalendarError> {
        Ok(vec![CalendarListing {
            id: "primary".into(),
            summary: "Primary".into(),
            primary: true,
        }])
    }
}
