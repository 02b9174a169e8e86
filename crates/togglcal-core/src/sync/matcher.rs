//! Duplicate detection against the target calendar.

use chrono::{DateTime, Utc};

use crate::error::CalendarError;
use crate::sync::types::{CalendarApi, CalendarEvent};

/// Look for an event equivalent to `(description, start, end)` in the
/// given calendar.
///
/// Queries every event overlapping `[start, end]` and returns the first
/// one (ascending start order) whose summary equals `description`
/// byte-for-byte -- case-sensitive, no trimming. Returns `None` when no
/// event matches; the returned event has `is_existing` set.
///
/// The source and the calendar share no primary key, so exact summary
/// equality over an overlapping interval is the idempotency signal.
/// Known limitation: two distinct entries with the same description and
/// overlapping intervals are indistinguishable, and the later one is
/// treated as a duplicate of the first.
pub fn find_existing<C>(
    calendar: &C,
    calendar_id: &str,
    description: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Option<CalendarEvent>, CalendarError>
where
    C: CalendarApi + ?Sized,
{
    let events = calendar.list_events(calendar_id, start, end)?;
    tracing::debug!(
        candidates = events.len(),
        description,
        "duplicate check window queried"
    );

    for mut event in events {
        if event.summary == description {
            event.is_existing = true;
            return Ok(Some(event));
        }
    }

    Ok(None)
}
