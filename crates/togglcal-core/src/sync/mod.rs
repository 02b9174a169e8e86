//! Calendar synchronization: data contracts, duplicate matcher, and the
//! reconciliation engine.

pub mod engine;
pub mod matcher;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::SyncEngine;
pub use matcher::find_existing;
pub use types::{
    CalendarApi, CalendarEvent, CalendarListing, EventDraft, FailureStage, RunningEntry,
    SyncError, SyncFailure, SyncOptions, SyncReport, TimeEntry,
};
