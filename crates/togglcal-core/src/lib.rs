//! # Toggl Calendar Core Library
//!
//! Core business logic for the Toggl -> Google Calendar connector. The
//! CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Sync engine**: sequential reconciliation of time entries against
//!   a target calendar, with duplicate suppression and per-entry failure
//!   isolation
//! - **Matcher**: the duplicate heuristic (exact summary over an
//!   overlapping interval, first match wins)
//! - **Integrations**: Toggl Track and Google Calendar clients behind a
//!   trait seam, plus the OAuth flow and keyring credential storage
//! - **Config**: `.env`-file key-value store for credentials and the
//!   selected calendar
//!
//! ## Key Components
//!
//! - [`SyncEngine`]: the reconciliation loop
//! - [`CalendarApi`]: calendar primitives the engine depends on
//! - [`TogglClient`] / [`GoogleCalendarClient`]: service clients
//! - [`ConfigStore`]: configuration load/save

pub mod config;
pub mod error;
pub mod integrations;
pub mod sync;

pub use config::{ConfigStore, Settings};
pub use error::{
    AuthError, CalendarError, ConfigError, CoreError, SourceError, ValidationError,
};
pub use integrations::{GoogleCalendarClient, TogglClient};
pub use sync::{
    CalendarApi, CalendarEvent, CalendarListing, EventDraft, FailureStage, RunningEntry,
    SyncEngine, SyncError, SyncFailure, SyncOptions, SyncReport, TimeEntry,
};
