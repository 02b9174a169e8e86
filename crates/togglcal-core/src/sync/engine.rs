//! Sync engine reconciling time entries against a target calendar.

use crate::sync::matcher;
use crate::sync::types::{
    CalendarApi, EventDraft, FailureStage, SyncError, SyncFailure, SyncOptions, SyncReport,
    TimeEntry,
};

/// Drives one reconciliation run. The calendar handle and the target
/// calendar id are injected at construction; the engine keeps no state
/// between runs -- all memory of prior syncs lives in the calendar
/// itself.
pub struct SyncEngine<'a, C: CalendarApi> {
    calendar: &'a C,
    calendar_id: String,
}

impl<'a, C: CalendarApi> SyncEngine<'a, C> {
    pub fn new(calendar: &'a C, calendar_id: impl Into<String>) -> Self {
        Self {
            calendar,
            calendar_id: calendar_id.into(),
        }
    }

    /// Reconcile `entries` in input order.
    ///
    /// With `check_duplicate` each entry is first looked up in the
    /// calendar and skipped when an equivalent event exists; otherwise
    /// every entry is inserted. Preview runs count the entries and touch
    /// nothing. A single entry's failure is recorded and the loop
    /// continues; the run only fails as a whole when every entry failed.
    pub fn sync(
        &self,
        entries: &[TimeEntry],
        options: SyncOptions,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();

        if entries.is_empty() {
            return Ok(report);
        }

        if options.preview {
            report.total_processed = entries.len();
            return Ok(report);
        }

        for entry in entries {
            report.total_processed += 1;

            if options.check_duplicate {
                match matcher::find_existing(
                    self.calendar,
                    &self.calendar_id,
                    &entry.description,
                    entry.start,
                    entry.end,
                ) {
                    Ok(Some(existing)) => {
                        tracing::debug!(
                            description = %entry.description,
                            event_id = %existing.id,
                            "duplicate found, skipping"
                        );
                        report.skipped += 1;
                        continue;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(
                            description = %entry.description,
                            error = %err,
                            "duplicate check failed, entry not synced"
                        );
                        report.failures.push(SyncFailure {
                            description: entry.description.clone(),
                            start: entry.start,
                            stage: FailureStage::DuplicateCheck,
                            error: err.to_string(),
                        });
                        continue;
                    }
                }
            }

            let draft = EventDraft::from_entry(entry);
            match self.calendar.insert_event(&self.calendar_id, &draft) {
                Ok(created) => {
                    tracing::debug!(
                        description = %entry.description,
                        event_id = %created.id,
                        "event created"
                    );
                    report.created += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        description = %entry.description,
                        error = %err,
                        "event creation failed"
                    );
                    report.failures.push(SyncFailure {
                        description: entry.description.clone(),
                        start: entry.start,
                        stage: FailureStage::Insert,
                        error: err.to_string(),
                    });
                }
            }
        }

        if report.failed() == entries.len() {
            return Err(SyncError::AllEntriesFailed(report));
        }

        Ok(report)
    }
}
