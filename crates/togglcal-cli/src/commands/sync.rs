//! Sync command: fetch Toggl entries for a date range and reconcile them
//! against the configured Google calendar.

use chrono::NaiveDate;
use clap::Args;

use togglcal_core::{
    ConfigStore, GoogleCalendarClient, SyncEngine, SyncError, SyncOptions, TimeEntry, TogglClient,
    ValidationError,
};

use crate::common::{format_duration, format_local, separator};

#[derive(Args)]
pub struct SyncArgs {
    /// First day of the range (YYYY-MM-DD); defaults to today
    #[arg(short = 's', long)]
    pub start_date: Option<NaiveDate>,
    /// Last day of the range (YYYY-MM-DD); defaults to the start date
    #[arg(short = 'e', long)]
    pub end_date: Option<NaiveDate>,
    /// Sync the past N days instead of explicit dates
    #[arg(short = 'd', long, default_value_t = 0)]
    pub days: u32,
    /// Show the entries without creating any events
    #[arg(short = 'p', long)]
    pub preview: bool,
    /// Create events without querying for duplicates first
    #[arg(long)]
    pub no_check_duplicate: bool,
}

/// Resolve CLI date arguments to an inclusive range.
///
/// `--days N` maps to `[today - N, today]` and cannot be combined with
/// explicit dates. A lone start date means a single-day range; no
/// arguments means today.
pub fn resolve_date_range(
    days: u32,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    if days > 0 {
        if start_date.is_some() || end_date.is_some() {
            return Err(ValidationError::ConflictingDateArguments);
        }
        let start = today - chrono::Duration::days(i64::from(days));
        return Ok((start, today));
    }

    let start = start_date.unwrap_or(today);
    let end = end_date.unwrap_or(start);
    if end < start {
        return Err(ValidationError::InvalidDateRange { start, end });
    }
    Ok((start, end))
}

pub fn run(args: SyncArgs) -> Result<(), Box<dyn std::error::Error>> {
    let today = chrono::Local::now().date_naive();
    let (since, until) = resolve_date_range(args.days, args.start_date, args.end_date, today)?;

    println!("Syncing {since} to {until}");
    println!("{}", separator());

    let store = ConfigStore::new(ConfigStore::default_path());
    let settings = store.load()?;

    let toggl = TogglClient::from_settings(&settings)?;
    let entries = toggl.time_entries(since, until)?;

    if entries.is_empty() {
        println!("No time entries found in the range.");
        return Ok(());
    }

    println!("Found {} time entries:\n", entries.len());
    print_entries(&entries);

    let options = SyncOptions {
        check_duplicate: !args.no_check_duplicate,
        preview: args.preview,
    };

    if options.preview {
        println!("\nPreview mode: no events were created.");
        return Ok(());
    }

    let calendar = GoogleCalendarClient::connect()?;
    let engine = SyncEngine::new(&calendar, settings.google_calendar_id.clone());

    let report = match engine.sync(&entries, options) {
        Ok(report) => report,
        Err(SyncError::AllEntriesFailed(report)) => {
            print_report(&report);
            return Err(SyncError::AllEntriesFailed(report).into());
        }
    };

    print_report(&report);
    Ok(())
}

fn print_entries(entries: &[TimeEntry]) {
    for entry in entries {
        let name = if entry.description.is_empty() {
            "(unnamed)"
        } else {
            &entry.description
        };
        println!(
            "  {}  {} - {}  [{}]",
            name,
            format_local(entry.start),
            format_local(entry.end),
            format_duration(entry.duration_secs()),
        );
    }
}

fn print_report(report: &togglcal_core::SyncReport) {
    println!("\n{}", separator());
    println!(
        "Processed: {}, created: {}, skipped: {}, failed: {}",
        report.total_processed,
        report.created,
        report.skipped,
        report.failed(),
    );
    for failure in &report.failures {
        println!(
            "  failed: {} ({}) - {}",
            failure.description,
            format_local(failure.start),
            failure.error,
        );
    }
}
