//! Show (and optionally stop) the running Toggl timer.

use clap::Args;

use togglcal_core::{ConfigStore, TogglClient};

use crate::common::{format_duration, format_local, separator};

#[derive(Args)]
pub struct CurrentArgs {
    /// Stop the running timer after showing it
    #[arg(long)]
    pub stop: bool,
}

pub fn run(args: CurrentArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::new(ConfigStore::default_path());
    let settings = store.load()?;
    let toggl = TogglClient::from_settings(&settings)?;

    let Some(entry) = toggl.current_entry()? else {
        println!("No time entry is currently running.");
        return Ok(());
    };

    let elapsed = (chrono::Utc::now() - entry.start).num_seconds();

    println!("Current time entry");
    println!("{}", separator());
    println!(
        "  Description: {}",
        if entry.description.is_empty() {
            "(unnamed)"
        } else {
            &entry.description
        }
    );
    println!("  Started:     {}", format_local(entry.start));
    println!("  Elapsed:     {}", format_duration(elapsed));
    if !entry.project.is_empty() {
        println!("  Project:     {}", entry.project);
    }
    if !entry.tags.is_empty() {
        println!("  Tags:        {}", entry.tags.join(", "));
    }
    println!("  Billable:    {}", if entry.billable { "yes" } else { "no" });

    if args.stop {
        toggl.stop_entry(&entry)?;
        println!("\nTimer stopped.");
    }

    Ok(())
}
