//! List Google calendars and persist the default selection.

use clap::Args;

use togglcal_core::{CalendarApi, ConfigStore, GoogleCalendarClient};

use crate::common::separator;

#[derive(Args)]
pub struct CalendarsArgs {
    /// Persist this calendar id as the sync target
    #[arg(long, value_name = "CALENDAR_ID")]
    pub set: Option<String>,
}

pub fn run(args: CalendarsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::new(ConfigStore::default_path());
    let current_id = store.calendar_id()?;

    let client = GoogleCalendarClient::connect()?;
    let calendars = client.list_calendars()?;

    if calendars.is_empty() {
        println!("No calendars found.");
        return Ok(());
    }

    println!("Google calendars");
    println!("{}", separator());
    for cal in &calendars {
        let marker = if cal.id == current_id { ">>>" } else { "   " };
        let primary = if cal.primary { " (primary)" } else { "" };
        println!("{} {}{}  [{}]", marker, cal.summary, primary, cal.id);
    }

    if let Some(selected) = args.set {
        let known = calendars.iter().find(|c| c.id == selected);
        let Some(listing) = known else {
            return Err(format!("Calendar id '{selected}' is not in your calendar list").into());
        };
        store.save_calendar_id(&selected)?;
        println!("\nDefault calendar set to '{}' ({}).", listing.summary, selected);
    }

    Ok(())
}
