//! Version and project info.

use crate::common::separator;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("TOGGL CALENDAR CONNECTOR v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", separator());
    println!("Sync Toggl time entries to Google Calendar.");
    println!("Own your time. Master your productivity. Take back your day.");
    Ok(())
}
