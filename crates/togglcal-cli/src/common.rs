//! Output formatting helpers shared by the commands.

use chrono::{DateTime, Local, Utc};

/// Render an instant in the machine's local timezone.
pub fn format_local(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Render a span of seconds as `HH:MM:SS`.
pub fn format_duration(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Section divider for command output.
pub fn separator() -> String {
    "-".repeat(70)
}
