use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "togglcal", version, about = "Sync Toggl time entries to Google Calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync time entries for a date range into the calendar
    Sync(commands::sync::SyncArgs),
    /// Show the currently running Toggl timer
    Current(commands::current::CurrentArgs),
    /// List calendars and pick the sync target
    Calendars(commands::calendars::CalendarsArgs),
    /// Google authentication
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Show version info
    Version,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Sync(args) => commands::sync::run(args),
        Commands::Current(args) => commands::current::run(args),
        Commands::Calendars(args) => commands::calendars::run(args),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Version => commands::version::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
