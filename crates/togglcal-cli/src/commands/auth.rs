//! Google authentication lifecycle.

use clap::Subcommand;

use togglcal_core::GoogleCalendarClient;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store OAuth credentials and run the browser flow
    Login {
        /// OAuth client ID from the Google Cloud console
        #[arg(long)]
        client_id: String,
        /// OAuth client secret
        #[arg(long)]
        client_secret: String,
    },
    /// Remove stored tokens
    Logout,
    /// Check authentication status
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login {
            client_id,
            client_secret,
        } => {
            GoogleCalendarClient::set_credentials(&client_id, &client_secret)?;
            GoogleCalendarClient::authorize()?;
            println!("Google authenticated");
        }
        AuthAction::Logout => {
            GoogleCalendarClient::disconnect()?;
            println!("Google disconnected");
        }
        AuthAction::Status => {
            println!(
                "{}",
                if GoogleCalendarClient::is_authenticated() {
                    "authenticated"
                } else {
                    "not authenticated"
                }
            );
        }
    }
    Ok(())
}
