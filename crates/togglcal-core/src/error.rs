//! Error types for togglcal-core.
//!
//! One thiserror enum per concern, rolled up into [`CoreError`] for the
//! CLI boundary. Fatal categories (config, auth, source, validation)
//! abort a run; calendar errors are recovered per entry by the sync
//! engine and only surface here when a whole batch fails.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for togglcal-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authentication / token refresh errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Time-entry source errors
    #[error("Time entry source error: {0}")]
    Source(#[from] SourceError),

    /// Calendar service errors
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load the configuration file
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save the configuration file
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(&'static str),
}

/// Authentication and token-refresh errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// OAuth client credentials not stored yet
    #[error("OAuth credentials not configured for {service}")]
    CredentialsNotConfigured { service: &'static str },

    /// No stored tokens for the service
    #[error("Not authenticated with {service}")]
    NotAuthenticated { service: &'static str },

    /// Browser authorization failed
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Code-for-token exchange failed
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Refresh-token flow failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Malformed OAuth callback request
    #[error("Invalid OAuth callback: {0}")]
    InvalidCallback(String),

    /// Keyring read/write failed
    #[error("Keyring error: {0}")]
    Keyring(String),
}

impl From<keyring::Error> for AuthError {
    fn from(err: keyring::Error) -> Self {
        AuthError::Keyring(err.to_string())
    }
}

/// Time-entry source (Toggl) errors. All fatal: with no entries there is
/// nothing to sync.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source responded but not with entries
    #[error("Time entry source unavailable (status {status}): {message}")]
    Unavailable { status: u16, message: String },

    /// Network-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Unexpected response shape
    #[error("Malformed source response: {0}")]
    Decode(String),
}

/// Calendar service errors. A single query or insert failure is recovered
/// at per-entry granularity by the sync engine.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// The calendar API returned an error payload
    #[error("Calendar API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level failure (includes timeouts)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Unexpected response shape
    #[error("Malformed calendar response: {0}")]
    Decode(String),

    /// Token could not be obtained for the call
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Validation errors for CLI-supplied arguments.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// --days combined with explicit dates
    #[error("Cannot combine --days with --start-date/--end-date")]
    ConflictingDateArguments,

    /// Range end precedes range start
    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// Unparseable or out-of-domain value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
