//! Google Calendar session.
//!
//! Wraps the Calendar v3 REST API behind the [`CalendarApi`] trait.
//! OAuth client credentials and tokens live in the OS keyring; access
//! tokens are refreshed transparently when expired.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use super::keyring_store;
use super::oauth::{self, OAuthConfig};
use crate::error::{AuthError, CalendarError, Result};
use crate::sync::types::{CalendarApi, CalendarEvent, CalendarListing, EventDraft};

const BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
const SERVICE: &str = "google";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
const REDIRECT_PORT: u16 = 19822;
const TIMEOUT_SECS: u64 = 30;

pub struct GoogleCalendarClient {
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    base_url: String,
    client_id: String,
    client_secret: String,
    /// Bypasses the keyring token flow; test builds only.
    #[cfg(test)]
    static_token: Option<String>,
}

impl GoogleCalendarClient {
    /// Produce an authenticated session handle. Fails when no tokens are
    /// stored for the Google service.
    pub fn connect() -> Result<Self> {
        if !Self::is_authenticated() {
            return Err(AuthError::NotAuthenticated { service: SERVICE }.into());
        }

        let client_id = keyring_store::get("google_client_id")?.unwrap_or_default();
        let client_secret = keyring_store::get("google_client_secret")?.unwrap_or_default();

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(CalendarError::Network)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            http,
            runtime,
            base_url: BASE_URL.to_string(),
            client_id,
            client_secret,
            #[cfg(test)]
            static_token: None,
        })
    }

    /// Persist OAuth client credentials to the OS keyring.
    pub fn set_credentials(client_id: &str, client_secret: &str) -> std::result::Result<(), AuthError> {
        keyring_store::set("google_client_id", client_id)?;
        keyring_store::set("google_client_secret", client_secret)?;
        Ok(())
    }

    /// Whether tokens are stored for the Google service.
    pub fn is_authenticated() -> bool {
        oauth::load_tokens(SERVICE).is_some()
    }

    /// Run the browser authorization flow and store the tokens.
    pub fn authorize() -> std::result::Result<(), AuthError> {
        let client_id = keyring_store::get("google_client_id")?.unwrap_or_default();
        let client_secret = keyring_store::get("google_client_secret")?.unwrap_or_default();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(AuthError::CredentialsNotConfigured { service: SERVICE });
        }

        let config = oauth_config(&client_id, &client_secret);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AuthError::AuthorizationFailed(e.to_string()))?;
        runtime.block_on(oauth::authorize(&config))?;
        Ok(())
    }

    /// Remove stored tokens.
    pub fn disconnect() -> std::result::Result<(), AuthError> {
        keyring_store::delete(SERVICE)
    }

    /// A valid access token, refreshing if the stored one expired.
    fn access_token(&self) -> std::result::Result<String, AuthError> {
        #[cfg(test)]
        if let Some(token) = &self.static_token {
            return Ok(token.clone());
        }

        let tokens =
            oauth::load_tokens(SERVICE).ok_or(AuthError::NotAuthenticated { service: SERVICE })?;

        if !oauth::is_expired(&tokens) {
            return Ok(tokens.access_token);
        }

        let refresh = tokens
            .refresh_token
            .as_deref()
            .ok_or_else(|| AuthError::TokenRefreshFailed("no refresh token stored".into()))?;

        let config = oauth_config(&self.client_id, &self.client_secret);
        let refreshed = self.runtime.block_on(oauth::refresh_token(&config, refresh))?;
        Ok(refreshed.access_token)
    }

    fn url_for(&self, segments: &[&str]) -> std::result::Result<url::Url, CalendarError> {
        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| CalendarError::Decode(format!("invalid base url: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| CalendarError::Decode("base url cannot hold a path".into()))?;
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// GET a calendar API route, mapping non-success responses and error
    /// payloads to [`CalendarError::Api`].
    fn get_json(
        &self,
        url: url::Url,
        query: &[(&str, String)],
    ) -> std::result::Result<serde_json::Value, CalendarError> {
        let token = self.access_token()?;
        let response = self.runtime.block_on(async {
            self.http
                .get(url)
                .query(query)
                .bearer_auth(&token)
                .send()
                .await
        })?;
        self.decode(response)
    }

    fn post_json(
        &self,
        url: url::Url,
        body: &serde_json::Value,
    ) -> std::result::Result<serde_json::Value, CalendarError> {
        let token = self.access_token()?;
        let response = self.runtime.block_on(async {
            self.http
                .post(url)
                .bearer_auth(&token)
                .json(body)
                .send()
                .await
        })?;
        self.decode(response)
    }

    fn decode(
        &self,
        response: reqwest::Response,
    ) -> std::result::Result<serde_json::Value, CalendarError> {
        let status = response.status();
        if !status.is_success() {
            let message = self
                .runtime
                .block_on(response.text())
                .unwrap_or_else(|_| "<no body>".into());
            return Err(CalendarError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = self
            .runtime
            .block_on(response.json())
            .map_err(|e| CalendarError::Decode(e.to_string()))?;

        if let Some(error) = body.get("error") {
            return Err(CalendarError::Api {
                status: status.as_u16(),
                message: error.to_string(),
            });
        }
        Ok(body)
    }
}

impl CalendarApi for GoogleCalendarClient {
    fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> std::result::Result<Vec<CalendarEvent>, CalendarError> {
        let url = self.url_for(&["calendars", calendar_id, "events"])?;
        let body = self.get_json(
            url,
            &[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".into()),
                ("orderBy", "startTime".into()),
            ],
        )?;

        let items = body["items"].as_array().cloned().unwrap_or_default();
        let mut events = Vec::with_capacity(items.len());
        for item in &items {
            match parse_event(item, calendar_id) {
                Some(event) => events.push(event),
                None => {
                    tracing::warn!(
                        event_id = item["id"].as_str().unwrap_or("<unknown>"),
                        "calendar event without usable times skipped"
                    );
                }
            }
        }
        Ok(events)
    }

    fn insert_event(
        &self,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> std::result::Result<CalendarEvent, CalendarError> {
        let url = self.url_for(&["calendars", calendar_id, "events"])?;
        let body = json!({
            "summary": draft.summary,
            "start": {"dateTime": draft.start.to_rfc3339()},
            "end": {"dateTime": draft.end.to_rfc3339()},
        });

        let created = self.post_json(url, &body)?;
        parse_event(&created, calendar_id)
            .ok_or_else(|| CalendarError::Decode("insert response missing event times".into()))
    }

    fn list_calendars(&self) -> std::result::Result<Vec<CalendarListing>, CalendarError> {
        let url = self.url_for(&["users", "me", "calendarList"])?;
        let body = self.get_json(url, &[])?;

        let items = body["items"].as_array().cloned().unwrap_or_default();
        Ok(items
            .iter()
            .map(|item| CalendarListing {
                id: item["id"].as_str().unwrap_or_default().to_string(),
                summary: item["summary"].as_str().unwrap_or_default().to_string(),
                primary: item["primary"].as_bool().unwrap_or(false),
            })
            .collect())
    }
}

fn oauth_config(client_id: &str, client_secret: &str) -> OAuthConfig {
    OAuthConfig {
        service_name: SERVICE.to_string(),
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
        auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
        token_url: "https://oauth2.googleapis.com/token".to_string(),
        scopes: vec![CALENDAR_SCOPE.to_string()],
        redirect_port: REDIRECT_PORT,
    }
}

/// Parse one API event. Timed events carry `dateTime`; all-day events
/// carry a bare `date`, read as midnight UTC.
fn parse_event(item: &serde_json::Value, calendar_id: &str) -> Option<CalendarEvent> {
    let start = parse_event_time(&item["start"])?;
    let end = parse_event_time(&item["end"])?;
    Some(CalendarEvent {
        id: item["id"].as_str().unwrap_or_default().to_string(),
        summary: item["summary"].as_str().unwrap_or_default().to_string(),
        start,
        end,
        calendar_id: calendar_id.to_string(),
        is_existing: false,
    })
}

fn parse_event_time(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    if let Some(raw) = value["dateTime"].as_str() {
        return DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
    }
    let raw = value["date"].as_str()?;
    let date = raw.parse::<NaiveDate>().ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}
