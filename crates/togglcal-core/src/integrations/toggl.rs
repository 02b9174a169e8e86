//! Toggl Track client.
//!
//! Completed entries come from the Reports API v2 `/details` endpoint;
//! the running timer and the stop action use the Track API v9. Both use
//! HTTP basic auth with the API token as the username and the literal
//! string `api_token` as the password.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::config::Settings;
use crate::error::{Result, SourceError};
use crate::sync::types::{RunningEntry, TimeEntry};

const REPORTS_URL: &str = "https://api.track.toggl.com/reports/api/v2";
const TRACK_URL: &str = "https://api.track.toggl.com/api/v9";
const USER_AGENT: &str = "toggl-calendar-connector";
const TIMEOUT_SECS: u64 = 30;

pub struct TogglClient {
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    api_token: String,
    workspace_id: String,
    reports_url: String,
    track_url: String,
}

#[derive(Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    data: Vec<DetailsEntry>,
}

#[derive(Deserialize)]
struct DetailsEntry {
    description: Option<String>,
    start: Option<String>,
    /// Null while the entry is still running.
    end: Option<String>,
    project: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct CurrentEntry {
    id: i64,
    workspace_id: i64,
    description: Option<String>,
    start: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    billable: bool,
}

impl TogglClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::with_base_urls(settings, REPORTS_URL, TRACK_URL)
    }

    pub fn with_base_urls(
        settings: &Settings,
        reports_url: impl Into<String>,
        track_url: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(SourceError::Network)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            http,
            runtime,
            api_token: settings.toggl_api_token.clone(),
            workspace_id: settings.toggl_workspace_id.clone(),
            reports_url: reports_url.into(),
            track_url: track_url.into(),
        })
    }

    /// Completed entries in the inclusive date range, normalized and in
    /// report order. Entries still running (no end instant) are excluded.
    pub fn time_entries(
        &self,
        since: NaiveDate,
        until: NaiveDate,
    ) -> std::result::Result<Vec<TimeEntry>, SourceError> {
        let url = format!("{}/details", self.reports_url);
        let since = since.format("%Y-%m-%d").to_string();
        let until = until.format("%Y-%m-%d").to_string();

        let response = self.runtime.block_on(async {
            self.http
                .get(&url)
                .basic_auth(&self.api_token, Some("api_token"))
                .query(&[
                    ("workspace_id", self.workspace_id.as_str()),
                    ("since", since.as_str()),
                    ("until", until.as_str()),
                    ("user_agent", USER_AGENT),
                ])
                .send()
                .await
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = self
                .runtime
                .block_on(response.text())
                .unwrap_or_else(|_| "<no body>".into());
            return Err(SourceError::Unavailable {
                status: status.as_u16(),
                message,
            });
        }

        let details: DetailsResponse = self
            .runtime
            .block_on(response.json())
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        let mut entries = Vec::with_capacity(details.data.len());
        for item in details.data {
            let Some(end) = item.end else {
                // Still running; not a sync candidate.
                continue;
            };
            let Some(start) = item.start else {
                tracing::warn!("report entry without start instant skipped");
                continue;
            };
            entries.push(TimeEntry {
                description: item.description.unwrap_or_default(),
                start: parse_instant(&start)?,
                end: parse_instant(&end)?,
                project: item.project.unwrap_or_default(),
                tags: item.tags,
            });
        }

        tracing::debug!(count = entries.len(), "time entries fetched");
        Ok(entries)
    }

    /// The currently running entry, if a timer is active.
    pub fn current_entry(&self) -> std::result::Result<Option<RunningEntry>, SourceError> {
        let url = format!("{}/me/time_entries/current", self.track_url);

        let response = self.runtime.block_on(async {
            self.http
                .get(&url)
                .basic_auth(&self.api_token, Some("api_token"))
                .send()
                .await
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = self
                .runtime
                .block_on(response.text())
                .unwrap_or_else(|_| "<no body>".into());
            return Err(SourceError::Unavailable {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = self
            .runtime
            .block_on(response.json())
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        if body.is_null() {
            return Ok(None);
        }

        let current: CurrentEntry =
            serde_json::from_value(body).map_err(|e| SourceError::Decode(e.to_string()))?;

        Ok(Some(RunningEntry {
            id: current.id,
            workspace_id: current.workspace_id,
            description: current.description.unwrap_or_default(),
            start: parse_instant(&current.start)?,
            project: String::new(),
            tags: current.tags.unwrap_or_default(),
            billable: current.billable,
        }))
    }

    /// Stop the given running entry.
    pub fn stop_entry(&self, entry: &RunningEntry) -> std::result::Result<(), SourceError> {
        let url = format!(
            "{}/workspaces/{}/time_entries/{}/stop",
            self.track_url, entry.workspace_id, entry.id
        );

        let response = self.runtime.block_on(async {
            self.http
                .patch(&url)
                .basic_auth(&self.api_token, Some("api_token"))
                .send()
                .await
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = self
                .runtime
                .block_on(response.text())
                .unwrap_or_else(|_| "<no body>".into());
            return Err(SourceError::Unavailable {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

fn parse_instant(raw: &str) -> std::result::Result<DateTime<Utc>, SourceError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SourceError::Decode(format!("invalid timestamp '{raw}': {e}")))
}
