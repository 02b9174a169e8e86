//! Key-value configuration backed by a `.env`-style file.
//!
//! Holds the Toggl credentials and the selected target calendar. Values
//! in the file take precedence; process environment variables fill in
//! anything the file omits, so CI and one-off runs can avoid a file
//! entirely. The calendar selection is rewritten in place by
//! [`ConfigStore::save_calendar_id`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const TOGGL_API_TOKEN: &str = "TOGGL_API_TOKEN";
pub const TOGGL_WORKSPACE_ID: &str = "TOGGL_WORKSPACE_ID";
pub const GOOGLE_CALENDAR_ID: &str = "GOOGLE_CALENDAR_ID";

const DEFAULT_CALENDAR_ID: &str = "primary";

/// Resolved configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub toggl_api_token: String,
    pub toggl_workspace_id: String,
    pub google_calendar_id: String,
}

/// Loads and rewrites the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `.env` in the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(".env")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file (when present) merged over the process environment.
    /// Fails fast on missing Toggl credentials; the calendar id defaults
    /// to `"primary"`.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let file_values = self.read_file_values()?;

        let lookup = |key: &'static str| -> Option<String> {
            file_values
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
                .filter(|v| !v.is_empty())
        };

        let toggl_api_token =
            lookup(TOGGL_API_TOKEN).ok_or(ConfigError::MissingKey(TOGGL_API_TOKEN))?;
        let toggl_workspace_id =
            lookup(TOGGL_WORKSPACE_ID).ok_or(ConfigError::MissingKey(TOGGL_WORKSPACE_ID))?;
        let google_calendar_id =
            lookup(GOOGLE_CALENDAR_ID).unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string());

        Ok(Settings {
            toggl_api_token,
            toggl_workspace_id,
            google_calendar_id,
        })
    }

    /// The configured calendar id without requiring Toggl credentials.
    pub fn calendar_id(&self) -> Result<String, ConfigError> {
        let file_values = self.read_file_values()?;
        Ok(file_values
            .get(GOOGLE_CALENDAR_ID)
            .cloned()
            .or_else(|| std::env::var(GOOGLE_CALENDAR_ID).ok())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()))
    }

    /// Persist the calendar selection, replacing an existing
    /// `GOOGLE_CALENDAR_ID=` line or appending one. Other keys and their
    /// ordering are preserved.
    pub fn save_calendar_id(&self, calendar_id: &str) -> Result<(), ConfigError> {
        let existing = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(ConfigError::SaveFailed {
                    path: self.path.clone(),
                    message: err.to_string(),
                })
            }
        };

        let mut lines: Vec<String> = existing.lines().map(str::to_string).collect();
        let new_line = format!("{GOOGLE_CALENDAR_ID}={calendar_id}");

        match lines
            .iter()
            .position(|l| l.trim_start().starts_with(&format!("{GOOGLE_CALENDAR_ID}=")))
        {
            Some(idx) => lines[idx] = new_line,
            None => lines.push(new_line),
        }

        let mut content = lines.join("\n");
        content.push('\n');

        std::fs::write(&self.path, content).map_err(|err| ConfigError::SaveFailed {
            path: self.path.clone(),
            message: err.to_string(),
        })
    }

    fn read_file_values(&self) -> Result<HashMap<String, String>, ConfigError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let iter = dotenvy::from_path_iter(&self.path).map_err(|err| ConfigError::LoadFailed {
            path: self.path.clone(),
            message: err.to_string(),
        })?;

        let mut values = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|err| ConfigError::LoadFailed {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
            values.insert(key, value);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_env(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(".env");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_full_file() {
        let dir = TempDir::new().unwrap();
        let path = write_env(
            &dir,
            "TOGGL_API_TOKEN=tok\nTOGGL_WORKSPACE_ID=123\nGOOGLE_CALENDAR_ID=work@example.com\n",
        );
        let settings = ConfigStore::new(path).load().unwrap();
        assert_eq!(settings.toggl_api_token, "tok");
        assert_eq!(settings.toggl_workspace_id, "123");
        assert_eq!(settings.google_calendar_id, "work@example.com");
    }

    #[test]
    fn test_calendar_id_defaults_to_primary() {
        let dir = TempDir::new().unwrap();
        let path = write_env(&dir, "TOGGL_API_TOKEN=tok\nTOGGL_WORKSPACE_ID=123\n");
        let settings = ConfigStore::new(path).load().unwrap();
        assert_eq!(settings.google_calendar_id, "primary");
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_env(&dir, "TOGGL_WORKSPACE_ID=123\n");
        let err = ConfigStore::new(path).load().unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(TOGGL_API_TOKEN)));
    }

    #[test]
    fn test_save_rewrites_existing_key_in_place() {
        let dir = TempDir::new().unwrap();
        let path = write_env(
            &dir,
            "TOGGL_API_TOKEN=tok\nGOOGLE_CALENDAR_ID=old\nTOGGL_WORKSPACE_ID=123\n",
        );
        let store = ConfigStore::new(&path);
        store.save_calendar_id("new@example.com").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "TOGGL_API_TOKEN=tok");
        assert_eq!(lines[1], "GOOGLE_CALENDAR_ID=new@example.com");
        assert_eq!(lines[2], "TOGGL_WORKSPACE_ID=123");
    }

    #[test]
    fn test_save_appends_when_key_absent() {
        let dir = TempDir::new().unwrap();
        let path = write_env(&dir, "TOGGL_API_TOKEN=tok\n");
        let store = ConfigStore::new(&path);
        store.save_calendar_id("cal-1").unwrap();
        assert_eq!(store.calendar_id().unwrap(), "cal-1");
    }

    #[test]
    fn test_save_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        let store = ConfigStore::new(&path);
        store.save_calendar_id("cal-2").unwrap();
        assert!(path.exists());
        assert_eq!(store.calendar_id().unwrap(), "cal-2");
    }
}
