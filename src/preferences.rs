//! Key-value preference store persisted as a JSON file
//!
//! Plays the role browser local storage plays for a web page: a handful of
//! string entries that survive restarts.

use crate::{
    config::DashboardConfig, constants::THEME_PREFERENCE_KEY, error::DashboardError,
    types::Theme,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// String preferences, optionally backed by a file
#[derive(Debug, Default)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl PreferenceStore {
    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store at `path`; a missing file starts out empty
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DashboardError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                DashboardError::preferences(format!("{}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(DashboardError::preferences(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    /// Opens the file named by `config`, or an in-memory store when it names none
    pub fn from_config(config: &DashboardConfig) -> Result<Self, DashboardError> {
        match &config.preferences_path {
            Some(path) => Self::open(path),
            None => {
                tracing::warn!("No preferences location, theme will not be saved");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Sets `key` and writes the file through
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), DashboardError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn flush(&self) -> Result<(), DashboardError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| DashboardError::preferences(format!("{}: {}", parent.display(), e)))?;
        }
        let text = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| DashboardError::preferences(e.to_string()))?;
        fs::write(path, text)
            .map_err(|e| DashboardError::preferences(format!("{}: {}", path.display(), e)))
    }

    /// Saved theme, dark when unset or unrecognised
    pub fn theme(&self) -> Theme {
        self.get(THEME_PREFERENCE_KEY)
            .and_then(Theme::parse)
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), DashboardError> {
        self.set(THEME_PREFERENCE_KEY, theme.as_str())
    }
}
