//! Runtime configuration of the dashboard client

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_PRIMARY_CURRENCY, DEFAULT_REFRESH_INTERVAL_SECS,
    DEFAULT_TRACKING_COIN, SEARCH_RESULT_LIMIT,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the user's config dir holding the client's files
const CONFIG_DIR_NAME: &str = "coin-dashboard";

/// File name of the preference store
const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Errors raised when validating a [`DashboardConfig`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported URL scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("Search limit must be at least 1")]
    ZeroSearchLimit,

    #[error("Request timeout must be positive")]
    ZeroTimeout,
}

/// Preference file location below `config_dir`
pub fn preferences_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_DIR_NAME).join(PREFERENCES_FILE_NAME)
}

/// Per-user preference file, e.g. `~/.config/coin-dashboard/preferences.json`
///
/// None when the platform reports no config directory.
pub fn default_preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| preferences_path_in(&dir))
}

/// Settings the controller and HTTP client are built from
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Base URL of the dashboard service
    pub api_base_url: String,
    /// Auto-refresh interval in seconds, 0 disables it
    pub refresh_interval_secs: u64,
    /// Optional HTTP timeout; requests may hang forever when unset
    pub request_timeout_secs: Option<u64>,
    /// File backing the preference store; in-memory only when unset
    pub preferences_path: Option<PathBuf>,
    /// Primary currency used until the server config arrives
    pub primary_currency: String,
    /// Tracked coin used until the server config arrives
    pub tracking_coin: String,
    /// Result limit sent with coin searches
    pub search_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            request_timeout_secs: None,
            preferences_path: default_preferences_path(),
            primary_currency: DEFAULT_PRIMARY_CURRENCY.to_string(),
            tracking_coin: DEFAULT_TRACKING_COIN.to_string(),
            search_limit: SEARCH_RESULT_LIMIT,
        }
    }
}

impl DashboardConfig {
    /// Checks the values that would otherwise fail later at request time
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.api_base_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.api_base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }
        if self.search_limit == 0 {
            return Err(ConfigError::ZeroSearchLimit);
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.refresh_interval_secs, 30);
        assert_eq!(config.search_limit, 10);
        assert!(config.request_timeout_secs.is_none());
        assert_eq!(config.preferences_path, default_preferences_path());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_preferences_path_layout() {
        assert_eq!(
            preferences_path_in(Path::new("/home/ana/.config")),
            PathBuf::from("/home/ana/.config/coin-dashboard/preferences.json")
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = DashboardConfig {
            api_base_url: "ftp://example.com".into(),
            ..DashboardConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnsupportedScheme("ftp".into()))
        );

        let config = DashboardConfig {
            api_base_url: "not a url".into(),
            ..DashboardConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));

        let config = DashboardConfig {
            search_limit: 0,
            ..DashboardConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSearchLimit));

        let config = DashboardConfig {
            request_timeout_secs: Some(0),
            ..DashboardConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }
}
