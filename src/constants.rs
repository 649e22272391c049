//! Constants for the coin dashboard client
//!
//! Defaults live here; anything a user may change at runtime is carried by
//! [`DashboardConfig`](crate::config::DashboardConfig) and seeded from these.

use std::time::Duration;

/// Base URL of the dashboard service
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Auto-refresh interval applied on startup (in seconds)
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

/// Period of the countdown tick
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// How long a notification stays visible
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

/// Maximum number of conversions kept in the history panel
pub const HISTORY_CAPACITY: usize = 5;

/// Maximum number of results requested from the coin search endpoint
pub const SEARCH_RESULT_LIMIT: usize = 10;

/// Primary display currency before the server config is known
pub const DEFAULT_PRIMARY_CURRENCY: &str = "usd";

/// Tracked coin before the server config is known
pub const DEFAULT_TRACKING_COIN: &str = "bitcoin";

/// Default source currency of the converter
pub const DEFAULT_FROM_CURRENCY: &str = "bitcoin";

/// Default destination currency of the converter
pub const DEFAULT_TO_CURRENCY: &str = "usd";

/// Coin id rendered in the BTC price slot
pub const BTC_COIN_ID: &str = "bitcoin";

/// Coin id rendered in the USDT price slot
pub const USDT_COIN_ID: &str = "tether";

/// Preference key holding the theme
pub const THEME_PREFERENCE_KEY: &str = "theme";

/// Icon used for every fiat currency entry
pub const FIAT_ICON: &str = "fas fa-money-bill-wave";

/// Label shown in place of the countdown while auto-refresh is off
pub const COUNTDOWN_DISABLED_LABEL: &str = "--";

/// Endpoint paths of the dashboard service
pub const PRICES_ENDPOINT: &str = "/api/prices";
pub const CONVERT_ENDPOINT: &str = "/api/convert";
pub const CURRENCIES_ENDPOINT: &str = "/api/currencies";
pub const SEARCH_COINS_ENDPOINT: &str = "/api/search_coins";
pub const UPDATE_CONFIG_ENDPOINT: &str = "/api/update_config";
pub const GET_CONFIG_ENDPOINT: &str = "/api/get_config";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-dashboard/0.1.0";
