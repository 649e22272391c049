//! # Coin Dashboard Client
//!
//! Client for a crypto price tracking and currency conversion service.
//! Shows live prices with an auto-refresh countdown, converts between
//! crypto and fiat currencies, and manages the tracked coin and primary
//! currency stored on the server.
//!
//! ## Usage
//!
//! The [`Dashboard`] controller owns all state and is driven by events.
//! Front ends post [`UiEvent`]s through its sender and draw the state with
//! a [`DashboardView`]:
//!
//! ```no_run
//! use coin_dashboard::{
//!     Dashboard, DashboardConfig, HttpDashboardApi, PreferenceStore, TerminalView,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DashboardConfig::default();
//! let api = Arc::new(HttpDashboardApi::new(&config)?);
//! let mut dashboard = Dashboard::new(api, &config, PreferenceStore::in_memory());
//!
//! let mut view = TerminalView::new(std::io::stdout());
//! dashboard.run(&mut view).await;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod constants;
pub mod converter;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod history;
pub mod notification;
pub mod picker;
pub mod preferences;
pub mod provider;
pub mod providers;
pub mod scheduler;
pub mod settings;
pub mod store;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::DashboardConfig;
pub use dashboard::{AppState, Dashboard, Event, UiEvent};
pub use error::{ApiError, DashboardError};
pub use preferences::PreferenceStore;
pub use provider::DashboardApi;
pub use providers::HttpDashboardApi;
pub use types::{
    Coin, CoinSearchResult, Conversion, ConversionRecord, Currency, PriceQuote, PriceSnapshot,
    Tab, Theme,
};
pub use view::{DashboardView, TerminalView};
