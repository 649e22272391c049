//! Abstraction over the dashboard service API

use crate::{
    error::ApiError,
    types::{
        CoinSearchResult, ConfigUpdate, Conversion, ConversionRequest, Currency, PriceSnapshot,
        ServerConfig,
    },
};
use async_trait::async_trait;

/// Remote API consumed by the dashboard
///
/// Implementations return `Err` both for transport failures and for
/// answers carrying `success: false`.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Fetches prices of the tracked coins denominated in `vs_currency`
    async fn fetch_prices(&self, vs_currency: &str) -> Result<PriceSnapshot, ApiError>;

    /// Converts `request.amount` units of `request.from` into `request.to`
    async fn convert(&self, request: &ConversionRequest) -> Result<Conversion, ApiError>;

    /// Lists the fiat currencies the service can convert to
    async fn fetch_currencies(&self) -> Result<Vec<Currency>, ApiError>;

    /// Searches coins by name or symbol
    ///
    /// # Arguments
    /// * `query` - Non-empty search text
    /// * `limit` - Maximum number of results
    async fn search_coins(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CoinSearchResult>, ApiError>;

    /// Persists the primary currency and tracked coin on the server
    async fn update_config(&self, update: &ConfigUpdate) -> Result<(), ApiError>;

    /// Reads the server-side configuration
    async fn fetch_config(&self) -> Result<ServerConfig, ApiError>;

    /// Returns the name of this API implementation
    fn provider_name(&self) -> &'static str;
}
