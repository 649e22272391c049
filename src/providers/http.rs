//! HTTP implementation of the dashboard API

use crate::{
    config::DashboardConfig,
    constants::{
        CONVERT_ENDPOINT, CURRENCIES_ENDPOINT, GET_CONFIG_ENDPOINT, PRICES_ENDPOINT,
        SEARCH_COINS_ENDPOINT, UPDATE_CONFIG_ENDPOINT, USER_AGENT,
    },
    error::ApiError,
    provider::DashboardApi,
    types::{
        CoinSearchResult, ConfigUpdate, Conversion, ConversionRequest, Currency, PriceQuote,
        PriceSnapshot, ServerConfig,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// `/api/prices` response
#[derive(Debug, Deserialize)]
struct PricesResponse {
    success: bool,
    #[serde(default)]
    data: HashMap<String, PriceQuote>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// `/api/convert` response
#[derive(Debug, Deserialize)]
struct ConvertResponse {
    success: bool,
    #[serde(default)]
    result: Option<f64>,
    #[serde(default)]
    rate: Option<f64>,
    #[serde(default)]
    error: Option<String>,
}

/// `/api/currencies` response
#[derive(Debug, Deserialize)]
struct CurrenciesResponse {
    success: bool,
    #[serde(default)]
    currencies: Vec<Currency>,
    #[serde(default)]
    error: Option<String>,
}

/// `/api/search_coins` response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    success: bool,
    #[serde(default)]
    results: Vec<CoinSearchResult>,
    #[serde(default)]
    error: Option<String>,
}

/// `/api/update_config` and `/api/get_config` response
#[derive(Debug, Deserialize)]
struct ConfigResponse {
    success: bool,
    #[serde(default)]
    config: Option<ServerConfig>,
    #[serde(default)]
    error: Option<String>,
}

/// Dashboard API over HTTP/JSON
pub struct HttpDashboardApi {
    client: Client,
    base_url: String,
}

impl HttpDashboardApi {
    /// Creates a new HTTP API client
    ///
    /// No request timeout is applied unless the config sets one.
    pub fn new(config: &DashboardConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ApiError::NetworkError)?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn prices_request(&self, vs_currency: &str) -> RequestBuilder {
        self.client
            .get(self.url(PRICES_ENDPOINT))
            .query(&[("vs_currency", vs_currency)])
    }

    fn convert_request(&self, request: &ConversionRequest) -> RequestBuilder {
        self.client.post(self.url(CONVERT_ENDPOINT)).json(request)
    }

    fn search_request(&self, query: &str, limit: usize) -> RequestBuilder {
        self.client
            .get(self.url(SEARCH_COINS_ENDPOINT))
            .query(&[("q", query), ("limit", limit.to_string().as_str())])
    }

    fn update_config_request(&self, update: &ConfigUpdate) -> RequestBuilder {
        self.client.post(self.url(UPDATE_CONFIG_ENDPOINT)).json(update)
    }

    /// Sends a request and decodes the JSON body
    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        tracing::debug!(endpoint = endpoint, "Calling dashboard API");

        let response = request.send().await.map_err(ApiError::NetworkError)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let response_text = response.text().await.map_err(ApiError::NetworkError)?;
        decode(endpoint, &response_text)
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        ApiError::InvalidResponse(format!(
            "Failed to parse {} response: {}. Response: {}",
            endpoint, e, body
        ))
    })
}

/// Parses the service timestamp, which is an ISO string with or without offset
fn parse_timestamp(raw: Option<&str>) -> NaiveDateTime {
    let parsed = raw.and_then(|ts| {
        ts.parse::<NaiveDateTime>()
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(ts).ok().map(|dt| dt.naive_local()))
    });

    match parsed {
        Some(ts) => ts,
        None => {
            tracing::warn!(timestamp = ?raw, "Unparseable price timestamp, using local time");
            chrono::Local::now().naive_local()
        }
    }
}

fn prices_from(response: PricesResponse) -> Result<PriceSnapshot, ApiError> {
    if !response.success {
        return Err(ApiError::rejected(response.error));
    }
    Ok(PriceSnapshot {
        quotes: response.data,
        timestamp: parse_timestamp(response.timestamp.as_deref()),
    })
}

fn conversion_from(response: ConvertResponse) -> Result<Conversion, ApiError> {
    if !response.success {
        return Err(ApiError::rejected(response.error));
    }
    match (response.result, response.rate) {
        (Some(result), Some(rate)) => Ok(Conversion { result, rate }),
        _ => Err(ApiError::invalid_response(
            "Conversion response is missing result or rate",
        )),
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn fetch_prices(&self, vs_currency: &str) -> Result<PriceSnapshot, ApiError> {
        let request = self.prices_request(vs_currency);
        let response: PricesResponse = self.send(PRICES_ENDPOINT, request).await?;
        prices_from(response)
    }

    async fn convert(&self, request: &ConversionRequest) -> Result<Conversion, ApiError> {
        let response: ConvertResponse = self
            .send(CONVERT_ENDPOINT, self.convert_request(request))
            .await?;
        conversion_from(response)
    }

    async fn fetch_currencies(&self) -> Result<Vec<Currency>, ApiError> {
        let request = self.client.get(self.url(CURRENCIES_ENDPOINT));
        let response: CurrenciesResponse = self.send(CURRENCIES_ENDPOINT, request).await?;
        if !response.success {
            return Err(ApiError::rejected(response.error));
        }
        Ok(response.currencies)
    }

    async fn search_coins(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CoinSearchResult>, ApiError> {
        let request = self.search_request(query, limit);
        let response: SearchResponse = self.send(SEARCH_COINS_ENDPOINT, request).await?;
        if !response.success {
            return Err(ApiError::rejected(response.error));
        }
        Ok(response.results)
    }

    async fn update_config(&self, update: &ConfigUpdate) -> Result<(), ApiError> {
        let request = self.update_config_request(update);
        let response: ConfigResponse = self.send(UPDATE_CONFIG_ENDPOINT, request).await?;
        if !response.success {
            return Err(ApiError::rejected(response.error));
        }
        Ok(())
    }

    async fn fetch_config(&self) -> Result<ServerConfig, ApiError> {
        let request = self.client.get(self.url(GET_CONFIG_ENDPOINT));
        let response: ConfigResponse = self.send(GET_CONFIG_ENDPOINT, request).await?;
        if !response.success {
            return Err(ApiError::rejected(response.error));
        }
        response
            .config
            .ok_or_else(|| ApiError::invalid_response("Config response has no config"))
    }

    fn provider_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_without_double_slash() {
        let config = DashboardConfig {
            api_base_url: "http://localhost:5000/".into(),
            ..DashboardConfig::default()
        };
        let api = HttpDashboardApi::new(&config).unwrap();
        assert_eq!(api.url(PRICES_ENDPOINT), "http://localhost:5000/api/prices");
    }

    #[test]
    fn test_prices_response() {
        let body = r#"{
            "success": true,
            "data": {
                "bitcoin": {"price": 64000.5, "change": 1.25, "market_cap": 1.2e12, "volume": 3.1e10},
                "tether": {"price": 0.9999, "change": -0.01}
            },
            "timestamp": "2024-05-01T14:03:09.123456",
            "vs_currency": "usd"
        }"#;
        let snapshot = prices_from(decode(PRICES_ENDPOINT, body).unwrap()).unwrap();

        assert_eq!(snapshot.quotes.len(), 2);
        assert_eq!(snapshot.quotes["bitcoin"].price, 64000.5);
        assert_eq!(snapshot.quotes["tether"].change, -0.01);
        assert_eq!(snapshot.timestamp.format("%H:%M:%S").to_string(), "14:03:09");
    }

    #[test]
    fn test_rejected_conversion_carries_error() {
        let body = r#"{"success": false, "error": "Conversion failed - check currency codes"}"#;
        let err = conversion_from(decode(CONVERT_ENDPOINT, body).unwrap()).unwrap_err();
        assert_eq!(
            err.service_message(),
            Some("Conversion failed - check currency codes")
        );
    }

    #[test]
    fn test_conversion_response() {
        let body = r#"{"success": true, "from": "bitcoin", "to": "usd", "amount": 2, "result": 128000.0, "rate": 64000.0}"#;
        let conversion = conversion_from(decode(CONVERT_ENDPOINT, body).unwrap()).unwrap();
        assert_eq!(conversion, Conversion { result: 128000.0, rate: 64000.0 });
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = decode::<ConvertResponse>(CONVERT_ENDPOINT, "<html>").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_currencies_and_search_payloads() {
        let body = r#"{"success": true, "currencies": [{"code": "usd", "name": "US Dollar", "symbol": "$", "type": "fiat"}]}"#;
        let response: CurrenciesResponse = decode(CURRENCIES_ENDPOINT, body).unwrap();
        assert_eq!(response.currencies[0].code, "usd");
        assert_eq!(response.currencies[0].kind.as_deref(), Some("fiat"));

        let body = r#"{"success": true, "results": [{"id": "bitcoin", "name": "Bitcoin", "symbol": "btc"}]}"#;
        let response: SearchResponse = decode(SEARCH_COINS_ENDPOINT, body).unwrap();
        assert_eq!(response.results[0].symbol, "btc");
    }

    #[test]
    fn test_timestamp_fallbacks() {
        let ts = parse_timestamp(Some("2024-05-01T14:03:09+00:00"));
        assert_eq!(ts.format("%H:%M:%S").to_string(), "14:03:09");

        // garbage falls back to now rather than failing the refresh
        let before = chrono::Local::now().naive_local();
        let fallback = parse_timestamp(Some("yesterday"));
        let missing = parse_timestamp(None);
        let after = chrono::Local::now().naive_local();
        assert!(before <= fallback && fallback <= after);
        assert!(before <= missing && missing <= after);
    }

    fn api() -> HttpDashboardApi {
        HttpDashboardApi::new(&DashboardConfig::default()).unwrap()
    }

    fn json_body(request: &reqwest::Request) -> serde_json::Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_prices_query() {
        let request = api().prices_request("eur").build().unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/api/prices");
        assert_eq!(request.url().query(), Some("vs_currency=eur"));
    }

    #[test]
    fn test_search_query() {
        let request = api().search_request("bit", 10).build().unwrap();
        assert_eq!(request.url().path(), "/api/search_coins");
        assert_eq!(request.url().query(), Some("q=bit&limit=10"));
    }

    #[test]
    fn test_convert_body() {
        let conversion = ConversionRequest::new("bitcoin", "usd", 0.5);
        assert_eq!(
            serde_json::to_value(&conversion).unwrap(),
            serde_json::json!({"from": "bitcoin", "to": "usd", "amount": 0.5})
        );

        let request = api().convert_request(&conversion).build().unwrap();
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/api/convert");
        assert_eq!(
            json_body(&request),
            serde_json::json!({"from": "bitcoin", "to": "usd", "amount": 0.5})
        );
    }

    #[test]
    fn test_update_config_body() {
        let update = ConfigUpdate {
            primary_currency: "eur".into(),
            tracking_coin: "solana".into(),
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"primary_currency": "eur", "tracking_coin": "solana"})
        );

        let request = api().update_config_request(&update).build().unwrap();
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/api/update_config");
        assert_eq!(
            json_body(&request),
            serde_json::json!({"primary_currency": "eur", "tracking_coin": "solana"})
        );
    }
}
