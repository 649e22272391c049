//! Types shared by the provider, the controller and the view

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A selectable currency: either a built-in crypto asset or a loaded fiat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Canonical id sent to the service (`bitcoin`, `usd`, ...)
    pub id: String,
    /// Display name
    pub name: String,
    /// Ticker symbol shown on the picker button
    pub symbol: String,
    /// Icon reference
    pub icon: String,
    /// Whether this entry is a crypto asset
    pub is_crypto: bool,
}

impl Coin {
    /// Create a crypto entry
    pub fn crypto(id: &str, name: &str, symbol: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            icon: icon.to_string(),
            is_crypto: true,
        }
    }

    /// Label used in dropdown lists
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

impl From<&Currency> for Coin {
    fn from(currency: &Currency) -> Self {
        Self {
            id: currency.code.clone(),
            name: currency.name.clone(),
            symbol: currency.code.to_uppercase(),
            icon: crate::constants::FIAT_ICON.to_string(),
            is_crypto: false,
        }
    }
}

/// Fiat currency as listed by `/api/currencies`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Currency {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            symbol: None,
            kind: None,
        }
    }
}

/// Price and 24h statistics for one coin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Price in the requested currency
    #[serde(default, deserialize_with = "null_as_zero")]
    pub price: f64,
    /// 24h change percentage
    #[serde(default, deserialize_with = "null_as_zero")]
    pub change: f64,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl PriceQuote {
    pub fn new(price: f64, change: f64) -> Self {
        Self {
            price,
            change,
            market_cap: None,
            volume: None,
        }
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// One successful `/api/prices` answer
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSnapshot {
    /// Quotes keyed by coin id
    pub quotes: HashMap<String, PriceQuote>,
    /// Server-side timestamp of the data
    pub timestamp: NaiveDateTime,
}

/// Rate and result returned by `/api/convert`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub result: f64,
    pub rate: f64,
}

/// Parameters of a conversion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl ConversionRequest {
    pub fn new(from: &str, to: &str, amount: f64) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        }
    }

    /// Unit request used for the live rate line
    pub fn unit(from: &str, to: &str) -> Self {
        Self::new(from, to, 1.0)
    }
}

/// Entry returned by `/api/search_coins`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinSearchResult {
    pub id: String,
    pub name: String,
    pub symbol: String,
}

impl CoinSearchResult {
    /// `Name (SYMBOL)` label used for the tracked-coin line
    pub fn tracking_label(&self) -> String {
        format!("{} ({})", self.name, self.symbol.to_uppercase())
    }
}

/// Body of `/api/update_config`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigUpdate {
    pub primary_currency: String,
    pub tracking_coin: String,
}

/// Server-side configuration returned by `/api/get_config`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    pub primary_currency: String,
    pub tracking_coin: String,
    #[serde(default)]
    pub api_provider: Option<String>,
    #[serde(default)]
    pub refresh_interval: Option<u64>,
}

/// A completed conversion kept in the history panel
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRecord {
    pub from_symbol: String,
    pub to_symbol: String,
    pub amount: f64,
    pub result: f64,
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

/// Colour scheme of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Get all themes in selector order
    pub fn all() -> &'static [Theme] {
        &[Theme::Dark, Theme::Light]
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    Converter,
    Settings,
}

impl Tab {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "home" => Some(Tab::Home),
            "converter" => Some(Tab::Converter),
            "settings" => Some(Tab::Settings),
            _ => None,
        }
    }
}

/// Phase of the polling controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A price request is in flight
    Fetching,
    /// Waiting for the countdown to expire
    CoolingDown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_tolerates_nulls_and_missing_extras() {
        let quote: PriceQuote =
            serde_json::from_str(r#"{"price": 64000, "change": null}"#).unwrap();
        assert_eq!(quote, PriceQuote::new(64000.0, 0.0));

        let quote: PriceQuote = serde_json::from_str(
            r#"{"price": 1.0, "change": -0.5, "market_cap": 1e9, "volume": 3.5e7}"#,
        )
        .unwrap();
        assert_eq!(quote.market_cap, Some(1e9));
        assert_eq!(quote.volume, Some(3.5e7));
    }

    #[test]
    fn test_fiat_currency_maps_to_coin() {
        let coin = Coin::from(&Currency::new("eur", "Euro"));
        assert_eq!(coin.id, "eur");
        assert_eq!(coin.symbol, "EUR");
        assert!(!coin.is_crypto);
        assert_eq!(coin.option_label(), "Euro (EUR)");
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(Theme::parse(" Light "), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_tracking_label_uppercases_symbol() {
        let result = CoinSearchResult {
            id: "bitcoin-cash".into(),
            name: "Bitcoin Cash".into(),
            symbol: "bch".into(),
        };
        assert_eq!(result.tracking_label(), "Bitcoin Cash (BCH)");
    }
}
