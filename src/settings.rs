//! Settings panel state: coin search and the pending tracked coin

use crate::{
    constants::DEFAULT_TRACKING_COIN,
    error::DashboardError,
    types::{CoinSearchResult, ConfigUpdate},
};

/// Outcome of the last coin search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResults {
    /// Nothing searched yet, or results were dismissed
    Hidden,
    /// Search answered with no matches
    Empty,
    Found(Vec<CoinSearchResult>),
}

impl SearchResults {
    /// Rows the result list shows
    pub fn lines(&self) -> Vec<String> {
        match self {
            SearchResults::Hidden => Vec::new(),
            SearchResults::Empty => vec!["No coins found".to_string()],
            SearchResults::Found(results) => results
                .iter()
                .map(|r| format!("{} {}", r.name, r.symbol.to_uppercase()))
                .collect(),
        }
    }
}

/// Inputs of the settings panel
#[derive(Debug, Clone)]
pub struct SettingsState {
    /// Text of the coin search field
    pub search_query: String,
    pub results: SearchResults,
    /// "Currently tracking" line
    pub tracking_label: String,
    /// Currency chosen in the settings dropdown
    pub primary_currency: String,
}

impl SettingsState {
    pub fn new(primary_currency: &str, tracking_coin: &str) -> Self {
        Self {
            search_query: String::new(),
            results: SearchResults::Hidden,
            tracking_label: capitalize(tracking_coin),
            primary_currency: primary_currency.to_string(),
        }
    }

    /// Trimmed query, rejected when empty
    pub fn query(&self) -> Result<&str, DashboardError> {
        let query = self.search_query.trim();
        if query.is_empty() {
            return Err(DashboardError::EmptySearchQuery);
        }
        Ok(query)
    }

    pub fn show_results(&mut self, results: Vec<CoinSearchResult>) {
        self.results = if results.is_empty() {
            SearchResults::Empty
        } else {
            SearchResults::Found(results)
        };
    }

    /// Picks a search result: fills the search field with its id and updates
    /// the tracked-coin label. Nothing is persisted.
    pub fn select_result(&mut self, index: usize) -> Result<CoinSearchResult, DashboardError> {
        let chosen = match &self.results {
            SearchResults::Found(results) => results.get(index).cloned(),
            _ => None,
        }
        .ok_or(DashboardError::UnknownSearchResult(index))?;

        self.search_query = chosen.id.clone();
        self.tracking_label = chosen.tracking_label();
        self.results = SearchResults::Hidden;
        Ok(chosen)
    }

    /// Payload for the save action; an empty search field means bitcoin
    pub fn config_update(&self) -> ConfigUpdate {
        let tracking = self.search_query.trim();
        ConfigUpdate {
            primary_currency: self.primary_currency.clone(),
            tracking_coin: if tracking.is_empty() {
                DEFAULT_TRACKING_COIN.to_string()
            } else {
                tracking.to_string()
            },
        }
    }
}

/// `bitcoin` -> `Bitcoin`
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<CoinSearchResult> {
        vec![
            CoinSearchResult {
                id: "bitcoin".into(),
                name: "Bitcoin".into(),
                symbol: "btc".into(),
            },
            CoinSearchResult {
                id: "bitcoin-cash".into(),
                name: "Bitcoin Cash".into(),
                symbol: "bch".into(),
            },
        ]
    }

    #[test]
    fn test_empty_query_is_rejected() {
        let mut settings = SettingsState::new("usd", "bitcoin");
        assert_eq!(settings.query(), Err(DashboardError::EmptySearchQuery));
        settings.search_query = "   ".into();
        assert_eq!(settings.query(), Err(DashboardError::EmptySearchQuery));
        settings.search_query = " bit ".into();
        assert_eq!(settings.query(), Ok("bit"));
    }

    #[test]
    fn test_results_lines() {
        let mut settings = SettingsState::new("usd", "bitcoin");
        settings.show_results(results());
        assert_eq!(settings.results.lines(), vec!["Bitcoin BTC", "Bitcoin Cash BCH"]);

        settings.show_results(Vec::new());
        assert_eq!(settings.results.lines(), vec!["No coins found"]);
    }

    #[test]
    fn test_select_result_updates_field_and_label() {
        let mut settings = SettingsState::new("usd", "bitcoin");
        assert_eq!(settings.tracking_label, "Bitcoin");
        settings.show_results(results());

        let chosen = settings.select_result(1).unwrap();
        assert_eq!(chosen.id, "bitcoin-cash");
        assert_eq!(settings.search_query, "bitcoin-cash");
        assert_eq!(settings.tracking_label, "Bitcoin Cash (BCH)");
        assert_eq!(settings.results, SearchResults::Hidden);
        assert!(settings.select_result(0).is_err());
    }

    #[test]
    fn test_config_update_defaults_tracking_coin() {
        let mut settings = SettingsState::new("eur", "bitcoin");
        assert_eq!(settings.config_update().tracking_coin, "bitcoin");
        settings.search_query = "solana".into();
        let update = settings.config_update();
        assert_eq!(update.primary_currency, "eur");
        assert_eq!(update.tracking_coin, "solana");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("solana"), "Solana");
        assert_eq!(capitalize(""), "");
    }
}
