//! Currency catalog and the two converter dropdowns

use crate::{
    constants::{DEFAULT_FROM_CURRENCY, DEFAULT_TO_CURRENCY},
    error::DashboardError,
    types::{Coin, Currency},
};

/// Built-in crypto assets offered by both dropdowns
pub fn builtin_cryptos() -> Vec<Coin> {
    [
        ("bitcoin", "Bitcoin", "BTC", "fab fa-btc"),
        ("ethereum", "Ethereum", "ETH", "fab fa-ethereum"),
        ("tether", "Tether", "USDT", "fas fa-dollar-sign"),
        ("binancecoin", "BNB", "BNB", "fas fa-coins"),
        ("solana", "Solana", "SOL", "fas fa-bolt"),
        ("cardano", "Cardano", "ADA", "fas fa-chart-line"),
        ("ripple", "XRP", "XRP", "fas fa-exchange-alt"),
        ("dogecoin", "Dogecoin", "DOGE", "fas fa-dog"),
        ("polkadot", "Polkadot", "DOT", "fas fa-circle"),
        ("litecoin", "Litecoin", "LTC", "fab fa-ltc"),
    ]
    .into_iter()
    .map(|(id, name, symbol, icon)| Coin::crypto(id, name, symbol, icon))
    .collect()
}

/// Everything the dropdowns can list
#[derive(Debug, Clone)]
pub struct CurrencyCatalog {
    cryptos: Vec<Coin>,
    fiats: Vec<Coin>,
}

impl CurrencyCatalog {
    /// Catalog with only the built-in crypto list
    pub fn new() -> Self {
        Self {
            cryptos: builtin_cryptos(),
            fiats: Vec::new(),
        }
    }

    /// Replaces the fiat part with currencies loaded from the service
    pub fn set_fiats(&mut self, currencies: &[Currency]) {
        self.fiats = currencies.iter().map(Coin::from).collect();
    }

    pub fn cryptos(&self) -> &[Coin] {
        &self.cryptos
    }

    pub fn fiats(&self) -> &[Coin] {
        &self.fiats
    }

    pub fn find(&self, id: &str) -> Option<&Coin> {
        self.cryptos
            .iter()
            .chain(self.fiats.iter())
            .find(|c| c.id == id)
    }

    pub fn is_crypto(&self, id: &str) -> bool {
        self.find(id).is_some_and(|c| c.is_crypto)
    }

    /// Symbol shown for `id`: the crypto ticker, otherwise the uppercased id
    pub fn symbol_for(&self, id: &str) -> String {
        self.find(id)
            .filter(|c| c.is_crypto)
            .map(|c| c.symbol.clone())
            .unwrap_or_else(|| id.to_uppercase())
    }

    /// Dropdown rows: cryptos, a separator, then fiats
    pub fn entries(&self) -> Vec<PickerEntry<'_>> {
        let mut entries: Vec<PickerEntry<'_>> =
            self.cryptos.iter().map(PickerEntry::Item).collect();
        entries.push(PickerEntry::Separator);
        entries.extend(self.fiats.iter().map(PickerEntry::Item));
        entries
    }
}

impl Default for CurrencyCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// One row of a dropdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerEntry<'a> {
    Item(&'a Coin),
    Separator,
}

/// Which converter dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerSlot {
    Source,
    Destination,
}

/// One dropdown button and its open/closed list
#[derive(Debug, Clone)]
pub struct CurrencyPicker {
    selected: Coin,
    open: bool,
}

impl CurrencyPicker {
    fn new(selected: Coin) -> Self {
        Self {
            selected,
            open: false,
        }
    }

    pub fn selected(&self) -> &Coin {
        &self.selected
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Button text: icon reference and symbol
    pub fn button_label(&self) -> String {
        format!("[{}] {}", self.selected.icon, self.selected.symbol)
    }
}

/// Fiat used for the destination until the currency list is loaded
fn fallback_destination() -> Coin {
    Coin::from(&Currency::new(DEFAULT_TO_CURRENCY, "US Dollar"))
}

/// Source and destination dropdowns of the converter
#[derive(Debug, Clone)]
pub struct CurrencyPickers {
    catalog: CurrencyCatalog,
    source: CurrencyPicker,
    destination: CurrencyPicker,
}

impl CurrencyPickers {
    pub fn new() -> Self {
        let catalog = CurrencyCatalog::new();
        let source = catalog
            .find(DEFAULT_FROM_CURRENCY)
            .cloned()
            .unwrap_or_else(|| catalog.cryptos()[0].clone());

        Self {
            catalog,
            source: CurrencyPicker::new(source),
            destination: CurrencyPicker::new(fallback_destination()),
        }
    }

    pub fn catalog(&self) -> &CurrencyCatalog {
        &self.catalog
    }

    /// Rebuilds both lists with the loaded fiats and re-applies the defaults
    pub fn populate(&mut self, currencies: &[Currency]) {
        self.catalog.set_fiats(currencies);
        self.apply_default(PickerSlot::Source, DEFAULT_FROM_CURRENCY);
        self.apply_default(PickerSlot::Destination, DEFAULT_TO_CURRENCY);
    }

    /// Selects `id` only if the catalog lists it; the current choice stays otherwise
    fn apply_default(&mut self, slot: PickerSlot, id: &str) {
        if let Some(coin) = self.catalog.find(id).cloned() {
            self.picker_mut(slot).selected = coin;
        }
    }

    pub fn get(&self, slot: PickerSlot) -> &CurrencyPicker {
        match slot {
            PickerSlot::Source => &self.source,
            PickerSlot::Destination => &self.destination,
        }
    }

    fn picker_mut(&mut self, slot: PickerSlot) -> &mut CurrencyPicker {
        match slot {
            PickerSlot::Source => &mut self.source,
            PickerSlot::Destination => &mut self.destination,
        }
    }

    /// Canonical id selected in `slot`
    pub fn selected_id(&self, slot: PickerSlot) -> &str {
        &self.get(slot).selected.id
    }

    /// Toggles one dropdown, leaving the other as it is
    pub fn toggle(&mut self, slot: PickerSlot) {
        let picker = self.picker_mut(slot);
        picker.open = !picker.open;
    }

    /// Closes both dropdowns
    pub fn close_all(&mut self) {
        self.source.open = false;
        self.destination.open = false;
    }

    /// Selects `id` in `slot` and closes that dropdown
    pub fn select(&mut self, slot: PickerSlot, id: &str) -> Result<&Coin, DashboardError> {
        let coin = self
            .catalog
            .find(id)
            .cloned()
            .ok_or_else(|| DashboardError::UnknownCurrency(id.to_string()))?;
        let picker = self.picker_mut(slot);
        picker.selected = coin;
        picker.open = false;
        Ok(&picker.selected)
    }

    /// Exchanges the two selections
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.source.selected, &mut self.destination.selected);
    }
}

impl Default for CurrencyPickers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fiats() -> Vec<Currency> {
        vec![
            Currency::new("usd", "US Dollar"),
            Currency::new("eur", "Euro"),
            Currency::new("jpy", "Japanese Yen"),
        ]
    }

    #[test]
    fn test_entries_are_cryptos_separator_fiats() {
        let mut catalog = CurrencyCatalog::new();
        catalog.set_fiats(&fiats());
        let entries = catalog.entries();

        assert_eq!(entries.len(), 10 + 1 + 3);
        assert_eq!(entries[10], PickerEntry::Separator);
        assert!(matches!(entries[0], PickerEntry::Item(c) if c.id == "bitcoin"));
        assert!(matches!(entries[11], PickerEntry::Item(c) if c.symbol == "USD"));
    }

    #[test]
    fn test_defaults_before_and_after_populate() {
        let mut pickers = CurrencyPickers::new();
        assert_eq!(pickers.selected_id(PickerSlot::Source), "bitcoin");
        assert_eq!(pickers.selected_id(PickerSlot::Destination), "usd");

        pickers.select(PickerSlot::Source, "solana").unwrap();
        pickers.populate(&fiats());
        assert_eq!(pickers.selected_id(PickerSlot::Source), "bitcoin");
        assert_eq!(pickers.get(PickerSlot::Destination).selected().name, "US Dollar");
    }

    #[test]
    fn test_select_closes_dropdown_and_rejects_unknown() {
        let mut pickers = CurrencyPickers::new();
        pickers.populate(&fiats());
        pickers.toggle(PickerSlot::Destination);
        assert!(pickers.get(PickerSlot::Destination).is_open());

        let coin = pickers.select(PickerSlot::Destination, "eur").unwrap();
        assert_eq!(coin.symbol, "EUR");
        assert!(!pickers.get(PickerSlot::Destination).is_open());

        let err = pickers.select(PickerSlot::Destination, "zzz").unwrap_err();
        assert_eq!(err, DashboardError::UnknownCurrency("zzz".into()));
        assert_eq!(pickers.selected_id(PickerSlot::Destination), "eur");
    }

    #[test]
    fn test_toggle_is_per_button_and_outside_click_closes_all() {
        let mut pickers = CurrencyPickers::new();
        pickers.toggle(PickerSlot::Source);
        pickers.toggle(PickerSlot::Destination);
        assert!(pickers.get(PickerSlot::Source).is_open());
        assert!(pickers.get(PickerSlot::Destination).is_open());

        pickers.toggle(PickerSlot::Source);
        assert!(!pickers.get(PickerSlot::Source).is_open());

        pickers.close_all();
        assert!(!pickers.get(PickerSlot::Destination).is_open());
    }

    #[test]
    fn test_symbol_lookup() {
        let catalog = CurrencyCatalog::new();
        assert_eq!(catalog.symbol_for("ripple"), "XRP");
        assert_eq!(catalog.symbol_for("gbp"), "GBP");
        assert!(catalog.is_crypto("dogecoin"));
        assert!(!catalog.is_crypto("usd"));
    }
}
