//! Displayed price slots
//!
//! Holds what the price panel currently shows. A slot is only overwritten
//! when a response actually carries data for it, so a failed or partial
//! refresh leaves earlier values in place.

use crate::{
    constants::{BTC_COIN_ID, USDT_COIN_ID},
    format::{format_change, format_price, PriceChange},
    types::{PriceQuote, PriceSnapshot},
};
use chrono::NaiveDateTime;

/// Fixed display slots of the price panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceSlot {
    Btc,
    Usdt,
    Tracked,
}

/// A quote as shown, together with the currency it was priced in
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedPrice {
    pub quote: PriceQuote,
    pub currency: String,
}

impl DisplayedPrice {
    pub fn price_text(&self) -> String {
        format_price(self.quote.price, &self.currency)
    }

    pub fn change(&self) -> PriceChange {
        format_change(self.quote.change)
    }
}

/// Current contents of the price panel
#[derive(Debug, Clone, Default)]
pub struct PriceBoard {
    btc: Option<DisplayedPrice>,
    usdt: Option<DisplayedPrice>,
    tracked: Option<DisplayedPrice>,
    last_update: Option<NaiveDateTime>,
}

impl PriceBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a fresh snapshot into the slots it has data for
    ///
    /// # Arguments
    /// * `snapshot` - The prices returned by the service
    /// * `currency` - Currency the prices are denominated in
    /// * `tracking_coin` - Coin id shown in the tracked slot
    pub fn apply(&mut self, snapshot: &PriceSnapshot, currency: &str, tracking_coin: &str) {
        let displayed = |id: &str| {
            snapshot.quotes.get(id).map(|quote| DisplayedPrice {
                quote: *quote,
                currency: currency.to_string(),
            })
        };

        if let Some(price) = displayed(BTC_COIN_ID) {
            self.btc = Some(price);
        }
        if let Some(price) = displayed(USDT_COIN_ID) {
            self.usdt = Some(price);
        }
        if let Some(price) = displayed(tracking_coin) {
            self.tracked = Some(price);
        }
        self.last_update = Some(snapshot.timestamp);

        tracing::debug!(
            quotes = snapshot.quotes.len(),
            currency = currency,
            tracking_coin = tracking_coin,
            "Applied price snapshot"
        );
    }

    pub fn get(&self, slot: PriceSlot) -> Option<&DisplayedPrice> {
        match slot {
            PriceSlot::Btc => self.btc.as_ref(),
            PriceSlot::Usdt => self.usdt.as_ref(),
            PriceSlot::Tracked => self.tracked.as_ref(),
        }
    }

    /// Last update rendered as wall-clock time
    pub fn last_update_text(&self) -> Option<String> {
        self.last_update.map(|ts| ts.format("%H:%M:%S").to_string())
    }
}
