//! Converter panel state

use crate::{error::DashboardError, history::ConversionHistory};

/// Parses a conversion amount, accepting only positive finite numbers
pub fn parse_amount(raw: &str) -> Result<f64, DashboardError> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| DashboardError::invalid_amount(raw))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DashboardError::invalid_amount(raw));
    }
    Ok(amount)
}

/// Parses a displayed number, ignoring thousands separators
fn parse_displayed(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Amount fields, rate line and history of the converter
#[derive(Debug, Clone, Default)]
pub struct ConverterState {
    /// Source amount as typed
    pub from_amount: String,
    /// Destination amount as displayed
    pub to_amount: String,
    /// Live `1 X = Y Z` line
    pub rate_line: Option<String>,
    pub history: ConversionHistory,
}

impl ConverterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the source field holds something worth a rate query
    pub fn from_amount_is_numeric(&self) -> bool {
        parse_displayed(&self.from_amount).is_some()
    }

    /// Moves a usable destination amount into the source field
    ///
    /// Returns true when the amount was migrated. Empty, non-numeric and
    /// `0.00` destinations are left untouched.
    pub fn migrate_destination(&mut self) -> bool {
        if self.to_amount.trim() == "0.00" {
            return false;
        }
        match parse_displayed(&self.to_amount) {
            Some(value) => {
                self.from_amount = value.to_string();
                self.to_amount.clear();
                true
            }
            None => false,
        }
    }
}
