//! Bounded conversion history
//!
//! Keeps the most recent conversions, newest first, in a rolling window.

use crate::{
    constants::HISTORY_CAPACITY,
    format::{format_grouped, format_rate},
    types::ConversionRecord,
};
use chrono::Local;
use std::collections::VecDeque;

/// Most-recent-first list of completed conversions
#[derive(Debug, Clone)]
pub struct ConversionHistory {
    records: VecDeque<ConversionRecord>,
    capacity: usize,
}

impl ConversionHistory {
    /// Creates an empty history holding at most `HISTORY_CAPACITY` records
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Prepends a record, evicting the oldest ones beyond capacity
    pub fn push(&mut self, record: ConversionRecord) {
        self.records.push_front(record);
        while self.records.len() > self.capacity {
            self.records.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates newest first
    pub fn iter(&self) -> impl Iterator<Item = &ConversionRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&ConversionRecord> {
        self.records.front()
    }
}

impl Default for ConversionHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Text lines shown for one history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    /// `0.5 BTC → 32,000.00 USD`
    pub pair: String,
    /// `Rate: 1 BTC = 64,000.00 USD`
    pub rate: String,
    /// Local `HH:MM`
    pub time: String,
}

impl ConversionRecord {
    /// Renders this record the way the history panel shows it
    pub fn to_line(&self) -> HistoryLine {
        HistoryLine {
            pair: format!(
                "{} {} → {} {}",
                self.amount,
                self.from_symbol,
                format_grouped(self.result, 2, 8),
                self.to_symbol
            ),
            rate: format!(
                "Rate: 1 {} = {} {}",
                self.from_symbol,
                format_rate(self.rate),
                self.to_symbol
            ),
            time: self.timestamp.with_timezone(&Local).format("%H:%M").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(amount: f64) -> ConversionRecord {
        ConversionRecord {
            from_symbol: "BTC".into(),
            to_symbol: "USD".into(),
            amount,
            result: amount * 64000.0,
            rate: 64000.0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_history_is_bounded_and_newest_first() {
        let mut history = ConversionHistory::new();
        for amount in 1..=6 {
            history.push(record(amount as f64));
            assert!(history.len() <= HISTORY_CAPACITY);
        }

        let amounts: Vec<f64> = history.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![6.0, 5.0, 4.0, 3.0, 2.0]);
        assert_eq!(history.latest().map(|r| r.amount), Some(6.0));
    }

    #[test]
    fn test_history_line() {
        let line = record(0.5).to_line();
        assert_eq!(line.pair, "0.5 BTC → 32,000.00 USD");
        assert_eq!(line.rate, "Rate: 1 BTC = 64,000.00 USD");
        assert_eq!(line.time.len(), 5);
    }
}
