//! Rendering of the dashboard state

use crate::{
    dashboard::AppState,
    notification::NotificationKind,
    picker::{PickerEntry, PickerSlot},
    store::PriceSlot,
    types::{Tab, Theme},
};
use std::io::Write;

/// Something that can show an [`AppState`]
pub trait DashboardView {
    /// Called after every handled event; may skip unchanged output
    fn render(&mut self, state: &AppState);

    /// Draws everything again
    fn redraw(&mut self, state: &AppState);
}

/// Builds the text lines shown for the current state
pub fn screen(state: &AppState) -> Vec<String> {
    screen_with_countdown(state, &state.countdown_label())
}

fn screen_with_countdown(state: &AppState, countdown: &str) -> Vec<String> {
    let mut lines = Vec::new();

    let loading = if state.is_loading() { " [loading]" } else { "" };
    lines.push(format!(
        "== {:?} == currency: {} | next refresh: {} | theme: {}{}",
        state.tab,
        state.primary_currency.to_uppercase(),
        countdown,
        state.theme,
        loading
    ));

    if let Some(notification) = state.notification.current() {
        let marker = match notification.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        lines.push(format!("({}) {}", marker, notification.message));
    }

    match state.tab {
        Tab::Home => home_lines(state, &mut lines),
        Tab::Converter => converter_lines(state, &mut lines),
        Tab::Settings => settings_lines(state, &mut lines),
    }
    lines
}

fn home_lines(state: &AppState, lines: &mut Vec<String>) {
    let slots = [
        (PriceSlot::Btc, "Bitcoin (BTC)".to_string()),
        (PriceSlot::Usdt, "Tether (USDT)".to_string()),
        (
            PriceSlot::Tracked,
            format!("{} ({})", state.tracking_name, state.tracking_symbol),
        ),
    ];

    for (slot, label) in slots {
        match state.prices.get(slot) {
            Some(shown) => {
                let change = shown.change();
                lines.push(format!(
                    "{:<24} {:>18}  {} {}",
                    label,
                    shown.price_text(),
                    change.direction.arrow(),
                    change.text
                ));
            }
            None => lines.push(format!("{:<24} {:>18}", label, "--")),
        }
    }

    if let Some(updated) = state.prices.last_update_text() {
        lines.push(format!("Last update: {}", updated));
    }
}

fn converter_lines(state: &AppState, lines: &mut Vec<String>) {
    let converter = &state.converter;
    for (slot, label, amount) in [
        (PickerSlot::Source, "From", &converter.from_amount),
        (PickerSlot::Destination, "To", &converter.to_amount),
    ] {
        let picker = state.pickers.get(slot);
        lines.push(format!("{:<5} {:<20} {}", label, picker.button_label(), amount));
        if picker.is_open() {
            for entry in state.pickers.catalog().entries() {
                match entry {
                    PickerEntry::Item(coin) => lines.push(format!("      {}", coin.option_label())),
                    PickerEntry::Separator => lines.push("      ----".to_string()),
                }
            }
        }
    }

    if let Some(rate) = &converter.rate_line {
        lines.push(rate.clone());
    }

    if !converter.history.is_empty() {
        lines.push("Recent conversions:".to_string());
        for record in converter.history.iter() {
            let line = record.to_line();
            lines.push(format!("  {}  {}  {}", line.pair, line.rate, line.time));
        }
    }
}

fn settings_lines(state: &AppState, lines: &mut Vec<String>) {
    let settings = &state.settings;
    lines.push(format!(
        "Primary currency: {}",
        settings.primary_currency.to_uppercase()
    ));
    lines.push(format!("Currently tracking: {}", settings.tracking_label));
    lines.push(format!("Search: {}", settings.search_query));
    for (index, line) in settings.results.lines().into_iter().enumerate() {
        lines.push(format!("  {}. {}", index + 1, line));
    }

    let interval = match state.refresh_interval_secs {
        0 => "off".to_string(),
        secs => format!("{}s", secs),
    };
    lines.push(format!("Auto-refresh: {}", interval));
    let themes: Vec<&str> = Theme::all().iter().map(Theme::as_str).collect();
    lines.push(format!("Theme: {} ({})", state.theme, themes.join("/")));
}

/// Plain-text view that prints a frame whenever the screen changes
///
/// The countdown alone does not count as a change, otherwise a frame
/// would be printed every second.
pub struct TerminalView<W: Write> {
    out: W,
    last: Vec<String>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, state: &AppState) {
        let mut frame = String::new();
        for line in screen(state) {
            frame.push_str(&line);
            frame.push('\n');
        }
        frame.push('\n');

        if let Err(e) = self.out.write_all(frame.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to draw dashboard");
        }
        self.last = screen_with_countdown(state, "");
    }
}

impl<W: Write> DashboardView for TerminalView<W> {
    fn render(&mut self, state: &AppState) {
        if screen_with_countdown(state, "") != self.last {
            self.draw(state);
        }
    }

    fn redraw(&mut self, state: &AppState) {
        self.draw(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::DashboardConfig,
        types::{PriceQuote, PriceSnapshot},
    };
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn state() -> AppState {
        AppState::new(&DashboardConfig::default())
    }

    fn snapshot() -> PriceSnapshot {
        let mut quotes = HashMap::new();
        quotes.insert("bitcoin".to_string(), PriceQuote::new(64000.0, 1.5));
        quotes.insert("tether".to_string(), PriceQuote::new(0.9998, -0.02));
        PriceSnapshot {
            quotes,
            timestamp: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_home_screen() {
        let mut state = state();
        state.prices.apply(&snapshot(), "usd", "bitcoin");
        let lines = screen(&state);

        assert!(lines[0].contains("next refresh: --"));
        assert!(lines[1].contains("$64,000.00"));
        assert!(lines[1].contains("▲ +1.50%"));
        assert!(lines[2].contains("$0.999800"));
        assert!(lines[2].contains("▼ -0.02%"));
        assert!(lines.iter().any(|l| l == "Last update: 12:00:00"));
    }

    #[test]
    fn test_converter_screen_lists_open_dropdown() {
        let mut state = state();
        state.tab = Tab::Converter;
        state.pickers.toggle(PickerSlot::Source);
        let lines = screen(&state);

        assert!(lines.iter().any(|l| l.starts_with("From") && l.contains("BTC")));
        assert!(lines.iter().any(|l| l.trim() == "----"));
    }

    #[test]
    fn test_render_skips_unchanged_frames() {
        let state = state();
        let mut view = TerminalView::new(Vec::new());
        view.render(&state);
        let first = view.out.len();
        assert!(first > 0);

        view.render(&state);
        assert_eq!(view.out.len(), first);

        view.redraw(&state);
        assert_eq!(view.into_inner().len(), first * 2);
    }

    #[test]
    fn test_countdown_alone_does_not_reprint() {
        let mut state = state();
        state.countdown = Some(30);
        let mut view = TerminalView::new(Vec::new());
        view.render(&state);
        let first = view.out.len();

        state.countdown = Some(29);
        view.render(&state);
        assert_eq!(view.out.len(), first);

        state.theme = Theme::Light;
        view.render(&state);
        let output = String::from_utf8(view.into_inner()).unwrap();
        // the new frame carries the current countdown
        assert_eq!(output.matches("next refresh: 30 |").count(), 1);
        assert_eq!(output.matches("next refresh: 29 |").count(), 1);
    }
}
