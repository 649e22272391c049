//! Dashboard controller
//!
//! Owns the whole client state and reacts to one [`Event`] at a time.
//! User actions arrive as [`UiEvent`]s; every remote call is spawned as a
//! task whose completion comes back through the same channel, so no
//! handler ever waits on the network.
//!
//! ```text
//! front end ──UiEvent──┐
//! tick scheduler ──────┼──> channel ──> Dashboard::handle ──> AppState
//! API tasks ───────────┘                      │
//!                                             └──spawn──> DashboardApi
//! ```

use crate::{
    config::DashboardConfig,
    constants::{COUNTDOWN_DISABLED_LABEL, NOTIFICATION_DURATION, TICK_PERIOD},
    converter::{parse_amount, ConverterState},
    error::ApiError,
    format::{format_conversion_result, format_rate},
    notification::{NotificationKind, NotificationSlot},
    picker::{CurrencyPickers, PickerSlot},
    preferences::PreferenceStore,
    provider::DashboardApi,
    scheduler::TickScheduler,
    settings::{capitalize, SettingsState},
    store::PriceBoard,
    types::{
        CoinSearchResult, ConfigUpdate, Conversion, ConversionRecord, ConversionRequest,
        Currency, PollState, PriceSnapshot, ServerConfig, Tab, Theme,
    },
};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

/// Actions a user can take
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Manual refresh button
    RefreshRequested,
    TabSelected(Tab),
    /// Header currency selector
    PrimaryCurrencyChanged(String),
    /// Source amount field edited
    AmountChanged(String),
    /// Destination amount field edited
    DestinationAmountChanged(String),
    /// Quick-amount button
    QuickAmount(f64),
    ConvertRequested,
    SwapRequested,
    PickerToggled(PickerSlot),
    CurrencySelected { slot: PickerSlot, id: String },
    /// Click anywhere outside the dropdowns
    OutsideClicked,
    SearchInputChanged(String),
    /// Search button or Enter in the search field
    SearchSubmitted,
    SearchResultSelected(usize),
    /// Settings currency selector
    SettingsCurrencyChanged(String),
    SaveSettings,
    RefreshIntervalChanged(u64),
    ThemeSelected(Theme),
}

/// Everything the controller reacts to
#[derive(Debug)]
pub enum Event {
    Ui(UiEvent),
    /// Countdown tick of the given scheduler generation
    Tick(u64),
    PricesFetched {
        currency: String,
        result: Result<PriceSnapshot, ApiError>,
    },
    RateFetched {
        request: ConversionRequest,
        result: Result<Conversion, ApiError>,
    },
    ConversionFinished {
        request: ConversionRequest,
        result: Result<Conversion, ApiError>,
    },
    CurrenciesLoaded(Result<Vec<Currency>, ApiError>),
    SearchFinished {
        query: String,
        result: Result<Vec<CoinSearchResult>, ApiError>,
    },
    SettingsSaved {
        update: ConfigUpdate,
        result: Result<(), ApiError>,
    },
    ServerConfigLoaded(Result<ServerConfig, ApiError>),
    NotificationExpired(Uuid),
    /// Ask the front end to draw the full state
    Redraw,
    Shutdown,
}

impl From<UiEvent> for Event {
    fn from(event: UiEvent) -> Self {
        Event::Ui(event)
    }
}

/// Client state, the equivalent of what the page shows
#[derive(Debug)]
pub struct AppState {
    pub tab: Tab,
    /// Currency absolute prices are shown in
    pub primary_currency: String,
    /// Coin id shown in the tracked slot
    pub tracking_coin: String,
    pub tracking_name: String,
    pub tracking_symbol: String,
    /// Seconds between automatic refreshes, 0 when off
    pub refresh_interval_secs: u64,
    /// Seconds left until the next refresh; None while auto-refresh is off
    pub countdown: Option<u64>,
    pub poll_state: PollState,
    pub prices: PriceBoard,
    pub converter: ConverterState,
    pub pickers: CurrencyPickers,
    pub settings: SettingsState,
    pub theme: Theme,
    pub notification: NotificationSlot,
    /// Requests that drive the loading indicator
    pub in_flight: usize,
    price_requests: usize,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        let primary = config.primary_currency.to_lowercase();
        let tracking = config.tracking_coin.to_lowercase();
        Self {
            tab: Tab::Home,
            settings: SettingsState::new(&primary, &tracking),
            tracking_name: capitalize(&tracking),
            tracking_symbol: tracking.to_uppercase(),
            primary_currency: primary,
            tracking_coin: tracking,
            refresh_interval_secs: config.refresh_interval_secs,
            countdown: None,
            poll_state: PollState::Idle,
            prices: PriceBoard::new(),
            converter: ConverterState::new(),
            pickers: CurrencyPickers::new(),
            theme: Theme::default(),
            notification: NotificationSlot::new(),
            in_flight: 0,
            price_requests: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn countdown_label(&self) -> String {
        match self.countdown {
            Some(secs) => secs.to_string(),
            None => COUNTDOWN_DISABLED_LABEL.to_string(),
        }
    }

    fn set_tracking_coin(&mut self, coin: &str) {
        self.tracking_coin = coin.to_lowercase();
        self.tracking_name = capitalize(&self.tracking_coin);
        self.tracking_symbol = self.tracking_coin.to_uppercase();
    }
}

/// The dashboard controller
pub struct Dashboard {
    api: Arc<dyn DashboardApi>,
    state: AppState,
    preferences: PreferenceStore,
    ticker: TickScheduler<Event>,
    search_limit: usize,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
}

impl Dashboard {
    /// Creates a controller; nothing is requested until [`start`](Self::start)
    pub fn new(
        api: Arc<dyn DashboardApi>,
        config: &DashboardConfig,
        preferences: PreferenceStore,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = TickScheduler::new(TICK_PERIOD, tx.clone(), Event::Tick);

        Self {
            api,
            state: AppState::new(config),
            preferences,
            ticker,
            search_limit: config.search_limit,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Channel front ends post [`Event`]s into
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Startup: theme, currency list, server config, first price load and
    /// the auto-refresh countdown
    pub fn start(&mut self) {
        tracing::info!(
            provider = self.api.provider_name(),
            primary_currency = %self.state.primary_currency,
            refresh_interval_secs = self.state.refresh_interval_secs,
            "Starting dashboard"
        );

        self.state.theme = self.preferences.theme();
        self.load_currencies();
        self.load_server_config();
        self.load_prices();
        if self.state.refresh_interval_secs > 0 {
            self.start_auto_refresh();
        }
    }

    /// Runs the event loop until [`Event::Shutdown`]
    pub async fn run<V: crate::view::DashboardView + ?Sized>(&mut self, view: &mut V) {
        self.start();
        view.render(&self.state);

        while let Some(event) = self.rx.recv().await {
            match event {
                Event::Shutdown => break,
                Event::Redraw => view.redraw(&self.state),
                event => {
                    self.handle(event);
                    view.render(&self.state);
                }
            }
        }

        self.ticker.stop();
        tracing::info!("Dashboard stopped");
    }

    /// Dispatches one event to its handler
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Ui(ui) => self.handle_ui(ui),
            Event::Tick(generation) => self.on_tick(generation),
            Event::PricesFetched { currency, result } => self.on_prices(currency, result),
            Event::RateFetched { request, result } => self.on_rate(request, result),
            Event::ConversionFinished { request, result } => self.on_conversion(request, result),
            Event::CurrenciesLoaded(result) => self.on_currencies(result),
            Event::SearchFinished { query, result } => self.on_search(query, result),
            Event::SettingsSaved { update, result } => self.on_settings_saved(update, result),
            Event::ServerConfigLoaded(result) => self.on_server_config(result),
            Event::NotificationExpired(id) => {
                self.state.notification.expire(id);
            }
            Event::Redraw | Event::Shutdown => {}
        }
    }

    fn handle_ui(&mut self, event: UiEvent) {
        tracing::debug!(event = ?event, "UI event");
        match event {
            UiEvent::RefreshRequested => self.load_prices(),
            UiEvent::TabSelected(tab) => self.select_tab(tab),
            UiEvent::PrimaryCurrencyChanged(code) => self.change_primary_currency(&code),
            UiEvent::AmountChanged(raw) => self.change_amount(raw),
            UiEvent::DestinationAmountChanged(raw) => self.state.converter.to_amount = raw,
            UiEvent::QuickAmount(amount) => {
                self.state.converter.from_amount = amount.to_string();
                self.query_rate();
            }
            UiEvent::ConvertRequested => self.convert(),
            UiEvent::SwapRequested => self.swap(),
            UiEvent::PickerToggled(slot) => self.state.pickers.toggle(slot),
            UiEvent::CurrencySelected { slot, id } => self.select_currency(slot, &id),
            UiEvent::OutsideClicked => self.state.pickers.close_all(),
            UiEvent::SearchInputChanged(text) => self.state.settings.search_query = text,
            UiEvent::SearchSubmitted => self.search_coins(),
            UiEvent::SearchResultSelected(index) => self.select_search_result(index),
            UiEvent::SettingsCurrencyChanged(code) => {
                self.state.settings.primary_currency = code.to_lowercase()
            }
            UiEvent::SaveSettings => self.save_settings(),
            UiEvent::RefreshIntervalChanged(secs) => self.change_refresh_interval(secs),
            UiEvent::ThemeSelected(theme) => self.switch_theme(theme),
        }
    }

    /// Spawns `request` and posts its wrapped result back to the controller
    fn spawn_request<T, F, Fut>(&self, request: F, wrap: impl FnOnce(T) -> Event + Send + 'static)
    where
        F: FnOnce(Arc<dyn DashboardApi>) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let output = request(api).await;
            // the receiver only disappears on shutdown
            let _ = tx.send(wrap(output));
        });
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        let id = self.state.notification.show(kind, message);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(NOTIFICATION_DURATION).await;
            let _ = tx.send(Event::NotificationExpired(id));
        });
    }

    // ---- polling -------------------------------------------------------

    fn load_prices(&mut self) {
        let currency = self.state.primary_currency.clone();
        self.state.poll_state = PollState::Fetching;
        self.state.price_requests += 1;
        self.state.in_flight += 1;

        tracing::debug!(currency = %currency, "Loading prices");
        let request_currency = currency.clone();
        self.spawn_request(
            move |api| async move { api.fetch_prices(&request_currency).await },
            move |result| Event::PricesFetched { currency, result },
        );
    }

    fn on_prices(&mut self, currency: String, result: Result<PriceSnapshot, ApiError>) {
        self.state.in_flight = self.state.in_flight.saturating_sub(1);
        self.state.price_requests = self.state.price_requests.saturating_sub(1);
        if self.state.price_requests == 0 {
            self.state.poll_state = PollState::CoolingDown;
        }

        match result {
            Ok(snapshot) => {
                self.state
                    .prices
                    .apply(&snapshot, &currency, &self.state.tracking_coin);
                self.notify(NotificationKind::Success, "Prices updated!");
            }
            Err(e) => {
                tracing::error!(error = %e, currency = %currency, "Error loading data");
                self.notify(NotificationKind::Error, "Failed to load data");
            }
        }

        self.reset_countdown();
    }

    fn start_auto_refresh(&mut self) {
        self.ticker.start();
        self.state.countdown = Some(self.state.refresh_interval_secs);
    }

    fn stop_auto_refresh(&mut self) {
        self.ticker.stop();
        self.state.countdown = None;
    }

    fn reset_countdown(&mut self) {
        if self.ticker.is_active() {
            self.state.countdown = Some(self.state.refresh_interval_secs);
        }
    }

    fn on_tick(&mut self, generation: u64) {
        if !self.ticker.is_current(generation) {
            tracing::trace!(generation = generation, "Dropping stale tick");
            return;
        }

        let remaining = self.state.countdown.unwrap_or(0).saturating_sub(1);
        if remaining == 0 {
            self.load_prices();
            self.state.countdown = Some(self.state.refresh_interval_secs);
        } else {
            self.state.countdown = Some(remaining);
        }
    }

    fn change_refresh_interval(&mut self, secs: u64) {
        self.state.refresh_interval_secs = secs;
        if secs == 0 {
            self.stop_auto_refresh();
            self.notify(NotificationKind::Success, "Auto-refresh set to off");
        } else {
            self.start_auto_refresh();
            self.notify(
                NotificationKind::Success,
                format!("Auto-refresh set to {} seconds", secs),
            );
        }
        tracing::info!(refresh_interval_secs = secs, "Refresh interval changed");
    }

    fn change_primary_currency(&mut self, code: &str) {
        self.state.primary_currency = code.to_lowercase();
        self.load_prices();
        self.query_rate();
    }

    fn select_tab(&mut self, tab: Tab) {
        self.state.tab = tab;
        if tab == Tab::Converter {
            self.query_rate();
        }
    }

    // ---- converter -----------------------------------------------------

    fn change_amount(&mut self, raw: String) {
        self.state.converter.from_amount = raw;
        if self.state.converter.from_amount_is_numeric() {
            self.query_rate();
        }
    }

    /// Unit conversion that only refreshes the rate line
    fn query_rate(&mut self) {
        let request = ConversionRequest::unit(
            self.state.pickers.selected_id(PickerSlot::Source),
            self.state.pickers.selected_id(PickerSlot::Destination),
        );
        let sent = request.clone();
        self.spawn_request(
            move |api| async move { api.convert(&sent).await },
            move |result| Event::RateFetched { request, result },
        );
    }

    fn on_rate(&mut self, request: ConversionRequest, result: Result<Conversion, ApiError>) {
        match result {
            Ok(conversion) => {
                let catalog = self.state.pickers.catalog();
                self.state.converter.rate_line = Some(format!(
                    "1 {} = {} {}",
                    catalog.symbol_for(&request.from),
                    format_rate(conversion.rate),
                    catalog.symbol_for(&request.to)
                ));
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    from = %request.from,
                    to = %request.to,
                    "Error loading conversion rate"
                );
            }
        }
    }

    fn convert(&mut self) {
        let amount = match parse_amount(&self.state.converter.from_amount) {
            Ok(amount) => amount,
            Err(e) => {
                tracing::debug!(error = %e, "Conversion input rejected");
                self.notify(NotificationKind::Error, "Please enter a valid amount");
                return;
            }
        };

        let request = ConversionRequest::new(
            self.state.pickers.selected_id(PickerSlot::Source),
            self.state.pickers.selected_id(PickerSlot::Destination),
            amount,
        );
        self.state.in_flight += 1;

        let sent = request.clone();
        self.spawn_request(
            move |api| async move { api.convert(&sent).await },
            move |result| Event::ConversionFinished { request, result },
        );
    }

    fn on_conversion(&mut self, request: ConversionRequest, result: Result<Conversion, ApiError>) {
        self.state.in_flight = self.state.in_flight.saturating_sub(1);

        match result {
            Ok(conversion) => {
                let catalog = self.state.pickers.catalog();
                let record = ConversionRecord {
                    from_symbol: catalog.symbol_for(&request.from),
                    to_symbol: catalog.symbol_for(&request.to),
                    amount: request.amount,
                    result: conversion.result,
                    rate: conversion.rate,
                    timestamp: Utc::now(),
                };
                self.state.converter.to_amount =
                    format_conversion_result(conversion.result, catalog.is_crypto(&request.to));
                self.state.converter.history.push(record);
                self.notify(NotificationKind::Success, "Conversion successful!");
            }
            Err(e) => {
                tracing::error!(error = %e, from = %request.from, to = %request.to, "Conversion error");
                let message = e
                    .service_message()
                    .unwrap_or("Conversion failed. Please try again.")
                    .to_string();
                self.notify(NotificationKind::Error, message);
            }
        }
    }

    fn swap(&mut self) {
        self.state.pickers.swap();
        self.state.converter.migrate_destination();
        self.query_rate();
    }

    // ---- currency picker -----------------------------------------------

    fn load_currencies(&mut self) {
        self.spawn_request(
            |api| async move { api.fetch_currencies().await },
            Event::CurrenciesLoaded,
        );
    }

    fn on_currencies(&mut self, result: Result<Vec<Currency>, ApiError>) {
        match result {
            Ok(currencies) => {
                tracing::debug!(count = currencies.len(), "Loaded currencies");
                self.state.pickers.populate(&currencies);
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading currencies");
                self.notify(NotificationKind::Error, "Failed to load currencies");
            }
        }
    }

    fn select_currency(&mut self, slot: PickerSlot, id: &str) {
        match self.state.pickers.select(slot, id) {
            Ok(coin) => {
                tracing::debug!(slot = ?slot, currency = %coin.id, "Currency selected");
                self.query_rate();
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring currency selection"),
        }
    }

    // ---- settings ------------------------------------------------------

    fn search_coins(&mut self) {
        let query = match self.state.settings.query().map(str::to_string) {
            Ok(query) => query,
            Err(e) => {
                tracing::debug!(error = %e, "Search rejected");
                self.notify(NotificationKind::Error, "Please enter a coin to search");
                return;
            }
        };

        let limit = self.search_limit;
        let sent = query.clone();
        self.spawn_request(
            move |api| async move { api.search_coins(&sent, limit).await },
            move |result| Event::SearchFinished { query, result },
        );
    }

    fn on_search(&mut self, query: String, result: Result<Vec<CoinSearchResult>, ApiError>) {
        match result {
            Ok(results) => {
                tracing::debug!(query = %query, count = results.len(), "Coin search finished");
                self.state.settings.show_results(results);
            }
            Err(e) => {
                tracing::error!(error = %e, query = %query, "Error searching coins");
                self.notify(NotificationKind::Error, "Coin search failed");
            }
        }
    }

    fn select_search_result(&mut self, index: usize) {
        match self.state.settings.select_result(index) {
            Ok(coin) => tracing::debug!(coin = %coin.id, "Tracking candidate selected"),
            Err(e) => tracing::warn!(error = %e, "Ignoring search result selection"),
        }
    }

    fn save_settings(&mut self) {
        let update = self.state.settings.config_update();
        let sent = update.clone();
        self.spawn_request(
            move |api| async move { api.update_config(&sent).await },
            move |result| Event::SettingsSaved { update, result },
        );
    }

    fn on_settings_saved(&mut self, update: ConfigUpdate, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                tracing::info!(
                    primary_currency = %update.primary_currency,
                    tracking_coin = %update.tracking_coin,
                    "Settings saved"
                );
                self.state.primary_currency = update.primary_currency.to_lowercase();
                self.state.set_tracking_coin(&update.tracking_coin);
                self.load_prices();
                self.notify(NotificationKind::Success, "Settings saved successfully!");
            }
            Err(e) => {
                tracing::error!(error = %e, "Error saving settings");
                self.notify(NotificationKind::Error, "Failed to save settings");
            }
        }
    }

    fn load_server_config(&mut self) {
        self.spawn_request(
            |api| async move { api.fetch_config().await },
            Event::ServerConfigLoaded,
        );
    }

    /// Adopts the server's currency and tracked coin when they differ
    fn on_server_config(&mut self, result: Result<ServerConfig, ApiError>) {
        let config = match result {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Server config unavailable, keeping local defaults");
                return;
            }
        };

        let primary = config.primary_currency.to_lowercase();
        let tracking = config.tracking_coin.to_lowercase();
        if primary == self.state.primary_currency && tracking == self.state.tracking_coin {
            return;
        }

        tracing::info!(
            primary_currency = %primary,
            tracking_coin = %tracking,
            "Adopting server config"
        );
        self.state.primary_currency = primary.clone();
        self.state.set_tracking_coin(&tracking);
        self.state.settings.primary_currency = primary;
        self.state.settings.tracking_label = self.state.tracking_name.clone();
        self.load_prices();
    }

    fn switch_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
        if let Err(e) = self.preferences.set_theme(theme) {
            tracing::warn!(error = %e, "Could not persist theme");
        }
        self.notify(
            NotificationKind::Success,
            format!("Theme changed to {} mode", theme),
        );
    }
}
