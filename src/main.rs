//! Coin Dashboard
//!
//! Terminal front end for the crypto price and conversion service.

use anyhow::{Context, Result};
use clap::Parser;
use coin_dashboard::{
    command::{self, Command, HELP},
    config::default_preferences_path,
    constants::{DEFAULT_API_URL, DEFAULT_REFRESH_INTERVAL_SECS},
    Dashboard, DashboardConfig, Event, HttpDashboardApi, PreferenceStore, TerminalView,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crypto price dashboard and currency converter
#[derive(Parser, Debug)]
#[command(name = "coin-dashboard")]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the dashboard service
    #[arg(long, env = "COIN_DASHBOARD_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Auto-refresh interval in seconds (0 disables it)
    #[arg(
        long,
        env = "COIN_DASHBOARD_REFRESH_SECS",
        default_value_t = DEFAULT_REFRESH_INTERVAL_SECS
    )]
    refresh: u64,

    /// File the theme preference is stored in [default: per-user config dir]
    #[arg(long, env = "COIN_DASHBOARD_PREFERENCES", value_name = "FILE")]
    preferences: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "COIN_DASHBOARD_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for DashboardConfig {
    fn from(args: Args) -> Self {
        DashboardConfig {
            api_base_url: args.api_url,
            refresh_interval_secs: args.refresh,
            request_timeout_secs: args.timeout,
            preferences_path: args.preferences.or_else(default_preferences_path),
            ..DashboardConfig::default()
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("{},reqwest=warn,hyper=warn", log_level))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Reads commands from stdin and posts them to the dashboard
async fn read_commands(tx: UnboundedSender<Event>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input");
                break;
            }
        };

        let events = match command::parse(&line) {
            Ok(Command::Ui(events)) => events.into_iter().map(Event::Ui).collect(),
            Ok(Command::Redraw) => vec![Event::Redraw],
            Ok(Command::Help) => {
                println!("{}", HELP);
                continue;
            }
            Ok(Command::Quit) => break,
            Err(e) => {
                println!("{} (type `help` for commands)", e);
                continue;
            }
        };

        for event in events {
            if tx.send(event).is_err() {
                return;
            }
        }
    }

    let _ = tx.send(Event::Shutdown);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = DashboardConfig::from(args);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        api_url = %config.api_base_url,
        refresh_interval_secs = config.refresh_interval_secs,
        request_timeout_secs = ?config.request_timeout_secs,
        "Configuration loaded"
    );

    let preferences =
        PreferenceStore::from_config(&config).context("Failed to open preferences")?;
    tracing::info!(path = ?preferences.path(), "Preferences loaded");

    let api = Arc::new(HttpDashboardApi::new(&config).context("Failed to build HTTP client")?);
    let mut dashboard = Dashboard::new(api, &config, preferences);

    tokio::spawn(read_commands(dashboard.sender()));

    let shutdown = dashboard.sender();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown.send(Event::Shutdown);
        }
    });

    let mut view = TerminalView::new(std::io::stdout());
    dashboard.run(&mut view).await;

    Ok(())
}
