use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::{mpsc, watch};

use findash::config::{append_env_var, ApiKeyField, ApiKeys, Config};
use findash::error::AppError;
use findash::event::AppEvent;
use findash::fundamentals::FundamentalsSnapshot;
use findash::input::{
    parse_main_command, parse_prompt_command, parse_settings_command, parse_technicals_command,
    PromptCommand, SettingsCommand, TechnicalsCommand, UiCommand,
};
use findash::kite::{KiteRestClient, KiteTicker};
use findash::model::bar::Bar;
use findash::news::NewsClient;
use findash::shipping::{ShippingClient, ShippingIndex};
use findash::ui::{self, AppState, FetchRequest, Prompt, PromptKind, Tab};
use findash::watchlist::{load_watchlist, save_watchlist, AddOutcome};

mod app_helpers;
mod ui_handlers;

use app_helpers::*;
use ui_handlers::*;

/// Handles shared by the key handlers and the background task spawners.
struct AppContext {
    config: Config,
    app_tx: mpsc::Sender<AppEvent>,
    kite: KiteClients,
    news: Arc<NewsClient>,
    shipping: Arc<ShippingClient>,
    ticker_shutdown: Option<watch::Sender<bool>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Failed to install rustls crypto provider");
        std::process::exit(1);
    }

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists (API keys go in .env)");
            std::process::exit(1);
        }
    };

    // Log to a file so output doesn't interfere with the TUI
    let log_file = std::fs::File::create("findash.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        rest_url = %config.kite.rest_base_url,
        ws_url = %config.kite.ws_url,
        exchange = %config.kite.exchange,
        "Starting findash"
    );

    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(256);
    let (quit_tx, quit_rx) = watch::channel(false);

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = quit_tx.send(true);
    });

    let watchlist = load_watchlist(&config.storage.watchlist_path);
    let mut app_state = AppState::new(
        watchlist,
        config.api_keys.clone(),
        config.indicators,
        config.ui.tick_history_len,
    );
    app_state.push_log(format!(
        "findash started | {} symbols | {}",
        app_state.watchlist.len(),
        config.kite.exchange
    ));
    if !app_state.api_keys.has_access_token() {
        app_state.push_log("[WARN] No Kite access token. See the Settings tab.".to_string());
    }

    let mut ctx = AppContext {
        news: Arc::new(NewsClient::new(&config.news.base_url)),
        shipping: Arc::new(ShippingClient::new(&config.shipping.base_url)),
        kite: KiteClients::default(),
        app_tx,
        ticker_shutdown: None,
        config,
    };

    let mut terminal = ratatui::init();

    loop {
        terminal.draw(|frame| ui::render(frame, &app_state))?;

        if crossterm::event::poll(Duration::from_millis(ctx.config.ui.refresh_rate_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                        && matches!(key.code, KeyCode::Char('c'));
                    if ctrl_c || handle_key(&key.code, &mut app_state, &mut ctx) {
                        tracing::info!("User quit");
                        break;
                    }
                }
            }
        }

        while let Ok(evt) = app_rx.try_recv() {
            app_state.apply(evt);
        }

        if let Some(request) = app_state.pending_fetch() {
            app_state.mark_requested(request.clone());
            spawn_fetch(request, &mut app_state, &mut ctx);
        }

        if *quit_rx.borrow() {
            break;
        }
    }

    stop_ticker(&mut app_state, &mut ctx);
    ratatui::restore();
    tracing::info!("Shutdown complete");
    println!("Goodbye! Check findash.log for details.");
    Ok(())
}
