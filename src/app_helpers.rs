use super::*;

const NEED_ACCESS_TOKEN: &str = "Please generate an access token first.";
const NEED_NEWS_KEY: &str = "Please enter your News API key in the settings tab to fetch news.";
const NEED_SHIPPING_KEY: &str =
    "Please enter your Shipping API key in the settings tab to fetch shipping data.";
const SHIPPING_FAILED: &str =
    "Error fetching shipping data. Please check your API key and endpoint.";

/// One Kite REST client per (api key, access token) pair, so the
/// instrument dump survives between fetches until credentials change.
#[derive(Default)]
pub(super) struct KiteClients {
    cached: Option<(String, String, Arc<KiteRestClient>)>,
}

impl KiteClients {
    pub(super) fn get(&mut self, config: &Config, keys: &ApiKeys) -> Result<Arc<KiteRestClient>> {
        if let Some((api_key, access_token, client)) = &self.cached {
            if api_key == &keys.kite_api_key && access_token == &keys.kite_access_token {
                return Ok(client.clone());
            }
        }
        let client = Arc::new(KiteRestClient::new(
            &config.kite.rest_base_url,
            &config.kite.login_url,
            &keys.kite_api_key,
            &keys.kite_access_token,
        )?);
        self.cached = Some((
            keys.kite_api_key.clone(),
            keys.kite_access_token.clone(),
            client.clone(),
        ));
        Ok(client)
    }
}

fn fetch_failed(tab: Tab, symbol: Option<&str>, message: impl Into<String>) -> AppEvent {
    AppEvent::FetchFailed {
        tab,
        symbol: symbol.map(str::to_string),
        message: message.into(),
    }
}

async fn load_history(
    client: Arc<KiteRestClient>,
    symbol: &str,
    exchange: &str,
    history_days: i64,
    interval: &str,
) -> Result<Vec<Bar>> {
    let token = client.instrument_token(symbol, Some(exchange)).await?;
    let to = chrono::Utc::now().date_naive();
    let from = to - chrono::Duration::days(history_days);
    client.historical_data(token, from, to, interval).await
}

pub(super) fn spawn_fetch(request: FetchRequest, app_state: &mut AppState, ctx: &mut AppContext) {
    let tx = ctx.app_tx.clone();
    match request {
        FetchRequest::Technicals(symbol) => {
            if !app_state.api_keys.has_access_token() {
                app_state.apply(fetch_failed(Tab::Technicals, Some(&symbol), NEED_ACCESS_TOKEN));
                return;
            }
            let client = match ctx.kite.get(&ctx.config, &app_state.api_keys) {
                Ok(c) => c,
                Err(e) => {
                    app_state.apply(fetch_failed(
                        Tab::Technicals,
                        Some(&symbol),
                        format!("Error fetching or processing data: {:#}", e),
                    ));
                    return;
                }
            };
            let exchange = ctx.config.kite.exchange.clone();
            let interval = ctx.config.kite.history_interval.clone();
            let history_days = ctx.config.kite.history_days;
            tokio::spawn(async move {
                let evt =
                    match load_history(client, &symbol, &exchange, history_days, &interval).await {
                        Ok(bars) => AppEvent::HistoricalBars { symbol, bars },
                        Err(e) => {
                            tracing::warn!(symbol = %symbol, error = %e, "Historical fetch failed");
                            fetch_failed(
                                Tab::Technicals,
                                Some(&symbol),
                                format!("Error fetching or processing data: {:#}", e),
                            )
                        }
                    };
                let _ = tx.send(evt).await;
            });
        }
        FetchRequest::Fundamentals(symbol) => {
            if !app_state.api_keys.has_access_token() {
                app_state.apply(fetch_failed(Tab::Fundamentals, Some(&symbol), NEED_ACCESS_TOKEN));
                return;
            }
            let client = match ctx.kite.get(&ctx.config, &app_state.api_keys) {
                Ok(c) => c,
                Err(e) => {
                    app_state.apply(fetch_failed(
                        Tab::Fundamentals,
                        Some(&symbol),
                        format!("Error fetching fundamental data: {:#}", e),
                    ));
                    return;
                }
            };
            let exchange = ctx.config.kite.exchange.clone();
            tokio::spawn(async move {
                let evt = match client.quote(&exchange, &symbol).await {
                    Ok(quote) => AppEvent::Fundamentals(FundamentalsSnapshot::new(&symbol, quote)),
                    Err(e) => {
                        tracing::warn!(symbol = %symbol, error = %e, "Quote fetch failed");
                        fetch_failed(
                            Tab::Fundamentals,
                            Some(&symbol),
                            format!("Error fetching fundamental data: {:#}", e),
                        )
                    }
                };
                let _ = tx.send(evt).await;
            });
        }
        FetchRequest::News(symbol) => {
            let api_key = app_state.api_keys.news_api_key.clone();
            if api_key.is_empty() {
                app_state.apply(fetch_failed(Tab::News, Some(&symbol), NEED_NEWS_KEY));
                return;
            }
            let client = ctx.news.clone();
            tokio::spawn(async move {
                let evt = match client.everything(&symbol, &api_key).await {
                    Ok(articles) => AppEvent::News { symbol, articles },
                    Err(e) => {
                        tracing::warn!(symbol = %symbol, error = %e, "News fetch failed");
                        let message = match e.downcast_ref::<AppError>() {
                            Some(AppError::NewsApi(_)) => "Could not fetch news.".to_string(),
                            _ => format!("Error fetching news: {:#}", e),
                        };
                        fetch_failed(Tab::News, Some(&symbol), message)
                    }
                };
                let _ = tx.send(evt).await;
            });
        }
        FetchRequest::Shipping => {
            let api_key = app_state.api_keys.shipping_api_key.clone();
            if api_key.is_empty() {
                app_state.apply(fetch_failed(Tab::Shipping, None, NEED_SHIPPING_KEY));
                return;
            }
            let client = ctx.shipping.clone();
            tokio::spawn(async move {
                for index in ShippingIndex::ALL {
                    let evt = match client.index(index, &api_key).await {
                        Ok(points) => AppEvent::ShippingIndex { index, points },
                        Err(e) => {
                            tracing::warn!(index = index.path(), error = %e, "Shipping fetch failed");
                            let _ = tx.send(fetch_failed(Tab::Shipping, None, SHIPPING_FAILED)).await;
                            return;
                        }
                    };
                    let _ = tx.send(evt).await;
                }
            });
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn resolve_and_stream(
    client: Arc<KiteRestClient>,
    symbols: Vec<String>,
    ws_url: String,
    exchange: String,
    keys: ApiKeys,
    session: u64,
    tx: mpsc::Sender<AppEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    // The instrument dump can take a while; a disconnect meanwhile ends the task quietly.
    let pairs = tokio::select! {
        pairs = client.instrument_tokens(&symbols, Some(&exchange)) => pairs?,
        _ = shutdown_rx.changed() => return Ok(()),
    };
    let tokens: Vec<u32> = pairs.iter().map(|(_, token)| *token).collect();
    let _ = tx.send(AppEvent::TickerSubscribed { session, pairs }).await;
    let ticker = KiteTicker::new(&ws_url, &keys.kite_api_key, &keys.kite_access_token, tokens)?
        .with_session(session);
    ticker.connect_and_run(tx, shutdown_rx).await
}

pub(super) fn start_ticker(app_state: &mut AppState, ctx: &mut AppContext) {
    if !app_state.api_keys.has_access_token() {
        app_state.push_log(format!("[WARN] {}", NEED_ACCESS_TOKEN));
        return;
    }
    if app_state.ticker_running {
        app_state.push_log("Ticker already running".to_string());
        return;
    }
    let client = match ctx.kite.get(&ctx.config, &app_state.api_keys) {
        Ok(c) => c,
        Err(e) => {
            app_state.apply(AppEvent::Error(format!("Ticker: {:#}", e)));
            return;
        }
    };

    // Replacing the sender also stops any task still holding the old receiver.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    ctx.ticker_shutdown = Some(shutdown_tx);
    let session = app_state.ticker_started();

    let symbols = app_state.watchlist.symbols().to_vec();
    let ws_url = ctx.config.kite.ws_url.clone();
    let exchange = ctx.config.kite.exchange.clone();
    let keys = app_state.api_keys.clone();
    let tx = ctx.app_tx.clone();
    tokio::spawn(async move {
        let result = resolve_and_stream(
            client,
            symbols,
            ws_url,
            exchange,
            keys,
            session,
            tx.clone(),
            shutdown_rx,
        )
        .await;
        if let Err(e) = result {
            tracing::error!(error = %e, "Ticker task failed");
            let _ = tx.send(AppEvent::Error(format!("Ticker: {:#}", e))).await;
            let _ = tx.send(AppEvent::TickerStopped { session }).await;
        }
    });
}

pub(super) fn stop_ticker(app_state: &mut AppState, ctx: &mut AppContext) {
    if let Some(shutdown_tx) = ctx.ticker_shutdown.take() {
        let _ = shutdown_tx.send(true);
    }
    app_state.ticker_stopped();
}

pub(super) fn show_login_url(app_state: &mut AppState, ctx: &mut AppContext) {
    if app_state.api_keys.kite_api_key.is_empty() {
        app_state.push_log("[WARN] Enter the Kite API key first.".to_string());
        return;
    }
    let url = ctx
        .kite
        .get(&ctx.config, &app_state.api_keys)
        .and_then(|client| client.login_url());
    match url {
        Ok(url) => app_state.apply(AppEvent::LoginUrl(url)),
        Err(e) => app_state.apply(AppEvent::Error(format!("{:#}", e))),
    }
}

/// Exchange the request token, then keep the access token in memory and in the env file.
pub(super) fn spawn_generate_session(
    request_token: String,
    app_state: &mut AppState,
    ctx: &mut AppContext,
) {
    let client = match ctx.kite.get(&ctx.config, &app_state.api_keys) {
        Ok(c) => c,
        Err(e) => {
            app_state.apply(AppEvent::Error(format!("{:#}", e)));
            return;
        }
    };
    let api_secret = app_state.api_keys.kite_api_secret.clone();
    let env_path = ctx.config.storage.env_path.clone();
    let tx = ctx.app_tx.clone();
    app_state.push_log("Generating access token...".to_string());
    tokio::spawn(async move {
        match client.generate_session(&request_token, &api_secret).await {
            Ok(access_token) => {
                if let Err(e) = append_env_var(
                    &env_path,
                    ApiKeyField::KiteAccessToken.env_var(),
                    &access_token,
                ) {
                    tracing::warn!(error = %e, "Failed to persist access token");
                    let _ = tx
                        .send(AppEvent::Error(format!("Could not save access token: {:#}", e)))
                        .await;
                }
                let _ = tx.send(AppEvent::AccessToken(access_token)).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session generation failed");
                let _ = tx.send(AppEvent::Error(format!("{:#}", e))).await;
            }
        }
    });
}

pub(super) fn persist_watchlist(app_state: &mut AppState, ctx: &AppContext) {
    if let Err(e) = save_watchlist(&ctx.config.storage.watchlist_path, &app_state.watchlist) {
        tracing::warn!(error = %e, "Failed to save watchlist");
        app_state.apply(AppEvent::Error(format!("Failed to save watchlist: {:#}", e)));
    }
}
