use findash::config::{ApiKeyField, ApiKeys};
use findash::event::{AppEvent, WsConnectionStatus};
use findash::indicator::params::{IndicatorParam, IndicatorParams};
use findash::model::bar::Bar;
use findash::model::tick::Tick;
use findash::news::{Article, Sentiment};
use findash::shipping::{IndexPoint, ShippingIndex};
use findash::ui::{AppState, FetchRequest, PromptKind, Tab};
use findash::watchlist::{AddOutcome, Watchlist};

fn state_with(symbols: &[&str]) -> AppState {
    let watchlist = Watchlist::new(symbols.iter().map(|s| s.to_string()).collect());
    AppState::new(watchlist, ApiKeys::default(), IndicatorParams::default(), 100)
}

fn bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i % 7) as f64;
            Bar {
                timestamp_ms: i as u64 * 86_400_000,
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 10.0,
            }
        })
        .collect()
}

fn subscribed(session: u64, symbol: &str, token: u32) -> AppEvent {
    AppEvent::TickerSubscribed {
        session,
        pairs: vec![(symbol.to_string(), token)],
    }
}

fn ticks(session: u64, token: u32, timestamp_ms: u64, price: f64) -> AppEvent {
    AppEvent::Ticks {
        session,
        ticks: vec![Tick::new(token, timestamp_ms, price)],
    }
}

fn status(session: u64, status: WsConnectionStatus) -> AppEvent {
    AppEvent::WsStatus { session, status }
}

#[test]
/// Verifies ticks are only buffered while the ticker is running.
fn ticks_are_buffered_only_while_running() {
    let mut s = state_with(&["INFY"]);
    s.apply(ticks(0, 408065, 1_000, 1500.0));
    assert!(s.tick_buffer.is_empty());

    let session = s.ticker_started();
    s.apply(subscribed(session, "INFY", 408065));
    s.apply(ticks(session, 408065, 2_000, 1501.0));
    assert_eq!(s.tick_buffer.received(), 1);
    assert_eq!(s.selected_token(), Some(408065));
}

#[test]
/// Verifies disconnect clears buffered ticks and the subscription.
fn ticker_stopped_clears_buffer() {
    let mut s = state_with(&["INFY"]);
    let session = s.ticker_started();
    s.apply(status(session, WsConnectionStatus::Connected));
    s.apply(subscribed(session, "INFY", 408065));
    s.apply(ticks(session, 408065, 1_000, 1500.0));
    assert!(s.ws_connected);

    s.apply(AppEvent::TickerStopped { session });
    assert!(!s.ticker_running);
    assert!(!s.ws_connected);
    assert!(s.tick_buffer.is_empty());
    assert!(s.subscribed.is_empty());
    assert_eq!(s.log_messages.last().map(String::as_str), Some("Ticker disconnected"));

    // a second stop is silent
    let logged = s.log_messages.len();
    s.ticker_stopped();
    assert_eq!(s.log_messages.len(), logged);
}

#[test]
/// Verifies a reconnect ignores everything the previous ticker task still sends.
fn events_from_previous_ticker_session_are_ignored() {
    let mut s = state_with(&["INFY", "TCS"]);
    let first = s.ticker_started();
    s.ticker_stopped();
    let second = s.ticker_started();
    assert_ne!(first, second);
    assert_eq!(s.ticker_session(), second);

    s.apply(subscribed(second, "TCS", 2953217));
    s.apply(status(second, WsConnectionStatus::Connected));

    // the first task finishes its instrument lookup late, then gives up
    s.apply(subscribed(first, "INFY", 408065));
    s.apply(status(first, WsConnectionStatus::Disconnected));
    s.apply(ticks(first, 408065, 1_000, 1500.0));
    s.apply(AppEvent::TickerStopped { session: first });

    assert!(s.ticker_running);
    assert!(s.ws_connected);
    assert_eq!(s.subscribed.get("TCS"), Some(&2953217));
    assert!(!s.subscribed.contains_key("INFY"));
    assert!(s.tick_buffer.is_empty());

    s.apply(ticks(second, 2953217, 2_000, 3900.0));
    assert_eq!(s.tick_buffer.received(), 1);
}

#[test]
fn events_after_disconnect_are_ignored() {
    let mut s = state_with(&["INFY"]);
    let session = s.ticker_started();
    s.ticker_stopped();

    s.apply(subscribed(session, "INFY", 408065));
    s.apply(status(session, WsConnectionStatus::Connected));
    assert!(s.subscribed.is_empty());
    assert!(!s.ws_connected);
}

#[test]
fn subscription_warns_about_unknown_symbols() {
    let mut s = state_with(&["INFY", "NOPE"]);
    let session = s.ticker_started();
    s.apply(subscribed(session, "INFY", 408065));
    assert!(s.log_messages.iter().any(|m| m == "Subscribed 1 instruments"));
    assert!(s.log_messages.iter().any(|m| m == "[WARN] No instrument for NOPE"));
}

#[test]
fn connection_lost_is_only_reported_while_running() {
    let mut s = state_with(&["INFY"]);
    s.apply(status(0, WsConnectionStatus::Disconnected));
    assert!(s.log_messages.is_empty());

    let session = s.ticker_started();
    s.apply(status(
        session,
        WsConnectionStatus::Reconnecting {
            attempt: 2,
            delay_ms: 400,
        },
    ));
    assert!(s
        .log_messages
        .iter()
        .any(|m| m == "[WARN] Reconnecting (attempt 2, wait 400ms)"));
}

#[test]
/// Verifies each tab asks for its fetch exactly once until refreshed.
fn pending_fetch_is_issued_once_per_tab_and_symbol() {
    let mut s = state_with(&["INFY", "TCS"]);
    assert_eq!(s.pending_fetch(), None);

    s.set_tab(Tab::Technicals);
    let request = s.pending_fetch().expect("technicals should need a fetch");
    assert_eq!(request, FetchRequest::Technicals("INFY".to_string()));
    s.mark_requested(request);
    assert_eq!(s.pending_fetch(), None);

    s.select_next();
    assert_eq!(
        s.pending_fetch(),
        Some(FetchRequest::Technicals("TCS".to_string()))
    );

    s.select_prev();
    assert_eq!(s.pending_fetch(), None);
    s.refresh_current();
    assert_eq!(
        s.pending_fetch(),
        Some(FetchRequest::Technicals("INFY".to_string()))
    );

    s.set_tab(Tab::Shipping);
    assert_eq!(s.pending_fetch(), Some(FetchRequest::Shipping));
    s.set_tab(Tab::Settings);
    assert_eq!(s.pending_fetch(), None);
}

#[test]
fn empty_watchlist_needs_no_symbol_fetch() {
    let mut s = state_with(&[]);
    s.set_tab(Tab::News);
    assert_eq!(s.pending_fetch(), None);
    assert_eq!(s.selected_symbol(), None);
}

#[test]
/// Verifies a failed fetch is logged and shown inside its tab.
fn fetch_failed_sets_tab_message() {
    let mut s = state_with(&["INFY"]);
    s.set_tab(Tab::News);
    s.apply(AppEvent::FetchFailed {
        tab: Tab::News,
        symbol: Some("INFY".to_string()),
        message: "Could not fetch news.".to_string(),
    });
    assert_eq!(s.tab_messages.get(&Tab::News).map(String::as_str), Some("Could not fetch news."));
    assert_eq!(
        s.log_messages.last().map(String::as_str),
        Some("[ERR] News: Could not fetch news.")
    );

    // refreshing clears the message and re-arms the fetch
    s.mark_requested(FetchRequest::News("INFY".to_string()));
    s.apply(AppEvent::FetchFailed {
        tab: Tab::News,
        symbol: Some("INFY".to_string()),
        message: "again".to_string(),
    });
    s.refresh_current();
    assert!(!s.tab_messages.contains_key(&Tab::News));
    assert!(s.pending_fetch().is_some());
}

#[test]
fn changing_symbol_clears_per_symbol_messages_only() {
    let mut s = state_with(&["INFY", "TCS"]);
    for (tab, symbol) in [(Tab::Technicals, Some("INFY")), (Tab::Shipping, None)] {
        s.apply(AppEvent::FetchFailed {
            tab,
            symbol: symbol.map(str::to_string),
            message: "boom".to_string(),
        });
    }
    s.select_next();
    assert!(!s.tab_messages.contains_key(&Tab::Technicals));
    assert!(s.tab_messages.contains_key(&Tab::Shipping));
}

#[test]
/// Verifies a failure for a symbol that is no longer selected does not hide the selected one's data.
fn late_failure_for_previous_symbol_is_not_shown() {
    let mut s = state_with(&["INFY", "TCS"]);
    s.set_tab(Tab::Technicals);
    s.mark_requested(FetchRequest::Technicals("INFY".to_string()));
    s.select_next();
    s.mark_requested(FetchRequest::Technicals("TCS".to_string()));

    s.apply(AppEvent::FetchFailed {
        tab: Tab::Technicals,
        symbol: Some("INFY".to_string()),
        message: "Error fetching or processing data: instrument not found: INFY".to_string(),
    });
    s.apply(AppEvent::HistoricalBars {
        symbol: "TCS".to_string(),
        bars: bars(5),
    });

    assert_eq!(s.selected_symbol(), Some("TCS"));
    assert!(s.technicals.contains_key("TCS"));
    assert!(!s.tab_messages.contains_key(&Tab::Technicals));
    assert_eq!(
        s.log_messages.iter().filter(|m| m.starts_with("[ERR] Technicals:")).count(),
        1
    );

    // going back to INFY retries instead of waiting on the failed fetch
    s.select_prev();
    assert_eq!(
        s.pending_fetch(),
        Some(FetchRequest::Technicals("INFY".to_string()))
    );
}

#[test]
fn add_symbol_selects_new_entry() {
    let mut s = state_with(&["INFY"]);
    assert_eq!(s.add_symbol(" tcs "), AddOutcome::Added("TCS".to_string()));
    assert_eq!(s.selected_symbol(), Some("TCS"));

    assert_eq!(s.add_symbol("INFY"), AddOutcome::Duplicate("INFY".to_string()));
    assert_eq!(
        s.log_messages.last().map(String::as_str),
        Some("[WARN] INFY is already in the watchlist")
    );
    assert_eq!(s.watchlist.len(), 2);
}

#[test]
/// Verifies removing a symbol drops its cached data and clamps the selection.
fn remove_selected_drops_cached_data() {
    let mut s = state_with(&["INFY", "TCS"]);
    s.select_next();
    s.apply(AppEvent::HistoricalBars {
        symbol: "TCS".to_string(),
        bars: bars(5),
    });
    s.set_tab(Tab::Technicals);
    s.mark_requested(FetchRequest::Technicals("TCS".to_string()));

    assert_eq!(s.remove_selected(), Some("TCS".to_string()));
    assert!(!s.technicals.contains_key("TCS"));
    assert_eq!(s.selected, 0);
    assert_eq!(s.selected_symbol(), Some("INFY"));

    s.add_symbol("TCS");
    assert_eq!(
        s.pending_fetch(),
        Some(FetchRequest::Technicals("TCS".to_string()))
    );
}

#[test]
fn remove_on_empty_watchlist_is_noop() {
    let mut s = state_with(&[]);
    assert_eq!(s.remove_selected(), None);
}

#[test]
/// Verifies parameter changes recompute loaded series with the new window.
fn adjust_param_recomputes_series() {
    let mut s = state_with(&["INFY"]);
    s.apply(AppEvent::HistoricalBars {
        symbol: "INFY".to_string(),
        bars: bars(30),
    });
    assert!(s.technicals["INFY"].series.sma[10].is_none());

    s.selected_param = IndicatorParam::SmaWindow;
    s.adjust_param(-15);
    assert_eq!(s.indicator_params.sma_window, 5);
    assert!(s.technicals["INFY"].series.sma[4].is_some());
    assert_eq!(s.log_messages.last().map(String::as_str), Some("SMA Window = 5"));

    // clamped at the bottom: no change, no log
    s.adjust_param(-100);
    s.adjust_param(-1);
    let logged = s.log_messages.len();
    s.adjust_param(-1);
    assert_eq!(s.log_messages.len(), logged);
    assert_eq!(s.indicator_params.sma_window, 1);
}

#[test]
fn select_param_cycles() {
    let mut s = state_with(&[]);
    s.select_param(false);
    assert_eq!(s.selected_param, IndicatorParam::AtrWindow);
    s.select_param(true);
    assert_eq!(s.selected_param, IndicatorParam::SmaWindow);
}

#[test]
fn news_and_shipping_events_are_stored() {
    let mut s = state_with(&["INFY"]);
    s.apply(AppEvent::News {
        symbol: "INFY".to_string(),
        articles: vec![Article {
            title: "INFY hits new high".to_string(),
            url: "https://a".to_string(),
            source_name: "Mint".to_string(),
            published_at: "2024-01-01T00:00:00Z".to_string(),
            sentiment: Sentiment::Positive,
        }],
    });
    assert_eq!(s.news["INFY"].len(), 1);

    let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    s.apply(AppEvent::ShippingIndex {
        index: ShippingIndex::Bdi,
        points: vec![IndexPoint { date, value: 1800.0 }],
    });
    assert_eq!(s.shipping[&ShippingIndex::Bdi].len(), 1);
    assert!(!s.shipping.contains_key(&ShippingIndex::Scfi));
}

#[test]
/// Verifies a new access token re-arms every fetch and clears the login URL.
fn access_token_invalidates_fetches() {
    let mut s = state_with(&["INFY"]);
    s.apply(AppEvent::LoginUrl("https://kite.zerodha.com/connect/login?v=3&api_key=k".to_string()));
    assert!(s.login_url.is_some());

    s.set_tab(Tab::Fundamentals);
    s.mark_requested(FetchRequest::Fundamentals("INFY".to_string()));
    s.apply(AppEvent::FetchFailed {
        tab: Tab::Fundamentals,
        symbol: Some("INFY".to_string()),
        message: "Please generate an access token first.".to_string(),
    });

    s.apply(AppEvent::AccessToken("fresh".to_string()));
    assert!(s.api_keys.has_access_token());
    assert!(s.login_url.is_none());
    assert!(s.tab_messages.is_empty());
    assert_eq!(
        s.pending_fetch(),
        Some(FetchRequest::Fundamentals("INFY".to_string()))
    );
}

#[test]
fn prompt_editing() {
    let mut s = state_with(&[]);
    s.open_prompt(PromptKind::EditKey(ApiKeyField::NewsApiKey));
    for c in "abcx".chars() {
        s.prompt_insert(c);
    }
    s.prompt_backspace();
    let prompt = s.take_prompt().expect("prompt should be open");
    assert_eq!(prompt.buffer, "abc");
    assert!(prompt.kind.is_secret());
    assert_eq!(prompt.kind.label(), "News API Key");
    assert!(s.prompt.is_none());
    assert!(!PromptKind::AddSymbol.is_secret());
}

#[test]
fn settings_selection_is_clamped() {
    let mut s = state_with(&[]);
    s.settings_up();
    assert_eq!(s.settings_field(), ApiKeyField::KiteApiKey);
    for _ in 0..20 {
        s.settings_down();
    }
    assert_eq!(s.settings_field(), ApiKeyField::ShippingApiKey);
}

#[test]
fn error_and_log_events_are_logged() {
    let mut s = state_with(&[]);
    s.apply(AppEvent::LogMessage("hello".to_string()));
    s.apply(AppEvent::Error("Ticker: boom".to_string()));
    assert_eq!(s.log_messages, vec!["hello".to_string(), "[ERR] Ticker: boom".to_string()]);
}

#[test]
fn log_is_bounded() {
    let mut s = state_with(&[]);
    for i in 0..250 {
        s.push_log(format!("line {}", i));
    }
    assert_eq!(s.log_messages.len(), 200);
    assert_eq!(s.log_messages[0], "line 50");
}

#[test]
fn tab_cycle_wraps() {
    assert_eq!(Tab::Settings.next(), Tab::Market);
    assert_eq!(Tab::Market.prev(), Tab::Settings);
    assert!(Tab::News.is_per_symbol());
    assert!(!Tab::Shipping.is_per_symbol());
}
