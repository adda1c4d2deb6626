pub mod chart;
pub mod dashboard;
pub mod fundamentals;
pub mod market;
pub mod news;
pub mod settings;
pub mod shipping;
pub mod technicals;

use std::collections::{HashMap, HashSet};

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::config::{ApiKeyField, ApiKeys};
use crate::event::{AppEvent, WsConnectionStatus};
use crate::fundamentals::FundamentalsSnapshot;
use crate::indicator::params::{IndicatorParam, IndicatorParams};
use crate::indicator::TechnicalSeries;
use crate::model::bar::Bar;
use crate::news::Article;
use crate::shipping::{IndexPoint, ShippingIndex};
use crate::tick_buffer::TickBuffer;
use crate::watchlist::{AddOutcome, Watchlist};

use dashboard::{KeybindBar, LogPanel, PromptBar, StatusBar, TabBar, WatchlistPanel};

const MAX_LOG_MESSAGES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Market,
    Technicals,
    Fundamentals,
    News,
    Shipping,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Market,
        Tab::Technicals,
        Tab::Fundamentals,
        Tab::News,
        Tab::Shipping,
        Tab::Settings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Market => "Market",
            Tab::Technicals => "Technicals",
            Tab::Fundamentals => "Fundamentals",
            Tab::News => "News",
            Tab::Shipping => "Shipping",
            Tab::Settings => "Settings",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Tabs whose content depends on the selected watchlist symbol.
    pub fn is_per_symbol(self) -> bool {
        matches!(self, Tab::Technicals | Tab::Fundamentals | Tab::News)
    }
}

/// Background fetch a tab needs before it can show anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchRequest {
    Technicals(String),
    Fundamentals(String),
    News(String),
    Shipping,
}

impl FetchRequest {
    pub fn tab(&self) -> Tab {
        match self {
            FetchRequest::Technicals(_) => Tab::Technicals,
            FetchRequest::Fundamentals(_) => Tab::Fundamentals,
            FetchRequest::News(_) => Tab::News,
            FetchRequest::Shipping => Tab::Shipping,
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        match self {
            FetchRequest::Technicals(s) | FetchRequest::Fundamentals(s) | FetchRequest::News(s) => {
                Some(s)
            }
            FetchRequest::Shipping => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    AddSymbol,
    EditKey(ApiKeyField),
    RequestToken,
}

impl PromptKind {
    pub fn label(self) -> String {
        match self {
            PromptKind::AddSymbol => "Add symbol".to_string(),
            PromptKind::EditKey(field) => field.label().to_string(),
            PromptKind::RequestToken => "Request token".to_string(),
        }
    }

    /// Secrets are echoed masked while typing.
    pub fn is_secret(self) -> bool {
        matches!(self, PromptKind::EditKey(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

#[derive(Debug, Clone)]
pub struct TechnicalsView {
    pub bars: Vec<Bar>,
    pub series: TechnicalSeries,
}

pub struct AppState {
    pub tab: Tab,
    pub watchlist: Watchlist,
    pub selected: usize,
    pub ws_connected: bool,
    pub ticker_running: bool,
    pub tick_buffer: TickBuffer,
    /// Symbol to instrument token for the ticker's current subscription.
    pub subscribed: HashMap<String, u32>,
    pub indicator_params: IndicatorParams,
    pub selected_param: IndicatorParam,
    pub technicals: HashMap<String, TechnicalsView>,
    pub fundamentals: HashMap<String, FundamentalsSnapshot>,
    pub news: HashMap<String, Vec<Article>>,
    pub shipping: HashMap<ShippingIndex, Vec<IndexPoint>>,
    /// Error or warning text shown inside a tab instead of its content.
    pub tab_messages: HashMap<Tab, String>,
    pub api_keys: ApiKeys,
    pub settings_selected: usize,
    pub prompt: Option<Prompt>,
    pub login_url: Option<String>,
    pub log_messages: Vec<String>,
    requested: HashSet<FetchRequest>,
    ticker_session: u64,
}

impl AppState {
    pub fn new(
        watchlist: Watchlist,
        api_keys: ApiKeys,
        indicator_params: IndicatorParams,
        tick_history_len: usize,
    ) -> Self {
        Self {
            tab: Tab::Market,
            watchlist,
            selected: 0,
            ws_connected: false,
            ticker_running: false,
            tick_buffer: TickBuffer::new(tick_history_len),
            subscribed: HashMap::new(),
            indicator_params,
            selected_param: IndicatorParam::SmaWindow,
            technicals: HashMap::new(),
            fundamentals: HashMap::new(),
            news: HashMap::new(),
            shipping: HashMap::new(),
            tab_messages: HashMap::new(),
            api_keys,
            settings_selected: 0,
            prompt: None,
            login_url: None,
            log_messages: Vec::new(),
            requested: HashSet::new(),
            ticker_session: 0,
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    pub fn selected_symbol(&self) -> Option<&str> {
        self.watchlist.get(self.selected)
    }

    pub fn selected_token(&self) -> Option<u32> {
        self.selected_symbol()
            .and_then(|s| self.subscribed.get(s).copied())
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.watchlist.len() {
            self.selected += 1;
            self.on_selection_changed();
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.on_selection_changed();
        }
    }

    fn on_selection_changed(&mut self) {
        self.tab_messages.retain(|tab, _| !tab.is_per_symbol());
    }

    pub fn settings_field(&self) -> ApiKeyField {
        ApiKeyField::ALL[self.settings_selected.min(ApiKeyField::ALL.len() - 1)]
    }

    pub fn settings_up(&mut self) {
        self.settings_selected = self.settings_selected.saturating_sub(1);
    }

    pub fn settings_down(&mut self) {
        if self.settings_selected + 1 < ApiKeyField::ALL.len() {
            self.settings_selected += 1;
        }
    }

    /// Appends a symbol and selects it. The caller persists the list on `Added`.
    pub fn add_symbol(&mut self, raw: &str) -> AddOutcome {
        let outcome = self.watchlist.add(raw);
        match &outcome {
            AddOutcome::Added(symbol) => {
                self.selected = self.watchlist.len() - 1;
                self.on_selection_changed();
                self.push_log(format!("Added {} to watchlist", symbol));
            }
            AddOutcome::Duplicate(symbol) => {
                self.push_log(format!("[WARN] {} is already in the watchlist", symbol));
            }
            AddOutcome::Empty => {}
        }
        outcome
    }

    /// Removes the selected symbol along with its cached tab data.
    pub fn remove_selected(&mut self) -> Option<String> {
        let symbol = self.selected_symbol()?.to_string();
        if !self.watchlist.remove(&symbol) {
            return None;
        }
        self.technicals.remove(&symbol);
        self.fundamentals.remove(&symbol);
        self.news.remove(&symbol);
        self.requested
            .retain(|req| req.symbol() != Some(symbol.as_str()));
        if self.selected >= self.watchlist.len() {
            self.selected = self.watchlist.len().saturating_sub(1);
        }
        self.on_selection_changed();
        self.push_log(format!("Removed {} from watchlist", symbol));
        Some(symbol)
    }

    /// The fetch the current tab still needs, if any.
    pub fn pending_fetch(&self) -> Option<FetchRequest> {
        self.current_request()
            .filter(|request| !self.requested.contains(request))
    }

    pub fn mark_requested(&mut self, request: FetchRequest) {
        self.tab_messages.remove(&request.tab());
        self.requested.insert(request);
    }

    /// Forget the current tab's fetch so the next loop iteration issues it again.
    pub fn refresh_current(&mut self) {
        if let Some(request) = self.current_request() {
            self.requested.remove(&request);
        }
        self.tab_messages.remove(&self.tab);
    }

    /// Forget every fetch, e.g. after credentials change.
    pub fn invalidate_all(&mut self) {
        self.requested.clear();
        self.tab_messages.clear();
    }

    fn current_request(&self) -> Option<FetchRequest> {
        let symbol = self.selected_symbol().map(str::to_string);
        match self.tab {
            Tab::Market | Tab::Settings => None,
            Tab::Shipping => Some(FetchRequest::Shipping),
            Tab::Technicals => symbol.map(FetchRequest::Technicals),
            Tab::Fundamentals => symbol.map(FetchRequest::Fundamentals),
            Tab::News => symbol.map(FetchRequest::News),
        }
    }

    pub fn select_param(&mut self, forward: bool) {
        self.selected_param = if forward {
            self.selected_param.next()
        } else {
            self.selected_param.prev()
        };
    }

    /// Adjust the selected indicator parameter and recompute every loaded series.
    pub fn adjust_param(&mut self, delta: i64) {
        let before = self.indicator_params.get(self.selected_param);
        let after = self.indicator_params.adjust(self.selected_param, delta);
        if before == after {
            return;
        }
        let params = self.indicator_params;
        for view in self.technicals.values_mut() {
            view.series = TechnicalSeries::compute(&view.bars, &params);
        }
        self.push_log(format!("{} = {}", self.selected_param.label(), after));
    }

    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt {
            kind,
            buffer: String::new(),
        });
    }

    pub fn prompt_insert(&mut self, c: char) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.buffer.push(c);
        }
    }

    pub fn prompt_backspace(&mut self) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.buffer.pop();
        }
    }

    pub fn take_prompt(&mut self) -> Option<Prompt> {
        self.prompt.take()
    }

    /// Marks the ticker as running and returns the new session id its events must carry.
    pub fn ticker_started(&mut self) -> u64 {
        self.ticker_session += 1;
        self.ticker_running = true;
        self.push_log("Connecting ticker...".to_string());
        self.ticker_session
    }

    pub fn ticker_session(&self) -> u64 {
        self.ticker_session
    }

    /// Disconnect drops the subscription and all buffered ticks.
    pub fn ticker_stopped(&mut self) {
        let was_running = self.ticker_running;
        self.ticker_running = false;
        self.ws_connected = false;
        self.tick_buffer.clear();
        self.subscribed.clear();
        if was_running {
            self.push_log("Ticker disconnected".to_string());
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Ticks { session, .. }
            | AppEvent::WsStatus { session, .. }
            | AppEvent::TickerSubscribed { session, .. }
            | AppEvent::TickerStopped { session }
                if session != self.ticker_session || !self.ticker_running =>
            {
                tracing::debug!(session, current = self.ticker_session, "Ignoring stale ticker event");
            }
            AppEvent::Ticks { ticks, .. } => {
                self.tick_buffer.extend(ticks);
            }
            AppEvent::WsStatus { status, .. } => match status {
                WsConnectionStatus::Connected => {
                    self.ws_connected = true;
                    self.push_log("Ticker connected".to_string());
                }
                WsConnectionStatus::Disconnected => {
                    self.ws_connected = false;
                    self.push_log("[WARN] Ticker connection lost".to_string());
                }
                WsConnectionStatus::Reconnecting { attempt, delay_ms } => {
                    self.ws_connected = false;
                    self.push_log(format!(
                        "[WARN] Reconnecting (attempt {}, wait {}ms)",
                        attempt, delay_ms
                    ));
                }
            },
            AppEvent::TickerSubscribed { pairs, .. } => {
                self.subscribed = pairs.into_iter().collect();
                let missing: Vec<String> = self
                    .watchlist
                    .symbols()
                    .iter()
                    .filter(|s| !self.subscribed.contains_key(*s))
                    .cloned()
                    .collect();
                self.push_log(format!("Subscribed {} instruments", self.subscribed.len()));
                if !missing.is_empty() {
                    self.push_log(format!("[WARN] No instrument for {}", missing.join(", ")));
                }
            }
            AppEvent::TickerStopped { .. } => {
                self.ticker_stopped();
            }
            AppEvent::HistoricalBars { symbol, bars } => {
                let series = TechnicalSeries::compute(&bars, &self.indicator_params);
                self.push_log(format!("Loaded {} bars for {}", bars.len(), symbol));
                self.technicals
                    .insert(symbol, TechnicalsView { bars, series });
            }
            AppEvent::Fundamentals(snapshot) => {
                self.fundamentals.insert(snapshot.symbol.clone(), snapshot);
            }
            AppEvent::News { symbol, articles } => {
                self.push_log(format!("Fetched {} headlines for {}", articles.len(), symbol));
                self.news.insert(symbol, articles);
            }
            AppEvent::ShippingIndex { index, points } => {
                self.shipping.insert(index, points);
            }
            AppEvent::FetchFailed {
                tab,
                symbol,
                message,
            } => {
                self.push_log(format!("[ERR] {}: {}", tab.title(), message));
                match symbol {
                    Some(symbol) if self.selected_symbol() != Some(symbol.as_str()) => {
                        // Selection moved on; fetch again when the symbol comes back.
                        self.requested.retain(|req| {
                            req.tab() != tab || req.symbol() != Some(symbol.as_str())
                        });
                    }
                    _ => {
                        self.tab_messages.insert(tab, message);
                    }
                }
            }
            AppEvent::AccessToken(token) => {
                self.api_keys.set(ApiKeyField::KiteAccessToken, token);
                self.login_url = None;
                self.invalidate_all();
                self.push_log("Access token generated and saved".to_string());
            }
            AppEvent::LoginUrl(url) => {
                self.push_log(format!("Login URL: {}", url));
                self.login_url = Some(url);
            }
            AppEvent::LogMessage(msg) => {
                self.push_log(msg);
            }
            AppEvent::Error(msg) => {
                self.push_log(format!("[ERR] {}", msg));
            }
        }
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(1), // tabs
            Constraint::Min(10),   // watchlist + tab body
            Constraint::Length(6), // log
            Constraint::Length(1), // keybinds / prompt
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            symbol: state.selected_symbol().unwrap_or("---"),
            ws_connected: state.ws_connected,
            ticker_running: state.ticker_running,
            tick_count: state.tick_buffer.received(),
            has_access_token: state.api_keys.has_access_token(),
        },
        outer[0],
    );
    frame.render_widget(TabBar { active: state.tab }, outer[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(40)])
        .split(outer[2]);

    frame.render_widget(WatchlistPanel::new(state), body[0]);

    match state.tab {
        Tab::Market => frame.render_widget(market::MarketPanel::new(state), body[1]),
        Tab::Technicals => frame.render_widget(technicals::TechnicalsPanel::new(state), body[1]),
        Tab::Fundamentals => {
            frame.render_widget(fundamentals::FundamentalsPanel::new(state), body[1])
        }
        Tab::News => frame.render_widget(news::NewsPanel::new(state), body[1]),
        Tab::Shipping => frame.render_widget(shipping::ShippingPanel::new(state), body[1]),
        Tab::Settings => frame.render_widget(settings::SettingsPanel::new(state), body[1]),
    }

    frame.render_widget(LogPanel::new(&state.log_messages), outer[3]);

    match &state.prompt {
        Some(prompt) => frame.render_widget(PromptBar { prompt }, outer[4]),
        None => frame.render_widget(KeybindBar { tab: state.tab }, outer[4]),
    }
}
