use crate::fundamentals::FundamentalsSnapshot;
use crate::model::bar::Bar;
use crate::model::tick::Tick;
use crate::news::Article;
use crate::shipping::{IndexPoint, ShippingIndex};
use crate::ui::Tab;

#[derive(Debug, Clone)]
pub enum WsConnectionStatus {
    Connected,
    Disconnected,
    Reconnecting { attempt: u32, delay_ms: u64 },
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    // Ticker events carry the session id handed out by `AppState::ticker_started`;
    // events from an earlier session are ignored.
    Ticks {
        session: u64,
        ticks: Vec<Tick>,
    },
    WsStatus {
        session: u64,
        status: WsConnectionStatus,
    },
    /// Watchlist symbols the ticker subscribed, with their instrument tokens.
    TickerSubscribed {
        session: u64,
        pairs: Vec<(String, u32)>,
    },
    /// The ticker task gave up before streaming, e.g. instrument lookup failed.
    TickerStopped {
        session: u64,
    },
    HistoricalBars {
        symbol: String,
        bars: Vec<Bar>,
    },
    Fundamentals(FundamentalsSnapshot),
    News {
        symbol: String,
        articles: Vec<Article>,
    },
    ShippingIndex {
        index: ShippingIndex,
        points: Vec<IndexPoint>,
    },
    /// A background fetch for `tab` failed; shown inside that tab while
    /// `symbol` (if any) is still the selected one.
    FetchFailed {
        tab: Tab,
        symbol: Option<String>,
        message: String,
    },
    AccessToken(String),
    LoginUrl(String),
    LogMessage(String),
    Error(String),
}
