use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Widget, Wrap},
};

use super::{AppState, Prompt, Tab};

pub struct StatusBar<'a> {
    pub symbol: &'a str,
    pub ws_connected: bool,
    pub ticker_running: bool,
    pub tick_count: u64,
    pub has_access_token: bool,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let conn_status = match (self.ticker_running, self.ws_connected) {
            (_, true) => Span::styled("LIVE", Style::default().fg(Color::Green)),
            (true, false) => Span::styled("CONNECTING", Style::default().fg(Color::Yellow)),
            (false, false) => Span::styled("OFFLINE", Style::default().fg(Color::Red)),
        };
        let session = if self.has_access_token {
            Span::styled("session ok", Style::default().fg(Color::Green))
        } else {
            Span::styled("no session", Style::default().fg(Color::Yellow))
        };

        let line = Line::from(vec![
            Span::styled(
                " findash ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.symbol, Style::default().fg(Color::Cyan)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            conn_status,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            session,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("ticks: {}", self.tick_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct TabBar {
    pub active: Tab,
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
            .collect();
        Tabs::new(titles)
            .select(self.active.index())
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .divider(Span::styled("|", Style::default().fg(Color::DarkGray)))
            .render(area, buf);
    }
}

/// Watchlist symbols with the latest streamed price, when there is one.
pub struct WatchlistPanel<'a> {
    state: &'a AppState,
}

impl<'a> WatchlistPanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

impl Widget for WatchlistPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Watchlist ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        if self.state.watchlist.is_empty() {
            Paragraph::new(vec![
                Line::from(Span::styled("(empty)", Style::default().fg(Color::DarkGray))),
                Line::from(Span::styled("[A] add", Style::default().fg(Color::Yellow))),
            ])
            .block(block)
            .render(area, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .state
            .watchlist
            .symbols()
            .iter()
            .enumerate()
            .map(|(i, symbol)| {
                let price = self
                    .state
                    .subscribed
                    .get(symbol)
                    .and_then(|token| self.state.tick_buffer.last(*token))
                    .map(|t| format!("{:>9.2}", t.last_price))
                    .unwrap_or_default();
                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<10}", symbol), style),
                    Span::styled(price, Style::default().fg(Color::Green)),
                ]))
            })
            .collect();

        List::new(items).block(block).render(area, buf);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let visible = block.inner(area).height as usize;
        let start = self.messages.len().saturating_sub(visible);

        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|msg| {
                let color = if msg.starts_with("[ERR]") {
                    Color::Red
                } else if msg.starts_with("[WARN]") {
                    Color::Yellow
                } else {
                    Color::Gray
                };
                Line::from(Span::styled(msg.as_str(), Style::default().fg(color)))
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar {
    pub tab: Tab,
}

fn key(label: &'static str) -> Span<'static> {
    Span::styled(label, Style::default().fg(Color::Yellow))
}

fn hint(label: &'static str) -> Span<'static> {
    Span::styled(label, Style::default().fg(Color::DarkGray))
}

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            key(" [Q]"),
            hint("uit  "),
            key("[Tab/1-6]"),
            hint(" switch  "),
        ];
        match self.tab {
            Tab::Settings => spans.extend([
                key("[Up/Down]"),
                hint(" field  "),
                key("[Enter]"),
                hint(" edit  "),
                key("[C]"),
                hint("onnect  "),
                key("[D]"),
                hint("isconnect  "),
                key("[L]"),
                hint("ogin url  "),
                key("[G]"),
                hint("enerate token"),
            ]),
            tab => {
                spans.extend([
                    key("[Up/Down]"),
                    hint(" symbol  "),
                    key("[A]"),
                    hint("dd  "),
                    key("[X]"),
                    hint(" remove  "),
                    key("[R]"),
                    hint("efresh  "),
                ]);
                if tab == Tab::Technicals {
                    spans.extend([key("[ [ ] ]"), hint(" param  "), key("[+/-]"), hint(" adjust")]);
                }
            }
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

pub struct PromptBar<'a> {
    pub prompt: &'a Prompt,
}

impl Widget for PromptBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let shown = if self.prompt.kind.is_secret() {
            "*".repeat(self.prompt.buffer.chars().count())
        } else {
            self.prompt.buffer.clone()
        };
        let line = Line::from(vec![
            Span::styled(
                format!(" {}: ", self.prompt.kind.label()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(shown, Style::default().fg(Color::White)),
            Span::styled("_", Style::default().fg(Color::Yellow)),
            hint("   [Enter] ok  [Esc] cancel"),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Bordered panel holding a single wrapped notice.
pub fn message_block(title: &str, text: &str, color: Color, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(text.to_string(), Style::default().fg(color)))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .render(area, buf);
}
