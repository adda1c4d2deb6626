use chrono::{TimeZone, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::chart::{edge_labels, LineChart};
use super::dashboard::message_block;
use super::AppState;
use crate::model::tick::Tick;

fn clock_label(tick: &Tick) -> String {
    Utc.timestamp_millis_opt(tick.timestamp_ms as i64)
        .single()
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Live price stream for the selected symbol.
pub struct MarketPanel<'a> {
    state: &'a AppState,
}

impl<'a> MarketPanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn summary(&self, ticks: &[Tick]) -> Vec<Line<'static>> {
        let label = |s: &'static str| Span::styled(s, Style::default().fg(Color::DarkGray));
        let Some(last) = ticks.last() else {
            return vec![Line::from(label("No ticks yet."))];
        };
        let first = ticks[0].last_price;
        let change = last.last_price - first;
        let change_pct = if first.abs() > f64::EPSILON {
            change / first * 100.0
        } else {
            0.0
        };
        let color = if change >= 0.0 { Color::Green } else { Color::Red };
        vec![Line::from(vec![
            label("Last: "),
            Span::styled(format!("{:.2}", last.last_price), Style::default().fg(Color::White)),
            label("  Change: "),
            Span::styled(
                format!("{:+.2} ({:+.2}%)", change, change_pct),
                Style::default().fg(color),
            ),
            label("  At: "),
            Span::raw(clock_label(last)),
            label("  Points: "),
            Span::raw(ticks.len().to_string()),
        ])]
    }
}

impl Widget for MarketPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hint = if !self.state.ticker_running {
            Some("Ticker is not connected. Connect from the Settings tab.")
        } else if self.state.selected_symbol().is_none() {
            Some("Add a symbol to the watchlist to stream prices.")
        } else if self.state.selected_token().is_none() {
            Some("Selected symbol is not part of the live subscription.")
        } else {
            None
        };
        if let Some(hint) = hint {
            message_block("Live Data", hint, Color::DarkGray, area, buf);
            return;
        }

        let ticks: Vec<Tick> = self
            .state
            .selected_token()
            .and_then(|token| self.state.tick_buffer.series(token))
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(6)])
            .split(area);

        Paragraph::new(self.summary(&ticks))
            .block(
                Block::default()
                    .title(" Live Data ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .render(chunks[0], buf);

        let origin = ticks.first().map(|t| t.timestamp_ms).unwrap_or(0);
        let points: Vec<(f64, f64)> = ticks
            .iter()
            .map(|t| ((t.timestamp_ms.saturating_sub(origin)) as f64 / 1000.0, t.last_price))
            .collect();
        let symbol = self.state.selected_symbol().unwrap_or_default();

        LineChart::new(format!("{} last price", symbol))
            .line("Last Price", &points, Color::Cyan)
            .x_labels(edge_labels(&ticks, clock_label))
            .empty_message("Waiting for ticks...")
            .render(chunks[1], buf);
    }
}
