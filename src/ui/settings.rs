use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use super::AppState;
use crate::config::{mask_secret, ApiKeyField};

pub struct SettingsPanel<'a> {
    state: &'a AppState,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn key_lines(&self) -> Vec<Line<'static>> {
        ApiKeyField::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let selected = i == self.state.settings_selected;
                let marker = if selected { "> " } else { "  " };
                let label_style = if selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Line::from(vec![
                    Span::styled(format!("{}{:<22}", marker, field.label()), label_style),
                    Span::styled(
                        mask_secret(self.state.api_keys.get(*field)),
                        Style::default().fg(Color::White),
                    ),
                ])
            })
            .collect()
    }

    fn session_lines(&self) -> Vec<Line<'static>> {
        let dim = Style::default().fg(Color::DarkGray);
        let ticker = match (self.state.ticker_running, self.state.ws_connected) {
            (_, true) => Span::styled("connected", Style::default().fg(Color::Green)),
            (true, false) => Span::styled("connecting", Style::default().fg(Color::Yellow)),
            (false, false) => Span::styled("disconnected", Style::default().fg(Color::Red)),
        };
        let mut lines = vec![
            Line::from(vec![Span::styled("Ticker: ", dim), ticker]),
            Line::from(vec![
                Span::styled("Subscribed: ", dim),
                Span::raw(self.state.subscribed.len().to_string()),
            ]),
        ];

        if self.state.api_keys.has_access_token() {
            lines.push(Line::from(Span::styled(
                "Access token present. [C] connect, [D] disconnect.",
                Style::default().fg(Color::Green),
            )));
            return lines;
        }

        lines.push(Line::from(Span::styled(
            "No access token. [L] show the login URL, sign in, then [G] paste the request token.",
            Style::default().fg(Color::Yellow),
        )));
        if let Some(url) = &self.state.login_url {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Login URL:", dim)));
            lines.push(Line::from(Span::styled(
                url.clone(),
                Style::default().fg(Color::Blue),
            )));
        }
        lines
    }
}

impl Widget for SettingsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(ApiKeyField::ALL.len() as u16 + 2),
                Constraint::Min(5),
            ])
            .split(area);

        Paragraph::new(self.key_lines())
            .block(
                Block::default()
                    .title(" API Keys ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .render(chunks[0], buf);

        Paragraph::new(self.session_lines())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(" Kite Connect ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .render(chunks[1], buf);
    }
}
