use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table, Widget},
};

use super::dashboard::message_block;
use super::{AppState, Tab};
use crate::fundamentals::{FundamentalsSnapshot, STATEMENT_YEARS};
use crate::model::quote::format_optional;

pub struct FundamentalsPanel<'a> {
    state: &'a AppState,
}

impl<'a> FundamentalsPanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

fn info_line(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn render_company(snapshot: &FundamentalsSnapshot, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        info_line("Company Name: ", snapshot.display_name()),
        info_line("Exchange:     ", snapshot.exchange().to_string()),
        info_line("Market Cap:   ", format_optional(snapshot.quote.market_cap)),
        info_line("Last Price:   ", format_optional(snapshot.quote.last_price)),
    ];
    Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" Company Information: {} ", snapshot.symbol))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .render(area, buf);
}

/// Bars are scaled by 100 so two decimals survive the integer chart.
fn render_ratios(snapshot: &FundamentalsSnapshot, area: Rect, buf: &mut Buffer) {
    let bars: Vec<Bar> = snapshot
        .quote
        .ratios()
        .iter()
        .map(|(name, value)| {
            let scaled = value.map(|v| (v.max(0.0) * 100.0).round() as u64).unwrap_or(0);
            Bar::default()
                .label(Line::from(*name))
                .value(scaled)
                .text_value(format_optional(*value))
        })
        .collect();

    BarChart::default()
        .block(
            Block::default()
                .title(" Key Financial Ratios ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(14)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::Yellow))
        .render(area, buf);
}

fn render_statements(snapshot: &FundamentalsSnapshot, area: Rect, buf: &mut Buffer) {
    let mut rows = Vec::new();
    for statement in &snapshot.statements {
        rows.push(
            Row::new(vec![statement.title.to_string()]).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        );
        for row in &statement.rows {
            let mut cells = vec![format!("  {}", row.metric)];
            cells.extend(row.values.iter().map(|v| format!("{:.2}", v)));
            rows.push(Row::new(cells));
        }
    }

    let mut header = vec!["Metric".to_string()];
    header.extend(STATEMENT_YEARS.iter().map(|y| y.to_string()));

    Table::new(
        rows,
        [
            Constraint::Min(22),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(Row::new(header).style(Style::default().fg(Color::Yellow)))
    .block(
        Block::default()
            .title(" Financial Statements ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .render(area, buf);
}

impl Widget for FundamentalsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(symbol) = self.state.selected_symbol() else {
            message_block(
                "Fundamentals",
                "Add a symbol to the watchlist to view fundamentals.",
                Color::DarkGray,
                area,
                buf,
            );
            return;
        };
        if let Some(message) = self.state.tab_messages.get(&Tab::Fundamentals) {
            message_block(symbol, message, Color::Red, area, buf);
            return;
        }
        let Some(snapshot) = self.state.fundamentals.get(symbol) else {
            message_block(symbol, "Loading...", Color::DarkGray, area, buf);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(8)])
            .split(area);
        render_company(snapshot, rows[0], buf);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[1]);
        render_ratios(snapshot, cols[0], buf);
        render_statements(snapshot, cols[1], buf);
    }
}
