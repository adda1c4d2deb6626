use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::chart::{edge_labels, LineChart};
use super::dashboard::message_block;
use super::{AppState, Tab, TechnicalsView};
use crate::indicator::params::IndicatorParam;
use crate::indicator::TechnicalSeries;
use crate::model::bar::Bar;

pub struct TechnicalsPanel<'a> {
    state: &'a AppState,
}

impl<'a> TechnicalsPanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn params_line(&self) -> Vec<Line<'static>> {
        let params = &self.state.indicator_params;
        let spans: Vec<Span> = IndicatorParam::ALL
            .iter()
            .flat_map(|p| {
                let style = if *p == self.state.selected_param {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                [
                    Span::styled(format!("{}: {}", short_label(*p), params.get(*p)), style),
                    Span::styled("  ", Style::default()),
                ]
            })
            .collect();
        let (lo, hi) = self.state.selected_param.range();
        vec![
            Line::from(spans),
            Line::from(Span::styled(
                format!(
                    "{} ({}..={})",
                    self.state.selected_param.label(),
                    lo,
                    hi
                ),
                Style::default().fg(Color::DarkGray),
            )),
        ]
    }

    fn render_charts(&self, view: &TechnicalsView, area: Rect, buf: &mut Buffer) {
        let params = &self.state.indicator_params;
        let s = &view.series;
        let x_labels = || edge_labels(&view.bars, Bar::date_label);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(36),
                Constraint::Percentage(16),
                Constraint::Percentage(16),
                Constraint::Percentage(16),
                Constraint::Percentage(16),
            ])
            .split(area);

        let close = s.close_points();
        let sma = TechnicalSeries::points(&s.sma);
        let ema = TechnicalSeries::points(&s.ema);
        let bb_high = TechnicalSeries::points(&s.bb_high);
        let bb_low = TechnicalSeries::points(&s.bb_low);
        LineChart::new("Price")
            .line("Close Price", &close, Color::White)
            .line(format!("{}-Day SMA", params.sma_window), &sma, Color::Cyan)
            .line(format!("{}-Day EMA", params.ema_window), &ema, Color::Magenta)
            .line("Bollinger High", &bb_high, Color::Green)
            .line("Bollinger Low", &bb_low, Color::Red)
            .x_labels(x_labels())
            .render(chunks[0], buf);

        let rsi = TechnicalSeries::points(&s.rsi);
        LineChart::new(format!("{}-Day RSI", params.rsi_window))
            .line("RSI", &rsi, Color::Yellow)
            .y_bounds([0.0, 100.0])
            .x_labels(x_labels())
            .render(chunks[1], buf);

        let macd = TechnicalSeries::points(&s.macd);
        let signal = TechnicalSeries::points(&s.macd_signal);
        let diff = TechnicalSeries::points(&s.macd_diff);
        LineChart::new("MACD")
            .bars("Histogram", &diff, Color::DarkGray)
            .line("MACD", &macd, Color::Cyan)
            .line("Signal", &signal, Color::Yellow)
            .x_labels(x_labels())
            .render(chunks[2], buf);

        let stoch_k = TechnicalSeries::points(&s.stoch_k);
        let stoch_d = TechnicalSeries::points(&s.stoch_d);
        LineChart::new("Stochastic Oscillator")
            .line("%K", &stoch_k, Color::Cyan)
            .line("%D", &stoch_d, Color::Magenta)
            .y_bounds([0.0, 100.0])
            .x_labels(x_labels())
            .render(chunks[3], buf);

        let atr = TechnicalSeries::points(&s.atr);
        LineChart::new(format!("{}-Day ATR", params.atr_window))
            .line("ATR", &atr, Color::LightBlue)
            .x_labels(x_labels())
            .render(chunks[4], buf);
    }
}

fn short_label(param: IndicatorParam) -> &'static str {
    match param {
        IndicatorParam::SmaWindow => "SMA",
        IndicatorParam::EmaWindow => "EMA",
        IndicatorParam::RsiWindow => "RSI",
        IndicatorParam::BollingerWindow => "BB",
        IndicatorParam::BollingerStdDev => "BB std",
        IndicatorParam::StochWindow => "Stoch",
        IndicatorParam::StochSmoothK => "%K smooth",
        IndicatorParam::AtrWindow => "ATR",
    }
}

impl Widget for TechnicalsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(8)])
            .split(area);

        Paragraph::new(self.params_line())
            .block(
                Block::default()
                    .title(" Indicator Parameters ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .render(chunks[0], buf);

        let Some(symbol) = self.state.selected_symbol() else {
            message_block(
                "Technicals",
                "Add a symbol to the watchlist to chart indicators.",
                Color::DarkGray,
                chunks[1],
                buf,
            );
            return;
        };
        if let Some(message) = self.state.tab_messages.get(&Tab::Technicals) {
            message_block(symbol, message, Color::Red, chunks[1], buf);
            return;
        }
        match self.state.technicals.get(symbol) {
            Some(view) if view.bars.is_empty() => {
                message_block(symbol, "No historical data returned.", Color::DarkGray, chunks[1], buf)
            }
            Some(view) => self.render_charts(view, chunks[1], buf),
            None => message_block(symbol, "Loading...", Color::DarkGray, chunks[1], buf),
        }
    }
}
