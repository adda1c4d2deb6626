use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    widgets::Widget,
};

use super::chart::{edge_labels, LineChart};
use super::dashboard::message_block;
use super::{AppState, Tab};
use crate::shipping::{IndexPoint, ShippingIndex};

pub struct ShippingPanel<'a> {
    state: &'a AppState,
}

impl<'a> ShippingPanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

fn date_label(point: &IndexPoint) -> String {
    point.date.format("%Y-%m-%d").to_string()
}

impl Widget for ShippingPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(message) = self.state.tab_messages.get(&Tab::Shipping) {
            message_block("Shipping", message, Color::Yellow, area, buf);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        for (index, chunk) in ShippingIndex::ALL.iter().zip(chunks.iter()) {
            let Some(points) = self.state.shipping.get(index) else {
                message_block(index.title(), "Loading...", Color::DarkGray, *chunk, buf);
                continue;
            };
            let data: Vec<(f64, f64)> = points
                .iter()
                .enumerate()
                .map(|(i, p)| (i as f64, p.value))
                .collect();
            LineChart::new(index.title())
                .line(index.path().to_uppercase(), &data, Color::Cyan)
                .x_labels(edge_labels(points, date_label))
                .render(*chunk, buf);
        }
    }
}
