use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Widget},
};

use super::dashboard::message_block;
use super::{AppState, Tab};
use crate::news::{Article, Sentiment};

pub struct NewsPanel<'a> {
    state: &'a AppState,
}

impl<'a> NewsPanel<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }
}

fn sentiment_color(sentiment: Sentiment) -> Color {
    match sentiment {
        Sentiment::Positive => Color::Green,
        Sentiment::Negative => Color::Red,
        Sentiment::Neutral => Color::Gray,
    }
}

fn article_item(article: &Article) -> ListItem<'_> {
    let dim = Style::default().fg(Color::DarkGray);
    ListItem::new(vec![
        Line::from(Span::styled(
            article.title.as_str(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Sentiment: ", dim),
            Span::styled(
                article.sentiment.to_string(),
                Style::default().fg(sentiment_color(article.sentiment)),
            ),
            Span::styled("  Source: ", dim),
            Span::raw(article.source_name.as_str()),
            Span::styled("  Published: ", dim),
            Span::raw(article.published_at.as_str()),
        ]),
        Line::from(Span::styled(
            article.url.as_str(),
            Style::default().fg(Color::Blue),
        )),
        Line::from(""),
    ])
}

impl Widget for NewsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(symbol) = self.state.selected_symbol() else {
            message_block(
                "News",
                "Add a symbol to the watchlist to fetch news.",
                Color::DarkGray,
                area,
                buf,
            );
            return;
        };
        if let Some(message) = self.state.tab_messages.get(&Tab::News) {
            message_block(symbol, message, Color::Yellow, area, buf);
            return;
        }
        let Some(articles) = self.state.news.get(symbol) else {
            message_block(symbol, "Loading...", Color::DarkGray, area, buf);
            return;
        };
        if articles.is_empty() {
            message_block(symbol, "No headlines found.", Color::DarkGray, area, buf);
            return;
        }

        let items: Vec<ListItem> = articles.iter().map(article_item).collect();
        List::new(items)
            .block(
                Block::default()
                    .title(format!(" News for {} ", symbol))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .render(area, buf);
    }
}
