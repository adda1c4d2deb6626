use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

struct Series<'a> {
    name: String,
    points: &'a [(f64, f64)],
    color: Color,
    graph_type: GraphType,
}

/// Multi-series line chart over pre-built `(x, y)` points.
pub struct LineChart<'a> {
    title: String,
    series: Vec<Series<'a>>,
    x_labels: Vec<String>,
    y_bounds: Option<[f64; 2]>,
    empty_message: &'a str,
}

impl<'a> LineChart<'a> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            series: Vec::new(),
            x_labels: Vec::new(),
            y_bounds: None,
            empty_message: "No data",
        }
    }

    pub fn line(mut self, name: impl Into<String>, points: &'a [(f64, f64)], color: Color) -> Self {
        self.series.push(Series {
            name: name.into(),
            points,
            color,
            graph_type: GraphType::Line,
        });
        self
    }

    /// Vertical bars from zero, used for histograms.
    pub fn bars(mut self, name: impl Into<String>, points: &'a [(f64, f64)], color: Color) -> Self {
        self.series.push(Series {
            name: name.into(),
            points,
            color,
            graph_type: GraphType::Bar,
        });
        self
    }

    pub fn x_labels(mut self, labels: Vec<String>) -> Self {
        self.x_labels = labels;
        self
    }

    /// Fixed y range, e.g. `[0, 100]` for oscillators.
    pub fn y_bounds(mut self, bounds: [f64; 2]) -> Self {
        self.y_bounds = Some(bounds);
        self
    }

    pub fn empty_message(mut self, message: &'a str) -> Self {
        self.empty_message = message;
        self
    }

    fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut x = [f64::INFINITY, f64::NEG_INFINITY];
        let mut y = [f64::INFINITY, f64::NEG_INFINITY];
        for s in &self.series {
            for &(px, py) in s.points {
                x[0] = x[0].min(px);
                x[1] = x[1].max(px);
                y[0] = y[0].min(py);
                y[1] = y[1].max(py);
            }
            if s.graph_type == GraphType::Bar && !s.points.is_empty() {
                y[0] = y[0].min(0.0);
                y[1] = y[1].max(0.0);
            }
        }
        if !x[0].is_finite() {
            return None;
        }
        if x[1] - x[0] < f64::EPSILON {
            x[1] = x[0] + 1.0;
        }
        let y = match self.y_bounds {
            Some(fixed) => fixed,
            None => {
                let pad = ((y[1] - y[0]) * 0.05).max(0.01);
                [y[0] - pad, y[1] + pad]
            }
        };
        Some((x, y))
    }
}

impl Widget for LineChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let Some((x_bounds, y_bounds)) = self.bounds() else {
            Paragraph::new(Span::styled(
                self.empty_message,
                Style::default().fg(Color::DarkGray),
            ))
            .block(block)
            .render(area, buf);
            return;
        };

        let datasets: Vec<Dataset> = self
            .series
            .iter()
            .map(|s| {
                Dataset::default()
                    .name(s.name.clone())
                    .marker(symbols::Marker::Braille)
                    .graph_type(s.graph_type)
                    .style(Style::default().fg(s.color))
                    .data(s.points)
            })
            .collect();

        let y_mid = (y_bounds[0] + y_bounds[1]) / 2.0;
        let y_labels = vec![
            Span::raw(format!("{:.2}", y_bounds[0])),
            Span::raw(format!("{:.2}", y_mid)),
            Span::raw(format!("{:.2}", y_bounds[1])),
        ];
        let x_labels: Vec<Span> = self.x_labels.into_iter().map(Span::raw).collect();

        Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds(x_bounds)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds(y_bounds)
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}

/// First, middle and last labels for an x axis indexed by position.
pub fn edge_labels<T, F>(items: &[T], label: F) -> Vec<String>
where
    F: Fn(&T) -> String,
{
    match items.len() {
        0 => Vec::new(),
        1 => vec![label(&items[0])],
        n => vec![label(&items[0]), label(&items[n / 2]), label(&items[n - 1])],
    }
}
