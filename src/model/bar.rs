use chrono::{DateTime, TimeZone, Utc};

/// One historical OHLCV candle.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp_ms: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_ms as i64).single()
    }

    /// `YYYY-MM-DD` label for chart axes.
    pub fn date_label(&self) -> String {
        self.datetime()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_label_formats_utc_day() {
        let bar = Bar {
            timestamp_ms: 1_700_000_000_000,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 10.0,
        };
        assert_eq!(bar.date_label(), "2023-11-14");
    }
}
