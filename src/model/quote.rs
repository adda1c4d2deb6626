use serde::Deserialize;

/// Market quote as used by the fundamentals view.
///
/// The ratio fields are not part of every broker payload; anything missing
/// renders as `N/A`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Quote {
    pub instrument_token: u32,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub last_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub pb_ratio: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
}

impl Quote {
    pub fn ratios(&self) -> [(&'static str, Option<f64>); 3] {
        [
            ("P/E Ratio", self.pe_ratio),
            ("P/B Ratio", self.pb_ratio),
            ("Dividend Yield", self.dividend_yield),
        ]
    }
}

pub fn format_optional(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "N/A".to_string())
}
