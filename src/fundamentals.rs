use crate::model::quote::Quote;

pub const STATEMENT_YEARS: [&str; 3] = ["2023", "2022", "2021"];

#[derive(Debug, Clone, PartialEq)]
pub struct StatementRow {
    pub metric: &'static str,
    pub values: [f64; 3],
}

/// Placeholder financial statement; no upstream provides these yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub title: &'static str,
    pub rows: Vec<StatementRow>,
}

fn row(metric: &'static str, values: [f64; 3]) -> StatementRow {
    StatementRow { metric, values }
}

pub fn placeholder_statements() -> Vec<Statement> {
    vec![
        Statement {
            title: "Income Statement",
            rows: vec![
                row("Revenue", [1000.0, 900.0, 800.0]),
                row("Net Income", [100.0, 90.0, 80.0]),
                row("EPS", [1.0, 0.9, 0.8]),
            ],
        },
        Statement {
            title: "Balance Sheet",
            rows: vec![
                row("Total Assets", [2000.0, 1800.0, 1600.0]),
                row("Total Liabilities", [1000.0, 900.0, 800.0]),
                row("Total Equity", [1000.0, 900.0, 800.0]),
            ],
        },
        Statement {
            title: "Cash Flow Statement",
            rows: vec![
                row("Operating Cash Flow", [200.0, 180.0, 160.0]),
                row("Investing Cash Flow", [-100.0, -90.0, -80.0]),
                row("Financing Cash Flow", [-50.0, -40.0, -30.0]),
            ],
        },
    ]
}

/// Everything the fundamentals tab shows for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct FundamentalsSnapshot {
    pub symbol: String,
    pub quote: Quote,
    pub statements: Vec<Statement>,
}

impl FundamentalsSnapshot {
    pub fn new(symbol: &str, quote: Quote) -> Self {
        Self {
            symbol: symbol.to_string(),
            quote,
            statements: placeholder_statements(),
        }
    }

    /// The quote carries no company name, so the instrument token stands in for it.
    pub fn display_name(&self) -> String {
        self.quote.instrument_token.to_string()
    }

    pub fn exchange(&self) -> &str {
        self.quote.exchange.as_deref().unwrap_or("N/A")
    }
}
