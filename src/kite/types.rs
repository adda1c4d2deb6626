use std::collections::HashMap;

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::model::bar::Bar;
use crate::model::quote::Quote;

/// Every Kite Connect REST response is wrapped in this envelope.
#[derive(Debug, Deserialize)]
pub struct KiteEnvelope<T> {
    pub status: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
}

impl<T> KiteEnvelope<T> {
    pub fn into_result(self) -> Result<T, AppError> {
        if self.status == "success" {
            if let Some(data) = self.data {
                return Ok(data);
            }
        }
        Err(AppError::KiteApi {
            error_type: self.error_type.unwrap_or_else(|| "UnknownError".to_string()),
            message: self
                .message
                .unwrap_or_else(|| format!("unexpected status '{}'", self.status)),
        })
    }
}

/// Error-only view used when the HTTP status already signals failure.
#[derive(Debug, Deserialize)]
pub struct KiteErrorResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error_type: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionData {
    pub access_token: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoricalData {
    pub candles: Vec<Vec<Value>>,
}

pub type QuoteData = HashMap<String, Quote>;

/// Candle rows are `[timestamp, open, high, low, close, volume, (oi)]`.
pub fn parse_candle_row(row: &[Value]) -> Result<Bar, AppError> {
    let invalid = |what: &str| AppError::KiteApi {
        error_type: "DataException".to_string(),
        message: format!("invalid candle row ({}): {:?}", what, row),
    };
    if row.len() < 6 {
        return Err(invalid("too short"));
    }
    let ts = row[0].as_str().ok_or_else(|| invalid("timestamp"))?;
    let dt = DateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(ts))
        .map_err(|_| invalid("timestamp format"))?;
    let num = |i: usize, what: &str| row[i].as_f64().ok_or_else(|| invalid(what));
    Ok(Bar {
        timestamp_ms: dt.timestamp_millis().max(0) as u64,
        open: num(1, "open")?,
        high: num(2, "high")?,
        low: num(3, "low")?,
        close: num(4, "close")?,
        volume: num(5, "volume")?,
    })
}
