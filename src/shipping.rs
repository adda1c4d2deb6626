use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::AppError;

/// Freight-rate indices shown on the shipping tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShippingIndex {
    /// Baltic Dry Index
    Bdi,
    /// Shanghai Containerized Freight Index
    Scfi,
}

impl ShippingIndex {
    pub const ALL: [ShippingIndex; 2] = [ShippingIndex::Bdi, ShippingIndex::Scfi];

    pub fn path(self) -> &'static str {
        match self {
            ShippingIndex::Bdi => "bdi",
            ShippingIndex::Scfi => "scfi",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ShippingIndex::Bdi => "Baltic Dry Index (BDI)",
            ShippingIndex::Scfi => "Container Shipping Rates (SCFI)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
struct IndexResponse {
    data: Vec<RawIndexPoint>,
}

#[derive(Debug, Deserialize)]
struct RawIndexPoint {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Value")]
    value: f64,
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
pub fn parse_index_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("unrecognized index date '{}'", raw))
}

/// Decode an index payload into points sorted by date.
pub fn parse_index_body(body: &str) -> Result<Vec<IndexPoint>> {
    let resp: IndexResponse = serde_json::from_str(body).context("shipping JSON parse failed")?;
    let mut points = resp
        .data
        .into_iter()
        .map(|p| {
            Ok(IndexPoint {
                date: parse_index_date(&p.date)?,
                value: p.value,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    points.sort_by_key(|p| p.date);
    Ok(points)
}

pub struct ShippingClient {
    http: reqwest::Client,
    base_url: String,
}

impl ShippingClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn index(&self, index: ShippingIndex, api_key: &str) -> Result<Vec<IndexPoint>> {
        if api_key.is_empty() {
            return Err(AppError::MissingCredential("shipping API key").into());
        }
        let url = format!("{}/{}", self.base_url, index.path());
        let resp = self
            .http
            .get(&url)
            .query(&[("apiKey", api_key)])
            .send()
            .await
            .with_context(|| format!("{} HTTP request failed", index.path()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(AppError::ShippingApi(format!("{} returned {}", index.path(), status)).into());
        }

        let body = resp.text().await?;
        let points = parse_index_body(&body)?;
        tracing::info!(index = index.path(), count = points.len(), "Shipping index fetched");
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_index_date_accepts_both_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_index_date("2024-03-01").unwrap(), d);
        assert_eq!(parse_index_date("2024-03-01T00:00:00Z").unwrap(), d);
        assert!(parse_index_date("03/01/2024").is_err());
    }

    #[test]
    fn parse_index_body_sorts_points() {
        let body = r#"{"data":[{"Date":"2024-03-02","Value":1810.0},{"Date":"2024-03-01","Value":1795.5}]}"#;
        let points = parse_index_body(body).unwrap();
        assert_eq!(points.len(), 2);
        assert!(points[0].date < points[1].date);
        assert!((points[0].value - 1795.5).abs() < f64::EPSILON);
    }
}
