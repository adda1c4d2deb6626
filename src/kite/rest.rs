use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use super::types::{
    parse_candle_row, HistoricalData, KiteEnvelope, KiteErrorResponse, QuoteData, SessionData,
};
use crate::error::AppError;
use crate::model::bar::Bar;
use crate::model::instrument::{find_by_symbol, parse_instruments_csv, Instrument};
use crate::model::quote::Quote;

const KITE_API_VERSION: &str = "3";

/// `hex(sha256(api_key + request_token + api_secret))`, as required by `/session/token`.
pub fn session_checksum(api_key: &str, request_token: &str, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hasher.update(request_token.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

pub struct KiteRestClient {
    http: reqwest::Client,
    base_url: String,
    login_base_url: String,
    api_key: String,
    instruments: Mutex<Option<Arc<Vec<Instrument>>>>,
}

impl KiteRestClient {
    pub fn new(base_url: &str, login_base_url: &str, api_key: &str, access_token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("X-Kite-Version", HeaderValue::from_static(KITE_API_VERSION));
        if !access_token.is_empty() {
            let auth = format!("token {}:{}", api_key, access_token);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth).context("access token is not a valid header value")?,
            );
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build Kite HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            login_base_url: login_base_url.to_string(),
            api_key: api_key.to_string(),
            instruments: Mutex::new(None),
        })
    }

    /// Browser URL where the user signs in and obtains a request token.
    pub fn login_url(&self) -> Result<String> {
        let url = url::Url::parse_with_params(
            &self.login_base_url,
            &[("v", KITE_API_VERSION), ("api_key", self.api_key.as_str())],
        )
        .with_context(|| format!("invalid login url '{}'", self.login_base_url))?;
        Ok(url.to_string())
    }

    async fn read_envelope<T: DeserializeOwned>(
        resp: reqwest::Response,
        what: &'static str,
    ) -> Result<T> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<KiteErrorResponse>(&body) {
                if !err.message.is_empty() {
                    return Err(AppError::KiteApi {
                        error_type: err.error_type,
                        message: err.message,
                    }
                    .into());
                }
            }
            return Err(anyhow::anyhow!("{} failed with {}: {}", what, status, body));
        }
        let envelope: KiteEnvelope<T> = resp
            .json()
            .await
            .with_context(|| format!("{} JSON parse failed", what))?;
        Ok(envelope.into_result()?)
    }

    /// Exchange a request token for an access token.
    pub async fn generate_session(&self, request_token: &str, api_secret: &str) -> Result<String> {
        let request_token = request_token.trim();
        if request_token.is_empty() {
            return Err(AppError::MissingCredential("request token").into());
        }
        if api_secret.is_empty() {
            return Err(AppError::MissingCredential("Kite API secret").into());
        }
        let checksum = session_checksum(&self.api_key, request_token, api_secret);
        let url = format!("{}/session/token", self.base_url);
        tracing::info!("Generating Kite session");
        let resp = self
            .http
            .post(&url)
            .form(&[
                ("api_key", self.api_key.as_str()),
                ("request_token", request_token),
                ("checksum", checksum.as_str()),
            ])
            .send()
            .await
            .context("generate_session HTTP failed")?;
        let session: SessionData = Self::read_envelope(resp, "generate_session").await?;
        tracing::info!(user_id = ?session.user_id, "Kite session established");
        Ok(session.access_token)
    }

    /// Full instrument master, fetched once per client.
    pub async fn instruments(&self) -> Result<Arc<Vec<Instrument>>> {
        let mut cache = self.instruments.lock().await;
        if let Some(cached) = cache.as_ref() {
            return Ok(cached.clone());
        }
        let url = format!("{}/instruments", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("instruments HTTP failed")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<KiteErrorResponse>(&body) {
                return Err(AppError::KiteApi {
                    error_type: err.error_type,
                    message: err.message,
                }
                .into());
            }
            return Err(anyhow::anyhow!("instruments failed with {}", status));
        }
        let body = resp.text().await.context("instruments body read failed")?;
        let rows = Arc::new(parse_instruments_csv(&body).map_err(AppError::from)?);
        tracing::info!(count = rows.len(), "Instrument dump loaded");
        *cache = Some(rows.clone());
        Ok(rows)
    }

    pub async fn instrument_token(&self, symbol: &str, exchange: Option<&str>) -> Result<u32> {
        let instruments = self.instruments().await?;
        find_by_symbol(&instruments, symbol, exchange)
            .map(|i| i.instrument_token)
            .ok_or_else(|| AppError::InstrumentNotFound(symbol.to_string()).into())
    }

    /// Resolve every symbol that exists; unknown symbols are logged and skipped.
    pub async fn instrument_tokens(
        &self,
        symbols: &[String],
        exchange: Option<&str>,
    ) -> Result<Vec<(String, u32)>> {
        let instruments = self.instruments().await?;
        let mut out = Vec::with_capacity(symbols.len());
        for sym in symbols {
            match find_by_symbol(&instruments, sym, exchange) {
                Some(i) => out.push((sym.clone(), i.instrument_token)),
                None => tracing::warn!(symbol = %sym, "No instrument for watchlist symbol"),
            }
        }
        Ok(out)
    }

    pub async fn historical_data(
        &self,
        instrument_token: u32,
        from: NaiveDate,
        to: NaiveDate,
        interval: &str,
    ) -> Result<Vec<Bar>> {
        let url = format!(
            "{}/instruments/historical/{}/{}",
            self.base_url, instrument_token, interval
        );
        let from_s = format!("{} 00:00:00", from.format("%Y-%m-%d"));
        let to_s = format!("{} 23:59:59", to.format("%Y-%m-%d"));
        let resp = self
            .http
            .get(&url)
            .query(&[("from", from_s.as_str()), ("to", to_s.as_str())])
            .send()
            .await
            .context("historical_data HTTP failed")?;
        let data: HistoricalData = Self::read_envelope(resp, "historical_data").await?;
        let mut bars = data
            .candles
            .iter()
            .map(|row| parse_candle_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        bars.sort_by_key(|b| b.timestamp_ms);
        tracing::debug!(instrument_token, interval, count = bars.len(), "Historical bars loaded");
        Ok(bars)
    }

    pub async fn quote(&self, exchange: &str, symbol: &str) -> Result<Quote> {
        let key = format!("{}:{}", exchange, symbol);
        let url = format!("{}/quote", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("i", key.as_str())])
            .send()
            .await
            .context("quote HTTP failed")?;
        let mut data: QuoteData = Self::read_envelope(resp, "quote").await?;
        let mut quote = data
            .remove(&key)
            .ok_or_else(|| AppError::InstrumentNotFound(key.clone()))?;
        if quote.exchange.is_none() {
            quote.exchange = Some(exchange.to_string());
        }
        Ok(quote)
    }
}
