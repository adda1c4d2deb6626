use anyhow::{Context, Result};

use super::types::{Article, EverythingResponse};
use crate::error::AppError;

pub struct NewsClient {
    http: reqwest::Client,
    base_url: String,
}

impl NewsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Latest headlines mentioning `query`, each tagged with a sentiment.
    pub async fn everything(&self, query: &str, api_key: &str) -> Result<Vec<Article>> {
        if api_key.is_empty() {
            return Err(AppError::MissingCredential("news API key").into());
        }
        let url = format!("{}/everything", self.base_url);
        tracing::debug!(query, "Fetching news");

        // Error responses still carry a JSON envelope, so the status code is not checked.
        let resp: EverythingResponse = self
            .http
            .get(&url)
            .query(&[("q", query), ("apiKey", api_key)])
            .send()
            .await
            .context("news HTTP request failed")?
            .json()
            .await
            .context("news JSON parse failed")?;

        if resp.status != "ok" {
            let detail = resp
                .message
                .or(resp.code)
                .unwrap_or_else(|| format!("status {}", resp.status));
            tracing::warn!(query, detail = %detail, "News API returned an error");
            return Err(AppError::NewsApi(detail).into());
        }

        let articles: Vec<Article> = resp
            .articles
            .into_iter()
            .filter_map(|a| a.into_article())
            .collect();
        tracing::info!(query, count = articles.len(), "News fetched");
        Ok(articles)
    }
}
