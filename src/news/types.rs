use serde::Deserialize;

use super::sentiment::{classify, Sentiment};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EverythingResponse {
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub source: Option<ArticleSource>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub source_name: String,
    pub published_at: String,
    pub sentiment: Sentiment,
}

impl RawArticle {
    /// Articles without a title carry nothing to tag and are dropped.
    pub fn into_article(self) -> Option<Article> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let sentiment = classify(&title);
        Some(Article {
            sentiment,
            url: self.url.unwrap_or_default(),
            source_name: self
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| "unknown".to_string()),
            published_at: self.published_at.unwrap_or_default(),
            title,
        })
    }
}
