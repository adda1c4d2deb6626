use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("kite API error ({error_type}): {message}")]
    KiteApi { error_type: String, message: String },

    #[error("news API error: {0}")]
    NewsApi(String),

    #[error("shipping API error: {0}")]
    ShippingApi(String),

    #[error("instrument not found: {0}")]
    InstrumentNotFound(String),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
