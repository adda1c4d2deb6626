use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite;

use super::packet::{mode_message, parse_frame, subscribe_message, TickerMode};
use crate::error::AppError;
use crate::event::{AppEvent, WsConnectionStatus};

/// Exponential backoff for reconnection.
struct ExponentialBackoff {
    current: Duration,
    initial: Duration,
    max: Duration,
    factor: f64,
}

impl ExponentialBackoff {
    fn new(initial: Duration, max: Duration, factor: f64) -> Self {
        Self {
            current: initial,
            initial,
            max,
            factor,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = Duration::from_secs_f64(
            (self.current.as_secs_f64() * self.factor).min(self.max.as_secs_f64()),
        );
        delay
    }

    fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Text frames the ticker sends alongside binary market data.
#[derive(Debug, Deserialize)]
struct TickerTextMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

pub struct KiteTicker {
    url: String,
    tokens: Vec<u32>,
    mode: TickerMode,
    session: u64,
}

impl KiteTicker {
    pub fn new(ws_url: &str, api_key: &str, access_token: &str, tokens: Vec<u32>) -> Result<Self> {
        let url = url::Url::parse_with_params(
            ws_url,
            &[("api_key", api_key), ("access_token", access_token)],
        )
        .with_context(|| format!("invalid ticker url '{}'", ws_url))?;
        Ok(Self {
            url: url.to_string(),
            tokens,
            mode: TickerMode::Full,
            session: 0,
        })
    }

    /// Session id stamped on every tick and status event.
    pub fn with_session(mut self, session: u64) -> Self {
        self.session = session;
        self
    }

    fn status(&self, status: WsConnectionStatus) -> AppEvent {
        AppEvent::WsStatus {
            session: self.session,
            status,
        }
    }

    /// Connect and stream with automatic reconnection until `shutdown` flips.
    pub async fn connect_and_run(
        &self,
        event_tx: mpsc::Sender<AppEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let mut backoff =
            ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(60), 2.0);
        let mut attempt: u32 = 0;

        loop {
            if *shutdown.borrow() {
                break;
            }
            attempt += 1;
            match self.connect_once(&event_tx, &mut shutdown, &mut backoff).await {
                Ok(()) => {
                    let _ = event_tx
                        .send(self.status(WsConnectionStatus::Disconnected))
                        .await;
                    break;
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Ticker connection dropped");
                    let _ = event_tx
                        .send(self.status(WsConnectionStatus::Disconnected))
                        .await;
                    let _ = event_tx
                        .send(AppEvent::LogMessage(format!("Ticker error: {}", e)))
                        .await;

                    let delay = backoff.next_delay();
                    let _ = event_tx
                        .send(self.status(WsConnectionStatus::Reconnecting {
                            attempt,
                            delay_ms: delay.as_millis() as u64,
                        }))
                        .await;

                    tokio::select! {
                        _ = tokio::time::sleep(delay) => continue,
                        _ = shutdown.changed() => {
                            let _ = event_tx
                                .send(AppEvent::LogMessage("Ticker stopped during reconnect".to_string()))
                                .await;
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn connect_once(
        &self,
        event_tx: &mpsc::Sender<AppEvent>,
        shutdown: &mut watch::Receiver<bool>,
        backoff: &mut ExponentialBackoff,
    ) -> Result<()> {
        tracing::info!(tokens = self.tokens.len(), "Connecting to Kite ticker");
        let (ws_stream, _resp) = tokio_tungstenite::connect_async(&self.url)
            .await
            .context("ticker connect failed")?;
        backoff.reset();

        let (mut write, mut read) = ws_stream.split();
        if !self.tokens.is_empty() {
            write
                .send(tungstenite::Message::Text(subscribe_message(&self.tokens)))
                .await
                .context("ticker subscribe failed")?;
            write
                .send(tungstenite::Message::Text(mode_message(self.mode, &self.tokens)))
                .await
                .context("ticker mode change failed")?;
        }

        let _ = event_tx.send(self.status(WsConnectionStatus::Connected)).await;

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(tungstenite::Message::Binary(data))) => {
                            let received_ms = chrono::Utc::now().timestamp_millis().max(0) as u64;
                            match parse_frame(&data, received_ms) {
                                Ok(ticks) if ticks.is_empty() => {}
                                Ok(ticks) => {
                                    let evt = AppEvent::Ticks { session: self.session, ticks };
                                    if event_tx.try_send(evt).is_err() {
                                        tracing::warn!("Event channel full, dropping ticks");
                                    }
                                }
                                Err(e) => {
                                    tracing::debug!(error = %e, "Failed to decode ticker frame");
                                }
                            }
                        }
                        Some(Ok(tungstenite::Message::Text(text))) => {
                            self.handle_text(&text, event_tx).await;
                        }
                        Some(Ok(tungstenite::Message::Close(frame))) => {
                            return Err(AppError::WebSocket(format!("closed by server: {:?}", frame)).into());
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            return Err(AppError::WebSocket(e.to_string()).into());
                        }
                        None => {
                            return Err(AppError::WebSocket("stream ended".to_string()).into());
                        }
                    }
                }
                _ = shutdown.changed() => {
                    let _ = write.send(tungstenite::Message::Close(None)).await;
                    tracing::info!("Ticker shutdown requested");
                    return Ok(());
                }
            }
        }
    }

    async fn handle_text(&self, text: &str, event_tx: &mpsc::Sender<AppEvent>) {
        let Ok(msg) = serde_json::from_str::<TickerTextMessage>(text) else {
            tracing::debug!(text, "Unrecognized ticker text frame");
            return;
        };
        let detail = match &msg.data {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match msg.kind.as_str() {
            "error" => {
                tracing::warn!(detail = %detail, "Ticker reported an error");
                let _ = event_tx
                    .send(AppEvent::Error(format!("Ticker: {}", detail)))
                    .await;
            }
            "message" => {
                let _ = event_tx
                    .send(AppEvent::LogMessage(format!("Ticker: {}", detail)))
                    .await;
            }
            _ => {}
        }
    }
}
