use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{
    Config,
    error::{ForecastError, truncate_body},
};

/// A fully-read response: status plus body text.
///
/// Holding one of these never pins a connection; the body has already been
/// drained by the time it is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    pub status: StatusCode,
    pub body: String,
}

impl SessionResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// Turn a non-success status into [`ForecastError::Http`].
    pub fn error_for_status(self, url: &str) -> Result<Self, ForecastError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ForecastError::Http {
                status: self.status,
                url: url.to_string(),
                body: truncate_body(&self.body),
            })
        }
    }

    pub fn json(&self, url: &str) -> Result<Value, ForecastError> {
        serde_json::from_str(&self.body)
            .map_err(|source| ForecastError::Decode { url: url.to_string(), source })
    }
}

/// The one capability the forecast client needs from an HTTP session.
///
/// Implementations are owned by the caller and may be shared by any number of
/// clients; the client only ever borrows one.
#[async_trait]
pub trait HttpSession: Send + Sync {
    async fn get(&self, url: &str) -> Result<SessionResponse, ForecastError>;
}

#[async_trait]
impl HttpSession for Client {
    async fn get(&self, url: &str) -> Result<SessionResponse, ForecastError> {
        let transport =
            |source: reqwest::Error| ForecastError::Transport { url: url.to_string(), source };

        let res = Client::get(self, url)
            .header(reqwest::header::ACCEPT, "application/geo+json")
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        // A failed status wins over a broken error body.
        let body = if status.is_success() {
            res.text().await.map_err(transport)?
        } else {
            res.text().await.unwrap_or_default()
        };

        Ok(SessionResponse { status, body })
    }
}

/// Build a session configured from `config` (User-Agent, timeout).
///
/// api.weather.gov rejects requests without a User-Agent, so callers that
/// don't bring their own client should start here. The returned client is
/// owned by the caller.
pub fn build_session(config: &Config) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent())
        .timeout(Duration::from_secs(config.timeout_secs()))
        .build()
        .context("Failed to build HTTP client")
}
