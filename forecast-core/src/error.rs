use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can abort a forecast lookup.
///
/// The client never recovers from any of these locally; the first one hit is
/// handed straight back to the caller.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The upstream answered with a non-success status.
    #[error("request to {url} failed with status {status}: {body}")]
    Http {
        status: StatusCode,
        url: String,
        /// Response text, truncated.
        body: String,
    },

    /// The points payload did not carry the field we index into.
    #[error("response from {url} is missing string field `{field}`")]
    MissingField { url: String, field: &'static str },

    #[error("response from {url} is not valid JSON")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Connection failures, timeouts, broken bodies.
    #[error("failed to send request to {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ForecastError {
    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ForecastError::Http { status, .. } => Some(*status),
            ForecastError::Transport { source, .. } => source.status(),
            _ => None,
        }
    }

    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            ForecastError::Http { url, .. }
            | ForecastError::MissingField { url, .. }
            | ForecastError::Decode { url, .. }
            | ForecastError::Transport { url, .. } => url,
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
