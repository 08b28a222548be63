// ── Core error types ──
//
// Domain errors from laptoppos-core. Consumers never see HTTP status
// codes or socket failures directly; the `From<laptoppos_api::Error>`
// impl translates transport-layer errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach LaptopPOS server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Live connection failed: {reason}")]
    LiveChannel { reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Query not found: {key}")]
    QueryNotFound { key: String },

    #[error("Malformed server payload: {message}")]
    Payload { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<laptoppos_api::Error> for CoreError {
    fn from(err: laptoppos_api::Error) -> Self {
        match err {
            laptoppos_api::Error::InvalidEndpoint { origin, reason } => CoreError::Config {
                message: format!("invalid origin {origin}: {reason}"),
            },
            laptoppos_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            laptoppos_api::Error::WebSocketConnect(reason)
            | laptoppos_api::Error::WebSocketSend(reason) => CoreError::LiveChannel { reason },
            laptoppos_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            laptoppos_api::Error::Http { status, body } => CoreError::Api {
                message: body,
                status: Some(status),
            },
            laptoppos_api::Error::Deserialization { message, body: _ } => {
                CoreError::Payload { message }
            }
            laptoppos_api::Error::Serialization(e) => CoreError::Payload {
                message: e.to_string(),
            },
        }
    }
}
