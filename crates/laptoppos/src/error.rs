//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use laptoppos_config::ConfigError;
use laptoppos_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach LaptopPOS at {url}")]
    #[diagnostic(
        code(laptoppos::connection_failed),
        help(
            "Check that the LaptopPOS server is running and reachable.\n\
             Origin: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Live connection failed: {reason}")]
    #[diagnostic(
        code(laptoppos::live_connection),
        help("Check that the server exposes the live channel at /ws.")
    )]
    LiveConnection { reason: String },

    #[error("Live connection lost after {attempts} reconnect attempts")]
    #[diagnostic(
        code(laptoppos::connection_lost),
        help("Live updates have stopped. Check the server and run `laptoppos watch` again.")
    )]
    ConnectionLost { attempts: u32 },

    #[error("Request timed out")]
    #[diagnostic(
        code(laptoppos::timeout),
        help("Increase request_timeout in the config or check server responsiveness.")
    )]
    Timeout,

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(laptoppos::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(laptoppos::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration could not be loaded")]
    #[diagnostic(
        code(laptoppos::config),
        help("Check the file at {path} and any LAPTOPPOS_* environment variables.")
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    // ── Rendering ────────────────────────────────────────────────────
    #[error("Could not render output: {0}")]
    #[diagnostic(code(laptoppos::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. }
            | Self::LiveConnection { .. }
            | Self::ConnectionLost { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn config(path: &std::path::Path, source: ConfigError) -> Self {
        match source {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            source => Self::Config {
                path: path.display().to_string(),
                source,
            },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::LiveChannel { reason } => CliError::LiveConnection { reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::QueryNotFound { key } => CliError::ApiError {
                message: format!("query {key} not found on server"),
            },
            CoreError::Payload { message } | CoreError::Api { message, .. } => {
                CliError::ApiError { message }
            }
            CoreError::Config { message } => CliError::Validation {
                field: "origin".into(),
                reason: message,
            },
        }
    }
}
