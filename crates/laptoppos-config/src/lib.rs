//! Shared configuration for LaptopPOS live-sync tools.
//!
//! TOML file + `LAPTOPPOS_*` environment overrides, and translation to
//! `laptoppos_core::LiveSyncConfig`. The CLI layers its flag overrides on
//! top of the loaded [`Config`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use laptoppos_core::{Identity, LiveSyncConfig, ReconnectPolicy};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Origin of the LaptopPOS web app, e.g. "https://pos.example.com".
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Tenant the live channel authenticates as.
    pub tenant_id: Option<String>,

    /// User the live channel authenticates as.
    pub user_id: Option<String>,

    #[serde(default)]
    pub reconnect: ReconnectSettings,

    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    /// Timeout for query refetches, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            tenant_id: None,
            user_id: None,
            reconnect: ReconnectSettings::default(),
            toast_duration_ms: default_toast_duration_ms(),
            request_timeout: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReconnectSettings {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_origin() -> String {
    "http://localhost:5000".into()
}
fn default_toast_duration_ms() -> u64 {
    3000
}
fn default_request_timeout() -> u64 {
    30
}
fn default_interval_ms() -> u64 {
    3000
}
fn default_max_attempts() -> u32 {
    5
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "laptoppos", "laptoppos").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("laptoppos");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment.
///
/// A missing file is not an error; defaults and env still apply.
/// Nested keys use a double underscore: `LAPTOPPOS_RECONNECT__MAX_ATTEMPTS`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LAPTOPPOS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Identity for the live handshake, if both ids are configured.
    pub fn identity(&self) -> Option<Identity> {
        match (&self.tenant_id, &self.user_id) {
            (Some(tenant), Some(user)) => Some(Identity::new(tenant.clone(), user.clone())),
            _ => None,
        }
    }

    pub fn origin_url(&self) -> Result<url::Url, ConfigError> {
        let url: url::Url = self.origin.parse().map_err(|_| ConfigError::Validation {
            field: "origin".into(),
            reason: format!("invalid URL: {}", self.origin),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Validation {
                field: "origin".into(),
                reason: format!("expected an http or https URL, got scheme '{other}'"),
            }),
        }
    }

    /// Build the live-sync settings, validating every field.
    pub fn to_live_sync_config(&self) -> Result<LiveSyncConfig, ConfigError> {
        let origin = self.origin_url()?;

        if self.reconnect.interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "reconnect.interval_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let mut live = LiveSyncConfig::new(origin);
        live.reconnect = ReconnectPolicy {
            interval: Duration::from_millis(self.reconnect.interval_ms),
            max_attempts: self.reconnect.max_attempts,
        };
        live.toast_duration = Duration::from_millis(self.toast_duration_ms);
        Ok(live)
    }

    /// Timeout for REST refetches. Zero would fail every request at once.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        if self.request_timeout == 0 {
            return Err(ConfigError::Validation {
                field: "request_timeout".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(Duration::from_secs(self.request_timeout))
    }
}

// ── Tests ───────────────────────────────────────────────────────────
