// ── Runtime live-sync configuration ──
//
// Describes *where* the live channel lives and how it reconnects.
// Never touches disk: `laptoppos-config` (or any embedder) builds it.

use std::time::Duration;

use url::Url;

use crate::error::CoreError;
use crate::notify::TOAST_DURATION;

/// Fixed delay between reconnect attempts.
pub const RECONNECT_INTERVAL: Duration = Duration::from_millis(3000);

/// Reconnects attempted after a close before giving up.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Fixed-interval reconnection policy. There is no backoff growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            interval: RECONNECT_INTERVAL,
            max_attempts: MAX_RECONNECT_ATTEMPTS,
        }
    }
}

/// Configuration for one live-sync session.
#[derive(Debug, Clone)]
pub struct LiveSyncConfig {
    /// Origin of the page hosting the client, e.g. `https://pos.example.com`.
    pub origin: Url,
    pub reconnect: ReconnectPolicy,
    /// Display time of change toasts.
    pub toast_duration: Duration,
}

impl LiveSyncConfig {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            reconnect: ReconnectPolicy::default(),
            toast_duration: TOAST_DURATION,
        }
    }

    /// Live WebSocket endpoint for [`origin`](Self::origin).
    pub fn endpoint(&self) -> Result<Url, CoreError> {
        Ok(laptoppos_api::live_endpoint(&self.origin)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_policy() {
        let config = LiveSyncConfig::new(Url::parse("http://localhost:5000").unwrap());
        assert_eq!(config.reconnect.interval, Duration::from_secs(3));
        assert_eq!(config.reconnect.max_attempts, 5);
        assert_eq!(config.toast_duration, Duration::from_secs(3));
        assert_eq!(config.endpoint().unwrap().as_str(), "ws://localhost:5000/ws");
    }

    #[test]
    fn bad_origin_is_a_config_error() {
        let config = LiveSyncConfig::new(Url::parse("ftp://files.example").unwrap());
        assert!(matches!(config.endpoint(), Err(CoreError::Config { .. })));
    }
}
