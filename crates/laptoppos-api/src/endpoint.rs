//! Live endpoint derivation.
//!
//! The live channel always lives at `/ws` on the same host as the page
//! that hosts the client. A page served over `https` talks `wss`,
//! anything served over plain `http` talks `ws`.

use url::Url;

use crate::error::Error;

/// Path of the live channel on the application host.
pub const LIVE_PATH: &str = "/ws";

/// Build the live WebSocket URL for a page origin.
///
/// Only the scheme, host and explicit port of `origin` are used; any path,
/// query or fragment on the page URL is discarded.
pub fn live_endpoint(origin: &Url) -> Result<Url, Error> {
    let scheme = match origin.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => {
            return Err(Error::InvalidEndpoint {
                origin: origin.to_string(),
                reason: format!("unsupported scheme '{other}'"),
            });
        }
    };

    let host = origin.host_str().ok_or_else(|| Error::InvalidEndpoint {
        origin: origin.to_string(),
        reason: "origin has no host".into(),
    })?;

    let mut raw = format!("{scheme}://{host}");
    if let Some(port) = origin.port() {
        raw.push(':');
        raw.push_str(&port.to_string());
    }
    raw.push_str(LIVE_PATH);

    Ok(Url::parse(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint_for(origin: &str) -> Result<Url, Error> {
        live_endpoint(&Url::parse(origin).unwrap())
    }

    #[test]
    fn secure_page_uses_wss() {
        let url = endpoint_for("https://shop.example:8443").unwrap();
        assert_eq!(url.as_str(), "wss://shop.example:8443/ws");
    }

    #[test]
    fn plain_page_uses_ws_and_drops_path() {
        let url = endpoint_for("http://localhost:5000/dashboard?tab=sales").unwrap();
        assert_eq!(url.as_str(), "ws://localhost:5000/ws");
    }

    #[test]
    fn default_port_is_not_spelled_out() {
        let url = endpoint_for("https://pos.example.com/").unwrap();
        assert_eq!(url.as_str(), "wss://pos.example.com/ws");
    }

    #[test]
    fn ipv6_host_keeps_brackets() {
        let url = endpoint_for("http://[::1]:5000").unwrap();
        assert_eq!(url.as_str(), "ws://[::1]:5000/ws");
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        let err = endpoint_for("file:///tmp/index.html").unwrap_err();
        assert!(
            matches!(err, Error::InvalidEndpoint { .. }),
            "expected InvalidEndpoint, got: {err:?}"
        );
    }

    #[test]
    fn hostless_origin_is_rejected() {
        let err = endpoint_for("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint { .. }));
    }
}
