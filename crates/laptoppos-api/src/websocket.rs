//! Live WebSocket link.
//!
//! The live-sync manager in `laptoppos-core` drives a connection through
//! the [`Connector`] / [`Link`] pair so reconnection logic never depends on
//! a concrete socket. [`TungsteniteConnector`] is the production
//! implementation on top of `tokio-tungstenite`.

use std::future::Future;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, ClientRequestBuilder};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::error::Error;

// ── Frame ────────────────────────────────────────────────────────────

/// A frame surfaced to the live-sync manager.
///
/// Ping/pong and binary frames never reach the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Close { code: Option<u16>, reason: String },
}

// ── Transport seam ───────────────────────────────────────────────────

/// An open full-duplex connection.
pub trait Link: Send + 'static {
    /// Write a text frame.
    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), Error>> + Send;

    /// Read the next frame. `None` once the stream has ended.
    fn next_frame(&mut self) -> impl Future<Output = Option<Result<Frame, Error>>> + Send;

    /// Close the connection, best effort.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Opens [`Link`]s to a live endpoint.
pub trait Connector: Send + Sync + 'static {
    type Link: Link;

    fn open(&self, url: &Url) -> impl Future<Output = Result<Self::Link, Error>> + Send;
}

// ── tokio-tungstenite implementation ─────────────────────────────────

/// Connector backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

impl TungsteniteConnector {
    pub fn new() -> Self {
        Self
    }
}

impl Connector for TungsteniteConnector {
    type Link = TungsteniteLink;

    async fn open(&self, url: &Url) -> Result<TungsteniteLink, Error> {
        tracing::debug!(url = %url, "opening WebSocket");

        let uri: tungstenite::http::Uri = url.as_str().parse().map_err(
            |e: tungstenite::http::uri::InvalidUri| Error::WebSocketConnect(e.to_string()),
        )?;

        let request = ClientRequestBuilder::new(uri);
        let (stream, _response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| Error::WebSocketConnect(e.to_string()))?;

        Ok(TungsteniteLink { stream })
    }
}

/// An open `tokio-tungstenite` socket.
pub struct TungsteniteLink {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Link for TungsteniteLink {
    async fn send_text(&mut self, text: String) -> Result<(), Error> {
        self.stream
            .send(tungstenite::Message::Text(text.into()))
            .await
            .map_err(|e| Error::WebSocketSend(e.to_string()))
    }

    async fn next_frame(&mut self) -> Option<Result<Frame, Error>> {
        loop {
            match self.stream.next().await? {
                Ok(tungstenite::Message::Text(text)) => {
                    return Some(Ok(Frame::Text(text.to_string())));
                }
                Ok(tungstenite::Message::Close(frame)) => {
                    let (code, reason) = frame.map_or((None, String::new()), |cf| {
                        (Some(u16::from(cf.code)), cf.reason.to_string())
                    });
                    return Some(Ok(Frame::Close { code, reason }));
                }
                Ok(tungstenite::Message::Ping(_)) => {
                    // tungstenite answers pings on its own
                    tracing::trace!("WebSocket ping");
                }
                Ok(_) => {
                    // Binary, Pong, raw Frame
                }
                Err(e) => return Some(Err(Error::WebSocketConnect(e.to_string()))),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            tracing::debug!(error = %e, "WebSocket close handshake failed");
        }
    }
}
