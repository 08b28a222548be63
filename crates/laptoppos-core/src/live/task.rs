// ── Session task ──
//
// One spawned task per `connect()`: open → handshake → read until close →
// wait the fixed interval → open again, until the attempt budget runs out
// or the session is cancelled.

use std::sync::Arc;

use laptoppos_api::{AuthMessage, Connector, Frame, InboundMessage, Link};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

use super::{AfterClose, LiveSyncInner};

/// How a single connection ended.
enum Ended {
    Closed,
    Cancelled,
}

pub(super) async fn run<C: Connector>(
    inner: Arc<LiveSyncInner<C>>,
    endpoint: Url,
    generation: u64,
    cancel: CancellationToken,
) {
    loop {
        if let Ended::Cancelled = connect_and_read(&inner, &endpoint, generation, &cancel).await {
            break;
        }

        match inner.after_close(generation) {
            AfterClose::Retry(delay) => {
                info!(
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    attempt = inner.lock_control().reconnect_attempts,
                    "live connection closed, reconnecting"
                );
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(delay) => {}
                }
                if !inner.mark_connecting(generation) {
                    break;
                }
            }
            AfterClose::GiveUp(attempts) => {
                error!(attempts, "live connection lost, giving up");
                inner.notifier.connection_lost(attempts);
                break;
            }
            AfterClose::Superseded => break,
        }
    }

    debug!(generation, "live session task exiting");
}

/// Open one connection and pump frames until it closes or is cancelled.
async fn connect_and_read<C: Connector>(
    inner: &LiveSyncInner<C>,
    endpoint: &Url,
    generation: u64,
    cancel: &CancellationToken,
) -> Ended {
    let opened = tokio::select! {
        biased;
        () = cancel.cancelled() => return Ended::Cancelled,
        opened = inner.connector.open(endpoint) => opened,
    };

    let mut link = match opened {
        Ok(link) => link,
        Err(e) => {
            // A failed handshake is followed by a close, same as in a browser.
            warn!(error = %e, "live connection failed");
            return Ended::Closed;
        }
    };

    if !inner.mark_open(generation) {
        link.close().await;
        return Ended::Cancelled;
    }
    info!(url = %endpoint, "live connection open");

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            link.close().await;
            return Ended::Cancelled;
        }
        () = authenticate(inner, &mut link) => {}
    }

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                link.close().await;
                return Ended::Cancelled;
            }
            frame = link.next_frame() => match frame {
                Some(Ok(Frame::Text(text))) => handle_text(inner, &text),
                Some(Ok(Frame::Close { code, reason })) => {
                    info!(code = ?code, reason = %reason, "live connection closed by server");
                    return Ended::Closed;
                }
                Some(Err(e)) => {
                    warn!(error = %e, "live connection error");
                    return Ended::Closed;
                }
                None => {
                    info!("live stream ended");
                    return Ended::Closed;
                }
            }
        }
    }
}

async fn authenticate<C: Connector>(inner: &LiveSyncInner<C>, link: &mut C::Link) {
    let Some(identity) = inner.session.identity() else {
        warn!("no signed-in session, live connection left unauthenticated");
        return;
    };

    let auth = AuthMessage::new(identity.tenant_id, identity.user_id);
    let sent = match auth.to_json() {
        Ok(json) => link.send_text(json).await,
        Err(e) => Err(e),
    };
    match sent {
        Ok(()) => debug!(tenant_id = %auth.tenant_id, user_id = %auth.user_id, "auth sent"),
        Err(e) => warn!(error = %e, "failed to send live auth"),
    }
}

fn handle_text<C: Connector>(inner: &LiveSyncInner<C>, text: &str) {
    match InboundMessage::parse(text) {
        Ok(message) => {
            inner.router.route(&message);
        }
        Err(e) => warn!(error = %e, "dropping malformed live message"),
    }
}
