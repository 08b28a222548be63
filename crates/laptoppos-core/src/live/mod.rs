// ── Live-sync manager ──
//
// Owns the single live connection of a client session: guarded connect,
// auth handshake, inbound routing, and fixed-interval reconnection with a
// bounded attempt counter. Each `connect()` starts a session task tagged
// with a generation number; `disconnect()` bumps the generation and
// cancels the task, so a pending reconnect can never outlive it.

mod task;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use laptoppos_api::Connector;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::LiveSyncConfig;
use crate::invalidation::CacheController;
use crate::notify::Notifier;
use crate::router::Router;
use crate::session::SessionProvider;

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Waiting to retry after a close.
    Reconnecting { attempt: u32 },
    /// Gave up after `attempts` reconnects. Only an explicit
    /// [`LiveSync::connect`] starts over.
    Lost { attempts: u32 },
}

// ── LiveSync ─────────────────────────────────────────────────────

/// Handle to the live connection.
///
/// Cheaply cloneable via `Arc<LiveSyncInner>`. Construct one at the
/// application root and hand clones to whatever needs to drive it.
pub struct LiveSync<C: Connector> {
    inner: Arc<LiveSyncInner<C>>,
}

impl<C: Connector> Clone for LiveSync<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct LiveSyncInner<C: Connector> {
    config: LiveSyncConfig,
    connector: C,
    router: Router,
    notifier: Arc<dyn Notifier>,
    session: Arc<dyn SessionProvider>,
    state: watch::Sender<ConnectionState>,
    control: Mutex<Control>,
}

/// Bookkeeping shared by the handle and the session task.
///
/// Every state transition happens with this lock held; it is never held
/// across an `.await`.
#[derive(Default)]
struct Control {
    generation: u64,
    reconnect_attempts: u32,
    cancel: Option<CancellationToken>,
}

impl<C: Connector> LiveSync<C> {
    /// Create the manager. Does NOT connect -- call [`connect()`](Self::connect).
    pub fn new(
        config: LiveSyncConfig,
        connector: C,
        cache: Arc<dyn CacheController>,
        notifier: Arc<dyn Notifier>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let router = Router::new(cache, Arc::clone(&notifier), config.toast_duration);
        let (state, _) = watch::channel(ConnectionState::Disconnected);

        Self {
            inner: Arc::new(LiveSyncInner {
                config,
                connector,
                router,
                notifier,
                session,
                state,
                control: Mutex::new(Control::default()),
            }),
        }
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Open the live connection in the background.
    ///
    /// No-op while a connection is open or an attempt is in flight. From
    /// any other state (including [`ConnectionState::Lost`] and a pending
    /// reconnect) this resets the attempt counter and starts a fresh
    /// session. Must be called within a Tokio runtime.
    pub fn connect(&self) {
        let mut control = self.inner.lock_control();

        if matches!(
            *self.inner.state.borrow(),
            ConnectionState::Connecting | ConnectionState::Connected
        ) {
            debug!("connect ignored: live connection already open or opening");
            return;
        }

        let endpoint = match self.inner.config.endpoint() {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "cannot build live endpoint, not connecting");
                self.inner.state.send_replace(ConnectionState::Disconnected);
                return;
            }
        };

        if let Some(previous) = control.cancel.take() {
            previous.cancel();
        }
        control.generation += 1;
        control.reconnect_attempts = 0;
        let cancel = CancellationToken::new();
        control.cancel = Some(cancel.clone());
        let generation = control.generation;

        self.inner.state.send_replace(ConnectionState::Connecting);
        drop(control);

        info!(url = %endpoint, generation, "starting live session");
        tokio::spawn(task::run(
            Arc::clone(&self.inner),
            endpoint,
            generation,
            cancel,
        ));
    }

    /// Close the live connection and cancel any pending reconnect.
    ///
    /// Idempotent. The state is `Disconnected` as soon as this returns.
    pub fn disconnect(&self) {
        let mut control = self.inner.lock_control();
        control.generation += 1;
        if let Some(cancel) = control.cancel.take() {
            cancel.cancel();
            info!("live connection closed by client");
        }

        self.inner.state.send_if_modified(|state| {
            if *state == ConnectionState::Disconnected {
                false
            } else {
                *state = ConnectionState::Disconnected;
                true
            }
        });
    }

    /// `true` iff the live connection is open.
    pub fn is_connected(&self) -> bool {
        *self.inner.state.borrow() == ConnectionState::Connected
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.state.borrow().clone()
    }

    /// Reconnects attempted since the last successful open.
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.lock_control().reconnect_attempts
    }

    /// Watch connection state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// Connection state transitions as a `Stream`, starting with the current one.
    pub fn state_stream(&self) -> WatchStream<ConnectionState> {
        WatchStream::new(self.inner.state.subscribe())
    }
}

// ── Transitions driven by the session task ───────────────────────

/// What to do after a session's connection closed.
enum AfterClose {
    Retry(std::time::Duration),
    GiveUp(u32),
    Superseded,
}

impl<C: Connector> LiveSyncInner<C> {
    fn lock_control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The socket opened. Returns `false` if the session was superseded.
    fn mark_open(&self, generation: u64) -> bool {
        let mut control = self.lock_control();
        if control.generation != generation {
            return false;
        }
        control.reconnect_attempts = 0;
        self.state.send_replace(ConnectionState::Connected);
        true
    }

    /// A reconnect timer fired. Returns `false` if the session was superseded.
    fn mark_connecting(&self, generation: u64) -> bool {
        let control = self.lock_control();
        if control.generation != generation {
            return false;
        }
        self.state.send_replace(ConnectionState::Connecting);
        true
    }

    /// The connection closed: schedule a retry or give up.
    fn after_close(&self, generation: u64) -> AfterClose {
        let mut control = self.lock_control();
        if control.generation != generation {
            return AfterClose::Superseded;
        }

        let policy = self.config.reconnect;
        if control.reconnect_attempts < policy.max_attempts {
            control.reconnect_attempts += 1;
            let attempt = control.reconnect_attempts;
            self.state
                .send_replace(ConnectionState::Reconnecting { attempt });
            AfterClose::Retry(policy.interval)
        } else {
            let attempts = control.reconnect_attempts;
            control.cancel = None;
            self.state.send_replace(ConnectionState::Lost { attempts });
            AfterClose::GiveUp(attempts)
        }
    }
}
