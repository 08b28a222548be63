// ── Session identity ──
//
// The live handshake carries the tenant and user of the signed-in
// session. Identity comes from whoever owns authentication; the live
// channel only reads it at handshake time.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Tenant and user the live channel authenticates as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub tenant_id: String,
    pub user_id: String,
}

impl Identity {
    pub fn new(tenant_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
        }
    }
}

/// Supplies the identity for the auth handshake.
pub trait SessionProvider: Send + Sync {
    /// `None` while nobody is signed in.
    fn identity(&self) -> Option<Identity>;
}

impl SessionProvider for Identity {
    fn identity(&self) -> Option<Identity> {
        Some(self.clone())
    }
}

/// Identity that can be swapped at runtime on sign-in and sign-out.
///
/// The next handshake (initial connect or reconnect) picks up the change.
#[derive(Debug, Default)]
pub struct SharedSession {
    current: ArcSwapOption<Identity>,
}

impl SharedSession {
    pub fn new(identity: Option<Identity>) -> Self {
        Self {
            current: ArcSwapOption::new(identity.map(Arc::new)),
        }
    }

    pub fn sign_in(&self, identity: Identity) {
        self.current.store(Some(Arc::new(identity)));
    }

    pub fn sign_out(&self) {
        self.current.store(None);
    }
}

impl SessionProvider for SharedSession {
    fn identity(&self) -> Option<Identity> {
        self.current.load_full().map(|id| (*id).clone())
    }
}
