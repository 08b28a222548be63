// laptoppos-core: live data invalidation between the LaptopPOS server and its clients.

pub mod cache;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod live;
pub mod notify;
pub mod resource;
pub mod router;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CachedQuery, QueryCache};
pub use config::{LiveSyncConfig, ReconnectPolicy};
pub use error::CoreError;
pub use invalidation::{CacheController, DASHBOARD_STATS_KEY, invalidate_resource};
pub use live::{ConnectionState, LiveSync};
pub use notify::{Notifier, TOAST_DURATION, Toast};
pub use resource::Resource;
pub use router::{Routed, Router};
pub use session::{Identity, SessionProvider, SharedSession};

// Wire types consumers need alongside the manager.
pub use laptoppos_api::{Action, InboundMessage, MessageType, TungsteniteConnector};
