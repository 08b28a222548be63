// ── Cache invalidation ──
//
// Maps a changed resource to the cache keys that must be refetched.
// Dashboard aggregates read from every other resource, so the stats key
// is invalidated on every change.

use std::str::FromStr;

use tracing::debug;

use crate::resource::Resource;

/// Cache key of the dashboard aggregates.
pub const DASHBOARD_STATS_KEY: &str = "/api/dashboard/stats";

/// Query cache the live channel invalidates.
pub trait CacheController: Send + Sync {
    /// Mark everything cached under `key` as stale so dependent views refetch.
    fn invalidate(&self, key: &str);
}

/// Cache keys mapped to `resource`. Unknown resources map to nothing.
pub fn cache_keys_for(resource: &str) -> &'static [&'static str] {
    match Resource::from_str(resource) {
        Ok(known) => known.cache_keys(),
        Err(_) => &[],
    }
}

/// Invalidate every key that depends on `resource`, plus the dashboard
/// stats unless `resource` is the dashboard itself.
///
/// Returns the keys in the order they were invalidated.
pub fn invalidate_resource(resource: &str, cache: &dyn CacheController) -> Vec<&'static str> {
    let mut keys = cache_keys_for(resource).to_vec();
    if resource != Resource::Dashboard.as_ref() {
        keys.push(DASHBOARD_STATS_KEY);
    }

    for key in &keys {
        cache.invalidate(key);
    }

    debug!(resource, keys = ?keys, "invalidated cached queries");
    keys
}
