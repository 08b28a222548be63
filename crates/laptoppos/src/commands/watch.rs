//! `laptoppos watch`: follow the live channel until interrupted.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use laptoppos_api::QueryClient;
use laptoppos_core::{
    ConnectionState, CoreError, LiveSync, QueryCache, SharedSession, TungsteniteConnector,
};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::commands::{config_file, effective_config};
use crate::error::CliError;
use crate::notifier::ConsoleNotifier;

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = effective_config(global)?;
    let live = cfg
        .to_live_sync_config()
        .map_err(|e| CliError::config(&config_file(global), e))?;

    let identity = cfg.identity();
    if identity.is_none() {
        warn!("tenant_id/user_id not configured, the live channel will not authenticate");
    }

    let cache = Arc::new(QueryCache::new());
    let refetcher = if args.refetch {
        let timeout = cfg
            .request_timeout()
            .map_err(|e| CliError::config(&config_file(global), e))?;
        let client = QueryClient::new(live.origin.clone(), timeout).map_err(CoreError::from)?;
        Some(tokio::spawn(refetch_loop(
            Arc::clone(&cache),
            cache.subscribe(),
            client,
        )))
    } else {
        None
    };

    let sync = LiveSync::new(
        live,
        TungsteniteConnector::new(),
        cache,
        Arc::new(ConsoleNotifier::new(global)),
        Arc::new(SharedSession::new(identity)),
    );

    let mut states = sync.subscribe_state();
    sync.connect();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("interrupted");
                break Ok(());
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let state = states.borrow_and_update().clone();
                debug!(?state, "live state changed");
                match state {
                    ConnectionState::Connected => info!("live updates active"),
                    ConnectionState::Lost { attempts } => {
                        break Err(CliError::ConnectionLost { attempts });
                    }
                    ConnectionState::Disconnected => break Ok(()),
                    ConnectionState::Connecting | ConnectionState::Reconnecting { .. } => {}
                }
            }
        }
    };

    sync.disconnect();
    if let Some(task) = refetcher {
        task.abort();
    }
    result
}

/// Refetch every invalidated query so the cache stays warm.
async fn refetch_loop(
    cache: Arc<QueryCache>,
    mut invalidated: broadcast::Receiver<String>,
    client: QueryClient,
) {
    loop {
        match invalidated.recv().await {
            Ok(key) => match cache.refresh(&client, &key).await {
                Ok(()) => info!(key, cached = cache.len(), "query refetched"),
                Err(e) => warn!(key, error = %e, "query refetch failed"),
            },
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "refetcher fell behind"),
            Err(RecvError::Closed) => break,
        }
    }
}
