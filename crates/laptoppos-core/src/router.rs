// ── Message routing ──
//
// Dispatches parsed live messages by their `type` tag. Only `data_update`
// has effects; greetings are acknowledged and anything else is logged.

use std::sync::Arc;
use std::time::Duration;

use laptoppos_api::{InboundMessage, MessageType};
use tracing::{debug, info, warn};

use crate::invalidation::{CacheController, invalidate_resource};
use crate::notify::{Notifier, Toast, change_toast};

/// What the router did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// `connected` or `auth_success`: logged, nothing else.
    Acknowledged(MessageType),
    /// `data_update` applied. `toast` is `None` when no action was sent.
    Applied {
        resource: String,
        invalidated: Vec<&'static str>,
        toast: Option<Toast>,
    },
    /// `data_update` without a resource.
    Ignored,
    /// Unknown `type` tag.
    Unrecognized(String),
}

/// Routes live messages to the cache and the notification surface.
#[derive(Clone)]
pub struct Router {
    cache: Arc<dyn CacheController>,
    notifier: Arc<dyn Notifier>,
    toast_duration: Duration,
}

impl Router {
    pub fn new(
        cache: Arc<dyn CacheController>,
        notifier: Arc<dyn Notifier>,
        toast_duration: Duration,
    ) -> Self {
        Self {
            cache,
            notifier,
            toast_duration,
        }
    }

    pub fn route(&self, message: &InboundMessage) -> Routed {
        match &message.kind {
            MessageType::Connected => {
                info!("live channel greeted by server");
                Routed::Acknowledged(MessageType::Connected)
            }
            MessageType::AuthSuccess => {
                info!("live channel authenticated");
                Routed::Acknowledged(MessageType::AuthSuccess)
            }
            MessageType::DataUpdate => self.apply_update(message),
            MessageType::Unknown(tag) => {
                warn!(message_type = %tag, "unrecognized live message");
                Routed::Unrecognized(tag.clone())
            }
        }
    }

    fn apply_update(&self, message: &InboundMessage) -> Routed {
        let Some(resource) = message.resource.as_deref() else {
            debug!("data_update without resource, ignoring");
            return Routed::Ignored;
        };

        debug!(
            resource,
            action = ?message.action,
            id = ?message.id,
            "applying data update"
        );

        let invalidated = invalidate_resource(resource, self.cache.as_ref());

        let toast = message.action.as_ref().map(|action| {
            let toast = change_toast(resource, action, self.toast_duration);
            self.notifier.show(&toast);
            toast
        });

        Routed::Applied {
            resource: resource.to_owned(),
            invalidated,
            toast,
        }
    }
}
