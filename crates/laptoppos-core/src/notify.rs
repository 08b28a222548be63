// ── Change notifications ──
//
// Every change pushed over the live channel is surfaced to the user as a
// short toast: "<ResourceLabel> telah <ActionLabel>".

use std::str::FromStr;
use std::time::Duration;

use laptoppos_api::Action;
use serde::Serialize;

use crate::resource::Resource;

/// How long a change toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

/// A transient message for the notification surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub duration: Duration,
}

/// The surface that shows toasts to the user.
pub trait Notifier: Send + Sync {
    fn show(&self, toast: &Toast);

    /// Live updates stopped for good after `attempts` failed reconnects.
    fn connection_lost(&self, attempts: u32);
}

/// Label for a resource name; unknown names are shown as sent.
pub fn resource_label(resource: &str) -> &str {
    match Resource::from_str(resource) {
        Ok(known) => known.label(),
        Err(_) => resource,
    }
}

/// Label for an action; unknown actions are shown as sent.
pub fn action_label(action: &Action) -> &str {
    match action {
        Action::Create => "dibuat",
        Action::Update => "diperbarui",
        Action::Delete => "dihapus",
        Action::Other(raw) => raw.as_str(),
    }
}

/// Compose the toast for one change.
pub fn change_toast(resource: &str, action: &Action, duration: Duration) -> Toast {
    Toast {
        message: format!(
            "{} telah {}",
            resource_label(resource),
            action_label(action)
        ),
        duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_resource_and_action() {
        let toast = change_toast("products", &Action::Create, TOAST_DURATION);
        assert_eq!(toast.message, "Produk telah dibuat");
        assert_eq!(toast.duration, Duration::from_millis(3000));
    }

    #[test]
    fn multi_word_labels() {
        assert_eq!(
            change_toast("service-tickets", &Action::Update, TOAST_DURATION).message,
            "Tiket Servis telah diperbarui"
        );
        assert_eq!(
            change_toast("stock-movements", &Action::Delete, TOAST_DURATION).message,
            "Pergerakan Stok telah dihapus"
        );
    }

    #[test]
    fn unknown_labels_fall_back_to_raw_strings() {
        let toast = change_toast("loyalty-points", &Action::Other("archive".into()), TOAST_DURATION);
        assert_eq!(toast.message, "loyalty-points telah archive");
    }
}
