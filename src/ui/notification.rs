//! Transient success / error banners.
//!
//! A banner holds at most one message. Showing a new message replaces the old
//! one and restarts the clock, so an older timer can never clear a newer
//! message. Expiry is measured on the tokio clock.

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Default time a notification stays visible.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug)]
struct Notice {
    message: String,
    expires_at: Instant,
}

/// A single-slot banner with a fixed time-to-live.
#[derive(Debug)]
pub struct NotificationPanel {
    ttl: Duration,
    slot: Mutex<Option<Notice>>,
}

impl NotificationPanel {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Display `message` for the panel's TTL.
    pub fn show(&self, message: impl Into<String>) {
        let notice = Notice {
            message: message.into(),
            expires_at: Instant::now() + self.ttl,
        };
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(notice);
        }
    }

    /// The visible message, if one has not yet expired.
    pub fn current(&self) -> Option<String> {
        let mut slot = self.slot.lock().ok()?;
        if let Some(notice) = slot.as_ref() {
            if Instant::now() < notice.expires_at {
                return Some(notice.message.clone());
            }
        }
        *slot = None;
        None
    }

    pub fn is_showing(&self) -> bool {
        self.current().is_some()
    }
}

impl Default for NotificationPanel {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_message_expires_after_ttl() {
        let panel = NotificationPanel::default();
        panel.show("Withdraw successful!");
        assert_eq!(panel.current().as_deref(), Some("Withdraw successful!"));

        tokio::time::advance(Duration::from_millis(2_999)).await;
        assert!(panel.is_showing());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(panel.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_message_restarts_clock() {
        let panel = NotificationPanel::new(Duration::from_secs(3));
        panel.show("first");
        tokio::time::advance(Duration::from_secs(2)).await;
        panel.show("second");
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(panel.current().as_deref(), Some("second"));
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(panel.current().is_none());
    }
}
