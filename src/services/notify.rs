// src/services/notify.rs
use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::Utc;
use log::{info, warn};

use crate::models::{Notification, NotificationKind};

/// Sink for user-facing notifications (toasts).
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str, kind: NotificationKind);
}

/// Logs every notification and keeps the most recent ones for display.
pub struct NotificationCenter {
    capacity: usize,
    recent: Mutex<VecDeque<Notification>>,
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            recent: Mutex::new(VecDeque::new()),
        }
    }

    /// Oldest first.
    pub fn recent(&self) -> Vec<Notification> {
        let recent = self.recent.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        recent.iter().cloned().collect()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        NotificationCenter::new(20)
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, title: &str, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Destructive => warn!("Notification [{}]: {}", title, message),
            NotificationKind::Default => info!("Notification [{}]: {}", title, message),
        }

        let mut recent = self.recent.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(Notification {
            title: title.to_string(),
            message: message.to_string(),
            kind,
            created_at: Utc::now(),
        });
    }
}
