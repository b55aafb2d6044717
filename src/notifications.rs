use crate::schema::Notification;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NOTIFICATION_RETENTION: usize = 200;

/// Newest-first list of notifications, capped at `retention` entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationFeed {
    retention: usize,
    entries: Vec<Notification>,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_RETENTION)
    }
}

impl NotificationFeed {
    /// A retention of zero is raised to one.
    pub fn new(retention: usize) -> Self {
        Self {
            retention: retention.max(1),
            entries: Vec::new(),
        }
    }

    /// Puts `batch` ahead of the existing entries, keeping the batch's own order, and
    /// drops the oldest entries beyond the retention cap.
    pub fn push_batch(&mut self, batch: Vec<Notification>) {
        if batch.is_empty() {
            return;
        }
        let older = std::mem::replace(&mut self.entries, batch);
        self.entries.extend(older);
        self.entries.truncate(self.retention);
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    pub fn mark_all_read(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
