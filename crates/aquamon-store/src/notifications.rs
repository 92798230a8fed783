//! Persisted, deduplicated notifications for basins at risk.

use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use aquamon_types::QualityLabel;

use crate::kv::KeyValueStore;
use crate::models::{BasinSnapshot, Notification, NotificationType, Priority};

const STORAGE_KEY: &str = "aquamon-notifications";

/// Default recency window inside which a repeated notification for the
/// same basin, type and leading parameter is suppressed.
pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::seconds(300);

/// Selector for [`NotificationManager::filtered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationFilter {
    /// Every notification.
    All,
    /// Only unread notifications.
    Unread,
    /// Only notifications of the given type.
    ByType(NotificationType),
}

/// Manages the persisted notification list.
///
/// The full list is serialized as one JSON document under a single key.
/// Each notification moves one way through Created (unread) → Read, and
/// leaves the list only through delete or clear-all.
pub struct NotificationManager<S> {
    store: S,
    dedup_window: Duration,
}

impl<S: KeyValueStore> NotificationManager<S> {
    /// Create a manager over `store` with the default dedup window.
    pub fn new(store: S) -> Self {
        Self {
            store,
            dedup_window: DEFAULT_DEDUP_WINDOW,
        }
    }

    /// Override the dedup window.
    #[must_use]
    pub fn with_dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }

    /// Evaluate a basin snapshot and persist a risk notification if it
    /// warrants one and no equivalent recent notification exists.
    ///
    /// Returns the created notification, or `None` when the basin is
    /// healthy or the notification was deduplicated.
    pub fn generate_basin_risk_notification(
        &self,
        snapshot: &BasinSnapshot,
    ) -> Option<Notification> {
        self.generate_at(snapshot, OffsetDateTime::now_utc())
    }

    fn generate_at(&self, snapshot: &BasinSnapshot, now: OffsetDateTime) -> Option<Notification> {
        if !snapshot.status.is_at_risk() && snapshot.active_alerts == 0 {
            return None;
        }

        let kind = match snapshot.status {
            QualityLabel::Poor => NotificationType::Danger,
            QualityLabel::Warning => NotificationType::Warning,
            _ => NotificationType::Info,
        };
        let priority = if snapshot.active_alerts >= 3 || snapshot.status == QualityLabel::Poor {
            Priority::High
        } else {
            Priority::Normal
        };

        let mut notifications = self.load();

        // Suppress repeats for the same basin, type and leading parameter
        // inside the recency window.
        let leading_parameter = snapshot.leading.as_ref().map(|d| d.parameter);
        let duplicate = notifications.iter().any(|n| {
            n.basin_id == snapshot.basin_id
                && n.kind == kind
                && n.parameters.as_ref().map(|d| d.parameter) == leading_parameter
                && now - n.timestamp < self.dedup_window
        });
        if duplicate {
            debug!(
                basin_id = %snapshot.basin_id,
                %kind,
                "Suppressing duplicate risk notification"
            );
            return None;
        }

        let (title, message) = compose(snapshot, kind);
        let notification = Notification {
            id: format!(
                "{}-{}",
                now.unix_timestamp_nanos() / 1_000_000,
                snapshot.basin_id
            ),
            basin_id: snapshot.basin_id.clone(),
            basin_name: snapshot.basin_name.clone(),
            kind,
            title,
            message,
            timestamp: now,
            is_read: false,
            priority,
            auto_generated: true,
            parameters: snapshot.leading.clone(),
        };

        notifications.insert(0, notification.clone());
        self.save(&notifications);
        Some(notification)
    }

    /// All notifications, newest first.
    pub fn get_notifications(&self) -> Vec<Notification> {
        self.load()
    }

    /// Number of unread notifications.
    pub fn get_unread_count(&self) -> usize {
        self.load().iter().filter(|n| !n.is_read).count()
    }

    /// Notifications matching `filter`, newest first.
    pub fn filtered(&self, filter: NotificationFilter) -> Vec<Notification> {
        let notifications = self.load();
        match filter {
            NotificationFilter::All => notifications,
            NotificationFilter::Unread => {
                notifications.into_iter().filter(|n| !n.is_read).collect()
            }
            NotificationFilter::ByType(kind) => notifications
                .into_iter()
                .filter(|n| n.kind == kind)
                .collect(),
        }
    }

    /// Mark one notification as read. Unknown ids and already-read
    /// notifications are silent no-ops.
    pub fn mark_as_read(&self, id: &str) {
        let mut notifications = self.load();
        if let Some(n) = notifications.iter_mut().find(|n| n.id == id)
            && !n.is_read
        {
            n.is_read = true;
            self.save(&notifications);
        }
    }

    /// Mark every notification as read.
    pub fn mark_all_as_read(&self) {
        let mut notifications = self.load();
        let mut changed = false;
        for n in &mut notifications {
            changed |= !n.is_read;
            n.is_read = true;
        }
        if changed {
            self.save(&notifications);
        }
    }

    /// Delete one notification. Deleting an unknown id is a silent no-op.
    pub fn delete_notification(&self, id: &str) {
        let mut notifications = self.load();
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        if notifications.len() != before {
            self.save(&notifications);
        }
    }

    /// Delete every notification.
    pub fn clear_all_notifications(&self) {
        self.store.remove(STORAGE_KEY);
    }

    fn load(&self) -> Vec<Notification> {
        let Some(raw) = self.store.get(STORAGE_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(notifications) => notifications,
            Err(e) => {
                warn!("Recovering corrupt notification list as empty: {e}");
                Vec::new()
            }
        }
    }

    fn save(&self, notifications: &[Notification]) {
        match serde_json::to_string(notifications) {
            Ok(json) => self.store.put(STORAGE_KEY, &json),
            Err(e) => warn!("Failed to serialize notification list: {e}"),
        }
    }
}

fn compose(snapshot: &BasinSnapshot, kind: NotificationType) -> (String, String) {
    let alerts = snapshot.active_alerts;
    let plural = if alerts == 1 { "alert" } else { "alerts" };
    match kind {
        NotificationType::Danger => (
            format!("Critical: {}", snapshot.basin_name),
            format!(
                "{} has poor water quality with {alerts} active {plural}. Immediate attention required.",
                snapshot.basin_name
            ),
        ),
        NotificationType::Warning => (
            format!("Warning: {}", snapshot.basin_name),
            format!(
                "{} has degraded water quality with {alerts} active {plural}.",
                snapshot.basin_name
            ),
        ),
        NotificationType::Info => (
            format!("Alerts active: {}", snapshot.basin_name),
            format!(
                "{} reports {alerts} active {plural} while overall water quality remains acceptable.",
                snapshot.basin_name
            ),
        ),
    }
}
