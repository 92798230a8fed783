//! Keyed persistence for aquamon notifications and basin history.
//!
//! This crate owns the two long-lived artifacts of the monitoring
//! pipeline:
//!
//! - **Notifications**: persisted, deduplicated, user-facing records of
//!   basin risk, with read/unread and priority state
//!   ([`NotificationManager`]).
//! - **History**: a bounded per-basin log of evaluated readings with
//!   summary statistics and CSV export ([`HistoryStore`]).
//!
//! Both sit on an opaque string [`KeyValueStore`] substrate. The substrate
//! is treated as durable-enough: absent or corrupt entries are recovered
//! as empty, never surfaced as errors.
//!
//! # Example
//!
//! ```
//! use aquamon_store::{HistoryStore, MemoryStore, NewHistoryEntry};
//! use aquamon_types::{QualityLabel, Reading};
//!
//! let store = HistoryStore::new(MemoryStore::new());
//! store.add_entry("basin-1", NewHistoryEntry {
//!     reading: Reading::default(),
//!     status: QualityLabel::Good,
//!     active_alerts: 0,
//!     notes: None,
//! });
//! assert_eq!(store.get_history_stats("basin-1").total_entries, 1);
//! ```

mod error;
mod history;
mod kv;
mod models;
mod notifications;

pub use error::{Error, Result};
pub use history::{HistoryStore, RETENTION_CAP};
pub use kv::{FileStore, KeyValueStore, MemoryStore, default_data_dir};
pub use models::{
    BasinSnapshot, DateRange, HistoryAverages, HistoryEntry, HistoryStats, NewHistoryEntry,
    Notification, NotificationType, ParameterDetail, Priority,
};
pub use notifications::{DEFAULT_DEDUP_WINDOW, NotificationFilter, NotificationManager};
