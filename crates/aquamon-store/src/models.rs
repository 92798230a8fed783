//! Persisted models for notifications and history.

use core::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use aquamon_types::{Parameter, QualityLabel, Reading};

/// Category of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// Informational, basin has active alerts but acceptable status.
    Info,
    /// Basin status is degraded.
    Warning,
    /// Basin status is poor.
    Danger,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationType::Info => write!(f, "info"),
            NotificationType::Warning => write!(f, "warning"),
            NotificationType::Danger => write!(f, "danger"),
        }
    }
}

/// Notification priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Default priority.
    Normal,
    /// Three or more active alerts, or poor status.
    High,
}

/// The leading offending parameter attached to a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDetail {
    /// The breaching parameter.
    pub parameter: Parameter,
    /// Its value at evaluation time.
    pub current_value: f64,
    /// The warning bound it is measured against.
    pub threshold: f64,
    /// Display unit for the value.
    pub unit: String,
}

/// A persisted, user-facing notification summarizing basin risk.
///
/// Lifecycle: created unread by risk evaluation, mutated only through
/// mark-read, destroyed only through delete/clear-all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier.
    pub id: String,
    /// Owning basin id.
    pub basin_id: String,
    /// Basin display name at creation time.
    pub basin_name: String,
    /// Notification category.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Short title.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Whether the user has read the notification.
    pub is_read: bool,
    /// Priority.
    pub priority: Priority,
    /// Whether the notification came from the periodic risk evaluation.
    pub auto_generated: bool,
    /// Leading offending parameter, when one was identified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterDetail>,
}

/// A basin's state at risk-evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct BasinSnapshot {
    /// Basin id.
    pub basin_id: String,
    /// Basin display name.
    pub basin_name: String,
    /// Composite quality status.
    pub status: QualityLabel,
    /// Number of currently active alerts.
    pub active_alerts: usize,
    /// The reading the status was computed from.
    pub reading: Reading,
    /// The worst offending parameter, if any alert is active.
    pub leading: Option<ParameterDetail>,
}

/// One retained snapshot of a reading plus its computed status.
///
/// Immutable after creation; destroyed only by explicit clear or eviction
/// past the retention cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier.
    pub id: String,
    /// Owning basin id.
    pub basin_id: String,
    /// When the entry was committed.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Water temperature in °C.
    pub temperature: f64,
    /// pH level.
    pub ph: f64,
    /// Dissolved oxygen in mg/L.
    pub dissolved_oxygen: f64,
    /// Ammonia in mg/L.
    pub ammonia: f64,
    /// Nitrite in mg/L.
    pub nitrite: f64,
    /// Nitrate in mg/L.
    pub nitrate: f64,
    /// Water level in percent.
    pub water_level: f64,
    /// Turbidity in NTU.
    pub turbidity: f64,
    /// Composite quality status at commit time.
    pub status: QualityLabel,
    /// Active alert count at commit time.
    pub active_alerts: u32,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HistoryEntry {
    /// Get the value for a parameter.
    #[must_use]
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Temperature => self.temperature,
            Parameter::Ph => self.ph,
            Parameter::DissolvedOxygen => self.dissolved_oxygen,
            Parameter::Ammonia => self.ammonia,
            Parameter::Nitrite => self.nitrite,
            Parameter::Nitrate => self.nitrate,
            Parameter::WaterLevel => self.water_level,
            Parameter::Turbidity => self.turbidity,
        }
    }
}

/// Input for a new history entry; id, basin and timestamp are assigned by
/// the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryEntry {
    /// The evaluated reading.
    pub reading: Reading,
    /// Composite quality status.
    pub status: QualityLabel,
    /// Active alert count.
    pub active_alerts: usize,
    /// Free-form note.
    pub notes: Option<String>,
}

/// Per-parameter arithmetic means over a basin's full history log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryAverages {
    /// Mean temperature.
    pub temperature: f64,
    /// Mean pH.
    pub ph: f64,
    /// Mean dissolved oxygen.
    pub dissolved_oxygen: f64,
    /// Mean ammonia.
    pub ammonia: f64,
    /// Mean nitrite.
    pub nitrite: f64,
    /// Mean nitrate.
    pub nitrate: f64,
    /// Mean water level.
    pub water_level: f64,
    /// Mean turbidity.
    pub turbidity: f64,
}

impl HistoryAverages {
    /// Get the mean for a parameter.
    #[must_use]
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Temperature => self.temperature,
            Parameter::Ph => self.ph,
            Parameter::DissolvedOxygen => self.dissolved_oxygen,
            Parameter::Ammonia => self.ammonia,
            Parameter::Nitrite => self.nitrite,
            Parameter::Nitrate => self.nitrate,
            Parameter::WaterLevel => self.water_level,
            Parameter::Turbidity => self.turbidity,
        }
    }
}

/// Summary statistics derived on demand from a basin's history log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Total entries in the log.
    pub total_entries: usize,
    /// Earliest and latest entry timestamps, `None` when the log is empty.
    pub date_range: Option<DateRange>,
    /// Per-parameter means over the full log.
    pub averages: HistoryAverages,
}

/// Inclusive timestamp range of a history log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest entry timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// Latest entry timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}
