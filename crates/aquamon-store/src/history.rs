//! Bounded per-basin history of evaluated readings.

use std::path::{Path, PathBuf};

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{info, warn};

use aquamon_types::Parameter;

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;
use crate::models::{DateRange, HistoryAverages, HistoryEntry, HistoryStats, NewHistoryEntry};

/// Maximum number of retained entries per basin. Adding past the cap
/// evicts the oldest entry.
pub const RETENTION_CAP: usize = 1000;

/// Per-basin history log on a key-value substrate.
///
/// Each basin's log is one JSON array under `basin-history-<basin_id>`,
/// newest entry first. Entries are immutable once written and leave the
/// log only through cap eviction or an explicit clear.
pub struct HistoryStore<S> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Create a history store over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Commit a new entry for `basin_id`, evicting the oldest entry when
    /// the log exceeds [`RETENTION_CAP`]. Returns the stored entry.
    pub fn add_entry(&self, basin_id: &str, entry: NewHistoryEntry) -> HistoryEntry {
        self.add_entry_at(basin_id, entry, OffsetDateTime::now_utc())
    }

    fn add_entry_at(
        &self,
        basin_id: &str,
        entry: NewHistoryEntry,
        now: OffsetDateTime,
    ) -> HistoryEntry {
        let reading = &entry.reading;
        let stored = HistoryEntry {
            id: format!("{basin_id}-{}", now.unix_timestamp_nanos() / 1_000_000),
            basin_id: basin_id.to_string(),
            timestamp: now,
            temperature: reading.temperature,
            ph: reading.ph,
            dissolved_oxygen: reading.dissolved_oxygen,
            ammonia: reading.ammonia,
            nitrite: reading.nitrite,
            nitrate: reading.nitrate,
            water_level: reading.water_level,
            turbidity: reading.turbidity,
            status: entry.status,
            active_alerts: entry.active_alerts as u32,
            notes: entry.notes,
        };

        let mut log = self.load(basin_id);
        log.insert(0, stored.clone());
        log.truncate(RETENTION_CAP);
        self.save(basin_id, &log);
        stored
    }

    /// Entries for `basin_id`, newest first, optionally limited.
    pub fn get_history(&self, basin_id: &str, limit: Option<usize>) -> Vec<HistoryEntry> {
        let mut log = self.load(basin_id);
        if let Some(limit) = limit {
            log.truncate(limit);
        }
        log
    }

    /// Summary statistics over the full log. An empty log yields zeroed
    /// averages and no date range.
    pub fn get_history_stats(&self, basin_id: &str) -> HistoryStats {
        let log = self.load(basin_id);
        if log.is_empty() {
            return HistoryStats::default();
        }

        let count = log.len() as f64;
        let mean = |parameter: Parameter| -> f64 {
            log.iter().map(|e| e.get(parameter)).sum::<f64>() / count
        };
        let averages = HistoryAverages {
            temperature: mean(Parameter::Temperature),
            ph: mean(Parameter::Ph),
            dissolved_oxygen: mean(Parameter::DissolvedOxygen),
            ammonia: mean(Parameter::Ammonia),
            nitrite: mean(Parameter::Nitrite),
            nitrate: mean(Parameter::Nitrate),
            water_level: mean(Parameter::WaterLevel),
            turbidity: mean(Parameter::Turbidity),
        };

        // Stored newest-first, but scan to be independent of ordering.
        let start = log.iter().map(|e| e.timestamp).min().unwrap_or(log[0].timestamp);
        let end = log.iter().map(|e| e.timestamp).max().unwrap_or(log[0].timestamp);

        HistoryStats {
            total_entries: log.len(),
            date_range: Some(DateRange { start, end }),
            averages,
        }
    }

    /// Export a basin's history to a CSV file under `out_dir`, named
    /// `<Name>_History_<date>.csv` with whitespace runs in the display
    /// name collapsed to underscores. Returns the written path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] when the log is empty, or an I/O / CSV
    /// error when the file cannot be written.
    pub fn export_csv(
        &self,
        basin_id: &str,
        display_name: &str,
        out_dir: &Path,
    ) -> Result<PathBuf> {
        let log = self.load(basin_id);
        if log.is_empty() {
            return Err(Error::NoData);
        }

        std::fs::create_dir_all(out_dir).map_err(|source| Error::CreateDirectory {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let date_format = format_description!("[year]-[month]-[day]");
        let time_format = format_description!("[hour]:[minute]:[second]");
        let today = OffsetDateTime::now_utc()
            .date()
            .format(&date_format)
            .unwrap_or_default();
        let path = out_dir.join(format!(
            "{}_History_{today}.csv",
            sanitize_name(display_name)
        ));

        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_path(&path)?;
        writer.write_record([
            "Timestamp",
            "Date",
            "Time",
            "Temperature (°C)",
            "pH Level",
            "Dissolved Oxygen (mg/L)",
            "Ammonia (mg/L)",
            "Nitrite (mg/L)",
            "Nitrate (mg/L)",
            "Water Level (%)",
            "Turbidity (NTU)",
            "Status",
            "Active Alerts",
            "Notes",
        ])?;

        for entry in &log {
            writer.write_record([
                entry.timestamp.format(&Rfc3339).unwrap_or_default(),
                entry.timestamp.date().format(&date_format).unwrap_or_default(),
                entry.timestamp.time().format(&time_format).unwrap_or_default(),
                format!("{:.2}", entry.temperature),
                format!("{:.2}", entry.ph),
                format!("{:.2}", entry.dissolved_oxygen),
                format!("{:.3}", entry.ammonia),
                format!("{:.3}", entry.nitrite),
                format!("{:.1}", entry.nitrate),
                format!("{:.1}", entry.water_level),
                format!("{:.1}", entry.turbidity),
                entry.status.to_string(),
                entry.active_alerts.to_string(),
                entry.notes.clone().unwrap_or_default(),
            ])?;
        }
        writer.flush()?;

        info!(
            basin_id,
            entries = log.len(),
            "Exported history to {}",
            path.display()
        );
        Ok(path)
    }

    /// Drop every retained entry for `basin_id`.
    pub fn clear_history(&self, basin_id: &str) {
        self.store.remove(&storage_key(basin_id));
    }

    fn load(&self, basin_id: &str) -> Vec<HistoryEntry> {
        let Some(raw) = self.store.get(&storage_key(basin_id)) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(log) => log,
            Err(e) => {
                warn!(basin_id, "Recovering corrupt history log as empty: {e}");
                Vec::new()
            }
        }
    }

    fn save(&self, basin_id: &str, log: &[HistoryEntry]) {
        match serde_json::to_string(log) {
            Ok(json) => self.store.put(&storage_key(basin_id), &json),
            Err(e) => warn!(basin_id, "Failed to serialize history log: {e}"),
        }
    }
}

fn storage_key(basin_id: &str) -> String {
    format!("basin-history-{basin_id}")
}

fn sanitize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}
