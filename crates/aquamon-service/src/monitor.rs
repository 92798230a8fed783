//! Per-basin monitoring state machine.

use tracing::{debug, info};

use aquamon_core::{AlertLog, QualityScore, Thresholds, alerts, quality};
use aquamon_store::{
    BasinSnapshot, HistoryStore, KeyValueStore, NewHistoryEntry, Notification,
    NotificationManager, ParameterDetail,
};
use aquamon_types::{Alert, Reading, ReadingError, Severity};

/// Everything that happened in one monitoring tick.
#[derive(Debug)]
pub struct TickOutcome {
    /// Alerts newly emitted by this tick's reading.
    pub alerts_emitted: Vec<Alert>,
    /// Composite quality score of the reading.
    pub score: QualityScore,
    /// Whether this tick committed a history entry.
    pub history_committed: bool,
    /// Risk notification created by this tick, if any.
    pub notification: Option<Notification>,
}

/// Owns one basin's monitoring state: thresholds, the rolling alert list
/// and the tick counter driving the history cadence.
///
/// All effects of one reading are applied before `process_reading`
/// returns, so a caller never observes a half-processed tick.
pub struct BasinMonitor<S> {
    id: String,
    name: String,
    thresholds: Thresholds,
    alert_log: AlertLog,
    tick: u64,
    history_every_ticks: u64,
    last_reading: Option<Reading>,
    history: HistoryStore<S>,
    notifications: NotificationManager<S>,
}

impl<S: KeyValueStore> BasinMonitor<S> {
    /// Create a monitor for one basin.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        thresholds: Thresholds,
        history: HistoryStore<S>,
        notifications: NotificationManager<S>,
        history_every_ticks: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thresholds,
            alert_log: AlertLog::new(),
            tick: 0,
            history_every_ticks: history_every_ticks.max(1),
            last_reading: None,
            history,
            notifications,
        }
    }

    /// Basin identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Basin display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of readings processed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// The rolling alert list.
    pub fn alert_log(&self) -> &AlertLog {
        &self.alert_log
    }

    /// Process one reading: detect alerts, score quality, commit history
    /// on the configured cadence and raise a risk notification when new
    /// alerts appeared.
    ///
    /// # Errors
    ///
    /// Returns a [`ReadingError`] when the reading contains a non-finite
    /// value; the tick counter and alert list are left untouched.
    pub fn process_reading(&mut self, reading: Reading) -> Result<TickOutcome, ReadingError> {
        reading.validate()?;
        self.tick += 1;

        let alerts_emitted = alerts::detect(&reading, &self.thresholds);
        if !alerts_emitted.is_empty() {
            info!(
                basin_id = %self.id,
                count = alerts_emitted.len(),
                "Reading breached thresholds"
            );
        }
        self.alert_log.push_batch(alerts_emitted.clone());

        let score = quality::score(&reading);
        self.last_reading = Some(reading);

        let history_committed = self.tick % self.history_every_ticks == 0;
        if history_committed {
            let notes = if self.alert_log.is_empty() {
                "Automated data collection - Normal operation"
            } else {
                "Automated data collection - Alerts active"
            };
            self.history.add_entry(
                &self.id,
                NewHistoryEntry {
                    reading,
                    status: score.label(),
                    active_alerts: self.alert_log.len(),
                    notes: Some(notes.to_string()),
                },
            );
            debug!(basin_id = %self.id, tick = self.tick, "Committed history entry");
        }

        let notification = if alerts_emitted.is_empty() {
            None
        } else {
            self.notifications
                .generate_basin_risk_notification(&self.snapshot(&reading, score))
        };

        Ok(TickOutcome {
            alerts_emitted,
            score,
            history_committed,
            notification,
        })
    }

    /// Re-evaluate risk from the last processed reading, raising a
    /// notification under the same rules as the per-tick path. No-op
    /// before the first reading.
    pub fn evaluate_risk(&self) -> Option<Notification> {
        let reading = self.last_reading?;
        let score = quality::score(&reading);
        self.notifications
            .generate_basin_risk_notification(&self.snapshot(&reading, score))
    }

    fn snapshot(&self, reading: &Reading, score: QualityScore) -> BasinSnapshot {
        BasinSnapshot {
            basin_id: self.id.clone(),
            basin_name: self.name.clone(),
            status: score.label(),
            active_alerts: self.alert_log.len(),
            reading: *reading,
            leading: self.leading_detail(reading),
        }
    }

    /// The worst active alert's parameter, measured against its warning
    /// bound. Danger alerts win over warnings; ties go to the newest.
    fn leading_detail(&self, reading: &Reading) -> Option<ParameterDetail> {
        let worst = self
            .alert_log
            .alerts()
            .iter()
            .find(|a| a.severity == Severity::Danger)
            .or_else(|| self.alert_log.latest())?;
        let parameter = worst.parameter;
        Some(ParameterDetail {
            parameter,
            current_value: reading.get(parameter),
            threshold: self.thresholds.threshold(parameter).warning,
            unit: parameter.unit().to_string(),
        })
    }
}
