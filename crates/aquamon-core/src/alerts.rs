//! Alert detection and the per-basin rolling alert list.
//!
//! [`detect`] scans a reading against every configured threshold and emits
//! one alert per parameter classified Warning or Danger. On top of the
//! basic classification a danger escalation rule applies once the value is
//! past the warning bound:
//!
//! - `LowerIsWorse`: severity is danger when `value < warning * 0.8`
//! - `HigherIsWorse`: severity is danger when `value > warning * 1.5`
//!
//! The escalation multiplier never fires for values still inside the safe
//! band.

use time::OffsetDateTime;

use aquamon_types::{Alert, Classification, Direction, Parameter, Reading, Severity};

use crate::thresholds::{ParameterThreshold, Thresholds};

/// Maximum number of alerts retained in a basin's rolling list.
pub const MAX_ACTIVE_ALERTS: usize = 10;

/// Multiplier past the warning bound that escalates a low-value alert.
const LOW_DANGER_FACTOR: f64 = 0.8;
/// Multiplier past the warning bound that escalates a high-value alert.
const HIGH_DANGER_FACTOR: f64 = 1.5;

/// Scan a reading against all configured thresholds.
///
/// Returns zero or more alerts in the fixed parameter order. Unknown
/// classifications never alert.
#[must_use]
pub fn detect(reading: &Reading, thresholds: &Thresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for parameter in Parameter::ALL {
        let value = reading.get(parameter);
        let threshold = thresholds.threshold(parameter);
        let class = thresholds.classify_parameter(parameter, value);

        if class < Classification::Warning {
            continue;
        }

        let severity = escalate(value, threshold, parameter.direction());
        alerts.push(build_alert(parameter, value, severity, reading.timestamp));
    }

    alerts
}

/// Apply the danger escalation rule for a value past the safe bound.
fn escalate(value: f64, threshold: ParameterThreshold, direction: Direction) -> Severity {
    let danger = match direction {
        Direction::LowerIsWorse => {
            value < threshold.warning && value < threshold.warning * LOW_DANGER_FACTOR
        }
        Direction::HigherIsWorse => {
            value > threshold.warning && value > threshold.warning * HIGH_DANGER_FACTOR
        }
    };

    if danger {
        Severity::Danger
    } else {
        Severity::Warning
    }
}

fn build_alert(
    parameter: Parameter,
    value: f64,
    severity: Severity,
    timestamp: OffsetDateTime,
) -> Alert {
    let millis = timestamp.unix_timestamp_nanos() / 1_000_000;
    Alert {
        id: format!("{}-{}", millis, parameter.key()),
        parameter,
        severity,
        message: format!(
            "{} {} levels detected: {:.2}{}",
            severity.label(),
            parameter.label().to_lowercase(),
            value,
            parameter.unit()
        ),
        timestamp,
    }
}

/// Rolling per-basin alert list, newest first, capped at
/// [`MAX_ACTIVE_ALERTS`].
#[derive(Debug, Clone, Default)]
pub struct AlertLog {
    alerts: Vec<Alert>,
}

impl AlertLog {
    /// Create an empty alert list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a batch of freshly detected alerts and truncate to the cap.
    ///
    /// The batch keeps its own order, ahead of everything already in the
    /// list.
    pub fn push_batch(&mut self, batch: Vec<Alert>) {
        if batch.is_empty() {
            return;
        }
        let mut merged = batch;
        merged.append(&mut self.alerts);
        merged.truncate(MAX_ACTIVE_ALERTS);
        self.alerts = merged;
    }

    /// Current alerts, newest first.
    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Number of active alerts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// The most recent alert, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Alert> {
        self.alerts.first()
    }

    /// Drop all alerts.
    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}
