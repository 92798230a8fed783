//! Core types for aquamon water-quality data.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ReadingError;

/// Whether higher or lower values of a parameter indicate worse water
/// quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Values above the configured bounds are worse (ammonia, nitrate, ...).
    HigherIsWorse,
    /// Values below the configured bounds are worse (dissolved oxygen,
    /// water level).
    LowerIsWorse,
}

/// One of the eight monitored water-quality parameters.
///
/// The set is fixed: a reading always carries all eight values, and the
/// worsening [`Direction`] is an intrinsic attribute of the parameter,
/// never configuration.
///
/// # Examples
///
/// ```
/// use aquamon_types::{Direction, Parameter};
///
/// assert_eq!(Parameter::WaterLevel.direction(), Direction::LowerIsWorse);
/// assert_eq!(Parameter::Turbidity.direction(), Direction::HigherIsWorse);
/// assert_eq!(Parameter::DissolvedOxygen.label(), "Dissolved Oxygen");
/// assert_eq!(Parameter::Temperature.unit(), "°C");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Parameter {
    /// Water temperature in °C.
    Temperature,
    /// Acidity (unitless pH scale).
    Ph,
    /// Dissolved oxygen in mg/L.
    DissolvedOxygen,
    /// Ammonia concentration in mg/L.
    Ammonia,
    /// Nitrite concentration in mg/L.
    Nitrite,
    /// Nitrate concentration in mg/L.
    Nitrate,
    /// Fill level as a percentage of basin capacity.
    WaterLevel,
    /// Turbidity in NTU.
    Turbidity,
}

impl Parameter {
    /// All parameters in their fixed evaluation order.
    pub const ALL: [Parameter; 8] = [
        Parameter::Temperature,
        Parameter::Ph,
        Parameter::DissolvedOxygen,
        Parameter::Ammonia,
        Parameter::Nitrite,
        Parameter::Nitrate,
        Parameter::WaterLevel,
        Parameter::Turbidity,
    ];

    /// The intrinsic worsening direction of this parameter.
    #[must_use]
    pub fn direction(&self) -> Direction {
        match self {
            Parameter::DissolvedOxygen | Parameter::WaterLevel => Direction::LowerIsWorse,
            _ => Direction::HigherIsWorse,
        }
    }

    /// Display unit suffix, including any leading space used when the unit
    /// is appended directly after a formatted value.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Temperature => "°C",
            Parameter::Ph => "",
            Parameter::DissolvedOxygen
            | Parameter::Ammonia
            | Parameter::Nitrite
            | Parameter::Nitrate => " mg/L",
            Parameter::WaterLevel => "%",
            Parameter::Turbidity => " NTU",
        }
    }

    /// Humanized parameter name for messages and headers.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Temperature => "Temperature",
            Parameter::Ph => "Ph",
            Parameter::DissolvedOxygen => "Dissolved Oxygen",
            Parameter::Ammonia => "Ammonia",
            Parameter::Nitrite => "Nitrite",
            Parameter::Nitrate => "Nitrate",
            Parameter::WaterLevel => "Water Level",
            Parameter::Turbidity => "Turbidity",
        }
    }

    /// Stable string key for storage and identifiers.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::Ph => "ph",
            Parameter::DissolvedOxygen => "dissolved_oxygen",
            Parameter::Ammonia => "ammonia",
            Parameter::Nitrite => "nitrite",
            Parameter::Nitrate => "nitrate",
            Parameter::WaterLevel => "water_level",
            Parameter::Turbidity => "turbidity",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Safety classification of a single parameter value against its
/// configured bounds.
///
/// # Ordering
///
/// Classifications are ordered by severity: `Unknown < Safe < Warning <
/// Danger`. This allows threshold comparisons like
/// `if class >= Classification::Warning { alert(...) }`.
///
/// `Unknown` means no threshold was configured for the parameter; callers
/// must treat it as non-alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Classification {
    /// No threshold configured for the parameter.
    Unknown = 0,
    /// Value is within the safe band.
    Safe = 1,
    /// Value is past the safe bound but within the warning band.
    Warning = 2,
    /// Value is past the warning bound.
    Danger = 3,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Unknown => write!(f, "Unknown"),
            Classification::Safe => write!(f, "Safe"),
            Classification::Warning => write!(f, "Warning"),
            Classification::Danger => write!(f, "Danger"),
        }
    }
}

/// Severity of an emitted alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// The value exceeded the warning bound.
    Warning,
    /// The value exceeded the escalation multiple of the warning bound.
    Danger,
}

impl Severity {
    /// Label used in alert message text ("High" / "Critical").
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning => "High",
            Severity::Danger => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Danger => write!(f, "danger"),
        }
    }
}

/// Composite quality label derived from the 0-1 quality score.
///
/// # Ordering
///
/// Labels are ordered from best to worst: `Excellent < Good < Warning <
/// Poor`, so `label >= QualityLabel::Warning` selects at-risk basins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum QualityLabel {
    /// Composite score above 0.8.
    Excellent,
    /// Composite score above 0.6.
    Good,
    /// Composite score above 0.4.
    Warning,
    /// Composite score of 0.4 or below.
    Poor,
}

impl QualityLabel {
    /// Whether a basin with this label counts as at risk for notification
    /// purposes.
    #[must_use]
    pub fn is_at_risk(&self) -> bool {
        matches!(self, QualityLabel::Warning | QualityLabel::Poor)
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityLabel::Excellent => write!(f, "excellent"),
            QualityLabel::Good => write!(f, "good"),
            QualityLabel::Warning => write!(f, "warning"),
            QualityLabel::Poor => write!(f, "poor"),
        }
    }
}

/// A transient alert emitted when a parameter breaches its warning bound.
///
/// Alerts live only in the per-basin rolling alert list and are never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Alert {
    /// Unique identifier (timestamp + parameter key).
    pub id: String,
    /// The breaching parameter.
    pub parameter: Parameter,
    /// Alert severity after the escalation rule.
    pub severity: Severity,
    /// Human-readable message text.
    pub message: String,
    /// When the alert was detected.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: time::OffsetDateTime,
}

/// One timestamped set of the eight water-quality parameter values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
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
    /// Water level in percent of capacity.
    pub water_level: f64,
    /// Turbidity in NTU.
    pub turbidity: f64,
    /// When the reading was captured.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: time::OffsetDateTime,
}

impl Default for Reading {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            ph: 0.0,
            dissolved_oxygen: 0.0,
            ammonia: 0.0,
            nitrite: 0.0,
            nitrate: 0.0,
            water_level: 0.0,
            turbidity: 0.0,
            timestamp: time::OffsetDateTime::UNIX_EPOCH,
        }
    }
}

impl Reading {
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

    /// Check that every parameter value is a finite number.
    ///
    /// # Errors
    ///
    /// Returns [`ReadingError::NotFinite`] for the first parameter whose
    /// value is NaN or infinite.
    pub fn validate(&self) -> Result<(), ReadingError> {
        for parameter in Parameter::ALL {
            let value = self.get(parameter);
            if !value.is_finite() {
                return Err(ReadingError::NotFinite { parameter, value });
            }
        }
        Ok(())
    }

    /// Create a builder for constructing a `Reading`.
    pub fn builder() -> ReadingBuilder {
        ReadingBuilder::default()
    }
}

/// Builder for constructing a [`Reading`].
///
/// Use [`build`](Self::build) for unchecked construction, or
/// [`try_build`](Self::try_build) to reject non-finite values.
#[derive(Debug, Default)]
#[must_use]
pub struct ReadingBuilder {
    reading: Reading,
}

impl ReadingBuilder {
    /// Set the temperature.
    pub fn temperature(mut self, value: f64) -> Self {
        self.reading.temperature = value;
        self
    }

    /// Set the pH level.
    pub fn ph(mut self, value: f64) -> Self {
        self.reading.ph = value;
        self
    }

    /// Set the dissolved oxygen.
    pub fn dissolved_oxygen(mut self, value: f64) -> Self {
        self.reading.dissolved_oxygen = value;
        self
    }

    /// Set the ammonia concentration.
    pub fn ammonia(mut self, value: f64) -> Self {
        self.reading.ammonia = value;
        self
    }

    /// Set the nitrite concentration.
    pub fn nitrite(mut self, value: f64) -> Self {
        self.reading.nitrite = value;
        self
    }

    /// Set the nitrate concentration.
    pub fn nitrate(mut self, value: f64) -> Self {
        self.reading.nitrate = value;
        self
    }

    /// Set the water level.
    pub fn water_level(mut self, value: f64) -> Self {
        self.reading.water_level = value;
        self
    }

    /// Set the turbidity.
    pub fn turbidity(mut self, value: f64) -> Self {
        self.reading.turbidity = value;
        self
    }

    /// Set the capture timestamp.
    pub fn timestamp(mut self, timestamp: time::OffsetDateTime) -> Self {
        self.reading.timestamp = timestamp;
        self
    }

    /// Set a parameter value by its enum key.
    pub fn set(mut self, parameter: Parameter, value: f64) -> Self {
        match parameter {
            Parameter::Temperature => self.reading.temperature = value,
            Parameter::Ph => self.reading.ph = value,
            Parameter::DissolvedOxygen => self.reading.dissolved_oxygen = value,
            Parameter::Ammonia => self.reading.ammonia = value,
            Parameter::Nitrite => self.reading.nitrite = value,
            Parameter::Nitrate => self.reading.nitrate = value,
            Parameter::WaterLevel => self.reading.water_level = value,
            Parameter::Turbidity => self.reading.turbidity = value,
        }
        self
    }

    /// Build the `Reading` without validation.
    #[must_use]
    pub fn build(self) -> Reading {
        self.reading
    }

    /// Build the `Reading`, rejecting non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`ReadingError::NotFinite`] if any parameter value is NaN or
    /// infinite.
    pub fn try_build(self) -> Result<Reading, ReadingError> {
        self.reading.validate()?;
        Ok(self.reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_directions() {
        assert_eq!(
            Parameter::DissolvedOxygen.direction(),
            Direction::LowerIsWorse
        );
        assert_eq!(Parameter::WaterLevel.direction(), Direction::LowerIsWorse);
        for parameter in [
            Parameter::Temperature,
            Parameter::Ph,
            Parameter::Ammonia,
            Parameter::Nitrite,
            Parameter::Nitrate,
            Parameter::Turbidity,
        ] {
            assert_eq!(parameter.direction(), Direction::HigherIsWorse);
        }
    }

    #[test]
    fn test_parameter_all_is_complete_and_ordered() {
        assert_eq!(Parameter::ALL.len(), 8);
        assert_eq!(Parameter::ALL[0], Parameter::Temperature);
        assert_eq!(Parameter::ALL[7], Parameter::Turbidity);
    }

    #[test]
    fn test_parameter_labels() {
        assert_eq!(Parameter::DissolvedOxygen.label(), "Dissolved Oxygen");
        assert_eq!(Parameter::WaterLevel.label(), "Water Level");
        assert_eq!(Parameter::Temperature.label(), "Temperature");
    }

    #[test]
    fn test_parameter_units() {
        assert_eq!(Parameter::Temperature.unit(), "°C");
        assert_eq!(Parameter::Ph.unit(), "");
        assert_eq!(Parameter::Ammonia.unit(), " mg/L");
        assert_eq!(Parameter::WaterLevel.unit(), "%");
        assert_eq!(Parameter::Turbidity.unit(), " NTU");
    }

    #[test]
    fn test_classification_ordering() {
        assert!(Classification::Danger > Classification::Warning);
        assert!(Classification::Warning > Classification::Safe);
        assert!(Classification::Safe > Classification::Unknown);
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::Warning.label(), "High");
        assert_eq!(Severity::Danger.label(), "Critical");
        assert_eq!(format!("{}", Severity::Danger), "danger");
    }

    #[test]
    fn test_quality_label_display_and_risk() {
        assert_eq!(format!("{}", QualityLabel::Excellent), "excellent");
        assert_eq!(format!("{}", QualityLabel::Poor), "poor");
        assert!(!QualityLabel::Good.is_at_risk());
        assert!(QualityLabel::Warning.is_at_risk());
        assert!(QualityLabel::Poor.is_at_risk());
    }

    #[test]
    fn test_quality_label_ordering() {
        assert!(QualityLabel::Poor > QualityLabel::Warning);
        assert!(QualityLabel::Warning > QualityLabel::Good);
        assert!(QualityLabel::Good > QualityLabel::Excellent);
    }

    #[test]
    fn test_reading_builder_and_get() {
        let reading = Reading::builder()
            .temperature(21.0)
            .ph(7.1)
            .dissolved_oxygen(8.0)
            .ammonia(0.3)
            .nitrite(0.1)
            .nitrate(12.0)
            .water_level(92.0)
            .turbidity(4.0)
            .build();

        assert_eq!(reading.get(Parameter::Temperature), 21.0);
        assert_eq!(reading.get(Parameter::Nitrate), 12.0);
        assert_eq!(reading.get(Parameter::Turbidity), 4.0);
    }

    #[test]
    fn test_reading_builder_set_by_parameter() {
        let reading = Reading::builder()
            .set(Parameter::Ammonia, 1.5)
            .set(Parameter::WaterLevel, 88.0)
            .build();
        assert_eq!(reading.ammonia, 1.5);
        assert_eq!(reading.water_level, 88.0);
    }

    #[test]
    fn test_reading_validate_rejects_nan() {
        let reading = Reading::builder().ph(f64::NAN).build();
        let err = reading.validate().unwrap_err();
        assert!(matches!(
            err,
            ReadingError::NotFinite {
                parameter: Parameter::Ph,
                ..
            }
        ));
    }

    #[test]
    fn test_reading_try_build_rejects_infinity() {
        let result = Reading::builder()
            .nitrate(f64::INFINITY)
            .try_build();
        assert!(matches!(
            result,
            Err(ReadingError::NotFinite {
                parameter: Parameter::Nitrate,
                ..
            })
        ));
    }

    #[test]
    fn test_reading_default_validates() {
        assert!(Reading::default().validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parameter_serde_snake_case() {
        let json = serde_json::to_string(&Parameter::DissolvedOxygen).unwrap();
        assert_eq!(json, "\"dissolved_oxygen\"");
        let parsed: Parameter = serde_json::from_str("\"water_level\"").unwrap();
        assert_eq!(parsed, Parameter::WaterLevel);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_reading_serde_roundtrip() {
        let reading = Reading::builder()
            .temperature(20.5)
            .timestamp(time::macros::datetime!(2025-06-01 12:00 UTC))
            .build();
        let json = serde_json::to_string(&reading).unwrap();
        let parsed: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reading);
    }
}
