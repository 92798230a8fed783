//! Safe/warning thresholds and per-parameter classification.
//!
//! Each parameter has a `safe` and a `warning` bound, interpreted through
//! the parameter's intrinsic worsening direction. For `HigherIsWorse`
//! parameters values up to `safe` are Safe, up to `warning` are Warning and
//! beyond that Danger; `LowerIsWorse` parameters mirror the comparison.
//!
//! # Example
//!
//! ```
//! use aquamon_core::Thresholds;
//! use aquamon_types::{Classification, Parameter};
//!
//! let thresholds = Thresholds::default();
//! assert_eq!(
//!     thresholds.classify_parameter(Parameter::Ammonia, 0.3),
//!     Classification::Safe
//! );
//! assert_eq!(
//!     thresholds.classify_parameter(Parameter::DissolvedOxygen, 5.0),
//!     Classification::Danger
//! );
//! ```

use serde::{Deserialize, Serialize};

use aquamon_types::{Classification, Direction, Parameter};

use crate::error::ThresholdError;

/// Safe and warning bounds for one parameter.
///
/// Invariant: the bounds are ordered consistently with the parameter's
/// direction (`safe <= warning` for `HigherIsWorse`, `safe >= warning` for
/// `LowerIsWorse`). Violations are configuration errors reported by
/// [`ParameterThreshold::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterThreshold {
    /// Upper (or lower, for `LowerIsWorse`) bound of the safe band.
    pub safe: f64,
    /// Bound beyond which values count as dangerous.
    pub warning: f64,
}

impl ParameterThreshold {
    /// Create a threshold pair.
    #[must_use]
    pub fn new(safe: f64, warning: f64) -> Self {
        Self { safe, warning }
    }

    /// Check the ordering invariant against a direction.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError::InvertedBounds`] when the bounds conflict
    /// with the direction, or [`ThresholdError::NonFiniteBound`] when a
    /// bound is NaN or infinite.
    pub fn validate(&self, parameter: Parameter) -> Result<(), ThresholdError> {
        if !self.safe.is_finite() || !self.warning.is_finite() {
            return Err(ThresholdError::NonFiniteBound {
                parameter,
                safe: self.safe,
                warning: self.warning,
            });
        }

        let ordered = match parameter.direction() {
            Direction::HigherIsWorse => self.safe <= self.warning,
            Direction::LowerIsWorse => self.safe >= self.warning,
        };

        if ordered {
            Ok(())
        } else {
            Err(ThresholdError::InvertedBounds {
                parameter,
                safe: self.safe,
                warning: self.warning,
            })
        }
    }
}

/// Classify a single value against a threshold pair.
///
/// This is a pure function with no side effects; it is the leaf the alert
/// detector builds on.
#[must_use]
pub fn classify(
    value: f64,
    threshold: ParameterThreshold,
    direction: Direction,
) -> Classification {
    match direction {
        Direction::LowerIsWorse => {
            if value >= threshold.safe {
                Classification::Safe
            } else if value >= threshold.warning {
                Classification::Warning
            } else {
                Classification::Danger
            }
        }
        Direction::HigherIsWorse => {
            if value <= threshold.safe {
                Classification::Safe
            } else if value <= threshold.warning {
                Classification::Warning
            } else {
                Classification::Danger
            }
        }
    }
}

/// Classify against an optional threshold.
///
/// Returns [`Classification::Unknown`] when no threshold is configured;
/// callers must treat that as non-alerting.
#[must_use]
pub fn classify_opt(
    value: f64,
    threshold: Option<ParameterThreshold>,
    direction: Direction,
) -> Classification {
    match threshold {
        Some(threshold) => classify(value, threshold, direction),
        None => Classification::Unknown,
    }
}

/// Threshold bounds for all eight parameters.
///
/// The `Default` table matches the reference deployment. Deserialization
/// uses `#[serde(default)]`, so a partial configuration falls back to the
/// defaults for missing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Temperature bounds in °C.
    pub temperature: ParameterThreshold,
    /// pH bounds.
    pub ph: ParameterThreshold,
    /// Dissolved oxygen bounds in mg/L (lower is worse).
    pub dissolved_oxygen: ParameterThreshold,
    /// Ammonia bounds in mg/L.
    pub ammonia: ParameterThreshold,
    /// Nitrite bounds in mg/L.
    pub nitrite: ParameterThreshold,
    /// Nitrate bounds in mg/L.
    pub nitrate: ParameterThreshold,
    /// Water level bounds in percent (lower is worse).
    pub water_level: ParameterThreshold,
    /// Turbidity bounds in NTU.
    pub turbidity: ParameterThreshold,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            temperature: ParameterThreshold::new(20.0, 22.0),
            ph: ParameterThreshold::new(7.5, 8.0),
            dissolved_oxygen: ParameterThreshold::new(7.0, 6.5),
            ammonia: ParameterThreshold::new(0.5, 1.0),
            nitrite: ParameterThreshold::new(0.2, 0.5),
            nitrate: ParameterThreshold::new(20.0, 30.0),
            water_level: ParameterThreshold::new(90.0, 85.0),
            turbidity: ParameterThreshold::new(5.0, 8.0),
        }
    }
}

impl ThresholdConfig {
    /// Get the threshold pair for a parameter.
    #[must_use]
    pub fn get(&self, parameter: Parameter) -> ParameterThreshold {
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

    /// Replace the threshold pair for a parameter.
    pub fn set(&mut self, parameter: Parameter, threshold: ParameterThreshold) {
        match parameter {
            Parameter::Temperature => self.temperature = threshold,
            Parameter::Ph => self.ph = threshold,
            Parameter::DissolvedOxygen => self.dissolved_oxygen = threshold,
            Parameter::Ammonia => self.ammonia = threshold,
            Parameter::Nitrite => self.nitrite = threshold,
            Parameter::Nitrate => self.nitrate = threshold,
            Parameter::WaterLevel => self.water_level = threshold,
            Parameter::Turbidity => self.turbidity = threshold,
        }
    }

    /// Validate the ordering invariant for every parameter.
    ///
    /// # Errors
    ///
    /// Returns the first [`ThresholdError`] encountered.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for parameter in Parameter::ALL {
            self.get(parameter).validate(parameter)?;
        }
        Ok(())
    }
}

/// Validated threshold evaluator for full readings.
#[derive(Debug, Clone)]
pub struct Thresholds {
    config: ThresholdConfig,
}

impl Default for Thresholds {
    fn default() -> Self {
        // The built-in table satisfies the ordering invariant.
        Self {
            config: ThresholdConfig::default(),
        }
    }
}

impl Thresholds {
    /// Create an evaluator from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ThresholdError`] if any parameter's bounds violate the
    /// ordering invariant.
    pub fn new(config: ThresholdConfig) -> Result<Self, ThresholdError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Get the threshold pair for a parameter.
    #[must_use]
    pub fn threshold(&self, parameter: Parameter) -> ParameterThreshold {
        self.config.get(parameter)
    }

    /// Classify one parameter of a reading.
    #[must_use]
    pub fn classify_parameter(&self, parameter: Parameter, value: f64) -> Classification {
        classify(value, self.config.get(parameter), parameter.direction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_config_validates() {
        assert!(ThresholdConfig::default().validate().is_ok());
    }

    #[test]
    fn test_higher_is_worse_bands() {
        let t = ParameterThreshold::new(0.5, 1.0);
        assert_eq!(
            classify(0.3, t, Direction::HigherIsWorse),
            Classification::Safe
        );
        assert_eq!(
            classify(0.5, t, Direction::HigherIsWorse),
            Classification::Safe
        );
        assert_eq!(
            classify(0.7, t, Direction::HigherIsWorse),
            Classification::Warning
        );
        assert_eq!(
            classify(1.0, t, Direction::HigherIsWorse),
            Classification::Warning
        );
        assert_eq!(
            classify(1.1, t, Direction::HigherIsWorse),
            Classification::Danger
        );
    }

    #[test]
    fn test_lower_is_worse_bands() {
        let t = ParameterThreshold::new(7.0, 6.5);
        assert_eq!(
            classify(8.0, t, Direction::LowerIsWorse),
            Classification::Safe
        );
        assert_eq!(
            classify(7.0, t, Direction::LowerIsWorse),
            Classification::Safe
        );
        assert_eq!(
            classify(6.7, t, Direction::LowerIsWorse),
            Classification::Warning
        );
        assert_eq!(
            classify(6.5, t, Direction::LowerIsWorse),
            Classification::Warning
        );
        assert_eq!(
            classify(6.0, t, Direction::LowerIsWorse),
            Classification::Danger
        );
    }

    #[test]
    fn test_classify_opt_unknown_is_non_alerting() {
        let class = classify_opt(99.0, None, Direction::HigherIsWorse);
        assert_eq!(class, Classification::Unknown);
        assert!(class < Classification::Warning);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        // safe > warning conflicts with HigherIsWorse
        let t = ParameterThreshold::new(2.0, 1.0);
        let err = t.validate(Parameter::Ammonia).unwrap_err();
        assert!(matches!(err, ThresholdError::InvertedBounds { .. }));

        // safe < warning conflicts with LowerIsWorse
        let t = ParameterThreshold::new(6.5, 7.0);
        let err = t.validate(Parameter::DissolvedOxygen).unwrap_err();
        assert!(matches!(err, ThresholdError::InvertedBounds { .. }));
    }

    #[test]
    fn test_non_finite_bounds_rejected() {
        let t = ParameterThreshold::new(f64::NAN, 1.0);
        let err = t.validate(Parameter::Nitrite).unwrap_err();
        assert!(matches!(err, ThresholdError::NonFiniteBound { .. }));
    }

    #[test]
    fn test_thresholds_new_rejects_bad_config() {
        let mut config = ThresholdConfig::default();
        config.set(Parameter::Nitrate, ParameterThreshold::new(40.0, 30.0));
        assert!(Thresholds::new(config).is_err());
    }

    #[test]
    fn test_classify_parameter_uses_direction() {
        let thresholds = Thresholds::default();
        // DO is LowerIsWorse: a high value is safe.
        assert_eq!(
            thresholds.classify_parameter(Parameter::DissolvedOxygen, 9.0),
            Classification::Safe
        );
        // Turbidity is HigherIsWorse: a high value is dangerous.
        assert_eq!(
            thresholds.classify_parameter(Parameter::Turbidity, 12.0),
            Classification::Danger
        );
    }

    #[test]
    fn test_config_set_get_roundtrip() {
        let mut config = ThresholdConfig::default();
        config.set(Parameter::Ph, ParameterThreshold::new(7.0, 7.8));
        assert_eq!(config.get(Parameter::Ph), ParameterThreshold::new(7.0, 7.8));
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let json = r#"{ "ammonia": { "safe": 0.3, "warning": 0.8 } }"#;
        let config: ThresholdConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.ammonia,
            ParameterThreshold::new(0.3, 0.8)
        );
        // Everything else keeps the built-in defaults.
        assert_eq!(config.ph, ThresholdConfig::default().ph);
        assert_eq!(
            config.water_level,
            ThresholdConfig::default().water_level
        );
    }

    proptest! {
        // Worsening a value never improves its classification.
        #[test]
        fn classification_monotonic_higher_is_worse(
            value in -100.0f64..100.0,
            bump in 0.0f64..50.0,
            safe in -10.0f64..10.0,
            spread in 0.0f64..10.0,
        ) {
            let t = ParameterThreshold::new(safe, safe + spread);
            let before = classify(value, t, Direction::HigherIsWorse);
            let after = classify(value + bump, t, Direction::HigherIsWorse);
            prop_assert!(after >= before);
        }

        #[test]
        fn classification_monotonic_lower_is_worse(
            value in -100.0f64..100.0,
            drop in 0.0f64..50.0,
            warning in -10.0f64..10.0,
            spread in 0.0f64..10.0,
        ) {
            let t = ParameterThreshold::new(warning + spread, warning);
            let before = classify(value, t, Direction::LowerIsWorse);
            let after = classify(value - drop, t, Direction::LowerIsWorse);
            prop_assert!(after >= before);
        }
    }
}
