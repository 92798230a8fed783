//! Composite quality scoring and the predicted-quality lookup.
//!
//! Each parameter contributes a normalized sub-score floored at zero; the
//! composite score is the arithmetic mean of the eight sub-scores. The
//! "predicted quality" maps the categorical label to a fixed confidence
//! percentage and display color. Those constants are a presentation
//! convenience carried over verbatim, not a statistical estimate.

use aquamon_types::{Parameter, QualityLabel, Reading};

/// Composite 0-1 water-quality health score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityScore {
    value: f64,
}

impl QualityScore {
    /// The raw composite value in `[0, 1]`.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Categorical label for the score.
    #[must_use]
    pub fn label(&self) -> QualityLabel {
        if self.value > 0.8 {
            QualityLabel::Excellent
        } else if self.value > 0.6 {
            QualityLabel::Good
        } else if self.value > 0.4 {
            QualityLabel::Warning
        } else {
            QualityLabel::Poor
        }
    }
}

/// Normalized sub-score for one parameter, floored at zero.
#[must_use]
pub fn sub_score(parameter: Parameter, value: f64) -> f64 {
    let raw = match parameter {
        Parameter::Temperature => 1.0 - (value - 20.0).abs() / 5.0,
        Parameter::Ph => 1.0 - (value - 7.2).abs() / 1.5,
        Parameter::DissolvedOxygen => (value - 5.0) / 4.0,
        Parameter::Ammonia => 1.0 - value / 2.0,
        Parameter::Nitrite => 1.0 - value / 1.0,
        Parameter::Nitrate => 1.0 - value / 40.0,
        Parameter::WaterLevel => value / 100.0,
        Parameter::Turbidity => 1.0 - value / 15.0,
    };
    raw.max(0.0)
}

/// Score a full reading.
#[must_use]
pub fn score(reading: &Reading) -> QualityScore {
    let sum: f64 = Parameter::ALL
        .iter()
        .map(|&p| sub_score(p, reading.get(p)))
        .sum();
    QualityScore {
        value: sum / Parameter::ALL.len() as f64,
    }
}

/// All eight sub-scores in parameter order, for diagnostics.
#[must_use]
pub fn sub_scores(reading: &Reading) -> [(Parameter, f64); 8] {
    Parameter::ALL.map(|p| (p, sub_score(p, reading.get(p))))
}

/// Predicted water quality: the score's label with its fixed confidence
/// percentage and display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    /// Categorical quality label.
    pub quality: QualityLabel,
    /// Fixed confidence percentage for the label.
    pub confidence: u8,
    /// Display color class for the label.
    pub color: &'static str,
}

/// Map a score to its predicted quality.
///
/// The confidence values are literal constants from the reference
/// behavior; they are not derived from the score.
#[must_use]
pub fn predict(score: QualityScore) -> Prediction {
    let (quality, confidence, color) = match score.label() {
        QualityLabel::Excellent => (QualityLabel::Excellent, 95, "bg-green-500"),
        QualityLabel::Good => (QualityLabel::Good, 87, "bg-blue-500"),
        QualityLabel::Warning => (QualityLabel::Warning, 78, "bg-yellow-500"),
        QualityLabel::Poor => (QualityLabel::Poor, 92, "bg-red-500"),
    };
    Prediction {
        quality,
        confidence,
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ideal_reading() -> Reading {
        Reading::builder()
            .temperature(20.0)
            .ph(7.2)
            .dissolved_oxygen(9.0)
            .ammonia(0.0)
            .nitrite(0.0)
            .nitrate(0.0)
            .water_level(100.0)
            .turbidity(0.0)
            .build()
    }

    #[test]
    fn test_ideal_reading_is_excellent() {
        let score = score(&ideal_reading());
        assert!(score.value() > 0.8);
        assert_eq!(score.label(), QualityLabel::Excellent);
    }

    #[test]
    fn test_sub_scores_floor_at_zero() {
        assert_eq!(sub_score(Parameter::Ammonia, 10.0), 0.0);
        assert_eq!(sub_score(Parameter::Temperature, 40.0), 0.0);
        assert_eq!(sub_score(Parameter::DissolvedOxygen, 3.0), 0.0);
        assert_eq!(sub_score(Parameter::WaterLevel, -5.0), 0.0);
    }

    #[test]
    fn test_sub_score_formulas() {
        assert!((sub_score(Parameter::Temperature, 22.5) - 0.5).abs() < 1e-9);
        assert!((sub_score(Parameter::Ph, 7.2) - 1.0).abs() < 1e-9);
        assert!((sub_score(Parameter::DissolvedOxygen, 7.0) - 0.5).abs() < 1e-9);
        assert!((sub_score(Parameter::Nitrite, 0.5) - 0.5).abs() < 1e-9);
        assert!((sub_score(Parameter::Nitrate, 20.0) - 0.5).abs() < 1e-9);
        assert!((sub_score(Parameter::WaterLevel, 80.0) - 0.8).abs() < 1e-9);
        assert!((sub_score(Parameter::Turbidity, 7.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_mean_of_sub_scores() {
        let reading = ideal_reading();
        let expected: f64 = sub_scores(&reading).iter().map(|(_, s)| s).sum::<f64>() / 8.0;
        assert!((score(&reading).value() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_label_boundaries() {
        assert_eq!(QualityScore { value: 0.81 }.label(), QualityLabel::Excellent);
        assert_eq!(QualityScore { value: 0.8 }.label(), QualityLabel::Good);
        assert_eq!(QualityScore { value: 0.61 }.label(), QualityLabel::Good);
        assert_eq!(QualityScore { value: 0.6 }.label(), QualityLabel::Warning);
        assert_eq!(QualityScore { value: 0.41 }.label(), QualityLabel::Warning);
        assert_eq!(QualityScore { value: 0.4 }.label(), QualityLabel::Poor);
        assert_eq!(QualityScore { value: 0.0 }.label(), QualityLabel::Poor);
    }

    #[test]
    fn test_prediction_constants() {
        assert_eq!(
            predict(QualityScore { value: 0.9 }),
            Prediction {
                quality: QualityLabel::Excellent,
                confidence: 95,
                color: "bg-green-500",
            }
        );
        assert_eq!(predict(QualityScore { value: 0.7 }).confidence, 87);
        assert_eq!(predict(QualityScore { value: 0.5 }).confidence, 78);
        // The poor label carries a *higher* fixed confidence than warning;
        // reproduced as-is.
        assert_eq!(predict(QualityScore { value: 0.1 }).confidence, 92);
        assert_eq!(predict(QualityScore { value: 0.1 }).color, "bg-red-500");
    }

    #[test]
    fn test_poor_reading_scores_poor() {
        let reading = Reading::builder()
            .temperature(35.0)
            .ph(4.0)
            .dissolved_oxygen(3.0)
            .ammonia(5.0)
            .nitrite(3.0)
            .nitrate(80.0)
            .water_level(20.0)
            .turbidity(30.0)
            .build();
        assert_eq!(score(&reading).label(), QualityLabel::Poor);
    }
}
