//! Error types for threshold configuration.

use thiserror::Error;

use aquamon_types::Parameter;

/// Errors raised when a threshold table violates its ordering invariant.
///
/// Inverted bounds are a configuration defect and are reported rather than
/// silently corrected.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ThresholdError {
    /// `safe` and `warning` are ordered against the parameter's direction.
    #[error(
        "inverted bounds for {parameter}: safe={safe}, warning={warning} \
         conflicts with its worsening direction"
    )]
    InvertedBounds {
        /// The misconfigured parameter.
        parameter: Parameter,
        /// Configured safe bound.
        safe: f64,
        /// Configured warning bound.
        warning: f64,
    },
    /// A bound is NaN or infinite.
    #[error("non-finite bound for {parameter}: safe={safe}, warning={warning}")]
    NonFiniteBound {
        /// The misconfigured parameter.
        parameter: Parameter,
        /// Configured safe bound.
        safe: f64,
        /// Configured warning bound.
        warning: f64,
    },
}

/// Result type alias using [`ThresholdError`].
pub type ThresholdResult<T> = std::result::Result<T, ThresholdError>;
