//! Error types for reading validation in aquamon-types.

use thiserror::Error;

use crate::types::Parameter;

/// Errors that can occur when validating a water-quality reading.
///
/// A reading carries all eight parameters by construction, so the failure
/// mode is a value that cannot participate in evaluation or statistics.
/// Callers must reject such readings at the boundary instead of
/// substituting defaults.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error
/// variants in future versions without breaking downstream code.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ReadingError {
    /// A parameter value is NaN or infinite.
    #[error("{parameter} value {value} is not a finite number")]
    NotFinite {
        /// The offending parameter.
        parameter: Parameter,
        /// The raw value.
        value: f64,
    },
}

/// Result type alias using aquamon-types' ReadingError type.
pub type ReadingResult<T> = std::result::Result<T, ReadingError>;
