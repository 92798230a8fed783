//! Platform-agnostic types for aquaculture basin monitoring.
//!
//! This crate defines the domain vocabulary shared by every other aquamon
//! crate: the fixed set of monitored water-quality parameters, timestamped
//! readings, threshold classifications, alert severities and quality labels.
//!
//! # Example
//!
//! ```
//! use aquamon_types::{Parameter, Direction, Reading};
//!
//! // Direction is intrinsic to the parameter, not configuration.
//! assert_eq!(Parameter::DissolvedOxygen.direction(), Direction::LowerIsWorse);
//! assert_eq!(Parameter::Ammonia.direction(), Direction::HigherIsWorse);
//!
//! let reading = Reading::builder()
//!     .temperature(20.0)
//!     .ph(7.2)
//!     .dissolved_oxygen(8.5)
//!     .water_level(95.0)
//!     .build();
//! assert_eq!(reading.get(Parameter::Ph), 7.2);
//! ```

mod error;
mod types;

pub use error::{ReadingError, ReadingResult};
pub use types::{
    Alert, Classification, Direction, Parameter, QualityLabel, Reading, ReadingBuilder, Severity,
};
