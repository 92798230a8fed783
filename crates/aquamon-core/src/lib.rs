//! Decision logic for aquaculture basin monitoring.
//!
//! This crate turns raw [`Reading`](aquamon_types::Reading)s into derived
//! signals:
//!
//! - **Threshold evaluation**: classify one parameter value against its
//!   configured safe/warning bounds ([`thresholds`]).
//! - **Alert detection**: scan a full reading and emit transient alerts,
//!   with a danger escalation rule past the warning bound ([`alerts`]).
//! - **Quality scoring**: composite 0-1 health score, categorical label and
//!   the fixed-confidence predicted quality ([`quality`]).
//!
//! # Quick Start
//!
//! ```
//! use aquamon_core::{Thresholds, alerts, quality};
//! use aquamon_types::Reading;
//!
//! let thresholds = Thresholds::default();
//! let reading = Reading::builder()
//!     .temperature(20.0)
//!     .ph(7.2)
//!     .dissolved_oxygen(9.0)
//!     .water_level(100.0)
//!     .build();
//!
//! let alerts = alerts::detect(&reading, &thresholds);
//! assert!(alerts.is_empty());
//!
//! let score = quality::score(&reading);
//! assert!(score.value() > 0.8);
//! ```

pub mod alerts;
pub mod quality;
pub mod thresholds;

mod error;

pub use alerts::{AlertLog, MAX_ACTIVE_ALERTS, detect};
pub use error::{ThresholdError, ThresholdResult};
pub use quality::{Prediction, QualityScore};
pub use thresholds::{ParameterThreshold, ThresholdConfig, Thresholds, classify};
