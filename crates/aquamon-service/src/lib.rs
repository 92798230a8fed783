//! Background monitoring loop for aquaculture basins.
//!
//! This crate provides a service that:
//! - Samples each configured basin on a short interval
//! - Detects threshold breaches and keeps a rolling alert list per basin
//! - Scores water quality and commits history entries on a fixed cadence
//! - Raises deduplicated risk notifications, with a periodic sweep
//!   re-checking every basin
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/aquamon/service.toml`:
//!
//! ```toml
//! risk_interval_secs = 300
//! history_every_ticks = 100
//! dedup_window_secs = 300
//!
//! [display]
//! refresh_interval_ms = 3000
//!
//! [thresholds.ammonia]
//! safe = 0.5
//! warning = 1.0
//!
//! [storage]
//! path = "~/.local/share/aquamon"
//!
//! [[basins]]
//! id = "basin-1"
//! name = "Basin Alpha"
//! ```
//!
//! Omitted threshold parameters fall back to the built-in table.

pub mod config;
pub mod monitor;
pub mod runner;
pub mod sensor;

pub use config::{
    BasinConfig, Config, ConfigError, DisplayConfig, StorageConfig, ValidationError,
};
pub use monitor::{BasinMonitor, TickOutcome};
pub use runner::{Runner, stop_channel};
pub use sensor::{SensorSource, SimulatedSensor};
