//! Tokio-driven monitoring loop.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::interval;
use tracing::{info, warn};

use aquamon_core::{ThresholdError, Thresholds};
use aquamon_store::{HistoryStore, KeyValueStore, NotificationManager};

use crate::config::Config;
use crate::monitor::BasinMonitor;
use crate::sensor::{SensorSource, SimulatedSensor};

/// Drives every configured basin: a short sampling interval per pass and
/// a longer interval re-evaluating risk across all basins.
pub struct Runner<S> {
    basins: Vec<BasinRuntime<S>>,
    refresh_interval: Duration,
    risk_interval: Duration,
}

struct BasinRuntime<S> {
    monitor: BasinMonitor<S>,
    sensor: Box<dyn SensorSource>,
}

impl<S: KeyValueStore + Clone> Runner<S> {
    /// Build a runner from the configuration, attaching a simulated
    /// sensor to each basin.
    ///
    /// # Errors
    ///
    /// Returns a [`ThresholdError`] if the configured threshold table is
    /// invalid.
    pub fn new(config: &Config, store: S) -> Result<Self, ThresholdError> {
        let dedup_window = time::Duration::seconds(config.dedup_window_secs as i64);

        let mut basins = Vec::with_capacity(config.basins.len());
        for basin in &config.basins {
            let thresholds = Thresholds::new(config.thresholds.clone())?;
            let monitor = BasinMonitor::new(
                basin.id.clone(),
                basin.name.clone(),
                thresholds,
                HistoryStore::new(store.clone()),
                NotificationManager::new(store.clone()).with_dedup_window(dedup_window),
                config.history_every_ticks,
            );
            basins.push(BasinRuntime {
                monitor,
                sensor: Box::new(SimulatedSensor::new()),
            });
        }

        Ok(Self {
            basins,
            refresh_interval: Duration::from_millis(config.display.refresh_interval_ms),
            risk_interval: Duration::from_secs(config.risk_interval_secs),
        })
    }

    /// Number of monitored basins.
    pub fn basin_count(&self) -> usize {
        self.basins.len()
    }

    /// Sample and process one reading for every basin.
    pub fn run_once(&mut self) {
        for basin in &mut self.basins {
            let reading = basin.sensor.sample();
            match basin.monitor.process_reading(reading) {
                Ok(outcome) => {
                    if let Some(n) = &outcome.notification {
                        info!(
                            basin_id = basin.monitor.id(),
                            kind = %n.kind,
                            "Raised risk notification"
                        );
                    }
                }
                Err(e) => {
                    warn!(basin_id = basin.monitor.id(), "Discarded reading: {e}");
                }
            }
        }
    }

    /// Re-evaluate risk for every basin from its last reading.
    pub fn run_risk_sweep(&self) {
        for basin in &self.basins {
            if let Some(n) = basin.monitor.evaluate_risk() {
                info!(
                    basin_id = basin.monitor.id(),
                    kind = %n.kind,
                    "Risk sweep raised notification"
                );
            }
        }
    }

    /// Run the monitoring loop until `stop` flips to `true` or its sender
    /// is dropped.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) {
        if self.basins.is_empty() {
            info!("No basins configured, nothing to monitor");
            return;
        }

        info!(
            basins = self.basins.len(),
            refresh_ms = self.refresh_interval.as_millis() as u64,
            risk_secs = self.risk_interval.as_secs(),
            "Starting monitoring loop"
        );

        let mut refresh = interval(self.refresh_interval);
        let mut risk = interval(self.risk_interval);
        // The first risk tick fires immediately, before any reading
        // exists; evaluate_risk treats that as a no-op.

        loop {
            tokio::select! {
                _ = refresh.tick() => self.run_once(),
                _ = risk.tick() => self.run_risk_sweep(),
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        info!("Stop requested, shutting down monitoring loop");
                        break;
                    }
                }
            }
        }
    }
}

/// Create the stop channel for [`Runner::run`].
pub fn stop_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use aquamon_store::MemoryStore;

    use crate::config::BasinConfig;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.display.refresh_interval_ms = 100;
        config.risk_interval_secs = 1;
        config.history_every_ticks = 1;
        config.basins.push(BasinConfig {
            id: "basin-1".to_string(),
            name: "Basin Alpha".to_string(),
        });
        config.basins.push(BasinConfig {
            id: "basin-2".to_string(),
            name: "Basin Beta".to_string(),
        });
        config
    }

    #[test]
    fn test_runner_builds_one_monitor_per_basin() {
        let runner = Runner::new(&test_config(), Arc::new(MemoryStore::new())).unwrap();
        assert_eq!(runner.basin_count(), 2);
    }

    #[test]
    fn test_invalid_thresholds_are_rejected() {
        let mut config = test_config();
        config.thresholds.ammonia = aquamon_core::ParameterThreshold::new(1.0, 0.5);
        assert!(Runner::new(&config, Arc::new(MemoryStore::new())).is_err());
    }

    #[test]
    fn test_run_once_commits_history() {
        let store = Arc::new(MemoryStore::new());
        let mut runner = Runner::new(&test_config(), Arc::clone(&store)).unwrap();

        runner.run_once();
        runner.run_once();

        let history = HistoryStore::new(store);
        assert_eq!(history.get_history("basin-1", None).len(), 2);
        assert_eq!(history.get_history("basin-2", None).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_signal() {
        let store = Arc::new(MemoryStore::new());
        let runner = Runner::new(&test_config(), Arc::clone(&store)).unwrap();
        let (stop_tx, stop_rx) = stop_channel();

        let handle = tokio::spawn(runner.run(stop_rx));
        // Let a few sampling ticks elapse.
        tokio::time::sleep(Duration::from_millis(350)).await;
        stop_tx.send(true).unwrap();
        handle.await.unwrap();

        let history = HistoryStore::new(store);
        assert!(!history.get_history("basin-1", None).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_when_sender_dropped() {
        let mut config = test_config();
        config.basins.truncate(1);
        let runner = Runner::new(&config, Arc::new(MemoryStore::new())).unwrap();
        let (stop_tx, stop_rx) = stop_channel();

        let handle = tokio::spawn(runner.run(stop_rx));
        tokio::time::sleep(Duration::from_millis(150)).await;
        drop(stop_tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_with_no_basins_returns() {
        let config = Config::default();
        let runner = Runner::new(&config, Arc::new(MemoryStore::new())).unwrap();
        let (_stop_tx, stop_rx) = stop_channel();
        runner.run(stop_rx).await;
    }
}
