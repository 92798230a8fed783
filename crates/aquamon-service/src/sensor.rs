//! Sensor sampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::OffsetDateTime;

use aquamon_types::Reading;

/// Source of basin readings.
pub trait SensorSource: Send {
    /// Take one reading.
    fn sample(&mut self) -> Reading;
}

/// Simulated sensor producing uniformly random readings.
///
/// The ranges straddle the default thresholds, so a stream of samples
/// exercises safe, warning and danger bands for every parameter.
#[derive(Debug)]
pub struct SimulatedSensor {
    rng: StdRng,
}

impl SimulatedSensor {
    /// Create a sensor seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a sensor with a fixed seed, for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for SimulatedSensor {
    fn sample(&mut self) -> Reading {
        Reading {
            temperature: self.rng.random_range(18.0..23.0),
            ph: self.rng.random_range(6.5..8.0),
            dissolved_oxygen: self.rng.random_range(6.0..9.0),
            ammonia: self.rng.random_range(0.1..2.1),
            nitrite: self.rng.random_range(0.05..1.05),
            nitrate: self.rng.random_range(5.0..45.0),
            water_level: self.rng.random_range(80.0..100.0),
            turbidity: self.rng.random_range(2.0..12.0),
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_stay_in_range() {
        let mut sensor = SimulatedSensor::seeded(42);
        for _ in 0..100 {
            let reading = sensor.sample();
            assert!(reading.validate().is_ok());
            assert!((18.0..23.0).contains(&reading.temperature));
            assert!((6.5..8.0).contains(&reading.ph));
            assert!((6.0..9.0).contains(&reading.dissolved_oxygen));
            assert!((0.1..2.1).contains(&reading.ammonia));
            assert!((0.05..1.05).contains(&reading.nitrite));
            assert!((5.0..45.0).contains(&reading.nitrate));
            assert!((80.0..100.0).contains(&reading.water_level));
            assert!((2.0..12.0).contains(&reading.turbidity));
        }
    }

    #[test]
    fn test_seeded_sensors_are_reproducible() {
        let mut a = SimulatedSensor::seeded(7);
        let mut b = SimulatedSensor::seeded(7);
        let ra = a.sample();
        let rb = b.sample();
        assert_eq!(ra.temperature, rb.temperature);
        assert_eq!(ra.turbidity, rb.turbidity);
    }
}
