//! Running trip statistics.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Cumulative statistics for one trip, updated incrementally per sample.
///
/// Every field is monotonically non-decreasing within a trip except
/// `average_speed` (recomputed, not accumulated) and `safety_score`
/// (recomputed, non-increasing from its initial ceiling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripAggregate {
    pub distance: f64,
    pub duration: u64,
    pub average_speed: f64,
    pub max_speed: f64,
    pub speed_violations: u32,
    pub hard_braking: u32,
    pub rapid_acceleration: u32,
    pub safety_score: u32,
}

impl TripAggregate {
    /// Fresh aggregate with the score at its ceiling.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            distance: 0.0,
            duration: 0,
            average_speed: 0.0,
            max_speed: 0.0,
            speed_violations: 0,
            hard_braking: 0,
            rapid_acceleration: 0,
            safety_score: config.score_ceiling,
        }
    }

    /// Fold one accepted sample into the running statistics.
    ///
    /// One sample is one interval unit of duration, and distance accrues
    /// as a rectangular integration of instantaneous speed over that
    /// interval. The running average is the recency-weighted blend
    /// `round((average + speed) / 2)`, deliberately not an arithmetic
    /// mean; the rest of the system was built against this blend and
    /// behavioral parity wins over statistical purity.
    ///
    /// Counts every over-limit sample as a speed violation, independent of
    /// the alerting margin.
    pub fn apply_sample(&mut self, speed: f64, speed_limit: f64, config: &EngineConfig) {
        self.duration += 1;
        self.distance += speed / config.intervals_per_distance_unit;
        self.max_speed = self.max_speed.max(speed);
        self.average_speed = ((self.average_speed + speed) / 2.0).round();
        if speed > speed_limit {
            self.speed_violations += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn aggregate_after(speeds: &[f64], limit: f64) -> TripAggregate {
        let config = EngineConfig::default();
        let mut agg = TripAggregate::new(&config);
        for &speed in speeds {
            agg.apply_sample(speed, limit, &config);
        }
        agg
    }

    #[test]
    fn test_duration_counts_intervals() {
        let agg = aggregate_after(&[10.0, 20.0, 30.0], 55.0);
        assert_eq!(agg.duration, 3);
    }

    #[test]
    fn test_distance_integrates_speed() {
        let agg = aggregate_after(&[36.0, 36.0], 55.0);
        assert!((agg.distance - 2.0 * 36.0 / 3600.0).abs() < 1e-12);
    }

    #[test]
    fn test_average_speed_is_recency_weighted_blend() {
        // round((0 + 30)/2) = 15, round((15 + 50)/2) = 33 (not the mean 40)
        let agg = aggregate_after(&[30.0, 50.0], 55.0);
        assert_eq!(agg.average_speed, 33.0);
    }

    #[test]
    fn test_speed_violations_count_every_over_limit_sample() {
        // 36 > 35 counts even though it is under the 5-unit alert margin
        let agg = aggregate_after(&[36.0, 35.0, 41.0], 35.0);
        assert_eq!(agg.speed_violations, 2);
    }

    #[test]
    fn test_new_aggregate_starts_at_ceiling() {
        let config = EngineConfig::default();
        let agg = TripAggregate::new(&config);
        assert_eq!(agg.safety_score, 100);
        assert_eq!(agg.duration, 0);
        assert_eq!(agg.distance, 0.0);
    }

    proptest! {
        #[test]
        fn prop_max_speed_is_true_maximum(speeds in proptest::collection::vec(0.0f64..200.0, 1..50)) {
            let agg = aggregate_after(&speeds, 55.0);
            let expected = speeds.iter().cloned().fold(0.0f64, f64::max);
            prop_assert_eq!(agg.max_speed, expected);
        }

        #[test]
        fn prop_distance_and_duration_never_decrease(speeds in proptest::collection::vec(0.0f64..200.0, 1..50)) {
            let config = EngineConfig::default();
            let mut agg = TripAggregate::new(&config);
            let mut last_distance = 0.0;
            let mut last_duration = 0;
            for &speed in &speeds {
                agg.apply_sample(speed, 55.0, &config);
                prop_assert!(agg.distance >= last_distance);
                prop_assert!(agg.duration > last_duration);
                last_distance = agg.distance;
                last_duration = agg.duration;
            }
        }
    }
}
