//! Safety score derivation.

use crate::config::EngineConfig;

/// Recompute the bounded safety score from cumulative violation counters.
///
/// `max(floor, ceiling - speed_violations * speed_penalty
///   - hard_braking * braking_penalty)`
///
/// Rapid acceleration is tracked in the aggregate but carries no penalty;
/// that asymmetry is the observed contract of the scoring heuristic, not
/// an omission. A pure function of the counters: recomputing from the
/// same counters always yields the same score, which makes replay safe.
pub fn safety_score(speed_violations: u32, hard_braking: u32, config: &EngineConfig) -> u32 {
    let penalty = u64::from(speed_violations) * u64::from(config.speed_violation_penalty)
        + u64::from(hard_braking) * u64::from(config.hard_braking_penalty);
    let scored = u64::from(config.score_ceiling).saturating_sub(penalty);
    scored.max(u64::from(config.score_floor)) as u32
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_known_score() {
        let config = EngineConfig::default();
        // 3 speed violations and 1 hard-braking event: 100 - 6 - 3 = 91
        assert_eq!(safety_score(3, 1, &config), 91);
    }

    #[test]
    fn test_clean_trip_scores_ceiling() {
        let config = EngineConfig::default();
        assert_eq!(safety_score(0, 0, &config), 100);
    }

    #[test]
    fn test_floor_clamp() {
        let config = EngineConfig::default();
        assert_eq!(safety_score(100, 0, &config), 60);
        assert_eq!(safety_score(u32::MAX, u32::MAX, &config), 60);
    }

    #[test]
    fn test_custom_penalties() {
        let config = EngineConfig {
            speed_violation_penalty: 5,
            hard_braking_penalty: 10,
            ..EngineConfig::default()
        };
        assert_eq!(safety_score(2, 1, &config), 80);
    }

    proptest! {
        #[test]
        fn prop_score_stays_in_bounds(sv in 0u32..100_000, hb in 0u32..100_000) {
            let config = EngineConfig::default();
            let score = safety_score(sv, hb, &config);
            prop_assert!(score >= config.score_floor);
            prop_assert!(score <= config.score_ceiling);
        }

        #[test]
        fn prop_score_is_idempotent(sv in 0u32..100_000, hb in 0u32..100_000) {
            let config = EngineConfig::default();
            prop_assert_eq!(safety_score(sv, hb, &config), safety_score(sv, hb, &config));
        }

        #[test]
        fn prop_score_never_increases_with_violations(sv in 0u32..1000, hb in 0u32..1000) {
            let config = EngineConfig::default();
            prop_assert!(safety_score(sv + 1, hb, &config) <= safety_score(sv, hb, &config));
            prop_assert!(safety_score(sv, hb + 1, &config) <= safety_score(sv, hb, &config));
        }
    }
}
