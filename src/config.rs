//! Engine configuration.
//!
//! Every detection threshold and scoring constant is configurable rather
//! than hardcoded. The hard-braking and rapid-acceleration thresholds in
//! particular have no reference values upstream; the defaults here exist
//! only so `Default` is usable, and embedders are expected to tune them.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Tunable thresholds and scoring constants for the telemetry engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Overage above the posted limit before a speed violation becomes
    /// user-facing. Violations are counted from the first unit over; only
    /// overages past this margin emit alerts.
    pub alert_speed_margin: f64,
    /// Speed lost between consecutive samples that counts as hard braking.
    pub hard_braking_threshold: f64,
    /// Speed gained between consecutive samples that counts as rapid
    /// acceleration.
    pub rapid_acceleration_threshold: f64,
    /// Lowest safety score a trip can reach.
    pub score_floor: u32,
    /// Score every trip starts at.
    pub score_ceiling: u32,
    /// Score penalty per counted speed violation.
    pub speed_violation_penalty: u32,
    /// Score penalty per hard-braking event.
    pub hard_braking_penalty: u32,
    /// Sampling intervals per distance unit. With one-second samples and
    /// speed in mph, 3600 accrues distance in miles.
    pub intervals_per_distance_unit: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alert_speed_margin: 5.0,
            hard_braking_threshold: 15.0,
            rapid_acceleration_threshold: 10.0,
            score_floor: 60,
            score_ceiling: 100,
            speed_violation_penalty: 2,
            hard_braking_penalty: 3,
            intervals_per_distance_unit: 3600.0,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a configuration from a JSON document.
    ///
    /// Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::Validation(format!("config parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the detectors and scorer cannot work with.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.alert_speed_margin.is_finite() || self.alert_speed_margin < 0.0 {
            return Err(EngineError::Validation(format!(
                "alert_speed_margin must be non-negative, got {}",
                self.alert_speed_margin
            )));
        }
        if !self.hard_braking_threshold.is_finite() || self.hard_braking_threshold <= 0.0 {
            return Err(EngineError::Validation(format!(
                "hard_braking_threshold must be positive, got {}",
                self.hard_braking_threshold
            )));
        }
        if !self.rapid_acceleration_threshold.is_finite()
            || self.rapid_acceleration_threshold <= 0.0
        {
            return Err(EngineError::Validation(format!(
                "rapid_acceleration_threshold must be positive, got {}",
                self.rapid_acceleration_threshold
            )));
        }
        if !self.intervals_per_distance_unit.is_finite()
            || self.intervals_per_distance_unit <= 0.0
        {
            return Err(EngineError::Validation(format!(
                "intervals_per_distance_unit must be positive, got {}",
                self.intervals_per_distance_unit
            )));
        }
        if self.score_floor > self.score_ceiling {
            return Err(EngineError::Validation(format!(
                "score_floor {} exceeds score_ceiling {}",
                self.score_floor, self.score_ceiling
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alert_speed_margin, 5.0);
        assert_eq!(config.score_floor, 60);
        assert_eq!(config.score_ceiling, 100);
        assert_eq!(config.speed_violation_penalty, 2);
        assert_eq!(config.hard_braking_penalty, 3);
    }

    #[test]
    fn test_from_json_with_partial_fields() {
        let config = EngineConfig::from_json_str(r#"{"alert_speed_margin": 10.0}"#).unwrap();
        assert_eq!(config.alert_speed_margin, 10.0);
        // Everything else falls back to defaults
        assert_eq!(config.hard_braking_threshold, 15.0);
    }

    #[test]
    fn test_rejects_inverted_score_bounds() {
        let config = EngineConfig {
            score_floor: 100,
            score_ceiling: 60,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_thresholds() {
        let config = EngineConfig {
            hard_braking_threshold: 0.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            rapid_acceleration_threshold: -1.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(EngineConfig::from_json_str("not json{").is_err());
    }
}
