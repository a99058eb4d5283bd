//! Per-sample violation classification.
//!
//! Classifies the current sample against the previous one. Only the
//! previous speed is needed; the detector never sees full history.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::logging::structured::LogContext;

/// Kinds of safety violations a sample can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    SpeedViolation,
    HardBraking,
    RapidAcceleration,
}

impl ViolationKind {
    /// Wire tag, matching the store's alert/violation tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::SpeedViolation => "speed",
            ViolationKind::HardBraking => "hard_braking",
            ViolationKind::RapidAcceleration => "rapid_acceleration",
        }
    }
}

/// Detector output for one accepted sample.
#[derive(Debug, Clone, Copy)]
pub struct SampleClassification {
    /// Over the posted limit at all; counted against the aggregate.
    pub speed_violation: bool,
    /// Over the limit by more than the alert margin; user-facing.
    pub alertable: bool,
    /// Hard braking or rapid acceleration relative to the previous sample.
    /// At most one per sample; the two are opposite sign conditions.
    pub motion: Option<ViolationKind>,
}

/// Classify a sample against the previous accepted speed.
///
/// # Decision tree
/// 1. `speed > limit` -> speed violation (counted)
/// 2. `speed > limit + margin` -> additionally alertable
/// 3. `prev - speed > braking threshold` -> hard braking, or
///    `speed - prev > acceleration threshold` -> rapid acceleration
///
/// The first sample of a trip has no previous point, so no motion event
/// is possible for it.
pub fn classify_sample(
    speed: f64,
    speed_limit: f64,
    previous_speed: Option<f64>,
    config: &EngineConfig,
    ctx: &LogContext,
) -> SampleClassification {
    let speed_violation = speed > speed_limit;
    let alertable = speed > speed_limit + config.alert_speed_margin;

    let motion = previous_speed.and_then(|prev| {
        let delta = speed - prev;
        if -delta > config.hard_braking_threshold {
            Some(ViolationKind::HardBraking)
        } else if delta > config.rapid_acceleration_threshold {
            Some(ViolationKind::RapidAcceleration)
        } else {
            None
        }
    });

    if speed_violation || motion.is_some() {
        log::info!(
            "{} VIOLATION_DETECTED speed={} limit={} alertable={} motion={:?}",
            ctx,
            speed,
            speed_limit,
            alertable,
            motion.map(|m| m.as_str())
        );
    }

    SampleClassification {
        speed_violation,
        alertable,
        motion,
    }
}
