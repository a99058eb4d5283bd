//! Per-sample validation rules.
//!
//! Value checks run before the ordering check. Out-of-order samples are
//! dropped rather than buffered: the aggregator is strictly incremental
//! and has no window to reorder into.

use chrono::{DateTime, Utc};

use crate::error::{EngineError, EngineResult};
use crate::storage::models::Sample;

/// Check a raw sample against value ranges and the trip's last-accepted
/// timestamp. Accepted samples pass through unchanged; the caller records
/// the new reference point.
///
/// Equal timestamps pass; only a strictly earlier sample is out of order.
pub fn validate_sample(sample: &Sample, last_accepted: Option<DateTime<Utc>>) -> EngineResult<()> {
    check_range("latitude", sample.latitude, -90.0, 90.0)?;
    check_range("longitude", sample.longitude, -180.0, 180.0)?;
    check_non_negative("speed", sample.speed)?;
    check_non_negative("speed_limit", sample.speed_limit)?;

    if let Some(last) = last_accepted {
        if sample.timestamp < last {
            return Err(EngineError::OutOfOrder {
                last,
                got: sample.timestamp,
            });
        }
    }

    Ok(())
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> EngineResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(EngineError::InvalidValue { field, value });
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::InvalidValue { field, value });
    }
    Ok(())
}
