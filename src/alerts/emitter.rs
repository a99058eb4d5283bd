//! Alert emission with de-duplication.
//!
//! Alerts surface only for alertable speed violations. A per-trip latch
//! collapses a sustained overage into a single alert: it sets on emission
//! and clears on the first sample back at or under the margin, re-arming
//! the emitter for the next overage episode.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;
use crate::scoring::violations::ViolationKind;
use crate::storage::models::AlertRecord;

/// Decide whether an alertable sample surfaces an alert.
///
/// Returns the alert payload (if any) and the new latch value. The message
/// embeds the observed speed and the limit verbatim.
pub fn evaluate_alert(
    alertable: bool,
    latched: bool,
    speed: f64,
    speed_limit: f64,
    trip_id: &str,
    user_id: &str,
    now: DateTime<Utc>,
    ctx: &LogContext,
) -> (Option<AlertRecord>, bool) {
    if !alertable {
        return (None, false);
    }

    if latched {
        log::debug!(
            "{} ALERT_SUPPRESSED reason=latched speed={} limit={}",
            ctx,
            speed,
            speed_limit
        );
        return (None, true);
    }

    let alert = AlertRecord {
        alert_id: format!("alert-{}", &Uuid::new_v4().to_string()[..8]),
        trip_id: trip_id.to_string(),
        user_id: user_id.to_string(),
        kind: ViolationKind::SpeedViolation.as_str().to_string(),
        message: format!("Speed Alert: {} mph in {} mph zone", speed, speed_limit),
        created_at: now,
    };

    log::info!(
        "{} ALERT_EMITTED kind={} speed={} limit={}",
        ctx,
        alert.kind,
        speed,
        speed_limit
    );

    (Some(alert), true)
}
