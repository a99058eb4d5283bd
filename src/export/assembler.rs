//! Export snapshot assembly.
//!
//! Combines a momentary trip snapshot with store-fetched alert history,
//! sample history, and profile/vehicle/insurance context into one
//! immutable export record. Store read failures degrade to empty or
//! missing sections rather than failing the export; each is logged.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;
use crate::storage::models::{ExportRecord, TripRecord};
use crate::storage::store::TripStore;

/// Status tag stamped on every export record.
pub const EXPORT_STATUS_SENT: &str = "sent";

/// Assemble an export record for a trip snapshot.
///
/// The trip may still be Active; the snapshot is point-in-time. When the
/// user has several vehicles or insurance policies the first store record
/// wins; upstream never specified which is authoritative.
pub fn assemble_export<S: TripStore + ?Sized>(
    trip: &TripRecord,
    insurance_provider: &str,
    store: &S,
    exported_at: DateTime<Utc>,
    ctx: &LogContext,
) -> ExportRecord {
    let alerts = store.alerts_for_trip(&trip.trip_id).unwrap_or_else(|e| {
        log::warn!("{} EXPORT_FETCH_FAILED source=alerts error={:#}", ctx, e);
        Vec::new()
    });

    let location_data = store.samples_for_trip(&trip.trip_id).unwrap_or_else(|e| {
        log::warn!("{} EXPORT_FETCH_FAILED source=samples error={:#}", ctx, e);
        Vec::new()
    });

    let user_profile = store.profile_for_user(&trip.user_id).unwrap_or_else(|e| {
        log::warn!("{} EXPORT_FETCH_FAILED source=profile error={:#}", ctx, e);
        None
    });

    let vehicle_info = match store.vehicles_for_user(&trip.user_id) {
        Ok(mut vehicles) if !vehicles.is_empty() => Some(vehicles.remove(0)),
        Ok(_) => None,
        Err(e) => {
            log::warn!("{} EXPORT_FETCH_FAILED source=vehicles error={:#}", ctx, e);
            None
        }
    };

    let insurance_info = match store.insurance_for_user(&trip.user_id) {
        Ok(mut records) if !records.is_empty() => Some(records.remove(0)),
        Ok(_) => None,
        Err(e) => {
            log::warn!("{} EXPORT_FETCH_FAILED source=insurance error={:#}", ctx, e);
            None
        }
    };

    ExportRecord {
        export_id: format!("export-{}", &Uuid::new_v4().to_string()[..8]),
        trip_id: trip.trip_id.clone(),
        start_time: trip.start_time,
        end_time: trip.end_time,
        user_profile,
        vehicle_info,
        insurance_info,
        trip_data: trip.aggregate.clone(),
        alerts,
        location_data,
        nav_provider: trip.nav_provider.clone(),
        insurance_provider: insurance_provider.to_string(),
        status: EXPORT_STATUS_SENT.to_string(),
        exported_at,
    }
}
