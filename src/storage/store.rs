//! External store seam.
//!
//! All persistence and record fetching is delegated through this trait.
//! Sample appends arrive under the trip's exclusive section, which is
//! what guarantees the oldest-first ordering below; every other call is
//! made without holding a lock. Failures come back as `anyhow::Error`
//! because the transport behind the store is opaque to the core;
//! callers on the alert path log and swallow them.

use crate::storage::models::{
    AlertRecord, ExportRecord, InsuranceRecord, Sample, TripRecord, UserProfile, VehicleRecord,
};

/// The external store the core collaborates with.
pub trait TripStore: Send + Sync {
    /// Insert or update a trip record by its identifier.
    fn put_trip(&self, record: &TripRecord) -> anyhow::Result<()>;

    /// Append one accepted sample to the trip's history.
    fn append_sample(&self, trip_id: &str, sample: &Sample) -> anyhow::Result<()>;

    /// Append an emitted alert.
    fn append_alert(&self, alert: &AlertRecord) -> anyhow::Result<()>;

    /// Record one export, status tag included.
    fn record_export(&self, export: &ExportRecord) -> anyhow::Result<()>;

    /// Full retained sample history for a trip, oldest first.
    fn samples_for_trip(&self, trip_id: &str) -> anyhow::Result<Vec<Sample>>;

    /// Full alert history for a trip, oldest first.
    fn alerts_for_trip(&self, trip_id: &str) -> anyhow::Result<Vec<AlertRecord>>;

    /// The user's profile, if one exists.
    fn profile_for_user(&self, user_id: &str) -> anyhow::Result<Option<UserProfile>>;

    /// The user's vehicles in store order.
    fn vehicles_for_user(&self, user_id: &str) -> anyhow::Result<Vec<VehicleRecord>>;

    /// The user's insurance policies in store order.
    fn insurance_for_user(&self, user_id: &str) -> anyhow::Result<Vec<InsuranceRecord>>;
}
