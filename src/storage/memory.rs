//! In-memory store.
//!
//! Reference `TripStore` used by the test suite, and a usable stand-in
//! for embedders while wiring a real store.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::storage::models::{
    AlertRecord, ExportRecord, InsuranceRecord, Sample, TripRecord, UserProfile, VehicleRecord,
};
use crate::storage::store::TripStore;

/// Thread-safe in-memory implementation of [`TripStore`].
#[derive(Default)]
pub struct MemoryStore {
    trips: RwLock<HashMap<String, TripRecord>>,
    samples: RwLock<HashMap<String, Vec<Sample>>>,
    alerts: RwLock<HashMap<String, Vec<AlertRecord>>>,
    exports: RwLock<Vec<ExportRecord>>,
    profiles: RwLock<HashMap<String, UserProfile>>,
    vehicles: RwLock<HashMap<String, Vec<VehicleRecord>>>,
    insurance: RwLock<HashMap<String, Vec<InsuranceRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_profile(&self, user_id: &str, profile: UserProfile) {
        self.profiles.write().insert(user_id.to_string(), profile);
    }

    pub fn insert_vehicle(&self, user_id: &str, vehicle: VehicleRecord) {
        self.vehicles
            .write()
            .entry(user_id.to_string())
            .or_default()
            .push(vehicle);
    }

    pub fn insert_insurance(&self, user_id: &str, record: InsuranceRecord) {
        self.insurance
            .write()
            .entry(user_id.to_string())
            .or_default()
            .push(record);
    }

    /// Stored trip record, if the trip has been persisted.
    pub fn trip(&self, trip_id: &str) -> Option<TripRecord> {
        self.trips.read().get(trip_id).cloned()
    }

    /// All recorded exports, in recording order.
    pub fn exports(&self) -> Vec<ExportRecord> {
        self.exports.read().clone()
    }
}

impl TripStore for MemoryStore {
    fn put_trip(&self, record: &TripRecord) -> anyhow::Result<()> {
        self.trips
            .write()
            .insert(record.trip_id.clone(), record.clone());
        Ok(())
    }

    fn append_sample(&self, trip_id: &str, sample: &Sample) -> anyhow::Result<()> {
        self.samples
            .write()
            .entry(trip_id.to_string())
            .or_default()
            .push(sample.clone());
        Ok(())
    }

    fn append_alert(&self, alert: &AlertRecord) -> anyhow::Result<()> {
        self.alerts
            .write()
            .entry(alert.trip_id.clone())
            .or_default()
            .push(alert.clone());
        Ok(())
    }

    fn record_export(&self, export: &ExportRecord) -> anyhow::Result<()> {
        self.exports.write().push(export.clone());
        Ok(())
    }

    fn samples_for_trip(&self, trip_id: &str) -> anyhow::Result<Vec<Sample>> {
        Ok(self.samples.read().get(trip_id).cloned().unwrap_or_default())
    }

    fn alerts_for_trip(&self, trip_id: &str) -> anyhow::Result<Vec<AlertRecord>> {
        Ok(self.alerts.read().get(trip_id).cloned().unwrap_or_default())
    }

    fn profile_for_user(&self, user_id: &str) -> anyhow::Result<Option<UserProfile>> {
        Ok(self.profiles.read().get(user_id).cloned())
    }

    fn vehicles_for_user(&self, user_id: &str) -> anyhow::Result<Vec<VehicleRecord>> {
        Ok(self.vehicles.read().get(user_id).cloned().unwrap_or_default())
    }

    fn insurance_for_user(&self, user_id: &str) -> anyhow::Result<Vec<InsuranceRecord>> {
        Ok(self.insurance.read().get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_append_in_order() {
        let store = MemoryStore::new();
        for speed in [10.0, 20.0, 30.0] {
            let sample = Sample {
                latitude: 0.0,
                longitude: 0.0,
                speed,
                speed_limit: 55.0,
                timestamp: "2026-03-01T12:00:00Z".parse().unwrap(),
            };
            store.append_sample("trip-1", &sample).unwrap();
        }
        let samples = store.samples_for_trip("trip-1").unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[2].speed, 30.0);
        assert!(store.samples_for_trip("trip-other").unwrap().is_empty());
    }

    #[test]
    fn test_first_record_ordering_preserved() {
        let store = MemoryStore::new();
        for provider in ["Progressive", "Geico"] {
            store.insert_insurance(
                "user-1",
                InsuranceRecord {
                    provider: provider.to_string(),
                    policy_number: "POL1".to_string(),
                    group_number: String::new(),
                    effective_date: String::new(),
                    expiration_date: String::new(),
                    coverage_type: "Full Coverage".to_string(),
                    deductible: "500".to_string(),
                },
            );
        }
        let records = store.insurance_for_user("user-1").unwrap();
        assert_eq!(records[0].provider, "Progressive");
    }
}
