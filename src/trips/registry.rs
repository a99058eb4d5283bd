//! Trip arena and lifecycle management.
//!
//! Owns the in-memory trip records. Each trip sits behind its own mutex
//! (the per-trip exclusive section), so mutations of one trip are strictly
//! serialized while different trips proceed independently. The arena map
//! itself is locked only for id lookups and inserts, never across a trip
//! mutation.
//!
//! Lock order: arena/active maps before any trip mutex, never the reverse.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::storage::models::TripRecord;
use crate::trips::aggregate::TripAggregate;
use crate::trips::state::TripState;

/// Last accepted sample, kept as the validator's reference point.
///
/// Only speed and timestamp survive; full sample history lives in the
/// external store.
#[derive(Debug, Clone, Copy)]
pub struct LastSample {
    pub speed: f64,
    pub timestamp: DateTime<Utc>,
}

/// One trip's in-memory record. Mutated only under its arena mutex.
#[derive(Debug)]
pub struct Trip {
    pub trip_id: String,
    pub user_id: String,
    pub vehicle_id: Option<String>,
    pub nav_provider: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub state: TripState,
    pub aggregate: TripAggregate,
    pub last_sample: Option<LastSample>,
    /// Set while a speed-alert overage episode is in progress; collapses
    /// sustained overages into a single alert.
    pub speed_alert_latched: bool,
}

impl Trip {
    fn new(
        trip_id: String,
        user_id: &str,
        vehicle_id: Option<&str>,
        nav_provider: Option<&str>,
        start_time: DateTime<Utc>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            trip_id,
            user_id: user_id.to_string(),
            vehicle_id: vehicle_id.map(|s| s.to_string()),
            nav_provider: nav_provider.map(|s| s.to_string()),
            start_time,
            end_time: None,
            state: TripState::Pending,
            aggregate: TripAggregate::new(config),
            last_sample: None,
            speed_alert_latched: false,
        }
    }

    /// Confirm a pending trip as active.
    pub fn activate(&mut self) {
        if self.state == TripState::Pending {
            self.state = TripState::Active;
        }
    }

    /// Transition to Ended, stamping the end time. Idempotent: a trip
    /// that already ended keeps its original end time and aggregate.
    pub fn end(&mut self, now: DateTime<Utc>) {
        if self.state != TripState::Ended {
            self.state = TripState::Ended;
            self.end_time = Some(now);
        }
    }

    /// Store-facing snapshot of this trip.
    pub fn to_record(&self) -> TripRecord {
        TripRecord {
            trip_id: self.trip_id.clone(),
            user_id: self.user_id.clone(),
            vehicle_id: self.vehicle_id.clone(),
            nav_provider: self.nav_provider.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            state: self.state,
            aggregate: self.aggregate.clone(),
        }
    }
}

pub type SharedTrip = Arc<Mutex<Trip>>;

/// Arena of trips addressed by identifier.
#[derive(Default)]
pub struct TripRegistry {
    trips: RwLock<HashMap<String, SharedTrip>>,
    /// user id -> their currently Active trip, for idempotent starts.
    active_by_user: RwLock<HashMap<String, String>>,
}

impl TripRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Pending trip for the user, or hand back their
    /// existing live trip. Returns the handle and whether a new trip
    /// was created.
    ///
    /// A Pending trip counts as live: the start that created it has
    /// already published the mapping and is still persisting the record,
    /// so a concurrent start must join it rather than mint a second trip.
    pub fn create_or_existing(
        &self,
        user_id: &str,
        vehicle_id: Option<&str>,
        nav_provider: Option<&str>,
        start_time: DateTime<Utc>,
        config: &EngineConfig,
    ) -> (SharedTrip, bool) {
        let mut active = self.active_by_user.write();

        if let Some(existing_id) = active.get(user_id) {
            let existing = self.trips.read().get(existing_id).cloned();
            if let Some(trip) = existing {
                if trip.lock().state != TripState::Ended {
                    return (trip, false);
                }
            }
            // Stale mapping (trip ended or evicted); fall through and
            // start fresh.
            active.remove(user_id);
        }

        let trip_id = format!("trip-{}", &Uuid::new_v4().to_string()[..8]);
        let trip = Arc::new(Mutex::new(Trip::new(
            trip_id.clone(),
            user_id,
            vehicle_id,
            nav_provider,
            start_time,
            config,
        )));

        self.trips.write().insert(trip_id.clone(), trip.clone());
        active.insert(user_id.to_string(), trip_id);

        (trip, true)
    }

    /// Look up a trip, cloning the handle out of the arena lock.
    pub fn get(&self, trip_id: &str) -> EngineResult<SharedTrip> {
        self.trips
            .read()
            .get(trip_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound {
                trip_id: trip_id.to_string(),
            })
    }

    /// Drop the user -> active-trip mapping once a trip ends.
    ///
    /// Callers must not hold the trip's mutex here (lock order).
    pub fn clear_active(&self, user_id: &str, trip_id: &str) {
        let mut active = self.active_by_user.write();
        if active.get(user_id).map(String::as_str) == Some(trip_id) {
            active.remove(user_id);
        }
    }

    pub fn len(&self) -> usize {
        self.trips.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_time() -> DateTime<Utc> {
        "2026-03-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_new_trip_starts_pending() {
        let registry = TripRegistry::new();
        let config = EngineConfig::default();
        let (trip, created) =
            registry.create_or_existing("user-1", None, Some("waze"), start_time(), &config);
        assert!(created);
        let guard = trip.lock();
        assert_eq!(guard.state, TripState::Pending);
        assert!(guard.end_time.is_none());
        assert!(guard.trip_id.starts_with("trip-"));
    }

    #[test]
    fn test_second_start_returns_existing_active_trip() {
        let registry = TripRegistry::new();
        let config = EngineConfig::default();
        let (first, _) = registry.create_or_existing("user-1", None, None, start_time(), &config);
        first.lock().activate();

        let (second, created) =
            registry.create_or_existing("user-1", None, None, start_time(), &config);
        assert!(!created);
        assert_eq!(second.lock().trip_id, first.lock().trip_id);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_second_start_joins_pending_trip() {
        let registry = TripRegistry::new();
        let config = EngineConfig::default();
        // First trip still Pending, as it is while a start persists it.
        let (first, _) = registry.create_or_existing("user-1", None, None, start_time(), &config);
        assert_eq!(first.lock().state, TripState::Pending);

        let (second, created) =
            registry.create_or_existing("user-1", None, None, start_time(), &config);
        assert!(!created);
        assert_eq!(second.lock().trip_id, first.lock().trip_id);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_start_after_end_creates_new_trip() {
        let registry = TripRegistry::new();
        let config = EngineConfig::default();
        let (first, _) = registry.create_or_existing("user-1", None, None, start_time(), &config);
        {
            let mut guard = first.lock();
            guard.activate();
            guard.end(start_time());
        }
        registry.clear_active("user-1", &first.lock().trip_id);

        let (second, created) =
            registry.create_or_existing("user-1", None, None, start_time(), &config);
        assert!(created);
        assert_ne!(second.lock().trip_id, first.lock().trip_id);
    }

    #[test]
    fn test_users_get_independent_trips() {
        let registry = TripRegistry::new();
        let config = EngineConfig::default();
        let (a, _) = registry.create_or_existing("user-a", None, None, start_time(), &config);
        let (b, _) = registry.create_or_existing("user-b", None, None, start_time(), &config);
        assert_ne!(a.lock().trip_id, b.lock().trip_id);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_get_unknown_trip_is_not_found() {
        let registry = TripRegistry::new();
        match registry.get("trip-missing") {
            Err(EngineError::NotFound { trip_id }) => assert_eq!(trip_id, "trip-missing"),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_end_is_idempotent_on_trip() {
        let registry = TripRegistry::new();
        let config = EngineConfig::default();
        let (trip, _) = registry.create_or_existing("user-1", None, None, start_time(), &config);
        let mut guard = trip.lock();
        guard.activate();
        guard.end(start_time());
        let first_end = guard.end_time;
        guard.end("2026-03-01T13:00:00Z".parse().unwrap());
        assert_eq!(guard.end_time, first_end);
    }
}
