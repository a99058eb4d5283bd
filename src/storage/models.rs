//! Data models crossing the store boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trips::aggregate::TripAggregate;
use crate::trips::state::TripState;

/// A single telemetry observation. Transient: consumed to update the
/// aggregate, then handed to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub speed_limit: f64,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of a trip handed to the store at start and end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub trip_id: String,
    pub user_id: String,
    pub vehicle_id: Option<String>,
    pub nav_provider: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub state: TripState,
    pub aggregate: TripAggregate,
}

/// A user-facing alert payload. The read/unread flag lives in the store,
/// not here; the core's responsibility ends at producing the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub alert_id: String,
    pub trip_id: String,
    pub user_id: String,
    pub kind: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Driver profile as supplied by the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub license_state: String,
}

/// Vehicle record as supplied by the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub vehicle_id: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub vin: String,
    pub license_plate: String,
    pub color: String,
}

/// Insurance policy record as supplied by the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceRecord {
    pub provider: String,
    pub policy_number: String,
    pub group_number: String,
    pub effective_date: String,
    pub expiration_date: String,
    pub coverage_type: String,
    pub deductible: String,
}

/// Immutable export snapshot: trip identity and timing, the frozen
/// aggregate, full alert and sample history, and the externally supplied
/// profile/vehicle/insurance context. Never mutated after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub export_id: String,
    pub trip_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub user_profile: Option<UserProfile>,
    pub vehicle_info: Option<VehicleRecord>,
    pub insurance_info: Option<InsuranceRecord>,
    pub trip_data: TripAggregate,
    pub alerts: Vec<AlertRecord>,
    pub location_data: Vec<Sample>,
    pub nav_provider: Option<String>,
    pub insurance_provider: String,
    pub status: String,
    pub exported_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_trip_record_round_trips_through_json() {
        let record = TripRecord {
            trip_id: "trip-abc123".to_string(),
            user_id: "user-1".to_string(),
            vehicle_id: None,
            nav_provider: Some("waze".to_string()),
            start_time: "2026-03-01T12:00:00Z".parse().unwrap(),
            end_time: None,
            state: TripState::Active,
            aggregate: TripAggregate::new(&EngineConfig::default()),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"state\":\"active\""));
        let back: TripRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
