//! Trip lifecycle state.
//!
//! Modeled as an explicit tagged state rather than inferred from the
//! presence of timestamps.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a trip.
///
/// Pending trips have been requested but not confirmed; only Active trips
/// accept samples; Ended is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripState {
    Pending,
    Active,
    Ended,
}

impl TripState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripState::Pending => "pending",
            TripState::Active => "active",
            TripState::Ended => "ended",
        }
    }

    /// Whether sample ingestion and end-trip requests are accepted.
    pub fn accepts_mutation(&self) -> bool {
        matches!(self, TripState::Active)
    }
}

impl fmt::Display for TripState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_accepts_mutation() {
        assert!(!TripState::Pending.accepts_mutation());
        assert!(TripState::Active.accepts_mutation());
        assert!(!TripState::Ended.accepts_mutation());
    }

    #[test]
    fn test_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TripState::Active).unwrap(), "\"active\"");
        assert_eq!(TripState::Ended.to_string(), "ended");
    }
}
