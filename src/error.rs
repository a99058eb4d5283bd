//! Error taxonomy for the telemetry core.
//!
//! Every error carries its kind plus enough context for the caller to
//! branch on; none of them are fatal to the process. A rejected sample
//! affects only itself: validation runs strictly before any aggregate
//! mutation.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::trips::state::TripState;

/// Errors surfaced by the engine's public operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input. The caller corrects and retries.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A sample field outside its legal range.
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },

    /// Sample timestamp strictly earlier than the last accepted one for
    /// the trip. Expected under network jitter; the sample is dropped,
    /// never buffered or reordered.
    #[error("out-of-order sample: {got} is earlier than last accepted {last}")]
    OutOfOrder {
        last: DateTime<Utc>,
        got: DateTime<Utc>,
    },

    /// Mutation attempted against a trip that is not accepting it.
    #[error("trip {trip_id} is {state}, not accepting mutations")]
    InvalidState { trip_id: String, state: TripState },

    /// Unknown trip reference.
    #[error("trip {trip_id} not found")]
    NotFound { trip_id: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
