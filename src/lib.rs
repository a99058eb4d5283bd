//! SafeDrive Core - Trip telemetry aggregation and safety-scoring engine
//!
//! This crate turns a stream of noisy, possibly out-of-order speed and
//! location samples for in-progress trips into continuously updated trip
//! statistics, safety-violation detections, a bounded safety score, alert
//! events, and a consistent export snapshot. The implementation
//! prioritizes:
//!
//! 1. **Isolation** - a bad sample affects only itself; validation runs
//!    strictly before any aggregate mutation
//! 2. **Logging** - every decision point logged with trip context
//! 3. **Concurrency** - per-trip exclusive sections, independent trips in
//!    parallel
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `pipeline` - Main engine orchestrator (start/ingest/end/export)
//! - `validation` - Sample value and temporal-ordering checks
//! - `trips` - Lifecycle state machine, running aggregate, trip arena
//! - `scoring` - Violation classification and safety-score derivation
//! - `alerts` - Alert emission with de-duplication
//! - `export` - Export snapshot assembly
//! - `storage` - Store-facing models and the external store seam
//! - `logging` - Structured logging with trip context
//!
//! Persistent storage, authentication, transports, and rendering are
//! external collaborators reached only through the [`TripStore`] and
//! [`Clock`] traits.

pub mod alerts;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod scoring;
pub mod storage;
pub mod trips;
pub mod validation;

pub use clock::{Clock, SystemClock};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use pipeline::engine::{TelemetryEngine, TripHandle};
pub use scoring::violations::ViolationKind;
pub use storage::memory::MemoryStore;
pub use storage::models::{
    AlertRecord, ExportRecord, InsuranceRecord, Sample, TripRecord, UserProfile, VehicleRecord,
};
pub use storage::store::TripStore;
pub use trips::aggregate::TripAggregate;
pub use trips::state::TripState;

/// Initialize the module-level logger.
///
/// Safe to call more than once; only the first call takes effect.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .try_init();
}
