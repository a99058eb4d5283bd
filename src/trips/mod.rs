//! Trip lifecycle and running statistics.
//!
//! - Explicit Pending/Active/Ended state machine
//! - Incremental per-sample aggregate updates
//! - Arena of trip records with per-trip exclusive sections

pub mod aggregate;
pub mod registry;
pub mod state;
