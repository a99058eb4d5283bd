//! Store-facing models and the external store seam.
//!
//! The core never persists anything itself: trips, samples, alerts, and
//! exports cross this boundary as typed records, and profile/vehicle/
//! insurance context comes back through it.

pub mod memory;
pub mod models;
pub mod store;
