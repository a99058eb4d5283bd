//! Sample validation.
//!
//! Rejects malformed or temporally inconsistent samples before they can
//! touch an aggregate.

pub mod sample;
