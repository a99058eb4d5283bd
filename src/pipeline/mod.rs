//! Engine orchestration.

pub mod engine;
