//! Structured logging with trip context.

pub mod structured;
