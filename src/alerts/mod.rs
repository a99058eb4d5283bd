//! Alert emission.

pub mod emitter;
