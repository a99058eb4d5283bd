//! Export snapshot assembly.

pub mod assembler;
