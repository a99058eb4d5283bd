//! Violation classification and safety scoring.

pub mod safety;
pub mod violations;
