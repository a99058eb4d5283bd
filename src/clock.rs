//! Time source abstraction.

use chrono::{DateTime, Utc};

/// Source of "now" for end timestamps, alert creation times, and export
/// stamps. The engine never calls `Utc::now()` directly so tests can
/// freeze time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
