//! Test clock: pins event timestamps.

use chrono::{DateTime, Utc};
use simple_storage_core::clock::Clock;

/// A clock frozen at one instant, so `occurred_at` can be asserted exactly.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
