//! Coarse 32-bit part id source.
//!
//! Part ids are the number of whole seconds elapsed since
//! [`LEGACY_EPOCH`]. Two ids taken within the same second collide; the
//! caller resolves collisions within its pack (see `kino-build`).

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use crate::clock::{Clock, SystemClock};
use crate::ids::PartId;

/// Epoch of legacy part ids: 2023-01-01T00:00:00Z.
pub const LEGACY_EPOCH: i64 = 1_672_531_200;

/// Non-unique, seconds-resolution part id source.
#[derive(Clone)]
pub struct LegacyIdGenerator {
    clock: Arc<dyn Clock>,
}

impl LegacyIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Returns the id for the current second.
    pub fn next_id(&self) -> PartId {
        PartId::new(seconds_since_epoch(self.clock.now()))
    }

    /// Blocks until the next id differs from the current one.
    pub fn wait_next_second(&self) {
        self.clock.sleep(Duration::from_secs(1));
    }
}

impl Default for LegacyIdGenerator {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for LegacyIdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyIdGenerator").finish_non_exhaustive()
    }
}

fn seconds_since_epoch(at: DateTime<Utc>) -> i32 {
    let epoch = Utc.timestamp_opt(LEGACY_EPOCH, 0).single().unwrap_or_default();
    // Wraps like the 32-bit cast of earlier tool versions.
    at.signed_duration_since(epoch).num_seconds() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn epoch_is_zero() {
        let epoch = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(seconds_since_epoch(epoch), 0);
    }

    #[test]
    fn same_second_collides() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let generator = LegacyIdGenerator::new(clock.clone());
        assert_eq!(generator.next_id(), generator.next_id());

        clock.advance(Duration::from_millis(999));
        assert_eq!(generator.next_id().get(), 31_536_000);
    }

    #[test]
    fn wait_next_second_changes_id() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let generator = LegacyIdGenerator::new(clock);
        let first = generator.next_id();
        generator.wait_next_second();
        assert_eq!(generator.next_id().get(), first.get() + 1);
    }
}
