//! Time source used by the id generators.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// A source of wall-clock time.
///
/// Generators never call `Utc::now()` directly so that tests can drive
/// time explicitly.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Blocks the calling thread for `duration`.
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock with microsecond resolution.
///
/// `sleep` advances the clock instead of blocking. With a non-zero
/// auto-advance step every `now()` call moves time forward by that step
/// after reading it.
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: AtomicI64,
    step_micros: AtomicI64,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            micros: AtomicI64::new(start.timestamp_micros()),
            step_micros: AtomicI64::new(0),
        }
    }

    /// Moves the clock to `at`, which may be in the past.
    pub fn set(&self, at: DateTime<Utc>) {
        self.micros.store(at.timestamp_micros(), Ordering::SeqCst);
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.micros
            .fetch_add(duration_micros(duration), Ordering::SeqCst);
    }

    /// Makes every subsequent `now()` advance the clock by `step`.
    pub fn auto_advance(&self, step: Duration) {
        self.step_micros
            .store(duration_micros(step), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let step = self.step_micros.load(Ordering::SeqCst);
        let micros = self.micros.fetch_add(step, Ordering::SeqCst);
        from_micros(micros)
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

fn duration_micros(duration: Duration) -> i64 {
    i64::try_from(duration.as_micros()).unwrap_or(i64::MAX)
}

fn from_micros(micros: i64) -> DateTime<Utc> {
    let secs = micros.div_euclid(1_000_000);
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    DateTime::from_timestamp(secs, nanos).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_is_frozen_until_advanced() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_micros(3));
        assert_eq!(clock.now().timestamp_micros(), start.timestamp_micros() + 3);
    }

    #[test]
    fn manual_clock_sleep_advances() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.sleep(Duration::from_secs(1));
        assert_eq!(clock.now().timestamp(), start.timestamp() + 1);
    }

    #[test]
    fn manual_clock_auto_advance() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.auto_advance(Duration::from_micros(10));
        let a = clock.now();
        let b = clock.now();
        assert_eq!(b.timestamp_micros() - a.timestamp_micros(), 10);
    }

    #[test]
    fn negative_micros_round_trip() {
        let before_epoch = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap();
        let clock = ManualClock::new(before_epoch);
        assert_eq!(clock.now(), before_epoch);
    }
}
