//! Snowflake-style 64-bit content id allocator.
//!
//! An id packs a 41-bit tick (microseconds since 0001-01-01 UTC, the epoch
//! of ids written by earlier tool versions) above a 22-bit sequence:
//!
//! ```text
//! | 0 | tick & 0x1FF_FFFF_FFFF (41 bits) | sequence (22 bits) |
//! ```
//!
//! Within one tick up to 4,194,304 ids can be produced; past that the
//! generator spins until the clock moves forward.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::ids::ContentId;

const SEQUENCE_BITS: u32 = 22;
const SEQUENCE_MASK: u64 = 0x3F_FFFF;
const TICK_MASK: u64 = 0x1FF_FFFF_FFFF;

/// Microseconds between 0001-01-01T00:00:00Z and the Unix epoch.
const TICK_EPOCH_OFFSET_MICROS: i64 = 62_135_596_800_000_000;

#[derive(Debug, Default)]
struct GeneratorState {
    last_tick: u64,
    sequence: u64,
}

/// Thread-safe, monotonic content id allocator.
///
/// Ids returned by one generator are unique and strictly increasing for
/// the lifetime of the process, even when the clock stalls or steps
/// backwards.
pub struct UniqueIdGenerator {
    clock: Arc<dyn Clock>,
    state: Mutex<GeneratorState>,
}

impl UniqueIdGenerator {
    /// Creates a generator reading the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(GeneratorState::default()),
        }
    }

    /// Creates a generator reading the system clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Allocates the next id.
    pub fn next_id(&self) -> ContentId {
        // The state is two plain integers; a panic elsewhere cannot leave it torn.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let tick = self.tick();
        if tick > state.last_tick {
            state.last_tick = tick;
            state.sequence = 0;
        } else {
            state.sequence += 1;
        }

        if state.sequence > SEQUENCE_MASK {
            let mut tick = self.tick();
            while tick <= state.last_tick {
                std::hint::spin_loop();
                tick = self.tick();
            }
            state.last_tick = tick;
            state.sequence = 0;
        }

        ContentId::new(compose(state.last_tick, state.sequence))
    }

    fn tick(&self) -> u64 {
        tick_of(self.clock.now())
    }

    #[cfg(test)]
    fn seed(&self, last_tick: u64, sequence: u64) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.last_tick = last_tick;
        state.sequence = sequence;
    }
}

impl std::fmt::Debug for UniqueIdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("UniqueIdGenerator")
            .field("last_tick", &state.last_tick)
            .field("sequence", &state.sequence)
            .finish()
    }
}

/// Allocates an id from the process-wide generator.
///
/// The generator is created on first use and reads the system clock.
pub fn next_unique_id() -> ContentId {
    static GLOBAL: OnceLock<UniqueIdGenerator> = OnceLock::new();
    GLOBAL.get_or_init(UniqueIdGenerator::system).next_id()
}

fn tick_of(at: DateTime<Utc>) -> u64 {
    let micros = at.timestamp_micros().saturating_add(TICK_EPOCH_OFFSET_MICROS);
    u64::try_from(micros).unwrap_or(0)
}

const fn compose(tick: u64, sequence: u64) -> u64 {
    ((tick & TICK_MASK) << SEQUENCE_BITS) | (sequence & SEQUENCE_MASK)
}
