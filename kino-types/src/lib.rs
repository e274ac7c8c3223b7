//! Core type definitions for the Kino content tools.
//!
//! This crate defines the identifier types shared by every stage of the
//! content pipeline:
//! - Content identifiers (`ContentId`, 64-bit, time-ordered)
//! - Part identifiers (`PartId`, legacy 32-bit, seconds based)
//! - The `Clock` abstraction both generators read time through
//!
//! Identifiers are allocated when an entry or part is first created and
//! persisted with it; nothing in the build itself allocates ids.

mod clock;
mod generator;
mod ids;
mod legacy;

pub use clock::{Clock, ManualClock, SystemClock};
pub use generator::{UniqueIdGenerator, next_unique_id};
pub use ids::{ContentId, PartId};
pub use legacy::{LEGACY_EPOCH, LegacyIdGenerator};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
