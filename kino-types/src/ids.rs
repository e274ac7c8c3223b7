//! Identifier types used throughout the content pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Unique identifier of a buildable entry (parts pack, garage, map, objects pack).
///
/// Allocated once by [`crate::UniqueIdGenerator`] and never regenerated
/// unless explicitly forced. Zero means "not yet assigned".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(u64);

impl ContentId {
    /// The unassigned id.
    pub const UNASSIGNED: Self = Self(0);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns true if this id has been allocated.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| Error::InvalidId(format!("{s:?}: {e}")))
    }
}

impl From<u64> for ContentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Identifier of a part inside a parts pack.
///
/// Only unique within the owning pack. Zero means "not yet assigned".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(i32);

impl PartId {
    /// The unassigned id.
    pub const UNASSIGNED: Self = Self(0);

    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PartId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|e| Error::InvalidId(format!("{s:?}: {e}")))
    }
}

impl From<i32> for PartId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}
