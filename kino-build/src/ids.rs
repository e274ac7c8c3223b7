//! Id assignment for entries and parts.
//!
//! Assignment is an explicit step run before validation; validating an
//! entry never changes it.

use std::collections::HashSet;
use std::sync::Arc;

use kino_types::{ContentId, LegacyIdGenerator, UniqueIdGenerator, next_unique_id};
use tracing::debug;

use crate::entry::{Entry, EntryKind};
use crate::error::ValidationError;
use crate::kinds::Part;

/// Sources for both id families.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    unique: Option<Arc<UniqueIdGenerator>>,
    legacy: LegacyIdGenerator,
}

impl IdAllocator {
    /// Content ids from the process-wide generator, part ids from the
    /// system clock.
    pub fn system() -> Self {
        Self::default()
    }

    pub fn new(unique: Arc<UniqueIdGenerator>, legacy: LegacyIdGenerator) -> Self {
        Self {
            unique: Some(unique),
            legacy,
        }
    }

    pub fn next_content_id(&self) -> ContentId {
        match &self.unique {
            Some(generator) => generator.next_id(),
            None => next_unique_id(),
        }
    }

    pub fn legacy(&self) -> &LegacyIdGenerator {
        &self.legacy
    }
}

/// Which ids get regenerated even though they are already set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdPolicy {
    pub force_entries: bool,
    pub force_parts: bool,
}

/// Gives every entry without an id (or every entry, when forced) a new
/// content id, and every part of every parts pack its part id.
pub fn assign_ids(entries: Vec<Entry>, ids: &IdAllocator, policy: IdPolicy) -> Vec<Entry> {
    entries
        .into_iter()
        .map(|mut entry| {
            if policy.force_entries || !entry.id.is_assigned() {
                entry.id = ids.next_content_id();
                debug!(entry = %entry.name, id = %entry.id, "Content id assigned");
            }

            if let EntryKind::PartsPack(pack) = &mut entry.kind {
                if let Some(parts) = pack.parts.take() {
                    pack.parts = Some(assign_part_ids(parts, ids.legacy(), policy.force_parts));
                }
            }

            entry
        })
        .collect()
}

/// Assigns part ids within one pack.
///
/// A part gets a new id when it has none or `force` is set. A new id that
/// collides with a sibling is regenerated once; if that still collides
/// (both were taken within the same second) the call waits for the next
/// second and takes that id. Uniqueness holds within the pack only.
pub fn assign_part_ids(mut parts: Vec<Part>, legacy: &LegacyIdGenerator, force: bool) -> Vec<Part> {
    for index in 0..parts.len() {
        if !force && parts[index].id.is_assigned() {
            continue;
        }

        parts[index].id = legacy.next_id();

        if collides(&parts, index) {
            parts[index].id = legacy.next_id();

            if collides(&parts, index) {
                debug!(id = %parts[index].id, "Part id collision, waiting for the next second");
                legacy.wait_next_second();
                parts[index].id = legacy.next_id();
            }
        }

        debug!(part = %parts[index].name(), id = %parts[index].id, "Part id assigned");
    }

    parts
}

/// Checks that `entry` went through [`assign_ids`]: its content id is set
/// and every part of a parts pack has its own id.
pub fn check_ids(entry: &Entry) -> Result<(), ValidationError> {
    if !entry.id.is_assigned() {
        return Err(ValidationError::UnassignedId(entry.name.clone()));
    }

    let EntryKind::PartsPack(pack) = &entry.kind else {
        return Ok(());
    };

    let mut seen = HashSet::new();
    for part in pack.parts.iter().flatten() {
        if !part.id.is_assigned() {
            return Err(ValidationError::UnassignedPartId {
                pack: entry.name.clone(),
                part: part.name(),
            });
        }
        if !seen.insert(part.id) {
            return Err(ValidationError::DuplicatePartId {
                pack: entry.name.clone(),
                id: part.id,
            });
        }
    }

    Ok(())
}

fn collides(parts: &[Part], index: usize) -> bool {
    let id = parts[index].id;
    parts
        .iter()
        .enumerate()
        .any(|(i, p)| i != index && p.id == id)
}
