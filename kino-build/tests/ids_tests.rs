use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use kino_build::{
    Author, Entry, EntryKind, EntryValidator, IdAllocator, IdPolicy, PackType, Part, PartType,
    PartsPack, SceneError, SceneInspector, assign_ids, assign_part_ids,
};
use kino_types::{LegacyIdGenerator, ManualClock, PartId, UniqueIdGenerator};

struct NoCameras;

impl SceneInspector for NoCameras {
    fn find_camera(&self, _scene: &Path) -> Result<Option<String>, SceneError> {
        Ok(None)
    }
}

fn frozen_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
    ))
}

fn wheels(parts: Vec<Part>) -> Entry {
    Entry::new(
        "street",
        EntryKind::PartsPack(PartsPack {
            pack_type: PackType::Wheels,
            parts: Some(parts),
            ..PartsPack::default()
        }),
    )
}

fn part_ids(entry: &Entry) -> Vec<PartId> {
    let EntryKind::PartsPack(pack) = &entry.kind else {
        panic!("not a parts pack");
    };
    pack.parts.iter().flatten().map(|p| p.id).collect()
}

// ── Part ids ─────────────────────────────────────────────────────

#[test]
fn two_new_parts_in_same_second_get_distinct_ids() {
    let clock = frozen_clock();
    let ids = IdAllocator::new(
        Arc::new(UniqueIdGenerator::new(clock.clone())),
        LegacyIdGenerator::new(clock),
    );
    let entry = wheels(vec![
        Part::new(PartType::Wheel, "Content/CarParts/street/a.prefab"),
        Part::new(PartType::Wheel, "Content/CarParts/street/b.prefab"),
    ]);

    let entries = assign_ids(vec![entry], &ids, IdPolicy::default());
    let assigned = part_ids(&entries[0]);

    assert_eq!(assigned.len(), 2);
    assert!(assigned.iter().all(|id| id.is_assigned()));
    assert_ne!(assigned[0], assigned[1]);

    let author = Author {
        name: "someone".into(),
        steam_id: 76_561_198_000_000_001,
        discord_id: 42,
    };
    assert!(EntryValidator::new(&NoCameras).validate(&entries[0], &author).is_ok());
}

#[test]
fn collision_with_existing_part_is_resolved() {
    let clock = frozen_clock();
    let legacy = LegacyIdGenerator::new(clock);
    let current = legacy.next_id();

    let mut existing = Part::new(PartType::Wheel, "a.prefab");
    existing.id = current;
    let parts = vec![existing, Part::new(PartType::Wheel, "b.prefab")];

    let parts = assign_part_ids(parts, &legacy, false);
    assert_eq!(parts[0].id, current);
    assert_eq!(parts[1].id.get(), current.get() + 1);
}

#[test]
fn collision_backoff_waits_one_second() {
    let clock = frozen_clock();
    let legacy = LegacyIdGenerator::new(clock.clone());
    let before = clock_seconds(&legacy);

    let parts = (0..4)
        .map(|i| Part::new(PartType::Wheel, format!("{i}.prefab")))
        .collect();
    let parts = assign_part_ids(parts, &legacy, false);

    let unique: HashSet<PartId> = parts.iter().map(|p| p.id).collect();
    assert_eq!(unique.len(), 4);
    assert_eq!(clock_seconds(&legacy) - before, 3);
}

fn clock_seconds(legacy: &LegacyIdGenerator) -> i32 {
    legacy.next_id().get()
}

#[test]
fn forced_parts_are_renumbered() {
    let clock = frozen_clock();
    let ids = IdAllocator::new(
        Arc::new(UniqueIdGenerator::new(clock.clone())),
        LegacyIdGenerator::new(clock),
    );
    let mut part = Part::new(PartType::Wheel, "a.prefab");
    part.id = PartId::new(5);

    let kept = assign_ids(vec![wheels(vec![part])], &ids, IdPolicy::default());
    assert_eq!(part_ids(&kept[0]), vec![PartId::new(5)]);

    let forced = assign_ids(
        kept,
        &ids,
        IdPolicy {
            force_entries: false,
            force_parts: true,
        },
    );
    assert_ne!(part_ids(&forced[0]), vec![PartId::new(5)]);
}

// ── Content ids ──────────────────────────────────────────────────

#[test]
fn entries_get_unique_content_ids() {
    let clock = frozen_clock();
    let ids = IdAllocator::new(
        Arc::new(UniqueIdGenerator::new(clock.clone())),
        LegacyIdGenerator::new(clock),
    );
    let entries = (0..50)
        .map(|i| Entry::new(format!("map_{i}"), EntryKind::Map(Default::default())))
        .collect();

    let entries = assign_ids(entries, &ids, IdPolicy::default());
    let unique: HashSet<u64> = entries.iter().map(|e| e.id.get()).collect();
    assert_eq!(unique.len(), 50);
    assert!(entries.windows(2).all(|w| w[0].id < w[1].id));
}
