use std::path::Path;

use kino_build::{
    Author, CustomObject, CustomObjectsPack, Entry, EntryKind, EntryValidator, Garage, Map,
    PackType, Part, PartType, PartsPack, SceneError, SceneInspector, ValidationError,
};

struct NoCameras;

impl SceneInspector for NoCameras {
    fn find_camera(&self, _scene: &Path) -> Result<Option<String>, SceneError> {
        Ok(None)
    }
}

fn author() -> Author {
    Author {
        name: "someone".into(),
        steam_id: 76_561_198_000_000_001,
        discord_id: 42,
    }
}

fn wheels_pack(part_type: PartType) -> Entry {
    let pack = PartsPack {
        pack_type: PackType::Wheels,
        parts: Some(vec![Part::new(
            part_type,
            "Content/CarParts/street/steering.prefab",
        )]),
        ..PartsPack::default()
    };
    Entry::new("street", EntryKind::PartsPack(pack))
}

// ── Names ────────────────────────────────────────────────────────

#[test]
fn allowed_names_pass() {
    for name in ["wheels", "Wheels_02", "street-pack", "A", "0_-_0"] {
        assert!(EntryValidator::validate_name(name).is_ok(), "{name}");
    }
}

#[test]
fn disallowed_names_fail() {
    for name in ["street wheels", "pack.v2", "a/b", "ümlaut", "tab\t"] {
        let err = EntryValidator::validate_name(name).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidName(n) if n == name));
    }
    assert!(matches!(
        EntryValidator::validate_name(""),
        Err(ValidationError::EmptyName)
    ));
}

#[test]
fn entry_name_checked_first() {
    let mut entry = wheels_pack(PartType::SteeringWheel);
    entry.name = "street wheels".into();
    let err = EntryValidator::new(&NoCameras).validate(&entry, &author()).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidName(_)));
}

// ── Parts packs ──────────────────────────────────────────────────

#[test]
fn steering_wheel_in_wheels_pack_is_type_mismatch() {
    let err = EntryValidator::new(&NoCameras)
        .validate(&wheels_pack(PartType::SteeringWheel), &author())
        .unwrap_err();
    assert!(matches!(
        err,
        ValidationError::TypeMismatch {
            pack_type: PackType::Wheels,
            part_type: PartType::SteeringWheel,
            ..
        }
    ));
}

#[test]
fn same_pack_passes_with_wheel_part() {
    let resolved = EntryValidator::new(&NoCameras)
        .validate(&wheels_pack(PartType::Wheel), &author())
        .unwrap();
    assert_eq!(resolved.sources.len(), 1);
}

#[test]
fn part_without_source_is_rejected() {
    let pack = PartsPack {
        parts: Some(vec![Part {
            part_type: PartType::Wheel,
            ..Part::default()
        }]),
        ..PartsPack::default()
    };
    let entry = Entry::new("street", EntryKind::PartsPack(pack));
    let err = EntryValidator::new(&NoCameras).validate_entry(&entry).unwrap_err();
    assert!(matches!(err, ValidationError::MissingSourceAsset { .. }));
}

#[test]
fn empty_parts_pack_is_nothing_to_build() {
    for parts in [None, Some(vec![])] {
        let entry = Entry::new(
            "street",
            EntryKind::PartsPack(PartsPack {
                parts,
                ..PartsPack::default()
            }),
        );
        let err = EntryValidator::new(&NoCameras).validate_entry(&entry).unwrap_err();
        assert!(err.is_nothing_to_build());
    }
}

#[test]
fn icons_are_resolved_with_sources() {
    let pack = PartsPack {
        pack_type: PackType::InteriorParts,
        pack_icon: Some("Content/CarParts/cabin/icon.png".into()),
        parts: Some(vec![Part {
            icon: Some("Content/CarParts/cabin/seat.png".into()),
            ..Part::new(PartType::Seat, "Content/CarParts/cabin/seat.prefab")
        }]),
        ..PartsPack::default()
    };
    let entry = Entry::new("cabin", EntryKind::PartsPack(pack));
    let resolved = EntryValidator::new(&NoCameras).validate_entry(&entry).unwrap();
    assert_eq!(resolved.icons.len(), 2);
    assert_eq!(resolved.bundle_assets().len(), 3);
}

// ── Scenes ───────────────────────────────────────────────────────

#[test]
fn map_requires_scene_then_load_screen() {
    let validator = EntryValidator::new(&NoCameras);

    let entry = Entry::new("canyon", EntryKind::Map(Map::default()));
    let err = validator.validate_entry(&entry).unwrap_err();
    assert!(matches!(err, ValidationError::MissingReference { reference: "map scene", .. }));

    let entry = Entry::new(
        "canyon",
        EntryKind::Map(Map {
            scene: Some("Content/Maps/canyon.unity".into()),
            load_screen: Some("  ".into()),
        }),
    );
    let err = validator.validate_entry(&entry).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::MissingReference { reference: "map loadscreen", .. }
    ));
}

#[test]
fn garage_requires_scene() {
    let entry = Entry::new("pit", EntryKind::Garage(Garage::default()));
    let err = EntryValidator::new(&NoCameras).validate_entry(&entry).unwrap_err();
    assert!(matches!(err, ValidationError::MissingReference { reference: "garage scene", .. }));
}

#[test]
fn unreadable_garage_scene_is_reported() {
    struct Broken;
    impl SceneInspector for Broken {
        fn find_camera(&self, scene: &Path) -> Result<Option<String>, SceneError> {
            Err(SceneError::Unsupported(scene.to_path_buf()))
        }
    }

    let entry = Entry::new(
        "pit",
        EntryKind::Garage(Garage {
            scene: Some("Content/Garage/pit.unity".into()),
        }),
    );
    let err = EntryValidator::new(&Broken).validate_entry(&entry).unwrap_err();
    assert!(matches!(err, ValidationError::SceneInspection { .. }));
}

// ── Collections ──────────────────────────────────────────────────

#[test]
fn nothing_selected_is_nothing_to_build() {
    let mut entry = wheels_pack(PartType::Wheel);
    entry.selected_to_build = false;
    let err = EntryValidator::new(&NoCameras)
        .validate_all(&author(), &[entry])
        .unwrap_err();
    assert!(matches!(err, ValidationError::NothingToBuild));
}

#[test]
fn validate_all_stops_at_first_failure() {
    let objects = Entry::new(
        "props",
        EntryKind::CustomObjects(CustomObjectsPack {
            objects: Some(vec![CustomObject::new("Content/props/cone.prefab")]),
            ..CustomObjectsPack::default()
        }),
    );
    let entries = vec![objects, wheels_pack(PartType::Spoiler), wheels_pack(PartType::Wheel)];

    let err = EntryValidator::new(&NoCameras)
        .validate_all(&author(), &entries)
        .unwrap_err();
    assert!(matches!(err, ValidationError::TypeMismatch { .. }));
}

#[test]
fn invalid_author_fails_before_entries() {
    let author = Author {
        steam_id: 123,
        ..author()
    };
    let err = EntryValidator::new(&NoCameras)
        .validate_all(&author, &[wheels_pack(PartType::Wheel)])
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidSteamId(123)));
}
