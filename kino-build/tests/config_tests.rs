use std::fs;
use std::path::{Path, PathBuf};

use kino_build::{
    BuildError, ContentKind, ENTRY_FILE_NAME, EntryKind, PROJECT_FILE_NAME, Project,
    refresh_objects,
};
use kino_pack::WriteMode;
use kino_types::ContentId;
use pretty_assertions::assert_eq;

const PROJECT: &str = r#"
content_dirs = ["Content", "Extra"]

[author]
name = "someone"
steam_id = 76561198000000001
discord_id = 42

[build.parts_pack]
output_folder = "Dist/Parts"
"#;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project() -> (tempfile::TempDir, Project) {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join(PROJECT_FILE_NAME);
    write(&file, PROJECT);

    write(
        &dir.path().join("Content/Maps/canyon").join(ENTRY_FILE_NAME),
        "kind = \"map\"\nname = \"canyon\"\nscene = \"Content/Maps/canyon/canyon.unity\"\n",
    );
    write(
        &dir.path().join("Content/CarParts/street").join(ENTRY_FILE_NAME),
        "kind = \"parts_pack\"\nname = \"street\"\nid = 77\npack_type = \"wheels\"\n",
    );
    write(&dir.path().join("Content/CarParts/street/readme.txt"), "not an entry");

    let project = Project::load(&file).unwrap();
    (dir, project)
}

// ── Project file ─────────────────────────────────────────────────

#[test]
fn project_settings_resolve() {
    let (dir, project) = project();
    assert_eq!(project.root(), dir.path());
    assert_eq!(project.author().name, "someone");
    assert_eq!(project.write_mode(), WriteMode::Truncate);

    let metas = project.build_metas();
    assert_eq!(metas.get(ContentKind::PartsPack).output_folder, PathBuf::from("Dist/Parts"));
    assert_eq!(metas.get(ContentKind::PartsPack).staging_folder, PathBuf::from("Build/CarParts"));
}

#[test]
fn malformed_project_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join(PROJECT_FILE_NAME);
    write(&file, "[author\nname = ");
    assert!(matches!(Project::load(&file), Err(BuildError::Config { path, .. }) if path == file));
}

#[test]
fn missing_project_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Project::load(&dir.path().join(PROJECT_FILE_NAME)).unwrap_err();
    assert!(matches!(err, BuildError::Io { .. }));
}

// ── Entry files ──────────────────────────────────────────────────

#[test]
fn entries_are_discovered_in_path_order() {
    let (_dir, project) = project();
    let entries = project.discover_entries().unwrap();

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["street", "canyon"]);
    assert_eq!(entries[0].root, PathBuf::from("Content/CarParts/street"));
    assert_eq!(entries[0].id, ContentId::new(77));
    assert_eq!(entries[1].content_kind(), ContentKind::Map);
}

#[test]
fn broken_entry_file_names_the_file() {
    let (dir, project) = project();
    let file = dir.path().join("Content/Garage/pit").join(ENTRY_FILE_NAME);
    write(&file, "kind = \"hovercraft\"\nname = \"pit\"\n");

    let err = project.discover_entries().unwrap_err();
    assert!(matches!(err, BuildError::Config { path, .. } if path == file));
}

#[test]
fn saved_entry_reloads_identically() {
    let (dir, project) = project();
    let mut entries = project.discover_entries().unwrap();
    entries[1].id = ContentId::new(9_000_000_001);

    let path = project.save_entry(&entries[1]).unwrap();
    assert_eq!(path, dir.path().join("Content/Maps/canyon").join(ENTRY_FILE_NAME));

    let reloaded = project.load_entry(&path).unwrap();
    assert_eq!(reloaded, entries[1]);
}

#[test]
fn refreshed_objects_persist() {
    let (dir, project) = project();
    let root = Path::new("Content/CustomObjects/props");
    write(
        &dir.path().join(root).join(ENTRY_FILE_NAME),
        "kind = \"custom_objects\"\nname = \"props\"\n",
    );
    write(&dir.path().join(root).join("cone.prefab"), "");

    let mut entry = project
        .discover_entries()
        .unwrap()
        .into_iter()
        .find(|e| e.name == "props")
        .unwrap();
    let EntryKind::CustomObjects(pack) = &mut entry.kind else {
        panic!("wrong kind");
    };
    assert_eq!(refresh_objects(pack, project.root(), root).unwrap(), 1);
    project.save_entry(&entry).unwrap();

    let reloaded = project
        .load_entry(&dir.path().join(root).join(ENTRY_FILE_NAME))
        .unwrap();
    assert_eq!(reloaded, entry);
}
