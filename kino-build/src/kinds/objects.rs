//! Custom objects packs.

use std::fs;
use std::path::{Path, PathBuf};

use kino_pack::{ContainerHeader, PackHeader};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{
    ContentKind, HeaderContext, KindStrategy, ResolvedAssets, asset_name, asset_path_string,
    resolved,
};
use crate::author::Author;
use crate::entry::Entry;
use crate::error::{BuildError, BuildResult, ValidationError};
use crate::proxy::{ObjectProxy, ProxyMetadata};
use crate::scene::SceneInspector;

const PREFAB_EXTENSION: &str = "prefab";

/// Optional category of an objects pack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum ObjectsType {
    #[default]
    Undefined = 0,
    MapObjects = 1,
    CarExterior = 2,
    CarInterior = 3,
    Misc = 4,
}

/// One prefab of an objects pack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_asset: Option<PathBuf>,
}

impl CustomObject {
    pub fn new(source_asset: impl Into<PathBuf>) -> Self {
        Self {
            source_asset: Some(source_asset.into()),
        }
    }

    pub fn name(&self) -> String {
        asset_name(self.source_asset.as_deref())
    }
}

/// A pack of arbitrary prefabs placed by players.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomObjectsPack {
    #[serde(default)]
    pub objects_type: ObjectsType,
    #[serde(default)]
    pub description: String,
    /// `None` until the object list has been created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objects: Option<Vec<CustomObject>>,
}

impl KindStrategy for CustomObjectsPack {
    fn content_kind(&self) -> ContentKind {
        ContentKind::CustomObjects
    }

    fn validate_extra(
        &self,
        entry: &Entry,
        _scenes: &dyn SceneInspector,
    ) -> Result<(), ValidationError> {
        let Some(objects) = &self.objects else {
            return Err(ValidationError::EmptyPack(entry.name.clone()));
        };

        let unset = objects
            .iter()
            .filter(|o| resolved(&o.source_asset).is_none())
            .count();
        if unset != 0 {
            warn!(pack = %entry.name, "Skipping {} empty entries", unset);
        }

        if unset == objects.len() {
            warn!(pack = %entry.name, "No custom objects added");
            return Err(ValidationError::EmptyPack(entry.name.clone()));
        }

        Ok(())
    }

    fn resolve_assets(&self, _entry: &Entry) -> ResolvedAssets {
        ResolvedAssets {
            sources: self
                .objects
                .as_deref()
                .unwrap_or_default()
                .iter()
                .filter_map(|o| resolved(&o.source_asset))
                .map(Into::into)
                .collect(),
            ..ResolvedAssets::default()
        }
    }

    fn proxy(&self, entry: &Entry, author: &Author) -> Option<ProxyMetadata> {
        let objects = self.objects.as_ref()?;

        let mut proxy = ProxyMetadata::new(entry, author);
        proxy.magic = Some(kino_pack::PACK_MAGIC);
        proxy.kind = Some(self.objects_type as i32);
        proxy.description = Some(self.description.clone());
        proxy.objects = Some(
            objects
                .iter()
                .filter_map(|o| resolved(&o.source_asset))
                .map(|p| ObjectProxy {
                    file_path: asset_path_string(p),
                })
                .collect(),
        );
        Some(proxy)
    }

    fn container_header(&self, ctx: &HeaderContext<'_>) -> BuildResult<ContainerHeader> {
        Ok(ContainerHeader::Pack(PackHeader {
            tool_format_version: ctx.meta.format_version,
            content_version: ctx.entry.version,
            kind: self.objects_type as i32,
            content_id: ctx.entry.id.get(),
            author_steam_id: ctx.author.steam_id,
            author_discord_id: ctx.author.discord_id,
        }))
    }
}

/// Adds every top-level `*.prefab` in the pack folder that the pack does
/// not list yet, matched by prefab name. Returns how many were added.
///
/// `entry_root` is project-relative; new object paths are too.
pub fn refresh_objects(
    pack: &mut CustomObjectsPack,
    project_root: &Path,
    entry_root: &Path,
) -> BuildResult<usize> {
    let folder = project_root.join(entry_root);
    let mut prefabs: Vec<PathBuf> = fs::read_dir(&folder)
        .map_err(BuildError::io(&folder))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == PREFAB_EXTENSION))
        .collect();
    prefabs.sort();

    info!(path = %folder.display(), "Found {} prefabs, processing", prefabs.len());

    let objects = pack.objects.get_or_insert_with(Vec::new);
    let mut added = 0;
    for prefab in prefabs {
        let Some(file_name) = prefab.file_name() else {
            continue;
        };
        let object = CustomObject::new(entry_root.join(file_name));
        let name = object.name();

        if objects.iter().any(|o| o.name() == name) {
            continue;
        }

        info!(prefab = %name, "Added new prefab");
        objects.push(object);
        added += 1;
    }

    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::tests::NoCameras;

    fn entry(pack: CustomObjectsPack) -> Entry {
        Entry::new("props", crate::entry::EntryKind::CustomObjects(pack))
    }

    #[test]
    fn unmaterialized_objects_fail_validation() {
        let pack = CustomObjectsPack::default();
        let err = pack.validate_extra(&entry(pack.clone()), &NoCameras).unwrap_err();
        assert!(err.is_nothing_to_build());
    }

    #[test]
    fn all_unset_objects_is_nothing_to_build() {
        let pack = CustomObjectsPack {
            objects: Some(vec![CustomObject::default(), CustomObject::default()]),
            ..CustomObjectsPack::default()
        };
        let err = pack.validate_extra(&entry(pack.clone()), &NoCameras).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyPack(name) if name == "props"));
    }

    #[test]
    fn unset_objects_are_skipped() {
        let pack = CustomObjectsPack {
            objects: Some(vec![
                CustomObject::default(),
                CustomObject::new("Content/CustomObjects/props/cone.prefab"),
            ]),
            ..CustomObjectsPack::default()
        };
        let e = entry(pack.clone());
        assert!(pack.validate_extra(&e, &NoCameras).is_ok());
        assert_eq!(pack.resolve_assets(&e).sources.len(), 1);
    }

    #[test]
    fn refresh_adds_only_new_prefabs() {
        let dir = tempfile::tempdir().unwrap();
        let root = Path::new("Content/CustomObjects/props");
        let folder = dir.path().join(root);
        fs::create_dir_all(&folder).unwrap();
        for name in ["cone.prefab", "barrier.prefab", "notes.txt"] {
            fs::write(folder.join(name), b"").unwrap();
        }

        let mut pack = CustomObjectsPack {
            objects: Some(vec![CustomObject::new(root.join("cone.prefab"))]),
            ..CustomObjectsPack::default()
        };

        let added = refresh_objects(&mut pack, dir.path(), root).unwrap();
        assert_eq!(added, 1);

        let objects = pack.objects.unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1].source_asset.as_deref(), Some(root.join("barrier.prefab").as_path()));
    }
}
