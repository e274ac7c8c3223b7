//! Per-kind rules.
//!
//! Every content kind plugs into the same validator and orchestrator
//! through [`KindStrategy`]: the extra validation it needs, the assets
//! it hands to the compiler, its proxy metadata and its container header.

mod garage;
mod map;
mod objects;
mod parts;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use kino_pack::ContainerHeader;
use serde::{Deserialize, Serialize};

use crate::author::Author;
use crate::entry::Entry;
use crate::error::{BuildResult, ValidationError};
use crate::meta::BuildMeta;
use crate::proxy::ProxyMetadata;
use crate::scene::SceneInspector;

pub use garage::Garage;
pub use map::Map;
pub use objects::{CustomObject, CustomObjectsPack, ObjectsType, refresh_objects};
pub use parts::{PackType, Part, PartClass, PartType, PartsPack};

/// The four kinds of buildable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    PartsPack,
    CustomObjects,
    Garage,
    Map,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::PartsPack,
        ContentKind::CustomObjects,
        ContentKind::Garage,
        ContentKind::Map,
    ];

    /// Output file extension, including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ContentKind::PartsPack => ".knpp",
            ContentKind::CustomObjects => ".knco",
            ContentKind::Garage => ".kngarage",
            ContentKind::Map => ".knmap",
        }
    }

    /// Folder the asset compiler stages bundles in.
    pub fn default_staging_folder(self) -> &'static str {
        match self {
            ContentKind::PartsPack => "Build/CarParts",
            ContentKind::CustomObjects => "Build/CustomObjects",
            ContentKind::Garage => "Build/Garage",
            ContentKind::Map => "Build/Maps",
        }
    }

    /// Packs ship a sidecar metadata file compiled into their bundle.
    pub fn writes_sidecar(self) -> bool {
        matches!(self, ContentKind::PartsPack | ContentKind::CustomObjects)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentKind::PartsPack => "parts pack",
            ContentKind::CustomObjects => "objects pack",
            ContentKind::Garage => "garage",
            ContentKind::Map => "map",
        })
    }
}

/// Project-relative asset paths an entry resolved to during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAssets {
    pub scene: Option<PathBuf>,
    pub load_screen: Option<PathBuf>,
    /// Source assets of sub-items, in declaration order.
    pub sources: Vec<PathBuf>,
    /// Pack and part icons.
    pub icons: Vec<PathBuf>,
}

impl ResolvedAssets {
    /// Every asset the compiler has to pack into the bundle.
    ///
    /// The load screen is not part of the bundle; it is embedded in the
    /// map header instead.
    pub fn bundle_assets(&self) -> BTreeSet<PathBuf> {
        self.scene
            .iter()
            .chain(&self.sources)
            .chain(&self.icons)
            .cloned()
            .collect()
    }
}

/// Inputs available when a kind builds its container header.
pub struct HeaderContext<'a> {
    pub entry: &'a Entry,
    pub author: &'a Author,
    pub meta: &'a BuildMeta,
    pub proxy: &'a ProxyMetadata,
    pub resolved: &'a ResolvedAssets,
    pub project_root: &'a Path,
}

/// Kind-specific behaviour shared by validation and building.
pub trait KindStrategy {
    fn content_kind(&self) -> ContentKind;

    /// Rules beyond the common name/version checks.
    fn validate_extra(
        &self,
        entry: &Entry,
        scenes: &dyn SceneInspector,
    ) -> Result<(), ValidationError>;

    /// Asset paths referenced by the entry. Unset references are left out.
    fn resolve_assets(&self, entry: &Entry) -> ResolvedAssets;

    /// Flat metadata record for the entry, `None` when the kind's
    /// sub-item collection has not been materialized.
    fn proxy(&self, entry: &Entry, author: &Author) -> Option<ProxyMetadata>;

    fn container_header(&self, ctx: &HeaderContext<'_>) -> BuildResult<ContainerHeader>;
}

/// Display name of an asset: its file stem, or `unknown`.
pub(crate) fn asset_name(path: Option<&Path>) -> String {
    path.and_then(Path::file_stem)
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

/// A reference counts as set when it holds a non-blank path.
pub(crate) fn resolved(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref()
        .filter(|p| !p.as_os_str().to_string_lossy().trim().is_empty())
}

/// Asset path as written into metadata: forward slashes on every host.
pub(crate) fn asset_path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
