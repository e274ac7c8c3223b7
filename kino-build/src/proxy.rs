//! Proxy metadata: the flat, serializable projection of an entry.
//!
//! Packs ship it as a pretty-printed JSON sidecar compiled into their
//! bundle; garages embed it as compact JSON in the container header. Keys
//! are PascalCase because the game reads them by those names. The
//! author's platform ids are never part of it.

use std::fs;
use std::path::{Path, PathBuf};

use kino_types::{ContentId, PartId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::author::Author;
use crate::entry::Entry;
use crate::error::{BuildError, BuildResult};

/// Reserved file name of the sidecar inside a pack folder.
pub const SIDECAR_FILE_NAME: &str = "__pack_meta.txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProxyMetadata {
    /// Container magic of the entry's layout, if it has a byte magic.
    #[serde(skip)]
    pub magic: Option<[u8; 4]>,
    pub id: ContentId,
    /// Pack category (part type or objects type).
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<i32>,
    pub author_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_icon: Option<String>,
    pub version: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<PartProxy>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objects: Option<Vec<ObjectProxy>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartProxy {
    #[serde(rename = "Type")]
    pub part_type: i32,
    pub id: PartId,
    pub replacement_id: i32,
    pub file_path: String,
    pub icon_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectProxy {
    pub file_path: String,
}

impl ProxyMetadata {
    /// The fields every kind shares.
    pub fn new(entry: &Entry, author: &Author) -> Self {
        Self {
            magic: None,
            id: entry.id,
            kind: None,
            author_name: author.name.clone(),
            name: entry.name.clone(),
            category_name: None,
            description: None,
            pack_icon: None,
            version: entry.version,
            scene_path: None,
            parts: None,
            objects: None,
        }
    }

    /// Number of sub-items that survived filtering.
    pub fn item_count(&self) -> usize {
        self.parts.as_ref().map_or(0, Vec::len) + self.objects.as_ref().map_or(0, Vec::len)
    }
}

/// Projects `entry` into its proxy metadata.
///
/// Returns `None` when the entry's sub-item collection was never created,
/// as opposed to a collection that is empty after filtering.
pub fn build_proxy(entry: &Entry, author: &Author) -> Option<ProxyMetadata> {
    entry.strategy().proxy(entry, author)
}

/// Like [`build_proxy`], with the missing case as an error.
pub fn require_proxy(entry: &Entry, author: &Author) -> BuildResult<ProxyMetadata> {
    build_proxy(entry, author).ok_or_else(|| BuildError::Metadata(entry.name.clone()))
}

/// Writes `proxy` as pretty JSON to `folder`/[`SIDECAR_FILE_NAME`].
pub fn write_sidecar(folder: &Path, proxy: &ProxyMetadata) -> BuildResult<PathBuf> {
    let json = serde_json::to_string_pretty(proxy)?;
    let path = folder.join(SIDECAR_FILE_NAME);
    fs::write(&path, json).map_err(BuildError::io(&path))?;
    debug!(path = %path.display(), "Sidecar metadata written");
    Ok(path)
}
