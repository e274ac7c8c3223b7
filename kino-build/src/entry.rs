//! Buildable entries.

use std::path::PathBuf;

use kino_types::ContentId;
use serde::{Deserialize, Serialize};

use crate::kinds::{ContentKind, CustomObjectsPack, Garage, KindStrategy, Map, PartsPack};

fn default_selected() -> bool {
    true
}

fn default_version() -> i32 {
    100
}

/// A buildable content unit.
///
/// Common fields live here; everything kind-specific lives in
/// [`EntryKind`]. Asset references are project-relative paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Allocated once, persisted, never regenerated unless forced.
    #[serde(default)]
    pub id: ContentId,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: i32,
    #[serde(default = "default_selected")]
    pub selected_to_build: bool,
    #[serde(flatten)]
    pub kind: EntryKind,
    /// Project-relative folder the entry lives in. Sidecar metadata is
    /// written here.
    #[serde(skip)]
    pub root: PathBuf,
}

/// Kind-specific entry data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    PartsPack(PartsPack),
    CustomObjects(CustomObjectsPack),
    Garage(Garage),
    Map(Map),
}

impl Entry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            id: ContentId::UNASSIGNED,
            name: name.into(),
            version: default_version(),
            selected_to_build: true,
            kind,
            root: PathBuf::new(),
        }
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// The kind-specific rules for this entry.
    pub fn strategy(&self) -> &dyn KindStrategy {
        match &self.kind {
            EntryKind::PartsPack(pack) => pack,
            EntryKind::CustomObjects(pack) => pack,
            EntryKind::Garage(garage) => garage,
            EntryKind::Map(map) => map,
        }
    }

    pub fn content_kind(&self) -> ContentKind {
        self.strategy().content_kind()
    }
}
