//! Per-kind build settings.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BuildError, BuildResult};
use crate::kinds::ContentKind;

/// Tool format version written into every container header.
pub const DEFAULT_FORMAT_VERSION: i32 = 300;

/// Where and how containers of one kind are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMeta {
    pub format_version: i32,
    /// Includes the leading dot.
    pub output_extension: String,
    /// Project-relative folder containers are written to.
    pub output_folder: PathBuf,
    /// Project-relative folder the asset compiler stages bundles in.
    pub staging_folder: PathBuf,
}

/// Optional per-kind overrides from the project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildMetaOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_folder: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_folder: Option<PathBuf>,
}

impl BuildMeta {
    /// Defaults for `kind` with `overrides` applied. An empty output
    /// folder falls back to the staging folder.
    pub fn for_kind(kind: ContentKind, overrides: &BuildMetaOverrides) -> Self {
        let staging_folder = overrides
            .staging_folder
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(kind.default_staging_folder()));
        let output_folder = overrides
            .output_folder
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| staging_folder.clone());
        let mut output_extension = overrides
            .output_extension
            .clone()
            .unwrap_or_else(|| kind.extension().to_string());
        if !output_extension.starts_with('.') {
            output_extension.insert(0, '.');
        }

        Self {
            format_version: overrides.format_version.unwrap_or(DEFAULT_FORMAT_VERSION),
            output_extension,
            output_folder,
            staging_folder,
        }
    }

    /// Creates the output and staging folders under `project_root`.
    pub fn prepare(&self, project_root: &Path) -> BuildResult<()> {
        for folder in [&self.output_folder, &self.staging_folder] {
            let path = project_root.join(folder);
            fs::create_dir_all(&path).map_err(BuildError::io(&path))?;
            debug!(path = %path.display(), "Build folder ready");
        }
        Ok(())
    }

    /// Absolute path of the container for the entry named `name`.
    pub fn output_path(&self, project_root: &Path, name: &str) -> PathBuf {
        project_root
            .join(&self.output_folder)
            .join(format!("{name}{}", self.output_extension))
    }
}

/// Build settings for every kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMetaSet {
    parts_pack: BuildMeta,
    custom_objects: BuildMeta,
    garage: BuildMeta,
    map: BuildMeta,
}

impl BuildMetaSet {
    /// Resolves every kind, taking overrides from `overrides` where present.
    pub fn resolve(overrides: &BTreeMap<ContentKind, BuildMetaOverrides>) -> Self {
        let none = BuildMetaOverrides::default();
        let meta = |kind: ContentKind| {
            BuildMeta::for_kind(kind, overrides.get(&kind).unwrap_or(&none))
        };
        Self {
            parts_pack: meta(ContentKind::PartsPack),
            custom_objects: meta(ContentKind::CustomObjects),
            garage: meta(ContentKind::Garage),
            map: meta(ContentKind::Map),
        }
    }

    pub fn get(&self, kind: ContentKind) -> &BuildMeta {
        match kind {
            ContentKind::PartsPack => &self.parts_pack,
            ContentKind::CustomObjects => &self.custom_objects,
            ContentKind::Garage => &self.garage,
            ContentKind::Map => &self.map,
        }
    }
}

impl Default for BuildMetaSet {
    fn default() -> Self {
        Self::resolve(&BTreeMap::new())
    }
}
