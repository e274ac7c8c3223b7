//! Project and entry files.
//!
//! A project is a folder holding `kino.toml`. Entries live anywhere below
//! the configured content folders, one `kino-entry.toml` per entry folder.
//! Every path in either file is relative to the project folder.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use kino_pack::WriteMode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::author::Author;
use crate::compiler::{AssetCompiler, CommandCompiler, NoCompiler};
use crate::entry::Entry;
use crate::error::{BuildError, BuildResult};
use crate::kinds::ContentKind;
use crate::meta::{BuildMetaOverrides, BuildMetaSet};

pub const PROJECT_FILE_NAME: &str = "kino.toml";
pub const ENTRY_FILE_NAME: &str = "kino-entry.toml";

fn default_content_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("Content")]
}

/// Contents of `kino.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_content_dirs")]
    pub content_dirs: Vec<PathBuf>,
    /// Write containers through a temporary file and a rename.
    #[serde(default)]
    pub atomic_writes: bool,
    pub author: Author,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<CompilerConfig>,
}

/// `[build.<kind>]` tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    #[serde(default)]
    pub parts_pack: BuildMetaOverrides,
    #[serde(default)]
    pub custom_objects: BuildMetaOverrides,
    #[serde(default)]
    pub garage: BuildMetaOverrides,
    #[serde(default)]
    pub map: BuildMetaOverrides,
}

impl BuildSection {
    pub fn overrides(&self) -> BTreeMap<ContentKind, BuildMetaOverrides> {
        BTreeMap::from([
            (ContentKind::PartsPack, self.parts_pack.clone()),
            (ContentKind::CustomObjects, self.custom_objects.clone()),
            (ContentKind::Garage, self.garage.clone()),
            (ContentKind::Map, self.map.clone()),
        ])
    }
}

/// `[compiler]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

/// A loaded project.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Loads the project file at `path`; the project root is its folder.
    pub fn load(path: &Path) -> BuildResult<Self> {
        let contents = fs::read_to_string(path).map_err(BuildError::io(path))?;
        let config: ProjectConfig = toml::from_str(&contents).map_err(|e| BuildError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let root = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        info!(project = %path.display(), "Loaded project");
        Ok(Self { root, config })
    }

    /// Wraps an in-memory config rooted at `root`.
    pub fn with_config(root: impl Into<PathBuf>, config: ProjectConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn author(&self) -> &Author {
        &self.config.author
    }

    pub fn build_metas(&self) -> BuildMetaSet {
        BuildMetaSet::resolve(&self.config.build.overrides())
    }

    pub fn write_mode(&self) -> WriteMode {
        if self.config.atomic_writes {
            WriteMode::Atomic
        } else {
            WriteMode::Truncate
        }
    }

    /// The configured asset compiler, or one that rejects every request.
    pub fn compiler(&self) -> Box<dyn AssetCompiler> {
        match &self.config.compiler {
            Some(c) => Box::new(CommandCompiler::new(self.root.join(&c.program), c.args.clone())),
            None => {
                warn!("No [compiler] configured, builds will fail at compilation");
                Box::new(NoCompiler)
            }
        }
    }

    /// Finds and parses every entry file under the content folders,
    /// ordered by path. Missing content folders are skipped.
    pub fn discover_entries(&self) -> BuildResult<Vec<Entry>> {
        let mut files = Vec::new();
        for dir in &self.config.content_dirs {
            let path = self.root.join(dir);
            if !path.is_dir() {
                warn!(path = %path.display(), "Content folder not found");
                continue;
            }
            collect_entry_files(&path, &mut files)?;
        }
        files.sort();

        files
            .iter()
            .map(|file| self.load_entry(file))
            .collect()
    }

    /// Parses one entry file. Its folder becomes the entry root.
    pub fn load_entry(&self, file: &Path) -> BuildResult<Entry> {
        let contents = fs::read_to_string(file).map_err(BuildError::io(file))?;
        let entry: Entry = toml::from_str(&contents).map_err(|e| BuildError::Config {
            path: file.to_path_buf(),
            message: e.to_string(),
        })?;

        let folder = file.parent().unwrap_or(Path::new(""));
        let root = folder.strip_prefix(&self.root).unwrap_or(folder);
        debug!(entry = %entry.name, root = %root.display(), "Entry loaded");
        Ok(entry.with_root(root))
    }

    /// Writes `entry` back to its entry file.
    pub fn save_entry(&self, entry: &Entry) -> BuildResult<PathBuf> {
        let folder = self.root.join(&entry.root);
        fs::create_dir_all(&folder).map_err(BuildError::io(&folder))?;

        let path = folder.join(ENTRY_FILE_NAME);
        let contents = toml::to_string_pretty(entry).map_err(|e| BuildError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&path, contents).map_err(BuildError::io(&path))?;
        Ok(path)
    }
}

fn collect_entry_files(dir: &Path, out: &mut Vec<PathBuf>) -> BuildResult<()> {
    for item in fs::read_dir(dir).map_err(BuildError::io(dir))? {
        let path = item.map_err(BuildError::io(dir))?.path();
        if path.is_dir() {
            collect_entry_files(&path, out)?;
        } else if path.file_name().is_some_and(|n| n == ENTRY_FILE_NAME) {
            out.push(path);
        }
    }
    Ok(())
}
