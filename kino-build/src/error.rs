//! Error types for validation and building.

use std::io;
use std::path::{Path, PathBuf};

use kino_types::PartId;
use thiserror::Error;

use crate::kinds::{PackType, PartType};

/// A rule an author or entry failed. Validation stops at the first one.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("author's name can't be empty")]
    EmptyAuthorName,

    #[error("invalid SteamID '{0}', it has to be a 64-bit 17 digit number")]
    InvalidSteamId(u64),

    #[error("invalid DiscordID")]
    InvalidDiscordId,

    #[error("one of the selected entries has an empty name")]
    EmptyName,

    #[error("'{0}' contains characters that are not allowed. Allowed characters: [A-Z,a-z,0-9,-,_]")]
    InvalidName(String),

    #[error("invalid version of '{name}': {version}")]
    InvalidVersion { name: String, version: i32 },

    #[error("{reference} for '{entry}' is not set")]
    MissingReference {
        entry: String,
        reference: &'static str,
    },

    #[error("part {part} ({part_type}) is incompatible with pack '{pack}' ({pack_type})")]
    TypeMismatch {
        pack: String,
        pack_type: PackType,
        part: String,
        part_type: PartType,
    },

    #[error("source asset is not set for {item} in '{pack}'")]
    MissingSourceAsset { pack: String, item: String },

    #[error("'{0}' has no id, assign ids before building")]
    UnassignedId(String),

    #[error("part {part} in '{pack}' has no id, assign ids before building")]
    UnassignedPartId { pack: String, part: String },

    #[error("part id {id} is used more than once in '{pack}'")]
    DuplicatePartId { pack: String, id: PartId },

    #[error("'{0}' has nothing to build")]
    EmptyPack(String),

    #[error("nothing to build")]
    NothingToBuild,

    #[error("the garage scene of '{entry}' contains a camera at '{location}', delete it before starting the build")]
    CameraInScene { entry: String, location: String },

    #[error("unable to inspect the scene of '{entry}': {source}")]
    SceneInspection {
        entry: String,
        #[source]
        source: SceneError,
    },
}

impl ValidationError {
    /// True for the "nothing to build" family: an empty selection or a
    /// pack without buildable items.
    #[must_use]
    pub fn is_nothing_to_build(&self) -> bool {
        matches!(self, Self::NothingToBuild | Self::EmptyPack(_))
    }
}

/// Failure reported by a scene inspector.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unable to read scene {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("scene {0} is not text-serialized")]
    Unsupported(PathBuf),
}

/// Failure reported by the external asset compiler.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unable to start asset compiler '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("asset compiler failed for '{bundle}': {message}")]
    Failed { bundle: String, message: String },
}

/// Everything that can stop a build or one entry of it.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("unable to create metadata for '{0}'")]
    Metadata(String),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("container error: {0}")]
    Container(#[from] kino_pack::PackError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl BuildError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io { path, source }
    }
}

/// Result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;
