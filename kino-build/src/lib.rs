//! Validation, metadata and build orchestration for Kino content.
//!
//! A build takes a set of [`Entry`] values (parts packs, custom objects
//! packs, garages and maps) and turns every selected one into a binary
//! container:
//!
//! 1. [`assign_ids`] gives new entries and parts their ids. It runs
//!    before anything else and is the only step that changes entries.
//! 2. [`EntryValidator`] checks the author, names, versions and the
//!    per-kind rules, returning the asset paths each entry resolved to.
//! 3. [`build_proxy`] projects an entry into its [`ProxyMetadata`]; packs
//!    write it as a sidecar file that is compiled into their bundle.
//! 4. An [`AssetCompiler`] compiles the assets into a bundle.
//! 5. The bundle is wrapped in the kind's container header and written
//!    by [`kino_pack::ContainerWriter`].
//!
//! [`BuildOrchestrator`] runs steps 2 to 5 for a whole selection and
//! reports per-entry outcomes in a [`BuildReport`].

pub mod author;
pub mod compiler;
pub mod config;
pub mod entry;
pub mod error;
pub mod ids;
pub mod kinds;
pub mod meta;
pub mod orchestrator;
pub mod proxy;
pub mod scene;
pub mod validate;

pub use author::Author;
pub use compiler::{AssetCompiler, BuildTarget, CommandCompiler, CompileRequest, NoCompiler};
pub use config::{ENTRY_FILE_NAME, PROJECT_FILE_NAME, Project, ProjectConfig};
pub use entry::{Entry, EntryKind};
pub use error::{BuildError, BuildResult, CompileError, SceneError, ValidationError};
pub use ids::{IdAllocator, IdPolicy, assign_ids, assign_part_ids, check_ids};
pub use kinds::{
    ContentKind, CustomObject, CustomObjectsPack, Garage, KindStrategy, Map, ObjectsType,
    PackType, Part, PartType, PartsPack, ResolvedAssets, refresh_objects,
};
pub use meta::{BuildMeta, BuildMetaOverrides, BuildMetaSet, DEFAULT_FORMAT_VERSION};
pub use orchestrator::{BuildOrchestrator, BuildReport, BuiltContainer, CancelFlag, EntryFailure};
pub use proxy::{ObjectProxy, PartProxy, ProxyMetadata, SIDECAR_FILE_NAME, build_proxy, write_sidecar};
pub use scene::{SceneInspector, UnitySceneInspector};
pub use validate::EntryValidator;
