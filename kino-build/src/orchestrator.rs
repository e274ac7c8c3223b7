//! Runs a build over a set of entries.
//!
//! A run fails as a whole only when the author is invalid or nothing is
//! selected. After that, entries are built one at a time and each either
//! produces its container or a reported failure; a failing entry never
//! leaves a partial container behind and never stops its siblings.
//!
//! Ids are not allocated here. Entries must come out of
//! [`assign_ids`](crate::assign_ids) first; one without its content id or
//! with missing or duplicate part ids fails.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kino_pack::ContainerWriter;
use kino_types::ContentId;
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

use crate::author::Author;
use crate::compiler::{AssetCompiler, BuildTarget, CompileRequest};
use crate::entry::Entry;
use crate::error::{BuildError, BuildResult};
use crate::ids::check_ids;
use crate::kinds::{ContentKind, HeaderContext};
use crate::meta::BuildMetaSet;
use crate::proxy::{SIDECAR_FILE_NAME, require_proxy, write_sidecar};
use crate::scene::SceneInspector;
use crate::validate::EntryValidator;

/// Shared flag that stops a run before its next entry.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A container written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltContainer {
    pub name: String,
    pub id: ContentId,
    pub kind: ContentKind,
    pub output: PathBuf,
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the whole container file.
    pub sha256: String,
}

/// An entry that produced no container.
#[derive(Debug)]
pub struct EntryFailure {
    pub name: String,
    pub id: ContentId,
    pub error: BuildError,
}

/// Outcome of a run.
#[derive(Debug)]
pub struct BuildReport {
    pub target: BuildTarget,
    pub built: Vec<BuiltContainer>,
    pub failed: Vec<EntryFailure>,
    /// Entries not started because the run was cancelled.
    pub cancelled: Vec<String>,
}

impl BuildReport {
    fn new(target: BuildTarget) -> Self {
        Self {
            target,
            built: Vec::new(),
            failed: Vec::new(),
            cancelled: Vec::new(),
        }
    }

    /// True when every selected entry was built.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.cancelled.is_empty()
    }
}

/// Builds entries into containers.
pub struct BuildOrchestrator {
    project_root: PathBuf,
    compiler: Box<dyn AssetCompiler>,
    scenes: Box<dyn SceneInspector>,
    writer: ContainerWriter,
    cancel: CancelFlag,
}

impl BuildOrchestrator {
    pub fn new(
        project_root: impl Into<PathBuf>,
        compiler: Box<dyn AssetCompiler>,
        scenes: Box<dyn SceneInspector>,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            compiler,
            scenes,
            writer: ContainerWriter::default(),
            cancel: CancelFlag::new(),
        }
    }

    #[must_use]
    pub fn with_writer(mut self, writer: ContainerWriter) -> Self {
        self.writer = writer;
        self
    }

    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Builds every selected entry for `target`.
    ///
    /// Returns `Err` only for run-level failures (invalid author, nothing
    /// selected, build folders that cannot be created); everything else
    /// is recorded in the report.
    pub fn build(
        &self,
        target: BuildTarget,
        metas: &BuildMetaSet,
        author: &Author,
        entries: &[Entry],
    ) -> BuildResult<BuildReport> {
        let validator = EntryValidator::new(self.scenes.as_ref());
        let selected = validator.validate_collection(author, entries)?;

        let kinds: BTreeSet<ContentKind> = selected.iter().map(|e| e.content_kind()).collect();
        for kind in kinds {
            metas.get(kind).prepare(&self.project_root)?;
        }

        info!(target = %target, entries = selected.len(), "Build started");
        let mut report = BuildReport::new(target);

        for (index, entry) in selected.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(remaining = selected.len() - index, "Build cancelled");
                report
                    .cancelled
                    .extend(selected[index..].iter().map(|e| e.name.clone()));
                break;
            }

            match self.build_entry(&validator, target, metas, author, entry) {
                Ok(built) => {
                    info!(
                        entry = %built.name,
                        output = %built.output.display(),
                        bytes = built.bytes,
                        "Entry built"
                    );
                    report.built.push(built);
                }
                Err(e) => {
                    error!(entry = %entry.name, error = %e, "Entry failed");
                    report.failed.push(EntryFailure {
                        name: entry.name.clone(),
                        id: entry.id,
                        error: e,
                    });
                }
            }
        }

        info!(
            built = report.built.len(),
            failed = report.failed.len(),
            cancelled = report.cancelled.len(),
            "Build finished"
        );
        Ok(report)
    }

    fn build_entry(
        &self,
        validator: &EntryValidator<'_>,
        target: BuildTarget,
        metas: &BuildMetaSet,
        author: &Author,
        entry: &Entry,
    ) -> BuildResult<BuiltContainer> {
        let kind = entry.content_kind();
        let meta = metas.get(kind);
        info!(entry = %entry.name, kind = %kind, "Building entry");

        let resolved = validator.validate_entry(entry)?;
        check_ids(entry)?;
        let proxy = require_proxy(entry, author)?;

        let mut assets = resolved.bundle_assets();
        if kind.writes_sidecar() {
            write_sidecar(&self.project_root.join(&entry.root), &proxy)?;
            assets.insert(entry.root.join(SIDECAR_FILE_NAME));
        }

        let request = CompileRequest {
            bundle_name: entry.name.clone(),
            assets,
            staging_folder: meta.staging_folder.clone(),
            target,
            project_root: self.project_root.clone(),
        };
        self.compiler.compile(&request)?;

        let staged = request.output_path();
        let payload = fs::read(&staged).map_err(BuildError::io(&staged))?;

        let header = entry.strategy().container_header(&HeaderContext {
            entry,
            author,
            meta,
            proxy: &proxy,
            resolved: &resolved,
            project_root: &self.project_root,
        })?;

        let output = meta.output_path(&self.project_root, &entry.name);
        let bytes = self.writer.write(&output, &header, &payload)?;

        let written = fs::read(&output).map_err(BuildError::io(&output))?;
        Ok(BuiltContainer {
            name: entry.name.clone(),
            id: entry.id,
            kind,
            output,
            bytes,
            sha256: hex::encode(Sha256::digest(&written)),
        })
    }
}
