//! Maps: a scene plus the image shown while it loads.

use std::fs;
use std::path::PathBuf;

use kino_pack::{ContainerHeader, MapHeader};
use serde::{Deserialize, Serialize};

use super::{ContentKind, HeaderContext, KindStrategy, ResolvedAssets, resolved};
use crate::author::Author;
use crate::entry::Entry;
use crate::error::{BuildError, BuildResult, ValidationError};
use crate::proxy::ProxyMetadata;
use crate::scene::SceneInspector;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Map {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<PathBuf>,
    /// PNG or JPEG load screen, embedded verbatim in the container header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_screen: Option<PathBuf>,
}

impl KindStrategy for Map {
    fn content_kind(&self) -> ContentKind {
        ContentKind::Map
    }

    fn validate_extra(
        &self,
        entry: &Entry,
        _scenes: &dyn SceneInspector,
    ) -> Result<(), ValidationError> {
        if resolved(&self.scene).is_none() {
            return Err(ValidationError::MissingReference {
                entry: entry.name.clone(),
                reference: "map scene",
            });
        }

        if resolved(&self.load_screen).is_none() {
            return Err(ValidationError::MissingReference {
                entry: entry.name.clone(),
                reference: "map loadscreen",
            });
        }

        Ok(())
    }

    fn resolve_assets(&self, _entry: &Entry) -> ResolvedAssets {
        ResolvedAssets {
            scene: resolved(&self.scene).map(Into::into),
            load_screen: resolved(&self.load_screen).map(Into::into),
            ..ResolvedAssets::default()
        }
    }

    fn proxy(&self, entry: &Entry, author: &Author) -> Option<ProxyMetadata> {
        Some(ProxyMetadata::new(entry, author))
    }

    fn container_header(&self, ctx: &HeaderContext<'_>) -> BuildResult<ContainerHeader> {
        let load_screen = ctx.resolved.load_screen.as_ref().ok_or_else(|| {
            BuildError::Validation(ValidationError::MissingReference {
                entry: ctx.entry.name.clone(),
                reference: "map loadscreen",
            })
        })?;
        let path = ctx.project_root.join(load_screen);
        let loadscreen = fs::read(&path).map_err(BuildError::io(&path))?;

        Ok(ContainerHeader::Map(MapHeader {
            tool_format_version: ctx.meta.format_version,
            content_id: ctx.entry.id.get(),
            content_name: ctx.entry.name.clone(),
            author_name: ctx.author.name.clone(),
            loadscreen,
        }))
    }
}
