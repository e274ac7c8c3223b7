//! Garages: a scene the player's car is shown in.

use std::path::PathBuf;

use kino_pack::{ContainerHeader, GarageHeader};
use serde::{Deserialize, Serialize};

use super::{ContentKind, HeaderContext, KindStrategy, ResolvedAssets, asset_path_string, resolved};
use crate::author::Author;
use crate::entry::Entry;
use crate::error::{BuildResult, ValidationError};
use crate::proxy::ProxyMetadata;
use crate::scene::SceneInspector;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Garage {
    /// The garage scene. Must not contain a camera; the game provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<PathBuf>,
}

impl KindStrategy for Garage {
    fn content_kind(&self) -> ContentKind {
        ContentKind::Garage
    }

    fn validate_extra(
        &self,
        entry: &Entry,
        scenes: &dyn SceneInspector,
    ) -> Result<(), ValidationError> {
        let Some(scene) = resolved(&self.scene) else {
            return Err(ValidationError::MissingReference {
                entry: entry.name.clone(),
                reference: "garage scene",
            });
        };

        let camera = scenes
            .find_camera(scene)
            .map_err(|source| ValidationError::SceneInspection {
                entry: entry.name.clone(),
                source,
            })?;

        if let Some(location) = camera {
            return Err(ValidationError::CameraInScene {
                entry: entry.name.clone(),
                location,
            });
        }

        Ok(())
    }

    fn resolve_assets(&self, _entry: &Entry) -> ResolvedAssets {
        ResolvedAssets {
            scene: resolved(&self.scene).map(Into::into),
            ..ResolvedAssets::default()
        }
    }

    fn proxy(&self, entry: &Entry, author: &Author) -> Option<ProxyMetadata> {
        let mut proxy = ProxyMetadata::new(entry, author);
        proxy.scene_path = Some(
            resolved(&self.scene)
                .map(asset_path_string)
                .unwrap_or_default(),
        );
        Some(proxy)
    }

    fn container_header(&self, ctx: &HeaderContext<'_>) -> BuildResult<ContainerHeader> {
        Ok(ContainerHeader::Garage(GarageHeader {
            proxy_json: serde_json::to_string(ctx.proxy)?,
            tool_format_version: ctx.meta.format_version,
            content_id: ctx.entry.id.get(),
            content_name: ctx.entry.name.clone(),
            author_name: ctx.author.name.clone(),
        }))
    }
}
