//! Car parts packs.

use std::fmt;
use std::path::PathBuf;

use kino_pack::{ContainerHeader, PackHeader};
use kino_types::PartId;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::{
    ContentKind, HeaderContext, KindStrategy, ResolvedAssets, asset_name, asset_path_string,
    resolved,
};
use crate::author::Author;
use crate::entry::Entry;
use crate::error::{BuildResult, ValidationError};
use crate::proxy::{PartProxy, ProxyMetadata};
use crate::scene::SceneInspector;

/// What a parts pack contains. The discriminant is written into the
/// container header and the metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum PackType {
    #[default]
    Wheels = 1,
    InteriorParts = 2,
    CarParts = 3,
}

/// Where a part is mounted on the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartClass {
    Wheel,
    Interior,
    Exterior,
}

/// Type of a single part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum PartType {
    #[default]
    Wheel = 1,
    SteeringWheel = 2,
    Spoiler = 3,
    Seat = 4,
    Dashboard = 5,
    Bumper = 6,
    Mirror = 7,
}

impl PartType {
    pub fn class(self) -> PartClass {
        match self {
            PartType::Wheel => PartClass::Wheel,
            PartType::SteeringWheel | PartType::Seat | PartType::Dashboard => PartClass::Interior,
            PartType::Spoiler | PartType::Bumper | PartType::Mirror => PartClass::Exterior,
        }
    }
}

impl PackType {
    /// Whether a part of `part_type` may be shipped in a pack of this type.
    pub fn accepts(self, part_type: PartType) -> bool {
        let class = part_type.class();
        match self {
            PackType::Wheels => class == PartClass::Wheel,
            PackType::InteriorParts => class == PartClass::Interior,
            PackType::CarParts => class == PartClass::Exterior,
        }
    }
}

impl fmt::Display for PackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PackType::Wheels => "Wheels",
            PackType::InteriorParts => "InteriorParts",
            PackType::CarParts => "CarParts",
        })
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PartType::Wheel => "Wheel",
            PartType::SteeringWheel => "SteeringWheel",
            PartType::Spoiler => "Spoiler",
            PartType::Seat => "Seat",
            PartType::Dashboard => "Dashboard",
            PartType::Bumper => "Bumper",
            PartType::Mirror => "Mirror",
        })
    }
}

/// One part of a parts pack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Unique within the owning pack only.
    #[serde(default)]
    pub id: PartId,
    pub part_type: PartType,
    /// The part prefab. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_asset: Option<PathBuf>,
    /// Icon shown on the part card in the game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,
    /// Stock part shown to players who don't have this pack.
    #[serde(default)]
    pub replacement_id: i32,
}

impl Part {
    pub fn new(part_type: PartType, source_asset: impl Into<PathBuf>) -> Self {
        Self {
            part_type,
            source_asset: Some(source_asset.into()),
            ..Self::default()
        }
    }

    /// The prefab's name.
    pub fn name(&self) -> String {
        asset_name(self.source_asset.as_deref())
    }
}

/// A pack of car parts of one [`PackType`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartsPack {
    #[serde(default)]
    pub pack_type: PackType,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_icon: Option<PathBuf>,
    /// `None` until the part list has been created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,
}

impl KindStrategy for PartsPack {
    fn content_kind(&self) -> ContentKind {
        ContentKind::PartsPack
    }

    fn validate_extra(
        &self,
        entry: &Entry,
        _scenes: &dyn SceneInspector,
    ) -> Result<(), ValidationError> {
        let parts = match &self.parts {
            Some(parts) if !parts.is_empty() => parts,
            _ => return Err(ValidationError::EmptyPack(entry.name.clone())),
        };

        for part in parts {
            if !self.pack_type.accepts(part.part_type) {
                return Err(ValidationError::TypeMismatch {
                    pack: entry.name.clone(),
                    pack_type: self.pack_type,
                    part: part.name(),
                    part_type: part.part_type,
                });
            }

            if resolved(&part.source_asset).is_none() {
                return Err(ValidationError::MissingSourceAsset {
                    pack: entry.name.clone(),
                    item: format!("part {} ({})", part.id, part.part_type),
                });
            }
        }

        Ok(())
    }

    fn resolve_assets(&self, _entry: &Entry) -> ResolvedAssets {
        let parts = self.parts.as_deref().unwrap_or_default();
        ResolvedAssets {
            sources: parts
                .iter()
                .filter_map(|p| resolved(&p.source_asset))
                .map(Into::into)
                .collect(),
            icons: resolved(&self.pack_icon)
                .into_iter()
                .chain(parts.iter().filter_map(|p| resolved(&p.icon)))
                .map(Into::into)
                .collect(),
            ..ResolvedAssets::default()
        }
    }

    fn proxy(&self, entry: &Entry, author: &Author) -> Option<ProxyMetadata> {
        let parts = self.parts.as_ref()?;

        let mut proxies = Vec::with_capacity(parts.len());
        for part in parts {
            if !self.pack_type.accepts(part.part_type) {
                error!(
                    pack = %entry.name,
                    part = %part.name(),
                    "Unable to add part ({}), because pack type is different: {}",
                    part.part_type,
                    self.pack_type
                );
                continue;
            }

            let Some(source) = resolved(&part.source_asset) else {
                continue;
            };

            proxies.push(PartProxy {
                part_type: part.part_type as i32,
                id: part.id,
                replacement_id: part.replacement_id,
                file_path: asset_path_string(source),
                icon_path: resolved(&part.icon)
                    .map(asset_path_string)
                    .unwrap_or_default(),
            });
        }

        let mut proxy = ProxyMetadata::new(entry, author);
        proxy.kind = Some(self.pack_type as i32);
        proxy.category_name = Some(self.category_name.clone());
        proxy.description = Some(self.description.clone());
        proxy.pack_icon = Some(
            resolved(&self.pack_icon)
                .map(asset_path_string)
                .unwrap_or_default(),
        );
        proxy.parts = Some(proxies);
        Some(proxy)
    }

    fn container_header(&self, ctx: &HeaderContext<'_>) -> BuildResult<ContainerHeader> {
        Ok(ContainerHeader::Pack(PackHeader {
            tool_format_version: ctx.meta.format_version,
            content_version: ctx.entry.version,
            kind: self.pack_type as i32,
            content_id: ctx.entry.id.get(),
            author_steam_id: ctx.author.steam_id,
            author_discord_id: ctx.author.discord_id,
        }))
    }
}
