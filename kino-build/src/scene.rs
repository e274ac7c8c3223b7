//! Scene inspection for garage validation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::error::SceneError;

/// Answers whether a scene contains a camera.
pub trait SceneInspector {
    /// Returns a human-readable location of the first camera found in
    /// `scene` (a project-relative path), or `None`.
    fn find_camera(&self, scene: &Path) -> Result<Option<String>, SceneError>;
}

const YAML_HEADER: &str = "%YAML";
const CAMERA_CLASS_ID: u32 = 20;
const GAME_OBJECT_CLASS_ID: u32 = 1;

static DOCUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--- !u!(\d+) &(-?\d+)").expect("document regex"));
static GAME_OBJECT_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*m_GameObject:\s*\{\s*fileID:\s*(-?\d+)").expect("game object regex")
});
static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*m_Name:\s*(.*)$").expect("name regex"));

/// Reads text-serialized Unity scenes from disk.
///
/// Every object in a scene file is a YAML document opened by
/// `--- !u!<class id> &<file id>`. Camera components have class id 20
/// and point at their owning game object through `m_GameObject`.
#[derive(Debug, Clone)]
pub struct UnitySceneInspector {
    project_root: PathBuf,
}

#[derive(Debug, Default)]
struct Document {
    class_id: u32,
    file_id: i64,
    game_object: Option<i64>,
    name: Option<String>,
}

impl UnitySceneInspector {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }
}

impl SceneInspector for UnitySceneInspector {
    fn find_camera(&self, scene: &Path) -> Result<Option<String>, SceneError> {
        let path = self.project_root.join(scene);
        let text = fs::read_to_string(&path).map_err(|source| SceneError::Io {
            path: path.clone(),
            source,
        })?;

        if !text.trim_start().starts_with(YAML_HEADER) {
            return Err(SceneError::Unsupported(path));
        }

        let documents = parse_documents(&text);
        debug!(scene = %path.display(), documents = documents.len(), "Scene parsed");

        let Some(camera) = documents.iter().find(|d| d.class_id == CAMERA_CLASS_ID) else {
            return Ok(None);
        };

        let names: HashMap<i64, &str> = documents
            .iter()
            .filter(|d| d.class_id == GAME_OBJECT_CLASS_ID)
            .filter_map(|d| d.name.as_deref().map(|n| (d.file_id, n)))
            .collect();

        let location = camera
            .game_object
            .and_then(|id| names.get(&id))
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("fileID {}", camera.file_id));

        Ok(Some(location))
    }
}

fn parse_documents(text: &str) -> Vec<Document> {
    let mut documents: Vec<Document> = Vec::new();

    for line in text.lines() {
        if let Some(caps) = DOCUMENT.captures(line) {
            documents.push(Document {
                class_id: caps[1].parse().unwrap_or_default(),
                file_id: caps[2].parse().unwrap_or_default(),
                ..Document::default()
            });
            continue;
        }

        let Some(current) = documents.last_mut() else {
            continue;
        };

        if current.game_object.is_none() {
            if let Some(caps) = GAME_OBJECT_REF.captures(line) {
                current.game_object = caps[1].parse().ok();
                continue;
            }
        }
        if current.name.is_none() {
            if let Some(caps) = NAME.captures(line) {
                current.name = Some(caps[1].trim().to_string());
            }
        }
    }

    documents
}
