use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to read sprite manifest {path}: {source}")]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse sprite manifest {path}: {source}")]
    ParseManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("sprite manifest declares label {label:?} more than once")]
    DuplicateLabel { label: String },
    #[error("no sprite registered under label {label:?}")]
    MissingSprite { label: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpriteEntry {
    pub label: String,
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default = "default_slowdown")]
    pub slowdown: u32,
    pub width: f32,
    pub height: f32,
}

fn default_frames() -> u32 {
    1
}

fn default_slowdown() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SpriteManifest {
    pub sprites: Vec<SpriteEntry>,
}

/// A loaded sprite definition. Frame data itself lives with the frontend; the
/// engine only tracks the animation shape needed for placement and frame
/// selection.
#[derive(Debug, Clone)]
pub struct Sprite {
    label: String,
    frame_count: u32,
    slowdown: u32,
    width: f32,
    height: f32,
}

impl Sprite {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Which animation frame is current at the given step count.
    pub fn frame_at_step(&self, step_count: u64) -> u32 {
        let frames = self.frame_count.max(1) as u64;
        let slowdown = self.slowdown.max(1) as u64;
        ((step_count / slowdown) % frames) as u32
    }
}

/// Sprite registry loaded incrementally from a JSON manifest. Entries wait in
/// a pending queue until [`poll_load`](Resources::poll_load) admits them, so a
/// loading screen can spread the work over many steps and report progress.
#[derive(Debug, Default)]
pub struct Resources {
    sprites: HashMap<String, Sprite>,
    pending: VecDeque<SpriteEntry>,
    total: usize,
}

impl Resources {
    pub fn from_manifest_file(path: &Path) -> Result<Self, ResourceError> {
        let text = std::fs::read_to_string(path).map_err(|source| ResourceError::ReadManifest {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: SpriteManifest =
            serde_json::from_str(&text).map_err(|source| ResourceError::ParseManifest {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_manifest(manifest)
    }

    pub fn from_manifest_str(text: &str) -> Result<Self, ResourceError> {
        let manifest: SpriteManifest =
            serde_json::from_str(text).map_err(|source| ResourceError::ParseManifest {
                path: PathBuf::from("<builtin>"),
                source,
            })?;
        Self::from_manifest(manifest)
    }

    pub fn from_manifest(manifest: SpriteManifest) -> Result<Self, ResourceError> {
        let mut seen = std::collections::HashSet::new();
        for entry in &manifest.sprites {
            if !seen.insert(entry.label.as_str()) {
                return Err(ResourceError::DuplicateLabel {
                    label: entry.label.clone(),
                });
            }
        }

        let total = manifest.sprites.len();
        info!(sprite_count = total, "sprite_manifest_loaded");
        Ok(Self {
            sprites: HashMap::new(),
            pending: manifest.sprites.into(),
            total,
        })
    }

    /// Admits up to `budget` pending entries into the registry. Returns how
    /// many were loaded this call.
    pub fn poll_load(&mut self, budget: usize) -> usize {
        let mut loaded = 0;
        while loaded < budget {
            let Some(entry) = self.pending.pop_front() else {
                break;
            };
            debug!(label = entry.label.as_str(), "sprite_loaded");
            self.sprites.insert(
                entry.label.clone(),
                Sprite {
                    label: entry.label,
                    frame_count: entry.frames,
                    slowdown: entry.slowdown,
                    width: entry.width,
                    height: entry.height,
                },
            );
            loaded += 1;
        }
        loaded
    }

    /// Fraction of the manifest that has been admitted, in `0.0..=1.0`. An
    /// empty manifest counts as fully loaded.
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.sprites.len() as f32 / self.total as f32
    }

    pub fn is_loaded(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn sprite(&self, label: &str) -> Option<&Sprite> {
        self.sprites.get(label)
    }

    pub fn require_sprite(&self, label: &str) -> Result<&Sprite, ResourceError> {
        self.sprites
            .get(label)
            .ok_or_else(|| ResourceError::MissingSprite {
                label: label.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const MANIFEST: &str = r#"{
        "sprites": [
            { "label": "hero", "frames": 4, "slowdown": 8, "width": 80.0, "height": 80.0 },
            { "label": "slime", "width": 60.0, "height": 40.0 },
            { "label": "floor", "width": 1000.0, "height": 1000.0 }
        ]
    }"#;

    #[test]
    fn loads_incrementally_and_reports_progress() {
        let mut resources = Resources::from_manifest_str(MANIFEST).expect("manifest");
        assert_eq!(resources.progress(), 0.0);
        assert!(!resources.is_loaded());

        assert_eq!(resources.poll_load(2), 2);
        assert!((resources.progress() - 2.0 / 3.0).abs() < 0.001);

        assert_eq!(resources.poll_load(10), 1);
        assert_eq!(resources.progress(), 1.0);
        assert!(resources.is_loaded());
        assert_eq!(resources.poll_load(1), 0);
    }

    #[test]
    fn empty_manifest_is_immediately_loaded() {
        let resources = Resources::from_manifest_str(r#"{ "sprites": [] }"#).expect("manifest");
        assert_eq!(resources.progress(), 1.0);
        assert!(resources.is_loaded());
    }

    #[test]
    fn missing_sprite_is_an_error_with_label() {
        let mut resources = Resources::from_manifest_str(MANIFEST).expect("manifest");
        resources.poll_load(usize::MAX);

        assert!(resources.sprite("hero").is_some());
        let error = resources.require_sprite("dragon").unwrap_err();
        match error {
            ResourceError::MissingSprite { label } => assert_eq!(label, "dragon"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let text = r#"{ "sprites": [
            { "label": "hero", "width": 1.0, "height": 1.0 },
            { "label": "hero", "width": 2.0, "height": 2.0 }
        ] }"#;
        let error = Resources::from_manifest_str(text).unwrap_err();
        match error {
            ResourceError::DuplicateLabel { label } => assert_eq!(label, "hero"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn frame_selection_respects_slowdown_and_wraps() {
        let mut resources = Resources::from_manifest_str(MANIFEST).expect("manifest");
        resources.poll_load(usize::MAX);
        let hero = resources.require_sprite("hero").expect("hero");

        assert_eq!(hero.frame_at_step(0), 0);
        assert_eq!(hero.frame_at_step(7), 0);
        assert_eq!(hero.frame_at_step(8), 1);
        assert_eq!(hero.frame_at_step(31), 3);
        assert_eq!(hero.frame_at_step(32), 0);
    }

    #[test]
    fn manifest_file_round_trips_through_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(MANIFEST.as_bytes()).expect("write manifest");

        let mut resources = Resources::from_manifest_file(file.path()).expect("manifest");
        resources.poll_load(usize::MAX);
        assert!(resources.sprite("floor").is_some());
    }

    #[test]
    fn unreadable_manifest_reports_path() {
        let error = Resources::from_manifest_file(Path::new("/nonexistent/sprites.json"))
            .unwrap_err();
        match error {
            ResourceError::ReadManifest { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/sprites.json"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
