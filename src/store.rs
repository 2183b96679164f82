//! Per-widget persisted state: one PNG per widget plus a preferences file
//! holding each widget's radius percent and the hash of its stored image.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::MaskError;
use crate::photo;
use crate::radius::RadiusPercent;

pub const PREFS_NAME: &str = "widgets.toml";
const PREFS_VERSION: u32 = 1;

/// Identifies one placed widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(pub u32);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WidgetId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(WidgetId)
    }
}

#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Preferences {
    pub version: u32,

    #[serde(default)]
    pub widgets: BTreeMap<String, WidgetEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WidgetEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_percent: Option<RadiusPercent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_hash: Option<String>,
}

impl Preferences {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let prefs: Preferences = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(prefs)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_atomic(path, content.as_bytes())?;
        Ok(())
    }
}

/// Problems found by [`WidgetStore::verify`].
#[derive(Debug, PartialEq)]
pub enum Issue {
    /// A widget has a recorded image hash but no image file.
    MissingImage(WidgetId),
    /// The image file changed since it was stored.
    HashMismatch(WidgetId),
    /// The image file is not a readable PNG.
    UnreadableImage(WidgetId),
    /// An image file exists with no preference entry.
    Untracked(WidgetId),
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::MissingImage(id) => write!(f, "widget {id}: stored image is missing"),
            Issue::HashMismatch(id) => {
                write!(f, "widget {id}: stored image was modified outside photoframe")
            }
            Issue::UnreadableImage(id) => write!(f, "widget {id}: stored image cannot be decoded"),
            Issue::Untracked(id) => write!(f, "widget {id}: image file has no preference entry"),
        }
    }
}

#[derive(Debug)]
pub struct WidgetStore {
    dir: PathBuf,
    prefs: Preferences,
}

impl WidgetStore {
    /// Opens (creating if needed) the store directory.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let prefs = Preferences::load(&dir.join(PREFS_NAME))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            prefs,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn image_path(&self, id: WidgetId) -> PathBuf {
        self.dir.join(format!("pic_{id}.png"))
    }

    fn prefs_path(&self) -> PathBuf {
        self.dir.join(PREFS_NAME)
    }

    /// Applies `edit` to a copy of the preferences, writes it, and only then
    /// swaps it in. On failure the in-memory preferences are unchanged.
    fn update_prefs(&mut self, edit: impl FnOnce(&mut Preferences)) -> Result<()> {
        let mut next = Preferences {
            version: PREFS_VERSION,
            widgets: self.prefs.widgets.clone(),
        };
        edit(&mut next);
        next.save(&self.prefs_path())?;
        self.prefs = next;
        Ok(())
    }

    /// Persists `img` as the widget's photo. The previous photo stays intact
    /// if encoding or writing fails.
    pub fn save_image(&mut self, id: WidgetId, img: &RgbaImage) -> Result<()> {
        self.commit(id, img, None)
    }

    /// Persists the widget's photo and, when given, its percent as one change:
    /// if any write fails, the previous photo and preferences are kept.
    pub fn commit(
        &mut self,
        id: WidgetId,
        img: &RgbaImage,
        percent: Option<RadiusPercent>,
    ) -> Result<()> {
        let path = self.image_path(id);
        let bytes = photo::encode_png(img)
            .with_context(|| format!("Failed to encode image for widget {id}"))?;
        let hash = blake3::hash(&bytes).to_hex().to_string();

        let previous = match std::fs::read(&path) {
            Ok(b) => Some(b),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(source) => return Err(MaskError::IoFailure { path, source }.into()),
        };

        write_atomic(&path, &bytes)?;
        debug!("Stored {} bytes at {}", bytes.len(), path.display());

        let saved = self.update_prefs(|prefs| {
            let entry = prefs.widgets.entry(id.to_string()).or_default();
            entry.image_hash = Some(hash);
            if let Some(p) = percent {
                entry.radius_percent = Some(p);
            }
        });

        if let Err(e) = saved {
            let restored = match &previous {
                Some(old) => write_atomic(&path, old).map_err(anyhow::Error::from),
                None => std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display())),
            };
            if let Err(restore) = restored {
                warn!("Widget {id}: could not roll back {}: {restore:#}", path.display());
            }
            return Err(e);
        }

        Ok(())
    }

    /// The widget's stored photo, or `None` if it has none.
    pub fn load_image(&self, id: WidgetId) -> Result<Option<RgbaImage>> {
        let path = self.image_path(id);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(MaskError::IoFailure { path, source }.into()),
        };
        Ok(Some(photo::decode_png(&bytes, &path)?))
    }

    pub fn radius_percent(&self, id: WidgetId) -> Option<RadiusPercent> {
        self.prefs
            .widgets
            .get(&id.to_string())
            .and_then(|e| e.radius_percent)
    }

    pub fn set_radius_percent(&mut self, id: WidgetId, percent: RadiusPercent) -> Result<()> {
        self.update_prefs(|prefs| {
            prefs
                .widgets
                .entry(id.to_string())
                .or_default()
                .radius_percent = Some(percent);
        })
    }

    /// Deletes the widget's photo and preferences. Returns whether anything
    /// was removed.
    pub fn remove(&mut self, id: WidgetId) -> Result<bool> {
        let path = self.image_path(id);
        let had_file = match std::fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(source) => return Err(MaskError::IoFailure { path, source }.into()),
        };

        let key = id.to_string();
        let had_entry = self.prefs.widgets.contains_key(&key);
        if had_entry {
            self.update_prefs(|prefs| {
                prefs.widgets.remove(&key);
            })?;
        }

        Ok(had_file || had_entry)
    }

    /// Every widget the store knows about, from preferences or image files.
    pub fn ids(&self) -> Result<Vec<WidgetId>> {
        let mut ids: Vec<WidgetId> = self
            .prefs
            .widgets
            .keys()
            .filter_map(|k| k.parse().ok())
            .collect();
        ids.extend(self.image_files()?);
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    /// Checks every widget's stored image against its recorded hash.
    pub fn verify(&self) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        let files = self.image_files()?;

        for (key, entry) in &self.prefs.widgets {
            let Ok(id) = key.parse::<WidgetId>() else {
                continue;
            };
            let Some(expected) = &entry.image_hash else {
                continue;
            };

            let path = self.image_path(id);
            let bytes = match std::fs::read(&path) {
                Ok(b) => b,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    issues.push(Issue::MissingImage(id));
                    continue;
                }
                Err(source) => return Err(MaskError::IoFailure { path, source }.into()),
            };

            if blake3::hash(&bytes).to_hex().as_str() != expected.as_str() {
                issues.push(Issue::HashMismatch(id));
            } else if photo::decode_png(&bytes, &path).is_err() {
                issues.push(Issue::UnreadableImage(id));
            }
        }

        for id in files {
            if !self.prefs.widgets.contains_key(&id.to_string()) {
                issues.push(Issue::Untracked(id));
            }
        }

        Ok(issues)
    }

    fn image_files(&self) -> Result<Vec<WidgetId>> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list {}", self.dir.display()))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(id) = name
                .strip_prefix("pic_")
                .and_then(|rest| rest.strip_suffix(".png"))
                .and_then(|n| n.parse::<WidgetId>().ok())
            else {
                continue;
            };
            // `pic_007.png` parses as 7 but is not where widget 7 lives.
            if format!("pic_{id}.png") == name {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

/// Writes through a temp file in the target's directory and renames it into
/// place, so readers never see a partial file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), MaskError> {
    let io_failure = |source| MaskError::IoFailure {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_failure)?;
    tmp.write_all(bytes).map_err(io_failure)?;
    tmp.as_file().sync_all().map_err(io_failure)?;
    tmp.persist(path).map_err(|e| io_failure(e.error))?;
    Ok(())
}
