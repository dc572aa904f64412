use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppSettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings path unavailable")]
    MissingSettingsPath,
}

pub type Result<T> = std::result::Result<T, AppSettingsError>;

const REDUNDANT_DIR_NAMES: &[&str] = &[
    "MP4",
    "MP4 Metadata",
    "MP4 Sound",
    "MP4 Video",
    "QuickTime",
    "QuickTime Sound",
    "QuickTime Video",
];

const MERGEABLE_DIR_NAMES: &[&str] = &[
    "Exif SubIFD",
    "GIF Control",
    "GIF Image",
    "HEIF",
    "ICC Profile",
    "IPTC",
    "WebP",
    "XMP",
];

pub const DEFAULT_SUBJECTS_SEPARATOR: &str = ";";

/// Directory naming rules tied to the tag-directory backend's naming.
///
/// Names are matched exactly against raw directory names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerSettings {
    /// Container directories duplicated by derived information; never displayed.
    pub redundant_dir_names: BTreeSet<String>,
    /// Directories whose same-name instances share one display key.
    pub mergeable_dir_names: BTreeSet<String>,
    pub subjects_separator: String,
}

impl Default for ReconcilerSettings {
    fn default() -> Self {
        Self {
            redundant_dir_names: REDUNDANT_DIR_NAMES.iter().map(|s| s.to_string()).collect(),
            mergeable_dir_names: MERGEABLE_DIR_NAMES.iter().map(|s| s.to_string()).collect(),
            subjects_separator: DEFAULT_SUBJECTS_SEPARATOR.to_string(),
        }
    }
}

impl ReconcilerSettings {
    /// Loads the user settings file, or defaults when there is none.
    pub fn load() -> Result<Self> {
        let path = settings_file_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn is_redundant(&self, dir_name: &str) -> bool {
        self.redundant_dir_names.contains(dir_name)
    }

    pub fn is_mergeable(&self, dir_name: &str) -> bool {
        self.mergeable_dir_names.contains(dir_name)
    }
}

fn settings_file_path() -> Result<PathBuf> {
    let base = directories::BaseDirs::new().ok_or(AppSettingsError::MissingSettingsPath)?;
    let mut path = base.config_dir().to_path_buf();
    path.push("metafold");
    path.push("settings.json");
    Ok(path)
}
