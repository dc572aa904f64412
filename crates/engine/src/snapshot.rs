//! Backends replaying previously captured extractor output.
//!
//! A snapshot is a JSON document holding what the external backends would
//! report for one item. Sections left out make the matching backend
//! unavailable.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use core_types::{Directory, IptcDataSet, PageInfo, XmpMeta};
use serde::{Deserialize, Serialize};

use crate::backend::{
    BackendResult, Backends, DirectoryExtractor, IptcReader, MediaProperties, MediaPropertiesReader,
    PageReader, PageSource, ProfileKind, XmpSerializer,
};
use crate::media::MediaKey;
use crate::MediaItem;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub directories: Option<Vec<Directory>>,
    /// Directories of embedded profiles, keyed by `exif`, `iptc` or `xmp`.
    pub profiles: BTreeMap<String, Vec<Directory>>,
    /// Container properties keyed by display name, e.g. `Duration`.
    pub media: Option<BTreeMap<String, String>>,
    pub embedded_picture: bool,
    pub pages: Option<Vec<PageInfo>>,
    pub tiff_page_count: Option<usize>,
    pub iptc: Option<Vec<IptcDataSet>>,
}

impl Snapshot {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))
    }

    /// Backends answering from this snapshot. XMP is serialized as JSON.
    pub fn into_backends(self) -> Backends {
        let has_directories = self.directories.is_some();
        let has_media = self.media.is_some();
        let has_pages = self.pages.is_some() || self.tiff_page_count.is_some();
        let has_iptc = self.iptc.is_some();
        let shared = Arc::new(self);

        let mut backends = Backends::new().with_xmp(Arc::new(JsonXmpSerializer));
        if has_directories {
            backends = backends.with_directories(shared.clone());
        }
        if has_media {
            backends = backends.with_media(shared.clone());
        }
        if has_pages {
            backends = backends.with_pages(shared.clone());
        }
        if has_iptc {
            backends = backends.with_iptc(shared);
        }
        backends
    }
}

impl DirectoryExtractor for Snapshot {
    fn read_directories(&self, _item: &MediaItem) -> BackendResult<Vec<Directory>> {
        Ok(self.directories.clone().unwrap_or_default())
    }

    fn read_profile(&self, kind: ProfileKind, _bytes: &[u8]) -> BackendResult<Vec<Directory>> {
        let key = match kind {
            ProfileKind::Exif => "exif",
            ProfileKind::Iptc => "iptc",
            ProfileKind::Xmp => "xmp",
        };
        Ok(self.profiles.get(key).cloned().unwrap_or_default())
    }
}

impl MediaPropertiesReader for Snapshot {
    fn open(&self, _item: &MediaItem) -> BackendResult<Box<dyn MediaProperties>> {
        Ok(Box::new(SnapshotMedia {
            values: self.media.clone().unwrap_or_default(),
            embedded_picture: self.embedded_picture,
        }))
    }
}

impl PageReader for Snapshot {
    fn tiff_page_count(&self, _item: &MediaItem) -> BackendResult<usize> {
        Ok(self
            .tiff_page_count
            .or_else(|| self.pages.as_ref().map(Vec::len))
            .unwrap_or(1))
    }

    fn pages(&self, _item: &MediaItem, _source: PageSource) -> BackendResult<Vec<PageInfo>> {
        Ok(self.pages.clone().unwrap_or_default())
    }
}

impl IptcReader for Snapshot {
    fn read_iptc(&self, _item: &MediaItem) -> BackendResult<Vec<IptcDataSet>> {
        Ok(self.iptc.clone().unwrap_or_default())
    }
}

struct SnapshotMedia {
    values: BTreeMap<String, String>,
    embedded_picture: bool,
}

impl MediaProperties for SnapshotMedia {
    fn value(&self, key: MediaKey) -> BackendResult<Option<String>> {
        Ok(self.values.get(key.display_name()).cloned())
    }

    fn has_embedded_picture(&self) -> BackendResult<bool> {
        Ok(self.embedded_picture)
    }
}

/// Serializes the flattened property list as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonXmpSerializer;

impl XmpSerializer for JsonXmpSerializer {
    fn serialize(&self, meta: &XmpMeta) -> BackendResult<String> {
        Ok(serde_json::to_string(meta).context("failed to serialize XMP")?)
    }
}
