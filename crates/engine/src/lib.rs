//! Metadata aggregation engine.
//!
//! Reconciles the output of several extraction backends into a browsable
//! display map, a catalog record and an overlay record. Backends are
//! consumed through the traits in [`backend`]; logging goes through
//! `tracing`, so the caller's subscriber decides where it ends up.

use serde::{Deserialize, Serialize};

pub mod backend;
pub mod catalog;
pub mod dates;
pub mod error;
pub mod exif_reader;
pub mod fetcher;
pub mod geo;
pub mod media;
pub mod orientation;
pub mod overlay;
pub mod reconcile;
pub mod snapshot;
pub mod xmp;

pub use backend::{BackendError, BackendResult, Backends};
pub use error::{FetchError, Operation, Result};
pub use fetcher::{DateField, MetadataFetcher};

/// Identifies one media item for the backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub mime_type: String,
    /// Opaque locator, resolved by the backends.
    pub uri: String,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    /// Local path, when known. Only used to recognize TIFF files by extension.
    #[serde(default)]
    pub path: Option<String>,
}

impl MediaItem {
    pub fn new(mime_type: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            uri: uri.into(),
            size_bytes: None,
            path: None,
        }
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Arguments of an operation as decoded by the request layer. Every field
/// may be missing; each operation checks what it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataRequest {
    pub mime_type: Option<String>,
    pub uri: Option<String>,
    pub size_bytes: Option<u64>,
    pub path: Option<String>,
    pub field: Option<String>,
}

impl MetadataRequest {
    pub fn for_item(item: &MediaItem) -> Self {
        Self {
            mime_type: Some(item.mime_type.clone()),
            uri: Some(item.uri.clone()),
            size_bytes: item.size_bytes,
            path: item.path.clone(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// The item, if mime type and uri are present.
    pub fn item(&self, operation: Operation) -> Result<MediaItem> {
        match (&self.mime_type, &self.uri) {
            (Some(mime_type), Some(uri)) => Ok(MediaItem {
                mime_type: mime_type.clone(),
                uri: uri.clone(),
                size_bytes: self.size_bytes,
                path: self.path.clone(),
            }),
            _ => Err(FetchError::MissingArguments { operation }),
        }
    }

    /// Like [`MetadataRequest::item`], also requiring the size.
    pub fn sized_item(&self, operation: Operation) -> Result<MediaItem> {
        let item = self.item(operation)?;
        if item.size_bytes.is_none() {
            return Err(FetchError::MissingArguments { operation });
        }
        Ok(item)
    }
}
