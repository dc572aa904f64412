//! Contracts of the extraction backends the engine consumes.
//!
//! Backends own their input streams: each `read_*`/`open` call acquires and
//! releases whatever it needs before returning (or when the returned reader
//! is dropped).

use std::sync::Arc;

use core_types::{Directory, DisplayMap, IptcDataSet, PageInfo, Rational, XmpMeta};
use thiserror::Error;

use crate::media::MediaKey;
use crate::orientation;
use crate::MediaItem;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend (or a library it needs) is not present.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Read(#[from] anyhow::Error),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Kind of a profile embedded as hex text in a PNG text chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Exif,
    Iptc,
    Xmp,
}

/// The generic tag-directory extractor.
pub trait DirectoryExtractor: Send + Sync {
    fn read_directories(&self, item: &MediaItem) -> BackendResult<Vec<Directory>>;

    /// Parses a raw embedded profile into directories.
    fn read_profile(&self, kind: ProfileKind, bytes: &[u8]) -> BackendResult<Vec<Directory>>;
}

/// Tags the EXIF-only reader exposes through typed getters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExifField {
    DateTime,
    DateTimeOriginal,
    DateTimeDigitized,
    Orientation,
    FNumber,
    ExposureTime,
    FocalLength,
    PhotographicSensitivity,
}

pub trait ExifReader: Send + Sync {
    fn open(&self, item: &MediaItem) -> BackendResult<Box<dyn ExifTags>>;
}

/// An opened EXIF-only reader. Getters answer `None` unless the tag is
/// present and well-formed.
pub trait ExifTags {
    /// Every tag, grouped by directory name.
    fn describe_all(&self) -> DisplayMap;

    fn date_millis(&self, field: ExifField) -> Option<i64>;

    fn int(&self, field: ExifField) -> Option<i64>;

    fn double(&self, field: ExifField) -> Option<f64>;

    fn rational(&self, field: ExifField) -> Option<Rational>;

    fn lat_long(&self) -> Option<(f64, f64)>;

    fn rotation_degrees(&self) -> i32 {
        self.int(ExifField::Orientation)
            .map_or(0, orientation::rotation_degrees)
    }

    fn is_flipped(&self) -> bool {
        self.int(ExifField::Orientation)
            .is_some_and(orientation::is_flipped)
    }
}

/// The container media-properties reader.
pub trait MediaPropertiesReader: Send + Sync {
    fn open(&self, item: &MediaItem) -> BackendResult<Box<dyn MediaProperties>>;
}

pub trait MediaProperties {
    fn value(&self, key: MediaKey) -> BackendResult<Option<String>>;

    fn has_embedded_picture(&self) -> BackendResult<bool>;
}

/// Where the pages of a multi-page item come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    HeicTracks,
    MotionPhoto,
    TiffPages,
}

pub trait PageReader: Send + Sync {
    fn tiff_page_count(&self, item: &MediaItem) -> BackendResult<usize>;

    fn pages(&self, item: &MediaItem, source: PageSource) -> BackendResult<Vec<PageInfo>>;
}

pub trait IptcReader: Send + Sync {
    fn read_iptc(&self, item: &MediaItem) -> BackendResult<Vec<IptcDataSet>>;
}

pub trait XmpSerializer: Send + Sync {
    fn serialize(&self, meta: &XmpMeta) -> BackendResult<String>;
}

/// The set of backends available to the engine. Any of them may be missing.
#[derive(Clone, Default)]
pub struct Backends {
    pub directories: Option<Arc<dyn DirectoryExtractor>>,
    pub exif: Option<Arc<dyn ExifReader>>,
    pub media: Option<Arc<dyn MediaPropertiesReader>>,
    pub pages: Option<Arc<dyn PageReader>>,
    pub iptc: Option<Arc<dyn IptcReader>>,
    pub xmp: Option<Arc<dyn XmpSerializer>>,
}

impl Backends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directories(mut self, backend: Arc<dyn DirectoryExtractor>) -> Self {
        self.directories = Some(backend);
        self
    }

    pub fn with_exif(mut self, backend: Arc<dyn ExifReader>) -> Self {
        self.exif = Some(backend);
        self
    }

    pub fn with_media(mut self, backend: Arc<dyn MediaPropertiesReader>) -> Self {
        self.media = Some(backend);
        self
    }

    pub fn with_pages(mut self, backend: Arc<dyn PageReader>) -> Self {
        self.pages = Some(backend);
        self
    }

    pub fn with_iptc(mut self, backend: Arc<dyn IptcReader>) -> Self {
        self.iptc = Some(backend);
        self
    }

    pub fn with_xmp(mut self, backend: Arc<dyn XmpSerializer>) -> Self {
        self.xmp = Some(backend);
        self
    }

    pub fn directory_extractor(&self) -> BackendResult<&dyn DirectoryExtractor> {
        required(&self.directories, "tag-directory extractor")
    }

    pub fn read_directories(&self, item: &MediaItem) -> BackendResult<Vec<Directory>> {
        self.directory_extractor()?.read_directories(item)
    }

    pub fn open_exif(&self, item: &MediaItem) -> BackendResult<Box<dyn ExifTags>> {
        required(&self.exif, "EXIF reader")?.open(item)
    }

    pub fn open_media(&self, item: &MediaItem) -> BackendResult<Box<dyn MediaProperties>> {
        required(&self.media, "media properties reader")?.open(item)
    }

    pub fn tiff_page_count(&self, item: &MediaItem) -> BackendResult<usize> {
        required(&self.pages, "page reader")?.tiff_page_count(item)
    }

    pub fn pages(&self, item: &MediaItem, source: PageSource) -> BackendResult<Vec<PageInfo>> {
        required(&self.pages, "page reader")?.pages(item, source)
    }

    pub fn read_iptc(&self, item: &MediaItem) -> BackendResult<Vec<IptcDataSet>> {
        required(&self.iptc, "IPTC reader")?.read_iptc(item)
    }

    pub fn serialize_xmp(&self, meta: &XmpMeta) -> BackendResult<String> {
        required(&self.xmp, "XMP serializer")?.serialize(meta)
    }
}

fn required<'a, T: ?Sized>(backend: &'a Option<Arc<T>>, name: &str) -> BackendResult<&'a T> {
    backend
        .as_deref()
        .ok_or_else(|| BackendError::Unavailable(name.to_string()))
}
