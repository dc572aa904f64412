//! Entry points of the engine, one per operation.

use std::str::FromStr;

use app_settings::ReconcilerSettings;
use core_types::tags::{exif, gps};
use core_types::{
    mime, CatalogRecord, Directory, DisplayMap, IptcDataSet, OverlayRecord, PageInfo, PanoramaInfo,
};
use tracing::{debug, info_span, warn};

use crate::backend::{Backends, PageSource};
use crate::error::{FetchError, Operation, Result};
use crate::{catalog, dates, overlay, reconcile, xmp, MetadataRequest};

/// Fields accepted by the single-date lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    DateTime,
    DateTimeDigitized,
    DateTimeOriginal,
    GpsDateStamp,
}

impl FromStr for DateField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "DateTime" => Ok(DateField::DateTime),
            "DateTimeDigitized" => Ok(DateField::DateTimeDigitized),
            "DateTimeOriginal" => Ok(DateField::DateTimeOriginal),
            "GPSDateStamp" => Ok(DateField::GpsDateStamp),
            _ => Err(format!("unsupported date field `{s}`")),
        }
    }
}

/// Runs operations against a set of backends.
#[derive(Clone, Default)]
pub struct MetadataFetcher {
    backends: Backends,
    settings: ReconcilerSettings,
}

impl MetadataFetcher {
    pub fn new(backends: Backends, settings: ReconcilerSettings) -> Self {
        Self { backends, settings }
    }

    pub fn settings(&self) -> &ReconcilerSettings {
        &self.settings
    }

    /// Every directory of the item. Fails when nothing at all was found.
    pub fn all_metadata(&self, request: &MetadataRequest) -> Result<DisplayMap> {
        let operation = Operation::AllMetadata;
        let item = request.item(operation)?;
        let _span = info_span!("all_metadata", mime_type = %item.mime_type, uri = %item.uri).entered();

        let map = reconcile::resolve(&self.backends, &item, &self.settings);
        if map.is_empty() {
            return Err(FetchError::empty(operation, &item));
        }
        debug!("found {} directories", map.len());
        Ok(map)
    }

    /// Catalog fields. An empty record is a valid answer.
    pub fn catalog_metadata(&self, request: &MetadataRequest) -> Result<CatalogRecord> {
        let item = request.item(Operation::CatalogMetadata)?;
        let _span = info_span!("catalog_metadata", mime_type = %item.mime_type, uri = %item.uri).entered();
        Ok(catalog::resolve(&self.backends, &item, &self.settings))
    }

    pub fn overlay_metadata(&self, request: &MetadataRequest) -> Result<OverlayRecord> {
        let item = request.item(Operation::OverlayMetadata)?;
        let _span = info_span!("overlay_metadata", mime_type = %item.mime_type, uri = %item.uri).entered();
        Ok(overlay::resolve(&self.backends, &item))
    }

    /// Pages of HEIC, motion photo JPEG and TIFF items; `None` for other types.
    pub fn multi_page_info(&self, request: &MetadataRequest) -> Result<Option<Vec<PageInfo>>> {
        let operation = Operation::MultiPageInfo;
        let item = request.sized_item(operation)?;
        let _span = info_span!("multi_page_info", mime_type = %item.mime_type, uri = %item.uri).entered();

        let source = match item.mime_type.as_str() {
            mime::HEIC | mime::HEIF => PageSource::HeicTracks,
            mime::JPEG => PageSource::MotionPhoto,
            mime::TIFF => PageSource::TiffPages,
            _ => return Ok(None),
        };
        match self.backends.pages(&item, source) {
            Ok(pages) if !pages.is_empty() => Ok(Some(pages)),
            Ok(_) => Err(FetchError::empty(operation, &item)),
            Err(err) => {
                warn!("failed to get pages: {err}");
                Err(FetchError::empty(operation, &item))
            }
        }
    }

    /// GPano geometry from the item's XMP directories.
    pub fn panorama_info(&self, request: &MetadataRequest) -> Result<PanoramaInfo> {
        let operation = Operation::PanoramaInfo;
        let item = request.item(operation)?;
        let _span = info_span!("panorama_info", mime_type = %item.mime_type, uri = %item.uri).entered();

        if !mime::handled_by_directory_backend(&item.mime_type) {
            return Err(FetchError::empty(operation, &item));
        }
        match self.backends.read_directories(&item) {
            Ok(dirs) => Ok(panorama_from(&dirs)),
            Err(err) => {
                warn!("failed to read XMP: {err}");
                Err(FetchError::empty(operation, &item))
            }
        }
    }

    /// IPTC data sets of JPEG and TIFF items; `None` for other types.
    pub fn iptc(&self, request: &MetadataRequest) -> Result<Option<Vec<IptcDataSet>>> {
        let operation = Operation::Iptc;
        let item = request.item(operation)?;
        let _span = info_span!("iptc", mime_type = %item.mime_type, uri = %item.uri).entered();

        if !mime::handled_by_iptc_reader(&item.mime_type) {
            return Ok(None);
        }
        self.backends
            .read_iptc(&item)
            .map(Some)
            .map_err(|err| FetchError::backend(operation, &item, err))
    }

    /// Serialized XMP packets, one per XMP directory; `None` for types the
    /// tag-directory backend does not parse.
    pub fn xmp(&self, request: &MetadataRequest) -> Result<Option<Vec<String>>> {
        let operation = Operation::Xmp;
        let item = request.item(operation)?;
        let _span = info_span!("xmp", mime_type = %item.mime_type, uri = %item.uri).entered();

        if !mime::handled_by_directory_backend(&item.mime_type) {
            return Ok(None);
        }
        let dirs = self
            .backends
            .read_directories(&item)
            .map_err(|err| FetchError::backend(operation, &item, err))?;
        dirs.iter()
            .filter_map(Directory::xmp_meta)
            .map(|meta| {
                self.backends
                    .serialize_xmp(meta)
                    .map_err(|err| FetchError::backend(operation, &item, err))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// A single date field, in milliseconds since the epoch.
    pub fn date(&self, request: &MetadataRequest) -> Result<Option<i64>> {
        let operation = Operation::Date;
        let item = request.item(operation)?;
        let raw_field = request
            .field
            .as_deref()
            .ok_or(FetchError::MissingArguments { operation })?;
        let _span = info_span!("date", mime_type = %item.mime_type, uri = %item.uri, field = raw_field).entered();

        let field: DateField = raw_field.parse().map_err(|_| FetchError::UnsupportedField {
            operation,
            field: raw_field.to_string(),
        })?;
        if !mime::handled_by_directory_backend(&item.mime_type) {
            return Ok(None);
        }
        match self.backends.read_directories(&item) {
            Ok(dirs) => Ok(date_from(&dirs, field)),
            Err(err) => {
                warn!("failed to read directories: {err}");
                Ok(None)
            }
        }
    }
}

fn panorama_from(dirs: &[Directory]) -> PanoramaInfo {
    let mut info = PanoramaInfo::default();
    let mut projection_type = None;
    for meta in dirs.iter().filter_map(Directory::xmp_meta) {
        let fill = |slot: &mut Option<i64>, path: &str| {
            if slot.is_none() {
                *slot = meta.int(path);
            }
        };
        fill(&mut info.cropped_area_left, xmp::GPANO_CROPPED_AREA_LEFT);
        fill(&mut info.cropped_area_top, xmp::GPANO_CROPPED_AREA_TOP);
        fill(&mut info.cropped_area_width, xmp::GPANO_CROPPED_AREA_WIDTH);
        fill(&mut info.cropped_area_height, xmp::GPANO_CROPPED_AREA_HEIGHT);
        fill(&mut info.full_pano_width, xmp::GPANO_FULL_PANO_WIDTH);
        fill(&mut info.full_pano_height, xmp::GPANO_FULL_PANO_HEIGHT);
        if projection_type.is_none() {
            projection_type = meta.value(xmp::GPANO_PROJECTION_TYPE).map(str::to_string);
        }
    }
    if let Some(projection_type) = projection_type {
        info.projection_type = projection_type;
    }
    info
}

fn date_from(dirs: &[Directory], field: DateField) -> Option<i64> {
    let tag = match field {
        DateField::DateTime => exif::DATETIME,
        DateField::DateTimeDigitized => exif::DATETIME_DIGITIZED,
        DateField::DateTimeOriginal => exif::DATETIME_ORIGINAL,
        DateField::GpsDateStamp => {
            return dirs
                .iter()
                .filter(|dir| dir.kind == core_types::DirectoryKind::Gps)
                .find_map(|dir| {
                    let date_stamp = dir.string(gps::DATE_STAMP)?;
                    dates::gps_date_millis(&date_stamp, dir.rationals(gps::TIME_STAMP))
                });
        }
    };
    dirs.iter()
        .filter(|dir| dir.kind.is_exif())
        .find_map(|dir| dir.string(tag).and_then(|raw| dates::exif_date_millis(&raw)))
}
