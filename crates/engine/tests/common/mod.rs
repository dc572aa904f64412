#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::anyhow;
use core_types::{Directory, DirectoryKind, DirectoryMap, DisplayMap, Rational, Tag, XmpMeta, XmpProperty};
use engine::backend::{
    BackendError, BackendResult, DirectoryExtractor, ExifField, ExifReader, ExifTags, ProfileKind,
};
use engine::snapshot::Snapshot;
use engine::{Backends, MediaItem, MetadataFetcher, MetadataRequest};

pub const URI: &str = "content://media/external/images/media/42";

pub fn request(mime_type: &str) -> MetadataRequest {
    MetadataRequest::for_item(&MediaItem::new(mime_type, URI))
}

pub fn dir(name: &str, kind: DirectoryKind, tags: &[(&str, &str)]) -> Directory {
    tags.iter()
        .enumerate()
        .fold(Directory::new(name, kind), |dir, (i, (key, value))| {
            dir.with_tag(Tag::new(i as u32 + 1, *key, *value))
        })
}

pub fn xmp_dir(props: &[(&str, &str)]) -> Directory {
    let meta = XmpMeta::new(
        props
            .iter()
            .map(|(path, value)| XmpProperty::new("http://ns.example/", *path, Some(*value)))
            .collect(),
    );
    Directory::new("XMP", DirectoryKind::Xmp { meta: Some(meta) })
        .with_tag(Tag::new(0xffff, "XMP Value Count", &props.len().to_string()))
}

pub fn snapshot(directories: Vec<Directory>) -> Snapshot {
    Snapshot {
        directories: Some(directories),
        ..Default::default()
    }
}

pub fn fetcher(backends: Backends) -> MetadataFetcher {
    MetadataFetcher::new(backends, Default::default())
}

/// EXIF-only reader answering from fixed values.
#[derive(Debug, Clone, Default)]
pub struct FakeExif {
    pub dump: DisplayMap,
    pub dates: BTreeMap<&'static str, i64>,
    pub orientation: Option<i64>,
    pub f_number: Option<f64>,
    pub exposure_time: Option<Rational>,
    pub iso: Option<i64>,
    pub lat_long: Option<(f64, f64)>,
}

impl FakeExif {
    pub fn with_dump(mut self, dir_name: &str, tags: &[(&str, &str)]) -> Self {
        let dir: DirectoryMap = tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self.dump.insert(dir_name.to_string(), dir);
        self
    }

    pub fn into_backends(self, backends: Backends) -> Backends {
        backends.with_exif(Arc::new(self))
    }
}

fn field_name(field: ExifField) -> &'static str {
    match field {
        ExifField::DateTime => "DateTime",
        ExifField::DateTimeOriginal => "DateTimeOriginal",
        ExifField::DateTimeDigitized => "DateTimeDigitized",
        _ => "",
    }
}

impl ExifReader for FakeExif {
    fn open(&self, _item: &MediaItem) -> BackendResult<Box<dyn ExifTags>> {
        Ok(Box::new(self.clone()))
    }
}

impl ExifTags for FakeExif {
    fn describe_all(&self) -> DisplayMap {
        self.dump.clone()
    }

    fn date_millis(&self, field: ExifField) -> Option<i64> {
        self.dates.get(field_name(field)).copied()
    }

    fn int(&self, field: ExifField) -> Option<i64> {
        match field {
            ExifField::Orientation => self.orientation,
            ExifField::PhotographicSensitivity => self.iso,
            _ => None,
        }
    }

    fn double(&self, field: ExifField) -> Option<f64> {
        match field {
            ExifField::FNumber => self.f_number,
            _ => None,
        }
    }

    fn rational(&self, field: ExifField) -> Option<Rational> {
        match field {
            ExifField::ExposureTime => self.exposure_time,
            _ => None,
        }
    }

    fn lat_long(&self) -> Option<(f64, f64)> {
        self.lat_long
    }
}

/// Tag-directory extractor that always fails to read.
pub struct BrokenDirectories;

impl DirectoryExtractor for BrokenDirectories {
    fn read_directories(&self, _item: &MediaItem) -> BackendResult<Vec<Directory>> {
        Err(BackendError::Read(anyhow!("unexpected end of stream")))
    }

    fn read_profile(&self, _kind: ProfileKind, _bytes: &[u8]) -> BackendResult<Vec<Directory>> {
        Err(BackendError::Read(anyhow!("unexpected end of stream")))
    }
}
