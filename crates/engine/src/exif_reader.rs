//! EXIF-only reader backed by kamadak-exif.

use std::fs;
use std::io::BufReader;

use anyhow::Context as _;
use core_types::{names, DirectoryMap, DisplayMap, Rational};
use exif::{Context, Exif, Field, In, Reader, Tag, Value};

use crate::backend::{BackendResult, ExifField, ExifReader, ExifTags};
use crate::{dates, geo, MediaItem};

const XMP_TAG_NUMBER: u16 = 0x02bc;

/// Reads EXIF from the item's local path (or its uri, taken as a path).
#[derive(Debug, Default, Clone, Copy)]
pub struct KamadakExifReader;

impl KamadakExifReader {
    pub fn new() -> Self {
        Self
    }
}

impl ExifReader for KamadakExifReader {
    fn open(&self, item: &MediaItem) -> BackendResult<Box<dyn ExifTags>> {
        let path = item.path.as_deref().unwrap_or(&item.uri);
        let file = fs::File::open(path).with_context(|| format!("failed to open {path} for EXIF parsing"))?;
        let mut reader = BufReader::new(file);
        let exif = Reader::new()
            .read_from_container(&mut reader)
            .with_context(|| format!("failed to parse EXIF of {path}"))?;
        Ok(Box::new(KamadakExif(exif)))
    }
}

pub struct KamadakExif(pub Exif);

impl KamadakExif {
    fn field(&self, field: ExifField) -> Option<&Field> {
        self.0.get_field(tag_of(field), In::PRIMARY)
    }

    fn directory_name(field: &Field) -> &'static str {
        if field.tag.number() == XMP_TAG_NUMBER {
            return names::XMP;
        }
        if field.ifd_num == In::THUMBNAIL {
            return "Exif Thumbnail";
        }
        match field.tag.context() {
            Context::Exif => "Exif SubIFD",
            Context::Gps => "GPS",
            Context::Interop => "Interoperability",
            _ => "Exif IFD0",
        }
    }
}

impl ExifTags for KamadakExif {
    fn describe_all(&self) -> DisplayMap {
        let mut all = DisplayMap::new();
        for field in self.0.fields() {
            let dir_name = Self::directory_name(field);
            let description = if dir_name == names::XMP {
                match &field.value {
                    Value::Byte(bytes) | Value::Undefined(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
                    _ => field.display_value().to_string(),
                }
            } else {
                field.display_value().with_unit(&self.0).to_string()
            };
            all.entry(dir_name.to_string())
                .or_insert_with(DirectoryMap::new)
                .insert(field.tag.to_string(), description);
        }
        all
    }

    fn date_millis(&self, field: ExifField) -> Option<i64> {
        let raw = ascii(&self.field(field)?.value)?;
        dates::exif_date_millis(&raw)
    }

    fn int(&self, field: ExifField) -> Option<i64> {
        let value = &self.field(field)?.value;
        match value {
            Value::SByte(v) => v.first().map(|n| i64::from(*n)),
            Value::SShort(v) => v.first().map(|n| i64::from(*n)),
            Value::SLong(v) => v.first().map(|n| i64::from(*n)),
            _ => value.get_uint(0).map(i64::from),
        }
    }

    fn double(&self, field: ExifField) -> Option<f64> {
        let value = &self.field(field)?.value;
        match value {
            Value::Rational(v) => v.first().map(|r| r.to_f64()),
            Value::SRational(v) => v.first().map(|r| r.to_f64()),
            Value::Float(v) => v.first().map(|n| f64::from(*n)),
            Value::Double(v) => v.first().copied(),
            _ => value.get_uint(0).map(f64::from),
        }
        .filter(|n| n.is_finite())
    }

    fn rational(&self, field: ExifField) -> Option<Rational> {
        rational(&self.field(field)?.value)
    }

    fn lat_long(&self) -> Option<(f64, f64)> {
        let coordinate = |value_tag: Tag, ref_tag: Tag| {
            let components = rationals(&self.0.get_field(value_tag, In::PRIMARY)?.value)?;
            let reference = ascii(&self.0.get_field(ref_tag, In::PRIMARY)?.value)?;
            geo::gps_coordinate(&components, Some(reference.as_str()))
        };
        Some((
            coordinate(Tag::GPSLatitude, Tag::GPSLatitudeRef)?,
            coordinate(Tag::GPSLongitude, Tag::GPSLongitudeRef)?,
        ))
    }
}

fn tag_of(field: ExifField) -> Tag {
    match field {
        ExifField::DateTime => Tag::DateTime,
        ExifField::DateTimeOriginal => Tag::DateTimeOriginal,
        ExifField::DateTimeDigitized => Tag::DateTimeDigitized,
        ExifField::Orientation => Tag::Orientation,
        ExifField::FNumber => Tag::FNumber,
        ExifField::ExposureTime => Tag::ExposureTime,
        ExifField::FocalLength => Tag::FocalLength,
        ExifField::PhotographicSensitivity => Tag::PhotographicSensitivity,
    }
}

fn ascii(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(values) => values
            .first()
            .and_then(|raw| std::str::from_utf8(raw).ok())
            .map(|s| s.trim_matches('\u{0}').trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn rational(value: &Value) -> Option<Rational> {
    rationals(value)?.first().copied()
}

fn rationals(value: &Value) -> Option<Vec<Rational>> {
    let converted: Vec<Rational> = match value {
        Value::Rational(v) => v
            .iter()
            .map(|r| Rational::new(i64::from(r.num), i64::from(r.denom)))
            .collect(),
        Value::SRational(v) => v
            .iter()
            .map(|r| Rational::new(i64::from(r.num), i64::from(r.denom)))
            .collect(),
        _ => return None,
    };
    Some(converted).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Little-endian TIFF with an IFD0 holding Orientation=6 and a DateTime.
    fn tiff_bytes() -> Vec<u8> {
        let mut data = vec![0x49, 0x49, 0x2a, 0x00, 0x08, 0x00, 0x00, 0x00];
        data.extend_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(&0x0112u16.to_le_bytes());
        data.extend_from_slice(&3u16.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&[6, 0, 0, 0]);
        data.extend_from_slice(&0x0132u16.to_le_bytes());
        data.extend_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(&20u32.to_le_bytes());
        data.extend_from_slice(&38u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(b"2021:03:04 05:06:07\0");
        data
    }

    fn parsed() -> KamadakExif {
        KamadakExif(Reader::new().read_raw(tiff_bytes()).unwrap())
    }

    #[test]
    fn typed_getters_read_primary_ifd() {
        let exif = parsed();
        assert_eq!(exif.int(ExifField::Orientation), Some(6));
        assert_eq!(exif.rotation_degrees(), 90);
        assert!(!exif.is_flipped());
        assert_eq!(exif.date_millis(ExifField::DateTime), Some(1_614_834_367_000));
        assert_eq!(exif.date_millis(ExifField::DateTimeOriginal), None);
        assert_eq!(exif.lat_long(), None);
    }

    #[test]
    fn dump_groups_fields_by_directory() {
        let all = parsed().describe_all();
        let ifd0 = &all["Exif IFD0"];
        assert!(ifd0.contains_key("Orientation"));
        assert!(ifd0.contains_key("DateTime"));
        assert_eq!(all.len(), 1);
    }
}
