//! Overlay Field Resolver: camera exposure fields of photos.

use core_types::tags::exif;
use core_types::{mime, DirectoryKind, Directory, OverlayRecord, Rational};
use tracing::warn;

use crate::backend::{Backends, ExifField, ExifTags};
use crate::MediaItem;

/// Exposure time for display. Sub-second values are shown as `1/n`,
/// longer ones in seconds (`2″`).
pub fn format_exposure_time(value: Rational) -> String {
    let Rational {
        numerator,
        denominator,
    } = value;
    if numerator >= denominator {
        format!("{}″", value.to_simple_string(true))
    } else if numerator != 1 && numerator != 0 {
        let reciprocal = (denominator as f64 / numerator as f64).round() as i64;
        Rational::new(1, reciprocal).to_string()
    } else {
        value.to_string()
    }
}

pub fn resolve(backends: &Backends, item: &MediaItem) -> OverlayRecord {
    let mime_type = item.mime_type.as_str();
    let mut record = OverlayRecord::default();
    if mime::is_video(mime_type) {
        return record;
    }

    let mut found_exif = false;
    if mime::handled_by_directory_backend(mime_type) {
        match backends.read_directories(item) {
            Ok(dirs) => {
                let (primary, exif_found) = primary_pass(&dirs);
                record.merge(primary);
                found_exif = exif_found;
            }
            Err(err) => warn!("failed to read directories for uri={}: {err}", item.uri),
        }
    }

    if !found_exif && mime::handled_by_exif_reader(mime_type) {
        match backends.open_exif(item) {
            Ok(exif) => record.merge(exif_fallback_pass(exif.as_ref())),
            Err(err) => warn!("failed to read EXIF for uri={}: {err}", item.uri),
        }
    }

    record
}

/// Fields from the EXIF SubIFD directories, and whether there were any.
pub fn primary_pass(dirs: &[Directory]) -> (OverlayRecord, bool) {
    let mut record = OverlayRecord::default();
    let mut found_exif = false;
    for dir in dirs.iter().filter(|dir| dir.kind == DirectoryKind::ExifSubIfd) {
        found_exif = true;
        record.merge(OverlayRecord {
            aperture: dir.rational(exif::FNUMBER).and_then(decimal),
            exposure_time: dir.rational(exif::EXPOSURE_TIME).map(format_exposure_time),
            focal_length: dir.rational(exif::FOCAL_LENGTH).and_then(decimal),
            iso: dir.int(exif::ISO_EQUIVALENT),
        });
    }
    (record, found_exif)
}

pub fn exif_fallback_pass(exif: &dyn ExifTags) -> OverlayRecord {
    OverlayRecord {
        aperture: exif.double(ExifField::FNumber).filter(|v| v.is_finite()),
        exposure_time: exif.rational(ExifField::ExposureTime).map(format_exposure_time),
        focal_length: exif.double(ExifField::FocalLength).filter(|v| v.is_finite()),
        iso: exif.int(ExifField::PhotographicSensitivity),
    }
}

fn decimal(value: Rational) -> Option<f64> {
    Some(value.to_f64()).filter(|v| v.is_finite())
}
