//! Catalog Field Resolver.
//!
//! Three passes, each producing a partial record folded into the result in
//! precedence order: the primary backend's directories, the EXIF-only reader
//! (when the primary backend found no EXIF) and the container properties of
//! videos and HEIC files. A field set by an earlier pass is never replaced;
//! flags are the union of every pass.

use app_settings::ReconcilerSettings;
use core_types::tags::{exif, file_type, iptc, png, webp};
use core_types::{mime, names, CatalogRecord, Directory, DirectoryKind, MetadataFlags};
use tracing::{debug, warn};

use crate::backend::{Backends, ExifField, ExifTags, MediaProperties};
use crate::media::{self, MediaKey};
use crate::reconcile::{self, SPHERICAL_VIDEO_UUID};
use crate::{dates, geo, orientation, xmp, MediaItem};

pub fn resolve(backends: &Backends, item: &MediaItem, settings: &ReconcilerSettings) -> CatalogRecord {
    let mime_type = item.mime_type.as_str();
    let mut record = CatalogRecord::default();
    let mut found_exif = false;

    if mime::handled_by_directory_backend(mime_type) {
        match backends.read_directories(item) {
            Ok(dirs) => {
                let (primary, exif_found) = primary_pass(&dirs, item, settings);
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

    if mime::is_video(mime_type) || mime::is_heic(mime_type) {
        match backends.open_media(item) {
            Ok(props) => record.merge(media_pass(props.as_ref(), mime_type)),
            Err(err) => warn!("failed to read media properties for uri={}: {err}", item.uri),
        }
    }

    if mime_type == mime::TIFF {
        match backends.tiff_page_count(item) {
            Ok(count) if count > 1 => record.flags |= MetadataFlags::MULTIPAGE,
            Ok(_) => {}
            Err(err) => warn!("failed to count TIFF pages for uri={}: {err}", item.uri),
        }
    }

    record
}

/// Fields derived from the primary backend, and whether it found any EXIF.
pub fn primary_pass(
    dirs: &[Directory],
    item: &MediaItem,
    settings: &ReconcilerSettings,
) -> (CatalogRecord, bool) {
    let mime_type = item.mime_type.as_str();
    let mut record = CatalogRecord::default();
    let found_exif = dirs.iter().any(|dir| dir.kind.is_exif());
    let of_kind = |kind: DirectoryKind| dirs.iter().filter(move |dir| dir.kind == kind);

    record.mime_type_override = mime_type_override(dirs, item.path.as_deref());

    let exif_date = |dir: &Directory, id: u32| dir.string(id).and_then(|raw| dates::exif_date_millis(&raw));
    record.date_millis = of_kind(DirectoryKind::ExifSubIfd)
        .find_map(|dir| exif_date(dir, exif::DATETIME_ORIGINAL))
        .or_else(|| of_kind(DirectoryKind::ExifIfd0).find_map(|dir| exif_date(dir, exif::DATETIME)));

    if let Some(code) = of_kind(DirectoryKind::ExifIfd0).find_map(|dir| dir.int(exif::ORIENTATION)) {
        record.rotation_degrees = Some(orientation::rotation_degrees(code));
        if orientation::is_flipped(code) {
            record.flags |= MetadataFlags::FLIPPED;
        }
    }

    if let Some((latitude, longitude)) = of_kind(DirectoryKind::Gps).find_map(geo::gps_location) {
        record.set_location_if_absent(latitude, longitude);
    }

    for dir in dirs.iter().filter(|dir| dir.kind.is_xmp()) {
        let Some(meta) = dir.xmp_meta() else {
            warn!("failed to read XMP directory for uri={}", item.uri);
            continue;
        };
        if record.xmp_subjects.is_none() && meta.exists(xmp::SUBJECT) {
            record.xmp_subjects = Some(meta.array_items(xmp::SUBJECT).join(&settings.subjects_separator));
        }
        if record.xmp_title_description.is_none() {
            record.xmp_title_description = xmp::non_blank_localized_text(meta, xmp::TITLE)
                .or_else(|| xmp::non_blank_localized_text(meta, xmp::DESCRIPTION));
        }
        if record.date_millis.is_none() {
            record.date_millis = xmp::date_millis(meta, xmp::CREATE_DATE)
                .or_else(|| xmp::date_millis(meta, xmp::PS_DATE_CREATED));
        }
        if meta.is_panorama() {
            record.flags |= MetadataFlags::SPHERICAL;
        }
        if meta.is_motion_photo() {
            record.flags |= MetadataFlags::MULTIPAGE;
        }
    }

    if record.xmp_subjects.is_none() {
        record.xmp_subjects = of_kind(DirectoryKind::Iptc)
            .find_map(|dir| dir.strings(iptc::KEYWORDS))
            .map(|keywords| keywords.join(&settings.subjects_separator));
    }

    match mime_type {
        mime::PNG if record.date_millis.is_none() => {
            record.date_millis = of_kind(DirectoryKind::Png)
                .filter(|dir| dir.name == names::PNG_TIME)
                .filter_map(|dir| dir.string(png::LAST_MODIFICATION_TIME))
                .find_map(|raw| match dates::png_date_millis(&raw) {
                    Ok(millis) => Some(millis),
                    Err(err) => {
                        warn!("failed to parse PNG date={raw} for uri={}: {err}", item.uri);
                        None
                    }
                });
        }
        mime::GIF => {
            if of_kind(DirectoryKind::GifAnimation).next().is_some() {
                record.flags |= MetadataFlags::ANIMATED;
            }
        }
        mime::WEBP => {
            if of_kind(DirectoryKind::Webp).any(|dir| dir.boolean(webp::IS_ANIMATION) == Some(true)) {
                record.flags |= MetadataFlags::ANIMATED;
            }
        }
        mime::TIFF => {
            if of_kind(DirectoryKind::ExifIfd0).any(reconcile::is_geotiff) {
                record.flags |= MetadataFlags::GEOTIFF;
            }
        }
        _ => {}
    }

    let spherical_video = dirs.iter().any(|dir| {
        matches!(&dir.kind, DirectoryKind::UuidBox { uuid, .. } if uuid == SPHERICAL_VIDEO_UUID)
    });
    if spherical_video {
        record.flags |= MetadataFlags::SPHERICAL;
    }

    (record, found_exif)
}

/// The TIFF extension wins over detection, which is distrusted for the
/// types it confuses with others.
fn mime_type_override(dirs: &[Directory], path: Option<&str>) -> Option<String> {
    let mut file_type_dirs = dirs.iter().filter(|dir| dir.kind == DirectoryKind::FileType).peekable();
    file_type_dirs.peek()?;
    if path.is_some_and(mime::has_tiff_extension) {
        return Some(mime::TIFF.to_string());
    }
    file_type_dirs
        .filter_map(|dir| dir.string(file_type::DETECTED_MIME_TYPE))
        .find(|detected| detected != mime::TIFF && detected != mime::DVD)
}

/// Fields read through the EXIF-only reader.
pub fn exif_fallback_pass(exif: &dyn ExifTags) -> CatalogRecord {
    let mut record = CatalogRecord {
        date_millis: exif
            .date_millis(ExifField::DateTimeOriginal)
            .or_else(|| exif.date_millis(ExifField::DateTime)),
        ..Default::default()
    };
    if exif.int(ExifField::Orientation).is_some_and(|code| code != 0) {
        record.rotation_degrees = Some(exif.rotation_degrees());
        if exif.is_flipped() {
            record.flags |= MetadataFlags::FLIPPED;
        }
    }
    if let Some((latitude, longitude)) = exif.lat_long() {
        record.set_location_if_absent(latitude, longitude);
    }
    record
}

/// Fields read from container properties.
pub fn media_pass(props: &dyn MediaProperties, mime_type: &str) -> CatalogRecord {
    let mut record = CatalogRecord {
        rotation_degrees: media::int(props, MediaKey::VideoRotation).and_then(|r| i32::try_from(r).ok()),
        date_millis: media::date_millis(props),
        ..Default::default()
    };
    if let Some((latitude, longitude)) = media::location(props) {
        record.set_location_if_absent(latitude, longitude);
    }
    if mime::is_heic(mime_type) {
        if let Some(tracks) = media::int(props, MediaKey::TrackCount) {
            debug!("HEIC container has {tracks} tracks");
            if tracks > 1 {
                record.flags |= MetadataFlags::MULTIPAGE;
            }
        }
    }
    record
}
