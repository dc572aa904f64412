//! Builds the display map from the primary backend's directories, then
//! merges the EXIF-only reader and container media properties in.

mod png;
mod tiff;
mod uuid_box;

pub use uuid_box::{PROFILE_UUID, SPHERICAL_VIDEO_UUID, USER_MEDIA_UUID};

use std::collections::HashMap;

use app_settings::ReconcilerSettings;
use core_types::tags::xmp as xmp_tags;
use core_types::{mime, names, Directory, DirectoryKind, DirectoryMap, DisplayMap};
use tracing::{debug, warn};

use crate::backend::{Backends, DirectoryExtractor};
use crate::{media, xmp, MediaItem};

pub(crate) use tiff::is_geotiff;

const XMP_VALUE_COUNT_NAME: &str = "XMP Value Count";

/// Outcome of reconciling the primary backend's directories.
#[derive(Debug, Default)]
pub struct Reconciled {
    pub map: DisplayMap,
    pub found_exif: bool,
    pub found_xmp: bool,
}

/// Builds the full display map for an item. Backend failures are logged and
/// leave the map with whatever the other backends contributed.
pub fn resolve(backends: &Backends, item: &MediaItem, settings: &ReconcilerSettings) -> DisplayMap {
    let mime_type = item.mime_type.as_str();
    let mut reconciled = Reconciled::default();

    if mime::handled_by_directory_backend(mime_type) {
        let primary = backends
            .directory_extractor()
            .and_then(|extractor| Ok((extractor, extractor.read_directories(item)?)));
        match primary {
            Ok((extractor, dirs)) => {
                reconciled = reconcile_directories(&dirs, mime_type, settings, extractor);
            }
            Err(err) => warn!("failed to read directories for uri={}: {err}", item.uri),
        }
    }

    if !reconciled.found_exif && mime::handled_by_exif_reader(mime_type) {
        match backends.open_exif(item) {
            Ok(exif) => merge_exif_fallback(&mut reconciled.map, exif.describe_all(), reconciled.found_xmp),
            Err(err) => warn!("failed to read EXIF for uri={}: {err}", item.uri),
        }
    }

    if mime::is_video(mime_type) {
        match backends.open_media(item) {
            Ok(props) => add_media_directory(&mut reconciled.map, media::describe_all(props.as_ref())),
            Err(err) => warn!("failed to read media properties for uri={}: {err}", item.uri),
        }
    }

    reconciled.map
}

/// Applies naming, merging, splitting and format rewrites to the directories
/// of one item.
pub fn reconcile_directories(
    dirs: &[Directory],
    mime_type: &str,
    settings: &ReconcilerSettings,
    extractor: &dyn DirectoryExtractor,
) -> Reconciled {
    let mut reconciled = Reconciled {
        map: DisplayMap::new(),
        found_exif: dirs.iter().any(|dir| dir.kind.is_exif()),
        found_xmp: dirs.iter().any(|dir| dir.kind.is_xmp()),
    };
    let map = &mut reconciled.map;
    let mut uuid_counts: HashMap<String, usize> = HashMap::new();

    for (base_name, same_name_dirs) in group_by_name(dirs) {
        if settings.is_redundant(base_name) {
            debug!("skipping redundant directory {base_name}");
            continue;
        }
        let same_name_count = same_name_dirs.len();
        for (index, dir) in same_name_dirs.into_iter().enumerate() {
            let mut display_name = base_name.to_string();
            if let DirectoryKind::UuidBox { uuid, .. } = &dir.kind {
                let prefix = uuid_box::uuid_prefix(uuid);
                display_name = format!("{display_name} {prefix}");
                let count = uuid_counts.entry(prefix.to_string()).or_insert(0);
                if *count > 0 {
                    display_name = format!("{display_name} ({count})");
                }
                *count += 1;
            } else if same_name_count > 1 && !settings.is_mergeable(base_name) {
                display_name = format!("{display_name}[{}]", index + 1);
            }
            if let Some(parent) = &dir.parent {
                display_name = format!("{parent}/{display_name}");
            }

            populate(map, &display_name, dir, mime_type, extractor);

            if let DirectoryKind::UuidBox { uuid, user_data } = &dir.kind {
                rewrite_uuid_box(map, &display_name, uuid, user_data);
            }
        }
    }
    reconciled
}

/// Directories with tags, grouped by raw name in order of first appearance.
fn group_by_name(dirs: &[Directory]) -> Vec<(&str, Vec<&Directory>)> {
    let mut groups: Vec<(&str, Vec<&Directory>)> = Vec::new();
    for dir in dirs {
        if dir.tags.is_empty() || dir.kind.is_bookkeeping() {
            continue;
        }
        match groups.iter_mut().find(|(name, _)| *name == dir.name) {
            Some((_, group)) => group.push(dir),
            None => groups.push((dir.name.as_str(), vec![dir])),
        }
    }
    groups
}

fn populate(
    map: &mut DisplayMap,
    display_name: &str,
    dir: &Directory,
    mime_type: &str,
    extractor: &dyn DirectoryExtractor,
) {
    let tiff_layout = mime_type == mime::TIFF
        && matches!(dir.kind, DirectoryKind::ExifIfd0 | DirectoryKind::ExifThumbnail);

    if tiff_layout {
        if dir.kind == DirectoryKind::ExifIfd0 && tiff::is_geotiff(dir) {
            let (geotiff, plain): (Vec<_>, Vec<_>) =
                dir.tags.iter().partition(|tag| tiff::is_geotiff_tag(tag.id));
            let geotiff_map = map.entry(names::GEOTIFF.to_string()).or_default();
            geotiff_map.extend(geotiff.into_iter().map(|tag| (tiff::tag_key(tag), tag.description.clone())));
            let dir_map = map.entry(display_name.to_string()).or_default();
            dir_map.extend(plain.into_iter().map(|tag| (tiff::tag_key(tag), tag.description.clone())));
        } else {
            let dir_map = map.entry(display_name.to_string()).or_default();
            dir_map.extend(dir.tags.iter().map(|tag| (tiff::tag_key(tag), tag.description.clone())));
        }
        return;
    }

    if png::is_text_dir(dir) {
        png::populate(map, dir, extractor);
        return;
    }

    let dir_map = map.entry(display_name.to_string()).or_default();
    dir_map.extend(dir.tags.iter().map(|tag| (tag.key(), tag.description.clone())));

    if dir.kind.is_xmp() {
        add_xmp_properties(dir_map, dir);
    }
}

fn add_xmp_properties(dir_map: &mut DirectoryMap, dir: &Directory) {
    match dir.xmp_meta() {
        Some(meta) => {
            for prop in meta.iter() {
                if prop.path.is_empty() {
                    continue;
                }
                let value = if xmp::is_data_path(&prop.path) {
                    Some(xmp::SKIPPED_VALUE)
                } else {
                    prop.value.as_deref()
                };
                if let Some(value) = value.filter(|v| !v.is_empty()) {
                    dir_map.insert(prop.path.clone(), value.to_string());
                }
            }
        }
        None => warn!("failed to read XMP properties of directory {}", dir.name),
    }
    let value_count_name = dir
        .tag_name(xmp_tags::VALUE_COUNT)
        .unwrap_or_else(|| XMP_VALUE_COUNT_NAME.to_string());
    dir_map.remove(&value_count_name);
}

fn rewrite_uuid_box(map: &mut DisplayMap, display_name: &str, uuid: &str, user_data: &[u8]) {
    match uuid {
        SPHERICAL_VIDEO_UUID => {
            map.remove(display_name);
            map.insert(
                names::SPHERICAL_VIDEO.to_string(),
                uuid_box::describe_spherical(user_data),
            );
        }
        PROFILE_UUID => {
            map.remove(display_name);
        }
        USER_MEDIA_UUID => {
            let blocks = uuid_box::parse_user_media(user_data);
            if !blocks.is_empty() {
                map.remove(display_name);
                let user_media = map.entry(names::QUICKTIME_USER_MEDIA.to_string()).or_default();
                uuid_box::insert_user_media(user_media, blocks);
            }
        }
        _ => {}
    }
}

/// Merges the EXIF-only reader's dump into the map without overwriting what
/// is already there. Its raw XMP entry is dropped when XMP was already found.
pub fn merge_exif_fallback(map: &mut DisplayMap, mut fallback: DisplayMap, found_xmp: bool) {
    if found_xmp {
        fallback.remove(names::XMP);
    }
    for (dir_name, tags) in fallback {
        let dir_map = map.entry(dir_name).or_default();
        for (key, value) in tags {
            dir_map.entry(key).or_insert(value);
        }
    }
}

/// Adds container properties under the media key, and a cover placeholder
/// when the container embeds a picture.
pub fn add_media_directory(map: &mut DisplayMap, media_dir: DirectoryMap) {
    if media_dir.is_empty() {
        return;
    }
    if media_dir.contains_key(media::HAS_EMBEDDED_PICTURE) {
        map.insert(
            names::COVER.to_string(),
            DirectoryMap::from([("Image".to_string(), "data".to_string())]),
        );
    }
    map.insert(names::MEDIA.to_string(), media_dir);
}
