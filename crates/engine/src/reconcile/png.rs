//! PNG textual chunks, including profiles embedded as hex text.

use core_types::tags::png;
use core_types::{names, Charset, Directory, DirectoryKind, DisplayMap};
use tracing::warn;

use crate::backend::{DirectoryExtractor, ProfileKind};

const EXIF_PREAMBLE: &[u8] = b"Exif\0\0";

pub fn is_text_dir(dir: &Directory) -> bool {
    dir.kind == DirectoryKind::Png
        && matches!(
            dir.name.as_str(),
            names::PNG_ITXT | names::PNG_TEXT | names::PNG_ZTXT
        )
}

/// Adds a PNG text directory to the shared textual data key. Pairs holding a
/// parsable embedded profile become their own directories instead.
pub fn populate(
    map: &mut DisplayMap,
    dir: &Directory,
    extractor: &dyn DirectoryExtractor,
) {
    let charset_override = (dir.name == names::PNG_ITXT).then_some(Charset::Utf8);
    let mut entries = Vec::new();
    for tag in &dir.tags {
        if tag.id != png::TEXTUAL_DATA {
            entries.push((tag.key(), tag.description.clone()));
            continue;
        }
        let Some(pairs) = dir.text_pairs(tag.id) else {
            continue;
        };
        for pair in pairs {
            let value = charset_override.unwrap_or(pair.charset).decode(&pair.bytes);
            let profile_dirs = embedded_profile(&pair.key, &value, extractor);
            if profile_dirs.is_empty() {
                entries.push((pair.key.clone(), value));
                continue;
            }
            for profile_dir in profile_dirs {
                let profile_map = map.entry(profile_dir.name.clone()).or_default();
                for profile_tag in &profile_dir.tags {
                    profile_map.insert(profile_tag.key(), profile_tag.description.clone());
                }
            }
        }
    }
    if entries.is_empty() {
        return;
    }
    let text_map = map.entry(names::PNG_TEXTUAL_DATA.to_string()).or_default();
    for (key, value) in entries {
        text_map.insert(key, value);
    }
}

fn profile_kind(key: &str) -> Option<ProfileKind> {
    match key {
        "Raw profile type exif" | "Raw profile type APP1" => Some(ProfileKind::Exif),
        "Raw profile type iptc" => Some(ProfileKind::Iptc),
        "Raw profile type xmp" => Some(ProfileKind::Xmp),
        _ => None,
    }
}

/// Directories of a profile embedded in a text value; empty when the key
/// is not a profile key or the payload cannot be read.
pub fn embedded_profile(
    key: &str,
    value: &str,
    extractor: &dyn DirectoryExtractor,
) -> Vec<Directory> {
    let Some(kind) = profile_kind(key) else {
        return Vec::new();
    };
    let Some(bytes) = profile_bytes(value) else {
        warn!("malformed PNG profile text for key={key}");
        return Vec::new();
    };
    let bytes = match kind {
        ProfileKind::Exif => match bytes.strip_prefix(EXIF_PREAMBLE) {
            Some(rest) => rest,
            None => return Vec::new(),
        },
        _ => &bytes[..],
    };
    match extractor.read_profile(kind, bytes) {
        Ok(dirs) => dirs,
        Err(err) => {
            warn!("failed to read PNG profile for key={key}: {err}");
            Vec::new()
        }
    }
}

/// Decodes `\n<type>\n<length>\n<hex lines>`.
fn profile_bytes(value: &str) -> Option<Vec<u8>> {
    let mut lines = value.trim_start_matches('\n').lines();
    let _profile_type = lines.next()?;
    let length: usize = lines.next()?.trim().parse().ok()?;
    let hex: String = lines.flat_map(|line| line.split_whitespace()).collect();
    let mut bytes = decode_hex(&hex)?;
    if bytes.len() < length {
        return None;
    }
    bytes.truncate(length);
    Some(bytes)
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}
