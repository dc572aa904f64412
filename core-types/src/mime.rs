//! Mime types the engine has rules for, and which backend handles what.

pub const JPEG: &str = "image/jpeg";
pub const PNG: &str = "image/png";
pub const GIF: &str = "image/gif";
pub const WEBP: &str = "image/webp";
pub const TIFF: &str = "image/tiff";
pub const HEIC: &str = "image/heic";
pub const HEIF: &str = "image/heif";
pub const SVG: &str = "image/svg+xml";
pub const DNG: &str = "image/x-adobe-dng";
pub const DVD: &str = "video/dvd";
pub const MP4: &str = "video/mp4";

const RAW_TYPES: &[&str] = &[
    DNG,
    "image/x-canon-cr2",
    "image/x-fuji-raf",
    "image/x-nikon-nef",
    "image/x-nikon-nrw",
    "image/x-olympus-orf",
    "image/x-panasonic-rw2",
    "image/x-pentax-pef",
    "image/x-samsung-srw",
    "image/x-sony-arw",
];

const UNPARSED_CONTAINERS: &[&str] = &["video/webm", "video/x-matroska", "video/x-ms-wmv"];

pub fn is_image(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

pub fn is_video(mime_type: &str) -> bool {
    mime_type.starts_with("video/")
}

pub fn is_heic(mime_type: &str) -> bool {
    mime_type == HEIC || mime_type == HEIF
}

pub fn is_raw(mime_type: &str) -> bool {
    RAW_TYPES.contains(&mime_type)
}

/// Whether the tag-directory backend parses this type.
pub fn handled_by_directory_backend(mime_type: &str) -> bool {
    mime_type != SVG && !UNPARSED_CONTAINERS.contains(&mime_type)
}

/// Whether the EXIF-only reader parses this type.
pub fn handled_by_exif_reader(mime_type: &str) -> bool {
    matches!(mime_type, JPEG | PNG | WEBP | HEIC | HEIF) || is_raw(mime_type)
}

/// Whether the IPTC reader parses this type.
pub fn handled_by_iptc_reader(mime_type: &str) -> bool {
    matches!(mime_type, JPEG | TIFF)
}

/// Matches `.*\.tiff?`, ignoring case.
pub fn has_tiff_extension(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".tif") || lower.ends_with(".tiff")
}
