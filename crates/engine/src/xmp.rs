//! XMP property paths the engine reads.

use core_types::XmpMeta;

use crate::dates;

pub const SUBJECT: &str = "dc:subject";
pub const TITLE: &str = "dc:title";
pub const DESCRIPTION: &str = "dc:description";
pub const CREATE_DATE: &str = "xmp:CreateDate";
pub const PS_DATE_CREATED: &str = "photoshop:DateCreated";

pub const GPANO_CROPPED_AREA_LEFT: &str = "GPano:CroppedAreaLeftPixels";
pub const GPANO_CROPPED_AREA_TOP: &str = "GPano:CroppedAreaTopPixels";
pub const GPANO_CROPPED_AREA_WIDTH: &str = "GPano:CroppedAreaImageWidthPixels";
pub const GPANO_CROPPED_AREA_HEIGHT: &str = "GPano:CroppedAreaImageHeightPixels";
pub const GPANO_FULL_PANO_WIDTH: &str = "GPano:FullPanoWidthPixels";
pub const GPANO_FULL_PANO_HEIGHT: &str = "GPano:FullPanoHeightPixels";
pub const GPANO_PROJECTION_TYPE: &str = "GPano:ProjectionType";

/// Replacement for values of data-carrying properties.
pub const SKIPPED_VALUE: &str = "[skipped]";

const DATA_PROPERTIES: &[&str] = &[
    "GAudio:Data",
    "GDepth:Confidence",
    "GDepth:Data",
    "GImage:Data",
    "xmpGImg:image",
];

/// Whether the property at this path holds embedded binary data (images, depth maps, audio).
pub fn is_data_path(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or(path);
    let last = last.split('[').next().unwrap_or(last);
    DATA_PROPERTIES.contains(&last)
}

pub fn date_millis(meta: &XmpMeta, path: &str) -> Option<i64> {
    dates::xmp_date_millis(meta.value(path)?)
}

pub fn non_blank_localized_text(meta: &XmpMeta, path: &str) -> Option<String> {
    meta.localized_text(path)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_paths_match_on_last_segment() {
        assert!(is_data_path("GImage:Data"));
        assert!(is_data_path("xmp:Thumbnails[1]/xmpGImg:image"));
        assert!(!is_data_path("GImage:Mime"));
        assert!(!is_data_path("dc:title[1]"));
    }
}
