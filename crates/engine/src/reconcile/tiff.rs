//! TIFF tag naming and GeoTIFF detection for IFD0 of TIFF files.

use core_types::tags::geotiff;
use core_types::{Directory, Tag};

const GEOTIFF_TAGS: [u32; 6] = [
    geotiff::MODEL_PIXEL_SCALE,
    geotiff::MODEL_TIEPOINT,
    geotiff::MODEL_TRANSFORMATION,
    geotiff::GEO_KEY_DIRECTORY,
    geotiff::GEO_DOUBLE_PARAMS,
    geotiff::GEO_ASCII_PARAMS,
];

/// Names for baseline, extension, GeoTIFF and GDAL tags the backend leaves unnamed.
fn tag_name(id: u32) -> Option<&'static str> {
    let name = match id {
        0x00fe => "New Subfile Type",
        0x00ff => "Subfile Type",
        0x0107 => "Threshholding",
        0x0108 => "Cell Width",
        0x0109 => "Cell Length",
        0x0118 => "Min Sample Value",
        0x0119 => "Max Sample Value",
        0x0122 => "Gray Response Unit",
        0x0123 => "Gray Response Curve",
        0x0124 => "T4 Options",
        0x0125 => "T6 Options",
        0x0129 => "Page Number",
        0x013d => "Predictor",
        0x0140 => "Color Map",
        0x0142 => "Tile Width",
        0x0143 => "Tile Length",
        0x0144 => "Tile Offsets",
        0x0145 => "Tile Byte Counts",
        0x014c => "Ink Set",
        0x0152 => "Extra Samples",
        0x0153 => "Sample Format",
        0x0154 => "S Min Sample Value",
        0x0155 => "S Max Sample Value",
        0x02bc => "XMP",
        0x83bb => "IPTC-NAA",
        0x8649 => "Photoshop",
        geotiff::MODEL_PIXEL_SCALE => "Model Pixel Scale",
        geotiff::MODEL_TIEPOINT => "Model Tiepoint",
        geotiff::MODEL_TRANSFORMATION => "Model Transformation",
        geotiff::GEO_KEY_DIRECTORY => "Geo Key Directory",
        geotiff::GEO_DOUBLE_PARAMS => "Geo Double Params",
        geotiff::GEO_ASCII_PARAMS => "Geo Ascii Params",
        42112 => "GDAL Metadata",
        42113 => "GDAL No Data",
        _ => return None,
    };
    Some(name)
}

/// Display key of a TIFF IFD0/thumbnail tag: the backend's name when it has
/// one, else the TIFF table's, else the backend's fallback identifier.
pub fn tag_key(tag: &Tag) -> String {
    match (&tag.name, tag_name(tag.id)) {
        (Some(name), _) => name.clone(),
        (None, Some(name)) => name.to_string(),
        (None, None) => tag.key(),
    }
}

pub fn is_geotiff_tag(id: u32) -> bool {
    GEOTIFF_TAGS.contains(&id)
}

/// Whether an IFD0 directory describes a usable GeoTIFF georeference.
pub fn is_geotiff(dir: &Directory) -> bool {
    if !dir.contains_tag(geotiff::GEO_KEY_DIRECTORY) {
        return false;
    }
    let tie_points = dir.contains_tag(geotiff::MODEL_TIEPOINT);
    let transformation = dir.contains_tag(geotiff::MODEL_TRANSFORMATION);
    if !tie_points && !transformation {
        return false;
    }
    let pixel_scale = dir.contains_tag(geotiff::MODEL_PIXEL_SCALE);
    !((transformation && pixel_scale) || (pixel_scale && !tie_points))
}
