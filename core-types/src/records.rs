use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::MetadataFlags;

/// Tag key to description, for one display directory.
pub type DirectoryMap = BTreeMap<String, String>;

/// Display key to directory map.
pub type DisplayMap = BTreeMap<String, DirectoryMap>;

/// Canonical fields used for indexing and sorting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_millis: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_degrees: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xmp_subjects: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xmp_title_description: Option<String>,
    #[serde(with = "flag_bits", default)]
    pub flags: MetadataFlags,
}

impl CatalogRecord {
    pub fn has_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Sets both coordinates, unless a location is already present.
    pub fn set_location_if_absent(&mut self, latitude: f64, longitude: f64) {
        if !self.has_location() {
            self.latitude = Some(latitude);
            self.longitude = Some(longitude);
        }
    }

    /// Folds a lower-precedence record into this one: fields already set are
    /// kept, flags are OR-ed.
    pub fn merge(&mut self, other: CatalogRecord) {
        fill(&mut self.mime_type_override, other.mime_type_override);
        fill(&mut self.date_millis, other.date_millis);
        fill(&mut self.rotation_degrees, other.rotation_degrees);
        if let (Some(latitude), Some(longitude)) = (other.latitude, other.longitude) {
            self.set_location_if_absent(latitude, longitude);
        }
        fill(&mut self.xmp_subjects, other.xmp_subjects);
        fill(&mut self.xmp_title_description, other.xmp_title_description);
        self.flags |= other.flags;
    }
}

/// Camera exposure fields shown over a photo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<i64>,
}

impl OverlayRecord {
    pub fn is_empty(&self) -> bool {
        self.aperture.is_none()
            && self.exposure_time.is_none()
            && self.focal_length.is_none()
            && self.iso.is_none()
    }

    pub fn merge(&mut self, other: OverlayRecord) {
        fill(&mut self.aperture, other.aperture);
        fill(&mut self.exposure_time, other.exposure_time);
        fill(&mut self.focal_length, other.focal_length);
        fill(&mut self.iso, other.iso);
    }
}

/// One page (track, frame or embedded video) of a multi-page item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub mime_type: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_degrees: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_millis: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<u32>,
}

pub const DEFAULT_PROJECTION_TYPE: &str = "equirectangular";

/// Photo sphere geometry from GPano XMP properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanoramaInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cropped_area_left: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cropped_area_top: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cropped_area_width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cropped_area_height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_pano_width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_pano_height: Option<i64>,
    pub projection_type: String,
}

impl Default for PanoramaInfo {
    fn default() -> Self {
        Self {
            cropped_area_left: None,
            cropped_area_top: None,
            cropped_area_width: None,
            cropped_area_height: None,
            full_pano_width: None,
            full_pano_height: None,
            projection_type: DEFAULT_PROJECTION_TYPE.to_string(),
        }
    }
}

/// An IPTC data set as reported by the IPTC reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IptcDataSet {
    pub record: u8,
    pub tag: u8,
    pub name: String,
    pub value: String,
}

fn fill<T>(slot: &mut Option<T>, candidate: Option<T>) {
    if slot.is_none() {
        *slot = candidate;
    }
}

mod flag_bits {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::MetadataFlags;

    pub fn serialize<S: Serializer>(flags: &MetadataFlags, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(flags.bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MetadataFlags, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(MetadataFlags::from_bits_truncate(bits))
    }
}
