//! Flattened XMP property tree.
//!
//! Backends report every node of the XMP tree as a `(namespace, path, value)`
//! triple, in document order. Paths use schema prefixes, array items are
//! addressed as `dc:subject[1]` and qualifiers as `dc:title[1]/?xml:lang`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmpProperty {
    pub namespace: String,
    pub path: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl XmpProperty {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
            value: value.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmpMeta {
    pub properties: Vec<XmpProperty>,
}

const GPANO_REQUIRED: [&str; 6] = [
    "GPano:CroppedAreaLeftPixels",
    "GPano:CroppedAreaTopPixels",
    "GPano:CroppedAreaImageWidthPixels",
    "GPano:CroppedAreaImageHeightPixels",
    "GPano:FullPanoWidthPixels",
    "GPano:FullPanoHeightPixels",
];

impl XmpMeta {
    pub fn new(properties: Vec<XmpProperty>) -> Self {
        Self { properties }
    }

    pub fn iter(&self) -> impl Iterator<Item = &XmpProperty> {
        self.properties.iter()
    }

    /// Simple value at an exact path.
    pub fn value(&self, path: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|prop| prop.path == path)
            .and_then(|prop| prop.value.as_deref())
    }

    /// Whether the path exists, either as a simple value or as a container.
    pub fn exists(&self, path: &str) -> bool {
        self.properties.iter().any(|prop| {
            prop.path == path
                || prop
                    .path
                    .strip_prefix(path)
                    .is_some_and(|rest| rest.starts_with('[') || rest.starts_with('/'))
        })
    }

    pub fn int(&self, path: &str) -> Option<i64> {
        self.value(path)?.trim().parse().ok()
    }

    /// Items of an array property, in index order.
    pub fn array_items(&self, path: &str) -> Vec<&str> {
        let mut items: Vec<(usize, &str)> = self
            .properties
            .iter()
            .filter_map(|prop| {
                let index = array_index(&prop.path, path)?;
                Some((index, prop.value.as_deref()?))
            })
            .collect();
        items.sort_by_key(|(index, _)| *index);
        items.into_iter().map(|(_, value)| value).collect()
    }

    /// Localized alternative text: `x-default` when tagged, else the first item.
    pub fn localized_text(&self, path: &str) -> Option<&str> {
        let mut first: Option<(usize, &str)> = None;
        for prop in &self.properties {
            let Some(index) = array_index(&prop.path, path) else {
                continue;
            };
            let Some(value) = prop.value.as_deref() else {
                continue;
            };
            let lang = self.value(&format!("{path}[{index}]/?xml:lang"));
            if lang == Some("x-default") {
                return Some(value);
            }
            if first.map_or(true, |(best, _)| index < best) {
                first = Some((index, value));
            }
        }
        first.map(|(_, value)| value)
    }

    pub fn is_panorama(&self) -> bool {
        GPANO_REQUIRED.iter().all(|path| self.exists(path))
    }

    pub fn is_motion_photo(&self) -> bool {
        let flagged = |path: &str| self.value(path).map(str::trim) == Some("1");
        flagged("GCamera:MicroVideo")
            || flagged("GCamera:MotionPhoto")
            || flagged("Camera:MotionPhoto")
            || self.exists("GCamera:MicroVideoOffset")
    }
}

/// Parses `dc:subject[3]` against `dc:subject`, ignoring qualifiers and children.
fn array_index(candidate: &str, path: &str) -> Option<usize> {
    let rest = candidate.strip_prefix(path)?.strip_prefix('[')?;
    let digits = rest.strip_suffix(']')?;
    digits.parse().ok()
}
