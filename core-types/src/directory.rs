use serde::{Deserialize, Serialize};

use crate::rational::Rational;
use crate::xmp::XmpMeta;

/// Character set declared by a PNG text chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    #[default]
    Latin1,
    Utf8,
}

impl Charset {
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }
}

/// One keyword/text entry of a PNG textual chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PngTextPair {
    pub key: String,
    pub bytes: Vec<u8>,
    #[serde(default)]
    pub charset: Charset,
}

/// Typed value a backend may attach next to a tag description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TagValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Rational(Rational),
    Rationals(Vec<Rational>),
    Bytes(Vec<u8>),
    Strings(Vec<String>),
    TextPairs(Vec<PngTextPair>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u32,
    /// Human-readable name, when the backend knows one.
    #[serde(default)]
    pub name: Option<String>,
    pub description: String,
    #[serde(default)]
    pub value: Option<TagValue>,
}

impl Tag {
    pub fn new(id: u32, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            description: description.into(),
            value: None,
        }
    }

    pub fn unnamed(id: u32, description: impl Into<String>) -> Self {
        Self {
            id,
            name: None,
            description: description.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: TagValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    /// Tag name, or the backend's fallback identifier for unknown tags.
    pub fn key(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Unknown tag (0x{:04x})", self.id),
        }
    }
}

/// Backend-reported directory kinds. Kinds the engine has no rule for are `Other`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DirectoryKind {
    FileType,
    Avi,
    ExifIfd0,
    ExifSubIfd,
    ExifThumbnail,
    ExifInterop,
    Gps,
    Xmp {
        /// Absent when the backend failed to parse the packet.
        #[serde(default)]
        meta: Option<XmpMeta>,
    },
    Iptc,
    Png,
    Gif,
    GifAnimation,
    Webp,
    Mp4,
    UuidBox {
        uuid: String,
        #[serde(default)]
        user_data: Vec<u8>,
    },
    #[default]
    #[serde(other)]
    Other,
}

impl DirectoryKind {
    pub fn is_exif(&self) -> bool {
        matches!(
            self,
            DirectoryKind::ExifIfd0
                | DirectoryKind::ExifSubIfd
                | DirectoryKind::ExifThumbnail
                | DirectoryKind::ExifInterop
                | DirectoryKind::Gps
        )
    }

    pub fn is_xmp(&self) -> bool {
        matches!(self, DirectoryKind::Xmp { .. })
    }

    /// Backend bookkeeping that never reaches the display map.
    pub fn is_bookkeeping(&self) -> bool {
        matches!(self, DirectoryKind::FileType | DirectoryKind::Avi)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    pub name: String,
    #[serde(default)]
    pub kind: DirectoryKind,
    /// Name of the enclosing directory, if any.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Directory {
    pub fn new(name: impl Into<String>, kind: DirectoryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            tags: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn xmp_meta(&self) -> Option<&XmpMeta> {
        match &self.kind {
            DirectoryKind::Xmp { meta } => meta.as_ref(),
            _ => None,
        }
    }

    pub fn tag(&self, id: u32) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    pub fn contains_tag(&self, id: u32) -> bool {
        self.tag(id).is_some()
    }

    /// Name of a tag as this directory reports it.
    pub fn tag_name(&self, id: u32) -> Option<String> {
        self.tag(id).map(Tag::key)
    }

    pub fn string(&self, id: u32) -> Option<String> {
        let tag = self.tag(id)?;
        match &tag.value {
            Some(TagValue::Text(text)) => Some(text.clone()),
            Some(TagValue::Int(value)) => Some(value.to_string()),
            Some(TagValue::Strings(values)) => values.first().cloned(),
            Some(_) => None,
            None => Some(tag.description.clone()),
        }
        .filter(|s| !s.is_empty())
    }

    pub fn int(&self, id: u32) -> Option<i64> {
        let tag = self.tag(id)?;
        match &tag.value {
            Some(TagValue::Int(value)) => Some(*value),
            Some(TagValue::Bool(value)) => Some(i64::from(*value)),
            Some(TagValue::Text(text)) => text.trim().parse().ok(),
            Some(TagValue::Rational(value)) if value.is_integer() => {
                value.numerator.checked_div(value.denominator)
            }
            Some(_) => None,
            None => tag.description.trim().parse().ok(),
        }
    }

    pub fn boolean(&self, id: u32) -> Option<bool> {
        let tag = self.tag(id)?;
        match &tag.value {
            Some(TagValue::Bool(value)) => Some(*value),
            Some(TagValue::Int(value)) => Some(*value != 0),
            Some(TagValue::Text(text)) => parse_bool(text),
            Some(_) => None,
            None => parse_bool(&tag.description),
        }
    }

    pub fn rational(&self, id: u32) -> Option<Rational> {
        match &self.tag(id)?.value {
            Some(TagValue::Rational(value)) => Some(*value),
            Some(TagValue::Rationals(values)) => values.first().copied(),
            Some(TagValue::Int(value)) => Some(Rational::new(*value, 1)),
            _ => None,
        }
    }

    pub fn rationals(&self, id: u32) -> Option<&[Rational]> {
        match &self.tag(id)?.value {
            Some(TagValue::Rationals(values)) => Some(values),
            Some(TagValue::Rational(value)) => Some(std::slice::from_ref(value)),
            _ => None,
        }
    }

    pub fn strings(&self, id: u32) -> Option<Vec<String>> {
        match &self.tag(id)?.value {
            Some(TagValue::Strings(values)) => Some(values.clone()),
            Some(TagValue::Text(text)) => Some(vec![text.clone()]),
            _ => None,
        }
    }

    pub fn bytes(&self, id: u32) -> Option<&[u8]> {
        match &self.tag(id)?.value {
            Some(TagValue::Bytes(bytes)) => Some(bytes),
            _ => None,
        }
    }

    pub fn text_pairs(&self, id: u32) -> Option<&[PngTextPair]> {
        match &self.tag(id)?.value {
            Some(TagValue::TextPairs(pairs)) => Some(pairs),
            _ => None,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
