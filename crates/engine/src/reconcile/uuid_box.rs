//! Payloads of container `uuid` boxes.

use core_types::DirectoryMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

pub const SPHERICAL_VIDEO_UUID: &str = "ffcc8263-f855-4a93-8814-587a02521fdd";
pub const PROFILE_UUID: &str = "50524f46-21d2-4fce-bb88-695cfac9c740";
pub const USER_MEDIA_UUID: &str = "55534d54-21d2-4fce-bb88-695cfac9c740";

const UNDETERMINED_LANGUAGE: &str = "und";
const METADATA_BOX_TYPE: &[u8; 4] = b"MTDT";

static SPHERICAL_PROPERTY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<GSpherical:(\w+)>([^<]*)</GSpherical:(\w+)>").expect("spherical property pattern")
});

/// First group of a UUID, used in display names.
pub fn uuid_prefix(uuid: &str) -> &str {
    uuid.split('-').next().unwrap_or(uuid)
}

/// Describes the `GSpherical:*` properties of a spherical video RDF payload.
pub fn describe_spherical(bytes: &[u8]) -> DirectoryMap {
    let mut described = DirectoryMap::new();
    let xml = String::from_utf8_lossy(bytes);
    for captures in SPHERICAL_PROPERTY_PATTERN.captures_iter(&xml) {
        let (Some(open), Some(value), Some(close)) =
            (captures.get(1), captures.get(2), captures.get(3))
        else {
            continue;
        };
        if open.as_str() != close.as_str() {
            continue;
        }
        described
            .entry(spaced_words(open.as_str()))
            .or_insert_with(|| unescape_xml(value.as_str().trim()));
    }
    described
}

/// `InitialViewHeadingDegrees` to `Initial View Heading Degrees`.
fn spaced_words(camel: &str) -> String {
    let mut spaced = String::with_capacity(camel.len() + 4);
    let mut previous: Option<char> = None;
    for c in camel.chars() {
        if c.is_ascii_uppercase() && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
            spaced.push(' ');
        }
        spaced.push(c);
        previous = Some(c);
    }
    spaced
}

fn unescape_xml(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// One metadata block of a user media payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMediaBlock {
    pub kind: String,
    pub value: String,
    pub language: String,
}

/// Parses the `MTDT` boxes of a user media payload. Truncated data yields
/// whatever blocks were complete.
pub fn parse_user_media(data: &[u8]) -> Vec<UserMediaBlock> {
    let mut blocks = Vec::new();
    let mut offset = 0;
    while offset + 8 <= data.len() {
        let size = be_u32(&data[offset..offset + 4]) as usize;
        let box_type = &data[offset + 4..offset + 8];
        if size < 8 || offset + size > data.len() {
            warn!("truncated user media box at offset {offset}");
            break;
        }
        if box_type == METADATA_BOX_TYPE {
            parse_metadata_box(&data[offset + 8..offset + size], &mut blocks);
        }
        offset += size;
    }
    blocks
}

fn parse_metadata_box(payload: &[u8], blocks: &mut Vec<UserMediaBlock>) {
    if payload.len() < 2 {
        return;
    }
    let count = be_u16(&payload[0..2]);
    let mut start = 2;
    for _ in 0..count {
        if start + 2 > payload.len() {
            return;
        }
        let size = be_u16(&payload[start..start + 2]) as usize;
        if size < 10 || start + size > payload.len() {
            warn!("truncated user media block at offset {start}");
            return;
        }
        let block = &payload[start + 2..start + size];
        let value = &block[8..];
        blocks.push(UserMediaBlock {
            kind: block_type_name(be_u32(&block[0..4])),
            language: language_code(&block[4..6]),
            value: match be_u16(&block[6..8]) {
                1 => decode_utf16_be(value),
                _ => hex_string(value),
            },
        });
        start += size;
    }
}

fn block_type_name(kind: u32) -> String {
    let name = match kind {
        0x01 => "Title",
        0x03 => "Creation Time",
        0x04 => "Software",
        0x0a => "Track Property",
        0x0b => "Time Zone",
        0x0c => "Modification Time",
        _ => return format!("0x{kind:02x}"),
    };
    name.to_string()
}

/// Packed ISO 639-2/T code: three 5-bit letters offset from 0x60.
fn language_code(packed: &[u8]) -> String {
    let bits = be_u16(packed);
    [(bits >> 10) & 0x1f, (bits >> 5) & 0x1f, bits & 0x1f]
        .iter()
        .map(|&c| char::from(c as u8 + 0x60))
        .collect()
}

fn decode_utf16_be(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
        .trim_end_matches('\0')
        .to_string()
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn be_u16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Adds blocks to the shared user media map. Repeated types get a ` (n)`
/// key suffix, determined languages a ` (lang)` value suffix.
pub fn insert_user_media(map: &mut DirectoryMap, blocks: Vec<UserMediaBlock>) {
    for block in blocks {
        let mut key = block.kind.clone();
        let mut n = 0;
        while map.contains_key(&key) {
            n += 1;
            key = format!("{} ({n})", block.kind);
        }
        let value = if block.language == UNDETERMINED_LANGUAGE {
            block.value
        } else {
            format!("{} ({})", block.value, block.language)
        };
        map.insert(key, value);
    }
}

#[cfg(test)]
pub(crate) fn user_media_payload(blocks: &[(u32, &str, u16, &[u8])]) -> Vec<u8> {
    let mut mtdt = (blocks.len() as u16).to_be_bytes().to_vec();
    for (kind, language, encoding, value) in blocks {
        let lang = language
            .bytes()
            .fold(0u16, |acc, c| (acc << 5) | u16::from(c - 0x60));
        mtdt.extend_from_slice(&((10 + value.len()) as u16).to_be_bytes());
        mtdt.extend_from_slice(&kind.to_be_bytes());
        mtdt.extend_from_slice(&lang.to_be_bytes());
        mtdt.extend_from_slice(&encoding.to_be_bytes());
        mtdt.extend_from_slice(value);
    }
    let mut data = ((8 + mtdt.len()) as u32).to_be_bytes().to_vec();
    data.extend_from_slice(METADATA_BOX_TYPE);
    data.extend_from_slice(&mtdt);
    data
}
