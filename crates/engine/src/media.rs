//! Container-level media properties.

use core_types::DirectoryMap;
use tracing::warn;

use crate::backend::MediaProperties;
use crate::geo;

pub const HAS_EMBEDDED_PICTURE: &str = "Has Embedded Picture";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKey {
    Album,
    Artist,
    Author,
    Bitrate,
    CaptureFramerate,
    Date,
    Duration,
    Genre,
    HasAudio,
    HasVideo,
    Location,
    MimeType,
    TrackCount,
    Title,
    VideoHeight,
    VideoRotation,
    VideoWidth,
    Year,
}

impl MediaKey {
    pub const ALL: [MediaKey; 18] = [
        MediaKey::Album,
        MediaKey::Artist,
        MediaKey::Author,
        MediaKey::Bitrate,
        MediaKey::CaptureFramerate,
        MediaKey::Date,
        MediaKey::Duration,
        MediaKey::Genre,
        MediaKey::HasAudio,
        MediaKey::HasVideo,
        MediaKey::Location,
        MediaKey::MimeType,
        MediaKey::TrackCount,
        MediaKey::Title,
        MediaKey::VideoHeight,
        MediaKey::VideoRotation,
        MediaKey::VideoWidth,
        MediaKey::Year,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            MediaKey::Album => "Album",
            MediaKey::Artist => "Artist",
            MediaKey::Author => "Author",
            MediaKey::Bitrate => "Bitrate",
            MediaKey::CaptureFramerate => "Capture Framerate",
            MediaKey::Date => "Date",
            MediaKey::Duration => "Duration",
            MediaKey::Genre => "Genre",
            MediaKey::HasAudio => "Has Audio",
            MediaKey::HasVideo => "Has Video",
            MediaKey::Location => "Location",
            MediaKey::MimeType => "MIME Type",
            MediaKey::TrackCount => "Number of Tracks",
            MediaKey::Title => "Title",
            MediaKey::VideoHeight => "Video Height",
            MediaKey::VideoRotation => "Video Rotation",
            MediaKey::VideoWidth => "Video Width",
            MediaKey::Year => "Year",
        }
    }
}

/// Human-readable form of a raw property value; `None` for blank values.
pub fn describe(key: MediaKey, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let described = match key {
        MediaKey::Duration => raw.parse::<i64>().ok().map(format_duration),
        MediaKey::Bitrate => raw.parse::<i64>().ok().map(format_bitrate),
        _ => None,
    };
    Some(described.unwrap_or_else(|| raw.to_string()))
}

fn format_duration(millis: i64) -> String {
    let millis = millis.max(0);
    let seconds = millis / 1000;
    format!(
        "{}:{:02}:{:02}.{:03}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60,
        millis % 1000
    )
}

fn format_bitrate(bps: i64) -> String {
    const KILO: f64 = 1000.0;
    let value = bps as f64;
    if value >= KILO * KILO {
        format!("{:.1} Mbps", value / (KILO * KILO))
    } else if value >= KILO {
        format!("{:.1} Kbps", value / KILO)
    } else {
        format!("{bps} bps")
    }
}

/// Every readable property under its display name. Read failures skip the key.
pub fn describe_all(props: &dyn MediaProperties) -> DirectoryMap {
    let mut dir = DirectoryMap::new();
    for key in MediaKey::ALL {
        match props.value(key) {
            Ok(Some(raw)) => {
                if let Some(description) = describe(key, &raw) {
                    dir.insert(key.display_name().to_string(), description);
                }
            }
            Ok(None) => {}
            Err(err) => warn!("failed to read media property {}: {err}", key.display_name()),
        }
    }
    match props.has_embedded_picture() {
        Ok(true) => {
            dir.insert(HAS_EMBEDDED_PICTURE.to_string(), "yes".to_string());
        }
        Ok(false) => {}
        Err(err) => warn!("failed to probe embedded picture: {err}"),
    }
    dir
}

pub fn int(props: &dyn MediaProperties, key: MediaKey) -> Option<i64> {
    read(props, key)?.trim().parse().ok()
}

pub fn date_millis(props: &dyn MediaProperties) -> Option<i64> {
    crate::dates::container_date_millis(&read(props, MediaKey::Date)?)
}

pub fn location(props: &dyn MediaProperties) -> Option<(f64, f64)> {
    geo::parse_video_location(&read(props, MediaKey::Location)?)
}

fn read(props: &dyn MediaProperties, key: MediaKey) -> Option<String> {
    match props.value(key) {
        Ok(value) => value,
        Err(err) => {
            warn!("failed to read media property {}: {err}", key.display_name());
            None
        }
    }
}
