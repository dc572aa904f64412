use core_types::tags::gps;
use core_types::{Directory, Rational};
use once_cell::sync::Lazy;
use regex::Regex;

/// `+48.8577+002.2950/` as found in container location strings.
static VIDEO_LOCATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([+-][.0-9]+)([+-][.0-9]+)/?").expect("video location pattern"));

/// Decimal coordinates from a GPS directory, when both axes and their
/// hemisphere references are present.
pub fn gps_location(dir: &Directory) -> Option<(f64, f64)> {
    let latitude_ref = dir.string(gps::LATITUDE_REF)?;
    let longitude_ref = dir.string(gps::LONGITUDE_REF)?;
    let latitude = gps_coordinate(dir.rationals(gps::LATITUDE)?, Some(latitude_ref.as_str()))?;
    let longitude = gps_coordinate(dir.rationals(gps::LONGITUDE)?, Some(longitude_ref.as_str()))?;
    Some((latitude, longitude))
}

/// Degrees/minutes/seconds with a hemisphere reference to signed decimal degrees.
pub fn gps_coordinate(components: &[Rational], reference: Option<&str>) -> Option<f64> {
    let [degrees, minutes, seconds, ..] = components else {
        return None;
    };
    let value = degrees.to_f64() + minutes.to_f64() / 60.0 + seconds.to_f64() / 3600.0;
    if !value.is_finite() {
        return None;
    }
    let sign = match reference.map(|r| r.trim().to_ascii_uppercase()) {
        Some(r) if r == "S" || r == "W" => -1.0,
        _ => 1.0,
    };
    Some(sign * value)
}

pub fn parse_video_location(raw: &str) -> Option<(f64, f64)> {
    let captures = VIDEO_LOCATION_PATTERN.captures(raw)?;
    let latitude = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let longitude = captures.get(2)?.as_str().parse::<f64>().ok()?;
    Some((latitude, longitude))
}
