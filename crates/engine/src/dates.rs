//! Date strings from the various backends, as milliseconds since the epoch.
//!
//! Values without an explicit offset are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use core_types::Rational;

const EXIF_FORMATS: &[&str] = &[
    "%Y:%m:%d %H:%M:%S",
    "%Y:%m:%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y:%m:%d %H:%M",
    "%Y-%m-%d %H:%M",
];

const XMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

pub const PNG_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

const CONTAINER_FORMATS: &[&str] = &["%Y%m%dT%H%M%S%.fZ", "%Y%m%dT%H%M%SZ", "%Y%m%dT%H%M%S"];

pub fn exif_date_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    EXIF_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// ISO 8601 as written in XMP: offset and time parts are optional.
pub fn xmp_date_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.timestamp_millis());
    }
    if let Ok(date) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z") {
        return Some(date.timestamp_millis());
    }
    if let Some(naive) = XMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(naive.and_utc().timestamp_millis());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .ok()?;
    Some(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
}

pub fn png_date_millis(raw: &str) -> Result<i64, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), PNG_TIME_FORMAT)
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Container dates such as `20201231T235959.000Z`. Dates at or before the
/// epoch are placeholders written by muxers and are ignored.
pub fn container_date_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    CONTAINER_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
        .filter(|millis| *millis > 0)
}

/// GPS date stamp (`YYYY:MM:DD`) combined with the hour/minute/second stamp.
pub fn gps_date_millis(date_stamp: &str, time_stamp: Option<&[Rational]>) -> Option<i64> {
    let date = NaiveDate::parse_from_str(date_stamp.trim(), "%Y:%m:%d").ok()?;
    let seconds = match time_stamp {
        Some([hours, minutes, seconds, ..]) => {
            hours.to_f64() * 3600.0 + minutes.to_f64() * 60.0 + seconds.to_f64()
        }
        _ => 0.0,
    };
    let offset = (seconds * 1000.0).round();
    if !offset.is_finite() || offset.abs() >= i64::MAX as f64 {
        return None;
    }
    let midnight = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    midnight.checked_add(offset as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exif_dates_are_utc_millis() {
        assert_eq!(exif_date_millis("2021:03:04 05:06:07"), Some(1_614_834_367_000));
        assert_eq!(exif_date_millis("0000:00:00 00:00:00"), None);
        assert_eq!(exif_date_millis("    :  :     :  :  "), None);
    }

    #[test]
    fn xmp_dates_accept_partial_forms() {
        assert_eq!(xmp_date_millis("2021-03-04T05:06:07Z"), Some(1_614_834_367_000));
        assert_eq!(xmp_date_millis("2021-03-04T06:06:07+01:00"), Some(1_614_834_367_000));
        assert_eq!(xmp_date_millis("2021-03-04T05:06:07"), Some(1_614_834_367_000));
        assert_eq!(xmp_date_millis("2021-03-04"), Some(1_614_816_000_000));
        assert_eq!(xmp_date_millis("2021-03"), Some(1_614_556_800_000));
        assert_eq!(xmp_date_millis("someday"), None);
    }

    #[test]
    fn png_time_parse_failure_is_reported() {
        assert_eq!(png_date_millis("2021:03:04 05:06:07"), Ok(1_614_834_367_000));
        assert!(png_date_millis("Thu, 4 Mar 2021").is_err());
    }

    #[test]
    fn container_epoch_placeholders_are_ignored() {
        assert_eq!(container_date_millis("20210304T050607.000Z"), Some(1_614_834_367_000));
        assert_eq!(container_date_millis("19040101T000000.000Z"), None);
    }

    #[test]
    fn gps_date_adds_time_stamp() {
        let time = [Rational::new(5, 1), Rational::new(6, 1), Rational::new(7, 1)];
        assert_eq!(gps_date_millis("2021:03:04", Some(&time)), Some(1_614_834_367_000));
        assert_eq!(gps_date_millis("2021:03:04", None), Some(1_614_816_000_000));
    }

    #[test]
    fn gps_time_stamp_out_of_range_is_no_date() {
        let huge = [Rational::new(i64::MAX, 1), Rational::new(0, 1), Rational::new(0, 1)];
        assert_eq!(gps_date_millis("2021:03:04", Some(&huge)), None);
        let late = [Rational::new(2_562_047_788_015, 1), Rational::new(0, 1), Rational::new(0, 1)];
        assert_eq!(gps_date_millis("2021:03:04", Some(&late)), None);
        let nan = [Rational::new(0, 0), Rational::new(0, 1), Rational::new(0, 1)];
        assert_eq!(gps_date_millis("2021:03:04", Some(&nan)), None);
    }
}
