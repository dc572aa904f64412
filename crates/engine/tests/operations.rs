mod common;

use std::sync::Arc;

use common::*;
use core_types::tags::{exif, gps};
use core_types::{DirectoryKind, IptcDataSet, PageInfo, Rational, Tag, TagValue};
use engine::snapshot::Snapshot;
use engine::{Backends, MetadataRequest};

#[test]
fn overlay_reads_subifd_and_skips_videos() {
    let snapshot = snapshot(vec![core_types::Directory::new("Exif SubIFD", DirectoryKind::ExifSubIfd)
        .with_tag(Tag::new(exif::EXPOSURE_TIME, "Exposure Time", "0.07 sec").with_value(TagValue::Rational(
            Rational::new(71_428_571, 1_000_000_000),
        )))
        .with_tag(Tag::new(exif::ISO_EQUIVALENT, "ISO Speed Ratings", "400").with_value(TagValue::Int(400)))]);
    let fetcher = fetcher(snapshot.into_backends());

    let overlay = fetcher.overlay_metadata(&request("image/jpeg")).unwrap();
    assert_eq!(overlay.exposure_time.as_deref(), Some("1/14"));
    assert_eq!(overlay.iso, Some(400));
    assert_eq!(overlay.aperture, None);

    assert!(fetcher.overlay_metadata(&request("video/mp4")).unwrap().is_empty());
}

#[test]
fn overlay_falls_back_to_exif_reader() {
    let backends = FakeExif {
        f_number: Some(2.8),
        exposure_time: Some(Rational::new(2, 1)),
        iso: Some(50),
        ..Default::default()
    }
    .into_backends(snapshot(Vec::new()).into_backends());

    let overlay = fetcher(backends).overlay_metadata(&request("image/webp")).unwrap();
    assert_eq!(overlay.aperture, Some(2.8));
    assert_eq!(overlay.exposure_time.as_deref(), Some("2″"));
    assert_eq!(overlay.iso, Some(50));
}

#[test]
fn missing_arguments_touch_no_backend() {
    let fetcher = fetcher(Backends::new());
    let request = MetadataRequest {
        mime_type: Some("image/jpeg".into()),
        ..Default::default()
    };
    assert_eq!(fetcher.all_metadata(&request).unwrap_err().code(), "all-metadata-args");
    assert_eq!(fetcher.overlay_metadata(&request).unwrap_err().code(), "overlay-metadata-args");
    assert_eq!(fetcher.date(&common::request("image/jpeg")).unwrap_err().code(), "date-args");
}

#[test]
fn multi_page_info_by_type() {
    let mut snapshot = snapshot(Vec::new());
    snapshot.pages = Some(vec![
        PageInfo {
            page: 0,
            mime_type: "image/heic".into(),
            is_default: true,
            width: Some(4032),
            height: Some(3024),
            ..Default::default()
        },
        PageInfo {
            page: 1,
            mime_type: "image/heic".into(),
            ..Default::default()
        },
    ]);
    let fetcher = fetcher(snapshot.into_backends());
    let sized = |mime_type: &str| {
        let mut request = request(mime_type);
        request.size_bytes = Some(2_048_000);
        request
    };

    let pages = fetcher.multi_page_info(&sized("image/heic")).unwrap().unwrap();
    assert_eq!(pages.len(), 2);
    assert!(pages[0].is_default);
    assert_eq!(fetcher.multi_page_info(&sized("image/png")).unwrap(), None);
    assert_eq!(
        fetcher.multi_page_info(&request("image/heic")).unwrap_err().code(),
        "multi-page-info-args"
    );

    let empty = common::fetcher(Snapshot { pages: Some(Vec::new()), ..Default::default() }.into_backends());
    assert_eq!(
        empty.multi_page_info(&sized("image/tiff")).unwrap_err().code(),
        "multi-page-info-empty"
    );
}

#[test]
fn panorama_info_requires_a_readable_backend() {
    let snapshot = snapshot(vec![xmp_dir(&[
        ("GPano:FullPanoWidthPixels", "8000"),
        ("GPano:ProjectionType", "cylindrical"),
    ])]);
    let info = fetcher(snapshot.into_backends())
        .panorama_info(&request("image/jpeg"))
        .unwrap();
    assert_eq!(info.full_pano_width, Some(8000));
    assert_eq!(info.projection_type, "cylindrical");

    let broken = fetcher(Backends::new().with_directories(Arc::new(BrokenDirectories)));
    assert_eq!(
        broken.panorama_info(&request("image/jpeg")).unwrap_err().code(),
        "panorama-info-empty"
    );
}

#[test]
fn iptc_only_for_jpeg_and_tiff() {
    let mut snapshot = snapshot(Vec::new());
    snapshot.iptc = Some(vec![IptcDataSet {
        record: 2,
        tag: 25,
        name: "Keywords".into(),
        value: "beach".into(),
    }]);
    let fetcher = fetcher(snapshot.into_backends());

    let data_sets = fetcher.iptc(&request("image/jpeg")).unwrap().unwrap();
    assert_eq!(data_sets[0].value, "beach");
    assert_eq!(fetcher.iptc(&request("image/png")).unwrap(), None);

    let missing = common::fetcher(Backends::new());
    assert_eq!(missing.iptc(&request("image/tiff")).unwrap_err().code(), "iptc-error");
}

#[test]
fn xmp_packets_and_failures() {
    let fetcher = fetcher(snapshot(vec![xmp_dir(&[("dc:title[1]", "A")]), xmp_dir(&[("dc:title[1]", "B")])]).into_backends());
    let packets = fetcher.xmp(&request("image/jpeg")).unwrap().unwrap();
    assert_eq!(packets.len(), 2);
    assert!(packets[1].contains("\"B\""));
    assert_eq!(fetcher.xmp(&request("image/svg+xml")).unwrap(), None);

    let broken = common::fetcher(Backends::new().with_directories(Arc::new(BrokenDirectories)));
    assert_eq!(broken.xmp(&request("image/jpeg")).unwrap_err().code(), "xmp-exception");
    let missing = common::fetcher(Backends::new());
    assert_eq!(missing.xmp(&request("image/jpeg")).unwrap_err().code(), "xmp-error");
}

#[test]
fn single_date_lookup() {
    let fetcher = fetcher(
        snapshot(vec![
            dir("Exif IFD0", DirectoryKind::ExifIfd0, &[]).with_tag(Tag::new(
                exif::DATETIME,
                "Date/Time",
                "2021:03:04 05:06:07",
            )),
            dir("GPS", DirectoryKind::Gps, &[]).with_tag(Tag::new(gps::DATE_STAMP, "GPS Date Stamp", "2021:03:04")),
        ])
        .into_backends(),
    );
    let date = |field: &str| fetcher.date(&request("image/jpeg").with_field(field));

    assert_eq!(date("DateTime").unwrap(), Some(1_614_834_367_000));
    assert_eq!(date("DateTimeOriginal").unwrap(), None);
    assert_eq!(date("GPSDateStamp").unwrap(), Some(1_614_816_000_000));
    assert_eq!(date("ImageUniqueID").unwrap_err().code(), "date-field");
}
