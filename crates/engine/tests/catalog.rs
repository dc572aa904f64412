mod common;

use std::collections::BTreeMap;

use common::*;
use core_types::tags::exif;
use core_types::{CatalogRecord, DirectoryKind, MetadataFlags, Tag, TagValue};
use engine::snapshot::Snapshot;

const XMP_DATE: i64 = 1_614_816_000_000;

fn media(values: &[(&str, &str)]) -> Option<BTreeMap<String, String>> {
    Some(values.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
}

#[test]
fn flags_are_the_union_of_every_pass() {
    let mut snapshot = snapshot(vec![xmp_dir(&[
        ("GPano:CroppedAreaLeftPixels", "0"),
        ("GPano:CroppedAreaTopPixels", "0"),
        ("GPano:CroppedAreaImageWidthPixels", "4000"),
        ("GPano:CroppedAreaImageHeightPixels", "2000"),
        ("GPano:FullPanoWidthPixels", "4000"),
        ("GPano:FullPanoHeightPixels", "2000"),
    ])]);
    snapshot.media = media(&[("Number of Tracks", "3")]);
    let backends = FakeExif {
        orientation: Some(4),
        ..Default::default()
    }
    .into_backends(snapshot.into_backends());

    let record = fetcher(backends).catalog_metadata(&request("image/heic")).unwrap();
    assert_eq!(
        record.flags,
        MetadataFlags::SPHERICAL | MetadataFlags::FLIPPED | MetadataFlags::MULTIPAGE
    );
    assert_eq!(record.rotation_degrees, Some(180));
}

#[test]
fn earlier_passes_win_per_field() {
    let mut snapshot = snapshot(vec![xmp_dir(&[("xmp:CreateDate", "2021-03-04")])]);
    snapshot.media = media(&[
        ("Date", "20190101T000000.000Z"),
        ("Video Rotation", "90"),
        ("Location", "+48.8577+002.2950/"),
    ]);
    let backends = FakeExif {
        dates: BTreeMap::from([("DateTimeOriginal", 1_000_000_000_000)]),
        orientation: Some(3),
        lat_long: Some((-33.87, 151.21)),
        ..Default::default()
    }
    .into_backends(snapshot.into_backends());

    let record = fetcher(backends).catalog_metadata(&request("video/mp4")).unwrap();
    assert_eq!(record.date_millis, Some(XMP_DATE));
    assert_eq!(record.rotation_degrees, Some(90));
    assert_eq!(record.latitude, Some(48.8577));
    assert_eq!(record.longitude, Some(2.295));
}

#[test]
fn exif_fallback_fills_what_the_primary_pass_left() {
    let snapshot = snapshot(vec![xmp_dir(&[("dc:title[1]", "Pier")])]);
    let backends = FakeExif {
        dates: BTreeMap::from([("DateTimeOriginal", 1_000_000_000_000)]),
        orientation: Some(6),
        lat_long: Some((-33.87, 151.21)),
        ..Default::default()
    }
    .into_backends(snapshot.into_backends());

    let record = fetcher(backends).catalog_metadata(&request("image/jpeg")).unwrap();
    assert_eq!(record.xmp_title_description.as_deref(), Some("Pier"));
    assert_eq!(record.date_millis, Some(1_000_000_000_000));
    assert_eq!(record.rotation_degrees, Some(90));
    assert_eq!(record.latitude, Some(-33.87));
    assert_eq!(record.longitude, Some(151.21));
    assert_eq!(record.flags, MetadataFlags::empty());
}

#[test]
fn zero_orientation_from_exif_reader_is_ignored() {
    let backends = FakeExif {
        orientation: Some(0),
        ..Default::default()
    }
    .into_backends(Snapshot::default().into_backends());
    let record = fetcher(backends).catalog_metadata(&request("image/jpeg")).unwrap();
    assert_eq!(record.rotation_degrees, None);
}

#[test]
fn exif_reader_is_not_consulted_when_primary_found_exif() {
    let snapshot = snapshot(vec![dir("Exif IFD0", DirectoryKind::ExifIfd0, &[("Make", "Acme")])]);
    let backends = FakeExif {
        orientation: Some(8),
        ..Default::default()
    }
    .into_backends(snapshot.into_backends());
    let record = fetcher(backends).catalog_metadata(&request("image/jpeg")).unwrap();
    assert_eq!(record.rotation_degrees, None);
}

#[test]
fn multi_page_tiff_and_spherical_video_flags() {
    let mut tiff = snapshot(Vec::new());
    tiff.tiff_page_count = Some(3);
    let record = fetcher(tiff.into_backends()).catalog_metadata(&request("image/tiff")).unwrap();
    assert_eq!(record.flags, MetadataFlags::MULTIPAGE);

    let spherical = snapshot(vec![core_types::Directory::new(
        "UUID",
        DirectoryKind::UuidBox {
            uuid: engine::reconcile::SPHERICAL_VIDEO_UUID.to_string(),
            user_data: Vec::new(),
        },
    )
    .with_tag(Tag::new(1, "UUID", engine::reconcile::SPHERICAL_VIDEO_UUID))]);
    let record = fetcher(spherical.into_backends()).catalog_metadata(&request("video/mp4")).unwrap();
    assert_eq!(record.flags, MetadataFlags::SPHERICAL);
}

#[test]
fn empty_everywhere_is_an_empty_record() {
    let record = fetcher(Snapshot::default().into_backends())
        .catalog_metadata(&request("image/jpeg"))
        .unwrap();
    assert_eq!(record, CatalogRecord::default());
    assert_eq!(serde_json::to_value(&record).unwrap(), serde_json::json!({ "flags": 0 }));
}

#[test]
fn heic_with_single_track_is_not_multipage() {
    let mut snapshot = snapshot(vec![dir("Exif IFD0", DirectoryKind::ExifIfd0, &[])
        .with_tag(Tag::new(exif::ORIENTATION, "Orientation", "Top, left side (Horizontal / normal)").with_value(TagValue::Int(1)))]);
    snapshot.media = media(&[("Number of Tracks", "1")]);
    let record = fetcher(snapshot.into_backends()).catalog_metadata(&request("image/heif")).unwrap();
    assert_eq!(record.flags, MetadataFlags::empty());
    assert_eq!(record.rotation_degrees, Some(0));
}
