use gpx_activities::pipeline::{self, parse};

fn sample_gpx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1"
     xmlns:gpxtpx="http://www.garmin.com/xmlschemas/TrackPointExtension/v1">
  <metadata><name>Export from watch</name></metadata>
  <trk>
    <name>Morning Run</name>
    <type>Run</type>
    <trkseg>
      <trkpt lat="45.0" lon="-73.0">
        <ele>100</ele>
        <time>2025-06-01T08:00:00Z</time>
        <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>140</gpxtpx:hr><gpxtpx:cad>86</gpxtpx:cad></gpxtpx:TrackPointExtension></extensions>
      </trkpt>
      <trkpt lat="45.001" lon="-73.0"><ele>150</ele><time>2025-06-01T08:00:10Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="45.002" lon="-73.0"><ele>120</ele><time>2025-06-01T08:00:20Z</time></trkpt>
    </trkseg>
  </trk>
  <trk>
    <name>Cool down</name>
    <type>Walk</type>
    <trkseg><trkpt lat="45.003" lon="-73.0"/></trkseg>
  </trk>
</gpx>"#
}

#[test]
fn reads_first_track_metadata_and_all_points() {
    let document = parse::parse(sample_gpx().as_bytes()).expect("document");

    assert_eq!(document.title, "Morning Run");
    assert_eq!(document.activity_type, "Run");
    assert_eq!(document.points.len(), 4);

    let first = &document.points[0];
    assert_eq!(first.lat.as_deref(), Some("45.0"));
    assert_eq!(first.elevation.as_deref(), Some("100"));
    assert_eq!(first.time.as_deref(), Some("2025-06-01T08:00:00Z"));
    assert_eq!(first.heart_rate.as_deref(), Some("140"));
    assert_eq!(first.cadence.as_deref(), Some("86"));

    let last = &document.points[3];
    assert_eq!(last.lon.as_deref(), Some("-73.0"));
    assert_eq!(last.time, None);
}

#[test]
fn missing_name_and_type_use_defaults() {
    let gpx = r#"<gpx><metadata><name>Not a title</name></metadata>
        <trk><trkseg><trkpt lat="1" lon="2"/></trkseg></trk></gpx>"#;
    let document = parse::parse(gpx.as_bytes()).expect("document");

    assert_eq!(document.title, "Untitled Activity");
    assert_eq!(document.activity_type, "Unknown");
    assert_eq!(document.points.len(), 1);
}

#[test]
fn empty_elements_are_kept_as_empty_text() {
    let gpx = r#"<gpx><trk><trkseg><trkpt lat="1" lon="2"><ele/><time></time></trkpt></trkseg></trk></gpx>"#;
    let document = parse::parse(gpx.as_bytes()).expect("document");

    assert_eq!(document.points[0].elevation.as_deref(), Some(""));
    assert_eq!(document.points[0].time.as_deref(), Some(""));
}

#[test]
fn waypoints_and_route_points_are_ignored() {
    let gpx = r#"<gpx><wpt lat="1" lon="1"><ele>5</ele></wpt>
        <rte><rtept lat="2" lon="2"/></rte></gpx>"#;
    let document = parse::parse(gpx.as_bytes()).expect("document");
    assert!(document.points.is_empty());
}

#[test]
fn malformed_markup_is_an_error() {
    let result = parse::parse(b"<gpx><trk><trkseg></trk></gpx>");
    assert!(result.is_err());
}

#[test]
fn import_computes_metrics_from_markup() {
    let metrics = pipeline::import(sample_gpx().as_bytes()).expect("metrics");

    assert_eq!(metrics.track_point_count, 4);
    assert_eq!(metrics.elevation_gain_m, 50.0);
    assert_eq!(metrics.elevation_loss_m, 30.0);
    assert!((metrics.distance_m - 222.39).abs() < 0.05);
    assert_eq!(metrics.points[0].heart_rate, Some(140));

    let json = metrics.coordinates().to_json().expect("json");
    assert_eq!(
        json,
        "[[45.0,-73.0],[45.001,-73.0],[45.002,-73.0],[45.003,-73.0]]"
    );
}

#[test]
fn import_many_keeps_order_and_isolates_failures() {
    let payloads: Vec<&[u8]> = vec![
        sample_gpx().as_bytes(),
        &b"<gpx><trk></gpx>"[..],
        &b"<gpx/>"[..],
    ];
    let results = pipeline::import_many(&payloads);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().expect("first").title, "Morning Run");
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().expect("third").track_point_count, 0);
}

#[test]
fn truncated_document_is_an_error() {
    let gpx = r#"<gpx><trk><trkseg><trkpt lat="1" lon="2"><time>2025-06-01T08:00:00Z</time></trkpt>"#;
    assert!(parse::parse(gpx.as_bytes()).is_err());
}

#[test]
fn plain_text_is_an_error() {
    assert!(parse::parse(b"this is not xml at all").is_err());
    assert!(pipeline::import(b"this is not xml at all").is_err());
}

#[test]
fn empty_payload_is_an_error() {
    assert!(parse::parse(b"").is_err());
    assert!(parse::parse(b"<?xml version=\"1.0\"?>\n").is_err());
}

#[test]
fn second_root_element_is_an_error() {
    assert!(parse::parse(b"<gpx></gpx><gpx></gpx>").is_err());
    assert!(parse::parse(b"<gpx></gpx>trailing").is_err());
}

#[test]
fn whitespace_around_the_root_is_accepted() {
    let document = parse::parse(b"\n  <gpx><trk><name>Loop</name></trk></gpx>\n\n").expect("document");
    assert_eq!(document.title, "Loop");
}

#[test]
fn first_repeated_point_field_wins() {
    let gpx = r#"<gpx><trk><trkseg><trkpt lat="1" lon="2">
        <ele>10</ele><ele>oops</ele>
        <time>2025-01-01T00:00:00Z</time><time>garbage</time>
        <extensions><TrackPointExtension><hr>120</hr><hr>0</hr><cad>80</cad><cad>x</cad></TrackPointExtension></extensions>
    </trkpt></trkseg></trk></gpx>"#;
    let document = parse::parse(gpx.as_bytes()).expect("document");
    let point = &document.points[0];

    assert_eq!(point.elevation.as_deref(), Some("10"));
    assert_eq!(point.time.as_deref(), Some("2025-01-01T00:00:00Z"));
    assert_eq!(point.heart_rate.as_deref(), Some("120"));
    assert_eq!(point.cadence.as_deref(), Some("80"));

    let metrics = pipeline::import(gpx.as_bytes()).expect("metrics");
    assert_eq!(metrics.track_point_count, 1);
}
