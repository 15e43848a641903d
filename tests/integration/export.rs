//! Export tests through the engine

use crate::helpers::*;
use umpa::export::{from_json, report_file_name, ExportError};
use umpa::prelude::*;

fn sine_track(engine: &UmpaEngine) -> PitchTrack {
    let mut samples = generate_sine(200.0, TEST_SAMPLE_RATE, 8000);
    samples.extend(generate_silence(1600));
    engine.analyze("take.wav", &mono(samples)).unwrap()
}

#[test]
fn test_json_round_trip() {
    let engine = test_engine();
    let track = sine_track(&engine);

    let json = engine.export_json(&track).unwrap();
    assert!(json.contains("\"averagePitch\""));
    assert!(json.contains("\"maxPitch\": 200.0"));
    assert!(json.contains("\"minPitch\": 0.0"));
    assert_eq!(from_json(&json).unwrap(), track);
}

#[test]
fn test_csv_rows() {
    let engine = test_engine();
    let track = sine_track(&engine);

    let csv = engine.export_csv(&track).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), track.len() + 1);
    assert_eq!(lines[0], "time,pitch");
    assert_eq!(lines[1], "0.0s,200.00");
    assert_eq!(lines[30], "0.6s,0.00");
    for line in &lines[1..] {
        let pitch = line.split(',').nth(1).unwrap();
        assert_eq!(pitch.split('.').nth(1).map(str::len), Some(2), "{}", line);
    }
}

#[test]
fn test_report() {
    let engine = test_engine();
    let track = sine_track(&engine);

    let html = engine.export_report(&track).unwrap();
    assert!(html.contains("take.wav"));
    assert!(html.contains("200.00 Hz"));

    let date = track.timestamp().date_naive();
    assert!(report_file_name(&track, date).starts_with("take_analysis_"));
}

#[test]
fn test_export_to_file() {
    let engine = test_engine();
    let track = sine_track(&engine);
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("take.json");
    assert_eq!(engine.export_to_file(&track, &json_path).unwrap(), ExportFormat::Json);
    assert_eq!(from_json(&std::fs::read_to_string(&json_path).unwrap()).unwrap(), track);

    let csv_path = dir.path().join("take.CSV");
    assert_eq!(engine.export_to_file(&track, &csv_path).unwrap(), ExportFormat::Csv);
    assert_eq!(
        std::fs::read_to_string(&csv_path).unwrap(),
        engine.export_csv(&track).unwrap()
    );

    let html_path = dir.path().join("take.html");
    assert_eq!(engine.export_to_file(&track, &html_path).unwrap(), ExportFormat::Html);

    let result = engine.export_to_file(&track, dir.path().join("take.txt"));
    assert!(matches!(
        result,
        Err(Error::Export(ExportError::UnsupportedFormat(_)))
    ));
}

/// An exported document can be read back and analyzed statistics agree.
#[test]
fn test_imported_track_statistics() {
    let engine = test_engine();
    let track = sine_track(&engine);
    let back = from_json(&engine.export_json(&track).unwrap()).unwrap();
    assert_eq!(back.statistics(), track.statistics());
}
