//! Comparison tests
//!
//! Two recordings analyzed independently and laid on the time axis of the
//! longer one.

use crate::helpers::tolerances::PITCH_TOLERANCE_HZ;
use crate::helpers::*;
use umpa::prelude::*;

/// 3.0 s against 1.0 s at 16 kHz: 150 and 50 frames, axis of 150 labels.
#[test]
fn test_longer_track_sets_the_axis() {
    let engine = test_engine();
    let long = wav_source("long.wav", TEST_SAMPLE_RATE, generate_sine(150.0, TEST_SAMPLE_RATE, 48000));
    let short = wav_source("short.wav", TEST_SAMPLE_RATE, generate_sine(250.0, TEST_SAMPLE_RATE, 16000));

    let comparison = engine.compare_sources(&short, &long);
    assert!(comparison.is_complete());
    assert_eq!(comparison.track(Side::First).unwrap().len(), 50);
    assert_eq!(comparison.track(Side::Second).unwrap().len(), 150);
    assert_eq!(comparison.axis_side(), Some(Side::Second));
    assert_eq!(comparison.time_axis().len(), 150);
    assert_eq!(comparison.time_axis()[149], "3.0s");

    let rows: Vec<_> = comparison.chart_rows().collect();
    assert_eq!(rows.len(), 150);
    for row in &rows[..50] {
        assert!((row.first.unwrap() - 250.0).abs() < PITCH_TOLERANCE_HZ);
        assert!((row.second.unwrap() - 150.0).abs() < PITCH_TOLERANCE_HZ);
    }
    for row in &rows[50..] {
        assert_eq!(row.first, None);
        assert!(row.second.is_some());
    }
}

#[test]
fn test_equal_lengths_use_first_axis() {
    let engine = test_engine();
    let a = mono(generate_sine(200.0, TEST_SAMPLE_RATE, 16000));
    let b = mono(generate_silence(16000));

    let comparison = engine.compare(TrackInput::new("a.wav", &a), TrackInput::new("b.wav", &b));
    assert_eq!(comparison.axis_side(), Some(Side::First));
    assert_eq!(comparison.series(Side::First).unwrap().len(), 50);
    assert!(comparison.series(Side::Second).unwrap().iter().all(|&p| p == 0.0));
}

/// A failed side does not discard the other side's track.
#[test]
fn test_failed_side_is_isolated() {
    let engine = test_engine();
    let good = wav_source("good.wav", TEST_SAMPLE_RATE, generate_sine(200.0, TEST_SAMPLE_RATE, 16000));
    let bad = AudioSource::from_bytes("bad.wav", b"garbage".to_vec());

    let comparison = engine.compare_sources(&bad, &good);
    assert!(!comparison.is_complete());
    assert!(comparison.error(Side::First).is_some());
    assert_eq!(comparison.track(Side::Second).unwrap().len(), 50);
    assert_eq!(comparison.axis_side(), Some(Side::Second));

    let rows: Vec<_> = comparison.chart_rows().collect();
    assert_eq!(rows.len(), 50);
    assert!(rows.iter().all(|row| row.first.is_none()));
}

#[test]
fn test_both_sides_failing() {
    let engine = test_engine();
    let short = mono(generate_silence(10));
    let comparison = engine.compare(
        TrackInput::new("a.wav", &short),
        TrackInput::new("b.wav", &short),
    );

    assert_eq!(comparison.axis_side(), None);
    assert!(comparison.time_axis().is_empty());
    assert_eq!(comparison.chart_rows().count(), 0);
    assert!(engine.export_comparison_report(&comparison).is_err());
}

#[test]
fn test_comparison_exports() {
    let engine = test_engine();
    let a = mono(generate_sine(200.0, TEST_SAMPLE_RATE, 32000));
    let b = mono(generate_sine(100.0, TEST_SAMPLE_RATE, 16000));
    let comparison = engine.compare(TrackInput::new("a.wav", &a), TrackInput::new("b.wav", &b));

    let csv = engine.export_comparison_csv(&comparison).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 101);
    assert_eq!(lines[0], "time,first,second");
    assert_eq!(lines[1], "0.0s,200.00,100.00");
    assert_eq!(lines[100], "2.0s,200.00,");

    let html = engine.export_comparison_report(&comparison).unwrap();
    assert!(html.contains("File 1: a.wav"));
    assert!(html.contains("File 2: b.wav"));
}
