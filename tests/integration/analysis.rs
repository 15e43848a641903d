//! Single-track analysis tests
//!
//! Decoded buffers and WAV sources (in memory and on disk) through the
//! engine, including the degenerate inputs that must not produce a track.

use crate::helpers::tolerances::{FLOAT_EPSILON, PITCH_TOLERANCE_HZ};
use crate::helpers::*;
use approx::assert_abs_diff_eq;
use umpa::core::Error as CoreError;
use umpa::prelude::*;
use umpa::{DecodeHandle, DecodeStatus};

/// One second of silence at 16 kHz: 50 unvoiced frames, zero statistics.
#[test]
fn test_silent_second() {
    let engine = test_engine();
    let track = engine
        .analyze("silence.wav", &mono(generate_silence(16000)))
        .unwrap();

    assert_eq!(track.len(), 50);
    assert_eq!(track.time_labels().len(), 50);
    assert_eq!(track.time_labels()[0], "0.0s");
    assert_eq!(track.time_labels()[49], "1.0s");
    assert_unvoiced(&track);

    let stats = track.statistics();
    assert_eq!(stats.average, 0.0);
    assert_eq!(stats.maximum, 0.0);
    assert_eq!(stats.minimum, 0.0);

    assert_eq!(track.sample_rate(), 16000);
    assert_eq!(track.channel_count(), 1);
    assert_abs_diff_eq!(track.duration_seconds(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_sine_source_in_memory() {
    let engine = test_engine();
    let source = wav_source("tone.wav", TEST_SAMPLE_RATE, generate_sine(220.0, TEST_SAMPLE_RATE, 16000));

    let track = engine.analyze_source(&source).unwrap();
    assert_eq!(track.file_name(), "tone.wav");
    assert_eq!(track.len(), 50);
    for (label, pitch) in track.points() {
        assert!(
            (pitch - 220.0).abs() < PITCH_TOLERANCE_HZ,
            "{}: {} Hz",
            label,
            pitch
        );
    }
}

#[test]
fn test_sine_source_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let source = wav_file_source(
        &dir.path().join("low.wav"),
        TEST_SAMPLE_RATE,
        generate_sine(110.0, TEST_SAMPLE_RATE, 8000),
    );

    let track = engine_track(&source);
    assert_eq!(track.file_name(), "low.wav");
    assert_eq!(track.len(), 25);
    let stats = track.statistics();
    assert!((stats.average - 110.0).abs() < PITCH_TOLERANCE_HZ);
}

fn engine_track(source: &AudioSource) -> PitchTrack {
    test_engine().analyze_source(source).unwrap()
}

/// Only the first channel is analyzed; the channel count is still reported.
#[test]
fn test_stereo_uses_first_channel() {
    let engine = test_engine();
    let left = generate_sine(200.0, TEST_SAMPLE_RATE, 16000);
    let right = generate_silence(16000);
    let source = AudioSource::from_bytes("stereo.wav", wav_bytes(TEST_SAMPLE_RATE, &[left, right]));

    let track = engine.analyze_source(&source).unwrap();
    assert_eq!(track.channel_count(), 2);
    assert!(track.pitches().iter().all(|&p| (p - 200.0).abs() < FLOAT_EPSILON));
}

#[test]
fn test_statistics_cover_every_frame() {
    let engine = test_engine();
    let mut samples = generate_sine(200.0, TEST_SAMPLE_RATE, 8000);
    samples.extend(generate_silence(8000));

    let track = engine.analyze("half.wav", &mono(samples)).unwrap();
    assert_eq!(track.len(), 50);

    // Unvoiced frames count toward the average and the minimum.
    let stats = track.statistics();
    assert_abs_diff_eq!(stats.average, 100.0, epsilon = 1e-3);
    assert_eq!(stats.maximum, 200.0);
    assert_eq!(stats.minimum, 0.0);
}

#[test]
fn test_degenerate_inputs() {
    let engine = test_engine();

    let empty = engine.analyze("empty.wav", &mono(Vec::new()));
    assert!(matches!(
        empty,
        Err(Error::Core(CoreError::UnanalyzableInput(_)))
    ));

    let short = engine.analyze("short.wav", &mono(generate_silence(100)));
    assert!(matches!(
        short,
        Err(Error::Core(CoreError::UnanalyzableInput(_)))
    ));

    // 40 Hz gives a hop of 0 samples
    let audio = DecodedAudio::mono(40, generate_silence(400)).unwrap();
    assert!(matches!(
        engine.analyze("slow.wav", &audio),
        Err(Error::Core(CoreError::UnanalyzableInput(_)))
    ));
}

#[test]
fn test_undecodable_source() {
    let engine = test_engine();
    let source = AudioSource::from_bytes("broken.wav", b"definitely not a wav file".to_vec());

    match engine.analyze_source(&source) {
        Err(Error::Core(e)) => assert!(e.is_decode_failure(), "unexpected error {:?}", e),
        other => panic!("expected decode failure, got {:?}", other.map(|t| t.len())),
    }
}

#[test]
fn test_background_decode_then_analyze() {
    let engine = test_engine();
    let source = wav_source("bg.wav", TEST_SAMPLE_RATE, generate_sine(150.0, TEST_SAMPLE_RATE, 16000));

    let mut handle = DecodeHandle::start(source).unwrap();
    assert_eq!(handle.source_name(), "bg.wav");
    assert!(wait_until(Duration::from_secs(5), || handle.is_done()));

    let audio = match handle.poll() {
        DecodeStatus::Complete(audio) => audio,
        DecodeStatus::Pending => panic!("decode still pending"),
        DecodeStatus::Failed(e) => panic!("decode failed: {}", e),
    };
    let track = engine.analyze(handle.source_name(), &audio).unwrap();
    assert_eq!(track.len(), 50);
}

#[test]
fn test_source_list_selection_feeds_analysis() {
    let engine = test_engine();
    let mut sources = SourceList::new();
    let a = sources
        .add(wav_source("a.wav", TEST_SAMPLE_RATE, generate_silence(16000)))
        .unwrap();
    let b = sources
        .add(wav_source("b.wav", TEST_SAMPLE_RATE, generate_sine(200.0, TEST_SAMPLE_RATE, 16000)))
        .unwrap();

    sources.select(b).unwrap();
    let selected = sources.selected().unwrap();
    let track = engine.analyze_source(selected).unwrap();
    assert_eq!(track.file_name(), "b.wav");

    sources.remove(b);
    assert!(sources.selected().is_none());
    assert!(sources.get(a).is_some());
}
