//! Test helpers and fixtures for UMPA integration tests
//!
//! Signals are generated in memory; WAV fixtures are encoded with hound
//! either to bytes (upload-style sources) or to a temporary directory.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (round-trips, statistics)
//! - `PITCH_TOLERANCE_HZ` (5.0): Sine estimates at 16 kHz (lag quantisation)

#![allow(dead_code)]

pub mod tolerances;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Cursor;
use std::path::Path;
use std::time::{Duration, Instant};
use umpa::prelude::*;

/// Default test sample rate (16 kHz gives 320-sample frames)
pub const TEST_SAMPLE_RATE: u32 = 16000;

/// Create an engine with default configuration and in-memory history.
pub fn test_engine() -> UmpaEngine {
    UmpaEngine::builder()
        .build()
        .expect("Failed to create test engine")
}

/// Generate a sine wave at `frequency` for `num_samples` samples.
pub fn generate_sine(frequency: f64, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}

/// Generate silence (zero samples).
pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Generate seeded white noise in -1..1.
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_samples).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Encode channels as a 32-bit float WAV in memory.
pub fn wav_bytes(sample_rate: u32, channels: &[Vec<f32>]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("WAV writer");
        let len = channels.first().map_or(0, Vec::len);
        for i in 0..len {
            for channel in channels {
                writer.write_sample(channel[i]).expect("WAV sample");
            }
        }
        writer.finalize().expect("WAV finalize");
    }
    cursor.into_inner()
}

/// Mono WAV source held in memory, like an uploaded file.
pub fn wav_source(name: &str, sample_rate: u32, samples: Vec<f32>) -> AudioSource {
    AudioSource::from_bytes(name, wav_bytes(sample_rate, &[samples]))
}

/// Write a mono WAV to `path` and reference it as a source.
pub fn wav_file_source(path: &Path, sample_rate: u32, samples: Vec<f32>) -> AudioSource {
    std::fs::write(path, wav_bytes(sample_rate, &[samples])).expect("write WAV");
    AudioSource::from_path(path).expect("stat WAV")
}

/// Mono decoded audio.
pub fn mono(samples: Vec<f32>) -> DecodedAudio {
    DecodedAudio::mono(TEST_SAMPLE_RATE, samples).expect("mono audio")
}

/// Poll `condition` until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}

/// Assert every pitch in a track is unvoiced.
pub fn assert_unvoiced(track: &PitchTrack) {
    if let Some((i, p)) = track.pitches().iter().enumerate().find(|(_, p)| **p != 0.0) {
        panic!("Expected unvoiced track, frame {} was {} Hz", i, p);
    }
}
