//! # Analyze a file
//!
//! Decode an audio file, print its pitch contour and statistics, compare it
//! with a reference tone, save it to history and export it.
//!
//! **Concepts:** `analyze_source()`, `compare_sources()`, `save_to_history()`, `export_to_file()`
//!
//! ```bash
//! cargo run --example analyze_file -- path/to/take.wav
//! ```
//!
//! Without an argument a 196 Hz test tone is written to the temp directory
//! and analyzed instead.

use std::path::PathBuf;
use umpa::prelude::*;

fn write_tone(path: &PathBuf, frequency: f32, seconds: f32) -> std::result::Result<(), hound::Error> {
    let sample_rate = 16000;
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for i in 0..(sample_rate as f32 * seconds) as u32 {
        let t = i as f32 / sample_rate as f32;
        let s = (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.5;
        writer.write_sample((s * i16::MAX as f32) as i16)?;
    }
    writer.finalize()
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let out_dir = std::env::temp_dir().join("umpa_demo");
    std::fs::create_dir_all(&out_dir)?;

    let path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => {
            let path = out_dir.join("tone_196hz.wav");
            write_tone(&path, 196.0, 2.0)?;
            path
        }
    };

    let engine = UmpaEngine::builder()
        .parallel(true)
        .history_dir(out_dir.join("history"))
        .build()?;

    // Single track
    let source = AudioSource::from_path(&path)?;
    let track = engine.analyze_source(&source)?;
    println!(
        "{}: {:.2}s, {} Hz, {} channel(s), {} frames",
        track.file_name(),
        track.duration_seconds(),
        track.sample_rate(),
        track.channel_count(),
        track.len()
    );
    for (time, pitch) in track.points().step_by(10) {
        println!("  {:>6}  {:7.2} Hz", time, pitch);
    }
    let stats = track.statistics();
    println!(
        "Average {:.2} Hz, max {:.2} Hz, min {:.2} Hz",
        stats.average, stats.maximum, stats.minimum
    );

    // Against a reference tone
    let reference_path = out_dir.join("reference_220hz.wav");
    write_tone(&reference_path, 220.0, 1.0)?;
    let comparison = engine.compare_sources(&source, &AudioSource::from_path(&reference_path)?);
    println!("Comparison axis: {} points", comparison.time_axis().len());
    for side in Side::BOTH {
        match comparison.outcome(side) {
            Ok(t) => println!("  {:?}: {} ({:.2} Hz avg)", side, t.file_name(), t.statistics().average),
            Err(e) => println!("  {:?}: failed: {}", side, e),
        }
    }

    // History
    let entry = engine.save_to_history(track.clone())?;
    println!("Saved to history as {} ({} entries)", entry.id, engine.history()?.len());

    // Export
    for ext in ["json", "csv", "html"] {
        let out = out_dir.join(format!("analysis.{}", ext));
        engine.export_to_file(&track, &out)?;
        println!("Exported: {}", out.display());
    }

    Ok(())
}
