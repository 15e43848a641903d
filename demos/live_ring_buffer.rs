//! # Live sampling
//!
//! Feed a ring buffer from a producer thread (standing in for an audio
//! callback) and poll the live pitch while the tone glides upward.
//!
//! **Concepts:** `RingBufferSource`, `start_live()`, `current_pitch()`, `stop_live()`
//!
//! ```bash
//! cargo run --example live_ring_buffer
//! ```
//!
//! With `--features microphone`, `engine.start_microphone()` samples the
//! default input device the same way.

use ringbuf::traits::Producer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use umpa::prelude::*;
use umpa::RingBufferSource;

const SAMPLE_RATE: u32 = 16000;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let engine = UmpaEngine::builder()
        .live_interval(Duration::from_millis(100))
        .build()?;

    let (mut producer, source) =
        RingBufferSource::channel(SAMPLE_RATE, engine.config().live.window_samples, 1 << 15);
    engine.start_live(source)?;

    let running = Arc::new(AtomicBool::new(true));
    let feeder = {
        let running = Arc::clone(&running);
        std::thread::spawn(move || {
            // 10 ms blocks, 120 Hz gliding to 320 Hz over two seconds
            let mut phase = 0.0f64;
            let mut block = [0.0f32; 160];
            let mut elapsed = 0.0f64;
            while running.load(Ordering::Relaxed) {
                let frequency = 120.0 + 100.0 * elapsed.min(2.0);
                for s in block.iter_mut() {
                    phase += 2.0 * std::f64::consts::PI * frequency / SAMPLE_RATE as f64;
                    *s = phase.sin() as f32 * 0.5;
                }
                producer.push_slice(&block);
                elapsed += 0.01;
                std::thread::sleep(Duration::from_millis(10));
            }
        })
    };

    for _ in 0..25 {
        std::thread::sleep(Duration::from_millis(100));
        match engine.current_pitch() {
            Some(pitch) => println!("{:?}: {:7.2} Hz", engine.live_status(), pitch),
            None => println!("{:?}: waiting for audio", engine.live_status()),
        }
    }

    engine.stop_live();
    running.store(false, Ordering::Relaxed);
    let _ = feeder.join();

    let window = engine.live_pitches();
    println!("{:?} with {} estimates in the rolling window", engine.live_status(), window.len());
    engine.reset_live();

    Ok(())
}
