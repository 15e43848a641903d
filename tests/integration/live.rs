//! Live sampling tests
//!
//! Sessions run against synthetic sources and a ring buffer fed from a
//! producer thread, standing in for a capture callback.

use crate::helpers::tolerances::LIVE_PITCH_TOLERANCE_HZ;
use crate::helpers::*;
use ringbuf::traits::Producer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use umpa::analysis::LiveError;
use umpa::prelude::*;
use umpa::RingBufferSource;

/// Endless sine, phase-continuous across reads.
struct SineSource {
    frequency: f64,
    position: u64,
}

impl SineSource {
    fn new(frequency: f64) -> Self {
        Self {
            frequency,
            position: 0,
        }
    }
}

impl LiveSource for SineSource {
    fn sample_rate(&self) -> u32 {
        TEST_SAMPLE_RATE
    }

    fn read_latest(&mut self, frame: &mut [f32]) -> usize {
        for s in frame.iter_mut() {
            let t = self.position as f64 / TEST_SAMPLE_RATE as f64;
            *s = (2.0 * std::f64::consts::PI * self.frequency * t).sin() as f32;
            self.position += 1;
        }
        frame.len()
    }
}

fn fast_engine(capacity: usize) -> UmpaEngine {
    UmpaEngine::builder()
        .live_interval(Duration::from_millis(10))
        .live_capacity(capacity)
        .build()
        .unwrap()
}

#[test]
fn test_live_session_lifecycle() {
    let engine = fast_engine(5);
    assert_eq!(engine.live_status(), LiveStatus::Idle);
    assert!(engine.current_pitch().is_none());

    engine.start_live(SineSource::new(200.0)).unwrap();
    assert_eq!(engine.live_status(), LiveStatus::Running);

    assert!(wait_until(Duration::from_secs(5), || engine.live_pitches().len() == 5));
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(engine.live_pitches().len(), 5);

    let current = engine.current_pitch().unwrap();
    assert!((current - 200.0).abs() < LIVE_PITCH_TOLERANCE_HZ, "{}", current);

    engine.stop_live();
    assert_eq!(engine.live_status(), LiveStatus::Stopped);
    let frozen = engine.live_pitches();
    std::thread::sleep(Duration::from_millis(40));
    assert_eq!(engine.live_pitches(), frozen);

    engine.reset_live();
    assert!(engine.live_pitches().is_empty());
    assert!(engine.current_pitch().is_none());
}

#[test]
fn test_second_start_rejected() {
    let engine = fast_engine(60);
    engine.start_live(SineSource::new(200.0)).unwrap();

    let result = engine.start_live(SineSource::new(300.0));
    assert!(matches!(result, Err(Error::Live(LiveError::AlreadyRunning))));

    engine.stop_live();
    engine.start_live(SineSource::new(300.0)).unwrap();
    assert_eq!(engine.live_status(), LiveStatus::Running);
    engine.stop_live();
}

#[test]
fn test_reset_while_running() {
    let engine = fast_engine(60);
    engine.start_live(SineSource::new(250.0)).unwrap();
    assert!(wait_until(Duration::from_secs(5), || engine.live_pitches().len() >= 3));

    engine.reset_live();
    assert_eq!(engine.live_status(), LiveStatus::Running);
    assert!(wait_until(Duration::from_secs(5), || !engine.live_pitches().is_empty()));
    engine.stop_live();
}

/// Nothing is recorded until the capture side delivers audio.
#[test]
fn test_ring_buffer_session() {
    let engine = fast_engine(60);
    let (mut producer, source) =
        RingBufferSource::channel(TEST_SAMPLE_RATE, engine.config().live.window_samples, 1 << 15);
    engine.start_live(source).unwrap();

    std::thread::sleep(Duration::from_millis(80));
    assert!(engine.live_pitches().is_empty());
    assert!(engine.current_pitch().is_none());

    let running = Arc::new(AtomicBool::new(true));
    let feeder = {
        let running = Arc::clone(&running);
        std::thread::spawn(move || {
            let block = generate_sine(200.0, TEST_SAMPLE_RATE, 160);
            while running.load(Ordering::Relaxed) {
                producer.push_slice(&block);
                std::thread::sleep(Duration::from_millis(10));
            }
        })
    };

    assert!(wait_until(Duration::from_secs(5), || engine.live_pitches().len() >= 3));
    let current = engine.current_pitch().unwrap();
    assert!((current - 200.0).abs() < LIVE_PITCH_TOLERANCE_HZ, "{}", current);

    engine.stop_live();
    running.store(false, Ordering::Relaxed);
    feeder.join().unwrap();
}

#[test]
fn test_live_state_shared_with_reader_thread() {
    let engine = fast_engine(60);
    let state = Arc::clone(engine.live_state());
    engine.start_live(SineSource::new(200.0)).unwrap();

    let reader = std::thread::spawn(move || {
        wait_until(Duration::from_secs(5), || state.pitches().len() >= 2)
    });
    assert!(reader.join().unwrap());
    engine.stop_live();
}
