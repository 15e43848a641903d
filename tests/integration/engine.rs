//! Engine construction and configuration tests

use crate::helpers::tolerances::PITCH_TOLERANCE_HZ;
use crate::helpers::*;
use std::sync::Arc;
use umpa::core::Error as CoreError;
use umpa::prelude::*;
use umpa::RangePolicy;

struct ConstantEstimator(f32);

impl PitchEstimator for ConstantEstimator {
    fn estimate(&self, _frame: &[f32], _sample_rate: u32) -> f32 {
        self.0
    }
}

#[test]
fn test_engine_default_config() {
    let engine = test_engine();
    let config = engine.config();

    assert_eq!(config.min_pitch_hz, 50.0);
    assert_eq!(config.max_pitch_hz, 400.0);
    assert_eq!(config.frame_duration_secs, 0.02);
    assert_eq!(config.hop_duration_secs, 0.02);
    assert_eq!(config.live.capacity, 60);
    assert_eq!(config.live.interval, Duration::from_millis(100));
    assert_eq!(engine.live_status(), LiveStatus::Idle);
}

#[test]
fn test_builder_settings_reach_config() {
    let engine = UmpaEngine::builder()
        .pitch_range(80.0, 1000.0)
        .range_policy(RangePolicy::Exclusive)
        .frame_duration(Duration::from_millis(40))
        .hop_duration(Duration::from_millis(10))
        .parallel(true)
        .live_interval(Duration::from_millis(50))
        .live_capacity(30)
        .live_window(1024)
        .build()
        .unwrap();

    let config = engine.config();
    assert_eq!(config.min_pitch_hz, 80.0);
    assert_eq!(config.max_pitch_hz, 1000.0);
    assert_eq!(config.range_policy, RangePolicy::Exclusive);
    assert_eq!(config.frame_duration_secs, 0.04);
    assert_eq!(config.hop_duration_secs, 0.01);
    assert!(config.parallel);
    assert_eq!(config.live.interval, Duration::from_millis(50));
    assert_eq!(config.live.capacity, 30);
    assert_eq!(config.live.window_samples, 1024);
}

#[test]
fn test_invalid_config_rejected() {
    let result = UmpaEngine::builder().pitch_range(400.0, 50.0).build();
    assert!(matches!(
        result,
        Err(Error::Core(CoreError::InvalidConfig(_)))
    ));

    let result = UmpaEngine::builder().live_capacity(0).build();
    assert!(matches!(
        result,
        Err(Error::Core(CoreError::InvalidConfig(_)))
    ));
}

#[test]
fn test_fft_estimator_matches_direct() {
    let direct = test_engine();
    let fft = UmpaEngine::builder().fft().build().unwrap();
    let audio = mono(generate_sine(180.0, TEST_SAMPLE_RATE, 16000));

    let a = direct.analyze("tone.wav", &audio).unwrap();
    let b = fft.analyze("tone.wav", &audio).unwrap();

    assert_eq!(a.len(), b.len());
    for (x, y) in a.pitches().iter().zip(b.pitches()) {
        assert!((x - y).abs() < PITCH_TOLERANCE_HZ, "{} vs {}", x, y);
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let sequential = test_engine();
    let parallel = UmpaEngine::builder().parallel(true).build().unwrap();
    let audio = mono(generate_noise(48000, 7));

    let a = sequential.analyze("noise.wav", &audio).unwrap();
    let b = parallel.analyze("noise.wav", &audio).unwrap();
    assert_eq!(a.pitches(), b.pitches());
    assert_eq!(a.time_labels(), b.time_labels());
}

#[test]
fn test_custom_estimator_is_used() {
    let engine = UmpaEngine::builder()
        .estimator(Arc::new(ConstantEstimator(123.0)))
        .build()
        .unwrap();
    let track = engine
        .analyze("any.wav", &mono(generate_silence(3200)))
        .unwrap();

    assert_eq!(track.len(), 10);
    assert!(track.pitches().iter().all(|&p| p == 123.0));
}

#[test]
fn test_engine_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<UmpaEngine>();

    let engine = Arc::new(test_engine());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let audio = mono(generate_sine(100.0 + 50.0 * i as f64, TEST_SAMPLE_RATE, 8000));
                let track = engine.analyze(&format!("t{}.wav", i), &audio).unwrap();
                engine.save_to_history(track).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.history().unwrap().len(), 4);
}

#[test]
fn test_engine_debug() {
    let debug = format!("{:?}", test_engine());
    assert!(debug.contains("UmpaEngine"));
    assert!(debug.contains("Idle"));
}
