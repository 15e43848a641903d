//! # UMPA Analysis
//!
//! Pitch analysis for recorded and live audio.
//!
//! This crate provides:
//! - **Frame segmentation**: fixed-length frames at a fixed hop, borrowed from the input
//! - **Pitch estimation**: autocorrelation lag search, direct or FFT-based
//! - **Pitch tracks**: per-frame estimates with time labels and summary statistics
//! - **Comparison**: two independent tracks on a shared positional time axis
//! - **Live sampling**: periodic estimates from a continuous input with lock-free reads
//!
//! All analysis operates on raw `&[f32]` sample buffers or [`DecodedAudio`].
//!
//! ## Example
//!
//! ```rust
//! use umpa_analysis::{AutocorrelationEstimator, PitchEstimator, TrackAnalyzer};
//! use umpa_core::{AnalysisConfig, DecodedAudio};
//!
//! let sample_rate = 16000;
//! let samples: Vec<f32> = (0..sample_rate)
//!     .map(|i| (2.0 * std::f32::consts::PI * 200.0 * i as f32 / sample_rate as f32).sin())
//!     .collect();
//!
//! // One frame
//! let estimator = AutocorrelationEstimator::new();
//! let pitch = estimator.estimate(&samples[..320], sample_rate);
//! assert_eq!(pitch, 200.0);
//!
//! // Whole recording
//! let audio = DecodedAudio::mono(sample_rate, samples).unwrap();
//! let analyzer = TrackAnalyzer::new(AnalysisConfig::default()).unwrap();
//! let track = analyzer.analyze("tone.wav", &audio).unwrap();
//! assert_eq!(track.len(), 50);
//! ```
//!
//! [`DecodedAudio`]: umpa_core::DecodedAudio

pub mod compare;
pub mod error;
pub mod frame;
pub mod live;
pub mod pitch;
pub mod track;

pub use compare::{Comparison, ComparisonAligner, ComparisonRow, Side, TrackInput};
pub use error::{LiveError, LiveResult};
pub use frame::{FrameSegmenter, Frames};
#[cfg(feature = "microphone")]
pub use live::Microphone;
pub use live::{LiveSampler, LiveSource, LiveState, LiveStatus, RingBufferSource};
pub use pitch::{
    autocorrelation, AutocorrelationEstimator, FftAutocorrelation, PitchEstimator, PitchRange,
};
pub use track::{time_label, PitchTrack, TrackAnalyzer, TrackStatistics};
