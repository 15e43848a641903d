//! # UMPA - Pitch Analysis Engine
//!
//! Estimate a pitch contour from recorded or live audio, compare two
//! recordings, keep a history of analyses and export them.
//!
//! ## Architecture
//!
//! UMPA is an umbrella crate that coordinates:
//! - **umpa-core** - Configuration, errors, decoded audio, audio sources, decoding
//! - **umpa-analysis** - Frame segmentation, autocorrelation pitch estimation,
//!   pitch tracks, comparison, live sampling
//! - **umpa-export** - JSON, CSV and HTML report output
//! - **umpa-history** - Persisted analysis history
//!
//! ## Quick Start
//!
//! ```ignore
//! use umpa::prelude::*;
//!
//! let engine = UmpaEngine::builder()
//!     .pitch_range(50.0, 400.0)
//!     .build()?;
//!
//! // Single track
//! let track = engine.analyze_source(&AudioSource::from_path("take.wav")?)?;
//! for (time, pitch) in track.points() {
//!     println!("{time}: {pitch:.2} Hz");
//! }
//!
//! // Two tracks on a shared time axis
//! let comparison = engine.compare_sources(&first, &second);
//! for row in comparison.chart_rows() {
//!     println!("{}: {:?} / {:?}", row.label, row.first, row.second);
//! }
//!
//! // Live input
//! engine.start_microphone()?;
//! let current = engine.current_pitch();
//! engine.stop_live();
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - WAV decoding
//! - `full` - Everything enabled
//! - `wav`, `flac`, `mp3`, `ogg`, `files` - Audio decoders
//! - `microphone` - Default input device capture for live sampling

/// Re-export of umpa-core for direct access
pub use umpa_core as core;

/// Re-export of umpa-analysis for direct access
pub use umpa_analysis as analysis;

/// Re-export of umpa-export for direct access
pub use umpa_export as export;

/// Re-export of umpa-history for direct access
pub use umpa_history as history;

// Core types
pub use umpa_core::{
    AnalysisConfig, AudioSource, DecodeHandle, DecodeStatus, DecodedAudio, LiveConfig,
    RangePolicy, SourceId, SourceList,
};

// Analysis
pub use umpa_analysis::{
    AutocorrelationEstimator, Comparison, ComparisonRow, FftAutocorrelation, FrameSegmenter,
    LiveSource, LiveState, LiveStatus, PitchEstimator, PitchRange, PitchTrack, RingBufferSource,
    Side, TrackAnalyzer, TrackInput, TrackStatistics,
};

#[cfg(feature = "microphone")]
pub use umpa_analysis::Microphone;

// Export
pub use umpa_export::ExportFormat;

// History
pub use umpa_history::{FileStore, HistoryEntry, HistoryStore, KeyValueStore, MemoryStore};

mod builder;
mod engine;
mod error;

pub use builder::UmpaEngineBuilder;
pub use engine::UmpaEngine;
pub use error::{Error, Result};

/// Convenience prelude for common imports
pub mod prelude {
    // Main engine
    pub use crate::{Error, Result, UmpaEngine, UmpaEngineBuilder};

    // Input
    pub use crate::core::{AnalysisConfig, AudioSource, DecodedAudio, SourceList};

    // Analysis results
    pub use crate::analysis::{
        Comparison, LiveSource, LiveStatus, PitchEstimator, PitchTrack, Side, TrackInput,
    };

    // Output
    pub use crate::export::ExportFormat;
    pub use crate::history::HistoryEntry;

    pub use std::time::Duration;
}
