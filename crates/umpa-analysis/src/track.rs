//! Pitch tracks over whole recordings.
//!
//! [`TrackAnalyzer`] walks the frames of a decoded buffer in order, runs the
//! pitch estimator on each and packages the result as a [`PitchTrack`].

use crate::frame::FrameSegmenter;
use crate::pitch::{AutocorrelationEstimator, PitchEstimator};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::sync::Arc;
use umpa_core::{AnalysisConfig, DecodedAudio, Error, Result};

/// Label for a frame starting at `start_sample`: seconds with one decimal
/// and an `s` suffix (`"0.0s"`, `"1.5s"`).
pub fn time_label(start_sample: usize, sample_rate: u32) -> String {
    format!("{:.1}s", start_sample as f64 / sample_rate as f64)
}

/// The result of analyzing one recording. Immutable once built.
///
/// `pitches[i]` is the estimate for the frame starting at `time_labels[i]`;
/// both have one entry per frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", try_from = "PitchTrackRecord")
)]
pub struct PitchTrack {
    file_name: String,
    #[cfg_attr(feature = "serialization", serde(rename = "duration"))]
    duration_seconds: f64,
    sample_rate: u32,
    #[cfg_attr(feature = "serialization", serde(rename = "channels"))]
    channel_count: u32,
    #[cfg_attr(feature = "serialization", serde(rename = "pitchData"))]
    pitches: Vec<f32>,
    time_labels: Vec<String>,
    timestamp: DateTime<Utc>,
}

/// Wire shape of [`PitchTrack`], validated on the way in.
#[cfg(feature = "serialization")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct PitchTrackRecord {
    file_name: String,
    #[serde(rename = "duration")]
    duration_seconds: f64,
    sample_rate: u32,
    #[serde(rename = "channels")]
    channel_count: u32,
    #[serde(rename = "pitchData")]
    pitches: Vec<f32>,
    time_labels: Vec<String>,
    timestamp: DateTime<Utc>,
}

#[cfg(feature = "serialization")]
impl TryFrom<PitchTrackRecord> for PitchTrack {
    type Error = Error;

    fn try_from(record: PitchTrackRecord) -> Result<Self> {
        PitchTrack::new(
            record.file_name,
            record.duration_seconds,
            record.sample_rate,
            record.channel_count,
            record.pitches,
            record.time_labels,
            record.timestamp,
        )
    }
}

impl PitchTrack {
    /// Assemble a track from its parts. Pitches and labels must pair up.
    pub fn new(
        file_name: impl Into<String>,
        duration_seconds: f64,
        sample_rate: u32,
        channel_count: u32,
        pitches: Vec<f32>,
        time_labels: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        if pitches.len() != time_labels.len() {
            return Err(Error::InvalidAudio(format!(
                "{} pitches but {} time labels",
                pitches.len(),
                time_labels.len()
            )));
        }
        if let Some(bad) = pitches.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(Error::InvalidAudio(format!("invalid pitch value {}", bad)));
        }
        Ok(Self {
            file_name: file_name.into(),
            duration_seconds,
            sample_rate,
            channel_count,
            pitches,
            time_labels,
            timestamp,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u32 {
        self.channel_count
    }

    /// Per-frame estimates in Hz, `0.0` for unvoiced frames.
    pub fn pitches(&self) -> &[f32] {
        &self.pitches
    }

    pub fn time_labels(&self) -> &[String] {
        &self.time_labels
    }

    /// When the analysis ran.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    /// `(time_label, pitch)` pairs for charting.
    pub fn points(&self) -> impl ExactSizeIterator<Item = (&str, f32)> + '_ {
        self.time_labels
            .iter()
            .map(String::as_str)
            .zip(self.pitches.iter().copied())
    }

    pub fn statistics(&self) -> TrackStatistics {
        TrackStatistics::from_pitches(&self.pitches)
    }
}

/// Summary of a pitch sequence. Unvoiced zeros are included, so a mostly
/// silent track has a low average and a minimum of 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TrackStatistics {
    pub average: f32,
    pub maximum: f32,
    pub minimum: f32,
}

impl TrackStatistics {
    /// All zero for an empty slice.
    pub fn from_pitches(pitches: &[f32]) -> Self {
        if pitches.is_empty() {
            return Self::default();
        }
        let sum: f64 = pitches.iter().map(|&p| p as f64).sum();
        let maximum = pitches.iter().copied().fold(f32::MIN, f32::max);
        let minimum = pitches.iter().copied().fold(f32::MAX, f32::min);
        Self {
            average: (sum / pitches.len() as f64) as f32,
            maximum,
            minimum,
        }
    }

    /// Number of voiced (non-zero) entries in `pitches`.
    pub fn voiced_count(pitches: &[f32]) -> usize {
        pitches.iter().filter(|&&p| p > 0.0).count()
    }
}

/// Runs the frame segmenter and the pitch estimator over whole buffers.
#[derive(Clone)]
pub struct TrackAnalyzer {
    config: AnalysisConfig,
    estimator: Arc<dyn PitchEstimator>,
}

impl std::fmt::Debug for TrackAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackAnalyzer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TrackAnalyzer {
    /// Analyzer using the direct autocorrelation estimator.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let estimator = Arc::new(AutocorrelationEstimator::from_config(&config));
        Self::with_estimator(config, estimator)
    }

    /// Analyzer using a caller-supplied estimator.
    pub fn with_estimator(
        config: AnalysisConfig,
        estimator: Arc<dyn PitchEstimator>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, estimator })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn estimator(&self) -> &Arc<dyn PitchEstimator> {
        &self.estimator
    }

    /// Per-frame estimates for a mono buffer.
    pub fn estimate_frames(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>> {
        let segmenter = FrameSegmenter::from_config(&self.config, sample_rate)?;
        let frames = segmenter.segment(samples)?;

        let pitches = if self.config.parallel {
            let count = frames.len();
            (0..count)
                .into_par_iter()
                .map(|i| match segmenter.frame(samples, i) {
                    Some(frame) => self.estimator.estimate(frame, sample_rate),
                    None => 0.0,
                })
                .collect()
        } else {
            frames
                .map(|frame| self.estimator.estimate(frame, sample_rate))
                .collect()
        };
        Ok(pitches)
    }

    /// Analyze channel 0 of `audio` into a [`PitchTrack`].
    pub fn analyze(&self, file_name: &str, audio: &DecodedAudio) -> Result<PitchTrack> {
        let sample_rate = audio.sample_rate();
        let samples = audio.primary_channel();

        let pitches = self.estimate_frames(samples, sample_rate)?;
        let hop_size = self.config.hop_size(sample_rate);
        let time_labels = (0..pitches.len())
            .map(|i| time_label(i * hop_size, sample_rate))
            .collect();

        let track = PitchTrack::new(
            file_name,
            audio.duration_seconds(),
            sample_rate,
            audio.channel_count() as u32,
            pitches,
            time_labels,
            Utc::now(),
        )?;

        tracing::debug!(
            "Analyzed {}: {} frames, {} voiced, {:.2}s",
            file_name,
            track.len(),
            TrackStatistics::voiced_count(track.pitches()),
            track.duration_seconds()
        );
        Ok(track)
    }
}
