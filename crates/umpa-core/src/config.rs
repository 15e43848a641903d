//! Analysis configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the pitch-range gate treats estimates that land exactly on a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// `min <= pitch <= max`
    #[default]
    Inclusive,
    /// `min < pitch < max`
    Exclusive,
}

impl RangePolicy {
    pub fn contains(&self, pitch: f64, min: f64, max: f64) -> bool {
        match self {
            RangePolicy::Inclusive => pitch >= min && pitch <= max,
            RangePolicy::Exclusive => pitch > min && pitch < max,
        }
    }
}

/// Configuration for the live stream sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Wall-clock cadence between estimates.
    pub interval: Duration,
    /// Rolling window length (most recent estimates kept).
    pub capacity: usize,
    /// Number of most recent input samples fed to the estimator per tick.
    pub window_samples: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            capacity: 60,
            window_samples: 2048,
        }
    }
}

/// Configuration for frame segmentation and pitch estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Lowest accepted pitch (Hz). Bounds the longest lag searched.
    pub min_pitch_hz: f64,
    /// Highest accepted pitch (Hz). Bounds the shortest lag searched.
    pub max_pitch_hz: f64,
    /// Analysis frame length in seconds.
    pub frame_duration_secs: f64,
    /// Stride between frame starts in seconds.
    pub hop_duration_secs: f64,
    pub range_policy: RangePolicy,
    /// Estimate frames on the rayon pool. Output order is unaffected.
    pub parallel: bool,
    pub live: LiveConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_pitch_hz: 50.0,
            max_pitch_hz: 400.0,
            frame_duration_secs: 0.02,
            hop_duration_secs: 0.02,
            range_policy: RangePolicy::Inclusive,
            parallel: false,
            live: LiveConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_pitch_hz.is_finite() && self.min_pitch_hz > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "min_pitch_hz {} must be positive",
                self.min_pitch_hz
            )));
        }
        if !(self.max_pitch_hz.is_finite() && self.max_pitch_hz > self.min_pitch_hz) {
            return Err(Error::InvalidConfig(format!(
                "max_pitch_hz {} must be greater than min_pitch_hz {}",
                self.max_pitch_hz, self.min_pitch_hz
            )));
        }
        if !(self.frame_duration_secs.is_finite() && self.frame_duration_secs > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "frame_duration_secs {} must be positive",
                self.frame_duration_secs
            )));
        }
        if !(self.hop_duration_secs.is_finite() && self.hop_duration_secs > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "hop_duration_secs {} must be positive",
                self.hop_duration_secs
            )));
        }
        if self.live.interval.is_zero() {
            return Err(Error::InvalidConfig("live interval must be non-zero".into()));
        }
        if self.live.capacity == 0 {
            return Err(Error::InvalidConfig("live capacity must be at least 1".into()));
        }
        if self.live.window_samples == 0 {
            return Err(Error::InvalidConfig(
                "live window_samples must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Samples between frame starts at `sample_rate`. Zero means the rate is
    /// too low to form a frame.
    pub fn hop_size(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.hop_duration_secs).floor() as usize
    }

    /// Samples per frame at `sample_rate`.
    pub fn frame_len(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.frame_duration_secs).floor() as usize
    }
}
