//! Pitch estimation by autocorrelation lag search
//!
//! Estimates the fundamental frequency of one frame:
//!
//! 1. **Lag range** - `min_lag = floor(sr / max_hz)`, `max_lag = floor(sr / min_hz)`
//! 2. **Correlation** - r(τ) = Σ x[i]·x[i+τ] for every τ in `[min_lag, max_lag)`
//! 3. **Best lag** - the first τ with the largest r(τ) above zero
//! 4. **Range gate** - `sr / τ` if it lies in the pitch range, else 0
//!
//! When the sample rate is below `max_hz`, `min_lag` is 0 and r(0) wins for
//! any non-silent frame. A winning lag of 0 is unvoiced.
//!
//! No window function, no normalisation and no interpolation: the result is
//! quantised to `sr / τ` for integer τ. A frame without any positive
//! correlation (silence, or too short for every lag) is unvoiced and
//! reports 0.
//!
//! [`AutocorrelationEstimator`] computes r(τ) directly in O(n × max_lag).
//! [`FftAutocorrelation`] computes the same values through the
//! Wiener-Khinchin theorem, r(τ) = IFFT(|FFT(x)|²), in O(n log n).

use rustfft::{num_complex::Complex, FftPlanner};
use std::cell::RefCell;
use umpa_core::{AnalysisConfig, RangePolicy};

/// One frame of samples in, one frequency out (Hz, `0.0` = unvoiced).
///
/// Implementations are stateless from the caller's view and may be shared
/// across threads.
pub trait PitchEstimator: Send + Sync {
    fn estimate(&self, frame: &[f32], sample_rate: u32) -> f32;
}

/// Accepted pitch range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PitchRange {
    pub min_hz: f64,
    pub max_hz: f64,
    pub policy: RangePolicy,
}

impl Default for PitchRange {
    fn default() -> Self {
        Self::new(50.0, 400.0)
    }
}

impl PitchRange {
    pub fn new(min_hz: f64, max_hz: f64) -> Self {
        Self {
            min_hz,
            max_hz,
            policy: RangePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RangePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            min_hz: config.min_pitch_hz,
            max_hz: config.max_pitch_hz,
            policy: config.range_policy,
        }
    }

    /// `(min_lag, max_lag)` at `sample_rate`. The search covers
    /// `[min_lag, max_lag)`.
    pub fn lag_range(&self, sample_rate: u32) -> (usize, usize) {
        let sr = sample_rate as f64;
        (
            (sr / self.max_hz).floor() as usize,
            (sr / self.min_hz).floor() as usize,
        )
    }

    pub fn accepts(&self, pitch: f64) -> bool {
        self.policy.contains(pitch, self.min_hz, self.max_hz)
    }

    fn lag_to_pitch(&self, sample_rate: u32, lag: usize) -> f32 {
        if lag == 0 {
            return 0.0;
        }
        let pitch = sample_rate as f64 / lag as f64;
        if self.accepts(pitch) {
            pitch as f32
        } else {
            0.0
        }
    }
}

/// Raw autocorrelation of `frame` at `lag`, summed in f64.
///
/// Lags at or beyond the frame length have no overlapping samples and
/// return 0.
pub fn autocorrelation(frame: &[f32], lag: usize) -> f64 {
    if lag >= frame.len() {
        return 0.0;
    }
    frame
        .iter()
        .zip(&frame[lag..])
        .map(|(&a, &b)| a as f64 * b as f64)
        .sum()
}

/// Scan `[min_lag, max_lag)` and keep the first lag whose
/// correlation strictly exceeds every earlier one and zero.
fn select_lag(min_lag: usize, max_lag: usize, mut corr: impl FnMut(usize) -> f64) -> Option<usize> {
    let mut best_lag = None;
    let mut best = 0.0f64;
    for lag in min_lag..max_lag {
        let value = corr(lag);
        if value > best {
            best = value;
            best_lag = Some(lag);
        }
    }
    best_lag
}

/// Direct time-domain autocorrelation estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AutocorrelationEstimator {
    range: PitchRange,
}

impl AutocorrelationEstimator {
    /// Estimator over the default 50-400 Hz range, bounds inclusive.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(range: PitchRange) -> Self {
        Self { range }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::with_range(PitchRange::from_config(config))
    }

    pub fn range(&self) -> &PitchRange {
        &self.range
    }

    /// The winning lag, or `None` for an unvoiced frame.
    pub fn best_lag(&self, frame: &[f32], sample_rate: u32) -> Option<usize> {
        if sample_rate == 0 || frame.is_empty() {
            return None;
        }
        let (min_lag, max_lag) = self.range.lag_range(sample_rate);
        select_lag(min_lag, max_lag, |lag| autocorrelation(frame, lag))
    }
}

impl PitchEstimator for AutocorrelationEstimator {
    fn estimate(&self, frame: &[f32], sample_rate: u32) -> f32 {
        match self.best_lag(frame, sample_rate) {
            Some(lag) => self.range.lag_to_pitch(sample_rate, lag),
            None => 0.0,
        }
    }
}

thread_local! {
    static FFT_PLANNER: RefCell<FftPlanner<f64>> = RefCell::new(FftPlanner::new());
}

/// Correlation values within this fraction of r(0) are FFT round-off and
/// count as zero.
const FFT_NOISE_FLOOR: f64 = 1e-9;

/// Autocorrelation estimator computed in the frequency domain.
///
/// Searches the same lags with the same tie-break as
/// [`AutocorrelationEstimator`]. Results agree except where two lags are
/// within floating-point round-off of each other.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FftAutocorrelation {
    range: PitchRange,
}

impl FftAutocorrelation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(range: PitchRange) -> Self {
        Self { range }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::with_range(PitchRange::from_config(config))
    }

    pub fn range(&self) -> &PitchRange {
        &self.range
    }

    /// r(τ) for τ in `0..max_lag`, zero-padded so lags do not wrap.
    pub fn correlations(&self, frame: &[f32], max_lag: usize) -> Vec<f64> {
        let len = frame.len();
        if len == 0 {
            return vec![0.0; max_lag];
        }
        let size = (2 * len).next_power_of_two();

        let mut buffer: Vec<Complex<f64>> = frame
            .iter()
            .map(|&s| Complex::new(s as f64, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(size)
            .collect();

        FFT_PLANNER.with(|planner| {
            let mut planner = planner.borrow_mut();
            planner.plan_fft_forward(size).process(&mut buffer);
            for bin in buffer.iter_mut() {
                *bin = Complex::new(bin.norm_sqr(), 0.0);
            }
            planner.plan_fft_inverse(size).process(&mut buffer);
        });

        let scale = 1.0 / size as f64;
        let floor = (buffer[0].re * scale).abs() * FFT_NOISE_FLOOR;
        (0..max_lag)
            .map(|lag| {
                if lag >= len {
                    return 0.0;
                }
                let value = buffer[lag].re * scale;
                if value.abs() <= floor {
                    0.0
                } else {
                    value
                }
            })
            .collect()
    }

    pub fn best_lag(&self, frame: &[f32], sample_rate: u32) -> Option<usize> {
        if sample_rate == 0 || frame.is_empty() {
            return None;
        }
        let (min_lag, max_lag) = self.range.lag_range(sample_rate);
        let corr = self.correlations(frame, max_lag);
        select_lag(min_lag, max_lag, |lag| corr[lag])
    }
}

impl PitchEstimator for FftAutocorrelation {
    fn estimate(&self, frame: &[f32], sample_rate: u32) -> f32 {
        match self.best_lag(frame, sample_rate) {
            Some(lag) => self.range.lag_to_pitch(sample_rate, lag),
            None => 0.0,
        }
    }
}
