//! Builder for configuring and constructing an `UmpaEngine`.

use crate::{Result, UmpaEngine};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use umpa_analysis::{
    AutocorrelationEstimator, FftAutocorrelation, LiveSampler, PitchEstimator, TrackAnalyzer,
};
use umpa_core::{AnalysisConfig, RangePolicy};
use umpa_history::{FileStore, HistoryStore, KeyValueStore, MemoryStore, MAX_HISTORY_ITEMS};

/// History lives in memory unless [`history_dir`](Self::history_dir) is
/// set, in which case it is persisted as JSON under that directory and
/// survives restarts.
///
/// # Example
///
/// ```ignore
/// use umpa::prelude::*;
///
/// let engine = UmpaEngine::builder()
///     .pitch_range(80.0, 1000.0)
///     .frame_duration(Duration::from_millis(40))
///     .parallel(true)
///     .history_dir("~/.umpa")
///     .build()?;
/// ```
pub struct UmpaEngineBuilder {
    config: AnalysisConfig,
    estimator: Option<Arc<dyn PitchEstimator>>,
    fft: bool,
    history_dir: Option<PathBuf>,
    history_capacity: usize,
}

impl Default for UmpaEngineBuilder {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default(),
            estimator: None,
            fft: false,
            history_dir: None,
            history_capacity: MAX_HISTORY_ITEMS,
        }
    }
}

impl UmpaEngineBuilder {
    /// Replace the whole analysis configuration.
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: 50 - 400 Hz
    pub fn pitch_range(mut self, min_hz: f64, max_hz: f64) -> Self {
        self.config.min_pitch_hz = min_hz;
        self.config.max_pitch_hz = max_hz;
        self
    }

    /// Default: inclusive
    pub fn range_policy(mut self, policy: RangePolicy) -> Self {
        self.config.range_policy = policy;
        self
    }

    /// Default: 20 ms
    pub fn frame_duration(mut self, duration: Duration) -> Self {
        self.config.frame_duration_secs = duration.as_secs_f64();
        self
    }

    /// Default: 20 ms
    pub fn hop_duration(mut self, duration: Duration) -> Self {
        self.config.hop_duration_secs = duration.as_secs_f64();
        self
    }

    /// Estimate frames on the rayon pool. Default: off
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Default: 100 ms
    pub fn live_interval(mut self, interval: Duration) -> Self {
        self.config.live.interval = interval;
        self
    }

    /// Default: 60
    pub fn live_capacity(mut self, capacity: usize) -> Self {
        self.config.live.capacity = capacity;
        self
    }

    /// Default: 2048
    pub fn live_window(mut self, samples: usize) -> Self {
        self.config.live.window_samples = samples;
        self
    }

    /// Use the FFT autocorrelation estimator. Same results as the direct
    /// lag search, faster on long frames.
    pub fn fft(mut self) -> Self {
        self.fft = true;
        self
    }

    /// Use a caller-supplied estimator for both file and live analysis.
    /// Takes precedence over [`fft`](Self::fft).
    pub fn estimator(mut self, estimator: Arc<dyn PitchEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    /// Persist history under `dir`.
    pub fn history_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.history_dir = Some(dir.into());
        self
    }

    /// Default: 20
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<UmpaEngine> {
        self.config.validate()?;

        let estimator: Arc<dyn PitchEstimator> = match self.estimator {
            Some(estimator) => estimator,
            None if self.fft => Arc::new(FftAutocorrelation::from_config(&self.config)),
            None => Arc::new(AutocorrelationEstimator::from_config(&self.config)),
        };

        let analyzer = TrackAnalyzer::with_estimator(self.config.clone(), Arc::clone(&estimator))?;
        let live = LiveSampler::new(self.config.live.clone(), estimator);

        let backend: Box<dyn KeyValueStore> = match &self.history_dir {
            Some(dir) => Box::new(FileStore::open(dir.clone())?),
            None => Box::new(MemoryStore::new()),
        };
        let history = HistoryStore::with_capacity(backend, self.history_capacity);

        tracing::info!(
            "UMPA engine ready: {}-{} Hz, frame {:.3}s, hop {:.3}s, history {}",
            self.config.min_pitch_hz,
            self.config.max_pitch_hz,
            self.config.frame_duration_secs,
            self.config.hop_duration_secs,
            match &self.history_dir {
                Some(dir) => dir.display().to_string(),
                None => "in memory".to_string(),
            }
        );

        Ok(UmpaEngine::from_parts(analyzer, history, live))
    }
}
