//! Live pitch sampling from a continuous input.
//!
//! A background thread wakes on a fixed tick, reads the most recent window
//! from a [`LiveSource`], runs the pitch estimator and appends the result to
//! a bounded rolling window. Results are published via `ArcSwap` for
//! lock-free reads from the UI thread.

mod source;

#[cfg(feature = "microphone")]
mod microphone;

#[cfg(feature = "microphone")]
pub use microphone::Microphone;
pub use source::{LiveSource, RingBufferSource};

use crate::error::{LiveError, LiveResult};
use crate::pitch::PitchEstimator;
use arc_swap::{ArcSwap, ArcSwapOption};
use core::sync::atomic::{AtomicU8, Ordering};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use umpa_core::LiveConfig;

/// Lifecycle of a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum LiveStatus {
    /// Never started.
    #[default]
    Idle,
    Running,
    Stopped,
    /// The input was refused. Stays until the caller starts again.
    PermissionDenied,
}

impl LiveStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => LiveStatus::Running,
            2 => LiveStatus::Stopped,
            3 => LiveStatus::PermissionDenied,
            _ => LiveStatus::Idle,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            LiveStatus::Idle => 0,
            LiveStatus::Running => 1,
            LiveStatus::Stopped => 2,
            LiveStatus::PermissionDenied => 3,
        }
    }
}

/// Shared state between the sampler thread and readers.
///
/// All reads are lock-free from any thread.
pub struct LiveState {
    pitches: ArcSwap<Vec<f32>>,
    current: ArcSwapOption<f32>,
    status: AtomicU8,
    capacity: usize,
}

impl LiveState {
    /// Empty state keeping at most `capacity` estimates (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            pitches: ArcSwap::from_pointee(Vec::new()),
            current: ArcSwapOption::empty(),
            status: AtomicU8::new(LiveStatus::Idle.as_u8()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the rolling window, oldest first.
    pub fn pitches(&self) -> Arc<Vec<f32>> {
        self.pitches.load_full()
    }

    /// The latest estimate, `None` before the first tick or after a reset.
    pub fn current_pitch(&self) -> Option<f32> {
        self.current.load().as_deref().copied()
    }

    pub fn status(&self) -> LiveStatus {
        LiveStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    pub(crate) fn set_status(&self, status: LiveStatus) {
        self.status.store(status.as_u8(), Ordering::Release);
    }

    /// Append an estimate, dropping the oldest once at capacity.
    pub fn push(&self, pitch: f32) {
        let capacity = self.capacity;
        self.pitches.rcu(|current| {
            let skip = (current.len() + 1).saturating_sub(capacity);
            let mut next = Vec::with_capacity(capacity);
            next.extend_from_slice(&current[skip..]);
            next.push(pitch);
            next
        });
        self.current.store(Some(Arc::new(pitch)));
    }

    /// Clear the window and the current estimate. Status is untouched.
    pub fn reset(&self) {
        self.pitches.store(Arc::new(Vec::new()));
        self.current.store(None);
    }
}

struct Worker {
    stop_tx: Sender<()>,
    thread: JoinHandle<()>,
}

/// Owns the sampler thread for one live session.
pub struct LiveSampler {
    config: LiveConfig,
    estimator: Arc<dyn PitchEstimator>,
    state: Arc<LiveState>,
    worker: Option<Worker>,
}

impl LiveSampler {
    pub fn new(config: LiveConfig, estimator: Arc<dyn PitchEstimator>) -> Self {
        let state = Arc::new(LiveState::new(config.capacity));
        Self {
            config,
            estimator,
            state,
            worker: None,
        }
    }

    pub fn config(&self) -> &LiveConfig {
        &self.config
    }

    /// Shared state, for readers on other threads.
    pub fn state(&self) -> &Arc<LiveState> {
        &self.state
    }

    pub fn status(&self) -> LiveStatus {
        self.state.status()
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn pitches(&self) -> Arc<Vec<f32>> {
        self.state.pitches()
    }

    pub fn current_pitch(&self) -> Option<f32> {
        self.state.current_pitch()
    }

    /// Start sampling `source` on a background thread.
    pub fn start<S: LiveSource + 'static>(&mut self, source: S) -> LiveResult<()> {
        if self.worker.is_some() {
            return Err(LiveError::AlreadyRunning);
        }

        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
        let state = Arc::clone(&self.state);
        let estimator = Arc::clone(&self.estimator);
        let config = self.config.clone();
        let sample_rate = source.sample_rate();

        let thread = std::thread::Builder::new()
            .name("umpa-live".into())
            .spawn(move || run_sampler(source, state, estimator, config, stop_rx))?;

        self.worker = Some(Worker { stop_tx, thread });
        self.state.set_status(LiveStatus::Running);
        tracing::info!(
            "Live sampling started at {} Hz, every {:?}",
            sample_rate,
            self.config.interval
        );
        Ok(())
    }

    /// Open a source with `open` and start sampling it.
    ///
    /// A refused permission leaves the status at
    /// [`LiveStatus::PermissionDenied`].
    pub fn open_and_start<S, F>(&mut self, open: F) -> LiveResult<()>
    where
        S: LiveSource + 'static,
        F: FnOnce(&LiveConfig) -> LiveResult<S>,
    {
        if self.worker.is_some() {
            return Err(LiveError::AlreadyRunning);
        }
        match open(&self.config) {
            Ok(source) => self.start(source),
            Err(e) => {
                if e.is_permission_denied() {
                    self.state.set_status(LiveStatus::PermissionDenied);
                }
                tracing::warn!("Live input unavailable: {}", e);
                Err(e)
            }
        }
    }

    /// Stop sampling and release the source. The rolling window is kept.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        drop(worker.stop_tx);
        if worker.thread.join().is_err() {
            tracing::warn!("Live sampler thread panicked");
        }
        self.state.set_status(LiveStatus::Stopped);
        tracing::info!("Live sampling stopped");
    }

    /// Clear the rolling window and current estimate without stopping.
    pub fn reset(&self) {
        self.state.reset();
    }
}

impl Drop for LiveSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sampler loop. Runs until `stop_rx` fires or disconnects, then drops the
/// source.
fn run_sampler<S: LiveSource>(
    mut source: S,
    state: Arc<LiveState>,
    estimator: Arc<dyn PitchEstimator>,
    config: LiveConfig,
    stop_rx: Receiver<()>,
) {
    let ticker = crossbeam_channel::tick(config.interval);
    let sample_rate = source.sample_rate();
    let mut frame = vec![0.0f32; config.window_samples];

    loop {
        crossbeam_channel::select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> _ => {
                let read = source.read_latest(&mut frame);
                if read == 0 {
                    continue;
                }
                state.push(estimator.estimate(&frame[..read], sample_rate));
            }
        }
    }
}
