//! UmpaEngine that coordinates analysis, live sampling, history and export

use crate::Result;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use umpa_analysis::{
    Comparison, ComparisonAligner, LiveSampler, LiveSource, LiveState, LiveStatus, PitchTrack,
    TrackAnalyzer, TrackInput,
};
use umpa_core::{decode_source, AnalysisConfig, AudioSource, DecodedAudio};
use umpa_export::ExportFormat;
use umpa_history::{HistoryEntry, HistoryStore, KeyValueStore};

/// One analysis session for a host application.
///
/// UmpaEngine ties together:
/// - the track analyzer and comparison aligner (synchronous, `&self`)
/// - the live sampler, one session at a time
/// - the analysis history, in memory or under a directory
/// - the export formats
///
/// All methods take `&self`; the engine can be shared across threads
/// behind an `Arc`.
///
/// # Example
///
/// ```ignore
/// use umpa::prelude::*;
///
/// let engine = UmpaEngine::builder().build()?;
///
/// let track = engine.analyze_source(&AudioSource::from_path("take.wav")?)?;
/// println!("average {:.2} Hz", track.statistics().average);
///
/// engine.save_to_history(track.clone())?;
/// engine.export_to_file(&track, "take.csv")?;
/// ```
pub struct UmpaEngine {
    aligner: ComparisonAligner,

    /// Saved analyses, newest first
    history: Mutex<HistoryStore<Box<dyn KeyValueStore>>>,

    /// Live sampler (owns the worker thread while running)
    live: Mutex<LiveSampler>,

    /// Shared with the sampler thread; read without taking `live`
    live_state: Arc<LiveState>,
}

impl UmpaEngine {
    /// Create a new engine builder
    pub fn builder() -> crate::UmpaEngineBuilder {
        crate::UmpaEngineBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.analyzer().config()
    }

    pub fn analyzer(&self) -> &TrackAnalyzer {
        self.aligner.analyzer()
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    /// Analyze decoded audio into a pitch track.
    pub fn analyze(&self, file_name: &str, audio: &DecodedAudio) -> Result<PitchTrack> {
        Ok(self.analyzer().analyze(file_name, audio)?)
    }

    /// Decode `source` and analyze it. The track is named after the source.
    pub fn analyze_source(&self, source: &AudioSource) -> Result<PitchTrack> {
        let audio = decode_source(source)?;
        self.analyze(source.name(), &audio)
    }

    /// Analyze two decoded inputs side by side. A failure on one side
    /// leaves the other intact.
    pub fn compare(&self, first: TrackInput<'_>, second: TrackInput<'_>) -> Comparison {
        self.aligner.compare(first, second)
    }

    /// Decode and analyze two sources side by side.
    pub fn compare_sources(&self, first: &AudioSource, second: &AudioSource) -> Comparison {
        self.aligner.compare_sources(first, second)
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Save `track` as the newest history entry.
    pub fn save_to_history(&self, track: PitchTrack) -> Result<HistoryEntry> {
        Ok(self.history.lock().save(track)?)
    }

    /// Saved analyses, newest first.
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.history.lock().list()?)
    }

    pub fn history_entry(&self, id: &str) -> Result<Option<HistoryEntry>> {
        Ok(self.history.lock().get(id)?)
    }

    /// Remove one entry. Returns whether it existed.
    pub fn delete_from_history(&self, id: &str) -> Result<bool> {
        Ok(self.history.lock().delete(id)?)
    }

    pub fn clear_history(&self) -> Result<()> {
        Ok(self.history.lock().clear()?)
    }

    // =========================================================================
    // Live
    // =========================================================================

    /// Start sampling `source`. Fails if a live session is already running.
    pub fn start_live<S: LiveSource + 'static>(&self, source: S) -> Result<()> {
        Ok(self.live.lock().start(source)?)
    }

    /// Open the default input device and start sampling it.
    ///
    /// A refused permission leaves [`live_status`](Self::live_status) at
    /// [`LiveStatus::PermissionDenied`]; nothing is retried.
    #[cfg(feature = "microphone")]
    pub fn start_microphone(&self) -> Result<()> {
        Ok(self
            .live
            .lock()
            .open_and_start(umpa_analysis::Microphone::open)?)
    }

    /// Stop the live session and release its input. The rolling window is
    /// kept until [`reset_live`](Self::reset_live).
    pub fn stop_live(&self) {
        self.live.lock().stop();
    }

    /// Clear the rolling window and current pitch without stopping.
    pub fn reset_live(&self) {
        self.live_state.reset();
    }

    /// Rolling window of live estimates, oldest first.
    pub fn live_pitches(&self) -> Arc<Vec<f32>> {
        self.live_state.pitches()
    }

    /// Most recent live estimate, if any.
    pub fn current_pitch(&self) -> Option<f32> {
        self.live_state.current_pitch()
    }

    pub fn live_status(&self) -> LiveStatus {
        self.live_state.status()
    }

    /// Shared live state, for polling from a UI thread.
    pub fn live_state(&self) -> &Arc<LiveState> {
        &self.live_state
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// JSON document: the track plus average, max and min pitch.
    pub fn export_json(&self, track: &PitchTrack) -> Result<String> {
        Ok(umpa_export::to_json(track)?)
    }

    /// `time,pitch` rows, pitch at two decimals.
    pub fn export_csv(&self, track: &PitchTrack) -> Result<String> {
        Ok(umpa_export::to_csv(track)?)
    }

    /// Self-contained HTML report.
    pub fn export_report(&self, track: &PitchTrack) -> Result<String> {
        Ok(umpa_export::report_html(track)?)
    }

    /// `time,first,second` rows over the comparison time axis.
    pub fn export_comparison_csv(&self, comparison: &Comparison) -> Result<String> {
        Ok(umpa_export::comparison_to_csv(comparison)?)
    }

    pub fn export_comparison_report(&self, comparison: &Comparison) -> Result<String> {
        Ok(umpa_export::comparison_report_html(comparison)?)
    }

    /// Write `track` to `path`, choosing the format from its extension.
    ///
    /// # Example
    /// ```ignore
    /// engine.export_to_file(&track, "take.json")?;
    /// engine.export_to_file(&track, "take.csv")?;
    /// engine.export_to_file(&track, "take_report.html")?;
    /// ```
    pub fn export_to_file(&self, track: &PitchTrack, path: impl AsRef<Path>) -> Result<ExportFormat> {
        Ok(umpa_export::export_to_file(track, path)?)
    }

    pub(crate) fn from_parts(
        analyzer: TrackAnalyzer,
        history: HistoryStore<Box<dyn KeyValueStore>>,
        live: LiveSampler,
    ) -> Self {
        let live_state = Arc::clone(live.state());
        Self {
            aligner: ComparisonAligner::new(analyzer),
            history: Mutex::new(history),
            live: Mutex::new(live),
            live_state,
        }
    }
}

impl std::fmt::Debug for UmpaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UmpaEngine")
            .field("config", self.config())
            .field("live_status", &self.live_status())
            .finish_non_exhaustive()
    }
}
