//! Side-by-side comparison of two recordings.
//!
//! The two analyses are independent: each side carries its own
//! `Result<PitchTrack>`, so a decode or analysis failure on one side never
//! hides the other. Alignment is positional. Index `i` of each series is
//! paired with label `i` of the longer track's labels. There is no
//! resampling and no offset detection, and the shorter series simply ends
//! early.

use crate::track::{PitchTrack, TrackAnalyzer};
use umpa_core::{decode_source, AudioSource, DecodedAudio, Error, Result};

/// Which recording of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// One positional row of a comparison: the shared label plus each side's
/// estimate at that index, `None` where a series has ended or failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRow<'a> {
    pub label: &'a str,
    pub first: Option<f32>,
    pub second: Option<f32>,
}

/// The outcome of analyzing two recordings.
#[derive(Debug)]
pub struct Comparison {
    first: Result<PitchTrack>,
    second: Result<PitchTrack>,
}

impl Comparison {
    pub fn new(first: Result<PitchTrack>, second: Result<PitchTrack>) -> Self {
        Self { first, second }
    }

    pub fn outcome(&self, side: Side) -> &Result<PitchTrack> {
        match side {
            Side::First => &self.first,
            Side::Second => &self.second,
        }
    }

    pub fn track(&self, side: Side) -> Option<&PitchTrack> {
        self.outcome(side).as_ref().ok()
    }

    pub fn error(&self, side: Side) -> Option<&Error> {
        self.outcome(side).as_ref().err()
    }

    /// Both sides produced a track.
    pub fn is_complete(&self) -> bool {
        self.first.is_ok() && self.second.is_ok()
    }

    /// The side whose labels form the shared axis: the successful track
    /// with more labels, the first one on a tie.
    pub fn axis_side(&self) -> Option<Side> {
        match (self.track(Side::First), self.track(Side::Second)) {
            (Some(a), Some(b)) if b.time_labels().len() > a.time_labels().len() => {
                Some(Side::Second)
            }
            (Some(_), _) => Some(Side::First),
            (None, Some(_)) => Some(Side::Second),
            (None, None) => None,
        }
    }

    /// The shared time axis, empty when neither side succeeded.
    pub fn time_axis(&self) -> &[String] {
        self.axis_side()
            .and_then(|side| self.track(side))
            .map(PitchTrack::time_labels)
            .unwrap_or(&[])
    }

    /// One side's pitches, unchanged and unpadded.
    pub fn series(&self, side: Side) -> Option<&[f32]> {
        self.track(side).map(PitchTrack::pitches)
    }

    /// Rows over the shared axis for joint charting or export.
    pub fn chart_rows(&self) -> impl Iterator<Item = ComparisonRow<'_>> + '_ {
        let first = self.series(Side::First).unwrap_or(&[]);
        let second = self.series(Side::Second).unwrap_or(&[]);
        self.time_axis()
            .iter()
            .enumerate()
            .map(move |(i, label)| ComparisonRow {
                label: label.as_str(),
                first: first.get(i).copied(),
                second: second.get(i).copied(),
            })
    }

    pub fn into_parts(self) -> (Result<PitchTrack>, Result<PitchTrack>) {
        (self.first, self.second)
    }
}

/// Input to one side of a comparison.
#[derive(Debug, Clone, Copy)]
pub struct TrackInput<'a> {
    pub name: &'a str,
    pub audio: &'a DecodedAudio,
}

impl<'a> TrackInput<'a> {
    pub fn new(name: &'a str, audio: &'a DecodedAudio) -> Self {
        Self { name, audio }
    }
}

/// Runs the same analyzer over two recordings.
#[derive(Debug, Clone)]
pub struct ComparisonAligner {
    analyzer: TrackAnalyzer,
}

impl ComparisonAligner {
    pub fn new(analyzer: TrackAnalyzer) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &TrackAnalyzer {
        &self.analyzer
    }

    /// Analyze both inputs, one per rayon worker.
    pub fn compare(&self, first: TrackInput<'_>, second: TrackInput<'_>) -> Comparison {
        let (a, b) = rayon::join(
            || self.analyzer.analyze(first.name, first.audio),
            || self.analyzer.analyze(second.name, second.audio),
        );
        self.finish(a, b)
    }

    /// Decode then analyze both sources. A decode failure stays on its side.
    pub fn compare_sources(&self, first: &AudioSource, second: &AudioSource) -> Comparison {
        let (a, b) = rayon::join(
            || self.analyze_source(first),
            || self.analyze_source(second),
        );
        self.finish(a, b)
    }

    fn analyze_source(&self, source: &AudioSource) -> Result<PitchTrack> {
        let audio = decode_source(source)?;
        self.analyzer.analyze(source.name(), &audio)
    }

    fn finish(&self, first: Result<PitchTrack>, second: Result<PitchTrack>) -> Comparison {
        for (side, outcome) in [(Side::First, &first), (Side::Second, &second)] {
            if let Err(e) = outcome {
                tracing::warn!("Comparison {:?} side failed: {}", side, e);
            }
        }
        Comparison::new(first, second)
    }
}
