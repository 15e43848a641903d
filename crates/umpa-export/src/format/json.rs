//! JSON export: the track record plus its summary statistics.

use crate::Result;
use serde::Serialize;
use std::io::Write;
use umpa_analysis::{PitchTrack, TrackStatistics};

/// Serialized form of an exported track.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDocument<'a> {
    #[serde(flatten)]
    pub track: &'a PitchTrack,
    pub average_pitch: f32,
    pub max_pitch: f32,
    pub min_pitch: f32,
}

impl<'a> TrackDocument<'a> {
    pub fn new(track: &'a PitchTrack) -> Self {
        let TrackStatistics {
            average,
            maximum,
            minimum,
        } = track.statistics();
        Self {
            track,
            average_pitch: average,
            max_pitch: maximum,
            min_pitch: minimum,
        }
    }
}

/// Pretty-printed JSON document for `track`.
pub fn to_json(track: &PitchTrack) -> Result<String> {
    Ok(serde_json::to_string_pretty(&TrackDocument::new(track))?)
}

pub fn write_json<W: Write>(track: &PitchTrack, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, &TrackDocument::new(track))?;
    writer.flush()?;
    Ok(())
}

/// Read a track back from an exported document. Statistic fields are
/// ignored and recomputed on demand.
pub fn from_json(json: &str) -> Result<PitchTrack> {
    Ok(serde_json::from_str(json)?)
}
