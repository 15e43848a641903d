//! CSV export.
//!
//! Single track: header `time,pitch`, one row per frame, pitch with two
//! decimals. Comparison: header `time,first,second` over the shared axis,
//! empty cells where a series has ended.

use crate::Result;
use std::io::Write;
use umpa_analysis::{Comparison, PitchTrack};

fn format_pitch(pitch: f32) -> String {
    format!("{:.2}", pitch)
}

pub fn write_csv<W: Write>(track: &PitchTrack, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["time", "pitch"])?;
    for (label, pitch) in track.points() {
        wtr.write_record([label, format_pitch(pitch).as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv(track: &PitchTrack) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(track, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_comparison_csv<W: Write>(comparison: &Comparison, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["time", "first", "second"])?;
    for row in comparison.chart_rows() {
        let first = row.first.map(format_pitch).unwrap_or_default();
        let second = row.second.map(format_pitch).unwrap_or_default();
        wtr.write_record([row.label, first.as_str(), second.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn comparison_to_csv(comparison: &Comparison) -> Result<String> {
    let mut buf = Vec::new();
    write_comparison_csv(comparison, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
