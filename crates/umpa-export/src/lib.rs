//! # UMPA Export
//!
//! Export utilities for UMPA pitch tracks.
//!
//! This crate provides:
//! - **JSON**: the track record plus `averagePitch`, `maxPitch`, `minPitch`, and a reader back
//! - **CSV**: `time,pitch` rows (and `time,first,second` for comparisons)
//! - **HTML**: a self-contained single-track report and a comparison report
//!
//! ## Note
//!
//! This crate is typically not used directly. Instead, use the integrated
//! export API from the main `umpa` crate:
//!
//! ```ignore
//! use umpa::prelude::*;
//!
//! let engine = UmpaEngine::builder().build()?;
//! let track = engine.analyze_source(&AudioSource::from_path("take.wav")?)?;
//! engine.export_to_file(&track, "take.csv")?;
//! ```

pub mod error;
pub mod format;

pub use error::{ExportError, Result};
pub use format::csv::{comparison_to_csv, to_csv, write_comparison_csv, write_csv};
pub use format::html::{comparison_report_html, report_file_name, report_html};
pub use format::json::{from_json, to_json, write_json, TrackDocument};
pub use format::ExportFormat;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use umpa_analysis::PitchTrack;

/// Render `track` in `format`.
pub fn export_string(track: &PitchTrack, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(track),
        ExportFormat::Csv => to_csv(track),
        ExportFormat::Html => report_html(track),
    }
}

/// Export a track to a file with automatic format detection
///
/// The format is determined by the file extension:
/// - `.json` -> JSON document
/// - `.csv` -> CSV rows
/// - `.html` / `.htm` -> HTML report
pub fn export_to_file(track: &PitchTrack, path: impl AsRef<Path>) -> Result<ExportFormat> {
    let path = path.as_ref();
    let format = ExportFormat::from_path(path)?;
    let file = BufWriter::new(File::create(path)?);

    match format {
        ExportFormat::Json => write_json(track, file)?,
        ExportFormat::Csv => write_csv(track, file)?,
        ExportFormat::Html => {
            let mut file = file;
            file.write_all(report_html(track)?.as_bytes())?;
            file.flush()?;
        }
    }

    tracing::info!(
        "Exported {} as {:?} to {}",
        track.file_name(),
        format,
        path.display()
    );
    Ok(format)
}
