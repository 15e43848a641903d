//! Locally held audio sources.
//!
//! [`AudioSource`] is the one record type for "an audio file the user gave
//! us", whether it came from disk, an upload buffer, or a captured stream
//! segment. [`SourceList`] keeps the session's uploaded sources and the
//! current selection.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// File extensions the decoder may accept (subject to enabled features).
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "wave", "flac", "mp3", "ogg", "oga"];

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Session-unique source identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    fn next() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "src-{}", self.0)
    }
}

/// Where the encoded bytes live.
#[derive(Debug, Clone)]
pub enum SourcePayload {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// An encoded audio file held locally.
#[derive(Debug, Clone)]
pub struct AudioSource {
    id: SourceId,
    name: String,
    size: u64,
    added_at: DateTime<Utc>,
    payload: SourcePayload,
}

impl AudioSource {
    /// Reference a file on disk. The file is stat'ed now and read on decode.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            id: SourceId::next(),
            name,
            size: meta.len(),
            added_at: Utc::now(),
            payload: SourcePayload::Path(path.to_path_buf()),
        })
    }

    /// Wrap an in-memory buffer (upload, drag-drop, captured segment).
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            id: SourceId::next(),
            name: name.into(),
            size: bytes.len() as u64,
            added_at: Utc::now(),
            payload: SourcePayload::Bytes(bytes),
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub fn payload(&self) -> &SourcePayload {
        &self.payload
    }

    /// Lowercased file extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    /// Whether the name carries a known audio extension.
    pub fn is_audio(&self) -> bool {
        self.extension()
            .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Read the encoded bytes.
    pub fn read_bytes(&self) -> Result<Arc<[u8]>> {
        match &self.payload {
            SourcePayload::Bytes(bytes) => Ok(Arc::clone(bytes)),
            SourcePayload::Path(path) => Ok(std::fs::read(path)?.into()),
        }
    }
}

/// The session's uploaded sources plus the one selected for analysis.
#[derive(Debug, Default)]
pub struct SourceList {
    sources: Vec<AudioSource>,
    selected: Option<SourceId>,
}

impl SourceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source. Non-audio sources are rejected.
    pub fn add(&mut self, source: AudioSource) -> Result<SourceId> {
        if !source.is_audio() {
            return Err(Error::UnsupportedFormat(format!(
                "{} is not an audio file",
                source.name()
            )));
        }
        let id = source.id();
        self.sources.push(source);
        Ok(id)
    }

    /// Remove a source, clearing the selection if it pointed at it.
    pub fn remove(&mut self, id: SourceId) -> Option<AudioSource> {
        let idx = self.sources.iter().position(|s| s.id() == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.sources.remove(idx))
    }

    pub fn clear(&mut self) {
        self.sources.clear();
        self.selected = None;
    }

    pub fn select(&mut self, id: SourceId) -> Result<()> {
        if self.get(id).is_none() {
            return Err(Error::SourceNotFound(id.to_string()));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&AudioSource> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: SourceId) -> Option<&AudioSource> {
        self.sources.iter().find(|s| s.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AudioSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
