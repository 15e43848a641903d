//! # UMPA History
//!
//! Persisted list of past analyses.
//!
//! The whole history is one JSON array stored under [`HISTORY_KEY`] in an
//! injected [`KeyValueStore`], newest entry first and capped at
//! [`MAX_HISTORY_ITEMS`]. A stored value that fails to parse is logged and
//! treated as an empty history.
//!
//! ```rust
//! use umpa_history::{HistoryStore, MemoryStore};
//! # use umpa_analysis::PitchTrack;
//! # let track = PitchTrack::new("a.wav", 0.02, 16000, 1, vec![0.0], vec!["0.0s".into()],
//! #     chrono::Utc::now()).unwrap();
//!
//! let mut history = HistoryStore::open(MemoryStore::new());
//! let entry = history.save(track).unwrap();
//! assert_eq!(history.list().unwrap()[0].id, entry.id);
//! let _backend = history.close();
//! ```

pub mod error;
pub mod store;

pub use error::{HistoryError, Result};
pub use store::{FileStore, KeyValueStore, MemoryStore};

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use umpa_analysis::{PitchTrack, TrackStatistics};

/// Storage key of the history array.
pub const HISTORY_KEY: &str = "umpa_analysis_history";

/// Entries kept; saving beyond this drops the oldest.
pub const MAX_HISTORY_ITEMS: usize = 20;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A saved analysis: the track plus its id and summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// `<unix millis>-<9 base36 chars>`
    pub id: String,
    #[serde(flatten)]
    pub track: PitchTrack,
    pub average_pitch: f32,
    pub max_pitch: f32,
    pub min_pitch: f32,
}

impl HistoryEntry {
    pub fn new(track: PitchTrack) -> Self {
        let TrackStatistics {
            average,
            maximum,
            minimum,
        } = track.statistics();
        Self {
            id: new_entry_id(),
            track,
            average_pitch: average,
            max_pitch: maximum,
            min_pitch: minimum,
        }
    }
}

/// Fresh entry id: current unix millis, a dash, nine random base36 chars.
pub fn new_entry_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}

/// Analysis history over a key-value backend.
///
/// Created with [`open`](Self::open); [`close`](Self::close) hands the
/// backend back.
#[derive(Debug)]
pub struct HistoryStore<S: KeyValueStore> {
    backend: S,
    capacity: usize,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn open(backend: S) -> Self {
        Self::with_capacity(backend, MAX_HISTORY_ITEMS)
    }

    /// History keeping at most `capacity` entries (at least one).
    pub fn with_capacity(backend: S, capacity: usize) -> Self {
        tracing::debug!("Opened analysis history (capacity {})", capacity);
        Self {
            backend,
            capacity: capacity.max(1),
        }
    }

    pub fn close(self) -> S {
        self.backend
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Save `track` as the newest entry, dropping the oldest past capacity.
    pub fn save(&mut self, track: PitchTrack) -> Result<HistoryEntry> {
        let entry = HistoryEntry::new(track);
        let mut entries = self.list()?;
        entries.insert(0, entry.clone());
        entries.truncate(self.capacity);
        self.write(&entries)?;
        tracing::debug!("Saved {} to history as {}", entry.track.file_name(), entry.id);
        Ok(entry)
    }

    /// All entries, newest first.
    pub fn list(&self) -> Result<Vec<HistoryEntry>> {
        let Some(raw) = self.backend.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!("Discarding unreadable analysis history: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<HistoryEntry>> {
        Ok(self.list()?.into_iter().find(|entry| entry.id == id))
    }

    /// Remove the entry with `id`. Returns whether one was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let mut entries = self.list()?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != before;
        self.write(&entries)?;
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.backend.remove(HISTORY_KEY)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn write(&mut self, entries: &[HistoryEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.backend.set(HISTORY_KEY, &json)
    }
}
