//! Centralized error type for the umpa umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] umpa_core::Error),

    #[error("Live: {0}")]
    Live(#[from] umpa_analysis::LiveError),

    #[error("Export: {0}")]
    Export(#[from] umpa_export::ExportError),

    #[error("History: {0}")]
    History(#[from] umpa_history::HistoryError),
}

impl Error {
    /// True when a live input was refused by the platform.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Error::Live(e) if e.is_permission_denied())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
