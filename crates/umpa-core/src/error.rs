//! Error types for umpa-core.

use thiserror::Error;

/// Error type for decoding, configuration and analysis.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Input that cannot produce even one analysis frame.
    #[error("Unanalyzable input: {0}")]
    UnanalyzableInput(String),

    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "wav")]
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

impl Error {
    /// Whether this error came from the decode step rather than analysis.
    pub fn is_decode_failure(&self) -> bool {
        match self {
            Error::Decode(_) | Error::UnsupportedFormat(_) | Error::Io(_) => true,
            #[cfg(feature = "wav")]
            Error::Wav(_) => true,
            _ => false,
        }
    }
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
