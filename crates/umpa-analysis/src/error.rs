//! Error types for live sampling.

use thiserror::Error;

/// Errors from starting or running a live session.
#[derive(Error, Debug)]
pub enum LiveError {
    /// The platform refused access to the input device.
    #[error("Microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("No input device available")]
    NoInputDevice,

    #[error("Input device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Live sampling is already running")]
    AlreadyRunning,

    #[error("Failed to spawn sampler thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl LiveError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, LiveError::PermissionDenied(_))
    }
}

/// Result type alias for live sampling.
pub type LiveResult<T> = core::result::Result<T, LiveError>;
