//! Non-blocking decode with completion polling.

use crate::source::AudioSource;
use crate::{DecodedAudio, Error, Result};
use std::sync::Arc;
use std::thread::JoinHandle;

pub enum DecodeStatus {
    Pending,
    Complete(Arc<DecodedAudio>),
    Failed(Error),
}

/// Handle to a decode running on a background thread.
/// Poll with [`poll()`](Self::poll) or block with [`wait()`](Self::wait).
pub struct DecodeHandle {
    source_name: String,
    thread: Option<JoinHandle<Result<Arc<DecodedAudio>>>>,
}

impl DecodeHandle {
    /// Start decoding `source` on a dedicated thread.
    pub fn start(source: AudioSource) -> Result<Self> {
        let source_name = source.name().to_string();

        let thread = std::thread::Builder::new()
            .name("umpa-decode".into())
            .spawn(move || crate::decode::decode_source(&source).map(Arc::new))?;

        Ok(Self {
            source_name,
            thread: Some(thread),
        })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Non-blocking check. Returns the result exactly once; later polls
    /// report `Failed` with a consumed-handle error.
    ///
    /// Joins only a finished thread, so it never blocks.
    pub fn poll(&mut self) -> DecodeStatus {
        match &self.thread {
            None => return DecodeStatus::Failed(Error::Decode("decode already consumed".into())),
            Some(thread) if !thread.is_finished() => return DecodeStatus::Pending,
            Some(_) => {}
        }
        match self.join() {
            Ok(audio) => DecodeStatus::Complete(audio),
            Err(e) => DecodeStatus::Failed(e),
        }
    }

    /// Block until the decode finishes.
    pub fn wait(mut self) -> Result<Arc<DecodedAudio>> {
        self.join()
    }

    pub fn is_done(&self) -> bool {
        self.thread
            .as_ref()
            .map(|t| t.is_finished())
            .unwrap_or(true)
    }

    fn join(&mut self) -> Result<Arc<DecodedAudio>> {
        let Some(thread) = self.thread.take() else {
            return Err(Error::Decode("decode already consumed".into()));
        };
        match thread.join() {
            Ok(result) => result,
            Err(_) => Err(Error::Decode(format!(
                "decode thread for {} panicked",
                self.source_name
            ))),
        }
    }
}
