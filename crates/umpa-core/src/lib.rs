//! # UMPA Core
//!
//! Shared building blocks for the UMPA pitch analysis workspace:
//! - **Configuration**: [`AnalysisConfig`] (pitch range, frame/hop durations, live cadence)
//! - **Errors**: one [`Error`] taxonomy for decode, config and degenerate-input failures
//! - **Audio**: [`DecodedAudio`] per-channel PCM buffers
//! - **Sources**: [`AudioSource`], the canonical "locally held audio file" record
//! - **Decoding**: WAV via hound, FLAC/MP3/OGG via symphonia, optionally on a
//!   background thread through [`DecodeHandle`]

pub mod audio;
pub mod config;
pub mod decode;
pub mod error;
pub mod import;
pub mod source;

pub use audio::DecodedAudio;
pub use config::{AnalysisConfig, LiveConfig, RangePolicy};
pub use decode::{decode_bytes, decode_source};
pub use error::{Error, Result};
pub use import::{DecodeHandle, DecodeStatus};
pub use source::{AudioSource, SourceId, SourceList, SourcePayload, AUDIO_EXTENSIONS};
