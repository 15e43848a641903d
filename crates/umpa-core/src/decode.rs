//! Decode encoded audio into [`DecodedAudio`].
//!
//! Each codec is feature-gated:
//! - `wav`: WAV via hound (integer PCM normalised to [-1, 1], float PCM as-is)
//! - `flac`, `mp3`, `ogg`: via symphonia
//!
//! The format is picked from the source name's extension. Without an
//! extension a RIFF header selects WAV, anything else goes to symphonia's
//! prober.

use crate::source::AudioSource;
use crate::{DecodedAudio, Error, Result};
use std::sync::Arc;

/// Decode a source, reading its bytes first.
pub fn decode_source(source: &AudioSource) -> Result<DecodedAudio> {
    tracing::debug!("Decoding {} ({} bytes)", source.name(), source.size());
    let bytes = source.read_bytes()?;
    let audio = decode_bytes(bytes, source.extension().as_deref())?;
    tracing::debug!(
        "Decoded {}: {} Hz, {} ch, {:.2}s",
        source.name(),
        audio.sample_rate(),
        audio.channel_count(),
        audio.duration_seconds()
    );
    Ok(audio)
}

/// Decode a byte buffer. `extension` is a lowercase hint without the dot.
pub fn decode_bytes(bytes: Arc<[u8]>, extension: Option<&str>) -> Result<DecodedAudio> {
    if bytes.is_empty() {
        return Err(Error::Decode("empty input".into()));
    }

    let is_wav = match extension {
        Some("wav") | Some("wave") => true,
        Some(_) => false,
        None => bytes.starts_with(b"RIFF"),
    };

    if is_wav {
        #[cfg(feature = "wav")]
        return decode_wav(&bytes);
        #[cfg(not(feature = "wav"))]
        return Err(Error::UnsupportedFormat("WAV support not enabled".into()));
    }

    #[cfg(any(feature = "flac", feature = "mp3", feature = "ogg"))]
    return compressed::decode(bytes, extension);

    #[cfg(not(any(feature = "flac", feature = "mp3", feature = "ogg")))]
    Err(Error::UnsupportedFormat(format!(
        "no decoder enabled for {}",
        extension.unwrap_or("unknown format")
    )))
}

#[cfg(feature = "wav")]
fn decode_wav(bytes: &[u8]) -> Result<DecodedAudio> {
    use hound::{SampleFormat, WavReader};

    let reader = WavReader::new(std::io::Cursor::new(bytes))?;
    let spec = reader.spec();
    let channel_count = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    DecodedAudio::from_interleaved(spec.sample_rate, channel_count, &interleaved)
}

#[cfg(any(feature = "flac", feature = "mp3", feature = "ogg"))]
mod compressed {
    use super::*;
    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::DecoderOptions;
    use symphonia::core::errors::Error as SymphoniaError;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    fn decode_error(e: SymphoniaError) -> Error {
        match e {
            SymphoniaError::Unsupported(what) => Error::UnsupportedFormat(what.to_string()),
            other => Error::Decode(other.to_string()),
        }
    }

    pub(super) fn decode(bytes: Arc<[u8]>, extension: Option<&str>) -> Result<DecodedAudio> {
        let mut hint = Hint::new();
        if let Some(ext) = extension {
            hint.with_extension(ext);
        }

        let mss = MediaSourceStream::new(Box::new(std::io::Cursor::new(bytes)), Default::default());
        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(decode_error)?;

        let mut format = probed.format;
        let track = format
            .default_track()
            .ok_or_else(|| Error::Decode("no audio track found".into()))?;
        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
        let mut channel_count = track
            .codec_params
            .channels
            .map(|c| c.count())
            .unwrap_or(0);

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(decode_error)?;

        let mut interleaved: Vec<f32> = Vec::new();
        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break
                }
                Err(SymphoniaError::ResetRequired) => continue,
                Err(e) => return Err(decode_error(e)),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    sample_rate = spec.rate;
                    channel_count = spec.channels.count();

                    let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    buf.copy_interleaved_ref(decoded);
                    interleaved.extend_from_slice(buf.samples());
                }
                // Corrupt packet: skip it, keep the rest of the stream.
                Err(SymphoniaError::DecodeError(msg)) => {
                    tracing::warn!("Skipping undecodable packet: {}", msg);
                }
                Err(SymphoniaError::IoError(_)) => break,
                Err(e) => return Err(decode_error(e)),
            }
        }

        if sample_rate == 0 || channel_count == 0 {
            return Err(Error::Decode("stream has no decodable audio".into()));
        }

        DecodedAudio::from_interleaved(sample_rate, channel_count, &interleaved)
    }
}
