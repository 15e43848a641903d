//! Default input device capture via cpal.
//!
//! The cpal stream is not `Send`, so it lives on its own `umpa-mic` thread
//! for its whole lifetime. The capture callback down-mixes to mono and
//! pushes into a ring buffer; the [`Microphone`] handed to the sampler only
//! holds the consumer side plus a guard that stops the stream thread when
//! dropped.

use super::source::{LiveSource, RingBufferSource};
use crate::error::{LiveError, LiveResult};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::Sample;
use crossbeam_channel::{bounded, Sender};
use ringbuf::{
    traits::{Producer, Split},
    HeapProd, HeapRb,
};
use std::thread::JoinHandle;
use umpa_core::LiveConfig;

/// Ring buffer capacity between the capture callback and the sampler.
const CAPTURE_BUFFER_SAMPLES: usize = 1 << 16;

/// A running capture of the default input device.
///
/// Dropping it stops the stream and releases the device.
pub struct Microphone {
    source: RingBufferSource,
    _guard: StreamGuard,
}

impl Microphone {
    /// Open the default input device and start capturing.
    pub fn open(config: &LiveConfig) -> LiveResult<Self> {
        let (producer, consumer) = HeapRb::<f32>::new(CAPTURE_BUFFER_SAMPLES).split();
        let (ready_tx, ready_rx) = bounded::<LiveResult<u32>>(1);
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let thread = std::thread::Builder::new()
            .name("umpa-mic".into())
            .spawn(move || {
                let (stream, sample_rate) = match start_stream(producer) {
                    Ok(started) => started,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(sample_rate));
                // Hold the stream until the guard is dropped.
                let _ = stop_rx.recv();
                drop(stream);
                tracing::debug!("Microphone stream closed");
            })?;

        let guard = StreamGuard {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        };

        let sample_rate = ready_rx.recv().map_err(|_| {
            LiveError::DeviceUnavailable("capture thread exited before starting".into())
        })??;

        tracing::info!("Microphone capture started at {} Hz", sample_rate);
        Ok(Self {
            source: RingBufferSource::new(consumer, sample_rate, config.window_samples),
            _guard: guard,
        })
    }
}

impl LiveSource for Microphone {
    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn read_latest(&mut self, frame: &mut [f32]) -> usize {
        self.source.read_latest(frame)
    }
}

struct StreamGuard {
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        // Dropping the sender wakes the stream thread.
        self.stop_tx.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn start_stream(producer: HeapProd<f32>) -> LiveResult<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(LiveError::NoInputDevice)?;
    let supported = device.default_input_config().map_err(config_error)?;

    let channels = supported.channels() as usize;
    let sample_rate = supported.sample_rate().0;
    let config: cpal::StreamConfig = supported.config();

    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => build_input::<f32>(&device, &config, channels, producer)?,
        cpal::SampleFormat::I16 => build_input::<i16>(&device, &config, channels, producer)?,
        cpal::SampleFormat::U16 => build_input::<u16>(&device, &config, channels, producer)?,
        format => {
            return Err(LiveError::DeviceUnavailable(format!(
                "sample format {} not supported",
                format
            )))
        }
    };

    stream.play().map_err(play_error)?;
    Ok((stream, sample_rate))
}

fn build_input<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mut producer: HeapProd<f32>,
) -> LiveResult<cpal::Stream>
where
    T: cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let channels = channels.max(1);
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                for frame in data.chunks(channels) {
                    let sum: f32 = frame.iter().map(|s| s.to_sample::<f32>()).sum();
                    // Full buffer: the sampler is behind, drop the sample.
                    let _ = producer.try_push(sum / frame.len() as f32);
                }
            },
            |err| tracing::warn!("Microphone stream error: {}", err),
            None,
        )
        .map_err(build_error)
}

/// Backend messages that mean the platform refused capture access.
const PERMISSION_MARKERS: &[&str] = &[
    "permission",
    "denied",
    "not permitted",
    "not authorized",
    "unauthorized",
    "eacces",
    "eperm",
];

/// A backend-specific failure is a refused permission only when the backend
/// says so; anything else is a device problem.
fn backend_error(err: cpal::BackendSpecificError) -> LiveError {
    let message = err.description.to_lowercase();
    if PERMISSION_MARKERS.iter().any(|marker| message.contains(marker)) {
        LiveError::PermissionDenied(err.description)
    } else {
        LiveError::DeviceUnavailable(err.description)
    }
}

fn config_error(e: cpal::DefaultStreamConfigError) -> LiveError {
    match e {
        cpal::DefaultStreamConfigError::BackendSpecific { err } => backend_error(err),
        other => LiveError::DeviceUnavailable(other.to_string()),
    }
}

fn build_error(e: cpal::BuildStreamError) -> LiveError {
    match e {
        cpal::BuildStreamError::BackendSpecific { err } => backend_error(err),
        other => LiveError::DeviceUnavailable(other.to_string()),
    }
}

fn play_error(e: cpal::PlayStreamError) -> LiveError {
    match e {
        cpal::PlayStreamError::BackendSpecific { err } => backend_error(err),
        other => LiveError::DeviceUnavailable(other.to_string()),
    }
}
