//! Frame segmentation.
//!
//! Splits a mono sample buffer into fixed-length frames at a fixed hop.
//! Frames are borrowed slices of the input; nothing is copied.
//!
//! ```text
//! frame_count = floor(N / hop_size)
//! frame i     = samples[i * hop .. min(i * hop + frame_len, N)]
//! ```
//!
//! When `frame_len > hop_size` the last frames are clipped at the end of
//! the buffer and come out shorter.

use std::iter::FusedIterator;
use umpa_core::{AnalysisConfig, Error, Result};

/// Frame length and hop, in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSegmenter {
    frame_len: usize,
    hop_size: usize,
}

impl FrameSegmenter {
    /// Create a segmenter. Both sizes must be non-zero.
    pub fn new(frame_len: usize, hop_size: usize) -> Result<Self> {
        if hop_size == 0 {
            return Err(Error::UnanalyzableInput("hop size is zero".into()));
        }
        if frame_len == 0 {
            return Err(Error::UnanalyzableInput("frame length is zero".into()));
        }
        Ok(Self {
            frame_len,
            hop_size,
        })
    }

    /// Derive sizes from the configured durations at `sample_rate`.
    ///
    /// A sample rate too low to hold one hop is rejected.
    pub fn from_config(config: &AnalysisConfig, sample_rate: u32) -> Result<Self> {
        let hop_size = config.hop_size(sample_rate);
        let frame_len = config.frame_len(sample_rate);
        if hop_size == 0 || frame_len == 0 {
            return Err(Error::UnanalyzableInput(format!(
                "sample rate {} Hz is too low for {}s frames",
                sample_rate, config.hop_duration_secs
            )));
        }
        Self::new(frame_len, hop_size)
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Number of frames for a buffer of `total` samples.
    pub fn frame_count(&self, total: usize) -> usize {
        total / self.hop_size
    }

    /// First sample index of frame `index`.
    pub fn frame_start(&self, index: usize) -> usize {
        index * self.hop_size
    }

    /// Frame `index` of `samples`, or `None` past the last frame.
    pub fn frame<'a>(&self, samples: &'a [f32], index: usize) -> Option<&'a [f32]> {
        if index >= self.frame_count(samples.len()) {
            return None;
        }
        let start = self.frame_start(index);
        let end = (start + self.frame_len).min(samples.len());
        Some(&samples[start..end])
    }

    /// Iterate the frames of `samples`.
    ///
    /// Fails when the buffer cannot produce a single frame: an empty track
    /// would otherwise come out with no data.
    pub fn segment<'a>(&self, samples: &'a [f32]) -> Result<Frames<'a>> {
        if samples.is_empty() {
            return Err(Error::UnanalyzableInput("no samples".into()));
        }
        if samples.len() < self.hop_size {
            return Err(Error::UnanalyzableInput(format!(
                "{} samples is shorter than one hop of {}",
                samples.len(),
                self.hop_size
            )));
        }
        Ok(Frames {
            segmenter: *self,
            samples,
            next: 0,
            end: self.frame_count(samples.len()),
        })
    }
}

/// Iterator over the frames of a buffer. Cheap to clone; a clone restarts
/// from the clone point.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    segmenter: FrameSegmenter,
    samples: &'a [f32],
    next: usize,
    end: usize,
}

impl<'a> Frames<'a> {
    /// Index of the next frame to be yielded.
    pub fn position(&self) -> usize {
        self.next
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let frame = self.segmenter.frame(self.samples, self.next);
        self.next += 1;
        frame
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

impl FusedIterator for Frames<'_> {}
