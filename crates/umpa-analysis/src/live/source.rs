//! Continuous sample sources for the live sampler.

use ringbuf::{
    traits::{Consumer, Split},
    HeapCons, HeapProd, HeapRb,
};
use std::collections::VecDeque;

/// A continuous mono input the sampler can read from at any moment.
pub trait LiveSource: Send {
    fn sample_rate(&self) -> u32;

    /// Copy the most recent samples into `frame`, oldest first, and return
    /// how many were written. Zero means nothing has been captured yet.
    fn read_latest(&mut self, frame: &mut [f32]) -> usize;
}

impl<S: LiveSource + ?Sized> LiveSource for Box<S> {
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn read_latest(&mut self, frame: &mut [f32]) -> usize {
        (**self).read_latest(frame)
    }
}

/// Drains an SPSC ring buffer fed by a capture callback into a sliding
/// window of the most recent samples.
pub struct RingBufferSource {
    consumer: HeapCons<f32>,
    sample_rate: u32,
    window: VecDeque<f32>,
    window_len: usize,
}

impl RingBufferSource {
    pub fn new(consumer: HeapCons<f32>, sample_rate: u32, window_len: usize) -> Self {
        Self {
            consumer,
            sample_rate,
            window: VecDeque::with_capacity(window_len),
            window_len,
        }
    }

    /// A ring buffer of `capacity` samples split into the producer half for
    /// the capture side and a source reading the consumer half.
    pub fn channel(
        sample_rate: u32,
        window_len: usize,
        capacity: usize,
    ) -> (HeapProd<f32>, RingBufferSource) {
        let (producer, consumer) = HeapRb::<f32>::new(capacity).split();
        (producer, Self::new(consumer, sample_rate, window_len))
    }

    /// Samples currently held in the window.
    pub fn buffered(&self) -> usize {
        self.window.len()
    }

    fn drain(&mut self) {
        let mut drain_buf = [0.0f32; 1024];
        loop {
            let read = self.consumer.pop_slice(&mut drain_buf);
            if read == 0 {
                break;
            }
            for &s in &drain_buf[..read] {
                if self.window.len() == self.window_len {
                    self.window.pop_front();
                }
                self.window.push_back(s);
            }
        }
    }
}

impl LiveSource for RingBufferSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read_latest(&mut self, frame: &mut [f32]) -> usize {
        self.drain();
        let n = frame.len().min(self.window.len());
        let skip = self.window.len() - n;
        for (dst, &src) in frame.iter_mut().zip(self.window.iter().skip(skip)) {
            *dst = src;
        }
        n
    }
}
