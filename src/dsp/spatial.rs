//! Stereo spatializers — ping-pong bounce and hard channel alternation.
//!
//! Both take mono input and emit one `[left, right]` frame per sample. Their
//! alternation counters are absolute, so a period that straddles a block
//! boundary carries on where it left off.

use super::ring_buffer::RingBuffer;
use super::sample::{Sample, StereoFrame};
use crate::catalog::{AlternateParams, PingPongParams};
use crate::error::{EngineError, Result};

/// Direct signal on one side, the signal from one period ago on the other,
/// swapping sides every half period.
#[derive(Debug, Clone)]
pub struct PingPong {
    line: RingBuffer,
    n: u64,
}

impl PingPong {
    pub fn new(params: PingPongParams, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate { rate: sample_rate });
        }
        if !params.delay_seconds.is_finite() || params.delay_seconds * (sample_rate as f64) < 1.0 {
            return Err(EngineError::invalid("ping pong", "delay must span at least one sample"));
        }
        Ok(Self {
            line: RingBuffer::with_duration(params.delay_seconds, sample_rate)?,
            n: 0,
        })
    }

    /// Bounce period in samples.
    pub fn period(&self) -> usize {
        self.line.capacity()
    }

    #[inline]
    pub fn process_sample(&mut self, x: Sample) -> StereoFrame {
        let delayed = self.line.oldest();
        self.line.write(x);

        let period = self.line.capacity() as u64;
        let first_half = self.n % period < period / 2;
        self.n += 1;

        if first_half { [x, delayed] } else { [delayed, x] }
    }

    pub fn process(&mut self, block: &[Sample]) -> Vec<StereoFrame> {
        block.iter().map(|&x| self.process_sample(x)).collect()
    }
}

/// Routes runs of `samples_per_alternation` samples entirely to the left,
/// then entirely to the right.
#[derive(Debug, Clone)]
pub struct AlternateChannels {
    period: u64,
    n: u64,
}

impl AlternateChannels {
    pub fn new(params: AlternateParams) -> Result<Self> {
        if params.samples_per_alternation == 0 {
            return Err(EngineError::invalid(
                "alternate channels",
                "alternation period must be at least one sample",
            ));
        }
        Ok(Self {
            period: params.samples_per_alternation as u64,
            n: 0,
        })
    }

    #[inline]
    pub fn process_sample(&mut self, x: Sample) -> StereoFrame {
        let left = (self.n / self.period) % 2 == 0;
        self.n += 1;
        if left { [x, 0] } else { [0, x] }
    }

    pub fn process(&mut self, block: &[Sample]) -> Vec<StereoFrame> {
        block.iter().map(|&x| self.process_sample(x)).collect()
    }
}
