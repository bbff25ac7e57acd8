//! Delay-line effects — recirculating echo, swept flanger, and the
//! rotating-gain "drunk" delay.

use std::f64::consts::TAU;

use super::ring_buffer::RingBuffer;
use super::sample::{Sample, clamp_i32, to_sample};
use crate::catalog::{DrunkParams, EchoParams, FlangerParams};
use crate::error::{EngineError, Result};

/// Feedback echo: `y = x + decay · y[n - delay]`.
///
/// The delay line stores the wet output, so each repeat is fed back and
/// attenuated again, producing a geometric tail.
#[derive(Debug, Clone)]
pub struct Echo {
    line: RingBuffer,
    delay: usize,
    decay: f64,
}

impl Echo {
    pub fn new(params: EchoParams) -> Result<Self> {
        if params.delay_samples == 0 {
            return Err(EngineError::invalid("echo", "delay must be at least one sample"));
        }
        if !params.decay.is_finite() {
            return Err(EngineError::invalid("echo", "decay must be finite"));
        }
        Ok(Self {
            line: RingBuffer::new(params.delay_samples)?,
            delay: params.delay_samples,
            decay: params.decay,
        })
    }

    #[inline]
    pub fn process_sample(&mut self, x: Sample) -> Sample {
        let delayed = self.line.read_at(self.delay - 1);
        let y = to_sample(x as f64 + self.decay * delayed as f64);
        self.line.write(y);
        y
    }

    pub fn process(&mut self, block: &[Sample]) -> Vec<Sample> {
        block.iter().map(|&x| self.process_sample(x)).collect()
    }

    pub fn line(&self) -> &RingBuffer {
        &self.line
    }
}

/// Flanger: the dry signal plus a copy whose delay is swept by a sine LFO.
#[derive(Debug, Clone)]
pub struct Flanger {
    line: RingBuffer,
    base_delay: f64,
    depth: f64,
    lfo_rate: f64,
    sample_rate: f64,
    /// Absolute sample counter driving the LFO.
    n: u64,
}

impl Flanger {
    pub fn new(params: FlangerParams, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate { rate: sample_rate });
        }
        let FlangerParams {
            delay,
            depth,
            lfo_rate,
        } = params;
        if !(delay.is_finite() && depth.is_finite() && lfo_rate.is_finite()) {
            return Err(EngineError::invalid("flanger", "parameters must be finite"));
        }
        if delay < 0.0 || depth < 0.0 {
            return Err(EngineError::invalid("flanger", "delay and depth must be non-negative"));
        }
        let rate = sample_rate as f64;
        let capacity = (((delay + depth) * rate).ceil() as usize).saturating_add(1);
        Ok(Self {
            line: RingBuffer::new(capacity)?,
            base_delay: delay * rate,
            depth: depth * rate,
            lfo_rate,
            sample_rate: rate,
            n: 0,
        })
    }

    /// Modulated delay in whole samples for LFO index `n`.
    fn delay_at(&self, n: u64) -> usize {
        let lfo = (TAU * self.lfo_rate * n as f64 / self.sample_rate).sin();
        let d = (self.base_delay + self.depth * lfo) as i64;
        d.clamp(0, self.line.capacity() as i64 - 1) as usize
    }

    #[inline]
    pub fn process_sample(&mut self, x: Sample) -> Sample {
        self.line.write(x);
        let d = self.delay_at(self.n);
        self.n += 1;
        clamp_i32(x as i32 + self.line.read_at(d) as i32)
    }

    pub fn process(&mut self, block: &[Sample]) -> Vec<Sample> {
        block.iter().map(|&x| self.process_sample(x)).collect()
    }

    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }

    pub fn samples_processed(&self) -> u64 {
        self.n
    }
}

/// Rotating-gain delay: `y = x·cos(n) + x·sin(n) + x[n - N]`.
#[derive(Debug, Clone)]
pub struct Drunk {
    line: RingBuffer,
    n: u64,
}

impl Drunk {
    pub fn new(params: DrunkParams, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate { rate: sample_rate });
        }
        if !params.delay_seconds.is_finite() || params.delay_seconds * (sample_rate as f64) < 1.0 {
            return Err(EngineError::invalid("drunk", "delay must span at least one sample"));
        }
        Ok(Self {
            line: RingBuffer::with_duration(params.delay_seconds, sample_rate)?,
            n: 0,
        })
    }

    #[inline]
    pub fn process_sample(&mut self, x: Sample) -> Sample {
        let i = self.n as f64;
        let xf = x as f64;
        let delayed = self.line.oldest() as f64;
        self.line.write(x);
        self.n += 1;
        to_sample(xf * i.cos() + xf * i.sin() + delayed)
    }

    pub fn process(&mut self, block: &[Sample]) -> Vec<Sample> {
        block.iter().map(|&x| self.process_sample(x)).collect()
    }
}
