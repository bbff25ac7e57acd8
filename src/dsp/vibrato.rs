//! Vibrato ("mutation") — a delay line read through a wobbling fractional cursor.
//!
//! The write cursor advances one slot per sample. The read cursor advances by
//! `1 + depth·sin(2π·f0·n/rate)`, so its distance to the write cursor drifts
//! back and forth and the interpolated read comes out pitch-modulated.

use std::f64::consts::TAU;

use super::ring_buffer::RingBuffer;
use super::sample::{Sample, to_sample};
use crate::catalog::VibratoParams;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone)]
pub struct Vibrato {
    line: RingBuffer,
    read_pos: f64,
    write_pos: usize,
    frequency: f64,
    depth: f64,
    sample_rate: f64,
    /// Absolute sample index driving the LFO.
    n: u64,
}

impl Vibrato {
    pub fn new(params: VibratoParams, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate { rate: sample_rate });
        }
        if !(params.frequency.is_finite() && params.depth.is_finite()) {
            return Err(EngineError::invalid("mutation", "frequency and depth must be finite"));
        }
        let line = RingBuffer::new(params.buffer_len)?;
        // Fresh state keeps the read cursor half a buffer behind the writer.
        let write_pos = line.capacity() / 2;
        Ok(Self {
            line,
            read_pos: 0.0,
            write_pos,
            frequency: params.frequency,
            depth: params.depth,
            sample_rate: sample_rate as f64,
            n: 0,
        })
    }

    pub fn read_pos(&self) -> f64 {
        self.read_pos
    }

    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    #[inline]
    pub fn process_sample(&mut self, x: Sample) -> Sample {
        let len = self.line.capacity();
        self.line.set(self.write_pos, x);
        let y = self.line.read_fractional(self.read_pos);

        let lfo = (TAU * self.frequency * self.n as f64 / self.sample_rate).sin();
        self.read_pos = (self.read_pos + 1.0 + self.depth * lfo).rem_euclid(len as f64);
        self.write_pos = (self.write_pos + 1) % len;
        self.n += 1;

        to_sample(y)
    }

    pub fn process(&mut self, block: &[Sample]) -> Vec<Sample> {
        block.iter().map(|&x| self.process_sample(x)).collect()
    }
}
