//! Ring modulation ("alien" voice).

use super::oscillator::PhaseOscillator;
use super::sample::{Sample, to_sample};
use crate::catalog::AlienParams;
use crate::error::Result;

/// Multiplies the input by a cosine carrier whose phase runs across blocks.
#[derive(Debug, Clone)]
pub struct Alien {
    carrier: PhaseOscillator,
}

impl Alien {
    pub fn new(params: AlienParams, sample_rate: u32) -> Result<Self> {
        Ok(Self {
            carrier: PhaseOscillator::with_frequency(params.frequency, sample_rate)?,
        })
    }

    pub fn carrier(&self) -> &PhaseOscillator {
        &self.carrier
    }

    #[inline]
    pub fn process_sample(&mut self, x: Sample) -> Sample {
        to_sample(x as f64 * self.carrier.step())
    }

    pub fn process(&mut self, block: &[Sample]) -> Vec<Sample> {
        block.iter().map(|&x| self.process_sample(x)).collect()
    }
}
