//! Wrapped phase accumulator used by the modulation effects.

use std::f64::consts::{PI, TAU};

use crate::error::{EngineError, Result};

/// A running phase angle in `(-π, π]`, advanced by a fixed increment per sample.
///
/// The phase lives across calls so consecutive blocks see one continuous
/// cosine instead of restarting at zero on every block.
#[derive(Debug, Clone)]
pub struct PhaseOscillator {
    theta: f64,
    increment: f64,
}

impl PhaseOscillator {
    /// Oscillator with a raw angular increment in radians per sample.
    pub fn new(increment: f64) -> Self {
        PhaseOscillator {
            theta: 0.0,
            increment,
        }
    }

    /// Oscillator at `frequency` Hz: `ω = 2π·f0/rate`.
    pub fn with_frequency(frequency: f64, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate { rate: sample_rate });
        }
        if !frequency.is_finite() {
            return Err(EngineError::invalid("oscillator", "frequency must be finite"));
        }
        Ok(Self::new(TAU * frequency / sample_rate as f64))
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Return `cos(theta)` for the current phase, then advance and wrap.
    #[inline]
    pub fn step(&mut self) -> f64 {
        let value = self.theta.cos();
        self.theta += self.increment;
        while self.theta > PI {
            self.theta -= TAU;
        }
        while self.theta <= -PI {
            self.theta += TAU;
        }
        value
    }

    /// Reset phase to zero.
    pub fn reset(&mut self) {
        self.theta = 0.0;
    }
}
