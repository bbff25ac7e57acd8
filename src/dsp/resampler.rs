//! Linear resampling — the primitive behind every pitch-shift effect.
//!
//! The input is read at positions `0, f, 2f, …` while the position stays
//! below the input length, interpolating between the two bracketing
//! samples. The output therefore has `⌈L / f⌉` samples: raising pitch
//! (`f > 1`) shortens the block, lowering it lengthens the block.

use super::sample::{Sample, to_sample};
use crate::error::{EngineError, Result};

/// Widest pitch shift accepted, in semitones either way (four octaves).
pub const MAX_SEMITONES: f64 = 48.0;

/// Playback-rate ratio for a shift of `semitones`: `2^(semitones/12)`.
pub fn pitch_factor(semitones: f64) -> f64 {
    (2.0_f64).powf(semitones / 12.0)
}

/// Fractional-index reader with a fixed step.
#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    factor: f64,
}

impl Resampler {
    /// A resampler stepping by `factor`, which must lie within
    /// `pitch_factor(±MAX_SEMITONES)` so output length stays bounded.
    pub fn new(factor: f64) -> Result<Self> {
        let (min, max) = (pitch_factor(-MAX_SEMITONES), pitch_factor(MAX_SEMITONES));
        if !factor.is_finite() || factor < min || factor > max {
            return Err(EngineError::invalid(
                "resampler",
                format!("pitch factor must be within {min}..={max}, got {factor}"),
            ));
        }
        Ok(Self { factor })
    }

    pub fn from_semitones(semitones: f64) -> Result<Self> {
        if !semitones.is_finite() || semitones.abs() > MAX_SEMITONES {
            return Err(EngineError::invalid(
                "resampler",
                format!("shift must be within ±{MAX_SEMITONES} semitones, got {semitones}"),
            ));
        }
        Self::new(pitch_factor(semitones))
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Number of output samples produced for `input_len` input samples.
    pub fn output_len(&self, input_len: usize) -> usize {
        if input_len == 0 {
            return 0;
        }
        let len = input_len as f64;
        let mut count = (len / self.factor).ceil() as usize;
        // Settle float rounding so that exactly the positions `k·f < len` are counted.
        while count > 0 && (count - 1) as f64 * self.factor >= len {
            count -= 1;
        }
        while count < usize::MAX && (count as f64) * self.factor < len {
            count += 1;
        }
        count
    }

    /// Resample 16-bit input.
    pub fn process(&self, input: &[Sample]) -> Vec<Sample> {
        self.resample_with(input.len(), |i| input[i] as f64)
    }

    /// Resample input already carried in the wide domain.
    pub fn process_wide(&self, input: &[f64]) -> Vec<Sample> {
        self.resample_with(input.len(), |i| input[i])
    }

    fn resample_with(&self, len: usize, sample: impl Fn(usize) -> f64) -> Vec<Sample> {
        (0..self.output_len(len))
            .map(|k| to_sample(interpolate(len, k as f64 * self.factor, &sample)))
            .collect()
    }
}

/// Linear interpolation at `pos`; positions at or past the last sample hold it.
#[inline]
fn interpolate(len: usize, pos: f64, sample: &impl Fn(usize) -> f64) -> f64 {
    let last = len - 1;
    let i0 = pos.floor() as usize;
    if i0 >= last {
        return sample(last);
    }
    let frac = pos - i0 as f64;
    let a = sample(i0);
    a + frac * (sample(i0 + 1) - a)
}
