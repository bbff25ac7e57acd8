//! Sample types shared by every effect.

use serde::{Deserialize, Serialize};

/// A signed 16-bit PCM sample.
pub type Sample = i16;

/// One stereo frame: `[left, right]`.
pub type StereoFrame = [Sample; 2];

/// Saturating conversion from the wide intermediate domain to a 16-bit sample.
///
/// Values are clamped to `[-32768, 32767]` and then truncated toward zero.
/// NaN maps to silence.
#[inline]
pub fn to_sample(value: f64) -> Sample {
    if value.is_nan() {
        return 0;
    }
    value.clamp(Sample::MIN as f64, Sample::MAX as f64) as Sample
}

/// Saturating conversion for integer sums.
#[inline]
pub fn clamp_i32(value: i32) -> Sample {
    value.clamp(Sample::MIN as i32, Sample::MAX as i32) as Sample
}

/// Number of output channels an effect produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arity {
    Mono,
    Stereo,
}

impl Arity {
    pub fn channels(self) -> u16 {
        match self {
            Arity::Mono => 1,
            Arity::Stereo => 2,
        }
    }
}

/// The result of processing one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutput {
    Mono(Vec<Sample>),
    Stereo(Vec<StereoFrame>),
}

impl EffectOutput {
    /// Number of frames (samples per channel).
    pub fn len(&self) -> usize {
        match self {
            EffectOutput::Mono(s) => s.len(),
            EffectOutput::Stereo(f) => f.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn arity(&self) -> Arity {
        match self {
            EffectOutput::Mono(_) => Arity::Mono,
            EffectOutput::Stereo(_) => Arity::Stereo,
        }
    }

    pub fn channels(&self) -> u16 {
        self.arity().channels()
    }

    /// Flatten to interleaved PCM (`L R L R ...` for stereo).
    pub fn interleaved(&self) -> Vec<Sample> {
        match self {
            EffectOutput::Mono(s) => s.clone(),
            EffectOutput::Stereo(frames) => frames.iter().flatten().copied().collect(),
        }
    }

    /// Left and right channels as separate vectors. Mono output is duplicated.
    pub fn split(&self) -> (Vec<Sample>, Vec<Sample>) {
        match self {
            EffectOutput::Mono(s) => (s.clone(), s.clone()),
            EffectOutput::Stereo(frames) => frames.iter().map(|&[l, r]| (l, r)).unzip(),
        }
    }

    pub fn as_mono(&self) -> Option<&[Sample]> {
        match self {
            EffectOutput::Mono(s) => Some(s),
            EffectOutput::Stereo(_) => None,
        }
    }

    pub fn as_stereo(&self) -> Option<&[StereoFrame]> {
        match self {
            EffectOutput::Stereo(f) => Some(f),
            EffectOutput::Mono(_) => None,
        }
    }

    /// Zero-pad or truncate to exactly `len` frames.
    pub fn fit_to_length(&mut self, len: usize) {
        match self {
            EffectOutput::Mono(s) => s.resize(len, 0),
            EffectOutput::Stereo(f) => f.resize(len, [0, 0]),
        }
    }

    /// True if every sample on every channel is zero.
    pub fn is_silent(&self) -> bool {
        match self {
            EffectOutput::Mono(s) => s.iter().all(|&x| x == 0),
            EffectOutput::Stereo(f) => f.iter().all(|&[l, r]| l == 0 && r == 0),
        }
    }
}
