//! Pitch-shift family — male, female, and baby voices plus the robot voice.
//!
//! None of these keep memory between blocks beyond their configuration. Their
//! output length follows the resampler (`⌈L / factor⌉`), not the input length.

use std::f64::consts::TAU;

use super::resampler::Resampler;
use super::sample::Sample;
use crate::catalog::{PitchParams, RobotParams};
use crate::error::{EngineError, Result};

/// Plain semitone shift.
#[derive(Debug, Clone, Copy)]
pub struct VoiceShift {
    resampler: Resampler,
}

impl VoiceShift {
    pub fn new(params: PitchParams) -> Result<Self> {
        Ok(Self {
            resampler: Resampler::from_semitones(params.semitones)?,
        })
    }

    pub fn factor(&self) -> f64 {
        self.resampler.factor()
    }

    pub fn process(&self, block: &[Sample]) -> Vec<Sample> {
        self.resampler.process(block)
    }
}

/// Raised-cosine amplitude envelope followed by a pitch shift.
///
/// The envelope restarts at `t = 0` on every block, so block edges show a
/// small amplitude discontinuity when the block length is not a whole
/// number of envelope periods.
#[derive(Debug, Clone, Copy)]
pub struct Robotize {
    mod_frequency: f64,
    sample_rate: f64,
    resampler: Resampler,
}

impl Robotize {
    pub fn new(params: RobotParams, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate { rate: sample_rate });
        }
        if !params.mod_frequency.is_finite() {
            return Err(EngineError::invalid("robotic", "modulation frequency must be finite"));
        }
        Ok(Self {
            mod_frequency: params.mod_frequency,
            sample_rate: sample_rate as f64,
            resampler: Resampler::from_semitones(params.semitones)?,
        })
    }

    pub fn factor(&self) -> f64 {
        self.resampler.factor()
    }

    /// Envelope gain for sample `k` of a block of `len` samples.
    ///
    /// The time axis runs from 0 to `len / rate` inclusive of both ends.
    pub fn envelope(&self, k: usize, len: usize) -> f64 {
        let t = if len > 1 {
            k as f64 * (len as f64 / self.sample_rate) / (len - 1) as f64
        } else {
            0.0
        };
        (1.0 + (TAU * self.mod_frequency * t).cos()) / 2.0
    }

    pub fn process(&self, block: &[Sample]) -> Vec<Sample> {
        let len = block.len();
        let modulated: Vec<f64> = block
            .iter()
            .enumerate()
            .map(|(k, &x)| x as f64 * self.envelope(k, len))
            .collect();
        self.resampler.process_wide(&modulated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_voice_lengthens_block() {
        let male = VoiceShift::new(PitchParams { semitones: -3.0 }).unwrap();
        let out = male.process(&vec![100; 1024]);
        assert!(male.factor() < 1.0);
        assert!(out.len() > 1024);
        assert!(out.iter().all(|&s| s == 100));
    }

    #[test]
    fn higher_voice_shortens_block() {
        let baby = VoiceShift::new(PitchParams { semitones: 10.0 }).unwrap();
        let out = baby.process(&vec![100; 1024]);
        assert_eq!(out.len(), (1024.0 / baby.factor()).ceil() as usize);
        assert!(out.len() < 1024);
    }

    #[test]
    fn octave_up_halves_length() {
        let shift = VoiceShift::new(PitchParams { semitones: 12.0 }).unwrap();
        assert_eq!(shift.process(&vec![0; 1000]).len(), 500);
    }

    #[test]
    fn envelope_starts_open_and_stays_in_unit_range() {
        let robot = Robotize::new(RobotParams::default(), 16000).unwrap();
        assert!((robot.envelope(0, 1024) - 1.0).abs() < 1e-12);
        let mut min = f64::MAX;
        for k in 0..1024 {
            let e = robot.envelope(k, 1024);
            assert!((0.0..=1.0).contains(&e));
            min = min.min(e);
        }
        // 1024 samples at 16 kHz cover several 100 Hz periods.
        assert!(min < 0.01);
    }

    #[test]
    fn robot_envelope_restarts_every_block() {
        let robot = Robotize::new(
            RobotParams {
                mod_frequency: 100.0,
                semitones: 0.0,
            },
            8000,
        )
        .unwrap();
        let block: Vec<Sample> = (0..300).map(|i| (i * 10) as Sample).collect();
        assert_eq!(robot.process(&block), robot.process(&block));
    }

    #[test]
    fn robot_without_shift_keeps_length_and_first_sample() {
        let robot = Robotize::new(
            RobotParams {
                mod_frequency: 100.0,
                semitones: 0.0,
            },
            8000,
        )
        .unwrap();
        let out = robot.process(&[1000; 64]);
        assert_eq!(out.len(), 64);
        assert_eq!(out[0], 1000);
        assert!(out.iter().all(|&s| (0..=1000).contains(&s)));
    }

    #[test]
    fn robot_default_lowers_pitch() {
        let robot = Robotize::new(RobotParams::default(), 16000).unwrap();
        assert!(robot.factor() < 1.0);
        assert!(robot.process(&[0; 512]).len() > 512);
    }

    #[test]
    fn robot_single_sample_block() {
        let robot = Robotize::new(RobotParams::default(), 16000).unwrap();
        assert_eq!(robot.envelope(0, 1), 1.0);
        assert!(!robot.process(&[7]).is_empty());
    }
}
