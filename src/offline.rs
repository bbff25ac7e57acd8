//! Offline conversion — run one effect over a whole decoded recording.
//!
//! The decode side hands over an `AudioClip` (payload plus the container's
//! channel/rate/width metadata); the result carries the output channel count
//! so the writer can fill in the header correctly. With the `wav` feature,
//! `read_wav`/`write_wav` do the container work via `hound`.

use log::info;

use crate::catalog::{EffectKind, EffectParams};
use crate::dsp::engine::FilterEngine;
use crate::dsp::renderer;
use crate::dsp::sample::{EffectOutput, Sample};
use crate::error::{EngineError, Result};

/// A decoded PCM recording.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub channels: u16,
    pub sample_rate: u32,
    /// Bytes per sample.
    pub sample_width: u16,
    pub frame_count: usize,
    /// Interleaved samples, `frame_count * channels` long.
    pub samples: Vec<Sample>,
}

impl AudioClip {
    /// A mono 16-bit clip.
    pub fn mono(samples: Vec<Sample>, sample_rate: u32) -> Self {
        AudioClip {
            channels: 1,
            sample_rate,
            sample_width: 2,
            frame_count: samples.len(),
            samples,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count as f64 / self.sample_rate as f64
    }

    /// Average interleaved channels down to one.
    pub fn to_mono(&self) -> AudioClip {
        if self.channels <= 1 {
            return self.clone();
        }
        let channels = self.channels as usize;
        let samples = self
            .samples
            .chunks_exact(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as Sample
            })
            .collect::<Vec<_>>();
        AudioClip::mono(samples, self.sample_rate)
    }

    /// The engine takes mono 16-bit input only.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate { rate: 0 });
        }
        if self.channels != 1 || self.sample_width != 2 {
            return Err(EngineError::UnsupportedFormat {
                channels: self.channels,
                bits: self.sample_width * 8,
            });
        }
        Ok(())
    }
}

/// Output of an offline conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub output: EffectOutput,
    pub sample_rate: u32,
}

impl Converted {
    pub fn channels(&self) -> u16 {
        self.output.channels()
    }

    pub fn frame_count(&self) -> usize {
        self.output.len()
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn to_wav_bytes(&self) -> Vec<u8> {
        renderer::encode_output(&self.output, self.sample_rate)
    }
}

/// Apply one effect to the entire clip in a single block, starting from fresh state.
pub fn convert(clip: &AudioClip, effect: impl Into<EffectParams>) -> Result<Converted> {
    clip.validate()?;
    let params = effect.into();
    let kind = params.kind();
    let mut engine = FilterEngine::new(clip.sample_rate)?;
    engine.select_params(params)?;
    let output = engine.process(&clip.samples);
    info!(
        "converted {} frames with {kind}: {} frame(s), {} channel(s)",
        clip.frame_count,
        output.len(),
        output.channels()
    );
    Ok(Converted {
        output,
        sample_rate: clip.sample_rate,
    })
}

/// `convert` with the effect looked up by catalog name.
pub fn convert_by_name(clip: &AudioClip, effect: &str) -> Result<Converted> {
    let kind: EffectKind = effect.parse()?;
    convert(clip, kind)
}

#[cfg(feature = "wav")]
mod wav {
    use std::path::Path;

    use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

    use super::{AudioClip, Converted, convert};
    use crate::catalog::EffectParams;
    use crate::error::{EngineError, Result};

    /// Decode a 16-bit integer PCM WAV file.
    pub fn read_wav(path: impl AsRef<Path>) -> Result<AudioClip> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();
        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(EngineError::UnsupportedFormat {
                channels: spec.channels,
                bits: spec.bits_per_sample,
            });
        }
        let frame_count = reader.duration() as usize;
        let samples = reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(AudioClip {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            sample_width: 2,
            frame_count,
            samples,
        })
    }

    /// Write converted output with a header matching its channel count.
    pub fn write_wav(path: impl AsRef<Path>, converted: &Converted) -> Result<()> {
        let spec = WavSpec {
            channels: converted.channels(),
            sample_rate: converted.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec)?;
        for sample in converted.output.interleaved() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Read `input`, apply the effect, and write the result to `output`.
    /// Multi-channel input is mixed down to mono first.
    pub fn convert_file(
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        effect: impl Into<EffectParams>,
    ) -> Result<Converted> {
        let clip = read_wav(input)?.to_mono();
        let converted = convert(&clip, effect)?;
        write_wav(output, &converted)?;
        Ok(converted)
    }
}

#[cfg(feature = "wav")]
pub use wav::{convert_file, read_wav, write_wav};
