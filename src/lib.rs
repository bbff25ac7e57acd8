pub mod catalog;
pub mod config;
pub mod dsp;
pub mod error;
pub mod offline;

pub use catalog::{EffectKind, EffectParams};
pub use config::{EngineConfig, LengthPolicy};
pub use dsp::engine::{EngineStatus, FilterEngine};
pub use dsp::sample::{Arity, EffectOutput, Sample, StereoFrame};
pub use error::EngineError;

use crate::offline::AudioClip;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the voicefx-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: the effect catalog (kind, label, arity, defaults) for menus.
#[wasm_bindgen]
pub fn effect_catalog() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&catalog::CATALOG[..])
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: apply an effect to a whole mono recording.
/// Returns interleaved samples; stereo effects yield `L R L R ...`.
#[wasm_bindgen]
pub fn convert_samples(
    effect: &str,
    samples: Vec<i16>,
    sample_rate: u32,
) -> Result<Vec<i16>, JsValue> {
    let clip = AudioClip::mono(samples, sample_rate);
    let converted =
        offline::convert_by_name(&clip, effect).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(converted.output.interleaved())
}

/// WASM-exposed: apply an effect and encode the result as a WAV byte array
/// with the right channel count for download.
#[wasm_bindgen]
pub fn convert_to_wav(
    effect: &str,
    samples: Vec<i16>,
    sample_rate: u32,
) -> Result<Vec<u8>, JsValue> {
    let clip = AudioClip::mono(samples, sample_rate);
    let converted =
        offline::convert_by_name(&clip, effect).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(converted.to_wav_bytes())
}

/// WASM-exposed: one engine for one live stream, fed block by block from an
/// AudioWorklet. Effect switches take effect at the next block.
#[wasm_bindgen]
pub struct LiveProcessor {
    engine: FilterEngine,
}

#[wasm_bindgen]
impl LiveProcessor {
    /// Build from a JSON `EngineConfig` (`"{}"` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<LiveProcessor, JsValue> {
        let config =
            EngineConfig::from_json(config_json).map_err(|e| JsValue::from_str(&format!("{e}")))?;
        let engine =
            FilterEngine::from_config(&config).map_err(|e| JsValue::from_str(&format!("{e}")))?;
        Ok(LiveProcessor { engine })
    }

    #[wasm_bindgen(js_name = selectEffect)]
    pub fn select_effect(&mut self, name: &str) -> Result<(), JsValue> {
        self.engine
            .select_effect_by_name(name)
            .map_err(|e| JsValue::from_str(&format!("{e}")))
    }

    #[wasm_bindgen(js_name = clearEffect)]
    pub fn clear_effect(&mut self) {
        self.engine.clear_effect();
    }

    /// Output channel count for the current effect (1 or 2).
    pub fn channels(&self) -> u16 {
        self.engine.output_arity().channels()
    }

    #[wasm_bindgen(js_name = blockLen)]
    pub fn block_len(&self) -> usize {
        self.engine.block_len()
    }

    /// Process one block; returns interleaved samples.
    pub fn process(&mut self, block: Vec<i16>) -> Vec<i16> {
        self.engine.process(&block).interleaved()
    }
}
