//! Engine configuration, loadable from JSON.
//!
//! ```json
//! {
//!   "sampleRate": 16000,
//!   "blockLen": 1024,
//!   "lengthPolicy": "fixedBlock",
//!   "effect": "Echo",
//!   "params": { "effect": "echo", "delaySamples": 2048, "decay": 0.5 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{EffectKind, EffectParams};
use crate::error::{EngineError, Result};

/// Sample rate used when none is configured (the live microphone rate).
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;
/// Live block length in samples.
pub const DEFAULT_BLOCK_LEN: usize = 1024;

/// What to do when a pitch-shift effect returns a block of a different length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LengthPolicy {
    /// Return the natural `⌈L / factor⌉` samples; the caller adapts buffering.
    #[default]
    Variable,
    /// Zero-pad or truncate back to the input length.
    FixedBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub block_len: usize,
    pub length_policy: LengthPolicy,
    /// Effect to activate on construction, by catalog name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    /// Parameter overrides; the tag selects the effect when `effect` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<EffectParams>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            sample_rate: DEFAULT_SAMPLE_RATE,
            block_len: DEFAULT_BLOCK_LEN,
            length_policy: LengthPolicy::Variable,
            effect: None,
            params: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(source: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate {
                rate: self.sample_rate,
            });
        }
        if self.block_len == 0 {
            return Err(EngineError::invalid("engine", "block length must be positive"));
        }
        self.initial_params().map(|_| ())
    }

    /// The effect to start with, if any: explicit params win, otherwise the
    /// named effect's catalog defaults.
    pub fn initial_params(&self) -> Result<Option<EffectParams>> {
        let named = self
            .effect
            .as_deref()
            .map(str::parse::<EffectKind>)
            .transpose()?;
        match (&self.params, named) {
            (Some(params), Some(kind)) if params.kind() != kind => Err(EngineError::invalid(
                "engine",
                format!("params are for {} but effect is {kind}", params.kind()),
            )),
            (Some(params), _) => Ok(Some(params.clone())),
            (None, Some(kind)) => Ok(Some(kind.default_params())),
            (None, None) => Ok(None),
        }
    }
}
