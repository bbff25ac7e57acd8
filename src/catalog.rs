//! Effect catalog — the fixed set of effects the engine knows about.
//!
//! Each entry maps an effect identifier to its display label, output arity,
//! and default parameters. Parameter structs serialize to the same camelCase
//! JSON used by the engine configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dsp::sample::Arity;
use crate::error::EngineError;

// ── Identifiers ─────────────────────────────────────────────

/// Identifier of one catalog effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    Normal,
    Alien,
    Robotic,
    Male,
    Female,
    Baby,
    Echo,
    PingPong,
    AlternateChannels,
    Mutation,
    Flanger,
    Drunk,
}

impl EffectKind {
    pub const ALL: [EffectKind; 12] = [
        EffectKind::Normal,
        EffectKind::Alien,
        EffectKind::Robotic,
        EffectKind::Male,
        EffectKind::Female,
        EffectKind::Baby,
        EffectKind::Echo,
        EffectKind::PingPong,
        EffectKind::AlternateChannels,
        EffectKind::Mutation,
        EffectKind::Flanger,
        EffectKind::Drunk,
    ];

    /// Catalog entry for this effect.
    pub fn entry(self) -> &'static CatalogEntry {
        // CATALOG is ordered like ALL.
        &CATALOG[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn arity(self) -> Arity {
        self.entry().arity
    }

    pub fn default_params(self) -> EffectParams {
        self.entry().defaults.clone()
    }

    /// True for effects whose output length depends on a pitch-shift factor.
    pub fn changes_length(self) -> bool {
        matches!(
            self,
            EffectKind::Robotic | EffectKind::Male | EffectKind::Female | EffectKind::Baby
        )
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EffectKind {
    type Err = EngineError;

    /// Case-insensitive lookup that ignores spaces, `-` and `_`.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        let kind = match key.as_str() {
            "normal" | "none" => EffectKind::Normal,
            "alien" => EffectKind::Alien,
            "robotic" | "robot" | "robotize" => EffectKind::Robotic,
            "male" => EffectKind::Male,
            "female" => EffectKind::Female,
            "baby" => EffectKind::Baby,
            "echo" => EffectKind::Echo,
            "pingpong" => EffectKind::PingPong,
            "alternatechannels" => EffectKind::AlternateChannels,
            "mutation" | "vibrato" => EffectKind::Mutation,
            "flanger" => EffectKind::Flanger,
            "drunk" => EffectKind::Drunk,
            _ => {
                return Err(EngineError::UnknownEffect {
                    name: name.to_string(),
                });
            }
        };
        Ok(kind)
    }
}

// ── Parameters ──────────────────────────────────────────────

/// Ring modulation by a cosine carrier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlienParams {
    /// Carrier frequency in Hz.
    pub frequency: f64,
}

impl Default for AlienParams {
    fn default() -> Self {
        ALIEN_DEFAULTS
    }
}

/// Amplitude envelope followed by a pitch shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RobotParams {
    /// Envelope frequency in Hz.
    pub mod_frequency: f64,
    /// Pitch shift in semitones.
    pub semitones: f64,
}

impl Default for RobotParams {
    fn default() -> Self {
        ROBOT_DEFAULTS
    }
}

/// Plain pitch shift. Semitones are required since the default differs per voice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchParams {
    pub semitones: f64,
}

/// Recirculating echo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EchoParams {
    /// Echo spacing in samples; also the ring buffer capacity.
    pub delay_samples: usize,
    /// Gain applied to each recirculation.
    pub decay: f64,
}

impl Default for EchoParams {
    fn default() -> Self {
        ECHO_DEFAULTS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlangerParams {
    /// Base delay in seconds.
    pub delay: f64,
    /// Sweep depth in seconds.
    pub depth: f64,
    /// LFO rate in Hz.
    pub lfo_rate: f64,
}

impl Default for FlangerParams {
    fn default() -> Self {
        FLANGER_DEFAULTS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PingPongParams {
    /// Bounce period in seconds.
    pub delay_seconds: f64,
}

impl Default for PingPongParams {
    fn default() -> Self {
        PING_PONG_DEFAULTS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlternateParams {
    pub samples_per_alternation: usize,
}

impl Default for AlternateParams {
    fn default() -> Self {
        ALTERNATE_DEFAULTS
    }
}

/// Fractional-delay vibrato.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VibratoParams {
    /// LFO frequency in Hz.
    pub frequency: f64,
    /// Read-cursor excursion in samples per sample.
    pub depth: f64,
    pub buffer_len: usize,
}

impl Default for VibratoParams {
    fn default() -> Self {
        VIBRATO_DEFAULTS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrunkParams {
    pub delay_seconds: f64,
}

impl Default for DrunkParams {
    fn default() -> Self {
        DRUNK_DEFAULTS
    }
}

const ALIEN_DEFAULTS: AlienParams = AlienParams { frequency: 700.0 };
const ROBOT_DEFAULTS: RobotParams = RobotParams {
    mod_frequency: 100.0,
    semitones: -2.0,
};
const ECHO_DEFAULTS: EchoParams = EchoParams {
    delay_samples: 1024,
    decay: 0.7,
};
const FLANGER_DEFAULTS: FlangerParams = FlangerParams {
    delay: 0.03,
    depth: 0.02,
    lfo_rate: 0.55,
};
const PING_PONG_DEFAULTS: PingPongParams = PingPongParams { delay_seconds: 1.0 };
const ALTERNATE_DEFAULTS: AlternateParams = AlternateParams {
    samples_per_alternation: 1024,
};
const VIBRATO_DEFAULTS: VibratoParams = VibratoParams {
    frequency: 7.0,
    depth: 0.2,
    buffer_len: 1024,
};
const DRUNK_DEFAULTS: DrunkParams = DrunkParams { delay_seconds: 0.2 };

/// Parameters for exactly one effect, tagged by effect name in JSON:
/// `{"effect": "echo", "delaySamples": 512, "decay": 0.5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "camelCase")]
pub enum EffectParams {
    Normal,
    Alien(AlienParams),
    Robotic(RobotParams),
    Male(PitchParams),
    Female(PitchParams),
    Baby(PitchParams),
    Echo(EchoParams),
    PingPong(PingPongParams),
    AlternateChannels(AlternateParams),
    Mutation(VibratoParams),
    Flanger(FlangerParams),
    Drunk(DrunkParams),
}

impl EffectParams {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectParams::Normal => EffectKind::Normal,
            EffectParams::Alien(_) => EffectKind::Alien,
            EffectParams::Robotic(_) => EffectKind::Robotic,
            EffectParams::Male(_) => EffectKind::Male,
            EffectParams::Female(_) => EffectKind::Female,
            EffectParams::Baby(_) => EffectKind::Baby,
            EffectParams::Echo(_) => EffectKind::Echo,
            EffectParams::PingPong(_) => EffectKind::PingPong,
            EffectParams::AlternateChannels(_) => EffectKind::AlternateChannels,
            EffectParams::Mutation(_) => EffectKind::Mutation,
            EffectParams::Flanger(_) => EffectKind::Flanger,
            EffectParams::Drunk(_) => EffectKind::Drunk,
        }
    }
}

impl From<EffectKind> for EffectParams {
    fn from(kind: EffectKind) -> Self {
        kind.default_params()
    }
}

// ── Catalog table ───────────────────────────────────────────

/// One row of the effect catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub kind: EffectKind,
    /// Label shown by front-ends (e.g. "Ping Pong").
    pub label: &'static str,
    pub arity: Arity,
    pub defaults: EffectParams,
}

pub static CATALOG: [CatalogEntry; 12] = [
    CatalogEntry {
        kind: EffectKind::Normal,
        label: "Normal",
        arity: Arity::Mono,
        defaults: EffectParams::Normal,
    },
    CatalogEntry {
        kind: EffectKind::Alien,
        label: "Alien",
        arity: Arity::Mono,
        defaults: EffectParams::Alien(ALIEN_DEFAULTS),
    },
    CatalogEntry {
        kind: EffectKind::Robotic,
        label: "Robotic",
        arity: Arity::Mono,
        defaults: EffectParams::Robotic(ROBOT_DEFAULTS),
    },
    CatalogEntry {
        kind: EffectKind::Male,
        label: "Male",
        arity: Arity::Mono,
        defaults: EffectParams::Male(PitchParams { semitones: -3.0 }),
    },
    CatalogEntry {
        kind: EffectKind::Female,
        label: "Female",
        arity: Arity::Mono,
        defaults: EffectParams::Female(PitchParams { semitones: 3.0 }),
    },
    CatalogEntry {
        kind: EffectKind::Baby,
        label: "Baby",
        arity: Arity::Mono,
        defaults: EffectParams::Baby(PitchParams { semitones: 10.0 }),
    },
    CatalogEntry {
        kind: EffectKind::Echo,
        label: "Echo",
        arity: Arity::Mono,
        defaults: EffectParams::Echo(ECHO_DEFAULTS),
    },
    CatalogEntry {
        kind: EffectKind::PingPong,
        label: "Ping Pong",
        arity: Arity::Stereo,
        defaults: EffectParams::PingPong(PING_PONG_DEFAULTS),
    },
    CatalogEntry {
        kind: EffectKind::AlternateChannels,
        label: "Alternate Channels",
        arity: Arity::Stereo,
        defaults: EffectParams::AlternateChannels(ALTERNATE_DEFAULTS),
    },
    CatalogEntry {
        kind: EffectKind::Mutation,
        label: "Mutation",
        arity: Arity::Mono,
        defaults: EffectParams::Mutation(VIBRATO_DEFAULTS),
    },
    CatalogEntry {
        kind: EffectKind::Flanger,
        label: "Flanger",
        arity: Arity::Mono,
        defaults: EffectParams::Flanger(FLANGER_DEFAULTS),
    },
    CatalogEntry {
        kind: EffectKind::Drunk,
        label: "Drunk",
        arity: Arity::Mono,
        defaults: EffectParams::Drunk(DRUNK_DEFAULTS),
    },
];
