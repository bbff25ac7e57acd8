//! Per-effect persistent memory.
//!
//! `EffectState` holds exactly one effect's buffers, cursors, and phase. A
//! fresh value is built whenever the engine switches effects, so nothing one
//! effect left behind can leak into the next.

use super::delay::{Drunk, Echo, Flanger};
use super::modulation::Alien;
use super::pitch::{Robotize, VoiceShift};
use super::sample::{EffectOutput, Sample};
use super::spatial::{AlternateChannels, PingPong};
use super::vibrato::Vibrato;
use crate::catalog::{EffectKind, EffectParams};
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum EffectState {
    Normal,
    Alien(Alien),
    Robotic(Robotize),
    Male(VoiceShift),
    Female(VoiceShift),
    Baby(VoiceShift),
    Echo(Echo),
    PingPong(PingPong),
    AlternateChannels(AlternateChannels),
    Mutation(Vibrato),
    Flanger(Flanger),
    Drunk(Drunk),
}

impl EffectState {
    /// Build zeroed state sized for `params` at `sample_rate`.
    pub fn new(params: &EffectParams, sample_rate: u32) -> Result<Self> {
        let state = match *params {
            EffectParams::Normal => EffectState::Normal,
            EffectParams::Alien(p) => EffectState::Alien(Alien::new(p, sample_rate)?),
            EffectParams::Robotic(p) => EffectState::Robotic(Robotize::new(p, sample_rate)?),
            EffectParams::Male(p) => EffectState::Male(VoiceShift::new(p)?),
            EffectParams::Female(p) => EffectState::Female(VoiceShift::new(p)?),
            EffectParams::Baby(p) => EffectState::Baby(VoiceShift::new(p)?),
            EffectParams::Echo(p) => EffectState::Echo(Echo::new(p)?),
            EffectParams::PingPong(p) => EffectState::PingPong(PingPong::new(p, sample_rate)?),
            EffectParams::AlternateChannels(p) => {
                EffectState::AlternateChannels(AlternateChannels::new(p)?)
            }
            EffectParams::Mutation(p) => EffectState::Mutation(Vibrato::new(p, sample_rate)?),
            EffectParams::Flanger(p) => EffectState::Flanger(Flanger::new(p, sample_rate)?),
            EffectParams::Drunk(p) => EffectState::Drunk(Drunk::new(p, sample_rate)?),
        };
        Ok(state)
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            EffectState::Normal => EffectKind::Normal,
            EffectState::Alien(_) => EffectKind::Alien,
            EffectState::Robotic(_) => EffectKind::Robotic,
            EffectState::Male(_) => EffectKind::Male,
            EffectState::Female(_) => EffectKind::Female,
            EffectState::Baby(_) => EffectKind::Baby,
            EffectState::Echo(_) => EffectKind::Echo,
            EffectState::PingPong(_) => EffectKind::PingPong,
            EffectState::AlternateChannels(_) => EffectKind::AlternateChannels,
            EffectState::Mutation(_) => EffectKind::Mutation,
            EffectState::Flanger(_) => EffectKind::Flanger,
            EffectState::Drunk(_) => EffectKind::Drunk,
        }
    }

    /// Run the bound algorithm over one block.
    pub fn process(&mut self, block: &[Sample]) -> EffectOutput {
        match self {
            EffectState::Normal => EffectOutput::Mono(block.to_vec()),
            EffectState::Alien(fx) => EffectOutput::Mono(fx.process(block)),
            EffectState::Robotic(fx) => EffectOutput::Mono(fx.process(block)),
            EffectState::Male(fx) | EffectState::Female(fx) | EffectState::Baby(fx) => {
                EffectOutput::Mono(fx.process(block))
            }
            EffectState::Echo(fx) => EffectOutput::Mono(fx.process(block)),
            EffectState::PingPong(fx) => EffectOutput::Stereo(fx.process(block)),
            EffectState::AlternateChannels(fx) => EffectOutput::Stereo(fx.process(block)),
            EffectState::Mutation(fx) => EffectOutput::Mono(fx.process(block)),
            EffectState::Flanger(fx) => EffectOutput::Mono(fx.process(block)),
            EffectState::Drunk(fx) => EffectOutput::Mono(fx.process(block)),
        }
    }
}
