//! Filter engine — applies the selected effect to successive blocks.
//!
//! The engine owns exactly one `EffectState`. Selecting a different effect
//! throws the old state away and builds a zeroed one; reselecting the same
//! effect keeps its memory. With nothing selected, blocks pass through.
//!
//! One engine serves one stream. It does no locking, so effect switches must
//! happen between `process` calls (for live audio: between blocks).

use log::{debug, info, warn};

use super::sample::{Arity, EffectOutput, Sample};
use super::state::EffectState;
use crate::catalog::{EffectKind, EffectParams};
use crate::config::{DEFAULT_BLOCK_LEN, EngineConfig, LengthPolicy};
use crate::error::{EngineError, Result};

/// Externally visible engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Inactive,
    Active(EffectKind),
}

/// The live effect: its parameters plus the state built from them.
#[derive(Debug, Clone)]
struct ActiveEffect {
    params: EffectParams,
    state: EffectState,
}

#[derive(Debug, Clone)]
pub struct FilterEngine {
    sample_rate: u32,
    block_len: usize,
    length_policy: LengthPolicy,
    active: Option<ActiveEffect>,
    /// Natural output length minus input length for the last block.
    last_length_delta: isize,
}

impl FilterEngine {
    /// An inactive engine at `sample_rate`.
    pub fn new(sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            warn!("rejected engine with zero sample rate");
            return Err(EngineError::InvalidSampleRate { rate: sample_rate });
        }
        Ok(FilterEngine {
            sample_rate,
            block_len: DEFAULT_BLOCK_LEN,
            length_policy: LengthPolicy::Variable,
            active: None,
            last_length_delta: 0,
        })
    }

    /// Build an engine from a validated configuration, activating its effect if named.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let mut engine = FilterEngine::new(config.sample_rate)?;
        engine.block_len = config.block_len;
        engine.length_policy = config.length_policy;
        if let Some(params) = config.initial_params()? {
            engine.select_params(params)?;
        }
        Ok(engine)
    }

    pub fn with_length_policy(mut self, policy: LengthPolicy) -> Self {
        self.length_policy = policy;
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn block_len(&self) -> usize {
        self.block_len
    }

    pub fn length_policy(&self) -> LengthPolicy {
        self.length_policy
    }

    pub fn set_length_policy(&mut self, policy: LengthPolicy) {
        self.length_policy = policy;
    }

    pub fn status(&self) -> EngineStatus {
        match &self.active {
            Some(a) => EngineStatus::Active(a.state.kind()),
            None => EngineStatus::Inactive,
        }
    }

    pub fn active_effect(&self) -> Option<EffectKind> {
        self.active.as_ref().map(|a| a.state.kind())
    }

    pub fn active_params(&self) -> Option<&EffectParams> {
        self.active.as_ref().map(|a| &a.params)
    }

    /// Channel layout of the blocks `process` currently returns.
    pub fn output_arity(&self) -> Arity {
        self.active_effect().map_or(Arity::Mono, EffectKind::arity)
    }

    /// Length change introduced by the last processed block, before any
    /// fixed-block padding or truncation.
    pub fn last_length_delta(&self) -> isize {
        self.last_length_delta
    }

    /// Activate `kind` with its catalog defaults. A no-op if it is already active.
    pub fn select_effect(&mut self, kind: EffectKind) -> Result<()> {
        if self.active_effect() == Some(kind) {
            return Ok(());
        }
        self.select_params(kind.default_params())
    }

    /// Activate an effect by catalog name. Unknown names are rejected and
    /// leave the current effect untouched.
    pub fn select_effect_by_name(&mut self, name: &str) -> Result<()> {
        let kind = name.parse::<EffectKind>().inspect_err(|e| warn!("{e}"))?;
        self.select_effect(kind)
    }

    /// Activate an effect with explicit parameters.
    ///
    /// The state is rebuilt unless the same effect with identical parameters
    /// is already running. On error the previous effect stays active.
    pub fn select_params(&mut self, params: EffectParams) -> Result<()> {
        if self.active_params() == Some(&params) {
            return Ok(());
        }
        let state = EffectState::new(&params, self.sample_rate).inspect_err(|e| {
            warn!("rejected {} selection: {e}", params.kind());
        })?;
        info!(
            "effect {} -> {} at {} Hz",
            self.active_effect().map_or("none", EffectKind::label),
            params.kind(),
            self.sample_rate
        );
        self.active = Some(ActiveEffect { params, state });
        self.last_length_delta = 0;
        Ok(())
    }

    /// Deselect the current effect; subsequent blocks pass through.
    pub fn clear_effect(&mut self) {
        if let Some(a) = self.active.take() {
            info!("effect {} -> none", a.state.kind());
        }
        self.last_length_delta = 0;
    }

    /// Zero the active effect's memory without changing the selection.
    pub fn reset(&mut self) -> Result<()> {
        if let Some(a) = &mut self.active {
            a.state = EffectState::new(&a.params, self.sample_rate)?;
            debug!("reset {} state", a.state.kind());
        }
        self.last_length_delta = 0;
        Ok(())
    }

    /// Change the sample rate. Rate-dependent buffers are rebuilt, so the
    /// active effect restarts from zeroed state.
    pub fn set_sample_rate(&mut self, sample_rate: u32) -> Result<()> {
        if sample_rate == 0 {
            warn!("rejected zero sample rate");
            return Err(EngineError::InvalidSampleRate { rate: sample_rate });
        }
        if sample_rate == self.sample_rate {
            return Ok(());
        }
        if let Some(a) = &mut self.active {
            a.state = EffectState::new(&a.params, sample_rate)?;
        }
        debug!("sample rate {} -> {sample_rate} Hz", self.sample_rate);
        self.sample_rate = sample_rate;
        Ok(())
    }

    /// Process one block through the active effect.
    ///
    /// Mono effects return `EffectOutput::Mono`, spatializers return
    /// `EffectOutput::Stereo`. Pitch-shift effects change the length unless
    /// the engine uses `LengthPolicy::FixedBlock`.
    pub fn process(&mut self, block: &[Sample]) -> EffectOutput {
        let Some(active) = &mut self.active else {
            self.last_length_delta = 0;
            return EffectOutput::Mono(block.to_vec());
        };

        let mut out = active.state.process(block);
        self.last_length_delta = out.len() as isize - block.len() as isize;

        if self.length_policy == LengthPolicy::FixedBlock && self.last_length_delta != 0 {
            warn!(
                "{} returned {} samples for a {}-sample block; fitting",
                active.state.kind(),
                out.len(),
                block.len()
            );
            out.fit_to_length(block.len());
        }
        out
    }

    /// Feed `samples` through in `block_len` chunks, as a live loop would,
    /// and concatenate the results.
    pub fn process_stream(&mut self, samples: &[Sample]) -> EffectOutput {
        let mut out = match self.output_arity() {
            Arity::Mono => EffectOutput::Mono(Vec::with_capacity(samples.len())),
            Arity::Stereo => EffectOutput::Stereo(Vec::with_capacity(samples.len())),
        };
        for block in samples.chunks(self.block_len) {
            match (&mut out, self.process(block)) {
                (EffectOutput::Mono(acc), EffectOutput::Mono(b)) => acc.extend(b),
                (EffectOutput::Stereo(acc), EffectOutput::Stereo(b)) => acc.extend(b),
                // Arity is fixed while no selection happens between blocks.
                _ => unreachable!("output arity changed mid-stream"),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        AlternateParams, DrunkParams, EchoParams, FlangerParams, PingPongParams, PitchParams,
    };

    fn test_signal(len: usize) -> Vec<Sample> {
        (0..len)
            .map(|i| (((i * 7919) % 20001) as i32 - 10000) as Sample)
            .collect()
    }

    fn echo4() -> EffectParams {
        EffectParams::Echo(EchoParams {
            delay_samples: 4,
            decay: 0.5,
        })
    }

    #[test]
    fn inactive_engine_passes_through() {
        let mut engine = FilterEngine::new(16000).unwrap();
        assert_eq!(engine.status(), EngineStatus::Inactive);
        let input = test_signal(300);
        assert_eq!(engine.process(&input), EffectOutput::Mono(input));
    }

    #[test]
    fn zero_rate_rejected() {
        assert!(matches!(
            FilterEngine::new(0),
            Err(EngineError::InvalidSampleRate { rate: 0 })
        ));
        let mut engine = FilterEngine::new(8000).unwrap();
        assert!(engine.set_sample_rate(0).is_err());
        assert_eq!(engine.sample_rate(), 8000);
    }

    #[test]
    fn unknown_effect_rejected_and_previous_kept() {
        let mut engine = FilterEngine::new(8000).unwrap();
        engine.select_effect(EffectKind::Echo).unwrap();
        let err = engine.select_effect_by_name("Chipmunk").unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(engine.status(), EngineStatus::Active(EffectKind::Echo));
    }

    #[test]
    fn invalid_params_keep_previous_effect() {
        let mut engine = FilterEngine::new(8000).unwrap();
        engine.select_params(echo4()).unwrap();
        engine.process(&[100, 0, 0, 0]);
        let bad = EffectParams::AlternateChannels(AlternateParams {
            samples_per_alternation: 0,
        });
        assert!(engine.select_params(bad).is_err());
        // Echo memory is intact: the tail continues.
        assert_eq!(engine.process(&[0]).as_mono().unwrap(), &[50]);
    }

    #[test]
    fn unbounded_pitch_shift_rejected_at_selection() {
        let mut engine = FilterEngine::new(16000).unwrap();
        engine.select_effect(EffectKind::Male).unwrap();
        let err = engine
            .select_params(EffectParams::Male(PitchParams { semitones: -1200.0 }))
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(engine.active_params(), Some(&EffectKind::Male.default_params()));
        assert_eq!(engine.process(&[1; 16]).len(), 20);
    }

    #[test]
    fn oversized_delay_lines_rejected_at_selection() {
        let mut engine = FilterEngine::new(16000).unwrap();
        let huge = [
            EffectParams::Echo(EchoParams {
                delay_samples: usize::MAX,
                decay: 0.5,
            }),
            EffectParams::Drunk(DrunkParams { delay_seconds: 1e12 }),
            EffectParams::Flanger(FlangerParams {
                delay: 1e300,
                depth: 0.0,
                lfo_rate: 0.55,
            }),
            EffectParams::PingPong(PingPongParams {
                delay_seconds: f64::MAX,
            }),
        ];
        for params in huge {
            let err = engine.select_params(params).unwrap_err();
            assert!(err.is_configuration(), "{err}");
            assert_eq!(engine.status(), EngineStatus::Inactive);
        }
    }

    #[test]
    fn echo_scenario_through_engine() {
        let mut engine = FilterEngine::new(8000).unwrap();
        engine.select_params(echo4()).unwrap();
        let mut input = vec![0; 9];
        input[0] = 100;
        let out = engine.process(&input);
        assert_eq!(out.as_mono().unwrap(), &[100, 0, 0, 0, 50, 0, 0, 0, 25]);
    }

    #[test]
    fn reselecting_same_effect_keeps_memory() {
        let mut engine = FilterEngine::new(8000).unwrap();
        engine.select_params(echo4()).unwrap();
        engine.process(&[100, 0, 0, 0]);
        engine.select_params(echo4()).unwrap();
        assert_eq!(engine.process(&[0]).as_mono().unwrap(), &[50]);
    }

    #[test]
    fn switching_effects_resets_state() {
        let input = test_signal(4096);

        let mut fresh = FilterEngine::new(8000).unwrap();
        fresh.select_effect(EffectKind::Flanger).unwrap();
        let expected: Vec<EffectOutput> = input.chunks(1024).map(|b| fresh.process(b)).collect();

        let mut engine = FilterEngine::new(8000).unwrap();
        engine.select_effect(EffectKind::Flanger).unwrap();
        for block in input.chunks(1024).take(3) {
            engine.process(block);
        }
        engine.select_effect(EffectKind::Echo).unwrap();
        for block in input.chunks(1024).take(2) {
            engine.process(block);
        }
        engine.select_effect(EffectKind::Flanger).unwrap();
        let got: Vec<EffectOutput> = input.chunks(1024).map(|b| engine.process(b)).collect();

        assert_eq!(got, expected);
    }

    #[test]
    fn switching_resets_every_stateful_effect() {
        let input = test_signal(2048);
        for kind in EffectKind::ALL {
            let other = if kind == EffectKind::Echo {
                EffectKind::Alien
            } else {
                EffectKind::Echo
            };
            let mut fresh = FilterEngine::new(8000).unwrap();
            fresh.select_effect(kind).unwrap();
            let expected = fresh.process(&input);

            let mut engine = FilterEngine::new(8000).unwrap();
            engine.select_effect(kind).unwrap();
            engine.process(&input);
            engine.select_effect(other).unwrap();
            engine.process(&input);
            engine.select_effect(kind).unwrap();
            assert_eq!(engine.process(&input), expected, "{kind} leaked state");
        }
    }

    #[test]
    fn silence_after_switch_is_silent() {
        let mut engine = FilterEngine::new(8000).unwrap();
        engine.select_effect(EffectKind::Echo).unwrap();
        engine.process(&test_signal(1024));
        engine.select_effect(EffectKind::PingPong).unwrap();
        assert!(engine.process(&[0; 1024]).is_silent());
    }

    #[test]
    fn memory_makes_sound_from_silence() {
        // Non-silent history is the one way silence can produce output.
        let mut engine = FilterEngine::new(8000).unwrap();
        engine.select_params(echo4()).unwrap();
        engine.process(&[1000]);
        assert!(!engine.process(&[0; 8]).is_silent());
    }

    #[test]
    fn reset_matches_fresh_start() {
        let input = test_signal(1500);
        let mut engine = FilterEngine::new(8000).unwrap();
        engine.select_effect(EffectKind::Mutation).unwrap();
        let first = engine.process(&input);
        engine.reset().unwrap();
        assert_eq!(engine.process(&input), first);
    }

    #[test]
    fn variable_policy_reports_length_change() {
        let mut engine = FilterEngine::new(16000).unwrap();
        engine.select_effect(EffectKind::Baby).unwrap();
        let out = engine.process(&[0; 1024]);
        assert!(out.len() < 1024);
        assert_eq!(engine.last_length_delta(), out.len() as isize - 1024);
    }

    #[test]
    fn fixed_block_policy_restores_length() {
        let mut engine = FilterEngine::new(16000)
            .unwrap()
            .with_length_policy(LengthPolicy::FixedBlock);
        for kind in [EffectKind::Male, EffectKind::Baby, EffectKind::Robotic] {
            engine.select_effect(kind).unwrap();
            let out = engine.process(&test_signal(1024));
            assert_eq!(out.len(), 1024);
            assert_ne!(engine.last_length_delta(), 0);
        }
    }

    #[test]
    fn stereo_effects_report_stereo_arity() {
        let mut engine = FilterEngine::new(8000).unwrap();
        assert_eq!(engine.output_arity(), Arity::Mono);
        engine.select_effect(EffectKind::AlternateChannels).unwrap();
        assert_eq!(engine.output_arity(), Arity::Stereo);
        assert_eq!(engine.process(&[1; 16]).channels(), 2);
    }

    #[test]
    fn clear_effect_returns_to_passthrough() {
        let mut engine = FilterEngine::new(8000).unwrap();
        engine.select_effect(EffectKind::Alien).unwrap();
        engine.clear_effect();
        assert_eq!(engine.status(), EngineStatus::Inactive);
        assert_eq!(engine.process(&[3, 4]), EffectOutput::Mono(vec![3, 4]));
    }

    #[test]
    fn sample_rate_change_rebuilds_state() {
        let mut engine = FilterEngine::new(8000).unwrap();
        engine.select_effect(EffectKind::PingPong).unwrap();
        engine.process(&test_signal(500));
        engine.set_sample_rate(1000).unwrap();

        let mut fresh = FilterEngine::new(1000).unwrap();
        fresh.select_effect(EffectKind::PingPong).unwrap();
        let input = test_signal(1200);
        assert_eq!(engine.process(&input), fresh.process(&input));
    }

    #[test]
    fn stream_matches_single_call_for_delay_effects() {
        let input = test_signal(5000);
        for kind in [
            EffectKind::Echo,
            EffectKind::Flanger,
            EffectKind::PingPong,
            EffectKind::Mutation,
            EffectKind::Drunk,
        ] {
            let mut whole = FilterEngine::new(8000).unwrap();
            whole.select_effect(kind).unwrap();
            let mut streamed = whole.clone();
            assert_eq!(streamed.process_stream(&input), whole.process(&input), "{kind}");
        }
    }

    #[test]
    fn from_config_activates_effect() {
        let config = EngineConfig::from_json(
            r#"{"sampleRate": 8000, "blockLen": 256, "effect": "alternate channels"}"#,
        )
        .unwrap();
        let engine = FilterEngine::from_config(&config).unwrap();
        assert_eq!(engine.block_len(), 256);
        assert_eq!(engine.status(), EngineStatus::Active(EffectKind::AlternateChannels));
    }
}
