//! DSP engine — pure Rust effect processing on 16-bit PCM.
//!
//! The same code serves the live path (fixed-length microphone blocks via
//! `FilterEngine::process`) and the offline converter (a whole recording
//! in one call), natively or through the WASM bindings.

pub mod delay;
pub mod engine;
pub mod modulation;
pub mod oscillator;
pub mod pitch;
pub mod renderer;
pub mod resampler;
pub mod ring_buffer;
pub mod sample;
pub mod spatial;
pub mod state;
pub mod vibrato;
