//! DSP — pure Rust synthesis for the procedural sound effects.
//!
//! The same code renders tones for the browser (pulled into an
//! AudioWorklet through the WASM bindings) and for offline WAV export.

pub mod filter;
pub mod mixer;
pub mod oscillator;
pub mod param;
pub mod renderer;
pub mod tone;
