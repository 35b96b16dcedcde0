//! Procedural sound effects: every cue is synthesized, no audio assets.

pub mod context;
pub mod engine;
pub mod recipe;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AudioError;

pub use context::{AudioContext, ContextFactory, SynthContext};
pub use engine::SoundEngine;
pub use recipe::ToneRecipe;

/// The fixed palette of UI sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundEffect {
    Boot,
    Click,
    Hover,
    Transition,
    Open,
    Close,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 6] = [
        SoundEffect::Boot,
        SoundEffect::Click,
        SoundEffect::Hover,
        SoundEffect::Transition,
        SoundEffect::Open,
        SoundEffect::Close,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::Boot => "boot",
            SoundEffect::Click => "click",
            SoundEffect::Hover => "hover",
            SoundEffect::Transition => "transition",
            SoundEffect::Open => "open",
            SoundEffect::Close => "close",
        }
    }
}

impl fmt::Display for SoundEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SoundEffect {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundEffect::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| AudioError::UnknownEffect(s.to_string()))
    }
}
