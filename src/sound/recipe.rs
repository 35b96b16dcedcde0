//! Synthesis recipes: each effect is plain data interpreted by `dsp::tone`.

use serde::{Deserialize, Serialize};

use crate::dsp::filter::FilterType;
use crate::dsp::oscillator::Waveform;
use crate::dsp::param::Keyframe;

use super::SoundEffect;

/// One oscillator and its frequency automation (Hz, seconds from tone start).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillatorSpec {
    pub waveform: Waveform,
    pub frequency: Vec<Keyframe>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub kind: FilterType,
    pub cutoff: f64,
}

/// Oscillators -> optional filter -> gain envelope -> master bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneRecipe {
    pub oscillators: Vec<OscillatorSpec>,
    pub gain: Vec<Keyframe>,
    pub filter: Option<FilterSpec>,
    /// Seconds until the oscillators stop.
    pub duration: f64,
}

impl ToneRecipe {
    /// Largest gain value any keyframe reaches.
    pub fn peak_gain(&self) -> f64 {
        self.gain.iter().map(|k| k.value).fold(0.0, f64::max)
    }
}

impl SoundEffect {
    /// The recipe for this effect. `Open` and `Close` reuse the click.
    pub fn recipe(self) -> ToneRecipe {
        match self {
            SoundEffect::Boot => boot(),
            SoundEffect::Click | SoundEffect::Open | SoundEffect::Close => click(),
            SoundEffect::Hover => hover(),
            SoundEffect::Transition => transition(),
        }
    }
}

/// Two rising sweeps, a soft sine under a brighter sawtooth an octave up.
fn boot() -> ToneRecipe {
    ToneRecipe {
        oscillators: vec![
            OscillatorSpec {
                waveform: Waveform::Sine,
                frequency: vec![Keyframe::set(100.0, 0.0), Keyframe::exponential(400.0, 0.2)],
            },
            OscillatorSpec {
                waveform: Waveform::Sawtooth,
                frequency: vec![Keyframe::set(200.0, 0.0), Keyframe::exponential(800.0, 0.2)],
            },
        ],
        gain: vec![
            Keyframe::set(0.0, 0.0),
            Keyframe::linear(0.2, 0.05),
            Keyframe::exponential(0.01, 0.5),
        ],
        filter: None,
        duration: 0.5,
    }
}

fn click() -> ToneRecipe {
    ToneRecipe {
        oscillators: vec![OscillatorSpec {
            waveform: Waveform::Triangle,
            frequency: vec![Keyframe::set(800.0, 0.0), Keyframe::exponential(400.0, 0.05)],
        }],
        gain: vec![Keyframe::set(0.3, 0.0), Keyframe::exponential(0.01, 0.1)],
        filter: None,
        duration: 0.1,
    }
}

fn hover() -> ToneRecipe {
    ToneRecipe {
        oscillators: vec![OscillatorSpec {
            waveform: Waveform::Sine,
            frequency: vec![Keyframe::set(1200.0, 0.0)],
        }],
        gain: vec![
            Keyframe::set(0.0, 0.0),
            Keyframe::linear(0.05, 0.01),
            Keyframe::linear(0.0, 0.05),
        ],
        filter: None,
        duration: 0.05,
    }
}

/// Low sawtooth swoosh, darkened by a lowpass.
fn transition() -> ToneRecipe {
    ToneRecipe {
        oscillators: vec![OscillatorSpec {
            waveform: Waveform::Sawtooth,
            frequency: vec![Keyframe::set(100.0, 0.0), Keyframe::exponential(300.0, 0.2)],
        }],
        gain: vec![Keyframe::set(0.15, 0.0), Keyframe::exponential(0.01, 0.3)],
        filter: Some(FilterSpec {
            kind: FilterType::Lowpass,
            cutoff: 1000.0,
        }),
        duration: 0.3,
    }
}
