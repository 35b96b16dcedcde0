//! Tone — one fire-and-forget voice rendered from a `ToneRecipe`.

use crate::sound::recipe::ToneRecipe;

use super::filter::BiquadFilter;
use super::oscillator::Oscillator;
use super::param::Param;

/// Oscillators summed into an optional filter and shaped by a gain
/// automation. Times are local: zero is the moment the tone starts.
#[derive(Debug, Clone)]
pub struct Tone {
    oscillators: Vec<(Oscillator, Param)>,
    filter: Option<BiquadFilter>,
    gain: Param,
    sample_rate: f64,
    frame: usize,
    stop_frame: usize,
}

impl Tone {
    /// Instantiate a recipe. Fails if any automation is invalid.
    pub fn new(recipe: &ToneRecipe, sample_rate: f64) -> Result<Self, String> {
        if recipe.oscillators.is_empty() {
            return Err("recipe has no oscillators".to_string());
        }
        if !(recipe.duration > 0.0) {
            return Err(format!("invalid tone duration {}", recipe.duration));
        }

        let oscillators = recipe
            .oscillators
            .iter()
            .map(|spec| {
                let param = Param::from_keyframes(440.0, &spec.frequency)?;
                Ok((Oscillator::new(spec.waveform, sample_rate), param))
            })
            .collect::<Result<Vec<_>, String>>()?;

        let filter = recipe
            .filter
            .map(|spec| BiquadFilter::new(spec.kind, spec.cutoff, sample_rate));

        Ok(Tone {
            oscillators,
            filter,
            gain: Param::from_keyframes(1.0, &recipe.gain)?,
            sample_rate,
            frame: 0,
            stop_frame: (recipe.duration * sample_rate).round() as usize,
        })
    }

    pub fn next_sample(&mut self) -> f64 {
        if self.is_finished() {
            return 0.0;
        }
        let t = self.frame as f64 / self.sample_rate;

        let mut sum = 0.0;
        for (osc, freq) in self.oscillators.iter_mut() {
            osc.set_frequency(freq.value_at(t));
            sum += osc.next_sample();
        }
        if let Some(filter) = self.filter.as_mut() {
            sum = filter.process(sum);
        }

        self.frame += 1;
        sum * self.gain.value_at(t)
    }

    /// True once the scheduled stop time has passed.
    pub fn is_finished(&self) -> bool {
        self.frame >= self.stop_frame
    }

    pub fn len_frames(&self) -> usize {
        self.stop_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::param::Keyframe;
    use crate::sound::recipe::{OscillatorSpec, ToneRecipe};
    use crate::sound::SoundEffect;
    use crate::dsp::oscillator::Waveform;

    fn render(tone: &mut Tone) -> Vec<f64> {
        let mut out = Vec::new();
        while !tone.is_finished() {
            out.push(tone.next_sample());
        }
        out
    }

    #[test]
    fn click_stops_after_duration() {
        let mut tone = Tone::new(&SoundEffect::Click.recipe(), 44100.0).unwrap();
        let samples = render(&mut tone);
        assert_eq!(samples.len(), 4410);
        assert_eq!(tone.next_sample(), 0.0);
    }

    #[test]
    fn click_decays() {
        let mut tone = Tone::new(&SoundEffect::Click.recipe(), 44100.0).unwrap();
        let samples = render(&mut tone);
        let head = samples[..441].iter().fold(0.0_f64, |m, s| m.max(s.abs()));
        let tail = samples[samples.len() - 441..].iter().fold(0.0_f64, |m, s| m.max(s.abs()));
        assert!(head > 0.2, "click attack too quiet: {head}");
        assert!(tail < head / 5.0, "click should decay: head {head}, tail {tail}");
    }

    #[test]
    fn hover_is_quiet() {
        let mut tone = Tone::new(&SoundEffect::Hover.recipe(), 44100.0).unwrap();
        let peak = render(&mut tone).iter().fold(0.0_f64, |m, s| m.max(s.abs()));
        assert!(peak > 0.0 && peak <= 0.05 + 1e-9, "hover peak {peak}");
    }

    #[test]
    fn every_recipe_instantiates() {
        for effect in SoundEffect::ALL {
            assert!(Tone::new(&effect.recipe(), 48000.0).is_ok(), "{effect:?}");
        }
    }

    #[test]
    fn rejects_recipe_without_oscillators() {
        let recipe = ToneRecipe {
            oscillators: vec![],
            gain: vec![Keyframe::set(0.3, 0.0)],
            filter: None,
            duration: 0.1,
        };
        assert!(Tone::new(&recipe, 44100.0).is_err());
    }

    #[test]
    fn rejects_exponential_ramp_to_zero() {
        let recipe = ToneRecipe {
            oscillators: vec![OscillatorSpec {
                waveform: Waveform::Sine,
                frequency: vec![Keyframe::set(440.0, 0.0)],
            }],
            gain: vec![Keyframe::set(0.3, 0.0), Keyframe::exponential(0.0, 0.1)],
            filter: None,
            duration: 0.1,
        };
        assert!(Tone::new(&recipe, 44100.0).is_err());
    }
}
