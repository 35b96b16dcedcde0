//! Audio context seam and the software synth behind it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dsp::mixer::Mixer;
use crate::dsp::tone::Tone;
use crate::error::AudioError;

use super::recipe::ToneRecipe;

/// The platform audio graph the sound engine schedules against: a clock,
/// a master gain, and fire-and-forget tone playback.
pub trait AudioContext {
    /// Seconds on the audio clock.
    fn current_time(&self) -> f64;

    /// Schedule the master gain to jump to `value` at `time`.
    fn set_master_gain(&mut self, value: f64, time: f64);

    /// Start one tone now. It stops by itself after the recipe's duration.
    fn start_tone(&mut self, recipe: &ToneRecipe) -> Result<(), AudioError>;

    /// Release the output. Later `start_tone` calls fail.
    fn close(&mut self);
}

/// Builds the audio context on first use. Called once per successful
/// initialization; an error means the platform has no audio.
pub type ContextFactory = Box<dyn FnMut() -> Result<Box<dyn AudioContext>, AudioError>>;

struct SynthCore {
    sample_rate: f64,
    frame: u64,
    mixer: Mixer,
    tones: Vec<Tone>,
    closed: bool,
}

/// Software audio context. Clones share one mixing bus: the sound engine
/// holds one handle and the output side (an AudioWorklet, a WAV writer)
/// pulls samples through another, which advances the clock.
#[derive(Clone)]
pub struct SynthContext {
    core: Rc<RefCell<SynthCore>>,
}

impl SynthContext {
    pub fn new(sample_rate: f64) -> Self {
        SynthContext {
            core: Rc::new(RefCell::new(SynthCore {
                sample_rate,
                frame: 0,
                mixer: Mixer::new(1.0),
                tones: Vec::new(),
                closed: false,
            })),
        }
    }

    /// A factory handing out clones of this context. Each call reopens the
    /// bus if an earlier handle closed it, so a torn-down engine can
    /// initialize again.
    pub fn factory(&self) -> ContextFactory {
        let context = self.clone();
        Box::new(move || {
            context.reopen();
            Ok(Box::new(context.clone()) as Box<dyn AudioContext>)
        })
    }

    /// Clear a closed bus: no tones, fresh master automation. The clock
    /// keeps running.
    fn reopen(&self) {
        let mut core = self.core.borrow_mut();
        if core.closed {
            core.closed = false;
            core.tones.clear();
            core.mixer = Mixer::new(1.0);
        }
    }

    /// Mix the next `frames` samples of mono output. Silence once closed.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut core = self.core.borrow_mut();
        if core.closed {
            return vec![0.0; frames];
        }
        let start = core.frame as f64 / core.sample_rate;
        let sample_rate = core.sample_rate;
        let SynthCore { mixer, tones, .. } = &mut *core;
        let out = mixer.mix(tones, frames, start, sample_rate);
        core.frame += frames as u64;
        out
    }

    pub fn sample_rate(&self) -> f64 {
        self.core.borrow().sample_rate
    }

    /// Tones still sounding.
    pub fn active_tones(&self) -> usize {
        self.core.borrow().tones.len()
    }

    /// Master gain in effect at the current clock time.
    pub fn master_gain(&self) -> f64 {
        let core = self.core.borrow();
        core.mixer.master.value_at(core.frame as f64 / core.sample_rate)
    }

    pub fn is_closed(&self) -> bool {
        self.core.borrow().closed
    }
}

impl AudioContext for SynthContext {
    fn current_time(&self) -> f64 {
        let core = self.core.borrow();
        core.frame as f64 / core.sample_rate
    }

    fn set_master_gain(&mut self, value: f64, time: f64) {
        self.core.borrow_mut().mixer.master.set_value_at_time(value, time);
    }

    fn start_tone(&mut self, recipe: &ToneRecipe) -> Result<(), AudioError> {
        let mut core = self.core.borrow_mut();
        if core.closed {
            return Err(AudioError::Synthesis("audio context is closed".to_string()));
        }
        let tone = Tone::new(recipe, core.sample_rate).map_err(AudioError::Synthesis)?;
        core.tones.push(tone);
        Ok(())
    }

    fn close(&mut self) {
        let mut core = self.core.borrow_mut();
        core.closed = true;
        core.tones.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::SoundEffect;

    #[test]
    fn clock_advances_with_render() {
        let ctx = SynthContext::new(1000.0);
        assert_eq!(ctx.current_time(), 0.0);
        ctx.render(500);
        assert!((ctx.current_time() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn tones_play_then_expire() {
        let mut ctx = SynthContext::new(44100.0);
        ctx.set_master_gain(0.2, 0.0);
        ctx.start_tone(&SoundEffect::Click.recipe()).unwrap();
        assert_eq!(ctx.active_tones(), 1);

        let out = ctx.render(2048);
        assert!(out.iter().any(|&s| s != 0.0));
        ctx.render(4096);
        assert_eq!(ctx.active_tones(), 0);
    }

    #[test]
    fn master_gain_change_lands_at_its_time() {
        let mut ctx = SynthContext::new(1000.0);
        ctx.set_master_gain(0.2, 0.0);
        ctx.set_master_gain(0.0, 0.1);
        assert_eq!(ctx.master_gain(), 0.2);
        ctx.render(100);
        assert_eq!(ctx.master_gain(), 0.0);
    }

    #[test]
    fn closed_context_rejects_tones() {
        let mut ctx = SynthContext::new(44100.0);
        ctx.start_tone(&SoundEffect::Hover.recipe()).unwrap();
        ctx.close();
        assert!(ctx.is_closed());
        assert_eq!(ctx.active_tones(), 0);
        assert!(matches!(
            ctx.start_tone(&SoundEffect::Hover.recipe()),
            Err(AudioError::Synthesis(_))
        ));
        assert!(ctx.render(64).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn factory_shares_the_bus() {
        let ctx = SynthContext::new(44100.0);
        let mut factory = ctx.factory();
        let mut handle = factory().unwrap();
        handle.start_tone(&SoundEffect::Boot.recipe()).unwrap();
        assert_eq!(ctx.active_tones(), 1);
    }

    #[test]
    fn factory_reopens_a_closed_bus() {
        let ctx = SynthContext::new(1000.0);
        let mut factory = ctx.factory();
        let mut first = factory().unwrap();
        first.set_master_gain(0.0, 0.0);
        first.close();
        ctx.render(100);
        assert!(ctx.is_closed());

        let mut second = factory().unwrap();
        assert!(!ctx.is_closed());
        assert_eq!(ctx.master_gain(), 1.0);
        second.start_tone(&SoundEffect::Click.recipe()).unwrap();
        assert_eq!(ctx.active_tones(), 1);
    }
}
