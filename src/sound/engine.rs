//! Sound engine — lazy audio graph, mute control and best-effort playback.
//!
//! Audio is a cosmetic enhancement, so nothing here fails loudly: a
//! missing audio output or a failed tone is logged and playback becomes a
//! no-op. The graph is only built on `initialize`, which the host calls
//! after the first user interaction.

use std::collections::HashMap;

use tracing::{debug, error, info};

use crate::config::SoundConfig;

use super::context::{AudioContext, ContextFactory, SynthContext};
use super::recipe::ToneRecipe;
use super::SoundEffect;

/// State that exists only while the graph is initialized.
struct AudioGraph {
    context: Box<dyn AudioContext>,
    recipes: HashMap<SoundEffect, ToneRecipe>,
}

pub struct SoundEngine {
    config: SoundConfig,
    factory: ContextFactory,
    graph: Option<AudioGraph>,
    muted: bool,
}

impl SoundEngine {
    pub fn new(config: SoundConfig, factory: ContextFactory) -> Self {
        SoundEngine {
            config,
            factory,
            graph: None,
            muted: false,
        }
    }

    /// An engine backed by `synth`; the caller keeps its own clone of the
    /// context to pull samples from.
    pub fn with_synth(config: SoundConfig, synth: &SynthContext) -> Self {
        SoundEngine::new(config, synth.factory())
    }

    /// Build the audio graph. Does nothing if it already exists; logs and
    /// stays uninitialized if the platform has no audio.
    pub fn initialize(&mut self) {
        if self.graph.is_some() {
            return;
        }

        let mut context = match (self.factory)() {
            Ok(context) => context,
            Err(e) => {
                error!("sound engine initialization failed: {e}");
                return;
            }
        };

        let now = context.current_time();
        context.set_master_gain(self.target_gain(), now);

        let recipes = SoundEffect::ALL
            .into_iter()
            .map(|effect| (effect, effect.recipe()))
            .collect();

        self.graph = Some(AudioGraph { context, recipes });
        info!(volume = self.config.volume, muted = self.muted, "sound engine initialized");
    }

    /// Play an effect. Silent when uninitialized or muted; synthesis
    /// errors are logged, never returned.
    pub fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        let Some(graph) = self.graph.as_mut() else {
            debug!(%effect, "sound engine not initialized, dropping playback");
            return;
        };
        let Some(recipe) = graph.recipes.get(&effect) else {
            return;
        };
        if let Err(e) = graph.context.start_tone(recipe) {
            error!("error playing sound '{effect}': {e}");
        }
    }

    /// Play an effect by name; unknown names are ignored.
    pub fn play_named(&mut self, name: &str) {
        match name.parse::<SoundEffect>() {
            Ok(effect) => self.play(effect),
            Err(e) => debug!("{e}"),
        }
    }

    /// Flip the mute flag and return the new state. The master gain is
    /// rescheduled at the current audio time so the change does not pop.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        let gain = self.target_gain();
        if let Some(graph) = self.graph.as_mut() {
            let now = graph.context.current_time();
            graph.context.set_master_gain(gain, now);
        }
        debug!(muted = self.muted, "mute toggled");
        self.muted
    }

    /// Close the audio context and forget the graph. The mute preference
    /// survives, as does the ability to initialize again.
    pub fn teardown(&mut self) {
        if let Some(mut graph) = self.graph.take() {
            graph.context.close();
            info!("sound engine torn down");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.graph.is_some()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume(&self) -> f64 {
        self.config.volume
    }

    /// The recipe in use for an effect, once initialized.
    pub fn recipe(&self, effect: SoundEffect) -> Option<&ToneRecipe> {
        self.graph.as_ref()?.recipes.get(&effect)
    }

    fn target_gain(&self) -> f64 {
        if self.muted { 0.0 } else { self.config.volume }
    }
}
