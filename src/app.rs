//! Page-level wiring: one sound engine shared by the boot sequence and the
//! UI, with audio unlocked by the first click anywhere on the page.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::boot::{BootEngine, BootSurfaces};
use crate::config::{BootConfig, SoundConfig};
use crate::error::BootError;
use crate::sound::{ContextFactory, SoundEffect, SoundEngine, SynthContext};

pub struct PortfolioApp {
    sound: Rc<RefCell<SoundEngine>>,
    unlocked: bool,
}

impl PortfolioApp {
    pub fn new(config: SoundConfig, factory: ContextFactory) -> Self {
        PortfolioApp {
            sound: Rc::new(RefCell::new(SoundEngine::new(config, factory))),
            unlocked: false,
        }
    }

    pub fn with_synth(config: SoundConfig, synth: &SynthContext) -> Self {
        PortfolioApp::new(config, synth.factory())
    }

    /// A boot engine for this page that chimes through the shared engine.
    pub fn boot(
        &self,
        surfaces: BootSurfaces,
        viewport_width: u32,
        config: BootConfig,
    ) -> Result<BootEngine, BootError> {
        Ok(BootEngine::new(surfaces, viewport_width, config)?.with_sound(self.sound.clone()))
    }

    /// Browsers only allow audio after a gesture, so the graph is built on
    /// the first document click. Later clicks do nothing here.
    pub fn on_document_click(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;
        debug!("first interaction, unlocking audio");
        self.sound.borrow_mut().initialize();
    }

    pub fn toggle_mute(&self) -> bool {
        self.sound.borrow_mut().toggle_mute()
    }

    pub fn play(&self, effect: SoundEffect) {
        self.sound.borrow_mut().play(effect);
    }

    /// Page unload.
    pub fn shutdown(&self) {
        self.sound.borrow_mut().teardown();
    }

    pub fn sound(&self) -> Rc<RefCell<SoundEngine>> {
        self.sound.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::Step;
    use crate::boot::mock::{MockCursor, MockScreen, MockSkip, MockWelcome};
    use crate::error::AudioError;
    use crate::sound::AudioContext;

    fn surfaces() -> BootSurfaces {
        BootSurfaces::new()
            .lines(MockScreen::default())
            .cursor(MockCursor::default())
            .skip(MockSkip::default())
            .welcome(MockWelcome::default())
    }

    #[test]
    fn audio_unlocks_on_first_click_only() {
        let synth = SynthContext::new(44100.0);
        let mut app = PortfolioApp::with_synth(SoundConfig::default(), &synth);
        app.play(SoundEffect::Click);
        assert_eq!(synth.active_tones(), 0);

        app.on_document_click();
        assert!(app.sound().borrow().is_initialized());
        app.play(SoundEffect::Click);
        assert_eq!(synth.active_tones(), 1);

        app.on_document_click();
        assert!(app.sound().borrow().is_initialized());
    }

    #[test]
    fn mute_and_shutdown() {
        let synth = SynthContext::new(44100.0);
        let mut app = PortfolioApp::with_synth(SoundConfig::default(), &synth);
        app.on_document_click();

        assert!(app.toggle_mute());
        app.play(SoundEffect::Hover);
        assert_eq!(synth.active_tones(), 0);
        assert!(!app.toggle_mute());

        app.shutdown();
        assert!(synth.is_closed());
        assert!(!app.sound().borrow().is_initialized());
    }

    #[test]
    fn unavailable_audio_does_not_block_boot() {
        let factory: ContextFactory = Box::new(|| -> Result<Box<dyn AudioContext>, AudioError> {
            Err(AudioError::Unavailable("no audio output".into()))
        });
        let mut app = PortfolioApp::new(SoundConfig::default(), factory);
        app.on_document_click();
        assert!(!app.sound().borrow().is_initialized());

        let mut engine = app.boot(surfaces(), 320, BootConfig::instant()).unwrap();
        let done = (0..10_000).any(|_| matches!(engine.advance(), Step::Done(_)));
        assert!(done);
    }

    #[test]
    fn boot_engine_shares_the_page_sound() {
        let synth = SynthContext::new(44100.0);
        let mut app = PortfolioApp::with_synth(SoundConfig::default(), &synth);
        app.on_document_click();

        let mut engine = app.boot(surfaces(), 1024, BootConfig::instant()).unwrap();
        while !matches!(engine.advance(), Step::Done(_)) {}
        assert_eq!(synth.active_tones(), 1);
    }

    #[test]
    fn boot_reports_missing_surfaces() {
        let synth = SynthContext::new(44100.0);
        let app = PortfolioApp::with_synth(SoundConfig::default(), &synth);
        let result = app.boot(BootSurfaces::new(), 1024, BootConfig::default());
        assert!(matches!(result, Err(BootError::MissingSurface(_))));
    }
}
