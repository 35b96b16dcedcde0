pub mod app;
pub mod boot;
pub mod config;
pub mod dsp;
pub mod error;
pub mod sound;

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::boot::web::{BootHost, host_surfaces};
use crate::boot::{BootEngine, BootScript, Decrypt, TimedBoot};
use crate::config::{BootConfig, SoundConfig};
use crate::sound::{SoundEffect, SoundEngine, SynthContext};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the termfolio-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

/// A config object from JS; undefined or null means defaults.
fn config_from_js<T: DeserializeOwned + Default>(config: JsValue) -> Result<T, JsValue> {
    if config.is_undefined() || config.is_null() {
        Ok(T::default())
    } else {
        serde_wasm_bindgen::from_value(config).map_err(js_err)
    }
}

/// WASM-exposed: the boot script chosen for a viewport width, as a JS object.
#[wasm_bindgen]
pub fn boot_script(viewport_width: u32) -> Result<JsValue, JsValue> {
    let script = BootScript::for_viewport(viewport_width, &BootConfig::default());
    serde_wasm_bindgen::to_value(&script).map_err(js_err)
}

/// WASM-exposed: render a named effect to a WAV byte array.
#[wasm_bindgen]
pub fn render_effect_wav(name: &str, sample_rate: u32) -> Result<Vec<u8>, JsValue> {
    let effect: SoundEffect = name.parse().map_err(js_err)?;
    dsp::renderer::render_effect_wav(effect, sample_rate).map_err(js_err)
}

/// WASM-exposed: render a named effect to mono f32 samples.
/// Returns the raw audio buffer for AudioWorklet playback.
#[wasm_bindgen]
pub fn render_effect_samples(name: &str, sample_rate: u32) -> Result<Vec<f32>, JsValue> {
    let effect: SoundEffect = name.parse().map_err(js_err)?;
    dsp::renderer::render_effect(effect, sample_rate).map_err(js_err)
}

/// WASM-exposed sound engine backed by the software synth. The page pulls
/// output through `render` from its AudioWorklet.
#[wasm_bindgen]
pub struct WebSoundEngine {
    engine: Rc<RefCell<SoundEngine>>,
    synth: SynthContext,
}

#[wasm_bindgen]
impl WebSoundEngine {
    /// `config` is a `SoundConfig`-shaped object, or undefined for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WebSoundEngine, JsValue> {
        let config: SoundConfig = config_from_js(config)?;
        config.validate().map_err(js_err)?;

        let synth = SynthContext::new(config.sample_rate as f64);
        Ok(WebSoundEngine {
            engine: Rc::new(RefCell::new(SoundEngine::with_synth(config, &synth))),
            synth,
        })
    }

    pub fn initialize(&self) {
        self.engine.borrow_mut().initialize();
    }

    /// Unknown names are ignored.
    pub fn play(&self, name: &str) {
        self.engine.borrow_mut().play_named(name);
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) -> bool {
        self.engine.borrow_mut().toggle_mute()
    }

    #[wasm_bindgen(js_name = isMuted)]
    pub fn is_muted(&self) -> bool {
        self.engine.borrow().is_muted()
    }

    pub fn teardown(&self) {
        self.engine.borrow_mut().teardown();
    }

    /// Mix the next `frames` output samples.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        self.synth.render(frames)
    }

    #[wasm_bindgen(getter, js_name = sampleRate)]
    pub fn sample_rate(&self) -> f64 {
        self.synth.sample_rate()
    }
}

/// WASM-exposed boot sequence driven by the page's timers. The page calls
/// `advance`, waits the returned milliseconds and calls it again; once it
/// returns `undefined` the page calls `tickReveal` every animation frame
/// until that returns `false`.
#[wasm_bindgen]
pub struct WebBootEngine {
    boot: TimedBoot,
}

#[wasm_bindgen]
impl WebBootEngine {
    /// `config` is a `BootConfig`-shaped object, or undefined for defaults.
    /// The boot chime plays through `sound`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        host: BootHost,
        viewport_width: u32,
        config: JsValue,
        sound: &WebSoundEngine,
    ) -> Result<WebBootEngine, JsValue> {
        let config: BootConfig = config_from_js(config)?;
        let engine = BootEngine::new(host_surfaces(&host), viewport_width, config)
            .map_err(js_err)?
            .with_sound(sound.engine.clone());
        Ok(WebBootEngine {
            boot: TimedBoot::new(engine),
        })
    }

    /// Milliseconds until the next call, or `undefined` once the boot log
    /// is gone and the reveal has started.
    pub fn advance(&mut self) -> Option<f64> {
        self.boot.advance().map(|wait| wait.as_secs_f64() * 1000.0)
    }

    /// Wire to the skip control. Returns `false` if already skipping. The
    /// page should call `advance` right away rather than finish its wait.
    pub fn skip(&self) -> bool {
        self.boot.skip()
    }

    #[wasm_bindgen(js_name = tickReveal)]
    pub fn tick_reveal(&mut self) -> bool {
        self.boot.tick_reveal()
    }
}

/// WASM-exposed decrypt animation for one element. Call `tick` once per
/// animation frame and write the result into the element.
#[wasm_bindgen]
pub struct DecryptText {
    decrypt: Decrypt,
    rng: SmallRng,
}

#[wasm_bindgen]
impl DecryptText {
    #[wasm_bindgen(constructor)]
    pub fn new(original: &str, seed: u64) -> DecryptText {
        DecryptText {
            decrypt: Decrypt::new(original),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The fully scrambled starting text.
    pub fn scrambled(&mut self) -> String {
        self.decrypt.frame(&mut self.rng)
    }

    /// Next frame's text, or `undefined` once the original is showing.
    pub fn tick(&mut self) -> Option<String> {
        self.decrypt.tick(&mut self.rng)
    }

    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.decrypt.is_finished()
    }
}
