//! Boot engine — the typewriter boot log as an explicit state machine.
//!
//! `advance()` performs the next action and says how long to wait before
//! calling it again. `run()` drives that loop with a host timer and is the
//! equivalent of awaiting the boot sequence: it resolves once the log has
//! faded out and the decrypt reveal has started.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use futures::future::{self, Either};
use tracing::{debug, info, warn};

use crate::config::BootConfig;
use crate::error::BootError;
use crate::sound::{SoundEffect, SoundEngine};

use super::decrypt::DecryptReveal;
use super::script::BootScript;
use super::surface::{
    BootSurfaces, Cursor, DecryptTarget, LineContainer, SkipControl, TextMeasure, TextTarget,
    WelcomeSurface,
};

/// Label shown on the skip control once a skip is under way.
pub const SKIPPING_LABEL: &str = "[ SALTANDO... ]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Idle,
    /// `typed` glyphs of `line` are on screen.
    Typing { line: usize, typed: usize },
    /// `line` is complete; waiting out its delay.
    LineDelay { line: usize },
    /// Skip acknowledged; short pause before fading.
    Skipping,
    /// Every line typed; pause before fading.
    Settling,
    FadingOut,
    Revealing,
    Done,
}

/// What the driver should do next.
#[derive(Debug)]
pub enum Step {
    /// Call `advance` again after this long.
    Wait(Duration),
    /// The boot log is gone and the reveal is running; tick it per frame.
    Done(DecryptReveal),
}

struct SkipState {
    requested: Cell<bool>,
    waker: Cell<Option<Waker>>,
    control: RefCell<Box<dyn SkipControl>>,
}

/// Handle wired to the skip control's activation. Cloneable, idempotent.
#[derive(Clone)]
pub struct SkipHandle(Rc<SkipState>);

impl SkipHandle {
    /// Request a skip. Returns `false` if one was already requested.
    pub fn request(&self) -> bool {
        if self.0.requested.replace(true) {
            return false;
        }
        info!("boot sequence skip requested");
        if let Ok(mut control) = self.0.control.try_borrow_mut() {
            control.set_skipping(SKIPPING_LABEL);
        }
        if let Some(waker) = self.0.waker.take() {
            waker.wake();
        }
        true
    }

    pub fn is_requested(&self) -> bool {
        self.0.requested.get()
    }

    /// Resolves once a skip has been requested.
    fn requested(&self) -> SkipRequested {
        SkipRequested(self.0.clone())
    }
}

struct SkipRequested(Rc<SkipState>);

impl Future for SkipRequested {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0.requested.get() {
            Poll::Ready(())
        } else {
            self.0.waker.set(Some(cx.waker().clone()));
            Poll::Pending
        }
    }
}

pub struct BootEngine {
    script: BootScript,
    config: BootConfig,
    state: BootState,
    /// Glyphs of the line being typed.
    glyphs: Vec<char>,
    target: Option<TextTarget>,
    skip: SkipHandle,
    lines: Box<dyn LineContainer>,
    cursor: Box<dyn Cursor>,
    welcome: Box<dyn WelcomeSurface>,
    measure: Box<dyn TextMeasure>,
    decrypt_targets: Vec<Box<dyn DecryptTarget>>,
    sound: Option<Rc<RefCell<SoundEngine>>>,
}

impl BootEngine {
    /// Pick the script for `viewport_width` and bind the host surfaces.
    pub fn new(
        surfaces: BootSurfaces,
        viewport_width: u32,
        config: BootConfig,
    ) -> Result<Self, BootError> {
        let script = BootScript::for_viewport(viewport_width, &config);
        BootEngine::with_script(surfaces, script, config)
    }

    pub fn with_script(
        surfaces: BootSurfaces,
        script: BootScript,
        config: BootConfig,
    ) -> Result<Self, BootError> {
        let surfaces = surfaces.into_required()?;
        debug!(layout = ?script.layout, lines = script.len(), "boot engine ready");
        Ok(BootEngine {
            script,
            config,
            state: BootState::Idle,
            glyphs: Vec::new(),
            target: None,
            skip: SkipHandle(Rc::new(SkipState {
                requested: Cell::new(false),
                waker: Cell::new(None),
                control: RefCell::new(surfaces.skip),
            })),
            lines: surfaces.lines,
            cursor: surfaces.cursor,
            welcome: surfaces.welcome,
            measure: surfaces.measure,
            decrypt_targets: surfaces.decrypt_targets,
            sound: None,
        })
    }

    /// Share the page's sound engine for the boot chime.
    pub fn with_sound(mut self, sound: Rc<RefCell<SoundEngine>>) -> Self {
        self.sound = Some(sound);
        self
    }

    pub fn skip_handle(&self) -> SkipHandle {
        self.skip.clone()
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    pub fn script(&self) -> &BootScript {
        &self.script
    }

    /// Run the next action. After a skip request `advance` may be called
    /// before the pending wait has elapsed.
    pub fn advance(&mut self) -> Step {
        loop {
            match self.state {
                BootState::Idle => {
                    self.welcome.set_visible(false);
                    self.cursor.show();
                    if self.skip.is_requested() {
                        return self.enter_skipping();
                    }
                    self.begin_line(0);
                    if self.state == BootState::Settling {
                        return self.settle();
                    }
                }
                BootState::Typing { line, typed } => {
                    if self.skip.is_requested() {
                        return self.enter_skipping();
                    }
                    let (Some(&ch), Some(target)) = (self.glyphs.get(typed), self.target) else {
                        self.state = BootState::LineDelay { line };
                        return Step::Wait(self.script.lines[line].delay_after());
                    };
                    self.lines.push_char(target, ch);
                    self.update_cursor();
                    self.state = BootState::Typing { line, typed: typed + 1 };
                    return Step::Wait(self.script.typing_delay());
                }
                BootState::LineDelay { line } => {
                    if self.skip.is_requested() {
                        return self.enter_skipping();
                    }
                    self.begin_line(line + 1);
                    if self.state == BootState::Settling {
                        return self.settle();
                    }
                }
                BootState::Skipping | BootState::Settling => {
                    let fade = Duration::from_millis(self.config.fade_out_ms);
                    self.lines.fade_out(fade);
                    self.state = BootState::FadingOut;
                    return Step::Wait(fade);
                }
                BootState::FadingOut => {
                    self.lines.hide();
                    self.welcome.set_visible(true);
                    self.state = BootState::Revealing;
                }
                BootState::Revealing => {
                    self.play_chime();
                    let reveal = DecryptReveal::start(
                        std::mem::take(&mut self.decrypt_targets),
                        self.config.seed.unwrap_or_else(clock_seed),
                    );
                    self.state = BootState::Done;
                    info!(targets = reveal.len(), "boot sequence complete");
                    return Step::Done(reveal);
                }
                BootState::Done => {
                    warn!("boot sequence already complete");
                    return Step::Done(DecryptReveal::empty());
                }
            }
        }
    }

    /// Drive the sequence to completion with a host timer and return the
    /// running decrypt reveal. Waits that a skip can cut short race
    /// against the skip handle.
    pub async fn run<S, F>(mut self, mut sleep: S) -> DecryptReveal
    where
        S: FnMut(Duration) -> F,
        F: Future<Output = ()>,
    {
        loop {
            match self.advance() {
                Step::Done(reveal) => return reveal,
                Step::Wait(wait) if wait.is_zero() => {}
                Step::Wait(wait) if self.is_skippable() => {
                    let nap = std::pin::pin!(sleep(wait));
                    if let Either::Right(_) = future::select(nap, self.skip.requested()).await {
                        debug!("wait cut short by skip");
                    }
                }
                Step::Wait(wait) => sleep(wait).await,
            }
        }
    }

    fn is_skippable(&self) -> bool {
        !self.skip.is_requested()
            && matches!(self.state, BootState::Typing { .. } | BootState::LineDelay { .. })
    }

    /// Create the surface for `line` and start typing it, or finish if the
    /// script is exhausted.
    fn begin_line(&mut self, line: usize) {
        let Some(spec) = self.script.lines.get(line) else {
            if let Ok(mut control) = self.skip.0.control.try_borrow_mut() {
                control.hide();
            }
            debug!("boot log finished");
            self.state = BootState::Settling;
            self.target = None;
            return;
        };

        let target = match self.lines.last_line() {
            Some(last) if spec.append => TextTarget::Span(last, self.lines.push_span(last, spec.style)),
            _ => TextTarget::Line(self.lines.push_line(spec.style)),
        };
        self.glyphs = spec.text.chars().collect();
        self.target = Some(target);
        self.update_cursor();
        self.state = BootState::Typing { line, typed: 0 };
    }

    fn settle(&self) -> Step {
        Step::Wait(Duration::from_millis(self.config.finish_pause_ms))
    }

    fn enter_skipping(&mut self) -> Step {
        self.state = BootState::Skipping;
        self.target = None;
        Step::Wait(Duration::from_millis(self.config.skip_pause_ms))
    }

    /// Put the cursor just after the last glyph of the current line.
    fn update_cursor(&mut self) {
        let Some(line) = self.target.map(TextTarget::line) else {
            return;
        };
        let rect = self.lines.line_rect(line);
        let container = self.lines.container_rect();
        let text = self.lines.line_text(line);
        let font = self.lines.line_font(line);
        let width = self.measure.text_width(&text, &font).unwrap_or_else(|e| {
            debug!("{e}; cursor falls back to line start");
            0.0
        });
        self.cursor
            .set_position(rect.left - container.left + width, rect.top - container.top);
    }

    fn play_chime(&self) {
        if let Some(sound) = &self.sound {
            if let Ok(mut sound) = sound.try_borrow_mut() {
                sound.play(SoundEffect::Boot);
            }
        }
    }
}

/// Boot driver for hosts with their own timers. `advance` returns how long
/// to wait before the next call, or `None` once the reveal is running;
/// from then on `tick_reveal` is called once per animation frame.
pub struct TimedBoot {
    engine: BootEngine,
    reveal: Option<DecryptReveal>,
}

impl TimedBoot {
    pub fn new(engine: BootEngine) -> Self {
        TimedBoot { engine, reveal: None }
    }

    pub fn advance(&mut self) -> Option<Duration> {
        if self.reveal.is_some() {
            return None;
        }
        match self.engine.advance() {
            Step::Wait(wait) => Some(wait),
            Step::Done(reveal) => {
                self.reveal = Some(reveal);
                None
            }
        }
    }

    pub fn skip(&self) -> bool {
        self.engine.skip.request()
    }

    /// One animation frame of the decrypt reveal. Returns whether more
    /// frames are needed.
    pub fn tick_reveal(&mut self) -> bool {
        self.reveal.as_mut().is_some_and(DecryptReveal::tick)
    }

    pub fn state(&self) -> BootState {
        self.engine.state()
    }
}

/// Seed for the decrypt scramble when the host did not pick one.
fn clock_seed() -> u64 {
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5EED)
    }
    #[cfg(target_arch = "wasm32")]
    {
        super::web::random_seed()
    }
}
