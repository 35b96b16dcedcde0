//! The boot sequence: a typed-out terminal log that fades into the
//! welcome view and then decrypts its headline text.

pub mod decrypt;
pub mod engine;
pub mod script;
pub mod surface;
pub mod web;

#[cfg(test)]
pub(crate) mod mock;

pub use decrypt::{Decrypt, DecryptReveal};
pub use engine::{BootEngine, BootState, SkipHandle, Step, TimedBoot};
pub use script::{BootLine, BootScript, Layout, LineStyle};
pub use surface::{
    BootSurfaces, Cursor, DecryptTarget, FixedAdvance, LineContainer, NoMeasure, Rect,
    SkipControl, TextMeasure, TextTarget, WelcomeSurface,
};
