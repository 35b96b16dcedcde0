//! Host-supplied UI surfaces the boot engine renders into.
//!
//! The engine never touches a DOM directly; the page (or a test) hands it
//! implementations of these traits.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{BootError, MeasureError};

use super::script::LineStyle;

/// Bounding box in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanId(pub usize);

/// Where typed glyphs go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    Line(LineId),
    Span(LineId, SpanId),
}

impl TextTarget {
    pub fn line(self) -> LineId {
        match self {
            TextTarget::Line(line) | TextTarget::Span(line, _) => line,
        }
    }
}

/// The boot log: an append-only list of line elements inside the boot
/// surface, which the engine also fades out and hides at the end.
pub trait LineContainer {
    fn push_line(&mut self, style: LineStyle) -> LineId;
    /// Append an inline span at the end of `line`.
    fn push_span(&mut self, line: LineId, style: LineStyle) -> SpanId;
    fn push_char(&mut self, target: TextTarget, ch: char);
    fn last_line(&self) -> Option<LineId>;
    /// Full rendered text of a line, spans included.
    fn line_text(&self, line: LineId) -> String;
    /// Font shorthand (`"<size> <family>"`) the line renders with.
    fn line_font(&self, line: LineId) -> String;
    fn line_rect(&self, line: LineId) -> Rect;
    /// Bounding box of the whole boot surface.
    fn container_rect(&self) -> Rect;
    fn fade_out(&mut self, duration: Duration);
    fn hide(&mut self);
}

/// The blinking block cursor, absolutely positioned over the boot surface.
pub trait Cursor {
    fn show(&mut self);
    fn set_position(&mut self, left: f64, top: f64);
}

pub trait SkipControl {
    /// Relabel the control and stop accepting activations.
    fn set_skipping(&mut self, label: &str);
    fn hide(&mut self);
}

pub trait WelcomeSurface {
    fn set_visible(&mut self, visible: bool);
}

/// An element revealed by the decrypt animation.
pub trait DecryptTarget {
    /// The final text, carried by the element as data.
    fn original_text(&self) -> String;
    fn set_text(&mut self, text: &str);
    fn mark_decrypting(&mut self) {}
}

pub trait TextMeasure {
    fn text_width(&self, text: &str, font: &str) -> Result<f64, MeasureError>;
}

/// Monospace estimate: a fixed advance per glyph.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvance(pub f64);

impl TextMeasure for FixedAdvance {
    fn text_width(&self, text: &str, _font: &str) -> Result<f64, MeasureError> {
        Ok(text.chars().count() as f64 * self.0)
    }
}

/// Used when the host cannot measure text; the cursor stays at the line start.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMeasure;

impl TextMeasure for NoMeasure {
    fn text_width(&self, _text: &str, _font: &str) -> Result<f64, MeasureError> {
        Err(MeasureError("no text measurement available".to_string()))
    }
}

/// Everything the host hands the boot engine. Line container, cursor,
/// skip control and welcome surface are required.
#[derive(Default)]
pub struct BootSurfaces {
    pub lines: Option<Box<dyn LineContainer>>,
    pub cursor: Option<Box<dyn Cursor>>,
    pub skip: Option<Box<dyn SkipControl>>,
    pub welcome: Option<Box<dyn WelcomeSurface>>,
    pub decrypt_targets: Vec<Box<dyn DecryptTarget>>,
    pub measure: Option<Box<dyn TextMeasure>>,
}

impl BootSurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(mut self, lines: impl LineContainer + 'static) -> Self {
        self.lines = Some(Box::new(lines));
        self
    }

    pub fn cursor(mut self, cursor: impl Cursor + 'static) -> Self {
        self.cursor = Some(Box::new(cursor));
        self
    }

    pub fn skip(mut self, skip: impl SkipControl + 'static) -> Self {
        self.skip = Some(Box::new(skip));
        self
    }

    pub fn welcome(mut self, welcome: impl WelcomeSurface + 'static) -> Self {
        self.welcome = Some(Box::new(welcome));
        self
    }

    pub fn decrypt_target(mut self, target: impl DecryptTarget + 'static) -> Self {
        self.decrypt_targets.push(Box::new(target));
        self
    }

    pub fn measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Some(Box::new(measure));
        self
    }

    pub(crate) fn into_required(self) -> Result<RequiredSurfaces, BootError> {
        Ok(RequiredSurfaces {
            lines: self.lines.ok_or(BootError::MissingSurface("line container"))?,
            cursor: self.cursor.ok_or(BootError::MissingSurface("cursor"))?,
            skip: self.skip.ok_or(BootError::MissingSurface("skip control"))?,
            welcome: self.welcome.ok_or(BootError::MissingSurface("welcome surface"))?,
            decrypt_targets: self.decrypt_targets,
            measure: self.measure.unwrap_or_else(|| Box::new(NoMeasure)),
        })
    }
}

pub(crate) struct RequiredSurfaces {
    pub lines: Box<dyn LineContainer>,
    pub cursor: Box<dyn Cursor>,
    pub skip: Box<dyn SkipControl>,
    pub welcome: Box<dyn WelcomeSurface>,
    pub decrypt_targets: Vec<Box<dyn DecryptTarget>>,
    pub measure: Box<dyn TextMeasure>,
}
