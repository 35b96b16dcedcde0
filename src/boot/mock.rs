//! In-memory surfaces for driving the boot engine in tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::script::LineStyle;
use super::surface::{
    Cursor, DecryptTarget, LineContainer, LineId, Rect, SkipControl, SpanId, TextTarget,
    WelcomeSurface,
};

pub const LINE_HEIGHT: f64 = 20.0;

#[derive(Debug, Clone, Default)]
pub struct MockLine {
    pub style: Option<LineStyle>,
    pub text: String,
    pub spans: Vec<(LineStyle, String)>,
}

impl MockLine {
    pub fn full_text(&self) -> String {
        let mut text = self.text.clone();
        for (_, span) in &self.spans {
            text.push_str(span);
        }
        text
    }
}

#[derive(Debug, Default)]
pub struct ScreenState {
    pub lines: Vec<MockLine>,
    pub fade: Option<Duration>,
    pub hidden: bool,
    /// Text of the line being typed after every glyph, in order.
    pub keystrokes: Vec<String>,
}

/// Boot log at page offset (10, 50); line `n` sits `n * LINE_HEIGHT` below.
#[derive(Clone, Default)]
pub struct MockScreen(pub Rc<RefCell<ScreenState>>);

impl MockScreen {
    pub fn texts(&self) -> Vec<String> {
        self.0.borrow().lines.iter().map(MockLine::full_text).collect()
    }

    pub fn state(&self) -> std::cell::Ref<'_, ScreenState> {
        self.0.borrow()
    }
}

impl LineContainer for MockScreen {
    fn push_line(&mut self, style: LineStyle) -> LineId {
        let mut state = self.0.borrow_mut();
        state.lines.push(MockLine {
            style: Some(style),
            ..MockLine::default()
        });
        LineId(state.lines.len() - 1)
    }

    fn push_span(&mut self, line: LineId, style: LineStyle) -> SpanId {
        let mut state = self.0.borrow_mut();
        let spans = &mut state.lines[line.0].spans;
        spans.push((style, String::new()));
        SpanId(spans.len() - 1)
    }

    fn push_char(&mut self, target: TextTarget, ch: char) {
        let mut state = self.0.borrow_mut();
        let line = &mut state.lines[target.line().0];
        match target {
            TextTarget::Line(_) => line.text.push(ch),
            TextTarget::Span(_, span) => line.spans[span.0].1.push(ch),
        }
        let typed = line.full_text();
        state.keystrokes.push(typed);
    }

    fn last_line(&self) -> Option<LineId> {
        let len = self.0.borrow().lines.len();
        len.checked_sub(1).map(LineId)
    }

    fn line_text(&self, line: LineId) -> String {
        self.0.borrow().lines[line.0].full_text()
    }

    fn line_font(&self, _line: LineId) -> String {
        "16px monospace".to_string()
    }

    fn line_rect(&self, line: LineId) -> Rect {
        Rect {
            left: 10.0,
            top: 50.0 + line.0 as f64 * LINE_HEIGHT,
            width: 600.0,
            height: LINE_HEIGHT,
        }
    }

    fn container_rect(&self) -> Rect {
        Rect {
            left: 10.0,
            top: 50.0,
            width: 600.0,
            height: 400.0,
        }
    }

    fn fade_out(&mut self, duration: Duration) {
        self.0.borrow_mut().fade = Some(duration);
    }

    fn hide(&mut self) {
        self.0.borrow_mut().hidden = true;
    }
}

#[derive(Debug, Default)]
pub struct CursorState {
    pub visible: bool,
    pub positions: Vec<(f64, f64)>,
}

#[derive(Clone, Default)]
pub struct MockCursor(pub Rc<RefCell<CursorState>>);

impl MockCursor {
    pub fn last_position(&self) -> Option<(f64, f64)> {
        self.0.borrow().positions.last().copied()
    }
}

impl Cursor for MockCursor {
    fn show(&mut self) {
        self.0.borrow_mut().visible = true;
    }

    fn set_position(&mut self, left: f64, top: f64) {
        self.0.borrow_mut().positions.push((left, top));
    }
}

#[derive(Debug, Default)]
pub struct SkipState {
    pub labels: Vec<String>,
    pub hidden: bool,
}

#[derive(Clone, Default)]
pub struct MockSkip(pub Rc<RefCell<SkipState>>);

impl SkipControl for MockSkip {
    fn set_skipping(&mut self, label: &str) {
        self.0.borrow_mut().labels.push(label.to_string());
    }

    fn hide(&mut self) {
        self.0.borrow_mut().hidden = true;
    }
}

#[derive(Clone, Default)]
pub struct MockWelcome(pub Rc<RefCell<Vec<bool>>>);

impl MockWelcome {
    pub fn visible(&self) -> Option<bool> {
        self.0.borrow().last().copied()
    }
}

impl WelcomeSurface for MockWelcome {
    fn set_visible(&mut self, visible: bool) {
        self.0.borrow_mut().push(visible);
    }
}

#[derive(Clone)]
pub struct MockDecryptTarget {
    original: String,
    shown: Rc<RefCell<String>>,
    decrypting: Rc<RefCell<bool>>,
}

impl MockDecryptTarget {
    pub fn new(original: &str) -> Self {
        MockDecryptTarget {
            original: original.to_string(),
            shown: Rc::new(RefCell::new(original.to_string())),
            decrypting: Rc::new(RefCell::new(false)),
        }
    }

    pub fn text(&self) -> String {
        self.shown.borrow().clone()
    }

    pub fn is_decrypting(&self) -> bool {
        *self.decrypting.borrow()
    }
}

impl DecryptTarget for MockDecryptTarget {
    fn original_text(&self) -> String {
        self.original.clone()
    }

    fn set_text(&mut self, text: &str) {
        *self.shown.borrow_mut() = text.to_string();
    }

    fn mark_decrypting(&mut self) {
        *self.decrypting.borrow_mut() = true;
    }
}
