//! Boot surfaces backed by a page-side JS object.
//!
//! The page passes one object implementing the methods declared below; each
//! surface trait is forwarded to it. Lines and spans are addressed by the
//! integer ids the page hands back.

use std::time::Duration;

use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::error::MeasureError;

use super::script::LineStyle;
use super::surface::{
    BootSurfaces, Cursor, DecryptTarget, LineContainer, LineId, Rect, SkipControl, SpanId,
    TextMeasure, TextTarget, WelcomeSurface,
};

#[wasm_bindgen(typescript_custom_section)]
const BOOT_HOST_TS: &'static str = r#"
export interface BootHost {
    pushLine(style: string): number;
    pushSpan(line: number, style: string): number;
    pushChar(line: number, span: number | undefined, ch: string): void;
    lastLine(): number | undefined;
    lineText(line: number): string;
    lineFont(line: number): string;
    lineRect(line: number): { left: number; top: number; width: number; height: number };
    containerRect(): { left: number; top: number; width: number; height: number };
    fadeOut(ms: number): void;
    hideLog(): void;
    showCursor(): void;
    moveCursor(left: number, top: number): void;
    setSkipping(label: string): void;
    hideSkip(): void;
    setWelcomeVisible(visible: boolean): void;
    measureText(text: string, font: string): number;
    decryptTargetCount(): number;
    decryptOriginal(index: number): string;
    setDecryptText(index: number, text: string): void;
    markDecrypting(index: number): void;
}
"#;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    #[wasm_bindgen(typescript_type = "BootHost")]
    pub type BootHost;

    #[wasm_bindgen(method, js_name = pushLine)]
    fn push_line(this: &BootHost, style: &str) -> u32;
    #[wasm_bindgen(method, js_name = pushSpan)]
    fn push_span(this: &BootHost, line: u32, style: &str) -> u32;
    #[wasm_bindgen(method, js_name = pushChar)]
    fn push_char(this: &BootHost, line: u32, span: Option<u32>, ch: char);
    #[wasm_bindgen(method, js_name = lastLine)]
    fn last_line(this: &BootHost) -> Option<u32>;
    #[wasm_bindgen(method, js_name = lineText)]
    fn line_text(this: &BootHost, line: u32) -> String;
    #[wasm_bindgen(method, js_name = lineFont)]
    fn line_font(this: &BootHost, line: u32) -> String;
    #[wasm_bindgen(method, js_name = lineRect)]
    fn line_rect(this: &BootHost, line: u32) -> JsValue;
    #[wasm_bindgen(method, js_name = containerRect)]
    fn container_rect(this: &BootHost) -> JsValue;
    #[wasm_bindgen(method, js_name = fadeOut)]
    fn fade_out(this: &BootHost, ms: f64);
    #[wasm_bindgen(method, js_name = hideLog)]
    fn hide_log(this: &BootHost);
    #[wasm_bindgen(method, js_name = showCursor)]
    fn show_cursor(this: &BootHost);
    #[wasm_bindgen(method, js_name = moveCursor)]
    fn move_cursor(this: &BootHost, left: f64, top: f64);
    #[wasm_bindgen(method, js_name = setSkipping)]
    fn set_skipping(this: &BootHost, label: &str);
    #[wasm_bindgen(method, js_name = hideSkip)]
    fn hide_skip(this: &BootHost);
    #[wasm_bindgen(method, js_name = setWelcomeVisible)]
    fn set_welcome_visible(this: &BootHost, visible: bool);
    #[wasm_bindgen(method, catch, js_name = measureText)]
    fn measure_text(this: &BootHost, text: &str, font: &str) -> Result<f64, JsValue>;
    #[wasm_bindgen(method, js_name = decryptTargetCount)]
    fn decrypt_target_count(this: &BootHost) -> u32;
    #[wasm_bindgen(method, js_name = decryptOriginal)]
    fn decrypt_original(this: &BootHost, index: u32) -> String;
    #[wasm_bindgen(method, js_name = setDecryptText)]
    fn set_decrypt_text(this: &BootHost, index: u32, text: &str);
    #[wasm_bindgen(method, js_name = markDecrypting)]
    fn mark_decrypting(this: &BootHost, index: u32);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Math)]
    fn random() -> f64;
}

/// Decrypt seed drawn from `Math.random`.
#[cfg(target_arch = "wasm32")]
pub(crate) fn random_seed() -> u64 {
    (random() * (1u64 << 53) as f64) as u64
}

/// Every boot surface, decrypt targets included, routed to `host`.
pub fn host_surfaces(host: &BootHost) -> BootSurfaces {
    let surface = HostSurface(host.clone());
    let mut surfaces = BootSurfaces::new()
        .lines(surface.clone())
        .cursor(surface.clone())
        .skip(surface.clone())
        .welcome(surface.clone())
        .measure(surface);
    for index in 0..host.decrypt_target_count() {
        surfaces = surfaces.decrypt_target(HostDecryptTarget {
            host: host.clone(),
            index,
        });
    }
    surfaces
}

#[derive(Clone)]
struct HostSurface(BootHost);

fn rect_from_js(value: JsValue) -> Rect {
    serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
        debug!("unreadable bounding box: {e}");
        Rect::default()
    })
}

impl LineContainer for HostSurface {
    fn push_line(&mut self, style: LineStyle) -> LineId {
        LineId(self.0.push_line(style.class_name()) as usize)
    }

    fn push_span(&mut self, line: LineId, style: LineStyle) -> SpanId {
        SpanId(self.0.push_span(line.0 as u32, style.class_name()) as usize)
    }

    fn push_char(&mut self, target: TextTarget, ch: char) {
        let span = match target {
            TextTarget::Line(_) => None,
            TextTarget::Span(_, span) => Some(span.0 as u32),
        };
        self.0.push_char(target.line().0 as u32, span, ch);
    }

    fn last_line(&self) -> Option<LineId> {
        self.0.last_line().map(|id| LineId(id as usize))
    }

    fn line_text(&self, line: LineId) -> String {
        self.0.line_text(line.0 as u32)
    }

    fn line_font(&self, line: LineId) -> String {
        self.0.line_font(line.0 as u32)
    }

    fn line_rect(&self, line: LineId) -> Rect {
        rect_from_js(self.0.line_rect(line.0 as u32))
    }

    fn container_rect(&self) -> Rect {
        rect_from_js(self.0.container_rect())
    }

    fn fade_out(&mut self, duration: Duration) {
        self.0.fade_out(duration.as_secs_f64() * 1000.0);
    }

    fn hide(&mut self) {
        self.0.hide_log();
    }
}

impl Cursor for HostSurface {
    fn show(&mut self) {
        self.0.show_cursor();
    }

    fn set_position(&mut self, left: f64, top: f64) {
        self.0.move_cursor(left, top);
    }
}

impl SkipControl for HostSurface {
    fn set_skipping(&mut self, label: &str) {
        self.0.set_skipping(label);
    }

    fn hide(&mut self) {
        self.0.hide_skip();
    }
}

impl WelcomeSurface for HostSurface {
    fn set_visible(&mut self, visible: bool) {
        self.0.set_welcome_visible(visible);
    }
}

impl TextMeasure for HostSurface {
    fn text_width(&self, text: &str, font: &str) -> Result<f64, MeasureError> {
        match self.0.measure_text(text, font) {
            Ok(width) if width.is_finite() => Ok(width),
            Ok(width) => Err(MeasureError(format!("page reported width {width}"))),
            Err(e) => Err(MeasureError(format!("{e:?}"))),
        }
    }
}

struct HostDecryptTarget {
    host: BootHost,
    index: u32,
}

impl DecryptTarget for HostDecryptTarget {
    fn original_text(&self) -> String {
        self.host.decrypt_original(self.index)
    }

    fn set_text(&mut self, text: &str) {
        self.host.set_decrypt_text(self.index, text);
    }

    fn mark_decrypting(&mut self) {
        self.host.mark_decrypting(self.index);
    }
}
