//! Boot scripts: the scripted lines typed onto the virtual terminal.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::BootConfig;

/// Presentational class of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    System,
    Loading,
    Success,
}

impl LineStyle {
    pub fn class_name(self) -> &'static str {
        match self {
            LineStyle::System => "system",
            LineStyle::Loading => "loading",
            LineStyle::Success => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootLine {
    pub text: String,
    pub style: LineStyle,
    /// Pause after the line is typed.
    pub delay_after_ms: u64,
    /// Continue the previous line instead of starting a new one.
    #[serde(default)]
    pub append: bool,
}

impl BootLine {
    pub fn new(text: impl Into<String>, style: LineStyle, delay_after_ms: u64) -> Self {
        BootLine {
            text: text.into(),
            style,
            delay_after_ms,
            append: false,
        }
    }

    pub fn appended(mut self) -> Self {
        self.append = true;
        self
    }

    pub fn delay_after(&self) -> Duration {
        Duration::from_millis(self.delay_after_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Mobile,
    Desktop,
}

impl Layout {
    /// Mirrors the `(max-width: <breakpoint>px)` media query.
    pub fn for_viewport(width: u32, config: &BootConfig) -> Self {
        if width <= config.mobile_breakpoint {
            Layout::Mobile
        } else {
            Layout::Desktop
        }
    }
}

/// An ordered, read-only list of lines plus the per-glyph typing delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootScript {
    pub layout: Layout,
    pub lines: Vec<BootLine>,
    pub typing_delay_ms: u64,
}

impl BootScript {
    /// Pick the script for a viewport width. Decided once per session.
    pub fn for_viewport(width: u32, config: &BootConfig) -> Self {
        match Layout::for_viewport(width, config) {
            Layout::Mobile => BootScript::mobile(config),
            Layout::Desktop => BootScript::desktop(config),
        }
    }

    /// Short and fast, for narrow screens.
    pub fn mobile(config: &BootConfig) -> Self {
        use LineStyle::*;
        BootScript {
            layout: Layout::Mobile,
            typing_delay_ms: config.mobile_typing_ms,
            lines: vec![
                BootLine::new("SISTEMA JM_2025", System, 50),
                BootLine::new("VERIFICANDO... ", Loading, 100),
                BootLine::new("[OK]", Success, 50).appended(),
                BootLine::new("CARGANDO MÓDULOS:", Loading, 150),
                BootLine::new("→ IDENTIDAD [OK]", Success, 100),
                BootLine::new("→ DIGITAL [OK]", Success, 100),
                BootLine::new("→ CONTENIDO [OK]", Success, 100),
                BootLine::new("[██████████] 100%", Success, 50),
                BootLine::new("¡BIENVENID@!", System, 150),
            ],
        }
    }

    pub fn desktop(config: &BootConfig) -> Self {
        use LineStyle::*;
        BootScript {
            layout: Layout::Desktop,
            typing_delay_ms: config.desktop_typing_ms,
            lines: vec![
                BootLine::new("INICIANDO SISTEMA JULIO_MORCILLO_v2025...", System, 80),
                BootLine::new("VERIFICANDO MEMORIA... ", Loading, 200),
                BootLine::new("[OK]", Success, 100).appended(),
                BootLine::new("CARGANDO MÓDULOS DE DISEÑO...", Loading, 250),
                BootLine::new("  → Identidad Visual... [CARGADO]", Success, 180),
                BootLine::new("  → Experiencias Digitales... [CARGADO]", Success, 180),
                BootLine::new("  → Contenido Digital... [CARGADO]", Success, 180),
                BootLine::new("INICIALIZANDO INTERFAZ GRÁFICA... ", Loading, 300),
                BootLine::new("[████████████████████] 100%", Success, 30).appended(),
                BootLine::new("ESTABLECIENDO CONEXIÓN CREATIVA...", System, 200),
                BootLine::new("SISTEMA LISTO.", Success, 150),
                BootLine::new("\nBIENVENID@ A MI PORTAFOLIO", System, 300),
            ],
        }
    }

    /// A host-defined script.
    pub fn custom(layout: Layout, lines: Vec<BootLine>, typing_delay: Duration) -> Self {
        BootScript {
            layout,
            lines,
            typing_delay_ms: typing_delay.as_millis() as u64,
        }
    }

    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
