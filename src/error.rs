use thiserror::Error;

/// Failures inside the sound engine. None of these reach the host: the
/// engine logs them and carries on silently.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The platform has no usable audio output.
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    /// Scheduling a tone failed (bad automation, closed context).
    #[error("synthesis failed: {0}")]
    Synthesis(String),
    #[error("unknown sound effect '{0}'")]
    UnknownEffect(String),
    #[error("WAV encoding failed: {0}")]
    Encode(#[from] hound::Error),
}

/// Contract violations when wiring the boot engine to the host page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BootError {
    #[error("missing required UI surface: {0}")]
    MissingSurface(&'static str),
}

/// Text width could not be measured; callers fall back to zero.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("text measurement failed: {0}")]
pub struct MeasureError(pub String);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Value(String),
}
