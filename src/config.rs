//! Tunables for the sound and boot engines.
//!
//! Both structs deserialize from camelCase JSON with every field optional,
//! so a host can override just the values it cares about.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Sound engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SoundConfig {
    /// Master volume when unmuted, [0, 1]. Kept low so effects stay unobtrusive.
    pub volume: f64,
    /// Sample rate of the software synth context.
    pub sample_rate: u32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        SoundConfig {
            volume: 0.2,
            sample_rate: 44100,
        }
    }
}

impl SoundConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SoundConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::Value(format!("volume {} outside [0, 1]", self.volume)));
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::Value("sample rate must be positive".to_string()));
        }
        Ok(())
    }
}

/// Boot sequence timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BootConfig {
    /// Viewports at most this wide get the short mobile script.
    pub mobile_breakpoint: u32,
    pub mobile_typing_ms: u64,
    pub desktop_typing_ms: u64,
    /// Pause before fading out after a skip.
    pub skip_pause_ms: u64,
    /// Pause before fading out after the last line.
    pub finish_pause_ms: u64,
    pub fade_out_ms: u64,
    /// Seed for the decrypt scramble. `None` derives one from the clock
    /// where one is available.
    pub seed: Option<u64>,
}

impl Default for BootConfig {
    fn default() -> Self {
        BootConfig {
            mobile_breakpoint: 768,
            mobile_typing_ms: 8,
            desktop_typing_ms: 15,
            skip_pause_ms: 200,
            finish_pause_ms: 500,
            fade_out_ms: 600,
            seed: None,
        }
    }
}

impl BootConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Every pause and delay set to zero; typing runs as fast as it is driven.
    pub fn instant() -> Self {
        BootConfig {
            mobile_typing_ms: 0,
            desktop_typing_ms: 0,
            skip_pause_ms: 0,
            finish_pause_ms: 0,
            fade_out_ms: 0,
            ..BootConfig::default()
        }
    }
}
