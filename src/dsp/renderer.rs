//! Offline renderer — renders a single sound effect to samples or a WAV file.

use std::io::Cursor;

use crate::error::AudioError;
use crate::sound::context::{AudioContext, SynthContext};
use crate::sound::SoundEffect;

/// Render one effect at full scale (master gain 1.0) to mono f32 samples.
pub fn render_effect(effect: SoundEffect, sample_rate: u32) -> Result<Vec<f32>, AudioError> {
    let recipe = effect.recipe();
    let mut context = SynthContext::new(sample_rate as f64);
    context.set_master_gain(1.0, 0.0);
    context.start_tone(&recipe)?;

    let frames = (recipe.duration * sample_rate as f64).round() as usize;
    Ok(context.render(frames))
}

/// Render one effect to a 16-bit mono WAV byte buffer.
pub fn render_effect_wav(effect: SoundEffect, sample_rate: u32) -> Result<Vec<u8>, AudioError> {
    let samples = render_effect(effect, sample_rate)?;
    encode_wav(&samples, sample_rate)
}

fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, AudioError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &s in samples {
            writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}
