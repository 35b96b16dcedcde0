//! Mixer — sums active tones through the master gain.

use super::param::Param;
use super::tone::Tone;

/// The summing bus every tone is routed through before the output.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub master: Param,
    buffer: Vec<f64>,
}

impl Mixer {
    pub fn new(master_gain: f64) -> Self {
        Mixer {
            master: Param::new(master_gain),
            buffer: Vec::new(),
        }
    }

    /// Render `frames` samples starting at `start_time` seconds, advancing
    /// every tone and dropping the ones that have stopped.
    pub fn mix(
        &mut self,
        tones: &mut Vec<Tone>,
        frames: usize,
        start_time: f64,
        sample_rate: f64,
    ) -> Vec<f32> {
        self.buffer.clear();
        self.buffer.resize(frames, 0.0);

        for tone in tones.iter_mut() {
            for slot in self.buffer.iter_mut() {
                if tone.is_finished() {
                    break;
                }
                *slot += tone.next_sample();
            }
        }
        tones.retain(|t| !t.is_finished());

        let out = self
            .buffer
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let t = start_time + i as f64 / sample_rate;
                soft_clip(s * self.master.value_at(t)) as f32
            })
            .collect();

        self.master.prune_before(start_time + frames as f64 / sample_rate);
        out
    }
}

/// tanh soft clipper.
fn soft_clip(x: f64) -> f64 {
    x.tanh()
}
