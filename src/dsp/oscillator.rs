//! Band-limited oscillators (PolyBLEP), matching the WebAudio oscillator shapes.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Oscillator shapes. `Sine` is the default, as for a WebAudio `OscillatorNode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Sawtooth,
    Triangle,
}

/// A phase-accumulating oscillator. The frequency may change every sample,
/// which is how frequency sweeps are rendered.
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    frequency: f64,
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, sample_rate: f64) -> Self {
        Oscillator {
            waveform,
            frequency: 440.0,
            phase: 0.0,
            sample_rate,
        }
    }

    pub fn set_frequency(&mut self, hz: f64) {
        self.frequency = hz;
    }

    /// Generate the next sample in [-1, 1] (plus PolyBLEP overshoot).
    pub fn next_sample(&mut self) -> f64 {
        let inc = self.frequency / self.sample_rate;
        let sample = match self.waveform {
            Waveform::Sine => (2.0 * PI * self.phase).sin(),
            Waveform::Sawtooth => 2.0 * self.phase - 1.0 - poly_blep(self.phase, inc),
            // Piecewise linear: -1 -> +1 over the first half, back over the second.
            Waveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
        };

        self.phase += inc;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        sample
    }
}

/// Polynomial band-limited step correction around a wrap of the phase.
///
/// `t` is the phase in [0, 1), `dt` the phase increment per sample.
fn poly_blep(t: f64, dt: f64) -> f64 {
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_crossings(osc: &mut Oscillator, samples: usize) -> usize {
        let mut prev = osc.next_sample();
        let mut count = 0;
        for _ in 1..samples {
            let s = osc.next_sample();
            if (prev < 0.0) != (s < 0.0) {
                count += 1;
            }
            prev = s;
        }
        count
    }

    #[test]
    fn sine_starts_at_zero() {
        let mut osc = Oscillator::new(Waveform::Sine, 44100.0);
        assert!(osc.next_sample().abs() < 1e-10);
    }

    #[test]
    fn shapes_stay_in_range() {
        for waveform in [Waveform::Sine, Waveform::Sawtooth, Waveform::Triangle] {
            let mut osc = Oscillator::new(waveform, 44100.0);
            osc.set_frequency(800.0);
            for _ in 0..44100 {
                let s = osc.next_sample();
                assert!(s.abs() <= 1.5, "{waveform:?} out of range: {s}");
            }
        }
    }

    #[test]
    fn higher_frequency_crosses_zero_more_often() {
        let mut low = Oscillator::new(Waveform::Sine, 44100.0);
        low.set_frequency(100.0);
        let mut high = Oscillator::new(Waveform::Sine, 44100.0);
        high.set_frequency(400.0);
        let low_count = zero_crossings(&mut low, 44100);
        let high_count = zero_crossings(&mut high, 44100);
        // Two crossings per cycle.
        assert!((low_count as i64 - 200).abs() <= 2, "got {low_count}");
        assert!((high_count as i64 - 800).abs() <= 2, "got {high_count}");
    }

    #[test]
    fn sine_is_the_default_shape() {
        assert_eq!(Waveform::default(), Waveform::Sine);
        let json = serde_json::to_string(&Waveform::Sawtooth).unwrap();
        assert_eq!(json, "\"sawtooth\"");
    }
}
