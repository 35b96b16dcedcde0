//! Parameter automation timeline, modelled on WebAudio `AudioParam`.
//!
//! A `Param` holds a default value plus time-ordered events. Ramps run from
//! the previous event's time and value to their own, so the usual pattern
//! is a `set` followed by one or more ramps.

use serde::{Deserialize, Serialize};

/// How a keyframe's value is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    /// Jump to the value at the keyframe time.
    Set,
    /// Linear ramp ending at the keyframe time.
    Linear,
    /// Exponential ramp ending at the keyframe time. Both ends must be > 0.
    Exponential,
}

/// One automation event. `time` is in seconds on the owning clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f64,
    pub value: f64,
    pub curve: Curve,
}

impl Keyframe {
    pub const fn set(value: f64, time: f64) -> Self {
        Keyframe { time, value, curve: Curve::Set }
    }

    pub const fn linear(value: f64, time: f64) -> Self {
        Keyframe { time, value, curve: Curve::Linear }
    }

    pub const fn exponential(value: f64, time: f64) -> Self {
        Keyframe { time, value, curve: Curve::Exponential }
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    default: f64,
    events: Vec<Keyframe>,
}

impl Param {
    pub fn new(default: f64) -> Self {
        Param { default, events: Vec::new() }
    }

    /// Build a param from keyframes, rejecting exponential ramps that touch
    /// zero or change sign.
    pub fn from_keyframes(default: f64, keyframes: &[Keyframe]) -> Result<Self, String> {
        let mut param = Param::new(default);
        for kf in keyframes {
            param.push(*kf)?;
        }
        Ok(param)
    }

    pub fn set_value_at_time(&mut self, value: f64, time: f64) {
        self.insert(Keyframe::set(value, time));
    }

    pub fn linear_ramp_to(&mut self, value: f64, time: f64) {
        self.insert(Keyframe::linear(value, time));
    }

    pub fn exponential_ramp_to(&mut self, value: f64, time: f64) -> Result<(), String> {
        self.push(Keyframe::exponential(value, time))
    }

    fn push(&mut self, kf: Keyframe) -> Result<(), String> {
        if !kf.value.is_finite() || !kf.time.is_finite() || kf.time < 0.0 {
            return Err(format!("invalid keyframe {kf:?}"));
        }
        if kf.curve == Curve::Exponential {
            let from = self.value_before(kf.time);
            if kf.value <= 0.0 || from <= 0.0 {
                return Err(format!(
                    "exponential ramp from {from} to {} at {}s must stay positive",
                    kf.value, kf.time
                ));
            }
        }
        self.insert(kf);
        Ok(())
    }

    /// Insert keeping events sorted; equal times keep insertion order.
    fn insert(&mut self, kf: Keyframe) {
        let idx = self.events.partition_point(|e| e.time <= kf.time);
        self.events.insert(idx, kf);
    }

    /// Value the most recent event before `time` settles on.
    fn value_before(&self, time: f64) -> f64 {
        self.events
            .iter()
            .take_while(|e| e.time <= time)
            .last()
            .map_or(self.default, |e| e.value)
    }

    /// Evaluate the automation at `time`.
    pub fn value_at(&self, time: f64) -> f64 {
        let mut prev_value = self.default;
        let mut prev_time = 0.0;

        for ev in &self.events {
            if time < ev.time {
                let span = ev.time - prev_time;
                if span <= 0.0 {
                    return prev_value;
                }
                let t = ((time - prev_time) / span).clamp(0.0, 1.0);
                return match ev.curve {
                    Curve::Set => prev_value,
                    Curve::Linear => prev_value + (ev.value - prev_value) * t,
                    Curve::Exponential if prev_value > 0.0 && ev.value > 0.0 => {
                        prev_value * (ev.value / prev_value).powf(t)
                    }
                    Curve::Exponential => prev_value,
                };
            }
            prev_value = ev.value;
            prev_time = ev.time;
        }
        prev_value
    }

    pub fn events(&self) -> &[Keyframe] {
        &self.events
    }

    /// Drop events that can no longer affect values at or after `time`,
    /// folding the settled value into the default.
    pub fn prune_before(&mut self, time: f64) {
        let settled = self.events.partition_point(|e| e.time <= time);
        if settled > 0 {
            self.default = self.events[settled - 1].value;
            // The last settled event still anchors a ramp that follows it.
            let keep_from = settled - 1;
            self.events.drain(..keep_from);
        }
    }
}
