//! Involuntary physical responses.
//!
//! Trembling, contraction, flush and tautness are derived each tick from the
//! arousal/pressure primitives; wetness integrates over time. A short FIFO
//! log keeps the most recent involuntary-response labels for the prompt
//! surface.

use crate::dynamics::{sanitize_f32, DecayRates};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Capacity of the involuntary-response label log.
pub const INVOLUNTARY_LOG_CAPACITY: usize = 5;

/// Labels appended when a climax fires.
pub const CLIMAX_RESPONSES: [&str; 5] = [
    "muscles clenching rhythmically",
    "back arching",
    "toes curling",
    "thighs trembling",
    "breath catching",
];

/// Label appended on a breath catch.
pub const GASP_RESPONSE: &str = "sharp intake of breath";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalResponses {
    /// Involuntary shaking (0-100).
    pub trembling: f32,
    /// Progressive muscle tension (0-100).
    pub muscle_contraction: f32,
    /// Arousal lubrication (0-100). Integrates while arousal is high.
    pub wetness: f32,
    /// Skin redness and heat (0-100).
    pub flush: f32,
    /// Overall muscle rigidity (0-100).
    pub body_tautness: f32,
    /// True while a breath catch is being held.
    pub breath_holding: bool,
    /// Seconds-since-session-start of the last gasp, for rate limiting.
    pub last_gasp_time: Option<f64>,
    /// Recent involuntary-response labels, oldest first.
    involuntary: VecDeque<String>,
}

impl Default for PhysicalResponses {
    fn default() -> Self {
        Self {
            trembling: 0.0,
            muscle_contraction: 0.0,
            wetness: 0.0,
            flush: 0.0,
            body_tautness: 0.0,
            breath_holding: false,
            last_gasp_time: None,
            involuntary: VecDeque::with_capacity(INVOLUNTARY_LOG_CAPACITY),
        }
    }
}

impl PhysicalResponses {
    pub fn normalize(&mut self) {
        self.trembling = sanitize_f32(self.trembling, 0.0).clamp(0.0, 100.0);
        self.muscle_contraction = sanitize_f32(self.muscle_contraction, 0.0).clamp(0.0, 100.0);
        self.wetness = sanitize_f32(self.wetness, 0.0).clamp(0.0, 100.0);
        self.flush = sanitize_f32(self.flush, 0.0).clamp(0.0, 100.0);
        self.body_tautness = sanitize_f32(self.body_tautness, 0.0).clamp(0.0, 100.0);
    }

    /// Append a label, evicting the oldest once at capacity.
    pub fn push_involuntary(&mut self, label: impl Into<String>) {
        if self.involuntary.len() == INVOLUNTARY_LOG_CAPACITY {
            self.involuntary.pop_front();
        }
        self.involuntary.push_back(label.into());
    }

    /// Up to `n` most recent labels, oldest of the selection first.
    pub fn recent_involuntary(&self, n: usize) -> Vec<&str> {
        let skip = self.involuntary.len().saturating_sub(n);
        self.involuntary.iter().skip(skip).map(|s| s.as_str()).collect()
    }

    pub fn involuntary_len(&self) -> usize {
        self.involuntary.len()
    }

    /// Whether a gasp may fire now (rate limited to one per 3 seconds).
    pub fn gasp_allowed(&self, now: f64) -> bool {
        match self.last_gasp_time {
            Some(t) => now - t > 3.0,
            None => true,
        }
    }

    /// Integrate wetness over `dt_secs`: builds while arousal is above 40,
    /// dries otherwise.
    pub fn integrate_wetness(&mut self, arousal: f32, dt_secs: f64, rates: &DecayRates) {
        if arousal > 40.0 {
            self.wetness = (self.wetness + (arousal / 100.0) * dt_secs as f32 * 2.0).min(100.0);
        } else {
            self.wetness = crate::dynamics::decay(
                self.wetness,
                rates.physical_wetness,
                crate::dynamics::ticks(dt_secs),
            );
        }
        self.normalize();
    }

    /// Recompute the derived channels from the current primitives.
    pub fn recompute_derived(
        &mut self,
        arousal: f32,
        orgasmic_pressure: f32,
        dopamine: f32,
        t: f32,
    ) {
        if arousal > 80.0 {
            self.trembling = (arousal - 70.0 + orgasmic_pressure * 0.5).min(100.0);
        } else {
            self.trembling = crate::dynamics::decay(self.trembling, 0.85, t);
        }

        self.muscle_contraction = (arousal * 0.8 + orgasmic_pressure * 0.3).min(100.0);
        self.flush = (arousal * 0.7 + (dopamine - 50.0) * 0.5).clamp(0.0, 100.0);
        self.body_tautness =
            (self.muscle_contraction * 0.6 + orgasmic_pressure * 0.4).min(100.0);
        self.normalize();
    }

    /// Climax maxes every involuntary channel at once.
    pub fn peak_at_climax(&mut self) {
        self.trembling = 100.0;
        self.muscle_contraction = 100.0;
        self.body_tautness = 100.0;
        for label in CLIMAX_RESPONSES.iter().take(2) {
            self.push_involuntary(*label);
        }
    }
}
