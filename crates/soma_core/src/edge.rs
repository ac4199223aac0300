//! Edge plateau tracking.
//!
//! An edge is sustained high arousal held short of climax. Pressure builds
//! from edge and penetration stimuli, stability falls as pressure, pulse and
//! repeat count rise, and the count increments each time pressure crosses 85
//! from below.

use crate::dynamics::{self, sanitize_f32, DecayRates};
use serde::{Deserialize, Serialize};

/// Pressure above which the body counts as being on the edge.
pub const ON_EDGE_THRESHOLD: f32 = 70.0;
/// Arousal above which the body counts as highly aroused.
pub const HIGHLY_AROUSED_THRESHOLD: f32 = 80.0;
/// Pressure crossing that increments the edge count.
const EDGE_COUNT_THRESHOLD: f32 = 85.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeState {
    /// 0-100.
    pub edge_pressure: f32,
    /// Times edged this arousal episode. Reset by climax.
    pub edge_count: u32,
    /// High-water mark of global arousal.
    pub peak_arousal: f32,
    /// Derived stability score, 0-100. Lower means closer to tipping.
    pub stability: f32,
    pub is_on_edge: bool,
    pub is_highly_aroused: bool,
}

impl Default for EdgeState {
    fn default() -> Self {
        Self {
            edge_pressure: 0.0,
            edge_count: 0,
            peak_arousal: 0.0,
            stability: 100.0,
            is_on_edge: false,
            is_highly_aroused: false,
        }
    }
}

impl EdgeState {
    pub fn normalize(&mut self) {
        self.edge_pressure = sanitize_f32(self.edge_pressure, 0.0).clamp(0.0, 100.0);
        self.peak_arousal = sanitize_f32(self.peak_arousal, 0.0).clamp(0.0, 100.0);
        self.stability = sanitize_f32(self.stability, 100.0).clamp(0.0, 100.0);
    }

    /// Feed `intensity` of edge pressure. Returns true when the edge count
    /// was incremented (pressure crossed 85 from below).
    pub fn apply(&mut self, intensity: f32, global_arousal: f32, heart_rate: f32) -> bool {
        let previous = self.edge_pressure;
        self.edge_pressure = (self.edge_pressure + intensity).min(100.0);

        if global_arousal > self.peak_arousal {
            self.peak_arousal = global_arousal;
        }

        let crossed =
            previous <= EDGE_COUNT_THRESHOLD && self.edge_pressure > EDGE_COUNT_THRESHOLD;
        if crossed {
            self.edge_count += 1;
        }

        self.refresh(global_arousal, heart_rate);
        crossed
    }

    /// Recompute the derived flags and stability score.
    pub fn refresh(&mut self, global_arousal: f32, heart_rate: f32) {
        self.is_on_edge = self.edge_pressure > ON_EDGE_THRESHOLD;
        self.is_highly_aroused = global_arousal > HIGHLY_AROUSED_THRESHOLD;

        let pulse_penalty = if heart_rate > 120.0 { 10.0 } else { 0.0 };
        let repeat_penalty = self.edge_count as f32 * 5.0;
        self.stability =
            (100.0 - self.edge_pressure * 1.8 - pulse_penalty - repeat_penalty).max(0.0);
        self.normalize();
    }

    /// Pressure decay over `t` reference ticks.
    pub fn settle(&mut self, rates: &DecayRates, t: f32) {
        self.edge_pressure = dynamics::decay(self.edge_pressure, rates.edge_pressure, t);
        self.normalize();
    }

    /// Climax releases the plateau entirely.
    pub fn reset_after_climax(&mut self) {
        self.edge_pressure = 0.0;
        self.edge_count = 0;
        self.is_on_edge = false;
    }
}
