//! Vital signs, clamped to physiologically plausible bounds.

use crate::dynamics::{self, sanitize_f32, DecayRates};
use serde::{Deserialize, Serialize};

/// Heart rate bounds (BPM).
pub const HEART_RATE_RANGE: (f32, f32) = (60.0, 180.0);
/// Breathing rate bounds (breaths/min).
pub const BREATHING_RANGE: (f32, f32) = (8.0, 40.0);
/// Skin temperature bounds (degrees C).
pub const SKIN_TEMP_RANGE: (f32, f32) = (30.0, 40.0);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    /// BPM, baseline 72.
    pub heart_rate: f32,
    /// Breaths per minute, baseline 16.
    pub breathing_rate: f32,
    /// Degrees C, baseline 33.
    pub skin_temperature: f32,
    /// 0-100, baseline 30.
    pub muscle_tension: f32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            heart_rate: 72.0,
            breathing_rate: 16.0,
            skin_temperature: 33.0,
            muscle_tension: 30.0,
        }
    }
}

impl Vitals {
    pub fn normalize(&mut self) {
        self.heart_rate =
            sanitize_f32(self.heart_rate, 72.0).clamp(HEART_RATE_RANGE.0, HEART_RATE_RANGE.1);
        self.breathing_rate =
            sanitize_f32(self.breathing_rate, 16.0).clamp(BREATHING_RANGE.0, BREATHING_RANGE.1);
        self.skin_temperature =
            sanitize_f32(self.skin_temperature, 33.0).clamp(SKIN_TEMP_RANGE.0, SKIN_TEMP_RANGE.1);
        self.muscle_tension = sanitize_f32(self.muscle_tension, 30.0).clamp(0.0, 100.0);
    }

    /// Recovery toward baseline over `t` reference ticks.
    pub fn settle(&mut self, rates: &DecayRates, t: f32) {
        self.heart_rate = dynamics::pull(self.heart_rate, 72.0, rates.heart_rate_pull, t);
        self.breathing_rate = dynamics::pull(self.breathing_rate, 16.0, rates.breathing_pull, t);
        self.skin_temperature =
            dynamics::pull(self.skin_temperature, 33.0, rates.skin_temperature_pull, t);
        self.muscle_tension =
            dynamics::pull(self.muscle_tension, 30.0, rates.muscle_tension_pull, t);
        self.normalize();
    }
}
