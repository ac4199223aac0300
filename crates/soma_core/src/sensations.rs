//! Whole-body core sensations.
//!
//! Pleasure, wetness, texture and comfort are signed: the negative half of
//! each range is displeasure, dryness, roughness, discomfort. Arousal decays
//! more slowly above 70 (it is harder to calm down once worked up).

use crate::dynamics::{self, sanitize_f32, DecayRates};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreSensations {
    /// Global arousal (0-100).
    pub arousal: f32,
    /// Signed pleasure (-100 to +100).
    pub pleasure: f32,
    /// Pain (0-100).
    pub pain: f32,
    /// Whole-body sensitivity (0-100, baseline 50).
    pub sensitivity: f32,
    /// Warmth offset (-50 to +50).
    pub warmth: f32,
    /// Pressure (0-100).
    pub pressure: f32,
    /// Surface tingling (0-100).
    pub tingles: f32,
    /// Deep ache (0-100).
    pub ache: f32,
    /// Signed wetness (-100 dry discomfort to +100 pleasantly wet).
    pub wetness: f32,
    /// Signed texture quality (-100 rough to +100 smooth).
    pub texture: f32,
    /// Internal fullness (0-100).
    pub fullness: f32,
    /// Yearning for contact (0-100, baseline 30).
    pub emptiness: f32,
    /// Signed comfort (-100 to +100, baseline 50).
    pub comfort: f32,
    /// Relaxation (0-100, baseline 60).
    pub relaxation: f32,
}

impl Default for CoreSensations {
    fn default() -> Self {
        Self {
            arousal: 0.0,
            pleasure: 0.0,
            pain: 0.0,
            sensitivity: 50.0,
            warmth: 0.0,
            pressure: 0.0,
            tingles: 0.0,
            ache: 0.0,
            wetness: 0.0,
            texture: 0.0,
            fullness: 0.0,
            emptiness: 30.0,
            comfort: 50.0,
            relaxation: 60.0,
        }
    }
}

impl CoreSensations {
    pub fn normalize(&mut self) {
        self.arousal = sanitize_f32(self.arousal, 0.0).clamp(0.0, 100.0);
        self.pleasure = sanitize_f32(self.pleasure, 0.0).clamp(-100.0, 100.0);
        self.pain = sanitize_f32(self.pain, 0.0).clamp(0.0, 100.0);
        self.sensitivity = sanitize_f32(self.sensitivity, 50.0).clamp(0.0, 100.0);
        self.warmth = sanitize_f32(self.warmth, 0.0).clamp(-50.0, 50.0);
        self.pressure = sanitize_f32(self.pressure, 0.0).clamp(0.0, 100.0);
        self.tingles = sanitize_f32(self.tingles, 0.0).clamp(0.0, 100.0);
        self.ache = sanitize_f32(self.ache, 0.0).clamp(0.0, 100.0);
        self.wetness = sanitize_f32(self.wetness, 0.0).clamp(-100.0, 100.0);
        self.texture = sanitize_f32(self.texture, 0.0).clamp(-100.0, 100.0);
        self.fullness = sanitize_f32(self.fullness, 0.0).clamp(0.0, 100.0);
        self.emptiness = sanitize_f32(self.emptiness, 30.0).clamp(0.0, 100.0);
        self.comfort = sanitize_f32(self.comfort, 50.0).clamp(-100.0, 100.0);
        self.relaxation = sanitize_f32(self.relaxation, 60.0).clamp(0.0, 100.0);
    }

    /// Decay pass over `t` reference ticks.
    pub fn settle(&mut self, rates: &DecayRates, t: f32) {
        let arousal_factor = if self.arousal > 70.0 {
            rates.arousal_aroused
        } else {
            rates.arousal_calm
        };
        self.arousal = dynamics::decay(self.arousal, arousal_factor, t);
        self.pleasure = dynamics::decay(self.pleasure, rates.pleasure, t);
        self.pain = dynamics::decay(self.pain, rates.pain, t);
        self.warmth = dynamics::decay(self.warmth, rates.warmth, t);
        self.pressure = dynamics::decay(self.pressure, rates.pressure, t);
        self.tingles = dynamics::decay(self.tingles, rates.tingles, t);
        self.ache = dynamics::decay(self.ache, rates.ache, t);
        self.wetness = dynamics::decay(self.wetness, rates.wetness, t);
        self.texture = dynamics::decay(self.texture, rates.texture, t);
        self.fullness = dynamics::decay(self.fullness, rates.fullness, t);
        self.emptiness = dynamics::decay(self.emptiness, rates.emptiness, t);
        self.comfort = dynamics::pull(self.comfort, 50.0, rates.comfort_pull, t);
        self.relaxation = dynamics::pull(self.relaxation, 60.0, rates.relaxation_pull, t);
        self.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baselines() {
        let s = CoreSensations::default();
        assert_eq!(s.emptiness, 30.0);
        assert_eq!(s.comfort, 50.0);
        assert_eq!(s.relaxation, 60.0);
    }

    #[test]
    fn test_high_arousal_decays_slower() {
        let mut high = CoreSensations {
            arousal: 90.0,
            ..Default::default()
        };
        let mut low = CoreSensations {
            arousal: 50.0,
            ..Default::default()
        };
        let rates = DecayRates::default();
        high.settle(&rates, 1.0);
        low.settle(&rates, 1.0);

        let high_loss = 1.0 - high.arousal / 90.0;
        let low_loss = 1.0 - low.arousal / 50.0;
        assert!(
            high_loss < low_loss,
            "high arousal should shed a smaller fraction: {} vs {}",
            high_loss,
            low_loss
        );
    }

    #[test]
    fn test_negative_pleasure_fades_toward_zero() {
        let mut s = CoreSensations {
            pleasure: -80.0,
            ..Default::default()
        };
        for _ in 0..50 {
            s.settle(&DecayRates::default(), 1.0);
        }
        assert!(s.pleasure > -5.0 && s.pleasure <= 0.0, "pleasure {}", s.pleasure);
    }

    #[test]
    fn test_comfort_returns_to_baseline_not_zero() {
        let mut s = CoreSensations {
            comfort: -60.0,
            ..Default::default()
        };
        for _ in 0..200 {
            s.settle(&DecayRates::default(), 1.0);
        }
        assert!((s.comfort - 50.0).abs() < 1.0, "comfort {}", s.comfort);
    }

    #[test]
    fn test_normalize_clamps_signed_channels() {
        let mut s = CoreSensations::default();
        s.pleasure = 300.0;
        s.wetness = -500.0;
        s.warmth = -80.0;
        s.normalize();
        assert_eq!(s.pleasure, 100.0);
        assert_eq!(s.wetness, -100.0);
        assert_eq!(s.warmth, -50.0);
    }
}
