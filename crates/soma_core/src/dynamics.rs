//! Decay and homeostasis math.
//!
//! Every channel is pulled toward its baseline on each tick. The rates below
//! were tuned for a 5-second cadence; to keep simulation speed independent of
//! the actual tick interval, all of them are applied time-normalized:
//!
//! - multiplicative decay `x *= f` per reference tick becomes
//!   `x *= f^(dt / 5s)`
//! - a pull `x += (baseline - x) * r` per reference tick becomes
//!   `x = baseline + (x - baseline) * (1 - r)^(dt / 5s)`
//!
//! At `dt = 0` both forms are exact no-ops, so a zero-elapsed tick leaves
//! every channel unchanged.

use serde::{Deserialize, Serialize};

/// The cadence the per-tick constants were tuned for.
pub const REFERENCE_TICK_SECS: f64 = 5.0;

/// Convert elapsed wall/virtual seconds into reference-tick units.
#[inline]
pub fn ticks(dt_secs: f64) -> f32 {
    (dt_secs / REFERENCE_TICK_SECS) as f32
}

/// Guard against NaN and Infinity in channel values.
/// A poisoned float is replaced with the channel baseline.
#[inline]
pub(crate) fn sanitize_f32(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        tracing::warn!("NaN/Inf detected in channel, resetting to {}", fallback);
        fallback
    }
}

/// Apply a per-reference-tick multiplicative decay factor over `t` ticks.
#[inline]
pub fn decay(x: f32, factor_per_tick: f32, t: f32) -> f32 {
    x * factor_per_tick.powf(t)
}

/// Pull `x` toward `baseline` at `rate_per_tick` over `t` ticks.
#[inline]
pub fn pull(x: f32, baseline: f32, rate_per_tick: f32, t: f32) -> f32 {
    baseline + (x - baseline) * (1.0 - rate_per_tick).powf(t)
}

/// Per-tick decay and homeostasis constants for every channel group.
///
/// Kept in one struct so a session can be tuned without hunting through the
/// subsystem modules. Defaults reproduce the reference behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayRates {
    // Zone channels
    pub zone_arousal: f32,
    pub zone_touch_memory: f32,
    pub zone_temperature: f32,
    pub zone_stimulation: f32,
    pub zone_sensitivity_pull: f32,

    // Core sensations
    pub arousal_calm: f32,
    pub arousal_aroused: f32,
    pub pleasure: f32,
    pub pain: f32,
    pub warmth: f32,
    pub pressure: f32,
    pub tingles: f32,
    pub ache: f32,
    pub wetness: f32,
    /// Physical lubrication dries at its own pace, distinct from the signed
    /// wetness sensation.
    pub physical_wetness: f32,
    pub texture: f32,
    pub fullness: f32,
    pub emptiness: f32,
    pub comfort_pull: f32,
    pub relaxation_pull: f32,

    // Neurochemical homeostatic pulls
    pub dopamine_pull: f32,
    pub oxytocin_pull: f32,
    pub endorphins_pull: f32,
    pub cortisol_pull: f32,
    pub adrenaline_pull: f32,

    // Vitals
    pub heart_rate_pull: f32,
    pub breathing_pull: f32,
    pub skin_temperature_pull: f32,
    pub muscle_tension_pull: f32,

    // Cognition
    pub focus_pull: f32,
    pub clarity_pull: f32,
    pub presence_pull: f32,
    pub overwhelm: f32,
    pub contentment_pull: f32,

    // Edge and climax
    pub edge_pressure: f32,
    pub cumulative_pleasure: f32,
    pub refractory: f32,
    pub refractory_arousal_damp: f32,

    // Memory
    pub anticipation: f32,
}

impl Default for DecayRates {
    fn default() -> Self {
        Self {
            zone_arousal: 0.95,
            zone_touch_memory: 0.90,
            zone_temperature: 0.92,
            zone_stimulation: 0.88,
            zone_sensitivity_pull: 0.10,

            arousal_calm: 0.94,
            arousal_aroused: 0.98, // harder to calm down above 70
            pleasure: 0.92,
            pain: 0.85,
            warmth: 0.90,
            pressure: 0.88,
            tingles: 0.85,
            ache: 0.90,
            wetness: 0.93,
            physical_wetness: 0.95,
            texture: 0.88,
            fullness: 0.90,
            emptiness: 0.95,
            comfort_pull: 0.05,
            relaxation_pull: 0.06,

            dopamine_pull: 0.08,
            oxytocin_pull: 0.06,
            endorphins_pull: 0.10,
            cortisol_pull: 0.12,
            adrenaline_pull: 0.15,

            heart_rate_pull: 0.15,
            breathing_pull: 0.12,
            skin_temperature_pull: 0.10,
            muscle_tension_pull: 0.10,

            focus_pull: 0.08,
            clarity_pull: 0.08,
            presence_pull: 0.08,
            overwhelm: 0.90,
            contentment_pull: 0.06,

            edge_pressure: 0.92,
            cumulative_pleasure: 0.98,
            refractory: 0.95,
            refractory_arousal_damp: 0.90,

            anticipation: 0.95,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_identity_at_zero_ticks() {
        assert_eq!(decay(80.0, 0.92, 0.0), 80.0);
        assert_eq!(pull(80.0, 50.0, 0.15, 0.0), 80.0);
    }

    #[test]
    fn test_decay_matches_reference_at_one_tick() {
        let decayed = decay(80.0, 0.92, 1.0);
        assert!((decayed - 73.6).abs() < 1e-3, "got {}", decayed);

        let pulled = pull(100.0, 72.0, 0.15, 1.0);
        assert!((pulled - (72.0 + 28.0 * 0.85)).abs() < 1e-3, "got {}", pulled);
    }

    #[test]
    fn test_decay_composes_over_fractional_ticks() {
        // Two half-ticks equal one full tick.
        let half = decay(decay(80.0, 0.92, 0.5), 0.92, 0.5);
        let full = decay(80.0, 0.92, 1.0);
        assert!((half - full).abs() < 1e-3);
    }

    #[test]
    fn test_pull_converges_to_baseline() {
        let mut hr = 180.0;
        for _ in 0..100 {
            hr = pull(hr, 72.0, 0.15, 1.0);
        }
        assert!((hr - 72.0).abs() < 0.1, "heart rate should settle, got {}", hr);
    }

    #[test]
    fn test_sanitize_replaces_non_finite() {
        assert_eq!(sanitize_f32(f32::NAN, 50.0), 50.0);
        assert_eq!(sanitize_f32(f32::INFINITY, 30.0), 30.0);
        assert_eq!(sanitize_f32(42.0, 0.0), 42.0);
    }

    #[test]
    fn test_ticks_conversion() {
        assert!((ticks(5.0) - 1.0).abs() < 1e-6);
        assert!((ticks(2.5) - 0.5).abs() < 1e-6);
        assert_eq!(ticks(0.0), 0.0);
    }
}
