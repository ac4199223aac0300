//! Climax buildup state machine.
//!
//! States: Building -> PointOfNoReturn -> Climax -> recovery waves ->
//! Baseline, with the refractory period overlapping the tail. The buildup
//! integrators run on every tick; the PNR latch is monotonic within an
//! episode and only an actual climax clears it.

use crate::dynamics::{self, sanitize_f32, DecayRates};
use serde::{Deserialize, Serialize};

/// Arousal at or above this accumulates time-at-high-arousal.
pub const HIGH_AROUSAL_THRESHOLD: f32 = 85.0;
/// Orgasmic pressure that latches the imminent warning.
pub const IMMINENT_PRESSURE: f32 = 75.0;
/// Orgasmic pressure that latches the point of no return on its own.
const PNR_PRESSURE: f32 = 85.0;
/// Seconds within which a second climax counts as multi-orgasmic.
const MULTI_CLIMAX_WINDOW_SECS: f64 = 300.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimaxState {
    /// Nonnegative accumulator of sustained pleasure. Unbounded.
    pub cumulative_pleasure: f32,
    /// Derived proximity metric, 0-100.
    pub orgasmic_pressure: f32,
    /// Seconds spent at or above 85 arousal.
    pub time_at_high_arousal: f64,
    /// Irreversible commitment flag. Cleared only by climax.
    pub point_of_no_return: bool,
    /// Seconds-since-session-start when PNR was crossed.
    pub pnr_time: Option<f64>,
    /// Seconds-since-session-start of the last climax.
    pub last_climax_time: Option<f64>,
    /// Monotonic non-decreasing within a session.
    pub climax_count: u32,
    /// Post-climax suppressor, 0-100, decaying.
    pub refractory_intensity: f32,
    pub can_climax_again: bool,
    /// Latched once orgasmic pressure first exceeds 75.
    pub imminent_warning: bool,
}

impl Default for ClimaxState {
    fn default() -> Self {
        Self {
            cumulative_pleasure: 0.0,
            orgasmic_pressure: 0.0,
            time_at_high_arousal: 0.0,
            point_of_no_return: false,
            pnr_time: None,
            last_climax_time: None,
            climax_count: 0,
            refractory_intensity: 0.0,
            can_climax_again: true,
            imminent_warning: false,
        }
    }
}

impl ClimaxState {
    pub fn normalize(&mut self) {
        self.cumulative_pleasure = sanitize_f32(self.cumulative_pleasure, 0.0).max(0.0);
        self.orgasmic_pressure = sanitize_f32(self.orgasmic_pressure, 0.0).clamp(0.0, 100.0);
        self.refractory_intensity =
            sanitize_f32(self.refractory_intensity, 0.0).clamp(0.0, 100.0);
        if !self.time_at_high_arousal.is_finite() || self.time_at_high_arousal < 0.0 {
            self.time_at_high_arousal = 0.0;
        }
    }

    /// Advance the buildup integrators by `dt_secs` and re-evaluate the
    /// latches. Returns true when the automatic trigger is due and the
    /// caller must fire a climax.
    pub fn integrate(
        &mut self,
        arousal: f32,
        pleasure: f32,
        dt_secs: f64,
        now: f64,
        rates: &DecayRates,
    ) -> bool {
        // Time at high arousal builds in real time and unwinds at half rate.
        if arousal >= HIGH_AROUSAL_THRESHOLD {
            self.time_at_high_arousal += dt_secs;
        } else {
            self.time_at_high_arousal = (self.time_at_high_arousal - dt_secs * 0.5).max(0.0);
        }

        // Cumulative pleasure builds only while arousal and pleasure are both
        // high; otherwise it leaks away.
        if arousal > 70.0 && pleasure > 60.0 {
            self.cumulative_pleasure +=
                (arousal / 100.0) * (pleasure / 100.0) * dt_secs as f32 * 3.0;
        } else {
            self.cumulative_pleasure = dynamics::decay(
                self.cumulative_pleasure,
                rates.cumulative_pleasure,
                dynamics::ticks(dt_secs),
            );
        }

        self.orgasmic_pressure = self.pressure_from_components(arousal);

        if !self.imminent_warning && self.orgasmic_pressure > IMMINENT_PRESSURE {
            self.imminent_warning = true;
            tracing::info!(
                pressure = self.orgasmic_pressure,
                "climax imminent warning latched"
            );
        }

        if !self.point_of_no_return {
            let sustained = arousal > 90.0
                && self.cumulative_pleasure > 80.0
                && self.time_at_high_arousal > 15.0;
            let overpressure = self.orgasmic_pressure > PNR_PRESSURE;
            if sustained || overpressure {
                self.point_of_no_return = true;
                self.pnr_time = Some(now);
                tracing::info!("point of no return crossed, climax inevitable in 20-40s");
            }
        }

        self.normalize();
        self.trigger_due(now)
    }

    fn pressure_from_components(&self, arousal: f32) -> f32 {
        let from_pleasure = (self.cumulative_pleasure / 10.0).min(100.0);
        let from_duration = (self.time_at_high_arousal as f32 * 2.0).min(100.0);
        let from_arousal = (arousal - 70.0).max(0.0);
        from_pleasure * 0.4 + from_duration * 0.3 + from_arousal * 0.3
    }

    /// Seconds after the PNR crossing at which the climax fires, given the
    /// current pressure. Higher pressure fires sooner: 20s at pressure 100,
    /// bounded by 40s as pressure approaches zero.
    pub fn trigger_window_secs(&self) -> f64 {
        20.0 + (1.0 - f64::from(self.orgasmic_pressure) / 100.0) * 20.0
    }

    /// Whether the automatic trigger is due. Recomputed from the current
    /// pressure every tick, not the pressure at crossing time.
    pub fn trigger_due(&self, now: f64) -> bool {
        match (self.point_of_no_return, self.pnr_time) {
            (true, Some(crossed)) => now - crossed >= self.trigger_window_secs(),
            _ => false,
        }
    }

    /// Intensity of a climax fired right now.
    pub fn climax_intensity(&self, arousal: f32) -> f32 {
        ((self.cumulative_pleasure / 100.0) * 40.0
            + (self.time_at_high_arousal as f32 / 30.0) * 30.0
            + arousal * 0.3)
            .min(100.0)
    }

    /// Record a climax: bump the count, reset the integrators and latches,
    /// and enter the refractory period. A repeat climax within 300 seconds
    /// gets a shortened refractory (multi-orgasmic discount).
    pub fn record_climax(&mut self, intensity: f32, now: f64) {
        let since_previous = self.last_climax_time.map(|t| now - t);

        self.climax_count += 1;
        self.last_climax_time = Some(now);
        self.cumulative_pleasure = 0.0;
        self.time_at_high_arousal = 0.0;
        self.orgasmic_pressure = 0.0;
        self.point_of_no_return = false;
        self.pnr_time = None;
        self.imminent_warning = false;

        self.refractory_intensity = (intensity * 1.2).min(100.0);
        self.can_climax_again = false;

        if self.climax_count > 1 {
            if let Some(gap) = since_previous {
                if gap < MULTI_CLIMAX_WINDOW_SECS {
                    self.refractory_intensity *= 0.7;
                    tracing::info!(
                        count = self.climax_count,
                        gap_secs = gap,
                        "repeat climax, refractory shortened"
                    );
                }
            }
        }
        self.normalize();
    }

    /// Refractory decay over `t` reference ticks. Returns the arousal damping
    /// factor the caller must apply while the refractory is strong.
    pub fn settle(&mut self, rates: &DecayRates, t: f32) -> f32 {
        if self.refractory_intensity <= 0.0 {
            return 1.0;
        }
        self.refractory_intensity =
            dynamics::decay(self.refractory_intensity, rates.refractory, t);

        if self.refractory_intensity < 20.0 {
            self.can_climax_again = true;
        }
        self.normalize();

        if self.refractory_intensity > 30.0 {
            rates.refractory_arousal_damp.powf(t)
        } else {
            1.0
        }
    }

    /// Seconds since the last climax, if one has happened.
    pub fn secs_since_last_climax(&self, now: f64) -> Option<f64> {
        self.last_climax_time.map(|t| now - t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> DecayRates {
        DecayRates::default()
    }

    #[test]
    fn test_high_arousal_time_accumulates() {
        let mut c = ClimaxState::default();
        c.integrate(90.0, 0.0, 5.0, 5.0, &rates());
        assert!((c.time_at_high_arousal - 5.0).abs() < 1e-9);

        // Below threshold it unwinds at half rate.
        c.integrate(50.0, 0.0, 4.0, 9.0, &rates());
        assert!((c.time_at_high_arousal - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_cumulative_pleasure_requires_both_channels_high() {
        let mut c = ClimaxState::default();
        c.integrate(80.0, 50.0, 5.0, 5.0, &rates());
        assert_eq!(c.cumulative_pleasure, 0.0, "pleasure too low to build");

        c.integrate(80.0, 80.0, 5.0, 10.0, &rates());
        let expected = 0.8 * 0.8 * 5.0 * 3.0;
        assert!((c.cumulative_pleasure - expected).abs() < 1e-3);
    }

    #[test]
    fn test_pressure_composition() {
        let mut c = ClimaxState {
            cumulative_pleasure: 500.0,
            time_at_high_arousal: 20.0,
            ..Default::default()
        };
        // dt=0 keeps the integrators still but refreshes pressure.
        c.integrate(90.0, 0.0, 0.0, 0.0, &rates());
        // 0.4*50 + 0.3*40 + 0.3*20 = 38
        assert!((c.orgasmic_pressure - 38.0).abs() < 1e-3, "{}", c.orgasmic_pressure);
    }

    #[test]
    fn test_pnr_latches_from_sustained_buildup() {
        let mut c = ClimaxState {
            cumulative_pleasure: 3000.0,
            time_at_high_arousal: 60.0,
            ..Default::default()
        };
        c.integrate(95.0, 90.0, 1.0, 100.0, &rates());
        assert!(c.point_of_no_return);
        assert_eq!(c.pnr_time, Some(100.0));
        assert!(c.imminent_warning, "pressure {} should latch warning", c.orgasmic_pressure);
    }

    #[test]
    fn test_pnr_is_monotonic_until_climax() {
        let mut c = ClimaxState {
            cumulative_pleasure: 3000.0,
            time_at_high_arousal: 60.0,
            ..Default::default()
        };
        c.integrate(95.0, 90.0, 1.0, 0.0, &rates());
        assert!(c.point_of_no_return);

        // Arousal collapsing does not clear the latch.
        for i in 1..10 {
            c.integrate(0.0, -50.0, 1.0, f64::from(i), &rates());
            assert!(c.point_of_no_return, "PNR must stay latched");
        }

        c.record_climax(80.0, 20.0);
        assert!(!c.point_of_no_return);
    }

    #[test]
    fn test_trigger_window_shrinks_with_pressure() {
        let mut c = ClimaxState::default();
        c.orgasmic_pressure = 100.0;
        assert!((c.trigger_window_secs() - 20.0).abs() < 1e-9);
        c.orgasmic_pressure = 0.0;
        assert!((c.trigger_window_secs() - 40.0).abs() < 1e-9);
        c.orgasmic_pressure = 50.0;
        assert!((c.trigger_window_secs() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_trigger_due_only_after_window() {
        let mut c = ClimaxState {
            point_of_no_return: true,
            pnr_time: Some(100.0),
            orgasmic_pressure: 100.0,
            ..Default::default()
        };
        assert!(!c.trigger_due(119.0));
        assert!(c.trigger_due(120.0));
        c.point_of_no_return = false;
        assert!(!c.trigger_due(500.0), "no trigger without the latch");
    }

    #[test]
    fn test_climax_intensity_caps_at_100() {
        let c = ClimaxState {
            cumulative_pleasure: 10_000.0,
            time_at_high_arousal: 500.0,
            ..Default::default()
        };
        assert_eq!(c.climax_intensity(100.0), 100.0);
    }

    #[test]
    fn test_record_climax_resets_and_counts() {
        let mut c = ClimaxState {
            cumulative_pleasure: 400.0,
            time_at_high_arousal: 30.0,
            orgasmic_pressure: 90.0,
            point_of_no_return: true,
            pnr_time: Some(10.0),
            imminent_warning: true,
            ..Default::default()
        };
        c.record_climax(80.0, 50.0);

        assert_eq!(c.climax_count, 1);
        assert_eq!(c.cumulative_pleasure, 0.0);
        assert_eq!(c.time_at_high_arousal, 0.0);
        assert_eq!(c.orgasmic_pressure, 0.0);
        assert!(!c.point_of_no_return);
        assert!(!c.imminent_warning);
        assert!(!c.can_climax_again);
        assert!((c.refractory_intensity - 96.0).abs() < 1e-4);
    }

    #[test]
    fn test_multi_climax_discount_within_window() {
        let mut c = ClimaxState::default();
        c.record_climax(80.0, 100.0);
        c.record_climax(80.0, 200.0); // 100s later, inside the 300s window
        assert_eq!(c.climax_count, 2);
        let expected = (80.0 * 1.2_f32).min(100.0) * 0.7;
        assert!(
            (c.refractory_intensity - expected).abs() < 1e-4,
            "refractory {} expected {}",
            c.refractory_intensity,
            expected
        );
    }

    #[test]
    fn test_no_discount_outside_window() {
        let mut c = ClimaxState::default();
        c.record_climax(80.0, 100.0);
        c.record_climax(80.0, 500.0); // 400s later
        let expected = (80.0 * 1.2_f32).min(100.0);
        assert!((c.refractory_intensity - expected).abs() < 1e-4);
    }

    #[test]
    fn test_refractory_decay_restores_capability() {
        let mut c = ClimaxState::default();
        c.record_climax(90.0, 0.0);
        assert!(!c.can_climax_again);

        let r = rates();
        let mut damped = false;
        for _ in 0..200 {
            let damp = c.settle(&r, 1.0);
            if damp < 1.0 {
                damped = true;
            }
        }
        assert!(damped, "strong refractory should dampen arousal");
        assert!(c.can_climax_again);
        assert!(c.refractory_intensity < 20.0);
    }
}
