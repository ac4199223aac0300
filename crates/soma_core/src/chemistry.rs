//! Neurochemical levels.
//!
//! Five bounded channels, each with its own baseline and homeostatic pull
//! rate. Cortisol and adrenaline sit below the midpoint at rest and snap back
//! fastest; oxytocin drifts home slowest.

use crate::dynamics::{self, sanitize_f32, DecayRates};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neurochemicals {
    /// Reward/motivation (0-100, baseline 50).
    pub dopamine: f32,
    /// Bonding/trust (0-100, baseline 50).
    pub oxytocin: f32,
    /// Pleasure and pain relief (0-100, baseline 50).
    pub endorphins: f32,
    /// Stress (0-100, baseline 30).
    pub cortisol: f32,
    /// Excitement/alarm (0-100, baseline 20).
    pub adrenaline: f32,
}

impl Default for Neurochemicals {
    fn default() -> Self {
        Self {
            dopamine: 50.0,
            oxytocin: 50.0,
            endorphins: 50.0,
            cortisol: 30.0,
            adrenaline: 20.0,
        }
    }
}

impl Neurochemicals {
    pub fn normalize(&mut self) {
        self.dopamine = sanitize_f32(self.dopamine, 50.0).clamp(0.0, 100.0);
        self.oxytocin = sanitize_f32(self.oxytocin, 50.0).clamp(0.0, 100.0);
        self.endorphins = sanitize_f32(self.endorphins, 50.0).clamp(0.0, 100.0);
        self.cortisol = sanitize_f32(self.cortisol, 30.0).clamp(0.0, 100.0);
        self.adrenaline = sanitize_f32(self.adrenaline, 20.0).clamp(0.0, 100.0);
    }

    /// Pull every channel toward its baseline over `t` reference ticks.
    pub fn settle(&mut self, rates: &DecayRates, t: f32) {
        self.dopamine = dynamics::pull(self.dopamine, 50.0, rates.dopamine_pull, t);
        self.oxytocin = dynamics::pull(self.oxytocin, 50.0, rates.oxytocin_pull, t);
        self.endorphins = dynamics::pull(self.endorphins, 50.0, rates.endorphins_pull, t);
        self.cortisol = dynamics::pull(self.cortisol, 30.0, rates.cortisol_pull, t);
        self.adrenaline = dynamics::pull(self.adrenaline, 20.0, rates.adrenaline_pull, t);
        self.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baselines() {
        let chems = Neurochemicals::default();
        assert_eq!(chems.dopamine, 50.0);
        assert_eq!(chems.cortisol, 30.0);
        assert_eq!(chems.adrenaline, 20.0);
    }

    #[test]
    fn test_settle_pulls_toward_distinct_baselines() {
        let mut chems = Neurochemicals {
            dopamine: 100.0,
            oxytocin: 100.0,
            endorphins: 100.0,
            cortisol: 100.0,
            adrenaline: 100.0,
        };
        let rates = DecayRates::default();
        for _ in 0..200 {
            chems.settle(&rates, 1.0);
        }
        assert!((chems.dopamine - 50.0).abs() < 0.5);
        assert!((chems.cortisol - 30.0).abs() < 0.5);
        assert!((chems.adrenaline - 20.0).abs() < 0.5);
    }

    #[test]
    fn test_adrenaline_settles_faster_than_oxytocin() {
        let mut chems = Neurochemicals {
            oxytocin: 100.0,
            adrenaline: 100.0,
            ..Default::default()
        };
        chems.settle(&DecayRates::default(), 1.0);
        let oxytocin_progress = (100.0 - chems.oxytocin) / 50.0;
        let adrenaline_progress = (100.0 - chems.adrenaline) / 80.0;
        assert!(
            adrenaline_progress > oxytocin_progress,
            "adrenaline {} vs oxytocin {}",
            chems.adrenaline,
            chems.oxytocin
        );
    }

    #[test]
    fn test_normalize_recovers_from_nan() {
        let mut chems = Neurochemicals::default();
        chems.dopamine = f32::NAN;
        chems.cortisol = f32::INFINITY;
        chems.normalize();
        assert_eq!(chems.dopamine, 50.0);
        assert_eq!(chems.cortisol, 30.0);
    }
}
