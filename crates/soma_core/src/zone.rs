//! Body zones and per-zone state.
//!
//! The zone set is fixed at 19 regions. A `ZoneMap` is always complete: every
//! zone has state from construction on, so a stimulus can never reference a
//! missing entry.

use crate::dynamics::{self, sanitize_f32, DecayRates};
use crate::error::SomaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the 19 trackable body regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyZone {
    Chest,
    Stomach,
    LowerBack,
    UpperBack,
    Arms,
    Hands,
    Legs,
    Feet,
    InnerThighs,
    Hips,
    Pelvis,
    Genitals,
    Neck,
    Shoulders,
    Ears,
    Face,
    Lips,
    Scalp,
    Hair,
}

/// Number of body zones. Fixed for the lifetime of a session.
pub const ZONE_COUNT: usize = 19;

impl BodyZone {
    /// Every zone, in declaration order. `ALL.len() == ZONE_COUNT`.
    pub const ALL: [BodyZone; ZONE_COUNT] = [
        BodyZone::Chest,
        BodyZone::Stomach,
        BodyZone::LowerBack,
        BodyZone::UpperBack,
        BodyZone::Arms,
        BodyZone::Hands,
        BodyZone::Legs,
        BodyZone::Feet,
        BodyZone::InnerThighs,
        BodyZone::Hips,
        BodyZone::Pelvis,
        BodyZone::Genitals,
        BodyZone::Neck,
        BodyZone::Shoulders,
        BodyZone::Ears,
        BodyZone::Face,
        BodyZone::Lips,
        BodyZone::Scalp,
        BodyZone::Hair,
    ];

    /// Stable wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyZone::Chest => "chest",
            BodyZone::Stomach => "stomach",
            BodyZone::LowerBack => "lower_back",
            BodyZone::UpperBack => "upper_back",
            BodyZone::Arms => "arms",
            BodyZone::Hands => "hands",
            BodyZone::Legs => "legs",
            BodyZone::Feet => "feet",
            BodyZone::InnerThighs => "inner_thighs",
            BodyZone::Hips => "hips",
            BodyZone::Pelvis => "pelvis",
            BodyZone::Genitals => "genitals",
            BodyZone::Neck => "neck",
            BodyZone::Shoulders => "shoulders",
            BodyZone::Ears => "ears",
            BodyZone::Face => "face",
            BodyZone::Lips => "lips",
            BodyZone::Scalp => "scalp",
            BodyZone::Hair => "hair",
        }
    }

    /// Human-readable label ("inner thighs" rather than "inner_thighs").
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Zones whose arousal is partially carried along when this zone is
    /// touched. Returns an empty slice for zones with no neighbors.
    pub fn cascade_neighbors(self) -> &'static [BodyZone] {
        use BodyZone::*;
        match self {
            Neck => &[Shoulders, Ears, Chest],
            Chest => &[Stomach, Neck],
            Stomach => &[Chest, Hips],
            InnerThighs => &[Genitals, Hips, Pelvis],
            Hips => &[Pelvis, Stomach, InnerThighs],
            Ears => &[Neck, Face],
            Lips => &[Face, Neck],
            Genitals => &[InnerThighs, Pelvis],
            LowerBack => &[Hips, Pelvis],
            _ => &[],
        }
    }
}

impl fmt::Display for BodyZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyZone {
    type Err = SomaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BodyZone::ALL
            .iter()
            .copied()
            .find(|z| z.as_str() == s)
            .ok_or_else(|| SomaError::UnknownZone(s.to_string()))
    }
}

/// Mutable state of a single body zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneState {
    /// Local arousal (0-100).
    pub arousal: f32,
    /// Local sensitivity (0-100, baseline 50). Raised by cascade and by the
    /// post-climax hypersensitivity wave.
    pub sensitivity: f32,
    /// Local temperature offset (-50 to +50, 0 baseline).
    pub temperature: f32,
    /// Seconds-since-session-start of the last touch, if any.
    pub last_touched: Option<f64>,
    /// Fading memory of recent touch (0-100).
    pub touch_memory: f32,
    /// Cumulative stimulation. Unbounded, decays toward zero.
    pub stimulation: f32,
}

impl Default for ZoneState {
    fn default() -> Self {
        Self {
            arousal: 0.0,
            sensitivity: 50.0,
            temperature: 0.0,
            last_touched: None,
            touch_memory: 0.0,
            stimulation: 0.0,
        }
    }
}

impl ZoneState {
    /// Clamp all channels to their valid ranges.
    pub fn normalize(&mut self) {
        self.arousal = sanitize_f32(self.arousal, 0.0).clamp(0.0, 100.0);
        self.sensitivity = sanitize_f32(self.sensitivity, 50.0).clamp(0.0, 100.0);
        self.temperature = sanitize_f32(self.temperature, 0.0).clamp(-50.0, 50.0);
        self.touch_memory = sanitize_f32(self.touch_memory, 0.0).clamp(0.0, 100.0);
        self.stimulation = sanitize_f32(self.stimulation, 0.0).max(0.0);
    }

    /// One homeostasis step over `t` reference ticks.
    pub fn settle(&mut self, rates: &DecayRates, t: f32) {
        self.arousal = dynamics::decay(self.arousal, rates.zone_arousal, t);
        self.touch_memory = dynamics::decay(self.touch_memory, rates.zone_touch_memory, t);
        self.temperature = dynamics::decay(self.temperature, rates.zone_temperature, t);
        self.stimulation = dynamics::decay(self.stimulation, rates.zone_stimulation, t);
        self.sensitivity = dynamics::pull(self.sensitivity, 50.0, rates.zone_sensitivity_pull, t);
        self.normalize();
    }
}

/// Complete map from every body zone to its state.
#[derive(Debug, Clone)]
pub struct ZoneMap {
    zones: [ZoneState; ZONE_COUNT],
}

impl Default for ZoneMap {
    fn default() -> Self {
        Self {
            zones: std::array::from_fn(|_| ZoneState::default()),
        }
    }
}

impl ZoneMap {
    pub fn get(&self, zone: BodyZone) -> &ZoneState {
        &self.zones[zone.index()]
    }

    pub fn get_mut(&mut self, zone: BodyZone) -> &mut ZoneState {
        &mut self.zones[zone.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyZone, &ZoneState)> {
        BodyZone::ALL.iter().map(move |z| (*z, self.get(*z)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyZone, &mut ZoneState)> {
        BodyZone::ALL.into_iter().zip(self.zones.iter_mut())
    }

    /// Mean arousal across all 19 zones.
    pub fn global_arousal(&self) -> f32 {
        let total: f32 = self.zones.iter().map(|z| z.arousal).sum();
        total / ZONE_COUNT as f32
    }

    /// Zones whose local arousal exceeds `threshold`, in declaration order.
    pub fn zones_above(&self, threshold: f32) -> Vec<BodyZone> {
        self.iter()
            .filter(|(_, s)| s.arousal > threshold)
            .map(|(z, _)| z)
            .collect()
    }

    /// One homeostasis step for every zone.
    pub fn settle(&mut self, rates: &DecayRates, t: f32) {
        for state in self.zones.iter_mut() {
            state.settle(rates, t);
        }
    }

    pub fn normalize(&mut self) {
        for state in self.zones.iter_mut() {
            state.normalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_zones_present() {
        let map = ZoneMap::default();
        assert_eq!(BodyZone::ALL.len(), ZONE_COUNT);
        for zone in BodyZone::ALL {
            let state = map.get(zone);
            assert_eq!(state.sensitivity, 50.0, "{} baseline sensitivity", zone);
            assert_eq!(state.arousal, 0.0);
        }
    }

    #[test]
    fn test_from_str_round_trip() {
        for zone in BodyZone::ALL {
            let parsed: BodyZone = zone.as_str().parse().unwrap();
            assert_eq!(parsed, zone);
        }
    }

    #[test]
    fn test_from_str_unknown_zone() {
        let err = "antenna".parse::<BodyZone>().unwrap_err();
        assert_eq!(err, SomaError::UnknownZone("antenna".to_string()));
    }

    #[test]
    fn test_cascade_table() {
        assert_eq!(
            BodyZone::Neck.cascade_neighbors(),
            &[BodyZone::Shoulders, BodyZone::Ears, BodyZone::Chest]
        );
        assert_eq!(
            BodyZone::InnerThighs.cascade_neighbors(),
            &[BodyZone::Genitals, BodyZone::Hips, BodyZone::Pelvis]
        );
        assert!(BodyZone::Hair.cascade_neighbors().is_empty());
    }

    #[test]
    fn test_cascade_targets_are_valid() {
        // Every cascade target must itself be a member of the fixed set.
        for zone in BodyZone::ALL {
            for neighbor in zone.cascade_neighbors() {
                assert!(BodyZone::ALL.contains(neighbor));
                assert_ne!(*neighbor, zone, "{} cascades to itself", zone);
            }
        }
    }

    #[test]
    fn test_global_arousal_is_mean() {
        let mut map = ZoneMap::default();
        map.get_mut(BodyZone::Neck).arousal = 95.0;
        let expected = 95.0 / ZONE_COUNT as f32;
        assert!((map.global_arousal() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_settle_decays_toward_baseline() {
        let mut map = ZoneMap::default();
        {
            let neck = map.get_mut(BodyZone::Neck);
            neck.arousal = 80.0;
            neck.sensitivity = 90.0;
            neck.temperature = 20.0;
            neck.stimulation = 120.0;
        }
        let rates = DecayRates::default();
        map.settle(&rates, 1.0);

        let neck = map.get(BodyZone::Neck);
        assert!((neck.arousal - 76.0).abs() < 1e-3);
        assert!(neck.sensitivity < 90.0 && neck.sensitivity > 50.0);
        assert!(neck.temperature < 20.0);
        assert!(neck.stimulation < 120.0);
    }

    #[test]
    fn test_settle_zero_ticks_is_noop() {
        let mut map = ZoneMap::default();
        map.get_mut(BodyZone::Lips).arousal = 33.0;
        let before = map.get(BodyZone::Lips).clone();
        map.settle(&DecayRates::default(), 0.0);
        let after = map.get(BodyZone::Lips);
        assert_eq!(before.arousal, after.arousal);
        assert_eq!(before.sensitivity, after.sensitivity);
    }

    #[test]
    fn test_normalize_clamps() {
        let mut state = ZoneState {
            arousal: 250.0,
            sensitivity: -10.0,
            temperature: 90.0,
            last_touched: None,
            touch_memory: f32::NAN,
            stimulation: -5.0,
        };
        state.normalize();
        assert_eq!(state.arousal, 100.0);
        assert_eq!(state.sensitivity, 0.0);
        assert_eq!(state.temperature, 50.0);
        assert_eq!(state.touch_memory, 0.0);
        assert_eq!(state.stimulation, 0.0);
    }

    #[test]
    fn test_zones_above() {
        let mut map = ZoneMap::default();
        map.get_mut(BodyZone::Neck).arousal = 70.0;
        map.get_mut(BodyZone::Lips).arousal = 61.0;
        let hot = map.zones_above(60.0);
        assert_eq!(hot, vec![BodyZone::Neck, BodyZone::Lips]);
    }
}
