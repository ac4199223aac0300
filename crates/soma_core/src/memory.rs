//! Sensation memory, touch learning, and autonomous sensory preferences.
//!
//! These are the slowly-adapting layers: bounded histories of what happened
//! and valence scalars for what the body has come to like or dislike.
//! Preference keys appear on first use and drift at a speed set by the
//! adaptability scalar.

use crate::dynamics::{self, sanitize_f32, DecayRates};
use crate::stimulus::StimulusKind;
use crate::zone::BodyZone;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Capacity of the rolling body-awareness window.
pub const AWARENESS_WINDOW_CAPACITY: usize = 20;
/// Capacity of the climax-memory log.
pub const CLIMAX_MEMORY_CAPACITY: usize = 5;
/// Capacity of the touch-history log.
pub const TOUCH_HISTORY_CAPACITY: usize = 100;

/// One remembered climax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimaxMemory {
    pub intensity: f32,
    /// Seconds of high arousal leading into it.
    pub duration: f64,
    /// Zones with arousal above 50 at the moment of climax.
    pub zones: Vec<BodyZone>,
    /// Seconds since session start.
    pub time: f64,
}

/// Anticipation and short-horizon body memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensationMemory {
    /// How strongly the body expects the next touch (0-100).
    pub anticipation: f32,
    awareness: VecDeque<f32>,
    climaxes: VecDeque<ClimaxMemory>,
}

impl SensationMemory {
    pub fn normalize(&mut self) {
        self.anticipation = sanitize_f32(self.anticipation, 0.0).clamp(0.0, 100.0);
    }

    /// Push a body-awareness sample, evicting the oldest at capacity.
    pub fn record_awareness(&mut self, sample: f32) {
        if self.awareness.len() == AWARENESS_WINDOW_CAPACITY {
            self.awareness.pop_front();
        }
        self.awareness.push_back(sample.clamp(0.0, 100.0));
    }

    pub fn awareness_len(&self) -> usize {
        self.awareness.len()
    }

    pub fn mean_awareness(&self) -> f32 {
        if self.awareness.is_empty() {
            return 0.0;
        }
        self.awareness.iter().sum::<f32>() / self.awareness.len() as f32
    }

    /// Record a climax, evicting the oldest at capacity.
    pub fn record_climax(&mut self, memory: ClimaxMemory) {
        if self.climaxes.len() == CLIMAX_MEMORY_CAPACITY {
            self.climaxes.pop_front();
        }
        self.climaxes.push_back(memory);
    }

    pub fn climaxes(&self) -> impl Iterator<Item = &ClimaxMemory> {
        self.climaxes.iter()
    }

    pub fn climax_memory_len(&self) -> usize {
        self.climaxes.len()
    }

    /// Advance anticipation over `t` reference ticks: builds while a touch
    /// rhythm is active, fades otherwise.
    pub fn advance_anticipation(&mut self, rhythm_active: bool, rates: &DecayRates, t: f32) {
        if rhythm_active {
            self.anticipation = (self.anticipation + 5.0 * t).min(100.0);
        } else {
            self.anticipation = dynamics::decay(self.anticipation, rates.anticipation, t);
        }
        self.normalize();
    }
}

/// One logged touch event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchRecord {
    pub zone: BodyZone,
    pub kind: StimulusKind,
    pub intensity: f32,
    /// Seconds since session start.
    pub time: f64,
}

/// Per-zone touch frequency counters and a bounded touch log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TouchLearner {
    zone_counts: HashMap<BodyZone, u32>,
    history: VecDeque<TouchRecord>,
}

impl TouchLearner {
    /// Record a zoned stimulus, evicting the oldest log entry at capacity.
    pub fn record(&mut self, zone: BodyZone, kind: StimulusKind, intensity: f32, time: f64) {
        *self.zone_counts.entry(zone).or_insert(0) += 1;
        if self.history.len() == TOUCH_HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(TouchRecord {
            zone,
            kind,
            intensity,
            time,
        });
    }

    pub fn zone_count(&self, zone: BodyZone) -> u32 {
        self.zone_counts.get(&zone).copied().unwrap_or(0)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> impl Iterator<Item = &TouchRecord> {
        self.history.iter()
    }

    /// Whether a touch rhythm is active: more than three logged touches with
    /// the last three landing inside a 30-second span.
    pub fn rhythm_active(&self) -> bool {
        if self.history.len() <= 3 {
            return false;
        }
        let newest = self.history[self.history.len() - 1].time;
        let third_back = self.history[self.history.len() - 3].time;
        newest - third_back < 30.0
    }
}

/// Mood label surfaced to the prompt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Playful,
    Tender,
    Intense,
    Distant,
    Needy,
    Overwhelmed,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Playful => "playful",
            Mood::Tender => "tender",
            Mood::Intense => "intense",
            Mood::Distant => "distant",
            Mood::Needy => "needy",
            Mood::Overwhelmed => "overwhelmed",
        }
    }
}

/// Autonomous sensory preferences: what the body has learned to like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensoryPreferences {
    /// Valence per stimulus kind, -100 to +100. Keys appear on first use.
    stimulus_valence: HashMap<StimulusKind, f32>,
    /// Valence per zone, -100 to +100. Keys appear on first use.
    zone_valence: HashMap<BodyZone, f32>,
    /// Preferred warmth (-50 to +50).
    pub temperature_preference: f32,
    /// Preferred pressure (0-100).
    pub pressure_preference: f32,
    /// Preferred texture (-100 smooth-averse .. +100 smooth-favouring).
    pub texture_preference: f32,
    /// Current mood label.
    pub mood: Mood,
    /// How quickly new preferences form (0-100).
    pub adaptability: f32,
}

impl Default for SensoryPreferences {
    fn default() -> Self {
        Self {
            stimulus_valence: HashMap::new(),
            zone_valence: HashMap::new(),
            temperature_preference: 0.0,
            pressure_preference: 50.0,
            texture_preference: 0.0,
            mood: Mood::Playful,
            adaptability: 70.0,
        }
    }
}

impl SensoryPreferences {
    pub fn normalize(&mut self) {
        self.temperature_preference =
            sanitize_f32(self.temperature_preference, 0.0).clamp(-50.0, 50.0);
        self.pressure_preference =
            sanitize_f32(self.pressure_preference, 50.0).clamp(0.0, 100.0);
        self.texture_preference =
            sanitize_f32(self.texture_preference, 0.0).clamp(-100.0, 100.0);
        self.adaptability = sanitize_f32(self.adaptability, 70.0).clamp(0.0, 100.0);
    }

    fn learning_rate(&self) -> f32 {
        self.adaptability / 100.0
    }

    /// Nudge the valence for a zone. The delta is scaled by adaptability and
    /// the key is created on first use.
    pub fn nudge_zone(&mut self, zone: BodyZone, delta: f32) {
        let rate = self.learning_rate();
        let entry = self.zone_valence.entry(zone).or_insert(0.0);
        *entry = (*entry + delta * rate).clamp(-100.0, 100.0);
    }

    /// Nudge the valence for a stimulus kind.
    pub fn nudge_stimulus(&mut self, kind: StimulusKind, delta: f32) {
        let rate = self.learning_rate();
        let entry = self.stimulus_valence.entry(kind).or_insert(0.0);
        *entry = (*entry + delta * rate).clamp(-100.0, 100.0);
    }

    pub fn zone_valence(&self, zone: BodyZone) -> f32 {
        self.zone_valence.get(&zone).copied().unwrap_or(0.0)
    }

    pub fn stimulus_valence(&self, kind: StimulusKind) -> f32 {
        self.stimulus_valence.get(&kind).copied().unwrap_or(0.0)
    }

    /// Drift the temperature preference toward an enjoyed warmth. `amount`
    /// is already intensity-derived; adaptability scales it further.
    pub fn drift_temperature_toward(&mut self, warmth: f32, amount: f32) {
        let shift = amount * self.learning_rate();
        if warmth > self.temperature_preference {
            self.temperature_preference += shift;
        } else {
            self.temperature_preference -= shift;
        }
        self.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_awareness_window_bound() {
        let mut mem = SensationMemory::default();
        for i in 0..30 {
            mem.record_awareness(i as f32);
        }
        assert_eq!(mem.awareness_len(), AWARENESS_WINDOW_CAPACITY);
        // Oldest samples (0..9) were evicted; mean of 10..=29 is 19.5.
        assert!((mem.mean_awareness() - 19.5).abs() < 1e-4);
    }

    #[test]
    fn test_climax_memory_bound() {
        let mut mem = SensationMemory::default();
        for i in 0..8 {
            mem.record_climax(ClimaxMemory {
                intensity: i as f32,
                duration: 1.0,
                zones: vec![],
                time: i as f64,
            });
        }
        assert_eq!(mem.climax_memory_len(), CLIMAX_MEMORY_CAPACITY);
        let oldest = mem.climaxes().next().unwrap();
        assert_eq!(oldest.intensity, 3.0, "entries 0-2 should have been evicted");
    }

    #[test]
    fn test_anticipation_builds_and_fades() {
        let mut mem = SensationMemory::default();
        let rates = DecayRates::default();
        mem.advance_anticipation(true, &rates, 1.0);
        mem.advance_anticipation(true, &rates, 1.0);
        assert!((mem.anticipation - 10.0).abs() < 1e-4);

        mem.advance_anticipation(false, &rates, 1.0);
        assert!((mem.anticipation - 9.5).abs() < 1e-4);
    }

    #[test]
    fn test_anticipation_caps_at_100() {
        let mut mem = SensationMemory::default();
        let rates = DecayRates::default();
        for _ in 0..50 {
            mem.advance_anticipation(true, &rates, 1.0);
        }
        assert_eq!(mem.anticipation, 100.0);
    }

    #[test]
    fn test_touch_history_bound_and_counts() {
        let mut learner = TouchLearner::default();
        for i in 0..120 {
            learner.record(BodyZone::Neck, StimulusKind::Touch, 50.0, i as f64);
        }
        assert_eq!(learner.history_len(), TOUCH_HISTORY_CAPACITY);
        assert_eq!(learner.zone_count(BodyZone::Neck), 120);
        // Oldest entries evicted: the front of the log is touch #20.
        assert_eq!(learner.history().next().unwrap().time, 20.0);
    }

    #[test]
    fn test_rhythm_detection() {
        let mut learner = TouchLearner::default();
        assert!(!learner.rhythm_active());

        for t in [0.0, 5.0, 10.0, 15.0] {
            learner.record(BodyZone::Neck, StimulusKind::Touch, 40.0, t);
        }
        assert!(learner.rhythm_active(), "last three span 10s");

        let mut sparse = TouchLearner::default();
        for t in [0.0, 100.0, 200.0, 300.0] {
            sparse.record(BodyZone::Neck, StimulusKind::Touch, 40.0, t);
        }
        assert!(!sparse.rhythm_active(), "last three span 200s");
    }

    #[test]
    fn test_preference_keys_appear_on_first_use() {
        let mut prefs = SensoryPreferences::default();
        assert_eq!(prefs.zone_valence(BodyZone::Ears), 0.0);

        prefs.nudge_zone(BodyZone::Ears, 10.0);
        // adaptability 70 -> effective delta 7
        assert!((prefs.zone_valence(BodyZone::Ears) - 7.0).abs() < 1e-4);

        prefs.nudge_stimulus(StimulusKind::Pain, -20.0);
        assert!((prefs.stimulus_valence(StimulusKind::Pain) + 14.0).abs() < 1e-4);
    }

    #[test]
    fn test_valence_clamped() {
        let mut prefs = SensoryPreferences::default();
        for _ in 0..100 {
            prefs.nudge_zone(BodyZone::Neck, 50.0);
        }
        assert_eq!(prefs.zone_valence(BodyZone::Neck), 100.0);
    }

    #[test]
    fn test_temperature_drift_respects_adaptability() {
        let mut eager = SensoryPreferences {
            adaptability: 100.0,
            ..Default::default()
        };
        let mut stubborn = SensoryPreferences {
            adaptability: 10.0,
            ..Default::default()
        };
        eager.drift_temperature_toward(30.0, 3.0);
        stubborn.drift_temperature_toward(30.0, 3.0);
        assert!(eager.temperature_preference > stubborn.temperature_preference);
    }
}
