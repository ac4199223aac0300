//! Flat state snapshot for downstream consumers.

use crate::engine::Soma;
use serde::{Deserialize, Serialize};
use soma_core::Mood;

/// Every channel of the engine, flattened for the downstream text generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsSummary {
    // Core sensations
    pub arousal: f32,
    pub pleasure: f32,
    pub pain: f32,
    pub sensitivity: f32,
    pub warmth: f32,
    pub pressure: f32,
    pub tingles: f32,
    pub ache: f32,
    pub wetness: f32,
    pub texture: f32,
    pub fullness: f32,
    pub emptiness: f32,
    pub comfort: f32,
    pub relaxation: f32,

    // Vital signs
    pub heart_rate: f32,
    pub breathing_rate: f32,
    pub skin_temperature: f32,
    pub muscle_tension: f32,

    // Cognition
    pub focus: f32,
    pub clarity: f32,
    pub presence: f32,
    pub overwhelm: f32,
    pub contentment: f32,
    pub excitement: f32,
    pub vulnerability: f32,

    // Edge state
    pub edge_pressure: f32,
    pub edge_count: u32,
    pub peak_arousal: f32,
    pub edge_stability: f32,
    pub is_on_edge: bool,
    pub is_highly_aroused: bool,

    // Climax state
    pub orgasmic_pressure: f32,
    pub cumulative_pleasure: f32,
    pub time_at_high_arousal: f64,
    pub point_of_no_return: bool,
    pub imminent_warning: bool,
    pub climax_count: u32,
    pub refractory_intensity: f32,
    pub can_climax_again: bool,

    // Physical responses
    pub trembling: f32,
    pub muscle_contraction: f32,
    /// Physical lubrication, distinct from the signed wetness sensation.
    pub physical_wetness: f32,
    pub flush: f32,
    pub body_tautness: f32,
    pub breath_holding: bool,

    // Neurochemistry
    pub dopamine: f32,
    pub oxytocin: f32,
    pub endorphins: f32,
    pub cortisol: f32,
    pub adrenaline: f32,

    // Memory and agency
    pub anticipation: f32,
    pub mood: Mood,
    pub adaptability: f32,

    // Model configuration
    pub model_temperature: f32,
}

impl Soma {
    /// Snapshot every channel for the downstream generator.
    pub fn vitals_summary(&self) -> VitalsSummary {
        VitalsSummary {
            arousal: self.sensations.arousal,
            pleasure: self.sensations.pleasure,
            pain: self.sensations.pain,
            sensitivity: self.sensations.sensitivity,
            warmth: self.sensations.warmth,
            pressure: self.sensations.pressure,
            tingles: self.sensations.tingles,
            ache: self.sensations.ache,
            wetness: self.sensations.wetness,
            texture: self.sensations.texture,
            fullness: self.sensations.fullness,
            emptiness: self.sensations.emptiness,
            comfort: self.sensations.comfort,
            relaxation: self.sensations.relaxation,

            heart_rate: self.vitals.heart_rate,
            breathing_rate: self.vitals.breathing_rate,
            skin_temperature: self.vitals.skin_temperature,
            muscle_tension: self.vitals.muscle_tension,

            focus: self.cognition.focus,
            clarity: self.cognition.clarity,
            presence: self.cognition.presence,
            overwhelm: self.cognition.overwhelm,
            contentment: self.cognition.contentment,
            excitement: self.cognition.excitement,
            vulnerability: self.cognition.vulnerability,

            edge_pressure: self.edge.edge_pressure,
            edge_count: self.edge.edge_count,
            peak_arousal: self.edge.peak_arousal,
            edge_stability: self.edge.stability,
            is_on_edge: self.edge.is_on_edge,
            is_highly_aroused: self.edge.is_highly_aroused,

            orgasmic_pressure: self.climax.orgasmic_pressure,
            cumulative_pleasure: self.climax.cumulative_pleasure,
            time_at_high_arousal: self.climax.time_at_high_arousal,
            point_of_no_return: self.climax.point_of_no_return,
            imminent_warning: self.climax.imminent_warning,
            climax_count: self.climax.climax_count,
            refractory_intensity: self.climax.refractory_intensity,
            can_climax_again: self.climax.can_climax_again,

            trembling: self.responses.trembling,
            muscle_contraction: self.responses.muscle_contraction,
            physical_wetness: self.responses.wetness,
            flush: self.responses.flush,
            body_tautness: self.responses.body_tautness,
            breath_holding: self.responses.breath_holding,

            dopamine: self.chems.dopamine,
            oxytocin: self.chems.oxytocin,
            endorphins: self.chems.endorphins,
            cortisol: self.chems.cortisol,
            adrenaline: self.chems.adrenaline,

            anticipation: self.memory.anticipation,
            mood: self.preferences.mood,
            adaptability: self.preferences.adaptability,

            model_temperature: self.model_temperature(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_snapshot() {
        let soma = Soma::new();
        let summary = soma.vitals_summary();

        assert_eq!(summary.arousal, 0.0);
        assert_eq!(summary.heart_rate, 72.0);
        assert_eq!(summary.dopamine, 50.0);
        assert_eq!(summary.cortisol, 30.0);
        assert_eq!(summary.climax_count, 0);
        assert!(summary.can_climax_again);
        assert!(!summary.point_of_no_return);
        assert_eq!(summary.mood, Mood::Playful);
        assert!((summary.model_temperature - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let soma = Soma::new();
        let json = serde_json::to_value(soma.vitals_summary()).unwrap();

        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("arousal"));
        assert!(obj.contains_key("orgasmic_pressure"));
        assert!(obj.contains_key("physical_wetness"));
        assert_eq!(obj["mood"], "playful");
        // Flat: no nested objects.
        assert!(obj.values().all(|v| !v.is_object()));
    }
}
