//! Cognitive state channels.

use crate::dynamics::{self, sanitize_f32, DecayRates};
use serde::{Deserialize, Serialize};

/// Seven bounded cognitive channels (all 0-100).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitiveState {
    /// Attention capacity (baseline 70).
    pub focus: f32,
    /// Mental sharpness (baseline 70).
    pub clarity: f32,
    /// Grounding/awareness (baseline 70).
    pub presence: f32,
    /// Cognitive overload (baseline 0).
    pub overwhelm: f32,
    /// Satisfaction (baseline 50).
    pub contentment: f32,
    /// Anticipatory excitement (baseline 30).
    pub excitement: f32,
    /// Emotional openness (baseline 40).
    pub vulnerability: f32,
}

impl Default for CognitiveState {
    fn default() -> Self {
        Self {
            focus: 70.0,
            clarity: 70.0,
            presence: 70.0,
            overwhelm: 0.0,
            contentment: 50.0,
            excitement: 30.0,
            vulnerability: 40.0,
        }
    }
}

impl CognitiveState {
    pub fn normalize(&mut self) {
        self.focus = sanitize_f32(self.focus, 70.0).clamp(0.0, 100.0);
        self.clarity = sanitize_f32(self.clarity, 70.0).clamp(0.0, 100.0);
        self.presence = sanitize_f32(self.presence, 70.0).clamp(0.0, 100.0);
        self.overwhelm = sanitize_f32(self.overwhelm, 0.0).clamp(0.0, 100.0);
        self.contentment = sanitize_f32(self.contentment, 50.0).clamp(0.0, 100.0);
        self.excitement = sanitize_f32(self.excitement, 30.0).clamp(0.0, 100.0);
        self.vulnerability = sanitize_f32(self.vulnerability, 40.0).clamp(0.0, 100.0);
    }

    /// Recovery toward baseline over `t` reference ticks. Overwhelm decays
    /// multiplicatively; the rest are pulled.
    pub fn settle(&mut self, rates: &DecayRates, t: f32) {
        self.focus = dynamics::pull(self.focus, 70.0, rates.focus_pull, t);
        self.clarity = dynamics::pull(self.clarity, 70.0, rates.clarity_pull, t);
        self.presence = dynamics::pull(self.presence, 70.0, rates.presence_pull, t);
        self.overwhelm = dynamics::decay(self.overwhelm, rates.overwhelm, t);
        self.contentment = dynamics::pull(self.contentment, 50.0, rates.contentment_pull, t);
        self.normalize();
    }
}
