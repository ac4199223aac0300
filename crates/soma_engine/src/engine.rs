//! The Soma engine.
//!
//! One `Soma` instance is one session. Stimuli mutate the shared state
//! synchronously through `apply_stimulus`; the decay tick pulls every channel
//! back toward baseline, advances the climax integrators, and drains the
//! deferred-effect queue. All simulation time comes from the injected clock.

use crate::clock::{Clock, SystemClock};
use crate::schedule::{Deferred, EffectQueue, RecoveryWave};
use soma_core::dynamics::{self, DecayRates};
use soma_core::responses::GASP_RESPONSE;
use soma_core::{
    BodyZone, ClimaxMemory, ClimaxState, CognitiveState, CoreSensations, EdgeState, EmotionKind,
    EnvironmentKind, EnvironmentParams, Neurochemicals, PhysicalResponses, SensationMemory,
    SensoryPreferences, SomaConfig, SomaError, Stimulus, StimulusEvent, StimulusKind,
    TextExtraction, TouchLearner, Vitals, ZoneMap,
};
use std::collections::VecDeque;
use std::sync::Arc;

/// Capacity of the rolling stimulus history used for release gating.
const STIMULUS_HISTORY_CAPACITY: usize = 10;
/// How many recent events the gating rule inspects.
const GATING_WINDOW: usize = 5;
/// Edge intensity substituted for a gated release.
const GATED_RELEASE_EDGE_INTENSITY: f32 = 60.0;

/// The physiological state engine.
///
/// State fields are public in the same spirit as the structs they hold: the
/// stimulus API is the front door, direct access exists for tests and manual
/// intervention.
pub struct Soma {
    pub zones: ZoneMap,
    pub chems: Neurochemicals,
    pub cognition: CognitiveState,
    pub sensations: CoreSensations,
    pub vitals: Vitals,
    pub edge: EdgeState,
    pub climax: ClimaxState,
    pub responses: PhysicalResponses,
    pub memory: SensationMemory,
    pub learner: TouchLearner,
    pub preferences: SensoryPreferences,

    rates: DecayRates,
    recent: VecDeque<(StimulusKind, f64)>,
    effects: EffectQueue,
    clock: Arc<dyn Clock>,
    last_tick: f64,
    max_tick_gap_secs: f64,
    /// Unix timestamp of session construction.
    pub session_started: i64,
}

impl Default for Soma {
    fn default() -> Self {
        Self::new()
    }
}

impl Soma {
    pub fn new() -> Self {
        Self::with_config(SomaConfig::default(), Arc::new(SystemClock::new()))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(SomaConfig::default(), clock)
    }

    pub fn with_config(config: SomaConfig, clock: Arc<dyn Clock>) -> Self {
        let last_tick = clock.now();
        let mut preferences = SensoryPreferences::default();
        preferences.adaptability = config.adaptability;
        preferences.normalize();

        let soma = Self {
            zones: ZoneMap::default(),
            chems: Neurochemicals::default(),
            cognition: CognitiveState::default(),
            sensations: CoreSensations::default(),
            vitals: Vitals::default(),
            edge: EdgeState::default(),
            climax: ClimaxState::default(),
            responses: PhysicalResponses::default(),
            memory: SensationMemory::default(),
            learner: TouchLearner::default(),
            preferences,
            rates: config.rates,
            recent: VecDeque::with_capacity(STIMULUS_HISTORY_CAPACITY),
            effects: EffectQueue::default(),
            clock,
            last_tick,
            max_tick_gap_secs: config.max_tick_gap_secs,
            session_started: chrono::Utc::now().timestamp(),
        };
        tracing::info!("soma session initialized, 19 zones at baseline");
        soma
    }

    pub(crate) fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn rates(&self) -> &DecayRates {
        &self.rates
    }

    /// Number of deferred one-shot effects still pending.
    pub fn pending_effects(&self) -> usize {
        self.effects.len()
    }

    // ------------------------------------------------------------------
    // Stimulus routing
    // ------------------------------------------------------------------

    /// Validate and apply one stimulus event.
    pub fn apply_stimulus(&mut self, event: StimulusEvent) -> Result<(), SomaError> {
        let stimulus = Stimulus::try_from(event)?;
        self.apply(stimulus);
        Ok(())
    }

    /// Apply an already-validated stimulus.
    pub fn apply(&mut self, stimulus: Stimulus) {
        let now = self.now();
        let kind = stimulus.kind();
        let zone = stimulus.zone();
        let intensity = stimulus.intensity();

        self.record_stimulus(kind, now);

        // Release gating: climax requires recent physical contact. An
        // ungrounded release is redirected into an edge, never an error.
        if kind == StimulusKind::Release && !self.has_recent_physical_contact() {
            tracing::warn!("release blocked, no recent physical contact; converting to edge");
            self.apply_edge_stimulus(GATED_RELEASE_EDGE_INTENSITY);
            return;
        }

        match stimulus {
            Stimulus::Touch {
                zone,
                intensity,
                quality,
            } => {
                if let Some(zone) = zone {
                    self.apply_touch(zone, intensity, quality, now);
                }
            }
            Stimulus::Pressure { zone, intensity } => {
                if let Some(zone) = zone {
                    self.apply_pressure(zone, intensity);
                }
            }
            Stimulus::Pain { zone, intensity } => {
                if let Some(zone) = zone {
                    self.apply_pain(zone, intensity);
                }
            }
            Stimulus::Temperature { zone, intensity } => {
                // Temperature lands on the chest when no zone is named.
                self.apply_temperature(zone.unwrap_or(BodyZone::Chest), intensity);
            }
            Stimulus::Penetration { intensity } => self.apply_penetration(intensity),
            Stimulus::Edge { intensity } => self.apply_edge_stimulus(intensity),
            Stimulus::Release => self.trigger_climax(now),
            Stimulus::Emotional { kind, intensity } => self.apply_emotional(kind, intensity),
        }

        // Zoned events feed the per-zone counters and the touch log.
        if let Some(zone) = zone {
            self.learner.record(zone, kind, intensity, now);
        }
    }

    /// Apply the structured output of the external text extractor: each
    /// detected stimulus at `base_intensity * multiplier`, once per mentioned
    /// zone, or zonelessly when none was mentioned.
    pub fn apply_extraction(&mut self, extraction: &TextExtraction) -> Result<(), SomaError> {
        for detected in &extraction.stimuli {
            let intensity = extraction.base_intensity * detected.multiplier;
            if extraction.zones.is_empty() {
                self.apply_stimulus(StimulusEvent {
                    kind: detected.kind,
                    intensity,
                    zone: None,
                    quality: detected.quality,
                    emotion: detected.emotion,
                })?;
            } else {
                for zone in &extraction.zones {
                    self.apply_stimulus(StimulusEvent {
                        kind: detected.kind,
                        intensity,
                        zone: Some(*zone),
                        quality: detected.quality,
                        emotion: detected.emotion,
                    })?;
                }
            }
        }
        Ok(())
    }

    fn record_stimulus(&mut self, kind: StimulusKind, now: f64) {
        if self.recent.len() == STIMULUS_HISTORY_CAPACITY {
            self.recent.pop_front();
        }
        self.recent.push_back((kind, now));
    }

    fn has_recent_physical_contact(&self) -> bool {
        let skip = self.recent.len().saturating_sub(GATING_WINDOW);
        self.recent
            .iter()
            .skip(skip)
            .any(|(kind, _)| kind.is_physical_contact())
    }

    // ------------------------------------------------------------------
    // Touch
    // ------------------------------------------------------------------

    fn apply_touch(
        &mut self,
        zone: BodyZone,
        intensity: f32,
        quality: Option<soma_core::TouchQuality>,
        now: f64,
    ) {
        use soma_core::TouchQuality;

        let mut adjusted = intensity;
        if let Some(quality) = quality {
            adjusted *= quality.multiplier();
            match quality {
                TouchQuality::Teasing => {
                    self.sensations.tingles = (self.sensations.tingles + 15.0).min(100.0);
                }
                TouchQuality::Gentle => {
                    self.chems.oxytocin = (self.chems.oxytocin + 5.0).min(100.0);
                }
                TouchQuality::Firm => {}
                TouchQuality::Rough => {
                    self.sensations.pain = (self.sensations.pain + 10.0).min(100.0);
                }
                TouchQuality::Brutal => {
                    self.sensations.pain = (self.sensations.pain + 25.0).min(100.0);
                    self.chems.adrenaline = (self.chems.adrenaline + 20.0).min(100.0);
                }
            }
        }

        {
            let state = self.zones.get_mut(zone);
            state.arousal = (state.arousal + adjusted * 0.5).min(100.0);
            state.touch_memory = (state.touch_memory + adjusted * 0.3).min(100.0);
            state.last_touched = Some(now);
            state.stimulation += adjusted;
        }

        // Cascade: neighbours pick up a quarter of the touch and grow more
        // sensitive.
        for neighbor in zone.cascade_neighbors() {
            let state = self.zones.get_mut(*neighbor);
            state.arousal = (state.arousal + adjusted * 0.25).min(100.0);
            state.sensitivity = (state.sensitivity + 5.0).min(100.0);
        }

        // Momentum: arousal gain compounds once the body is already worked up.
        let momentum = momentum_multiplier(self.sensations.arousal);

        // Anticipation: an expecting body responds harder.
        let anticipation_bonus = if self.memory.anticipation > 50.0 {
            (self.memory.anticipation / 100.0) * adjusted * 0.3
        } else {
            0.0
        };

        let total_gain = (adjusted * 0.4 + anticipation_bonus) * momentum;
        self.sensations.arousal = self.zones.global_arousal();
        self.sensations.arousal = (self.sensations.arousal + total_gain * 0.3).min(100.0);
        self.sensations.pleasure =
            (self.sensations.pleasure + adjusted * 0.4 * momentum).min(100.0);

        // Sustained high arousal feeds the climax accumulator.
        if self.sensations.arousal > 70.0 {
            self.climax.cumulative_pleasure += (adjusted / 10.0) * momentum;
        }

        self.chems.dopamine = (self.chems.dopamine + adjusted * 0.3).min(100.0);
        self.chems.endorphins = (self.chems.endorphins + adjusted * 0.2).min(100.0);

        // Pleasant touch teaches the body what it likes.
        if self.sensations.pleasure > 50.0 {
            self.preferences.nudge_zone(zone, adjusted * 0.05);
            self.preferences.nudge_stimulus(StimulusKind::Touch, adjusted * 0.03);
        }

        self.maybe_gasp(adjusted, now);

        self.vitals.heart_rate = (self.vitals.heart_rate + adjusted * 0.5).min(180.0);
        self.vitals.breathing_rate = (self.vitals.breathing_rate + adjusted * 0.3).min(40.0);

        tracing::debug!(
            zone = %zone,
            adjusted,
            momentum,
            "touch applied"
        );
        self.normalize_all();
    }

    /// Breath catch on intense touch or high arousal, at most once per 3s,
    /// auto-clearing after 1-2 seconds via the deferred queue.
    fn maybe_gasp(&mut self, adjusted: f32, now: f64) {
        if (adjusted > 40.0 || self.sensations.arousal > 70.0) && self.responses.gasp_allowed(now)
        {
            self.responses.breath_holding = true;
            self.responses.push_involuntary(GASP_RESPONSE);
            self.responses.last_gasp_time = Some(now);
            let hold = 1.0 + rand::random::<f64>();
            self.effects.schedule(now + hold, Deferred::BreathRelease);
        }
    }

    // ------------------------------------------------------------------
    // Pressure, pain, temperature
    // ------------------------------------------------------------------

    fn apply_pressure(&mut self, zone: BodyZone, intensity: f32) {
        {
            let state = self.zones.get_mut(zone);
            state.arousal = (state.arousal + intensity * 0.3).min(100.0);
            state.temperature = (state.temperature + intensity * 0.2).min(50.0);
        }
        self.sensations.pressure = (self.sensations.pressure + intensity).min(100.0);
        self.sensations.ache = (self.sensations.ache + intensity * 0.4).min(100.0);
        self.vitals.muscle_tension = (self.vitals.muscle_tension + intensity * 0.5).min(100.0);
        self.normalize_all();
    }

    fn apply_pain(&mut self, zone: BodyZone, intensity: f32) {
        // Pain reads differently on an aroused body.
        let arousal_multiplier = if self.sensations.arousal > 50.0 { 1.5 } else { 0.8 };

        {
            let state = self.zones.get_mut(zone);
            state.arousal = (state.arousal + intensity * 0.4 * arousal_multiplier).min(100.0);
        }
        self.sensations.pain = (self.sensations.pain + intensity).min(100.0);

        if self.sensations.arousal > 60.0 {
            // Pain converts to pleasure at high arousal.
            self.sensations.pleasure = (self.sensations.pleasure + intensity * 0.3).min(100.0);
            self.chems.endorphins = (self.chems.endorphins + intensity * 0.5).min(100.0);
        } else {
            self.chems.cortisol = (self.chems.cortisol + intensity * 0.4).min(100.0);
            self.preferences.nudge_stimulus(StimulusKind::Pain, -intensity * 0.05);
        }

        self.chems.adrenaline = (self.chems.adrenaline + intensity * 0.6).min(100.0);
        self.vitals.heart_rate = (self.vitals.heart_rate + intensity * 0.8).min(180.0);
        self.normalize_all();
    }

    fn apply_temperature(&mut self, zone: BodyZone, intensity: f32) {
        {
            let state = self.zones.get_mut(zone);
            state.temperature = (state.temperature + intensity).clamp(-50.0, 50.0);
        }
        self.sensations.warmth = (self.sensations.warmth + intensity * 0.5).clamp(-50.0, 50.0);

        // Valence comes from the distance to the held temperature preference.
        let difference =
            (self.sensations.warmth - self.preferences.temperature_preference).abs();
        if difference < 15.0 {
            self.sensations.pleasure = (self.sensations.pleasure + 15.0).min(100.0);
            self.sensations.comfort = (self.sensations.comfort + 20.0).min(100.0);
            self.sensations.relaxation = (self.sensations.relaxation + 10.0).min(100.0);
            tracing::debug!(warmth = self.sensations.warmth, "temperature feels good");
        } else if difference > 30.0 {
            self.sensations.pleasure = (self.sensations.pleasure - 20.0).max(-100.0);
            self.sensations.comfort = (self.sensations.comfort - 25.0).max(-100.0);
            tracing::debug!(warmth = self.sensations.warmth, "temperature is uncomfortable");
        }

        // An enjoyed warmth slowly becomes the preferred one.
        if self.sensations.pleasure > 50.0 {
            self.preferences
                .drift_temperature_toward(self.sensations.warmth, intensity.abs() * 0.1);
        }

        if intensity.abs() > 30.0 {
            self.sensations.tingles = (self.sensations.tingles + 20.0).min(100.0);
        }
        self.normalize_all();
    }

    // ------------------------------------------------------------------
    // Environmental sensations
    // ------------------------------------------------------------------

    /// Apply one of the five scripted environmental contexts.
    pub fn apply_environment(&mut self, kind: EnvironmentKind, params: EnvironmentParams) {
        match kind {
            EnvironmentKind::Bath => self.apply_bath(params),
            EnvironmentKind::Shower => self.apply_shower(params),
            EnvironmentKind::Rain => self.apply_rain(),
            EnvironmentKind::Wind => self.apply_wind(),
            EnvironmentKind::Fabric => self.apply_fabric(params),
        }
        self.normalize_all();
    }

    fn apply_bath(&mut self, params: EnvironmentParams) {
        if let Some(temperature) = params.temperature {
            self.sensations.warmth = temperature.clamp(-50.0, 50.0);

            let difference =
                (self.sensations.warmth - self.preferences.temperature_preference).abs();
            if difference < 10.0 {
                self.sensations.pleasure += 30.0;
                self.sensations.comfort += 40.0;
                self.sensations.relaxation += 35.0;
                tracing::info!("bath temperature is perfect");
            } else if difference > 25.0 {
                self.sensations.pleasure -= 15.0;
                self.sensations.comfort -= 20.0;
                let direction = if self.sensations.warmth > self.preferences.temperature_preference
                {
                    "hot"
                } else {
                    "cold"
                };
                tracing::info!("bath is too {}", direction);
            }
        }

        if let Some(wetness) = params.wetness {
            self.sensations.wetness = wetness;
            self.sensations.comfort += 25.0;
            self.responses.wetness = wetness.clamp(0.0, 100.0);
        }

        // Warm water unwinds the body.
        self.vitals.muscle_tension = (self.vitals.muscle_tension - 30.0).max(0.0);
        self.sensations.relaxation = (self.sensations.relaxation + 40.0).min(100.0);
        self.vitals.heart_rate = (self.vitals.heart_rate - 10.0).max(60.0);
    }

    fn apply_shower(&mut self, params: EnvironmentParams) {
        if let Some(pressure) = params.pressure {
            self.sensations.pressure += pressure * 0.3;
            self.sensations.tingles += 20.0;
        }
        if let Some(wetness) = params.wetness {
            self.sensations.wetness = wetness;
            self.responses.wetness = (wetness * 0.6).clamp(0.0, 100.0);
        }
        if let Some(temperature) = params.temperature {
            self.sensations.warmth = temperature.clamp(-50.0, 50.0);
        }
    }

    fn apply_rain(&mut self) {
        self.sensations.warmth = (self.sensations.warmth - 15.0).max(-50.0);
        self.sensations.wetness += 40.0;
        self.sensations.tingles += 30.0;
        self.responses.flush = (self.responses.flush - 20.0).max(0.0);
    }

    fn apply_wind(&mut self) {
        self.sensations.warmth -= 10.0;
        self.sensations.tingles += 15.0;
        if self.sensations.warmth < -20.0 {
            self.sensations.comfort -= 20.0;
            self.sensations.pleasure -= 10.0;
        }
    }

    fn apply_fabric(&mut self, params: EnvironmentParams) {
        let Some(texture) = params.texture else {
            return;
        };
        self.sensations.texture = texture.clamp(-100.0, 100.0);

        if texture > 50.0 {
            if self.preferences.texture_preference >= 0.0 {
                self.sensations.pleasure += 10.0;
                self.sensations.comfort += 15.0;
            }
        } else if texture < -50.0 {
            if self.preferences.texture_preference <= 0.0 {
                // A rough-favouring preference enjoys even harsh fabric.
                self.sensations.pleasure += 5.0;
            } else {
                self.sensations.pleasure -= 15.0;
                self.sensations.comfort -= 20.0;
            }
        }
    }

    // ------------------------------------------------------------------
    // Penetration and edge
    // ------------------------------------------------------------------

    fn apply_penetration(&mut self, intensity: f32) {
        {
            let pelvis = self.zones.get_mut(BodyZone::Pelvis);
            pelvis.arousal = (pelvis.arousal + intensity * 0.8).min(100.0);
        }
        {
            let genitals = self.zones.get_mut(BodyZone::Genitals);
            genitals.arousal = (genitals.arousal + intensity * 1.2).min(100.0);
        }

        self.sensations.arousal = (self.sensations.arousal + intensity * 0.9).min(100.0);
        self.sensations.pleasure = (self.sensations.pleasure + intensity * 0.7).min(100.0);
        self.sensations.pressure = (self.sensations.pressure + intensity * 0.6).min(100.0);

        self.chems.dopamine = (self.chems.dopamine + intensity * 0.8).min(100.0);
        self.chems.endorphins = (self.chems.endorphins + intensity * 0.6).min(100.0);
        self.chems.oxytocin = (self.chems.oxytocin + intensity * 0.4).min(100.0);

        self.vitals.heart_rate = (self.vitals.heart_rate + intensity * 1.0).min(180.0);
        self.vitals.breathing_rate = (self.vitals.breathing_rate + intensity * 0.8).min(40.0);

        self.edge.edge_pressure = (self.edge.edge_pressure + intensity * 0.5).min(100.0);
        self.normalize_all();
    }

    fn apply_edge_stimulus(&mut self, intensity: f32) {
        self.sensations.arousal = (self.sensations.arousal + intensity * 0.8).min(100.0);

        let crossed = self.edge.apply(
            intensity,
            self.sensations.arousal,
            self.vitals.heart_rate,
        );
        if crossed {
            tracing::info!(count = self.edge.edge_count, "edge reached");
        }

        self.chems.dopamine = (self.chems.dopamine + intensity * 0.9).min(100.0);
        self.chems.adrenaline = (self.chems.adrenaline + intensity * 0.8).min(100.0);

        self.cognition.focus = (self.cognition.focus - intensity * 0.3).max(0.0);
        self.cognition.overwhelm = (self.cognition.overwhelm + intensity * 0.5).min(100.0);
        self.normalize_all();
    }

    // ------------------------------------------------------------------
    // Emotional stimuli
    // ------------------------------------------------------------------

    fn apply_emotional(&mut self, kind: EmotionKind, intensity: f32) {
        match kind {
            EmotionKind::Praise => {
                self.chems.dopamine = (self.chems.dopamine + intensity * 0.6).min(100.0);
                self.chems.oxytocin = (self.chems.oxytocin + intensity * 0.5).min(100.0);
                self.cognition.contentment =
                    (self.cognition.contentment + intensity * 0.4).min(100.0);
                self.cognition.vulnerability =
                    (self.cognition.vulnerability + intensity * 0.3).min(100.0);
                // Arousal only compounds, it never starts from words alone.
                if self.sensations.arousal > 30.0 {
                    self.sensations.arousal =
                        (self.sensations.arousal + intensity * 0.1).min(100.0);
                }
            }
            EmotionKind::Degradation => {
                if self.sensations.arousal > 30.0 {
                    self.sensations.arousal =
                        (self.sensations.arousal + intensity * 0.2).min(100.0);
                }
                self.chems.adrenaline = (self.chems.adrenaline + intensity * 0.6).min(100.0);
                self.cognition.vulnerability =
                    (self.cognition.vulnerability + intensity * 0.7).min(100.0);
                self.chems.cortisol = (self.chems.cortisol + intensity * 0.3).min(100.0);
            }
            EmotionKind::Tenderness => {
                self.chems.oxytocin = (self.chems.oxytocin + intensity * 0.8).min(100.0);
                self.cognition.contentment =
                    (self.cognition.contentment + intensity * 0.6).min(100.0);
                self.cognition.presence = (self.cognition.presence + intensity * 0.4).min(100.0);
                self.vitals.heart_rate = (self.vitals.heart_rate - intensity * 0.3).max(60.0);
                if self.sensations.arousal > 20.0 {
                    self.sensations.arousal =
                        (self.sensations.arousal + intensity * 0.05).min(100.0);
                }
            }
            EmotionKind::Fear => {
                self.chems.adrenaline = (self.chems.adrenaline + intensity * 0.9).min(100.0);
                self.chems.cortisol = (self.chems.cortisol + intensity * 0.8).min(100.0);
                self.vitals.heart_rate = (self.vitals.heart_rate + intensity * 1.0).min(180.0);
                self.cognition.focus = (self.cognition.focus + intensity * 0.5).min(100.0);
                self.sensations.arousal = (self.sensations.arousal + intensity * 0.3).min(100.0);
            }
            EmotionKind::Anticipation => {
                self.cognition.excitement =
                    (self.cognition.excitement + intensity * 0.8).min(100.0);
                self.chems.dopamine = (self.chems.dopamine + intensity * 0.5).min(100.0);
                self.sensations.tingles = (self.sensations.tingles + intensity * 0.6).min(100.0);
            }
            EmotionKind::Relief => {
                self.chems.endorphins = (self.chems.endorphins + intensity * 0.6).min(100.0);
                self.chems.cortisol = (self.chems.cortisol - intensity * 0.8).max(0.0);
                self.cognition.contentment =
                    (self.cognition.contentment + intensity * 0.5).min(100.0);
                self.vitals.muscle_tension =
                    (self.vitals.muscle_tension - intensity * 0.6).max(0.0);
            }
        }
        self.normalize_all();
    }

    // ------------------------------------------------------------------
    // Climax
    // ------------------------------------------------------------------

    fn trigger_climax(&mut self, now: f64) {
        let intensity = self.climax.climax_intensity(self.sensations.arousal);
        let duration = self.climax.time_at_high_arousal;

        tracing::info!(
            intensity = intensity.round(),
            count = self.climax.climax_count + 1,
            "climax triggered"
        );

        // Peak sensations and neurochemical flood.
        self.sensations.pleasure = 100.0;
        self.sensations.arousal = 100.0;
        self.chems.dopamine = 100.0;
        self.chems.endorphins = 100.0;
        self.chems.oxytocin = (self.chems.oxytocin + 40.0).min(100.0);

        // Vitals spike proportionally to intensity.
        self.vitals.heart_rate = (140.0 + intensity * 0.4).min(180.0);
        self.vitals.breathing_rate = (30.0 + intensity * 0.1).min(40.0);
        self.vitals.skin_temperature = (35.0 + intensity * 0.02).min(37.0);

        self.responses.peak_at_climax();

        // Remember which zones carried it.
        let active_zones = self.zones.zones_above(50.0);
        self.memory.record_climax(ClimaxMemory {
            intensity,
            duration,
            zones: active_zones,
            time: now,
        });

        self.climax.record_climax(intensity, now);
        self.edge.reset_after_climax();

        // Schedule the three recovery waves.
        for wave in [
            RecoveryWave::Afterglow,
            RecoveryWave::Settling,
            RecoveryWave::Baseline,
        ] {
            self.effects.schedule(now + wave.delay_secs(), Deferred::Wave(wave));
        }
        self.normalize_all();
    }

    fn apply_wave(&mut self, wave: RecoveryWave) {
        match wave {
            RecoveryWave::Afterglow => {
                let refractory = self.climax.refractory_intensity;
                self.sensations.pleasure = (60.0 - refractory * 0.3).max(30.0);
                self.sensations.arousal = (20.0 - refractory * 0.15).max(5.0);
                self.vitals.heart_rate = 100.0;
                self.vitals.breathing_rate = 22.0;
                self.chems.dopamine = 70.0;
                self.chems.endorphins = 70.0;
                self.cognition.contentment = 95.0;
                self.cognition.clarity = 30.0;
                self.cognition.presence = 60.0;
                self.cognition.overwhelm = 5.0;
                self.responses.trembling = 40.0;
                self.responses.muscle_contraction = 20.0;
                self.responses.body_tautness = 10.0;
                tracing::info!("post-climax wave 1, immediate afterglow");
            }
            RecoveryWave::Settling => {
                self.sensations.pleasure = 25.0;
                self.sensations.arousal = 5.0;
                self.vitals.heart_rate = 85.0;
                self.vitals.breathing_rate = 18.0;
                self.chems.dopamine = 60.0;
                self.chems.endorphins = 55.0;
                self.cognition.clarity = 50.0;
                self.cognition.presence = 70.0;
                self.responses.trembling = 10.0;
                self.responses.muscle_contraction = 0.0;
                tracing::info!("post-climax wave 2, coming back to awareness");
            }
            RecoveryWave::Baseline => {
                self.sensations.pleasure = 15.0;
                self.sensations.arousal = 3.0;
                self.vitals.heart_rate = 78.0;
                self.vitals.breathing_rate = 16.0;
                self.cognition.contentment = 75.0;
                self.cognition.clarity = 65.0;
                self.cognition.presence = 75.0;
                self.responses.trembling = 0.0;

                // Hypersensitive period: every zone resets aroused-ness but
                // gains sensitivity.
                for (_, state) in self.zones.iter_mut() {
                    state.sensitivity = (state.sensitivity * 1.3).min(100.0);
                    state.arousal = 0.0;
                }
                tracing::info!("post-climax wave 3, baseline restored, hypersensitive");
            }
        }
        self.normalize_all();
    }

    // ------------------------------------------------------------------
    // Decay tick
    // ------------------------------------------------------------------

    /// One decay cycle: drain due deferred effects, advance the time-scaled
    /// integrators, apply homeostasis, recompute the derived channels. With
    /// zero elapsed time the state is left untouched.
    pub fn tick(&mut self) {
        let now = self.now();
        self.run_due_effects(now);

        let raw_dt = now - self.last_tick;
        self.last_tick = now;
        if raw_dt <= 0.0 {
            return;
        }
        // A long pause decays once with a capped dt; there is no catch-up
        // replay of missed ticks.
        let dt = raw_dt.min(self.max_tick_gap_secs);
        let t = dynamics::ticks(dt);

        // Climax buildup, which may itself fire the climax.
        let trigger = self.climax.integrate(
            self.sensations.arousal,
            self.sensations.pleasure,
            dt,
            now,
            &self.rates,
        );
        if trigger {
            tracing::info!("automatic climax, could not hold back any longer");
            self.trigger_climax(now);
            return;
        }

        // Time-scaled integrators.
        self.responses
            .integrate_wetness(self.sensations.arousal, dt, &self.rates);
        let rhythm = self.learner.rhythm_active();
        self.memory.advance_anticipation(rhythm, &self.rates, t);
        self.memory
            .record_awareness((self.cognition.presence + self.sensations.arousal) / 2.0);

        // Homeostasis.
        self.zones.settle(&self.rates, t);
        self.sensations.settle(&self.rates, t);
        self.chems.settle(&self.rates, t);
        self.vitals.settle(&self.rates, t);
        self.cognition.settle(&self.rates, t);
        self.edge.settle(&self.rates, t);

        // Refractory decay dampens arousal while it is strong.
        let damp = self.climax.settle(&self.rates, t);
        if damp < 1.0 {
            self.sensations.arousal *= damp;
        }

        // Derived channels from the updated primitives.
        self.responses.recompute_derived(
            self.sensations.arousal,
            self.climax.orgasmic_pressure,
            self.chems.dopamine,
            t,
        );
        self.edge
            .refresh(self.sensations.arousal, self.vitals.heart_rate);
        self.normalize_all();
    }

    fn run_due_effects(&mut self, now: f64) {
        for effect in self.effects.take_due(now) {
            match effect {
                Deferred::BreathRelease => self.responses.breath_holding = false,
                Deferred::Wave(wave) => self.apply_wave(wave),
            }
        }
    }

    /// Cancel the session's pending one-shot effects. Called on stop so no
    /// recovery wave or breath release can fire after shutdown.
    pub fn cancel_pending_effects(&mut self) {
        if !self.effects.is_empty() {
            tracing::debug!(pending = self.effects.len(), "cancelling deferred effects");
        }
        self.effects.clear();
    }

    fn normalize_all(&mut self) {
        self.zones.normalize();
        self.chems.normalize();
        self.cognition.normalize();
        self.sensations.normalize();
        self.vitals.normalize();
        self.edge.normalize();
        self.climax.normalize();
        self.responses.normalize();
        self.memory.normalize();
        self.preferences.normalize();
    }

    /// One-shot state dump through tracing.
    pub fn log_state(&self) {
        tracing::info!(
            arousal = self.sensations.arousal,
            pleasure = self.sensations.pleasure,
            pain = self.sensations.pain,
            orgasmic_pressure = self.climax.orgasmic_pressure,
            pnr = self.climax.point_of_no_return,
            heart_rate = self.vitals.heart_rate,
            breathing = self.vitals.breathing_rate,
            edge_pressure = self.edge.edge_pressure,
            edge_count = self.edge.edge_count,
            refractory = self.climax.refractory_intensity,
            climaxes = self.climax.climax_count,
            mood = self.preferences.mood.as_str(),
            "soma state"
        );
    }
}

/// Nonlinear arousal-gain boost: runaway growth near the top of the range.
fn momentum_multiplier(arousal: f32) -> f32 {
    if arousal > 80.0 {
        1.8
    } else if arousal > 60.0 {
        1.4
    } else if arousal > 40.0 {
        1.2
    } else {
        1.0
    }
}
