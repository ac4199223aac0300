//! # Soma Core
//!
//! State model for a continuous-time physiological simulation that drives an
//! interactive companion's narrative responses. The body is a set of bounded
//! numeric channels grouped by subsystem:
//!
//! - 19 fixed body zones, each with local arousal/sensitivity/temperature
//! - neurochemical, cognitive, sensation and vitals vectors
//! - edge-plateau and climax-buildup state machines
//! - involuntary physical responses
//! - bounded sensation memory and slowly-adapting sensory preferences
//!
//! Two invariants hold everywhere: every bounded channel is clamped on every
//! write (and NaN/Inf is replaced by the channel baseline), and every bounded
//! history evicts its oldest entry at capacity. Decay is time-normalized
//! against a 5-second reference tick, so simulation speed does not depend on
//! the cadence the engine actually runs at.

pub mod chemistry;
pub mod climax;
pub mod cognition;
pub mod config;
pub mod dynamics;
pub mod edge;
pub mod error;
pub mod memory;
pub mod responses;
pub mod sensations;
pub mod stimulus;
pub mod vitals;
pub mod zone;

pub use chemistry::Neurochemicals;
pub use climax::ClimaxState;
pub use cognition::CognitiveState;
pub use config::SomaConfig;
pub use dynamics::{DecayRates, REFERENCE_TICK_SECS};
pub use edge::EdgeState;
pub use error::SomaError;
pub use memory::{
    ClimaxMemory, Mood, SensationMemory, SensoryPreferences, TouchLearner, TouchRecord,
};
pub use responses::PhysicalResponses;
pub use sensations::CoreSensations;
pub use stimulus::{
    DetectedStimulus, EmotionKind, EnvironmentKind, EnvironmentParams, Stimulus, StimulusEvent,
    StimulusKind, TextExtraction, TouchQuality,
};
pub use vitals::Vitals;
pub use zone::{BodyZone, ZoneMap, ZoneState, ZONE_COUNT};
