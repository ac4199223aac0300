//! Stimulus events.
//!
//! Two representations: `StimulusEvent` is the loose wire form callers build
//! (optional fields, mirrors the external contract), `Stimulus` is the tagged
//! internal form where each variant carries exactly the fields its handler
//! needs. Validation happens once, at the `TryFrom` boundary, so a missing
//! emotion kind is a typed error instead of a dispatch-time fault.

use crate::error::SomaError;
use crate::zone::BodyZone;
use serde::{Deserialize, Serialize};

/// Kind tag for stimulus events, used in histories and preference maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StimulusKind {
    Touch,
    Pressure,
    Pain,
    Temperature,
    Penetration,
    Edge,
    Release,
    Emotional,
}

impl StimulusKind {
    /// Whether this kind counts as physical contact for release gating.
    pub fn is_physical_contact(self) -> bool {
        matches!(
            self,
            StimulusKind::Touch
                | StimulusKind::Pressure
                | StimulusKind::Penetration
                | StimulusKind::Pain
        )
    }
}

/// How a touch lands. The quality scales its effective intensity and carries
/// its own side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchQuality {
    Teasing,
    Gentle,
    Firm,
    Rough,
    Brutal,
}

impl TouchQuality {
    /// Intensity multiplier applied before any other touch math.
    pub fn multiplier(self) -> f32 {
        match self {
            TouchQuality::Teasing => 0.6,
            TouchQuality::Gentle => 0.8,
            TouchQuality::Firm => 1.0,
            TouchQuality::Rough => 1.3,
            TouchQuality::Brutal => 1.6,
        }
    }
}

/// The six recognized emotional stimulus kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionKind {
    Praise,
    Degradation,
    Tenderness,
    Fear,
    Anticipation,
    Relief,
}

/// Scripted environmental contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentKind {
    Bath,
    Shower,
    Rain,
    Wind,
    Fabric,
}

/// Optional channel values accompanying an environmental sensation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EnvironmentParams {
    /// -50 to +50.
    pub temperature: Option<f32>,
    /// 0-100.
    pub wetness: Option<f32>,
    /// -100 to +100.
    pub texture: Option<f32>,
    /// 0-100.
    pub pressure: Option<f32>,
}

/// Loose wire form of a stimulus, as received from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StimulusEvent {
    pub kind: StimulusKind,
    pub intensity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<BodyZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<TouchQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionKind>,
}

impl StimulusEvent {
    pub fn touch(zone: BodyZone, intensity: f32, quality: TouchQuality) -> Self {
        Self {
            kind: StimulusKind::Touch,
            intensity,
            zone: Some(zone),
            quality: Some(quality),
            emotion: None,
        }
    }

    pub fn pressure(zone: BodyZone, intensity: f32) -> Self {
        Self {
            kind: StimulusKind::Pressure,
            intensity,
            zone: Some(zone),
            quality: None,
            emotion: None,
        }
    }

    pub fn pain(zone: BodyZone, intensity: f32) -> Self {
        Self {
            kind: StimulusKind::Pain,
            intensity,
            zone: Some(zone),
            quality: None,
            emotion: None,
        }
    }

    pub fn temperature(zone: Option<BodyZone>, intensity: f32) -> Self {
        Self {
            kind: StimulusKind::Temperature,
            intensity,
            zone,
            quality: None,
            emotion: None,
        }
    }

    pub fn penetration(intensity: f32) -> Self {
        Self {
            kind: StimulusKind::Penetration,
            intensity,
            zone: None,
            quality: None,
            emotion: None,
        }
    }

    pub fn edge(intensity: f32) -> Self {
        Self {
            kind: StimulusKind::Edge,
            intensity,
            zone: None,
            quality: None,
            emotion: None,
        }
    }

    pub fn release() -> Self {
        Self {
            kind: StimulusKind::Release,
            intensity: 100.0,
            zone: None,
            quality: None,
            emotion: None,
        }
    }

    pub fn emotional(kind: EmotionKind, intensity: f32) -> Self {
        Self {
            kind: StimulusKind::Emotional,
            intensity,
            zone: None,
            quality: None,
            emotion: Some(kind),
        }
    }
}

/// Validated, tagged stimulus. Each variant carries exactly its required
/// fields. Touch, pressure and pain tolerate a missing zone: the event is
/// still recorded (it counts as physical contact for gating) but produces no
/// local zone change.
#[derive(Debug, Clone, PartialEq)]
pub enum Stimulus {
    Touch {
        zone: Option<BodyZone>,
        intensity: f32,
        quality: Option<TouchQuality>,
    },
    Pressure {
        zone: Option<BodyZone>,
        intensity: f32,
    },
    Pain {
        zone: Option<BodyZone>,
        intensity: f32,
    },
    Temperature {
        zone: Option<BodyZone>,
        intensity: f32,
    },
    Penetration {
        intensity: f32,
    },
    Edge {
        intensity: f32,
    },
    Release,
    Emotional {
        kind: EmotionKind,
        intensity: f32,
    },
}

impl Stimulus {
    pub fn kind(&self) -> StimulusKind {
        match self {
            Stimulus::Touch { .. } => StimulusKind::Touch,
            Stimulus::Pressure { .. } => StimulusKind::Pressure,
            Stimulus::Pain { .. } => StimulusKind::Pain,
            Stimulus::Temperature { .. } => StimulusKind::Temperature,
            Stimulus::Penetration { .. } => StimulusKind::Penetration,
            Stimulus::Edge { .. } => StimulusKind::Edge,
            Stimulus::Release => StimulusKind::Release,
            Stimulus::Emotional { .. } => StimulusKind::Emotional,
        }
    }

    /// The zone the caller explicitly named, if any.
    pub fn zone(&self) -> Option<BodyZone> {
        match self {
            Stimulus::Touch { zone, .. }
            | Stimulus::Pressure { zone, .. }
            | Stimulus::Pain { zone, .. }
            | Stimulus::Temperature { zone, .. } => *zone,
            _ => None,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Stimulus::Touch { intensity, .. }
            | Stimulus::Pressure { intensity, .. }
            | Stimulus::Pain { intensity, .. }
            | Stimulus::Temperature { intensity, .. }
            | Stimulus::Penetration { intensity }
            | Stimulus::Edge { intensity }
            | Stimulus::Emotional { intensity, .. } => *intensity,
            Stimulus::Release => 100.0,
        }
    }
}

impl TryFrom<StimulusEvent> for Stimulus {
    type Error = SomaError;

    fn try_from(event: StimulusEvent) -> Result<Self, Self::Error> {
        let StimulusEvent {
            kind,
            intensity,
            zone,
            quality,
            emotion,
        } = event;

        Ok(match kind {
            StimulusKind::Touch => Stimulus::Touch {
                zone,
                intensity,
                quality,
            },
            StimulusKind::Pressure => Stimulus::Pressure { zone, intensity },
            StimulusKind::Pain => Stimulus::Pain { zone, intensity },
            StimulusKind::Temperature => Stimulus::Temperature { zone, intensity },
            StimulusKind::Penetration => Stimulus::Penetration { intensity },
            StimulusKind::Edge => Stimulus::Edge { intensity },
            StimulusKind::Release => Stimulus::Release,
            StimulusKind::Emotional => Stimulus::Emotional {
                kind: emotion.ok_or(SomaError::MissingEmotionKind)?,
                intensity,
            },
        })
    }
}

/// One detected stimulus from the external text extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedStimulus {
    pub kind: StimulusKind,
    /// Scales the extraction's base intensity for this stimulus.
    pub multiplier: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<TouchQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionKind>,
}

/// Structured output of the external natural-language stimulus extractor.
///
/// The engine applies each detected stimulus at `base_intensity * multiplier`,
/// once per mentioned zone, or zonelessly when no zone was mentioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextExtraction {
    pub stimuli: Vec<DetectedStimulus>,
    pub zones: Vec<BodyZone>,
    pub base_intensity: f32,
}
