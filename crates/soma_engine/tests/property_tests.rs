//! Property-based tests for the Soma engine.
//!
//! The central invariant: for any sequence of stimulus events and ticks,
//! every bounded channel in the snapshot stays within its documented range
//! and every history stays within its capacity.

use proptest::prelude::*;
use soma_core::{
    BodyZone, EmotionKind, EnvironmentKind, EnvironmentParams, StimulusEvent, TouchQuality,
};
use soma_engine::{ManualClock, Soma, VitalsSummary};
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

fn arb_zone() -> impl Strategy<Value = BodyZone> {
    (0usize..19).prop_map(|i| BodyZone::ALL[i])
}

fn arb_quality() -> impl Strategy<Value = TouchQuality> {
    prop_oneof![
        Just(TouchQuality::Teasing),
        Just(TouchQuality::Gentle),
        Just(TouchQuality::Firm),
        Just(TouchQuality::Rough),
        Just(TouchQuality::Brutal),
    ]
}

fn arb_emotion() -> impl Strategy<Value = EmotionKind> {
    prop_oneof![
        Just(EmotionKind::Praise),
        Just(EmotionKind::Degradation),
        Just(EmotionKind::Tenderness),
        Just(EmotionKind::Fear),
        Just(EmotionKind::Anticipation),
        Just(EmotionKind::Relief),
    ]
}

/// One step of a session: a stimulus, an environmental sensation, or a tick
/// with some elapsed time.
#[derive(Debug, Clone)]
enum Step {
    Event(StimulusEvent),
    Environment(EnvironmentKind, EnvironmentParams),
    Tick(f64),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (arb_zone(), 0.0f32..=100.0, arb_quality())
            .prop_map(|(z, i, q)| Step::Event(StimulusEvent::touch(z, i, q))),
        (arb_zone(), 0.0f32..=100.0).prop_map(|(z, i)| Step::Event(StimulusEvent::pressure(z, i))),
        (arb_zone(), 0.0f32..=100.0).prop_map(|(z, i)| Step::Event(StimulusEvent::pain(z, i))),
        (proptest::option::of(arb_zone()), -50.0f32..=50.0)
            .prop_map(|(z, i)| Step::Event(StimulusEvent::temperature(z, i))),
        (0.0f32..=100.0).prop_map(|i| Step::Event(StimulusEvent::penetration(i))),
        (0.0f32..=100.0).prop_map(|i| Step::Event(StimulusEvent::edge(i))),
        Just(Step::Event(StimulusEvent::release())),
        (arb_emotion(), 0.0f32..=100.0)
            .prop_map(|(e, i)| Step::Event(StimulusEvent::emotional(e, i))),
        (
            prop_oneof![
                Just(EnvironmentKind::Bath),
                Just(EnvironmentKind::Shower),
                Just(EnvironmentKind::Rain),
                Just(EnvironmentKind::Wind),
                Just(EnvironmentKind::Fabric),
            ],
            proptest::option::of(-50.0f32..=50.0),
            proptest::option::of(0.0f32..=100.0),
            proptest::option::of(-100.0f32..=100.0),
            proptest::option::of(0.0f32..=100.0),
        )
            .prop_map(|(kind, temperature, wetness, texture, pressure)| {
                Step::Environment(
                    kind,
                    EnvironmentParams {
                        temperature,
                        wetness,
                        texture,
                        pressure,
                    },
                )
            }),
        (0.0f64..=60.0).prop_map(Step::Tick),
    ]
}

fn assert_summary_in_range(summary: &VitalsSummary) -> Result<(), TestCaseError> {
    let unit_channels = [
        ("arousal", summary.arousal),
        ("pain", summary.pain),
        ("sensitivity", summary.sensitivity),
        ("pressure", summary.pressure),
        ("tingles", summary.tingles),
        ("ache", summary.ache),
        ("fullness", summary.fullness),
        ("emptiness", summary.emptiness),
        ("relaxation", summary.relaxation),
        ("muscle_tension", summary.muscle_tension),
        ("focus", summary.focus),
        ("clarity", summary.clarity),
        ("presence", summary.presence),
        ("overwhelm", summary.overwhelm),
        ("contentment", summary.contentment),
        ("excitement", summary.excitement),
        ("vulnerability", summary.vulnerability),
        ("edge_pressure", summary.edge_pressure),
        ("peak_arousal", summary.peak_arousal),
        ("edge_stability", summary.edge_stability),
        ("orgasmic_pressure", summary.orgasmic_pressure),
        ("refractory_intensity", summary.refractory_intensity),
        ("trembling", summary.trembling),
        ("muscle_contraction", summary.muscle_contraction),
        ("physical_wetness", summary.physical_wetness),
        ("flush", summary.flush),
        ("body_tautness", summary.body_tautness),
        ("dopamine", summary.dopamine),
        ("oxytocin", summary.oxytocin),
        ("endorphins", summary.endorphins),
        ("cortisol", summary.cortisol),
        ("adrenaline", summary.adrenaline),
        ("anticipation", summary.anticipation),
        ("adaptability", summary.adaptability),
    ];
    for (name, value) in unit_channels {
        prop_assert!(
            value.is_finite() && (0.0..=100.0).contains(&value),
            "{} out of [0,100]: {}",
            name,
            value
        );
    }

    let signed_channels = [
        ("pleasure", summary.pleasure),
        ("wetness", summary.wetness),
        ("texture", summary.texture),
        ("comfort", summary.comfort),
    ];
    for (name, value) in signed_channels {
        prop_assert!(
            value.is_finite() && (-100.0..=100.0).contains(&value),
            "{} out of [-100,100]: {}",
            name,
            value
        );
    }

    prop_assert!((-50.0..=50.0).contains(&summary.warmth), "warmth {}", summary.warmth);
    prop_assert!(
        (60.0..=180.0).contains(&summary.heart_rate),
        "heart_rate {}",
        summary.heart_rate
    );
    prop_assert!(
        (8.0..=40.0).contains(&summary.breathing_rate),
        "breathing_rate {}",
        summary.breathing_rate
    );
    prop_assert!(
        (30.0..=40.0).contains(&summary.skin_temperature),
        "skin_temperature {}",
        summary.skin_temperature
    );
    prop_assert!(summary.cumulative_pleasure >= 0.0);
    prop_assert!(summary.time_at_high_arousal >= 0.0);
    prop_assert!(
        (0.3..=1.5).contains(&summary.model_temperature),
        "model_temperature {}",
        summary.model_temperature
    );
    Ok(())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// **Range invariant** over arbitrary event sequences.
    #[test]
    fn all_channels_stay_in_range(steps in prop::collection::vec(arb_step(), 0..80)) {
        let clock = Arc::new(ManualClock::new());
        let mut soma = Soma::with_clock(clock.clone());

        for step in steps {
            match step {
                Step::Event(event) => {
                    soma.apply_stimulus(event).unwrap();
                }
                Step::Environment(kind, params) => {
                    soma.apply_environment(kind, params);
                }
                Step::Tick(dt) => {
                    clock.advance(dt);
                    soma.tick();
                }
            }
            assert_summary_in_range(&soma.vitals_summary())?;
        }
    }

    /// Climax count never decreases, and PNR can only be cleared by a climax
    /// (observable as a count increase).
    #[test]
    fn pnr_clears_only_with_climax(steps in prop::collection::vec(arb_step(), 0..80)) {
        let clock = Arc::new(ManualClock::new());
        let mut soma = Soma::with_clock(clock.clone());
        let mut prev_count = 0u32;
        let mut prev_pnr = false;

        for step in steps {
            match step {
                Step::Event(event) => soma.apply_stimulus(event).unwrap(),
                Step::Environment(kind, params) => soma.apply_environment(kind, params),
                Step::Tick(dt) => {
                    clock.advance(dt);
                    soma.tick();
                }
            }
            let summary = soma.vitals_summary();
            prop_assert!(summary.climax_count >= prev_count, "climax count decreased");
            if prev_pnr && !summary.point_of_no_return {
                prop_assert!(
                    summary.climax_count > prev_count,
                    "PNR cleared without a climax"
                );
            }
            prev_count = summary.climax_count;
            prev_pnr = summary.point_of_no_return;
        }
    }

    /// The prompt surface never panics and always carries its header, for
    /// any reachable state.
    #[test]
    fn prompt_context_total(steps in prop::collection::vec(arb_step(), 0..40)) {
        let clock = Arc::new(ManualClock::new());
        let mut soma = Soma::with_clock(clock.clone());
        for step in steps {
            match step {
                Step::Event(event) => soma.apply_stimulus(event).unwrap(),
                Step::Environment(kind, params) => soma.apply_environment(kind, params),
                Step::Tick(dt) => {
                    clock.advance(dt);
                    soma.tick();
                }
            }
        }
        let context = soma.prompt_context();
        prop_assert!(context.starts_with("[BODY STATE]"));
        prop_assert!(context.contains("Model Temperature:"));
    }
}
