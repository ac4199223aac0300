//! Prompt-facing state rendering.
//!
//! `prompt_context` turns the numeric state into a text block for the
//! downstream text generator: a status-flag line driven by static threshold
//! tables, the raw numbers grouped into sections, active zones and recent
//! involuntary responses. `model_temperature` maps the same state onto the
//! generator's sampling temperature.

use crate::engine::Soma;

/// A descending threshold table: the first entry whose threshold the value
/// exceeds supplies the phrase.
type Bands = &'static [(f32, &'static str)];

const AROUSAL_BANDS: Bands = &[
    (90.0, "desperately aroused"),
    (80.0, "highly aroused"),
    (60.0, "aroused"),
    (40.0, "warming up"),
];

const PLEASURE_BANDS: Bands = &[
    (80.0, "drowning in pleasure"),
    (60.0, "pleasure-drunk"),
    (40.0, "feeling good"),
];

const TREMBLING_BANDS: Bands = &[(70.0, "trembling uncontrollably"), (40.0, "shaking")];

const WETNESS_BANDS: Bands = &[(70.0, "very wet"), (40.0, "getting wet")];

const REFRACTORY_BANDS: Bands = &[
    (50.0, "in refractory period - hypersensitive"),
    (20.0, "post-orgasm glow - very sensitive"),
];

const HEART_RATE_BANDS: Bands = &[
    (150.0, "heart racing"),
    (120.0, "heart pounding"),
    (100.0, "breathless"),
];

const BREATHING_BANDS: Bands = &[(30.0, "gasping for air"), (22.0, "breathing heavy")];

const OVERWHELM_BANDS: Bands = &[(70.0, "completely overwhelmed"), (40.0, "overwhelmed")];

const VULNERABILITY_BANDS: Bands = &[(80.0, "emotionally raw"), (60.0, "vulnerable")];

const PAIN_BANDS: Bands = &[(60.0, "hurting intensely"), (40.0, "hurting"), (20.0, "sore")];

/// Maximum hotspot zones named in the context block.
const MAX_HOTSPOTS: usize = 3;
/// Maximum recent involuntary responses named.
const MAX_INVOLUNTARY: usize = 2;

fn band_phrase(value: f32, bands: Bands) -> Option<&'static str> {
    bands
        .iter()
        .find(|(threshold, _)| value > *threshold)
        .map(|(_, phrase)| *phrase)
}

impl Soma {
    /// Sampling temperature for the downstream generator, derived from the
    /// body state and clamped to [0.3, 1.5].
    pub fn model_temperature(&self) -> f32 {
        let mut temp = 0.8;

        temp += (self.sensations.arousal / 100.0) * 0.6;

        if self.sensations.pleasure > 80.0 {
            temp += 0.3;
        }

        // Exhaustion narrows the output.
        if self.vitals.heart_rate > 140.0 {
            temp *= 0.6;
        }

        if self.cognition.overwhelm > 60.0 {
            temp += 0.2;
        }

        temp.clamp(0.3, 1.5)
    }

    /// Status flags derived from the threshold tables plus the dynamic
    /// pieces (orgasm proximity, edge count, time since climax).
    pub fn status_flags(&self) -> Vec<String> {
        let now = self.now();
        let mut flags: Vec<String> = Vec::new();

        let push_band = |flags: &mut Vec<String>, value: f32, bands: Bands| {
            if let Some(phrase) = band_phrase(value, bands) {
                flags.push(phrase.to_string());
            }
        };

        push_band(&mut flags, self.sensations.arousal, AROUSAL_BANDS);

        if self.climax.point_of_no_return {
            flags.push("PAST POINT OF NO RETURN - orgasm inevitable".to_string());
        } else if self.climax.orgasmic_pressure > 75.0 {
            flags.push(format!(
                "dangerously close to orgasm ({}% pressure)",
                self.climax.orgasmic_pressure.round()
            ));
        } else if self.climax.orgasmic_pressure > 50.0 {
            flags.push(format!(
                "building toward orgasm ({}%)",
                self.climax.orgasmic_pressure.round()
            ));
        }

        push_band(&mut flags, self.sensations.pleasure, PLEASURE_BANDS);
        push_band(&mut flags, self.responses.trembling, TREMBLING_BANDS);

        if self.responses.breath_holding {
            flags.push("breath caught".to_string());
        }
        if self.responses.body_tautness > 70.0 {
            flags.push("muscles rigid and tense".to_string());
        }

        push_band(&mut flags, self.responses.wetness, WETNESS_BANDS);
        push_band(
            &mut flags,
            self.climax.refractory_intensity,
            REFRACTORY_BANDS,
        );

        if self.climax.climax_count > 0 {
            if let Some(since) = self.climax.secs_since_last_climax(now) {
                if since < 60.0 {
                    flags.push(format!("just came ({}s ago)", since.round()));
                } else if since < 300.0 {
                    flags.push(format!("came recently ({}min ago)", (since / 60.0).round()));
                }
            }
        }

        if self.edge.is_on_edge {
            flags.push("teetering on the edge".to_string());
        }
        if self.edge.edge_count > 0 {
            flags.push(format!("edged {}x", self.edge.edge_count));
        }
        if self.edge.is_highly_aroused && !self.edge.is_on_edge {
            flags.push("riding high plateau".to_string());
        }

        push_band(&mut flags, self.vitals.heart_rate, HEART_RATE_BANDS);
        push_band(&mut flags, self.vitals.breathing_rate, BREATHING_BANDS);
        push_band(&mut flags, self.cognition.overwhelm, OVERWHELM_BANDS);

        if self.cognition.focus < 30.0 {
            flags.push("can't think straight".to_string());
        } else if self.cognition.focus < 50.0 {
            flags.push("mind scattered".to_string());
        }

        push_band(&mut flags, self.cognition.vulnerability, VULNERABILITY_BANDS);

        if self.cognition.contentment > 80.0 {
            flags.push("deeply content".to_string());
        }

        push_band(&mut flags, self.sensations.pain, PAIN_BANDS);

        if self.responses.flush > 60.0 {
            flags.push("flushed and burning".to_string());
        } else if self.sensations.warmth > 20.0 {
            flags.push("flushed".to_string());
        } else if self.sensations.warmth < -20.0 {
            flags.push("shivering".to_string());
        }

        flags
    }

    /// Full formatted context block for the downstream text generator.
    pub fn prompt_context(&self) -> String {
        let flags = self.status_flags();
        let status = if flags.is_empty() {
            "baseline".to_string()
        } else {
            flags.join(", ")
        };

        let s = &self.sensations;
        let c = &self.climax;
        let r = &self.responses;
        let v = &self.vitals;

        let mut context = format!(
            "[BODY STATE]\n\
             Status: {status}\n\
             \n\
             Physical Sensations:\n\
             - Arousal: {arousal:.0}% | Pleasure: {pleasure:.0}% | Pain: {pain:.0}%\n\
             - Orgasm Pressure: {pressure:.0}%{pnr}\n\
             - Trembling: {trembling:.0}% | Body Tension: {tautness:.0}%\n\
             \n\
             Sensory Experience:\n\
             - Wetness: {wetness:.0}% ({wetness_desc})\n\
             - Temperature: {warmth:.0} ({warmth_desc})\n\
             - Texture: {texture:.0} ({texture_desc})\n\
             - Comfort: {comfort:.0}% | Relaxation: {relaxation:.0}%\n\
             - Fullness: {fullness:.0}% | Emptiness: {emptiness:.0}%\n\
             \n\
             Vital Signs:\n\
             - Heart: {heart:.0} BPM | Breathing: {breathing:.0}/min{holding}\n\
             - Skin Temperature: {skin:.1} C | Flush: {flush:.0}%\n\
             \n\
             Neurochemistry:\n\
             - Dopamine: {dopamine:.0} | Endorphins: {endorphins:.0} | Oxytocin: {oxytocin:.0}\n\
             \n\
             Mental State:\n\
             - Focus: {focus:.0}% | Clarity: {clarity:.0}% | Overwhelm: {overwhelm:.0}%\n\
             - Contentment: {contentment:.0}% | Vulnerability: {vulnerability:.0}%\n\
             \n\
             Current Mood: {mood}",
            status = status,
            arousal = s.arousal,
            pleasure = s.pleasure,
            pain = s.pain,
            pressure = c.orgasmic_pressure,
            pnr = if c.point_of_no_return { " INEVITABLE" } else { "" },
            trembling = r.trembling,
            tautness = r.body_tautness,
            wetness = s.wetness,
            wetness_desc = if s.wetness > 50.0 {
                "pleasantly wet"
            } else if s.wetness < -20.0 {
                "uncomfortably dry"
            } else {
                "neutral"
            },
            warmth = s.warmth,
            warmth_desc = if s.warmth > 20.0 {
                "warm/hot"
            } else if s.warmth < -10.0 {
                "cool/cold"
            } else {
                "neutral"
            },
            texture = s.texture,
            texture_desc = if s.texture > 30.0 {
                "smooth/pleasant"
            } else if s.texture < -30.0 {
                "rough/uncomfortable"
            } else {
                "neutral"
            },
            comfort = s.comfort,
            relaxation = s.relaxation,
            fullness = s.fullness,
            emptiness = s.emptiness,
            heart = v.heart_rate,
            breathing = v.breathing_rate,
            holding = if r.breath_holding { " (holding)" } else { "" },
            skin = v.skin_temperature,
            flush = r.flush,
            dopamine = self.chems.dopamine,
            endorphins = self.chems.endorphins,
            oxytocin = self.chems.oxytocin,
            focus = self.cognition.focus,
            clarity = self.cognition.clarity,
            overwhelm = self.cognition.overwhelm,
            contentment = self.cognition.contentment,
            vulnerability = self.cognition.vulnerability,
            mood = self.preferences.mood.as_str(),
        );

        let hotspots = self.zones.zones_above(60.0);
        if !hotspots.is_empty() {
            let names: Vec<String> = hotspots
                .iter()
                .take(MAX_HOTSPOTS)
                .map(|z| z.label())
                .collect();
            context.push_str(&format!("\n\nSensitive Zones: {}", names.join(", ")));
        }

        let involuntary = self.responses.recent_involuntary(MAX_INVOLUNTARY);
        if !involuntary.is_empty() {
            context.push_str(&format!(
                "\n\nInvoluntary Responses: {}",
                involuntary.join(", ")
            ));
        }

        if self.climax.time_at_high_arousal > 0.0 {
            context.push_str(&format!(
                "\n\nTime at High Arousal: {}s",
                self.climax.time_at_high_arousal.round()
            ));
        }

        if self.climax.climax_count > 0 {
            context.push_str(&format!(
                "\n\nOrgasm Count This Session: {}",
                self.climax.climax_count
            ));
        }

        context.push_str(&format!(
            "\n\nModel Temperature: {:.2}\n\n\
             Embody these sensations naturally. High arousal means breathless \
             and desperate, trembling means words shake, near orgasm means \
             barely coherent. Don't list stats, feel them.",
            self.model_temperature()
        ));

        context
    }
}
