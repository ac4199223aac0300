//! Session configuration.
//!
//! Loaded from a TOML file with every field defaulted, then overridden from
//! environment variables. Embedding callers usually just use
//! `SomaConfig::default()`.

use crate::dynamics::DecayRates;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SomaConfig {
    /// Decay tick interval in milliseconds.
    pub tick_interval_ms: u64,
    /// Largest elapsed gap a single tick will integrate, in seconds. A
    /// paused-then-resumed session decays once with this cap instead of
    /// replaying the whole gap.
    pub max_tick_gap_secs: f64,
    /// Initial adaptability of the preference learner (0-100).
    pub adaptability: f32,
    /// Decay and homeostasis rates.
    pub rates: DecayRates,
}

impl Default for SomaConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 5_000,
            max_tick_gap_secs: 120.0,
            adaptability: 70.0,
            rates: DecayRates::default(),
        }
    }
}

impl SomaConfig {
    /// Load config from a TOML file, falling back to defaults for missing
    /// fields. Env var overrides are applied afterwards.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: SomaConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if the file is missing or invalid, return
    /// defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SOMA_TICK_INTERVAL_MS") {
            if let Ok(n) = v.parse() {
                self.tick_interval_ms = n;
            }
        }
        if let Ok(v) = std::env::var("SOMA_MAX_TICK_GAP_SECS") {
            if let Ok(n) = v.parse() {
                self.max_tick_gap_secs = n;
            }
        }
        if let Ok(v) = std::env::var("SOMA_ADAPTABILITY") {
            if let Ok(n) = v.parse::<f32>() {
                self.adaptability = n.clamp(0.0, 100.0);
            }
        }
    }
}
