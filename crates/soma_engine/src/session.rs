//! Async session wrapper.
//!
//! `SomaSession` owns a `Soma` engine behind a lock and runs its decay tick
//! on a background task. Stimuli arrive over a channel and are applied
//! atomically relative to ticks; every state change broadcasts a fresh
//! snapshot on a watch channel that downstream consumers subscribe to.

use crate::engine::Soma;
use crate::snapshot::VitalsSummary;
use crate::tick::TickConfig;
use soma_core::{SomaConfig, SomaError, Stimulus, StimulusEvent};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;

pub struct SomaSession {
    soma: Arc<RwLock<Soma>>,
    stimulus_tx: mpsc::Sender<StimulusEvent>,
    snapshot_rx: watch::Receiver<VitalsSummary>,
    heartbeat: Mutex<Option<JoinHandle<()>>>,
}

impl SomaSession {
    /// Create a session with default configuration and start its heartbeat.
    pub fn new() -> Self {
        Self::with_config(SomaConfig::default(), TickConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: SomaConfig, tick: TickConfig) -> Self {
        let soma = Soma::with_config(config, Arc::new(crate::clock::SystemClock::new()));
        Self::from_engine(soma, tick)
    }

    /// Wrap an existing engine (e.g. one built on a manual clock).
    pub fn from_engine(soma: Soma, tick: TickConfig) -> Self {
        let initial = soma.vitals_summary();
        let soma = Arc::new(RwLock::new(soma));
        let (stimulus_tx, stimulus_rx) = mpsc::channel(64);
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        let handle = Self::spawn_heartbeat(Arc::clone(&soma), stimulus_rx, snapshot_tx, tick);

        Self {
            soma,
            stimulus_tx,
            snapshot_rx,
            heartbeat: Mutex::new(Some(handle)),
        }
    }

    fn spawn_heartbeat(
        soma: Arc<RwLock<Soma>>,
        mut stimulus_rx: mpsc::Receiver<StimulusEvent>,
        snapshot_tx: watch::Sender<VitalsSummary>,
        tick: TickConfig,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick.interval);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let mut engine = soma.write().await;
                        engine.tick();
                        let _ = snapshot_tx.send(engine.vitals_summary());
                    }

                    Some(event) = stimulus_rx.recv() => {
                        let mut engine = soma.write().await;
                        // The event was validated before it was enqueued, but
                        // the engine re-checks; a failure here is a bug, not
                        // a caller error.
                        if let Err(e) = engine.apply_stimulus(event) {
                            tracing::warn!("dropping invalid stimulus: {}", e);
                        }
                        let _ = snapshot_tx.send(engine.vitals_summary());
                    }
                }
            }
        })
    }

    /// Validate and enqueue a stimulus. Contract violations surface here,
    /// before the event enters the channel.
    pub async fn send_stimulus(&self, event: StimulusEvent) -> anyhow::Result<()> {
        Stimulus::try_from(event.clone())?;
        self.stimulus_tx
            .send(event)
            .await
            .map_err(|e| anyhow::anyhow!("failed to send stimulus: {}", e))
    }

    /// Apply a stimulus synchronously, bypassing the channel. Errors are the
    /// typed contract failures.
    pub async fn apply_stimulus(&self, event: StimulusEvent) -> Result<(), SomaError> {
        let mut engine = self.soma.write().await;
        engine.apply_stimulus(event)
    }

    /// Current full snapshot.
    pub async fn snapshot(&self) -> VitalsSummary {
        self.soma.read().await.vitals_summary()
    }

    /// Subscribe to snapshot broadcasts.
    pub fn subscribe(&self) -> watch::Receiver<VitalsSummary> {
        self.snapshot_rx.clone()
    }

    /// Formatted context block for the downstream generator.
    pub async fn prompt_context(&self) -> String {
        self.soma.read().await.prompt_context()
    }

    /// Current sampling temperature for the downstream generator.
    pub async fn model_temperature(&self) -> f32 {
        self.soma.read().await.model_temperature()
    }

    /// Run one decay cycle immediately.
    pub async fn update(&self) {
        self.soma.write().await.tick();
    }

    /// Stop the heartbeat and cancel every pending deferred effect. After
    /// this, no tick, recovery wave or breath release will fire.
    pub async fn stop(&self) {
        if let Some(handle) = self
            .heartbeat
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            handle.abort();
        }
        self.soma.write().await.cancel_pending_effects();
        tracing::info!("soma session stopped");
    }
}

impl Default for SomaSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SomaSession {
    fn drop(&mut self) {
        if let Some(handle) = self
            .heartbeat
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            handle.abort();
        }
    }
}
