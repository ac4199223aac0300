//! Deferred one-shot effects.
//!
//! The original design fired delayed callbacks from wall-clock timers; here
//! every delayed effect lives in one queue keyed by the session clock and is
//! drained at the top of each tick. Stopping the engine clears the queue, so
//! no effect can fire after shutdown.

/// The three post-climax recovery waves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryWave {
    /// Immediate afterglow, 2 seconds after climax.
    Afterglow,
    /// Settling down, 10 seconds after.
    Settling,
    /// Return to baseline with hypersensitivity, 30 seconds after.
    Baseline,
}

impl RecoveryWave {
    /// Seconds after the climax at which this wave fires.
    pub fn delay_secs(self) -> f64 {
        match self {
            RecoveryWave::Afterglow => 2.0,
            RecoveryWave::Settling => 10.0,
            RecoveryWave::Baseline => 30.0,
        }
    }
}

/// A scheduled one-shot effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    /// Release a held breath.
    BreathRelease,
    /// Apply a post-climax recovery wave.
    Wave(RecoveryWave),
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: f64,
    effect: Deferred,
}

/// Queue of pending one-shot effects, drained in due order.
#[derive(Debug, Default)]
pub struct EffectQueue {
    pending: Vec<Pending>,
}

impl EffectQueue {
    pub fn schedule(&mut self, due: f64, effect: Deferred) {
        self.pending.push(Pending { due, effect });
    }

    /// Remove and return every effect due at or before `now`, ordered by due
    /// time.
    pub fn take_due(&mut self, now: f64) -> Vec<Deferred> {
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due <= now {
                due.push(*p);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.partial_cmp(&b.due).unwrap_or(std::cmp::Ordering::Equal));
        due.into_iter().map(|p| p.effect).collect()
    }

    /// Drop every pending effect. Used on engine stop.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_delays() {
        assert_eq!(RecoveryWave::Afterglow.delay_secs(), 2.0);
        assert_eq!(RecoveryWave::Settling.delay_secs(), 10.0);
        assert_eq!(RecoveryWave::Baseline.delay_secs(), 30.0);
    }

    #[test]
    fn test_take_due_respects_order_and_cutoff() {
        let mut q = EffectQueue::default();
        q.schedule(10.0, Deferred::Wave(RecoveryWave::Settling));
        q.schedule(2.0, Deferred::Wave(RecoveryWave::Afterglow));
        q.schedule(30.0, Deferred::Wave(RecoveryWave::Baseline));

        let due = q.take_due(12.0);
        assert_eq!(
            due,
            vec![
                Deferred::Wave(RecoveryWave::Afterglow),
                Deferred::Wave(RecoveryWave::Settling)
            ]
        );
        assert_eq!(q.len(), 1, "baseline wave still pending");
    }

    #[test]
    fn test_take_due_is_one_shot() {
        let mut q = EffectQueue::default();
        q.schedule(1.0, Deferred::BreathRelease);
        assert_eq!(q.take_due(5.0).len(), 1);
        assert!(q.take_due(5.0).is_empty());
    }

    #[test]
    fn test_clear_cancels_everything() {
        let mut q = EffectQueue::default();
        q.schedule(2.0, Deferred::BreathRelease);
        q.schedule(30.0, Deferred::Wave(RecoveryWave::Baseline));
        q.clear();
        assert!(q.is_empty());
        assert!(q.take_due(1000.0).is_empty());
    }
}
