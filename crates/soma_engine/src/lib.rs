//! # Soma Engine
//!
//! The physiological state engine behind an interactive companion: stimulus
//! routing with release gating, zone cascade and arousal momentum, the
//! climax buildup state machine with its point of no return and staged
//! recovery, and a time-normalized decay scheduler.
//!
//! ## Architecture
//!
//! - [`Soma`] is the synchronous engine: apply stimuli, call [`Soma::tick`]
//!   on a cadence (or embed it and drive ticks manually), read snapshots.
//! - [`SomaSession`] wraps an engine in a background tokio task: a heartbeat
//!   interval drives ticks, stimuli arrive over a channel, and every change
//!   broadcasts a [`VitalsSummary`] on a watch channel.
//! - Time is injectable through [`Clock`]; tests use [`ManualClock`] to make
//!   buildup windows and recovery waves deterministic.
//!
//! State semantics live in `soma_core`; this crate owns the event flow.

pub mod clock;
pub mod engine;
pub mod prompt;
pub mod schedule;
pub mod session;
pub mod snapshot;
pub mod tick;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::Soma;
pub use schedule::RecoveryWave;
pub use session::SomaSession;
pub use snapshot::VitalsSummary;
pub use tick::TickConfig;
