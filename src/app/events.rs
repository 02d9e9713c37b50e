//! Outbound run-loop events.
//!
//! The [`FanScheduler`](crate::scheduler::FanScheduler) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  The speed report that
//! closes every run window is one of them; it is diagnostic only and has no
//! effect on control.

use crate::error::Error;
use crate::scheduler::CyclePhase;

/// Structured events emitted by the fan run loop.
#[derive(Debug, Clone, PartialEq)]
pub enum FanEvent {
    /// A new run/idle cycle begins.
    CycleStarted { cycle: u64 },

    /// The loop entered `phase` and will hold for `hold_secs`.
    PhaseEntered { phase: CyclePhase, hold_secs: u32 },

    /// Measured speed of one fan at the end of a run window.
    SpeedReport {
        name: &'static str,
        rpm: u16,
        power: u8,
    },

    /// Switching a fan on or off failed.  The sweep continues with the
    /// remaining fans.
    PowerFailed { name: &'static str, error: Error },

    /// The loop returned after a shutdown request.
    Stopped { cycle: u64 },
}
