//! Tachometer pulse accumulation and RPM conversion.
//!
//! The fan's open-collector tacho line toggles a fixed number of times per
//! rotation.  A GPIO ISR increments a [`PulseCounter`] on each rising edge;
//! the sampling routine in [`FanUnit`](super::FanUnit) takes the count once
//! per window and converts it with [`pulses_to_rpm`].
//!
//! The ISR and the sampling routine run on different contexts, so the count
//! lives in an `AtomicU32`: the ISR never blocks and never allocates.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::TachoConfig;

/// Increment-from-anywhere, take-exclusively pulse accumulator.
///
/// Only two operations mutate it: [`increment`](Self::increment) from the
/// ISR and [`take`](Self::take) from the sampling routine.
#[derive(Debug, Default)]
pub struct PulseCounter {
    count: AtomicU32,
}

impl PulseCounter {
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
        }
    }

    /// Record one edge.  ISR-safe: a single lock-free add.
    #[inline]
    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the accumulated count and reset it to zero in one step.
    pub fn take(&self) -> u32 {
        self.count.swap(0, Ordering::AcqRel)
    }

    /// Current count without resetting (diagnostics).
    pub fn peek(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }
}

/// Edge callback registered for every tachometer pin.
pub fn pulse_isr(counter: &PulseCounter) {
    counter.increment();
}

/// `pulses * (60 / pulses_per_rotation) * (1000 / cycle_ms)`, truncated and
/// saturated to `u16`.
///
/// The window length is the configured cycle, not the measured elapsed time,
/// so a late sample slightly overstates the speed.
pub fn pulses_to_rpm(pulses: u32, tacho: &TachoConfig) -> u16 {
    if tacho.pulses_per_rotation == 0 || tacho.sample_cycle_ms == 0 {
        return 0;
    }
    let rpm = pulses as f32
        * (60.0 / tacho.pulses_per_rotation as f32)
        * (1000.0 / tacho.sample_cycle_ms as f32);
    rpm.min(u16::MAX as f32) as u16
}
