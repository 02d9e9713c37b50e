//! Port traits: the hexagonal boundary between fan logic and the outside world.
//!
//! ```text
//!   LedcPwm / SimPwm ─────▶ PwmPeripheral ─┐
//!   GpioEdgeInput / Sim ──▶ EdgeInput ─────┼──▶ FanUnit / FanRegistry
//!   Esp32TimeAdapter ─────▶ TimePort ──────┘          │
//!                                                     ▼
//!                               EventSink ◀── FanScheduler (run loop)
//! ```
//!
//! Peripheral ports take `&self`: one controller instance is shared by every
//! fan and by concurrent callers, so implementations synchronise internally
//! (the ESP-IDF LEDC/GPIO drivers already do).

use std::sync::Arc;

use crate::error::{ActuatorError, HwInitError};
use crate::fan::tacho::PulseCounter;

use super::events::FanEvent;

// ───────────────────────────────────────────────────────────────
// PWM peripheral
// ───────────────────────────────────────────────────────────────

/// Everything needed to bring up one PWM output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmChannelConfig {
    pub pin: i32,
    pub channel: u32,
    pub timer: u32,
    pub resolution_bits: u32,
    pub frequency_hz: u32,
    pub initial_duty: u32,
}

/// PWM controller shared by all fans (LEDC on the ESP32).
pub trait PwmPeripheral: Send + Sync {
    /// Program timer and channel.  Called once per fan at startup.
    fn configure_channel(&self, config: &PwmChannelConfig) -> Result<(), HwInitError>;

    /// Stage a new duty value.  Takes effect on [`commit_duty`](Self::commit_duty).
    fn set_duty(&self, channel: u32, duty: u32) -> Result<(), ActuatorError>;

    /// Latch the staged duty into the output.
    fn commit_duty(&self, channel: u32) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Edge-triggered digital input
// ───────────────────────────────────────────────────────────────

/// Which transitions raise an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    Rising,
    Falling,
    Any,
}

/// Input bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullMode {
    Up,
    Down,
    Floating,
}

/// Interrupt callback.  Runs in ISR context: bounded, allocation-free.
pub type EdgeCallback = fn(&PulseCounter);

/// GPIO input with per-pin interrupt callbacks.
pub trait EdgeInput: Send + Sync {
    fn configure_input(&self, pin: i32, edge: EdgeMode, pull: PullMode)
        -> Result<(), HwInitError>;

    /// Bind `callback` to `pin`; it is invoked with `context` on every
    /// qualifying edge.  The implementation keeps `context` alive for as
    /// long as the handler stays registered.
    fn register_edge_callback(
        &self,
        pin: i32,
        callback: EdgeCallback,
        context: Arc<PulseCounter>,
    ) -> Result<(), HwInitError>;

    fn disable_interrupt(&self, pin: i32);

    fn enable_interrupt(&self, pin: i32);
}

// ───────────────────────────────────────────────────────────────
// Time source
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds since boot.
pub trait TimePort: Send + Sync {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink (run loop → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The run loop emits structured [`FanEvent`]s through this port.
/// Adapters decide where they go (serial log, web status page, tests).
pub trait EventSink {
    fn emit(&mut self, event: &FanEvent);
}
