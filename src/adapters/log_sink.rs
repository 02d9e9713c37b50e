//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing run-loop events to the ESP-IDF
//! logger (UART in production).  A web status feed would implement the
//! same trait.

use log::{info, warn};

use crate::app::events::FanEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`FanEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &FanEvent) {
        match event {
            FanEvent::CycleStarted { cycle } => {
                info!("CYCLE | #{} start", cycle);
            }
            FanEvent::PhaseEntered { phase, hold_secs } => {
                info!("PHASE | {:?} (hold {}s)", phase, hold_secs);
            }
            FanEvent::SpeedReport { name, rpm, power } => {
                info!("SPEED | {} | {} rpm | power={}%", name, rpm, power);
            }
            FanEvent::PowerFailed { name, error } => {
                warn!("POWER | {} | {}", name, error);
            }
            FanEvent::Stopped { cycle } => {
                info!("CYCLE | stopped after #{}", cycle);
            }
        }
    }
}
