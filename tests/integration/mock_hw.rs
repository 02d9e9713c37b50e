//! Simulated board for integration tests.
//!
//! Wires `SimPwm`, `SimEdgeInput` and a `ManualClock` into a registry
//! holding the two production fans, and records every run-loop event.

use std::sync::Arc;

use fancycle::adapters::time::ManualClock;
use fancycle::app::events::FanEvent;
use fancycle::app::ports::EventSink;
use fancycle::config::{CycleConfig, FanConfig, TachoConfig, default_fans};
use fancycle::drivers::sim::{SimEdgeInput, SimPwm};
use fancycle::fan::FanHardware;
use fancycle::registry::FanRegistry;

// ── Board ─────────────────────────────────────────────────────

pub struct Board {
    pub pwm: Arc<SimPwm>,
    pub input: Arc<SimEdgeInput>,
    pub clock: Arc<ManualClock>,
}

#[allow(dead_code)]
impl Board {
    pub fn new() -> Self {
        Self {
            pwm: Arc::new(SimPwm::new()),
            input: Arc::new(SimEdgeInput::new()),
            clock: Arc::new(ManualClock::new(0)),
        }
    }

    pub fn hardware(&self) -> FanHardware {
        FanHardware {
            pwm: self.pwm.clone(),
            input: self.input.clone(),
            clock: self.clock.clone(),
            tacho: TachoConfig::default(),
        }
    }

    /// Registry with `fans` created but not initialised.
    pub fn registry_with(&self, fans: &[FanConfig], cycle: CycleConfig) -> FanRegistry {
        let mut reg = FanRegistry::new(self.hardware(), cycle);
        for fan in fans {
            reg.create_fan(*fan);
        }
        reg
    }

    /// Both production fans, initialised and shared.
    pub fn ready_registry(&self, cycle: CycleConfig) -> Arc<FanRegistry> {
        let reg = self.registry_with(&default_fans(), cycle);
        reg.initialize_all().expect("sim init");
        Arc::new(reg)
    }

    /// Committed duty, 0 if the channel was never configured.
    pub fn duty(&self, fan: &FanConfig) -> u32 {
        self.pwm.duty(fan.channel).unwrap_or(0)
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<FanEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speed_reports(&self) -> Vec<(&'static str, u16)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FanEvent::SpeedReport { name, rpm, .. } => Some((*name, *rpm)),
                _ => None,
            })
            .collect()
    }

    pub fn power_failures(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FanEvent::PowerFailed { name, .. } => Some(*name),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &FanEvent) {
        self.events.push(event.clone());
    }
}
