//! In-memory peripherals for host builds and tests.
//!
//! [`SimPwm`] stands in for the LEDC controller and [`SimEdgeInput`] for the
//! GPIO interrupt matrix.  Both record what the fan logic asked of them and
//! can be told to fail, so host tests exercise the same code paths as the
//! firmware.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::debug;

use crate::app::ports::{
    EdgeCallback, EdgeInput, EdgeMode, PullMode, PwmChannelConfig, PwmPeripheral,
};
use crate::error::{ActuatorError, HwInitError};
use crate::fan::lock;
use crate::fan::tacho::PulseCounter;

/// ESP_ERR_INVALID_STATE, returned by LEDC/GPIO calls on unconfigured pins.
const ERR_INVALID_STATE: i32 = 0x103;

// ── PWM ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct SimChannel {
    config: PwmChannelConfig,
    staged: u32,
    duty: u32,
    history: Vec<u32>,
}

#[derive(Default)]
struct SimPwmState {
    channels: HashMap<u32, SimChannel>,
    /// timer → owning PWM pin
    timers: HashMap<u32, i32>,
    configure_count: usize,
    fail_configure: Option<HwInitError>,
    fail_writes: bool,
}

/// Simulated LEDC controller.
#[derive(Default)]
pub struct SimPwm {
    state: Mutex<SimPwmState>,
}

impl SimPwm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed duty of `channel`, or `None` if never configured.
    pub fn duty(&self, channel: u32) -> Option<u32> {
        lock(&self.state).channels.get(&channel).map(|c| c.duty)
    }

    /// Every committed duty of `channel`, starting with the initial duty.
    pub fn history(&self, channel: u32) -> Vec<u32> {
        lock(&self.state)
            .channels
            .get(&channel)
            .map(|c| c.history.clone())
            .unwrap_or_default()
    }

    pub fn channel_config(&self, channel: u32) -> Option<PwmChannelConfig> {
        lock(&self.state).channels.get(&channel).map(|c| c.config)
    }

    /// Successful `configure_channel` calls so far.
    pub fn configure_count(&self) -> usize {
        lock(&self.state).configure_count
    }

    /// Make the next `configure_channel` fail with `err`.
    pub fn fail_next_configure(&self, err: HwInitError) {
        lock(&self.state).fail_configure = Some(err);
    }

    /// Make every duty write fail until switched off again.
    pub fn fail_writes(&self, fail: bool) {
        lock(&self.state).fail_writes = fail;
    }
}

impl PwmPeripheral for SimPwm {
    fn configure_channel(&self, config: &PwmChannelConfig) -> Result<(), HwInitError> {
        let mut s = lock(&self.state);
        if let Some(err) = s.fail_configure.take() {
            return Err(err);
        }

        let conflict = HwInitError::ResourceConflict {
            channel: config.channel,
            timer: config.timer,
        };
        if s.channels
            .get(&config.channel)
            .is_some_and(|c| c.config.pin != config.pin)
        {
            return Err(conflict);
        }
        if s.timers
            .get(&config.timer)
            .is_some_and(|&pin| pin != config.pin)
        {
            return Err(conflict);
        }

        s.timers.insert(config.timer, config.pin);
        s.channels.insert(
            config.channel,
            SimChannel {
                config: *config,
                staged: config.initial_duty,
                duty: config.initial_duty,
                history: vec![config.initial_duty],
            },
        );
        s.configure_count += 1;
        debug!(
            "pwm(sim): ch {} on GPIO {} @ {} Hz",
            config.channel, config.pin, config.frequency_hz
        );
        Ok(())
    }

    fn set_duty(&self, channel: u32, duty: u32) -> Result<(), ActuatorError> {
        let mut s = lock(&self.state);
        if s.fail_writes {
            return Err(ActuatorError::PwmWriteFailed(-1));
        }
        let ch = s
            .channels
            .get_mut(&channel)
            .ok_or(ActuatorError::PwmWriteFailed(ERR_INVALID_STATE))?;
        ch.staged = duty;
        Ok(())
    }

    fn commit_duty(&self, channel: u32) -> Result<(), ActuatorError> {
        let mut s = lock(&self.state);
        if s.fail_writes {
            return Err(ActuatorError::PwmWriteFailed(-1));
        }
        let ch = s
            .channels
            .get_mut(&channel)
            .ok_or(ActuatorError::PwmWriteFailed(ERR_INVALID_STATE))?;
        ch.duty = ch.staged;
        ch.history.push(ch.duty);
        Ok(())
    }
}

// ── Edge input ────────────────────────────────────────────────

/// A level transition on a simulated input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

struct SimPin {
    edge: EdgeMode,
    pull: PullMode,
    handler: Option<(EdgeCallback, Arc<PulseCounter>)>,
    enabled: bool,
    disables: u32,
    enables: u32,
}

#[derive(Default)]
struct SimInputState {
    pins: HashMap<i32, SimPin>,
    fail_configure: Option<HwInitError>,
}

/// Simulated GPIO inputs with interrupt dispatch.
#[derive(Default)]
pub struct SimEdgeInput {
    state: Mutex<SimInputState>,
}

impl SimEdgeInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive one transition on `pin`.  The registered callback runs if the
    /// interrupt is enabled and `edge` matches the configured mode; edges
    /// arriving while the interrupt is masked are lost, as on hardware.
    pub fn emit(&self, pin: i32, edge: Edge) {
        let s = lock(&self.state);
        let Some(p) = s.pins.get(&pin) else {
            return;
        };
        let qualifies = match (p.edge, edge) {
            (EdgeMode::Any, _) => true,
            (EdgeMode::Rising, Edge::Rising) | (EdgeMode::Falling, Edge::Falling) => true,
            _ => false,
        };
        if !(p.enabled && qualifies) {
            return;
        }
        if let Some((callback, counter)) = &p.handler {
            callback(counter.as_ref());
        }
    }

    /// `n` full tachometer pulses (rising then falling edge).
    pub fn emit_pulses(&self, pin: i32, n: usize) {
        for _ in 0..n {
            self.emit(pin, Edge::Rising);
            self.emit(pin, Edge::Falling);
        }
    }

    pub fn input_config(&self, pin: i32) -> Option<(EdgeMode, PullMode)> {
        lock(&self.state).pins.get(&pin).map(|p| (p.edge, p.pull))
    }

    pub fn has_callback(&self, pin: i32) -> bool {
        lock(&self.state)
            .pins
            .get(&pin)
            .is_some_and(|p| p.handler.is_some())
    }

    pub fn interrupt_enabled(&self, pin: i32) -> bool {
        lock(&self.state).pins.get(&pin).is_some_and(|p| p.enabled)
    }

    /// `(disable calls, enable calls)` seen on `pin`.
    pub fn interrupt_toggles(&self, pin: i32) -> (u32, u32) {
        lock(&self.state)
            .pins
            .get(&pin)
            .map_or((0, 0), |p| (p.disables, p.enables))
    }

    /// Make the next `configure_input` fail with `err`.
    pub fn fail_next_configure(&self, err: HwInitError) {
        lock(&self.state).fail_configure = Some(err);
    }
}

impl EdgeInput for SimEdgeInput {
    fn configure_input(
        &self,
        pin: i32,
        edge: EdgeMode,
        pull: PullMode,
    ) -> Result<(), HwInitError> {
        let mut s = lock(&self.state);
        if let Some(err) = s.fail_configure.take() {
            return Err(err);
        }
        s.pins.insert(
            pin,
            SimPin {
                edge,
                pull,
                handler: None,
                enabled: true,
                disables: 0,
                enables: 0,
            },
        );
        debug!("gpio(sim): input GPIO {} {:?} {:?}", pin, edge, pull);
        Ok(())
    }

    fn register_edge_callback(
        &self,
        pin: i32,
        callback: EdgeCallback,
        context: Arc<PulseCounter>,
    ) -> Result<(), HwInitError> {
        let mut s = lock(&self.state);
        let p = s
            .pins
            .get_mut(&pin)
            .ok_or(HwInitError::IsrHandlerFailed(ERR_INVALID_STATE))?;
        p.handler = Some((callback, context));
        Ok(())
    }

    fn disable_interrupt(&self, pin: i32) {
        if let Some(p) = lock(&self.state).pins.get_mut(&pin) {
            p.enabled = false;
            p.disables += 1;
        }
    }

    fn enable_interrupt(&self, pin: i32) {
        if let Some(p) = lock(&self.state).pins.get_mut(&pin) {
            p.enabled = true;
            p.enables += 1;
        }
    }
}
