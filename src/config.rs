//! Compiled-in configuration.
//!
//! Fan wiring, tachometer timing, the run/idle cycle defaults and task
//! descriptors.  Nothing here is persisted; a reflash changes it.

use serde::{Deserialize, Serialize};

use crate::drivers::task_pin::Core;
use crate::error::{Error, HwInitError};
use crate::pins;

/// Identity, wiring and power level of one fan.
///
/// Immutable after construction except `max_power_percent`, which tracks
/// the last commanded power (see [`crate::fan::FanCapability::set_power`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FanConfig {
    /// Unique key in the registry.
    pub name: &'static str,
    pub pwm_pin: i32,
    pub tacho_pin: i32,
    /// LEDC channel.  Must not be shared with another fan.
    pub channel: u32,
    /// LEDC timer.  Must not be shared with another fan.
    pub timer: u32,
    /// Power (0-100 %) applied when the fan is switched on.
    pub max_power_percent: u8,
}

impl FanConfig {
    /// Check the per-fan wiring and power invariants.
    pub fn validate(&self) -> Result<(), Error> {
        if self.pwm_pin == self.tacho_pin {
            return Err(HwInitError::PinConflict { pin: self.pwm_pin }.into());
        }
        if self.max_power_percent > 100 {
            return Err(Error::InvalidArgument("power must be 0-100 %"));
        }
        Ok(())
    }

    /// `true` if both configs would fight over the same LEDC resources.
    pub fn collides_with(&self, other: &FanConfig) -> bool {
        self.channel == other.channel || self.timer == other.timer
    }
}

pub const FAN_FRONT: FanConfig = FanConfig {
    name: "Front",
    pwm_pin: pins::FAN_FRONT_PWM_GPIO,
    tacho_pin: pins::FAN_FRONT_TACHO_GPIO,
    channel: pins::FAN_FRONT_LEDC_CHANNEL,
    timer: pins::FAN_FRONT_LEDC_TIMER,
    max_power_percent: 60,
};

pub const FAN_BACK: FanConfig = FanConfig {
    name: "Back",
    pwm_pin: pins::FAN_BACK_PWM_GPIO,
    tacho_pin: pins::FAN_BACK_TACHO_GPIO,
    channel: pins::FAN_BACK_LEDC_CHANNEL,
    timer: pins::FAN_BACK_LEDC_TIMER,
    max_power_percent: 70,
};

/// The fans fitted to the board.
pub fn default_fans() -> [FanConfig; 2] {
    [FAN_FRONT, FAN_BACK]
}

/// Tachometer sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TachoConfig {
    /// Length of one RPM sampling window (milliseconds).
    pub sample_cycle_ms: u32,
    /// Interrupts seen per full rotation.  Every fan measured so far
    /// produces two.
    pub pulses_per_rotation: u32,
}

impl Default for TachoConfig {
    fn default() -> Self {
        Self {
            sample_cycle_ms: 1000,
            pulses_per_rotation: 2,
        }
    }
}

/// Run/idle cycle defaults shared by every fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Pause between runs (seconds).
    pub interval_secs: u32,
    /// How long the fans run each cycle (seconds).
    pub runtime_secs: u32,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 600,
            runtime_secs: 600,
        }
    }
}

/// Execution-context descriptor for a long-running task.
#[derive(Debug, Clone, Copy)]
pub struct TaskConfig {
    /// Thread name, null-terminated for `esp_pthread_set_cfg`.
    pub name: &'static str,
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
}

pub const FAN_TASK: TaskConfig = TaskConfig {
    name: "fan-cycle\0",
    core: Core::App,
    priority: 4,
    stack_kb: 4,
};
