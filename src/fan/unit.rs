//! PWM-driven fan with tachometer feedback.
//!
//! ## Speed sampling
//!
//! RPM is a rate over non-overlapping windows of `sample_cycle_ms`.  Reads
//! inside a window return the cached value; the first read after a window
//! closes takes the pulse count with the tacho interrupt masked, converts
//! it, and starts the next window.  Callers polling faster than once per
//! window see a step function.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use embedded_hal::pwm::SetDutyCycle;
use log::{debug, info, warn};

use crate::app::ports::{EdgeMode, PullMode, PwmChannelConfig};
use crate::config::FanConfig;
use crate::drivers::pwm_channel::{FanPwmChannel, percent_to_duty};
use crate::error::{Error, Result};
use crate::pins;

use super::tacho::{PulseCounter, pulse_isr, pulses_to_rpm};
use super::{FanCapability, FanHardware, lock};

#[derive(Debug, Clone, Copy, Default)]
struct TachoSample {
    rpm: u16,
    taken_at_ms: u64,
}

#[derive(Debug, Clone, Copy)]
struct PowerState {
    /// `max_power_percent` is the level the fan runs at when switched on.
    config: FanConfig,
    /// What the PWM pin is driving right now (0 while idle).
    output_percent: u8,
}

pub struct FanUnit {
    state: Mutex<PowerState>,
    /// Written by the ISR, taken by `speed()`.
    pulses: Arc<PulseCounter>,
    sample: Mutex<TachoSample>,
    initialized: AtomicBool,
    hw: FanHardware,
}

impl FanUnit {
    pub fn new(config: FanConfig, hw: FanHardware) -> Self {
        Self {
            state: Mutex::new(PowerState {
                config,
                output_percent: 100,
            }),
            pulses: Arc::new(PulseCounter::new()),
            sample: Mutex::new(TachoSample::default()),
            initialized: AtomicBool::new(false),
            hw,
        }
    }

    /// Program the PWM output (8-bit, 25 kHz, starting at full duty) and the
    /// pulled-up tacho input with its rising-edge pulse counter.
    ///
    /// Runs once; later calls are ignored.
    pub fn initialize(&self) -> Result<()> {
        if self.initialized.load(Ordering::Acquire) {
            warn!("Fan '{}': already initialized", self.name());
            return Ok(());
        }

        let cfg = self.configuration();
        cfg.validate()?;

        self.hw.pwm.configure_channel(&PwmChannelConfig {
            pin: cfg.pwm_pin,
            channel: cfg.channel,
            timer: cfg.timer,
            resolution_bits: pins::PWM_RESOLUTION_BITS,
            frequency_hz: pins::FAN_PWM_FREQ_HZ,
            initial_duty: u32::from(pins::MAX_DUTY),
        })?;

        self.hw
            .input
            .configure_input(cfg.tacho_pin, EdgeMode::Rising, PullMode::Up)?;
        self.hw
            .input
            .register_edge_callback(cfg.tacho_pin, pulse_isr, Arc::clone(&self.pulses))?;

        lock(&self.sample).taken_at_ms = self.hw.clock.now_ms();
        self.initialized.store(true, Ordering::Release);

        info!(
            "Fan '{}': PWM GPIO {} (ch {}, timer {}), tacho GPIO {}",
            cfg.name, cfg.pwm_pin, cfg.channel, cfg.timer, cfg.tacho_pin
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn name(&self) -> &'static str {
        lock(&self.state).config.name
    }

    /// Power currently applied to the PWM pin, as opposed to the stored
    /// on-level in [`configuration`](FanCapability::configuration).
    pub fn output_percent(&self) -> u8 {
        lock(&self.state).output_percent
    }

    /// Drive the fan at its stored on-level.
    pub fn switch_on(&self) -> Result<u8> {
        self.ensure_initialized()?;
        let mut state = lock(&self.state);
        let percent = state.config.max_power_percent;
        self.apply(&mut state, percent)?;
        Ok(percent)
    }

    /// Stop the fan without forgetting its on-level.
    pub fn switch_off(&self) -> Result<()> {
        self.ensure_initialized()?;
        let mut state = lock(&self.state);
        self.apply(&mut state, 0)
    }

    /// Write `percent` to the hardware.  The caller holds the state lock
    /// across the write so hardware and stored power always agree.
    fn apply(&self, state: &mut PowerState, percent: u8) -> Result<()> {
        let duty = percent_to_duty(percent);
        FanPwmChannel::new(&*self.hw.pwm, state.config.channel).set_duty_cycle(duty)?;
        state.output_percent = percent;
        debug!("Fan '{}': output {}% (duty {})", state.config.name, percent, duty);
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }
}

impl FanCapability for FanUnit {
    fn set_power(&self, percent: u8) -> Result<()> {
        self.ensure_initialized()?;
        if percent > 100 {
            return Err(Error::InvalidArgument("power must be 0-100 %"));
        }

        let mut state = lock(&self.state);
        self.apply(&mut state, percent)?;
        state.config.max_power_percent = percent;
        Ok(())
    }

    fn speed(&self) -> Result<u16> {
        self.ensure_initialized()?;

        let now = self.hw.clock.now_ms();
        let mut sample = lock(&self.sample);
        let cycle_ms = u64::from(self.hw.tacho.sample_cycle_ms);
        if now.saturating_sub(sample.taken_at_ms) < cycle_ms {
            return Ok(sample.rpm);
        }

        let pin = lock(&self.state).config.tacho_pin;
        self.hw.input.disable_interrupt(pin);
        let pulses = self.pulses.take();
        sample.rpm = pulses_to_rpm(pulses, &self.hw.tacho);
        sample.taken_at_ms = now;
        self.hw.input.enable_interrupt(pin);

        Ok(sample.rpm)
    }

    fn configuration(&self) -> FanConfig {
        lock(&self.state).config
    }
}
