//! ESP-IDF peripheral bindings: LEDC PWM and GPIO edge interrupts.
//!
//! Thin wrappers over raw `esp_idf_svc::sys` calls that implement the
//! [`PwmPeripheral`] and [`EdgeInput`] ports.  Both types are stateless
//! handles onto global peripherals (the ESP-IDF drivers lock internally),
//! apart from the ISR bindings `GpioEdgeInput` keeps alive.
//!
//! Only built for ESP-IDF with the `espidf` feature; host builds run the
//! fan logic against `crate::drivers::sim` instead.

use std::sync::{Arc, Mutex};

use esp_idf_svc::sys::*;
use log::info;

use crate::app::ports::{
    EdgeCallback, EdgeInput, EdgeMode, PullMode, PwmChannelConfig, PwmPeripheral,
};
use crate::error::{ActuatorError, HwInitError};
use crate::fan::lock;
use crate::fan::tacho::PulseCounter;

// ── GPIO ISR service ──────────────────────────────────────────

/// Install the per-pin GPIO ISR service.  Must run before any fan is
/// initialized.
pub fn install_isr_service() -> Result<(), HwInitError> {
    // SAFETY: called once from main() before any task is spawned.
    // ESP_ERR_INVALID_STATE means the service is already installed.
    let ret = unsafe { gpio_install_isr_service(0) };
    if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
        return Err(HwInitError::IsrInstallFailed(ret));
    }
    info!("hw_init: GPIO ISR service installed");
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

/// The LEDC controller in low-speed mode.
#[derive(Debug, Default)]
pub struct LedcPwm;

impl LedcPwm {
    pub fn new() -> Self {
        Self
    }
}

impl PwmPeripheral for LedcPwm {
    fn configure_channel(&self, config: &PwmChannelConfig) -> Result<(), HwInitError> {
        let timer = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num: config.timer as ledc_timer_t,
            duty_resolution: config.resolution_bits as ledc_timer_bit_t,
            freq_hz: config.frequency_hz,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        // SAFETY: plain config struct passed by reference; the driver copies it.
        let ret = unsafe { ledc_timer_config(&timer) };
        if ret != ESP_OK {
            return Err(HwInitError::PwmTimerConfigFailed(ret));
        }

        let channel = ledc_channel_config_t {
            gpio_num: config.pin,
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: config.channel as ledc_channel_t,
            intr_type: ledc_intr_type_t_LEDC_INTR_DISABLE,
            timer_sel: config.timer as ledc_timer_t,
            duty: config.initial_duty,
            hpoint: 0,
            ..Default::default()
        };
        // SAFETY: as above.
        let ret = unsafe { ledc_channel_config(&channel) };
        if ret != ESP_OK {
            return Err(HwInitError::PwmChannelConfigFailed(ret));
        }

        info!(
            "hw_init: LEDC ch{} / timer{} on GPIO {} ({} Hz, {}-bit)",
            config.channel, config.timer, config.pin, config.frequency_hz, config.resolution_bits
        );
        Ok(())
    }

    fn set_duty(&self, channel: u32, duty: u32) -> Result<(), ActuatorError> {
        // SAFETY: register write on a configured channel; LEDC serialises
        // concurrent callers with its own spinlock.
        let ret = unsafe { ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty) };
        if ret != ESP_OK {
            return Err(ActuatorError::PwmWriteFailed(ret));
        }
        Ok(())
    }

    fn commit_duty(&self, channel: u32) -> Result<(), ActuatorError> {
        // SAFETY: as `set_duty`.
        let ret = unsafe { ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel) };
        if ret != ESP_OK {
            return Err(ActuatorError::PwmWriteFailed(ret));
        }
        Ok(())
    }
}

// ── GPIO edge interrupts ──────────────────────────────────────

/// Callback and context handed to the ISR trampoline as its `arg`.
struct IsrBinding {
    callback: EdgeCallback,
    context: Arc<PulseCounter>,
}

unsafe extern "C" fn edge_trampoline(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` points into a Box owned by `GpioEdgeInput::bindings`,
    // which is never shrunk while handlers are registered.  The callback
    // only performs an atomic add.
    let binding = unsafe { &*(arg as *const IsrBinding) };
    (binding.callback)(&binding.context);
}

/// GPIO inputs with per-pin ISR handlers.
#[derive(Default)]
pub struct GpioEdgeInput {
    /// Boxed so each binding's address survives `Vec` growth.
    bindings: Mutex<Vec<Box<IsrBinding>>>,
}

impl GpioEdgeInput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EdgeInput for GpioEdgeInput {
    fn configure_input(
        &self,
        pin: i32,
        edge: EdgeMode,
        pull: PullMode,
    ) -> Result<(), HwInitError> {
        let intr_type = match edge {
            EdgeMode::Rising => gpio_int_type_t_GPIO_INTR_POSEDGE,
            EdgeMode::Falling => gpio_int_type_t_GPIO_INTR_NEGEDGE,
            EdgeMode::Any => gpio_int_type_t_GPIO_INTR_ANYEDGE,
        };
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: if pull == PullMode::Up {
                gpio_pullup_t_GPIO_PULLUP_ENABLE
            } else {
                gpio_pullup_t_GPIO_PULLUP_DISABLE
            },
            pull_down_en: if pull == PullMode::Down {
                gpio_pulldown_t_GPIO_PULLDOWN_ENABLE
            } else {
                gpio_pulldown_t_GPIO_PULLDOWN_DISABLE
            },
            intr_type,
            ..Default::default()
        };
        // SAFETY: config struct passed by reference; pin validated by gpio_config.
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        Ok(())
    }

    fn register_edge_callback(
        &self,
        pin: i32,
        callback: EdgeCallback,
        context: Arc<PulseCounter>,
    ) -> Result<(), HwInitError> {
        let mut bindings = lock(&self.bindings);
        let binding = Box::new(IsrBinding { callback, context });
        let arg = &*binding as *const IsrBinding as *mut core::ffi::c_void;

        // SAFETY: `arg` stays valid for as long as `self` lives: the Box is
        // pushed below and bindings are never removed.
        let ret = unsafe { gpio_isr_handler_add(pin, Some(edge_trampoline), arg) };
        if ret != ESP_OK {
            return Err(HwInitError::IsrHandlerFailed(ret));
        }
        bindings.push(binding);

        info!("hw_init: tacho ISR on GPIO {}", pin);
        Ok(())
    }

    fn disable_interrupt(&self, pin: i32) {
        // SAFETY: masks one pin's interrupt; no memory is touched.
        unsafe {
            gpio_intr_disable(pin);
        }
    }

    fn enable_interrupt(&self, pin: i32) {
        // SAFETY: as `disable_interrupt`.
        unsafe {
            gpio_intr_enable(pin);
        }
    }
}
