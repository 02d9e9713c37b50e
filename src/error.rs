//! Unified error types for the fan controller.
//!
//! A single `Error` enum that every subsystem converts into.  All variants
//! are `Copy` so they can be handed to the event sink and logged from the
//! run loop without allocation.
//!
//! "Not found" is deliberately absent: lookups by name return `Option`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible fan operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral configuration failed.  Fatal at startup, never retried.
    HardwareInit(HwInitError),
    /// A runtime PWM write failed.
    Actuator(ActuatorError),
    /// A caller-supplied value is outside its contract (e.g. power > 100 %).
    /// The previous state is left unchanged.
    InvalidArgument(&'static str),
    /// A power or speed operation was attempted before `initialize()`.
    NotInitialized,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HardwareInit(e) => write!(f, "hardware init: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::NotInitialized => write!(f, "fan not initialized"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Hardware initialisation errors
// ---------------------------------------------------------------------------

/// Errors during one-shot peripheral initialisation.
///
/// Variants carrying an `i32` hold the raw ESP-IDF return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    /// `ledc_timer_config` rejected the timer setup.
    PwmTimerConfigFailed(i32),
    /// `ledc_channel_config` rejected the channel setup.
    PwmChannelConfigFailed(i32),
    /// `gpio_config` rejected the tachometer input setup.
    GpioConfigFailed(i32),
    /// The per-pin GPIO ISR service could not be installed.
    IsrInstallFailed(i32),
    /// `gpio_isr_handler_add` failed for a tachometer pin.
    IsrHandlerFailed(i32),
    /// A fan uses the same pin for PWM output and tachometer input.
    PinConflict { pin: i32 },
    /// Two fans claim the same PWM channel or timer.
    ResourceConflict { channel: u32, timer: u32 },
}

impl fmt::Display for HwInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmTimerConfigFailed(rc) => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::PwmChannelConfigFailed(rc) => {
                write!(f, "LEDC channel config failed (rc={})", rc)
            }
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => {
                write!(f, "GPIO ISR service install failed (rc={})", rc)
            }
            Self::IsrHandlerFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
            Self::PinConflict { pin } => {
                write!(f, "GPIO {} used for both PWM and tachometer", pin)
            }
            Self::ResourceConflict { channel, timer } => write!(
                f,
                "PWM channel {} / timer {} already claimed by another fan",
                channel, timer
            ),
        }
    }
}

impl std::error::Error for HwInitError {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::HardwareInit(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// `ledc_set_duty` / `ledc_update_duty` returned an error.
    PwmWriteFailed(i32),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed(rc) => write!(f, "PWM write failed (rc={})", rc),
        }
    }
}

impl std::error::Error for ActuatorError {}

impl embedded_hal::pwm::Error for ActuatorError {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
