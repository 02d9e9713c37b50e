//! GPIO / LEDC assignments for the fan controller board.
//!
//! Single source of truth: the fan configurations in [`crate::config`]
//! reference these constants rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Front fan
// ---------------------------------------------------------------------------

/// PWM control line (4-pin fan, blue wire).
pub const FAN_FRONT_PWM_GPIO: i32 = 27;
/// Open-collector tachometer output (green wire), pulled up internally.
pub const FAN_FRONT_TACHO_GPIO: i32 = 14;
pub const FAN_FRONT_LEDC_CHANNEL: u32 = 0;
pub const FAN_FRONT_LEDC_TIMER: u32 = 0;

// ---------------------------------------------------------------------------
// Back fan
// ---------------------------------------------------------------------------

pub const FAN_BACK_PWM_GPIO: i32 = 32;
pub const FAN_BACK_TACHO_GPIO: i32 = 33;
pub const FAN_BACK_LEDC_CHANNEL: u32 = 1;
pub const FAN_BACK_LEDC_TIMER: u32 = 1;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// Highest duty value at [`PWM_RESOLUTION_BITS`].
pub const MAX_DUTY: u16 = (1 << PWM_RESOLUTION_BITS) - 1;
/// Intel 4-wire fan spec carrier frequency (25 kHz, inaudible).
pub const FAN_PWM_FREQ_HZ: u32 = 25_000;
