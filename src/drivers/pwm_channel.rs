//! One LEDC channel seen through `embedded_hal::pwm::SetDutyCycle`.
//!
//! The shared [`PwmPeripheral`] splits a duty change into stage + commit;
//! this wrapper does both so callers get a single synchronous write.

use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use crate::app::ports::PwmPeripheral;
use crate::error::ActuatorError;
use crate::pins::MAX_DUTY;

pub struct FanPwmChannel<'a> {
    pwm: &'a dyn PwmPeripheral,
    channel: u32,
}

impl<'a> FanPwmChannel<'a> {
    pub fn new(pwm: &'a dyn PwmPeripheral, channel: u32) -> Self {
        Self { pwm, channel }
    }
}

impl ErrorType for FanPwmChannel<'_> {
    type Error = ActuatorError;
}

impl SetDutyCycle for FanPwmChannel<'_> {
    fn max_duty_cycle(&self) -> u16 {
        MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let duty = duty.min(MAX_DUTY);
        self.pwm.set_duty(self.channel, u32::from(duty))?;
        self.pwm.commit_duty(self.channel)
    }
}

/// `round(percent * MAX_DUTY / 100)`.  `percent` must already be ≤ 100.
pub const fn percent_to_duty(percent: u8) -> u16 {
    ((percent as u32 * MAX_DUTY as u32 + 50) / 100) as u16
}
