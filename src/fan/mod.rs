//! Single-fan control: PWM power, tachometer speed, capability contract.
//!
//! [`FanUnit`] is the only concrete fan.  Everything outside the registry
//! talks to it through [`FanCapability`], so the web layer and the tests
//! never depend on hardware-initialisation details.

pub mod tacho;
mod unit;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::app::ports::{EdgeInput, PwmPeripheral, TimePort};
use crate::config::{FanConfig, TachoConfig};
use crate::error::Result;

pub use unit::FanUnit;

/// What a caller may do with a fan.
///
/// Implementations synchronise internally: every method takes `&self` and
/// may be called concurrently with the run loop and the tacho ISR.
pub trait FanCapability: Send + Sync {
    /// Drive the fan at `percent` (0-100).  Out-of-range values are
    /// rejected with [`Error::InvalidArgument`](crate::Error::InvalidArgument)
    /// and leave the stored power unchanged.
    fn set_power(&self, percent: u8) -> Result<()>;

    /// Last RPM estimate.  Resamples at most once per sampling cycle.
    fn speed(&self) -> Result<u16>;

    /// Current configuration, including the last commanded power.
    fn configuration(&self) -> FanConfig;
}

/// Peripherals and timing shared by every fan on one board.
#[derive(Clone)]
pub struct FanHardware {
    pub pwm: Arc<dyn PwmPeripheral>,
    pub input: Arc<dyn EdgeInput>,
    pub clock: Arc<dyn TimePort>,
    pub tacho: TachoConfig,
}

/// Lock a mutex, recovering the data if a previous holder panicked.
/// Fan state stays meaningful after a panic elsewhere; the run loop must
/// keep going.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
