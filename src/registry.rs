//! Fan registry.
//!
//! Owns every [`FanUnit`] on the board, keyed by name, plus the two cycle
//! scalars (run time and idle interval) the run loop reads at each phase
//! boundary.
//!
//! The fan set is built once at startup through `&mut self`
//! ([`create_fan`](FanRegistry::create_fan), then
//! [`initialize_all`](FanRegistry::initialize_all)); afterwards the registry
//! is shared as `Arc<FanRegistry>` and everything goes through `&self`.
//! Callers borrow fans as `&dyn FanCapability` and never own them.

use core::sync::atomic::{AtomicU32, Ordering};
use std::collections::BTreeMap;

use log::{info, warn};

use crate::app::events::FanEvent;
use crate::app::ports::EventSink;
use crate::config::{CycleConfig, FanConfig};
use crate::error::{HwInitError, Result};
use crate::fan::{FanCapability, FanHardware, FanUnit};

pub struct FanRegistry {
    fans: BTreeMap<&'static str, FanUnit>,
    hw: FanHardware,
    interval_secs: AtomicU32,
    runtime_secs: AtomicU32,
}

impl FanRegistry {
    pub fn new(hw: FanHardware, cycle: CycleConfig) -> Self {
        Self {
            fans: BTreeMap::new(),
            hw,
            interval_secs: AtomicU32::new(cycle.interval_secs),
            runtime_secs: AtomicU32::new(cycle.runtime_secs),
        }
    }

    /// Add a fan under `config.name`.  A second fan with the same name
    /// replaces the first.
    pub fn create_fan(&mut self, config: FanConfig) {
        let unit = FanUnit::new(config, self.hw.clone());
        if self.fans.insert(config.name, unit).is_some() {
            warn!("Registry: fan '{}' replaced", config.name);
        } else {
            info!("Registry: fan '{}' created", config.name);
        }
    }

    /// Bring up every fan's hardware.
    ///
    /// LEDC channel and timer collisions are rejected before any peripheral
    /// is touched.  Otherwise fans are initialised in name order and the
    /// first failure is returned; fans already brought up stay up.
    pub fn initialize_all(&self) -> Result<()> {
        let configs: Vec<FanConfig> = self.fans.values().map(|f| f.configuration()).collect();
        for (i, a) in configs.iter().enumerate() {
            if let Some(b) = configs[i + 1..].iter().find(|b| a.collides_with(b)) {
                warn!("Registry: '{}' and '{}' share LEDC resources", a.name, b.name);
                return Err(HwInitError::ResourceConflict {
                    channel: b.channel,
                    timer: b.timer,
                }
                .into());
            }
        }

        for fan in self.fans.values() {
            fan.initialize()?;
        }
        info!("Registry: {} fan(s) initialized", self.fans.len());
        Ok(())
    }

    pub fn fan(&self, name: &str) -> Option<&dyn FanCapability> {
        self.fans.get(name).map(|f| f as &dyn FanCapability)
    }

    /// Every fan, by name.
    pub fn fans(&self) -> BTreeMap<&'static str, &dyn FanCapability> {
        self.fans
            .iter()
            .map(|(name, f)| (*name, f as &dyn FanCapability))
            .collect()
    }

    /// Concrete unit, for status that is not part of the capability.
    pub fn unit(&self, name: &str) -> Option<&FanUnit> {
        self.fans.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fans.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.fans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fans.is_empty()
    }

    /// Idle time between runs (seconds).
    pub fn interval_secs(&self) -> u32 {
        self.interval_secs.load(Ordering::Acquire)
    }

    /// Takes effect at the next idle window.
    pub fn set_interval(&self, secs: u32) {
        self.interval_secs.store(secs, Ordering::Release);
        info!("Registry: interval = {}s", secs);
    }

    /// Run time per cycle (seconds).
    pub fn runtime_secs(&self) -> u32 {
        self.runtime_secs.load(Ordering::Acquire)
    }

    /// Takes effect at the next run window.
    pub fn set_runtime(&self, secs: u32) {
        self.runtime_secs.store(secs, Ordering::Release);
        info!("Registry: runtime = {}s", secs);
    }

    /// Switch every fan on at its stored power.  A fan that fails is
    /// reported and skipped.
    pub fn start_fans(&self, sink: &mut impl EventSink) {
        for (&name, fan) in &self.fans {
            if let Err(error) = fan.switch_on() {
                sink.emit(&FanEvent::PowerFailed { name, error });
            }
        }
    }

    /// Switch every fan off, keeping their stored power.
    pub fn stop_fans(&self, sink: &mut impl EventSink) {
        for (&name, fan) in &self.fans {
            if let Err(error) = fan.switch_off() {
                sink.emit(&FanEvent::PowerFailed { name, error });
            }
        }
    }

    /// Emit the measured speed and stored power of every fan.
    ///
    /// The first read after a run window counts every pulse since the
    /// previous sample as one nominal window, so after a long run the
    /// reported speed saturates at `u16::MAX`.
    pub fn report_speeds(&self, sink: &mut impl EventSink) {
        for (&name, fan) in &self.fans {
            match fan.speed() {
                Ok(rpm) => sink.emit(&FanEvent::SpeedReport {
                    name,
                    rpm,
                    power: fan.configuration().max_power_percent,
                }),
                Err(e) => warn!("Registry: speed of '{}' unavailable: {}", name, e),
            }
        }
    }
}
