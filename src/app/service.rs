//! Typed surface for the web layer.
//!
//! [`FanService`] is what an HTTP handler calls: it maps fan lookups and
//! power/settings updates onto the shared [`FanRegistry`] and returns
//! serialisable DTOs.  Routing and JSON encoding stay in the transport.

use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::registry::FanRegistry;

/// One row of the fan status listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FanStatus {
    pub name: &'static str,
    /// Last RPM estimate (0 if the fan could not be sampled).
    pub speed: u16,
    /// Stored power level in percent.
    pub power: u8,
}

/// Run/idle cycle parameters as exchanged with the web UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSettings {
    /// Idle time between runs (seconds).
    pub interval: u32,
    /// Run time per cycle (seconds).
    pub runtime_of_fans: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    /// No fan registered under the requested name.
    NotFound,
    /// Request value outside its accepted range.
    InvalidArgument(&'static str),
    /// The fan rejected the operation.
    Fan(Error),
}

impl core::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "fan not found"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Fan(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<Error> for ServiceError {
    fn from(e: Error) -> Self {
        match e {
            Error::InvalidArgument(msg) => Self::InvalidArgument(msg),
            other => Self::Fan(other),
        }
    }
}

#[derive(Clone)]
pub struct FanService {
    registry: Arc<FanRegistry>,
}

impl FanService {
    pub fn new(registry: Arc<FanRegistry>) -> Self {
        Self { registry }
    }

    /// Speed and power of every fan, ordered by name.
    pub fn fan_statuses(&self) -> Vec<FanStatus> {
        self.registry
            .fans()
            .into_iter()
            .map(|(name, fan)| FanStatus {
                name,
                speed: fan.speed().unwrap_or_else(|e| {
                    warn!("Service: speed of '{}' unavailable: {}", name, e);
                    0
                }),
                power: fan.configuration().max_power_percent,
            })
            .collect()
    }

    /// Set one fan's power.  `power` arrives untyped from the request body
    /// and must be within 0-100.
    pub fn set_fan_power(&self, name: &str, power: i64) -> Result<(), ServiceError> {
        let fan = self.registry.fan(name).ok_or(ServiceError::NotFound)?;
        let percent = u8::try_from(power)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or(ServiceError::InvalidArgument("power must be 0-100"))?;
        fan.set_power(percent)?;
        info!("Service: fan '{}' power set to {}%", name, percent);
        Ok(())
    }

    pub fn manager_settings(&self) -> ManagerSettings {
        ManagerSettings {
            interval: self.registry.interval_secs(),
            runtime_of_fans: self.registry.runtime_secs(),
        }
    }

    /// Both values take effect at the next cycle boundary.
    pub fn update_manager_settings(&self, settings: ManagerSettings) {
        self.registry.set_interval(settings.interval);
        self.registry.set_runtime(settings.runtime_of_fans);
    }
}
