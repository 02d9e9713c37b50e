//! Application layer: port traits, outbound events and the web-facing
//! service facade.
//!
//! Fan logic reaches hardware only through the traits in [`ports`], so the
//! registry and the run loop are testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
