//! Fan controller library.
//!
//! Exposes the fan logic for integration testing.  All ESP-IDF-specific
//! code is guarded by `#[cfg(all(target_os = "espidf", feature = "espidf"))]`
//! within each module, so the library also builds for the target without
//! the ESP-IDF crates; host builds get simulated peripherals in
//! [`drivers::sim`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fan;
pub mod pins;
pub mod registry;
pub mod scheduler;
pub mod shutdown;

pub use error::{Error, Result};
