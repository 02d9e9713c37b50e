//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one layer of the fan
//! controller against the simulated LEDC and GPIO peripherals.  All tests
//! run on the host with no real hardware required.

#![cfg(not(target_os = "espidf"))]

mod fan_unit_tests;
mod mock_hw;
mod registry_tests;
mod scheduler_tests;
mod service_tests;
