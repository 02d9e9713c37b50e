//! Peripheral bindings and execution-context helpers.

#[cfg(all(target_os = "espidf", feature = "espidf"))]
pub mod hw_init;
pub mod pwm_channel;
#[cfg(not(target_os = "espidf"))]
pub mod sim;
pub mod task_pin;
