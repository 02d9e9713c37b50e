//! Adapters: concrete implementations of the non-peripheral port traits.
//!
//! | Adapter    | Implements | Connects to                        |
//! |------------|------------|------------------------------------|
//! | `log_sink` | EventSink  | Serial log output                  |
//! | `time`     | TimePort   | ESP32 system timer / manual clock  |
//!
//! Peripheral ports (`PwmPeripheral`, `EdgeInput`) are implemented in
//! [`crate::drivers`].

pub mod log_sink;
pub mod time;
